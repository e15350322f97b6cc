use crate::ast::Term;
use std::cell::Cell;
use std::rc::Rc;

/// Typing context for term variables. Each entry stores the binder hint, the
/// type as it was written at the binder (valid in the prefix of the context
/// below that binder), and the number of interval variables in scope there.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    hint: String,
    ty: Rc<Term>,
    idepth: usize,
}

impl Context {
    pub fn new() -> Self {
        Context { entries: Vec::new() }
    }

    /// Extend with one binder whose type mentions no interval variables of
    /// an enclosing path binder. The receiver is left untouched, so leaving
    /// the binder is simply dropping the returned context.
    pub fn push(&self, hint: impl Into<String>, ty: Rc<Term>) -> Self {
        self.push_under(hint, ty, 0)
    }

    /// Extend with one binder made while `idepth` interval variables were in
    /// scope.
    pub fn push_under(&self, hint: impl Into<String>, ty: Rc<Term>, idepth: usize) -> Self {
        let mut entries = self.entries.clone();
        entries.push(Entry {
            hint: hint.into(),
            ty,
            idepth,
        });
        Context { entries }
    }

    /// Raw type of the variable with de Bruijn index `idx`. The caller shifts
    /// it by `idx + 1` to use it in the current context.
    pub fn get(&self, idx: usize) -> Option<Rc<Term>> {
        self.entry(idx).map(|e| e.ty.clone())
    }

    /// Interval depth recorded when the variable with index `idx` was bound.
    pub fn idepth(&self, idx: usize) -> Option<usize> {
        self.entry(idx).map(|e| e.idepth)
    }

    pub fn hint(&self, idx: usize) -> Option<&str> {
        self.entry(idx).map(|e| e.hint.as_str())
    }

    fn entry(&self, idx: usize) -> Option<&Entry> {
        // de Bruijn index: 0 is the most recently pushed
        self.entries.iter().rev().nth(idx)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Interval context. Interval variables carry no types, so only the depth
/// is tracked. Clones share the same counter.
#[derive(Debug, Clone, Default)]
pub struct ICtx {
    depth: Rc<Cell<usize>>,
}

impl ICtx {
    pub fn new() -> Self {
        ICtx::default()
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Bind one interval variable until the returned guard is popped or
    /// dropped.
    pub fn push(&self) -> IVarGuard {
        self.depth.set(self.depth.get() + 1);
        IVarGuard {
            depth: self.depth.clone(),
            popped: false,
        }
    }

    pub fn contains(&self, ix: usize) -> bool {
        ix < self.depth()
    }
}

/// Pop handle for an interval binder. Popping twice is a no-op, and a guard
/// that was never popped pops on drop.
#[derive(Debug)]
pub struct IVarGuard {
    depth: Rc<Cell<usize>>,
    popped: bool,
}

impl IVarGuard {
    pub fn pop(&mut self) {
        if !self.popped {
            self.popped = true;
            self.depth.set(self.depth.get().saturating_sub(1));
        }
    }
}

impl Drop for IVarGuard {
    fn drop(&mut self) {
        self.pop();
    }
}
