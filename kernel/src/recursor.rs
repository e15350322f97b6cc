//! Eliminator types and the reduction metadata behind them.
//!
//! For an inductive `T` with parameters `ps` and indices `is`, the eliminator
//! has type
//!
//! ```text
//! Π ps. Π(P : Π is. T ps is -> Sort L). Π cases. Π is. Π(t : T ps is). P is t
//! ```
//!
//! Point cases come first, then one case per path constructor. Every
//! recursive argument of a constructor is followed in its case by an
//! induction hypothesis. Only arguments whose type ends in `T` itself count
//! as recursive; other members of a mutual group get no hypothesis.
//!
//! Terms are moved between contexts by level. A level is a position counted
//! from the outermost binder of the eliminator type, which stays fixed while
//! binders are added below it.

use crate::ast::{app_spine, close_pis, head_global, pi_telescope, Level, Term};
use crate::env::{Constructor, Inductive, PathConstructor};
use crate::error::DeclarationError;
use std::collections::HashMap;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorInfo {
    pub name: String,
    /// Data arguments, parameters excluded
    pub num_args: usize,
    /// Data argument positions that receive an induction hypothesis
    pub recursive_args: Vec<usize>,
    /// One per recursive argument, evaluated in `[params, P, cases, data args]`
    pub ih_templates: Vec<Rc<Term>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathConstructorInfo {
    pub name: String,
    pub level: usize,
    pub num_args: usize,
    pub recursive_args: Vec<usize>,
    pub ih_templates: Vec<Rc<Term>>,
}

/// What the evaluator needs to reduce `elim params P cases indices target`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecursorInfo {
    pub elim_name: String,
    pub ind_name: String,
    pub num_params: usize,
    pub num_indices: usize,
    pub num_cases: usize,
    pub constructors: Vec<ConstructorInfo>,
    pub path_constructors: Vec<PathConstructorInfo>,
    pub is_hit: bool,
}

impl RecursorInfo {
    pub fn for_inductive(ind: &Inductive) -> Self {
        let num_cases = ind.constructors.len() + ind.path_ctors.len();
        let constructors = ind
            .constructors
            .iter()
            .map(|ctor| {
                let data = data_args(&ctor.ty, ind.num_params);
                let (recursive_args, ih_templates) = ih_templates(ind, &data, num_cases);
                ConstructorInfo {
                    name: ctor.name.clone(),
                    num_args: data.len(),
                    recursive_args,
                    ih_templates,
                }
            })
            .collect();
        let path_constructors = ind
            .path_ctors
            .iter()
            .map(|pc| {
                let data = data_args(&pc.ty, ind.num_params);
                let (recursive_args, ih_templates) = ih_templates(ind, &data, num_cases);
                PathConstructorInfo {
                    name: pc.name.clone(),
                    level: pc.level,
                    num_args: data.len(),
                    recursive_args,
                    ih_templates,
                }
            })
            .collect();
        RecursorInfo {
            elim_name: ind.eliminator_name.clone(),
            ind_name: ind.name.clone(),
            num_params: ind.num_params,
            num_indices: ind.num_indices,
            num_cases,
            constructors,
            path_constructors,
            is_hit: ind.is_hit,
        }
    }
}

/// Eliminator metadata keyed by eliminator name.
#[derive(Debug, Clone, Default)]
pub struct RecursorRegistry {
    entries: HashMap<String, RecursorInfo>,
}

impl RecursorRegistry {
    pub fn new() -> Self {
        RecursorRegistry::default()
    }

    /// Replaces any earlier entry under the same eliminator name.
    pub fn register(&mut self, info: RecursorInfo) {
        self.entries.insert(info.elim_name.clone(), info);
    }

    pub fn lookup(&self, elim_name: &str) -> Option<&RecursorInfo> {
        self.entries.get(elim_name)
    }

    pub fn remove(&mut self, elim_name: &str) -> Option<RecursorInfo> {
        self.entries.remove(elim_name)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// Eliminator type
// =============================================================================

/// Type of `ind`'s eliminator, with the motive landing in `Sort motive_level`.
pub fn eliminator_type(ind: &Inductive, motive_level: Level) -> Result<Rc<Term>, DeclarationError> {
    let np = ind.num_params;
    let mut binders = ind.param_types.clone();

    // The motive reuses the inductive's own index telescope.
    let depth = np + ind.num_indices;
    let target_ty = Term::apps(Term::global(&ind.name), (0..depth).map(|l| var_at(l, depth)));
    let mut motive = ind.index_types.clone();
    motive.push(("t".to_string(), target_ty));
    binders.push(("P".to_string(), close_pis(motive, Term::sort(motive_level))));

    for ctor in &ind.constructors {
        let ty = point_case_type(ind, ctor, binders.len());
        binders.push((format!("case_{}", ctor.name), ty));
    }
    for pc in &ind.path_ctors {
        let ty = path_case_type(ind, pc, binders.len())?;
        binders.push((format!("case_{}", pc.name), ty));
    }

    let mut levels: Vec<usize> = (0..np).collect();
    for (hint, ty) in &ind.index_types {
        let at = binders.len();
        binders.push((hint.clone(), relocate(ty, &levels, at)));
        levels.push(at);
    }
    let depth = binders.len();
    let target_ty = Term::apps(Term::global(&ind.name), levels.iter().map(|&l| var_at(l, depth)));
    binders.push(("t".to_string(), target_ty));

    let depth = binders.len();
    let indices = levels[np..].iter().map(|&l| var_at(l, depth)).collect();
    let result = motive_apply(var_at(np, depth), indices, Term::var(0));
    Ok(close_pis(binders, result))
}

/// The term at level `level`, seen from a context of depth `depth`.
fn var_at(level: usize, depth: usize) -> Rc<Term> {
    Term::var(depth - 1 - level)
}

/// Move `t` into a context of depth `depth`. `t` is written over a source
/// context whose level `l` now lives at level `levels[l]`.
fn relocate(t: &Rc<Term>, levels: &[usize], depth: usize) -> Rc<Term> {
    let src = levels.len();
    t.rename_free(&|ix| {
        if ix < src {
            depth - 1 - levels[src - 1 - ix]
        } else {
            ix - src + depth
        }
    })
}

fn motive_apply(motive: Rc<Term>, indices: Vec<Rc<Term>>, target: Rc<Term>) -> Rc<Term> {
    Term::apps(motive, indices.into_iter().chain(std::iter::once(target)))
}

/// Argument binders of a constructor type after its parameters.
fn data_args(ty: &Rc<Term>, num_params: usize) -> Vec<(String, Rc<Term>)> {
    let (tele, _) = pi_telescope(ty);
    tele.into_iter().skip(num_params).collect()
}

pub(crate) fn is_recursive(arg_ty: &Rc<Term>, ind: &str) -> bool {
    let (_, result) = pi_telescope(arg_ty);
    head_global(&result).as_deref() == Some(ind)
}

/// A recursive argument `a : Π xs. T ps is'` opened at depth `depth`.
struct Unfolded {
    /// The `xs`, each relocated to the depth it is bound at
    binders: Vec<(String, Rc<Term>)>,
    /// `is'` below the `xs`
    indices: Vec<Rc<Term>>,
    /// `a xs` below the `xs`
    applied: Rc<Term>,
}

fn unfold_recursive(arg_ty: &Rc<Term>, levels: &[usize], arg_level: usize, depth: usize, np: usize) -> Unfolded {
    let (xs, result) = pi_telescope(arg_ty);
    let mut levels = levels.to_vec();
    let mut binders = Vec::with_capacity(xs.len());
    for (x, (hint, ty)) in xs.iter().enumerate() {
        binders.push((hint.clone(), relocate(ty, &levels, depth + x)));
        levels.push(depth + x);
    }
    let inner = depth + xs.len();
    let (_, spine) = app_spine(&result);
    let indices = spine.iter().skip(np).map(|t| relocate(t, &levels, inner)).collect();
    let applied = Term::apps(var_at(arg_level, inner), (0..xs.len()).map(|x| var_at(depth + x, inner)));
    Unfolded {
        binders,
        indices,
        applied,
    }
}

/// Argument and hypothesis binders of one case.
struct CaseBinders {
    binders: Vec<(String, Rc<Term>)>,
    /// Levels of the parameters followed by the data arguments
    levels: Vec<usize>,
    /// Level of each data argument's hypothesis, if it has one
    ih_levels: Vec<Option<usize>>,
}

fn case_binders(ind: &Inductive, data: &[(String, Rc<Term>)], base: usize) -> CaseBinders {
    let np = ind.num_params;
    let mut levels: Vec<usize> = (0..np).collect();
    let mut binders = Vec::new();
    let mut ih_levels = Vec::new();
    for (hint, ty) in data {
        let at = base + binders.len();
        binders.push((hint.clone(), relocate(ty, &levels, at)));
        let outer = levels.clone();
        levels.push(at);
        if is_recursive(ty, &ind.name) {
            let depth = at + 1;
            let u = unfold_recursive(ty, &outer, at, depth, np);
            let inner = depth + u.binders.len();
            let result = motive_apply(var_at(np, inner), u.indices, u.applied);
            binders.push((format!("ih_{}", hint), close_pis(u.binders, result)));
            ih_levels.push(Some(depth));
        } else {
            ih_levels.push(None);
        }
    }
    CaseBinders {
        binders,
        levels,
        ih_levels,
    }
}

fn point_case_type(ind: &Inductive, ctor: &Constructor, base: usize) -> Rc<Term> {
    let np = ind.num_params;
    let (tele, result) = pi_telescope(&ctor.ty);
    let data: Vec<_> = tele.into_iter().skip(np).collect();
    let cb = case_binders(ind, &data, base);
    let depth = base + cb.binders.len();
    let (_, spine) = app_spine(&result);
    let indices = spine.iter().skip(np).map(|t| relocate(t, &cb.levels, depth)).collect();
    let applied = Term::apps(Term::global(&ctor.name), cb.levels.iter().map(|&l| var_at(l, depth)));
    close_pis(cb.binders, motive_apply(var_at(np, depth), indices, applied))
}

/// `Π(args, ihs). PathP (P (pc args @ i)) case_x case_y` where `x` and `y`
/// are the declared boundaries, rewritten in terms of the point cases.
fn path_case_type(ind: &Inductive, pc: &PathConstructor, base: usize) -> Result<Rc<Term>, DeclarationError> {
    if pc.level != 1 {
        return Err(DeclarationError::path_constructor(
            &ind.name,
            &pc.name,
            format!("eliminator cases exist for one-dimensional path constructors only, got level {}", pc.level),
        ));
    }
    let np = ind.num_params;
    let data = data_args(&pc.ty, np);
    let cb = case_binders(ind, &data, base);
    let depth = base + cb.binders.len();
    let (at0, at1) = pc
        .boundaries
        .first()
        .ok_or_else(|| DeclarationError::path_constructor(&ind.name, &pc.name, "missing boundary"))?;
    let end0 = translate_boundary(ind, &pc.name, at0, &cb, depth)?;
    let end1 = translate_boundary(ind, &pc.name, at1, &cb, depth)?;
    let point = Rc::new(Term::HITApp {
        hit: ind.name.clone(),
        ctor: pc.name.clone(),
        args: cb.levels.iter().map(|&l| var_at(l, depth)).collect(),
        iargs: vec![Term::ivar(0)],
    });
    let family = motive_apply(var_at(np, depth), Vec::new(), point);
    Ok(close_pis(cb.binders, Term::pathp(family, end0, end1)))
}

/// Rewrite a boundary (a term over `[params, args]`) into the motive's
/// value at that boundary: point constructors become their cases and
/// recursive arguments become their hypotheses.
fn translate_boundary(
    ind: &Inductive,
    pc: &str,
    b: &Rc<Term>,
    cb: &CaseBinders,
    depth: usize,
) -> Result<Rc<Term>, DeclarationError> {
    let np = ind.num_params;
    let unsupported = || {
        DeclarationError::path_constructor(
            &ind.name,
            pc,
            format!("boundary {} is neither a point constructor application nor a recursive argument", b),
        )
    };

    if let Term::Var(ix) = &**Term::unspanned(b) {
        let src = cb.levels.len();
        let level = src.checked_sub(ix + 1).ok_or_else(unsupported)?;
        return match level.checked_sub(np).and_then(|j| cb.ih_levels.get(j)) {
            Some(Some(ih)) => Ok(var_at(*ih, depth)),
            _ => Err(unsupported()),
        };
    }

    let (head, spine) = app_spine(b);
    let ci = match &*head {
        Term::Global(c) => ind.constructors.iter().position(|k| &k.name == c),
        _ => None,
    }
    .ok_or_else(unsupported)?;
    let ctor = &ind.constructors[ci];
    if spine.len() != np + ctor.num_args {
        return Err(unsupported());
    }
    let ctor_data = data_args(&ctor.ty, np);
    let mut args = Vec::new();
    for (j, arg) in spine[np..].iter().enumerate() {
        args.push(relocate(arg, &cb.levels, depth));
        if ctor_data.get(j).is_some_and(|(_, ty)| is_recursive(ty, &ind.name)) {
            args.push(translate_boundary(ind, pc, arg, cb, depth)?);
        }
    }
    Ok(Term::apps(var_at(np + 1 + ci, depth), args))
}

/// Positions of the recursive data arguments and, for each, the term
/// `λxs. elim params P cases is' (a xs)` over `[params, P, cases, data args]`.
fn ih_templates(ind: &Inductive, data: &[(String, Rc<Term>)], num_cases: usize) -> (Vec<usize>, Vec<Rc<Term>>) {
    let np = ind.num_params;
    let base = np + 1 + num_cases;
    let depth = base + data.len();
    let mut positions = Vec::new();
    let mut templates = Vec::new();
    for (j, (_, ty)) in data.iter().enumerate() {
        if !is_recursive(ty, &ind.name) {
            continue;
        }
        let outer: Vec<usize> = (0..np).chain(base..base + j).collect();
        let u = unfold_recursive(ty, &outer, base + j, depth, np);
        let inner = depth + u.binders.len();
        let args = (0..base)
            .map(|l| var_at(l, inner))
            .chain(u.indices)
            .chain(std::iter::once(u.applied));
        let body = Term::apps(Term::global(&ind.eliminator_name), args);
        let template = u
            .binders
            .into_iter()
            .rev()
            .fold(body, |acc, (hint, ty)| Term::lam(hint, ty, acc));
        positions.push(j);
        templates.push(template);
    }
    (positions, templates)
}
