use crate::ast::{Face, GlueBranch, Level, SystemBranch, Term};
use crate::conv::DefEq;
use crate::env::GlobalEnv;
use crate::recursor::RecursorInfo;
use std::fmt;
use std::rc::Rc;
use tracing::trace;


/// Reference to a variable inside a value. Variables bound while the
/// evaluator or reifier goes under a binder are de Bruijn levels; variables
/// free in the evaluated term itself (beyond the environment) are `Outer`
/// and keep their original index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarRef {
    Level(usize),
    Outer(usize),
}

impl VarRef {
    /// Convert to a de Bruijn index in a context of the given depth.
    pub fn to_index(self, depth: usize) -> usize {
        match self {
            VarRef::Level(l) => {
                let ix = depth.checked_sub(l + 1);
                debug_assert!(ix.is_some(), "level {l} read back at depth {depth}");
                ix.unwrap_or(0)
            }
            VarRef::Outer(k) => depth + k,
        }
    }
}

impl fmt::Display for VarRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarRef::Level(l) => write!(f, "#{}", l),
            VarRef::Outer(k) => write!(f, "^{}", k),
        }
    }
}

pub type FaceVal = Face<VarRef>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Sort(Level),
    Pi(String, Box<Value>, Closure),
    Sigma(String, Box<Value>, Closure),
    Lam(String, Option<Box<Value>>, Closure),
    Pair(Box<Value>, Box<Value>),

    Id(Box<Value>, Box<Value>, Box<Value>),
    Refl(Box<Value>, Box<Value>),

    Interval,
    I0,
    I1,
    IVar(VarRef),
    Path(Box<Value>, Box<Value>, Box<Value>),
    PathP(Closure, Box<Value>, Box<Value>),
    PathLam(String, Closure),
    Transport(Closure, Box<Value>),
    Partial(FaceVal, Box<Value>),
    System(Vec<(FaceVal, Value)>),
    Comp {
        binder: String,
        ty: Closure,
        phi: FaceVal,
        tube: Closure,
        base: Box<Value>,
    },
    HComp {
        ty: Box<Value>,
        phi: FaceVal,
        tube: Closure,
        base: Box<Value>,
    },
    Fill {
        binder: String,
        ty: Closure,
        phi: FaceVal,
        tube: Closure,
        base: Box<Value>,
    },
    Glue(Box<Value>, Vec<GlueBranchVal>),
    GlueElem(Vec<(FaceVal, Value)>, Box<Value>),
    Unglue(Option<Box<Value>>, Box<Value>),
    UA(Box<Value>, Box<Value>, Box<Value>),
    UABeta(Box<Value>, Box<Value>),
    /// Path constructor applied to interval arguments that are not endpoints
    HITPathCtor {
        hit: String,
        ctor: String,
        args: Vec<Value>,
        iargs: Vec<Value>,
    },

    // Stuck terms
    Neutral(Head, Vec<Elim>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Head {
    Var(VarRef),
    Global(String),
    /// An elimination applied to something that is not neutral but cannot
    /// reduce (a stuck composition, an ill-typed application).
    Stuck(Box<Value>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Elim {
    App(Value),
    Fst,
    Snd,
    PathApp(Value),
    J {
        a: Value,
        c: Value,
        d: Value,
        x: Value,
        y: Value,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GlueBranchVal {
    pub phi: FaceVal,
    pub ty: Value,
    pub equiv: Value,
}

/// Evaluation environment: a term value stack and an interval value stack.
/// Index 0 is the last element of each stack.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Env {
    pub terms: Vec<Value>,
    pub ivals: Vec<Value>,
}

impl Env {
    pub fn with_term(&self, v: Value) -> Env {
        let mut env = self.clone();
        env.terms.push(v);
        env
    }

    pub fn with_ival(&self, r: Value) -> Env {
        let mut env = self.clone();
        env.ivals.push(r);
        env
    }

    fn lookup(&self, ix: usize) -> Value {
        match self.terms.iter().rev().nth(ix) {
            Some(v) => v.clone(),
            // Free variable in an open term
            None => Value::Neutral(Head::Var(VarRef::Outer(ix - self.terms.len())), vec![]),
        }
    }

    fn lookup_ival(&self, ix: usize) -> Value {
        match self.ivals.iter().rev().nth(ix) {
            Some(v) => v.clone(),
            None => Value::IVar(VarRef::Outer(ix - self.ivals.len())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    pub env: Env,
    pub term: Rc<Term>,
}

impl Closure {
    pub fn new(env: Env, term: Rc<Term>) -> Self {
        Closure { env, term }
    }

    /// Instantiate a term binder.
    pub fn apply(&self, v: Value, globals: &GlobalEnv, config: EvalConfig) -> Value {
        eval_with_config(&self.term, &self.env.with_term(v), globals, config)
    }

    /// Instantiate an interval binder.
    pub fn apply_ival(&self, r: Value, globals: &GlobalEnv, config: EvalConfig) -> Value {
        eval_with_config(&self.term, &self.env.with_ival(r), globals, config)
    }
}

/// Fresh-variable floors: the first term level and interval level that no
/// value in scope uses yet. Needed whenever evaluation itself compares
/// values (the constant-family test of transport and composition).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvalConfig {
    pub level: usize,
    pub ilevel: usize,
}

impl EvalConfig {
    pub fn at(level: usize, ilevel: usize) -> Self {
        EvalConfig { level, ilevel }
    }

    pub fn under(self) -> Self {
        EvalConfig { level: self.level + 1, ..self }
    }

    pub fn iunder(self) -> Self {
        EvalConfig { ilevel: self.ilevel + 1, ..self }
    }
}

impl Value {
    pub fn var(level: usize) -> Self {
        Value::Neutral(Head::Var(VarRef::Level(level)), vec![])
    }

    pub fn ivar(level: usize) -> Self {
        Value::IVar(VarRef::Level(level))
    }

    pub fn global(name: impl Into<String>) -> Self {
        Value::Neutral(Head::Global(name.into()), vec![])
    }
}

/// Evaluate a term to a value
pub fn eval(t: &Rc<Term>, env: &Env, globals: &GlobalEnv) -> Value {
    let config = EvalConfig::at(env.terms.len(), env.ivals.len());
    eval_with_config(t, env, globals, config)
}

/// Evaluate and reify a term that may mention free variables of the
/// surrounding context. Free indices come back unchanged.
pub fn normalize(t: &Rc<Term>, globals: &GlobalEnv) -> Rc<Term> {
    let v = eval(t, &Env::default(), globals);
    reify(&v, 0, 0, globals)
}

pub(crate) fn eval_with_config(t: &Rc<Term>, env: &Env, globals: &GlobalEnv, config: EvalConfig) -> Value {
    let ev = |t: &Rc<Term>| eval_with_config(t, env, globals, config);
    let bx = |t: &Rc<Term>| Box::new(ev(t));
    let close = |t: &Rc<Term>| Closure::new(env.clone(), t.clone());
    match &**t {
        Term::Var(ix) => env.lookup(*ix),
        Term::Sort(l) => Value::Sort(*l),
        Term::Global(name) => match globals.lookup_definition_body(name) {
            Some(body) => eval_with_config(body, &Env::default(), globals, config),
            None => Value::global(name.clone()),
        },
        Term::Pi(h, a, b) => Value::Pi(h.clone(), bx(a), close(b)),
        Term::Sigma(h, a, b) => Value::Sigma(h.clone(), bx(a), close(b)),
        Term::Lam(h, ann, body) => Value::Lam(h.clone(), ann.as_ref().map(bx), close(body)),
        Term::App(f, a) => apply_with_config(ev(f), ev(a), globals, config),
        Term::Pair(a, b) => Value::Pair(bx(a), bx(b)),
        Term::Fst(p) => fst(ev(p)),
        Term::Snd(p) => snd(ev(p)),
        Term::Let(_, _, val, body) => {
            let v = ev(val);
            eval_with_config(body, &env.with_term(v), globals, config)
        }
        Term::Id(a, x, y) => Value::Id(bx(a), bx(x), bx(y)),
        Term::Refl(a, x) => Value::Refl(bx(a), bx(x)),
        Term::J { a, c, d, x, y, p } => match ev(p) {
            Value::Refl(..) => {
                trace!("J on refl");
                ev(d)
            }
            stuck => push_elim(
                stuck,
                Elim::J {
                    a: ev(a),
                    c: ev(c),
                    d: ev(d),
                    x: ev(x),
                    y: ev(y),
                },
            ),
        },
        Term::Interval => Value::Interval,
        Term::I0 => Value::I0,
        Term::I1 => Value::I1,
        Term::IVar(ix) => env.lookup_ival(*ix),
        Term::Path(a, x, y) => Value::Path(bx(a), bx(x), bx(y)),
        Term::PathP(a, x, y) => Value::PathP(close(a), bx(x), bx(y)),
        Term::PathLam(h, body) => Value::PathLam(h.clone(), close(body)),
        Term::PathApp(p, r) => path_app(ev(p), ev(r), globals, config),
        Term::Transport(a, e) => transport(close(a), ev(e), globals, config),
        Term::Partial(phi, a) => Value::Partial(eval_face(phi, env), bx(a)),
        Term::System(branches) => Value::System(eval_system(branches, env, globals, config)),
        Term::Comp { binder, ty, phi, tube, base } => comp(
            binder.clone(),
            close(ty),
            eval_face(phi, env),
            close(tube),
            ev(base),
            globals,
            config,
        ),
        Term::HComp { ty, phi, tube, base } => match eval_face(phi, env) {
            Face::Top => close(tube).apply_ival(Value::I1, globals, config),
            Face::Bot => ev(base),
            phi => Value::HComp {
                ty: bx(ty),
                phi,
                tube: close(tube),
                base: bx(base),
            },
        },
        Term::Fill { binder, ty, phi, tube, base } => match eval_face(phi, env) {
            Face::Top => Value::PathLam(binder.clone(), close(tube)),
            phi => Value::Fill {
                binder: binder.clone(),
                ty: close(ty),
                phi,
                tube: close(tube),
                base: bx(base),
            },
        },
        Term::Glue(a, branches) => glue(ev(a), eval_glue_branches(branches, env, globals, config)),
        Term::GlueElem(branches, base) => glue_elem(eval_system(branches, env, globals, config), ev(base)),
        Term::Unglue(ty, g) => match ev(g) {
            Value::GlueElem(_, base) => *base,
            g => Value::Unglue(ty.as_ref().map(bx), Box::new(g)),
        },
        Term::UA(a, b, e) => Value::UA(bx(a), bx(b), bx(e)),
        Term::UABeta(e, a) => match ev(e) {
            Value::Pair(f, _) => apply_with_config(*f, ev(a), globals, config),
            e => Value::UABeta(Box::new(e), bx(a)),
        },
        Term::HITApp { hit, ctor, args, iargs } => hit_app(
            hit,
            ctor,
            args.iter().map(ev).collect(),
            iargs.iter().map(ev).collect(),
            globals,
            config,
        ),
        Term::Spanned(_, inner) => ev(inner),
    }
}

fn eval_face(phi: &Face, env: &Env) -> FaceVal {
    phi.map_atoms(&mut |ix: &usize, is_one: bool| match env.lookup_ival(*ix) {
        Value::I0 => {
            if is_one {
                Face::Bot
            } else {
                Face::Top
            }
        }
        Value::I1 => {
            if is_one {
                Face::Top
            } else {
                Face::Bot
            }
        }
        Value::IVar(x) => Face::Eq(x, is_one),
        // Interval stacks only hold interval values.
        _ => Face::Bot,
    })
}

fn eval_system(branches: &[SystemBranch], env: &Env, globals: &GlobalEnv, config: EvalConfig) -> Vec<(FaceVal, Value)> {
    branches
        .iter()
        .map(|b| (eval_face(&b.phi, env), b))
        .filter(|(phi, _)| !phi.is_bot())
        .map(|(phi, b)| (phi, eval_with_config(&b.term, env, globals, config)))
        .collect()
}

fn eval_glue_branches(branches: &[GlueBranch], env: &Env, globals: &GlobalEnv, config: EvalConfig) -> Vec<GlueBranchVal> {
    branches
        .iter()
        .map(|b| GlueBranchVal {
            phi: eval_face(&b.phi, env),
            ty: eval_with_config(&b.ty, env, globals, config),
            equiv: eval_with_config(&b.equiv, env, globals, config),
        })
        .collect()
}

fn glue(base: Value, branches: Vec<GlueBranchVal>) -> Value {
    let branches: Vec<GlueBranchVal> = branches.into_iter().filter(|b| !b.phi.is_bot()).collect();
    if branches.is_empty() {
        return base;
    }
    match branches.iter().position(|b| b.phi.is_top()) {
        Some(pos) => branches.into_iter().nth(pos).map(|b| b.ty).unwrap_or(base),
        None => Value::Glue(Box::new(base), branches),
    }
}

fn glue_elem(branches: Vec<(FaceVal, Value)>, base: Value) -> Value {
    match branches.iter().position(|(phi, _)| phi.is_top()) {
        Some(pos) => match branches.into_iter().nth(pos) {
            Some((_, t)) => t,
            None => base,
        },
        None => Value::GlueElem(branches, Box::new(base)),
    }
}

fn push_elim(v: Value, e: Elim) -> Value {
    match v {
        Value::Neutral(head, mut spine) => {
            spine.push(e);
            Value::Neutral(head, spine)
        }
        other => Value::Neutral(Head::Stuck(Box::new(other)), vec![e]),
    }
}

pub fn fst(p: Value) -> Value {
    match p {
        Value::Pair(a, _) => *a,
        other => push_elim(other, Elim::Fst),
    }
}

pub fn snd(p: Value) -> Value {
    match p {
        Value::Pair(_, b) => *b,
        other => push_elim(other, Elim::Snd),
    }
}

pub(crate) fn apply_with_config(f: Value, a: Value, globals: &GlobalEnv, config: EvalConfig) -> Value {
    match f {
        Value::Lam(_, _, closure) => closure.apply(a, globals, config),
        Value::Neutral(head, mut spine) => {
            spine.push(Elim::App(a));

            // Iota reduction when the head is a registered eliminator
            if let Head::Global(name) = &head {
                if let Some(info) = globals.lookup_recursor(name) {
                    if let Some(reduced) = try_reduce_rec(info, &spine, globals, config) {
                        return reduced;
                    }
                }
            }
            Value::Neutral(head, spine)
        }
        other => Value::Neutral(Head::Stuck(Box::new(other)), vec![Elim::App(a)]),
    }
}

fn app_args(spine: &[Elim]) -> Option<Vec<Value>> {
    spine
        .iter()
        .map(|e| match e {
            Elim::App(v) => Some(v.clone()),
            _ => None,
        })
        .collect()
}

/// Try to reduce a recursor spine `elim params P cases indices target extras`.
fn try_reduce_rec(info: &RecursorInfo, spine: &[Elim], globals: &GlobalEnv, config: EvalConfig) -> Option<Value> {
    let args = app_args(spine)?;
    let num_params = info.num_params;
    let prefix = num_params + 1 + info.num_cases;
    let major_idx = prefix + info.num_indices;
    let major = args.get(major_idx)?;

    let reduced = match major {
        Value::Neutral(Head::Global(c), ctor_spine) => {
            let (ctor_idx, ctor) = info.constructors.iter().enumerate().find(|(_, k)| &k.name == c)?;
            let ctor_args = app_args(ctor_spine)?;
            if ctor_args.len() != num_params + ctor.num_args {
                return None;
            }
            trace!(eliminator = %info.elim_name, ctor = %c, "recursor reduction");
            apply_case(
                args[num_params + 1 + ctor_idx].clone(),
                &args[..prefix],
                &ctor_args[num_params..],
                &ctor.recursive_args,
                &ctor.ih_templates,
                globals,
                config,
            )
        }
        Value::HITPathCtor { hit, ctor, args: ctor_args, iargs } if *hit == info.ind_name => {
            let (path_idx, pc) = info.path_constructors.iter().enumerate().find(|(_, p)| &p.name == ctor)?;
            if ctor_args.len() != num_params + pc.num_args {
                return None;
            }
            trace!(eliminator = %info.elim_name, ctor = %ctor, "recursor reduction on path constructor");
            let case = args[num_params + 1 + info.constructors.len() + path_idx].clone();
            let path = apply_case(
                case,
                &args[..prefix],
                &ctor_args[num_params..],
                &pc.recursive_args,
                &pc.ih_templates,
                globals,
                config,
            );
            iargs
                .iter()
                .fold(path, |acc, r| path_app(acc, r.clone(), globals, config))
        }
        _ => return None,
    };

    // Apply any extra arguments beyond the target
    Some(
        args[major_idx + 1..]
            .iter()
            .fold(reduced, |acc, extra| apply_with_config(acc, extra.clone(), globals, config)),
    )
}

/// Apply a case to the constructor's data arguments, inserting an induction
/// hypothesis after every recursive one. Hypotheses are evaluated from their
/// templates in the environment `[params, P, cases, data args]`.
fn apply_case(
    case: Value,
    prefix: &[Value],
    data: &[Value],
    recursive_args: &[usize],
    ih_templates: &[Rc<Term>],
    globals: &GlobalEnv,
    config: EvalConfig,
) -> Value {
    let env = Env {
        terms: prefix.iter().chain(data.iter()).cloned().collect(),
        ivals: Vec::new(),
    };
    let mut res = case;
    for (j, arg) in data.iter().enumerate() {
        res = apply_with_config(res, arg.clone(), globals, config);
        let template = recursive_args
            .iter()
            .position(|&r| r == j)
            .and_then(|pos| ih_templates.get(pos));
        if let Some(template) = template {
            let ih = eval_with_config(template, &env, globals, config);
            res = apply_with_config(res, ih, globals, config);
        }
    }
    res
}

pub(crate) fn path_app(p: Value, r: Value, globals: &GlobalEnv, config: EvalConfig) -> Value {
    match p {
        Value::PathLam(_, body) => body.apply_ival(r, globals, config),
        Value::UA(a, b, e) => match r {
            Value::I0 => *a,
            Value::I1 => *b,
            Value::IVar(x) => glue(
                *b,
                vec![GlueBranchVal {
                    phi: Face::eq0(x),
                    ty: *a,
                    equiv: *e,
                }],
            ),
            r => push_elim(Value::UA(a, b, e), Elim::PathApp(r)),
        },
        Value::Fill { binder, ty, phi, tube, base } => match r {
            Value::I0 => *base,
            Value::I1 => comp(binder, ty, phi, tube, *base, globals, config),
            r => push_elim(Value::Fill { binder, ty, phi, tube, base }, Elim::PathApp(r)),
        },
        // A path constructor still short of interval arguments takes `r` as its next one.
        Value::HITPathCtor { hit, ctor, args, mut iargs }
            if globals
                .path_constructor(&hit, &ctor)
                .is_some_and(|pc| iargs.len() < pc.level) =>
        {
            iargs.push(r);
            hit_app(&hit, &ctor, args, iargs, globals, config)
        }
        other => push_elim(other, Elim::PathApp(r)),
    }
}

fn is_constant_family(family: &Closure, globals: &GlobalEnv, config: EvalConfig) -> bool {
    let at0 = family.apply_ival(Value::I0, globals, config);
    let at1 = family.apply_ival(Value::I1, globals, config);
    DefEq::new(globals, false).check_eq(&at0, &at1, config.level, config.ilevel)
}

fn transport(family: Closure, e: Value, globals: &GlobalEnv, config: EvalConfig) -> Value {
    if is_constant_family(&family, globals, config) {
        e
    } else {
        Value::Transport(family, Box::new(e))
    }
}

fn comp(
    binder: String,
    ty: Closure,
    phi: FaceVal,
    tube: Closure,
    base: Value,
    globals: &GlobalEnv,
    config: EvalConfig,
) -> Value {
    match phi {
        Face::Top => tube.apply_ival(Value::I1, globals, config),
        Face::Bot if is_constant_family(&ty, globals, config) => base,
        phi => Value::Comp {
            binder,
            ty,
            phi,
            tube,
            base: Box::new(base),
        },
    }
}

fn hit_app(
    hit: &str,
    ctor: &str,
    args: Vec<Value>,
    iargs: Vec<Value>,
    globals: &GlobalEnv,
    config: EvalConfig,
) -> Value {
    if let Some(pc) = globals.path_constructor(hit, ctor) {
        for (k, r) in iargs.iter().enumerate() {
            let side = match r {
                Value::I0 => pc.boundaries.get(k).map(|(at0, _)| at0),
                Value::I1 => pc.boundaries.get(k).map(|(_, at1)| at1),
                _ => None,
            };
            if let Some(boundary) = side {
                trace!(hit, ctor, dimension = k, "path constructor at endpoint");
                let ivals = iargs
                    .iter()
                    .enumerate()
                    .filter(|(j, _)| *j != k)
                    .map(|(_, v)| v.clone())
                    .collect();
                let env = Env { terms: args, ivals };
                return eval_with_config(boundary, &env, globals, config);
            }
        }
    }
    Value::HITPathCtor {
        hit: hit.to_string(),
        ctor: ctor.to_string(),
        args,
        iargs,
    }
}

// =============================================================================
// Reification
// =============================================================================

/// Read a value back into a term valid under `depth` term binders and
/// `idepth` interval binders.
pub fn reify(v: &Value, depth: usize, idepth: usize, globals: &GlobalEnv) -> Rc<Term> {
    let rf = |v: &Value| reify(v, depth, idepth, globals);
    let under = |c: &Closure| reify_closure(c, depth, idepth, globals);
    let iunder = |c: &Closure| reify_iclosure(c, depth, idepth, globals);
    match v {
        Value::Sort(l) => Term::sort(*l),
        Value::Pi(h, dom, cod) => Term::pi(h.clone(), rf(dom), under(cod)),
        Value::Sigma(h, a, b) => Term::sigma(h.clone(), rf(a), under(b)),
        Value::Lam(h, ann, body) => Rc::new(Term::Lam(h.clone(), ann.as_deref().map(rf), under(body))),
        Value::Pair(a, b) => Term::pair(rf(a), rf(b)),
        Value::Id(a, x, y) => Term::id(rf(a), rf(x), rf(y)),
        Value::Refl(a, x) => Term::refl(rf(a), rf(x)),
        Value::Interval => Term::interval(),
        Value::I0 => Term::i0(),
        Value::I1 => Term::i1(),
        Value::IVar(x) => Term::ivar(x.to_index(idepth)),
        Value::Path(a, x, y) => Term::path(rf(a), rf(x), rf(y)),
        Value::PathP(a, x, y) => Term::pathp(iunder(a), rf(x), rf(y)),
        Value::PathLam(h, body) => Term::plam(h.clone(), iunder(body)),
        Value::Transport(a, e) => Term::transport(iunder(a), rf(e)),
        Value::Partial(phi, a) => Rc::new(Term::Partial(reify_face(phi, idepth), rf(a))),
        Value::System(branches) => Rc::new(Term::System(reify_system(branches, depth, idepth, globals))),
        Value::Comp { binder, ty, phi, tube, base } => Rc::new(Term::Comp {
            binder: binder.clone(),
            ty: iunder(ty),
            phi: reify_face(phi, idepth),
            tube: iunder(tube),
            base: rf(base),
        }),
        Value::HComp { ty, phi, tube, base } => Rc::new(Term::HComp {
            ty: rf(ty),
            phi: reify_face(phi, idepth),
            tube: iunder(tube),
            base: rf(base),
        }),
        Value::Fill { binder, ty, phi, tube, base } => Rc::new(Term::Fill {
            binder: binder.clone(),
            ty: iunder(ty),
            phi: reify_face(phi, idepth),
            tube: iunder(tube),
            base: rf(base),
        }),
        Value::Glue(a, branches) => Rc::new(Term::Glue(
            rf(a),
            branches
                .iter()
                .map(|b| GlueBranch::new(reify_face(&b.phi, idepth), rf(&b.ty), rf(&b.equiv)))
                .collect(),
        )),
        Value::GlueElem(branches, base) => Rc::new(Term::GlueElem(
            reify_system(branches, depth, idepth, globals),
            rf(base),
        )),
        Value::Unglue(ty, g) => Rc::new(Term::Unglue(ty.as_deref().map(rf), rf(g))),
        Value::UA(a, b, e) => Term::ua(rf(a), rf(b), rf(e)),
        Value::UABeta(e, a) => Rc::new(Term::UABeta(rf(e), rf(a))),
        Value::HITPathCtor { hit, ctor, args, iargs } => Rc::new(Term::HITApp {
            hit: hit.clone(),
            ctor: ctor.clone(),
            args: args.iter().map(rf).collect(),
            iargs: iargs.iter().map(rf).collect(),
        }),
        Value::Neutral(head, spine) => {
            let head_term = match head {
                Head::Var(x) => Term::var(x.to_index(depth)),
                Head::Global(name) => Term::global(name.clone()),
                Head::Stuck(v) => rf(v),
            };
            spine.iter().fold(head_term, |acc, elim| match elim {
                Elim::App(a) => Term::app(acc, rf(a)),
                Elim::Fst => Term::fst(acc),
                Elim::Snd => Term::snd(acc),
                Elim::PathApp(r) => Term::papp(acc, rf(r)),
                Elim::J { a, c, d, x, y } => Term::j(rf(a), rf(c), rf(d), rf(x), rf(y), acc),
            })
        }
    }
}

fn reify_closure(c: &Closure, depth: usize, idepth: usize, globals: &GlobalEnv) -> Rc<Term> {
    let body = c.apply(Value::var(depth), globals, EvalConfig::at(depth + 1, idepth));
    reify(&body, depth + 1, idepth, globals)
}

fn reify_iclosure(c: &Closure, depth: usize, idepth: usize, globals: &GlobalEnv) -> Rc<Term> {
    let body = c.apply_ival(Value::ivar(idepth), globals, EvalConfig::at(depth, idepth + 1));
    reify(&body, depth, idepth + 1, globals)
}

fn reify_face(phi: &FaceVal, idepth: usize) -> Face {
    phi.map_atoms(&mut |x: &VarRef, is_one: bool| Face::Eq(x.to_index(idepth), is_one))
}

fn reify_system(branches: &[(FaceVal, Value)], depth: usize, idepth: usize, globals: &GlobalEnv) -> Vec<SystemBranch> {
    branches
        .iter()
        .map(|(phi, t)| SystemBranch::new(reify_face(phi, idepth), reify(t, depth, idepth, globals)))
        .collect()
}
