use crate::span::Span;
use std::fmt;
use std::rc::Rc;

/// Universe levels are plain naturals; `max` is the only operation.
pub type Level = usize;

// =============================================================================
// Faces
// =============================================================================

/// Face formulas over interval variables. Terms use de Bruijn indices as
/// atoms; the evaluator instantiates `V` with its own variable references.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Face<V = usize> {
    Top,
    Bot,
    /// `(i = 0)` when the flag is false, `(i = 1)` when it is true.
    Eq(V, bool),
    And(Box<Face<V>>, Box<Face<V>>),
    Or(Box<Face<V>>, Box<Face<V>>),
}

impl<V: Clone + PartialEq> Face<V> {
    pub fn eq0(i: V) -> Self {
        Face::Eq(i, false)
    }

    pub fn eq1(i: V) -> Self {
        Face::Eq(i, true)
    }

    /// Conjunction with eager simplification.
    pub fn and(a: Face<V>, b: Face<V>) -> Face<V> {
        match (a, b) {
            (Face::Bot, _) | (_, Face::Bot) => Face::Bot,
            (Face::Top, f) | (f, Face::Top) => f,
            (Face::Eq(i, x), Face::Eq(j, y)) if i == j => {
                if x == y {
                    Face::Eq(i, x)
                } else {
                    Face::Bot
                }
            }
            (a, b) if a == b => a,
            (a, b) => Face::And(Box::new(a), Box::new(b)),
        }
    }

    /// Disjunction with eager simplification.
    pub fn or(a: Face<V>, b: Face<V>) -> Face<V> {
        match (a, b) {
            (Face::Top, _) | (_, Face::Top) => Face::Top,
            (Face::Bot, f) | (f, Face::Bot) => f,
            (Face::Eq(i, x), Face::Eq(j, y)) if i == j => {
                if x == y {
                    Face::Eq(i, x)
                } else {
                    Face::Top
                }
            }
            (a, b) if a == b => a,
            (a, b) => Face::Or(Box::new(a), Box::new(b)),
        }
    }

    /// Re-run simplification bottom-up.
    pub fn simplify(&self) -> Face<V> {
        match self {
            Face::Top | Face::Bot | Face::Eq(..) => self.clone(),
            Face::And(a, b) => Face::and(a.simplify(), b.simplify()),
            Face::Or(a, b) => Face::or(a.simplify(), b.simplify()),
        }
    }

    pub fn is_top(&self) -> bool {
        matches!(self, Face::Top)
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Face::Bot)
    }

    /// Rebuild the face with every atom mapped through `f`, simplifying.
    pub fn map_atoms<W: Clone + PartialEq>(&self, f: &mut impl FnMut(&V, bool) -> Face<W>) -> Face<W> {
        match self {
            Face::Top => Face::Top,
            Face::Bot => Face::Bot,
            Face::Eq(i, one) => f(i, *one),
            Face::And(a, b) => {
                let a = a.map_atoms(f);
                Face::and(a, b.map_atoms(f))
            }
            Face::Or(a, b) => {
                let a = a.map_atoms(f);
                Face::or(a, b.map_atoms(f))
            }
        }
    }
}

/// One branch `[φ ↦ t]` of a system or of a glue element.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SystemBranch {
    pub phi: Face,
    pub term: Rc<Term>,
}

impl SystemBranch {
    pub fn new(phi: Face, term: Rc<Term>) -> Self {
        SystemBranch { phi, term }
    }
}

/// One branch `[φ ↦ (T, e)]` of a Glue type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GlueBranch {
    pub phi: Face,
    pub ty: Rc<Term>,
    pub equiv: Rc<Term>,
}

impl GlueBranch {
    pub fn new(phi: Face, ty: Rc<Term>, equiv: Rc<Term>) -> Self {
        GlueBranch { phi, ty, equiv }
    }
}

// =============================================================================
// Terms
// =============================================================================

/// The core terms of the calculus, using de Bruijn indices for both term
/// variables and interval variables (two separate index spaces).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// Universe at a level
    Sort(Level),
    /// Bound variable (de Bruijn index)
    Var(usize),
    /// Reference to a global declaration
    Global(String),
    /// Dependent function type; the codomain is under one binder
    Pi(String, Rc<Term>, Rc<Term>),
    /// Dependent pair type; the second component is under one binder
    Sigma(String, Rc<Term>, Rc<Term>),
    /// Lambda with an optional domain annotation
    Lam(String, Option<Rc<Term>>, Rc<Term>),
    App(Rc<Term>, Rc<Term>),
    Pair(Rc<Term>, Rc<Term>),
    Fst(Rc<Term>),
    Snd(Rc<Term>),
    /// let x : ann = val in body
    Let(String, Option<Rc<Term>>, Rc<Term>, Rc<Term>),

    /// Intensional identity type `Id A x y`
    Id(Rc<Term>, Rc<Term>, Rc<Term>),
    /// `Refl A x : Id A x x`
    Refl(Rc<Term>, Rc<Term>),
    /// Path induction with motive `c`
    J {
        a: Rc<Term>,
        c: Rc<Term>,
        d: Rc<Term>,
        x: Rc<Term>,
        y: Rc<Term>,
        p: Rc<Term>,
    },

    Interval,
    I0,
    I1,
    /// Interval variable (de Bruijn index into the interval context)
    IVar(usize),
    /// Non-dependent path type
    Path(Rc<Term>, Rc<Term>, Rc<Term>),
    /// Dependent path type; the family binds one interval variable
    PathP(Rc<Term>, Rc<Term>, Rc<Term>),
    /// Path abstraction; the body binds one interval variable
    PathLam(String, Rc<Term>),
    PathApp(Rc<Term>, Rc<Term>),
    /// Transport along a family that binds one interval variable
    Transport(Rc<Term>, Rc<Term>),
    Partial(Face, Rc<Term>),
    System(Vec<SystemBranch>),
    /// Heterogeneous composition; `ty` and `tube` bind one interval variable
    Comp {
        binder: String,
        ty: Rc<Term>,
        phi: Face,
        tube: Rc<Term>,
        base: Rc<Term>,
    },
    /// Homogeneous composition; only `tube` binds an interval variable
    HComp {
        ty: Rc<Term>,
        phi: Face,
        tube: Rc<Term>,
        base: Rc<Term>,
    },
    /// Filler of a composition; `ty` and `tube` bind one interval variable
    Fill {
        binder: String,
        ty: Rc<Term>,
        phi: Face,
        tube: Rc<Term>,
        base: Rc<Term>,
    },
    Glue(Rc<Term>, Vec<GlueBranch>),
    GlueElem(Vec<SystemBranch>, Rc<Term>),
    /// Unglue with an optional annotation of the Glue type
    Unglue(Option<Rc<Term>>, Rc<Term>),
    /// Univalence: a path of types from an equivalence
    UA(Rc<Term>, Rc<Term>, Rc<Term>),
    /// `transport (ua e) a`, kept as its own former
    UABeta(Rc<Term>, Rc<Term>),
    /// Path constructor of a higher inductive type
    HITApp {
        hit: String,
        ctor: String,
        args: Vec<Rc<Term>>,
        iargs: Vec<Rc<Term>>,
    },

    /// Source location annotation; transparent to every pass but the checker
    Spanned(Span, Rc<Term>),
}

// Helper constructors for convenience
impl Term {
    pub fn sort(l: Level) -> Rc<Self> {
        Rc::new(Term::Sort(l))
    }

    pub fn var(n: usize) -> Rc<Self> {
        Rc::new(Term::Var(n))
    }

    pub fn global(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Term::Global(name.into()))
    }

    pub fn pi(hint: impl Into<String>, dom: Rc<Term>, cod: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Pi(hint.into(), dom, cod))
    }

    /// Non-dependent function type; `cod` is given in the outer context.
    pub fn arrow(dom: Rc<Term>, cod: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Pi("_".to_string(), dom, cod.shift(0, 1)))
    }

    pub fn sigma(hint: impl Into<String>, a: Rc<Term>, b: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Sigma(hint.into(), a, b))
    }

    pub fn lam(hint: impl Into<String>, ann: Rc<Term>, body: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Lam(hint.into(), Some(ann), body))
    }

    pub fn lam_bare(hint: impl Into<String>, body: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Lam(hint.into(), None, body))
    }

    pub fn app(f: Rc<Term>, a: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::App(f, a))
    }

    /// `f a1 ... an` as a left-nested application spine.
    pub fn apps(f: Rc<Term>, args: impl IntoIterator<Item = Rc<Term>>) -> Rc<Self> {
        args.into_iter().fold(f, Term::app)
    }

    pub fn pair(a: Rc<Term>, b: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Pair(a, b))
    }

    pub fn fst(p: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Fst(p))
    }

    pub fn snd(p: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Snd(p))
    }

    pub fn let_in(hint: impl Into<String>, ann: Option<Rc<Term>>, val: Rc<Term>, body: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Let(hint.into(), ann, val, body))
    }

    pub fn id(a: Rc<Term>, x: Rc<Term>, y: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Id(a, x, y))
    }

    pub fn refl(a: Rc<Term>, x: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Refl(a, x))
    }

    pub fn j(a: Rc<Term>, c: Rc<Term>, d: Rc<Term>, x: Rc<Term>, y: Rc<Term>, p: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::J { a, c, d, x, y, p })
    }

    pub fn interval() -> Rc<Self> {
        Rc::new(Term::Interval)
    }

    pub fn i0() -> Rc<Self> {
        Rc::new(Term::I0)
    }

    pub fn i1() -> Rc<Self> {
        Rc::new(Term::I1)
    }

    pub fn ivar(n: usize) -> Rc<Self> {
        Rc::new(Term::IVar(n))
    }

    pub fn path(a: Rc<Term>, x: Rc<Term>, y: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Path(a, x, y))
    }

    pub fn pathp(a: Rc<Term>, x: Rc<Term>, y: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::PathP(a, x, y))
    }

    pub fn plam(hint: impl Into<String>, body: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::PathLam(hint.into(), body))
    }

    pub fn papp(p: Rc<Term>, r: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::PathApp(p, r))
    }

    pub fn transport(a: Rc<Term>, e: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Transport(a, e))
    }

    pub fn ua(a: Rc<Term>, b: Rc<Term>, equiv: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::UA(a, b, equiv))
    }

    pub fn spanned(span: Span, t: Rc<Term>) -> Rc<Self> {
        Rc::new(Term::Spanned(span, t))
    }

    /// Peel source annotations off the top of a term.
    pub fn unspanned(t: &Rc<Term>) -> &Rc<Term> {
        let mut cur = t;
        while let Term::Spanned(_, inner) = &**cur {
            cur = inner;
        }
        cur
    }
}

impl Term {
    /// Direct sub-terms, in source order. Faces are not terms and are skipped.
    pub fn subterms(&self) -> Vec<&Rc<Term>> {
        match self {
            Term::Sort(_) | Term::Var(_) | Term::Global(_) => vec![],
            Term::Interval | Term::I0 | Term::I1 | Term::IVar(_) => vec![],
            Term::Pi(_, a, b) | Term::Sigma(_, a, b) => vec![a, b],
            Term::Lam(_, ann, body) => ann.iter().chain(std::iter::once(body)).collect(),
            Term::App(a, b) | Term::Pair(a, b) => vec![a, b],
            Term::Fst(p) | Term::Snd(p) => vec![p],
            Term::Let(_, ann, val, body) => ann.iter().chain([val, body]).collect(),
            Term::Id(a, x, y) | Term::Path(a, x, y) | Term::PathP(a, x, y) => vec![a, x, y],
            Term::Refl(a, x) => vec![a, x],
            Term::J { a, c, d, x, y, p } => vec![a, c, d, x, y, p],
            Term::PathLam(_, body) => vec![body],
            Term::PathApp(p, r) => vec![p, r],
            Term::Transport(a, e) => vec![a, e],
            Term::Partial(_, a) => vec![a],
            Term::System(branches) => branches.iter().map(|b| &b.term).collect(),
            Term::Comp { ty, tube, base, .. } | Term::Fill { ty, tube, base, .. } => vec![ty, tube, base],
            Term::HComp { ty, tube, base, .. } => vec![ty, tube, base],
            Term::Glue(a, branches) => std::iter::once(a)
                .chain(branches.iter().flat_map(|b| [&b.ty, &b.equiv]))
                .collect(),
            Term::GlueElem(branches, base) => branches.iter().map(|b| &b.term).chain(std::iter::once(base)).collect(),
            Term::Unglue(ty, g) => ty.iter().chain(std::iter::once(g)).collect(),
            Term::UA(a, b, e) => vec![a, b, e],
            Term::UABeta(e, a) => vec![e, a],
            Term::HITApp { args, iargs, .. } => args.iter().chain(iargs.iter()).collect(),
            Term::Spanned(_, inner) => vec![inner],
        }
    }

    /// Whether the global `name` occurs anywhere in the term, including as
    /// the type named by a path-constructor application.
    pub fn mentions_global(&self, name: &str) -> bool {
        match self {
            Term::Global(n) => n == name,
            Term::HITApp { hit, .. } if hit == name => true,
            _ => self.subterms().into_iter().any(|t| t.mentions_global(name)),
        }
    }
}

// =============================================================================
// Structural helpers shared by the declaration machinery
// =============================================================================

/// Split `Π(x1:A1)...(xn:An). R` into its binders and result.
pub fn pi_telescope(ty: &Rc<Term>) -> (Vec<(String, Rc<Term>)>, Rc<Term>) {
    let mut binders = Vec::new();
    let mut cur = Term::unspanned(ty).clone();
    loop {
        let next = match &*cur {
            Term::Pi(hint, dom, cod) => {
                binders.push((hint.clone(), dom.clone()));
                Term::unspanned(cod).clone()
            }
            _ => break,
        };
        cur = next;
    }
    (binders, cur)
}

/// Split `f a1 ... an` into its head and arguments.
pub fn app_spine(t: &Rc<Term>) -> (Rc<Term>, Vec<Rc<Term>>) {
    let mut args = Vec::new();
    let mut cur = Term::unspanned(t).clone();
    loop {
        let next = match &*cur {
            Term::App(f, a) => {
                args.push(a.clone());
                Term::unspanned(f).clone()
            }
            _ => break,
        };
        cur = next;
    }
    args.reverse();
    (cur, args)
}

/// Name of the global at the head of an application spine, if any.
pub fn head_global(t: &Rc<Term>) -> Option<String> {
    match &*app_spine(t).0 {
        Term::Global(name) => Some(name.clone()),
        _ => None,
    }
}

/// Rebuild `Π(x1:A1)...(xn:An). R` from a telescope.
pub fn close_pis(binders: Vec<(String, Rc<Term>)>, result: Rc<Term>) -> Rc<Term> {
    binders
        .into_iter()
        .rev()
        .fold(result, |acc, (hint, dom)| Term::pi(hint, dom, acc))
}

// =============================================================================
// Printing
// =============================================================================

impl<V: fmt::Display> fmt::Display for Face<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Face::Top => write!(f, "top"),
            Face::Bot => write!(f, "bot"),
            Face::Eq(i, one) => write!(f, "(= {} {})", i, if *one { 1 } else { 0 }),
            Face::And(a, b) => write!(f, "(and {} {})", a, b),
            Face::Or(a, b) => write!(f, "(or {} {})", a, b),
        }
    }
}

fn write_opt(f: &mut fmt::Formatter<'_>, t: &Option<Rc<Term>>) -> fmt::Result {
    match t {
        Some(t) => write!(f, "{}", t),
        None => write!(f, "_"),
    }
}

/// Terms print as the s-expressions accepted by `test_support::Parser`.
impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Sort(l) => write!(f, "(sort {})", l),
            Term::Var(ix) => write!(f, "{}", ix),
            Term::Global(name) => write!(f, "{}", name),
            Term::Pi(h, a, b) => write!(f, "(pi {} {} {})", h, a, b),
            Term::Sigma(h, a, b) => write!(f, "(sigma {} {} {})", h, a, b),
            Term::Lam(h, ann, body) => {
                write!(f, "(lam {} ", h)?;
                write_opt(f, ann)?;
                write!(f, " {})", body)
            }
            Term::App(..) => {
                let rc = Rc::new(self.clone());
                let (head, args) = app_spine(&rc);
                write!(f, "(app {}", head)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            Term::Pair(a, b) => write!(f, "(pair {} {})", a, b),
            Term::Fst(p) => write!(f, "(fst {})", p),
            Term::Snd(p) => write!(f, "(snd {})", p),
            Term::Let(h, ann, val, body) => {
                write!(f, "(let {} ", h)?;
                write_opt(f, ann)?;
                write!(f, " {} {})", val, body)
            }
            Term::Id(a, x, y) => write!(f, "(id {} {} {})", a, x, y),
            Term::Refl(a, x) => write!(f, "(refl {} {})", a, x),
            Term::J { a, c, d, x, y, p } => write!(f, "(J {} {} {} {} {} {})", a, c, d, x, y, p),
            Term::Interval => write!(f, "I"),
            Term::I0 => write!(f, "i0"),
            Term::I1 => write!(f, "i1"),
            Term::IVar(ix) => write!(f, "(ivar {})", ix),
            Term::Path(a, x, y) => write!(f, "(path {} {} {})", a, x, y),
            Term::PathP(a, x, y) => write!(f, "(pathp {} {} {})", a, x, y),
            Term::PathLam(h, body) => write!(f, "(plam {} {})", h, body),
            Term::PathApp(p, r) => write!(f, "(papp {} {})", p, r),
            Term::Transport(a, e) => write!(f, "(transport {} {})", a, e),
            Term::Partial(phi, a) => write!(f, "(partial {} {})", phi, a),
            Term::System(branches) => {
                write!(f, "(system")?;
                for b in branches {
                    write!(f, " ({} {})", b.phi, b.term)?;
                }
                write!(f, ")")
            }
            Term::Comp { binder, ty, phi, tube, base } => {
                write!(f, "(comp {} {} {} {} {})", binder, ty, phi, tube, base)
            }
            Term::HComp { ty, phi, tube, base } => write!(f, "(hcomp {} {} {} {})", ty, phi, tube, base),
            Term::Fill { binder, ty, phi, tube, base } => {
                write!(f, "(fill {} {} {} {} {})", binder, ty, phi, tube, base)
            }
            Term::Glue(a, branches) => {
                write!(f, "(glue {}", a)?;
                for b in branches {
                    write!(f, " ({} {} {})", b.phi, b.ty, b.equiv)?;
                }
                write!(f, ")")
            }
            Term::GlueElem(branches, base) => {
                write!(f, "(glue-elem {}", base)?;
                for b in branches {
                    write!(f, " ({} {})", b.phi, b.term)?;
                }
                write!(f, ")")
            }
            Term::Unglue(ty, g) => match ty {
                Some(ty) => write!(f, "(unglue {} {})", ty, g),
                None => write!(f, "(unglue {})", g),
            },
            Term::UA(a, b, e) => write!(f, "(ua {} {} {})", a, b, e),
            Term::UABeta(e, a) => write!(f, "(ua-beta {} {})", e, a),
            Term::HITApp { hit, ctor, args, iargs } => {
                write!(f, "(hit {} {} (", hit, ctor)?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", a)?;
                }
                write!(f, ") (")?;
                for (i, r) in iargs.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", r)?;
                }
                write!(f, "))")
            }
            Term::Spanned(_, t) => write!(f, "{}", t),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn face_and_absorbs_and_identities() {
        assert_eq!(Face::and(Face::Top, Face::eq0(2)), Face::eq0(2));
        assert_eq!(Face::and(Face::Bot, Face::eq0(2)), Face::Bot);
        assert_eq!(Face::and(Face::eq0(1), Face::eq1(1)), Face::Bot);
    }

    #[test]
    fn face_or_absorbs_and_identities() {
        assert_eq!(Face::or(Face::Bot, Face::eq1(0)), Face::eq1(0));
        assert_eq!(Face::or(Face::Top, Face::eq1(0)), Face::Top);
        assert_eq!(Face::or(Face::eq0(3), Face::eq1(3)), Face::Top);
    }

    #[test]
    fn telescope_and_spine() {
        let nat = Term::global("Nat");
        let ty = Term::pi("n", nat.clone(), Term::arrow(nat.clone(), nat.clone()));
        let (binders, result) = pi_telescope(&ty);
        assert_eq!(binders.len(), 2);
        assert_eq!(result, nat);

        let t = Term::apps(Term::global("f"), vec![Term::var(0), Term::var(1)]);
        let (head, args) = app_spine(&t);
        assert_eq!(head, Term::global("f"));
        assert_eq!(args, vec![Term::var(0), Term::var(1)]);
        assert_eq!(head_global(&t).as_deref(), Some("f"));
    }

    #[test]
    fn display_flattens_applications() {
        let t = Term::apps(Term::global("succ"), vec![Term::global("zero")]);
        assert_eq!(t.to_string(), "(app succ zero)");
        let lam = Term::lam("x", Term::sort(0), Term::var(0));
        assert_eq!(lam.to_string(), "(lam x (sort 0) 0)");
    }
}
