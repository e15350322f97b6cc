use crate::ast::{pi_telescope, Face, GlueBranch, Level, SystemBranch, Term};
use crate::config::KernelConfig;
use crate::context::{Context, ICtx, IVarGuard};
use crate::conv::is_def_eq;
use crate::env::GlobalEnv;
use crate::error::{ErrorKind, TypeError};
use crate::nbe::normalize;
use crate::span::Span;
use std::rc::Rc;
use tracing::instrument;

/// Bidirectional type checker over a fixed global environment.
///
/// Types are terms of the context they are produced in. The checker never
/// mutates the environment; the only state it carries is the interval
/// context, which is scoped by [`IVarGuard`]s.
pub struct Checker<'g> {
    globals: &'g GlobalEnv,
    eta: bool,
    ictx: ICtx,
}

/// `Path A x y` and `PathP A x y` seen uniformly, with the family under
/// one interval binder.
struct PathView {
    family: Rc<Term>,
    x: Rc<Term>,
    y: Rc<Term>,
}

impl<'g> Checker<'g> {
    /// η follows the environment's configuration.
    pub fn new(globals: &'g GlobalEnv) -> Self {
        Checker::with_config(globals, globals.config())
    }

    pub fn new_with_eta(globals: &'g GlobalEnv, eta: bool) -> Self {
        Checker {
            globals,
            eta,
            ictx: ICtx::new(),
        }
    }

    pub fn with_config(globals: &'g GlobalEnv, config: KernelConfig) -> Self {
        Checker::new_with_eta(globals, config.eta)
    }

    pub fn globals(&self) -> &'g GlobalEnv {
        self.globals
    }

    pub fn push_ivar(&self) -> IVarGuard {
        self.ictx.push()
    }

    pub fn ictx_depth(&self) -> usize {
        self.ictx.depth()
    }

    pub fn check_ivar(&self, ix: usize) -> bool {
        self.ictx.contains(ix)
    }

    /// Extend `ctx` with a binder made at the current interval depth.
    fn bind(&self, ctx: &Context, hint: String, ty: Rc<Term>) -> Context {
        ctx.push_under(hint, ty, self.ictx_depth())
    }

    /// A variable's type, moved past the term binders after it and the
    /// interval binders entered since it was bound.
    fn lookup_var(&self, ctx: &Context, span: &Span, ix: usize) -> Result<Rc<Term>, TypeError> {
        let unbound = || TypeError::unbound_variable(span, ix, ctx.len());
        let ty = ctx.get(ix).ok_or_else(unbound)?;
        let bound_at = ctx.idepth(ix).ok_or_else(unbound)?;
        let crossed = self
            .ictx_depth()
            .checked_sub(bound_at)
            .ok_or_else(|| TypeError::unbound_ivar(span, bound_at, self.ictx_depth()))?;
        let ty = ty.shift(0, ix as isize + 1);
        Ok(if crossed == 0 { ty } else { ty.ishift(0, crossed as isize) })
    }

    fn conv(&self, t1: &Rc<Term>, t2: &Rc<Term>) -> bool {
        is_def_eq(t1, t2, self.globals, self.eta)
    }

    fn whnf(&self, t: &Rc<Term>) -> Rc<Term> {
        normalize(t, self.globals)
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    #[instrument(level = "trace", skip_all, fields(term = %term))]
    pub fn synth(&self, ctx: &Context, span: &Span, term: &Rc<Term>) -> Result<Rc<Term>, TypeError> {
        match &**term {
            Term::Spanned(inner, t) => self.synth(ctx, inner, t),

            Term::Var(ix) => self.lookup_var(ctx, span, *ix),

            Term::Sort(l) => Ok(Term::sort(l + 1)),

            Term::Global(name) => self
                .globals
                .lookup_type(name)
                .cloned()
                .ok_or_else(|| TypeError::unknown_global(span, name)),

            Term::Pi(hint, a, b) | Term::Sigma(hint, a, b) => {
                let l1 = self.check_is_type(ctx, span, a)?;
                let l2 = self.check_is_type(&self.bind(ctx, hint.clone(), a.clone()), span, b)?;
                Ok(Term::sort(l1.max(l2)))
            }

            Term::Lam(hint, Some(ann), body) => {
                self.check_is_type(ctx, span, ann)?;
                let body_ty = self.synth(&self.bind(ctx, hint.clone(), ann.clone()), span, body)?;
                Ok(Term::pi(hint.clone(), ann.clone(), body_ty))
            }
            Term::Lam(_, None, _) => Err(TypeError::cannot_infer(span, term.clone())),

            Term::App(f, a) => {
                let f_ty = self.synth(ctx, span, f)?;
                let (dom, cod) = self.ensure_pi(span, &f_ty)?;
                self.check(ctx, span, a, &dom)?;
                Ok(cod.instantiate(a))
            }

            Term::Pair(a, b) => {
                let a_ty = self.synth(ctx, span, a)?;
                let b_ty = self.synth(ctx, span, b)?;
                Ok(Term::sigma("_", a_ty, b_ty.shift(0, 1)))
            }

            Term::Fst(p) => {
                let p_ty = self.synth(ctx, span, p)?;
                let (a, _) = self.ensure_sigma(span, &p_ty)?;
                Ok(a)
            }

            Term::Snd(p) => {
                let p_ty = self.synth(ctx, span, p)?;
                let (_, b) = self.ensure_sigma(span, &p_ty)?;
                Ok(b.instantiate(&Term::fst(p.clone())))
            }

            Term::Let(hint, ann, val, body) => {
                let val_ty = match ann {
                    Some(ann) => {
                        self.check_is_type(ctx, span, ann)?;
                        self.check(ctx, span, val, ann)?;
                        ann.clone()
                    }
                    None => self.synth(ctx, span, val)?,
                };
                let body_ty = self.synth(&self.bind(ctx, hint.clone(), val_ty), span, body)?;
                Ok(body_ty.instantiate(val))
            }

            Term::Id(a, x, y) => {
                let level = self.check_is_type(ctx, span, a)?;
                self.check(ctx, span, x, a)?;
                self.check(ctx, span, y, a)?;
                Ok(Term::sort(level))
            }

            Term::Refl(a, x) => {
                self.check_is_type(ctx, span, a)?;
                self.check(ctx, span, x, a)?;
                Ok(Term::id(a.clone(), x.clone(), x.clone()))
            }

            Term::J { a, c, d, x, y, p } => self.synth_j(ctx, span, [a, c, d, x, y, p]),

            Term::HITApp { hit, ctor, args, iargs } => self.synth_hit_app(ctx, span, hit, ctor, args, iargs),

            _ => self.synth_cubical(ctx, span, term),
        }
    }

    #[instrument(level = "trace", skip_all, fields(term = %term, expected = %expected))]
    pub fn check(&self, ctx: &Context, span: &Span, term: &Rc<Term>, expected: &Rc<Term>) -> Result<(), TypeError> {
        match &**term {
            Term::Spanned(inner, t) => return self.check(ctx, inner, t, expected),

            Term::Lam(hint, ann, body) => {
                if let Some((dom, cod)) = self.as_pi(expected) {
                    if let Some(ann) = ann {
                        self.check_is_type(ctx, span, ann)?;
                        if !self.conv(ann, &dom) {
                            return Err(TypeError::type_mismatch(span, dom, ann.clone()));
                        }
                    }
                    return self.check(&self.bind(ctx, hint.clone(), dom), span, body, &cod);
                }
            }

            Term::Pair(a, b) => {
                if let Some((a_ty, b_ty)) = self.as_sigma(expected) {
                    self.check(ctx, span, a, &a_ty)?;
                    return self.check(ctx, span, b, &b_ty.instantiate(a));
                }
            }

            Term::PathLam(_, body) => {
                if let Some(view) = self.as_path(expected) {
                    return self.check_path_lam(ctx, span, body, view);
                }
            }

            Term::System(branches) => {
                if let Some((_, a)) = self.as_partial(expected) {
                    for branch in branches {
                        self.check_face(span, &branch.phi)?;
                        self.check(ctx, span, &branch.term, &a)?;
                    }
                    return Ok(());
                }
            }

            Term::GlueElem(branches, base) => {
                if let Some((a, system)) = self.as_glue(expected) {
                    return self.check_glue_elem(ctx, span, branches, base, &a, &system);
                }
            }

            _ => {}
        }

        let actual = self.synth(ctx, span, term)?;
        if self.conv(&actual, expected) {
            Ok(())
        } else {
            Err(TypeError::type_mismatch(span, expected.clone(), actual))
        }
    }

    /// Synthesize, then require a universe.
    pub fn check_is_type(&self, ctx: &Context, span: &Span, term: &Rc<Term>) -> Result<Level, TypeError> {
        let ty = self.synth(ctx, span, term)?;
        self.as_sort(&ty).ok_or_else(|| TypeError::not_a_type(span, ty))
    }

    /// Synthesize and compare with `expected`, returning the synthesized type.
    pub fn infer_and_check(
        &self,
        ctx: &Context,
        span: &Span,
        term: &Rc<Term>,
        expected: &Rc<Term>,
    ) -> Result<Rc<Term>, TypeError> {
        let actual = self.synth(ctx, span, term)?;
        if self.conv(&actual, expected) {
            Ok(actual)
        } else {
            Err(TypeError::type_mismatch(span, expected.clone(), actual))
        }
    }

    // =========================================================================
    // Identity type and higher inductive path constructors
    // =========================================================================

    fn synth_j(&self, ctx: &Context, span: &Span, [a, c, d, x, y, p]: [&Rc<Term>; 6]) -> Result<Rc<Term>, TypeError> {
        let a_level = self.check_is_type(ctx, span, a)?;
        self.check(ctx, span, x, a)?;
        self.check(ctx, span, y, a)?;

        // The motive's universe is read off its own type when it has one.
        let level = match self.synth(ctx, span, c) {
            Ok(c_ty) => match &*pi_telescope(&self.whnf(&c_ty)).1 {
                Term::Sort(l) => *l,
                _ => a_level,
            },
            Err(err) if err.kind == ErrorKind::CannotInfer => a_level,
            Err(err) => return Err(err),
        };
        // Π(y : A). Π(p : Id A x y). Sort L
        let motive = Term::pi(
            "y",
            a.clone(),
            Term::pi("p", Term::id(a.shift(0, 1), x.shift(0, 1), Term::var(0)), Term::sort(level)),
        );
        self.check(ctx, span, c, &motive)?;
        let refl = Term::refl(a.clone(), x.clone());
        self.check(ctx, span, d, &Term::apps(c.clone(), vec![x.clone(), refl]))?;
        self.check(ctx, span, p, &Term::id(a.clone(), x.clone(), y.clone()))?;
        Ok(Term::apps(c.clone(), vec![y.clone(), p.clone()]))
    }

    fn synth_hit_app(
        &self,
        ctx: &Context,
        span: &Span,
        hit: &str,
        ctor: &str,
        args: &[Rc<Term>],
        iargs: &[Rc<Term>],
    ) -> Result<Rc<Term>, TypeError> {
        let pc = self
            .globals
            .path_constructor(hit, ctor)
            .ok_or_else(|| TypeError::unknown_global(span, ctor))?;
        let mut ty = pc.ty.clone();
        for arg in args {
            let (dom, cod) = self.ensure_pi(span, &ty)?;
            self.check(ctx, span, arg, &dom)?;
            ty = cod.instantiate(arg);
        }
        for r in iargs {
            self.check(ctx, span, r, &Term::interval())?;
            let view = self.ensure_path(span, &ty)?;
            ty = view.family.isubst(0, r);
        }
        Ok(ty)
    }

    // =========================================================================
    // Cubical formers
    // =========================================================================

    fn synth_cubical(&self, ctx: &Context, span: &Span, term: &Rc<Term>) -> Result<Rc<Term>, TypeError> {
        match &**term {
            Term::Interval => Ok(Term::sort(0)),
            Term::I0 | Term::I1 => Ok(Term::interval()),
            Term::IVar(ix) => {
                if self.check_ivar(*ix) {
                    Ok(Term::interval())
                } else {
                    Err(TypeError::unbound_ivar(span, *ix, self.ictx_depth()))
                }
            }

            Term::Path(a, x, y) => {
                let level = self.check_is_type(ctx, span, a)?;
                self.check(ctx, span, x, a)?;
                self.check(ctx, span, y, a)?;
                Ok(Term::sort(level))
            }

            Term::PathP(a, x, y) => {
                let level = {
                    let _i = self.push_ivar();
                    self.check_is_type(ctx, span, a)?
                };
                self.check(ctx, span, x, &a.isubst(0, &Term::i0()))?;
                self.check(ctx, span, y, &a.isubst(0, &Term::i1()))?;
                Ok(Term::sort(level))
            }

            Term::PathLam(_, body) => {
                let body_ty = {
                    let _i = self.push_ivar();
                    self.synth(ctx, span, body)?
                };
                // Normalized so that syntactic noise does not reach the endpoint comparison.
                let left = self.whnf(&body.isubst(0, &Term::i0()));
                let right = self.whnf(&body.isubst(0, &Term::i1()));
                Ok(Term::pathp(body_ty, left, right))
            }

            Term::PathApp(p, r) => {
                let p_ty = self.synth(ctx, span, p)?;
                let view = self.ensure_path(span, &p_ty)?;
                self.check(ctx, span, r, &Term::interval())?;
                Ok(view.family.isubst(0, r))
            }

            Term::Transport(a, e) => {
                {
                    let _i = self.push_ivar();
                    self.check_is_type(ctx, span, a)?;
                }
                self.check(ctx, span, e, &a.isubst(0, &Term::i0()))?;
                Ok(a.isubst(0, &Term::i1()))
            }

            Term::Partial(phi, a) => {
                self.check_face(span, phi)?;
                let level = self.check_is_type(ctx, span, a)?;
                Ok(Term::sort(level))
            }

            Term::System(branches) => self.synth_system(ctx, span, term, branches),

            Term::Comp { ty, phi, tube, base, .. } => {
                self.check_composition(ctx, span, ty, phi, tube, base)?;
                Ok(ty.isubst(0, &Term::i1()))
            }

            Term::Fill { binder, ty, phi, tube, base } => {
                self.check_composition(ctx, span, ty, phi, tube, base)?;
                let comp = Rc::new(Term::Comp {
                    binder: binder.clone(),
                    ty: ty.clone(),
                    phi: phi.clone(),
                    tube: tube.clone(),
                    base: base.clone(),
                });
                Ok(Term::pathp(ty.clone(), base.clone(), comp))
            }

            Term::HComp { ty, phi, tube, base } => {
                self.check_face(span, phi)?;
                self.check_is_type(ctx, span, ty)?;
                {
                    let _i = self.push_ivar();
                    self.check(ctx, span, tube, &ty.ishift(0, 1))?;
                }
                self.check(ctx, span, base, ty)?;
                Ok(ty.clone())
            }

            Term::Glue(a, branches) => {
                let level = self.check_is_type(ctx, span, a)?;
                for GlueBranch { phi, ty, equiv } in branches {
                    self.check_face(span, phi)?;
                    self.check_is_type(ctx, span, ty)?;
                    self.check_equiv(ctx, span, equiv, ty, a)?;
                }
                Ok(Term::sort(level))
            }

            Term::Unglue(ann, g) => {
                let g_ty = match ann {
                    Some(ann) => {
                        self.check_is_type(ctx, span, ann)?;
                        self.check(ctx, span, g, ann)?;
                        ann.clone()
                    }
                    None => self.synth(ctx, span, g)?,
                };
                // A Glue type whose system vanished is its base already.
                Ok(self.as_glue(&g_ty).map(|(a, _)| a).unwrap_or(g_ty))
            }

            Term::UA(a, b, e) => {
                let la = self.check_is_type(ctx, span, a)?;
                let lb = self.check_is_type(ctx, span, b)?;
                if la != lb {
                    return Err(TypeError::type_mismatch(span, Term::sort(la), Term::sort(lb)));
                }
                self.check_equiv(ctx, span, e, a, b)?;
                Ok(Term::path(Term::sort(la), a.clone(), b.clone()))
            }

            Term::UABeta(e, a) => {
                self.synth(ctx, span, a)?;
                let e_ty = self.synth(ctx, span, e)?;
                let (f_ty, _) = self.ensure_sigma(span, &e_ty)?;
                let (dom, cod) = self.ensure_pi(span, &f_ty)?;
                self.check(ctx, span, a, &dom)?;
                Ok(cod.instantiate(a))
            }

            _ => Err(TypeError::cannot_infer(span, term.clone())),
        }
    }

    fn synth_system(
        &self,
        ctx: &Context,
        span: &Span,
        term: &Rc<Term>,
        branches: &[SystemBranch],
    ) -> Result<Rc<Term>, TypeError> {
        let first = branches.first().ok_or_else(|| TypeError::cannot_infer(span, term.clone()))?;
        for branch in branches {
            self.check_face(span, &branch.phi)?;
        }
        let ty = self.synth(ctx, span, &first.term)?;
        for branch in &branches[1..] {
            self.check(ctx, span, &branch.term, &ty)?;
        }
        let phi = branches
            .iter()
            .fold(Face::Bot, |acc, branch| Face::or(acc, branch.phi.clone()));
        Ok(Rc::new(Term::Partial(phi, ty)))
    }

    /// Shared premises of `Comp` and `Fill`: a family and a tube under the
    /// bound interval variable and a base at `i0`.
    fn check_composition(
        &self,
        ctx: &Context,
        span: &Span,
        ty: &Rc<Term>,
        phi: &Face,
        tube: &Rc<Term>,
        base: &Rc<Term>,
    ) -> Result<(), TypeError> {
        self.check_face(span, phi)?;
        {
            let _i = self.push_ivar();
            self.check_is_type(ctx, span, ty)?;
            self.check(ctx, span, tube, ty)?;
        }
        self.check(ctx, span, base, &ty.isubst(0, &Term::i0()))
    }

    /// An equivalence `e : from ≃ to` is a pair whose first component is the
    /// forward map `from -> to`. The rest of the structure is not inspected.
    fn check_equiv(
        &self,
        ctx: &Context,
        span: &Span,
        e: &Rc<Term>,
        from: &Rc<Term>,
        to: &Rc<Term>,
    ) -> Result<(), TypeError> {
        let e_ty = self.synth(ctx, span, e)?;
        let (f_ty, _) = self.ensure_sigma(span, &e_ty)?;
        let forward = Term::pi("_", from.clone(), to.shift(0, 1));
        if self.conv(&f_ty, &forward) {
            Ok(())
        } else {
            Err(TypeError::type_mismatch(span, forward, f_ty))
        }
    }

    fn check_path_lam(&self, ctx: &Context, span: &Span, body: &Rc<Term>, view: PathView) -> Result<(), TypeError> {
        {
            let _i = self.push_ivar();
            self.check(ctx, span, body, &view.family)?;
        }
        let left = body.isubst(0, &Term::i0());
        if !self.conv(&left, &view.x) {
            return Err(TypeError::endpoint_mismatch(span, view.x, left));
        }
        let right = body.isubst(0, &Term::i1());
        if !self.conv(&right, &view.y) {
            return Err(TypeError::endpoint_mismatch(span, view.y, right));
        }
        Ok(())
    }

    fn check_glue_elem(
        &self,
        ctx: &Context,
        span: &Span,
        branches: &[SystemBranch],
        base: &Rc<Term>,
        a: &Rc<Term>,
        system: &[GlueBranch],
    ) -> Result<(), TypeError> {
        self.check(ctx, span, base, a)?;
        for branch in branches {
            self.check_face(span, &branch.phi)?;
            let glue = system
                .iter()
                .find(|g| g.phi == branch.phi)
                .ok_or_else(|| TypeError::cannot_infer(span, branch.term.clone()))?;
            self.check(ctx, span, &branch.term, &glue.ty)?;
        }
        Ok(())
    }

    fn check_face(&self, span: &Span, phi: &Face) -> Result<(), TypeError> {
        match phi {
            Face::Top | Face::Bot => Ok(()),
            Face::Eq(ix, _) if self.check_ivar(*ix) => Ok(()),
            Face::Eq(ix, _) => Err(TypeError::unbound_ivar(span, *ix, self.ictx_depth())),
            Face::And(a, b) | Face::Or(a, b) => {
                self.check_face(span, a)?;
                self.check_face(span, b)
            }
        }
    }

    // =========================================================================
    // Ensure helpers
    //
    // Each looks at the type as written first and only normalizes when the
    // expected former is not already on top.
    // =========================================================================

    fn view<T>(&self, ty: &Rc<Term>, f: impl Fn(&Term) -> Option<T>) -> Option<T> {
        f(&**Term::unspanned(ty)).or_else(|| f(&*self.whnf(ty)))
    }

    fn as_pi(&self, ty: &Rc<Term>) -> Option<(Rc<Term>, Rc<Term>)> {
        self.view(ty, |t| match t {
            Term::Pi(_, a, b) => Some((a.clone(), b.clone())),
            _ => None,
        })
    }

    fn as_sigma(&self, ty: &Rc<Term>) -> Option<(Rc<Term>, Rc<Term>)> {
        self.view(ty, |t| match t {
            Term::Sigma(_, a, b) => Some((a.clone(), b.clone())),
            _ => None,
        })
    }

    fn as_sort(&self, ty: &Rc<Term>) -> Option<Level> {
        self.view(ty, |t| match t {
            Term::Sort(l) => Some(*l),
            _ => None,
        })
    }

    fn as_path(&self, ty: &Rc<Term>) -> Option<PathView> {
        self.view(ty, |t| match t {
            Term::Path(a, x, y) => Some(PathView {
                family: a.ishift(0, 1),
                x: x.clone(),
                y: y.clone(),
            }),
            Term::PathP(a, x, y) => Some(PathView {
                family: a.clone(),
                x: x.clone(),
                y: y.clone(),
            }),
            _ => None,
        })
    }

    fn as_partial(&self, ty: &Rc<Term>) -> Option<(Face, Rc<Term>)> {
        self.view(ty, |t| match t {
            Term::Partial(phi, a) => Some((phi.clone(), a.clone())),
            _ => None,
        })
    }

    fn as_glue(&self, ty: &Rc<Term>) -> Option<(Rc<Term>, Vec<GlueBranch>)> {
        self.view(ty, |t| match t {
            Term::Glue(a, system) => Some((a.clone(), system.clone())),
            _ => None,
        })
    }

    fn ensure_pi(&self, span: &Span, ty: &Rc<Term>) -> Result<(Rc<Term>, Rc<Term>), TypeError> {
        self.as_pi(ty).ok_or_else(|| TypeError::not_a_function(span, ty.clone()))
    }

    fn ensure_sigma(&self, span: &Span, ty: &Rc<Term>) -> Result<(Rc<Term>, Rc<Term>), TypeError> {
        self.as_sigma(ty).ok_or_else(|| TypeError::not_a_pair(span, ty.clone()))
    }

    fn ensure_path(&self, span: &Span, ty: &Rc<Term>) -> Result<PathView, TypeError> {
        self.as_path(ty).ok_or_else(|| TypeError::not_a_path(span, ty.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn checker(env: &GlobalEnv) -> Checker<'_> {
        Checker::new_with_eta(env, false)
    }

    #[test]
    fn sort_lives_one_level_up() {
        let env = GlobalEnv::new();
        let ty = checker(&env).synth(&Context::new(), &Span::none(), &Term::sort(2)).unwrap();
        assert_eq!(ty, Term::sort(3));
    }

    #[test]
    fn variables_are_shifted_out_of_their_binder() {
        let env = GlobalEnv::new();
        // A : Sort 0, x : A  ⊢  x : A   where A is Var 1 from x's position
        let ctx = Context::new().push("A", Term::sort(0)).push("x", Term::var(0));
        let ty = checker(&env).synth(&ctx, &Span::none(), &Term::var(0)).unwrap();
        assert_eq!(ty, Term::var(1));
    }

    #[test]
    fn spans_narrow_to_the_innermost_annotation() {
        let env = GlobalEnv::new();
        let at = Span::lines("t.htt", 3, 5, 3, 9);
        let term = Term::app(Term::sort(0), Term::spanned(at.clone(), Term::global("nope")));
        let err = checker(&env).synth(&Context::new(), &Span::none(), &term).unwrap_err();
        // The head is checked first and is not a function.
        assert_eq!(err.kind, ErrorKind::NotAFunction);

        let term = Term::spanned(at.clone(), Term::global("nope"));
        let err = checker(&env).synth(&Context::new(), &Span::none(), &term).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownGlobal);
        assert_eq!(err.span, at);
    }

    #[test]
    fn interval_guard_scopes_ivars() {
        let env = GlobalEnv::new();
        let c = checker(&env);
        let ctx = Context::new();
        assert!(c.synth(&ctx, &Span::none(), &Term::ivar(0)).is_err());
        {
            let _i = c.push_ivar();
            assert_eq!(c.synth(&ctx, &Span::none(), &Term::ivar(0)).unwrap(), Term::interval());
        }
        assert_eq!(c.ictx_depth(), 0);
    }
}
