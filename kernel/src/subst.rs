//! Shifting and substitution for term variables and interval variables.
//!
//! Both calculi share one traversal. The traversal counts how many term
//! binders (`Pi`, `Sigma`, `Lam`, `Let`) and how many interval binders
//! (`PathP`'s family, `PathLam`, `Transport`'s family, the family and tube of
//! `Comp`/`Fill`, the tube of `HComp`) it has crossed, and hands those counts
//! to a [`VarMap`] which decides what each variable occurrence becomes.

use crate::ast::{Face, GlueBranch, SystemBranch, Term};
use std::rc::Rc;

trait VarMap {
    /// Replacement for `Var ix` found under `tc` term and `ic` interval binders.
    fn var(&self, ix: usize, tc: usize, ic: usize) -> Rc<Term>;
    /// Replacement for `IVar ix` found under `tc` term and `ic` interval binders.
    fn ivar(&self, ix: usize, tc: usize, ic: usize) -> Rc<Term>;
}

fn add_signed(ix: usize, d: isize) -> usize {
    if d >= 0 {
        ix + d as usize
    } else {
        ix.saturating_sub(d.unsigned_abs())
    }
}

struct Shift {
    cutoff: usize,
    d: isize,
}

impl VarMap for Shift {
    fn var(&self, ix: usize, tc: usize, _ic: usize) -> Rc<Term> {
        if ix >= self.cutoff + tc {
            Term::var(add_signed(ix, self.d))
        } else {
            Term::var(ix)
        }
    }

    fn ivar(&self, ix: usize, _tc: usize, _ic: usize) -> Rc<Term> {
        Term::ivar(ix)
    }
}

struct Subst<'a> {
    cutoff: usize,
    with: &'a Rc<Term>,
}

impl VarMap for Subst<'_> {
    fn var(&self, ix: usize, tc: usize, ic: usize) -> Rc<Term> {
        let target = self.cutoff + tc;
        if ix == target {
            let lifted = if tc == 0 { self.with.clone() } else { self.with.shift(0, tc as isize) };
            if ic == 0 {
                lifted
            } else {
                lifted.ishift(0, ic as isize)
            }
        } else if ix > target {
            Term::var(ix - 1)
        } else {
            Term::var(ix)
        }
    }

    fn ivar(&self, ix: usize, _tc: usize, _ic: usize) -> Rc<Term> {
        Term::ivar(ix)
    }
}

struct IShift {
    cutoff: usize,
    d: isize,
}

impl VarMap for IShift {
    fn var(&self, ix: usize, _tc: usize, _ic: usize) -> Rc<Term> {
        Term::var(ix)
    }

    fn ivar(&self, ix: usize, _tc: usize, ic: usize) -> Rc<Term> {
        if ix >= self.cutoff + ic {
            Term::ivar(add_signed(ix, self.d))
        } else {
            Term::ivar(ix)
        }
    }
}

struct ISubst<'a> {
    cutoff: usize,
    with: &'a Rc<Term>,
}

impl VarMap for ISubst<'_> {
    fn var(&self, ix: usize, _tc: usize, _ic: usize) -> Rc<Term> {
        Term::var(ix)
    }

    fn ivar(&self, ix: usize, _tc: usize, ic: usize) -> Rc<Term> {
        let target = self.cutoff + ic;
        if ix == target {
            if ic == 0 {
                self.with.clone()
            } else {
                self.with.ishift(0, ic as isize)
            }
        } else if ix > target {
            Term::ivar(ix - 1)
        } else {
            Term::ivar(ix)
        }
    }
}

struct Rename<'a> {
    f: &'a dyn Fn(usize) -> usize,
}

impl VarMap for Rename<'_> {
    fn var(&self, ix: usize, tc: usize, _ic: usize) -> Rc<Term> {
        if ix >= tc {
            Term::var((self.f)(ix - tc) + tc)
        } else {
            Term::var(ix)
        }
    }

    fn ivar(&self, ix: usize, _tc: usize, _ic: usize) -> Rc<Term> {
        Term::ivar(ix)
    }
}

fn walk_face<M: VarMap>(f: &Face, m: &M, tc: usize, ic: usize) -> Face {
    match f {
        Face::Top => Face::Top,
        Face::Bot => Face::Bot,
        Face::Eq(ix, is_one) => match &*m.ivar(*ix, tc, ic) {
            Term::I0 => {
                if *is_one {
                    Face::Bot
                } else {
                    Face::Top
                }
            }
            Term::I1 => {
                if *is_one {
                    Face::Top
                } else {
                    Face::Bot
                }
            }
            Term::IVar(k) => Face::Eq(*k, *is_one),
            // Only interval terms are ever substituted for interval variables.
            _ => Face::Eq(*ix, *is_one),
        },
        Face::And(a, b) => Face::and(walk_face(a, m, tc, ic), walk_face(b, m, tc, ic)),
        Face::Or(a, b) => Face::or(walk_face(a, m, tc, ic), walk_face(b, m, tc, ic)),
    }
}

fn walk_branches<M: VarMap>(bs: &[SystemBranch], m: &M, tc: usize, ic: usize) -> Vec<SystemBranch> {
    bs.iter()
        .map(|b| SystemBranch::new(walk_face(&b.phi, m, tc, ic), walk(&b.term, m, tc, ic)))
        .collect()
}

fn walk_opt<M: VarMap>(t: &Option<Rc<Term>>, m: &M, tc: usize, ic: usize) -> Option<Rc<Term>> {
    t.as_ref().map(|t| walk(t, m, tc, ic))
}

fn walk<M: VarMap>(t: &Term, m: &M, tc: usize, ic: usize) -> Rc<Term> {
    let go = |t: &Rc<Term>| walk(t, m, tc, ic);
    let under = |t: &Rc<Term>| walk(t, m, tc + 1, ic);
    let iunder = |t: &Rc<Term>| walk(t, m, tc, ic + 1);
    Rc::new(match t {
        Term::Var(ix) => return m.var(*ix, tc, ic),
        Term::IVar(ix) => return m.ivar(*ix, tc, ic),
        Term::Sort(_) | Term::Global(_) | Term::Interval | Term::I0 | Term::I1 => t.clone(),
        Term::Pi(h, a, b) => Term::Pi(h.clone(), go(a), under(b)),
        Term::Sigma(h, a, b) => Term::Sigma(h.clone(), go(a), under(b)),
        Term::Lam(h, ann, body) => Term::Lam(h.clone(), walk_opt(ann, m, tc, ic), under(body)),
        Term::App(f, a) => Term::App(go(f), go(a)),
        Term::Pair(a, b) => Term::Pair(go(a), go(b)),
        Term::Fst(p) => Term::Fst(go(p)),
        Term::Snd(p) => Term::Snd(go(p)),
        Term::Let(h, ann, val, body) => Term::Let(h.clone(), walk_opt(ann, m, tc, ic), go(val), under(body)),
        Term::Id(a, x, y) => Term::Id(go(a), go(x), go(y)),
        Term::Refl(a, x) => Term::Refl(go(a), go(x)),
        Term::J { a, c, d, x, y, p } => Term::J {
            a: go(a),
            c: go(c),
            d: go(d),
            x: go(x),
            y: go(y),
            p: go(p),
        },
        Term::Path(a, x, y) => Term::Path(go(a), go(x), go(y)),
        Term::PathP(a, x, y) => Term::PathP(iunder(a), go(x), go(y)),
        Term::PathLam(h, body) => Term::PathLam(h.clone(), iunder(body)),
        Term::PathApp(p, r) => Term::PathApp(go(p), go(r)),
        Term::Transport(a, e) => Term::Transport(iunder(a), go(e)),
        Term::Partial(phi, a) => Term::Partial(walk_face(phi, m, tc, ic), go(a)),
        Term::System(bs) => Term::System(walk_branches(bs, m, tc, ic)),
        Term::Comp { binder, ty, phi, tube, base } => Term::Comp {
            binder: binder.clone(),
            ty: iunder(ty),
            phi: walk_face(phi, m, tc, ic),
            tube: iunder(tube),
            base: go(base),
        },
        Term::HComp { ty, phi, tube, base } => Term::HComp {
            ty: go(ty),
            phi: walk_face(phi, m, tc, ic),
            tube: iunder(tube),
            base: go(base),
        },
        Term::Fill { binder, ty, phi, tube, base } => Term::Fill {
            binder: binder.clone(),
            ty: iunder(ty),
            phi: walk_face(phi, m, tc, ic),
            tube: iunder(tube),
            base: go(base),
        },
        Term::Glue(a, bs) => Term::Glue(
            go(a),
            bs.iter()
                .map(|b| GlueBranch::new(walk_face(&b.phi, m, tc, ic), go(&b.ty), go(&b.equiv)))
                .collect(),
        ),
        Term::GlueElem(bs, base) => Term::GlueElem(walk_branches(bs, m, tc, ic), go(base)),
        Term::Unglue(ty, g) => Term::Unglue(walk_opt(ty, m, tc, ic), go(g)),
        Term::UA(a, b, e) => Term::UA(go(a), go(b), go(e)),
        Term::UABeta(e, a) => Term::UABeta(go(e), go(a)),
        Term::HITApp { hit, ctor, args, iargs } => Term::HITApp {
            hit: hit.clone(),
            ctor: ctor.clone(),
            args: args.iter().map(go).collect(),
            iargs: iargs.iter().map(go).collect(),
        },
        Term::Spanned(span, inner) => Term::Spanned(span.clone(), go(inner)),
    })
}

impl Term {
    /// Add `d` to every free term variable with index `>= c`.
    pub fn shift(&self, c: usize, d: isize) -> Rc<Term> {
        walk(self, &Shift { cutoff: c, d }, 0, 0)
    }

    /// Replace `Var k` by `s` (lifted over the binders crossed) and close the
    /// gap left by the removed binder.
    pub fn subst(&self, k: usize, s: &Rc<Term>) -> Rc<Term> {
        walk(self, &Subst { cutoff: k, with: s }, 0, 0)
    }

    /// Add `d` to every free interval variable with index `>= c`.
    pub fn ishift(&self, c: usize, d: isize) -> Rc<Term> {
        walk(self, &IShift { cutoff: c, d }, 0, 0)
    }

    /// Replace `IVar k` by the interval term `r`. Faces mentioning `k`
    /// simplify on the spot.
    pub fn isubst(&self, k: usize, r: &Rc<Term>) -> Rc<Term> {
        walk(self, &ISubst { cutoff: k, with: r }, 0, 0)
    }

    /// Send every free term variable `ix` to `f(ix)`.
    pub fn rename_free(&self, f: &dyn Fn(usize) -> usize) -> Rc<Term> {
        walk(self, &Rename { f }, 0, 0)
    }

    /// Beta-instantiate the outermost bound term variable.
    pub fn instantiate(&self, arg: &Rc<Term>) -> Rc<Term> {
        self.subst(0, arg)
    }
}

impl Face {
    /// Substitute an interval term for `IVar k` inside a face, simplifying.
    pub fn isubst(&self, k: usize, r: &Rc<Term>) -> Face {
        walk_face(self, &ISubst { cutoff: k, with: r }, 0, 0)
    }

    pub fn ishift(&self, c: usize, d: isize) -> Face {
        walk_face(self, &IShift { cutoff: c, d }, 0, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_respects_cutoff() {
        // λx. x y  where y is free (index 1 under the binder)
        let t = Term::lam_bare("x", Term::app(Term::var(0), Term::var(1)));
        let shifted = t.shift(0, 2);
        assert_eq!(shifted, Term::lam_bare("x", Term::app(Term::var(0), Term::var(3))));
        assert_eq!(shifted.shift(0, -2), t);
    }

    #[test]
    fn subst_lifts_under_binders() {
        // (λy. Var 1)[Var 5 / 0] = λy. Var 6
        let t = Term::lam_bare("y", Term::var(1));
        assert_eq!(t.subst(0, &Term::var(5)), Term::lam_bare("y", Term::var(6)));
    }

    #[test]
    fn subst_closes_gap() {
        let t = Term::app(Term::var(0), Term::var(2));
        assert_eq!(t.subst(0, &Term::global("a")), Term::app(Term::global("a"), Term::var(1)));
    }

    #[test]
    fn subst_of_own_index_is_identity() {
        let t = Term::pi("x", Term::var(0), Term::var(1));
        assert_eq!(t.subst(0, &Term::var(0)), t);
    }

    #[test]
    fn rename_free_skips_bound_variables() {
        // λx. x (Var 1) (Var 2)  with free 0 -> 5, free 1 -> 7
        let t = Term::lam_bare("x", Term::apps(Term::var(0), vec![Term::var(1), Term::var(2)]));
        let out = t.rename_free(&|ix| if ix == 0 { 5 } else { 7 });
        assert_eq!(out, Term::lam_bare("x", Term::apps(Term::var(0), vec![Term::var(6), Term::var(8)])));
    }

    #[test]
    fn isubst_simplifies_faces() {
        assert_eq!(Face::eq0(0).isubst(0, &Term::i0()), Face::Top);
        assert_eq!(Face::eq1(0).isubst(0, &Term::i0()), Face::Bot);
        assert_eq!(Face::eq1(0).isubst(0, &Term::i1()), Face::Top);
        assert_eq!(Face::eq0(0).isubst(0, &Term::i1()), Face::Bot);
        let f = Face::Or(Box::new(Face::eq0(0)), Box::new(Face::eq1(1)));
        assert_eq!(f.isubst(0, &Term::i1()), Face::eq1(0));
    }

    #[test]
    fn interval_cutoff_ignores_term_binders() {
        // λx. <i> (ivar 0, ivar 1): only the path binder moves the cut-off
        let t = Term::lam_bare("x", Term::plam("i", Term::pair(Term::ivar(0), Term::ivar(1))));
        let out = t.isubst(0, &Term::i1());
        assert_eq!(out, Term::lam_bare("x", Term::plam("i", Term::pair(Term::ivar(0), Term::i1()))));
    }

    #[test]
    fn term_subst_lifts_interval_vars_under_path_binders() {
        // <i> Var 0  with Var 0 := ivar-using term
        let t = Term::plam("i", Term::var(0));
        let u = Term::papp(Term::global("p"), Term::ivar(0));
        let out = t.subst(0, &u);
        assert_eq!(out, Term::plam("i", Term::papp(Term::global("p"), Term::ivar(1))));
    }
}
