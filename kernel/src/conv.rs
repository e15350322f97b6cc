use crate::ast::Term;
use crate::env::GlobalEnv;
use crate::nbe::{apply_with_config, eval, fst, path_app, snd, Closure, Elim, Env, EvalConfig, FaceVal, Head, Value};
use std::rc::Rc;

/// Definitional equality on values.
///
/// Values are compared structurally. Closures are compared by applying both
/// to the same fresh variable, so binder hints never matter. With `eta`
/// enabled a lambda (or pair, or path abstraction) is also equal to any value
/// that behaves the same under application (projection, interval
/// application).
pub struct DefEq<'g> {
    globals: &'g GlobalEnv,
    eta: bool,
}

impl<'g> DefEq<'g> {
    pub fn new(globals: &'g GlobalEnv, eta: bool) -> Self {
        DefEq { globals, eta }
    }

    /// Compare two values living under `level` term binders and `ilevel`
    /// interval binders.
    pub fn check_eq(&self, v1: &Value, v2: &Value, level: usize, ilevel: usize) -> bool {
        let config = EvalConfig::at(level, ilevel);
        match (v1, v2) {
            (Value::Sort(l1), Value::Sort(l2)) => l1 == l2,

            (Value::Pi(_, a1, b1), Value::Pi(_, a2, b2)) | (Value::Sigma(_, a1, b1), Value::Sigma(_, a2, b2)) => {
                self.check_eq(a1, a2, level, ilevel) && self.check_closure(b1, b2, level, ilevel)
            }

            (Value::Lam(_, _, b1), Value::Lam(_, _, b2)) => self.check_closure(b1, b2, level, ilevel),

            // Eta for functions: (\x. b) == f  iff  b[x] == f x
            (Value::Lam(_, _, body), other) | (other, Value::Lam(_, _, body)) if self.eta => {
                let x = Value::var(level);
                let lhs = body.apply(x.clone(), self.globals, config.under());
                let rhs = apply_with_config(other.clone(), x, self.globals, config.under());
                self.check_eq(&lhs, &rhs, level + 1, ilevel)
            }

            (Value::Pair(a1, b1), Value::Pair(a2, b2)) => {
                self.check_eq(a1, a2, level, ilevel) && self.check_eq(b1, b2, level, ilevel)
            }

            // Eta for pairs: (a, b) == p  iff  a == fst p and b == snd p
            (Value::Pair(a, b), other) | (other, Value::Pair(a, b)) if self.eta => {
                self.check_eq(a, &fst(other.clone()), level, ilevel) && self.check_eq(b, &snd(other.clone()), level, ilevel)
            }

            (Value::Neutral(h1, s1), Value::Neutral(h2, s2)) => {
                self.check_head(h1, h2, level, ilevel)
                    && s1.len() == s2.len()
                    && s1.iter().zip(s2.iter()).all(|(e1, e2)| self.check_elim(e1, e2, level, ilevel))
            }

            (Value::Id(a1, x1, y1), Value::Id(a2, x2, y2)) | (Value::Path(a1, x1, y1), Value::Path(a2, x2, y2)) => {
                self.check_eq(a1, a2, level, ilevel)
                    && self.check_eq(x1, x2, level, ilevel)
                    && self.check_eq(y1, y2, level, ilevel)
            }
            (Value::Refl(a1, x1), Value::Refl(a2, x2)) => {
                self.check_eq(a1, a2, level, ilevel) && self.check_eq(x1, x2, level, ilevel)
            }

            (Value::Interval, Value::Interval) | (Value::I0, Value::I0) | (Value::I1, Value::I1) => true,
            (Value::IVar(x1), Value::IVar(x2)) => x1 == x2,

            (Value::PathP(a1, x1, y1), Value::PathP(a2, x2, y2)) => {
                self.check_iclosure(a1, a2, level, ilevel)
                    && self.check_eq(x1, x2, level, ilevel)
                    && self.check_eq(y1, y2, level, ilevel)
            }
            (Value::PathLam(_, b1), Value::PathLam(_, b2)) => self.check_iclosure(b1, b2, level, ilevel),

            // Eta for paths: <i> b == p  iff  b[i] == p @ i
            (Value::PathLam(_, body), other) | (other, Value::PathLam(_, body)) if self.eta => {
                let i = Value::ivar(ilevel);
                let lhs = body.apply_ival(i.clone(), self.globals, config.iunder());
                let rhs = path_app(other.clone(), i, self.globals, config.iunder());
                self.check_eq(&lhs, &rhs, level, ilevel + 1)
            }

            (Value::Transport(a1, e1), Value::Transport(a2, e2)) => {
                self.check_iclosure(a1, a2, level, ilevel) && self.check_eq(e1, e2, level, ilevel)
            }
            (Value::Partial(phi1, a1), Value::Partial(phi2, a2)) => phi1 == phi2 && self.check_eq(a1, a2, level, ilevel),
            (Value::System(bs1), Value::System(bs2)) => self.check_system(bs1, bs2, level, ilevel),
            (Value::GlueElem(bs1, base1), Value::GlueElem(bs2, base2)) => {
                self.check_system(bs1, bs2, level, ilevel) && self.check_eq(base1, base2, level, ilevel)
            }

            (
                Value::Comp { ty: ty1, phi: phi1, tube: tube1, base: base1, .. },
                Value::Comp { ty: ty2, phi: phi2, tube: tube2, base: base2, .. },
            )
            | (
                Value::Fill { ty: ty1, phi: phi1, tube: tube1, base: base1, .. },
                Value::Fill { ty: ty2, phi: phi2, tube: tube2, base: base2, .. },
            ) => {
                phi1 == phi2
                    && self.check_iclosure(ty1, ty2, level, ilevel)
                    && self.check_iclosure(tube1, tube2, level, ilevel)
                    && self.check_eq(base1, base2, level, ilevel)
            }
            (
                Value::HComp { ty: ty1, phi: phi1, tube: tube1, base: base1 },
                Value::HComp { ty: ty2, phi: phi2, tube: tube2, base: base2 },
            ) => {
                phi1 == phi2
                    && self.check_eq(ty1, ty2, level, ilevel)
                    && self.check_iclosure(tube1, tube2, level, ilevel)
                    && self.check_eq(base1, base2, level, ilevel)
            }

            (Value::Glue(a1, bs1), Value::Glue(a2, bs2)) => {
                self.check_eq(a1, a2, level, ilevel)
                    && bs1.len() == bs2.len()
                    && bs1.iter().zip(bs2.iter()).all(|(b1, b2)| {
                        b1.phi == b2.phi
                            && self.check_eq(&b1.ty, &b2.ty, level, ilevel)
                            && self.check_eq(&b1.equiv, &b2.equiv, level, ilevel)
                    })
            }
            (Value::Unglue(_, g1), Value::Unglue(_, g2)) => self.check_eq(g1, g2, level, ilevel),
            (Value::UA(a1, b1, e1), Value::UA(a2, b2, e2)) => {
                self.check_eq(a1, a2, level, ilevel)
                    && self.check_eq(b1, b2, level, ilevel)
                    && self.check_eq(e1, e2, level, ilevel)
            }
            (Value::UABeta(e1, a1), Value::UABeta(e2, a2)) => {
                self.check_eq(e1, e2, level, ilevel) && self.check_eq(a1, a2, level, ilevel)
            }
            (
                Value::HITPathCtor { hit: h1, ctor: c1, args: a1, iargs: i1 },
                Value::HITPathCtor { hit: h2, ctor: c2, args: a2, iargs: i2 },
            ) => {
                h1 == h2
                    && c1 == c2
                    && self.check_eq_vec(a1, a2, level, ilevel)
                    && self.check_eq_vec(i1, i2, level, ilevel)
            }

            _ => false,
        }
    }

    fn check_closure(&self, c1: &Closure, c2: &Closure, level: usize, ilevel: usize) -> bool {
        let config = EvalConfig::at(level + 1, ilevel);
        let x = Value::var(level);
        let b1 = c1.apply(x.clone(), self.globals, config);
        let b2 = c2.apply(x, self.globals, config);
        self.check_eq(&b1, &b2, level + 1, ilevel)
    }

    fn check_iclosure(&self, c1: &Closure, c2: &Closure, level: usize, ilevel: usize) -> bool {
        let config = EvalConfig::at(level, ilevel + 1);
        let i = Value::ivar(ilevel);
        let b1 = c1.apply_ival(i.clone(), self.globals, config);
        let b2 = c2.apply_ival(i, self.globals, config);
        self.check_eq(&b1, &b2, level, ilevel + 1)
    }

    fn check_head(&self, h1: &Head, h2: &Head, level: usize, ilevel: usize) -> bool {
        match (h1, h2) {
            (Head::Var(x1), Head::Var(x2)) => x1 == x2,
            (Head::Global(n1), Head::Global(n2)) => n1 == n2,
            (Head::Stuck(v1), Head::Stuck(v2)) => self.check_eq(v1, v2, level, ilevel),
            _ => false,
        }
    }

    fn check_elim(&self, e1: &Elim, e2: &Elim, level: usize, ilevel: usize) -> bool {
        match (e1, e2) {
            (Elim::App(a1), Elim::App(a2)) | (Elim::PathApp(a1), Elim::PathApp(a2)) => {
                self.check_eq(a1, a2, level, ilevel)
            }
            (Elim::Fst, Elim::Fst) | (Elim::Snd, Elim::Snd) => true,
            (
                Elim::J { a: a1, c: c1, d: d1, x: x1, y: y1 },
                Elim::J { a: a2, c: c2, d: d2, x: x2, y: y2 },
            ) => {
                self.check_eq(a1, a2, level, ilevel)
                    && self.check_eq(c1, c2, level, ilevel)
                    && self.check_eq(d1, d2, level, ilevel)
                    && self.check_eq(x1, x2, level, ilevel)
                    && self.check_eq(y1, y2, level, ilevel)
            }
            _ => false,
        }
    }

    fn check_system(
        &self,
        bs1: &[(FaceVal, Value)],
        bs2: &[(FaceVal, Value)],
        level: usize,
        ilevel: usize,
    ) -> bool {
        bs1.len() == bs2.len()
            && bs1
                .iter()
                .zip(bs2.iter())
                .all(|((phi1, t1), (phi2, t2))| phi1 == phi2 && self.check_eq(t1, t2, level, ilevel))
    }

    fn check_eq_vec(&self, vs1: &[Value], vs2: &[Value], level: usize, ilevel: usize) -> bool {
        vs1.len() == vs2.len() && vs1.iter().zip(vs2.iter()).all(|(v1, v2)| self.check_eq(v1, v2, level, ilevel))
    }
}

/// Decide definitional equality of two terms of the same context. Free
/// variables are compared by index; globals unfold when transparent.
pub fn is_def_eq(t1: &Rc<Term>, t2: &Rc<Term>, globals: &GlobalEnv, eta: bool) -> bool {
    let v1 = eval(t1, &Env::default(), globals);
    let v2 = eval(t2, &Env::default(), globals);
    DefEq::new(globals, eta).check_eq(&v1, &v2, 0, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn f() -> Rc<Term> {
        Term::global("f")
    }

    #[test]
    fn test_defeq_beta() {
        let env = GlobalEnv::new();
        // (\x. x) y == y
        let t1 = Term::app(Term::lam("x", Term::sort(0), Term::var(0)), Term::global("y"));
        assert!(is_def_eq(&t1, &Term::global("y"), &env, false));
    }

    #[test]
    fn test_binder_hints_are_irrelevant() {
        let env = GlobalEnv::new();
        let t1 = Term::lam("x", Term::sort(0), Term::var(0));
        let t2 = Term::lam("y", Term::sort(0), Term::var(0));
        assert!(is_def_eq(&t1, &t2, &env, false));
        let p1 = Term::pi("a", Term::sort(0), Term::var(0));
        let p2 = Term::pi("b", Term::sort(0), Term::var(0));
        assert!(is_def_eq(&p1, &p2, &env, false));
    }

    #[test]
    fn test_eta_for_functions_only_when_enabled() {
        let env = GlobalEnv::new();
        let eta = Term::lam("x", Term::sort(0), Term::app(f(), Term::var(0)));
        assert!(is_def_eq(&eta, &f(), &env, true));
        assert!(is_def_eq(&f(), &eta, &env, true));
        assert!(!is_def_eq(&eta, &f(), &env, false));
    }

    #[test]
    fn test_eta_for_pairs() {
        let env = GlobalEnv::new();
        let p = Term::global("p");
        let expanded = Term::pair(Term::fst(p.clone()), Term::snd(p.clone()));
        assert!(is_def_eq(&expanded, &p, &env, true));
        assert!(!is_def_eq(&expanded, &p, &env, false));
    }

    #[test]
    fn test_eta_for_paths() {
        let env = GlobalEnv::new();
        let p = Term::global("p");
        let expanded = Term::plam("i", Term::papp(p.clone(), Term::ivar(0)));
        assert!(is_def_eq(&expanded, &p, &env, true));
    }

    #[test]
    fn test_distinct_variables_differ() {
        let env = GlobalEnv::new();
        assert!(!is_def_eq(&Term::var(0), &Term::var(1), &env, true));
        assert!(!is_def_eq(&Term::sort(0), &Term::sort(1), &env, true));
        let k1 = Term::lam_bare("x", Term::lam_bare("y", Term::var(1)));
        let k2 = Term::lam_bare("x", Term::lam_bare("y", Term::var(0)));
        assert!(!is_def_eq(&k1, &k2, &env, false));
    }

    #[test]
    fn test_interval_endpoints() {
        let env = GlobalEnv::new();
        assert!(is_def_eq(&Term::i0(), &Term::i0(), &env, false));
        assert!(!is_def_eq(&Term::i0(), &Term::i1(), &env, false));
    }
}
