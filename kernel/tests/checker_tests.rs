//! Positive checking scenarios over the built-in environments.
//!
//! Terms are written in the s-expression syntax of `test_support` where that
//! keeps them readable.

use hott_kernel::test_support::parse;
use hott_kernel::{
    is_def_eq, normalize, Checker, ConstructorSpec, Context, GlobalEnv, InductiveSpec, KernelConfig, Span, Term,
    Transparency,
};
use std::rc::Rc;

fn t(src: &str) -> Rc<Term> {
    parse(src).unwrap_or_else(|err| panic!("bad test input {src:?}: {err}"))
}

fn synth(env: &GlobalEnv, src: &str) -> Rc<Term> {
    Checker::new(env)
        .synth(&Context::new(), &Span::none(), &t(src))
        .unwrap_or_else(|err| panic!("{src} failed to synthesize: {err}"))
}

fn check(env: &GlobalEnv, src: &str, ty: &str) {
    Checker::new(env)
        .check(&Context::new(), &Span::none(), &t(src), &t(ty))
        .unwrap_or_else(|err| panic!("{src} failed to check against {ty}: {err}"));
}

// =============================================================================
// FUNCTIONS AND PAIRS
// =============================================================================

#[test]
fn identity_on_nat() {
    let env = GlobalEnv::with_primitives();
    check(&env, "(lam x Nat 0)", "(pi x Nat Nat)");
    assert_eq!(synth(&env, "(lam x Nat 0)"), t("(pi x Nat Nat)"));
}

#[test]
fn succ_zero_is_a_nat() {
    let env = GlobalEnv::with_primitives();
    assert_eq!(synth(&env, "(app succ zero)"), t("Nat"));
}

#[test]
fn unannotated_lambda_in_argument_position() {
    let env = GlobalEnv::with_primitives();
    // natElim (λ_. Nat) zero (λn ih. succ ih) (succ zero)
    let src = "(app natElim (lam _ Nat Nat) zero (lam n _ (lam ih _ (app succ 0))) (app succ zero))";
    let ty = synth(&env, src);
    assert!(is_def_eq(&ty, &t("Nat"), &env, false));
    assert_eq!(normalize(&t(src), &env), t("(app succ zero)"));
}

#[test]
fn dependent_pairs() {
    let env = GlobalEnv::with_primitives();
    check(&env, "(pair zero true)", "(sigma n Nat Bool)");
    assert_eq!(synth(&env, "(fst (pair zero true))"), t("Nat"));
    // Non-dependent second component
    assert_eq!(synth(&env, "(snd (pair zero true))"), t("Bool"));
}

#[test]
fn let_bindings_substitute_into_the_body_type() {
    let env = GlobalEnv::with_primitives();
    assert_eq!(synth(&env, "(let x Nat zero (app succ 0))"), t("Nat"));
    assert_eq!(synth(&env, "(let x _ true 0)"), t("Bool"));
}

#[test]
fn polymorphic_identity_applied() {
    let env = GlobalEnv::with_primitives();
    let ty = synth(&env, "(app (lam A (sort 0) (lam x 0 0)) Nat zero)");
    assert!(is_def_eq(&ty, &t("Nat"), &env, false));
}

#[test]
fn definitions_unfold_during_conversion() {
    let mut env = GlobalEnv::with_primitives();
    env.declare_definition("one", t("Nat"), t("(app succ zero)"), Transparency::Transparent)
        .unwrap();
    env.declare_definition("sealed", t("Nat"), t("(app succ zero)"), Transparency::Opaque)
        .unwrap();
    assert!(is_def_eq(&t("one"), &t("(app succ zero)"), &env, false));
    assert!(!is_def_eq(&t("sealed"), &t("(app succ zero)"), &env, false));
    check(&env, "(refl Nat one)", "(id Nat one (app succ zero))");
}

#[test]
fn eta_follows_the_configuration() {
    let mut env = GlobalEnv::with_primitives();
    env.declare_axiom("f", t("(pi x Nat Nat)")).unwrap();
    let refl = t("(refl (pi x Nat Nat) f)");
    let ty = t("(id (pi x Nat Nat) f (lam x Nat (app f 0)))");

    let ctx = Context::new();
    assert!(Checker::new_with_eta(&env, true)
        .check(&ctx, &Span::none(), &refl, &ty)
        .is_ok());
    assert!(Checker::new_with_eta(&env, false)
        .check(&ctx, &Span::none(), &refl, &ty)
        .is_err());

    let eta_env = GlobalEnv::with_config(KernelConfig::default().with_eta(true));
    assert!(Checker::new(&eta_env).globals().config().eta);
}

// =============================================================================
// USER INDUCTIVES
// =============================================================================

#[test]
fn declared_bool_eliminates() {
    let mut env = GlobalEnv::with_primitives();
    env.declare_inductive(InductiveSpec::new(
        "Flag",
        t("(sort 0)"),
        vec![
            ConstructorSpec::new("on", t("Flag")),
            ConstructorSpec::new("off", t("Flag")),
        ],
        "flagElim",
    ))
    .unwrap();

    let src = "(app flagElim (lam _ Flag Nat) zero (app succ zero) off)";
    let ty = synth(&env, src);
    assert!(is_def_eq(&ty, &t("Nat"), &env, false));
    assert_eq!(normalize(&t(src), &env), t("(app succ zero)"));
    assert_eq!(
        normalize(&t("(app flagElim (lam _ Flag Nat) zero (app succ zero) on)"), &env),
        t("zero")
    );
}

#[test]
fn list_length_by_elimination() {
    let env = GlobalEnv::with_stdlib().unwrap();
    // listElim Nat (λ_. Nat) zero (λx xs ih. succ ih) [true, false] with A = Bool
    let len = "(app listElim Bool (lam _ (app List Bool) Nat) zero \
               (lam x Bool (lam xs (app List Bool) (lam ih Nat (app succ 0)))) \
               (app cons Bool true (app cons Bool false (app nil Bool))))";
    let ty = synth(&env, len);
    assert!(is_def_eq(&ty, &t("Nat"), &env, false));
    assert_eq!(normalize(&t(len), &env), t("(app succ (app succ zero))"));
}

// =============================================================================
// IDENTITY TYPE
// =============================================================================

#[test]
fn j_on_refl_computes() {
    let env = GlobalEnv::with_primitives();
    let motive = "(lam y Nat (lam p (id Nat zero 0) Nat))";
    let src = format!("(J Nat {motive} (app succ zero) zero zero (refl Nat zero))");
    let ty = synth(&env, &src);
    assert!(is_def_eq(&ty, &t("Nat"), &env, false));
    assert_eq!(normalize(&t(&src), &env), t("(app succ zero)"));
}

#[test]
fn j_accepts_an_unannotated_motive() {
    let env = GlobalEnv::with_primitives();
    let src = "(J Nat (lam y _ (lam p _ Nat)) zero zero zero (refl Nat zero))";
    let ty = synth(&env, src);
    assert!(is_def_eq(&ty, &t("Nat"), &env, false));
}
