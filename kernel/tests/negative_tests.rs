//! Negative tests for the kernel: every term here MUST be rejected.
//!
//! Each test pins the error kind so the categories stay stable.

use hott_kernel::test_support::parse;
use hott_kernel::{Checker, Context, ErrorKind, GlobalEnv, Span, Term, TypeError};
use insta::assert_snapshot;
use std::rc::Rc;

fn t(src: &str) -> Rc<Term> {
    parse(src).unwrap_or_else(|err| panic!("bad test input {src:?}: {err}"))
}

fn synth_err(env: &GlobalEnv, src: &str) -> TypeError {
    match Checker::new(env).synth(&Context::new(), &Span::none(), &t(src)) {
        Ok(ty) => panic!("{src} should be rejected, got type {ty}"),
        Err(err) => err,
    }
}

fn check_err(env: &GlobalEnv, src: &str, ty: &str) -> TypeError {
    match Checker::new(env).check(&Context::new(), &Span::none(), &t(src), &t(ty)) {
        Ok(()) => panic!("{src} should not check against {ty}"),
        Err(err) => err,
    }
}

// =============================================================================
// TYPE MISMATCH ERRORS
// =============================================================================

/// Applying a universe to anything fails
#[test]
fn negative_apply_non_function() {
    let env = GlobalEnv::new();
    let err = synth_err(&env, "(app (sort 0) (sort 0))");
    assert_eq!(err.kind, ErrorKind::NotAFunction);
}

/// Nat and Bool are distinct
#[test]
fn negative_type_mismatch_in_app() {
    let env = GlobalEnv::with_primitives();
    let err = synth_err(&env, "(app succ true)");
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
    assert!(err.to_string().contains("Nat"), "{err}");
}

#[test]
fn negative_lambda_annotation_disagrees() {
    let env = GlobalEnv::with_primitives();
    let err = check_err(&env, "(lam x Bool 0)", "(pi x Nat Nat)");
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
}

#[test]
fn negative_refl_between_distinct_numerals() {
    let env = GlobalEnv::with_primitives();
    let err = check_err(&env, "(refl Nat zero)", "(id Nat zero (app succ zero))");
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
}

#[test]
fn negative_j_with_mismatched_proof() {
    let env = GlobalEnv::with_primitives();
    // p proves zero = zero but y is succ zero
    let err = synth_err(
        &env,
        "(J Nat (lam y Nat (lam p (id Nat zero 0) Nat)) zero zero (app succ zero) (refl Nat zero))",
    );
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
}

// =============================================================================
// SHAPE ERRORS
// =============================================================================

#[test]
fn negative_projection_of_non_pair() {
    let env = GlobalEnv::with_primitives();
    assert_eq!(synth_err(&env, "(fst zero)").kind, ErrorKind::NotAPair);
    assert_eq!(synth_err(&env, "(snd true)").kind, ErrorKind::NotAPair);
}

#[test]
fn negative_path_application_of_non_path() {
    let env = GlobalEnv::with_primitives();
    let err = synth_err(&env, "(papp zero i0)");
    assert!(err.message.contains("path"), "{err}");
}

#[test]
fn negative_pi_over_a_term() {
    let env = GlobalEnv::with_primitives();
    let err = synth_err(&env, "(pi x zero Nat)");
    assert_eq!(err.kind, ErrorKind::NotAType);
}

#[test]
fn negative_interval_argument_must_be_interval() {
    let mut env = GlobalEnv::with_primitives();
    env.declare_axiom("p", t("(path Nat zero zero)")).unwrap();
    let err = synth_err(&env, "(papp p zero)");
    assert_eq!(err.kind, ErrorKind::TypeMismatch);
}

// =============================================================================
// SCOPE ERRORS
// =============================================================================

#[test]
fn negative_unbound_variable() {
    let env = GlobalEnv::new();
    let err = synth_err(&env, "0");
    assert_eq!(err.kind, ErrorKind::UnboundVariable);
}

#[test]
fn negative_unknown_global() {
    let env = GlobalEnv::new();
    let err = synth_err(&env, "nowhere");
    assert_eq!(err.kind, ErrorKind::UnknownGlobal);
}

#[test]
fn negative_unknown_path_constructor() {
    let env = GlobalEnv::with_primitives();
    let err = synth_err(&env, "(hit S1 loop () (i0))");
    assert_eq!(err.kind, ErrorKind::UnknownGlobal);
}

#[test]
fn negative_interval_variable_escapes_its_binder() {
    let env = GlobalEnv::with_primitives();
    let err = synth_err(&env, "(pair (plam i zero) (ivar 0))");
    assert_eq!(err.kind, ErrorKind::UnboundVariable);
}

// =============================================================================
// INFERENCE LIMITS
// =============================================================================

#[test]
fn negative_cannot_infer_bare_lambda() {
    let env = GlobalEnv::with_primitives();
    assert_eq!(synth_err(&env, "(lam x _ 0)").kind, ErrorKind::CannotInfer);
}

#[test]
fn negative_cannot_infer_empty_system() {
    let env = GlobalEnv::with_primitives();
    assert_eq!(synth_err(&env, "(system)").kind, ErrorKind::CannotInfer);
}

#[test]
fn negative_errors_carry_the_innermost_span() {
    let env = GlobalEnv::with_primitives();
    let at = Span::lines("input.htt", 2, 7, 2, 11);
    let term = Term::app(Term::global("succ"), Term::spanned(at.clone(), Term::global("true")));
    let err = Checker::new(&env)
        .synth(&Context::new(), &Span::none(), &term)
        .unwrap_err();
    assert_eq!(err.span, at);
    assert_snapshot!(err.to_string(), @"input.htt:2:7-11: type mismatch: expected Nat, got Bool");
}
