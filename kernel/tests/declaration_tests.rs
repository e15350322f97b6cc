//! Declaring inductives, mutual blocks and higher inductive types.

use hott_kernel::test_support::parse;
use hott_kernel::{
    normalize, ConstructorSpec, DeclarationError, ErrorKind, GlobalEnv, HitSpec, InductiveSpec, KernelConfig,
    MotiveLevel, PathConstructorSpec, Term,
};
use insta::assert_snapshot;
use std::rc::Rc;

fn t(src: &str) -> Rc<Term> {
    parse(src).unwrap_or_else(|err| panic!("bad test input {src:?}: {err}"))
}

fn ctor(name: &str, ty: &str) -> ConstructorSpec {
    ConstructorSpec::new(name, t(ty))
}

fn assert_absent(env: &GlobalEnv, names: &[&str]) {
    for name in names {
        assert!(!env.has(name), "{name} should have been rolled back");
    }
}

// =============================================================================
// ELIMINATOR GENERATION
// =============================================================================

#[test]
fn declared_nat_eliminator() {
    let mut env = GlobalEnv::new();
    env.declare_inductive(InductiveSpec::new(
        "MyNat",
        t("(sort 0)"),
        vec![ctor("mzero", "MyNat"), ctor("msucc", "(pi n MyNat MyNat)")],
        "myNatElim",
    ))
    .unwrap();
    let ty = env.lookup_type("myNatElim").unwrap();
    assert_snapshot!(
        ty.to_string(),
        @"(pi P (pi t MyNat (sort 0)) (pi case_mzero (app 0 mzero) (pi case_msucc (pi n MyNat (pi ih_n (app 2 0) (app 3 (app msucc 1)))) (pi t MyNat (app 3 0)))))"
    );
    assert_eq!(&env.order()[..], ["MyNat", "mzero", "msucc", "myNatElim"]);
}

#[test]
fn stdlib_unit_eliminator() {
    let env = GlobalEnv::with_stdlib().unwrap();
    let ty = env.lookup_type("unitElim").unwrap();
    assert_snapshot!(ty.to_string(), @"(pi P (pi t Unit (sort 0)) (pi case_tt (app 0 tt) (pi t Unit (app 2 0))))");
    assert!(env.has("emptyElim"));
    assert_eq!(env.inductive("Sum").unwrap().num_params, 2);
}

#[test]
fn motive_level_follows_configuration() {
    let big = || InductiveSpec::new("Big", t("(sort 1)"), vec![ctor("big", "Big")], "bigElim");

    let mut by_inductive = GlobalEnv::with_config(KernelConfig::default());
    by_inductive.declare_inductive(big()).unwrap();
    assert_snapshot!(
        by_inductive.lookup_type("bigElim").unwrap().to_string(),
        @"(pi P (pi t Big (sort 1)) (pi case_big (app 0 big) (pi t Big (app 2 0))))"
    );

    let mut by_zero = GlobalEnv::with_config(KernelConfig::default().with_motive_level(MotiveLevel::Zero));
    by_zero.declare_inductive(big()).unwrap();
    assert_snapshot!(
        by_zero.lookup_type("bigElim").unwrap().to_string(),
        @"(pi P (pi t Big (sort 0)) (pi case_big (app 0 big) (pi t Big (app 2 0))))"
    );
}

#[test]
fn indexed_family_eliminates() {
    let mut env = GlobalEnv::with_primitives();
    env.declare_inductive(InductiveSpec::new(
        "IsZero",
        t("(pi n Nat (sort 0))"),
        vec![ctor("isZero", "(app IsZero zero)")],
        "isZeroElim",
    ))
    .unwrap();
    let ind = env.inductive("IsZero").unwrap();
    assert_eq!((ind.num_params, ind.num_indices), (0, 1));
    assert_eq!(
        normalize(&t("(app isZeroElim P c zero isZero)"), &env),
        t("c")
    );
}

#[test]
fn clearing_the_registry_stops_iota() {
    let mut env = GlobalEnv::with_primitives();
    let redex = t("(app natElim P z s zero)");
    assert_eq!(normalize(&redex, &env), t("z"));
    env.clear_recursor_registry();
    assert_eq!(normalize(&redex, &env), redex);
}

// =============================================================================
// POSITIVITY AND MUTUAL BLOCKS
// =============================================================================

#[test]
fn negative_occurrence_is_rejected_and_rolled_back() {
    let mut env = GlobalEnv::with_primitives();
    let bad = InductiveSpec::new(
        "Bad",
        t("(sort 0)"),
        vec![ctor("mk", "(pi f (pi b Bad Nat) Bad)")],
        "badElim",
    );
    match env.declare_inductive(bad) {
        Err(DeclarationError::Positivity(err)) => {
            assert_eq!(err.ind, "Bad");
            assert_eq!(err.ctor, "mk");
            assert_eq!(err.position, 0);
        }
        other => panic!("expected a positivity error, got {other:?}"),
    }
    assert_absent(&env, &["Bad", "mk", "badElim"]);

    // The name is free again
    env.declare_inductive(InductiveSpec::new("Bad", t("(sort 0)"), vec![ctor("mk", "Bad")], "badElim"))
        .unwrap();
}

#[test]
fn mutual_tree_and_forest() {
    let mut env = GlobalEnv::new();
    env.declare_mutual(vec![
        InductiveSpec::new("Tree", t("(sort 0)"), vec![ctor("node", "(pi f Forest Tree)")], "treeElim"),
        InductiveSpec::new(
            "Forest",
            t("(sort 0)"),
            vec![ctor("fnil", "Forest"), ctor("fcons", "(pi x Tree (pi f Forest Forest))")],
            "forestElim",
        ),
    ])
    .unwrap();
    let group = Some(vec!["Tree".to_string(), "Forest".to_string()]);
    assert_eq!(env.inductive("Tree").unwrap().mutual_group, group);
    assert_eq!(env.inductive("Forest").unwrap().mutual_group, group);
    assert!(env.lookup_recursor("treeElim").is_some());
    assert!(env.lookup_recursor("forestElim").is_some());
}

#[test]
fn mutual_positive_occurrences_are_accepted() {
    let mut env = GlobalEnv::new();
    env.declare_mutual(vec![
        InductiveSpec::new("A", t("(sort 0)"), vec![ctor("mkA", "(pi b B A)")], "aElim"),
        InductiveSpec::new("B", t("(sort 0)"), vec![ctor("mkB", "(pi a A B)")], "bElim"),
    ])
    .unwrap();
    // B is a sibling, not A itself, so mkA's case gets no IH
    assert_snapshot!(
        env.lookup_type("aElim").unwrap().to_string(),
        @"(pi P (pi t A (sort 0)) (pi case_mkA (pi b B (app 1 (app mkA 0))) (pi t A (app 2 0))))"
    );
}

#[test]
fn mutual_negative_occurrence_is_rejected() {
    let mut env = GlobalEnv::with_primitives();
    let err = env
        .declare_mutual(vec![
            InductiveSpec::new("A", t("(sort 0)"), vec![ctor("mkA", "(pi f (pi b B Nat) A)")], "aElim"),
            InductiveSpec::new("B", t("(sort 0)"), vec![ctor("mkB", "B")], "bElim"),
        ])
        .unwrap_err();
    assert!(matches!(err, DeclarationError::Positivity(ref p) if p.ind == "B"), "{err}");
    assert_absent(&env, &["A", "B", "mkA", "mkB", "aElim", "bElim"]);
}

// =============================================================================
// SHAPE ERRORS
// =============================================================================

#[test]
fn constructor_must_return_its_inductive() {
    let mut env = GlobalEnv::with_primitives();
    let err = env
        .declare_inductive(InductiveSpec::new("T", t("(sort 0)"), vec![ctor("c", "Nat")], "tElim"))
        .unwrap_err();
    assert!(matches!(err, DeclarationError::Constructor { ref ctor, .. } if ctor == "c"), "{err}");
    assert_absent(&env, &["T", "c", "tElim"]);
}

#[test]
fn inductive_type_must_end_in_a_sort() {
    let mut env = GlobalEnv::with_primitives();
    let err = env
        .declare_inductive(InductiveSpec::new("T", t("Nat"), vec![], "tElim"))
        .unwrap_err();
    assert!(matches!(err, DeclarationError::Inductive { .. }), "{err}");
}

#[test]
fn names_must_be_fresh() {
    let mut env = GlobalEnv::with_primitives();
    let err = env
        .declare_inductive(InductiveSpec::new("Nat", t("(sort 0)"), vec![], "natElim2"))
        .unwrap_err();
    assert_eq!(err, DeclarationError::AlreadyDeclared("Nat".to_string()));

    let err = env
        .declare_inductive(InductiveSpec::new(
            "Two",
            t("(sort 0)"),
            vec![ctor("one", "Two"), ctor("one", "Two")],
            "twoElim",
        ))
        .unwrap_err();
    assert_eq!(err, DeclarationError::AlreadyDeclared("one".to_string()));
}

#[test]
fn axioms_must_be_types() {
    let mut env = GlobalEnv::with_primitives();
    match env.declare_axiom("z", t("zero")) {
        Err(DeclarationError::Type(err)) => assert_eq!(err.kind, ErrorKind::NotAType),
        other => panic!("expected a type error, got {other:?}"),
    }
}

// =============================================================================
// HIGHER INDUCTIVE TYPES
// =============================================================================

fn segment(boundary: (&str, &str), level: usize) -> HitSpec {
    HitSpec {
        name: "Seg".to_string(),
        ty: t("(sort 0)"),
        constructors: vec![ctor("left", "Seg"), ctor("right", "Seg")],
        path_constructors: vec![PathConstructorSpec::new(
            "seg",
            t("(path Seg left right)"),
            level,
            vec![(t(boundary.0), t(boundary.1))],
        )],
        eliminator: "segElim".to_string(),
    }
}

#[test]
fn interval_hit_declares_and_computes() {
    let mut env = GlobalEnv::new();
    env.declare_hit(segment(("left", "right"), 1)).unwrap();
    assert!(env.inductive("Seg").unwrap().is_hit);
    assert_eq!(normalize(&t("(app segElim P l r s right)"), &env), t("r"));
    assert_eq!(normalize(&t("(hit Seg seg () (i1))"), &env), t("right"));
    assert_eq!(
        normalize(&t("(plam i (app segElim P l r s (hit Seg seg () ((ivar 0)))))"), &env),
        t("(plam i (papp s (ivar 0)))")
    );
}

#[test]
fn boundary_must_match_the_path_type() {
    let mut env = GlobalEnv::new();
    let err = env.declare_hit(segment(("left", "left"), 1)).unwrap_err();
    assert!(matches!(err, DeclarationError::PathConstructor { ref ctor, .. } if ctor == "seg"), "{err}");
    assert_absent(&env, &["Seg", "left", "right", "segElim"]);
}

#[test]
fn boundary_count_must_match_the_level() {
    let mut env = GlobalEnv::new();
    let err = env.declare_hit(segment(("left", "right"), 2)).unwrap_err();
    assert!(matches!(err, DeclarationError::PathConstructor { .. }), "{err}");
}

#[test]
fn path_constructor_must_return_a_path() {
    let mut env = GlobalEnv::new();
    let mut spec = segment(("left", "right"), 1);
    spec.path_constructors[0].ty = t("Seg");
    let err = env.declare_hit(spec).unwrap_err();
    assert!(matches!(err, DeclarationError::PathConstructor { .. }), "{err}");
    assert_absent(&env, &["Seg", "left", "right"]);
}
