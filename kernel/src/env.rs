use crate::ast::{app_spine, pi_telescope, Level, Term};
use crate::checker::Checker;
use crate::config::{KernelConfig, MotiveLevel};
use crate::context::Context;
use crate::conv::is_def_eq;
use crate::error::{DeclarationError, TypeError};
use crate::positivity::check_constructor;
use crate::recursor::{eliminator_type, RecursorInfo, RecursorRegistry};
use crate::span::Span;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tracing::{debug, instrument};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transparency {
    #[default]
    Transparent,
    Opaque,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Constructor {
    pub name: String,
    pub ty: Rc<Term>,
    /// Data arguments, parameters excluded
    pub num_args: usize,
}

impl Constructor {
    pub fn new(name: impl Into<String>, ty: Rc<Term>, num_args: usize) -> Self {
        Constructor {
            name: name.into(),
            ty,
            num_args,
        }
    }
}

/// A path constructor of a higher inductive type. `boundaries[k]` holds the
/// terms it reduces to when its `k`-th interval argument is `i0` / `i1`,
/// written over `[params, args]`.
#[derive(Debug, Clone, PartialEq)]
pub struct PathConstructor {
    pub name: String,
    pub ty: Rc<Term>,
    pub level: usize,
    pub num_args: usize,
    pub boundaries: Vec<(Rc<Term>, Rc<Term>)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inductive {
    pub name: String,
    pub ty: Rc<Term>,
    pub num_params: usize,
    pub param_types: Vec<(String, Rc<Term>)>,
    pub num_indices: usize,
    /// Index `k` is written over `[params, indices < k]`
    pub index_types: Vec<(String, Rc<Term>)>,
    pub constructors: Vec<Constructor>,
    pub eliminator_name: String,
    pub path_ctors: Vec<PathConstructor>,
    pub is_hit: bool,
    /// Highest path constructor dimension, 0 for ordinary inductives
    pub max_level: usize,
    /// Universe the inductive lives in
    pub level: Level,
    pub mutual_group: Option<Vec<String>>,
}

impl Inductive {
    /// An inductive without parameters or indices.
    pub fn simple(
        name: impl Into<String>,
        ty: Rc<Term>,
        constructors: Vec<Constructor>,
        eliminator_name: impl Into<String>,
    ) -> Self {
        let level = sort_level(&ty).unwrap_or(0);
        Inductive {
            name: name.into(),
            ty,
            num_params: 0,
            param_types: Vec::new(),
            num_indices: 0,
            index_types: Vec::new(),
            constructors,
            eliminator_name: eliminator_name.into(),
            path_ctors: Vec::new(),
            is_hit: false,
            max_level: 0,
            level,
            mutual_group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Declaration {
    Axiom {
        ty: Rc<Term>,
    },
    Definition {
        ty: Rc<Term>,
        body: Rc<Term>,
        transparency: Transparency,
    },
    /// Type only; any computation comes from the recursor registry
    Primitive {
        ty: Rc<Term>,
    },
    Inductive(Inductive),
    Constructor {
        ind: String,
        ty: Rc<Term>,
        num_args: usize,
    },
}

impl Declaration {
    pub fn ty(&self) -> &Rc<Term> {
        match self {
            Declaration::Axiom { ty }
            | Declaration::Definition { ty, .. }
            | Declaration::Primitive { ty }
            | Declaration::Constructor { ty, .. } => ty,
            Declaration::Inductive(ind) => &ind.ty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstructorSpec {
    pub name: String,
    pub ty: Rc<Term>,
}

impl ConstructorSpec {
    pub fn new(name: impl Into<String>, ty: Rc<Term>) -> Self {
        ConstructorSpec { name: name.into(), ty }
    }
}

/// Input to [`GlobalEnv::declare_inductive`] and [`GlobalEnv::declare_mutual`].
#[derive(Debug, Clone)]
pub struct InductiveSpec {
    pub name: String,
    pub ty: Rc<Term>,
    pub constructors: Vec<ConstructorSpec>,
    pub eliminator: String,
}

impl InductiveSpec {
    pub fn new(
        name: impl Into<String>,
        ty: Rc<Term>,
        constructors: Vec<ConstructorSpec>,
        eliminator: impl Into<String>,
    ) -> Self {
        InductiveSpec {
            name: name.into(),
            ty,
            constructors,
            eliminator: eliminator.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PathConstructorSpec {
    pub name: String,
    pub ty: Rc<Term>,
    pub level: usize,
    pub boundaries: Vec<(Rc<Term>, Rc<Term>)>,
}

impl PathConstructorSpec {
    pub fn new(name: impl Into<String>, ty: Rc<Term>, level: usize, boundaries: Vec<(Rc<Term>, Rc<Term>)>) -> Self {
        PathConstructorSpec {
            name: name.into(),
            ty,
            level,
            boundaries,
        }
    }
}

/// Input to [`GlobalEnv::declare_hit`].
#[derive(Debug, Clone)]
pub struct HitSpec {
    pub name: String,
    pub ty: Rc<Term>,
    pub constructors: Vec<ConstructorSpec>,
    pub path_constructors: Vec<PathConstructorSpec>,
    pub eliminator: String,
}

/// One member of a declaration group: its point part and its path constructors.
type Member = (InductiveSpec, Vec<PathConstructorSpec>);

fn sort_level(ty: &Rc<Term>) -> Option<Level> {
    match &**Term::unspanned(&pi_telescope(ty).1) {
        Term::Sort(l) => Some(*l),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct GlobalEnv {
    decls: HashMap<String, Declaration>,
    order: Vec<String>,
    recursors: RecursorRegistry,
    config: KernelConfig,
}

impl Default for GlobalEnv {
    fn default() -> Self {
        GlobalEnv::new()
    }
}

impl GlobalEnv {
    pub fn new() -> Self {
        GlobalEnv::with_config(KernelConfig::from_env())
    }

    pub fn with_config(config: KernelConfig) -> Self {
        GlobalEnv {
            decls: HashMap::new(),
            order: Vec::new(),
            recursors: RecursorRegistry::new(),
            config,
        }
    }

    pub fn config(&self) -> KernelConfig {
        self.config
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    pub fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.decls.get(name)
    }

    pub fn lookup_type(&self, name: &str) -> Option<&Rc<Term>> {
        self.decls.get(name).map(Declaration::ty)
    }

    /// Body of a transparent definition. Everything else is opaque to the
    /// evaluator.
    pub fn lookup_definition_body(&self, name: &str) -> Option<&Rc<Term>> {
        match self.decls.get(name) {
            Some(Declaration::Definition {
                body,
                transparency: Transparency::Transparent,
                ..
            }) => Some(body),
            _ => None,
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Declaration names, oldest first.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn inductive(&self, name: &str) -> Option<&Inductive> {
        match self.decls.get(name) {
            Some(Declaration::Inductive(ind)) => Some(ind),
            _ => None,
        }
    }

    pub fn path_constructor(&self, hit: &str, ctor: &str) -> Option<&PathConstructor> {
        self.inductive(hit)?.path_ctors.iter().find(|pc| pc.name == ctor)
    }

    pub fn register_recursor(&mut self, info: RecursorInfo) {
        self.recursors.register(info);
    }

    pub fn lookup_recursor(&self, elim_name: &str) -> Option<&RecursorInfo> {
        self.recursors.lookup(elim_name)
    }

    pub fn clear_recursor_registry(&mut self) {
        self.recursors.clear();
    }

    fn insert(&mut self, name: &str, decl: Declaration) {
        self.decls.insert(name.to_string(), decl);
        self.order.push(name.to_string());
    }

    fn remove(&mut self, names: &[String]) {
        for name in names {
            self.decls.remove(name);
        }
        self.order.retain(|n| !names.contains(n));
    }

    fn ensure_fresh(&self, name: &str) -> Result<(), DeclarationError> {
        if self.has(name) {
            Err(DeclarationError::AlreadyDeclared(name.to_string()))
        } else {
            Ok(())
        }
    }

    fn motive_level(&self, ind: &Inductive) -> Level {
        match self.config.motive_level {
            MotiveLevel::Zero => 0,
            MotiveLevel::Inductive => ind.level,
        }
    }

    // =========================================================================
    // Unchecked additions
    // =========================================================================

    pub fn add_axiom(&mut self, name: &str, ty: Rc<Term>) -> Result<(), DeclarationError> {
        self.ensure_fresh(name)?;
        self.insert(name, Declaration::Axiom { ty });
        Ok(())
    }

    pub fn add_definition(
        &mut self,
        name: &str,
        ty: Rc<Term>,
        body: Rc<Term>,
        transparency: Transparency,
    ) -> Result<(), DeclarationError> {
        self.ensure_fresh(name)?;
        self.insert(name, Declaration::Definition { ty, body, transparency });
        Ok(())
    }

    pub fn add_primitive(&mut self, name: &str, ty: Rc<Term>) -> Result<(), DeclarationError> {
        self.ensure_fresh(name)?;
        self.insert(name, Declaration::Primitive { ty });
        Ok(())
    }

    /// Install an inductive, its constructors, and its eliminator without
    /// checking anything beyond name freshness.
    pub fn add_inductive(
        &mut self,
        name: &str,
        ty: Rc<Term>,
        constructors: Vec<(String, Rc<Term>)>,
        elim_name: &str,
    ) -> Result<(), DeclarationError> {
        let spec = InductiveSpec {
            name: name.to_string(),
            ty,
            constructors: constructors
                .into_iter()
                .map(|(name, ty)| ConstructorSpec { name, ty })
                .collect(),
            eliminator: elim_name.to_string(),
        };
        self.fresh_group(&[(spec.clone(), Vec::new())])?;
        let ind = self.build_inductive(&spec, &[], None);
        let elim_ty = eliminator_type(&ind, self.motive_level(&ind))?;
        self.install(ind, elim_ty);
        Ok(())
    }

    // =========================================================================
    // Validated declarations
    // =========================================================================

    #[instrument(level = "trace", skip(self, ty), fields(ty = %ty))]
    pub fn declare_axiom(&mut self, name: &str, ty: Rc<Term>) -> Result<(), DeclarationError> {
        self.ensure_fresh(name)?;
        Checker::with_config(self, self.config).check_is_type(&Context::new(), &Span::none(), &ty)?;
        self.insert(name, Declaration::Axiom { ty });
        debug!(name, "declared axiom");
        Ok(())
    }

    #[instrument(level = "trace", skip(self, ty, body), fields(ty = %ty))]
    pub fn declare_definition(
        &mut self,
        name: &str,
        ty: Rc<Term>,
        body: Rc<Term>,
        transparency: Transparency,
    ) -> Result<(), DeclarationError> {
        self.ensure_fresh(name)?;
        if body.mentions_global(name) {
            return Err(TypeError::occurs_check(&Span::none(), name, body).into());
        }
        let checker = Checker::with_config(self, self.config);
        let ctx = Context::new();
        checker.check_is_type(&ctx, &Span::none(), &ty)?;
        checker.check(&ctx, &Span::none(), &body, &ty)?;
        self.insert(name, Declaration::Definition { ty, body, transparency });
        debug!(name, ?transparency, "declared definition");
        Ok(())
    }

    pub fn declare_inductive(&mut self, spec: InductiveSpec) -> Result<(), DeclarationError> {
        self.declare_mutual(vec![spec])
    }

    #[instrument(level = "trace", skip_all, fields(members = specs.len()))]
    pub fn declare_mutual(&mut self, specs: Vec<InductiveSpec>) -> Result<(), DeclarationError> {
        let members: Vec<Member> = specs.into_iter().map(|spec| (spec, Vec::new())).collect();
        self.declare_group(&members)
    }

    #[instrument(level = "trace", skip_all, fields(name = %spec.name))]
    pub fn declare_hit(&mut self, spec: HitSpec) -> Result<(), DeclarationError> {
        let HitSpec {
            name,
            ty,
            constructors,
            path_constructors,
            eliminator,
        } = spec;
        let point = InductiveSpec {
            name,
            ty,
            constructors,
            eliminator,
        };
        self.declare_group(&[(point, path_constructors)])
    }

    fn fresh_group(&self, members: &[Member]) -> Result<(), DeclarationError> {
        let mut seen = HashSet::new();
        for (spec, paths) in members {
            let names = std::iter::once(&spec.name)
                .chain(std::iter::once(&spec.eliminator))
                .chain(spec.constructors.iter().map(|c| &c.name))
                .chain(paths.iter().map(|p| &p.name));
            for name in names {
                if !seen.insert(name.clone()) {
                    return Err(DeclarationError::AlreadyDeclared(name.clone()));
                }
                self.ensure_fresh(name)?;
            }
        }
        Ok(())
    }

    fn declare_group(&mut self, members: &[Member]) -> Result<(), DeclarationError> {
        self.fresh_group(members)?;
        {
            let checker = Checker::with_config(self, self.config);
            for (spec, _) in members {
                checker.check_is_type(&Context::new(), &Span::none(), &spec.ty)?;
                if sort_level(&spec.ty).is_none() {
                    return Err(DeclarationError::inductive(&spec.name, "type must end in a sort"));
                }
            }
        }

        let mut provisional = Vec::new();
        let checked = self.check_group(members, &mut provisional);
        self.remove(&provisional);
        let installs = match checked {
            Ok(installs) => installs,
            Err(err) => {
                debug!(removed = provisional.len(), %err, "rolled back provisional declarations");
                return Err(err);
            }
        };
        for (ind, elim_ty) in installs {
            self.install(ind, elim_ty);
        }
        Ok(())
    }

    /// Everything that needs the members in scope. Every name added here is
    /// recorded in `provisional` so the caller can remove it again.
    fn check_group(
        &mut self,
        members: &[Member],
        provisional: &mut Vec<String>,
    ) -> Result<Vec<(Inductive, Rc<Term>)>, DeclarationError> {
        let group: Vec<String> = members.iter().map(|(spec, _)| spec.name.clone()).collect();
        for (spec, _) in members {
            self.insert(&spec.name, Declaration::Axiom { ty: spec.ty.clone() });
            provisional.push(spec.name.clone());
        }

        for (spec, _) in members {
            let arity = pi_telescope(&spec.ty).0.len();
            let checker = Checker::with_config(self, self.config);
            for ctor in &spec.constructors {
                checker
                    .check_is_type(&Context::new(), &Span::none(), &ctor.ty)
                    .map_err(|err| DeclarationError::constructor(&spec.name, &ctor.name, err.message))?;
                check_constructor_result(spec, ctor, arity)?;
                check_constructor(&group, &ctor.name, &ctor.ty)?;
            }
        }

        if members.iter().any(|(_, paths)| !paths.is_empty()) {
            // Path constructor types mention the point constructors.
            for (spec, _) in members {
                for ctor in &spec.constructors {
                    self.insert(&ctor.name, Declaration::Axiom { ty: ctor.ty.clone() });
                    provisional.push(ctor.name.clone());
                }
            }
            for (spec, paths) in members {
                for pc in paths {
                    self.check_path_constructor(spec, pc)?;
                    check_constructor(&group, &pc.name, &pc.ty)?;
                }
            }
        }

        let mutual_group = (group.len() > 1).then(|| group.clone());
        let mut installs = Vec::new();
        for (spec, paths) in members {
            let ind = self.build_inductive(spec, paths, mutual_group.clone());
            if ind.is_hit && ind.num_indices > 0 {
                return Err(DeclarationError::inductive(
                    &spec.name,
                    "higher inductive types cannot have indices",
                ));
            }
            let elim_ty = eliminator_type(&ind, self.motive_level(&ind))?;
            installs.push((ind, elim_ty));
        }
        Ok(installs)
    }

    fn check_path_constructor(&self, spec: &InductiveSpec, pc: &PathConstructorSpec) -> Result<(), DeclarationError> {
        let fail = |message: String| DeclarationError::path_constructor(&spec.name, &pc.name, message);
        if pc.level == 0 {
            return Err(fail("path constructors have level at least 1".to_string()));
        }
        if pc.boundaries.len() != pc.level {
            return Err(fail(format!(
                "level {} needs {} boundary pairs, got {}",
                pc.level,
                pc.level,
                pc.boundaries.len()
            )));
        }
        Checker::with_config(self, self.config)
            .check_is_type(&Context::new(), &Span::none(), &pc.ty)
            .map_err(|err| fail(err.message))?;

        let (_, result) = pi_telescope(&pc.ty);
        let (family, x, y) = match &**Term::unspanned(&result) {
            Term::Path(a, x, y) | Term::PathP(a, x, y) => (a.clone(), x.clone(), y.clone()),
            _ => return Err(fail(format!("must return a path type, got {}", result))),
        };
        if !family.mentions_global(&spec.name) {
            return Err(fail(format!("path type {} does not mention {}", family, spec.name)));
        }
        if pc.level == 1 {
            let (at0, at1) = &pc.boundaries[0];
            for (declared, endpoint) in [(at0, &x), (at1, &y)] {
                if !is_def_eq(declared, endpoint, self, false) {
                    return Err(fail(format!(
                        "boundary {} does not match path endpoint {}",
                        declared, endpoint
                    )));
                }
            }
        }
        Ok(())
    }

    /// Assemble the inductive record. Parameters are the longest prefix of
    /// the type's telescope that every constructor binds with the same types
    /// and passes through unchanged to its result.
    fn build_inductive(
        &self,
        spec: &InductiveSpec,
        paths: &[PathConstructorSpec],
        mutual_group: Option<Vec<String>>,
    ) -> Inductive {
        let (tele, _) = pi_telescope(&spec.ty);
        let ctor_teles: Vec<_> = spec.constructors.iter().map(|c| pi_telescope(&c.ty)).collect();
        let path_teles: Vec<_> = paths.iter().map(|p| pi_telescope(&p.ty).0).collect();

        let mut num_params = 0;
        while num_params < tele.len() {
            let p = num_params;
            let param_ty = &tele[p].1;
            let binds = |binders: &[(String, Rc<Term>)]| {
                binders
                    .get(p)
                    .is_some_and(|(_, ty)| is_def_eq(ty, param_ty, self, false))
            };
            let passes = ctor_teles.iter().all(|(binders, result)| {
                let (_, spine) = app_spine(result);
                let through = matches!(
                    spine.get(p).map(|arg| &**Term::unspanned(arg)),
                    Some(Term::Var(ix)) if *ix + p + 1 == binders.len()
                );
                binds(binders) && through
            }) && path_teles.iter().all(|binders| binds(binders));
            if !passes {
                break;
            }
            num_params += 1;
        }

        let constructors = spec
            .constructors
            .iter()
            .zip(&ctor_teles)
            .map(|(c, (binders, _))| Constructor::new(&c.name, c.ty.clone(), binders.len() - num_params))
            .collect();
        let path_ctors: Vec<PathConstructor> = paths
            .iter()
            .zip(&path_teles)
            .map(|(p, binders)| PathConstructor {
                name: p.name.clone(),
                ty: p.ty.clone(),
                level: p.level,
                num_args: binders.len().saturating_sub(num_params),
                boundaries: p.boundaries.clone(),
            })
            .collect();
        Inductive {
            name: spec.name.clone(),
            ty: spec.ty.clone(),
            num_params,
            param_types: tele[..num_params].to_vec(),
            num_indices: tele.len() - num_params,
            index_types: tele[num_params..].to_vec(),
            constructors,
            eliminator_name: spec.eliminator.clone(),
            is_hit: !path_ctors.is_empty(),
            max_level: path_ctors.iter().map(|p| p.level).max().unwrap_or(0),
            path_ctors,
            level: sort_level(&spec.ty).unwrap_or(0),
            mutual_group,
        }
    }

    fn install(&mut self, ind: Inductive, elim_ty: Rc<Term>) {
        debug!(
            name = %ind.name,
            constructors = ind.constructors.len(),
            path_constructors = ind.path_ctors.len(),
            eliminator = %ind.eliminator_name,
            "declared inductive"
        );
        self.recursors.register(RecursorInfo::for_inductive(&ind));
        let name = ind.name.clone();
        let elim_name = ind.eliminator_name.clone();
        let ctors: Vec<_> = ind
            .constructors
            .iter()
            .map(|ctor| {
                let decl = Declaration::Constructor {
                    ind: name.clone(),
                    ty: ctor.ty.clone(),
                    num_args: ctor.num_args,
                };
                (ctor.name.clone(), decl)
            })
            .collect();
        self.insert(&name, Declaration::Inductive(ind));
        for (ctor_name, decl) in ctors {
            self.insert(&ctor_name, decl);
        }
        self.insert(&elim_name, Declaration::Primitive { ty: elim_ty });
    }

    // =========================================================================
    // Built-in environments
    // =========================================================================

    /// `Nat`, `zero`, `succ`, `natElim`, `Bool`, `true`, `false`, `boolElim`.
    pub fn with_primitives() -> Self {
        let mut env = GlobalEnv::new();
        env.install_primitives();
        env
    }

    fn install_primitives(&mut self) {
        let nat = || Term::global("Nat");
        let nat_ind = Inductive::simple(
            "Nat",
            Term::sort(0),
            vec![
                Constructor::new("zero", nat(), 0),
                Constructor::new("succ", Term::pi("n", nat(), nat()), 1),
            ],
            "natElim",
        );
        // Π(P : Nat -> Sort 0). P zero -> (Π(n:Nat). P n -> P (succ n)) -> Π(t:Nat). P t
        let nat_elim = Term::pi(
            "P",
            Term::pi("t", nat(), Term::sort(0)),
            Term::pi(
                "case_zero",
                Term::app(Term::var(0), Term::global("zero")),
                Term::pi(
                    "case_succ",
                    Term::pi(
                        "n",
                        nat(),
                        Term::pi(
                            "ih_n",
                            Term::app(Term::var(2), Term::var(0)),
                            Term::app(Term::var(3), Term::app(Term::global("succ"), Term::var(1))),
                        ),
                    ),
                    Term::pi("t", nat(), Term::app(Term::var(3), Term::var(0))),
                ),
            ),
        );
        self.install_primitive(nat_ind, nat_elim);

        let bool_ty = || Term::global("Bool");
        let bool_ind = Inductive::simple(
            "Bool",
            Term::sort(0),
            vec![
                Constructor::new("true", bool_ty(), 0),
                Constructor::new("false", bool_ty(), 0),
            ],
            "boolElim",
        );
        // Π(P : Bool -> Sort 0). P true -> P false -> Π(t:Bool). P t
        let bool_elim = Term::pi(
            "P",
            Term::pi("t", bool_ty(), Term::sort(0)),
            Term::pi(
                "case_true",
                Term::app(Term::var(0), Term::global("true")),
                Term::pi(
                    "case_false",
                    Term::app(Term::var(1), Term::global("false")),
                    Term::pi("t", bool_ty(), Term::app(Term::var(3), Term::var(0))),
                ),
            ),
        );
        self.install_primitive(bool_ind, bool_elim);
    }

    fn install_primitive(&mut self, ind: Inductive, elim_ty: Rc<Term>) {
        self.recursors.register(RecursorInfo::for_inductive(&ind));
        self.insert(&ind.name, Declaration::Primitive { ty: ind.ty.clone() });
        for ctor in &ind.constructors {
            self.insert(&ctor.name, Declaration::Primitive { ty: ctor.ty.clone() });
        }
        self.insert(&ind.eliminator_name, Declaration::Primitive { ty: elim_ty });
    }

    /// Primitives plus `Unit`, `Empty`, `Sum` and `List`.
    pub fn with_stdlib() -> Result<Self, DeclarationError> {
        let mut env = GlobalEnv::with_primitives();
        for spec in stdlib_specs() {
            env.declare_inductive(spec)?;
        }
        Ok(env)
    }

    /// The circle `S1`, the suspension `Susp`, propositional truncation
    /// `Trunc`, the integers `Int` and set quotients `Quot`. `Int` is built
    /// on `Nat`, so the primitives must already be installed.
    pub fn add_builtin_hits(&mut self) -> Result<(), DeclarationError> {
        let s1 = || Term::global("S1");
        self.declare_hit(HitSpec {
            name: "S1".to_string(),
            ty: Term::sort(0),
            constructors: vec![ConstructorSpec::new("base", s1())],
            path_constructors: vec![PathConstructorSpec::new(
                "loop",
                Term::path(s1(), Term::global("base"), Term::global("base")),
                1,
                vec![(Term::global("base"), Term::global("base"))],
            )],
            eliminator: "S1-elim".to_string(),
        })?;

        let susp = |ix| Term::app(Term::global("Susp"), Term::var(ix));
        let pole = |name: &str, ix| Term::app(Term::global(name), Term::var(ix));
        let ty_param = || Term::sort(0);
        self.declare_hit(HitSpec {
            name: "Susp".to_string(),
            ty: Term::pi("A", ty_param(), Term::sort(0)),
            constructors: vec![
                ConstructorSpec::new("north", Term::pi("A", ty_param(), susp(0))),
                ConstructorSpec::new("south", Term::pi("A", ty_param(), susp(0))),
            ],
            // merid : Π(A : Sort 0). Π(a : A). Path (Susp A) (north A) (south A)
            path_constructors: vec![PathConstructorSpec::new(
                "merid",
                Term::pi(
                    "A",
                    ty_param(),
                    Term::pi("a", Term::var(0), Term::path(susp(1), pole("north", 1), pole("south", 1))),
                ),
                1,
                vec![(pole("north", 1), pole("south", 1))],
            )],
            eliminator: "Susp-elim".to_string(),
        })?;

        self.declare_hit(trunc_spec())?;
        self.declare_hit(int_spec())?;
        self.declare_hit(quot_spec())
    }
}

/// `squash : Π(A : Sort 0). Π(x y : Trunc A). Path (Trunc A) x y`
fn trunc_spec() -> HitSpec {
    let ty0 = || Term::sort(0);
    let trunc = |ix| Term::app(Term::global("Trunc"), Term::var(ix));
    HitSpec {
        name: "Trunc".to_string(),
        ty: Term::pi("A", ty0(), ty0()),
        constructors: vec![ConstructorSpec::new(
            "inc",
            Term::pi("A", ty0(), Term::pi("a", Term::var(0), trunc(1))),
        )],
        path_constructors: vec![PathConstructorSpec::new(
            "squash",
            Term::pi(
                "A",
                ty0(),
                Term::pi(
                    "x",
                    trunc(0),
                    Term::pi("y", trunc(1), Term::path(trunc(2), Term::var(1), Term::var(0))),
                ),
            ),
            1,
            vec![(Term::var(1), Term::var(0))],
        )],
        eliminator: "Trunc-elim".to_string(),
    }
}

/// `zeroPath : Path Int (pos zero) (neg zero)`
fn int_spec() -> HitSpec {
    let int = || Term::global("Int");
    let nat = || Term::global("Nat");
    let at_zero = |ctor: &str| Term::app(Term::global(ctor), Term::global("zero"));
    HitSpec {
        name: "Int".to_string(),
        ty: Term::sort(0),
        constructors: vec![
            ConstructorSpec::new("pos", Term::pi("n", nat(), int())),
            ConstructorSpec::new("neg", Term::pi("n", nat(), int())),
        ],
        path_constructors: vec![PathConstructorSpec::new(
            "zeroPath",
            Term::path(int(), at_zero("pos"), at_zero("neg")),
            1,
            vec![(at_zero("pos"), at_zero("neg"))],
        )],
        eliminator: "Int-elim".to_string(),
    }
}

/// `eq : Π(A : Sort 0). Π(R : A -> A -> Sort 0). Π(a b : A). R a b ->
/// Path (Quot A R) (quot A R a) (quot A R b)`
fn quot_spec() -> HitSpec {
    let ty0 = || Term::sort(0);
    // R : A -> A -> Sort 0, with A at index 0
    let relation = || Term::pi("a", Term::var(0), Term::pi("b", Term::var(1), ty0()));
    let quot = |a, r| Term::apps(Term::global("Quot"), vec![Term::var(a), Term::var(r)]);
    let class = |a, r, x| Term::apps(Term::global("quot"), vec![Term::var(a), Term::var(r), Term::var(x)]);
    HitSpec {
        name: "Quot".to_string(),
        ty: Term::pi("A", ty0(), Term::pi("R", relation(), ty0())),
        constructors: vec![ConstructorSpec::new(
            "quot",
            Term::pi("A", ty0(), Term::pi("R", relation(), Term::pi("a", Term::var(1), quot(2, 1)))),
        )],
        path_constructors: vec![PathConstructorSpec::new(
            "eq",
            Term::pi(
                "A",
                ty0(),
                Term::pi(
                    "R",
                    relation(),
                    Term::pi(
                        "a",
                        Term::var(1),
                        Term::pi(
                            "b",
                            Term::var(2),
                            Term::pi(
                                "r",
                                Term::apps(Term::var(2), vec![Term::var(1), Term::var(0)]),
                                Term::path(quot(4, 3), class(4, 3, 2), class(4, 3, 1)),
                            ),
                        ),
                    ),
                ),
            ),
            1,
            vec![(class(4, 3, 2), class(4, 3, 1))],
        )],
        eliminator: "Quot-elim".to_string(),
    }
}

fn check_constructor_result(spec: &InductiveSpec, ctor: &ConstructorSpec, arity: usize) -> Result<(), DeclarationError> {
    let (_, result) = pi_telescope(&ctor.ty);
    let (head, spine) = app_spine(&result);
    match &*head {
        Term::Global(name) if *name == spec.name && spine.len() == arity => Ok(()),
        Term::Global(name) if *name == spec.name => Err(DeclarationError::constructor(
            &spec.name,
            &ctor.name,
            format!("result applies {} to {} arguments, expected {}", spec.name, spine.len(), arity),
        )),
        _ => Err(DeclarationError::constructor(
            &spec.name,
            &ctor.name,
            format!("result type {} is not {}", result, spec.name),
        )),
    }
}

fn stdlib_specs() -> Vec<InductiveSpec> {
    let ty0 = || Term::sort(0);
    let sum = |a, b| Term::apps(Term::global("Sum"), vec![Term::var(a), Term::var(b)]);
    let list = |a| Term::app(Term::global("List"), Term::var(a));
    vec![
        InductiveSpec::new(
            "Unit",
            ty0(),
            vec![ConstructorSpec::new("tt", Term::global("Unit"))],
            "unitElim",
        ),
        InductiveSpec::new("Empty", ty0(), vec![], "emptyElim"),
        InductiveSpec::new(
            "Sum",
            Term::pi("A", ty0(), Term::pi("B", ty0(), ty0())),
            vec![
                ConstructorSpec::new(
                    "inl",
                    Term::pi("A", ty0(), Term::pi("B", ty0(), Term::pi("a", Term::var(1), sum(2, 1)))),
                ),
                ConstructorSpec::new(
                    "inr",
                    Term::pi("A", ty0(), Term::pi("B", ty0(), Term::pi("b", Term::var(0), sum(2, 1)))),
                ),
            ],
            "sumElim",
        ),
        InductiveSpec::new(
            "List",
            Term::pi("A", ty0(), ty0()),
            vec![
                ConstructorSpec::new("nil", Term::pi("A", ty0(), list(0))),
                ConstructorSpec::new(
                    "cons",
                    Term::pi("A", ty0(), Term::pi("x", Term::var(0), Term::pi("xs", list(1), list(2)))),
                ),
            ],
            "listElim",
        ),
    ]
}
