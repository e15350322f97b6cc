//! Trusted kernel for a cubical homotopy type theory.
//!
//! Terms use de Bruijn indices for both ordinary and interval variables.
//! Conversion goes through normalization by evaluation, checking is
//! bidirectional, and the [`env::GlobalEnv`] validates every declaration
//! (positivity, constructor shapes, path constructor boundaries) before
//! installing it together with its generated eliminator.

pub mod ast;
pub mod checker;
pub mod config;
pub mod context;
pub mod conv;
pub mod env;
pub mod error;
pub mod nbe;
pub mod positivity;
pub mod recursor;
pub mod span;
pub mod subst;
pub mod test_support;

pub use ast::*;
pub use checker::Checker;
pub use config::{KernelConfig, MotiveLevel};
pub use context::{Context, ICtx, IVarGuard};
pub use conv::is_def_eq;
pub use env::{
    ConstructorSpec, Declaration, GlobalEnv, HitSpec, Inductive, InductiveSpec, PathConstructorSpec, Transparency,
};
pub use error::{DeclarationError, ErrorKind, TypeError};
pub use nbe::normalize;
pub use positivity::PositivityError;
pub use recursor::{eliminator_type, RecursorInfo, RecursorRegistry};
pub use span::Span;
