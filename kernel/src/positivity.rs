//! Strict positivity for inductive declarations.
//!
//! Entering the domain of a Π flips the polarity to negative, and it stays
//! negative for every nested Π. Members of the group being declared may only
//! occur in positive positions of their constructors' argument types. Mutual
//! blocks pass the whole group, so `B` occurring in a constructor of `A` is
//! held to the same rule as `A` itself.

use crate::ast::{pi_telescope, Term};
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Positive,
    Negative,
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Positive => write!(f, "positive"),
            Polarity::Negative => write!(f, "negative"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("strict positivity violation: {ind} occurs in {polarity} position in constructor {ctor} at argument {position}")]
pub struct PositivityError {
    /// The group member found in a forbidden position
    pub ind: String,
    pub ctor: String,
    /// Polarity of the offending position, `Negative` for every rejection
    pub polarity: Polarity,
    /// Index of the constructor argument (parameters included)
    pub position: usize,
}

/// Check every argument of a constructor (or path constructor) type.
pub fn check_constructor(group: &[String], ctor: &str, ty: &Rc<Term>) -> Result<(), PositivityError> {
    let (binders, _) = pi_telescope(ty);
    for (position, (_, arg_ty)) in binders.iter().enumerate() {
        if let Some(ind) = negative_occurrence(arg_ty, group, Polarity::Positive) {
            return Err(PositivityError {
                ind,
                ctor: ctor.to_string(),
                polarity: Polarity::Negative,
                position,
            });
        }
    }
    Ok(())
}

/// First group member occurring in a negative position of `t`, if any.
fn negative_occurrence(t: &Term, group: &[String], polarity: Polarity) -> Option<String> {
    let forbidden = |name: &String| polarity == Polarity::Negative && group.contains(name);
    match t {
        Term::Global(name) => forbidden(name).then(|| name.clone()),
        Term::Pi(_, dom, cod) => negative_occurrence(dom, group, Polarity::Negative)
            .or_else(|| negative_occurrence(cod, group, polarity)),
        Term::HITApp { hit, .. } if forbidden(hit) => Some(hit.clone()),
        _ => t
            .subterms()
            .into_iter()
            .find_map(|sub| negative_occurrence(sub, group, polarity)),
    }
}
