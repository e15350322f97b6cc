use crate::ast::Term;
use crate::positivity::PositivityError;
use crate::span::Span;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UnboundVariable,
    TypeMismatch,
    NotAFunction,
    NotAPair,
    NotAType,
    UnknownGlobal,
    CannotInfer,
    OccursCheck,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnboundVariable => "unbound variable",
            ErrorKind::TypeMismatch => "type mismatch",
            ErrorKind::NotAFunction => "not a function",
            ErrorKind::NotAPair => "not a pair",
            ErrorKind::NotAType => "not a type",
            ErrorKind::UnknownGlobal => "unknown global",
            ErrorKind::CannotInfer => "cannot infer",
            ErrorKind::OccursCheck => "occurs check",
        };
        write!(f, "{}", name)
    }
}

/// Kind-specific payload of a [`TypeError`].
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetails {
    Mismatch { expected: Rc<Term>, actual: Rc<Term> },
    /// The type (or term) that had the wrong shape
    Actual(Rc<Term>),
    Variable(usize),
    Global(String),
    Term(Rc<Term>),
}

/// A checking failure. Renders as `span: message`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{span}: {message}")]
pub struct TypeError {
    pub span: Span,
    pub kind: ErrorKind,
    pub message: String,
    pub details: ErrorDetails,
}

impl TypeError {
    pub fn unbound_variable(span: &Span, ix: usize, depth: usize) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::UnboundVariable,
            message: format!("unbound variable {} in a context of length {}", ix, depth),
            details: ErrorDetails::Variable(ix),
        }
    }

    pub fn unbound_ivar(span: &Span, ix: usize, depth: usize) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::UnboundVariable,
            message: format!("unbound interval variable {} at interval depth {}", ix, depth),
            details: ErrorDetails::Variable(ix),
        }
    }

    pub fn type_mismatch(span: &Span, expected: Rc<Term>, actual: Rc<Term>) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::TypeMismatch,
            message: format!("type mismatch: expected {}, got {}", expected, actual),
            details: ErrorDetails::Mismatch { expected, actual },
        }
    }

    pub fn endpoint_mismatch(span: &Span, expected: Rc<Term>, actual: Rc<Term>) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::TypeMismatch,
            message: format!("path endpoint mismatch: expected {}, got {}", expected, actual),
            details: ErrorDetails::Mismatch { expected, actual },
        }
    }

    pub fn not_a_function(span: &Span, actual: Rc<Term>) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::NotAFunction,
            message: format!("expected a function type, got {}", actual),
            details: ErrorDetails::Actual(actual),
        }
    }

    /// Path application on something that is not a path reuses `NotAFunction`.
    pub fn not_a_path(span: &Span, actual: Rc<Term>) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::NotAFunction,
            message: format!("expected a path type, got {}", actual),
            details: ErrorDetails::Actual(actual),
        }
    }

    pub fn not_a_pair(span: &Span, actual: Rc<Term>) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::NotAPair,
            message: format!("expected a pair type, got {}", actual),
            details: ErrorDetails::Actual(actual),
        }
    }

    pub fn not_a_type(span: &Span, actual: Rc<Term>) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::NotAType,
            message: format!("expected a type, got something of type {}", actual),
            details: ErrorDetails::Actual(actual),
        }
    }

    pub fn unknown_global(span: &Span, name: &str) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::UnknownGlobal,
            message: format!("unknown global {}", name),
            details: ErrorDetails::Global(name.to_string()),
        }
    }

    pub fn cannot_infer(span: &Span, term: Rc<Term>) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::CannotInfer,
            message: format!("cannot infer a type for {}", term),
            details: ErrorDetails::Term(term),
        }
    }

    pub fn occurs_check(span: &Span, name: &str, term: Rc<Term>) -> Self {
        TypeError {
            span: span.clone(),
            kind: ErrorKind::OccursCheck,
            message: format!("{} occurs in its own definition", name),
            details: ErrorDetails::Term(term),
        }
    }
}

/// Failures of the declaration API. These surface at declaration time only.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DeclarationError {
    #[error("{0} is already declared")]
    AlreadyDeclared(String),
    #[error("inductive {ind}: {message}")]
    Inductive { ind: String, message: String },
    #[error("constructor {ctor} of {ind}: {message}")]
    Constructor {
        ind: String,
        ctor: String,
        message: String,
    },
    #[error(transparent)]
    Positivity(#[from] PositivityError),
    #[error("path constructor {ctor} of {ind}: {message}")]
    PathConstructor {
        ind: String,
        ctor: String,
        message: String,
    },
    #[error(transparent)]
    Type(#[from] TypeError),
}

impl DeclarationError {
    pub fn inductive(ind: &str, message: impl Into<String>) -> Self {
        DeclarationError::Inductive {
            ind: ind.to_string(),
            message: message.into(),
        }
    }

    pub fn constructor(ind: &str, ctor: &str, message: impl Into<String>) -> Self {
        DeclarationError::Constructor {
            ind: ind.to_string(),
            ctor: ctor.to_string(),
            message: message.into(),
        }
    }

    pub fn path_constructor(ind: &str, ctor: &str, message: impl Into<String>) -> Self {
        DeclarationError::PathConstructor {
            ind: ind.to_string(),
            ctor: ctor.to_string(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::positivity::Polarity;

    #[test]
    fn type_error_renders_span_and_message() {
        let err = TypeError::unknown_global(&Span::lines("m.htt", 2, 1, 2, 4), "foo");
        insta::assert_snapshot!(err.to_string(), @"m.htt:2:1-4: unknown global foo");
    }

    #[test]
    fn type_error_without_location() {
        let err = TypeError::type_mismatch(&Span::none(), Term::global("Nat"), Term::global("Bool"));
        insta::assert_snapshot!(err.to_string(), @"<no location>: type mismatch: expected Nat, got Bool");
        assert_eq!(err.kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn declaration_error_wraps_positivity() {
        let err: DeclarationError = PositivityError {
            ind: "Bad".to_string(),
            ctor: "mk".to_string(),
            polarity: Polarity::Negative,
            position: 0,
        }
        .into();
        insta::assert_snapshot!(
            err.to_string(),
            @"strict positivity violation: Bad occurs in negative position in constructor mk at argument 0"
        );
    }
}
