//! Error types for class-type construction and lookup.
//!
//! Subtype mismatches are *not* errors (see [`super::SubtypeDiagnostics`]). The errors here are raised by
//! mutators and "must exist" accessors. Each mutator validates before it touches any sequence, so an
//! `Err` always leaves the class type unchanged.

use std::fmt;

use miette::Diagnostic;
use thiserror::Error;

/// Which namespace of a class type an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Attribute,
    Parameter,
    Constant,
    Method,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Attribute => write!(f, "attribute"),
            FieldKind::Parameter => write!(f, "parameter"),
            FieldKind::Constant => write!(f, "constant"),
            FieldKind::Method => write!(f, "method"),
        }
    }
}

/// Errors raised while building or querying a class type.
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum ClassTypeError {
    /// The name is already taken. `existing` describes the entry that owns it.
    #[error("attempting to add {what} '{name}' to {owner} but {existing}")]
    #[diagnostic(
        code(classtype::name_conflict),
        help("attributes, parameters and constants share one namespace per class; method names must be unique")
    )]
    NameConflict {
        what: FieldKind,
        name: String,
        owner: String,
        existing: String,
    },

    #[error("attempting to add {what} '{name}' to {owner} with type {ty}: {reason}")]
    #[diagnostic(code(classtype::type_rejected))]
    TypeRejected {
        what: FieldKind,
        name: String,
        owner: String,
        ty: String,
        reason: String,
    },

    /// A compiler-internal rule was broken. Not meant to be handled; the calling pass has a bug.
    #[error("internal invariant violated: {0}")]
    #[diagnostic(
        code(classtype::invariant_violation),
        help("this indicates a bug in the compiler pass that built the class type")
    )]
    InvariantViolation(String),

    #[error("{owner} does not have a {what} field with name '{name}'")]
    #[diagnostic(code(classtype::not_found))]
    NotFound {
        owner: String,
        what: FieldKind,
        name: String,
    },

    #[error("{owner} does not have a {what} slot of index {slot}")]
    #[diagnostic(code(classtype::index_out_of_range))]
    IndexOutOfRange {
        owner: String,
        what: FieldKind,
        slot: usize,
    },
}

impl ClassTypeError {
    /// Whether the error reports a bug in the caller rather than bad user input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ClassTypeError::InvariantViolation(_))
    }
}
