//! Error types for spec building and application.

use crate::spec::KeyPath;
use thiserror::Error;

/// A spec node that is neither invocable nor a nested mapping.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid spec at {path}: expected a function or a nested mapping, found {found}")]
pub struct InvalidSpecError {
    pub path: KeyPath,
    pub found: &'static str,
}

/// Failure raised by a built-in leaf function.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LeafError {
    #[error("missing argument {index} (got {got})")]
    MissingArgument { index: usize, got: usize },

    #[error("expected {expected}, found {found}")]
    WrongType {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{0} requires a parameter")]
    MissingParameter(&'static str),

    #[error("bad parameter: expected {expected}, found {found}")]
    BadParameter {
        expected: &'static str,
        found: &'static str,
    },

    #[error("missing field {0:?}")]
    MissingField(String),

    #[error("{0} overflowed the representable number range")]
    NumericOverflow(&'static str),
}

#[derive(Debug, Error)]
pub enum ApplyError {
    #[error(transparent)]
    InvalidSpec(#[from] InvalidSpecError),

    #[error("unknown function {name:?} at {path}")]
    UnknownFunction { path: KeyPath, name: String },

    #[error("bad leaf expression {expr:?} at {path}: {reason}")]
    BadExpression {
        path: KeyPath,
        expr: String,
        reason: String,
    },

    #[error("leaf {path} failed")]
    Leaf {
        path: KeyPath,
        #[source]
        source: LeafError,
    },
}

/// JSON kind name used in error messages.
pub fn kind_of(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
