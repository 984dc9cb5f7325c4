// strata-value - Error types for the Strata runtime
// Copyright (c) 2025 Tom Waddington. MIT licensed.

//! Error types shared by the value model and the runtime.
//!
//! Every error is fatal at the call site: nothing in the runtime catches or
//! retries one, and a failed operation leaves its receiver untouched.

use std::fmt;

use thiserror::Error;

use crate::value::StrataVal;

/// Result type for Strata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by collection, protocol, hierarchy and multimethod operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// No implementation found for a {protocol, op, value} triple
    #[error("No implementation of method {protocol}/{op} found for {type_name}: {value}")]
    MissingProtocol {
        protocol: String,
        op: String,
        type_name: &'static str,
        value: String,
    },
    /// `pop`/`peek` on an empty stack-shaped collection
    #[error("Can't {op} empty {type_name}")]
    EmptyCollection {
        op: &'static str,
        type_name: &'static str,
    },
    /// Index out of bounds with no not-found value supplied
    #[error("Index {index} out of bounds for collection of length {length}")]
    IndexOutOfBounds { index: i64, length: usize },
    /// Missing key with no not-found value supplied
    #[error("Key not found: {key}")]
    KeyNotFound { key: String },
    /// Malformed arguments (odd key/value lists, zero range steps, ...)
    #[error("{context}: {message}")]
    Argument {
        context: &'static str,
        message: String,
    },
    /// A derive or prefer-method call would create a cycle
    #[error("{0}")]
    HierarchyCycle(String),
    /// Two methods match a dispatch value and neither dominates the other
    #[error(
        "Multiple methods in multimethod '{name}' match dispatch value: {dispatch_val} -> {first} and {second}, and neither is preferred"
    )]
    DispatchAmbiguity {
        name: String,
        dispatch_val: String,
        first: String,
        second: String,
    },
    /// No matching method and no default method
    #[error("No method in multimethod '{name}' for dispatch value: {dispatch_val}")]
    NoApplicableMethod { name: String, dispatch_val: String },
    /// Wrong value kind handed to an operation
    #[error("{}", type_error_message(.context.as_deref(), .expected, .got))]
    TypeError {
        expected: &'static str,
        got: &'static str,
        context: Option<String>,
    },
    /// Wrong number of arguments to a native function
    #[error("{}", arity_error_message(.name.as_deref(), .expected, .got))]
    ArityError {
        expected: AritySpec,
        got: usize,
        name: Option<String>,
    },
}

/// The error taxonomy buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingProtocolOperation,
    StructuralViolation,
    HierarchyCycle,
    DispatchAmbiguity,
    NoApplicableMethod,
    /// Misuse at the host boundary (wrong value kind or argument count)
    Usage,
}

/// Specification for expected arity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AritySpec {
    Exact(usize),
    AtLeast(usize),
    Range(usize, usize),
}

impl fmt::Display for AritySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AritySpec::Exact(n) => write!(f, "{}", n),
            AritySpec::AtLeast(n) => write!(f, "at least {}", n),
            AritySpec::Range(min, max) => write!(f, "{} to {}", min, max),
        }
    }
}

fn type_error_message(context: Option<&str>, expected: &str, got: &str) -> String {
    match context {
        Some(ctx) => format!("{}: expected {}, got {}", ctx, expected, got),
        None => format!("Type error: expected {}, got {}", expected, got),
    }
}

fn arity_error_message(name: Option<&str>, expected: &AritySpec, got: &usize) -> String {
    match name {
        Some(name) => format!(
            "Wrong number of arguments to '{}': expected {}, got {}",
            name, expected, got
        ),
        None => format!(
            "Wrong number of arguments: expected {}, got {}",
            expected, got
        ),
    }
}

impl Error {
    /// The taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingProtocol { .. } => ErrorKind::MissingProtocolOperation,
            Error::EmptyCollection { .. }
            | Error::IndexOutOfBounds { .. }
            | Error::KeyNotFound { .. }
            | Error::Argument { .. } => ErrorKind::StructuralViolation,
            Error::HierarchyCycle(_) => ErrorKind::HierarchyCycle,
            Error::DispatchAmbiguity { .. } => ErrorKind::DispatchAmbiguity,
            Error::NoApplicableMethod { .. } => ErrorKind::NoApplicableMethod,
            Error::TypeError { .. } | Error::ArityError { .. } => ErrorKind::Usage,
        }
    }

    /// Create a missing-protocol error for `value`.
    pub fn missing_protocol(protocol: &str, op: &str, value: &StrataVal) -> Self {
        Error::MissingProtocol {
            protocol: protocol.to_string(),
            op: op.to_string(),
            type_name: value.type_name(),
            value: value.to_string(),
        }
    }

    /// Create an empty-collection error.
    pub fn empty(op: &'static str, type_name: &'static str) -> Self {
        Error::EmptyCollection { op, type_name }
    }

    /// Create an index-out-of-bounds error.
    pub fn out_of_bounds(index: i64, length: usize) -> Self {
        Error::IndexOutOfBounds { index, length }
    }

    /// Create a key-not-found error.
    pub fn key_not_found(key: &StrataVal) -> Self {
        Error::KeyNotFound {
            key: key.to_string(),
        }
    }

    /// Create an argument error.
    pub fn argument(context: &'static str, message: impl Into<String>) -> Self {
        Error::Argument {
            context,
            message: message.into(),
        }
    }

    /// Create an arity error for exact arity with function name.
    pub fn arity_named(name: impl Into<String>, expected: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::Exact(expected),
            got,
            name: Some(name.into()),
        }
    }

    /// Create an arity error for a range of arities with function name.
    pub fn arity_range(name: impl Into<String>, min: usize, max: usize, got: usize) -> Self {
        Error::ArityError {
            expected: AritySpec::Range(min, max),
            got,
            name: Some(name.into()),
        }
    }

    /// Create a type error.
    pub fn type_error(expected: &'static str, got: &'static str) -> Self {
        Error::TypeError {
            expected,
            got,
            context: None,
        }
    }

    /// Create a type error with context.
    pub fn type_error_in(
        context: impl Into<String>,
        expected: &'static str,
        got: &'static str,
    ) -> Self {
        Error::TypeError {
            expected,
            got,
            context: Some(context.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_message() {
        let err = Error::arity_named("nth", 2, 5);
        assert_eq!(
            err.to_string(),
            "Wrong number of arguments to 'nth': expected 2, got 5"
        );
        let err = Error::arity_range("get", 2, 3, 1);
        assert_eq!(
            err.to_string(),
            "Wrong number of arguments to 'get': expected 2 to 3, got 1"
        );
    }

    #[test]
    fn test_type_error_message() {
        assert_eq!(
            Error::type_error("int", "string").to_string(),
            "Type error: expected int, got string"
        );
        assert_eq!(
            Error::type_error_in("assoc", "int", "keyword").to_string(),
            "assoc: expected int, got keyword"
        );
    }

    #[test]
    fn test_kinds() {
        assert_eq!(Error::empty("pop", "vector").kind(), ErrorKind::StructuralViolation);
        assert_eq!(Error::out_of_bounds(3, 1).kind(), ErrorKind::StructuralViolation);
        assert_eq!(
            Error::HierarchyCycle("x".into()).kind(),
            ErrorKind::HierarchyCycle
        );
        assert_eq!(
            Error::missing_protocol("Counted", "count", &StrataVal::int(1)).kind(),
            ErrorKind::MissingProtocolOperation
        );
    }
}
