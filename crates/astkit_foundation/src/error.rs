//! Error types for the astkit system.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.

use std::fmt;

use thiserror::Error;

/// Convenient result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for astkit operations.
#[derive(Debug, Error)]
#[error("{kind}{context}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Context about where the error occurred.
    pub context: ErrorContext,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: ErrorContext::new(),
        }
    }

    /// Creates a declaration error.
    #[must_use]
    pub fn declaration(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::Declaration {
            reason: reason.into(),
        })
    }

    /// Creates an abstract-type construction error.
    #[must_use]
    pub fn abstract_type(type_name: impl Into<String>) -> Self {
        Self::new(ErrorKind::AbstractType {
            type_name: type_name.into(),
        })
    }

    /// Creates a schema violation error.
    #[must_use]
    pub fn violation(violation: Violation) -> Self {
        Self::new(ErrorKind::Violation(violation))
    }

    /// Creates a violation for a value rejected by a constraint.
    #[must_use]
    pub fn unacceptable(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::violation(Violation::Unacceptable {
            expected: expected.into(),
            actual: actual.into(),
        })
    }

    /// Creates a violation for a container or field that must not be empty.
    #[must_use]
    pub fn must_not_be_empty() -> Self {
        Self::violation(Violation::MustNotBeEmpty)
    }

    /// Creates a violation for a sequence field given a non-sequence value.
    #[must_use]
    pub fn not_a_sequence(actual: impl Into<String>) -> Self {
        Self::violation(Violation::NotASequence {
            actual: actual.into(),
        })
    }

    /// Creates a violation for a mapping field given a non-mapping value.
    #[must_use]
    pub fn not_a_mapping(actual: impl Into<String>) -> Self {
        Self::violation(Violation::NotAMapping {
            actual: actual.into(),
        })
    }

    /// Creates an integrity error for removal of a declared field.
    #[must_use]
    pub fn integrity(field: impl Into<String>) -> Self {
        Self::new(ErrorKind::Integrity {
            field: field.into(),
        })
    }

    /// Creates an unknown node type error.
    #[must_use]
    pub fn unknown_type(name: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownType { name: name.into() })
    }

    /// Creates an index out of bounds error.
    #[must_use]
    pub fn index_out_of_bounds(index: usize, length: usize) -> Self {
        Self::new(ErrorKind::IndexOutOfBounds { index, length })
    }

    /// Creates a missing key error.
    #[must_use]
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingKey { key: key.into() })
    }

    /// Attaches the node type name where the error occurred.
    #[must_use]
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.context.type_name = Some(type_name.into());
        self
    }

    /// Attaches the field name where the error occurred.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.context.field = Some(field.into());
        self
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A node type declaration is malformed. Fatal to the declaration.
    #[error("invalid declaration: {reason}")]
    Declaration {
        /// What is wrong with the declaration.
        reason: String,
    },

    /// An abstract node type was constructed.
    #[error("cannot construct abstract type {type_name}")]
    AbstractType {
        /// The abstract type's name.
        type_name: String,
    },

    /// A value or mutation violated a declared schema.
    #[error("schema violation: {0}")]
    Violation(Violation),

    /// A declared field was removed from a node.
    #[error("cannot remove declared field {field}")]
    Integrity {
        /// The field that was targeted.
        field: String,
    },

    /// A node type id or name resolved to nothing.
    #[error("unknown node type: {name}")]
    UnknownType {
        /// The name or id that failed to resolve.
        name: String,
    },

    /// Index out of bounds in a typed list.
    #[error("index out of bounds: {index} (length {length})")]
    IndexOutOfBounds {
        /// The index that was accessed.
        index: usize,
        /// The actual length of the list.
        length: usize,
    },

    /// Key not present in a typed mapping.
    #[error("missing key: {key}")]
    MissingKey {
        /// The key that was accessed.
        key: String,
    },
}

/// The specific ways a value or mutation can violate a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// No constraint member accepted the value.
    Unacceptable {
        /// Description of the constraint members.
        expected: String,
        /// Description of the rejected value.
        actual: String,
    },
    /// A removal would empty a non-nullable container, or a non-nullable
    /// field or container started out empty.
    MustNotBeEmpty,
    /// A sequence field was initialized from a non-sequence value.
    NotASequence {
        /// Description of the offending value.
        actual: String,
    },
    /// A mapping field was initialized from a non-mapping value.
    NotAMapping {
        /// Description of the offending value.
        actual: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unacceptable { expected, actual } => {
                write!(f, "expected {expected}, got {actual}")
            }
            Self::MustNotBeEmpty => write!(f, "must not be empty"),
            Self::NotASequence { actual } => write!(f, "expected a sequence, got {actual}"),
            Self::NotAMapping { actual } => write!(f, "expected a mapping, got {actual}"),
        }
    }
}

/// Context about where an error occurred.
///
/// Renders as nothing when empty, so it can always trail the kind in the
/// error message.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// The node type involved, if known.
    pub type_name: Option<String>,
    /// The field involved, if known.
    pub field: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.type_name, &self.field) {
            (Some(type_name), Some(field)) => write!(f, " ({type_name}.{field})"),
            (Some(type_name), None) => write!(f, " ({type_name})"),
            (None, Some(field)) => write!(f, " (field {field})"),
            (None, None) => Ok(()),
        }
    }
}
