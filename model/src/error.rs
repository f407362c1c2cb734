//! Errors raised while defining kinds and declarations.

use thiserror::Error;

/// A kind or declaration does not fit the registry it is checked against.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// The declaration refers to a kind that is not registered.
    #[error("unknown declaration kind `{kind}`")]
    UnknownKind {
        /// The missing kind.
        kind: String,
    },
    /// A kind with the same name is already registered.
    #[error("declaration kind `{kind}` is already registered")]
    DuplicateKind {
        /// The duplicated kind.
        kind: String,
    },
    /// The declaration sets a field its kind does not declare.
    #[error("declaration kind `{kind}` has no attribute `{field}`")]
    UnknownAttribute {
        /// Kind of the declaration.
        kind: String,
        /// The unknown field.
        field: String,
    },
    /// A field without a default is not set.
    #[error("attribute `{kind}.{field}` is required")]
    MissingAttribute {
        /// Kind of the declaration.
        kind: String,
        /// The unset field.
        field: String,
    },
    /// A field holds a value of the wrong shape.
    #[error("attribute `{kind}.{field}` expects {expected}, found {found}")]
    InvalidValue {
        /// Kind of the declaration.
        kind: String,
        /// The offending field.
        field: String,
        /// Expected value shape.
        expected: String,
        /// Value shape found.
        found: String,
    },
}
