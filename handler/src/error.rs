//! Render-path errors.
//!
//! Every fatal condition reports the declaring type (UI, capability or
//! generator type) and, where one exists, the member that failed.

use headtags_model::{BoxError, DefinitionError};
use thiserror::Error;

/// Result alias for the render pipeline.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A declaration graph or operation table that cannot be evaluated.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Meta-declarations loop back to a kind already on the walk.
    #[error("meta-declaration cycle: {}", .path.join(" -> "))]
    Cycle {
        /// Kinds on the walk, ending with the repeated kind.
        path: Vec<String>,
    },
    /// An operation takes a parameter other than the request context.
    #[error("unsupported generator parameter type `{parameter}`")]
    UnsupportedParameter {
        /// The offending parameter type.
        parameter: String,
    },
    /// An attribute on a chain holds a value that is not text.
    #[error("attribute holds a {found}, expected a text value")]
    UnsupportedValue {
        /// Shape of the value found.
        found: String,
    },
    /// A declaration or meta-declaration names an unregistered kind.
    #[error("unknown declaration kind `{kind}`")]
    UnknownKind {
        /// The missing kind.
        kind: String,
    },
    /// A declaration does not fit its kind.
    #[error(transparent)]
    Definition(#[from] DefinitionError),
}

/// Failure while rendering the head of a bootstrap page.
#[derive(Debug, Error)]
pub enum Error {
    /// The declaration graph or an operation table is invalid.
    #[error("invalid head tag configuration on `{declaring}`{}", member_suffix(.member.as_deref()))]
    Configuration {
        /// Declaring type.
        declaring: String,
        /// Offending member, if any.
        member: Option<String>,
        /// What is wrong.
        #[source]
        source: ConfigurationError,
    },
    /// A generator instance could not be constructed.
    #[error("cannot construct generator `{declaring}`")]
    GeneratorConstruction {
        /// The generator type.
        declaring: String,
        /// The factory's failure.
        #[source]
        source: BoxError,
    },
    /// An accessor or generator operation failed.
    #[error("error evaluating head tag attribute `{declaring}.{member}`")]
    AccessorInvocation {
        /// Declaring kind or type.
        declaring: String,
        /// Field or operation name.
        member: String,
        /// The accessor's failure.
        #[source]
        source: BoxError,
    },
    /// The document has no usable head, or cannot be serialized.
    #[error("document error: {0}")]
    Document(String),
}

fn member_suffix(member: Option<&str>) -> String {
    member.map(|m| format!(" (`{m}`)")).unwrap_or_default()
}

impl Error {
    pub(crate) fn configuration(
        declaring: impl Into<String>,
        member: Option<&str>,
        source: impl Into<ConfigurationError>,
    ) -> Self {
        Error::Configuration {
            declaring: declaring.into(),
            member: member.map(str::to_string),
            source: source.into(),
        }
    }

    /// The declaring type of the failure.
    #[must_use]
    pub fn declaring(&self) -> Option<&str> {
        match self {
            Error::Configuration { declaring, .. }
            | Error::GeneratorConstruction { declaring, .. }
            | Error::AccessorInvocation { declaring, .. } => Some(declaring),
            Error::Document(_) => None,
        }
    }

    /// The failing member, if the failure is tied to one.
    #[must_use]
    pub fn member(&self) -> Option<&str> {
        match self {
            Error::Configuration { member, .. } => member.as_deref(),
            Error::AccessorInvocation { member, .. } => Some(member),
            Error::GeneratorConstruction { .. } | Error::Document(_) => None,
        }
    }

    /// Configuration errors abort a render regardless of failure policy.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_declaring_member() {
        let err = Error::configuration(
            "DemoUI",
            Some("loop"),
            ConfigurationError::Cycle {
                path: vec!["a".into(), "b".into(), "a".into()],
            },
        );
        assert_eq!(err.to_string(), "invalid head tag configuration on `DemoUI` (`loop`)");
        assert_eq!(err.declaring(), Some("DemoUI"));
        assert_eq!(err.member(), Some("loop"));
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("meta-declaration cycle: a -> b -> a"));
    }

    #[test]
    fn accessor_failures_keep_their_source() {
        let err = Error::AccessorInvocation {
            declaring: "viewport-generator".into(),
            member: "getViewport".into(),
            source: "boom".into(),
        };
        assert!(!err.is_configuration());
        assert_eq!(err.member(), Some("getViewport"));
        assert_eq!(
            std::error::Error::source(&err).map(ToString::to_string).as_deref(),
            Some("boom")
        );
    }
}
