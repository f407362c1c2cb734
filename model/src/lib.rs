//! Declaration metadata for HTML `<head>` tags, encoded as typed Rust data.
//!
//! A UI definition carries [`Declaration`]s describing the `<meta>`, `<link>`
//! and viewport tags that must be merged into its bootstrap page. Each
//! declaration is an instance of a [`DeclarationKind`]; kinds either carry a
//! [`TagSchema`] directly, are meta-declared by another declaration, or are
//! collections of declarations of one uniform kind. The [`Registry`] holds all
//! known kinds and answers the one-level tag schema lookup.
//!
//! Request-dependent values come from [`AttributeSpec::Request`] accessors,
//! [`AttributeGenerator`]s, or [`GeneratorType`]s whose operation tables are
//! evaluated once per render against a [`RequestContext`].
//!
//! # Entry Point
//!
//! ```
//! use headtags_model::{kinds, Registry, UiDefinition};
//!
//! let registry = Registry::standard();
//! assert_eq!(registry.lookup("meta").map(|t| t.tag_name.as_str()), Some("meta"));
//!
//! let ui = UiDefinition::new("DemoUI")
//!     .declare(kinds::viewport::new("width=device-width, initial-scale=1"))
//!     .declare(kinds::link::new("foobar", "about:blank"));
//! assert!(ui.declarations().iter().all(|d| registry.validate(d).is_ok()));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod generator;
pub mod kinds;
pub mod model;
pub mod naming;
pub mod registry;
pub mod request;
pub mod ui;

pub use error::DefinitionError;
pub use generator::{
    AttributeGenerator, BoxError, Capability, Generator, GeneratorType, Operation, ParameterShape,
};
pub use model::{
    AttributeDef, AttributeSpec, AttributeType, Declaration, DeclarationKind, RequestAccessor,
    TagSchema, NULL_VALUE,
};
pub use registry::Registry;
pub use request::RequestContext;
pub use ui::UiDefinition;
