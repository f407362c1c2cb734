//! Built-in declaration kinds.
//!
//! Each sub-module encodes one kind (plus its collection kind, where one
//! exists) as Rust data, along with helpers for building declarations of it.
//! See [`crate::Registry::standard`] for the assembled registry.

pub mod link;
pub mod meta;
pub mod platform;
pub mod viewport;

use crate::model::DeclarationKind;

/// Platform marker: documented metadata.
pub const DOCUMENTED: &str = "documented";
/// Platform marker: inherited metadata.
pub const INHERITED: &str = "inherited";
/// The `<meta>` tag.
pub const META: &str = "meta";
/// A collection of `meta` declarations.
pub const META_TAGS: &str = "meta-tags";
/// The `<link>` tag.
pub const LINK: &str = "link";
/// A collection of `link` declarations.
pub const LINK_TAGS: &str = "link-tags";
/// A `<meta name="viewport">` tag with a literal content.
pub const VIEWPORT: &str = "viewport";
/// Capability interface producing the viewport content per request.
pub const VIEWPORT_GENERATOR: &str = "viewport-generator";

/// All built-in kinds, platform kinds first.
#[must_use]
pub fn all() -> Vec<DeclarationKind> {
    vec![
        platform::documented(),
        platform::inherited(),
        meta::kind(),
        meta::tags_kind(),
        link::kind(),
        link::tags_kind(),
        viewport::kind(),
    ]
}
