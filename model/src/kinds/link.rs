//! `link` kind: the `<link>` tag and its `link-tags` collection.

use crate::model::{AttributeDef, AttributeSpec, Declaration, DeclarationKind};

use super::{platform, LINK, LINK_TAGS};

/// The `link` kind. `rel` and `href` are required.
#[must_use]
pub fn kind() -> DeclarationKind {
    let mut kind = DeclarationKind::new(LINK).tag("link");
    kind.meta.extend(platform::markers());
    kind.attribute(AttributeDef::required("rel"))
        .attribute(AttributeDef::required("href"))
        .attribute(AttributeDef::optional("media"))
        .attribute(AttributeDef::optional("type"))
        .attribute(AttributeDef::optional("sizes"))
        .attribute(AttributeDef::optional("title"))
}

/// The `link-tags` collection kind.
#[must_use]
pub fn tags_kind() -> DeclarationKind {
    DeclarationKind::new(LINK_TAGS).attribute(AttributeDef::declarations("value", LINK))
}

/// `<link rel=".." href="..">`.
pub fn new(rel: impl Into<AttributeSpec>, href: impl Into<AttributeSpec>) -> Declaration {
    Declaration::new(LINK)
        .with("rel", rel)
        .with("href", href)
}

/// A `link-tags` collection.
#[must_use]
pub fn tags(items: Vec<Declaration>) -> Declaration {
    Declaration::new(LINK_TAGS).with("value", items)
}
