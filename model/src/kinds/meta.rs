//! `meta` kind: the `<meta>` tag and its `meta-tags` collection.

use crate::model::{AttributeDef, AttributeSpec, Declaration, DeclarationKind};

use super::{platform, META, META_TAGS};

/// The `meta` kind. Every attribute is optional and omitted unless set.
#[must_use]
pub fn kind() -> DeclarationKind {
    let mut kind = DeclarationKind::new(META).tag("meta");
    kind.meta.extend(platform::markers());
    // `content` last so it follows whichever key attribute is set.
    kind.attribute(AttributeDef::optional("name"))
        .attribute(AttributeDef::optional("httpEquiv"))
        .attribute(AttributeDef::optional("charset"))
        .attribute(AttributeDef::optional("itemprop"))
        .attribute(AttributeDef::optional("content"))
}

/// The `meta-tags` collection kind.
#[must_use]
pub fn tags_kind() -> DeclarationKind {
    DeclarationKind::new(META_TAGS).attribute(AttributeDef::declarations("value", META))
}

/// `<meta name=".." content="..">`.
pub fn named(name: impl Into<AttributeSpec>, content: impl Into<AttributeSpec>) -> Declaration {
    Declaration::new(META)
        .with("name", name)
        .with("content", content)
}

/// `<meta http-equiv=".." content="..">`.
pub fn http_equiv(
    http_equiv: impl Into<AttributeSpec>,
    content: impl Into<AttributeSpec>,
) -> Declaration {
    Declaration::new(META)
        .with("httpEquiv", http_equiv)
        .with("content", content)
}

/// A `meta-tags` collection.
#[must_use]
pub fn tags(items: Vec<Declaration>) -> Declaration {
    Declaration::new(META_TAGS).with("value", items)
}
