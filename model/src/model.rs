//! Core declaration model types.
//!
//! These types describe head tag metadata as plain data. Kinds reference each
//! other by name so that a [`Registry`](crate::Registry) can hold arbitrary
//! (including accidentally cyclic) meta-declaration graphs; resolution walks
//! the graph through the registry.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::generator::{AttributeGenerator, BoxError};
use crate::naming::attribute_name;
use crate::request::RequestContext;

/// Reserved attribute value meaning "omit this attribute entirely".
///
/// An empty string is a real value and is emitted as an empty attribute; only
/// this sentinel (or an accessor returning `None`) removes the attribute.
pub const NULL_VALUE: &str = "_specialValueRepresentingNull_";

/// The HTML tag a declaration kind produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct TagSchema {
    /// HTML tag name (e.g. `"meta"`, `"link"`).
    pub tag_name: String,
}

impl TagSchema {
    /// Creates a schema for the given tag name.
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
        }
    }
}

/// Value shape accepted by an attribute of a declaration kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    /// A single string value.
    Text,
    /// An array of declarations, all of kind `element_kind`.
    Declarations {
        /// Name of the uniform element kind.
        element_kind: String,
    },
}

/// Request-bound accessor: computes a value from the per-request context.
///
/// `Ok(None)` removes the attribute; an `Err` aborts the render as an
/// accessor invocation failure.
pub type RequestAccessor =
    Arc<dyn Fn(&RequestContext) -> Result<Option<String>, BoxError> + Send + Sync>;

/// One source of an attribute value within a declaration.
#[derive(Clone)]
pub enum AttributeSpec {
    /// A literal string, possibly equal to [`NULL_VALUE`].
    Literal(String),
    /// A function of the per-request context.
    Request(RequestAccessor),
    /// A generator object receiving the tag and attribute names.
    Generated(Arc<dyn AttributeGenerator>),
    /// Nested declarations (the `value` of a collection declaration).
    Declarations(Vec<Declaration>),
}

impl AttributeSpec {
    /// The literal [`NULL_VALUE`] sentinel.
    #[must_use]
    pub fn null() -> Self {
        AttributeSpec::Literal(NULL_VALUE.to_string())
    }

    /// Wraps a closure as a request-bound accessor.
    pub fn request<F>(accessor: F) -> Self
    where
        F: Fn(&RequestContext) -> Result<Option<String>, BoxError> + Send + Sync + 'static,
    {
        AttributeSpec::Request(Arc::new(accessor))
    }

    /// Wraps an attribute generator.
    pub fn generated<G>(generator: G) -> Self
    where
        G: AttributeGenerator + 'static,
    {
        AttributeSpec::Generated(Arc::new(generator))
    }

    /// Returns true for a literal equal to the [`NULL_VALUE`] sentinel.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, AttributeSpec::Literal(v) if v == NULL_VALUE)
    }

    /// Short description of the value shape, used in diagnostics.
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            AttributeSpec::Literal(_) => "literal",
            AttributeSpec::Request(_) => "request accessor",
            AttributeSpec::Generated(_) => "attribute generator",
            AttributeSpec::Declarations(_) => "declaration array",
        }
    }
}

impl fmt::Debug for AttributeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeSpec::Literal(v) if v == NULL_VALUE => f.write_str("Null"),
            AttributeSpec::Literal(v) => f.debug_tuple("Literal").field(v).finish(),
            AttributeSpec::Request(_) => f.write_str("Request(..)"),
            AttributeSpec::Generated(_) => f.write_str("Generated(..)"),
            AttributeSpec::Declarations(d) => f.debug_tuple("Declarations").field(d).finish(),
        }
    }
}

impl From<&str> for AttributeSpec {
    fn from(value: &str) -> Self {
        AttributeSpec::Literal(value.to_string())
    }
}

impl From<String> for AttributeSpec {
    fn from(value: String) -> Self {
        AttributeSpec::Literal(value)
    }
}

impl From<Vec<Declaration>> for AttributeSpec {
    fn from(value: Vec<Declaration>) -> Self {
        AttributeSpec::Declarations(value)
    }
}

/// An attribute accessor declared by a kind.
#[derive(Debug, Clone)]
pub struct AttributeDef {
    /// Raw field name (camelCase), e.g. `httpEquiv`.
    pub field: String,
    /// Explicit HTML attribute name, overriding the kebab-case transform.
    pub override_name: Option<String>,
    /// Accepted value shape.
    pub ty: AttributeType,
    /// Value used when a declaration does not set the field. `None` makes the
    /// field required.
    pub default: Option<AttributeSpec>,
}

impl AttributeDef {
    /// A required text attribute.
    pub fn required(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            override_name: None,
            ty: AttributeType::Text,
            default: None,
        }
    }

    /// An optional text attribute defaulting to [`NULL_VALUE`].
    pub fn optional(field: impl Into<String>) -> Self {
        Self {
            default: Some(AttributeSpec::null()),
            ..Self::required(field)
        }
    }

    /// A required array of declarations of `element_kind`.
    pub fn declarations(field: impl Into<String>, element_kind: impl Into<String>) -> Self {
        Self {
            ty: AttributeType::Declarations {
                element_kind: element_kind.into(),
            },
            ..Self::required(field)
        }
    }

    /// Sets an explicit HTML attribute name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.override_name = Some(name.into());
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<AttributeSpec>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// The HTML attribute name this accessor writes.
    #[must_use]
    pub fn attribute_name(&self) -> String {
        attribute_name(&self.field, self.override_name.as_deref())
    }
}

/// A declaration kind: the type identity of a declaration.
#[derive(Debug, Clone)]
pub struct DeclarationKind {
    /// Kind identifier (e.g. `"meta"`, `"viewport"`).
    pub name: String,
    /// Tag schema carried directly by this kind, if any.
    pub tag: Option<TagSchema>,
    /// Meta-declarations attached to this kind, in declaration order.
    pub meta: Vec<Declaration>,
    /// Attribute accessors declared directly on this kind, in order.
    pub attributes: Vec<AttributeDef>,
    /// Platform kinds are skipped when walking meta-declarations.
    pub platform: bool,
}

impl DeclarationKind {
    /// Creates a kind with no tag, meta-declarations or attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag: None,
            meta: Vec::new(),
            attributes: Vec::new(),
            platform: false,
        }
    }

    /// Attaches a tag schema marker.
    #[must_use]
    pub fn tag(mut self, tag_name: impl Into<String>) -> Self {
        self.tag = Some(TagSchema::new(tag_name));
        self
    }

    /// Attaches a meta-declaration.
    #[must_use]
    pub fn meta(mut self, declaration: Declaration) -> Self {
        self.meta.push(declaration);
        self
    }

    /// Declares an attribute accessor.
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeDef) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Marks the kind as a platform kind.
    #[must_use]
    pub fn platform(mut self) -> Self {
        self.platform = true;
        self
    }

    /// Looks up an attribute accessor by field name.
    #[must_use]
    pub fn attribute_def(&self, field: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.field == field)
    }

    /// If this kind is a collection (a `value` accessor returning an array of
    /// declarations), returns the element kind.
    #[must_use]
    pub fn collection_element_kind(&self) -> Option<&str> {
        match self.attribute_def("value").map(|a| &a.ty) {
            Some(AttributeType::Declarations { element_kind }) => Some(element_kind),
            _ => None,
        }
    }
}

/// An instance of a declaration kind with concrete attribute values.
///
/// Only explicitly set fields are stored; unset fields fall back to the
/// kind's defaults at resolution time.
#[derive(Debug, Clone)]
pub struct Declaration {
    kind: String,
    values: Vec<(String, AttributeSpec)>,
}

impl Declaration {
    /// Creates a declaration of `kind` with no explicit values.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            values: Vec::new(),
        }
    }

    /// Sets a field, replacing an earlier value for the same field.
    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: impl Into<AttributeSpec>) -> Self {
        let field = field.into();
        let value = value.into();
        match self.values.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.values.push((field, value)),
        }
        self
    }

    /// The declaration's kind identifier.
    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// The explicitly set value of `field`, if any.
    #[must_use]
    pub fn value(&self, field: &str) -> Option<&AttributeSpec> {
        self.values
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, v)| v)
    }

    /// All explicitly set values, in the order they were set.
    pub fn values(&self) -> impl Iterator<Item = (&str, &AttributeSpec)> {
        self.values.iter().map(|(f, v)| (f.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_replaces_existing_field() {
        let d = Declaration::new("meta").with("name", "a").with("name", "b");
        assert_eq!(d.values().count(), 1);
        assert!(matches!(d.value("name"), Some(AttributeSpec::Literal(v)) if v == "b"));
    }

    #[test]
    fn null_literal_is_detected() {
        assert!(AttributeSpec::null().is_null());
        assert!(!AttributeSpec::from("").is_null());
        assert!(!AttributeSpec::request(|_| Ok(None)).is_null());
    }

    #[test]
    fn collection_requires_declaration_typed_value() {
        let collection =
            DeclarationKind::new("tags").attribute(AttributeDef::declarations("value", "meta"));
        assert_eq!(collection.collection_element_kind(), Some("meta"));

        let text_value = DeclarationKind::new("viewport").attribute(AttributeDef::required("value"));
        assert_eq!(text_value.collection_element_kind(), None);

        let other_name =
            DeclarationKind::new("tags").attribute(AttributeDef::declarations("items", "meta"));
        assert_eq!(other_name.collection_element_kind(), None);
    }

    #[test]
    fn override_beats_field_name() {
        let def = AttributeDef::required("value").renamed("content");
        assert_eq!(def.attribute_name(), "content");
        assert_eq!(AttributeDef::optional("httpEquiv").attribute_name(), "http-equiv");
    }
}
