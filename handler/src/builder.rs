//! Head element builder.

use std::fmt;

use serde::Serialize;

use crate::attributes::AttributeMap;
use crate::resolver::ResolvedChain;

/// A concrete head element: tag name plus the attributes to emit, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadElementSpec {
    /// HTML tag name.
    pub tag_name: String,
    /// Attribute name/value pairs. Never contains a null value.
    pub attributes: Vec<(String, String)>,
}

impl HeadElementSpec {
    /// The value of `name`, if emitted.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Builds the element for `chain`. Null attributes are dropped; empty strings
/// are kept.
#[must_use]
pub fn build(chain: &ResolvedChain, attributes: &AttributeMap) -> HeadElementSpec {
    HeadElementSpec {
        tag_name: chain.schema.tag_name.clone(),
        attributes: attributes
            .iter()
            .filter_map(|(name, value)| value.map(|v| (name.to_string(), v.to_string())))
            .collect(),
    }
}

fn escape_attribute(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

impl fmt::Display for HeadElementSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.tag_name)?;
        for (name, value) in &self.attributes {
            write!(f, " {}=\"{}\"", name, escape_attribute(value))?;
        }
        f.write_str(">")
    }
}
