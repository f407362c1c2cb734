//! Parsed bootstrap pages.

use html5ever::serialize::SerializeOpts;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, RcDom, SerializableHandle};

use crate::builder::HeadElementSpec;
use crate::dom;
use crate::error::{Error, Result};
use crate::merge::merge;

/// An HTML document whose `<head>` receives resolved head elements.
pub struct HeadDocument {
    dom: RcDom,
}

impl HeadDocument {
    /// Parses `html` as a full document. Parsing never fails; missing
    /// `<html>`, `<head>` and `<body>` elements are synthesized.
    #[must_use]
    pub fn parse(html: &str) -> Self {
        let dom = html5ever::parse_document(RcDom::default(), Default::default()).one(html);
        Self { dom }
    }

    /// The document node.
    #[must_use]
    pub fn document(&self) -> &Handle {
        &self.dom.document
    }

    /// The `<head>` element.
    #[must_use]
    pub fn head(&self) -> Option<Handle> {
        dom::find_first(&self.dom.document, "head")
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> Option<Handle> {
        dom::find_first(&self.dom.document, "body")
    }

    /// Element children of `<head>`.
    #[must_use]
    pub fn head_elements(&self) -> Vec<Handle> {
        self.head()
            .map(|head| dom::element_children(&head))
            .unwrap_or_default()
    }

    /// Merges `elements` into `<head>`; see [`merge`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Document`] when the document has no `<head>`.
    pub fn merge(&self, elements: &[HeadElementSpec]) -> Result<()> {
        let head = self
            .head()
            .ok_or_else(|| Error::Document("no <head> element".to_string()))?;
        merge(&head, elements)
    }

    /// Serializes the whole document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Document`] if serialization fails.
    pub fn to_html(&self) -> Result<String> {
        let mut out = Vec::new();
        let handle = SerializableHandle::from(self.dom.document.clone());
        html5ever::serialize(&mut out, &handle, SerializeOpts::default())
            .map_err(|e| Error::Document(format!("cannot serialize document: {e}")))?;
        String::from_utf8(out).map_err(|e| Error::Document(format!("serialized HTML is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_is_synthesized() {
        let doc = HeadDocument::parse("<p>hello</p>");
        assert!(doc.head().is_some());
        assert!(doc.body().is_some());
        assert!(doc.head_elements().is_empty());
    }

    #[test]
    fn merged_elements_serialize_as_void_tags() {
        let doc = HeadDocument::parse("<!DOCTYPE html><html><head><title>t</title></head><body></body></html>");
        doc.merge(&[HeadElementSpec {
            tag_name: "link".into(),
            attributes: vec![("rel".into(), "foobar".into()), ("href".into(), "about:blank".into())],
        }])
        .expect("merge");
        let html = doc.to_html().expect("serialize");
        assert_eq!(
            html,
            "<!DOCTYPE html><html><head><title>t</title>\
             <link rel=\"foobar\" href=\"about:blank\"></head><body></body></html>"
        );
    }

    #[test]
    fn empty_attribute_values_are_kept() {
        let doc = HeadDocument::parse("<html><head></head></html>");
        doc.merge(&[HeadElementSpec {
            tag_name: "meta".into(),
            attributes: vec![("name".into(), "x".into()), ("content".into(), String::new())],
        }])
        .expect("merge");
        let html = doc.to_html().expect("serialize");
        assert!(html.contains(r#"<meta name="x" content="">"#), "{html}");
    }
}
