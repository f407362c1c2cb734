//! Tree helpers over `markup5ever_rcdom` handles.
//!
//! `RcDom` keeps its own tree mutation helpers private, so attaching and
//! detaching nodes is done here. A node's parent link and its slot in the
//! parent's children must always be updated together.

use std::cell::RefCell;
use std::rc::Rc;

use html5ever::tendril::StrTendril;
use html5ever::{Attribute, LocalName, Namespace, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData};

const XHTML: &str = "http://www.w3.org/1999/xhtml";

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(XHTML), LocalName::from(local))
}

fn attribute_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(local))
}

/// Creates a detached HTML element.
#[must_use]
pub fn create_element(tag: &str, attributes: &[(String, String)]) -> Handle {
    let attrs = attributes
        .iter()
        .map(|(name, value)| Attribute {
            name: attribute_name(name),
            value: StrTendril::from_slice(value),
        })
        .collect();
    Node::new(NodeData::Element {
        name: html_name(tag),
        attrs: RefCell::new(attrs),
        template_contents: RefCell::new(None),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Local name of an element node.
#[must_use]
pub fn element_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Attribute value by case-insensitive name.
#[must_use]
pub fn attribute(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| (&*a.name.local).eq_ignore_ascii_case(name))
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

/// The node's parent, if attached.
#[must_use]
pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take()?;
    let parent = weak.upgrade();
    node.parent.set(Some(weak));
    parent
}

/// Removes `node` from its parent. No-op when detached.
pub fn detach(node: &Handle) {
    if let Some(parent) = parent(node) {
        parent.children.borrow_mut().retain(|c| !Rc::ptr_eq(c, node));
    }
    node.parent.set(None);
}

/// Moves `child` to the end of `parent`'s children.
pub fn append_child(parent: &Handle, child: &Handle) {
    detach(child);
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(Rc::clone(child));
}

/// Moves `child` directly before `reference`. Returns false, leaving
/// `child` untouched, when `reference` is detached.
pub fn insert_before(reference: &Handle, child: &Handle) -> bool {
    let Some(parent) = parent(reference) else {
        return false;
    };
    detach(child);
    let mut children = parent.children.borrow_mut();
    let Some(index) = children.iter().position(|c| Rc::ptr_eq(c, reference)) else {
        return false;
    };
    child.parent.set(Some(Rc::downgrade(&parent)));
    children.insert(index, Rc::clone(child));
    true
}

/// Element children in order.
#[must_use]
pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| element_name(c).is_some())
        .cloned()
        .collect()
}

/// Element descendants of `node` (excluding `node`) in document order.
#[must_use]
pub fn descendants(node: &Handle) -> Vec<Handle> {
    let mut out = Vec::new();
    let mut stack: Vec<Handle> = node.children.borrow().iter().rev().cloned().collect();
    while let Some(current) = stack.pop() {
        stack.extend(current.children.borrow().iter().rev().cloned());
        if element_name(&current).is_some() {
            out.push(current);
        }
    }
    out
}

/// First descendant element named `tag`.
#[must_use]
pub fn find_first(node: &Handle, tag: &str) -> Option<Handle> {
    descendants(node)
        .into_iter()
        .find(|n| element_name(n).is_some_and(|name| name.eq_ignore_ascii_case(tag)))
}
