//! Document merge engine.

use log::debug;
use markup5ever_rcdom::Handle;

use crate::builder::HeadElementSpec;
use crate::dom;
use crate::error::{Error, Result};
use crate::selector::SINGLETON_SELECTORS;

/// Merges `elements` into `head`.
///
/// All elements are first built into a detached scratch container. For each
/// of [`SINGLETON_SELECTORS`], if both the scratch container and `head` have
/// matches, the new matches are inserted before the first old match and the
/// old matches are removed. Whatever is left in the scratch container is then
/// appended to `head` in resolution order.
///
/// # Errors
///
/// Returns [`Error::Document`] if a matched element of `head` has lost its
/// parent, which only happens when `head` is mutated concurrently.
pub fn merge(head: &Handle, elements: &[HeadElementSpec]) -> Result<()> {
    let scratch = dom::create_element("head", &[]);
    for element in elements {
        dom::append_child(
            &scratch,
            &dom::create_element(&element.tag_name, &element.attributes),
        );
    }

    for selector in &SINGLETON_SELECTORS {
        let replacements = selector.select(&scratch);
        if replacements.is_empty() {
            continue;
        }
        let existing = selector.select(head);
        let Some(first) = existing.first() else {
            continue;
        };
        debug!("replacing {} ({} -> {})", selector, existing.len(), replacements.len());
        for replacement in &replacements {
            if !dom::insert_before(first, replacement) {
                return Err(Error::Document(format!("`{selector}` match has no parent")));
            }
        }
        for old in &existing {
            dom::detach(old);
        }
    }

    for remaining in dom::element_children(&scratch) {
        dom::append_child(head, &remaining);
    }
    Ok(())
}
