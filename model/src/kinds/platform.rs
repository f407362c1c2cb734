//! Platform kinds.
//!
//! Platform markers describe how metadata is documented and inherited. They
//! never lead to a tag schema and are skipped when meta-declarations are
//! walked. `documented` is meta-declared by itself, so a walk that did not
//! skip it would never terminate.

use crate::model::{Declaration, DeclarationKind};

use super::{DOCUMENTED, INHERITED};

/// The `documented` marker kind.
#[must_use]
pub fn documented() -> DeclarationKind {
    DeclarationKind::new(DOCUMENTED)
        .platform()
        .meta(Declaration::new(DOCUMENTED))
}

/// The `inherited` marker kind.
#[must_use]
pub fn inherited() -> DeclarationKind {
    DeclarationKind::new(INHERITED)
        .platform()
        .meta(Declaration::new(DOCUMENTED))
}

/// The markers every built-in tag kind carries.
#[must_use]
pub fn markers() -> Vec<Declaration> {
    vec![Declaration::new(DOCUMENTED), Declaration::new(INHERITED)]
}
