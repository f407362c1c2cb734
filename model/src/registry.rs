//! The tag schema registry: every known declaration kind, keyed by name.

use std::collections::BTreeMap;

use crate::error::DefinitionError;
use crate::kinds;
use crate::model::{AttributeSpec, AttributeType, Declaration, DeclarationKind, TagSchema};

/// Known declaration kinds. Immutable once rendering starts.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    kinds: BTreeMap<String, DeclarationKind>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in kinds of [`kinds::all`].
    #[must_use]
    pub fn standard() -> Self {
        let mut kinds = BTreeMap::new();
        for kind in kinds::all() {
            kinds.insert(kind.name.clone(), kind);
        }
        Self { kinds }
    }

    /// Registers a kind.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::DuplicateKind`] when the name is taken.
    pub fn register(&mut self, kind: DeclarationKind) -> Result<(), DefinitionError> {
        if self.kinds.contains_key(&kind.name) {
            return Err(DefinitionError::DuplicateKind { kind: kind.name });
        }
        log::debug!("registered declaration kind `{}`", kind.name);
        self.kinds.insert(kind.name.clone(), kind);
        Ok(())
    }

    /// Looks up a kind by name.
    #[must_use]
    pub fn kind(&self, name: &str) -> Option<&DeclarationKind> {
        self.kinds.get(name)
    }

    /// The tag schema carried directly by `kind`. Meta-declarations are not
    /// followed.
    #[must_use]
    pub fn lookup(&self, kind: &str) -> Option<&TagSchema> {
        self.kinds.get(kind).and_then(|k| k.tag.as_ref())
    }

    /// All kinds, ordered by name.
    pub fn kinds(&self) -> impl Iterator<Item = &DeclarationKind> {
        self.kinds.values()
    }

    /// Checks a declaration (and any nested declarations) against its kind.
    ///
    /// # Errors
    ///
    /// Returns the first [`DefinitionError`] found: an unknown kind or field,
    /// a required field left unset, or a value of the wrong shape.
    pub fn validate(&self, declaration: &Declaration) -> Result<(), DefinitionError> {
        let kind = self
            .kind(declaration.kind())
            .ok_or_else(|| DefinitionError::UnknownKind {
                kind: declaration.kind().to_string(),
            })?;

        for (field, value) in declaration.values() {
            let def = kind
                .attribute_def(field)
                .ok_or_else(|| DefinitionError::UnknownAttribute {
                    kind: kind.name.clone(),
                    field: field.to_string(),
                })?;
            let invalid = |expected: &str| DefinitionError::InvalidValue {
                kind: kind.name.clone(),
                field: field.to_string(),
                expected: expected.to_string(),
                found: value.shape().to_string(),
            };
            match (&def.ty, value) {
                (AttributeType::Declarations { element_kind }, AttributeSpec::Declarations(items)) => {
                    for item in items {
                        if item.kind() != element_kind {
                            return Err(DefinitionError::InvalidValue {
                                kind: kind.name.clone(),
                                field: field.to_string(),
                                expected: format!("`{element_kind}` declarations"),
                                found: format!("`{}` declaration", item.kind()),
                            });
                        }
                        self.validate(item)?;
                    }
                }
                (AttributeType::Declarations { .. }, _) => {
                    return Err(invalid("declaration array"));
                }
                (AttributeType::Text, AttributeSpec::Declarations(_)) => {
                    return Err(invalid("text value"));
                }
                (AttributeType::Text, _) => {}
            }
        }

        for def in &kind.attributes {
            if def.default.is_none() && declaration.value(&def.field).is_none() {
                return Err(DefinitionError::MissingAttribute {
                    kind: kind.name.clone(),
                    field: def.field.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validates and returns a declaration.
    ///
    /// # Errors
    ///
    /// See [`Registry::validate`].
    pub fn checked(&self, declaration: Declaration) -> Result<Declaration, DefinitionError> {
        self.validate(&declaration)?;
        Ok(declaration)
    }
}
