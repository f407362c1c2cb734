//! Declaration resolver: discovers tag-producing chains on a UI definition.
//!
//! A chain is the path from the declaration whose kind carries a
//! [`TagSchema`] up to the declaration actually attached to the UI (or to a
//! generator type). Declarations are searched in this order:
//!
//! 1. declarations attached to the UI, expanding collections element-wise;
//! 2. for every generator candidate, first each capability it implements,
//!    then the generator type itself.
//!
//! Meta-declarations of platform kinds are never followed. A kind that is
//! reached again while it is still being walked is a configuration error.

use std::sync::Arc;

use headtags_model::{
    AttributeSpec, Capability, Declaration, GeneratorType, Operation, Registry, TagSchema,
    UiDefinition,
};
use log::debug;

use crate::error::{ConfigurationError, Error, Result};

/// A resolved chain, ready for attribute evaluation.
#[derive(Debug, Clone)]
pub struct ResolvedChain {
    /// Schema of the produced element.
    pub schema: TagSchema,
    /// `path[0]` carries the schema; `path.last()` is the declaration found on
    /// the UI or generator. Every entry contributes attributes, in order.
    pub path: Vec<Declaration>,
    /// The UI, capability or generator type the root declaration sits on.
    pub declaring: String,
    /// Generator whose operations also contribute attributes.
    pub generator: Option<Arc<GeneratorType>>,
    /// Operations evaluated on the generator instance.
    pub operations: Vec<Operation>,
}

impl ResolvedChain {
    /// The declaration attached to the UI or generator.
    #[must_use]
    pub fn root(&self) -> Option<&Declaration> {
        self.path.last()
    }

    /// Kind names along the path, schema end first.
    #[must_use]
    pub fn kinds(&self) -> Vec<&str> {
        self.path.iter().map(Declaration::kind).collect()
    }
}

/// Everything found on a UI definition.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    /// Chains in discovery order.
    pub chains: Vec<ResolvedChain>,
    /// `declaring: kind` of declarations that lead to no tag and are not
    /// collections.
    pub unresolved: Vec<String>,
}

/// Resolves every chain declared on `ui`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] when a declaration names an unknown kind
/// or when meta-declarations form a cycle.
pub fn resolve_chains(registry: &Registry, ui: &UiDefinition) -> Result<Vec<ResolvedChain>> {
    Ok(resolve(registry, ui)?.chains)
}

/// Like [`resolve_chains`], also reporting unresolved declarations.
///
/// # Errors
///
/// See [`resolve_chains`].
pub fn resolve(registry: &Registry, ui: &UiDefinition) -> Result<Resolution> {
    let mut walk = Walk {
        registry,
        resolution: Resolution::default(),
    };

    let ui_origin = Origin {
        declaring: ui.name(),
        generator: None,
        operations: &[],
    };
    for declaration in ui.declarations() {
        walk.visit(declaration, &ui_origin)?;
    }

    for generator in ui.generator_candidates() {
        walk.visit_generator(&generator)?;
    }

    Ok(walk.resolution)
}

/// Finds the chain of a single declaration, without expanding collections.
///
/// Returns `Ok(None)` when no tag schema is reachable.
///
/// # Errors
///
/// Returns [`ConfigurationError::UnknownKind`] or
/// [`ConfigurationError::Cycle`].
pub fn find_chain(
    registry: &Registry,
    declaration: &Declaration,
) -> Result<Option<(TagSchema, Vec<Declaration>)>, ConfigurationError> {
    find_chain_inner(registry, declaration, &mut Vec::new())
}

fn find_chain_inner(
    registry: &Registry,
    declaration: &Declaration,
    walking: &mut Vec<String>,
) -> Result<Option<(TagSchema, Vec<Declaration>)>, ConfigurationError> {
    let kind = registry
        .kind(declaration.kind())
        .ok_or_else(|| ConfigurationError::UnknownKind {
            kind: declaration.kind().to_string(),
        })?;

    if let Some(schema) = &kind.tag {
        return Ok(Some((schema.clone(), vec![declaration.clone()])));
    }

    if walking.iter().any(|k| *k == kind.name) {
        let mut path = walking.clone();
        path.push(kind.name.clone());
        return Err(ConfigurationError::Cycle { path });
    }

    walking.push(kind.name.clone());
    for meta in &kind.meta {
        let meta_kind = registry
            .kind(meta.kind())
            .ok_or_else(|| ConfigurationError::UnknownKind {
                kind: meta.kind().to_string(),
            })?;
        if meta_kind.platform {
            continue;
        }
        if let Some((schema, mut path)) = find_chain_inner(registry, meta, walking)? {
            walking.pop();
            path.push(declaration.clone());
            return Ok(Some((schema, path)));
        }
    }
    walking.pop();
    Ok(None)
}

struct Origin<'a> {
    declaring: &'a str,
    generator: Option<&'a Arc<GeneratorType>>,
    operations: &'a [Operation],
}

struct Walk<'r> {
    registry: &'r Registry,
    resolution: Resolution,
}

impl Walk<'_> {
    fn visit_generator(&mut self, generator: &Arc<GeneratorType>) -> Result<()> {
        // Capability metadata is not inherited by the implementing type.
        for capability in &generator.capabilities {
            self.visit_capability(generator, capability)?;
        }

        let operations: Vec<Operation> = generator.all_operations().into_iter().cloned().collect();
        let origin = Origin {
            declaring: &generator.name,
            generator: Some(generator),
            operations: &operations,
        };
        for declaration in &generator.declarations {
            self.visit(declaration, &origin)?;
        }
        Ok(())
    }

    fn visit_capability(
        &mut self,
        generator: &Arc<GeneratorType>,
        capability: &Capability,
    ) -> Result<()> {
        let origin = Origin {
            declaring: &capability.name,
            generator: Some(generator),
            operations: &capability.operations,
        };
        for declaration in &capability.declarations {
            self.visit(declaration, &origin)?;
        }
        Ok(())
    }

    fn visit(&mut self, declaration: &Declaration, origin: &Origin<'_>) -> Result<()> {
        let found = find_chain(self.registry, declaration)
            .map_err(|e| Error::configuration(origin.declaring, Some(declaration.kind()), e))?;

        if let Some((schema, path)) = found {
            debug!(
                "`{}`: chain {} -> <{}>",
                origin.declaring,
                path.iter()
                    .rev()
                    .map(Declaration::kind)
                    .collect::<Vec<_>>()
                    .join(" -> "),
                schema.tag_name
            );
            self.resolution.chains.push(ResolvedChain {
                schema,
                path,
                declaring: origin.declaring.to_string(),
                generator: origin.generator.cloned(),
                operations: origin.operations.to_vec(),
            });
            return Ok(());
        }

        // find_chain has already checked that the kind exists.
        let is_collection = self
            .registry
            .kind(declaration.kind())
            .and_then(|k| k.collection_element_kind())
            .is_some();
        match declaration.value("value") {
            Some(AttributeSpec::Declarations(items)) if is_collection => {
                for item in items {
                    self.visit(item, origin)?;
                }
            }
            _ => {
                debug!(
                    "`{}`: declaration `{}` is neither a tag nor a tag collection",
                    origin.declaring,
                    declaration.kind()
                );
                self.resolution
                    .unresolved
                    .push(format!("{}: {}", origin.declaring, declaration.kind()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headtags_model::{kinds, AttributeDef, BoxError, DeclarationKind, Generator, RequestContext};

    #[derive(Default)]
    struct Noop;

    impl Generator for Noop {
        fn invoke(&self, _: &str, _: Option<&RequestContext>) -> Result<Option<String>, BoxError> {
            Ok(None)
        }
    }

    #[test]
    fn tagged_kind_yields_single_element_chain() {
        let registry = Registry::standard();
        let link = kinds::link::new("foobar", "about:blank");
        let found = find_chain(&registry, &link).expect("resolvable");
        let (schema, path) = found.expect("chain");
        assert_eq!(schema.tag_name, "link");
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].kind(), kinds::LINK);
    }

    #[test]
    fn meta_declared_kind_puts_schema_first() {
        let registry = Registry::standard();
        let (schema, path) = find_chain(&registry, &kinds::viewport::new("width=900"))
            .expect("resolvable")
            .expect("chain");
        assert_eq!(schema.tag_name, "meta");
        let kinds: Vec<&str> = path.iter().map(Declaration::kind).collect();
        assert_eq!(kinds, vec![kinds::META, kinds::VIEWPORT]);
    }

    #[test]
    fn platform_kinds_never_resolve() {
        let registry = Registry::standard();
        let found = find_chain(&registry, &Declaration::new(kinds::DOCUMENTED));
        assert!(matches!(found, Ok(None)));
    }

    #[test]
    fn deep_chains_resolve() {
        let mut registry = Registry::standard();
        registry
            .register(
                DeclarationKind::new("mobile-viewport")
                    .meta(kinds::viewport::new("width=device-width")),
            )
            .expect("register");
        registry
            .register(DeclarationKind::new("app").meta(Declaration::new("mobile-viewport")))
            .expect("register");
        let (_, path) = find_chain(&registry, &Declaration::new("app"))
            .expect("resolvable")
            .expect("chain");
        let kinds: Vec<&str> = path.iter().map(Declaration::kind).collect();
        assert_eq!(kinds, vec!["meta", "viewport", "mobile-viewport", "app"]);
    }

    #[test]
    fn self_loops_are_configuration_errors() {
        let mut registry = Registry::new();
        registry
            .register(DeclarationKind::new("loop").meta(Declaration::new("loop")))
            .expect("register");
        let err = find_chain(&registry, &Declaration::new("loop"));
        assert!(matches!(err, Err(ConfigurationError::Cycle { ref path }) if path.len() == 2));
    }

    #[test]
    fn shared_meta_kinds_are_not_cycles() {
        let mut registry = Registry::standard();
        for name in ["left", "right"] {
            registry
                .register(DeclarationKind::new(name).meta(kinds::meta::named(name, "x")))
                .expect("register");
        }
        registry
            .register(
                DeclarationKind::new("both")
                    .meta(Declaration::new("left"))
                    .meta(Declaration::new("right")),
            )
            .expect("register");
        let ui = UiDefinition::new("ui")
            .declare(Declaration::new("both"))
            .declare(Declaration::new("left"));
        let chains = resolve_chains(&registry, &ui).expect("no cycle");
        assert_eq!(chains.len(), 2);
    }

    #[test]
    fn collections_expand_in_order() {
        let registry = Registry::standard();
        let ui = UiDefinition::new("DemoUI").declare(kinds::meta::tags(vec![
            kinds::meta::http_equiv("X-UA-Compatible", "hello"),
            kinds::meta::named("test", "test"),
        ]));
        let resolution = resolve(&registry, &ui).expect("resolvable");
        assert_eq!(resolution.chains.len(), 2);
        assert!(resolution.unresolved.is_empty());
        assert!(resolution.chains.iter().all(|c| c.declaring == "DemoUI"));
    }

    #[test]
    fn non_collections_are_reported_not_failed() {
        let mut registry = Registry::standard();
        registry
            .register(DeclarationKind::new("note").attribute(AttributeDef::optional("value")))
            .expect("register");
        let ui = UiDefinition::new("ui").declare(Declaration::new("note").with("value", "x"));
        let resolution = resolve(&registry, &ui).expect("resolvable");
        assert!(resolution.chains.is_empty());
        assert_eq!(resolution.unresolved, vec!["ui: note"]);
    }

    #[test]
    fn unknown_kinds_name_the_ui() {
        let registry = Registry::standard();
        let ui = UiDefinition::new("ui").declare(Declaration::new("nope"));
        let err = resolve_chains(&registry, &ui).expect_err("unknown kind");
        assert!(err.is_configuration());
        assert_eq!(err.declaring(), Some("ui"));
    }

    #[test]
    fn capability_chains_use_capability_operations() {
        let registry = Registry::standard();
        let generator = Arc::new(
            GeneratorType::new::<Noop>("Gen")
                .implements(kinds::viewport::capability())
                .declare(kinds::link::new("manifest", "/manifest.json"))
                .operation(Operation::new("title")),
        );
        let ui = UiDefinition::new("ui").nest(generator);
        let chains = resolve_chains(&registry, &ui).expect("resolvable");
        assert_eq!(chains.len(), 2);

        assert_eq!(chains[0].declaring, kinds::VIEWPORT_GENERATOR);
        let methods: Vec<&str> = chains[0].operations.iter().map(|o| o.method.as_str()).collect();
        assert_eq!(methods, vec!["getViewport"]);

        assert_eq!(chains[1].declaring, "Gen");
        let methods: Vec<&str> = chains[1].operations.iter().map(|o| o.method.as_str()).collect();
        assert_eq!(methods, vec!["title", "getViewport"]);
        assert!(chains.iter().all(|c| c.generator.is_some()));
    }
}
