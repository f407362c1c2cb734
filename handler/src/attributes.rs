//! Attribute value resolver.
//!
//! Walks a [`ResolvedChain`] and computes the value of every attribute its
//! declarations define, then evaluates the chain's generator operations.
//! Later writes to an attribute name replace earlier ones in place.

use headtags_model::{AttributeSpec, ParameterShape, Registry, RequestContext, NULL_VALUE};
use log::trace;

use crate::error::{ConfigurationError, Error, Result};
use crate::resolver::ResolvedChain;

/// Ordered attribute values. `None` marks an omitted (null) attribute.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMap {
    entries: Vec<(String, Option<String>)>,
}

impl AttributeMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `name`, keeping its position if already present. A value equal to
    /// [`NULL_VALUE`] is stored as `None`.
    pub fn set(&mut self, name: impl Into<String>, value: Option<String>) {
        let name = name.into();
        let value = value.filter(|v| v != NULL_VALUE);
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// `Some(None)` for a null attribute, `None` when never set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref())
    }

    /// Entries in first-write order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_deref()))
    }

    /// Number of entries, null ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing was set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Computes the attribute values of `chain` for one request.
///
/// Declarations are applied in path order, each contributing the attributes
/// its kind declares directly (set value, else the kind's default). If the
/// chain has a generator, a fresh instance is then constructed and every
/// operation of the chain is evaluated into the same map.
///
/// # Errors
///
/// - [`Error::Configuration`] for an unknown kind, a required attribute with
///   no value, a non-text value, or an unsupported operation parameter;
/// - [`Error::GeneratorConstruction`] when the generator cannot be built;
/// - [`Error::AccessorInvocation`] when an accessor or operation fails.
pub fn resolve_attributes(
    registry: &Registry,
    chain: &ResolvedChain,
    request: &RequestContext,
) -> Result<AttributeMap> {
    let tag = chain.schema.tag_name.as_str();
    let mut map = AttributeMap::new();

    for declaration in &chain.path {
        let kind = registry.kind(declaration.kind()).ok_or_else(|| {
            Error::configuration(
                &chain.declaring,
                None,
                ConfigurationError::UnknownKind {
                    kind: declaration.kind().to_string(),
                },
            )
        })?;

        for def in &kind.attributes {
            let name = def.attribute_name();
            let spec = declaration
                .value(&def.field)
                .or(def.default.as_ref())
                .ok_or_else(|| {
                    Error::configuration(
                        &kind.name,
                        Some(&def.field),
                        headtags_model::DefinitionError::MissingAttribute {
                            kind: kind.name.clone(),
                            field: def.field.clone(),
                        },
                    )
                })?;

            let invocation = |source| Error::AccessorInvocation {
                declaring: kind.name.clone(),
                member: def.field.clone(),
                source,
            };
            let value = match spec {
                AttributeSpec::Literal(v) => Some(v.clone()),
                AttributeSpec::Request(accessor) => accessor(request).map_err(invocation)?,
                AttributeSpec::Generated(generator) => {
                    generator.value(tag, &name, request).map_err(invocation)?
                }
                AttributeSpec::Declarations(_) => {
                    return Err(Error::configuration(
                        &kind.name,
                        Some(&def.field),
                        ConfigurationError::UnsupportedValue {
                            found: spec.shape().to_string(),
                        },
                    ));
                }
            };
            trace!("<{tag}> {name} = {value:?} (from `{}`)", kind.name);
            map.set(name, value);
        }
    }

    if let Some(generator) = &chain.generator {
        let instance = generator
            .instantiate()
            .map_err(|source| Error::GeneratorConstruction {
                declaring: generator.name.clone(),
                source,
            })?;

        for operation in &chain.operations {
            let request = match &operation.parameter {
                ParameterShape::None => None,
                ParameterShape::Request => Some(request),
                ParameterShape::Unsupported(parameter) => {
                    return Err(Error::configuration(
                        &chain.declaring,
                        Some(&operation.method),
                        ConfigurationError::UnsupportedParameter {
                            parameter: parameter.clone(),
                        },
                    ));
                }
            };
            let value = instance
                .invoke(&operation.method, request)
                .map_err(|source| Error::AccessorInvocation {
                    declaring: chain.declaring.clone(),
                    member: operation.method.clone(),
                    source,
                })?;
            let name = operation.attribute_name();
            trace!("<{tag}> {name} = {value:?} (from `{}`)", generator.name);
            map.set(name, value);
        }
    }

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::resolve_chains;
    use headtags_model::{kinds, BoxError, Declaration, UiDefinition};

    type GeneratedValue = std::result::Result<Option<String>, BoxError>;

    fn single_chain(registry: &Registry, declaration: Declaration) -> ResolvedChain {
        let ui = UiDefinition::new("ui").declare(declaration);
        let mut chains = resolve_chains(registry, &ui).expect("resolvable");
        assert_eq!(chains.len(), 1);
        chains.remove(0)
    }

    #[test]
    fn later_writes_replace_in_place() {
        let mut map = AttributeMap::new();
        map.set("x", Some("1".into()));
        map.set("y", Some("2".into()));
        map.set("x", Some("z".into()));
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("x", Some("z")), ("y", Some("2"))]);
    }

    #[test]
    fn null_then_value_keeps_the_first_slot() {
        let mut map = AttributeMap::new();
        map.set("content", None);
        map.set("name", Some("viewport".into()));
        map.set("content", Some("width=900".into()));
        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, vec![("content", Some("width=900")), ("name", Some("viewport"))]);
    }

    #[test]
    fn null_sentinel_is_stored_as_none() {
        let mut map = AttributeMap::new();
        map.set("a", Some(NULL_VALUE.to_string()));
        map.set("b", Some(String::new()));
        assert_eq!(map.get("a"), Some(None));
        assert_eq!(map.get("b"), Some(Some("")));
        assert_eq!(map.get("c"), None);
    }

    #[test]
    fn viewport_chain_sets_name_then_content() {
        let registry = Registry::standard();
        let chain = single_chain(&registry, kinds::viewport::new("width=900"));
        let map = resolve_attributes(&registry, &chain, &RequestContext::default())
            .expect("static values");
        assert_eq!(map.get("name"), Some(Some("viewport")));
        assert_eq!(map.get("content"), Some(Some("width=900")));
        assert_eq!(map.get("http-equiv"), Some(None));
        assert_eq!(map.iter().next().map(|(n, _)| n), Some("name"));
    }

    #[test]
    fn request_accessors_see_the_request() {
        let registry = Registry::standard();
        let chain = single_chain(
            &registry,
            kinds::meta::named(
                "agent",
                AttributeSpec::request(|r| Ok(r.header("User-Agent").map(str::to_string))),
            ),
        );
        let request = RequestContext::new("/").with_header("user-agent", "curl");
        let map = resolve_attributes(&registry, &chain, &request).expect("accessor");
        assert_eq!(map.get("content"), Some(Some("curl")));

        let map = resolve_attributes(&registry, &chain, &RequestContext::default())
            .expect("accessor");
        assert_eq!(map.get("content"), Some(None));
    }

    #[test]
    fn attribute_generators_receive_tag_and_name() {
        let registry = Registry::standard();
        fn href(tag: &str, attribute: &str, _: &RequestContext) -> GeneratedValue {
            Ok(Some(format!("{tag}:{attribute}")))
        }
        let generated = AttributeSpec::generated(href);
        let chain = single_chain(&registry, kinds::link::new("icon", generated));
        let map = resolve_attributes(&registry, &chain, &RequestContext::default())
            .expect("generator");
        assert_eq!(map.get("href"), Some(Some("link:href")));
    }

    #[test]
    fn accessor_failures_name_kind_and_field() {
        let registry = Registry::standard();
        let chain = single_chain(
            &registry,
            kinds::meta::named("x", AttributeSpec::request(|_| Err("no header".into()))),
        );
        let err = resolve_attributes(&registry, &chain, &RequestContext::default())
            .expect_err("failing accessor");
        assert!(matches!(err, Error::AccessorInvocation { .. }));
        assert_eq!(err.declaring(), Some(kinds::META));
        assert_eq!(err.member(), Some("content"));
    }
}
