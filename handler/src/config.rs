//! TOML configuration: custom declaration kinds and UI definitions.
//!
//! ```toml
//! [[kinds]]
//! name = "theme-color"
//! meta = [{ kind = "meta", name = "theme-color" }]
//! attributes = [{ field = "value", rename = "content", required = true }]
//!
//! [[ui]]
//! name = "DemoUI"
//! generators = ["user-agent-viewport"]
//! tags = [
//!     { kind = "viewport", value = "width=device-width, initial-scale=1" },
//!     { kind = "theme-color", value = "#00b4f0" },
//!     { kind = "meta-tags", value = [
//!         { kind = "meta", httpEquiv = "X-UA-Compatible", content = "hello" },
//!         { kind = "meta", name = "test", content = "test" },
//!     ] },
//!     { kind = "meta", name = "agent", content = { header = "User-Agent" } },
//! ]
//! ```
//!
//! A field value is a string, a `{ header = ".." }` table (the value of that
//! request header, omitted when absent), or an array of tag tables for
//! collection kinds. Generators are looked up by name in a
//! [`GeneratorCatalog`] supplied by the embedding code.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use headtags_model::{
    AttributeDef, AttributeSpec, Declaration, DeclarationKind, DefinitionError, GeneratorType,
    Registry, TagSchema, UiDefinition,
};
use log::debug;
use serde::Deserialize;
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file cannot be read.
    #[error("cannot read {}", .path.display())]
    Io {
        /// The file.
        path: PathBuf,
        /// The I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The file is not valid TOML for this schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// A kind or declaration is rejected by the registry.
    #[error("invalid definition in `{context}`")]
    Definition {
        /// Kind or UI name.
        context: String,
        /// What is wrong.
        #[source]
        source: DefinitionError,
    },
    /// A UI names a generator that is not in the catalog.
    #[error("UI `{ui}` uses unknown generator `{generator}`")]
    UnknownGenerator {
        /// The UI.
        ui: String,
        /// The missing generator name.
        generator: String,
    },
}

/// Generator types available to configurations, by name.
#[derive(Debug, Clone, Default)]
pub struct GeneratorCatalog {
    generators: BTreeMap<String, Arc<GeneratorType>>,
}

impl GeneratorCatalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a generator under its type name, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, generator: GeneratorType) -> Self {
        self.generators
            .insert(generator.name.clone(), Arc::new(generator));
        self
    }

    /// Looks up a generator.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<GeneratorType>> {
        self.generators.get(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.generators.keys().map(String::as_str)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    #[serde(default)]
    kinds: Vec<KindEntry>,
    #[serde(default)]
    ui: Vec<UiEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct KindEntry {
    name: String,
    tag: Option<TagSchema>,
    #[serde(default)]
    meta: Vec<TagEntry>,
    #[serde(default)]
    attributes: Vec<AttributeEntry>,
    collection_of: Option<String>,
    #[serde(default)]
    platform: bool,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct AttributeEntry {
    field: String,
    rename: Option<String>,
    #[serde(default)]
    required: bool,
    default: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct UiEntry {
    name: String,
    #[serde(default)]
    tags: Vec<TagEntry>,
    #[serde(default)]
    generators: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    kind: String,
    #[serde(flatten)]
    values: BTreeMap<String, FieldValue>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FieldValue {
    Text(String),
    Header { header: String },
    Tags(Vec<TagEntry>),
}

impl TagEntry {
    fn into_declaration(self) -> Declaration {
        self.values
            .into_iter()
            .fold(Declaration::new(self.kind), |declaration, (field, value)| {
                declaration.with(field, value.into_spec())
            })
    }
}

impl FieldValue {
    fn into_spec(self) -> AttributeSpec {
        match self {
            FieldValue::Text(text) => AttributeSpec::Literal(text),
            FieldValue::Header { header } => {
                AttributeSpec::request(move |request| Ok(request.header(&header).map(str::to_string)))
            }
            FieldValue::Tags(items) => AttributeSpec::Declarations(
                items.into_iter().map(TagEntry::into_declaration).collect(),
            ),
        }
    }
}

impl KindEntry {
    fn into_kind(self) -> DeclarationKind {
        let mut kind = DeclarationKind::new(self.name);
        kind.tag = self.tag;
        if self.platform {
            kind = kind.platform();
        }
        for meta in self.meta {
            kind = kind.meta(meta.into_declaration());
        }
        for entry in self.attributes {
            let mut def = match (entry.required, entry.default) {
                (true, _) => AttributeDef::required(entry.field),
                (false, None) => AttributeDef::optional(entry.field),
                (false, Some(default)) => AttributeDef::optional(entry.field).with_default(default),
            };
            if let Some(name) = entry.rename {
                def = def.renamed(name);
            }
            kind = kind.attribute(def);
        }
        if let Some(element_kind) = self.collection_of {
            kind = kind.attribute(AttributeDef::declarations("value", element_kind));
        }
        kind
    }
}

/// A loaded configuration: the standard registry extended with custom kinds,
/// and the UI definitions.
#[derive(Debug, Clone)]
pub struct HeadTagsConfig {
    /// Standard plus custom kinds.
    pub registry: Registry,
    /// UI definitions, in file order.
    pub uis: Vec<UiDefinition>,
}

impl HeadTagsConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML,
    /// [`ConfigError::Definition`] for duplicate kinds or declarations that
    /// do not fit their kind, and [`ConfigError::UnknownGenerator`] for
    /// generator names missing from `catalog`.
    pub fn from_toml_str(text: &str, catalog: &GeneratorCatalog) -> Result<Self, ConfigError> {
        let file: FileConfig = toml::from_str(text)?;

        let mut registry = Registry::standard();
        for entry in file.kinds {
            let kind = entry.into_kind();
            let context = kind.name.clone();
            registry
                .register(kind)
                .map_err(|source| ConfigError::Definition { context, source })?;
        }
        // Meta-declarations can only be checked once every kind is known.
        for kind in registry.kinds() {
            for meta in &kind.meta {
                registry.validate(meta).map_err(|source| ConfigError::Definition {
                    context: kind.name.clone(),
                    source,
                })?;
            }
        }

        let mut uis = Vec::with_capacity(file.ui.len());
        for entry in file.ui {
            let mut ui = UiDefinition::new(entry.name.clone());
            for tag in entry.tags {
                let declaration = registry
                    .checked(tag.into_declaration())
                    .map_err(|source| ConfigError::Definition {
                        context: entry.name.clone(),
                        source,
                    })?;
                ui = ui.declare(declaration);
            }
            for name in entry.generators {
                let generator = catalog.get(&name).ok_or_else(|| ConfigError::UnknownGenerator {
                    ui: entry.name.clone(),
                    generator: name.clone(),
                })?;
                ui = ui.use_generator(Arc::clone(generator));
            }
            debug!("loaded UI `{}` ({} tag(s))", ui.name(), ui.declarations().len());
            uis.push(ui);
        }

        Ok(Self { registry, uis })
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise see
    /// [`HeadTagsConfig::from_toml_str`].
    pub fn load(path: &Path, catalog: &GeneratorCatalog) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text, catalog)
    }

    /// Looks up a UI by name.
    #[must_use]
    pub fn ui(&self, name: &str) -> Option<&UiDefinition> {
        self.uis.iter().find(|ui| ui.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use headtags_model::{kinds, Generator, RequestContext};

    #[derive(Default)]
    struct Noop;

    impl Generator for Noop {
        fn invoke(
            &self,
            _: &str,
            _: Option<&RequestContext>,
        ) -> Result<Option<String>, headtags_model::BoxError> {
            Ok(None)
        }
    }

    const DEMO: &str = r##"
[[kinds]]
name = "theme-color"
meta = [{ kind = "meta", name = "theme-color" }]
attributes = [{ field = "value", rename = "content", required = true }]

[[ui]]
name = "DemoUI"
generators = ["noop"]
tags = [
    { kind = "viewport", value = "width=device-width, initial-scale=1" },
    { kind = "theme-color", value = "#00b4f0" },
    { kind = "meta-tags", value = [
        { kind = "meta", httpEquiv = "X-UA-Compatible", content = "hello" },
        { kind = "meta", name = "test", content = "test" },
    ] },
    { kind = "meta", name = "agent", content = { header = "User-Agent" } },
]
"##;

    fn catalog() -> GeneratorCatalog {
        GeneratorCatalog::new().with(GeneratorType::new::<Noop>("noop"))
    }

    #[test]
    fn demo_config_loads() {
        let config = HeadTagsConfig::from_toml_str(DEMO, &catalog()).expect("valid config");
        assert!(config.registry.kind("theme-color").is_some());
        let ui = config.ui("DemoUI").expect("ui");
        assert_eq!(ui.declarations().len(), 4);
        assert_eq!(ui.generators().len(), 1);
        assert_eq!(ui.declarations()[2].kind(), kinds::META_TAGS);
        assert!(matches!(
            ui.declarations()[3].value("content"),
            Some(AttributeSpec::Request(_))
        ));
    }

    #[test]
    fn unknown_generators_are_rejected() {
        let err = HeadTagsConfig::from_toml_str(DEMO, &GeneratorCatalog::new())
            .expect_err("noop is not registered");
        assert!(matches!(err, ConfigError::UnknownGenerator { ref generator, .. } if generator == "noop"));
    }

    #[test]
    fn declarations_are_validated() {
        let text = "[[ui]]\nname = \"ui\"\ntags = [{ kind = \"link\", rel = \"icon\" }]\n";
        let err = HeadTagsConfig::from_toml_str(text, &catalog()).expect_err("href missing");
        assert!(matches!(
            err,
            ConfigError::Definition {
                source: DefinitionError::MissingAttribute { .. },
                ..
            }
        ));
    }

    #[test]
    fn builtin_kinds_cannot_be_redefined() {
        let text = "[[kinds]]\nname = \"meta\"\ntag = \"meta\"\n";
        let err = HeadTagsConfig::from_toml_str(text, &catalog()).expect_err("duplicate");
        assert!(matches!(
            err,
            ConfigError::Definition {
                source: DefinitionError::DuplicateKind { .. },
                ..
            }
        ));
    }

    #[test]
    fn collection_kinds_from_config() {
        let text = r#"
[[kinds]]
name = "og"
tag = "meta"
attributes = [{ field = "property" }, { field = "content", required = true }]

[[kinds]]
name = "og-tags"
collection_of = "og"

[[ui]]
name = "ui"
tags = [{ kind = "og-tags", value = [{ kind = "og", property = "og:title", content = "Demo" }] }]
"#;
        let config = HeadTagsConfig::from_toml_str(text, &catalog()).expect("valid");
        let kind = config.registry.kind("og-tags").expect("kind");
        assert_eq!(kind.collection_element_kind(), Some("og"));
        assert_eq!(config.registry.lookup("og"), Some(&TagSchema::new("meta")));
        assert_eq!(config.registry.lookup("og-tags"), None);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = HeadTagsConfig::from_toml_str("[[ui]\n", &catalog()).expect_err("bad toml");
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_files_report_the_path() {
        let err = HeadTagsConfig::load(Path::new("/nonexistent/headtags.toml"), &catalog())
            .expect_err("missing");
        assert!(err.to_string().contains("/nonexistent/headtags.toml"));
    }
}
