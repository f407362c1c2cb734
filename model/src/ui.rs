//! UI definitions: the declarations and generators attached to one UI.

use std::sync::Arc;

use crate::generator::GeneratorType;
use crate::model::Declaration;

/// A UI definition as seen by the head tag pipeline.
#[derive(Debug, Clone, Default)]
pub struct UiDefinition {
    name: String,
    declarations: Vec<Declaration>,
    nested: Vec<Arc<GeneratorType>>,
    generators: Vec<Arc<GeneratorType>>,
}

impl UiDefinition {
    /// Creates an empty definition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attaches a declaration directly to the UI.
    #[must_use]
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Adds a generator type nested inside the UI.
    #[must_use]
    pub fn nest(mut self, generator: Arc<GeneratorType>) -> Self {
        self.nested.push(generator);
        self
    }

    /// Lists a generator type explicitly.
    #[must_use]
    pub fn use_generator(mut self, generator: Arc<GeneratorType>) -> Self {
        self.generators.push(generator);
        self
    }

    /// The UI's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declarations attached directly to the UI, in order.
    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Generator types nested inside the UI.
    #[must_use]
    pub fn nested(&self) -> &[Arc<GeneratorType>] {
        &self.nested
    }

    /// Generator types listed explicitly.
    #[must_use]
    pub fn generators(&self) -> &[Arc<GeneratorType>] {
        &self.generators
    }

    /// Generator candidates: nested types first, then explicitly listed ones,
    /// de-duplicated by type name (first occurrence wins).
    #[must_use]
    pub fn generator_candidates(&self) -> Vec<Arc<GeneratorType>> {
        let mut out: Vec<Arc<GeneratorType>> = Vec::new();
        for generator in self.nested.iter().chain(&self.generators) {
            if !out.iter().any(|g| g.name == generator.name) {
                out.push(Arc::clone(generator));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{BoxError, Generator};
    use crate::request::RequestContext;

    #[derive(Default)]
    struct Noop;

    impl Generator for Noop {
        fn invoke(&self, _: &str, _: Option<&RequestContext>) -> Result<Option<String>, BoxError> {
            Ok(None)
        }
    }

    #[test]
    fn candidates_are_deduplicated_by_name() {
        let a = Arc::new(GeneratorType::new::<Noop>("A"));
        let b = Arc::new(GeneratorType::new::<Noop>("B"));
        let ui = UiDefinition::new("ui")
            .nest(Arc::clone(&a))
            .use_generator(Arc::clone(&b))
            .use_generator(Arc::new(GeneratorType::new::<Noop>("A")));
        let names: Vec<String> = ui
            .generator_candidates()
            .iter()
            .map(|g| g.name.clone())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
