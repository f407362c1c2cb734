//! Generators: per-render objects supplying request-dependent attribute values.
//!
//! A [`GeneratorType`] is the registration-time description of a generator:
//! its directly attached declarations, the [`Capability`] interfaces it
//! implements, and explicit [`Operation`] tables. The operation tables replace
//! runtime method introspection; a fresh [`Generator`] instance is produced by
//! the type's factory once per render and asked to invoke operations by name.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use crate::model::Declaration;
use crate::naming::attribute_name;
use crate::request::RequestContext;

/// Boxed error type returned by user-supplied accessors and generators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A generator instance, created fresh for each render.
pub trait Generator {
    /// Invokes the operation `operation`.
    ///
    /// `request` is `Some` exactly when the operation's parameter shape is
    /// [`ParameterShape::Request`]. `Ok(None)` removes the attribute.
    ///
    /// # Errors
    ///
    /// Returns the generator's own failure, reported as an accessor
    /// invocation error for the operation.
    fn invoke(
        &self,
        operation: &str,
        request: Option<&RequestContext>,
    ) -> Result<Option<String>, BoxError>;
}

/// Computes one attribute value from the tag name, attribute name and request.
pub trait AttributeGenerator: Send + Sync {
    /// Generates the value. `Ok(None)` removes the attribute; `Ok(Some(""))`
    /// emits an empty attribute.
    ///
    /// # Errors
    ///
    /// Returns the generator's own failure.
    fn value(
        &self,
        tag: &str,
        attribute: &str,
        request: &RequestContext,
    ) -> Result<Option<String>, BoxError>;
}

impl<F> AttributeGenerator for F
where
    F: Fn(&str, &str, &RequestContext) -> Result<Option<String>, BoxError> + Send + Sync,
{
    fn value(
        &self,
        tag: &str,
        attribute: &str,
        request: &RequestContext,
    ) -> Result<Option<String>, BoxError> {
        self(tag, attribute, request)
    }
}

/// Parameter list accepted by an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterShape {
    /// No parameters.
    None,
    /// A single request context parameter.
    Request,
    /// Anything else; evaluating the operation is a configuration error.
    Unsupported(String),
}

/// One entry of a generator's operation table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Method name in `camelCase`, e.g. `getViewport`.
    pub method: String,
    /// Explicit HTML attribute name.
    pub override_name: Option<String>,
    /// Parameter shape.
    pub parameter: ParameterShape,
}

impl Operation {
    /// A parameterless operation.
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            override_name: None,
            parameter: ParameterShape::None,
        }
    }

    /// An operation taking the request context.
    pub fn with_request(method: impl Into<String>) -> Self {
        Self {
            parameter: ParameterShape::Request,
            ..Self::new(method)
        }
    }

    /// Sets an explicit HTML attribute name.
    #[must_use]
    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.override_name = Some(name.into());
        self
    }

    /// Replaces the parameter shape.
    #[must_use]
    pub fn parameter(mut self, parameter: ParameterShape) -> Self {
        self.parameter = parameter;
        self
    }

    /// The HTML attribute name this operation writes.
    #[must_use]
    pub fn attribute_name(&self) -> String {
        attribute_name(&self.method, self.override_name.as_deref())
    }
}

/// A capability interface a generator type may implement.
///
/// Declarations attached to a capability are not inherited by implementors;
/// the resolver scans each capability separately from the generator type.
#[derive(Debug, Clone, Default)]
pub struct Capability {
    /// Capability identifier.
    pub name: String,
    /// Declarations attached to the capability itself.
    pub declarations: Vec<Declaration>,
    /// Operations the capability defines.
    pub operations: Vec<Operation>,
}

impl Capability {
    /// Creates an empty capability.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Attaches a declaration.
    #[must_use]
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Adds an operation.
    #[must_use]
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }
}

type Factory = Arc<dyn Fn() -> Result<Box<dyn Generator>, BoxError> + Send + Sync>;

/// Registration-time description of a generator.
#[derive(Clone)]
pub struct GeneratorType {
    /// Type identity, used for de-duplication of candidates.
    pub name: String,
    /// Implemented capability interfaces, in declaration order.
    pub capabilities: Vec<Arc<Capability>>,
    /// Declarations attached directly to the generator type.
    pub declarations: Vec<Declaration>,
    /// Operations defined by the type itself.
    pub operations: Vec<Operation>,
    factory: Factory,
}

impl GeneratorType {
    /// Registers a generator constructed through [`Default`].
    pub fn new<G>(name: impl Into<String>) -> Self
    where
        G: Generator + Default + 'static,
    {
        Self::with_factory(name, || Ok(Box::new(G::default()) as Box<dyn Generator>))
    }

    /// Registers a generator with a fallible constructor.
    pub fn with_factory<F>(name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<Box<dyn Generator>, BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            capabilities: Vec::new(),
            declarations: Vec::new(),
            operations: Vec::new(),
            factory: Arc::new(factory),
        }
    }

    /// Declares an implemented capability.
    #[must_use]
    pub fn implements(mut self, capability: Arc<Capability>) -> Self {
        self.capabilities.push(capability);
        self
    }

    /// Attaches a declaration to the type itself.
    #[must_use]
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Adds an operation defined by the type itself.
    #[must_use]
    pub fn operation(mut self, operation: Operation) -> Self {
        self.operations.push(operation);
        self
    }

    /// Constructs a fresh instance.
    ///
    /// # Errors
    ///
    /// Returns the factory's failure.
    pub fn instantiate(&self) -> Result<Box<dyn Generator>, BoxError> {
        (self.factory)()
    }

    /// Every operation the type exposes: its own first, then each
    /// capability's, keeping the first entry per method name.
    #[must_use]
    pub fn all_operations(&self) -> Vec<&Operation> {
        let mut seen = HashSet::new();
        self.operations
            .iter()
            .chain(self.capabilities.iter().flat_map(|c| c.operations.iter()))
            .filter(|op| seen.insert(op.method.as_str()))
            .collect()
    }
}

impl fmt::Debug for GeneratorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorType")
            .field("name", &self.name)
            .field(
                "capabilities",
                &self.capabilities.iter().map(|c| &c.name).collect::<Vec<_>>(),
            )
            .field("declarations", &self.declarations)
            .field("operations", &self.operations)
            .finish_non_exhaustive()
    }
}
