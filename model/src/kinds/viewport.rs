//! `viewport` kind and the `viewport-generator` capability.
//!
//! Both are meta-declared by `meta(name = "viewport")`, so they produce a
//! `<meta name="viewport" content="..">` tag. The kind takes the content as a
//! literal; the capability computes it per request.

use std::sync::{Arc, OnceLock};

use crate::generator::{BoxError, Capability, Generator, GeneratorType, Operation};
use crate::model::{AttributeDef, AttributeSpec, Declaration, DeclarationKind};
use crate::request::RequestContext;

use super::{platform, META, VIEWPORT, VIEWPORT_GENERATOR};

/// Operation name of the capability.
pub const GET_VIEWPORT: &str = "getViewport";

fn viewport_meta() -> Declaration {
    Declaration::new(META).with("name", "viewport")
}

/// The `viewport` kind.
#[must_use]
pub fn kind() -> DeclarationKind {
    let mut kind = DeclarationKind::new(VIEWPORT);
    kind.meta.extend(platform::markers());
    kind.meta(viewport_meta())
        .attribute(AttributeDef::required("value").renamed("content"))
}

/// A `viewport` declaration.
pub fn new(content: impl Into<AttributeSpec>) -> Declaration {
    Declaration::new(VIEWPORT).with("value", content)
}

/// The shared `viewport-generator` capability.
#[must_use]
pub fn capability() -> Arc<Capability> {
    static CAPABILITY: OnceLock<Arc<Capability>> = OnceLock::new();
    Arc::clone(CAPABILITY.get_or_init(|| {
        Arc::new(
            Capability::new(VIEWPORT_GENERATOR)
                .declare(viewport_meta())
                .operation(Operation::with_request(GET_VIEWPORT).renamed("content")),
        )
    }))
}

/// Typed form of the `viewport-generator` capability.
pub trait ViewportGenerator {
    /// Computes the viewport content for `request`. `Ok(None)` omits the
    /// `content` attribute.
    ///
    /// # Errors
    ///
    /// Returns the generator's own failure.
    fn viewport(&self, request: &RequestContext) -> Result<Option<String>, BoxError>;
}

struct ViewportAdapter<T>(T);

impl<T: ViewportGenerator> Generator for ViewportAdapter<T> {
    fn invoke(
        &self,
        operation: &str,
        request: Option<&RequestContext>,
    ) -> Result<Option<String>, BoxError> {
        match (operation, request) {
            (GET_VIEWPORT, Some(request)) => self.0.viewport(request),
            (GET_VIEWPORT, None) => Err("getViewport requires a request".into()),
            _ => Err(format!("unknown operation `{operation}`").into()),
        }
    }
}

/// Registers `T` as a generator type implementing the capability.
pub fn viewport_generator<T>(name: impl Into<String>) -> GeneratorType
where
    T: ViewportGenerator + Default + 'static,
{
    GeneratorType::with_factory(name, || {
        Ok(Box::new(ViewportAdapter(T::default())) as Box<dyn Generator>)
    })
    .implements(capability())
}
