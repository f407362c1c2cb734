//! Shared pieces of the `headtags-render` and `headtags-check` binaries.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use headtags::GeneratorCatalog;
use headtags_model::kinds::viewport::{viewport_generator, ViewportGenerator};
use headtags_model::{BoxError, RequestContext};

/// Catalog name of [`UserAgentViewport`].
pub const USER_AGENT_VIEWPORT: &str = "user-agent-viewport";

/// Viewport generator keyed on the `User-Agent` header: phones get a
/// non-zoomable device-width viewport, everything else a fixed 900px one.
#[derive(Debug, Default)]
pub struct UserAgentViewport;

impl ViewportGenerator for UserAgentViewport {
    fn viewport(&self, request: &RequestContext) -> Result<Option<String>, BoxError> {
        let mobile = request
            .header("User-Agent")
            .is_some_and(|agent| agent.to_ascii_lowercase().contains("mobile"));
        let content = if mobile {
            "width=device-width, initial-scale=1, maximum-scale=1"
        } else {
            "width=900"
        };
        Ok(Some(content.to_string()))
    }
}

/// Generators available to configuration files loaded by the binaries.
#[must_use]
pub fn builtin_catalog() -> GeneratorCatalog {
    GeneratorCatalog::new().with(viewport_generator::<UserAgentViewport>(USER_AGENT_VIEWPORT))
}
