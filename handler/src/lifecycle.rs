//! Host page lifecycle integration.
//!
//! The host framework owns page bootstrapping. [`install`] registers a
//! [`HeaderTagHandler`] with it once, at service start; the host then calls
//! the listener for every bootstrap page it renders. [`BootstrapHost`] is a
//! minimal in-process host used by the command-line client and tests.

use std::sync::Arc;

use headtags_model::{Registry, RequestContext, UiDefinition};
use log::info;
use markup5ever_rcdom::Handle;

use crate::document::HeadDocument;
use crate::dom;
use crate::error::{Error, Result};
use crate::pipeline::{HandlerConfig, HeaderTagHandler};

/// Per-render callbacks invoked by the host.
pub trait BootstrapListener: Send + Sync {
    /// Contributes nodes to the page fragment, before the page is finalized.
    ///
    /// # Errors
    ///
    /// A failure fails the render.
    fn modify_bootstrap_fragment(&self, response: &mut BootstrapFragmentResponse<'_>)
        -> Result<()>;

    /// Finalizes the page document.
    ///
    /// # Errors
    ///
    /// A failure fails the render.
    fn modify_bootstrap_page(&self, response: &BootstrapPageResponse<'_>) -> Result<()>;
}

/// The host side of listener registration.
pub trait HostPageLifecycle {
    /// Registers a listener for every subsequent render.
    fn add_bootstrap_listener(&mut self, listener: Arc<dyn BootstrapListener>);
}

/// The fragment being assembled for a render.
pub struct BootstrapFragmentResponse<'a> {
    ui: &'a UiDefinition,
    request: &'a RequestContext,
    nodes: Vec<Handle>,
}

impl<'a> BootstrapFragmentResponse<'a> {
    /// Creates an empty fragment.
    #[must_use]
    pub fn new(ui: &'a UiDefinition, request: &'a RequestContext) -> Self {
        Self {
            ui,
            request,
            nodes: Vec::new(),
        }
    }

    /// The UI being rendered.
    #[must_use]
    pub fn ui(&self) -> &UiDefinition {
        self.ui
    }

    /// The inbound request.
    #[must_use]
    pub fn request(&self) -> &RequestContext {
        self.request
    }

    /// Adds a node to the fragment.
    pub fn push(&mut self, node: Handle) {
        self.nodes.push(node);
    }

    /// Nodes contributed so far.
    #[must_use]
    pub fn nodes(&self) -> &[Handle] {
        &self.nodes
    }
}

/// The page being finalized for a render.
pub struct BootstrapPageResponse<'a> {
    ui: &'a UiDefinition,
    request: &'a RequestContext,
    document: &'a HeadDocument,
}

impl<'a> BootstrapPageResponse<'a> {
    /// Wraps a parsed page.
    #[must_use]
    pub fn new(
        ui: &'a UiDefinition,
        request: &'a RequestContext,
        document: &'a HeadDocument,
    ) -> Self {
        Self {
            ui,
            request,
            document,
        }
    }

    /// The UI being rendered.
    #[must_use]
    pub fn ui(&self) -> &UiDefinition {
        self.ui
    }

    /// The inbound request.
    #[must_use]
    pub fn request(&self) -> &RequestContext {
        self.request
    }

    /// The page document.
    #[must_use]
    pub fn document(&self) -> &HeadDocument {
        self.document
    }
}

/// Registers a head tag handler with default configuration.
pub fn install(host: &mut dyn HostPageLifecycle, registry: Arc<Registry>) -> Arc<HeaderTagHandler> {
    install_with(host, registry, HandlerConfig::default())
}

/// Registers a head tag handler with `config`.
pub fn install_with(
    host: &mut dyn HostPageLifecycle,
    registry: Arc<Registry>,
    config: HandlerConfig,
) -> Arc<HeaderTagHandler> {
    let handler = Arc::new(HeaderTagHandler::with_config(registry, config));
    host.add_bootstrap_listener(Arc::clone(&handler) as Arc<dyn BootstrapListener>);
    info!(
        "head tag handler installed (failure policy: {})",
        config.failure_policy
    );
    handler
}

/// In-process host: runs its listeners over a parsed page.
#[derive(Default)]
pub struct BootstrapHost {
    listeners: Vec<Arc<dyn BootstrapListener>>,
}

impl BootstrapHost {
    /// Creates a host with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Renders `html` for `ui`: collects fragment nodes into `<body>`, then
    /// lets every listener finalize the page.
    ///
    /// # Errors
    ///
    /// Returns the first listener failure; no HTML is produced in that case.
    pub fn render_page(
        &self,
        ui: &UiDefinition,
        request: &RequestContext,
        html: &str,
    ) -> Result<String> {
        let document = HeadDocument::parse(html);

        let mut fragment = BootstrapFragmentResponse::new(ui, request);
        for listener in &self.listeners {
            listener.modify_bootstrap_fragment(&mut fragment)?;
        }
        if !fragment.nodes().is_empty() {
            let body = document
                .body()
                .ok_or_else(|| Error::Document("no <body> element".to_string()))?;
            for node in fragment.nodes() {
                dom::append_child(&body, node);
            }
        }

        let page = BootstrapPageResponse::new(ui, request, &document);
        for listener in &self.listeners {
            listener.modify_bootstrap_page(&page)?;
        }
        document.to_html()
    }
}

impl HostPageLifecycle for BootstrapHost {
    fn add_bootstrap_listener(&mut self, listener: Arc<dyn BootstrapListener>) {
        self.listeners.push(listener);
    }
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// A framework-style bootstrap page. Its head already holds the four
/// singleton elements a merge replaces in place.
#[must_use]
pub fn default_bootstrap_page(title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head>\
         <meta http-equiv=\"Content-Type\" content=\"text/html; charset=utf-8\">\
         <meta http-equiv=\"X-UA-Compatible\" content=\"IE=edge\">\
         <title>{}</title>\
         <link rel=\"shortcut icon\" type=\"image/vnd.microsoft.icon\" href=\"./favicon.ico\">\
         <link rel=\"icon\" type=\"image/vnd.microsoft.icon\" href=\"./favicon.ico\">\
         </head><body><div id=\"app\"></div></body></html>",
        escape_html(title)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Marker;

    impl BootstrapListener for Marker {
        fn modify_bootstrap_fragment(
            &self,
            response: &mut BootstrapFragmentResponse<'_>,
        ) -> Result<()> {
            let id = response.ui().name().to_string();
            response.push(dom::create_element("noscript", &[("id".into(), id)]));
            Ok(())
        }

        fn modify_bootstrap_page(&self, _response: &BootstrapPageResponse<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn install_registers_one_listener() {
        let mut host = BootstrapHost::new();
        let handler = install(&mut host, Arc::new(Registry::standard()));
        assert_eq!(host.listener_count(), 1);
        assert_eq!(handler.config(), HandlerConfig::default());
    }

    #[test]
    fn fragment_nodes_land_in_body() {
        let mut host = BootstrapHost::new();
        host.add_bootstrap_listener(Arc::new(Marker));
        let ui = UiDefinition::new("DemoUI");
        let html = host
            .render_page(&ui, &RequestContext::default(), &default_bootstrap_page("Demo"))
            .expect("render");
        assert!(html.contains("<div id=\"app\"></div><noscript id=\"DemoUI\"></noscript></body>"));
    }

    #[test]
    fn default_page_has_the_singletons() {
        let document = HeadDocument::parse(&default_bootstrap_page("<Demo>"));
        let head = document.head().expect("head");
        for selector in &crate::selector::SINGLETON_SELECTORS {
            assert_eq!(selector.select(&head).len(), 1, "{selector}");
        }
        let html = document.to_html().expect("serialize");
        assert!(html.contains("<title>&lt;Demo&gt;</title>"));
    }
}
