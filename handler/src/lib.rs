//! Head tag resolution and merging for bootstrap pages.
//!
//! For every render the [`HeaderTagHandler`]:
//!
//! 1. resolves the tag-producing chains declared on a [`UiDefinition`]
//!    ([`resolve_chains`]);
//! 2. evaluates each chain's attributes against the request
//!    ([`resolve_attributes`]);
//! 3. builds one [`HeadElementSpec`] per chain ([`build`]);
//! 4. merges the elements into the page `<head>` ([`merge`]), replacing the
//!    four singleton tags matched by [`SINGLETON_SELECTORS`] in place.
//!
//! The handler is registered once with a host through [`install`] and then
//! runs from the host's page-finalization hook.
//!
//! # Entry Point
//!
//! ```
//! use std::sync::Arc;
//!
//! use headtags::{default_bootstrap_page, install, BootstrapHost};
//! use headtags_model::{kinds, Registry, RequestContext, UiDefinition};
//!
//! let mut host = BootstrapHost::new();
//! install(&mut host, Arc::new(Registry::standard()));
//!
//! let ui = UiDefinition::new("DemoUI")
//!     .declare(kinds::meta::http_equiv("X-UA-Compatible", "hello"))
//!     .declare(kinds::link::new("foobar", "about:blank"));
//! let html = host
//!     .render_page(&ui, &RequestContext::default(), &default_bootstrap_page("Demo"))
//!     .expect("render");
//! assert!(html.contains(r#"<meta http-equiv="X-UA-Compatible" content="hello">"#));
//! assert!(html.contains(r#"<link rel="foobar" href="about:blank"></head>"#));
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod attributes;
pub mod builder;
pub mod check;
pub mod config;
pub mod document;
pub mod dom;
pub mod error;
pub mod lifecycle;
pub mod merge;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod selector;

pub use attributes::{resolve_attributes, AttributeMap};
pub use builder::{build, HeadElementSpec};
pub use check::{check_dir, check_ui};
pub use config::{ConfigError, GeneratorCatalog, HeadTagsConfig};
pub use document::HeadDocument;
pub use error::{ConfigurationError, Error, Result};
pub use lifecycle::{
    default_bootstrap_page, install, install_with, BootstrapFragmentResponse, BootstrapHost,
    BootstrapListener, BootstrapPageResponse, HostPageLifecycle,
};
pub use merge::merge;
pub use pipeline::{FailurePolicy, HandlerConfig, HeaderTagHandler, FAILURE_POLICY_ENV};
pub use report::{CheckReport, CheckResult, Severity};
pub use resolver::{find_chain, resolve, resolve_chains, Resolution, ResolvedChain};
pub use selector::{HeadSelector, SINGLETON_SELECTORS};
