//! The per-render pipeline: resolve, evaluate, build, merge.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use headtags_model::{Registry, RequestContext, UiDefinition};
use log::{debug, warn};
use markup5ever_rcdom::Handle;
use serde::{Deserialize, Serialize};

use crate::attributes::resolve_attributes;
use crate::builder::{build, HeadElementSpec};
use crate::error::Result;
use crate::lifecycle::{BootstrapFragmentResponse, BootstrapListener, BootstrapPageResponse};
use crate::merge::merge;
use crate::resolver::resolve_chains;

/// Environment variable overriding [`HandlerConfig::failure_policy`].
pub const FAILURE_POLICY_ENV: &str = "HEADTAGS_FAILURE_POLICY";

/// What to do when a generator or accessor fails during a render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Fail the whole render; the document is left untouched.
    #[default]
    AbortRender,
    /// Log a warning and drop only the failing chain.
    SkipDeclaration,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" | "abort-render" => Ok(FailurePolicy::AbortRender),
            "skip" | "skip-declaration" => Ok(FailurePolicy::SkipDeclaration),
            other => Err(format!("unknown failure policy `{other}` (expected abort or skip)")),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FailurePolicy::AbortRender => "abort",
            FailurePolicy::SkipDeclaration => "skip",
        })
    }
}

/// Handler settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerConfig {
    /// Failure policy for generator and accessor errors. Configuration
    /// errors always abort.
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

impl HandlerConfig {
    /// Defaults, overridden by `HEADTAGS_FAILURE_POLICY` when set to a
    /// recognised value.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(value) = std::env::var(FAILURE_POLICY_ENV) {
            match value.parse() {
                Ok(policy) => config.failure_policy = policy,
                Err(e) => warn!("ignoring {FAILURE_POLICY_ENV}: {e}"),
            }
        }
        config
    }
}

/// Merges the head tags declared on a UI into its bootstrap page.
///
/// The handler holds only immutable state; generator instances are created
/// per render, so one handler serves concurrent renders.
#[derive(Debug, Clone)]
pub struct HeaderTagHandler {
    registry: Arc<Registry>,
    config: HandlerConfig,
}

impl HeaderTagHandler {
    /// Creates a handler with the default configuration.
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_config(registry, HandlerConfig::default())
    }

    /// Creates a handler with an explicit configuration.
    #[must_use]
    pub fn with_config(registry: Arc<Registry>, config: HandlerConfig) -> Self {
        Self { registry, config }
    }

    /// The registry chains are resolved against.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> HandlerConfig {
        self.config
    }

    /// Resolves and builds the head elements of `ui` for `request`.
    ///
    /// # Errors
    ///
    /// Configuration errors always propagate. Generator construction and
    /// accessor failures propagate under [`FailurePolicy::AbortRender`] and
    /// drop the failing chain under [`FailurePolicy::SkipDeclaration`].
    pub fn head_elements(
        &self,
        ui: &UiDefinition,
        request: &RequestContext,
    ) -> Result<Vec<HeadElementSpec>> {
        let chains = resolve_chains(&self.registry, ui)?;
        let mut elements = Vec::with_capacity(chains.len());
        for chain in &chains {
            match resolve_attributes(&self.registry, chain, request) {
                Ok(attributes) => elements.push(build(chain, &attributes)),
                Err(e)
                    if !e.is_configuration()
                        && self.config.failure_policy == FailurePolicy::SkipDeclaration =>
                {
                    warn!("`{}`: skipping <{}> declaration: {e}", ui.name(), chain.schema.tag_name);
                }
                Err(e) => return Err(e),
            }
        }
        debug!("`{}`: {} head element(s)", ui.name(), elements.len());
        Ok(elements)
    }

    /// Resolves the head elements of `ui` and merges them into `head`.
    /// Nothing is merged if resolution fails.
    ///
    /// # Errors
    ///
    /// See [`HeaderTagHandler::head_elements`] and [`merge`].
    pub fn apply(&self, head: &Handle, ui: &UiDefinition, request: &RequestContext) -> Result<()> {
        let elements = self.head_elements(ui, request)?;
        merge(head, &elements)
    }
}

impl BootstrapListener for HeaderTagHandler {
    fn modify_bootstrap_fragment(&self, _response: &mut BootstrapFragmentResponse<'_>) -> Result<()> {
        Ok(())
    }

    fn modify_bootstrap_page(&self, response: &BootstrapPageResponse<'_>) -> Result<()> {
        let elements = self.head_elements(response.ui(), response.request())?;
        response.document().merge(&elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policies_parse_from_short_and_long_names() {
        assert_eq!("abort".parse::<FailurePolicy>(), Ok(FailurePolicy::AbortRender));
        assert_eq!(" SKIP ".parse::<FailurePolicy>(), Ok(FailurePolicy::SkipDeclaration));
        assert_eq!("skip-declaration".parse::<FailurePolicy>(), Ok(FailurePolicy::SkipDeclaration));
        assert!("retry".parse::<FailurePolicy>().is_err());
        assert_eq!(FailurePolicy::default(), FailurePolicy::AbortRender);
        assert_eq!(FailurePolicy::SkipDeclaration.to_string(), "skip");
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let config: HandlerConfig = toml::from_str("").expect("empty config");
        assert_eq!(config, HandlerConfig::default());
        let config: HandlerConfig =
            toml::from_str("failure_policy = \"skip-declaration\"").expect("config");
        assert_eq!(config.failure_policy, FailurePolicy::SkipDeclaration);
    }
}
