//! `headtags-render`: Renders a UI's bootstrap page with its head tags merged in.
//!
//! Loads UI definitions from a TOML file, builds a request from the given
//! headers, and prints the merged HTML (or, with `--json`, the resolved head
//! elements). Without `--input` a default bootstrap page is used.
//!
//! **Usage:**
//! ```
//! headtags-render --config <toml> --ui <name> [--input <html>]
//!                 [--header "Name: value"]... [--policy abort|skip] [--json] [--out <path>]
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use headtags::{default_bootstrap_page, install_with, BootstrapHost, FailurePolicy, HandlerConfig, HeadTagsConfig};
use headtags_clients::builtin_catalog;
use headtags_model::RequestContext;

/// Render a bootstrap page for one configured UI.
#[derive(Parser)]
#[command(name = "headtags-render", about = "Merge declared head tags into a bootstrap page")]
struct Args {
    /// TOML file declaring kinds and UIs.
    #[arg(long)]
    config: PathBuf,

    /// Name of the UI to render.
    #[arg(long)]
    ui: String,

    /// Bootstrap page to merge into (default: a generated page).
    #[arg(long)]
    input: Option<PathBuf>,

    /// Request header, as `Name: value`. May be repeated.
    #[arg(long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Failure policy for generator errors (default: $HEADTAGS_FAILURE_POLICY, else abort).
    #[arg(long)]
    policy: Option<FailurePolicy>,

    /// Print the resolved head elements as JSON instead of HTML.
    #[arg(long)]
    json: bool,

    /// Write the output to this file instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Request path.
    #[arg(long, default_value = "/")]
    path: String,
}

fn parse_header(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected `Name: value`, got `{raw}`"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("empty header name in `{raw}`"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_module("html5ever", log::LevelFilter::Warn)
        .init();

    let args = Args::parse();

    let config = HeadTagsConfig::load(&args.config, &builtin_catalog())
        .with_context(|| format!("Failed to load {}", args.config.display()))?;
    let ui = config
        .ui(&args.ui)
        .with_context(|| format!("No UI named `{}` in {}", args.ui, args.config.display()))?;

    let request = args
        .headers
        .iter()
        .fold(RequestContext::new(args.path.as_str()), |request, (name, value)| {
            request.with_header(name.as_str(), value.as_str())
        });

    let mut handler_config = HandlerConfig::from_env();
    if let Some(policy) = args.policy {
        handler_config.failure_policy = policy;
    }

    let mut host = BootstrapHost::new();
    let handler = install_with(&mut host, Arc::new(config.registry.clone()), handler_config);

    let output = if args.json {
        let elements = handler
            .head_elements(ui, &request)
            .with_context(|| format!("Failed to resolve head tags of `{}`", args.ui))?;
        serde_json::to_string_pretty(&elements).context("Failed to serialize head elements")?
    } else {
        let page = match &args.input {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?,
            None => default_bootstrap_page(ui.name()),
        };
        host.render_page(ui, &request, &page)
            .with_context(|| format!("Failed to render `{}`", args.ui))?
    };

    match &args.out {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        None => println!("{output}"),
    }
    Ok(())
}
