//! Static checks of UI definitions, run without rendering a page.
//!
//! Chains without a generator are evaluated against an empty request, so a
//! failing request accessor shows up here as a failure even though it might
//! succeed for real traffic. Generator chains are only resolved.

use std::error::Error;
use std::path::Path;

use anyhow::Result;
use headtags_model::{Registry, RequestContext, UiDefinition};
use walkdir::WalkDir;

use crate::attributes::resolve_attributes;
use crate::builder::build;
use crate::config::{GeneratorCatalog, HeadTagsConfig};
use crate::report::{CheckReport, CheckResult};
use crate::resolver::resolve;

fn source_chain(error: &dyn Error) -> Vec<String> {
    let mut details = Vec::new();
    let mut source = error.source();
    while let Some(cause) = source {
        details.push(cause.to_string());
        source = cause.source();
    }
    details
}

/// Checks one UI definition.
#[must_use]
pub fn check_ui(registry: &Registry, ui: &UiDefinition) -> CheckReport {
    let mut report = CheckReport::new();
    let resolution = match resolve(registry, ui) {
        Ok(resolution) => resolution,
        Err(e) => {
            report.push(CheckResult::fail_with_details(
                ui.name(),
                e.to_string(),
                source_chain(&e),
            ));
            return report;
        }
    };

    for unresolved in &resolution.unresolved {
        report.push(CheckResult::warn(
            ui.name(),
            format!("`{unresolved}` produces no head tag"),
        ));
    }

    let request = RequestContext::default();
    for chain in &resolution.chains {
        let subject = format!("{}/{}", ui.name(), chain.kinds().join("<"));
        if chain.generator.is_some() {
            report.push(CheckResult::pass(
                subject,
                format!("<{}> from `{}`, evaluated per request", chain.schema.tag_name, chain.declaring),
            ));
            continue;
        }
        match resolve_attributes(registry, chain, &request) {
            Ok(attributes) => report.push(CheckResult::pass(subject, build(chain, &attributes).to_string())),
            Err(e) => report.push(CheckResult::fail_with_details(subject, e.to_string(), source_chain(&e))),
        }
    }

    if resolution.chains.is_empty() && resolution.unresolved.is_empty() {
        report.push(CheckResult::warn(ui.name(), "declares no head tags"));
    }
    report
}

/// Loads every `*.toml` file under `dir` and checks each UI it defines.
/// Files that fail to load are reported as failures.
///
/// # Errors
///
/// Returns an error if `dir` does not exist.
pub fn check_dir(dir: &Path, catalog: &GeneratorCatalog) -> Result<CheckReport> {
    if !dir.exists() {
        anyhow::bail!("{} does not exist", dir.display());
    }
    let mut report = CheckReport::new();
    let mut files = 0usize;

    for entry in WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().map(|x| x == "toml").unwrap_or(false)
                && !e
                    .path()
                    .strip_prefix(dir)
                    .unwrap_or(e.path())
                    .components()
                    .any(|c| c.as_os_str() == "target")
        })
    {
        files += 1;
        let path = entry.path();
        let rel = path.strip_prefix(dir).unwrap_or(path).display().to_string();
        match HeadTagsConfig::load(path, catalog) {
            Ok(config) => {
                report.push(CheckResult::pass(
                    &rel,
                    format!("{} UI definition(s)", config.uis.len()),
                ));
                for ui in &config.uis {
                    report.extend(check_ui(&config.registry, ui));
                }
            }
            Err(e) => report.push(CheckResult::fail_with_details(rel, e.to_string(), source_chain(&e))),
        }
    }

    if files == 0 {
        report.push(CheckResult::warn(
            dir.display().to_string(),
            "no configuration files found",
        ));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Severity;
    use headtags_model::{kinds, Declaration, DeclarationKind};

    #[test]
    fn literal_chains_pass_with_their_markup() {
        let ui = UiDefinition::new("DemoUI").declare(kinds::link::new("foobar", "about:blank"));
        let report = check_ui(&Registry::standard(), &ui);
        assert!(report.all_passed());
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].subject, "DemoUI/link");
        assert_eq!(report.results[0].message, r#"<link rel="foobar" href="about:blank">"#);
    }

    #[test]
    fn orphan_declarations_warn() {
        let mut registry = Registry::standard();
        registry
            .register(DeclarationKind::new("orphan"))
            .expect("register");
        let ui = UiDefinition::new("ui").declare(Declaration::new("orphan"));
        let report = check_ui(&registry, &ui);
        assert!(report.all_passed());
        assert_eq!(report.warning_count(), 1);
    }

    #[test]
    fn failing_accessors_fail() {
        let ui = UiDefinition::new("ui").declare(
            kinds::meta::named(
                "broken",
                headtags_model::AttributeSpec::request(|_| Err("no session".into())),
            ),
        );
        let report = check_ui(&Registry::standard(), &ui);
        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.results[0].severity, Severity::Failure);
        assert_eq!(report.results[0].details, vec!["no session".to_string()]);
    }

    #[test]
    fn target_ancestors_of_the_root_are_walked() {
        let root = std::env::temp_dir()
            .join("target")
            .join(format!("headtags-check-{}", std::process::id()));
        std::fs::create_dir_all(root.join("target")).expect("temp dir");
        std::fs::write(root.join("broken.toml"), "[[ui]]\nname = \"x\"\ntags = [{ kind = \"nope\" }]\n")
            .expect("write broken");
        std::fs::write(root.join("target").join("skipped.toml"), "not toml [").expect("write skipped");

        let report = check_dir(&root, &GeneratorCatalog::new()).expect("check");
        std::fs::remove_dir_all(&root).ok();

        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.results.len(), 1);
        assert_eq!(report.results[0].subject, "broken.toml");
    }

    #[test]
    fn missing_directories_are_errors() {
        assert!(check_dir(Path::new("/nonexistent/headtags"), &GeneratorCatalog::new()).is_err());
    }
}
