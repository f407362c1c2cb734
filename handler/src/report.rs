//! Check report types: outcomes, severity levels, and aggregation.

use serde::Serialize;

/// Severity of a check outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The check passed.
    Pass,
    /// Non-blocking finding, e.g. a declaration that resolves to no tag.
    Warning,
    /// The UI would fail to render.
    Failure,
}

/// One check outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResult {
    /// What was checked, e.g. `DemoUI` or `DemoUI/meta`.
    pub subject: String,
    /// Human-readable outcome.
    pub message: String,
    /// Severity of the outcome.
    pub severity: Severity,
    /// Additional detail lines, such as an error's source chain.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl CheckResult {
    fn with(severity: Severity, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            message: message.into(),
            severity,
            details: Vec::new(),
        }
    }

    /// A passing outcome.
    pub fn pass(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(Severity::Pass, subject, message)
    }

    /// A warning.
    pub fn warn(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(Severity::Warning, subject, message)
    }

    /// A failure.
    pub fn fail(subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with(Severity::Failure, subject, message)
    }

    /// A failure with detail lines.
    pub fn fail_with_details(
        subject: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            details,
            ..Self::fail(subject, message)
        }
    }

    /// Returns true for failures.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.severity == Severity::Failure
    }
}

/// Aggregated outcomes.
#[derive(Debug, Default, Serialize)]
pub struct CheckReport {
    /// All outcomes, in check order.
    pub results: Vec<CheckResult>,
}

impl CheckReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome.
    pub fn push(&mut self, result: CheckResult) {
        self.results.push(result);
    }

    /// Appends all outcomes of `other`.
    pub fn extend(&mut self, other: CheckReport) {
        self.results.extend(other.results);
    }

    /// Number of failures.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_failure()).count()
    }

    /// Number of warnings.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Warning)
            .count()
    }

    /// Returns true when nothing failed.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_count() == 0
    }
}
