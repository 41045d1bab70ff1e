//! The outcome of a single check.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Outcome classification of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    /// The artifact is present and looks as expected
    Pass,
    /// A critical artifact is missing
    Fail,
    /// Advisory: missing optional tooling or unconfirmed content
    Warn,
}

impl Status {
    /// Glyph printed in front of the check line.
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Pass => "✓",
            Status::Fail => "✗",
            Status::Warn => "⚠",
        }
    }

    /// Upper-case label, as persisted in the report.
    pub fn label(&self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
            Status::Warn => "WARN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of running one check.
///
/// Created once by the check that produced it and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    /// Human-readable check name (e.g. "Kernel Image"), unique within a run
    pub name: String,
    /// Outcome classification
    pub status: Status,
    /// Short outcome summary
    pub message: String,
    /// Supplementary text such as a measured size or an expected path
    pub detail: Option<String>,
}

impl CheckResult {
    /// Create a result with an explicit status.
    #[must_use]
    pub fn new(name: impl Into<String>, status: Status, message: impl Into<String>) -> Self {
        let name = name.into();
        debug_assert!(!name.is_empty(), "Check name must not be empty");

        Self {
            name,
            status,
            message: message.into(),
            detail: None,
        }
    }

    /// Create a passing result.
    #[must_use]
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Pass, message)
    }

    /// Create a failing result.
    #[must_use]
    pub fn fail(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Fail, message)
    }

    /// Create a warning result.
    #[must_use]
    pub fn warn(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(name, Status::Warn, message)
    }

    /// Attach detail text. Empty detail is dropped.
    #[must_use]
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.detail = if detail.is_empty() { None } else { Some(detail) };
        self
    }

    /// Format as a single-line status for logging.
    #[must_use]
    pub fn format_status(&self) -> String {
        format!("[{}] {}: {}", self.status, self.name, self.message)
    }
}
