//! Text rendering and JSON persistence of a finished run.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use pv_core::{CheckResult, ResultLog, Summary, Verdict};
use serde::{Deserialize, Serialize};

use crate::error::ReportError;

const RULE_WIDTH: usize = 70;

/// Persisted snapshot of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// When the snapshot was taken
    pub timestamp: DateTime<Utc>,
    /// Per-check results, keyed by check name in run order
    pub tests: ResultLog,
    /// Final tally
    pub summary: Summary,
    /// Readiness verdict
    pub verdict: Verdict,
}

impl Report {
    /// Write the report as pretty JSON, replacing any previous report.
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| ReportError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a previously written report.
    pub fn load(path: &Path) -> Result<Self, ReportError> {
        let json = fs::read_to_string(path).map_err(|source| ReportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}

/// Renders a finished log. Never modifies it.
pub struct ReportGenerator<'a> {
    log: &'a ResultLog,
}

impl<'a> ReportGenerator<'a> {
    /// Wrap a finished log.
    pub fn new(log: &'a ResultLog) -> Self {
        Self { log }
    }

    /// Verdict for the log's final tally.
    pub fn verdict(&self) -> Verdict {
        Verdict::from_summary(&self.log.summary())
    }

    /// One check as printed: glyph, name and message, then an indented detail line.
    pub fn format_check(result: &CheckResult) -> String {
        let mut line = format!("{} {}: {}", result.status.symbol(), result.name, result.message);
        if let Some(ref detail) = result.detail {
            line.push_str("\n  ");
            line.push_str(detail);
        }
        line
    }

    /// Every check line in run order.
    pub fn format_checks(&self) -> String {
        let mut out = String::new();
        for result in self.log.entries() {
            out.push_str(&Self::format_check(result));
            out.push('\n');
        }
        out
    }

    /// Summary counts and the verdict block.
    pub fn format_summary(&self) -> String {
        let summary = self.log.summary();
        let verdict = self.verdict();
        let rule = "=".repeat(RULE_WIDTH);

        let mut out = String::new();
        out.push_str(&rule);
        out.push_str("\nVALIDATION REPORT\n");
        out.push_str(&rule);
        out.push_str("\n\n");

        out.push_str(&format!("Total Tests: {}\n", summary.total()));
        out.push_str(&format!("✓ Passed: {}\n", summary.passed));
        out.push_str(&format!("✗ Failed: {}\n", summary.failed));
        out.push_str(&format!("⚠ Warnings: {}\n", summary.warnings));

        out.push('\n');
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push('\n');
        out.push_str(verdict.headline());
        out.push('\n');
        out.push_str(verdict.guidance());
        out.push('\n');

        out
    }

    /// Snapshot for persistence, stamped with the current time.
    pub fn snapshot(&self) -> Report {
        self.snapshot_at(Utc::now())
    }

    /// Snapshot for persistence with an explicit timestamp.
    pub fn snapshot_at(&self, timestamp: DateTime<Utc>) -> Report {
        Report {
            timestamp,
            tests: self.log.clone(),
            summary: self.log.summary(),
            verdict: self.verdict(),
        }
    }
}
