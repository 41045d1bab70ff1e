//! Deployment-readiness verdict.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::log::Summary;

/// Minimum number of passing checks for a READY verdict.
pub const READY_PASSED_MIN: u64 = 12;

/// Maximum failures tolerated by a CONDITIONAL verdict.
pub const CONDITIONAL_FAILED_MAX: u64 = 2;

/// Maximum warnings tolerated by a CONDITIONAL verdict.
pub const CONDITIONAL_WARNINGS_MAX: u64 = 3;

/// Readiness classification computed once from the final tally.
///
/// Ordered from best to worst, so `a <= b` means `a` is at least as good.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    /// No failures and enough passing checks
    Ready,
    /// A few failures or warnings to review
    Conditional,
    /// Critical failures
    NotReady,
}

impl Verdict {
    /// Classify a final tally.
    pub fn from_summary(summary: &Summary) -> Self {
        if summary.failed == 0 && summary.passed >= READY_PASSED_MIN {
            Verdict::Ready
        } else if summary.failed <= CONDITIONAL_FAILED_MAX
            && summary.warnings <= CONDITIONAL_WARNINGS_MAX
        {
            Verdict::Conditional
        } else {
            Verdict::NotReady
        }
    }

    /// Status headline.
    pub fn headline(&self) -> &'static str {
        match self {
            Verdict::Ready => "STATUS: READY FOR DEPLOYMENT ✓",
            Verdict::Conditional => "STATUS: CONDITIONAL PASS ⚠",
            Verdict::NotReady => "STATUS: NOT READY ✗",
        }
    }

    /// Guidance line printed under the headline.
    pub fn guidance(&self) -> &'static str {
        match self {
            Verdict::Ready => "System passed all critical tests. Safe to flash to SD card.",
            Verdict::Conditional => "System mostly functional. Review warnings before deployment.",
            Verdict::NotReady => "Critical failures detected. Fix issues before flashing.",
        }
    }

    /// Process exit code for CI: only NOT_READY is a failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Verdict::Ready | Verdict::Conditional => 0,
            Verdict::NotReady => 1,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Verdict::Ready => "READY",
            Verdict::Conditional => "CONDITIONAL",
            Verdict::NotReady => "NOT_READY",
        };
        f.write_str(name)
    }
}
