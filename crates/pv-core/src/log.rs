//! Append-only, ordered log of check results.
//!
//! Serialized as a JSON object keyed by check name, with entries written in
//! the order they were recorded:
//!
//! ```json
//! {
//!   "Image File": { "status": "PASS", "message": "Found at ...", "detail": "Size: 2560.0 MB" },
//!   "Kernel Image": { "status": "FAIL", "message": "Kernel not found", "detail": null }
//! }
//! ```

use std::fmt;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;
use crate::result::{CheckResult, Status};

/// Running tally of outcomes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of passing checks
    pub passed: u64,
    /// Number of failing checks
    pub failed: u64,
    /// Number of warnings
    pub warnings: u64,
}

impl Summary {
    /// Total number of recorded results.
    pub fn total(&self) -> u64 {
        self.passed + self.failed + self.warnings
    }

    fn record(&mut self, status: Status) {
        match status {
            Status::Pass => self.passed += 1,
            Status::Fail => self.failed += 1,
            Status::Warn => self.warnings += 1,
        }
    }
}

/// Ordered collection of check results for one run.
///
/// Names are unique: appending a second result with an existing name is
/// rejected rather than overwriting the first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResultLog {
    entries: Vec<CheckResult>,
    summary: Summary,
}

impl ResultLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a result and update the tally.
    pub fn append(&mut self, result: CheckResult) -> Result<(), CoreError> {
        if result.name.is_empty() {
            return Err(CoreError::EmptyName);
        }
        if self.contains(&result.name) {
            return Err(CoreError::DuplicateCheck(result.name));
        }

        self.summary.record(result.status);
        self.entries.push(result);

        debug_assert_eq!(self.summary.total(), self.entries.len() as u64);
        Ok(())
    }

    /// Whether a result with this name was recorded.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Look up a result by check name.
    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Results in recording order.
    pub fn entries(&self) -> &[CheckResult] {
        &self.entries
    }

    /// Current tally.
    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Number of recorded results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was recorded yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Serialize)]
struct EntryRef<'a> {
    status: Status,
    message: &'a str,
    detail: Option<&'a str>,
}

#[derive(Deserialize)]
struct EntryOwned {
    status: Status,
    message: String,
    #[serde(default)]
    detail: Option<String>,
}

impl Serialize for ResultLog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            let body = EntryRef {
                status: entry.status,
                message: &entry.message,
                detail: entry.detail.as_deref(),
            };
            map.serialize_entry(&entry.name, &body)?;
        }
        map.end()
    }
}

struct ResultLogVisitor;

impl<'de> Visitor<'de> for ResultLogVisitor {
    type Value = ResultLog;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map from check name to check result")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ResultLog, A::Error> {
        let mut log = ResultLog::new();
        while let Some((name, entry)) = access.next_entry::<String, EntryOwned>()? {
            let result = CheckResult {
                name,
                status: entry.status,
                message: entry.message,
                detail: entry.detail.filter(|d| !d.is_empty()),
            };
            log.append(result).map_err(<A::Error as de::Error>::custom)?;
        }
        Ok(log)
    }
}

impl<'de> Deserialize<'de> for ResultLog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ResultLogVisitor)
    }
}
