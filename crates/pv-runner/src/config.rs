//! Run configuration.

use std::path::PathBuf;
use std::time::Duration;

use pv_checks::BuildPaths;

use crate::error::ConfigError;

/// Conventional Buildroot location on the build host.
pub const DEFAULT_BUILD_ROOT: &str = "/mnt/data/buildroot";

/// Report file name, written under the build root unless overridden.
pub const REPORT_FILE_NAME: &str = "validation_report.json";

/// Configuration for one validation run. Immutable once the run starts.
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Root of the Buildroot tree
    pub build_root: PathBuf,
    /// Where to write the JSON report (default: `<build_root>/validation_report.json`)
    pub report_path: Option<PathBuf>,
    /// Persist the JSON report
    pub write_report: bool,
    /// Run external commands for deeper verification
    pub probe_commands: bool,
    /// Timeout per external command
    pub command_timeout: Duration,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            build_root: PathBuf::from(DEFAULT_BUILD_ROOT),
            report_path: None,
            write_report: true,
            probe_commands: false,
            command_timeout: Duration::from_secs(5),
        }
    }
}

impl ValidatorConfig {
    /// Default config for a given build root.
    pub fn for_root(build_root: impl Into<PathBuf>) -> Self {
        Self {
            build_root: build_root.into(),
            ..Default::default()
        }
    }

    /// Filesystem checks only, no report file.
    pub fn quick() -> Self {
        Self {
            write_report: false,
            probe_commands: false,
            ..Default::default()
        }
    }

    /// Filesystem checks plus command probes.
    pub fn thorough() -> Self {
        Self {
            probe_commands: true,
            command_timeout: Duration::from_secs(10),
            ..Default::default()
        }
    }

    /// Check the configuration before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.build_root.as_os_str().is_empty() {
            return Err(ConfigError::EmptyBuildRoot);
        }
        if self.command_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        Ok(())
    }

    /// Resolved build tree layout.
    pub fn paths(&self) -> BuildPaths {
        BuildPaths::new(&self.build_root)
    }

    /// Where the report is written.
    pub fn report_path(&self) -> PathBuf {
        self.report_path
            .clone()
            .unwrap_or_else(|| self.build_root.join(REPORT_FILE_NAME))
    }
}
