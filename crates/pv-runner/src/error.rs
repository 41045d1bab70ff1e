//! Error types for configuration, running and persistence.

use std::path::PathBuf;

use pv_core::CoreError;

/// Invalid configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("build root must not be empty")]
    EmptyBuildRoot,

    #[error("command timeout must be positive")]
    ZeroTimeout,
}

/// Errors reading or writing the persisted report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report to {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read report from {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("report encoding error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that prevent a validation run from starting or completing.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("registry error: {0}")]
    Registry(#[from] CoreError),

    #[error("failed to start command runtime: {0}")]
    Runtime(#[source] std::io::Error),
}
