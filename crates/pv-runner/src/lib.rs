//! # pv-runner
//!
//! Runs the post-build checklist against a Buildroot tree and reports a
//! deployment-readiness verdict.
//!
//! ```text
//! ValidatorConfig ──> BuildPaths ──> Runner ──(17 checks, in order)──> ResultLog
//!                                                                         │
//!                                                   ReportGenerator <─────┘
//!                                                   ├─ text summary + verdict (stdout)
//!                                                   └─ validation_report.json
//! ```
//!
//! # Usage
//!
//! ```bash
//! # Validate the default build root
//! cargo run -p pv-runner --bin pv-validate
//!
//! # Validate another tree, also running the cross compiler
//! cargo run -p pv-runner --bin pv-validate -- --build-root ~/buildroot --probe-commands
//! ```

pub mod config;
pub mod error;
pub mod report;
pub mod runner;

pub use config::ValidatorConfig;
pub use error::{ConfigError, ReportError, ValidationError};
pub use report::{Report, ReportGenerator};
pub use runner::{finish_run, run_validation, ReportStatus, RunOutcome, Runner};
