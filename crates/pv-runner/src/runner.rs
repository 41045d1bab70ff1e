//! Check registry and sequential execution.
//!
//! Every registered check runs exactly once, in registration order. A failing
//! check never stops later checks from running.

use std::path::PathBuf;

use pv_checks::{Check, CheckContext, CommandProbe};
use pv_core::{CheckResult, CoreError, ResultLog, Verdict};
use tracing::{debug, error, info};

use crate::config::ValidatorConfig;
use crate::error::{ReportError, ValidationError};
use crate::report::ReportGenerator;

/// Ordered registry of checks plus the log they fill.
#[derive(Debug, Default)]
pub struct Runner {
    checks: Vec<Check>,
    log: ResultLog,
}

impl Runner {
    /// Create a runner with no checks registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with the full checklist, in phase order.
    pub fn with_default_checks() -> Self {
        Self {
            checks: Check::ALL.to_vec(),
            log: ResultLog::new(),
        }
    }

    /// Register a check. Names must be unique within the registry.
    pub fn register(&mut self, check: Check) -> Result<(), CoreError> {
        if self.checks.iter().any(|c| c.name() == check.name()) {
            return Err(CoreError::DuplicateCheck(check.name().to_string()));
        }
        self.checks.push(check);
        Ok(())
    }

    /// Registered checks in execution order.
    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Run every registered check once and return the filled log.
    ///
    /// `observer` sees each result as soon as it is recorded.
    pub fn run<F>(
        mut self,
        ctx: &CheckContext<'_>,
        mut observer: F,
    ) -> Result<ResultLog, CoreError>
    where
        F: FnMut(&Check, &CheckResult),
    {
        info!(
            checks = self.checks.len(),
            build_root = %ctx.paths.root().display(),
            command_probes = ctx.commands.is_some(),
            "starting validation run"
        );

        for check in &self.checks {
            let result = check.run(ctx);
            debug!(phase = %check.phase(), "{}", result.format_status());
            observer(check, &result);
            self.log.append(result)?;
        }

        let summary = self.log.summary();
        info!(
            passed = summary.passed,
            failed = summary.failed,
            warnings = summary.warnings,
            "validation run finished"
        );
        Ok(self.log)
    }
}

/// Run the full checklist as configured.
pub fn run_validation<F>(
    config: &ValidatorConfig,
    observer: F,
) -> Result<ResultLog, ValidationError>
where
    F: FnMut(&Check, &CheckResult),
{
    config.validate()?;

    let paths = config.paths();
    let commands = if config.probe_commands {
        Some(CommandProbe::new(config.command_timeout).map_err(ValidationError::Runtime)?)
    } else {
        None
    };

    let mut ctx = CheckContext::new(&paths);
    if let Some(ref commands) = commands {
        ctx = ctx.with_commands(commands);
    }

    let log = Runner::with_default_checks().run(&ctx, observer)?;
    Ok(log)
}

/// What happened to the persisted report.
#[derive(Debug)]
pub enum ReportStatus {
    /// Persistence disabled by configuration
    Skipped,
    /// Written to this path
    Saved(PathBuf),
    /// Could not be written; the verdict is unaffected
    Failed(ReportError),
}

/// Verdict and report persistence for a finished run.
#[derive(Debug)]
pub struct RunOutcome {
    /// Readiness verdict from the final tally
    pub verdict: Verdict,
    /// Report persistence result
    pub report: ReportStatus,
}

impl RunOutcome {
    /// Process exit code. Depends on the verdict only.
    pub fn exit_code(&self) -> u8 {
        self.verdict.exit_code()
    }
}

/// Classify a finished log and persist its report if configured.
///
/// The verdict is computed before the write, so a write failure never changes it.
pub fn finish_run(log: &ResultLog, config: &ValidatorConfig) -> RunOutcome {
    let generator = ReportGenerator::new(log);
    let verdict = generator.verdict();

    if !config.write_report {
        return RunOutcome {
            verdict,
            report: ReportStatus::Skipped,
        };
    }

    let path = config.report_path();
    let report = match generator.snapshot().write(&path) {
        Ok(()) => {
            info!(path = %path.display(), "report saved");
            ReportStatus::Saved(path)
        }
        Err(e) => {
            error!(error = %e, "failed to save report");
            ReportStatus::Failed(e)
        }
    };

    RunOutcome { verdict, report }
}

#[cfg(test)]
mod tests {
    use pv_checks::BuildPaths;
    use pv_core::Status;

    use super::*;

    #[test]
    fn test_default_registry_is_complete() {
        let runner = Runner::with_default_checks();
        assert_eq!(runner.checks(), &Check::ALL);
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut runner = Runner::new();
        runner.register(Check::KernelImage).unwrap();
        let err = runner.register(Check::KernelImage).unwrap_err();
        assert_eq!(err, CoreError::DuplicateCheck("Kernel Image".to_string()));
        assert_eq!(runner.checks().len(), 1);
    }

    #[test]
    fn test_runs_in_registration_order_without_short_circuit() {
        let dir = tempfile::tempdir().unwrap();
        let paths = BuildPaths::new(dir.path());
        let ctx = CheckContext::new(&paths);

        let mut runner = Runner::new();
        runner.register(Check::Toolchain).unwrap();
        runner.register(Check::ImageFile).unwrap();
        runner.register(Check::I2cTools).unwrap();

        let mut seen = Vec::new();
        let log = runner.run(&ctx, |check, _| seen.push(*check)).unwrap();

        assert_eq!(seen, [Check::Toolchain, Check::ImageFile, Check::I2cTools]);
        let names: Vec<_> = log.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Toolchain", "Image File", "I2C Tools"]);
        // The failing image check did not stop the advisory check after it.
        assert_eq!(log.get("Image File").unwrap().status, Status::Fail);
        assert_eq!(log.get("I2C Tools").unwrap().status, Status::Warn);
    }

    #[test]
    fn test_report_write_failure_keeps_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let config = ValidatorConfig {
            report_path: Some(dir.path().join("missing/validation_report.json")),
            ..ValidatorConfig::for_root(dir.path())
        };

        let log = run_validation(&config, |_, _| {}).unwrap();
        let outcome = finish_run(&log, &config);

        assert!(matches!(outcome.report, ReportStatus::Failed(ReportError::Write { .. })));
        assert_eq!(outcome.verdict, Verdict::NotReady);
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn test_finish_run_saves_or_skips() {
        let dir = tempfile::tempdir().unwrap();
        let config = ValidatorConfig::for_root(dir.path());
        let log = run_validation(&config, |_, _| {}).unwrap();

        let outcome = finish_run(&log, &config);
        let saved = config.report_path();
        assert!(matches!(outcome.report, ReportStatus::Saved(ref p) if p == &saved));
        assert!(saved.exists());

        let config = ValidatorConfig {
            write_report: false,
            report_path: Some(dir.path().join("skipped.json")),
            ..ValidatorConfig::for_root(dir.path())
        };
        let outcome = finish_run(&log, &config);
        assert!(matches!(outcome.report, ReportStatus::Skipped));
        assert!(!dir.path().join("skipped.json").exists());
        assert_eq!(outcome.exit_code(), outcome.verdict.exit_code());
    }

    #[test]
    fn test_run_validation_rejects_bad_config() {
        let config = ValidatorConfig::for_root("");
        let err = run_validation(&config, |_, _| {}).unwrap_err();
        assert!(matches!(err, ValidationError::Config(_)));
    }
}
