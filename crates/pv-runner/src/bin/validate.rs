//! CLI for validating a Buildroot output tree before flashing.
//!
//! # Usage
//!
//! ```bash
//! # Validate the default build root
//! pv-validate
//!
//! # Validate another tree and run the cross compiler as well
//! pv-validate --build-root ~/buildroot --probe-commands
//!
//! # Filesystem checks only, no JSON report
//! pv-validate --preset quick
//!
//! # Skip the JSON report, debug logging on stderr
//! pv-validate --no-report -v
//! ```
//!
//! Exit status: 0 for READY or CONDITIONAL, 1 for NOT READY, 2 when the run
//! could not start.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use pv_checks::Phase;
use pv_runner::config::DEFAULT_BUILD_ROOT;
use pv_runner::{finish_run, run_validation, ReportGenerator, ReportStatus, ValidatorConfig};
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Starting configuration; explicit flags override it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Preset {
    /// Filesystem checks and the JSON report
    Default,
    /// Filesystem checks only, no report file
    Quick,
    /// Filesystem checks plus external commands, longer timeout
    Thorough,
}

#[derive(Debug, Parser)]
#[command(
    name = "pv-validate",
    version,
    about = "Validate Buildroot output before flashing it to an SD card"
)]
struct Args {
    /// Root of the Buildroot tree
    #[arg(short = 'r', long, env = "PV_BUILD_ROOT", default_value = DEFAULT_BUILD_ROOT)]
    build_root: PathBuf,

    /// Where to write the JSON report (default: <build-root>/validation_report.json)
    #[arg(short = 'o', long = "report", env = "PV_REPORT_PATH")]
    report_path: Option<PathBuf>,

    /// Starting configuration
    #[arg(long, value_enum, default_value_t = Preset::Default)]
    preset: Preset,

    /// Do not write the JSON report
    #[arg(long)]
    no_report: bool,

    /// Run external commands (e.g. the cross compiler) for deeper verification
    #[arg(long)]
    probe_commands: bool,

    /// Timeout per external command, in seconds (default depends on the preset)
    #[arg(long)]
    command_timeout_secs: Option<u64>,

    /// Debug logging on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Log as JSON lines
    #[arg(long)]
    log_json: bool,
}

impl Args {
    fn to_config(&self) -> ValidatorConfig {
        let mut config = match self.preset {
            Preset::Default => ValidatorConfig::default(),
            Preset::Quick => ValidatorConfig::quick(),
            Preset::Thorough => ValidatorConfig::thorough(),
        };

        config.build_root = self.build_root.clone();
        if let Some(ref path) = self.report_path {
            config.report_path = Some(path.clone());
        }
        if self.no_report {
            config.write_report = false;
        }
        if self.probe_commands {
            config.probe_commands = true;
        }
        if let Some(secs) = self.command_timeout_secs {
            config.command_timeout = Duration::from_secs(secs);
        }
        config
    }
}

fn init_tracing(verbose: bool, log_json: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose, args.log_json);

    let config = args.to_config();

    println!();
    println!("Starting validation of {}", config.build_root.display());

    let mut current_phase: Option<Phase> = None;
    let log = match run_validation(&config, |check, result| {
        if current_phase != Some(check.phase()) {
            current_phase = Some(check.phase());
            println!();
            println!("[{}]", check.phase());
        }
        println!("{}", ReportGenerator::format_check(result));
    }) {
        Ok(log) => log,
        Err(e) => {
            error!(error = %e, "validation run aborted");
            eprintln!("Error: {}", e);
            return ExitCode::from(2);
        }
    };

    println!();
    print!("{}", ReportGenerator::new(&log).format_summary());

    let outcome = finish_run(&log, &config);
    match outcome.report {
        ReportStatus::Saved(ref path) => println!("\nDetailed report saved: {}", path.display()),
        ReportStatus::Failed(ref e) => eprintln!("\nError: could not save report: {}", e),
        ReportStatus::Skipped => {}
    }
    println!("{}", "=".repeat(70));
    println!();

    ExitCode::from(outcome.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ValidatorConfig {
        Args::try_parse_from(args).unwrap().to_config()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["pv-validate", "-r", "/tmp/br"]);
        assert_eq!(config.build_root, PathBuf::from("/tmp/br"));
        assert!(config.write_report);
        assert!(!config.probe_commands);
        assert_eq!(config.command_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_quick_preset_skips_report() {
        let config = parse(&["pv-validate", "-r", "/tmp/br", "--preset", "quick"]);
        assert!(!config.write_report);
        assert!(!config.probe_commands);
    }

    #[test]
    fn test_thorough_preset_runs_commands() {
        let config = parse(&["pv-validate", "-r", "/tmp/br", "--preset", "thorough"]);
        assert!(config.probe_commands);
        assert!(config.write_report);
        assert_eq!(config.command_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_flags_override_preset() {
        let config = parse(&[
            "pv-validate",
            "-r",
            "/tmp/br",
            "--preset",
            "thorough",
            "--no-report",
            "--command-timeout-secs",
            "2",
        ]);
        assert!(config.probe_commands);
        assert!(!config.write_report);
        assert_eq!(config.command_timeout, Duration::from_secs(2));
    }
}
