//! Bounded external command probes.
//!
//! Used for optional deeper verification (e.g. running the cross compiler).
//! Every invocation is wrapped in a wall-clock timeout; the child is killed
//! when the timeout elapses.

use std::ffi::OsStr;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use tokio::process::Command;
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

/// Result of running one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Exited with status 0
    Success {
        /// Captured standard output
        stdout: String,
    },
    /// Exited with a non-zero status
    Failed {
        /// Exit code, if the process was not killed by a signal
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },
    /// Could not be started
    SpawnError(String),
    /// Did not finish within the timeout
    TimedOut(Duration),
}

impl CommandOutcome {
    /// Whether the command exited successfully.
    pub fn succeeded(&self) -> bool {
        matches!(self, CommandOutcome::Success { .. })
    }

    /// One-line description for a check's detail.
    pub fn describe(&self) -> String {
        match self {
            CommandOutcome::Success { stdout } => stdout
                .lines()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("no output")
                .trim()
                .to_string(),
            CommandOutcome::Failed { code, stderr } => {
                let first = stderr.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
                match code {
                    Some(code) => format!("exited with status {}: {}", code, first.trim()),
                    None => format!("terminated by signal: {}", first.trim()),
                }
            }
            CommandOutcome::SpawnError(e) => format!("failed to start: {}", e),
            CommandOutcome::TimedOut(timeout) => format!("timeout after {:?}", timeout),
        }
    }
}

/// Runs external commands one at a time under a timeout.
///
/// Owns a current-thread runtime so callers stay synchronous.
pub struct CommandProbe {
    runtime: Runtime,
    timeout: Duration,
}

impl CommandProbe {
    /// Create a probe with the given per-command timeout.
    pub fn new(timeout: Duration) -> io::Result<Self> {
        debug_assert!(!timeout.is_zero(), "Command timeout must be positive");

        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { runtime, timeout })
    }

    /// Run `program` with `args` and wait for it, at most `timeout`.
    pub fn run<S: AsRef<OsStr>>(&self, program: &Path, args: &[S]) -> CommandOutcome {
        let start = Instant::now();
        let timeout = self.timeout;

        let result = self.runtime.block_on(async {
            let mut command = Command::new(program);
            command.args(args).kill_on_drop(true);
            tokio::time::timeout(timeout, command.output()).await
        });

        let outcome = match result {
            Ok(Ok(output)) => {
                if output.status.success() {
                    CommandOutcome::Success {
                        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                    }
                } else {
                    CommandOutcome::Failed {
                        code: output.status.code(),
                        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                    }
                }
            }
            Ok(Err(e)) => CommandOutcome::SpawnError(e.to_string()),
            Err(_) => CommandOutcome::TimedOut(timeout),
        };

        debug!(
            program = %program.display(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            succeeded = outcome.succeeded(),
            "command probe finished"
        );
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_success_uses_first_line() {
        let outcome = CommandOutcome::Success {
            stdout: "\naarch64-buildroot-linux-gnu-gcc (Buildroot 2024.02) 12.3.0\nCopyright"
                .into(),
        };
        assert_eq!(
            outcome.describe(),
            "aarch64-buildroot-linux-gnu-gcc (Buildroot 2024.02) 12.3.0"
        );
    }

    #[test]
    fn test_describe_timeout() {
        let outcome = CommandOutcome::TimedOut(Duration::from_secs(5));
        assert!(outcome.describe().contains("timeout"));
    }

    #[test]
    fn test_missing_program_is_spawn_error() {
        let probe = CommandProbe::new(Duration::from_secs(5)).unwrap();
        let outcome = probe.run(Path::new("/nonexistent/pv-probe-binary"), &["--version"]);
        assert!(matches!(outcome, CommandOutcome::SpawnError(_)));
    }

    #[cfg(unix)]
    #[test]
    fn test_success_and_failure() {
        let probe = CommandProbe::new(Duration::from_secs(5)).unwrap();

        let ok = probe.run(Path::new("/bin/sh"), &["-c", "echo hello"]);
        assert_eq!(
            ok,
            CommandOutcome::Success {
                stdout: "hello\n".to_string()
            }
        );

        let failed = probe.run(Path::new("/bin/sh"), &["-c", "echo broken >&2; exit 3"]);
        assert!(matches!(failed, CommandOutcome::Failed { code: Some(3), .. }));
        assert!(failed.describe().contains("broken"));
    }

    #[cfg(unix)]
    #[test]
    fn test_slow_command_times_out() {
        let probe = CommandProbe::new(Duration::from_millis(200)).unwrap();
        let start = Instant::now();
        let outcome = probe.run(Path::new("/bin/sh"), &["-c", "sleep 10"]);
        assert_eq!(outcome, CommandOutcome::TimedOut(Duration::from_millis(200)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }
}
