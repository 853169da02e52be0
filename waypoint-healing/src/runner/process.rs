//! Subprocess-backed runner invocation with a hard deadline.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver};

use waypoint_core::config::RunnerConfig;
use waypoint_core::errors::RunnerError;

use super::types::{RunOutcome, RunRequest};
use super::TestRunner;

/// Runs the configured runner command as a blocking subprocess.
///
/// The call suspends only here; the healing retry loop is otherwise
/// synchronous. The deadline comes from the request's whole-run timeout;
/// on expiry the child is killed and a timeout error is returned.
pub struct ProcessRunner {
    command: Vec<String>,
}

impl ProcessRunner {
    /// Build from the configured command line (program plus base args).
    pub fn from_config(config: &RunnerConfig) -> Self {
        Self {
            command: config.effective_command(),
        }
    }

    pub fn with_command(command: Vec<String>) -> Self {
        assert!(!command.is_empty(), "runner command must be non-empty");
        Self { command }
    }

    fn build_command(&self, request: &RunRequest) -> Command {
        let mut command = Command::new(&self.command[0]);
        command.args(&self.command[1..]);
        command.arg(&request.test_file);
        if let Some(grep) = &request.grep {
            command.arg("--grep").arg(grep);
        }
        command
            .arg("--workers")
            .arg(request.workers.to_string())
            .arg("--retries")
            .arg(request.retries.to_string())
            .arg("--timeout")
            .arg(request.timeout_ms.to_string())
            .arg("--reporter")
            .arg(&request.reporter)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null());
        command
    }
}

impl TestRunner for ProcessRunner {
    fn run(&self, request: &RunRequest) -> Result<RunOutcome, RunnerError> {
        let started = Instant::now();
        let mut child = self.build_command(request).spawn().map_err(|e| {
            RunnerError::SpawnFailed {
                command: self.command.join(" "),
                message: e.to_string(),
            }
        })?;

        let stdout_rx = drain_pipe(child.stdout.take());
        let stderr_rx = drain_pipe(child.stderr.take());

        let deadline = Duration::from_millis(request.run_timeout_ms);
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) => {
                    if started.elapsed() >= deadline {
                        kill_quietly(&mut child);
                        return Err(RunnerError::Timeout {
                            timeout_ms: request.run_timeout_ms,
                        });
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
                Err(e) => {
                    kill_quietly(&mut child);
                    return Err(RunnerError::OutputUnreadable(e.to_string()));
                }
            }
        };

        let stdout = collect(stdout_rx)?;
        let stderr = collect(stderr_rx)?;
        let exit_code = status.code().unwrap_or(-1);

        Ok(RunOutcome {
            success: status.success(),
            exit_code,
            stdout,
            stderr,
            report_path: None,
            duration_ms: started.elapsed().as_millis() as u64,
        })
    }
}

/// Read a pipe to the end on a helper thread, so the child never blocks on a
/// full pipe buffer while we poll for exit.
fn drain_pipe<R: Read + Send + 'static>(pipe: Option<R>) -> Receiver<std::io::Result<String>> {
    let (tx, rx) = bounded(1);
    if let Some(mut pipe) = pipe {
        std::thread::spawn(move || {
            let mut buffer = String::new();
            let result = pipe.read_to_string(&mut buffer).map(|_| buffer);
            let _ = tx.send(result);
        });
    } else {
        let _ = tx.send(Ok(String::new()));
    }
    rx
}

fn collect(rx: Receiver<std::io::Result<String>>) -> Result<String, RunnerError> {
    match rx.recv() {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(e)) => Err(RunnerError::OutputUnreadable(e.to_string())),
        Err(e) => Err(RunnerError::OutputUnreadable(e.to_string())),
    }
}

fn kill_quietly(child: &mut Child) {
    if let Err(error) = child.kill() {
        tracing::warn!(%error, "failed to kill timed-out runner process");
    }
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;
    use waypoint_core::config::HealingConfig;

    fn request(run_timeout_ms: u64) -> RunRequest {
        let mut request = RunRequest::from_config(
            "journeys/checkout.spec.ts",
            &RunnerConfig::default(),
            &HealingConfig::default(),
        );
        request.run_timeout_ms = run_timeout_ms;
        request
    }

    #[test]
    fn test_spawn_failure_is_an_error() {
        let runner =
            ProcessRunner::with_command(vec!["definitely-not-a-real-binary-xyz".into()]);
        let result = runner.run(&request(1_000));
        assert!(matches!(result, Err(RunnerError::SpawnFailed { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_invocation_captures_output() {
        let runner = ProcessRunner::with_command(vec!["echo".into(), "1 passed".into()]);
        let outcome = runner.run(&request(5_000)).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.exit_code, 0);
        assert!(outcome.stdout.contains("1 passed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_deadline_kills_the_child() {
        // Extra runner args land in $@ of the -c script and are ignored.
        let runner =
            ProcessRunner::with_command(vec!["sh".into(), "-c".into(), "sleep 30".into()]);
        let result = runner.run(&request(200));
        assert!(matches!(result, Err(RunnerError::Timeout { .. })));
    }
}
