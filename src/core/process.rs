// process.rs - Blocking subprocess execution with timeout and cancellation

use std::fs::File;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Shared flag telling in-flight comparisons to stop
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// How a supervised child process ended
#[derive(Debug)]
pub enum Outcome {
    Exited(ExitStatus),
    TimedOut,
    Cancelled,
}

/// Render a command the way a user would type it, for error messages
pub fn display_command(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|s| s.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Spawn `cmd` with stdout and stderr appended to `log_path`, then wait.
///
/// The child is killed and reaped when `timeout` elapses or `cancel` fires.
pub fn run_logged(
    cmd: &mut Command,
    log_path: &Path,
    timeout: Option<Duration>,
    cancel: &CancelToken,
) -> std::io::Result<Outcome> {
    let log = File::create(log_path)?;
    cmd.stdin(Stdio::null())
        .stdout(Stdio::from(log.try_clone()?))
        .stderr(Stdio::from(log));

    let child = cmd.spawn()?;
    supervise(child, timeout, cancel)
}

fn supervise(mut child: Child, timeout: Option<Duration>, cancel: &CancelToken) -> std::io::Result<Outcome> {
    let start = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Outcome::Exited(status));
        }

        let outcome = if cancel.is_cancelled() {
            Some(Outcome::Cancelled)
        } else if timeout.map_or(false, |t| start.elapsed() > t) {
            Some(Outcome::TimedOut)
        } else {
            None
        };

        if let Some(outcome) = outcome {
            log::debug!("Killing pid {} ({:?})", child.id(), outcome);
            child.kill().ok();
            let _ = child.wait();
            return Ok(outcome);
        }

        std::thread::sleep(POLL_INTERVAL);
    }
}

/// Last `max_lines` lines of a log file, or an empty string if unreadable
pub fn tail(path: &Path, max_lines: usize) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => {
            let lines: Vec<&str> = content.lines().collect();
            let start = lines.len().saturating_sub(max_lines);
            lines[start..].join("\n")
        }
        Err(_) => String::new(),
    }
}
