// comparator.rs - External whole-genome comparator adapter

use crate::core::process::{self, CancelToken, Outcome};
use crate::core::report::ScoreLocator;
use crate::error::{PaniError, Result};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Lines of tool output kept in error messages
const LOG_TAIL_LINES: usize = 20;

/// Anything able to produce an identity percentage for a pair of genomes.
///
/// Implementations must be callable from many worker threads at once.
pub trait Comparator: Send + Sync + Debug {
    /// Identity (0-100) of `query` against `reference`
    fn compare(&self, reference: &Path, query: &Path, cancel: &CancelToken) -> Result<f64>;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// Settings for invoking the external alignment tool
#[derive(Debug, Clone, PartialEq)]
pub struct ToolConfig {
    /// Program to run (looked up in PATH)
    pub program: String,
    /// Arguments placed before `-p <prefix> <ref> <query>`
    pub extra_args: Vec<String>,
    /// Per-comparison wall clock limit
    pub timeout: Option<Duration>,
    /// Directory holding the per-comparison temporary areas
    pub work_dir: PathBuf,
    pub locator: ScoreLocator,
    /// Leave temporary areas on disk for debugging
    pub keep_temp: bool,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: "dnadiff".to_string(),
            extra_args: Vec::new(),
            timeout: Some(Duration::from_secs(3600)),
            work_dir: PathBuf::from("."),
            locator: ScoreLocator::default(),
            keep_temp: false,
        }
    }
}

/// Runs `dnadiff -p <prefix> <ref> <query>` and reads `<prefix>.report`
#[derive(Debug, Clone)]
pub struct DnadiffComparator {
    config: ToolConfig,
}

impl DnadiffComparator {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ToolConfig {
        &self.config
    }

    fn build_command(&self, prefix: &Path, reference: &Path, query: &Path) -> Command {
        let mut cmd = Command::new(&self.config.program);
        cmd.args(&self.config.extra_args)
            .arg("-p")
            .arg(prefix)
            .arg(reference)
            .arg(query);
        cmd
    }
}

impl Comparator for DnadiffComparator {
    fn compare(&self, reference: &Path, query: &Path, cancel: &CancelToken) -> Result<f64> {
        if cancel.is_cancelled() {
            return Err(PaniError::Cancelled);
        }

        // Every <prefix>.* file lives in here and goes away when the guard drops
        let scratch = tempfile::Builder::new()
            .prefix("temp-")
            .rand_bytes(10)
            .tempdir_in(&self.config.work_dir)?;
        let id = scratch.path().file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
        let prefix = scratch.path().join(&id);
        let log_path = prefix.with_extension("log");
        let report_path = prefix.with_extension("report");

        let mut cmd = self.build_command(&prefix, reference, query);
        let command_line = process::display_command(&cmd);
        log::debug!("Running: {}", command_line);

        let outcome = process::run_logged(&mut cmd, &log_path, self.config.timeout, cancel).map_err(|source| {
            PaniError::ToolSpawn {
                command: command_line.clone(),
                source,
            }
        });

        let result = match outcome {
            Ok(Outcome::Exited(status)) if status.success() => {
                self.config
                    .locator
                    .read_score(&report_path)
                    .map_err(|reason| PaniError::ScoreParseFailure {
                        reference: reference.to_path_buf(),
                        query: query.to_path_buf(),
                        report: report_path.clone(),
                        reason,
                    })
            }
            Ok(Outcome::Exited(status)) => Err(PaniError::ExternalToolFailure {
                tool: self.config.program.clone(),
                reference: reference.to_path_buf(),
                query: query.to_path_buf(),
                command: command_line,
                status: status.to_string(),
                output: process::tail(&log_path, LOG_TAIL_LINES),
            }),
            Ok(Outcome::TimedOut) => Err(PaniError::Timeout {
                reference: reference.to_path_buf(),
                query: query.to_path_buf(),
                seconds: self.config.timeout.map(|t| t.as_secs()).unwrap_or_default(),
            }),
            Ok(Outcome::Cancelled) => Err(PaniError::Cancelled),
            Err(e) => Err(e),
        };

        if self.config.keep_temp {
            let kept = scratch.keep();
            log::info!("Kept temporary files in {}", kept.display());
        }

        if let Ok(ani) = result {
            log::debug!("{} vs {} = {}", reference.display(), query.display(), ani);
        }
        result
    }

    fn name(&self) -> &str {
        &self.config.program
    }
}
