// validation.rs - Turn merged arguments into a run configuration

use crate::cli::args::{InputArgs, Invocation, SharedArgs};
use crate::core::comparator::ToolConfig;
use crate::core::dispatcher::{DispatchConfig, FailurePolicy};
use crate::core::matrix::Metric;
use crate::core::pipeline::{InputSpec, RunConfig};
use crate::core::report::ScoreLocator;
use crate::data::input::normalize_extension;
use crate::data::InputFilter;
use crate::error::{PaniError, Result};
use crate::output::{OutputFormat, WriteOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_FOLDER: &str = "./";
pub const DEFAULT_OUTPUT: &str = "ani.tsv";
pub const DEFAULT_EXTENSION: &str = "fasta";
pub const DEFAULT_LOGFILE: &str = "run.log";
pub const DEFAULT_THREADS: usize = 10;
pub const DEFAULT_TOOL: &str = "dnadiff";
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;
pub const DEFAULT_WORK_DIR: &str = ".";
pub const DEFAULT_REPORT_COLUMN: usize = 2;

#[derive(Debug)]
pub struct ValidationResult {
    pub run: RunConfig,
    pub logfile: PathBuf,
}

fn invalid(message: impl Into<String>) -> PaniError {
    PaniError::InvalidConfig(message.into())
}

fn build_inputs(inputs: &InputArgs) -> Result<InputSpec> {
    match inputs {
        InputArgs::Matrix { folder } => Ok(InputSpec::Matrix {
            folder: PathBuf::from(folder.as_deref().unwrap_or(DEFAULT_FOLDER)),
        }),
        InputArgs::Ref { reference, query } => match (reference, query) {
            (Some(reference), Some(query)) => Ok(InputSpec::Reference {
                reference: PathBuf::from(reference),
                query: PathBuf::from(query),
            }),
            (None, _) => Err(invalid("ref mode needs a reference folder (-r/--reference)")),
            (_, None) => Err(invalid("ref mode needs a query folder (-q/--query)")),
        },
    }
}

fn build_locator(shared: &SharedArgs) -> Result<ScoreLocator> {
    let column = shared.report_column.unwrap_or(DEFAULT_REPORT_COLUMN);
    let locator = match (shared.report_line, &shared.report_key) {
        (Some(_), Some(_)) => return Err(invalid("--report-line and --report-key are mutually exclusive")),
        (Some(line), None) => ScoreLocator::Line { line, column },
        (None, Some(key)) => ScoreLocator::Key {
            key: key.clone(),
            column,
        },
        (None, None) => match ScoreLocator::default() {
            ScoreLocator::Key { key, .. } => ScoreLocator::Key { key, column },
            other => other,
        },
    };
    locator.validate().map_err(invalid)?;
    Ok(locator)
}

fn build_tool(shared: &SharedArgs) -> Result<ToolConfig> {
    let program = shared.tool.clone().unwrap_or_else(|| DEFAULT_TOOL.to_string());
    if program.trim().is_empty() {
        return Err(invalid("--tool must not be empty"));
    }

    let work_dir = PathBuf::from(shared.work_dir.as_deref().unwrap_or(DEFAULT_WORK_DIR));
    if !work_dir.is_dir() {
        return Err(invalid(format!(
            "Working directory '{}' does not exist",
            work_dir.display()
        )));
    }

    let timeout = match shared.timeout.unwrap_or(DEFAULT_TIMEOUT_SECS) {
        0 => None,
        secs => Some(Duration::from_secs(secs)),
    };

    Ok(ToolConfig {
        program,
        extra_args: shared.tool_args.clone(),
        timeout,
        work_dir,
        locator: build_locator(shared)?,
        keep_temp: shared.keep_temp,
    })
}

/// Apply defaults and check every value
pub fn validate_args(invocation: &Invocation) -> Result<ValidationResult> {
    let shared = &invocation.shared;

    let workers = shared.threads.unwrap_or(DEFAULT_THREADS);
    if workers == 0 {
        return Err(invalid("Thread count must be at least 1"));
    }

    let extension = normalize_extension(shared.ext.as_deref().unwrap_or(DEFAULT_EXTENSION)).to_string();
    if extension.is_empty() {
        return Err(invalid("File extension must not be empty"));
    }

    let format = match &shared.format {
        Some(f) => OutputFormat::from_str(f).map_err(invalid)?,
        None => OutputFormat::default(),
    };

    let output = PathBuf::from(shared.out.as_deref().unwrap_or(DEFAULT_OUTPUT));
    if output.as_os_str().is_empty() || output.file_name().is_none() {
        return Err(invalid(format!("Invalid output file '{}'", output.display())));
    }

    let policy = FailurePolicy::from_flags(shared.keep_going, shared.allow_partial);
    let filter = InputFilter::new(shared.include.as_deref(), shared.exclude.as_deref())?;

    let run = RunConfig {
        inputs: build_inputs(&invocation.inputs)?,
        extension,
        filter,
        metric: Metric::from_distance_flag(shared.distance),
        tool: build_tool(shared)?,
        dispatch: DispatchConfig {
            workers,
            policy,
            show_progress: !shared.no_progress,
        },
        output,
        write: WriteOptions {
            format,
            precision: shared.precision,
            allow_partial: policy == FailurePolicy::AllowPartial,
        },
        dry_run: shared.dry_run,
    };

    let logfile = PathBuf::from(shared.logfile.as_deref().unwrap_or(DEFAULT_LOGFILE));
    Ok(ValidationResult { run, logfile })
}

/// Log the effective settings once at start-up
pub fn log_settings(run: &RunConfig, logfile: &Path) {
    let mode = run.inputs.mode();
    match &run.inputs {
        InputSpec::Matrix { folder } => log::info!("Mode: {}, folder {}", mode.description(), folder.display()),
        InputSpec::Reference { reference, query } => log::info!(
            "Mode: {}, references {}, queries {}",
            mode.description(),
            reference.display(),
            query.display()
        ),
    }
    log::info!(
        "Extension: .{}, threads: {}, metric: {}",
        run.extension,
        run.dispatch.workers,
        run.metric.description()
    );
    log::info!(
        "Tool: {} {}, report {}, timeout {}",
        run.tool.program,
        run.tool.extra_args.join(" "),
        run.tool.locator,
        run.tool
            .timeout
            .map(|t| format!("{}s", t.as_secs()))
            .unwrap_or_else(|| "none".to_string())
    );
    log::info!("Output: {} ({:?}), log: {}", run.output.display(), run.write.format, logfile.display());
}
