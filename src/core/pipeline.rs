// pipeline.rs - One batch run: discover, plan, dispatch, assemble, write

use crate::core::assembler::assemble;
use crate::core::comparator::{Comparator, ToolConfig};
use crate::core::dispatcher::{DispatchConfig, Dispatcher, FailurePolicy};
use crate::core::matrix::{ComparisonMode, Metric, ResultMatrix};
use crate::core::planner::{plan_matrix, plan_reference, Plan};
use crate::data::{discover, InputFilter};
use crate::output::{check_labels, write_matrix, WriteOptions};
use crate::error::Result;
use std::path::PathBuf;
use std::time::Instant;

/// Input folders for each mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSpec {
    Matrix { folder: PathBuf },
    Reference { reference: PathBuf, query: PathBuf },
}

impl InputSpec {
    pub fn mode(&self) -> ComparisonMode {
        match self {
            InputSpec::Matrix { .. } => ComparisonMode::Matrix,
            InputSpec::Reference { .. } => ComparisonMode::Reference,
        }
    }
}

/// Fully resolved settings for one run
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub inputs: InputSpec,
    pub extension: String,
    pub filter: InputFilter,
    pub metric: Metric,
    pub tool: ToolConfig,
    pub dispatch: DispatchConfig,
    pub output: PathBuf,
    pub write: WriteOptions,
    /// Stop after planning
    pub dry_run: bool,
}

/// What a finished run produced
#[derive(Debug)]
pub struct RunSummary {
    pub matrix: ResultMatrix,
    pub comparisons: usize,
    pub failed: usize,
    pub written: bool,
}

/// Discover inputs and build the work plan; fails before any comparison runs
pub fn plan_run(config: &RunConfig) -> Result<Plan> {
    let plan = match &config.inputs {
        InputSpec::Matrix { folder } => {
            let files = discover(folder, &config.extension, &config.filter)?;
            log::info!("Found {} files.", files.len());
            plan_matrix(&files, config.metric)
        }
        InputSpec::Reference { reference, query } => {
            let references = discover(reference, &config.extension, &config.filter)?;
            let queries = discover(query, &config.extension, &config.filter)?;
            log::info!(
                "Found {} reference and {} query files.",
                references.len(),
                queries.len()
            );
            plan_reference(&references, &queries, config.metric)
        }
    };

    log::info!("Need to compute {} comparisons.", plan.pairs.len());
    Ok(plan)
}

/// Execute a whole run with `comparator` and write the matrix
pub fn run(config: &RunConfig, comparator: &dyn Comparator) -> Result<RunSummary> {
    let start = Instant::now();
    let plan = plan_run(config)?;
    check_labels(&plan.skeleton, config.write.format)?;

    if config.dry_run {
        log::info!("Dry run: {} comparisons planned, nothing executed", plan.pairs.len());
        return Ok(RunSummary {
            matrix: plan.skeleton.clone(),
            comparisons: plan.pairs.len(),
            failed: 0,
            written: false,
        });
    }

    log::info!(
        "Comparing with {} ({}, {})",
        comparator.name(),
        config.metric.description(),
        config.dispatch.policy.description()
    );
    let dispatcher = Dispatcher::new(comparator, config.dispatch.clone());
    let outcomes = dispatcher.run_and_settle(&plan.pairs)?;
    let failed = outcomes.iter().filter(|o| o.result.is_err()).count();

    log::info!("Refactoring results.");
    let matrix = assemble(&plan, &outcomes);

    let write = WriteOptions {
        allow_partial: config.write.allow_partial || config.dispatch.policy == FailurePolicy::AllowPartial,
        ..config.write
    };
    log::info!("Printing results to file {}", config.output.display());
    write_matrix(&config.output, &matrix, &write)?;

    log::info!("Run completed in {:.2}s", start.elapsed().as_secs_f64());
    Ok(RunSummary {
        matrix,
        comparisons: plan.pairs.len(),
        failed,
        written: true,
    })
}
