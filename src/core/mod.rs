// mod.rs - Core logic module

pub mod assembler;
pub mod comparator;
pub mod dispatcher;
pub mod matrix;
pub mod pipeline;
pub mod planner;
pub mod process;
pub mod report;

// Re-export main types for convenience
pub use assembler::assemble;
pub use comparator::{Comparator, DnadiffComparator, ToolConfig};
pub use dispatcher::{DispatchConfig, Dispatcher, FailurePolicy, PairOutcome};
pub use matrix::{ComparisonMode, Metric, ResultMatrix};
pub use pipeline::{plan_run, run, InputSpec, RunConfig, RunSummary};
pub use planner::{plan_matrix, plan_reference, ComparisonPair, Plan};
pub use process::CancelToken;
pub use report::ScoreLocator;
