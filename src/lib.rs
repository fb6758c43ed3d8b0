// lib.rs - pani library root

//! # pani - Parallel pairwise average nucleotide identity matrices
//!
//! Runs an external whole-genome aligner (MUMmer's `dnadiff` by default) on
//! every pair of genomes and collects the reported 1-to-1 average identity
//! into a matrix.
//!
//! ## Modes
//!
//! - **matrix**: all-against-all inside one folder, symmetric result with
//!   100 (or 0 for distances) on the diagonal
//! - **ref**: every query genome against every reference genome, one row per
//!   query and one column per reference
//!
//! ## Basic Usage
//!
//! ```rust,no_run
//! use pani::prelude::*;
//! use std::path::PathBuf;
//!
//! let config = RunConfig {
//!     inputs: InputSpec::Matrix { folder: PathBuf::from("genomes") },
//!     extension: "fasta".to_string(),
//!     filter: InputFilter::default(),
//!     metric: Metric::Similarity,
//!     tool: ToolConfig::default(),
//!     dispatch: DispatchConfig::default(),
//!     output: PathBuf::from("ani.tsv"),
//!     write: WriteOptions::default(),
//!     dry_run: false,
//! };
//!
//! let comparator = DnadiffComparator::new(config.tool.clone());
//! let summary = run(&config, &comparator)?;
//! println!("{}", summary.matrix);
//! # Ok::<(), pani::error::PaniError>(())
//! ```

// Re-export all main modules
pub mod cli;
pub mod core;
pub mod data;
pub mod error;
pub mod output;

// Convenience prelude for common imports
pub mod prelude {
    pub use crate::core::{plan_run, run, InputSpec, RunConfig, RunSummary};
    pub use crate::core::{CancelToken, Comparator, DnadiffComparator, ScoreLocator, ToolConfig};
    pub use crate::core::{ComparisonMode, Metric, ResultMatrix};
    pub use crate::core::{DispatchConfig, FailurePolicy};
    pub use crate::data::{InputFile, InputFilter};
    pub use crate::error::{PaniError, Result};
    pub use crate::output::{read_matrix, write_matrix, OutputFormat, WriteOptions};
}

// Re-export main types at the root level for convenience
pub use core::{Comparator, DnadiffComparator, ResultMatrix, RunConfig};
pub use error::PaniError;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get library information
pub fn get_info() -> String {
    format!("pani v{} - Parallel pairwise ANI matrices", VERSION)
}
