// planner.rs - Work item planning for matrix and reference runs

use crate::core::matrix::{ComparisonMode, Metric, ResultMatrix};
use crate::data::InputFile;
use std::path::PathBuf;

/// One comparison to run and the matrix cell its score lands in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonPair {
    pub reference: PathBuf,
    pub query: PathBuf,
    pub row: usize,
    pub col: usize,
}

/// Everything needed to dispatch a run and assemble its results
#[derive(Debug, Clone)]
pub struct Plan {
    pub mode: ComparisonMode,
    pub metric: Metric,
    pub pairs: Vec<ComparisonPair>,
    /// Empty matrix with labels and, in matrix mode, the seeded diagonal
    pub skeleton: ResultMatrix,
}

impl Plan {
    pub fn row_labels(&self) -> &[String] {
        &self.skeleton.row_labels
    }

    pub fn col_labels(&self) -> &[String] {
        &self.skeleton.col_labels
    }
}

fn labels(files: &[InputFile]) -> Vec<String> {
    files.iter().map(|f| f.base_name.clone()).collect()
}

/// All-against-all: n(n-1)/2 pairs (i, j) with i < j, reference = file i.
///
/// Self comparisons are never scheduled; the diagonal is seeded instead.
pub fn plan_matrix(files: &[InputFile], metric: Metric) -> Plan {
    let n = files.len();
    let mut pairs = Vec::with_capacity(n * n.saturating_sub(1) / 2);
    for (i, reference) in files.iter().enumerate() {
        for (j, query) in files.iter().enumerate().skip(i + 1) {
            pairs.push(ComparisonPair {
                reference: reference.path.clone(),
                query: query.path.clone(),
                row: i,
                col: j,
            });
        }
    }

    let names = labels(files);
    let mut skeleton = ResultMatrix::new(names.clone(), names);
    skeleton.fill_diagonal(metric.self_value());

    Plan {
        mode: ComparisonMode::Matrix,
        metric,
        pairs,
        skeleton,
    }
}

/// Cross product: every (query, reference) once, queries outer, references inner
pub fn plan_reference(references: &[InputFile], queries: &[InputFile], metric: Metric) -> Plan {
    let mut pairs = Vec::with_capacity(references.len() * queries.len());
    for (row, query) in queries.iter().enumerate() {
        for (col, reference) in references.iter().enumerate() {
            pairs.push(ComparisonPair {
                reference: reference.path.clone(),
                query: query.path.clone(),
                row,
                col,
            });
        }
    }

    Plan {
        mode: ComparisonMode::Reference,
        metric,
        pairs,
        skeleton: ResultMatrix::new(labels(queries), labels(references)),
    }
}
