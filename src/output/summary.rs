// summary.rs - Descriptive statistics for a written matrix

use crate::core::matrix::ResultMatrix;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixSummary {
    pub rows: usize,
    pub cols: usize,
    pub missing: usize,
    /// Values outside the diagonal (every cell for non-square matrices)
    pub compared: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub symmetric: bool,
}

/// Summarize `matrix`, ignoring the diagonal of square matrices
pub fn summarize(matrix: &ResultMatrix) -> MatrixSummary {
    let square = matrix.is_square() && matrix.row_labels == matrix.col_labels;
    let values: Vec<f64> = matrix
        .values
        .iter()
        .enumerate()
        .flat_map(|(i, row)| {
            row.iter()
                .enumerate()
                .filter(move |(j, _)| !square || i != *j)
                .filter_map(|(_, v)| *v)
        })
        .collect();

    let min = values.iter().copied().reduce(f64::min);
    let max = values.iter().copied().reduce(f64::max);
    let mean = if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    };

    MatrixSummary {
        rows: matrix.n_rows(),
        cols: matrix.n_cols(),
        missing: matrix.missing_cells(),
        compared: values.len(),
        min,
        max,
        mean,
        symmetric: square && matrix.is_symmetric(),
    }
}

impl fmt::Display for MatrixSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let show = |v: Option<f64>| v.map(|x| format!("{:.4}", x)).unwrap_or_else(|| "-".to_string());
        writeln!(f, "📐 Dimensions: {} x {}", self.rows, self.cols)?;
        writeln!(f, "❓ Missing cells: {}", self.missing)?;
        writeln!(f, "📊 Off-diagonal values: {}", self.compared)?;
        writeln!(f, "   Min:  {}", show(self.min))?;
        writeln!(f, "   Max:  {}", show(self.max))?;
        writeln!(f, "   Mean: {}", show(self.mean))?;
        write!(f, "🔁 Symmetric: {}", if self.symmetric { "yes" } else { "no" })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_square_summary_skips_diagonal() {
        let mut m = ResultMatrix::new(labels(&["a", "b", "c"]), labels(&["a", "b", "c"]));
        m.fill_diagonal(100.0);
        m.set_symmetric(0, 1, 99.0);
        m.set_symmetric(0, 2, 97.0);
        m.set_symmetric(1, 2, 98.0);

        let s = summarize(&m);
        assert_eq!(s.compared, 6);
        assert_eq!(s.min, Some(97.0));
        assert_eq!(s.max, Some(99.0));
        assert_eq!(s.mean, Some(98.0));
        assert!(s.symmetric);
        assert_eq!(s.missing, 0);
    }

    #[test]
    fn test_reference_summary_uses_every_cell() {
        let mut m = ResultMatrix::new(labels(&["q1", "q2"]), labels(&["r1"]));
        m.set(0, 0, 95.0);

        let s = summarize(&m);
        assert_eq!((s.rows, s.cols), (2, 1));
        assert_eq!(s.compared, 1);
        assert_eq!(s.missing, 1);
        assert_eq!(s.mean, Some(95.0));
        assert!(!s.symmetric);
    }

    #[test]
    fn test_summary_serializes() {
        let m = ResultMatrix::new(labels(&["a"]), labels(&["a"]));
        let json = serde_json::to_value(summarize(&m)).unwrap();
        assert_eq!(json["rows"], 1);
        assert!(json["mean"].is_null());
    }
}
