// matrix.rs - Comparison modes, metrics and the result matrix

use std::fmt;
use std::str::FromStr;

/// Identity value of a genome against itself
pub const FULL_IDENTITY: f64 = 100.0;

/// How input files are paired up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonMode {
    /// All-against-all within one folder, symmetric result
    Matrix,
    /// Every query against every reference, rows are queries
    Reference,
}

impl FromStr for ComparisonMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "matrix" => Ok(ComparisonMode::Matrix),
            "ref" | "reference" => Ok(ComparisonMode::Reference),
            _ => Err(format!("Invalid comparison mode: {}. Use: matrix, ref", s)),
        }
    }
}

impl ComparisonMode {
    pub fn description(&self) -> &str {
        match self {
            ComparisonMode::Matrix => "all-against-all",
            ComparisonMode::Reference => "query vs reference",
        }
    }
}

/// Value stored in the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Identity percentage as reported
    Similarity,
    /// 100 - identity
    Distance,
}

impl Metric {
    pub fn from_distance_flag(distance: bool) -> Self {
        if distance {
            Metric::Distance
        } else {
            Metric::Similarity
        }
    }

    /// Convert a raw identity percentage into the stored value
    pub fn transform(&self, identity: f64) -> f64 {
        match self {
            Metric::Similarity => identity,
            Metric::Distance => FULL_IDENTITY - identity,
        }
    }

    /// Value of a genome against itself
    pub fn self_value(&self) -> f64 {
        self.transform(FULL_IDENTITY)
    }

    pub fn description(&self) -> &str {
        match self {
            Metric::Similarity => "similarity (ANI %)",
            Metric::Distance => "distance (100 - ANI)",
        }
    }
}

/// Labelled matrix of scores; `None` marks a cell with no value yet
#[derive(Debug, Clone, PartialEq)]
pub struct ResultMatrix {
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl ResultMatrix {
    pub fn new(row_labels: Vec<String>, col_labels: Vec<String>) -> Self {
        let values = vec![vec![None; col_labels.len()]; row_labels.len()];
        Self {
            row_labels,
            col_labels,
            values,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.row_labels.len()
    }

    pub fn n_cols(&self) -> usize {
        self.col_labels.len()
    }

    pub fn is_square(&self) -> bool {
        self.n_rows() == self.n_cols()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.values[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[row][col] = Some(value);
    }

    /// Write `value` at (row, col) and (col, row)
    pub fn set_symmetric(&mut self, row: usize, col: usize, value: f64) {
        self.set(row, col, value);
        self.set(col, row, value);
    }

    /// Seed every diagonal cell
    pub fn fill_diagonal(&mut self, value: f64) {
        for i in 0..self.n_rows().min(self.n_cols()) {
            self.set(i, i, value);
        }
    }

    /// Number of cells still empty
    pub fn missing_cells(&self) -> usize {
        self.values.iter().flatten().filter(|v| v.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.missing_cells() == 0
    }

    /// True when every filled cell equals its mirror
    pub fn is_symmetric(&self) -> bool {
        self.is_square()
            && (0..self.n_rows()).all(|i| (i + 1..self.n_cols()).all(|j| self.values[i][j] == self.values[j][i]))
    }
}

impl fmt::Display for ResultMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x {} matrix", self.n_rows(), self.n_cols())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_transform() {
        assert_eq!(Metric::Similarity.transform(97.5), 97.5);
        assert_eq!(Metric::Distance.transform(97.5), 2.5);
        assert_eq!(Metric::Similarity.self_value(), 100.0);
        assert_eq!(Metric::Distance.self_value(), 0.0);
        assert_eq!(Metric::from_distance_flag(true), Metric::Distance);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("matrix".parse::<ComparisonMode>().unwrap(), ComparisonMode::Matrix);
        assert_eq!("REF".parse::<ComparisonMode>().unwrap(), ComparisonMode::Reference);
        assert!("pairs".parse::<ComparisonMode>().is_err());
    }

    #[test]
    fn test_matrix_fill() {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut m = ResultMatrix::new(labels.clone(), labels);
        assert_eq!(m.missing_cells(), 9);

        m.fill_diagonal(100.0);
        m.set_symmetric(0, 2, 95.0);
        assert_eq!(m.missing_cells(), 4);
        assert_eq!(m.get(2, 0), Some(95.0));
        assert!(m.is_symmetric());

        m.set(0, 1, 90.0);
        assert!(!m.is_symmetric());
        assert!(!m.is_complete());
    }
}
