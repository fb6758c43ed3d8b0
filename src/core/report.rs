// report.rs - Identity score extraction from alignment reports

use std::fmt;
use std::path::Path;

/// Where the identity value lives inside the comparator's report.
///
/// Lines and columns are 1-based and columns are whitespace separated, so on a
/// dnadiff report `Line { line: 19, column: 2 }` and
/// `Key { key: "AvgIdentity", column: 2 }` read the same 1-to-1 identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreLocator {
    /// Fixed line offset
    Line { line: usize, column: usize },
    /// First line whose first field equals `key`
    Key { key: String, column: usize },
}

impl Default for ScoreLocator {
    fn default() -> Self {
        ScoreLocator::Key {
            key: "AvgIdentity".to_string(),
            column: 2,
        }
    }
}

impl fmt::Display for ScoreLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoreLocator::Line { line, column } => write!(f, "line {}, column {}", line, column),
            ScoreLocator::Key { key, column } => write!(f, "key '{}', column {}", key, column),
        }
    }
}

impl ScoreLocator {
    /// Layout used by the original dnadiff wrapper
    pub fn dnadiff_line() -> Self {
        ScoreLocator::Line { line: 19, column: 2 }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        let (line, column) = match self {
            ScoreLocator::Line { line, column } => (*line, *column),
            ScoreLocator::Key { key, column } => {
                if key.trim().is_empty() || key.split_whitespace().count() != 1 {
                    return Err(format!("Report key must be a single word, got '{}'", key));
                }
                (1, *column)
            }
        };
        if line == 0 {
            return Err("Report line numbers start at 1".to_string());
        }
        if column == 0 {
            return Err("Report column numbers start at 1".to_string());
        }
        Ok(())
    }

    /// Pull the raw field out of the report text
    fn locate<'a>(&self, text: &'a str) -> std::result::Result<&'a str, String> {
        let (line, column) = match self {
            ScoreLocator::Line { line, column } => {
                let content = text.lines().nth(line.saturating_sub(1)).ok_or_else(|| {
                    format!("report has only {} lines, expected at least {}", text.lines().count(), line)
                })?;
                (content, *column)
            }
            ScoreLocator::Key { key, column } => {
                let content = text
                    .lines()
                    .find(|l| l.split_whitespace().next() == Some(key.as_str()))
                    .ok_or_else(|| format!("no line starting with '{}'", key))?;
                (content, *column)
            }
        };

        line.split_whitespace()
            .nth(column.saturating_sub(1))
            .ok_or_else(|| format!("column {} missing in line '{}'", column, line.trim()))
    }

    /// Extract a 0-100 identity percentage from report text
    pub fn extract(&self, text: &str) -> std::result::Result<f64, String> {
        let field = self.locate(text)?;
        let value: f64 = field
            .parse()
            .map_err(|_| format!("'{}' is not a number ({})", field, self))?;

        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(format!("identity {} outside 0-100 ({})", field, self));
        }
        Ok(value)
    }

    /// Read `report` and extract the identity percentage
    pub fn read_score(&self, report: &Path) -> std::result::Result<f64, String> {
        let text = std::fs::read_to_string(report).map_err(|e| format!("cannot read report: {}", e))?;
        self.extract(&text)
    }
}
