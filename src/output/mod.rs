// mod.rs - Matrix writers and reader

use crate::core::matrix::ResultMatrix;
use crate::error::{PaniError, Result};
use std::fs::{create_dir_all, File};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

pub mod summary;

pub use summary::{summarize, MatrixSummary};

/// Marker for cells without a value (partial runs only)
pub const MISSING: &str = "NA";

/// Supported output layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Tsv,
    Csv,
    Phylip,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tsv" => Ok(OutputFormat::Tsv),
            "csv" => Ok(OutputFormat::Csv),
            "phylip" => Ok(OutputFormat::Phylip),
            _ => Err(format!("Unsupported output format: {}. Use: tsv, csv, phylip", s)),
        }
    }
}

impl OutputFormat {
    fn delimiter(&self) -> char {
        match self {
            OutputFormat::Csv => ',',
            _ => '\t',
        }
    }
}

/// Labels must survive a round trip through `read_matrix`
pub fn check_labels(matrix: &ResultMatrix, format: OutputFormat) -> Result<()> {
    let sep = format.delimiter();
    let bad = matrix
        .row_labels
        .iter()
        .chain(&matrix.col_labels)
        .find(|label| label.contains(sep) || label.contains('\n') || label.contains('\r'));
    match bad {
        Some(label) => Err(PaniError::InvalidConfig(format!(
            "Genome name '{}' contains the {:?} output delimiter or a line break; rename the file or pick another format",
            label.escape_default(),
            format
        ))),
        None => Ok(()),
    }
}

/// How numbers are rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub format: OutputFormat,
    /// Fixed decimals; `None` uses the shortest exact representation
    pub precision: Option<usize>,
    /// Write `NA` for empty cells instead of refusing
    pub allow_partial: bool,
}

/// Render one cell
pub fn format_value(value: Option<f64>, precision: Option<usize>) -> String {
    match (value, precision) {
        (Some(v), Some(p)) => format!("{:.*}", p, v),
        (Some(v), None) => v.to_string(),
        (None, _) => MISSING.to_string(),
    }
}

/// Ensure parent directory exists before creating file
fn ensure_parent_dir(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Header row: empty corner cell, then column labels
fn write_delimited<W: Write>(writer: &mut W, matrix: &ResultMatrix, options: &WriteOptions) -> std::io::Result<()> {
    let sep = options.format.delimiter();
    for label in &matrix.col_labels {
        write!(writer, "{}{}", sep, label)?;
    }
    writeln!(writer)?;

    for (label, row) in matrix.row_labels.iter().zip(&matrix.values) {
        write!(writer, "{}", label)?;
        for value in row {
            write!(writer, "{}{}", sep, format_value(*value, options.precision))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

fn write_phylip<W: Write>(writer: &mut W, matrix: &ResultMatrix, options: &WriteOptions) -> std::io::Result<()> {
    writeln!(writer, "    {}", matrix.n_rows())?;
    for (label, row) in matrix.row_labels.iter().zip(&matrix.values) {
        write!(writer, "{:<10}", label)?;
        for value in row {
            write!(writer, "  {}", format_value(*value, options.precision))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write `matrix` to `file_path`.
///
/// The file only appears once fully written: content goes to a temporary
/// sibling that is then renamed over the destination.
pub fn write_matrix(file_path: &Path, matrix: &ResultMatrix, options: &WriteOptions) -> Result<()> {
    let missing = matrix.missing_cells();
    if missing > 0 && !options.allow_partial {
        return Err(PaniError::IncompleteMatrix { missing });
    }
    if options.format == OutputFormat::Phylip && !matrix.is_square() {
        return Err(PaniError::InvalidConfig(format!(
            "PHYLIP output needs a square matrix, got {}",
            matrix
        )));
    }
    if matches!(options.format, OutputFormat::Tsv | OutputFormat::Csv) {
        check_labels(matrix, options.format)?;
    }

    ensure_parent_dir(file_path)?;
    let dir = match file_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let staged = tempfile::Builder::new().prefix(".pani-").tempfile_in(dir)?;

    {
        let mut writer = BufWriter::new(staged.as_file());
        match options.format {
            OutputFormat::Tsv | OutputFormat::Csv => write_delimited(&mut writer, matrix, options)?,
            OutputFormat::Phylip => write_phylip(&mut writer, matrix, options)?,
        }
        writer.flush()?;
    }

    staged.persist(file_path)?;
    log::info!("Matrix written to: {}", file_path.display());
    Ok(())
}

/// Read a TSV/CSV matrix written by `write_matrix`; `NA` becomes an empty cell.
pub fn read_matrix(file_path: &Path) -> std::result::Result<ResultMatrix, String> {
    let file = File::open(file_path)
        .map_err(|e| format!("Failed to open matrix file '{}': {}", file_path.display(), e))?;
    let reader = BufReader::new(file);
    let mut lines = reader.lines();

    let header_line = lines
        .next()
        .ok_or("Empty matrix file")?
        .map_err(|e| format!("Failed to read header: {}", e))?;
    let sep = if header_line.starts_with('\t') { '\t' } else { ',' };

    let col_labels: Vec<String> = header_line.split(sep).skip(1).map(|s| s.to_string()).collect();
    let mut row_labels = Vec::new();
    let mut values = Vec::new();

    for (i, line) in lines.enumerate() {
        let line = line.map_err(|e| format!("Failed to read line {}: {}", i + 2, e))?;
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(sep).collect();
        if fields.len() != col_labels.len() + 1 {
            return Err(format!(
                "Row {} has {} columns, expected {}",
                i + 2,
                fields.len(),
                col_labels.len() + 1
            ));
        }

        row_labels.push(fields[0].to_string());
        let row = fields[1..]
            .iter()
            .enumerate()
            .map(|(j, s)| match s.trim() {
                MISSING => Ok(None),
                v => v
                    .parse::<f64>()
                    .map(Some)
                    .map_err(|e| format!("Failed to parse value at row {}, col {}: {}", i + 2, j + 1, e)),
            })
            .collect::<std::result::Result<Vec<_>, String>>()?;
        values.push(row);
    }

    Ok(ResultMatrix {
        row_labels,
        col_labels,
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn abc() -> ResultMatrix {
        let mut m = ResultMatrix::new(labels(&["a", "b", "c"]), labels(&["a", "b", "c"]));
        m.fill_diagonal(100.0);
        m.set_symmetric(0, 1, 99.5);
        m.set_symmetric(0, 2, 97.25);
        m.set_symmetric(1, 2, 98.0);
        m
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(Some(100.0), None), "100");
        assert_eq!(format_value(Some(99.5), None), "99.5");
        assert_eq!(format_value(Some(0.0), None), "0");
        assert_eq!(format_value(Some(99.123456), Some(2)), "99.12");
        assert_eq!(format_value(None, Some(2)), "NA");
    }

    #[test]
    fn test_tsv_layout() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("ani.tsv");
        write_matrix(&out, &abc(), &WriteOptions::default()).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert_eq!(
            content,
            "\ta\tb\tc\n\
             a\t100\t99.5\t97.25\n\
             b\t99.5\t100\t98\n\
             c\t97.25\t98\t100\n"
        );
    }

    #[test]
    fn test_csv_and_precision() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested/dir/ani.csv");
        let options = WriteOptions {
            format: OutputFormat::Csv,
            precision: Some(1),
            ..WriteOptions::default()
        };
        write_matrix(&out, &abc(), &options).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.starts_with(",a,b,c\na,100.0,99.5,"), "{}", content);
        assert!(content.contains("\nb,99.5,100.0,98.0\n"), "{}", content);
    }

    #[test]
    fn test_label_with_delimiter_is_refused() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("ani.csv");
        let mut m = ResultMatrix::new(labels(&["E_coli,K12", "b"]), labels(&["E_coli,K12", "b"]));
        m.set(0, 0, 100.0);
        m.set(0, 1, 99.0);
        m.set(1, 0, 99.0);
        m.set(1, 1, 100.0);
        let csv = WriteOptions {
            format: OutputFormat::Csv,
            ..WriteOptions::default()
        };

        let err = write_matrix(&out, &m, &csv).unwrap_err();
        assert!(matches!(err, PaniError::InvalidConfig(_)));
        assert!(err.to_string().contains("E_coli,K12"));
        assert!(!out.exists());

        // the same names are fine tab separated
        let tsv = dir.path().join("ani.tsv");
        write_matrix(&tsv, &m, &WriteOptions::default()).unwrap();
        let back = read_matrix(&tsv).unwrap();
        assert_eq!(back.row_labels, labels(&["E_coli,K12", "b"]));
        assert_eq!(back.get(0, 1), Some(99.0));
    }

    #[test]
    fn test_phylip_requires_square() {
        let dir = tempdir().unwrap();
        let mut rect = ResultMatrix::new(labels(&["q1", "q2"]), labels(&["r1"]));
        rect.set(0, 0, 95.0);
        rect.set(1, 0, 96.0);
        let options = WriteOptions {
            format: OutputFormat::Phylip,
            ..WriteOptions::default()
        };
        assert!(write_matrix(&dir.path().join("x.phy"), &rect, &options).is_err());

        write_matrix(&dir.path().join("abc.phy"), &abc(), &options).unwrap();
        let content = std::fs::read_to_string(dir.path().join("abc.phy")).unwrap();
        assert!(content.starts_with("    3\na         "));
    }

    #[test]
    fn test_incomplete_matrix_is_not_written() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("ani.tsv");
        let mut m = abc();
        m.values[0][1] = None;

        let err = write_matrix(&out, &m, &WriteOptions::default()).unwrap_err();
        assert!(matches!(err, PaniError::IncompleteMatrix { missing: 1 }));
        assert!(!out.exists());
        // no staging files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_partial_matrix_writes_na_and_reads_back() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("ani.tsv");
        let mut m = abc();
        m.values[0][2] = None;
        m.values[2][0] = None;
        let options = WriteOptions {
            allow_partial: true,
            ..WriteOptions::default()
        };
        write_matrix(&out, &m, &options).unwrap();

        let content = std::fs::read_to_string(&out).unwrap();
        assert!(content.contains("a\t100\t99.5\tNA\n"));
        assert_eq!(read_matrix(&out).unwrap(), m);
    }

    #[test]
    fn test_overwrites_existing_output() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("ani.tsv");
        std::fs::write(&out, "stale").unwrap();
        write_matrix(&out, &abc(), &WriteOptions::default()).unwrap();
        assert!(std::fs::read_to_string(&out).unwrap().starts_with("\ta\tb\tc"));
    }

    #[test]
    fn test_read_rejects_ragged_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.tsv");
        std::fs::write(&path, "\ta\tb\na\t100\n").unwrap();
        assert!(read_matrix(&path).unwrap_err().contains("expected 3"));
    }
}
