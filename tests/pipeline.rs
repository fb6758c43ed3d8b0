// End-to-end runs against a scripted stand-in for dnadiff
#![cfg(unix)]

use pani::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Identity is 100 - |wa - wb| / 10 where the weight is the second word of
/// each FASTA header. Queries whose header says FAIL make the tool exit 3,
/// GARBAGE makes it succeed with an unreadable report.
const FAKE_DNADIFF: &str = r#"
prefix="$2"; ref="$3"; qry="$4"
if grep -q FAIL "$qry"; then
    echo "alignment failed for $qry" >&2
    exit 3
fi
if grep -q GARBAGE "$qry"; then
    echo garbage > "$prefix.report"
    exit 0
fi
a=$(head -n 1 "$ref" | cut -d ' ' -f 2)
b=$(head -n 1 "$qry" | cut -d ' ' -f 2)
id=$(awk -v a="$a" -v b="$b" 'BEGIN { d = a - b; if (d < 0) d = -d; printf "%.2f", 100 - d / 10 }')
echo "delta" > "$prefix.delta"
{
    echo "$ref $qry"
    echo "NUCMER"
    echo ""
    echo "[Alignments]"
    echo "1-to-1   10   10"
    echo "AlignedBases   100(100.00%)   100(100.00%)"
    echo "AvgIdentity   $id   $id"
} > "$prefix.report"
"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("fake_dnadiff.sh"), FAKE_DNADIFF).unwrap();
        fs::create_dir(dir.path().join("work")).unwrap();
        Fixture { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn script(&self) -> String {
        self.path("fake_dnadiff.sh").to_string_lossy().into_owned()
    }

    /// Write `<folder>/<name>.fasta` files with the given weights
    fn genomes(&self, folder: &str, genomes: &[(&str, &str)]) -> PathBuf {
        let dir = self.path(folder);
        fs::create_dir_all(&dir).unwrap();
        for (name, weight) in genomes {
            fs::write(dir.join(format!("{}.fasta", name)), format!(">{} {}\nACGTACGT\n", name, weight)).unwrap();
        }
        dir
    }

    fn config(&self, inputs: InputSpec, output: &str) -> RunConfig {
        RunConfig {
            inputs,
            extension: "fasta".to_string(),
            filter: InputFilter::default(),
            metric: Metric::Similarity,
            tool: ToolConfig {
                program: "sh".to_string(),
                extra_args: vec![self.script()],
                work_dir: self.path("work"),
                ..ToolConfig::default()
            },
            dispatch: DispatchConfig {
                workers: 3,
                ..DispatchConfig::default()
            },
            output: self.path(output),
            write: WriteOptions::default(),
            dry_run: false,
        }
    }

    fn abc(&self) -> PathBuf {
        self.genomes("abc", &[("a", "0"), ("b", "5"), ("c", "25")])
    }

    fn work_is_empty(&self) -> bool {
        fs::read_dir(self.path("work")).unwrap().next().is_none()
    }
}

fn execute(config: &RunConfig) -> Result<RunSummary> {
    let comparator = DnadiffComparator::new(config.tool.clone());
    run(config, &comparator)
}

#[test]
fn test_matrix_mode_three_genomes() {
    let fx = Fixture::new();
    let config = fx.config(InputSpec::Matrix { folder: fx.abc() }, "ani.tsv");

    let summary = execute(&config).unwrap();
    assert_eq!(summary.comparisons, 3);
    assert!(summary.matrix.is_symmetric());

    let content = fs::read_to_string(fx.path("ani.tsv")).unwrap();
    assert_eq!(
        content,
        "\ta\tb\tc\n\
         a\t100\t99.5\t97.5\n\
         b\t99.5\t100\t98\n\
         c\t97.5\t98\t100\n"
    );
    assert!(fx.work_is_empty());
}

#[test]
fn test_matrix_mode_distance() {
    let fx = Fixture::new();
    let mut config = fx.config(InputSpec::Matrix { folder: fx.abc() }, "dist.tsv");
    config.metric = Metric::Distance;

    execute(&config).unwrap();
    let content = fs::read_to_string(fx.path("dist.tsv")).unwrap();
    assert_eq!(
        content,
        "\ta\tb\tc\n\
         a\t0\t0.5\t2.5\n\
         b\t0.5\t0\t2\n\
         c\t2.5\t2\t0\n"
    );
}

#[test]
fn test_reference_mode() {
    let fx = Fixture::new();
    let reference = fx.genomes("refs", &[("r1", "0")]);
    let query = fx.genomes("queries", &[("q1", "10"), ("q2", "30")]);
    let config = fx.config(InputSpec::Reference { reference, query }, "ref.tsv");

    let summary = execute(&config).unwrap();
    assert_eq!(summary.comparisons, 2);
    let content = fs::read_to_string(fx.path("ref.tsv")).unwrap();
    assert_eq!(content, "\tr1\nq1\t99\nq2\t97\n");
}

#[test]
fn test_output_is_deterministic() {
    let fx = Fixture::new();
    let folder = fx.genomes(
        "many",
        &[("g1", "1"), ("g2", "4"), ("g3", "9"), ("g4", "16"), ("g5", "25"), ("g6", "36")],
    );

    execute(&fx.config(InputSpec::Matrix { folder: folder.clone() }, "one.tsv")).unwrap();
    let mut single = fx.config(InputSpec::Matrix { folder }, "two.tsv");
    single.dispatch.workers = 1;
    execute(&single).unwrap();

    assert_eq!(fs::read(fx.path("one.tsv")).unwrap(), fs::read(fx.path("two.tsv")).unwrap());
}

#[test]
fn test_empty_folder_fails_without_output() {
    let fx = Fixture::new();
    let folder = fx.genomes("empty", &[]);
    fs::write(folder.join("notes.txt"), "not a genome").unwrap();

    let err = execute(&fx.config(InputSpec::Matrix { folder }, "ani.tsv")).unwrap_err();
    assert!(matches!(err, PaniError::NoInputFiles { .. }));
    assert!(!fx.path("ani.tsv").exists());
}

#[test]
fn test_tool_failure_aborts_run() {
    let fx = Fixture::new();
    let folder = fx.genomes("bad", &[("a", "0"), ("b", "5"), ("c", "FAIL")]);

    let err = execute(&fx.config(InputSpec::Matrix { folder }, "ani.tsv")).unwrap_err();
    match err {
        PaniError::ExternalToolFailure { query, output, .. } => {
            assert!(query.ends_with("c.fasta"));
            assert!(output.contains("alignment failed"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert!(!fx.path("ani.tsv").exists());
    assert!(fx.work_is_empty());
}

#[test]
fn test_unreadable_report_names_the_pair() {
    let fx = Fixture::new();
    let folder = fx.genomes("garbage", &[("alpha", "0"), ("beta", "GARBAGE")]);

    let err = execute(&fx.config(InputSpec::Matrix { folder }, "ani.tsv")).unwrap_err();
    assert!(matches!(err, PaniError::ScoreParseFailure { .. }));
    let message = err.to_string();
    assert!(message.contains("alpha.fasta vs "), "{}", message);
    assert!(message.contains("beta.fasta from "), "{}", message);
    assert!(!fx.path("ani.tsv").exists());
    assert!(fx.work_is_empty());
}

#[test]
fn test_keep_going_reports_every_failure() {
    let fx = Fixture::new();
    let folder = fx.genomes("bad", &[("a", "0"), ("b", "5"), ("c", "FAIL")]);
    let mut config = fx.config(InputSpec::Matrix { folder }, "ani.tsv");
    config.dispatch.policy = FailurePolicy::CollectAll;

    let err = execute(&config).unwrap_err();
    assert!(matches!(err, PaniError::ComparisonsFailed { failed: 2, total: 3 }));
    assert!(!fx.path("ani.tsv").exists());
}

#[test]
fn test_partial_matrix_marks_failures() {
    let fx = Fixture::new();
    let folder = fx.genomes("bad", &[("a", "0"), ("b", "5"), ("c", "FAIL")]);
    let mut config = fx.config(InputSpec::Matrix { folder }, "ani.tsv");
    config.dispatch.policy = FailurePolicy::AllowPartial;

    let summary = execute(&config).unwrap();
    assert_eq!(summary.failed, 2);

    let matrix = read_matrix(&fx.path("ani.tsv")).unwrap();
    assert_eq!(matrix.get(0, 1), Some(99.5));
    assert_eq!(matrix.get(0, 2), None);
    assert_eq!(matrix.get(2, 1), None);
    assert_eq!(matrix.get(2, 2), Some(100.0));
}

#[test]
fn test_name_filter_limits_inputs() {
    let fx = Fixture::new();
    let mut config = fx.config(InputSpec::Matrix { folder: fx.abc() }, "ani.tsv");
    config.filter = InputFilter::new(None, Some("^c$")).unwrap();

    let summary = execute(&config).unwrap();
    assert_eq!(summary.comparisons, 1);
    assert_eq!(summary.matrix.row_labels, vec!["a", "b"]);
}

// Binary

fn pani(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_pani"))
        .args(args)
        .output()
        .unwrap()
}

fn as_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_cli_matrix_run_writes_matrix_and_log() {
    let fx = Fixture::new();
    let folder = fx.abc();
    let out = fx.path("cli.tsv");
    let log = fx.path("logs/run.log");
    let script = fx.script();

    let result = pani(&[
        "matrix",
        "-f",
        as_str(&folder),
        "-o",
        as_str(&out),
        "-l",
        as_str(&log),
        "-t",
        "2",
        "--tool",
        "sh",
        "--tool-arg",
        &script,
        "--work-dir",
        as_str(&fx.path("work")),
        "--no-progress",
    ]);

    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    assert!(fs::read_to_string(&out).unwrap().starts_with("\ta\tb\tc\na\t100\t99.5\t97.5\n"));

    let log_text = fs::read_to_string(&log).unwrap();
    assert!(log_text.contains("Found 3 files."));
    assert!(log_text.contains("Need to compute 3 comparisons."));
    assert!(log_text.lines().all(|l| l.starts_with('[')));
}

#[test]
fn test_cli_unknown_argument_exits_zero() {
    let fx = Fixture::new();
    let result = pani(&["matrix", "--bogus", "-o", as_str(&fx.path("x.tsv"))]);

    assert_eq!(result.status.code(), Some(0));
    assert!(!String::from_utf8_lossy(&result.stderr).is_empty());
    assert!(!fx.path("x.tsv").exists());
}

#[test]
fn test_cli_missing_folder_exits_one() {
    let fx = Fixture::new();
    let result = pani(&[
        "matrix",
        "-f",
        as_str(&fx.path("does-not-exist")),
        "-l",
        as_str(&fx.path("run.log")),
    ]);

    assert_eq!(result.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&result.stderr).contains("❌ ERROR"));
}

#[test]
fn test_cli_config_file_supplies_folders() {
    let fx = Fixture::new();
    let reference = fx.genomes("refs", &[("r1", "0")]);
    let query = fx.genomes("queries", &[("q1", "10")]);
    let config_path = fx.path("pani.toml");
    fs::write(
        &config_path,
        format!(
            "reference = {:?}\nquery = {:?}\ntool = \"sh\"\ntool_args = [{:?}]\nwork_dir = {:?}\nno_progress = true\n",
            as_str(&reference),
            as_str(&query),
            fx.script(),
            as_str(&fx.path("work")),
        ),
    )
    .unwrap();

    let out = fx.path("from_config.tsv");
    let result = pani(&[
        "--config",
        as_str(&config_path),
        "ref",
        "-o",
        as_str(&out),
        "-l",
        as_str(&fx.path("run.log")),
    ]);

    assert!(result.status.success(), "{}", String::from_utf8_lossy(&result.stderr));
    assert_eq!(fs::read_to_string(&out).unwrap(), "\tr1\nq1\t99\n");
}
