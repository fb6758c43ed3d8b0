// config.rs - Configuration file support

use crate::error::{PaniError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    // Inputs
    pub folder: Option<String>,
    pub reference: Option<String>,
    pub query: Option<String>,
    pub ext: Option<String>,
    pub include: Option<String>,
    pub exclude: Option<String>,

    // Output
    pub out: Option<String>,
    pub format: Option<String>,
    pub precision: Option<usize>,
    pub distance: Option<bool>,
    pub logfile: Option<String>,

    // Comparison tool
    pub tool: Option<String>,
    pub tool_args: Option<Vec<String>>,
    pub timeout: Option<u64>,
    pub work_dir: Option<String>,
    pub report_line: Option<usize>,
    pub report_key: Option<String>,
    pub report_column: Option<usize>,

    // Execution
    pub threads: Option<usize>,
    pub keep_going: Option<bool>,
    pub allow_partial: Option<bool>,
    pub keep_temp: Option<bool>,
    pub no_progress: Option<bool>,
    pub dry_run: Option<bool>,
}

impl Config {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            PaniError::InvalidConfig(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;

        let config = Self::from_toml(&content).map_err(|e| {
            PaniError::InvalidConfig(format!("Failed to parse config file '{}': {}", path.display(), e))
        })?;

        log::info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Save configuration to TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| PaniError::InvalidConfig(format!("Failed to serialize config: {}", e)))?;
        fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate a sample configuration file with comments
    pub fn generate_sample() -> String {
        r#"# pani.toml - Configuration file for pani
# Command line arguments override these settings

# =============================================================================
# INPUTS
# =============================================================================

# Folder scanned by `pani matrix`
folder = "genomes"

# Folders used by `pani ref`
# reference = "references"
# query = "queries"

# Extension of the genome files, with or without the leading dot
ext = "fasta"

# Keep only / drop genomes whose name matches a regex
# include = "^Salmonella_"
# exclude = "_draft$"

# =============================================================================
# OUTPUT
# =============================================================================

# Matrix file and format: tsv, csv, phylip
out = "ani.tsv"
format = "tsv"

# Fixed number of decimals (omit for the shortest exact representation)
# precision = 4

# Write 100 - identity instead of identity
distance = false

# Run log (truncated at every run)
logfile = "run.log"

# =============================================================================
# COMPARISON TOOL
# =============================================================================

tool = "dnadiff"
# tool_args = []

# Per-comparison timeout in seconds, 0 disables
timeout = 3600

# Where temporary comparison folders are created
work_dir = "."

# Where the identity is read in the report: by key (default) or by line
report_key = "AvgIdentity"
# report_line = 19
report_column = 2

# =============================================================================
# EXECUTION
# =============================================================================

# Number of comparisons running at the same time
threads = 10

# Failure handling: default aborts on the first failure
keep_going = false
allow_partial = false

keep_temp = false
no_progress = false
dry_run = false
"#
        .to_string()
    }
}
