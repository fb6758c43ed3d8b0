// merge.rs - Merge configuration file with CLI arguments

use crate::cli::args::{InputArgs, Invocation, SharedArgs};
use crate::cli::Config;
use crate::error::Result;

impl SharedArgs {
    /// Fill options the command line left unset from `config`.
    /// Switches given on the command line always stay on.
    pub fn merge_with_config(mut self, config: &Config) -> Self {
        // Output
        if self.out.is_none() {
            self.out = config.out.clone();
        }
        if self.format.is_none() {
            self.format = config.format.clone();
        }
        if self.precision.is_none() {
            self.precision = config.precision;
        }
        if self.logfile.is_none() {
            self.logfile = config.logfile.clone();
        }
        if !self.distance && config.distance.unwrap_or(false) {
            self.distance = true;
        }

        // Inputs
        if self.ext.is_none() {
            self.ext = config.ext.clone();
        }
        if self.include.is_none() {
            self.include = config.include.clone();
        }
        if self.exclude.is_none() {
            self.exclude = config.exclude.clone();
        }

        // Comparison tool
        if self.tool.is_none() {
            self.tool = config.tool.clone();
        }
        if self.tool_args.is_empty() {
            if let Some(extra) = &config.tool_args {
                self.tool_args = extra.clone();
            }
        }
        if self.timeout.is_none() {
            self.timeout = config.timeout;
        }
        if self.work_dir.is_none() {
            self.work_dir = config.work_dir.clone();
        }
        // A locator picked on the command line is not mixed with one from the file
        if self.report_line.is_none() && self.report_key.is_none() {
            self.report_line = config.report_line;
            self.report_key = config.report_key.clone();
        }
        if self.report_column.is_none() {
            self.report_column = config.report_column;
        }

        // Execution
        if self.threads.is_none() {
            self.threads = config.threads;
        }
        if !self.keep_going && config.keep_going.unwrap_or(false) {
            self.keep_going = true;
        }
        if !self.allow_partial && config.allow_partial.unwrap_or(false) {
            self.allow_partial = true;
        }
        if !self.keep_temp && config.keep_temp.unwrap_or(false) {
            self.keep_temp = true;
        }
        if !self.no_progress && config.no_progress.unwrap_or(false) {
            self.no_progress = true;
        }
        if !self.dry_run && config.dry_run.unwrap_or(false) {
            self.dry_run = true;
        }

        self
    }
}

impl Invocation {
    /// Merge with configuration from file
    /// CLI arguments take precedence over config file values
    pub fn merge_with_config(self, config: &Config) -> Self {
        let inputs = match self.inputs {
            InputArgs::Matrix { folder } => InputArgs::Matrix {
                folder: folder.or_else(|| config.folder.clone()),
            },
            InputArgs::Ref { reference, query } => InputArgs::Ref {
                reference: reference.or_else(|| config.reference.clone()),
                query: query.or_else(|| config.query.clone()),
            },
        };

        Invocation {
            inputs,
            shared: self.shared.merge_with_config(config),
        }
    }

    /// Load configuration and merge with CLI args
    pub fn with_config_file(self, config_path: &str) -> Result<Self> {
        let config = Config::from_file(config_path)?;
        Ok(self.merge_with_config(&config))
    }
}
