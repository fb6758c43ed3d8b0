// input.rs - Input genome discovery

use crate::error::{PaniError, Result};
use glob::MatchOptions;
use regex::Regex;
use std::path::{Path, PathBuf};

/// A genome assembly file taking part in the run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputFile {
    pub path: PathBuf,
    /// File name without its extension, used as matrix label
    pub base_name: String,
}

impl InputFile {
    pub fn new(path: PathBuf) -> Self {
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, base_name }
    }
}

/// Include/exclude expressions applied to base names after globbing
#[derive(Debug, Clone, Default)]
pub struct InputFilter {
    pub include: Option<Regex>,
    pub exclude: Option<Regex>,
}

impl InputFilter {
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self> {
        Ok(Self {
            include: include.map(Regex::new).transpose()?,
            exclude: exclude.map(Regex::new).transpose()?,
        })
    }

    pub fn accepts(&self, base_name: &str) -> bool {
        if let Some(regex) = &self.include {
            if !regex.is_match(base_name) {
                return false;
            }
        }
        if let Some(regex) = &self.exclude {
            if regex.is_match(base_name) {
                return false;
            }
        }
        true
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }
}

/// Strip a leading dot so both `fasta` and `.fasta` work
pub fn normalize_extension(extension: &str) -> &str {
    extension.trim_start_matches('.')
}

/// Find every `<folder>/*.<extension>` file, sorted by path. Hidden files
/// such as `._a.fasta` are not matched.
///
/// Fails with `NoInputFiles` when nothing survives globbing and filtering, so
/// callers can abort before any comparison is scheduled.
pub fn discover(folder: &Path, extension: &str, filter: &InputFilter) -> Result<Vec<InputFile>> {
    if !folder.is_dir() {
        return Err(PaniError::InputFolderNotFound(folder.to_path_buf()));
    }

    let extension = normalize_extension(extension);
    let escaped_folder = glob::Pattern::escape(&folder.to_string_lossy());
    let pattern = format!("{}/*.{}", escaped_folder.trim_end_matches('/'), extension);

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    let mut paths = Vec::new();
    for entry in glob::glob_with(&pattern, options)? {
        let path = entry?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let found = paths.len();
    let files: Vec<InputFile> = paths
        .into_iter()
        .map(InputFile::new)
        .filter(|f| filter.accepts(&f.base_name))
        .collect();

    if !filter.is_empty() && files.len() != found {
        log::info!(
            "Name filters: kept {} files in {} (removed {})",
            files.len(),
            folder.display(),
            found - files.len()
        );
    }

    if files.is_empty() {
        return Err(PaniError::NoInputFiles {
            folder: folder.to_path_buf(),
            extension: extension.to_string(),
        });
    }

    Ok(files)
}
