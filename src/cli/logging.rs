// logging.rs - Run log written to a file and mirrored on stderr

use crate::core::dispatcher::suspend_progress;
use crate::error::{PaniError, Result};
use chrono::{DateTime, Local};
use log::Level;
use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %I:%M:%S %p";

/// Duplicates every write to the log file and stderr, clearing any progress
/// bar while the stderr copy is printed
struct Tee {
    file: File,
}

impl Write for Tee {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write_all(buf)?;
        suspend_progress(|| io::stderr().write_all(buf))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()?;
        io::stderr().flush()
    }
}

/// `[2024-03-01 02:15:07 PM] message`, with the level spelled out above INFO
pub fn format_line(time: &DateTime<Local>, level: Level, message: &str) -> String {
    match level {
        Level::Info => format!("[{}] {}", time.format(TIMESTAMP_FORMAT), message),
        other => format!("[{}] {}: {}", time.format(TIMESTAMP_FORMAT), other, message),
    }
}

/// Install the global logger; the file is truncated first.
/// INFO by default, `RUST_LOG` overrides.
pub fn init_logging(logfile: &Path) -> Result<()> {
    if let Some(parent) = logfile.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = File::create(logfile)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let line = format_line(&Local::now(), record.level(), &record.args().to_string());
            writeln!(buf, "{}", line)
        })
        .target(env_logger::Target::Pipe(Box::new(Tee { file })))
        .try_init()
        .map_err(|e| PaniError::InvalidConfig(format!("Failed to initialize logging: {}", e)))
}
