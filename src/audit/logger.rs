//! Append-only JSONL audit log

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use crate::error::{SplitError, SplitResult};

use super::entry::AuditEntry;

/// `audit.log`: one JSON entry per line, oldest first
pub struct AuditLogger {
    path: PathBuf,
}

impl AuditLogger {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Append one entry, flushed before returning
    pub fn append(&self, entry: &AuditEntry) -> SplitResult<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(io_error("open"))?;
        file.write_all(&line)
            .and_then(|()| file.flush())
            .map_err(io_error("write"))
    }

    /// Every entry; a missing log is an empty one
    pub fn entries(&self) -> SplitResult<Vec<AuditEntry>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(io_error("open")(e)),
        };

        BufReader::new(file)
            .lines()
            .enumerate()
            .filter(|(_, line)| !matches!(line, Ok(text) if text.trim().is_empty()))
            .map(|(index, line)| {
                let line = line.map_err(io_error("read"))?;
                serde_json::from_str(&line).map_err(|e| {
                    SplitError::Json(format!("Bad audit entry on line {}: {}", index + 1, e))
                })
            })
            .collect()
    }

    /// The last `count` entries, oldest first
    pub fn tail(&self, count: usize) -> SplitResult<Vec<AuditEntry>> {
        let mut entries = self.entries()?;
        Ok(entries.split_off(entries.len().saturating_sub(count)))
    }
}

fn io_error(action: &'static str) -> impl Fn(io::Error) -> SplitError {
    move |e| SplitError::Io(format!("Failed to {} audit log: {}", action, e))
}
