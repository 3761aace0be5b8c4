//! Audit Writer - append-only CSV, one writer at a time
//!
//! Every append holds the mutex for the whole "open, maybe write header,
//! write row" sequence, so the header lands exactly once and rows from
//! concurrent requests never interleave.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;

use super::record::{header, AuditRecord};
use super::AuditError;

/// Longest an append waits for the writer before giving up
pub const LOCK_TIMEOUT: Duration = Duration::from_secs(2);

pub struct AuditLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
    rows_written: AtomicU64,
    failures: AtomicU64,
}

/// Operator-facing counters
#[derive(Debug, Clone, Serialize)]
pub struct AuditStats {
    pub path: String,
    pub rows_written: u64,
    pub failures: u64,
}

impl AuditLog {
    /// The file is opened lazily on first append
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            file: Mutex::new(None),
            rows_written: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record, reporting failures to the caller
    pub fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let mut line = record.to_csv_row();
        line.push('\n');

        let mut guard = self
            .file
            .try_lock_for(LOCK_TIMEOUT)
            .ok_or(AuditError::LockTimeout(LOCK_TIMEOUT))?;

        let file = match guard.take() {
            Some(file) => file,
            None => self.open()?,
        };
        let file = guard.insert(file);

        if let Err(e) = file.write_all(line.as_bytes()).and_then(|_| file.flush()) {
            // reopen on the next append
            *guard = None;
            return Err(e.into());
        }

        self.rows_written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Best-effort append: failures are logged and counted, never returned
    pub fn log(&self, record: &AuditRecord) -> bool {
        match self.append(record) {
            Ok(()) => true,
            Err(e) => {
                let total = self.failures.fetch_add(1, Ordering::Relaxed) + 1;
                log::error!(
                    "Failed to append audit record to {} ({} failures so far): {}",
                    self.path.display(),
                    total,
                    e
                );
                false
            }
        }
    }

    pub fn stats(&self) -> AuditStats {
        AuditStats {
            path: self.path.display().to_string(),
            rows_written: self.rows_written.load(Ordering::Relaxed),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Open for append; initialize an empty file with the header, and
    /// refuse a non-empty file whose header is not ours. A file that ends
    /// mid-row (torn earlier write) gets its newline first, so the fragment
    /// stays on its own line instead of swallowing the next row.
    fn open(&self) -> Result<File, AuditError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let expected = header();

        if file.metadata()?.len() == 0 {
            writeln!(file, "{}", expected)?;
            file.flush()?;
            log::info!("Initialized audit log: {}", self.path.display());
        } else {
            let mut first = String::new();
            BufReader::new(&file).read_line(&mut first)?;
            if first.trim_end() != expected {
                return Err(AuditError::HeaderMismatch(self.path.display().to_string()));
            }

            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1))?;
            file.read_exact(&mut last)?;
            if last[0] != b'\n' {
                file.write_all(b"\n")?;
                file.flush()?;
                log::warn!("Audit log {} ended mid-row, terminated the partial row", self.path.display());
            }
        }

        Ok(file)
    }
}

impl std::fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditLog").field("path", &self.path).finish()
    }
}
