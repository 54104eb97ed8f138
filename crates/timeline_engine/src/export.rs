use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub filename: String,
    pub bytes: u64,
    /// Where the file landed, for sinks that write to disk.
    pub path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("output directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Receives the finished TSV of a run under its suggested filename.
pub trait ExportSink: Send + Sync {
    fn export(&self, filename: &str, contents: String) -> Result<ExportReceipt, ExportError>;
}

/// Saves exports into a directory. Each file is written to a temp file
/// first and renamed into place, so a failed export leaves no partial file.
#[derive(Debug, Clone)]
pub struct FileExportSink {
    dir: PathBuf,
}

impl FileExportSink {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for FileExportSink {
    fn export(&self, filename: &str, contents: String) -> Result<ExportReceipt, ExportError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(contents.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Re-running on the same page replaces the earlier export.
        if target.exists() {
            fs::remove_file(&target)?;
        }
        tmp.persist(&target).map_err(|e| ExportError::Io(e.error))?;

        Ok(ExportReceipt {
            filename: filename.to_string(),
            bytes: contents.len() as u64,
            path: Some(target),
        })
    }
}

/// Create `dir` if missing and check that files can be created in it.
pub fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(ExportError::OutputDir(format!(
                "{} is not a directory",
                dir.display()
            )));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    }
    NamedTempFile::new_in(dir).map_err(|e| ExportError::OutputDir(e.to_string()))?;
    Ok(())
}

/// Keeps exports in memory, in the order they were made.
#[derive(Debug, Default)]
pub struct MemoryExportSink {
    files: Mutex<Vec<(String, String)>>,
}

impl MemoryExportSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns everything exported so far.
    pub fn take(&self) -> Vec<(String, String)> {
        match self.files.lock() {
            Ok(mut files) => files.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl ExportSink for MemoryExportSink {
    fn export(&self, filename: &str, contents: String) -> Result<ExportReceipt, ExportError> {
        let bytes = contents.len() as u64;
        self.files
            .lock()
            .map_err(|_| ExportError::Io(io::Error::other("export buffer poisoned")))?
            .push((filename.to_string(), contents));
        Ok(ExportReceipt {
            filename: filename.to_string(),
            bytes,
            path: None,
        })
    }
}
