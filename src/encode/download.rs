use std::path::{Path, PathBuf};

use crate::encode::export::ExportedFile;
use crate::foundation::error::{FramesmithError, FramesmithResult};

/// Host "save as file" facility receiving exported images.
pub trait DownloadSink {
    /// Persist or hand off one exported file.
    fn save(&mut self, file: &ExportedFile) -> FramesmithResult<()>;
}

/// Writes exports into a directory, overwriting files with the same name.
#[derive(Debug, Clone)]
pub struct DirectoryDownloads {
    dir: PathBuf,
    last: Option<PathBuf>,
}

impl DirectoryDownloads {
    /// Save into `dir` (created on first save).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            last: None,
        }
    }

    /// Target directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the most recently written file.
    pub fn last_saved(&self) -> Option<&Path> {
        self.last.as_deref()
    }
}

impl DownloadSink for DirectoryDownloads {
    fn save(&mut self, file: &ExportedFile) -> FramesmithResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            FramesmithError::export(format!(
                "create download dir '{}': {e}",
                self.dir.display()
            ))
        })?;
        let path = self.dir.join(&file.file_name);
        std::fs::write(&path, &file.bytes)
            .map_err(|e| FramesmithError::export(format!("write '{}': {e}", path.display())))?;
        tracing::info!(path = %path.display(), bytes = file.bytes.len(), "saved export");
        self.last = Some(path);
        Ok(())
    }
}

/// Captures exports in memory, in save order.
#[derive(Debug, Default)]
pub struct InMemoryDownloads {
    files: Vec<ExportedFile>,
}

impl InMemoryDownloads {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the captured files.
    pub fn files(&self) -> &[ExportedFile] {
        &self.files
    }
}

impl DownloadSink for InMemoryDownloads {
    fn save(&mut self, file: &ExportedFile) -> FramesmithResult<()> {
        self.files.push(file.clone());
        Ok(())
    }
}
