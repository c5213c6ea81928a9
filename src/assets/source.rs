use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{FramesmithError, FramesmithResult};

/// Byte provider for frame image locators.
///
/// Implementations run on loader worker threads, hence `Send + Sync`.
pub trait ImageSource: Send + Sync {
    /// Fetch the encoded bytes behind `locator`.
    fn fetch(&self, locator: &str) -> FramesmithResult<Vec<u8>>;
}

/// Normalize a web-style locator into a relative path.
///
/// A leading `/` means "relative to the assets root" (like a site root). The result uses `/`
/// separators, drops `.` segments, and rejects parent traversals (`..`).
pub(crate) fn normalize_locator(locator: &str) -> FramesmithResult<String> {
    let s = locator.trim().replace('\\', "/");
    if s.is_empty() {
        return Err(FramesmithError::validation("image locator must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(FramesmithError::validation(format!(
                "image locator '{locator}' must not contain '..'"
            )));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(FramesmithError::validation(format!(
            "image locator '{locator}' must contain a file name"
        )));
    }

    Ok(out.join("/"))
}

/// Resolves locators as files under an assets root directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    /// Serve files below `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The assets root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a locator resolves to.
    pub fn resolve(&self, locator: &str) -> FramesmithResult<PathBuf> {
        let norm = normalize_locator(locator)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl ImageSource for DirSource {
    fn fetch(&self, locator: &str) -> FramesmithResult<Vec<u8>> {
        let p = self.resolve(locator)?;
        std::fs::read(&p).map_err(|e| {
            FramesmithError::resource_load(format!("failed to read '{}': {e}", p.display()))
        })
    }
}

/// In-memory locator → bytes map.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register bytes under a locator (normalized the same way as [`DirSource`]).
    pub fn insert(&mut self, locator: &str, bytes: Vec<u8>) -> FramesmithResult<()> {
        let key = normalize_locator(locator)?;
        self.entries.insert(key, bytes);
        Ok(())
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with(mut self, locator: &str, bytes: Vec<u8>) -> FramesmithResult<Self> {
        self.insert(locator, bytes)?;
        Ok(self)
    }
}

impl ImageSource for MemorySource {
    fn fetch(&self, locator: &str) -> FramesmithResult<Vec<u8>> {
        let key = normalize_locator(locator)?;
        self.entries.get(&key).cloned().ok_or_else(|| {
            FramesmithError::resource_load(format!("no image registered for '{locator}'"))
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;
