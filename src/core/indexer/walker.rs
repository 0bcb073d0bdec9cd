//! Source directory scanner.
//!
//! Lists the supported documents (`.txt`, `.pdf`, `.docx`) in the
//! source directory. Files with other extensions are ignored, as
//! are hidden entries and anything matching an exclude pattern.
//! Errors on individual entries are logged and skipped; only an
//! unreadable root fails the scan.

use glob::Pattern;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::core::error::{DocseekError, Result};
use crate::core::types::{Document, DocumentFormat};

/// A document found on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute or root-joined path to read from
    pub path: PathBuf,

    /// Identity, size and format
    pub document: Document,
}

/// File system walker with pattern-based filtering
#[derive(Debug, Clone)]
pub struct FileWalker {
    /// Patterns to exclude (e.g., "**/~$*")
    exclude_patterns: Vec<Pattern>,

    /// Maximum file size in bytes (skip larger files)
    max_file_size_bytes: u64,

    /// Descend into subdirectories
    recursive: bool,
}

impl FileWalker {
    /// Create a new file walker
    ///
    /// # Arguments
    ///
    /// * `exclude_patterns` - Glob patterns for files to exclude
    /// * `max_file_size_mb` - Maximum file size in megabytes
    /// * `recursive` - Whether to scan subdirectories
    ///
    /// # Returns
    ///
    /// A new `FileWalker` instance or an error if patterns are
    /// invalid
    pub fn new(
        exclude_patterns: Vec<String>,
        max_file_size_mb: usize,
        recursive: bool,
    ) -> Result<Self> {
        let exclude = exclude_patterns
            .into_iter()
            .map(|p| {
                Pattern::new(&p).map_err(|e| {
                    DocseekError::ConfigError(format!("Invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            exclude_patterns: exclude,
            max_file_size_bytes: (max_file_size_mb as u64) * 1024 * 1024,
            recursive,
        })
    }

    /// Collect all supported documents under `root`, sorted by id.
    ///
    /// Fails with `DirectoryUnreadable` only when the root itself
    /// cannot be listed.
    pub fn collect_documents(&self, root: &Path) -> Result<Vec<SourceFile>> {
        fs::read_dir(root).map_err(|e| DocseekError::DirectoryUnreadable {
            path: root.to_path_buf(),
            reason: e.to_string(),
        })?;

        let max_depth = if self.recursive { usize::MAX } else { 1 };
        let mut files = Vec::new();

        for entry in WalkDir::new(root)
            .follow_links(false)
            .max_depth(max_depth)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e, root))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("Walk error: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(file) = self.source_file(&entry, root) {
                files.push(file);
            }
        }

        files.sort_by(|a, b| a.document.id.cmp(&b.document.id));
        Ok(files)
    }

    fn source_file(&self, entry: &DirEntry, root: &Path) -> Option<SourceFile> {
        let path = entry.path();

        let Some(format) = DocumentFormat::from_path(path) else {
            tracing::debug!("Skipping unsupported file: {:?}", path);
            return None;
        };

        let id = document_id(path, root)?;
        if self.is_excluded(path, &id) {
            tracing::debug!("Skipping excluded file: {:?}", path);
            return None;
        }

        let size_bytes = match entry.metadata() {
            Ok(metadata) => metadata.len(),
            Err(e) => {
                tracing::warn!("Cannot stat {:?}: {}", path, e);
                return None;
            }
        };

        if size_bytes > self.max_file_size_bytes {
            tracing::debug!("Skipping large file: {:?} ({} bytes)", path, size_bytes);
            return None;
        }

        Some(SourceFile {
            path: path.to_path_buf(),
            document: Document {
                id,
                size_bytes,
                format,
            },
        })
    }

    fn is_excluded(&self, path: &Path, id: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|p| p.matches(id) || p.matches_path(path))
    }
}

/// Hidden entries below the root are never indexed.
fn is_hidden(entry: &DirEntry, root: &Path) -> bool {
    if entry.path() == root {
        return false;
    }

    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}

/// Document id: path relative to the root, `/`-separated.
fn document_id(path: &Path, root: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
