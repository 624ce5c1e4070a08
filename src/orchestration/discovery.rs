// Tue Jan 13 2026 - Alex

use crate::orchestration::error::OrchestratorError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects the files to scan under a root path.
///
/// A root that is a file yields just that file. A directory is walked
/// recursively; only regular files are returned, sorted by path. Files whose
/// extension is on the ignore list (compared case-insensitively) are dropped.
#[derive(Debug, Clone, Default)]
pub struct FileEnumerator {
    ignored: HashSet<String>,
    follow_links: bool,
}

impl FileEnumerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ext in extensions {
            let ext = normalize_extension(ext.as_ref());
            if !ext.is_empty() {
                self.ignored.insert(ext);
            }
        }
        self
    }

    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    pub fn is_ignored(&self, path: &Path) -> bool {
        if self.ignored.is_empty() {
            return false;
        }
        path.extension()
            .map(|ext| self.ignored.contains(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }

    pub fn enumerate<P: AsRef<Path>>(&self, root: P) -> Result<Vec<PathBuf>, OrchestratorError> {
        let root = root.as_ref();
        if !root.exists() {
            return Err(OrchestratorError::RootNotFound(root.to_path_buf()));
        }

        if root.is_file() {
            return Ok(if self.is_ignored(root) {
                Vec::new()
            } else {
                vec![root.to_path_buf()]
            });
        }

        let walker = WalkDir::new(root).follow_links(self.follow_links);

        let mut files = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }
            if self.is_ignored(entry.path()) {
                log::trace!("Ignoring {}", entry.path().display());
                continue;
            }
            files.push(entry.into_path());
        }

        files.sort();
        log::info!("Found {} files under {}", files.len(), root.display());
        Ok(files)
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Splits `"bin, .DAT,txt"` style lists into individual extensions.
pub fn parse_extension_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(normalize_extension)
        .filter(|ext| !ext.is_empty())
        .collect()
}
