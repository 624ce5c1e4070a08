// Tue Jan 13 2026 - Alex

use crate::memory::LoadMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Unsupported config format: {0}")]
    UnsupportedFormat(String),
}

/// Values the scanner needs before it touches any file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub element_width: usize,
    pub wildcard_width: usize,
    /// `None` picks one less than the number of logical cores.
    pub worker_count: Option<usize>,
    pub ignore_extensions: Vec<String>,
    pub load_mode: LoadMode,
    pub follow_links: bool,
    /// Console display cap per file; counts are not affected.
    pub max_matches_per_file: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            element_width: 1,
            wildcard_width: 0,
            worker_count: None,
            ignore_extensions: Vec::new(),
            load_mode: LoadMode::Read,
            follow_links: false,
            max_matches_per_file: None,
        }
    }
}

impl ScanConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element_width(mut self, width: usize) -> Self {
        self.element_width = width;
        self
    }

    pub fn with_wildcard_width(mut self, width: usize) -> Self {
        self.wildcard_width = width;
        self
    }

    pub fn with_worker_count(mut self, count: usize) -> Self {
        self.worker_count = Some(count);
        self
    }

    pub fn with_ignore_extensions(mut self, extensions: Vec<String>) -> Self {
        self.ignore_extensions = extensions;
        self
    }

    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.element_width == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "element_width must be greater than 0".to_string(),
            ));
        }
        if self.worker_count == Some(0) {
            return Err(ConfigError::InvalidConfiguration(
                "worker_count must be at least 1".to_string(),
            ));
        }
        if self.max_matches_per_file == Some(0) {
            return Err(ConfigError::InvalidConfiguration(
                "max_matches_per_file must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn resolved_workers(&self) -> usize {
        resolve_worker_count(self.worker_count, num_cpus::get())
    }
}

/// Default is `cores - 1`; any request is clamped to `[1, cores]`.
pub fn resolve_worker_count(requested: Option<usize>, cores: usize) -> usize {
    let cores = cores.max(1);
    match requested {
        None => cores.saturating_sub(1).max(1),
        Some(n) => {
            let clamped = n.clamp(1, cores);
            if clamped != n {
                log::warn!("Worker count {} clamped to {} ({} logical cores)", n, clamped, cores);
            }
            clamped
        }
    }
}

/// Optional on-disk defaults, overridden by command-line flags.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigFile {
    pub scan: ScanConfig,
    pub template: Option<String>,
    pub pattern_file: Option<PathBuf>,
    pub json_output: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "json" {
            return Err(ConfigError::UnsupportedFormat(ext));
        }

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file: ConfigFile = serde_json::from_str(&contents)
            .map_err(|e| ConfigError::InvalidConfiguration(format!("{}: {}", path.display(), e)))?;
        file.scan.validate()?;
        Ok(file)
    }
}
