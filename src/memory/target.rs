// Tue Jan 13 2026 - Alex

use crate::memory::MemoryError;
use memmap2::Mmap;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMode {
    /// Read the whole file into a heap buffer.
    #[default]
    Read,
    /// Memory-map the file read-only.
    Mapped,
}

enum Storage {
    Owned(Vec<u8>),
    Mapped(Mmap),
}

/// The bytes of one file, owned by the worker scanning it.
pub struct ScanTarget {
    storage: Storage,
}

impl ScanTarget {
    /// Size of the file on disk, without reading it.
    pub fn probe_len<P: AsRef<Path>>(path: P) -> Result<u64, MemoryError> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|e| MemoryError::unreadable(path, e))?;
        if !meta.is_file() {
            return Err(MemoryError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        Ok(meta.len())
    }

    pub fn load<P: AsRef<Path>>(path: P, mode: LoadMode) -> Result<Self, MemoryError> {
        let path = path.as_ref();
        let mut file = File::open(path).map_err(|e| MemoryError::unreadable(path, e))?;

        let storage = match mode {
            LoadMode::Read => {
                let mut data = Vec::new();
                file.read_to_end(&mut data)
                    .map_err(|e| MemoryError::unreadable(path, e))?;
                Storage::Owned(data)
            }
            LoadMode::Mapped => {
                let len = file
                    .metadata()
                    .map_err(|e| MemoryError::unreadable(path, e))?
                    .len();
                if len == 0 {
                    Storage::Owned(Vec::new())
                } else {
                    // The map is read-only and dropped before the worker moves on.
                    let mmap = unsafe { Mmap::map(&file) }
                        .map_err(|e| MemoryError::unreadable(path, e))?;
                    Storage::Mapped(mmap)
                }
            }
        };

        Ok(Self { storage })
    }

    pub fn as_slice(&self) -> &[u8] {
        match &self.storage {
            Storage::Owned(data) => data.as_slice(),
            Storage::Mapped(mmap) => &mmap[..],
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_mapped(&self) -> bool {
        matches!(self.storage, Storage::Mapped(_))
    }
}

impl Deref for ScanTarget {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_slice()
    }
}
