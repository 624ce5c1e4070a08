// Tue Jan 13 2026 - Alex

use crate::output::event::{MatchEvent, Reporter};
use crate::utils::hex;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord {
    pub path: PathBuf,
    pub offset: usize,
    #[serde(serialize_with = "hex::serialize_bytes")]
    pub bytes: Vec<u8>,
}

impl From<&MatchEvent<'_>> for MatchRecord {
    fn from(event: &MatchEvent<'_>) -> Self {
        Self {
            path: event.path.to_path_buf(),
            offset: event.offset,
            bytes: event.bytes.to_vec(),
        }
    }
}

/// Keeps an owned copy of every match.
#[derive(Default)]
pub struct MatchCollector {
    records: Mutex<Vec<MatchRecord>>,
}

impl MatchCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All records ordered by path, then offset.
    pub fn into_sorted(self) -> Vec<MatchRecord> {
        let mut records = self.records.into_inner();
        records.sort_by(|a, b| a.path.cmp(&b.path).then(a.offset.cmp(&b.offset)));
        records
    }
}

impl Reporter for MatchCollector {
    fn on_match(&self, event: &MatchEvent<'_>) {
        self.records.lock().push(MatchRecord::from(event));
    }
}
