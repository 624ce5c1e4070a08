// Tue Jan 13 2026 - Alex

use crate::pattern::error::PatternError;
use ahash::RandomState;
use indexmap::IndexMap;
use std::fmt;

/// Dense identifier of one distinct template token. IDs are handed out in
/// order of first appearance, starting at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SymbolId(u32);

impl SymbolId {
    fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(SymbolId)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Spreadsheet-style letter for display: A..Z, then AA, AB, ...
    pub fn letter(self) -> String {
        let mut n = self.0 as usize + 1;
        let mut out = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            out.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        out.reverse();
        String::from_utf8_lossy(&out).into_owned()
    }
}

impl fmt::Display for SymbolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    ids: IndexMap<String, SymbolId, RandomState>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, token: &str) -> Result<SymbolId, PatternError> {
        if let Some(&id) = self.ids.get(token) {
            return Ok(id);
        }
        let id = SymbolId::from_index(self.ids.len()).ok_or_else(|| {
            PatternError::InvalidTemplate(format!("more than {} distinct tokens", u32::MAX))
        })?;
        self.ids.insert(token.to_string(), id);
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.ids.keys().map(String::as_str)
    }
}
