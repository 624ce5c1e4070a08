// Tue Jan 13 2026 - Alex

use crate::orchestration::RunSummary;
use std::path::Path;

/// One validated window, borrowed from the worker that found it.
#[derive(Debug, Clone, Copy)]
pub struct MatchEvent<'a> {
    pub path: &'a Path,
    pub offset: usize,
    /// Span plus trailing wildcard, cut short at end of file.
    pub bytes: &'a [u8],
    /// 0 for the first match in this file, 1 for the second, ...
    pub ordinal: usize,
}

impl MatchEvent<'_> {
    pub fn is_first_in_file(&self) -> bool {
        self.ordinal == 0
    }
}

/// Receives matches and the final summary of a run.
///
/// `on_match` is called from worker threads. Events for one file arrive from a
/// single worker in ascending offset order; events of different files may
/// interleave.
pub trait Reporter: Send + Sync {
    fn on_match(&self, event: &MatchEvent<'_>);

    fn on_summary(&self, _summary: &RunSummary) {}
}

/// Discards everything.
pub struct NullReporter;

impl Reporter for NullReporter {
    fn on_match(&self, _event: &MatchEvent<'_>) {}
}

/// Forwards every call to two reporters.
pub struct Tee<A, B> {
    first: A,
    second: B,
}

impl<A: Reporter, B: Reporter> Tee<A, B> {
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

}

impl<A: Reporter, B: Reporter> Reporter for Tee<A, B> {
    fn on_match(&self, event: &MatchEvent<'_>) {
        self.first.on_match(event);
        self.second.on_match(event);
    }

    fn on_summary(&self, summary: &RunSummary) {
        self.first.on_summary(summary);
        self.second.on_summary(summary);
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn on_match(&self, event: &MatchEvent<'_>) {
        (**self).on_match(event);
    }

    fn on_summary(&self, summary: &RunSummary) {
        (**self).on_summary(summary);
    }
}
