// Tue Jan 13 2026 - Alex

use crate::config::{resolve_worker_count, ConfigError, ScanConfig};
use crate::memory::{LoadMode, ScanTarget};
use crate::orchestration::aggregator::{RunAggregate, RunSummary};
use crate::orchestration::discovery::FileEnumerator;
use crate::orchestration::error::OrchestratorError;
use crate::orchestration::queue::WorkQueue;
use crate::output::{MatchEvent, Reporter};
use crate::pattern::{PatternTemplate, WindowMatcher};
use crate::ui::progress::ScanProgress;
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    Idle,
    Enumerating,
    Scanning,
    Drained,
}

/// Runs one template over a set of files with a fixed number of workers.
///
/// An orchestrator is single-use: it moves `Idle -> Enumerating -> Scanning ->
/// Drained` and refuses to run again once drained.
pub struct ScanOrchestrator {
    template: PatternTemplate,
    workers: usize,
    load_mode: LoadMode,
    progress: Option<ScanProgress>,
    state: OrchestratorState,
}

impl ScanOrchestrator {
    /// `workers` is clamped to `[1, logical cores]`.
    pub fn new(template: PatternTemplate, workers: usize) -> Self {
        Self {
            template,
            workers: resolve_worker_count(Some(workers), num_cpus::get()),
            load_mode: LoadMode::Read,
            progress: None,
            state: OrchestratorState::Idle,
        }
    }

    pub fn from_config(template: PatternTemplate, config: &ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(template, config.resolved_workers()).with_load_mode(config.load_mode))
    }

    pub fn with_load_mode(mut self, mode: LoadMode) -> Self {
        self.load_mode = mode;
        self
    }

    pub fn with_progress(mut self, progress: ScanProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn state(&self) -> OrchestratorState {
        self.state
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn template(&self) -> &PatternTemplate {
        &self.template
    }

    /// Enumerates `root` and scans every file found.
    pub fn scan_root<P: AsRef<Path>>(
        &mut self,
        root: P,
        enumerator: &FileEnumerator,
        reporter: &dyn Reporter,
    ) -> Result<RunSummary, OrchestratorError> {
        self.transition(OrchestratorState::Idle, OrchestratorState::Enumerating)?;
        let paths = match enumerator.enumerate(root) {
            Ok(paths) => paths,
            Err(e) => {
                self.state = OrchestratorState::Drained;
                return Err(e);
            }
        };
        self.scan(paths, reporter)
    }

    /// Scans an already enumerated list of files.
    pub fn scan_paths(
        &mut self,
        paths: Vec<PathBuf>,
        reporter: &dyn Reporter,
    ) -> Result<RunSummary, OrchestratorError> {
        self.transition(OrchestratorState::Idle, OrchestratorState::Enumerating)?;
        self.scan(paths, reporter)
    }

    fn transition(
        &mut self,
        expected: OrchestratorState,
        next: OrchestratorState,
    ) -> Result<(), OrchestratorError> {
        if self.state != expected {
            return Err(OrchestratorError::InvalidState {
                expected,
                actual: self.state,
            });
        }
        self.state = next;
        Ok(())
    }

    fn scan(
        &mut self,
        paths: Vec<PathBuf>,
        reporter: &dyn Reporter,
    ) -> Result<RunSummary, OrchestratorError> {
        self.transition(OrchestratorState::Enumerating, OrchestratorState::Scanning)?;

        let result = self.run_workers(paths, reporter);
        self.state = OrchestratorState::Drained;

        if let Some(progress) = &self.progress {
            progress.finish();
        }

        let summary = result?;
        reporter.on_summary(&summary);
        Ok(summary)
    }

    fn run_workers(
        &self,
        paths: Vec<PathBuf>,
        reporter: &dyn Reporter,
    ) -> Result<RunSummary, OrchestratorError> {
        let queue = WorkQueue::seed(paths);
        let files_total = queue.seeded();
        let aggregate = RunAggregate::new();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("relscan-worker-{}", i))
            .build()
            .map_err(|e| OrchestratorError::ThreadPool(e.to_string()))?;

        if let Some(progress) = &self.progress {
            progress.set_length(files_total as u64);
        }

        log::info!(
            "Scanning {} files with {} workers (template {})",
            files_total,
            self.workers,
            self.template
        );

        let start = Instant::now();
        let worker = FileWorker {
            template: &self.template,
            load_mode: self.load_mode,
            queue: &queue,
            aggregate: &aggregate,
            reporter,
            progress: self.progress.as_ref(),
        };

        pool.scope(|s| {
            for id in 0..self.workers {
                let worker = &worker;
                s.spawn(move |_| worker.run(id));
            }
        });
        let elapsed = start.elapsed();

        let summary = aggregate.finalize(files_total, self.workers, elapsed);
        log::info!(
            "Scan finished: {} matches in {} of {} files, {} bytes in {:.3}s",
            summary.total_matches,
            summary.files_with_matches,
            files_total,
            summary.bytes_scanned,
            summary.elapsed_secs
        );
        Ok(summary)
    }
}

/// State shared by every worker of one run. Only `queue` and `aggregate` are
/// mutated, through their own synchronisation.
struct FileWorker<'a> {
    template: &'a PatternTemplate,
    load_mode: LoadMode,
    queue: &'a WorkQueue,
    aggregate: &'a RunAggregate,
    reporter: &'a dyn Reporter,
    progress: Option<&'a ScanProgress>,
}

impl FileWorker<'_> {
    fn run(&self, id: usize) {
        let mut matcher = WindowMatcher::new(self.template);
        let mut files = 0usize;

        while let Some(path) = self.queue.pop() {
            let matches = self.scan_file(&path, &mut matcher);
            files += 1;
            if let Some(progress) = self.progress {
                progress.file_done(matches);
            }
        }

        log::debug!("Worker {} drained queue after {} files", id, files);
    }

    fn scan_file(&self, path: &Path, matcher: &mut WindowMatcher<'_>) -> usize {
        let span = self.template.span() as u64;

        let size = match ScanTarget::probe_len(path) {
            Ok(size) => size,
            Err(e) => {
                log::debug!("Skipping {}", e);
                self.aggregate.add_unreadable();
                return 0;
            }
        };
        if size < span {
            log::debug!("Skipping {}: {} bytes is shorter than span {}", path.display(), size, span);
            self.aggregate.add_too_small();
            return 0;
        }

        let target = match ScanTarget::load(path, self.load_mode) {
            Ok(target) => target,
            Err(e) => {
                log::debug!("Skipping {}", e);
                self.aggregate.add_unreadable();
                return 0;
            }
        };

        // The file may have shrunk since its size was read.
        if (target.len() as u64) < span {
            self.aggregate.add_too_small();
            return 0;
        }

        self.aggregate.add_bytes(target.len() as u64);
        self.aggregate.add_scanned_file();

        let mut ordinal = 0usize;
        let count = matcher.for_each_match(target.as_slice(), |offset, bytes| {
            self.aggregate.add_match();
            if ordinal == 0 {
                self.aggregate.add_file_with_matches();
            }
            self.reporter.on_match(&MatchEvent {
                path,
                offset,
                bytes,
                ordinal,
            });
            ordinal += 1;
        });

        log::trace!(
            "{}: {} matches in {} bytes ({})",
            path.display(),
            count,
            target.len(),
            if target.is_mapped() { "mapped" } else { "read" }
        );
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::MatchCollector;
    use crate::pattern::compile_template;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::fs;

    fn offsets(collector: MatchCollector, path: &Path) -> Vec<usize> {
        collector
            .into_sorted()
            .into_iter()
            .filter(|r| r.path == path)
            .map(|r| r.offset)
            .collect()
    }

    fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, data).unwrap();
        path
    }

    fn noise(seed: u32, len: usize) -> Vec<u8> {
        let mut state = seed | 1;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                (state % 5) as u8
            })
            .collect()
    }

    /// Checks that every file's events arrive in ascending offset order with
    /// consecutive ordinals.
    #[derive(Default)]
    struct OrderChecker {
        last: Mutex<HashMap<PathBuf, (usize, usize)>>,
        violations: Mutex<Vec<String>>,
    }

    impl Reporter for OrderChecker {
        fn on_match(&self, event: &MatchEvent<'_>) {
            let mut last = self.last.lock();
            match last.get(event.path) {
                None if event.ordinal != 0 => self.violations.lock().push(format!(
                    "{}: first ordinal {}",
                    event.path.display(),
                    event.ordinal
                )),
                Some(&(offset, ordinal)) if event.offset <= offset || event.ordinal != ordinal + 1 => {
                    self.violations.lock().push(format!(
                        "{}: {} after {}",
                        event.path.display(),
                        event.offset,
                        offset
                    ))
                }
                _ => {}
            }
            last.insert(event.path.to_path_buf(), (event.offset, event.ordinal));
        }
    }

    #[test]
    fn test_aba_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "a.bin", &[0x01, 0x02, 0x01, 0x03]);
        let template = compile_template("A B A", 1, 0).unwrap();
        let collector = MatchCollector::new();

        let mut orchestrator = ScanOrchestrator::new(template, 2);
        let summary = orchestrator.scan_paths(vec![path.clone()], &collector).unwrap();

        assert_eq!(summary.total_matches, 1);
        assert_eq!(summary.files_with_matches, 1);
        assert_eq!(summary.bytes_scanned, 4);
        assert_eq!(summary.files_scanned, 1);

        let records = collector.into_sorted();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].offset, 0);
        assert_eq!(records[0].bytes, vec![0x01, 0x02, 0x01]);
    }

    #[test]
    fn test_wildcard_file_capture() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "w.bin", &[0x14, 0xED, 0x00, 0x14, 0xED]);
        let template = compile_template("A A", 2, 1).unwrap();
        let collector = MatchCollector::new();

        let summary = ScanOrchestrator::new(template, 1)
            .scan_paths(vec![path], &collector)
            .unwrap();

        assert_eq!(summary.total_matches, 1);
        // Trailing wildcard is past EOF, so the capture stops at the span.
        assert_eq!(collector.into_sorted()[0].bytes, vec![0x14, 0xED, 0x00, 0x14, 0xED]);
    }

    #[test]
    fn test_too_small_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let small = write(dir.path(), "small.bin", &[0x01, 0x01]);
        let template = compile_template("A B A", 1, 0).unwrap();

        let summary = ScanOrchestrator::new(template, 1)
            .scan_paths(vec![small], &crate::output::NullReporter)
            .unwrap();

        assert_eq!(summary.total_matches, 0);
        assert_eq!(summary.bytes_scanned, 0);
        assert_eq!(summary.files_too_small, 1);
        assert_eq!(summary.files_scanned, 0);
    }

    #[test]
    fn test_exact_span_file() {
        let dir = tempfile::tempdir().unwrap();
        let hit = write(dir.path(), "hit.bin", &[7, 8, 7]);
        let miss = write(dir.path(), "miss.bin", &[7, 8, 9]);
        let template = compile_template("A B A", 1, 0).unwrap();
        let collector = MatchCollector::new();

        let summary = ScanOrchestrator::new(template, 2)
            .scan_paths(vec![hit.clone(), miss], &collector)
            .unwrap();

        assert_eq!(summary.total_matches, 1);
        assert_eq!(summary.bytes_scanned, 6);
        assert_eq!(offsets(collector, &hit), vec![0]);
    }

    #[test]
    fn test_unreadable_file_does_not_stop_scan() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(dir.path(), "good.bin", &[5, 5, 5, 5]);
        let missing = dir.path().join("missing.bin");
        let template = compile_template("A A", 1, 0).unwrap();

        let summary = ScanOrchestrator::new(template, 2)
            .scan_paths(vec![missing, good, dir.path().to_path_buf()], &crate::output::NullReporter)
            .unwrap();

        assert_eq!(summary.files_total, 3);
        assert_eq!(summary.files_unreadable, 2);
        assert_eq!(summary.total_matches, 3);
        assert_eq!(summary.bytes_scanned, 4);
    }

    #[test]
    fn test_worker_count_does_not_change_results() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..12)
            .map(|i| write(dir.path(), &format!("f{:02}.bin", i), &noise(i * 7919 + 3, 3000 + i as usize * 97)))
            .collect();

        let run = |workers: usize| {
            let template = compile_template("A B C A B", 1, 1).unwrap();
            let collector = MatchCollector::new();
            let summary = ScanOrchestrator::new(template, workers)
                .scan_paths(paths.clone(), &collector)
                .unwrap();
            (summary, collector.into_sorted())
        };

        let (single, single_records) = run(1);
        let (multi, multi_records) = run(4);

        assert!(single.total_matches > 0);
        assert_eq!(single.total_matches, multi.total_matches);
        assert_eq!(single.bytes_scanned, multi.bytes_scanned);
        assert_eq!(single.files_with_matches, multi.files_with_matches);
        assert_eq!(single_records, multi_records);
    }

    #[test]
    fn test_rescanning_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "same.bin", &noise(42, 5000));

        let run = || {
            let template = compile_template("A B B A", 1, 0).unwrap();
            let collector = MatchCollector::new();
            let summary = ScanOrchestrator::new(template, 3)
                .scan_paths(vec![path.clone()], &collector)
                .unwrap();
            (summary.total_matches, offsets(collector, &path))
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_events_ordered_within_file() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..6)
            .map(|i| write(dir.path(), &format!("o{}.bin", i), &noise(i + 11, 4000)))
            .collect();
        let template = compile_template("A A", 1, 0).unwrap();
        let checker = OrderChecker::default();

        let summary = ScanOrchestrator::new(template, 4)
            .scan_paths(paths, &checker)
            .unwrap();

        assert!(summary.total_matches > 0);
        assert!(checker.violations.lock().is_empty(), "{:?}", checker.violations.lock());
        assert_eq!(summary.files_with_matches as usize, checker.last.lock().len());
    }

    #[test]
    fn test_mapped_mode_matches_read_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(dir.path(), "m.bin", &noise(99, 2048));

        let run = |mode: LoadMode| {
            let template = compile_template("A B A", 2, 0).unwrap();
            let collector = MatchCollector::new();
            ScanOrchestrator::new(template, 1)
                .with_load_mode(mode)
                .scan_paths(vec![path.clone()], &collector)
                .unwrap();
            offsets(collector, &path)
        };

        assert_eq!(run(LoadMode::Read), run(LoadMode::Mapped));
    }

    #[test]
    fn test_scan_root_with_ignored_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "keep.bin", &[1, 1]);
        write(dir.path(), "skip.txt", &[1, 1]);
        let template = compile_template("A A", 1, 0).unwrap();
        let enumerator = FileEnumerator::new().ignore_extensions(["txt"]);

        let mut orchestrator = ScanOrchestrator::new(template, 1);
        let summary = orchestrator
            .scan_root(dir.path(), &enumerator, &crate::output::NullReporter)
            .unwrap();

        assert_eq!(summary.files_total, 1);
        assert_eq!(summary.total_matches, 1);
        assert_eq!(orchestrator.state(), OrchestratorState::Drained);
    }

    #[test]
    fn test_orchestrator_is_single_use() {
        let template = compile_template("A", 1, 0).unwrap();
        let mut orchestrator = ScanOrchestrator::new(template, 1);
        assert_eq!(orchestrator.state(), OrchestratorState::Idle);

        orchestrator.scan_paths(Vec::new(), &crate::output::NullReporter).unwrap();
        assert_eq!(orchestrator.state(), OrchestratorState::Drained);

        let err = orchestrator
            .scan_paths(Vec::new(), &crate::output::NullReporter)
            .unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::InvalidState {
                expected: OrchestratorState::Idle,
                actual: OrchestratorState::Drained
            }
        ));
    }

    #[test]
    fn test_missing_root_drains() {
        let dir = tempfile::tempdir().unwrap();
        let template = compile_template("A", 1, 0).unwrap();
        let mut orchestrator = ScanOrchestrator::new(template, 1);

        let err = orchestrator
            .scan_root(dir.path().join("nope"), &FileEnumerator::new(), &crate::output::NullReporter)
            .unwrap_err();
        assert!(matches!(err, OrchestratorError::RootNotFound(_)));
        assert_eq!(orchestrator.state(), OrchestratorState::Drained);
    }

    #[test]
    fn test_worker_count_clamped_to_cores() {
        let cores = num_cpus::get();
        let template = compile_template("A B", 1, 0).unwrap();

        assert_eq!(ScanOrchestrator::new(template.clone(), 0).workers(), 1);
        assert_eq!(ScanOrchestrator::new(template.clone(), usize::MAX).workers(), cores);
        assert_eq!(ScanOrchestrator::new(template, cores + 8).workers(), cores);
    }

    #[test]
    fn test_from_config() {
        let template = compile_template("A B", 1, 0).unwrap();
        let config = ScanConfig::new().with_worker_count(1).with_load_mode(LoadMode::Mapped);
        let orchestrator = ScanOrchestrator::from_config(template.clone(), &config).unwrap();
        assert_eq!(orchestrator.workers(), 1);

        let bad = ScanConfig::new().with_worker_count(0);
        assert!(ScanOrchestrator::from_config(template, &bad).is_err());
    }
}
