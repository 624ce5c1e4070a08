// Wed Jan 15 2026 - Alex

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}";

/// File-level progress for a scan. Cheap to clone; all clones drive the same bar.
#[derive(Clone)]
pub struct ScanProgress {
    bar: ProgressBar,
}

impl ScanProgress {
    pub fn new(total_files: u64) -> Self {
        let bar = ProgressBar::new(total_files);
        let style = ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓▒░ ");
        bar.set_style(style);
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    pub fn set_length(&self, total_files: u64) {
        self.bar.set_length(total_files);
    }

    pub fn file_done(&self, matches: usize) {
        self.bar.inc(1);
        if matches > 0 {
            self.bar.set_message(format!("+{} matches", matches));
        }
    }

    /// Runs `f` with the bar hidden so printed lines do not tear it.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
