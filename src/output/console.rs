// Tue Jan 13 2026 - Alex

use crate::orchestration::RunSummary;
use crate::output::event::{MatchEvent, Reporter};
use crate::pattern::PatternTemplate;
use crate::ui::progress::ScanProgress;
use crate::utils::hex::{split_groups, to_hex, GroupKind};
use crate::utils::{format_bytes, format_duration, format_rate, pluralize};
use colored::*;
use itertools::Itertools;
use std::io::{self, Write};

/// Prints matches to stdout as they arrive.
///
/// Each file gets a header line before its first match. Element groups are
/// highlighted and wildcard groups dimmed, so a reader can line the bytes up
/// against the template by eye.
pub struct ConsoleReporter {
    element_width: usize,
    wildcard_width: usize,
    use_color: bool,
    show_matches: bool,
    max_per_file: Option<usize>,
    progress: Option<ScanProgress>,
}

impl ConsoleReporter {
    pub fn new(template: &PatternTemplate) -> Self {
        Self {
            element_width: template.element_width(),
            wildcard_width: template.wildcard_width(),
            use_color: true,
            show_matches: true,
            max_per_file: None,
            progress: None,
        }
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    /// With matches hidden only the summary is printed.
    pub fn with_matches(mut self, show: bool) -> Self {
        self.show_matches = show;
        self
    }

    pub fn with_max_per_file(mut self, max: Option<usize>) -> Self {
        self.max_per_file = max;
        self
    }

    pub fn with_progress(mut self, progress: ScanProgress) -> Self {
        self.progress = Some(progress);
        self
    }

    fn paint(&self, text: String, style: fn(String) -> ColoredString) -> String {
        if self.use_color {
            style(text).to_string()
        } else {
            text
        }
    }

    pub fn format_header(&self, event: &MatchEvent<'_>) -> String {
        self.paint(event.path.display().to_string(), |s| s.bold().underline())
    }

    pub fn format_match(&self, event: &MatchEvent<'_>) -> String {
        let groups = split_groups(event.bytes, self.element_width, self.wildcard_width)
            .into_iter()
            .map(|(kind, bytes)| match kind {
                GroupKind::Element => self.paint(to_hex(bytes), |s| s.cyan()),
                GroupKind::Wildcard => self.paint(to_hex(bytes), |s| s.dimmed()),
            })
            .join(" ");

        format!("  {}  {}", self.paint(format!("0x{:08X}", event.offset), |s| s.yellow()), groups)
    }

    pub fn format_summary(&self, summary: &RunSummary) -> Vec<String> {
        let mut lines = vec![
            format!("Files:    {} considered, {} scanned", summary.files_total, summary.files_scanned),
            format!(
                "Matches:  {} in {}",
                summary.total_matches,
                pluralize(summary.files_with_matches, "file", "files")
            ),
            format!("Scanned:  {}", format_bytes(summary.bytes_scanned)),
            format!(
                "Elapsed:  {} ({}, {})",
                format_duration(summary.elapsed),
                format_rate(summary.bytes_per_second()),
                pluralize(summary.workers as u64, "worker", "workers")
            ),
        ];

        if summary.files_skipped() > 0 {
            lines.push(format!(
                "Skipped:  {} too small, {} unreadable",
                summary.files_too_small, summary.files_unreadable
            ));
        }
        lines
    }

    fn emit(&self, lines: &[String]) {
        let write = || {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for line in lines {
                let _ = writeln!(out, "{}", line);
            }
        };

        match &self.progress {
            Some(progress) => progress.suspend(write),
            None => write(),
        }
    }
}

impl Reporter for ConsoleReporter {
    fn on_match(&self, event: &MatchEvent<'_>) {
        if !self.show_matches {
            return;
        }
        let mut lines = Vec::with_capacity(2);

        if let Some(max) = self.max_per_file {
            if event.ordinal > max {
                return;
            }
            if event.ordinal == max {
                lines.push(self.paint(format!("  ... more matches (showing first {})", max), |s| s.dimmed()));
                self.emit(&lines);
                return;
            }
        }

        if event.is_first_in_file() {
            lines.push(self.format_header(event));
        }
        lines.push(self.format_match(event));
        self.emit(&lines);
    }

    fn on_summary(&self, summary: &RunSummary) {
        let mut lines = vec![String::new(), self.paint("Summary".to_string(), |s| s.green().bold())];
        lines.extend(self.format_summary(summary));
        self.emit(&lines);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestration::RunAggregate;
    use crate::pattern::compile_template;
    use std::path::Path;
    use std::time::Duration;

    fn reporter(wildcard: usize) -> ConsoleReporter {
        let template = compile_template("A A", 2, wildcard).unwrap();
        ConsoleReporter::new(&template).with_color(false)
    }

    #[test]
    fn test_format_match_groups() {
        let event = MatchEvent {
            path: Path::new("rom.bin"),
            offset: 0x1F,
            bytes: &[0x14, 0xED, 0x00, 0x14, 0xED, 0x07],
            ordinal: 0,
        };

        assert_eq!(reporter(1).format_match(&event), "  0x0000001F  14ED 00 14ED 07");
        assert_eq!(reporter(1).format_header(&event), "rom.bin");
    }

    #[test]
    fn test_format_match_truncated_capture() {
        let event = MatchEvent {
            path: Path::new("rom.bin"),
            offset: 2,
            bytes: &[0x14, 0xED, 0x00, 0x00, 0x14, 0xED, 0x09],
            ordinal: 3,
        };
        assert_eq!(reporter(2).format_match(&event), "  0x00000002  14ED 0000 14ED 09");
    }

    #[test]
    fn test_format_summary() {
        let aggregate = RunAggregate::new();
        aggregate.add_bytes(2048);
        aggregate.add_match();
        aggregate.add_file_with_matches();
        aggregate.add_too_small();
        let summary = aggregate.finalize(3, 2, Duration::from_secs(1));

        let lines = reporter(0).format_summary(&summary);
        assert_eq!(lines[1], "Matches:  1 in 1 file");
        assert_eq!(lines[2], "Scanned:  2.00 KB");
        assert_eq!(lines.last().unwrap(), "Skipped:  1 too small, 0 unreadable");
    }
}
