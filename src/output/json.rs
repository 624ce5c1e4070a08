// Tue Jan 13 2026 - Alex

use crate::orchestration::RunSummary;
use crate::output::collector::MatchRecord;
use crate::output::error::ReportError;
use crate::pattern::PatternTemplate;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct TemplateInfo {
    pub letters: String,
    pub tokens: Vec<String>,
    pub pattern_length: usize,
    pub unique_symbol_count: usize,
    pub element_width: usize,
    pub wildcard_width: usize,
    pub stride: usize,
    pub span: usize,
}

impl From<&PatternTemplate> for TemplateInfo {
    fn from(template: &PatternTemplate) -> Self {
        Self {
            letters: template.letters(),
            tokens: template.tokens().into_iter().map(str::to_string).collect(),
            pattern_length: template.pattern_length(),
            unique_symbol_count: template.unique_symbol_count(),
            element_width: template.element_width(),
            wildcard_width: template.wildcard_width(),
            stride: template.stride(),
            span: template.span(),
        }
    }
}

/// Machine-readable record of one run.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub template: TemplateInfo,
    pub summary: RunSummary,
    pub matches: Vec<MatchRecord>,
}

impl JsonReport {
    pub fn new(template: &PatternTemplate, summary: RunSummary, matches: Vec<MatchRecord>) -> Self {
        Self {
            template: TemplateInfo::from(template),
            summary,
            matches,
        }
    }

    pub fn to_string_pretty(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to<W: Write>(&self, writer: W) -> Result<(), ReportError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ReportError> {
        let path = path.as_ref();
        let io_err = |source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)?;
        writer.flush().map_err(io_err)?;
        log::info!("Wrote {} matches to {}", self.matches.len(), path.display());
        Ok(())
    }
}
