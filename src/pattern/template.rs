// Tue Jan 13 2026 - Alex

use crate::pattern::error::PatternError;
use crate::pattern::symbol::{SymbolId, SymbolTable};
use std::fmt;

/// Compiles a whitespace-separated transcription such as `A B C A` into a
/// [`PatternTemplate`] for a fixed element and wildcard width.
pub struct TemplateCompiler {
    element_width: usize,
    wildcard_width: usize,
}

impl TemplateCompiler {
    pub fn new(element_width: usize) -> Self {
        Self {
            element_width,
            wildcard_width: 0,
        }
    }

    pub fn with_wildcard_width(mut self, width: usize) -> Self {
        self.wildcard_width = width;
        self
    }

    pub fn compile(&self, source: &str) -> Result<PatternTemplate, PatternError> {
        if self.element_width == 0 {
            return Err(PatternError::InvalidElementWidth);
        }

        let mut table = SymbolTable::new();
        let symbols = source
            .split_whitespace()
            .map(|token| table.intern(token))
            .collect::<Result<Vec<SymbolId>, _>>()?;

        if symbols.is_empty() {
            return Err(PatternError::InvalidTemplate("template has no tokens".to_string()));
        }

        let stride = self
            .element_width
            .checked_add(self.wildcard_width)
            .ok_or(PatternError::SpanOverflow {
                length: symbols.len(),
                stride: usize::MAX,
            })?;

        let span = (symbols.len() - 1)
            .checked_mul(stride)
            .and_then(|gaps| gaps.checked_add(self.element_width))
            .ok_or(PatternError::SpanOverflow {
                length: symbols.len(),
                stride,
            })?;

        log::debug!(
            "Compiled template: {} elements, {} unique, stride {}, span {}",
            symbols.len(),
            table.len(),
            stride,
            span
        );

        Ok(PatternTemplate {
            symbols,
            table,
            element_width: self.element_width,
            wildcard_width: self.wildcard_width,
            stride,
            span,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PatternTemplate {
    symbols: Vec<SymbolId>,
    table: SymbolTable,
    element_width: usize,
    wildcard_width: usize,
    stride: usize,
    span: usize,
}

impl PatternTemplate {
    pub fn symbols(&self) -> &[SymbolId] {
        &self.symbols
    }

    pub fn pattern_length(&self) -> usize {
        self.symbols.len()
    }

    pub fn unique_symbol_count(&self) -> usize {
        self.table.len()
    }

    pub fn element_width(&self) -> usize {
        self.element_width
    }

    pub fn wildcard_width(&self) -> usize {
        self.wildcard_width
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes covered by a full match, not counting a trailing wildcard.
    pub fn span(&self) -> usize {
        self.span
    }

    /// Span plus the trailing wildcard, used when displaying a match.
    pub fn display_span(&self) -> usize {
        self.span.saturating_add(self.wildcard_width)
    }

    /// The distinct tokens of the source text, in order of first appearance.
    pub fn tokens(&self) -> Vec<&str> {
        self.table.tokens().collect()
    }

    /// The template rewritten with one letter per distinct token, e.g. `A B A`.
    pub fn letters(&self) -> String {
        self.symbols
            .iter()
            .map(|id| id.letter())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Start of the `index`th element group relative to the window start.
    pub fn group_offset(&self, index: usize) -> usize {
        index * self.stride
    }
}

impl fmt::Display for PatternTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (width {}, wildcard {}, span {})",
            self.letters(),
            self.element_width,
            self.wildcard_width,
            self.span
        )
    }
}

pub fn compile_template(
    source: &str,
    element_width: usize,
    wildcard_width: usize,
) -> Result<PatternTemplate, PatternError> {
    TemplateCompiler::new(element_width)
        .with_wildcard_width(wildcard_width)
        .compile(source)
}
