// Tue Jan 13 2026 - Alex

use crate::pattern::template::PatternTemplate;

/// Tests byte windows against a compiled template.
///
/// A window at offset `i` is split into `pattern_length` groups of
/// `element_width` bytes, `stride` bytes apart. It matches when the groups can
/// be assigned to the template's symbols one-to-one: equal symbols see equal
/// bytes and distinct symbols see distinct bytes. Wildcard bytes between groups
/// are never read.
///
/// The matcher owns scratch buffers so that sliding it over a file does not
/// allocate per offset. Create one per worker.
pub struct WindowMatcher<'t> {
    template: &'t PatternTemplate,
    distinct: Vec<usize>,
    bindings: Vec<Option<usize>>,
}

impl<'t> WindowMatcher<'t> {
    pub fn new(template: &'t PatternTemplate) -> Self {
        Self {
            template,
            distinct: Vec::with_capacity(template.unique_symbol_count() + 1),
            bindings: vec![None; template.unique_symbol_count()],
        }
    }

    /// Whether the window starting at `offset` matches. Returns `false` when
    /// the window would run past the end of `data`.
    pub fn is_match(&mut self, data: &[u8], offset: usize) -> bool {
        let span = self.template.span();
        match offset.checked_add(span) {
            Some(end) if end <= data.len() => {}
            _ => return false,
        }

        let window = &data[offset..offset + span];
        self.has_expected_distinct_count(window) && self.symbols_consistent(window)
    }

    /// Fast reject: the number of distinct group values must equal the number
    /// of distinct symbols. Stops counting once the count is exceeded.
    fn has_expected_distinct_count(&mut self, window: &[u8]) -> bool {
        let width = self.template.element_width();
        let expected = self.template.unique_symbol_count();

        self.distinct.clear();
        for k in 0..self.template.pattern_length() {
            let start = self.template.group_offset(k);
            let group = &window[start..start + width];
            let seen = self
                .distinct
                .iter()
                .any(|&other| &window[other..other + width] == group);
            if !seen {
                self.distinct.push(start);
                if self.distinct.len() > expected {
                    return false;
                }
            }
        }

        self.distinct.len() == expected
    }

    fn symbols_consistent(&mut self, window: &[u8]) -> bool {
        let width = self.template.element_width();

        self.bindings.iter_mut().for_each(|b| *b = None);
        for (k, symbol) in self.template.symbols().iter().enumerate() {
            let start = self.template.group_offset(k);
            let slot = &mut self.bindings[symbol.index()];
            match *slot {
                None => *slot = Some(start),
                Some(bound) => {
                    if window[bound..bound + width] != window[start..start + width] {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Bytes shown for a match at `offset`: the span plus a trailing wildcard,
    /// cut short at the end of `data`.
    pub fn capture<'d>(&self, data: &'d [u8], offset: usize) -> &'d [u8] {
        capture_window(self.template, data, offset)
    }

    /// Slides over every offset where a full span fits, in ascending order,
    /// calling `on_match` for each match. Returns the number of matches.
    pub fn for_each_match<F>(&mut self, data: &[u8], mut on_match: F) -> usize
    where
        F: FnMut(usize, &[u8]),
    {
        let span = self.template.span();
        if data.len() < span {
            return 0;
        }

        let mut count = 0;
        for offset in 0..=(data.len() - span) {
            if self.is_match(data, offset) {
                count += 1;
                on_match(offset, self.capture(data, offset));
            }
        }
        count
    }
}

pub fn matches_window(template: &PatternTemplate, data: &[u8], offset: usize) -> bool {
    WindowMatcher::new(template).is_match(data, offset)
}

pub fn capture_window<'d>(template: &PatternTemplate, data: &'d [u8], offset: usize) -> &'d [u8] {
    let start = offset.min(data.len());
    let end = offset.saturating_add(template.display_span()).min(data.len());
    &data[start..end]
}
