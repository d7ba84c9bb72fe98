// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Source location tracking.

/// A byte range in the source code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Line-start offsets for byte offset → line:col lookups.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// line_starts[0] is always 0.
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|&(_, b)| b == b'\n')
                    .map(|(i, _)| (i + 1) as u32),
            )
            .collect();
        LineMap { line_starts }
    }

    /// Both 1-based.
    pub fn offset_to_line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset as u32;
        let idx = self.line_index(offset);
        (idx as u32 + 1, offset - self.line_starts[idx] + 1)
    }

    /// 1-based line containing `offset`.
    pub fn line_of(&self, offset: usize) -> u32 {
        self.line_index(offset as u32) as u32 + 1
    }

    fn line_index(&self, offset: u32) -> usize {
        match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        }
    }

    /// Text of a 1-based line, without its newline.
    pub fn line_text<'a>(&self, source: &'a str, line: u32) -> Option<&'a str> {
        let idx = (line as usize).checked_sub(1)?;
        let start = *self.line_starts.get(idx)? as usize;
        let end = match self.line_starts.get(idx + 1) {
            Some(&next) => (next as usize).saturating_sub(1),
            None => source.len(),
        };
        source.get(start..end).map(|s| s.strip_suffix('\r').unwrap_or(s))
    }

    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_source_has_one_line() {
        let lm = LineMap::new("");
        assert_eq!(lm.offset_to_line_col(0), (1, 1));
        assert_eq!(lm.line_count(), 1);
    }

    #[test]
    fn lines_and_columns() {
        let src = "var a;\n{\n  print a;\n}";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_count(), 4);
        assert_eq!(lm.offset_to_line_col(4), (1, 5));
        assert_eq!(lm.offset_to_line_col(7), (2, 1));
        assert_eq!(lm.line_of(src.find("print").unwrap()), 3);
        assert_eq!(lm.line_text(src, 3), Some("  print a;"));
        assert_eq!(lm.line_text(src, 5), None);
    }

    #[test]
    fn newline_belongs_to_its_line() {
        let src = "ab\ncd\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.offset_to_line_col(2), (1, 3));
        assert_eq!(lm.offset_to_line_col(3), (2, 1));
        assert_eq!(lm.line_text(src, 3), Some(""));
    }

    #[test]
    fn crlf_is_trimmed_from_line_text() {
        let src = "var x;\r\nprint x;\r\n";
        let lm = LineMap::new(src);
        assert_eq!(lm.line_text(src, 1), Some("var x;"));
        assert_eq!(lm.line_text(src, 2), Some("print x;"));
    }

    #[test]
    fn span_join() {
        let a = Span::new(4, 6);
        let b = Span::new(10, 12);
        assert_eq!(a.to(b), Span::new(4, 12));
        assert_eq!(b.to(a), Span::new(4, 12));
        assert_eq!(a.len(), 2);
        assert!(Span::new(3, 3).is_empty());
    }
}
