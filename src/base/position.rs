/// Line/column tracking for diagnostics
///
/// Tokens carry byte ranges; error messages want 1-based line and column
/// numbers plus the offending source line.
use text_size::TextSize;

/// A 1-based line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

impl LineCol {
    pub fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }
}

/// Precomputed line starts of a source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(TextSize::new(i as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::new(text.len() as u32),
        }
    }

    /// Convert a byte offset to a 1-based line/column. Offsets past the end
    /// clamp to the end of the text.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let col = offset - self.line_starts[line];
        LineCol::new(line as u32 + 1, u32::from(col) + 1)
    }

    /// The text of a 1-based line, without its terminator.
    pub fn line_text<'a>(&self, text: &'a str, line: u32) -> &'a str {
        let idx = (line as usize).saturating_sub(1);
        let Some(start) = self.line_starts.get(idx) else {
            return "";
        };
        let end = self
            .line_starts
            .get(idx + 1)
            .copied()
            .unwrap_or(self.len);
        text.get(usize::from(*start)..usize::from(end))
            .unwrap_or("")
            .trim_end_matches(['\n', '\r'])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_basic() {
        let text = "namespace a\nstructure B {}\n";
        let index = LineIndex::new(text);
        assert_eq!(index.line_col(TextSize::new(0)), LineCol::new(1, 1));
        assert_eq!(index.line_col(TextSize::new(12)), LineCol::new(2, 1));
        assert_eq!(index.line_col(TextSize::new(22)), LineCol::new(2, 11));
        assert_eq!(index.line_count(), 3);
    }

    #[test]
    fn test_line_text() {
        let text = "one\r\ntwo\nthree";
        let index = LineIndex::new(text);
        assert_eq!(index.line_text(text, 1), "one");
        assert_eq!(index.line_text(text, 2), "two");
        assert_eq!(index.line_text(text, 3), "three");
        assert_eq!(index.line_text(text, 9), "");
    }

    #[test]
    fn test_offset_past_end_clamps() {
        let index = LineIndex::new("ab");
        assert_eq!(index.line_col(TextSize::new(40)), LineCol::new(1, 3));
    }
}
