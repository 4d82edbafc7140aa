//! Source text handling: the immutable file buffer and absolute ranges.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// An absolute `[start, end)` byte span in [`SourceBuffer`] coordinates.
///
/// Every range handed to a caller of the analysis core is in these
/// coordinates; pattern-internal offsets never escape the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: usize,
    pub end: usize,
}

impl SourceRange {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "inverted range {}..{}", start, end);
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Whether `other` lies entirely within this range.
    pub fn contains(&self, other: SourceRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

impl std::fmt::Display for SourceRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// The original file text plus a precomputed line-start-offset table.
///
/// Created once per analysis request and discarded with it. The buffer is
/// never mutated; all position queries are pure.
pub struct SourceBuffer {
    text: String,
    line_starts: Vec<usize>,
}

impl SourceBuffer {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![0];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { text, line_starts }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Text covered by `range`. The range must lie within the buffer.
    pub fn slice(&self, range: SourceRange) -> &str {
        &self.text[range.start..range.end]
    }

    /// Absolute offset of a 1-indexed line/column pair.
    ///
    /// Fails with `OutOfBounds` when the line does not exist or the column
    /// runs past the end of that line.
    pub fn offset_at(&self, line: usize, col: usize) -> Result<usize, AnalysisError> {
        if line == 0 || col == 0 {
            return Err(AnalysisError::OutOfBounds(format!(
                "line/column are 1-indexed, got {}:{}",
                line, col
            )));
        }
        let start = *self
            .line_starts
            .get(line - 1)
            .ok_or_else(|| AnalysisError::OutOfBounds(format!("line {} past end of file", line)))?;
        let line_end = self
            .line_starts
            .get(line)
            .map(|next| next - 1) // exclude the newline itself
            .unwrap_or(self.text.len());
        let offset = start + (col - 1);
        if offset > line_end {
            return Err(AnalysisError::OutOfBounds(format!(
                "column {} past end of line {}",
                col, line
            )));
        }
        Ok(offset)
    }

    /// 1-indexed line/column of an absolute offset (clamped to the buffer).
    pub fn position_at(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.text.len());
        // partition_point: number of line starts at or before `offset`
        let line = self.line_starts.partition_point(|&s| s <= offset);
        let start = self.line_starts[line - 1];
        (line, offset - start + 1)
    }

    /// Number of lines a range spans (1 for a single-line range).
    pub fn line_span(&self, range: SourceRange) -> usize {
        let (start_line, _) = self.position_at(range.start);
        let (end_line, _) = self.position_at(range.end.saturating_sub(1).max(range.start));
        end_line - start_line + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_table() {
        let buf = SourceBuffer::new("ab\ncd\n\nef");
        assert_eq!(buf.line_count(), 4);
        assert_eq!(buf.offset_at(1, 1).unwrap(), 0);
        assert_eq!(buf.offset_at(2, 2).unwrap(), 4);
        assert_eq!(buf.offset_at(4, 1).unwrap(), 7);
    }

    #[test]
    fn test_offset_at_column_past_line_end() {
        let buf = SourceBuffer::new("ab\ncd");
        // col 3 addresses the position just past 'b', col 4 is out of bounds
        assert_eq!(buf.offset_at(1, 3).unwrap(), 2);
        assert!(matches!(
            buf.offset_at(1, 4),
            Err(AnalysisError::OutOfBounds(_))
        ));
        assert!(matches!(
            buf.offset_at(9, 1),
            Err(AnalysisError::OutOfBounds(_))
        ));
    }

    #[test]
    fn test_position_roundtrip() {
        let buf = SourceBuffer::new("let x = 1;\nlet y = 2;\n");
        for offset in [0, 5, 10, 11, 15] {
            let (line, col) = buf.position_at(offset);
            assert_eq!(buf.offset_at(line, col).unwrap(), offset);
        }
    }

    #[test]
    fn test_range_containment() {
        let outer = SourceRange::new(2, 10);
        assert!(outer.contains(SourceRange::new(2, 10)));
        assert!(outer.contains(SourceRange::new(4, 6)));
        assert!(!outer.contains(SourceRange::new(1, 6)));
        assert!(!outer.contains(SourceRange::new(4, 11)));
    }
}
