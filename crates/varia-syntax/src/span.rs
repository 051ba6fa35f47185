//! Source positions and spans.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

/// A single point in the source text.
///
/// `line` and `column` are 1-based; `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Byte offset from the start of the source.
    pub offset: usize,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column, in characters.
    pub column: usize,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A start/end range in the source text, with line and column information.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceSpan {
    /// First position covered by the span.
    pub start: Position,
    /// Position just past the end of the span.
    pub end: Position,
}

impl SourceSpan {
    /// A span with byte offsets only; lines and columns are filled in by
    /// [`LineIndex::locate`].
    pub fn from_offsets(range: Range<usize>) -> Self {
        Self {
            start: Position {
                offset: range.start,
                ..Position::default()
            },
            end: Position {
                offset: range.end,
                ..Position::default()
            },
        }
    }

    /// The byte range covered by this span.
    pub fn range(&self) -> Range<usize> {
        self.start.offset..self.end.offset
    }

    /// Whether `other` lies entirely inside this span.
    pub fn contains(&self, other: &SourceSpan) -> bool {
        self.start.offset <= other.start.offset && other.end.offset <= self.end.offset
    }
}

impl fmt::Display for SourceSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// Byte offsets of every line start, for offset to line/column conversion.
#[derive(Debug, Clone)]
pub struct LineIndex<'s> {
    source: &'s str,
    line_starts: Vec<usize>,
}

impl<'s> LineIndex<'s> {
    /// Index the line starts of `source`.
    pub fn new(source: &'s str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            source
                .char_indices()
                .filter(|&(_, c)| c == '\n')
                .map(|(i, _)| i + 1),
        );
        Self {
            source,
            line_starts,
        }
    }

    /// Convert a byte offset into a full position. Offsets past the end clamp to
    /// the end of the source.
    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(exact) => exact,
            Err(next) => next - 1,
        };
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(0, |prefix| prefix.chars().count());
        Position {
            offset,
            line: line + 1,
            column: column + 1,
        }
    }

    /// Fill in the line and column fields of a span built from offsets.
    pub fn locate(&self, span: SourceSpan) -> SourceSpan {
        SourceSpan {
            start: self.position(span.start.offset),
            end: self.position(span.end.offset),
        }
    }
}
