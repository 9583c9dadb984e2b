//! Source positions.

use serde::{Deserialize, Serialize};

/// A single place in a source document.
///
/// `line` and `column` are 1-based; `offset` is a 0-based character index
/// into the line-ending-normalized source. Nodes produced by a nested parse
/// with a line/column offset applied carry no `offset`, since a character
/// index into the outer document cannot be reconstructed from one into the
/// embedded text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
}

impl Point {
    /// Create a point with a known character offset.
    #[must_use]
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset: Some(offset),
        }
    }
}

/// The source span of a node: start inclusive, end exclusive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl Position {
    #[must_use]
    pub fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// Shift the span by whole lines and columns, dropping character offsets.
    pub(crate) fn shift(&mut self, lines: usize, columns: usize) {
        self.start.line += lines;
        self.start.column += columns;
        self.start.offset = None;
        self.end.line += lines;
        self.end.column += columns;
        self.end.offset = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shift_drops_offsets() {
        let mut position = Position::new(Point::new(1, 1, 0), Point::new(2, 4, 10));
        position.shift(3, 0);
        assert_eq!(position.start.line, 4);
        assert_eq!(position.end.line, 5);
        assert_eq!(position.start.offset, None);
        assert_eq!(position.end.offset, None);
    }
}
