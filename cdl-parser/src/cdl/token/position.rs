//! Position and span tracking for source locations.
//!
//! Positions carry both the human-facing line:column pair and the byte
//! offset into the source. Line and column are 1-based; the byte offset is
//! 0-based. A CRLF pair counts as a single line terminator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A position in source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub byte_offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, byte_offset: usize) -> Self {
        Self {
            line,
            column,
            byte_offset,
        }
    }

    /// The position of the first byte of a source.
    pub fn origin() -> Self {
        Self::new(1, 1, 0)
    }

    /// Advance this position over `text`, treating `\r\n` as one terminator.
    pub fn advanced_over(mut self, text: &str) -> Self {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' if chars.peek() == Some(&'\n') => {
                    chars.next();
                    self.line += 1;
                    self.column = 1;
                    self.byte_offset += 2;
                }
                '\n' | '\r' => {
                    self.line += 1;
                    self.column = 1;
                    self.byte_offset += c.len_utf8();
                }
                _ => {
                    self.column += 1;
                    self.byte_offset += c.len_utf8();
                }
            }
        }
        self
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::origin()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source range from `start` (inclusive) to `end` (exclusive in bytes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// A zero-width span at the origin, used for empty inputs.
    pub fn empty() -> Self {
        Self::new(Position::origin(), Position::origin())
    }

    /// The smallest span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new(self.start, other.end)
    }
}

impl Default for Span {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_over_plain_text() {
        let pos = Position::origin().advanced_over("abc");
        assert_eq!(pos, Position::new(1, 4, 3));
    }

    #[test]
    fn advance_over_newline_resets_column() {
        let pos = Position::origin().advanced_over("ab\ncd");
        assert_eq!(pos, Position::new(2, 3, 5));
    }

    #[test]
    fn crlf_counts_as_one_terminator() {
        let pos = Position::origin().advanced_over("ab\r\ncd");
        assert_eq!(pos, Position::new(2, 3, 6));
    }

    #[test]
    fn advance_over_multibyte_counts_chars_for_columns() {
        let pos = Position::origin().advanced_over("aé");
        assert_eq!(pos.column, 3);
        assert_eq!(pos.byte_offset, 3);
    }

    #[test]
    fn span_join_covers_both() {
        let a = Span::new(Position::new(1, 1, 0), Position::new(1, 3, 2));
        let b = Span::new(Position::new(2, 1, 5), Position::new(2, 4, 8));
        assert_eq!(a.to(b), Span::new(a.start, b.end));
    }
}
