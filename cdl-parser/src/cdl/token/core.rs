//! Token and token kind definitions.

use crate::cdl::token::position::{Position, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a lexical unit.
///
/// The kinds are a closed set. `Whitespace` and `Comment` are trivia: they
/// are kept in the full token stream so that lexeme concatenation
/// reconstructs the source exactly, but dropped from the semantic stream the
/// parser consumes. `Error` covers source text no rule matched; the lexer
/// never aborts on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TokenKind {
    Identifier,
    Keyword,
    Reference,
    String,
    Number,
    Color,
    Hash,
    Colon,
    Comma,
    Dot,
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    MoreThan,
    MoreThanOrEqual,
    Percent,
    Plus,
    Minus,
    Star,
    Slash,
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Eol,
    Whitespace,
    Comment,
    Error,
}

impl TokenKind {
    /// True for kinds dropped from the semantic stream.
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Identifier => "identifier",
            TokenKind::Keyword => "keyword",
            TokenKind::Reference => "reference",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Color => "color",
            TokenKind::Hash => "#",
            TokenKind::Colon => ":",
            TokenKind::Comma => ",",
            TokenKind::Dot => ".",
            TokenKind::Equal => "=",
            TokenKind::NotEqual => "!=",
            TokenKind::LessThan => "<",
            TokenKind::LessThanOrEqual => "<=",
            TokenKind::MoreThan => ">",
            TokenKind::MoreThanOrEqual => ">=",
            TokenKind::Percent => "%",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::OpenBrace => "{",
            TokenKind::CloseBrace => "}",
            TokenKind::OpenParen => "(",
            TokenKind::CloseParen => ")",
            TokenKind::OpenBracket => "[",
            TokenKind::CloseBracket => "]",
            TokenKind::Eol => "end of line",
            TokenKind::Whitespace => "whitespace",
            TokenKind::Comment => "comment",
            TokenKind::Error => "error",
        };
        f.write_str(name)
    }
}

/// A classified lexical unit with its verbatim source text and position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, position: Position) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            position,
        }
    }

    /// The position just past this token's lexeme.
    pub fn end_position(&self) -> Position {
        self.position.advanced_over(&self.lexeme)
    }

    /// The source range this token covers.
    pub fn span(&self) -> Span {
        Span::new(self.position, self.end_position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_position_spans_lexeme() {
        let token = Token::new(TokenKind::Identifier, "hub", Position::new(2, 5, 12));
        assert_eq!(token.end_position(), Position::new(2, 8, 15));
    }

    #[test]
    fn trivia_classification() {
        assert!(TokenKind::Whitespace.is_trivia());
        assert!(TokenKind::Comment.is_trivia());
        assert!(!TokenKind::Eol.is_trivia());
        assert!(!TokenKind::Error.is_trivia());
    }

    #[test]
    fn kind_serializes_camel_case() {
        let json = serde_json::to_string(&TokenKind::OpenBrace).unwrap();
        assert_eq!(json, "\"openBrace\"");
    }
}
