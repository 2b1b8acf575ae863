//! Lexer
//!
//!     Turns CDL source text into a stream of [`Token`] values. Tokenization
//!     never aborts: input no rule matches becomes `Error` tokens and
//!     scanning continues just past them, so downstream consumers always get
//!     a stream covering the entire source.
//!
//! Two stream shapes
//!
//!     [`lex_full`] returns every token including trivia (whitespace and
//!     comments). Concatenating the lexemes of the full stream reproduces
//!     the source byte for byte; this is the round-trip contract the
//!     detokenizer and tooling rely on.
//!
//!     [`lex`] returns the semantic stream the parser consumes: trivia is
//!     dropped, end-of-line tokens are kept because the grammar is
//!     line-sensitive.
//!
//! Error recovery
//!
//!     Adjacent unrecognized characters merge into a single `Error` token so
//!     one malformed run yields one diagnostic span. A string literal whose
//!     closing quote never appears becomes one `Error` token spanning to end
//!     of input.
//!
//! Keywords
//!
//!     Identifiers are matched generically first, then checked against the
//!     keyword table. Only `true`, `false`, `and`, `or` are keywords (the
//!     operators case-insensitively, as the source corpus writes `AND`).
//!     Structural words like `config` or `widget` are ordinary identifiers.

pub mod base_tokenization;

use crate::cdl::ast::{Diagnostic, Severity};
use crate::cdl::token::{Position, Token, TokenKind};
use base_tokenization::RawToken;
use logos::Logos;

/// Keyword table, checked after generic identifier matching.
const KEYWORDS: [&str; 2] = ["true", "false"];
const OPERATOR_KEYWORDS: [&str; 2] = ["and", "or"];

fn classify_ident(lexeme: &str) -> TokenKind {
    if KEYWORDS.contains(&lexeme) {
        return TokenKind::Keyword;
    }
    let lowered = lexeme.to_ascii_lowercase();
    if OPERATOR_KEYWORDS.contains(&lowered.as_str()) {
        return TokenKind::Keyword;
    }
    TokenKind::Identifier
}

fn classify(raw: RawToken, lexeme: &str) -> TokenKind {
    match raw {
        RawToken::Eol => TokenKind::Eol,
        RawToken::Whitespace => TokenKind::Whitespace,
        RawToken::LineComment | RawToken::BlockComment => TokenKind::Comment,
        RawToken::Str => TokenKind::String,
        RawToken::Number => TokenKind::Number,
        RawToken::Color => TokenKind::Color,
        RawToken::Hash => TokenKind::Hash,
        RawToken::Ident => classify_ident(lexeme),
        RawToken::Reference => TokenKind::Reference,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Equal => TokenKind::Equal,
        RawToken::NotEqual => TokenKind::NotEqual,
        RawToken::LessThan => TokenKind::LessThan,
        RawToken::LessThanOrEqual => TokenKind::LessThanOrEqual,
        RawToken::MoreThan => TokenKind::MoreThan,
        RawToken::MoreThanOrEqual => TokenKind::MoreThanOrEqual,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::OpenBrace => TokenKind::OpenBrace,
        RawToken::CloseBrace => TokenKind::CloseBrace,
        RawToken::OpenParen => TokenKind::OpenParen,
        RawToken::CloseParen => TokenKind::CloseParen,
        RawToken::OpenBracket => TokenKind::OpenBracket,
        RawToken::CloseBracket => TokenKind::CloseBracket,
    }
}

/// Tokenize source text into the full stream, trivia included.
pub fn lex_full(source: &str) -> Vec<Token> {
    let mut lexer = RawToken::lexer(source);
    let mut tokens: Vec<Token> = Vec::new();
    let mut position = Position::origin();

    while let Some(result) = lexer.next() {
        let slice = lexer.slice();
        match result {
            Ok(raw) => {
                let kind = classify(raw, slice);
                tokens.push(Token::new(kind, slice, position));
                position = position.advanced_over(slice);
            }
            Err(()) => {
                if slice.starts_with('"') || slice.starts_with('\'') {
                    // Unterminated string literal: the rest of the input is
                    // one error token, per the recovery contract.
                    let rest = &source[lexer.span().start..];
                    tokens.push(Token::new(TokenKind::Error, rest, position));
                    break;
                }
                match tokens.last_mut() {
                    Some(last)
                        if last.kind == TokenKind::Error
                            && last.position.byte_offset + last.lexeme.len()
                                == lexer.span().start =>
                    {
                        last.lexeme.push_str(slice);
                    }
                    _ => tokens.push(Token::new(TokenKind::Error, slice, position)),
                }
                position = position.advanced_over(slice);
            }
        }
    }
    tokens
}

/// Tokenize source text into the semantic stream the parser consumes.
pub fn lex(source: &str) -> Vec<Token> {
    lex_full(source)
        .into_iter()
        .filter(|token| !token.kind.is_trivia())
        .collect()
}

/// One diagnostic per `Error` token in the stream.
pub fn collect_lex_diagnostics(tokens: &[Token]) -> Vec<Diagnostic> {
    tokens
        .iter()
        .filter(|token| token.kind == TokenKind::Error)
        .map(|token| {
            let message = if token.lexeme.starts_with('"') || token.lexeme.starts_with('\'') {
                "unterminated string literal".to_string()
            } else {
                format!("unrecognized input `{}`", token.lexeme)
            };
            Diagnostic::new(Severity::Error, message, token.span(), "lex")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(tokens: &[Token]) -> Vec<TokenKind> {
        tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn lexes_two_identifiers() {
        let tokens = lex("config hub");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Identifier, "config", Position::new(1, 1, 0)),
                Token::new(TokenKind::Identifier, "hub", Position::new(1, 8, 7)),
            ]
        );
    }

    #[test]
    fn empty_source_lexes_to_empty_stream() {
        assert_eq!(lex(""), vec![]);
        assert_eq!(lex_full(""), vec![]);
    }

    #[test]
    fn whitespace_only_is_trivia() {
        assert_eq!(lex("   \t  "), vec![]);
        assert_eq!(lex_full("   \t  ").len(), 1);
    }

    #[test]
    fn positions_track_lines_and_columns() {
        let tokens = lex("hub: 432\nlogo: \"x\"");
        assert_eq!(tokens[0].position, Position::new(1, 1, 0));
        assert_eq!(tokens[3].kind, TokenKind::Eol);
        assert_eq!(tokens[4].position, Position::new(2, 1, 9));
        assert_eq!(tokens[4].lexeme, "logo");
    }

    #[test]
    fn crlf_is_one_eol_token() {
        let tokens = lex("a\r\nb");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Eol, TokenKind::Identifier]
        );
        assert_eq!(tokens[1].lexeme, "\r\n");
        assert_eq!(tokens[2].position, Position::new(2, 1, 3));
    }

    #[test]
    fn keywords_resolve_after_identifier_match() {
        let tokens = lex("true falsey AND android or");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Keyword,
                TokenKind::Identifier,
                TokenKind::Keyword,
            ]
        );
    }

    #[test]
    fn property_line_tokenizes() {
        let tokens = lex("value: average(score(survey:Q1))");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::OpenParen,
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Identifier,
                TokenKind::CloseParen,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn reference_and_color_and_threshold_line() {
        let tokens = lex("thresholds: #82D854 >= 100%, @cr.palette");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Colon,
                TokenKind::Color,
                TokenKind::MoreThanOrEqual,
                TokenKind::Number,
                TokenKind::Percent,
                TokenKind::Comma,
                TokenKind::Reference,
            ]
        );
        assert_eq!(tokens[7].lexeme, "@cr.palette");
    }

    #[test]
    fn unknown_characters_merge_into_one_error_token() {
        let tokens = lex("hello §§ hello");
        assert_eq!(
            kinds(&tokens),
            vec![TokenKind::Identifier, TokenKind::Error, TokenKind::Identifier]
        );
        assert_eq!(tokens[1].lexeme, "§§");
        let diagnostics = collect_lex_diagnostics(&tokens);
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn separated_unknown_characters_stay_separate() {
        let tokens = lex("a ! b ! c");
        let errors: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Error)
            .collect();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn unterminated_string_spans_to_end_of_input() {
        let tokens = lex("label: \"unclosed and then more");
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::Error);
        assert_eq!(last.lexeme, "\"unclosed and then more");
        let diagnostics = collect_lex_diagnostics(&tokens);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].message, "unterminated string literal");
    }

    #[test]
    fn entity_header_with_id_and_reference() {
        let tokens = lex("widget kpi @default #foo {");
        assert_eq!(
            kinds(&tokens),
            vec![
                TokenKind::Identifier,
                TokenKind::Identifier,
                TokenKind::Reference,
                TokenKind::Hash,
                TokenKind::Identifier,
                TokenKind::OpenBrace,
            ]
        );
    }

    #[test]
    fn comments_are_trivia_but_preserved_in_full_stream() {
        let source = "hub: 1 // trailing\n/* block\ncomment */ two: 2";
        let semantic = lex(source);
        assert!(semantic.iter().all(|t| t.kind != TokenKind::Comment));
        let full = lex_full(source);
        assert_eq!(
            full.iter().filter(|t| t.kind == TokenKind::Comment).count(),
            2
        );
    }

    #[test]
    fn positions_are_non_decreasing() {
        let source = "config hub {\n    hub: 432 // x\n}\n";
        let full = lex_full(source);
        for pair in full.windows(2) {
            assert!(pair[0].position <= pair[1].position);
        }
    }

    #[test]
    fn numbers_longest_match() {
        let tokens = lex("1 1.5 2e10 1.5e-3");
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Number));
        assert_eq!(tokens[3].lexeme, "1.5e-3");
    }
}
