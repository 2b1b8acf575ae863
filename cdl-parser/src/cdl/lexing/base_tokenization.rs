//! Base tokenization for CDL source text.
//!
//! This module defines the raw logos lexer. It is the entry point where
//! source strings become token streams; the driver in [`super`] layers
//! position tracking, keyword classification, and error recovery on top.
//!
//! Block comments nest: `/* outer /* inner */ still comment */`. The nesting
//! cannot be expressed as a regular pattern, so the `/*` rule hands off to a
//! callback that scans for the balancing terminator. An unterminated block
//! comment runs to end of input and is still a comment token.

use logos::{Lexer, Logos};

fn lex_block_comment(lex: &mut Lexer<RawToken>) {
    let bytes = lex.remainder().as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'/' && bytes.get(i + 1) == Some(&b'*') {
            depth += 1;
            i += 2;
        } else if bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/') {
            depth -= 1;
            i += 2;
            if depth == 0 {
                lex.bump(i);
                return;
            }
        } else {
            i += 1;
        }
    }
    lex.bump(bytes.len());
}

/// Raw lexical classes recognized by logos.
///
/// The raw tokens carry no text; the driver reads the matched slice from the
/// lexer. Identifier/keyword disambiguation happens in the driver, after
/// generic identifier matching, against the keyword table.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawToken {
    #[token("\r\n")]
    #[token("\n")]
    Eol,

    #[regex(r"[ \t\f]+")]
    Whitespace,

    #[regex(r"//[^\n\r]*")]
    LineComment,

    #[token("/*", lex_block_comment)]
    BlockComment,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r#"'(?:[^'\\]|\\.)*'"#)]
    Str,

    #[regex(r"[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r"#(?:[0-9a-fA-F]{8}|[0-9a-fA-F]{6}|[0-9a-fA-F]{3})")]
    Color,

    #[token("#")]
    Hash,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z0-9_$]+)*")]
    Ident,

    #[regex(r"@[A-Za-z0-9_.\-]*")]
    Reference,

    #[token(":")]
    Colon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("=")]
    Equal,
    #[token("!=")]
    NotEqual,
    #[token("<")]
    LessThan,
    #[token("<=")]
    LessThanOrEqual,
    #[token(">")]
    MoreThan,
    #[token(">=")]
    MoreThanOrEqual,
    #[token("%")]
    Percent,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
}
