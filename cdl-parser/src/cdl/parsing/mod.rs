//! Parser
//!
//!     Recursive descent over the semantic token stream. Each nonterminal of
//!     the grammar has one parsing function; operator expressions go through
//!     a single binding-power table instead of per-level grammar functions.
//!
//! Grammar
//!
//!     script    := (title | alias | property | entity | EOL)* EOF
//!     title     := "title" STRING
//!     alias     := "table" IDENT "=" expr
//!     entity    := IDENT+ STRING? REF? ("#" IDENT)? ("{" script "}")?
//!     property  := IDENT ":" expr ("," expr)*
//!     expr      := binary operator expression over factors
//!     factor    := NUMBER | STRING | BOOLEAN | COLOR | REF | vpath
//!                | function | IDENT | "(" expr ")"
//!
//! Recovery
//!
//!     The parser never aborts. A token that cannot start or continue the
//!     current production produces one `SyntaxError` diagnostic and an
//!     `Error` node covering the offending tokens; scanning resynchronizes
//!     at the next line break, `{`, `}` or end of input and parsing resumes.
//!     `Error` tokens coming out of the lexer become `Error` nodes without a
//!     second diagnostic, so one malformed span is reported exactly once.
//!
//!     The returned tree is always structurally complete: the root covers
//!     the whole input and every malformed region is represented by a node.

pub mod expr;
pub mod parser;

use crate::cdl::ast::{Diagnostic, Node};
use crate::cdl::lexing;
use crate::cdl::token::Token;

/// Parse a semantic token stream into an AST and parse diagnostics.
pub fn parse_tokens(tokens: Vec<Token>) -> (Node, Vec<Diagnostic>) {
    let mut parser = parser::Parser::new(tokens);
    let root = parser.parse_script();
    (root, parser.into_diagnostics())
}

/// Lex and parse source text. Diagnostics cover both phases, lex first.
pub fn parse_source(source: &str) -> (Node, Vec<Diagnostic>) {
    let tokens = lexing::lex(source);
    let mut diagnostics = lexing::collect_lex_diagnostics(&tokens);
    let (root, parse_diagnostics) = parse_tokens(tokens);
    diagnostics.extend(parse_diagnostics);
    (root, diagnostics)
}

/// Strip the surrounding quotes from a string lexeme and unescape it.
pub(crate) fn unquote(lexeme: &str) -> String {
    let inner = if lexeme.len() >= 2 {
        &lexeme[1..lexeme.len() - 1]
    } else {
        lexeme
    };
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unquote_strips_and_unescapes() {
        assert_eq!(unquote("\"hello\""), "hello");
        assert_eq!(unquote("'1234'"), "1234");
        assert_eq!(unquote("\"a \\\"b\\\"\""), "a \"b\"");
    }
}
