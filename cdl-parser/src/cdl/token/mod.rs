//! Core token types shared across the lexer, parser, and tooling.

pub mod core;
pub mod formatting;
pub mod position;

pub use self::core::{Token, TokenKind};
pub use formatting::detokenize;
pub use position::{Position, Span};
