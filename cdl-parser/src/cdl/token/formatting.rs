//! Token stream to source reconstruction.
//!
//! The detokenizer works at the token level, turning a full token stream
//! (trivia included) back into source text. Because every token carries its
//! verbatim lexeme this is plain concatenation, and it is the basis of the
//! round-trip guarantee: `detokenize(lex_full(source)) == source`.

use crate::cdl::token::core::Token;

/// Reassemble source text from a full token stream.
pub fn detokenize(tokens: &[Token]) -> String {
    let mut result = String::new();
    for token in tokens {
        result.push_str(&token.lexeme);
    }
    result
}
