//! Compiler façade.
//!
//! Orchestrates lexing, parsing and the transformation pipeline behind one
//! entry point, recording per-phase wall-clock timings. Every caller goes
//! through the functions here and serializes the same result types, which
//! is what keeps the in-process and over-the-wire behavior identical.

use crate::cdl::ast::{Diagnostic, Node};
use crate::cdl::lexing;
use crate::cdl::parsing;
use crate::cdl::pipeline::{self, StageList, StageTiming};
use crate::cdl::token::Token;
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// How deep the compile runs: tokens only, or the full
/// lex → parse → pipeline flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CompileMode {
    Tokens,
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompileOptions {
    pub pipeline: StageList,
    pub mode: CompileMode,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            pipeline: StageList::full(),
            mode: CompileMode::Full,
        }
    }
}

/// The unit returned to any caller, identical in shape regardless of how the
/// compiler was invoked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompilationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Vec<Token>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ast: Option<Node>,
    pub diagnostics: Vec<Diagnostic>,
    pub timings: Vec<StageTiming>,
}

impl CompilationResult {
    /// The result with timings cleared, for canonical comparison: timings
    /// are wall-clock and informational, everything else is deterministic.
    pub fn without_timings(mut self) -> Self {
        self.timings.clear();
        self
    }
}

/// Parse result for the embeddable API and the `/parse` endpoint:
/// a best-effort AST with the diagnostics embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutput {
    pub ast: Node,
    pub diagnostics: Vec<Diagnostic>,
}

/// Tokenize source text into the semantic token stream.
pub fn lex(source: &str) -> Vec<Token> {
    lexing::lex(source)
}

/// Lex and parse source text. Never fails: malformed input turns into error
/// nodes and diagnostics.
pub fn parse(source: &str) -> ParseOutput {
    let (ast, diagnostics) = parsing::parse_source(source);
    ParseOutput { ast, diagnostics }
}

/// Compile source text per `options`.
pub fn compile(source: &str, options: &CompileOptions) -> CompilationResult {
    let lex_start = Instant::now();
    let tokens = lexing::lex(source);
    let mut timings = vec![StageTiming::new("lex", lex_start.elapsed())];
    let mut diagnostics = lexing::collect_lex_diagnostics(&tokens);

    if options.mode == CompileMode::Tokens {
        return CompilationResult {
            tokens: Some(tokens),
            ast: None,
            diagnostics,
            timings,
        };
    }

    let parse_start = Instant::now();
    let (ast, parse_diagnostics) = parsing::parse_tokens(tokens);
    timings.push(StageTiming::new("parse", parse_start.elapsed()));
    diagnostics.extend(parse_diagnostics);

    let outcome = pipeline::run(&ast, &options.pipeline);
    diagnostics.extend(outcome.diagnostics);
    timings.extend(outcome.timings);

    CompilationResult {
        tokens: None,
        ast: Some(outcome.ast),
        diagnostics,
        timings,
    }
}
