//! Diagnostic records collected across a compile.
//!
//! Diagnostics are the non-fatal error channel: lexing and parsing record
//! what they recovered from, pipeline stages attach warnings or report
//! faults. They are accumulated across the whole compile and never dropped.

use crate::cdl::token::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// A recorded compilation problem with its source location and origin.
///
/// `stage` is `"lex"`, `"parse"`, `"pipeline"`, or the name of the pipeline
/// stage that emitted it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub span: Span,
    pub stage: String,
}

impl Diagnostic {
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        span: Span,
        stage: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            message: message.into(),
            span,
            stage: stage.into(),
        }
    }

    pub fn error(message: impl Into<String>, span: Span, stage: impl Into<String>) -> Self {
        Self::new(Severity::Error, message, span, stage)
    }

    pub fn warning(message: impl Into<String>, span: Span, stage: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message, span, stage)
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}]: {} at {}",
            self.severity, self.stage, self.message, self.span.start
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cdl::token::Position;

    #[test]
    fn display_includes_stage_and_position() {
        let span = Span::new(Position::new(3, 5, 20), Position::new(3, 9, 24));
        let diagnostic = Diagnostic::error("unexpected token", span, "parse");
        assert_eq!(
            diagnostic.to_string(),
            "error [parse]: unexpected token at 3:5"
        );
    }
}
