//! The CDL compiler core.
//!
//! Compilation flows strictly forward through the submodules:
//!
//! ```text
//! source text
//!     │  lexing      tokenize with logos, track positions, recover errors
//!     ▼
//! Vec<Token>
//!     │  parsing     recursive descent, error nodes + resynchronization
//!     ▼
//! Node (AST) + diagnostics
//!     │  pipeline    ordered named stages, each a pure Node -> Node function
//!     ▼
//! CompilationResult
//! ```
//!
//! Every intermediate value is created fresh inside one compile call and
//! dropped at its end; nothing is shared across calls, so concurrent
//! compiles need no synchronization.

pub mod ast;
pub mod compiler;
pub mod lexing;
pub mod parsing;
pub mod pipeline;
pub mod token;
