//! AST definitions for the CDL format.
//!
//!     The tree is a closed set of node variants, each carrying the source
//!     span it covers. Nodes are immutable once produced: pipeline stages
//!     never patch a tree in place, they build a new one, which keeps the
//!     previous stage's result available for comparison and makes every
//!     stage trivially pure.
//!
//! Shape
//!
//!     A parsed source is a `Root` whose children are title directives,
//!     table aliases and entity blocks. Entities contain properties and
//!     nested entities; property values are expressions (literals, vpaths,
//!     references, function calls, binary operator chains). Malformed input
//!     appears as `Error` nodes covering the offending span, so the tree is
//!     always structurally complete over the whole input.

pub mod diagnostics;
pub mod node;

pub use diagnostics::{Diagnostic, Severity};
pub use node::{BinaryOp, Node};
