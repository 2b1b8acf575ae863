//! # cdl-parser
//!
//! Compiler core for the CDL configuration description language.
//!
//! CDL sources describe form and survey configurations: nested entity blocks,
//! properties whose values are expressions over table fields, references and
//! formatter definitions. This crate turns such a source into tokens, an AST
//! and diagnostics, and runs an ordered pipeline of AST transformation stages
//! over the parse result.
//!
//! The crate is a pure synchronous library. It performs no I/O, keeps no
//! state between calls, and serializes every public result type with serde,
//! so the command-line tool and the compilation service can expose the exact
//! same shapes without reimplementing any compiler logic.
//!
//! The top-level entry points live in [`cdl::compiler`]:
//!
//! ```rust,ignore
//! use cdl_parser::cdl::compiler::{compile, lex, parse, CompileOptions};
//!
//! let tokens = lex("config hub");
//! let output = parse("config hub { hub: 432 }");
//! let result = compile(source, &CompileOptions::default());
//! ```

pub mod cdl;
