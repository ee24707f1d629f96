//! TestLang DSL - HTTP API test scenarios compiled to runnable test suites
//!
//! A `.test` file declares a base URL, default headers, variables and test
//! blocks made of requests and assertions. This crate turns it into test
//! source for a host framework (JUnit 5 by default, Rust as an alternative).
//!
//! Architecture:
//! ```text
//! TestLang Source (.test files)
//!     ↓
//! Lexer (chars → tokens)
//!     ↓
//! Parser (tokens → AST)
//!     ↓
//! Validator (structural rules + lints)
//!     ↓
//! Code Generator (AST → JUnit / Rust source)
//!     ↓
//! Pretty Printer (for round-trip testing)
//! ```
//!
//! Compilation is single-threaded and synchronous; the first error stops the
//! pipeline and no partial output is produced.

pub mod codegen;
pub mod compiler;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod pretty_printer;
pub mod validator;

// Re-export key types for convenience
pub use codegen::{escape_string, CodeGenerator, Substitutions, Target, TargetWriter};
pub use compiler::*;
pub use error::*;
pub use lexer::{HttpMethod, Lexer, Span, Token, TokenKind};
pub use parser::*;
pub use pretty_printer::{pretty_print, round_trip};
pub use validator::{lint_unused_variables, validate, Diagnostic, LintSeverity};
