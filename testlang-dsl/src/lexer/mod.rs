//! Lexer module for TestLang DSL

pub mod token;
pub mod scanner;

pub use token::*;
pub use scanner::*;
