//! Parser module for TestLang DSL

pub mod ast;
pub mod parser;

pub use ast::*;
pub use parser::*;
