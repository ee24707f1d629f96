//! Lexer token types

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// LEXER TYPES
// ============================================================================

/// Token kinds for the TestLang DSL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    // Keywords
    Config,
    BaseUrl,
    Header,
    Let,
    Test,
    Get,
    Post,
    Put,
    Delete,
    Expect,
    Status,
    Body,
    Contains,

    // Delimiters
    LBrace,
    RBrace,
    Semicolon,
    Equals,

    // Literals
    Identifier(String),
    /// String literal, already unescaped.
    String(String),
    Number(i64),

    // Special
    Eof,
}

impl TokenKind {
    /// Look up a reserved word. Keywords are case-sensitive.
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        let kind = match ident {
            "config" => TokenKind::Config,
            "base_url" => TokenKind::BaseUrl,
            "header" => TokenKind::Header,
            "let" => TokenKind::Let,
            "test" => TokenKind::Test,
            "GET" => TokenKind::Get,
            "POST" => TokenKind::Post,
            "PUT" => TokenKind::Put,
            "DELETE" => TokenKind::Delete,
            "expect" => TokenKind::Expect,
            "status" => TokenKind::Status,
            "body" => TokenKind::Body,
            "contains" => TokenKind::Contains,
            _ => return None,
        };
        Some(kind)
    }

    /// The HTTP method this token names, if any.
    pub fn as_method(&self) -> Option<HttpMethod> {
        match self {
            TokenKind::Get => Some(HttpMethod::Get),
            TokenKind::Post => Some(HttpMethod::Post),
            TokenKind::Put => Some(HttpMethod::Put),
            TokenKind::Delete => Some(HttpMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Config => write!(f, "'config'"),
            TokenKind::BaseUrl => write!(f, "'base_url'"),
            TokenKind::Header => write!(f, "'header'"),
            TokenKind::Let => write!(f, "'let'"),
            TokenKind::Test => write!(f, "'test'"),
            TokenKind::Get => write!(f, "'GET'"),
            TokenKind::Post => write!(f, "'POST'"),
            TokenKind::Put => write!(f, "'PUT'"),
            TokenKind::Delete => write!(f, "'DELETE'"),
            TokenKind::Expect => write!(f, "'expect'"),
            TokenKind::Status => write!(f, "'status'"),
            TokenKind::Body => write!(f, "'body'"),
            TokenKind::Contains => write!(f, "'contains'"),
            TokenKind::LBrace => write!(f, "'{{'"),
            TokenKind::RBrace => write!(f, "'}}'"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Equals => write!(f, "'='"),
            TokenKind::Identifier(name) => write!(f, "identifier '{}'", name),
            TokenKind::String(value) => write!(f, "string {:?}", value),
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::Eof => write!(f, "end of file"),
        }
    }
}

/// HTTP methods a request statement may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// POST and PUT send a body; GET and DELETE never do.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source location span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}
