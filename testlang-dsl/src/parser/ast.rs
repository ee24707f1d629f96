//! Abstract Syntax Tree types

pub use crate::lexer::HttpMethod;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;

// ============================================================================
// AST TYPES
// ============================================================================

/// The root AST node for a TestLang file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub config: Option<Config>,
    pub variables: Vec<Variable>,
    pub tests: Vec<TestCase>,
}

impl Program {
    /// Every request in the program, in declaration order.
    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.tests.iter().flat_map(TestCase::requests)
    }

    /// Configured base URL, if the config block sets one.
    pub fn base_url(&self) -> Option<&str> {
        self.config.as_ref().and_then(|c| c.base_url.as_deref())
    }

    /// Default headers from the config block, in declaration order.
    pub fn default_headers(&self) -> &[Header] {
        self.config
            .as_ref()
            .map(|c| c.headers.as_slice())
            .unwrap_or(&[])
    }
}

/// The `config { ... }` block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub base_url: Option<String>,
    /// Declaration order is kept; duplicate keys are allowed.
    pub headers: Vec<Header>,
}

/// A header key/value pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A `let name = value;` declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    pub value: Value,
}

/// Variable value. Stringified uniformly when substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Integer(i64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(n) => write!(f, "{}", n),
        }
    }
}

/// A `test Name { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub statements: Vec<Statement>,
}

impl TestCase {
    pub fn requests(&self) -> impl Iterator<Item = &Request> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Request(req) => Some(req),
            Statement::Assertion(_) => None,
        })
    }

    pub fn assertions(&self) -> impl Iterator<Item = &Assertion> {
        self.statements.iter().filter_map(|stmt| match stmt {
            Statement::Assertion(assertion) => Some(assertion),
            Statement::Request(_) => None,
        })
    }
}

/// A statement inside a test block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Statement {
    Request(Request),
    Assertion(Assertion),
}

/// An HTTP request statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: HttpMethod,
    /// May contain `$name` placeholders.
    pub url: String,
    /// Request-scoped headers, applied before the config defaults.
    pub headers: Vec<Header>,
    /// May contain `$name` placeholders.
    pub body: Option<String>,
}

impl Request {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }
}

/// Codes `expect status = N;` accepts. Both targets hold them in 16 bits.
pub const STATUS_CODES: RangeInclusive<i64> = 100..=599;

/// An `expect ...;` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Assertion {
    /// `expect status = 200;`
    StatusEquals { code: i64 },
    /// `expect header "K" = "V";`
    HeaderEquals { key: String, value: String },
    /// `expect header "K" contains "V";`
    HeaderContains { key: String, value: String },
    /// `expect body contains "V";`
    BodyContains { value: String },
}
