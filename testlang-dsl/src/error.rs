//! Error types for every compile stage.
//!
//! Each stage fails fast: the first lexical, syntax or validation problem
//! aborts the compile and no partial output is produced.

use std::path::PathBuf;

use thiserror::Error;

/// Longest slice of offending source shown in a lexer message.
const SNIPPET_LIMIT: usize = 20;

// ============================================================================
// LEX ERROR
// ============================================================================

/// Malformed lexeme: unterminated string, illegal character, or a bad
/// identifier/number boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {line}, column {column}: {message}{}", near(.text))]
pub struct LexError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    /// Raw source text at the failure point.
    pub text: String,
}

impl LexError {
    pub fn new(message: impl Into<String>, line: usize, column: usize, text: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line,
            column,
            text: text.into(),
        }
    }

    /// The offending text as shown to users: truncated, control characters visible.
    pub fn snippet(&self) -> String {
        display_snippet(&self.text)
    }
}

fn near(text: &str) -> String {
    if text.is_empty() {
        String::new()
    } else {
        format!("\n  Near: '{}'", display_snippet(text))
    }
}

fn display_snippet(text: &str) -> String {
    let mut shown: String = text.chars().take(SNIPPET_LIMIT).collect();
    if text.chars().count() > SNIPPET_LIMIT {
        shown.push_str("...");
    }
    shown
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// Token sequence that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Parse error at line {line}: {message}{}", context_suffix(.context))]
pub struct ParseError {
    pub message: String,
    pub line: usize,
    pub column: usize,
    pub context: Option<String>,
}

fn context_suffix(context: &Option<String>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => format!("\n  Context: {}", ctx),
        _ => String::new(),
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Domain rule a structurally valid program can still break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationRule {
    #[error("Program must contain at least one test block")]
    NoTests,

    #[error("Test must contain at least one HTTP request (GET/POST/PUT/DELETE)")]
    MissingRequest,

    #[error("Test must contain at least 2 assertions (found {found})")]
    TooFewAssertions { found: usize },

    #[error("Expected status {code} is not an HTTP status code (100-599)")]
    StatusOutOfRange { code: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation error{}: {rule}", test_scope(.test_name))]
pub struct ValidationError {
    pub rule: ValidationRule,
    /// Set when the rule is scoped to a single test.
    pub test_name: Option<String>,
}

impl ValidationError {
    pub fn program(rule: ValidationRule) -> Self {
        Self {
            rule,
            test_name: None,
        }
    }

    pub fn in_test(rule: ValidationRule, test_name: impl Into<String>) -> Self {
        Self {
            rule,
            test_name: Some(test_name.into()),
        }
    }
}

fn test_scope(test_name: &Option<String>) -> String {
    match test_name {
        Some(name) => format!(" in test '{}'", name),
        None => String::new(),
    }
}

// ============================================================================
// COMPILE ERROR
// ============================================================================

/// Errors that can occur while compiling a TestLang file.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid compiler options: {0}")]
    InvalidOptions(String),

    /// Reading the input failed; kept apart from language-level errors.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CompileError {
    /// Heading used when the error is reported to a user.
    pub fn category(&self) -> &'static str {
        match self {
            CompileError::Lex(_) => "LEXER ERROR",
            CompileError::Parse(_) => "PARSER ERROR",
            CompileError::Validation(_) => "VALIDATION ERROR",
            CompileError::InvalidOptions(_) => "CONFIG ERROR",
            CompileError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => {
                "FILE ERROR"
            }
            CompileError::Io { .. } => "IO ERROR",
        }
    }
}

pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_display_with_snippet() {
        let err = LexError::new("Illegal character", 3, 7, "@");
        assert_eq!(
            err.to_string(),
            "Lexer error at line 3, column 7: Illegal character\n  Near: '@'"
        );
    }

    #[test]
    fn test_lex_error_snippet_truncates_and_escapes() {
        let err = LexError::new("Unterminated string", 1, 1, "\"abc\tdefghijklmnopqrstuvwxyz\n");
        assert_eq!(err.snippet(), "\"abc\\tdefghijklmnopqr...");
    }

    #[test]
    fn test_lex_error_without_text_has_no_near_line() {
        let err = LexError::new("Unexpected end of input", 2, 1, "");
        assert!(!err.to_string().contains("Near"));
    }

    #[test]
    fn test_parse_error_display() {
        let err = ParseError {
            message: "expected ';' after request".to_string(),
            line: 4,
            column: 5,
            context: Some("found 'expect'".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Parse error at line 4: expected ';' after request\n  Context: found 'expect'"
        );
    }

    #[test]
    fn test_validation_error_display() {
        let scoped = ValidationError::in_test(ValidationRule::TooFewAssertions { found: 1 }, "Login");
        assert_eq!(
            scoped.to_string(),
            "Validation error in test 'Login': Test must contain at least 2 assertions (found 1)"
        );

        let global = ValidationError::program(ValidationRule::NoTests);
        assert_eq!(
            global.to_string(),
            "Validation error: Program must contain at least one test block"
        );

        let status = ValidationError::in_test(ValidationRule::StatusOutOfRange { code: 70000 }, "Big");
        assert_eq!(
            status.to_string(),
            "Validation error in test 'Big': Expected status 70000 is not an HTTP status code (100-599)"
        );
        let as_error: &dyn std::error::Error = &status;
        assert!(as_error.source().is_none());
    }

    #[test]
    fn test_compile_error_categories() {
        let missing = CompileError::Io {
            path: PathBuf::from("nope.test"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(missing.category(), "FILE ERROR");

        let denied = CompileError::Io {
            path: PathBuf::from("locked.test"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(denied.category(), "IO ERROR");

        let lex: CompileError = LexError::new("Illegal character", 1, 1, "@").into();
        assert_eq!(lex.category(), "LEXER ERROR");
    }
}
