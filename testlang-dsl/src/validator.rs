//! # Semantic Validation
//!
//! Structural rules checked over a complete [`Program`], in order, first
//! failure wins:
//!
//! 1. the program declares at least one test;
//! 2. every test, in declaration order, has at least one request and at
//!    least two assertions (counted independently of statement order);
//! 3. every expected status lies in [`STATUS_CODES`]. The parser already
//!    enforces this; programs built in code are checked here.
//!
//! Passing programs are then linted. Lints never fail the compile; they are
//! returned to the caller as [`Diagnostic`]s.

use std::fmt;

use crate::error::{ValidationError, ValidationRule};
use crate::parser::ast::*;

/// Minimum number of assertions per test.
pub const MIN_ASSERTIONS: usize = 2;

/// Stable lint code: a `let` variable no request URL or body references.
pub const LINT_UNUSED_VARIABLE: &str = "unused_variable";

/// Lint severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LintSeverity {
    Warning,
}

/// Non-fatal diagnostic surfaced next to the generated output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub code: &'static str,
    pub severity: LintSeverity,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.severity {
            LintSeverity::Warning => write!(f, "Warning: {}", self.message),
        }
    }
}

/// Validate a program and collect its lints.
pub fn validate(program: &Program) -> Result<Vec<Diagnostic>, ValidationError> {
    if program.tests.is_empty() {
        return Err(ValidationError::program(ValidationRule::NoTests));
    }

    for test in &program.tests {
        validate_test(test)?;
    }

    Ok(lint_unused_variables(program))
}

fn validate_test(test: &TestCase) -> Result<(), ValidationError> {
    let mut requests = 0;
    let mut assertions = 0;

    for stmt in &test.statements {
        match stmt {
            Statement::Request(_) => requests += 1,
            Statement::Assertion(_) => assertions += 1,
        }
    }

    if requests == 0 {
        return Err(ValidationError::in_test(
            ValidationRule::MissingRequest,
            &test.name,
        ));
    }

    if assertions < MIN_ASSERTIONS {
        return Err(ValidationError::in_test(
            ValidationRule::TooFewAssertions { found: assertions },
            &test.name,
        ));
    }

    for stmt in &test.statements {
        if let Statement::Assertion(Assertion::StatusEquals { code }) = stmt {
            if !STATUS_CODES.contains(code) {
                return Err(ValidationError::in_test(
                    ValidationRule::StatusOutOfRange { code: *code },
                    &test.name,
                ));
            }
        }
    }

    Ok(())
}

/// Warn about every declared variable whose `$name` appears in no request
/// URL or body. Matching is a plain substring search.
pub fn lint_unused_variables(program: &Program) -> Vec<Diagnostic> {
    program
        .variables
        .iter()
        .filter(|var| {
            let placeholder = format!("${}", var.name);
            !program.requests().any(|req| {
                req.url.contains(&placeholder)
                    || req
                        .body
                        .as_deref()
                        .is_some_and(|body| body.contains(&placeholder))
            })
        })
        .map(|var| Diagnostic {
            code: LINT_UNUSED_VARIABLE,
            severity: LintSeverity::Warning,
            message: format!("Variable '{}' is declared but never used", var.name),
        })
        .collect()
}
