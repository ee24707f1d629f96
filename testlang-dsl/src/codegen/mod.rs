//! Code Generator - Transform a validated AST into test source code
//!
//! The generator walks the AST once, resolves variables and escapes every
//! literal, and hands target-independent instructions to a [`TargetWriter`]
//! which owns the concrete syntax of the host test framework.
//!
//! # Pipeline
//!
//! ```text
//! Program → validate → Substitutions → Rendered* → TargetWriter → source text
//! ```

mod junit;
mod rust;

pub use junit::JunitWriter;
pub use rust::RustWriter;

use crate::compiler::CompileOutput;
use crate::error::ValidationError;
use crate::parser::ast::*;
use crate::validator::validate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base URL used when the config block does not set one.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
/// Connect timeout of the shared HTTP client, in seconds.
pub const CONNECT_TIMEOUT_SECS: u64 = 5;
/// Per-request timeout, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
/// Prefix of every emitted test function name.
pub const TEST_FN_PREFIX: &str = "test_";

// ============================================================================
// TARGETS
// ============================================================================

/// Host test framework the generated source is written for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// JUnit 5 with `java.net.http`.
    #[default]
    Junit,
    /// Rust integration tests with `reqwest::blocking`.
    Rust,
}

impl Target {
    fn writer(self, class_name: &str) -> Box<dyn TargetWriter> {
        match self {
            Target::Junit => Box::new(JunitWriter::new(class_name)),
            Target::Rust => Box::new(RustWriter::new()),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Junit => f.write_str("junit"),
            Target::Rust => f.write_str("rust"),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "junit" | "java" => Ok(Target::Junit),
            "rust" => Ok(Target::Rust),
            other => Err(format!("unknown target '{}' (expected junit or rust)", other)),
        }
    }
}

// ============================================================================
// RENDERED INSTRUCTIONS
// ============================================================================
//
// Every string held below is already substituted and escaped: writers paste
// it between double quotes verbatim.

/// Suite-wide values needed by the preamble and setup phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuiteHeader {
    pub base_url: String,
    /// Config headers in declaration order, duplicates included.
    pub default_headers: Vec<(String, String)>,
}

/// Request target, resolved at generation time but joined at run time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlExpr {
    /// Starts with `/`: concatenated with the suite base URL when the test runs.
    Relative(String),
    Absolute(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyExpr {
    /// GET and DELETE.
    None,
    /// POST or PUT without a declared body.
    Empty,
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRequest {
    pub method: HttpMethod,
    pub url: UrlExpr,
    pub body: BodyExpr,
    /// Request-scoped headers, emitted before the defaults.
    pub headers: Vec<(String, String)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedAssertion {
    StatusEquals(i64),
    HeaderEquals { key: String, value: String },
    HeaderContains { key: String, value: String },
    BodyContains(String),
}

/// Backend that turns rendered instructions into one framework's syntax.
///
/// Calls arrive in a fixed order: `preamble`, `setup`, then for each test
/// `begin_test`, its statements, `end_test`, and finally `finish`.
pub trait TargetWriter {
    fn preamble(&mut self, out: &mut String, suite: &SuiteHeader);
    fn setup(&mut self, out: &mut String, suite: &SuiteHeader);
    fn begin_test(&mut self, out: &mut String, fn_name: &str);
    fn request(&mut self, out: &mut String, request: &RenderedRequest);
    fn assertion(&mut self, out: &mut String, assertion: &RenderedAssertion);
    fn end_test(&mut self, out: &mut String);
    fn finish(&mut self, out: &mut String);
}

// ============================================================================
// SUBSTITUTION & ESCAPING
// ============================================================================

/// Textual `$name` replacement table built from the `let` declarations.
#[derive(Debug, Clone, Default)]
pub struct Substitutions {
    /// Longest name first, so `$idx` is replaced before `$id` can clobber it.
    entries: Vec<(String, String)>,
}

impl Substitutions {
    pub fn from_program(program: &Program) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        for var in &program.variables {
            let placeholder = format!("${}", var.name);
            let value = var.value.to_string();
            // A later declaration of the same name replaces the earlier one.
            match entries.iter_mut().find(|(name, _)| *name == placeholder) {
                Some(entry) => entry.1 = value,
                None => entries.push((placeholder, value)),
            }
        }
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        Self { entries }
    }

    /// Replace every known placeholder. Unknown `$names` are left as-is.
    pub fn apply(&self, text: &str) -> String {
        let mut result = text.to_string();
        for (placeholder, value) in &self.entries {
            if result.contains(placeholder.as_str()) {
                result = result.replace(placeholder.as_str(), value);
            }
        }
        result
    }
}

/// Escape text for a double-quoted string literal.
///
/// Backslash goes first so escapes added by later steps are not doubled.
pub fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

// ============================================================================
// CODE GENERATOR
// ============================================================================

/// Generates a test suite from a [`Program`].
pub struct CodeGenerator<'a> {
    program: &'a Program,
    target: Target,
    class_name: String,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(program: &'a Program) -> Self {
        Self {
            program,
            target: Target::default(),
            class_name: crate::compiler::DEFAULT_CLASS_NAME.to_string(),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// Validate the program, then emit the whole suite.
    ///
    /// Nothing is emitted when validation fails.
    pub fn generate(&self) -> Result<CompileOutput, ValidationError> {
        let diagnostics = validate(self.program)?;

        let subs = Substitutions::from_program(self.program);
        let suite = self.suite_header();
        let mut writer = self.target.writer(&self.class_name);
        let mut out = String::new();

        writer.preamble(&mut out, &suite);
        writer.setup(&mut out, &suite);

        for test in &self.program.tests {
            writer.begin_test(&mut out, &format!("{}{}", TEST_FN_PREFIX, test.name));
            for stmt in &test.statements {
                match stmt {
                    Statement::Request(req) => {
                        writer.request(&mut out, &render_request(req, &subs));
                    }
                    Statement::Assertion(assertion) => {
                        writer.assertion(&mut out, &render_assertion(assertion, &subs));
                    }
                }
            }
            writer.end_test(&mut out);
        }

        writer.finish(&mut out);

        tracing::debug!(
            target_framework = %self.target,
            tests = self.program.tests.len(),
            bytes = out.len(),
            "generated test suite"
        );

        Ok(CompileOutput {
            source: out,
            diagnostics,
        })
    }

    fn suite_header(&self) -> SuiteHeader {
        SuiteHeader {
            base_url: escape_string(self.program.base_url().unwrap_or(DEFAULT_BASE_URL)),
            default_headers: self
                .program
                .default_headers()
                .iter()
                .map(|h| (escape_string(&h.key), escape_string(&h.value)))
                .collect(),
        }
    }
}

/// Resolve one request. Header pairs are escaped but never substituted.
pub fn render_request(req: &Request, subs: &Substitutions) -> RenderedRequest {
    let url = subs.apply(&req.url);
    let url = if url.starts_with('/') {
        UrlExpr::Relative(escape_string(&url))
    } else {
        UrlExpr::Absolute(escape_string(&url))
    };

    let body = if !req.method.carries_body() {
        BodyExpr::None
    } else {
        match &req.body {
            Some(body) => BodyExpr::Text(escape_string(&subs.apply(body))),
            None => BodyExpr::Empty,
        }
    };

    RenderedRequest {
        method: req.method,
        url,
        body,
        headers: req
            .headers
            .iter()
            .map(|h| (escape_string(&h.key), escape_string(&h.value)))
            .collect(),
    }
}

/// Resolve one assertion; keys and expected values are substituted.
pub fn render_assertion(assertion: &Assertion, subs: &Substitutions) -> RenderedAssertion {
    let lit = |s: &str| escape_string(&subs.apply(s));
    match assertion {
        Assertion::StatusEquals { code } => RenderedAssertion::StatusEquals(*code),
        Assertion::HeaderEquals { key, value } => RenderedAssertion::HeaderEquals {
            key: lit(key),
            value: lit(value),
        },
        Assertion::HeaderContains { key, value } => RenderedAssertion::HeaderContains {
            key: lit(key),
            value: lit(value),
        },
        Assertion::BodyContains { value } => RenderedAssertion::BodyContains(lit(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str, value: Value) -> Variable {
        Variable {
            name: name.to_string(),
            value,
        }
    }

    fn program_with_vars(variables: Vec<Variable>) -> Program {
        Program {
            config: None,
            variables,
            tests: vec![],
        }
    }

    #[test]
    fn test_escape_string_order() {
        assert_eq!(escape_string(r#"a\b"#), r#"a\\b"#);
        assert_eq!(escape_string("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_string("l1\nl2\r\tx"), "l1\\nl2\\r\\tx");
        // An escaped quote in the input must not be re-escaped into \\\\"
        assert_eq!(escape_string("\\\""), "\\\\\\\"");
    }

    #[test]
    fn test_substitution_is_textual() {
        let subs = Substitutions::from_program(&program_with_vars(vec![
            var("id", Value::Integer(42)),
            var("name", Value::Text("John".to_string())),
        ]));
        assert_eq!(subs.apply("/api/users/$id"), "/api/users/42");
        assert_eq!(subs.apply("{\"n\": \"$name\"}"), "{\"n\": \"John\"}");
        assert_eq!(subs.apply("/keep/$unknown"), "/keep/$unknown");
    }

    #[test]
    fn test_substitution_last_declaration_wins() {
        let subs = Substitutions::from_program(&program_with_vars(vec![
            var("id", Value::Integer(1)),
            var("id", Value::Integer(2)),
        ]));
        assert_eq!(subs.apply("$id"), "2");
    }

    #[test]
    fn test_substitution_prefers_longer_names() {
        let subs = Substitutions::from_program(&program_with_vars(vec![
            var("id", Value::Integer(1)),
            var("idx", Value::Integer(7)),
        ]));
        assert_eq!(subs.apply("/items/$idx/$id"), "/items/7/1");
    }

    #[test]
    fn test_render_request_bodies_by_method() {
        let subs = Substitutions::default();

        let mut get = Request::new(HttpMethod::Get, "/x");
        get.body = Some("ignored".to_string());
        assert_eq!(render_request(&get, &subs).body, BodyExpr::None);

        let delete = Request::new(HttpMethod::Delete, "/x");
        assert_eq!(render_request(&delete, &subs).body, BodyExpr::None);

        let post = Request::new(HttpMethod::Post, "/x");
        assert_eq!(render_request(&post, &subs).body, BodyExpr::Empty);

        let mut put = Request::new(HttpMethod::Put, "/x");
        put.body = Some("{\"a\":1}".to_string());
        assert_eq!(
            render_request(&put, &subs).body,
            BodyExpr::Text("{\\\"a\\\":1}".to_string())
        );
    }

    #[test]
    fn test_render_request_url_kinds() {
        let subs = Substitutions::default();
        let relative = render_request(&Request::new(HttpMethod::Get, "/a"), &subs);
        assert_eq!(relative.url, UrlExpr::Relative("/a".to_string()));

        let absolute = render_request(&Request::new(HttpMethod::Get, "http://h/a"), &subs);
        assert_eq!(absolute.url, UrlExpr::Absolute("http://h/a".to_string()));
    }

    #[test]
    fn test_render_request_headers_are_not_substituted() {
        let subs = Substitutions::from_program(&program_with_vars(vec![var(
            "token",
            Value::Text("abc".to_string()),
        )]));
        let mut req = Request::new(HttpMethod::Get, "/$token");
        req.headers.push(Header::new("X-$token", "$token"));

        let rendered = render_request(&req, &subs);
        assert_eq!(rendered.url, UrlExpr::Relative("/abc".to_string()));
        assert_eq!(
            rendered.headers,
            vec![("X-$token".to_string(), "$token".to_string())]
        );
    }

    #[test]
    fn test_render_assertion_substitutes_key_and_value() {
        let subs = Substitutions::from_program(&program_with_vars(vec![
            var("h", Value::Text("X-Id".to_string())),
            var("v", Value::Integer(9)),
        ]));
        let rendered = render_assertion(
            &Assertion::HeaderEquals {
                key: "$h".to_string(),
                value: "id-$v".to_string(),
            },
            &subs,
        );
        assert_eq!(
            rendered,
            RenderedAssertion::HeaderEquals {
                key: "X-Id".to_string(),
                value: "id-9".to_string(),
            }
        );
    }

    #[test]
    fn test_target_parsing() {
        assert_eq!("junit".parse::<Target>(), Ok(Target::Junit));
        assert_eq!("Rust".parse::<Target>(), Ok(Target::Rust));
        assert!("cobol".parse::<Target>().is_err());
    }

    #[test]
    fn test_generate_refuses_invalid_program() {
        let program = Program::default();
        let result = CodeGenerator::new(&program).generate();
        assert!(result.is_err());
    }
}
