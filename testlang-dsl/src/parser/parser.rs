//! Parser implementation
//!
//! Grammar:
//!
//! ```text
//! program     := config? variable* test+
//! config      := 'config' '{' (base_url | header)* '}'
//! base_url    := 'base_url' '=' STRING ';'
//! header      := 'header' STRING '=' STRING ';'
//! variable    := 'let' IDENTIFIER '=' (STRING | NUMBER) ';'
//! test        := 'test' IDENTIFIER '{' statement+ '}'
//! statement   := request | assertion
//! request     := method STRING (';' | '{' header* body? '}' ';')
//! method      := 'GET' | 'POST' | 'PUT' | 'DELETE'
//! body        := 'body' '=' STRING ';'
//! assertion   := 'expect' ( 'status' '=' NUMBER
//!                         | 'header' STRING '=' STRING
//!                         | 'header' STRING 'contains' STRING
//!                         | 'body' 'contains' STRING ) ';'
//! ```
//!
//! One token of lookahead decides every production.

use super::ast::*;
use crate::error::{CompileError, CompileResult, ParseError};
use crate::lexer::*;

// ============================================================================
// PARSER
// ============================================================================

/// Recursive-descent parser that pulls tokens from a [`Lexer`] on demand.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    /// Create a parser over the given source, priming the first token.
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    /// Parse the whole source into a [`Program`].
    pub fn parse(&mut self) -> CompileResult<Program> {
        let config = if self.check(&TokenKind::Config) {
            Some(self.parse_config()?)
        } else {
            None
        };

        let mut variables = Vec::new();
        while self.check(&TokenKind::Let) {
            variables.push(self.parse_variable()?);
        }

        let mut tests = Vec::new();
        loop {
            match &self.current.kind {
                TokenKind::Test => tests.push(self.parse_test()?),
                TokenKind::Eof => break,
                TokenKind::Config => {
                    return Err(self.error("config block must appear once, before any declaration"))
                }
                TokenKind::Let if !tests.is_empty() => {
                    return Err(self.error("variable declarations must precede test blocks"))
                }
                _ => return Err(self.error("expected 'test' block")),
            }
        }

        if tests.is_empty() {
            return Err(self.error("expected at least one 'test' block"));
        }

        tracing::debug!(
            variables = variables.len(),
            tests = tests.len(),
            "parsed program"
        );

        Ok(Program {
            config,
            variables,
            tests,
        })
    }

    /// Parse the `config` block.
    fn parse_config(&mut self) -> CompileResult<Config> {
        self.expect(TokenKind::Config, "")?;
        self.expect(TokenKind::LBrace, "after 'config'")?;

        let mut config = Config::default();

        loop {
            match &self.current.kind {
                TokenKind::BaseUrl => {
                    self.advance()?;
                    self.expect(TokenKind::Equals, "after 'base_url'")?;
                    let url = self.expect_string("base URL")?;
                    self.expect(TokenKind::Semicolon, "after base URL")?;
                    config.base_url = Some(url);
                }
                TokenKind::Header => config.headers.push(self.parse_header()?),
                TokenKind::RBrace => break,
                _ => return Err(self.error("expected 'base_url', 'header' or '}' in config block")),
            }
        }

        self.expect(TokenKind::RBrace, "to close config block")?;
        Ok(config)
    }

    /// Parse `header "K" = "V";`.
    fn parse_header(&mut self) -> CompileResult<Header> {
        self.expect(TokenKind::Header, "")?;
        let key = self.expect_string("header name")?;
        self.expect(TokenKind::Equals, "after header name")?;
        let value = self.expect_string("header value")?;
        self.expect(TokenKind::Semicolon, "after header")?;
        Ok(Header { key, value })
    }

    /// Parse `let name = value;`.
    fn parse_variable(&mut self) -> CompileResult<Variable> {
        self.expect(TokenKind::Let, "")?;
        let name = self.expect_identifier("variable name")?;
        self.expect(TokenKind::Equals, "after variable name")?;

        let value = match &self.current.kind {
            TokenKind::String(s) => Value::Text(s.clone()),
            TokenKind::Number(n) => Value::Integer(*n),
            _ => return Err(self.error("expected string or number as variable value")),
        };
        self.advance()?;

        self.expect(TokenKind::Semicolon, "after variable declaration")?;
        Ok(Variable { name, value })
    }

    /// Parse `test Name { statement+ }`.
    fn parse_test(&mut self) -> CompileResult<TestCase> {
        self.expect(TokenKind::Test, "")?;
        let name = self.expect_identifier("test name")?;
        self.expect(TokenKind::LBrace, "after test name")?;

        let mut statements = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
        }

        if statements.is_empty() {
            return Err(self.error("test block must contain at least one statement"));
        }

        self.expect(TokenKind::RBrace, "to close test block")?;
        Ok(TestCase { name, statements })
    }

    /// Parse a request or an assertion, decided by the first keyword.
    fn parse_statement(&mut self) -> CompileResult<Statement> {
        if let Some(method) = self.current.kind.as_method() {
            return self.parse_request(method).map(Statement::Request);
        }
        match &self.current.kind {
            TokenKind::Expect => self.parse_assertion().map(Statement::Assertion),
            _ => Err(self.error("expected request (GET/POST/PUT/DELETE) or 'expect' assertion")),
        }
    }

    /// Parse a bare request (`GET "/x";`) or a request with a block.
    fn parse_request(&mut self, method: HttpMethod) -> CompileResult<Request> {
        self.advance()?;
        let mut request = Request::new(method, self.expect_string("request URL")?);

        match &self.current.kind {
            TokenKind::Semicolon => {
                self.advance()?;
            }
            TokenKind::LBrace => {
                self.advance()?;
                while self.check(&TokenKind::Header) {
                    request.headers.push(self.parse_header()?);
                }
                if self.check(&TokenKind::Body) {
                    self.advance()?;
                    self.expect(TokenKind::Equals, "after 'body'")?;
                    request.body = Some(self.expect_string("request body")?);
                    self.expect(TokenKind::Semicolon, "after request body")?;
                }
                self.expect(TokenKind::RBrace, "to close request block")?;
                self.expect(TokenKind::Semicolon, "after request block")?;
            }
            _ => return Err(self.error("expected ';' or '{' after request URL")),
        }

        Ok(request)
    }

    /// Parse an `expect` statement.
    fn parse_assertion(&mut self) -> CompileResult<Assertion> {
        self.expect(TokenKind::Expect, "")?;

        let assertion = match &self.current.kind {
            TokenKind::Status => {
                self.advance()?;
                self.expect(TokenKind::Equals, "after 'status'")?;
                if let TokenKind::Number(code) = self.current.kind {
                    if !STATUS_CODES.contains(&code) {
                        return Err(self.error(&format!(
                            "status code {} is outside {}-{}",
                            code,
                            STATUS_CODES.start(),
                            STATUS_CODES.end()
                        )));
                    }
                }
                let code = self.expect_number("status code")?;
                Assertion::StatusEquals { code }
            }
            TokenKind::Header => {
                self.advance()?;
                let key = self.expect_string("header name")?;
                match &self.current.kind {
                    TokenKind::Equals => {
                        self.advance()?;
                        let value = self.expect_string("header value")?;
                        Assertion::HeaderEquals { key, value }
                    }
                    TokenKind::Contains => {
                        self.advance()?;
                        let value = self.expect_string("header substring")?;
                        Assertion::HeaderContains { key, value }
                    }
                    _ => return Err(self.error("expected '=' or 'contains' after header name")),
                }
            }
            TokenKind::Body => {
                self.advance()?;
                self.expect(TokenKind::Contains, "after 'body'")?;
                let value = self.expect_string("body substring")?;
                Assertion::BodyContains { value }
            }
            _ => return Err(self.error("expected 'status', 'header' or 'body' after 'expect'")),
        };

        self.expect(TokenKind::Semicolon, "after assertion")?;
        Ok(assertion)
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    /// Consume the current token and pull the next one from the lexer.
    fn advance(&mut self) -> CompileResult<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn expect(&mut self, kind: TokenKind, place: &str) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else if place.is_empty() {
            Err(self.error(&format!("expected {}", kind)))
        } else {
            Err(self.error(&format!("expected {} {}", kind, place)))
        }
    }

    fn expect_identifier(&mut self, what: &str) -> CompileResult<String> {
        match &self.current.kind {
            TokenKind::Identifier(s) => {
                let s = s.clone();
                self.advance()?;
                Ok(s)
            }
            _ => Err(self.error(&format!("expected identifier as {}", what))),
        }
    }

    fn expect_string(&mut self, what: &str) -> CompileResult<String> {
        match &self.current.kind {
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance()?;
                Ok(s)
            }
            _ => Err(self.error(&format!("expected string as {}", what))),
        }
    }

    fn expect_number(&mut self, what: &str) -> CompileResult<i64> {
        match self.current.kind {
            TokenKind::Number(n) => {
                self.advance()?;
                Ok(n)
            }
            _ => Err(self.error(&format!("expected number as {}", what))),
        }
    }

    fn error(&self, msg: &str) -> CompileError {
        let span = self.current.span;
        ParseError {
            message: msg.to_string(),
            line: span.line,
            column: span.column,
            context: Some(format!("found {}", self.current.kind)),
        }
        .into()
    }
}

// ============================================================================
// CONVENIENCE FUNCTIONS
// ============================================================================

/// Parse DSL source code into an AST.
pub fn parse(source: &str) -> CompileResult<Program> {
    Parser::new(source)?.parse()
}

// ============================================================================
// TESTS
// ============================================================================
