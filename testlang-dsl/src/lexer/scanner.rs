//! Lexer implementation

use super::token::*;
use crate::error::LexError;
use std::iter::Peekable;
use std::str::CharIndices;

// ============================================================================
// LEXER IMPLEMENTATION
// ============================================================================

/// Lexer for the TestLang DSL.
///
/// Tokens are produced on demand by [`Lexer::next_token`]; the parser pulls
/// one token at a time. After the single `Eof` token the lexer keeps
/// returning `Eof`.
pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
    pos: usize,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
            line: 1,
            column: 1,
            pos: 0,
            finished: false,
        }
    }

    /// Tokenize the entire source. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    /// Get the next token from the source.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        let start_pos = self.pos;
        let start_line = self.line;
        let start_col = self.column;

        let kind = match self.peek_char() {
            None => TokenKind::Eof,
            Some(c) => match c {
                '{' => {
                    self.advance();
                    TokenKind::LBrace
                }
                '}' => {
                    self.advance();
                    TokenKind::RBrace
                }
                ';' => {
                    self.advance();
                    TokenKind::Semicolon
                }
                '=' => {
                    self.advance();
                    TokenKind::Equals
                }

                '"' => self.scan_string()?,

                c if c.is_ascii_digit() => self.scan_number()?,

                c if c.is_ascii_alphabetic() || c == '_' => self.scan_identifier(),

                c => {
                    return Err(LexError::new(
                        format!("Illegal character '{}'", c),
                        start_line,
                        start_col,
                        c.to_string(),
                    ));
                }
            },
        };

        Ok(Token {
            kind,
            span: Span {
                start: start_pos,
                end: self.pos,
                line: start_line,
                column: start_col,
            },
        })
    }

    /// Scan an identifier or keyword.
    fn scan_identifier(&mut self) -> TokenKind {
        let start = self.pos;
        self.eat_word();

        let ident = &self.source[start..self.pos];
        TokenKind::keyword(ident).unwrap_or_else(|| TokenKind::Identifier(ident.to_string()))
    }

    /// Scan a non-negative integer literal.
    ///
    /// A digit run glued to letters (`2bad`) is rejected as a whole instead of
    /// being split into a number and an identifier.
    fn scan_number(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        let (line, column) = (self.line, self.column);

        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if matches!(self.peek_char(), Some(c) if c.is_ascii_alphabetic() || c == '_') {
            self.eat_word();
            let text = &self.source[start..self.pos];
            return Err(LexError::new(
                format!("Invalid identifier '{}': identifiers cannot start with a digit", text),
                line,
                column,
                text,
            ));
        }

        let text = &self.source[start..self.pos];
        text.parse::<i64>().map(TokenKind::Number).map_err(|_| {
            LexError::new(format!("Number out of range: {}", text), line, column, text)
        })
    }

    /// Scan a string literal with escape sequences.
    fn scan_string(&mut self) -> Result<TokenKind, LexError> {
        let start = self.pos;
        let (line, column) = (self.line, self.column);
        self.advance(); // consume opening quote
        let mut value = String::new();

        loop {
            match self.peek_char() {
                None | Some('\n') => {
                    return Err(LexError::new(
                        "Unterminated string",
                        line,
                        column,
                        &self.source[start..self.pos],
                    ));
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    let escape_col = self.column;
                    self.advance();
                    let escaped = match self.peek_char() {
                        Some('n') => '\n',
                        Some('t') => '\t',
                        Some('r') => '\r',
                        Some('\\') => '\\',
                        Some('"') => '"',
                        None | Some('\n') => {
                            return Err(LexError::new(
                                "Unterminated string",
                                line,
                                column,
                                &self.source[start..self.pos],
                            ));
                        }
                        Some(other) => {
                            return Err(LexError::new(
                                format!("Invalid escape sequence '\\{}'", other),
                                self.line,
                                escape_col,
                                format!("\\{}", other),
                            ));
                        }
                    };
                    self.advance();
                    value.push(escaped);
                }
                Some(c) => {
                    self.advance();
                    value.push(c);
                }
            }
        }

        Ok(TokenKind::String(value))
    }

    /// Skip whitespace and `//` line comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek_char() {
                Some(' ') | Some('\t') | Some('\r') => {
                    self.advance();
                }
                Some('\n') => {
                    self.advance();
                    self.line += 1;
                    self.column = 1;
                }
                Some('/') => {
                    if self.peek_next_char() != Some('/') {
                        // A lone slash never starts a token.
                        return Err(LexError::new("Illegal character '/'", self.line, self.column, "/"));
                    }
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn eat_word(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn peek_next_char(&self) -> Option<char> {
        let mut iter = self.source[self.pos..].char_indices();
        iter.next();
        iter.next().map(|(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        if let Some((i, c)) = self.chars.next() {
            self.pos = i + c.len_utf8();
            self.column += 1;
            Some(c)
        } else {
            None
        }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    /// Yields every token up to and including `Eof`, or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let result = self.next_token();
        match &result {
            Ok(token) if token.kind != TokenKind::Eof => {}
            _ => self.finished = true,
        }
        Some(result)
    }
}
