//! Fuzz test for the TestLang Lexer
//!
//! Feeds arbitrary UTF-8 to the lexer looking for panics, infinite loops and
//! positions that are not 1-based.
//!
//! Run with: cargo +nightly fuzz run lexer_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use testlang_dsl::{Lexer, TokenKind};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        match Lexer::new(input).tokenize() {
            Ok(tokens) => {
                // Exactly one Eof, and it comes last
                let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
                assert_eq!(eofs, 1, "Token stream should hold exactly one Eof");
                assert_eq!(
                    tokens.last().map(|t| &t.kind),
                    Some(&TokenKind::Eof),
                    "Last token should always be Eof"
                );

                for token in &tokens {
                    assert!(token.span.start <= token.span.end, "Span start should be <= end");
                    assert!(token.span.line >= 1, "Line numbers should be >= 1");
                    assert!(token.span.column >= 1, "Column numbers should be >= 1");
                }
            }
            Err(err) => {
                assert!(err.line >= 1, "Error line should be >= 1");
                assert!(err.column >= 1, "Error column should be >= 1");
                // The display snippet is bounded no matter how long the lexeme
                assert!(err.snippet().chars().count() <= 2 * 20 + 3);
            }
        }
    }
});
