//! Fuzz test for the TestLang Parser
//!
//! Feeds arbitrary UTF-8 to the parser; every failure must carry a 1-based
//! position, and every success must survive a pretty-print round trip.
//!
//! Run with: cargo +nightly fuzz run parser_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use testlang_dsl::{parse, pretty_print, CompileError};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        match parse(input) {
            Ok(program) => {
                assert!(!program.tests.is_empty(), "Parsed program should hold a test");
                let reparsed = parse(&pretty_print(&program));
                assert_eq!(reparsed.ok(), Some(program), "Round-trip should preserve the AST");
            }
            Err(CompileError::Parse(err)) => {
                assert!(err.line >= 1, "Error line should be >= 1");
                assert!(err.column >= 1, "Error column should be >= 1");
                assert!(!err.message.is_empty(), "Error message should not be empty");
            }
            Err(CompileError::Lex(err)) => {
                assert!(err.line >= 1, "Error line should be >= 1");
            }
            Err(other) => panic!("parse produced a non-language error: {}", other),
        }
    }
});
