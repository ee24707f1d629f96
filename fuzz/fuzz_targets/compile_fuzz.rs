//! Fuzz test for the full TestLang compile pipeline
//!
//! Run with: cargo +nightly fuzz run compile_fuzz -- -max_total_time=60

#![no_main]

use libfuzzer_sys::fuzz_target;
use testlang_dsl::{compile_source, CompilerOptions, Target};

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        for target in [Target::Junit, Target::Rust] {
            let options = CompilerOptions::default().with_target(target);
            if let Ok(output) = compile_source(input, &options) {
                assert!(!output.source.is_empty(), "Successful compile should emit source");
            }
        }
    }
});
