/// TestLang Tracer - Shows the flow through Tokens → AST → Generated Tests
///
/// Usage: cargo run --bin trace_compile <test-file> [junit|rust]

use std::fs;
use testlang_dsl::codegen::{CodeGenerator, Target};
use testlang_dsl::lexer::Lexer;
use testlang_dsl::parser::parse;
use testlang_dsl::pretty_printer::pretty_print;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: cargo run --bin trace_compile <test-file> [junit|rust]");
        eprintln!();
        eprintln!("Example:");
        eprintln!("  cargo run --bin trace_compile tests/fixtures/example.test rust");
        std::process::exit(1);
    }

    let path = &args[1];
    let target = match args.get(2).map(|t| t.parse::<Target>()) {
        None => Target::default(),
        Some(Ok(target)) => target,
        Some(Err(e)) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    println!("╔═══════════════════════════════════════════════════════════════");
    println!("║ TESTLANG COMPILER TRACER");
    println!("╚═══════════════════════════════════════════════════════════════\n");

    let source = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("❌ Failed to read {}: {}", path, e);
            std::process::exit(1);
        }
    };

    println!("📝 INPUT:");
    println!("{}", source);
    println!();

    // Step 1: Tokens
    println!("🔤 TOKENS:");
    println!("─────────────────────────────────────────────────────────────");
    for token in Lexer::new(&source) {
        match token {
            Ok(token) => {
                println!("{:>4}:{:<3} {}", token.span.line, token.span.column, token.kind);
            }
            Err(e) => {
                println!("❌ {}", e);
                return;
            }
        }
    }
    println!();

    // Step 2: AST
    let program = match parse(&source) {
        Ok(program) => program,
        Err(e) => {
            println!("❌ {}", e);
            return;
        }
    };

    println!("🌳 AST:");
    println!("─────────────────────────────────────────────────────────────");
    match serde_json::to_string_pretty(&program) {
        Ok(json) => println!("{}", json),
        Err(e) => println!("{:#?}\n(JSON dump failed: {})", program, e),
    }
    println!();

    println!("🔄 CANONICAL SOURCE:");
    println!("─────────────────────────────────────────────────────────────");
    println!("{}", pretty_print(&program));

    // Step 3: Validation + generation
    println!("⚙️  GENERATED ({}):", target);
    println!("─────────────────────────────────────────────────────────────");
    match CodeGenerator::new(&program).with_target(target).generate() {
        Ok(output) => {
            for diagnostic in &output.diagnostics {
                println!("⚠️  [{}] {}", diagnostic.code, diagnostic);
            }
            println!("{}", output.source);
            println!("✅ Compile succeeded!");
        }
        Err(e) => {
            println!("❌ {}", e);
        }
    }
}
