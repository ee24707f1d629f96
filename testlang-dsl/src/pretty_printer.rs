//! Pretty printer for TestLang AST
//!
//! Renders canonical DSL source: two-space indentation, one declaration per
//! line, `base_url` ahead of the config headers. Re-parsing the output yields
//! the same [`Program`].

use crate::codegen::escape_string;
use crate::error::CompileResult;
use crate::parser::*;

/// Pretty-print a Program back to DSL source code.
pub fn pretty_print(program: &Program) -> String {
    let mut output = String::new();

    if let Some(config) = &program.config {
        output.push_str(&pretty_print_config(config));
        output.push('\n');
    }

    if !program.variables.is_empty() {
        for var in &program.variables {
            output.push_str(&format!("let {} = {};\n", var.name, literal(&var.value)));
        }
        output.push('\n');
    }

    let tests: Vec<String> = program.tests.iter().map(pretty_print_test).collect();
    output.push_str(&tests.join("\n"));
    output
}

fn pretty_print_config(config: &Config) -> String {
    let mut result = String::from("config {\n");
    if let Some(url) = &config.base_url {
        result.push_str(&format!("  base_url = {};\n", quoted(url)));
    }
    for header in &config.headers {
        result.push_str(&format!("  {}\n", pretty_print_header(header)));
    }
    result.push_str("}\n");
    result
}

fn pretty_print_header(header: &Header) -> String {
    format!("header {} = {};", quoted(&header.key), quoted(&header.value))
}

fn pretty_print_test(test: &TestCase) -> String {
    let mut result = format!("test {} {{\n", test.name);
    for stmt in &test.statements {
        match stmt {
            Statement::Request(req) => result.push_str(&pretty_print_request(req)),
            Statement::Assertion(assertion) => {
                result.push_str(&format!("  {}\n", pretty_print_assertion(assertion)))
            }
        }
    }
    result.push_str("}\n");
    result
}

fn pretty_print_request(req: &Request) -> String {
    let head = format!("  {} {}", req.method, quoted(&req.url));
    if req.headers.is_empty() && req.body.is_none() {
        return format!("{};\n", head);
    }

    let mut result = format!("{} {{\n", head);
    for header in &req.headers {
        result.push_str(&format!("    {}\n", pretty_print_header(header)));
    }
    if let Some(body) = &req.body {
        result.push_str(&format!("    body = {};\n", quoted(body)));
    }
    result.push_str("  };\n");
    result
}

fn pretty_print_assertion(assertion: &Assertion) -> String {
    match assertion {
        Assertion::StatusEquals { code } => format!("expect status = {};", code),
        Assertion::HeaderEquals { key, value } => {
            format!("expect header {} = {};", quoted(key), quoted(value))
        }
        Assertion::HeaderContains { key, value } => {
            format!("expect header {} contains {};", quoted(key), quoted(value))
        }
        Assertion::BodyContains { value } => format!("expect body contains {};", quoted(value)),
    }
}

fn literal(value: &Value) -> String {
    match value {
        Value::Text(s) => quoted(s),
        Value::Integer(n) => n.to_string(),
    }
}

// The DSL accepts exactly the escapes the code generator emits.
fn quoted(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}

/// Parse and pretty-print DSL source code (for round-trip testing).
pub fn round_trip(source: &str) -> CompileResult<String> {
    let program = parse(source)?;
    Ok(pretty_print(&program))
}
