//! End-to-end tests for the `testlang` binary

use std::path::Path;
use std::process::{Command, Output};

const VALID: &str = r#"
let id = 42;
let spare = "x";

test GetUser {
  GET "/api/users/$id";
  expect status = 200;
  expect body contains "\"id\":42";
}
"#;

fn testlang(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_testlang"))
        .current_dir(dir)
        .env_remove("TESTLANG_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("run testlang")
}

#[test]
fn test_compiles_to_default_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("api.test"), VALID).expect("write source");

    let out = testlang(dir.path(), &["api.test"]);
    assert!(out.status.success());

    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Successfully generated GeneratedTests.java"));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Warning: Variable 'spare' is declared but never used"));

    let java = std::fs::read_to_string(dir.path().join("GeneratedTests.java")).expect("output");
    assert!(java.contains("void test_GetUser() throws Exception {"));
    assert!(!java.contains("Warning"));
}

#[test]
fn test_class_name_names_the_output_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("api.test"), VALID).expect("write source");

    let out = testlang(dir.path(), &["api.test", "--class-name", "UserApiTests"]);
    assert!(out.status.success());

    let java = std::fs::read_to_string(dir.path().join("UserApiTests.java")).expect("output");
    assert!(java.contains("public class UserApiTests {"));
    assert!(!dir.path().join("GeneratedTests.java").exists());
}

#[test]
fn test_rust_target_from_config_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("api.test"), VALID).expect("write source");
    std::fs::write(dir.path().join("testlang.toml"), "target = \"rust\"\n").expect("write config");

    let out = testlang(dir.path(), &["api.test", "--config", "testlang.toml"]);
    assert!(out.status.success());

    let rs = std::fs::read_to_string(dir.path().join("generated_tests.rs")).expect("output");
    assert!(rs.contains("fn test_GetUser() {"));
}

#[test]
fn test_validation_failure_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let source = "test Thin { GET \"/\"; expect status = 200; }";
    std::fs::write(dir.path().join("thin.test"), source).expect("write source");

    let out = testlang(dir.path(), &["thin.test", "Out.java"]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("=== VALIDATION ERROR ==="));
    assert!(stderr.contains("(found 1)"));
    assert!(!dir.path().join("Out.java").exists());
}

#[test]
fn test_missing_input_is_file_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = testlang(dir.path(), &["nope.test"]);
    assert_eq!(out.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("=== FILE ERROR ==="));
    assert!(stderr.contains("Input file not found: nope.test"));
}

#[test]
fn test_lexer_error_heading() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("bad.test"), "test T { GET \"/x; }").expect("write source");

    let out = testlang(dir.path(), &["bad.test"]);
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("=== LEXER ERROR ==="));
    assert!(stderr.contains("Unterminated string"));
}

#[test]
fn test_missing_arguments_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let out = testlang(dir.path(), &[]);
    assert_eq!(out.status.code(), Some(1));
}
