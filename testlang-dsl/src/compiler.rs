//! Compiler entry points - source text or file in, generated suite out.

use crate::codegen::{CodeGenerator, Target};
use crate::error::{CompileError, CompileResult};
use crate::parser::parse;
use crate::validator::Diagnostic;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Class name of the generated JUnit suite when none is configured.
pub const DEFAULT_CLASS_NAME: &str = "GeneratedTests";

/// Output file of the Rust target when none is configured.
pub const DEFAULT_RUST_OUTPUT: &str = "generated_tests.rs";

// ============================================================================
// OPTIONS
// ============================================================================

/// Knobs for a single compilation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    pub target: Target,
    /// Name of the emitted JUnit class. Ignored by the Rust target.
    pub class_name: String,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            target: Target::default(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }
}

impl CompilerOptions {
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    /// File name used when the caller does not pick one. A public Java class
    /// must live in `<ClassName>.java`.
    pub fn default_output_file(&self) -> String {
        match self.target {
            Target::Junit => format!("{}.java", self.class_name),
            Target::Rust => DEFAULT_RUST_OUTPUT.to_string(),
        }
    }

    /// Reject a class name that is not a plain identifier.
    pub fn validate(&self) -> Result<(), String> {
        if is_identifier(&self.class_name) {
            Ok(())
        } else {
            Err(format!(
                "class name '{}' is not a valid identifier",
                self.class_name
            ))
        }
    }
}

/// `[A-Za-z_][A-Za-z0-9_]*`, the identifier shape shared by the DSL and both targets.
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Generated source plus the lints raised while validating it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOutput {
    pub source: String,
    pub diagnostics: Vec<Diagnostic>,
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Run the whole pipeline over in-memory source.
pub fn compile_source(source: &str, options: &CompilerOptions) -> CompileResult<CompileOutput> {
    options.validate().map_err(CompileError::InvalidOptions)?;
    let program = parse(source)?;
    let output = CodeGenerator::new(&program)
        .with_target(options.target)
        .with_class_name(options.class_name.as_str())
        .generate()?;

    tracing::debug!(
        tests = program.tests.len(),
        warnings = output.diagnostics.len(),
        "compiled source"
    );
    Ok(output)
}

/// Read a `.test` file and compile it.
pub fn compile_file(path: impl AsRef<Path>, options: &CompilerOptions) -> CompileResult<CompileOutput> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| CompileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(path = %path.display(), bytes = source.len(), "read source file");
    compile_source(&source, options)
}
