//! TestLang command-line compiler.
//!
//! Usage: testlang <input.test> [output] [--target junit|rust] [--class-name NAME] [--config PATH]

mod config;

use clap::Parser;
use config::{CliConfig, ConfigError};
use std::path::PathBuf;
use std::process::ExitCode;
use testlang_dsl::{compile_file, CompileError, CompilerOptions, Target};
use tracing_subscriber::EnvFilter;

/// Filter used when neither `RUST_LOG` nor the config file sets one.
const DEFAULT_LOG_FILTER: &str = "warn";

#[derive(Parser, Debug)]
#[command(
    name = "testlang",
    version,
    about = "Compile TestLang .test files into executable HTTP test suites"
)]
struct Cli {
    /// Source file to compile
    input: PathBuf,

    /// Where to write the generated suite (<class name>.java or generated_tests.rs by default)
    output: Option<PathBuf>,

    /// Test framework to generate for: junit or rust
    #[arg(short, long)]
    target: Option<Target>,

    /// Name of the generated JUnit class
    #[arg(long)]
    class_name: Option<String>,

    /// TOML config file (falls back to $TESTLANG_CONFIG)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Flags merged over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Settings {
    input: PathBuf,
    output: PathBuf,
    options: CompilerOptions,
}

impl Settings {
    fn resolve(cli: &Cli, config: &CliConfig) -> Self {
        let mut options = CompilerOptions::default();
        if let Some(target) = cli.target.or(config.target) {
            options.target = target;
        }
        if let Some(class_name) = cli.class_name.as_ref().or(config.class_name.as_ref()) {
            options.class_name = class_name.clone();
        }
        let output = cli
            .output
            .clone()
            .or_else(|| config.output.clone())
            .unwrap_or_else(|| PathBuf::from(options.default_output_file()));

        Self {
            input: cli.input.clone(),
            output,
            options,
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help and --version land here too
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    let config = match CliConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprint!("{}", render_failure(&CliError::from(e)));
            return ExitCode::FAILURE;
        }
    };

    init_tracing(config.log_level.as_deref());

    let settings = Settings::resolve(&cli, &config);
    match run(&settings) {
        Ok(()) => {
            println!("Successfully generated {}", settings.output.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = %e, "compile failed");
            eprint!("{}", render_failure(&e));
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(level: Option<&str>) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.unwrap_or(DEFAULT_LOG_FILTER)));

    // Logs share stderr with diagnostics; stdout only carries the result line.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Compile the input and write the output file. Nothing is written on failure.
fn run(settings: &Settings) -> Result<(), CliError> {
    tracing::info!(
        input = %settings.input.display(),
        target = %settings.options.target,
        "compiling"
    );

    let output = compile_file(&settings.input, &settings.options)?;

    for diagnostic in &output.diagnostics {
        eprintln!("{}", diagnostic);
        tracing::debug!(code = diagnostic.code, "lint reported");
    }

    std::fs::write(&settings.output, &output.source).map_err(|source| CliError::Write {
        path: settings.output.clone(),
        source,
    })?;

    tracing::info!(
        output = %settings.output.display(),
        bytes = output.source.len(),
        "wrote generated suite"
    );
    Ok(())
}

/// Heading, message and hint for a failed run.
fn render_failure(err: &CliError) -> String {
    let (heading, body, hint) = match err {
        CliError::Config(e) => ("CONFIG ERROR", e.to_string(), None),
        CliError::Compile(CompileError::Io { path, source })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            (
                "FILE ERROR",
                format!("Input file not found: {}", path.display()),
                None,
            )
        }
        CliError::Compile(e @ CompileError::Io { .. }) => (
            "IO ERROR",
            format!("Error reading/writing files: {}", e),
            None,
        ),
        CliError::Compile(e) => (e.category(), e.to_string(), hint_for(e)),
        CliError::Write { .. } => (
            "IO ERROR",
            format!("Error reading/writing files: {}", err),
            None,
        ),
    };

    let mut rendered = format!("\n=== {} ===\n{}\n", heading, body);
    if let Some(hint) = hint {
        rendered.push('\n');
        rendered.push_str(hint);
    }
    rendered
}

fn hint_for(err: &CompileError) -> Option<&'static str> {
    match err {
        CompileError::Lex(_) => Some("Please fix the syntax error and try again.\n"),
        CompileError::Parse(_) => Some("Please check your .test file syntax.\n"),
        CompileError::Validation(_) => Some(
            "Please ensure your tests meet the requirements:\n  \
             - At least 1 HTTP request per test\n  \
             - At least 2 assertions per test\n",
        ),
        CompileError::InvalidOptions(_) | CompileError::Io { .. } => None,
    }
}
