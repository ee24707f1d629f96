//! Configuration loading for the TestLang CLI.
//!
//! Every field is optional; command-line flags override whatever the file sets.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use testlang_dsl::{is_identifier, Target};
use tracing_subscriber::EnvFilter;

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "TESTLANG_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    pub target: Option<Target>,
    pub class_name: Option<String>,
    pub output: Option<PathBuf>,
    /// An `EnvFilter` directive, e.g. `debug` or `testlang_dsl=trace`.
    pub log_level: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl CliConfig {
    /// Load from `explicit`, else from `$TESTLANG_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = explicit.map(Path::to_path_buf).or_else(config_path_from_env);
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let config = Self::from_path(&path)?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config file");
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(class_name) = &self.class_name {
            if !is_identifier(class_name) {
                return Err(ConfigError::InvalidValue {
                    field: "class_name",
                    reason: format!("'{}' is not a valid identifier", class_name),
                });
            }
        }
        if let Some(output) = &self.output {
            if output.as_os_str().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "output",
                    reason: "must not be empty".to_string(),
                });
            }
        }
        if let Some(level) = &self.log_level {
            if level.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "log_level",
                    reason: "must not be empty".to_string(),
                });
            }
            if let Err(e) = EnvFilter::try_new(level) {
                return Err(ConfigError::InvalidValue {
                    field: "log_level",
                    reason: e.to_string(),
                });
            }
        }
        Ok(())
    }
}

fn config_path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV).ok().map(PathBuf::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_is_all_defaults() -> Result<(), ConfigError> {
        let config = CliConfig::from_toml("")?;
        assert_eq!(config, CliConfig::default());
        config.validate()
    }

    #[test]
    fn test_full_config_parses() -> Result<(), ConfigError> {
        let config = CliConfig::from_toml(
            r#"
target = "rust"
class_name = "ApiSuite"
output = "tests/api.rs"
log_level = "testlang_dsl=debug"
"#,
        )?;
        assert_eq!(config.target, Some(Target::Rust));
        assert_eq!(config.class_name.as_deref(), Some("ApiSuite"));
        assert_eq!(config.output, Some(PathBuf::from("tests/api.rs")));
        config.validate()
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = CliConfig::from_toml("colour = \"blue\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_target_rejected() {
        let err = CliConfig::from_toml("target = \"cobol\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_class = CliConfig {
            class_name: Some("Not A Class".to_string()),
            ..CliConfig::default()
        };
        assert!(matches!(
            bad_class.validate(),
            Err(ConfigError::InvalidValue { field: "class_name", .. })
        ));

        let empty_output = CliConfig {
            output: Some(PathBuf::new()),
            ..CliConfig::default()
        };
        assert!(matches!(
            empty_output.validate(),
            Err(ConfigError::InvalidValue { field: "output", .. })
        ));

        let blank_level = CliConfig {
            log_level: Some("  ".to_string()),
            ..CliConfig::default()
        };
        assert!(matches!(
            blank_level.validate(),
            Err(ConfigError::InvalidValue { field: "log_level", .. })
        ));
    }

    #[test]
    fn test_from_path_reads_file() -> Result<(), ConfigError> {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("testlang.toml");
        std::fs::write(&path, "class_name = \"FromFile\"\n").expect("write config");

        let config = CliConfig::load(Some(&path))?;
        assert_eq!(config.class_name.as_deref(), Some("FromFile"));
        Ok(())
    }

    #[test]
    fn test_missing_explicit_file_is_io_error() {
        let err = CliConfig::load(Some(Path::new("/no/such/testlang.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("testlang.toml"));
    }
}
