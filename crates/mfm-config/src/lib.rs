use mfm_syntax::{DEFAULT_NEST_LIMIT, MAX_NEST_LIMIT, ParseOptions};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value in config file at {config_path}: {message}")]
    InvalidValue {
        config_path: PathBuf,
        message: String,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Maximum nesting depth before openers are kept as text. Must be at least 1.
    pub nest_limit: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            nest_limit: DEFAULT_NEST_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// How the CLI prints a parsed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Tree,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config
            .validate()
            .map_err(|message| ConfigError::InvalidValue {
                config_path: config_path.to_path_buf(),
                message,
            })?;

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/mfm");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Parser options derived from the `[parser]` section.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            nest_limit: self.parser.nest_limit,
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !(1..=MAX_NEST_LIMIT).contains(&self.parser.nest_limit) {
            return Err(format!("parser.nest_limit must be between 1 and {MAX_NEST_LIMIT}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        // Should not contain tilde anymore
        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/mfm/config.toml"));
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.parser.nest_limit, 20);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let original = Config {
            parser: ParserConfig { nest_limit: 5 },
            output: OutputConfig {
                format: OutputFormat::Tree,
            },
        };

        let toml_str = toml::to_string(&original).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(original, deserialized);
    }

    #[test]
    fn test_format_is_lowercase_in_toml() {
        let config: Config = toml::from_str("[output]\nformat = \"tree\"\n").unwrap();
        assert_eq!(config.output.format, OutputFormat::Tree);

        let toml_str = toml::to_string(&Config::default()).unwrap();
        assert!(toml_str.contains("format = \"json\""));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[parser]\nnest_limit = 3\n").unwrap();

        assert_eq!(config.parser.nest_limit, 3);
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.parse_options().nest_limit, 3);

        let empty: Config = toml::from_str("").unwrap();
        assert_eq!(empty, Config::default());
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_rejects_zero_nest_limit() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(&temp_dir, "[parser]\nnest_limit = 0\n");

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("nest_limit"));
    }

    #[test]
    fn test_load_rejects_oversized_nest_limit() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(&temp_dir, "[parser]\nnest_limit = 100000\n");

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        assert!(err.to_string().contains("between 1 and 128"));

        let at_ceiling = format!("[parser]\nnest_limit = {MAX_NEST_LIMIT}\n");
        let config_file = write_config(&temp_dir, &at_ceiling);
        let config = Config::load_from_path(&config_file).unwrap().unwrap();
        assert_eq!(config.parser.nest_limit, MAX_NEST_LIMIT);
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(&temp_dir, "[output]\nformat = \"yaml\"\n");

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let test_config = Config {
            parser: ParserConfig { nest_limit: 8 },
            output: OutputConfig {
                format: OutputFormat::Tree,
            },
        };

        // Parent directories are created on save
        test_config.save_to_path(&config_file).unwrap();

        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
