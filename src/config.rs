//! @ai:module:intent Configuration file model for outline processing
//! @ai:module:layer infrastructure
//! @ai:module:public_api Config, OutputConfig
//! @ai:module:depends_on parser, writer, error

use crate::error::{Error, Result};
use crate::parser::ParserConfig;
use crate::writer::{create_writer, Template};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default file name looked up by the CLI.
pub const DEFAULT_CONFIG_FILE: &str = "drcop.toml";

/// @ai:intent Complete configuration; every section falls back to defaults
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub parser: ParserConfig,
    #[serde(default)]
    pub template: Template,
    #[serde(default)]
    pub output: OutputConfig,
}

/// @ai:intent Selects the code generator
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutputConfig {
    #[serde(default = "default_backend")]
    pub backend: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            backend: default_backend(),
        }
    }
}

fn default_backend() -> String {
    "python".to_string()
}

impl Config {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @ai:intent Load the given file, or use defaults when no file is given
    /// @ai:effects fs:read
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                tracing::info!("no configuration file given, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// @ai:intent Reject settings the parser or writer cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.parser.indent_size == 0 {
            return Err(Error::InvalidConfig(
                "parser.indent_size must be at least 1".to_string(),
            ));
        }
        create_writer(&self.output.backend, &self.template).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.parser.indent_size, 4);
        assert_eq!(config.output.backend, "python");
        assert_eq!(config.template.imports, vec!["from math import sqrt".to_string()]);
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config: Config = toml::from_str(
            r#"
[parser]
indent_size = 2

[template]
project = "1"
student = "Boaty McBoatface"
"#,
        )
        .unwrap();

        assert_eq!(config.parser.indent_size, 2);
        assert_eq!(config.parser.recognized_types.len(), 6);
        assert_eq!(config.template.project, "1");
        assert_eq!(config.template.section, "__");
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);

        let mut config = Config::default();
        config.template.instructor = "Mike Ryu".to_string();
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");

        std::fs::write(&path, "[parser]\nindent_size = 0\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));

        std::fs::write(&path, "[output]\nbackend = \"java\"\n").unwrap();
        assert!(matches!(Config::load(&path), Err(Error::UnknownBackend(_))));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let result = Config::load(Path::new("/nonexistent/drcop.toml"));
        assert!(matches!(result, Err(Error::FileRead { .. })));
    }
}
