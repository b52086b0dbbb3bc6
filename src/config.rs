use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::{fs, io};
use thiserror::Error;

pub const CONFIG_ENV_VAR: &str = "SLISP_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "slisp.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Vi,
    Emacs,
}

/// Settings for the interactive REPL, read from `slisp.toml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ReplConfig {
    pub prompt: String,
    pub history_file: PathBuf,
    pub save_history: bool,
    pub edit_mode: EditMode,
    pub log_level: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        ReplConfig {
            prompt: "slisp> ".to_string(),
            history_file: PathBuf::from("slisp_history.txt"),
            save_history: true,
            edit_mode: EditMode::default(),
            log_level: "warn".to_string(),
        }
    }
}

impl ReplConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(input)?)
    }

    /// Loads `path`; a missing file gives the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => ReplConfig::from_toml_str(&contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(ReplConfig::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// The file named by `SLISP_CONFIG`, else `slisp.toml`.
    pub fn default_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
