use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Sarif,
    Oss,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    Io { path: PathBuf, source: io::Error },
    Toml(#[from] toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, source } => {
                write!(f, "could not read config {}: {}", path.display(), source)
            }
            ConfigError::Toml(err) => write!(f, "failed to parse config: {}", err),
        }
    }
}

/// Conversion options read from a TOML file. Every key is optional so that
/// command-line flags can fill or override them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConvertConfig {
    pub work_dir: Option<PathBuf>,
    pub include_ignores: Option<bool>,
    pub format: Option<Format>,
    pub output: Option<OutputFormat>,
}

impl FromStr for ConvertConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}

impl ConvertConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }

    /// Values set in `other` win over values set here.
    pub fn merge(self, other: ConvertConfig) -> ConvertConfig {
        ConvertConfig {
            work_dir: other.work_dir.or(self.work_dir),
            include_ignores: other.include_ignores.or(self.include_ignores),
            format: other.format.or(self.format),
            output: other.output.or(self.output),
        }
    }

    pub fn include_ignores(&self) -> bool {
        self.include_ignores.unwrap_or(false)
    }

    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or_default()
    }
}
