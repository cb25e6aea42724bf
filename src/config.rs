use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file looked up in the current directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "ng2web.toml";

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub generate: GenerateConfig,
    pub log: LogConfig,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
}

/// Generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub parallel: bool,
    pub progress: bool,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            progress: true,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file, or defaults if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output: Option<PathBuf>,
        sequential: bool,
        quiet: bool,
        verbose: bool,
    ) {
        if let Some(out) = output {
            self.output.directory = out;
        }

        if sequential {
            self.generate.parallel = false;
        }

        if quiet {
            self.generate.progress = false;
            self.log.level = "warn".to_string();
        } else if verbose {
            self.log.level = "debug".to_string();
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !LOG_LEVELS.contains(&self.log.level.as_str()) {
            return Err(Error::config_validation(format!(
                "log level must be one of {}, got {:?}",
                LOG_LEVELS.join(", "),
                self.log.level
            )));
        }

        if self.output.directory.as_os_str().is_empty() {
            return Err(Error::config_validation("output directory cannot be empty"));
        }

        Ok(())
    }
}
