use std::path::{Path, PathBuf};
use thiserror::Error;

/// ng2web error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    ConfigValidation(String),

    #[error("Guide not found: {0}")]
    SourceNotFound(PathBuf),

    #[error("Not a valid guide: {path}: {message}")]
    SourceFormat { path: PathBuf, message: String },

    #[error("Invalid guide: {0}")]
    InvalidGuide(String),

    #[error("Cannot write {path}: {source}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to render template {template}: {source}")]
    Template {
        template: String,
        #[source]
        source: tera::Error,
    },
}

/// Result type alias for ng2web operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a config validation error
    pub fn config_validation(msg: impl Into<String>) -> Self {
        Error::ConfigValidation(msg.into())
    }

    /// Create a source format error
    pub fn source_format(path: &Path, message: impl Into<String>) -> Self {
        Error::SourceFormat {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    /// Create an output error for the given target
    pub fn output(path: &Path, source: std::io::Error) -> Self {
        Error::OutputUnwritable {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Create a template error
    pub fn template(template: impl Into<String>, source: tera::Error) -> Self {
        Error::Template {
            template: template.into(),
            source,
        }
    }
}
