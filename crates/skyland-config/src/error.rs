//! Errors raised while locating, reading, or writing `config.ron`.

use std::path::PathBuf;

/// Errors that can occur when loading, saving, or parsing configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The platform exposes no configuration directory and none was given.
    #[error("no configuration directory available; pass --config")]
    NoConfigDir,

    /// Reading `config.ron` failed.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Creating the directory or writing `config.ron` failed.
    #[error("failed to write {path}: {source}")]
    Write {
        /// File or directory that could not be written.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid RON for [`Config`](crate::Config).
    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),

    /// Serializing the in-memory config failed.
    #[error("failed to serialize config: {0}")]
    Serialize(#[source] ron::Error),
}
