//! Error types.

use thiserror::Error;

/// Error type.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// No song with this name is registered.
    #[error("Unknown song: {0}")]
    UnknownSong(String),

    /// Layer index outside `0..layer_count`.
    #[error("Layer {layer} is out of range for song \"{song}\" ({layer_count} layers)")]
    InvalidLayer {
        song: String,
        layer: usize,
        layer_count: usize,
    },

    /// A song with this name is already registered.
    #[error("Song already registered: {0}")]
    DuplicateSong(String),

    /// Song definition is inconsistent.
    #[error("Invalid song \"{name}\": {reason}")]
    InvalidSong { name: String, reason: String },

    /// Configuration could not be parsed.
    #[error("Config error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

/// Result type.
pub type Result<T> = std::result::Result<T, Error>;
