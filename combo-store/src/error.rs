//! Storage errors

use std::path::PathBuf;

use combo_codec::CodecError;
use combo_core::config::ConfigError;
use combo_hal::FlashError;

/// Result alias for storage operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from host-side persistence
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("storage error: {0}")]
    Flash(#[from] FlashError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML render error: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] postcard::Error),
}
