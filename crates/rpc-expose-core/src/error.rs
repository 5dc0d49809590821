// crates/rpc-expose-core/src/error.rs

use thiserror::Error;

/// Definition-time errors for rpc-expose.
///
/// These surface only while resources are being built or loaded. The
/// metadata accessors in [`crate::info`] never return them.
#[derive(Debug, Error)]
pub enum ExposeError {
    /// An identifier (resource, procedure or action name) was empty.
    #[error("Empty identifier: {0}")]
    EmptyIdentifier(String),

    /// Two procedures on the same resource share an external name.
    #[error("Duplicate procedure `{name}` on resource `{resource}`")]
    DuplicateProcedure { resource: String, name: String },

    /// Two resources in a domain share a name or external alias.
    #[error("Duplicate resource: {0}")]
    DuplicateResource(String),

    /// Manifest or configuration content is structurally invalid.
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem error while reading a manifest or config file.
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<std::io::Error> for ExposeError {
    fn from(e: std::io::Error) -> Self {
        ExposeError::Io(e.to_string())
    }
}

impl From<toml::de::Error> for ExposeError {
    fn from(e: toml::de::Error) -> Self {
        ExposeError::Config(e.to_string())
    }
}

impl From<serde_json::Error> for ExposeError {
    fn from(e: serde_json::Error) -> Self {
        ExposeError::Serialization(e.to_string())
    }
}
