use thiserror::Error;

/// Error types for configuration operations
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Unknown graph referenced by traversal source {alias}: {graph}")]
    UnknownGraph {
        /// The traversal-source alias holding the dangling reference.
        alias: String,
        /// The graph name that is not configured.
        graph: String,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
