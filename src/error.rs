use thiserror::Error;

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("Package inspection failed: {0}")]
    InspectionFailed(String),

    #[error("Interactive prompt failed: {0}")]
    PromptFailed(String),

    #[error("Failed to spawn '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, UpdateError>;
