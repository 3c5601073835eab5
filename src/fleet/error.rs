use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unauthorized: the auth token was rejected")]
    Unauthorized,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum VersionError {
    #[error("Device has no supervisor version")]
    MissingSupervisor,

    #[error("Invalid supervisor version: {0}")]
    InvalidSupervisor(String),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write report line {line:?}: {source}")]
    Write {
        line: String,
        source: std::io::Error,
    },
}

/// Failure of a whole scoring run
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Version(#[from] VersionError),

    #[error(transparent)]
    Sink(#[from] SinkError),
}
