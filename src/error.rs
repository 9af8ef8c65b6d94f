use thiserror::Error;

/// Invalid server configuration. Fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid KEYCLOAK_URL {value:?}: {reason}")]
    InvalidUrl { value: String, reason: String },
}

/// Failure talking to the Keycloak admin API, including authentication.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Keycloak request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Keycloak returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Unexpected Keycloak response: {0}")]
    Decode(String),

    #[error("Keycloak did not return the id of the created user")]
    MissingLocation,
}

pub type AdminResult<T> = Result<T, AdminError>;

/// Failures that escape a tool call instead of becoming an error-flagged result.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Remote(#[from] AdminError),
}
