use thiserror::Error;

/// Fatal failure kinds. Every variant maps to exit code 2; detected
/// conflicts are not errors (the driver turns them into exit code 1).
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration. Raised before any network call.
    #[error("configuration error: {0}")]
    Config(String),

    /// The token was rejected or the project is not visible to it.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Network-level failure talking to GitLab (DNS, TLS, timeout).
    #[error("GitLab request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// GitLab answered with a non-success status.
    #[error("GitLab returned {status} for {context}: {message}")]
    Api {
        status: u16,
        context: String,
        message: String,
    },

    /// GitLab answered 2xx but the payload did not have the expected shape.
    #[error("unexpected GitLab payload for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
