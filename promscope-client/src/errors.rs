use thiserror::Error;

pub type Result<T> = std::result::Result<T, PromscopeError>;

#[derive(Debug, Error)]
pub enum PromscopeError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("prometheus api error: {error_type}: {message}")]
    Api { error_type: String, message: String },

    #[error("unable to decode the response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("unexpected result type: {0}")]
    UnexpectedResultType(String),

    #[error("unable to perform operation: {0}")]
    Unrecoverable(String),
}
