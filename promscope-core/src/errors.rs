use thiserror::Error;

/// Failure to resolve the caller's tenant identity.
///
/// Raised by identity providers only; the scoping controller catches it at
/// construction time and degrades to pass-through instead of propagating.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("no usable authentication credentials are configured")]
    MissingCredentials,

    #[error("unable to resolve the project id: {0}")]
    ResolutionFailed(String),
}
