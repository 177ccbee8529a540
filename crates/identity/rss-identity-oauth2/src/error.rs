//! OAuth2 error types.

use thiserror::Error;

pub type OAuth2Result<T> = Result<T, OAuth2Error>;

#[derive(Debug, Error)]
pub enum OAuth2Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Non-200 answer from the token or applications endpoint.
    #[error("Identity manager returned status {status}: {body}")]
    UpstreamError { status: u16, body: String },

    /// Non-200 answer from the userinfo endpoint.
    #[error("Authentication failed with status {status}: {body}")]
    AuthError { status: u16, body: String },

    #[error("The connection with the identity manager has failed: {0}")]
    IdmUnreachable(#[source] reqwest::Error),

    #[error("Login not allowed: user has no role in this restricted area")]
    LoginNotAllowed,

    #[error("Insufficient permission: client application is not registered for this user")]
    InsufficientPermission,

    #[error("{context}: {source}")]
    TransportFailure {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid identity manager response: {0}")]
    InvalidResponse(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("URL parsing error: {0}")]
    UrlError(#[from] url::ParseError),
}

impl OAuth2Error {
    /// True for failures raised while validating a user token against the IdM.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            OAuth2Error::AuthError { .. } | OAuth2Error::IdmUnreachable(_)
        )
    }
}
