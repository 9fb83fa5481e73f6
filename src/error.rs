use reqwest::StatusCode;
use thiserror::Error;

use crate::types::ProviderKind;

/// Everything that can go wrong while linking accounts or talking to a
/// provider.
///
/// Callers decide between "send the user back to login" and "show an error"
/// through [`MusyncError::requires_reauth`], never by looking at messages.
#[derive(Error, Debug)]
pub enum MusyncError {
    /// Missing or invalid process configuration. Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// The `state` returned to the callback is not the one we issued.
    #[error("state mismatch")]
    CsrfMismatch,

    /// The provider redirected back without a code (user denied consent,
    /// or the parameter is simply missing).
    #[error("authorization rejected: {0}")]
    CallbackRejected(String),

    /// The token endpoint refused a code exchange or a refresh, or answered
    /// with something we could not read.
    #[error("token exchange failed: {0}")]
    TokenExchange(String),

    /// The provider answered 401 to an API call.
    #[error("unauthorized: access token rejected by {0}")]
    Unauthorized(ProviderKind),

    /// No credentials have been obtained for this provider yet.
    #[error("not authenticated with {0}")]
    NotAuthenticated(ProviderKind),

    #[error("no refresh token available")]
    NoRefreshToken,

    /// Non-2xx provider answer; `body` is the provider's raw error body.
    #[error("API error ({status}): {body}")]
    Api { status: StatusCode, body: String },

    #[error("failed to decode provider response: {0}")]
    Decode(String),

    #[error("missing required field: {field}")]
    Validation { field: &'static str },

    #[error("request cancelled")]
    Cancelled,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MusyncError {
    /// Maps a non-2xx provider status to the matching error kind.
    pub fn from_status(provider: ProviderKind, status: StatusCode, body: String) -> Self {
        if status == StatusCode::UNAUTHORIZED {
            Self::Unauthorized(provider)
        } else {
            Self::Api { status, body }
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }

    /// True when the only way forward is a fresh authorization round trip.
    pub fn requires_reauth(&self) -> bool {
        matches!(
            self,
            Self::Unauthorized(_)
                | Self::NotAuthenticated(_)
                | Self::NoRefreshToken
                | Self::TokenExchange(_)
        )
    }
}

impl From<serde_json::Error> for MusyncError {
    fn from(err: serde_json::Error) -> Self {
        MusyncError::Decode(err.to_string())
    }
}
