use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::error::MusyncError;

impl IntoResponse for MusyncError {
    fn into_response(self) -> Response {
        let status = match &self {
            // the provider's body goes out untouched
            MusyncError::Api { body, .. } => {
                return (StatusCode::BAD_GATEWAY, body.clone()).into_response();
            }
            MusyncError::CsrfMismatch
            | MusyncError::CallbackRejected(_)
            | MusyncError::Validation { .. } => StatusCode::BAD_REQUEST,
            MusyncError::Unauthorized(_)
            | MusyncError::NotAuthenticated(_)
            | MusyncError::NoRefreshToken => StatusCode::UNAUTHORIZED,
            MusyncError::TokenExchange(_) | MusyncError::Http(_) => StatusCode::BAD_GATEWAY,
            MusyncError::Cancelled => StatusCode::GATEWAY_TIMEOUT,
            MusyncError::Config(_) | MusyncError::Decode(_) | MusyncError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, self.to_string()).into_response()
    }
}
