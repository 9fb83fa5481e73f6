use std::time::Duration;

use rand::{Rng, distr::Alphanumeric};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use crate::{Res, error::MusyncError, types::ProviderKind};

pub const STATE_LENGTH: usize = 16;
pub const SESSION_ID_LENGTH: usize = 32;

const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Random alphanumeric string of `length` characters.
pub fn generate_random_string(length: usize) -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Fresh CSRF `state` for an authorization request.
pub fn generate_state() -> String {
    generate_random_string(STATE_LENGTH)
}

pub fn generate_session_id() -> String {
    generate_random_string(SESSION_ID_LENGTH)
}

/// HTTP client used for every provider call. Every request is bounded by
/// `timeout`.
pub fn build_http_client(timeout: Duration) -> Res<Client> {
    let client = Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(timeout))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Passes 2xx responses through and turns everything else into the matching
/// [`MusyncError`], keeping the provider's body untouched.
pub async fn check_response(provider: ProviderKind, response: Response) -> Res<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!(%provider, %status, error = %e, "could not read error body");
            String::new()
        }
    };
    Err(MusyncError::from_status(provider, status, body))
}

/// Reads the body as JSON. Malformed bodies become [`MusyncError::Decode`].
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Res<T> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| MusyncError::Decode(e.to_string()))
}
