//! OAuth2 authorization-code flow, one [`Authenticator`] per provider and user.
//!
//! ## Flow
//!
//! ```text
//! Unauthenticated --generate_auth_url--> PendingCallback
//! PendingCallback --validate_state + exchange_code--> Authenticated
//! Authenticated   --API answers 401--> Authenticated (stale)
//! stale           --refresh ok--> Authenticated
//! stale           --refresh rejected--> Unauthenticated
//! ```
//!
//! Expiry is discovered lazily: [`Authenticator::is_authorized`] only checks
//! that an access token exists.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    Res,
    config::ProviderConfig,
    error::MusyncError,
    providers::Authorize,
    types::{Credentials, ProviderKind},
    utils,
};

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// How a provider expects the client to authenticate to its token endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAuthStyle {
    /// `Authorization: Basic base64(client_id:client_secret)` (Spotify).
    Basic,
    /// `client_id` and `client_secret` as form fields (Google).
    Body,
}

/// Per-provider authorization state of one user.
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub provider: ProviderKind,
    pub csrf_state: Option<String>,
    pub credentials: Option<Credentials>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    refresh_token: Option<String>,
}

pub struct Authenticator {
    config: ProviderConfig,
    http: Client,
    session: AuthSession,
}

impl Authenticator {
    pub fn new(config: ProviderConfig, http: Client) -> Self {
        let session = AuthSession {
            provider: config.provider,
            csrf_state: Some(utils::generate_state()),
            credentials: None,
        };

        Authenticator {
            config,
            http,
            session,
        }
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    /// POSTs `params` to the token endpoint, authenticating the client the
    /// way the provider expects.
    async fn token_request(&self, params: &[(&str, &str)]) -> Res<TokenResponse> {
        let mut form: Vec<(&str, &str)> = params.to_vec();
        let mut request = self.http.post(&self.config.token_url);

        match self.config.token_auth {
            TokenAuthStyle::Basic => {
                request =
                    request.basic_auth(&self.config.client_id, Some(&self.config.client_secret));
            }
            TokenAuthStyle::Body => {
                form.push(("client_id", self.config.client_id.as_str()));
                form.push(("client_secret", self.config.client_secret.as_str()));
            }
        }

        tracing::debug!(provider = %self.config.provider, url = %self.config.token_url, "token request");
        let response = request.form(&form).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(MusyncError::TokenExchange(format!("{status}: {body}")));
        }

        let token: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| MusyncError::TokenExchange(format!("malformed token response: {e}")))?;

        if token.access_token.is_empty() {
            return Err(MusyncError::TokenExchange(
                "token response carried an empty access token".to_string(),
            ));
        }

        Ok(token)
    }
}

fn expires_at(expires_in: Option<i64>) -> chrono::DateTime<Utc> {
    Utc::now() + Duration::seconds(expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS))
}

#[async_trait]
impl Authorize for Authenticator {
    fn provider(&self) -> ProviderKind {
        self.config.provider
    }

    fn generate_auth_url(&mut self) -> Res<String> {
        let state = utils::generate_state();
        let scope = self.config.scopes.join(" ");

        let url = Url::parse_with_params(
            &self.config.auth_url,
            &[
                ("client_id", self.config.client_id.as_str()),
                ("redirect_uri", self.config.redirect_uri.as_str()),
                ("response_type", "code"),
                ("scope", scope.as_str()),
                ("access_type", "offline"),
                ("state", state.as_str()),
            ],
        )
        .map_err(|e| MusyncError::Config(format!("invalid authorization URL: {e}")))?;

        self.session.csrf_state = Some(state);
        Ok(url.into())
    }

    fn validate_state(&mut self, received: &str) -> bool {
        let matches = self.session.csrf_state.as_deref() == Some(received);
        if matches {
            self.session.csrf_state = None;
        }
        matches
    }

    async fn exchange_code(&mut self, code: &str) -> Res<Credentials> {
        let token = self
            .token_request(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .await?;

        let credentials = Credentials {
            access_token: token.access_token,
            token_type: token.token_type.unwrap_or_else(|| "Bearer".to_string()),
            refresh_token: token.refresh_token.filter(|t| !t.is_empty()),
            expires_at: expires_at(token.expires_in),
        };

        self.session.credentials = Some(credentials.clone());
        Ok(credentials)
    }

    fn is_authorized(&self) -> bool {
        self.session
            .credentials
            .as_ref()
            .is_some_and(|c| !c.access_token.is_empty())
    }

    fn credentials(&self) -> Option<&Credentials> {
        self.session.credentials.as_ref()
    }

    async fn refresh(&mut self) -> Res<()> {
        let Some(refresh_token) = self
            .session
            .credentials
            .as_ref()
            .and_then(|c| c.refresh_token.clone())
        else {
            return Err(MusyncError::NoRefreshToken);
        };

        let token = match self
            .token_request(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token.as_str()),
            ])
            .await
        {
            Ok(token) => token,
            Err(e @ MusyncError::TokenExchange(_)) => {
                tracing::warn!(provider = %self.config.provider, error = %e, "refresh rejected, signing out");
                self.session.credentials = None;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        if let Some(credentials) = self.session.credentials.as_mut() {
            credentials.access_token = token.access_token;
            if let Some(token_type) = token.token_type {
                credentials.token_type = token_type;
            }
            credentials.expires_at = expires_at(token.expires_in);
            // providers that rotate refresh tokens send a new one
            if let Some(rotated) = token.refresh_token.filter(|t| !t.is_empty()) {
                credentials.refresh_token = Some(rotated);
            }
        }

        tracing::info!(provider = %self.config.provider, "access token refreshed");
        Ok(())
    }
}
