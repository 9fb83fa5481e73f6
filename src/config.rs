//! Configuration management for musync.
//!
//! Values come from environment variables, optionally seeded from `.env`
//! files. Lookup order:
//! 1. Environment variables already set in the process (highest priority)
//! 2. `.env` in the local data directory (`musync/.env`)
//! 3. `.env` in the current working directory
//! 4. Built-in defaults for endpoints, server address and timeouts
//!
//! Client ids, secrets and redirect URIs have no default; [`AppConfig::from_env`]
//! fails with [`MusyncError::Config`] naming the first missing variable.

use std::{env, path::PathBuf, time::Duration};

use crate::{Res, auth::TokenAuthStyle, error::MusyncError, types::ProviderKind};

pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REQUEST_DEADLINE_SECS: u64 = 30;

const SPOTIFY_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const SPOTIFY_API_URL: &str = "https://api.spotify.com/v1";
const SPOTIFY_SCOPES: &[&str] = &[
    "playlist-read-private",
    "playlist-modify-private",
    "playlist-read-collaborative",
    "user-library-read",
];

const YOUTUBE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/auth";
const YOUTUBE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const YOUTUBE_SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/youtube.readonly",
    "https://www.googleapis.com/auth/youtube",
];

/// Loads environment variables from `.env` files.
///
/// Creates `musync/` in the platform-specific local data directory if needed
/// and loads `musync/.env` from it, then `.env` from the working directory.
/// Neither file has to exist: variables may just as well be set by the shell.
///
/// # Directory Structure
///
/// - Linux: `~/.local/share/musync/.env`
/// - macOS: `~/Library/Application Support/musync/.env`
/// - Windows: `%LOCALAPPDATA%/musync/.env`
///
/// # Errors
///
/// Returns [`MusyncError::Io`] if the data directory cannot be created and
/// [`MusyncError::Config`] if a `.env` file exists but cannot be parsed.
pub async fn load_env() -> Res<()> {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("musync/.env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent).await?;
    }

    if path.is_file() {
        dotenv::from_path(&path).map_err(|e| MusyncError::Config(e.to_string()))?;
    }

    match dotenv::dotenv() {
        Ok(_) => Ok(()),
        Err(dotenv::Error::Io(_)) => Ok(()),
        Err(e) => Err(MusyncError::Config(e.to_string())),
    }
}

/// OAuth client and endpoint settings for one provider.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub token_auth: TokenAuthStyle,
}

impl ProviderConfig {
    /// Reads the configuration of `provider` from the environment.
    ///
    /// Spotify authenticates to its token endpoint with HTTP Basic, Google
    /// expects the client credentials in the form body.
    pub fn from_env(provider: ProviderKind) -> Res<Self> {
        match provider {
            ProviderKind::Spotify => Ok(ProviderConfig {
                provider,
                client_id: required("SPOTIFY_CLIENT_ID")?,
                client_secret: required("SPOTIFY_CLIENT_SECRET")?,
                redirect_uri: required("SPOTIFY_REDIRECT_URI")?,
                scopes: SPOTIFY_SCOPES.iter().map(|s| s.to_string()).collect(),
                auth_url: optional("SPOTIFY_AUTH_URL", SPOTIFY_AUTH_URL),
                token_url: optional("SPOTIFY_TOKEN_URL", SPOTIFY_TOKEN_URL),
                api_url: optional("SPOTIFY_API_URL", SPOTIFY_API_URL),
                token_auth: TokenAuthStyle::Basic,
            }),
            ProviderKind::YouTube => Ok(ProviderConfig {
                provider,
                client_id: required("YOUTUBE_CLIENT_ID")?,
                client_secret: required("YOUTUBE_CLIENT_SECRET")?,
                redirect_uri: required("YOUTUBE_REDIRECT_URI")?,
                scopes: YOUTUBE_SCOPES.iter().map(|s| s.to_string()).collect(),
                auth_url: optional("YOUTUBE_AUTH_URL", YOUTUBE_AUTH_URL),
                token_url: optional("YOUTUBE_TOKEN_URL", YOUTUBE_TOKEN_URL),
                api_url: optional("YOUTUBE_API_URL", YOUTUBE_API_URL),
                token_auth: TokenAuthStyle::Body,
            }),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub spotify: ProviderConfig,
    pub youtube: ProviderConfig,
    pub server_addr: String,
    /// Per-call bound for provider requests.
    pub http_timeout: Duration,
    /// Bound for one front door request, refresh and retry included.
    pub request_deadline: Duration,
}

impl AppConfig {
    /// Reads and validates the whole configuration.
    ///
    /// # Errors
    ///
    /// [`MusyncError::Config`] when a required variable is missing or empty,
    /// or when `MUSYNC_HTTP_TIMEOUT_SECS` or `MUSYNC_REQUEST_DEADLINE_SECS`
    /// is not a positive integer.
    pub fn from_env() -> Res<Self> {
        let timeout_secs = positive_secs("MUSYNC_HTTP_TIMEOUT_SECS", DEFAULT_HTTP_TIMEOUT_SECS)?;
        let deadline_secs =
            positive_secs("MUSYNC_REQUEST_DEADLINE_SECS", DEFAULT_REQUEST_DEADLINE_SECS)?;

        Ok(AppConfig {
            spotify: ProviderConfig::from_env(ProviderKind::Spotify)?,
            youtube: ProviderConfig::from_env(ProviderKind::YouTube)?,
            server_addr: optional("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS),
            http_timeout: Duration::from_secs(timeout_secs),
            request_deadline: Duration::from_secs(deadline_secs),
        })
    }

    pub fn provider(&self, kind: ProviderKind) -> &ProviderConfig {
        match kind {
            ProviderKind::Spotify => &self.spotify,
            ProviderKind::YouTube => &self.youtube,
        }
    }
}

fn required(name: &str) -> Res<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(MusyncError::Config(format!("{name} must be set"))),
    }
}

fn optional(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn positive_secs(name: &str, default: u64) -> Res<u64> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|secs| *secs > 0)
            .ok_or_else(|| MusyncError::Config(format!("invalid {name}: {raw}"))),
        Err(_) => Ok(default),
    }
}
