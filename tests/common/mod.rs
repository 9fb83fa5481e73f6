#![allow(dead_code)]

use std::time::Duration;

use chrono::Utc;
use musync::{
    auth::TokenAuthStyle,
    config::{AppConfig, ProviderConfig},
    types::{Credentials, Playlist, ProviderKind},
};

pub const CLIENT_ID: &str = "client-id";
pub const CLIENT_SECRET: &str = "client-secret";
/// base64("client-id:client-secret")
pub const BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

/// Provider configuration with every endpoint pointing at `base`.
pub fn provider_config(provider: ProviderKind, base: &str) -> ProviderConfig {
    let (token_auth, prefix) = match provider {
        ProviderKind::Spotify => (TokenAuthStyle::Basic, "spotify"),
        ProviderKind::YouTube => (TokenAuthStyle::Body, "youtube"),
    };

    ProviderConfig {
        provider,
        client_id: CLIENT_ID.to_string(),
        client_secret: CLIENT_SECRET.to_string(),
        redirect_uri: format!("http://127.0.0.1:8080/callback/{prefix}"),
        scopes: vec!["scope-a".to_string(), "scope-b".to_string()],
        auth_url: format!("{base}/{prefix}/authorize"),
        token_url: format!("{base}/{prefix}/token"),
        api_url: format!("{base}/{prefix}/api"),
        token_auth,
    }
}

pub fn app_config(base: &str) -> AppConfig {
    AppConfig {
        spotify: provider_config(ProviderKind::Spotify, base),
        youtube: provider_config(ProviderKind::YouTube, base),
        server_addr: "127.0.0.1:0".to_string(),
        http_timeout: Duration::from_secs(5),
        request_deadline: Duration::from_secs(30),
    }
}

pub fn credentials(access_token: &str, refresh_token: Option<&str>) -> Credentials {
    Credentials {
        access_token: access_token.to_string(),
        token_type: "Bearer".to_string(),
        refresh_token: refresh_token.map(str::to_string),
        expires_at: Utc::now() + chrono::Duration::hours(1),
    }
}

pub fn playlist(id: &str) -> Playlist {
    Playlist {
        id: id.to_string(),
        name: format!("Playlist {id}"),
        description: String::new(),
        owner: "owner".to_string(),
        track_count: 1,
        image_url: None,
        external_url: None,
    }
}
