use std::time::Duration;

use musync::{
    auth::TokenAuthStyle,
    config::{AppConfig, DEFAULT_SERVER_ADDRESS},
    error::MusyncError,
    types::ProviderKind,
};

const REQUIRED: [&str; 6] = [
    "SPOTIFY_CLIENT_ID",
    "SPOTIFY_CLIENT_SECRET",
    "SPOTIFY_REDIRECT_URI",
    "YOUTUBE_CLIENT_ID",
    "YOUTUBE_CLIENT_SECRET",
    "YOUTUBE_REDIRECT_URI",
];

fn set(name: &str, value: &str) {
    // SAFETY: only this test touches the process environment
    unsafe { std::env::set_var(name, value) }
}

fn unset(name: &str) {
    // SAFETY: see `set`
    unsafe { std::env::remove_var(name) }
}

// Environment is process wide, so every case runs in this one test.
#[test]
fn test_app_config_from_env() {
    for name in REQUIRED {
        set(name, &format!("{}-value", name.to_lowercase()));
    }
    for name in [
        "SERVER_ADDRESS",
        "MUSYNC_HTTP_TIMEOUT_SECS",
        "MUSYNC_REQUEST_DEADLINE_SECS",
        "SPOTIFY_API_URL",
    ] {
        unset(name);
    }

    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.server_addr, DEFAULT_SERVER_ADDRESS);
    assert_eq!(config.http_timeout, Duration::from_secs(10));
    assert_eq!(config.request_deadline, Duration::from_secs(30));
    assert_eq!(config.spotify.client_id, "spotify_client_id-value");
    assert_eq!(config.spotify.token_auth, TokenAuthStyle::Basic);
    assert_eq!(config.youtube.token_auth, TokenAuthStyle::Body);
    assert_eq!(config.spotify.api_url, "https://api.spotify.com/v1");
    assert_eq!(
        config.provider(ProviderKind::YouTube).token_url,
        "https://oauth2.googleapis.com/token"
    );
    assert!(
        config
            .youtube
            .scopes
            .iter()
            .any(|scope| scope.ends_with("/auth/youtube.readonly"))
    );

    set("SPOTIFY_API_URL", "http://localhost:9000/v1");
    set("MUSYNC_HTTP_TIMEOUT_SECS", "3");
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.spotify.api_url, "http://localhost:9000/v1");
    assert_eq!(config.http_timeout, Duration::from_secs(3));

    set("MUSYNC_HTTP_TIMEOUT_SECS", "0");
    assert!(matches!(AppConfig::from_env(), Err(MusyncError::Config(_))));
    unset("MUSYNC_HTTP_TIMEOUT_SECS");

    set("MUSYNC_REQUEST_DEADLINE_SECS", "12");
    let config = AppConfig::from_env().unwrap();
    assert_eq!(config.request_deadline, Duration::from_secs(12));

    set("MUSYNC_REQUEST_DEADLINE_SECS", "soon");
    match AppConfig::from_env() {
        Err(MusyncError::Config(msg)) => assert!(msg.contains("MUSYNC_REQUEST_DEADLINE_SECS")),
        other => panic!("expected config error, got {other:?}"),
    }
    unset("MUSYNC_REQUEST_DEADLINE_SECS");

    set("YOUTUBE_CLIENT_SECRET", "  ");
    match AppConfig::from_env() {
        Err(MusyncError::Config(msg)) => assert!(msg.contains("YOUTUBE_CLIENT_SECRET")),
        other => panic!("expected config error, got {other:?}"),
    }
}
