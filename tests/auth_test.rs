mod common;

use musync::{
    auth::Authenticator, error::MusyncError, providers::Authorize, types::ProviderKind,
};
use reqwest::{Client, Url};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, header, method, path},
};

use common::{BASIC_AUTH, CLIENT_ID, provider_config};

fn authenticator(provider: ProviderKind, server: &MockServer) -> Authenticator {
    Authenticator::new(provider_config(provider, &server.uri()), Client::new())
}

fn state_of(auth_url: &str) -> String {
    Url::parse(auth_url)
        .unwrap()
        .query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .unwrap()
}

async fn mount_token(server: &MockServer, provider: &str, grant: &str, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(format!("/{provider}/token")))
        .and(body_string_contains(format!("grant_type={grant}")))
        .respond_with(response)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_auth_url_carries_client_and_state() {
    let server = MockServer::start().await;
    let mut auth = authenticator(ProviderKind::Spotify, &server);

    let url = Url::parse(&auth.generate_auth_url().unwrap()).unwrap();
    let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    let get = |key: &str| {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    };

    assert_eq!(url.path(), "/spotify/authorize");
    assert_eq!(get("client_id"), Some(CLIENT_ID));
    assert_eq!(get("response_type"), Some("code"));
    assert_eq!(get("access_type"), Some("offline"));
    assert_eq!(get("scope"), Some("scope-a scope-b"));
    assert_eq!(
        get("redirect_uri"),
        Some("http://127.0.0.1:8080/callback/spotify")
    );
    assert_eq!(get("state").map(str::len), Some(16));
}

#[tokio::test]
async fn test_new_auth_url_invalidates_previous_state() {
    let server = MockServer::start().await;
    let mut auth = authenticator(ProviderKind::Spotify, &server);

    let first = state_of(&auth.generate_auth_url().unwrap());
    let second = state_of(&auth.generate_auth_url().unwrap());

    assert_ne!(first, second);
    assert!(!auth.validate_state(&first));
    assert!(auth.validate_state(&second));
    assert!(auth.session().csrf_state.is_none());
    // a state is good for one callback only
    assert!(!auth.validate_state(&second));
}

#[tokio::test]
async fn test_state_mismatch_keeps_pending_state() {
    let server = MockServer::start().await;
    let mut auth = authenticator(ProviderKind::YouTube, &server);
    let state = state_of(&auth.generate_auth_url().unwrap());

    assert!(!auth.validate_state("forged"));
    assert!(!auth.validate_state(""));
    assert!(auth.validate_state(&state));
}

#[tokio::test]
async fn test_exchange_code_with_basic_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/spotify/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=the-code"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-1",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-1",
            "scope": "playlist-read-private"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut auth = authenticator(ProviderKind::Spotify, &server);
    assert!(!auth.is_authorized());

    let credentials = auth.exchange_code("the-code").await.unwrap();

    assert_eq!(credentials.access_token, "access-1");
    assert_eq!(credentials.refresh_token.as_deref(), Some("refresh-1"));
    assert!(auth.is_authorized());
    assert_eq!(
        auth.credentials().map(|c| c.access_token.as_str()),
        Some("access-1")
    );
}

#[tokio::test]
async fn test_exchange_code_with_body_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/youtube/token"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "yt-access",
            "expires_in": 3599
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut auth = authenticator(ProviderKind::YouTube, &server);
    let credentials = auth.exchange_code("code").await.unwrap();

    assert_eq!(credentials.token_type, "Bearer");
    assert!(credentials.refresh_token.is_none());
    assert!(auth.is_authorized());
}

#[tokio::test]
async fn test_failed_exchange_leaves_session_unauthorized() {
    let server = MockServer::start().await;
    mount_token(
        &server,
        "spotify",
        "authorization_code",
        ResponseTemplate::new(400).set_body_string("{\"error\":\"invalid_grant\"}"),
    )
    .await;

    let mut auth = authenticator(ProviderKind::Spotify, &server);
    let err = auth.exchange_code("expired").await.unwrap_err();

    assert!(matches!(err, MusyncError::TokenExchange(ref msg) if msg.contains("invalid_grant")));
    assert!(!auth.is_authorized());
    assert!(auth.credentials().is_none());
}

#[tokio::test]
async fn test_malformed_token_response_is_exchange_error() {
    let server = MockServer::start().await;
    mount_token(
        &server,
        "spotify",
        "authorization_code",
        ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
    )
    .await;

    let mut auth = authenticator(ProviderKind::Spotify, &server);
    let err = auth.exchange_code("code").await.unwrap_err();

    assert!(matches!(err, MusyncError::TokenExchange(_)));
    assert!(!auth.is_authorized());
}

#[tokio::test]
async fn test_refresh_without_refresh_token() {
    let server = MockServer::start().await;
    mount_token(
        &server,
        "youtube",
        "authorization_code",
        ResponseTemplate::new(200).set_body_json(json!({ "access_token": "only-access" })),
    )
    .await;
    Mock::given(method("POST"))
        .and(body_string_contains("grant_type=refresh_token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut auth = authenticator(ProviderKind::YouTube, &server);
    auth.exchange_code("code").await.unwrap();

    let err = auth.refresh().await.unwrap_err();

    assert!(matches!(err, MusyncError::NoRefreshToken));
    assert!(auth.is_authorized());
    assert_eq!(
        auth.credentials().map(|c| c.access_token.as_str()),
        Some("only-access")
    );
}

#[tokio::test]
async fn test_refresh_before_any_exchange() {
    let server = MockServer::start().await;
    let mut auth = authenticator(ProviderKind::Spotify, &server);

    assert!(matches!(
        auth.refresh().await,
        Err(MusyncError::NoRefreshToken)
    ));
}

#[tokio::test]
async fn test_refresh_keeps_refresh_token_when_not_rotated() {
    let server = MockServer::start().await;
    mount_token(
        &server,
        "spotify",
        "authorization_code",
        ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "old-access",
            "refresh_token": "refresh-1",
            "expires_in": 3600
        })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/spotify/token"))
        .and(header("authorization", BASIC_AUTH))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut auth = authenticator(ProviderKind::Spotify, &server);
    auth.exchange_code("code").await.unwrap();
    auth.refresh().await.unwrap();

    let credentials = auth.credentials().unwrap();
    assert_eq!(credentials.access_token, "new-access");
    assert_eq!(credentials.refresh_token.as_deref(), Some("refresh-1"));
}

#[tokio::test]
async fn test_refresh_stores_rotated_refresh_token() {
    let server = MockServer::start().await;
    mount_token(
        &server,
        "youtube",
        "authorization_code",
        ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "old-access",
            "refresh_token": "refresh-1"
        })),
    )
    .await;
    mount_token(
        &server,
        "youtube",
        "refresh_token",
        ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "new-access",
            "refresh_token": "refresh-2"
        })),
    )
    .await;

    let mut auth = authenticator(ProviderKind::YouTube, &server);
    auth.exchange_code("code").await.unwrap();
    auth.refresh().await.unwrap();

    let credentials = auth.credentials().unwrap();
    assert_eq!(credentials.access_token, "new-access");
    assert_eq!(credentials.refresh_token.as_deref(), Some("refresh-2"));
}

#[tokio::test]
async fn test_rejected_refresh_signs_out() {
    let server = MockServer::start().await;
    mount_token(
        &server,
        "spotify",
        "authorization_code",
        ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "old-access",
            "refresh_token": "revoked"
        })),
    )
    .await;
    mount_token(
        &server,
        "spotify",
        "refresh_token",
        ResponseTemplate::new(400).set_body_string("{\"error\":\"invalid_grant\"}"),
    )
    .await;

    let mut auth = authenticator(ProviderKind::Spotify, &server);
    auth.exchange_code("code").await.unwrap();

    let err = auth.refresh().await.unwrap_err();

    assert!(err.requires_reauth());
    assert!(!auth.is_authorized());
}
