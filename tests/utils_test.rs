use std::{collections::HashMap, str::FromStr, time::Duration};

use musync::{
    catalog::{Thumbnail, select_thumbnail},
    error::MusyncError,
    types::{ProviderKind, Track, TrackTableRow},
    utils::*,
};
use reqwest::StatusCode;

fn thumbnails(keys: &[&str]) -> HashMap<String, Thumbnail> {
    keys.iter()
        .map(|key| {
            (
                key.to_string(),
                Thumbnail {
                    url: format!("https://img.example/{key}.jpg"),
                },
            )
        })
        .collect()
}

#[test]
fn test_generate_state() {
    let state = generate_state();

    assert_eq!(state.len(), STATE_LENGTH);
    assert!(state.chars().all(|c| c.is_ascii_alphanumeric()));
    assert_ne!(state, generate_state());
}

#[test]
fn test_generate_session_id() {
    let id = generate_session_id();

    assert_eq!(id.len(), SESSION_ID_LENGTH);
    assert!(id.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn test_generate_random_string_length() {
    assert_eq!(generate_random_string(0), "");
    assert_eq!(generate_random_string(7).len(), 7);
}

#[test]
fn test_build_http_client() {
    assert!(build_http_client(Duration::from_secs(1)).is_ok());
}

#[test]
fn test_select_thumbnail_prefers_medium_over_default() {
    let selected = select_thumbnail(&thumbnails(&["default", "medium"]));
    assert_eq!(selected.as_deref(), Some("https://img.example/medium.jpg"));
}

#[test]
fn test_select_thumbnail_prefers_maxres() {
    let selected = select_thumbnail(&thumbnails(&["default", "high", "maxres", "standard"]));
    assert_eq!(selected.as_deref(), Some("https://img.example/maxres.jpg"));
}

#[test]
fn test_select_thumbnail_ignores_unknown_keys() {
    assert_eq!(select_thumbnail(&thumbnails(&["standard"])), None);
    assert_eq!(select_thumbnail(&HashMap::new()), None);
}

#[test]
fn test_provider_kind_parsing() {
    assert_eq!(ProviderKind::from_str("spotify").ok(), Some(ProviderKind::Spotify));
    assert_eq!(ProviderKind::from_str("YouTube").ok(), Some(ProviderKind::YouTube));
    assert_eq!(
        ProviderKind::from_str("youtube-music").ok(),
        Some(ProviderKind::YouTube)
    );
    assert!(matches!(
        ProviderKind::from_str("deezer"),
        Err(MusyncError::Config(_))
    ));
    assert_eq!(ProviderKind::YouTube.to_string(), "youtube");
}

#[test]
fn test_error_from_status() {
    let unauthorized =
        MusyncError::from_status(ProviderKind::Spotify, StatusCode::UNAUTHORIZED, String::new());
    assert!(unauthorized.is_unauthorized());
    assert!(unauthorized.requires_reauth());

    let api = MusyncError::from_status(
        ProviderKind::YouTube,
        StatusCode::FORBIDDEN,
        "{\"error\":\"quota\"}".to_string(),
    );
    assert!(!api.requires_reauth());
    match api {
        MusyncError::Api { status, body } => {
            assert_eq!(status, StatusCode::FORBIDDEN);
            assert_eq!(body, "{\"error\":\"quota\"}");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[test]
fn test_validation_error_message() {
    let err = MusyncError::Validation {
        field: "source_playlist_id",
    };
    assert_eq!(err.to_string(), "missing required field: source_playlist_id");
}

#[test]
fn test_track_table_row() {
    let track = Track {
        id: "1".to_string(),
        name: "Song".to_string(),
        artists: vec!["A".to_string(), "B".to_string()],
        album: "Album".to_string(),
        duration_ms: 185_000,
        external_id: "spotify:track:1".to_string(),
    };

    let row = TrackTableRow::from(&track);
    assert_eq!(row.artists, "A, B");
    assert_eq!(row.duration, "3:05");
    assert_eq!(row.id, "spotify:track:1");
}
