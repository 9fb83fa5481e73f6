//! # Spotify Catalog
//!
//! Client for the Spotify Web API (`https://api.spotify.com/v1`). It reads the
//! current user's library and writes playlists, translating Spotify's JSON
//! into the canonical [`crate::types::Playlist`] and [`crate::types::Track`].
//!
//! ## Mapping
//!
//! - `owner` is the owner's display name, or the user id when Spotify has no
//!   display name for the account
//! - `track_count` comes from `tracks.total` in the listing itself, so no
//!   extra call per playlist is needed
//! - `image_url` is the first image, which Spotify lists widest first
//! - `external_id` of a track is its `spotify:track:` URI, which is what the
//!   add-tracks endpoint expects
//!
//! ## Authentication
//!
//! Every call carries the access token as a bearer header. A `401` surfaces
//! as [`crate::error::MusyncError::Unauthorized`] and is retried (once) by
//! [`crate::sync::fetch_with_refresh`], never here.
//!
//! ## Playlist Creation
//!
//! Spotify creates playlists under a user id, so
//! [`SpotifyCatalog::create_playlist`](crate::providers::Catalog::create_playlist)
//! first resolves `/me` and then posts to `/users/{id}/playlists`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{PAGE_SIZE, SEARCH_LIMIT, authorized};
use crate::{
    Res,
    providers::Catalog,
    types::{Credentials, Playlist, ProviderKind, Track},
    utils,
};

const TRACK_URI_PREFIX: &str = "spotify:track:";

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<SpotifyPlaylist>,
}

#[derive(Debug, Deserialize)]
struct SpotifyPlaylist {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    owner: Option<Owner>,
    #[serde(default)]
    tracks: Option<TracksRef>,
    #[serde(default)]
    images: Option<Vec<Image>>,
    #[serde(default)]
    external_urls: Option<ExternalUrls>,
}

#[derive(Debug, Deserialize)]
struct Owner {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TracksRef {
    #[serde(default)]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct Image {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    #[serde(default)]
    spotify: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    tracks: Option<TrackPage>,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<SpotifyTrack>,
}

#[derive(Debug, Deserialize)]
struct SpotifyTrack {
    id: String,
    name: String,
    #[serde(default)]
    artists: Vec<NamedRef>,
    #[serde(default)]
    album: Option<NamedRef>,
    #[serde(default)]
    duration_ms: u64,
    uri: String,
}

#[derive(Debug, Deserialize)]
struct NamedRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: String,
}

impl From<SpotifyPlaylist> for Playlist {
    fn from(item: SpotifyPlaylist) -> Self {
        let owner = item
            .owner
            .and_then(|o| o.display_name.or(o.id))
            .unwrap_or_default();

        Playlist {
            id: item.id,
            name: item.name,
            description: item.description.unwrap_or_default(),
            owner,
            track_count: item.tracks.map(|t| t.total).unwrap_or(0),
            // Spotify lists images widest first
            image_url: item
                .images
                .and_then(|images| images.into_iter().next())
                .map(|image| image.url),
            external_url: item.external_urls.and_then(|urls| urls.spotify),
        }
    }
}

impl From<SpotifyTrack> for Track {
    fn from(item: SpotifyTrack) -> Self {
        Track {
            id: item.id,
            name: item.name,
            artists: item.artists.into_iter().map(|a| a.name).collect(),
            album: item.album.map(|a| a.name).unwrap_or_default(),
            duration_ms: item.duration_ms,
            external_id: item.uri,
        }
    }
}

/// Spotify Web API client.
///
/// # API Coverage
///
/// - `GET /me/playlists` - playlist listing
/// - `GET /search?type=track` - track search
/// - `GET /me` - current user id, needed to create playlists
/// - `POST /users/{user_id}/playlists` - playlist creation
/// - `POST /playlists/{playlist_id}/tracks` - add tracks
pub struct SpotifyCatalog {
    api_url: String,
    http: Client,
}

impl SpotifyCatalog {
    pub fn new(api_url: &str, http: Client) -> Self {
        SpotifyCatalog {
            api_url: api_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn current_user_id(&self, credentials: &Credentials) -> Res<String> {
        let response = authorized(self.http.get(format!("{}/me", self.api_url)), credentials)
            .send()
            .await?;
        let response = utils::check_response(ProviderKind::Spotify, response).await?;
        let me: IdOnly = utils::decode_json(response).await?;
        Ok(me.id)
    }
}

/// Track ids coming from a search are already URIs; bare ids are expanded.
fn track_uri(track_id: &str) -> String {
    if track_id.starts_with(TRACK_URI_PREFIX) {
        track_id.to_string()
    } else {
        format!("{TRACK_URI_PREFIX}{track_id}")
    }
}

#[async_trait]
impl Catalog for SpotifyCatalog {
    fn provider(&self) -> ProviderKind {
        ProviderKind::Spotify
    }

    /// Fetches the first page of the current user's playlists.
    ///
    /// Owners without a display name fall back to their user id; playlists
    /// without a description get an empty one.
    async fn fetch_playlists(&self, credentials: &Credentials) -> Res<Vec<Playlist>> {
        let url = format!("{}/me/playlists", self.api_url);
        tracing::debug!(%url, "fetching spotify playlists");

        let response = authorized(self.http.get(&url), credentials)
            .query(&[("limit", PAGE_SIZE)])
            .send()
            .await?;
        let response = utils::check_response(ProviderKind::Spotify, response).await?;
        let page: PlaylistPage = utils::decode_json(response).await?;

        Ok(page.items.into_iter().map(Playlist::from).collect())
    }

    async fn search_tracks(&self, credentials: &Credentials, query: &str) -> Res<Vec<Track>> {
        let limit = SEARCH_LIMIT.to_string();
        let response = authorized(self.http.get(format!("{}/search", self.api_url)), credentials)
            .query(&[("q", query), ("type", "track"), ("limit", limit.as_str())])
            .send()
            .await?;
        let response = utils::check_response(ProviderKind::Spotify, response).await?;
        let result: SearchResponse = utils::decode_json(response).await?;

        Ok(result
            .tracks
            .map(|page| page.items.into_iter().map(Track::from).collect())
            .unwrap_or_default())
    }

    async fn add_track_to_playlist(
        &self,
        credentials: &Credentials,
        playlist_id: &str,
        track_id: &str,
    ) -> Res<()> {
        let url = format!("{}/playlists/{}/tracks", self.api_url, playlist_id);
        let response = authorized(self.http.post(&url), credentials)
            .json(&json!({ "uris": [track_uri(track_id)] }))
            .send()
            .await?;
        utils::check_response(ProviderKind::Spotify, response).await?;
        Ok(())
    }

    async fn create_playlist(
        &self,
        credentials: &Credentials,
        name: &str,
        description: &str,
        private: bool,
    ) -> Res<String> {
        let user_id = self.current_user_id(credentials).await?;
        let url = format!("{}/users/{}/playlists", self.api_url, user_id);

        let response = authorized(self.http.post(&url), credentials)
            .json(&json!({
                "name": name,
                "description": description,
                "public": !private,
            }))
            .send()
            .await?;
        let response = utils::check_response(ProviderKind::Spotify, response).await?;
        let created: IdOnly = utils::decode_json(response).await?;

        Ok(created.id)
    }
}
