//! # YouTube Music Catalog
//!
//! YouTube Music has no public API of its own, so the library is read through
//! the YouTube Data API v3 (`https://www.googleapis.com/youtube/v3`).
//!
//! ## Listing and Backfill
//!
//! `playlists?mine=true` provides titles, descriptions and owners. Every
//! listed playlist then gets one `playlistItems?maxResults=1` call:
//!
//! - `pageInfo.totalResults` replaces the track count
//! - the first item's best thumbnail replaces the cover, if it has one
//!
//! A failed backfill is logged with `tracing::warn!` and the listing's own
//! values are kept. Only a failure of the listing call fails the operation.
//!
//! ## Thumbnails
//!
//! [`select_thumbnail`] picks the first key of [`THUMBNAIL_PREFERENCE`]
//! present in a `thumbnails` map.
//!
//! ## Search
//!
//! Search is restricted to videos in the Music category (`videoCategoryId=10`).
//! The API has neither album nor duration: the channel title stands in for
//! the artist, `album` is empty and `duration_ms` is `0`. Results without a
//! `videoId` (channels, playlists) are dropped.

use std::collections::HashMap;

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

/// Thumbnail keys from most to least preferred.
pub const THUMBNAIL_PREFERENCE: [&str; 4] = ["maxres", "high", "medium", "default"];

const MUSIC_CATEGORY_ID: &str = "10";

#[derive(Debug, Clone, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

/// Picks the URL of the most preferred thumbnail present in `thumbnails`.
pub fn select_thumbnail(thumbnails: &HashMap<String, Thumbnail>) -> Option<String> {
    THUMBNAIL_PREFERENCE
        .iter()
        .find_map(|key| thumbnails.get(*key))
        .map(|thumbnail| thumbnail.url.clone())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: HashMap<String, Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct PlaylistListResponse {
    #[serde(default)]
    items: Vec<YouTubePlaylist>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YouTubePlaylist {
    id: String,
    #[serde(default)]
    snippet: Snippet,
    #[serde(default)]
    content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ContentDetails {
    #[serde(default)]
    item_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    #[serde(default)]
    page_info: Option<PageInfo>,
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    #[serde(default)]
    total_results: u32,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    #[serde(default)]
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    #[serde(default)]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IdOnly {
    id: String,
}

/// Track count and cover found by the per-playlist detail call.
struct PlaylistDetails {
    track_count: u32,
    image_url: Option<String>,
}

impl From<YouTubePlaylist> for Playlist {
    fn from(item: YouTubePlaylist) -> Self {
        let image_url = select_thumbnail(&item.snippet.thumbnails);
        let external_url = format!("https://music.youtube.com/playlist?list={}", item.id);

        Playlist {
            id: item.id,
            name: item.snippet.title,
            description: item.snippet.description,
            owner: item.snippet.channel_title,
            track_count: item.content_details.map(|c| c.item_count).unwrap_or(0),
            image_url,
            external_url: Some(external_url),
        }
    }
}

/// YouTube Data API v3 client, used for YouTube Music libraries.
pub struct YouTubeCatalog {
    api_url: String,
    http: Client,
}

impl YouTubeCatalog {
    pub fn new(api_url: &str, http: Client) -> Self {
        YouTubeCatalog {
            api_url: api_url.trim_end_matches('/').to_string(),
            http,
        }
    }

    async fn fetch_details(
        &self,
        credentials: &Credentials,
        playlist_id: &str,
    ) -> Res<PlaylistDetails> {
        let response = authorized(
            self.http.get(format!("{}/playlistItems", self.api_url)),
            credentials,
        )
        .query(&[
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", "1"),
        ])
        .send()
        .await?;
        let response = utils::check_response(ProviderKind::YouTube, response).await?;
        let result: PlaylistItemsResponse = utils::decode_json(response).await?;

        Ok(PlaylistDetails {
            track_count: result.page_info.map(|p| p.total_results).unwrap_or(0),
            image_url: result
                .items
                .first()
                .and_then(|item| select_thumbnail(&item.snippet.thumbnails)),
        })
    }
}

#[async_trait]
impl Catalog for YouTubeCatalog {
    fn provider(&self) -> ProviderKind {
        ProviderKind::YouTube
    }

    /// Lists the user's playlists, then backfills each one with a
    /// `playlistItems` call. A failed backfill keeps the listing values.
    async fn fetch_playlists(&self, credentials: &Credentials) -> Res<Vec<Playlist>> {
        let page_size = PAGE_SIZE.to_string();
        let response = authorized(
            self.http.get(format!("{}/playlists", self.api_url)),
            credentials,
        )
        .query(&[
            ("part", "snippet,contentDetails"),
            ("mine", "true"),
            ("maxResults", page_size.as_str()),
        ])
        .send()
        .await?;
        let response = utils::check_response(ProviderKind::YouTube, response).await?;
        let result: PlaylistListResponse = utils::decode_json(response).await?;

        let mut playlists: Vec<Playlist> = result.items.into_iter().map(Playlist::from).collect();

        for playlist in playlists.iter_mut() {
            match self.fetch_details(credentials, &playlist.id).await {
                Ok(details) => {
                    playlist.track_count = details.track_count;
                    if details.image_url.is_some() {
                        playlist.image_url = details.image_url;
                    }
                }
                Err(e) => {
                    tracing::warn!(playlist = %playlist.id, error = %e, "failed to fetch playlist details");
                }
            }
        }

        Ok(playlists)
    }

    async fn search_tracks(&self, credentials: &Credentials, query: &str) -> Res<Vec<Track>> {
        let limit = SEARCH_LIMIT.to_string();
        let response = authorized(
            self.http.get(format!("{}/search", self.api_url)),
            credentials,
        )
        .query(&[
            ("part", "snippet"),
            ("q", query),
            ("type", "video"),
            ("videoCategoryId", MUSIC_CATEGORY_ID),
            ("maxResults", limit.as_str()),
        ])
        .send()
        .await?;
        let response = utils::check_response(ProviderKind::YouTube, response).await?;
        let result: SearchResponse = utils::decode_json(response).await?;

        // the search API has no album or duration; the channel stands in for the artist
        Ok(result
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(Track {
                    id: video_id.clone(),
                    name: item.snippet.title,
                    artists: vec![item.snippet.channel_title],
                    album: String::new(),
                    duration_ms: 0,
                    external_id: video_id,
                })
            })
            .collect())
    }

    async fn add_track_to_playlist(
        &self,
        credentials: &Credentials,
        playlist_id: &str,
        track_id: &str,
    ) -> Res<()> {
        let response = authorized(
            self.http.post(format!("{}/playlistItems", self.api_url)),
            credentials,
        )
        .query(&[("part", "snippet")])
        .json(&json!({
            "snippet": {
                "playlistId": playlist_id,
                "resourceId": {
                    "kind": "youtube#video",
                    "videoId": track_id,
                },
            },
        }))
        .send()
        .await?;
        utils::check_response(ProviderKind::YouTube, response).await?;
        Ok(())
    }

    async fn create_playlist(
        &self,
        credentials: &Credentials,
        name: &str,
        description: &str,
        private: bool,
    ) -> Res<String> {
        let privacy_status = if private { "private" } else { "public" };

        let response = authorized(
            self.http.post(format!("{}/playlists", self.api_url)),
            credentials,
        )
        .query(&[("part", "snippet,status")])
        .json(&json!({
            "snippet": {
                "title": name,
                "description": description,
            },
            "status": {
                "privacyStatus": privacy_status,
            },
        }))
        .send()
        .await?;
        let response = utils::check_response(ProviderKind::YouTube, response).await?;
        let created: IdOnly = utils::decode_json(response).await?;

        Ok(created.id)
    }
}
