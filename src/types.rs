use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::error::MusyncError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Spotify,
    #[value(name = "youtube", alias = "youtube-music")]
    YouTube,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Spotify => "spotify",
            ProviderKind::YouTube => "youtube",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::Spotify => "Spotify",
            ProviderKind::YouTube => "YouTube Music",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = MusyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "spotify" => Ok(ProviderKind::Spotify),
            "youtube" | "youtube-music" | "youtubemusic" => Ok(ProviderKind::YouTube),
            other => Err(MusyncError::Config(format!("unknown provider: {other}"))),
        }
    }
}

/// Bearer credentials for one provider. Only ever held in memory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub access_token: String,
    pub token_type: String,
    pub refresh_token: Option<String>,
    pub expires_at: DateTime<Utc>,
}

impl Credentials {
    /// True once `now` is within `skew` of `expires_at`.
    pub fn is_expired(&self, skew: Duration) -> bool {
        Utc::now() >= self.expires_at - skew
    }
}

/// Provider-agnostic playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub owner: String,
    pub track_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_url: Option<String>,
}

/// Provider-agnostic track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
    pub album: String,
    pub duration_ms: u64,
    pub external_id: String,
}

/// Form submitted to request a playlist merge from one provider into another.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeRequest {
    #[serde(default, alias = "playlist_name")]
    pub name: String,
    #[serde(default, alias = "source_service")]
    pub source_provider: String,
    #[serde(default, alias = "source_playlist")]
    pub source_playlist_id: String,
    #[serde(default, alias = "target_service")]
    pub target_provider: String,
}

#[derive(Tabled)]
pub struct PlaylistTableRow {
    pub name: String,
    pub tracks: u32,
    pub owner: String,
    pub id: String,
}

impl From<&Playlist> for PlaylistTableRow {
    fn from(p: &Playlist) -> Self {
        PlaylistTableRow {
            name: p.name.clone(),
            tracks: p.track_count,
            owner: p.owner.clone(),
            id: p.id.clone(),
        }
    }
}

#[derive(Tabled)]
pub struct TrackTableRow {
    pub name: String,
    pub artists: String,
    pub album: String,
    pub duration: String,
    pub id: String,
}

impl From<&Track> for TrackTableRow {
    fn from(t: &Track) -> Self {
        let seconds = t.duration_ms / 1000;
        TrackTableRow {
            name: t.name.clone(),
            artists: t.artists.join(", "),
            album: t.album.clone(),
            duration: format!("{}:{:02}", seconds / 60, seconds % 60),
            id: t.external_id.clone(),
        }
    }
}
