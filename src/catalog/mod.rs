//! # Catalog Clients
//!
//! Authenticated REST clients that read and write a provider's music library
//! and translate every answer into the canonical [`crate::types::Playlist`]
//! and [`crate::types::Track`] shapes.
//!
//! ## Providers
//!
//! - [`SpotifyCatalog`] - Spotify Web API. Playlist listings already carry
//!   track counts and covers.
//! - [`YouTubeCatalog`] - YouTube Data API v3. Every listed playlist gets an
//!   extra `playlistItems` call to backfill its track count and thumbnail.
//!   Failures of that call are logged and otherwise ignored.
//!
//! ## Error Taxonomy
//!
//! All operations share the same mapping:
//! - `401` - [`crate::error::MusyncError::Unauthorized`], the caller may refresh
//!   and retry once
//! - other non-2xx - [`crate::error::MusyncError::Api`] with the provider body
//!   passed through verbatim
//! - malformed JSON - [`crate::error::MusyncError::Decode`]
//!
//! ## Limits
//!
//! Listings are single-page: at most [`PAGE_SIZE`] playlists are returned.
//! Following `next` links is not implemented.

mod spotify;
mod youtube;

use std::sync::Arc;

use reqwest::{Client, RequestBuilder};

use crate::{
    config::ProviderConfig,
    providers::Catalog,
    types::{Credentials, ProviderKind},
};

pub use spotify::SpotifyCatalog;
pub use youtube::{THUMBNAIL_PREFERENCE, Thumbnail, YouTubeCatalog, select_thumbnail};

/// Page size for playlist listings.
pub const PAGE_SIZE: u32 = 50;

/// Page size for track searches.
pub const SEARCH_LIMIT: u32 = 10;

/// Builds the catalog client matching `config.provider`.
pub fn for_provider(config: &ProviderConfig, http: Client) -> Arc<dyn Catalog> {
    match config.provider {
        ProviderKind::Spotify => Arc::new(SpotifyCatalog::new(&config.api_url, http)),
        ProviderKind::YouTube => Arc::new(YouTubeCatalog::new(&config.api_url, http)),
    }
}

fn authorized(request: RequestBuilder, credentials: &Credentials) -> RequestBuilder {
    request.bearer_auth(&credentials.access_token)
}
