//! Capability traits every streaming provider implements.
//!
//! The authorization side ([`Authorize`]) and the catalog side ([`Catalog`])
//! are separate objects: an authorizer is per user session and mutable, a
//! catalog client is stateless and shared. [`crate::sync`] only ever talks to
//! these traits, never to a concrete provider.

use async_trait::async_trait;

use crate::{
    Res,
    types::{Credentials, Playlist, ProviderKind, Track},
};

/// OAuth2 authorization-code flow for one provider and one user.
#[async_trait]
pub trait Authorize: Send {
    fn provider(&self) -> ProviderKind;

    /// Issues a fresh CSRF state and returns the URL to send the user to.
    /// Any previously issued state stops being valid.
    fn generate_auth_url(&mut self) -> Res<String>;

    /// Checks the `state` received on the callback. A match consumes the
    /// pending state.
    fn validate_state(&mut self, received: &str) -> bool;

    /// Trades an authorization code for credentials and stores them.
    async fn exchange_code(&mut self, code: &str) -> Res<Credentials>;

    /// Credentials are present and carry an access token. Expiry is not
    /// checked.
    fn is_authorized(&self) -> bool;

    fn credentials(&self) -> Option<&Credentials>;

    /// Obtains a new access token with the stored refresh token.
    async fn refresh(&mut self) -> Res<()>;
}

/// Authenticated REST access to a provider's library, normalized into the
/// canonical [`Playlist`] and [`Track`] shapes.
#[async_trait]
pub trait Catalog: Send + Sync {
    fn provider(&self) -> ProviderKind;

    /// The user's playlists (first page only, at most 50).
    async fn fetch_playlists(&self, credentials: &Credentials) -> Res<Vec<Playlist>>;

    async fn search_tracks(&self, credentials: &Credentials, query: &str) -> Res<Vec<Track>>;

    async fn add_track_to_playlist(
        &self,
        credentials: &Credentials,
        playlist_id: &str,
        track_id: &str,
    ) -> Res<()>;

    /// Creates a playlist and returns its provider id.
    async fn create_playlist(
        &self,
        credentials: &Credentials,
        name: &str,
        description: &str,
        private: bool,
    ) -> Res<String>;
}
