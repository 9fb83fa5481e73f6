//! Cross-provider orchestration.
//!
//! [`fetch_with_refresh`] holds the only retry in the system: one refresh
//! followed by one retry after the provider rejects the access token.
//! Everything else propagates to the caller, who decides between sending the
//! user back to login ([`MusyncError::requires_reauth`]) and showing the error.

use std::future::Future;

use chrono::Duration;
use tokio_util::sync::CancellationToken;

use crate::{
    Res,
    error::MusyncError,
    providers::{Authorize, Catalog},
    types::{MergeRequest, Playlist},
};

/// Credentials this close to `expires_at` are refreshed before use.
pub const EXPIRY_SKEW_SECS: i64 = 240;

/// Runs `fut` unless `cancel` fires first.
async fn cancellable<T>(cancel: &CancellationToken, fut: impl Future<Output = Res<T>>) -> Res<T> {
    tokio::select! {
        _ = cancel.cancelled() => Err(MusyncError::Cancelled),
        result = fut => result,
    }
}

/// Fetches playlists, refreshing the access token at most once.
///
/// # Behavior
///
/// 1. If the stored credentials are already expired (within
///    [`EXPIRY_SKEW_SECS`]) and a refresh token exists, refresh up front.
/// 2. Fetch playlists.
/// 3. If the provider answers `Unauthorized` and no refresh happened yet,
///    refresh once and fetch once more.
///
/// Whatever the last attempt returns is surfaced, so this never loops.
///
/// # Errors
///
/// - [`MusyncError::NotAuthenticated`] when no credentials exist
/// - [`MusyncError::Cancelled`] when `cancel` fires during a provider call
/// - any error of [`Authorize::refresh`] or [`Catalog::fetch_playlists`]
pub async fn fetch_with_refresh<A, C>(
    auth: &mut A,
    catalog: &C,
    cancel: &CancellationToken,
) -> Res<Vec<Playlist>>
where
    A: Authorize + ?Sized,
    C: Catalog + ?Sized,
{
    let provider = auth.provider();
    let mut refreshed = false;

    let credentials = auth
        .credentials()
        .cloned()
        .ok_or(MusyncError::NotAuthenticated(provider))?;

    let credentials = if credentials.refresh_token.is_some()
        && credentials.is_expired(Duration::seconds(EXPIRY_SKEW_SECS))
    {
        tracing::debug!(%provider, "access token expired, refreshing before fetch");
        cancellable(cancel, auth.refresh()).await?;
        refreshed = true;
        auth.credentials()
            .cloned()
            .ok_or(MusyncError::NotAuthenticated(provider))?
    } else {
        credentials
    };

    match cancellable(cancel, catalog.fetch_playlists(&credentials)).await {
        Err(e) if e.is_unauthorized() && !refreshed => {
            tracing::info!(%provider, "access token rejected, refreshing once");
        }
        other => return other,
    }

    cancellable(cancel, auth.refresh()).await?;
    let credentials = auth
        .credentials()
        .cloned()
        .ok_or(MusyncError::NotAuthenticated(provider))?;

    cancellable(cancel, catalog.fetch_playlists(&credentials)).await
}

/// Checks that every field of a merge request is filled in.
///
/// Fields are checked in form order and the first blank one is reported.
/// Whether the source playlist exists is not checked here.
pub fn validate_merge_request(request: &MergeRequest) -> Res<()> {
    let fields = [
        ("name", &request.name),
        ("source_provider", &request.source_provider),
        ("source_playlist_id", &request.source_playlist_id),
        ("target_provider", &request.target_provider),
    ];

    match fields.iter().find(|(_, value)| value.trim().is_empty()) {
        Some((field, _)) => Err(MusyncError::Validation { field: *field }),
        None => Ok(()),
    }
}
