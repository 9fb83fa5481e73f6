//! # API Module
//!
//! HTTP handlers of the local web front door. The router itself lives in
//! [`crate::server`].
//!
//! ## Endpoints
//!
//! - [`health`] - liveness, version and number of live sessions
//! - [`login`] - starts the authorization round trip for one provider
//! - [`callback`] - completes it: checks `state`, exchanges the code
//! - [`playlists`] - normalized playlists of the linked account, as JSON
//! - [`merge`] - validates a merge form and acknowledges it
//!
//! ## Sessions
//!
//! A browser is bound to a [`crate::management::UserSession`] through the
//! `musync_session` cookie set by [`login`]. Handlers that find no session
//! behave as if nothing were linked.
//!
//! ## Errors
//!
//! [`crate::error::MusyncError`] implements `IntoResponse`: validation and
//! callback problems answer 400, provider failures 502 with the provider's
//! body passed through, and an expired request deadline 504.

mod callback;
mod error;
mod health;
mod login;
mod merge;
mod playlists;
mod session;

use std::sync::Arc;

use axum::{
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use tokio::sync::Mutex;

use crate::{
    management::{AppContext, UserSession},
    types::ProviderKind,
};

pub use callback::callback;
pub use health::health;
pub use login::login;
pub use merge::merge;
pub use playlists::playlists;
pub use session::{SESSION_COOKIE, session_cookie, session_id};

/// Unknown providers in the path are a 404, like any unknown route.
fn parse_provider(raw: &str) -> Result<ProviderKind, Response> {
    raw.parse::<ProviderKind>()
        .map_err(|_| (StatusCode::NOT_FOUND, format!("unknown provider: {raw}")).into_response())
}

async fn current_session(
    ctx: &AppContext,
    headers: &HeaderMap,
) -> Option<Arc<Mutex<UserSession>>> {
    let id = session_id(headers)?;
    ctx.sessions.get(&id).await
}
