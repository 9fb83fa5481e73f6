use std::sync::Arc;

use axum::{
    Extension,
    extract::Path,
    http::HeaderMap,
    response::{IntoResponse, Json, Redirect, Response},
};
use tokio_util::sync::CancellationToken;

use crate::{
    api::{current_session, parse_provider},
    error::MusyncError,
    management::AppContext,
    providers::Authorize,
    sync,
};

pub async fn playlists(
    Path(provider): Path<String>,
    headers: HeaderMap,
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Response {
    let provider = match parse_provider(&provider) {
        Ok(provider) => provider,
        Err(response) => return response,
    };
    let to_login = Redirect::to(&format!("/login/{provider}"));

    let Some(session) = current_session(&ctx, &headers).await else {
        return to_login.into_response();
    };
    let mut session = session.lock().await;
    let auth = session.authenticator_mut(provider);
    if !auth.is_authorized() {
        return to_login.into_response();
    }

    // cancelled on deadline, and on drop when the client goes away
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let deadline = ctx.config.request_deadline;
    let fetch = sync::fetch_with_refresh(auth, ctx.catalog(provider), &cancel);
    let result = match tokio::time::timeout(deadline, fetch).await {
        Ok(result) => result,
        Err(_) => {
            cancel.cancel();
            tracing::warn!(%provider, ?deadline, "playlist request deadline elapsed");
            Err(MusyncError::Cancelled)
        }
    };

    match result {
        Ok(playlists) => Json(playlists).into_response(),
        Err(e) if e.requires_reauth() => {
            tracing::info!(%provider, error = %e, "sending user back to login");
            to_login.into_response()
        }
        Err(e) => {
            tracing::warn!(%provider, error = %e, "playlist fetch failed");
            e.into_response()
        }
    }
}
