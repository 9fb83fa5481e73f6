use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, Query},
    http::{HeaderMap, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    api::{parse_provider, session_cookie, session_id},
    management::{AppContext, UserSession},
    providers::Authorize,
};

#[derive(Debug, Deserialize)]
pub struct LoginParams {
    /// Single-use adoption ticket minted by the CLI for the session it
    /// created before opening the browser.
    pub ticket: Option<String>,
}

pub async fn login(
    Path(provider): Path<String>,
    Query(params): Query<LoginParams>,
    headers: HeaderMap,
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Response {
    let provider = match parse_provider(&provider) {
        Ok(provider) => provider,
        Err(response) => return response,
    };

    let (id, session) = resolve_session(&ctx, params.ticket.as_deref(), &headers).await;
    let auth_url = session
        .lock()
        .await
        .authenticator_mut(provider)
        .generate_auth_url();

    match auth_url {
        Ok(url) => {
            tracing::info!(%provider, "redirecting to provider consent page");
            (
                [(header::SET_COOKIE, session_cookie(&id))],
                Redirect::to(&url),
            )
                .into_response()
        }
        Err(e) => e.into_response(),
    }
}

/// Session for this login: the one a valid ticket points to, else the one
/// the cookie names, else a new one. Unknown ids are never reused.
async fn resolve_session(
    ctx: &AppContext,
    ticket: Option<&str>,
    headers: &HeaderMap,
) -> (String, Arc<Mutex<UserSession>>) {
    if let Some(ticket) = ticket {
        match ctx.sessions.redeem_ticket(ticket).await {
            Some(adopted) => return adopted,
            None => tracing::warn!("ignoring invalid session ticket"),
        }
    }

    if let Some(id) = session_id(headers) {
        if let Some(session) = ctx.sessions.get(&id).await {
            return (id, session);
        }
    }

    ctx.sessions.create().await
}
