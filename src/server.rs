use std::sync::Arc;

use axum::{
    Extension, Router,
    routing::{get, post},
};

use crate::{Res, api, error::MusyncError, management::AppContext};

/// All routes of the front door, sharing `ctx` through an `Extension`.
pub fn router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/login/{provider}", get(api::login))
        .route("/callback/{provider}", get(api::callback))
        .route("/playlists/{provider}", get(api::playlists))
        .route("/merge", post(api::merge))
        .layer(Extension(ctx))
}

pub async fn start_api_server(ctx: Arc<AppContext>) -> Res<()> {
    let addr = ctx.config.server_addr.clone();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MusyncError::Config(format!("cannot bind {addr}: {e}")))?;

    tracing::info!(%addr, "server listening");
    axum::serve(listener, router(ctx)).await?;
    Ok(())
}
