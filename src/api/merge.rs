use std::sync::Arc;

use axum::{
    Extension, Form,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::{api::current_session, management::AppContext, sync, types::MergeRequest};

/// Accepts a merge form once at least one provider is linked.
///
/// Only the request is validated; copying tracks between providers is not
/// performed.
pub async fn merge(
    headers: HeaderMap,
    Extension(ctx): Extension<Arc<AppContext>>,
    Form(request): Form<MergeRequest>,
) -> Response {
    let linked = match current_session(&ctx, &headers).await {
        Some(session) => {
            let session = session.lock().await;
            session.any_authorized()
        }
        None => false,
    };
    if !linked {
        return (
            StatusCode::BAD_REQUEST,
            "You need to be logged in to at least one music service",
        )
            .into_response();
    }

    if let Err(e) = sync::validate_merge_request(&request) {
        return e.into_response();
    }

    tracing::info!(
        source = %request.source_provider,
        target = %request.target_provider,
        "merge request accepted"
    );

    (
        StatusCode::ACCEPTED,
        Json(json!({
            "status": "accepted",
            "name": request.name,
            "source_provider": request.source_provider,
            "source_playlist_id": request.source_playlist_id,
            "target_provider": request.target_provider,
        })),
    )
        .into_response()
}
