use std::sync::Arc;

use axum::{
    Extension,
    extract::{Path, Query},
    http::HeaderMap,
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;

use crate::{
    api::{current_session, parse_provider},
    error::MusyncError,
    management::AppContext,
    providers::Authorize,
    warning,
};

#[derive(Debug, Default, Deserialize)]
pub struct CallbackParams {
    pub state: Option<String>,
    pub code: Option<String>,
    pub error: Option<String>,
}

pub async fn callback(
    Path(provider): Path<String>,
    Query(params): Query<CallbackParams>,
    headers: HeaderMap,
    Extension(ctx): Extension<Arc<AppContext>>,
) -> Response {
    let provider = match parse_provider(&provider) {
        Ok(provider) => provider,
        Err(response) => return response,
    };

    // without a session there is no state to compare against
    let Some(session) = current_session(&ctx, &headers).await else {
        tracing::warn!(%provider, "callback without a session");
        return MusyncError::CsrfMismatch.into_response();
    };

    let mut session = session.lock().await;
    let auth = session.authenticator_mut(provider);

    if !auth.validate_state(params.state.as_deref().unwrap_or_default()) {
        tracing::warn!(%provider, "callback state does not match");
        return MusyncError::CsrfMismatch.into_response();
    }

    let code = match params.code.filter(|code| !code.is_empty()) {
        Some(code) => code,
        None => {
            let reason = params
                .error
                .unwrap_or_else(|| "missing authorization code".to_string());
            return MusyncError::CallbackRejected(reason).into_response();
        }
    };

    match auth.exchange_code(&code).await {
        Ok(_) => Html(format!(
            "<h2>{} linked.</h2><p>You can close this window.</p>",
            provider.display_name()
        ))
        .into_response(),
        Err(e) => {
            warning!("Token exchange with {} failed: {}", provider, e);
            e.into_response()
        }
    }
}
