use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;

use crate::{
    Res,
    error::MusyncError,
    info,
    management::{AppContext, UserSession},
    providers::Authorize,
    server::start_api_server,
    success,
    types::ProviderKind,
    warning,
};

/// How long the browser round trip may take.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(120);

/// Links `provider` for a fresh session through the browser.
///
/// Creates the session up front, starts the local server (which receives
/// the provider's redirect) and opens `/login/{provider}?ticket=<ticket>`
/// so the browser adopts that session. Then polls until the callback has
/// stored credentials or [`LOGIN_TIMEOUT`] passes.
///
/// # Errors
///
/// [`MusyncError::NotAuthenticated`] when nothing arrives in time.
pub async fn login(ctx: Arc<AppContext>, provider: ProviderKind) -> Res<Arc<Mutex<UserSession>>> {
    let (session_id, session) = ctx.sessions.create().await;
    let ticket = ctx
        .sessions
        .issue_ticket(&session_id)
        .await
        .ok_or(MusyncError::NotAuthenticated(provider))?;

    let server_ctx = Arc::clone(&ctx);
    tokio::spawn(async move {
        if let Err(e) = start_api_server(server_ctx).await {
            warning!("Callback server stopped: {}", e);
        }
    });

    let login_url = format!(
        "http://{}/login/{}?ticket={}",
        ctx.config.server_addr, provider, ticket
    );

    info!("Opening {} login in your browser...", provider.display_name());
    if webbrowser::open(&login_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            login_url
        )
    }

    if wait_for_authorization(&session, provider).await {
        success!("{} linked.", provider.display_name());
        Ok(session)
    } else {
        Err(MusyncError::NotAuthenticated(provider))
    }
}

async fn wait_for_authorization(session: &Mutex<UserSession>, provider: ProviderKind) -> bool {
    let start = Instant::now();

    while start.elapsed() < LOGIN_TIMEOUT {
        if session.lock().await.authenticator(provider).is_authorized() {
            return true;
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    false
}
