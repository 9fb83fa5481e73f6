use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{auth, cancel_on_ctrl_c, spinner},
    error::MusyncError,
    error, info,
    management::AppContext,
    providers::Authorize,
    types::{ProviderKind, TrackTableRow},
};

pub async fn search(ctx: Arc<AppContext>, provider: ProviderKind, query: String) {
    let session = match auth::login(Arc::clone(&ctx), provider).await {
        Ok(session) => session,
        Err(e) => error!("Authentication failed or timed out. Err: {}", e),
    };

    let credentials = match session.lock().await.authenticator(provider).credentials() {
        Some(credentials) => credentials.clone(),
        None => error!("{}", MusyncError::NotAuthenticated(provider)),
    };

    let cancel = cancel_on_ctrl_c();
    let pb = spinner("Searching...");
    let result = tokio::select! {
        _ = cancel.cancelled() => Err(MusyncError::Cancelled),
        result = ctx.catalog(provider).search_tracks(&credentials, &query) => result,
    };
    pb.finish_and_clear();

    match result {
        Ok(tracks) if tracks.is_empty() => info!("No tracks match \"{}\".", query),
        Ok(tracks) => {
            let rows: Vec<TrackTableRow> = tracks.iter().map(TrackTableRow::from).collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => error!("Search failed. Err: {}", e),
    }
}
