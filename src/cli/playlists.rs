use std::sync::Arc;

use tabled::Table;

use crate::{
    cli::{auth, cancel_on_ctrl_c, spinner},
    error, info,
    management::AppContext,
    success, sync,
    types::{PlaylistTableRow, ProviderKind},
};

pub async fn playlists(ctx: Arc<AppContext>, provider: ProviderKind, json: bool) {
    let session = match auth::login(Arc::clone(&ctx), provider).await {
        Ok(session) => session,
        Err(e) => error!("Authentication failed or timed out. Err: {}", e),
    };

    let cancel = cancel_on_ctrl_c();
    let pb = spinner("Fetching playlists...");
    let result = {
        let mut session = session.lock().await;
        sync::fetch_with_refresh(
            session.authenticator_mut(provider),
            ctx.catalog(provider),
            &cancel,
        )
        .await
    };
    pb.finish_and_clear();

    let playlists = match result {
        Ok(playlists) => playlists,
        Err(e) if e.requires_reauth() => error!(
            "{} rejected the session, run the command again to log in. Err: {}",
            provider.display_name(),
            e
        ),
        Err(e) => error!("Failed to fetch playlists. Err: {}", e),
    };

    if json {
        match serde_json::to_string_pretty(&playlists) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Failed to serialize playlists. Err: {}", e),
        }
        return;
    }

    if playlists.is_empty() {
        info!("No playlists found.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = playlists.iter().map(PlaylistTableRow::from).collect();
    println!("{}", Table::new(rows));
    success!(
        "{} playlists on {}",
        playlists.len(),
        provider.display_name()
    );
}
