use std::sync::Arc;

use crate::{error, info, management::AppContext, server::start_api_server};

pub async fn serve(ctx: Arc<AppContext>) {
    let addr = ctx.config.server_addr.clone();
    info!("Serving on http://{}", addr);
    info!(
        "Link an account at http://{}/login/spotify or http://{}/login/youtube",
        addr, addr
    );

    if let Err(e) = start_api_server(ctx).await {
        error!("Server stopped. Err: {}", e);
    }
}
