use std::sync::Arc;

use reqwest::Client;

use crate::{
    Res, catalog, config::AppConfig, management::SessionManager, providers::Catalog,
    types::ProviderKind, utils,
};

/// Everything a request needs: configuration, sessions and one catalog
/// client per provider. Shared behind an `Arc` by the server and the CLI.
pub struct AppContext {
    pub config: AppConfig,
    pub sessions: SessionManager,
    spotify: Arc<dyn Catalog>,
    youtube: Arc<dyn Catalog>,
}

impl AppContext {
    /// Builds the context with an HTTP client bounded by
    /// `config.http_timeout`.
    pub fn new(config: AppConfig) -> Res<Self> {
        let http = utils::build_http_client(config.http_timeout)?;
        Ok(Self::with_client(config, http))
    }

    pub fn with_client(config: AppConfig, http: Client) -> Self {
        let spotify = catalog::for_provider(
            config.provider(ProviderKind::Spotify),
            http.clone(),
        );
        let youtube = catalog::for_provider(
            config.provider(ProviderKind::YouTube),
            http.clone(),
        );
        let sessions = SessionManager::new(config.clone(), http);

        AppContext {
            config,
            sessions,
            spotify,
            youtube,
        }
    }

    pub fn catalog(&self, provider: ProviderKind) -> &dyn Catalog {
        match provider {
            ProviderKind::Spotify => self.spotify.as_ref(),
            ProviderKind::YouTube => self.youtube.as_ref(),
        }
    }
}
