use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    auth::Authenticator,
    config::AppConfig,
    providers::Authorize,
    types::ProviderKind,
    utils,
};

/// Sessions holding credentials are dropped after this long without use.
pub const SESSION_IDLE_TTL: Duration = Duration::from_secs(60 * 60);

/// Sessions that never linked a provider, and unredeemed tickets, are
/// dropped after this long.
pub const SESSION_PENDING_TTL: Duration = Duration::from_secs(10 * 60);

/// Authorization state of one user across both providers.
pub struct UserSession {
    pub spotify: Authenticator,
    pub youtube: Authenticator,
}

impl UserSession {
    pub fn new(config: &AppConfig, http: &Client) -> Self {
        UserSession {
            spotify: Authenticator::new(config.spotify.clone(), http.clone()),
            youtube: Authenticator::new(config.youtube.clone(), http.clone()),
        }
    }

    pub fn authenticator(&self, provider: ProviderKind) -> &Authenticator {
        match provider {
            ProviderKind::Spotify => &self.spotify,
            ProviderKind::YouTube => &self.youtube,
        }
    }

    pub fn authenticator_mut(&mut self, provider: ProviderKind) -> &mut Authenticator {
        match provider {
            ProviderKind::Spotify => &mut self.spotify,
            ProviderKind::YouTube => &mut self.youtube,
        }
    }

    pub fn any_authorized(&self) -> bool {
        self.spotify.is_authorized() || self.youtube.is_authorized()
    }
}

struct SessionEntry {
    session: Arc<Mutex<UserSession>>,
    last_used: Instant,
}

impl SessionEntry {
    fn is_expired(&self, idle_ttl: Duration, pending_ttl: Duration) -> bool {
        let idle = self.last_used.elapsed();
        if idle >= idle_ttl {
            return true;
        }
        // a session busy in an exchange or refresh counts as linked
        let linked = self
            .session
            .try_lock()
            .map(|session| session.any_authorized())
            .unwrap_or(true);
        !linked && idle >= pending_ttl
    }
}

struct Ticket {
    session_id: String,
    issued_at: Instant,
}

#[derive(Default)]
struct Store {
    sessions: HashMap<String, SessionEntry>,
    tickets: HashMap<String, Ticket>,
}

/// In-memory sessions keyed by server-generated session ids.
///
/// Each session sits behind its own mutex, so a code exchange or refresh for
/// one user never waits on another user's provider call.
///
/// # Adoption
///
/// Clients never choose a session id. A browser is bound to an existing
/// session only through a ticket from [`SessionManager::issue_ticket`],
/// which works once and never for a session that already holds
/// credentials.
///
/// # Eviction
///
/// Expired sessions and tickets are purged whenever a session is created.
/// Linked sessions expire after [`SESSION_IDLE_TTL`] without use, the rest
/// after [`SESSION_PENDING_TTL`].
pub struct SessionManager {
    config: AppConfig,
    http: Client,
    idle_ttl: Duration,
    pending_ttl: Duration,
    store: Mutex<Store>,
}

impl SessionManager {
    pub fn new(config: AppConfig, http: Client) -> Self {
        Self::with_ttl(config, http, SESSION_IDLE_TTL, SESSION_PENDING_TTL)
    }

    pub fn with_ttl(
        config: AppConfig,
        http: Client,
        idle_ttl: Duration,
        pending_ttl: Duration,
    ) -> Self {
        SessionManager {
            config,
            http,
            idle_ttl,
            pending_ttl,
            store: Mutex::new(Store::default()),
        }
    }

    /// Looks up a live session and marks it used.
    pub async fn get(&self, session_id: &str) -> Option<Arc<Mutex<UserSession>>> {
        let mut store = self.store.lock().await;
        let entry = store.sessions.get_mut(session_id)?;
        if entry.is_expired(self.idle_ttl, self.pending_ttl) {
            store.sessions.remove(session_id);
            return None;
        }
        entry.last_used = Instant::now();
        Some(Arc::clone(&entry.session))
    }

    /// Creates a session under a freshly generated id.
    pub async fn create(&self) -> (String, Arc<Mutex<UserSession>>) {
        let mut store = self.store.lock().await;
        self.purge(&mut store);

        let session_id = utils::generate_session_id();
        let session = Arc::new(Mutex::new(UserSession::new(&self.config, &self.http)));
        store.sessions.insert(
            session_id.clone(),
            SessionEntry {
                session: Arc::clone(&session),
                last_used: Instant::now(),
            },
        );
        tracing::debug!(sessions = store.sessions.len(), "session created");

        (session_id, session)
    }

    /// Mints a single-use ticket that binds the next browser presenting it
    /// to `session_id`. `None` when the session does not exist.
    pub async fn issue_ticket(&self, session_id: &str) -> Option<String> {
        let mut store = self.store.lock().await;
        if !store.sessions.contains_key(session_id) {
            return None;
        }

        let ticket = utils::generate_session_id();
        store.tickets.insert(
            ticket.clone(),
            Ticket {
                session_id: session_id.to_string(),
                issued_at: Instant::now(),
            },
        );
        Some(ticket)
    }

    /// Consumes `ticket` and returns the session it was issued for.
    ///
    /// Fails for unknown, used or expired tickets, and for sessions that
    /// already hold credentials.
    pub async fn redeem_ticket(&self, ticket: &str) -> Option<(String, Arc<Mutex<UserSession>>)> {
        let ticket = {
            let mut store = self.store.lock().await;
            store.tickets.remove(ticket)?
        };
        if ticket.issued_at.elapsed() >= self.pending_ttl {
            return None;
        }

        let session = self.get(&ticket.session_id).await?;
        if session.lock().await.any_authorized() {
            tracing::warn!("refusing to hand out a linked session");
            return None;
        }

        Some((ticket.session_id, session))
    }

    /// Drops expired sessions and tickets, returning how many sessions went.
    pub async fn purge_expired(&self) -> usize {
        let mut store = self.store.lock().await;
        self.purge(&mut store)
    }

    pub async fn count(&self) -> usize {
        self.store.lock().await.sessions.len()
    }

    fn purge(&self, store: &mut Store) -> usize {
        let before = store.sessions.len();
        store
            .sessions
            .retain(|_, entry| !entry.is_expired(self.idle_ttl, self.pending_ttl));
        store
            .tickets
            .retain(|_, ticket| ticket.issued_at.elapsed() < self.pending_ttl);

        let evicted = before - store.sessions.len();
        if evicted > 0 {
            tracing::debug!(evicted, "expired sessions purged");
        }
        evicted
    }
}
