mod context;
mod session;

pub use context::AppContext;
pub use session::SessionManager;
pub use session::UserSession;
