//! Multi-provider music account linking.
//!
//! `musync` links a user's Spotify and YouTube Music accounts through the
//! OAuth2 authorization-code flow, keeps the resulting credentials fresh and
//! maps each provider's playlist and track payloads onto one normalized
//! model.
//!
//! # Modules
//!
//! - `auth` - authorization URLs, CSRF state, code exchange and refresh
//! - `catalog` - provider API clients returning normalized playlists and tracks
//! - `sync` - fetch with a single refresh-and-retry, merge request validation
//! - `management` - per-user sessions and the shared application context
//! - `api` / `server` - the local HTTP front door
//! - `cli` - command implementations of the `musync` binary
//! - `config` - environment driven configuration
//! - `error` - the crate wide error type
//! - `providers` - the `Authorize` and `Catalog` traits
//! - `types` - normalized data model
//! - `utils` - random tokens and HTTP helpers

pub mod api;
pub mod auth;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod management;
pub mod providers;
pub mod server;
pub mod sync;
pub mod types;
pub mod utils;

/// Result alias used across the crate.
///
/// # Example
///
/// ```
/// use musync::Res;
///
/// fn parse_port(raw: &str) -> Res<u16> {
///     raw.parse()
///         .map_err(|_| musync::error::MusyncError::Config(format!("bad port: {raw}")))
/// }
/// ```
pub type Res<T> = std::result::Result<T, error::MusyncError>;

/// Prints an informational message with a blue bullet point.
///
/// Accepts the same arguments as `println!`.
///
/// # Example
///
/// ```ignore
/// info!("Opening Spotify login in your browser...");
/// info!("Found {} playlists", count);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a success message with a green checkmark.
///
/// # Example
///
/// ```ignore
/// success!("YouTube Music linked.");
/// ```
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints an error message with a red exclamation mark and exits the program.
///
/// Exits with code 1 after printing, so it evaluates to any type and can
/// close a `match` arm. Only for fatal errors.
///
/// # Example
///
/// ```ignore
/// error!("Missing required environment variable: {}", var_name);
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a warning message with a yellow exclamation mark.
///
/// For recoverable problems the user should notice.
///
/// # Example
///
/// ```ignore
/// warning!("Failed to open browser. Please navigate to:\n{}", url);
/// ```
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
