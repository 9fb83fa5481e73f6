//! # CLI Module
//!
//! User-facing commands of the `musync` binary. Every command works on a
//! shared [`crate::management::AppContext`]; the ones that need an account
//! first run the browser login through the local server (see [`auth`]).
//!
//! ## Commands
//!
//! - [`serve`] - runs the web front door until interrupted
//! - [`playlists`] - logs in and prints the normalized playlists
//! - [`search`] - logs in and prints matching tracks
//!
//! ## Output
//!
//! Progress goes through the crate's colored macros (`info!`, `success!`,
//! `warning!`, `error!`) and an `indicatif` spinner while a provider call is
//! in flight. Results are rendered with `tabled`, or as JSON on request.
//! `error!` terminates the process, so it is only used once a command can no
//! longer do anything useful.

pub mod auth;
mod playlists;
mod search;
mod serve;

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;

pub use playlists::playlists;
pub use search::search;
pub use serve::serve;

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

/// Token cancelled on the first Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            token.cancel();
        }
    });
    cancel
}
