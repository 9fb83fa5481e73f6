//! Build script for musync.
//!
//! Copies the `.env.example` configuration template into the user's local data
//! directory (`musync/.env.example`), next to the `.env` file that
//! [`config::load_env`] reads at startup. Every step is best effort: a missing
//! template or an unwritable data directory produces a cargo warning instead of
//! failing the build.

use std::{env, fs, path::PathBuf};

/// Build script entry point.
///
/// # Locations
///
/// Source: `.env.example` in the crate root.
///
/// Destination, per platform:
/// - Linux: `~/.local/share/musync/.env.example`
/// - macOS: `~/Library/Application Support/musync/.env.example`
/// - Windows: `%LOCALAPPDATA%/musync/.env.example`
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    if !env_example_path.is_file() {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
        return Ok(());
    }

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("musync");

    let copied = fs::create_dir_all(&out_dir).and_then(|_| {
        fs::read_to_string(&env_example_path)
            .and_then(|contents| fs::write(out_dir.join(".env.example"), contents))
    });

    if let Err(e) = copied {
        println!(
            "cargo:warning=could not copy .env.example to {}: {}",
            out_dir.display(),
            e
        );
    }

    Ok(())
}
