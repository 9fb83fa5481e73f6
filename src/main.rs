use std::sync::Arc;

use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};
use tracing_subscriber::EnvFilter;

use musync::{cli, config, error, management::AppContext, types::ProviderKind};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the web front door
    Serve,

    /// Log in and list your playlists
    Playlists(PlaylistsOptions),

    /// Log in and search tracks
    Search(SearchOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    /// Music service to read from
    provider: ProviderKind,

    /// Print JSON instead of a table
    #[clap(long)]
    json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Music service to search
    provider: ProviderKind,

    /// Free text query
    query: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }
    init_tracing();

    let cli = Cli::parse();

    if let Command::Completions(opt) = &cli.command {
        let mut cmd = Cli::command_for_update();
        let name = cmd.get_name().to_string();
        generate(opt.shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    let app_config = match config::AppConfig::from_env() {
        Ok(app_config) => app_config,
        Err(e) => error!("{}", e),
    };
    let ctx = match AppContext::new(app_config) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => error!("Cannot build HTTP client. Err: {}", e),
    };

    match cli.command {
        Command::Serve => cli::serve(ctx).await,
        Command::Playlists(opt) => cli::playlists(ctx, opt.provider, opt.json).await,
        Command::Search(opt) => cli::search(ctx, opt.provider, opt.query).await,
        Command::Completions(_) => {}
    }
}
