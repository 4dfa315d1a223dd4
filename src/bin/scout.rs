use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scout::app::{self, State};
use scout::config::{self, Config};

/// Debounced forum search with inline autocomplete
#[derive(Debug, Parser)]
#[command(name = "scout", version)]
struct Cli {
    /// Config file (default: ~/.config/scout/config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

static BOOT_PARAMS: Mutex<Option<Config>> = Mutex::new(None);

fn boot() -> (State, iced::Task<app::Message>) {
    let config = BOOT_PARAMS
        .lock()
        .unwrap()
        .take()
        .expect("boot() called more than once");
    State::new(config)
}

fn main() -> iced::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };

    tracing::info!("Starting Scout");

    *BOOT_PARAMS.lock().unwrap() = Some(config);

    iced::daemon(boot, State::update, State::view)
        .title(State::title)
        .subscription(State::subscription)
        .theme(State::theme)
        .style(State::style)
        .run()
}
