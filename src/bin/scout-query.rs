use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use scout::config;
use scout::navigation::{absolute_url, Destination};
use scout::search::filter::filter_and_suggest;
use scout::service;

/// Run one search through the configured backend and print the records the
/// launcher would show, one JSON object per line.
#[derive(Debug, Parser)]
#[command(name = "scout-query", version)]
struct Cli {
    /// Text to search for
    query: String,

    /// Config file (default: ~/.config/scout/config.toml)
    #[arg(long, short)]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => config::load_from(path),
        None => config::load(),
    };

    let min_chars = config.search.min_query_chars;
    if cli.query.chars().count() < min_chars {
        eprintln!("scout-query: query must be at least {min_chars} characters");
        process::exit(2);
    }

    let service = match service::from_config(&config.search) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("scout-query: {e}");
            process::exit(2);
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("scout-query: failed to start runtime: {e}");
            process::exit(2);
        }
    };

    let response = match rt.block_on(service.search(&cli.query)) {
        Ok(r) if r.is_ok() => r,
        Ok(r) => {
            eprintln!("scout-query: search failed with status {}", r.status);
            process::exit(2);
        }
        Err(e) => {
            eprintln!("scout-query: {e}");
            process::exit(2);
        }
    };

    let filtered = filter_and_suggest(&cli.query, &response.records);
    for record in &filtered.records {
        let destination = Destination::for_record(record, &config.navigation.path_prefix);
        let line = serde_json::json!({
            "record": record,
            "url": absolute_url(&config.navigation.base_url, &destination.href()),
        });
        println!("{line}");
    }
    if !filtered.suggestion.is_empty() {
        eprintln!("suggestion: {}", filtered.suggestion);
    }

    if filtered.records.is_empty() {
        process::exit(1);
    }
}
