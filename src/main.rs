use std::{path::PathBuf, sync::Arc};

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use coverart::{config, error, info, server, success, warning};

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
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Load configuration from this file instead of the default `.env` locations
    #[clap(long)]
    env_file: Option<PathBuf>,

    /// Address to bind, overrides SERVER_ADDRESS
    #[clap(long)]
    address: Option<String>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match config::load_env(cli.env_file.as_deref()).await {
        Ok(loaded) if loaded.is_empty() => {
            warning!("No .env file found, using process environment only")
        }
        Ok(loaded) => {
            for path in loaded {
                info!("Loaded environment from {}", path.display());
            }
        }
        Err(e) => error!("Cannot load environment. Err: {}", e),
    }

    config::init_tracing();

    let credentials = match config::spotify_credentials() {
        Ok(credentials) => credentials,
        Err(e) => error!("Cannot load credentials. Err: {}", e),
    };

    let timeout = match config::request_timeout() {
        Ok(timeout) => timeout,
        Err(e) => error!("Invalid configuration. Err: {}", e),
    };

    let state = match server::AppState::new(
        credentials,
        config::spotify_apitoken_url(),
        config::spotify_search_url(),
        timeout,
    ) {
        Ok(state) => Arc::new(state),
        Err(e) => error!("Failed to initialize app state: {}", e),
    };

    let addr = cli.address.unwrap_or_else(config::server_addr);
    let listener = match server::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => error!("Failed to bind {}: {}", addr, e),
    };

    success!("Listening on http://{}", addr);

    if let Err(e) = server::start_api_server(listener, state).await {
        error!("Server stopped: {}", e);
    }
}
