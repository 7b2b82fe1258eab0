use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing::warn;

use travelworld::config::API_KEY_ENV;
use travelworld::render::render_selection;
use travelworld::{
    AppState, BannedCountry, GeoDbClient, Session, SharedSession, ThreadRandom, TravelConfig,
};

/// Random city picker with a ban list, backed by the GeoDB cities API
#[derive(Debug, Parser)]
#[command(name = "travelworld", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Interactive picker (default)
    Shell,
    /// Pick one city and exit
    Find {
        /// Country code to exclude, may be repeated
        #[arg(long = "ban", value_name = "CODE")]
        bans: Vec<String>,
    },
    /// Serve the JSON API for the browser widget
    Serve {
        /// Port to listen on, overrides web.port
        #[arg(long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = TravelConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    travelworld::logging::init(&config.logging, cli.verbose)?;

    if !config.has_api_key() {
        warn!(
            "No GeoDB API key configured; set {} or geodb.api_key. Requests will be rejected.",
            API_KEY_ENV
        );
    }

    let client = GeoDbClient::new(&config)?;

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let mut session = Session::new(client);
            session.load().await;
            let stdin = BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            travelworld::shell::run(&mut session, stdin, &mut stdout).await?;
        }
        Command::Find { bans } => {
            let state = AppState::with_bans(
                bans.iter()
                    .map(|code| BannedCountry::new(code.as_str(), code.as_str())),
            );
            let mut session = Session::with_state(client, state, ThreadRandom);
            session.load().await;
            println!("{}", render_selection(session.state()));
        }
        Command::Serve { port } => {
            let session = SharedSession::new(client);
            session.load().await;
            let port = port.unwrap_or(config.web.port);
            travelworld::web::run(session, port).await?;
        }
    }

    Ok(())
}
