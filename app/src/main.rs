use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "gplay")]
#[command(version, about = "Google Play data gateway: HTTP API and interactive console")]
struct Cli {
    /// Configuration file (defaults to ~/.config/gplay/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the JSON API over HTTP
    Serve {
        /// Address to bind, overriding the configuration
        #[arg(long)]
        bind: Option<String>,
    },

    /// Run lookups interactively
    Console,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    gplay_app::init_tracing();
    info!("Starting GPlay gateway v{}", env!("CARGO_PKG_VERSION"));

    let config = gplay_app::load_config(cli.config.as_deref())?;
    let router = gplay_app::build_router(&config)?;

    match cli.command {
        Commands::Serve { bind } => {
            let addr = bind.unwrap_or_else(|| config.server.bind.clone());
            gplay_app::server::serve(router, &addr).await
        }
        Commands::Console => gplay_app::console::run(router).await,
    }
}
