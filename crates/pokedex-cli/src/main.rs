//! Pokedex CLI - Command line interface for the Pokedex card recognition service

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{error, info};

use pokedex_cli::api;
use pokedex_cli::config::Config;
use pokedex_cli::lifecycle::{self, Lifecycle};
use pokedex_cli::logging;

#[derive(Parser)]
#[command(name = "pokedex")]
#[command(author = "Pokedex Contributors")]
#[command(version = "0.1.0")]
#[command(about = "Pokedex - Trading card recognition service", long_about = None)]
struct Cli {
    /// Path to configuration file (YAML or TOML)
    #[arg(short, long, global = true, env = "POKEDEX_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP service
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        bind: Option<String>,

        /// Listen port (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Generate example configuration file
    ConfigGen {
        /// Output format (yaml, toml)
        #[arg(short, long, default_value = "yaml")]
        format: String,

        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { bind, port } => {
            let mut config = match cli.config {
                Some(ref path) => Config::load(path).map_err(|e| anyhow::anyhow!("{}", e))?,
                None => Config::default(),
            };
            config.apply_overrides(bind, port);

            logging::init(&config.logging)?;
            run_server(config).await?;
        }

        Commands::ConfigGen { format, output } => {
            let content = match format.to_lowercase().as_str() {
                "yaml" | "yml" => Config::example_yaml(),
                "toml" => Config::example_toml(),
                _ => anyhow::bail!("Unsupported format: {}. Use 'yaml' or 'toml'", format),
            };

            if let Some(path) = output {
                std::fs::write(&path, &content)?;
                println!("Configuration written to: {}", path.display());
            } else {
                println!("{}", content);
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    let bind = &config.server.bind;
    let port = config.server.port;

    println!("Pokedex Server");
    println!("==================");
    println!("HTTP:      http://{}:{}/", bind, port);
    println!("Model:     {}", config.model.path.display());
    println!("Cards:     {}", config.cards.path.display());
    println!("Feedback:  {}", config.feedback.path.display());
    println!(
        "Uploads:   up to {} KiB",
        config.server.max_upload_bytes / 1024
    );
    println!();

    let lifecycle = Lifecycle::new();
    let routes = api::app(lifecycle.clone(), config.server.max_upload_bytes);

    // Parse bind address - NO unwrap()!
    let bind_addr: std::net::IpAddr = bind
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address '{}': {}", bind, e))?;

    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown((bind_addr, port), async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutting down");
        })
        .map_err(|e| anyhow::anyhow!("Failed to bind {}:{}: {}", bind, port, e))?;

    // Probes answer while the model is still loading
    let server = tokio::spawn(server);
    info!("Listening on http://{}", addr);

    let context = match lifecycle::bootstrap(&config).await {
        Ok(context) => context,
        Err(e) => {
            error!("Startup failed: {}", e);
            server.abort();
            return Err(e.into());
        }
    };
    info!("Model {} ready", context.predictor.name());
    lifecycle
        .mark_ready(context)
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    server
        .await
        .map_err(|e| anyhow::anyhow!("Server task failed: {}", e))?;
    Ok(())
}
