use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tier_board::api::state::AppState;
use tier_board::config::AppConfig;
use tier_board::load::load_dataset;
use tier_board::render::{build_render_model, render_html, render_text};

#[derive(Parser)]
#[command(name = "tier-board")]
#[command(about = "Community tier-ranking dashboard")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard over HTTP
    Serve {
        /// Bind address (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Render the dashboard once and exit
    Report {
        /// Write the HTML page to this file instead of printing the
        /// text report
        #[arg(long)]
        html: Option<PathBuf>,
    },
}

fn load_config(path: &PathBuf) -> Result<AppConfig> {
    if path.exists() {
        let config = AppConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    } else {
        tracing::debug!("No config file at {}; using defaults", path.display());
        Ok(AppConfig::default())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting tier-board v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = config;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState {
                config: Arc::new(config),
            };
            let app = tier_board::api::build_router(state);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Dashboard: http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Report { html } => {
            let dataset = load_dataset(&config.data).context("loading dataset")?;
            let model = build_render_model(&dataset, &config).context("building render model")?;

            match html {
                Some(path) => {
                    std::fs::write(&path, render_html(&model))
                        .with_context(|| format!("writing {}", path.display()))?;
                    tracing::info!("Wrote {}", path.display());
                }
                None => {
                    print!("{}", render_text(&model));
                }
            }
        }
    }

    Ok(())
}
