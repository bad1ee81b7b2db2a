mod api;
mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use hotelbot_channels::{LineAdapter, LineConfig, LineReplyClient, QueryDispatcher};
use hotelbot_logging::init_logger;
use hotelbot_search::{RakutenClient, ReplyBuilder};

use api::AppState;
use config::{Config, DEFAULT_PORT};

#[derive(Parser)]
#[command(name = "hotelbot")]
#[command(about = "LINE bot that answers keywords with hotel search results")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query the health endpoint of a running server
    Status {
        /// Port the server listens on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let mut config = Config::from_env().context("Invalid configuration")?;
            if let Some(port) = port {
                config.port = port;
            }
            init_logger(config.log_dir.as_deref(), &config.log_level);
            run_server(config).await?;
        }
        Commands::Status { port } => {
            let port = port
                .or_else(|| std::env::var("HOTELBOT_PORT").ok()?.parse().ok())
                .unwrap_or(DEFAULT_PORT);
            let client = reqwest::Client::builder()
                .timeout(Duration::from_secs(3))
                .build()?;
            match client
                .get(format!("http://localhost:{port}/api/health"))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("hotelbot is not running on port {port}");
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        webhook_path = %config.webhook_path,
        reply_mode = %config.reply_mode,
        timeout_secs = config.http_timeout.as_secs(),
        "Starting hotelbot"
    );

    let search = RakutenClient::new(config.rakuten_app_id.clone(), config.http_timeout)
        .context("Failed to build search HTTP client")?
        .with_endpoint(config.rakuten_api_url.clone());
    let sender = LineReplyClient::new(config.line_channel_token.clone(), config.http_timeout)
        .context("Failed to build reply HTTP client")?
        .with_api_base(config.line_api_url.clone());

    let builder = ReplyBuilder::new(Arc::new(search), config.reply_mode);
    let dispatcher = QueryDispatcher::new(builder, Arc::new(sender));
    let adapter = LineAdapter::new(
        LineConfig {
            channel_secret: config.line_channel_secret.clone(),
            webhook_path: config.webhook_path.clone(),
        },
        dispatcher,
    );
    info!(path = adapter.webhook_path(), "Registered LINE webhook");

    let state = Arc::new(AppState {
        reply_mode: config.reply_mode,
    });
    let app = api::build_router(state, adapter.build_router()).layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.bind_address, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(addr = %addr, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("hotelbot stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Cannot listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
