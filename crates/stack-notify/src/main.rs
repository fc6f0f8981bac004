//! stack-notify - CloudFormation change notifications for chat.

use std::io::Read;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use stack_notify::classify::{classify, Classification};
use stack_notify::{
    ChangeEvent, EventBridgePublisher, LogPublisher, Outcome, Publisher, Relay, RelayConfig,
};

/// Format CloudFormation change events and hand them to the chat relay.
#[derive(Parser)]
#[command(name = "stack-notify")]
#[command(about = "CloudFormation change notifications for chat")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true, env = "STACK_NOTIFY_JSON_LOGS")]
    json_logs: bool,

    /// Log relay events instead of publishing them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Account/region nickname file (TOML)
    #[arg(long, global = true)]
    nicknames: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the HTTP ingress
    Serve {
        /// Address to listen on
        #[arg(long, env = "STACK_NOTIFY_ADDR", default_value = "0.0.0.0:8080")]
        addr: SocketAddr,
    },

    /// Process a single event and publish its notification
    Invoke {
        /// Event file (reads stdin when omitted)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Print the notification an event would produce, without publishing
    Classify {
        /// Event file (reads stdin when omitted)
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.json_logs);

    let mut config = RelayConfig::from_env().context("Failed to load configuration")?;
    if let Some(path) = &cli.nicknames {
        config = config
            .with_nicknames_file(path)
            .context("Failed to load nickname file")?;
    }
    let config = Arc::new(config);

    match cli.command {
        Commands::Serve { addr } => {
            let relay = Relay::new(config, publisher(cli.dry_run).await);
            run_serve(relay, addr).await
        }
        Commands::Invoke { file } => {
            let relay = Relay::new(config, publisher(cli.dry_run).await);
            run_invoke(&relay, file.as_deref()).await
        }
        Commands::Classify { file } => run_classify(&config, file.as_deref()),
    }
}

fn init_tracing(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "stack_notify=debug,info"
    } else {
        "stack_notify=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn publisher(dry_run: bool) -> Arc<dyn Publisher> {
    if dry_run {
        info!("Dry run enabled, relay events will only be logged");
        Arc::new(LogPublisher)
    } else {
        Arc::new(EventBridgePublisher::from_env().await)
    }
}

async fn run_serve(relay: Relay, addr: SocketAddr) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(%addr, "stack-notify listening");
    axum::serve(listener, stack_notify::server::router(relay))
        .await
        .context("HTTP server failed")
}

async fn run_invoke(relay: &Relay, file: Option<&Path>) -> Result<()> {
    let raw = read_event(file)?;
    let outcome = relay
        .handle_value(raw)
        .await
        .context("Relay invocation failed")?;

    match outcome {
        Outcome::Published { channel } => info!(channel, "Notification published"),
        Outcome::Suppressed => info!("Event produced no notification"),
        Outcome::Ignored => info!("Event ignored"),
    }
    Ok(())
}

fn run_classify(config: &RelayConfig, file: Option<&Path>) -> Result<()> {
    let raw = read_event(file)?;
    let event: ChangeEvent =
        serde_json::from_value(raw).context("Input is not a change event envelope")?;

    match classify(&event, config) {
        Classification::Notify(message) => {
            println!("{}", serde_json::to_string_pretty(&message)?);
        }
        Classification::Suppressed => println!("no notification"),
        Classification::Ignored => println!("no notification (event ignored)"),
    }
    Ok(())
}

fn read_event(file: Option<&Path>) -> Result<serde_json::Value> {
    let contents = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read event from stdin")?;
            buf
        }
    };

    serde_json::from_str(&contents).context("Event is not valid JSON")
}
