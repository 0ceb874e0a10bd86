use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use kankai_core::TaskStore;
use tracing::{info, warn};

mod board;
mod config;
mod monitor;
mod notify;
mod shell;
mod state;
mod whatsapp;

use crate::board::Board;
use crate::notify::Notifier;
use crate::whatsapp::WhatsAppGateway;

#[derive(Parser, Debug)]
#[command(
    name = "kankai",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("KANKAI_BUILD_SHA"), ")"),
    about = "Kankai task board"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive board (delay monitor and notifications run in the background)
    Run {
        /// Start with the demonstration tasks
        #[arg(long, default_value_t = false)]
        seed: bool,

        /// Disable the delay monitor for this session
        #[arg(long, default_value_t = false)]
        no_monitor: bool,

        /// Override [monitor].interval_secs
        #[arg(long)]
        interval_secs: Option<u64>,
    },

    /// Write ~/.kankai/config.toml with defaults
    InitConfig,

    /// Show effective configuration (secrets redacted) and what is missing
    ConfigCheck,

    /// Send a single WhatsApp message using the configured gateway
    SendWhatsapp {
        #[arg(long)]
        text: String,
    },
}

fn init_tracing(level: &str) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut cfg = config::load_config()?;
    init_tracing(&cfg.log_level);

    match cli.command {
        Command::Run {
            seed,
            no_monitor,
            interval_secs,
        } => {
            if let Some(secs) = interval_secs {
                cfg.monitor.interval_secs = secs;
            }
            if no_monitor {
                cfg.monitor.enabled = false;
            }
            run_board(cfg, seed).await?;
        }

        Command::InitConfig => config::init_config()?,

        Command::ConfigCheck => config::config_check(&cfg)?,

        Command::SendWhatsapp { text } => {
            let gateway = WhatsAppGateway::from_config(&cfg.whatsapp);
            if !gateway.is_configured() {
                anyhow::bail!("WhatsApp is not configured. Run: kankai config-check");
            }
            if gateway.send(&text).await {
                println!("Sent WhatsApp message.");
            } else {
                anyhow::bail!("WhatsApp delivery failed (see log)");
            }
        }
    }

    Ok(())
}

async fn run_board(cfg: config::Config, seed: bool) -> Result<()> {
    let tz = cfg.report.tz()?;

    let gateway = WhatsAppGateway::from_config(&cfg.whatsapp);
    if !gateway.is_configured() {
        warn!(
            missing = ?cfg.whatsapp.missing_fields(),
            "whatsapp gateway not configured; notifications will be skipped"
        );
    }

    let (tx, rx) = notify::event_channel();
    let dispatcher = tokio::spawn(notify::run_dispatcher(rx, gateway));

    let store = if seed {
        TaskStore::demo(Utc::now()).context("seed demo tasks")?
    } else {
        TaskStore::new()
    };
    let board = Board::new(store, tx);

    let monitor = if cfg.monitor.enabled {
        info!(interval_secs = cfg.monitor.interval().as_secs(), "delay monitor started");
        Some(tokio::spawn(monitor::run_monitor(board.clone(), cfg.monitor.interval())))
    } else {
        None
    };

    shell::run(board, tz).await?;

    // Dropping the last board handle closes the channel so queued
    // notifications drain before exit.
    if let Some(m) = monitor {
        m.abort();
        let _ = m.await;
    }
    match dispatcher.await {
        Ok(delivered) => info!(delivered, "notification dispatcher finished"),
        Err(e) => warn!(error = %e, "notification dispatcher panicked"),
    }

    Ok(())
}
