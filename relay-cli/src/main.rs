//! Community relay CLI
//!
//! Polls a community page and relays new posts to a chat webhook.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use relay_core::KnownPostStore;
use relay_runtime::{DeliveryQueue, HttpWebhook, Poller, PollerConfig};
use relay_scrape::{PageScanner, PostSource};

use crate::config::RelayConfig;

#[derive(Parser)]
#[command(name = "community-relay")]
#[command(author, version, about = "Relay new community posts to a webhook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (0-3)
    #[arg(short, long, default_value = "1", global = true)]
    verbose: u8,

    /// Path to the JSON config file
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Webhook URL (overrides the config file)
    #[arg(long, env = "RELAY_WEBHOOK", global = true)]
    webhook: Option<String>,

    /// Community identifier (overrides the config file)
    #[arg(long, env = "RELAY_COMMUNITY", global = true)]
    community: Option<String>,

    /// Stream identifier (overrides the config file)
    #[arg(long, env = "RELAY_STREAM", global = true)]
    stream: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll forever, relaying new posts
    Run,

    /// Run a single poll cycle and wait for its deliveries
    Once,

    /// Print the posts currently on the page without delivering anything
    Scan,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    let log_level = match cli.verbose {
        0 => Level::ERROR,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_thread_ids(false)
        .compact()
        .init();

    let mut config = RelayConfig::load(&cli.config)?;
    if let Some(webhook) = cli.webhook {
        config.webhook = webhook;
    }
    if let Some(community) = cli.community {
        config.community = community;
    }
    if cli.stream.is_some() {
        config.stream = cli.stream;
    }

    match cli.command {
        Commands::Run => run(&config, true).await?,
        Commands::Once => run(&config, false).await?,
        Commands::Scan => scan(&config).await?,
    }

    Ok(())
}

async fn run(config: &RelayConfig, forever: bool) -> Result<()> {
    let scanner = PageScanner::new(config.scan_config())?;
    let webhook = HttpWebhook::new(&config.webhook, config.request_timeout())?;
    let (queue, worker) = DeliveryQueue::new(Arc::new(webhook), config.delivery_delay());
    let delivery = tokio::spawn(worker.run());

    let poller = Poller::new(
        Arc::new(scanner),
        KnownPostStore::new(&config.known_posts),
        queue,
        PollerConfig::new(config.community_key()).with_interval(config.poll_interval()),
    );

    if forever {
        info!(
            "Relaying {} every {}s",
            config.community_key(),
            config.poll_interval_secs
        );
        poller
            .run_until(async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!("Failed to listen for shutdown signal: {}", e);
                    std::future::pending::<()>().await;
                }
            })
            .await;
    } else if let Err(e) = poller.run_cycle().await {
        error!("Poll cycle failed: {}", e);
    }

    // Closing the queue lets the worker finish the backlog and exit
    drop(poller);
    let stats = delivery.await?;
    info!("Delivered {} posts, {} failed", stats.delivered, stats.failed);

    Ok(())
}

async fn scan(config: &RelayConfig) -> Result<()> {
    let scanner = PageScanner::new(config.scan_config())?;
    let posts = scanner.scan(&config.community_key()).await?;

    if posts.is_empty() {
        println!("No posts found in {}", config.community_key());
        return Ok(());
    }

    println!("{}", serde_json::to_string_pretty(&posts)?);
    Ok(())
}
