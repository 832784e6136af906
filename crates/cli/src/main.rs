//! Prazo CLI - order SLA reports from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Active orders from the last 60 days, most urgent first
//! prazo orders
//!
//! # Shorter window, at most 2 pages, keep partial results on failure
//! prazo orders --days 30 --max-pages 2 --partial
//!
//! # Abort on the first failed page even if TRACKER_FETCH_POLICY=partial
//! prazo orders --on-error abort
//!
//! # One order in detail (numeric id or gid://shopify/Order/...)
//! prazo order 450789469
//! ```
//!
//! Output is the same JSON envelope the HTTP API returns. Logs go to stderr.
//!
//! # Commands
//!
//! - `orders` - List active orders with stats
//! - `order` - Show one order in detail

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use prazo_server::fetcher::FetchErrorPolicy;

mod commands;

#[derive(Parser)]
#[command(name = "prazo")]
#[command(author, version, about = "Prazo Tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List active (undelivered) orders, most urgent first
    Orders {
        /// Lookback window in days
        #[arg(short, long)]
        days: Option<u32>,

        /// Maximum number of pages to fetch
        #[arg(short, long)]
        max_pages: Option<u32>,

        /// Return the pages fetched so far if a later page fails
        #[arg(long, conflicts_with = "on_error")]
        partial: bool,

        /// Failure policy for the fetch: abort or partial
        #[arg(long, value_name = "POLICY")]
        on_error: Option<FetchErrorPolicy>,

        /// Give up after this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,
    },
    /// Show the full detail of one order
    Order {
        /// Order id (digits or gid://shopify/Order/<digits>)
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // stdout carries the JSON envelope
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "prazo_server=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Orders {
            days,
            max_pages,
            partial,
            on_error,
            deadline_secs,
        } => {
            commands::orders::list(commands::orders::ListArgs {
                days,
                max_pages,
                partial,
                on_error,
                deadline_secs,
            })
            .await?;
        }
        Commands::Order { id } => commands::orders::detail(&id).await?,
    }
    Ok(())
}
