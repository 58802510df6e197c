//! Motorlane CLI - Cache publish and inspection tools.
//!
//! # Usage
//!
//! ```bash
//! # Show product cache status
//! motorlane cache status
//!
//! # Force a refresh from the store ("go live")
//! motorlane cache refresh
//!
//! # Clear the cache (next public read repopulates lazily)
//! motorlane cache clear
//! ```
//!
//! # Commands
//!
//! - `cache status` - Inspect the product cache
//! - `cache refresh` - Force a refresh and republish the catalog
//! - `cache clear` - Invalidate the cache without repopulating

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "motorlane")]
#[command(author, version, about = "Motorlane CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the server's product cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
}

#[derive(Subcommand)]
enum CacheAction {
    /// Show cache status (population, size, age)
    Status,
    /// Force a refresh from the product store
    Refresh,
    /// Clear the cache without repopulating
    Clear,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cache { action } => match action {
            CacheAction::Status => commands::cache::status().await?,
            CacheAction::Refresh => commands::cache::refresh().await?,
            CacheAction::Clear => commands::cache::clear().await?,
        },
    }
    Ok(())
}
