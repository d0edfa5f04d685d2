//! PostKasir CLI - database migrations and store administration.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! pk-cli migrate
//!
//! # Read-only report: stores and users (emails masked)
//! pk-cli status
//!
//! # Full store setup: create/resolve the store, assign all users to it,
//! # invalidate every session
//! pk-cli setup --store-name "Toko Maju" --currency IDR --timezone Asia/Jakarta
//! ```
//!
//! All commands connect with direct database credentials
//! (`POSTKASIR_DATABASE_URL` or `DATABASE_URL`) and exit the process on
//! completion. `setup` must not run concurrently with itself or with user
//! registration; run it in a maintenance window.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pk-cli")]
#[command(author, version, about = "PostKasir CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Show a read-only database status report
    Status,
    /// Provision the store: assign every user, clear all sessions
    Setup {
        /// Store name used if the store has to be created
        #[arg(long, default_value = "PostKasir Store")]
        store_name: String,

        /// Store currency code used if the store has to be created
        #[arg(long, default_value = "IDR")]
        currency: String,

        /// Store timezone used if the store has to be created
        #[arg(long, default_value = "Asia/Jakarta")]
        timezone: String,
    },
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Status => commands::status::run().await?,
        Commands::Setup {
            store_name,
            currency,
            timezone,
        } => commands::setup::run(&store_name, &currency, &timezone).await?,
    }
    Ok(())
}
