//! Velaris CLI - database and account maintenance.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations (catalog schema and session table)
//! velaris-cli migrate
//!
//! # Insert the demo catalog into an empty products table
//! velaris-cli seed
//!
//! # Create the configured admin account if it does not exist
//! velaris-cli admin ensure
//! velaris-cli admin ensure --username studio
//! ```
//!
//! Configuration is read from the same environment variables as the
//! server (`VELARIS_DATABASE_URL`, `ADMIN_USERNAME`, `ADMIN_PASSWORD`, ...),
//! including a `.env` file if present.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "velaris-cli")]
#[command(author, version, about = "Velaris CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the demo catalog into an empty database
    Seed,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create the admin account unless one with the username exists
    Ensure {
        /// Username to ensure (defaults to `ADMIN_USERNAME`)
        #[arg(short, long)]
        username: Option<String>,
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
        Commands::Seed => {
            commands::seed::run().await?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Ensure { username } => {
                commands::admin::ensure(username.as_deref()).await?;
            }
        },
    }
    Ok(())
}
