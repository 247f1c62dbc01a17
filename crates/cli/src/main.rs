//! Rablo CLI - Database migrations, seeding and account tools.
//!
//! # Usage
//!
//! ```bash
//! # Run catalog migrations and create the session table
//! rablo-cli migrate
//!
//! # Load products from a YAML file, replacing existing ones
//! rablo-cli seed crates/cli/seed/products.yaml --clear
//!
//! # Create an account (password read from CATALOG_USER_PASSWORD)
//! rablo-cli user create -u ada -e ada@example.com
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the product table
//! - `user create` - Create a login account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "rablo-cli")]
#[command(author, version, about = "Rablo catalog CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Load products from a YAML file
    Seed {
        /// Path to the YAML product list
        file: String,

        /// Delete every existing product first
        #[arg(long)]
        clear: bool,
    },
    /// Manage login accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a new account
    Create {
        /// Login name
        #[arg(short, long)]
        username: String,

        /// Contact email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, clear } => {
            commands::seed::products(&file, clear).await?;
        }
        Commands::User { action } => match action {
            UserAction::Create { username, email } => {
                commands::user::create(&username, &email).await?;
            }
        },
    }
    Ok(())
}
