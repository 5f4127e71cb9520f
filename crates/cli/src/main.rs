//! Rosa Studio CLI - database migrations and maintenance tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! rosa-cli migrate
//!
//! # Replace the catalog with the built-in defaults
//! rosa-cli catalog reset --yes
//!
//! # Create admin user
//! rosa-cli admin create -e admin@example.com -p 'long passphrase' -n "Rosa"
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_DATABASE_URL`, `STOREFRONT_DATABASE_URL` or `DATABASE_URL`
//!   (first one set wins)
//! - `RUST_LOG` - log filter (default: info)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Debug, Parser)]
#[command(name = "rosa-cli")]
#[command(author, version, about = "Rosa Studio CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Manage the shared catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogAction {
    /// Delete all items, categories and the profile, then restore defaults
    Reset {
        /// Confirm the destructive reset
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Login password (at least 8 characters)
        #[arg(short, long)]
        password: String,

        /// Admin display name (defaults to the email's local part)
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Catalog { action } => match action {
            CatalogAction::Reset { yes } => commands::catalog::reset(yes).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                password,
                name,
            } => {
                commands::admin::create_user(&email, name.as_deref(), &password).await?;
            }
        },
    }
    Ok(())
}
