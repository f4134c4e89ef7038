//! Cotador CLI - catalog checks and bootstrap tasks.
//!
//! # Usage
//!
//! ```bash
//! # Validate the plan catalog
//! cotador-cli catalog check
//! cotador-cli catalog check --dir crates/portal/content
//!
//! # Register the bootstrap administrator on the platform
//! cotador-cli admin bootstrap -n "Admin" -e admin@temmaissaude.com \
//!     -t "(11) 98765-4321" -p 123456
//! ```
//!
//! # Commands
//!
//! - `catalog check` - Load and validate the plan catalog
//! - `admin bootstrap` - Register the reserved administrator account

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "cotador-cli")]
#[command(author, version, about = "Cotador CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect the plan catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the administrator account
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Load and validate the plan catalog
    Check {
        /// Content directory holding plans.json
        #[arg(long, default_value = "crates/portal/content")]
        dir: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Register the bootstrap administrator on the platform
    Bootstrap {
        /// Administrator display name
        #[arg(short, long)]
        name: String,

        /// Contact email address
        #[arg(short, long)]
        email: String,

        /// Contact phone
        #[arg(short = 't', long)]
        phone: String,

        /// Six-digit numeric password
        #[arg(short, long)]
        password: String,
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
        Commands::Catalog { action } => match action {
            CatalogAction::Check { dir } => commands::catalog::check(&dir)?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Bootstrap {
                name,
                email,
                phone,
                password,
            } => {
                commands::admin::bootstrap(&name, &email, &phone, &password).await?;
            }
        },
    }
    Ok(())
}
