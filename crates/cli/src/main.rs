//! Lumen CLI - catalog seed files and session store management.
//!
//! # Usage
//!
//! ```bash
//! # Write a demo catalog seed file
//! lumen seed --out catalog.json --seed 7
//!
//! # List the catalog as the storefront would load it
//! lumen catalog list
//! lumen catalog list --from catalog.json
//!
//! # Inspect or empty the persisted cart session
//! lumen cart show
//! lumen cart clear
//! ```
//!
//! # Commands
//!
//! - `seed` - Write a catalog seed file
//! - `catalog list` - Print the catalog with inferred categories
//! - `cart show` - Print the persisted cart and any pending checkout
//! - `cart clear` - Empty the persisted cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lumen")]
#[command(author, version, about = "Lumen storefront CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a catalog seed file
    Seed {
        /// Output path for the JSON seed file
        #[arg(short, long, default_value = "catalog.json")]
        out: PathBuf,

        /// Seed for the synthesized ratings and stock flags
        #[arg(short, long, default_value_t = 7)]
        seed: u64,
    },
    /// Inspect the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the persisted cart session
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum CatalogAction {
    /// Print every product as the storefront would load it
    List {
        /// Read a seed file instead of the built-in demo catalog
        #[arg(short, long)]
        from: Option<PathBuf>,

        /// Seed for the built-in demo catalog
        #[arg(short, long, default_value_t = 7)]
        seed: u64,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Print the persisted cart lines and totals
    Show,
    /// Empty the persisted cart
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
        Commands::Seed { out, seed } => commands::seed::write_file(&out, seed).await?,
        Commands::Catalog { action } => match action {
            CatalogAction::List { from, seed } => {
                commands::catalog::list(from.as_deref(), seed)?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show()?,
            CartAction::Clear => commands::cart::clear()?,
        },
    }
    Ok(())
}
