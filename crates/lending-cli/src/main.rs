//! Lending CLI
//!
//! Hash, sign and verify debt orders and read token balances against a
//! configured deployment of the lending protocol.

mod commands;

use alloy_primitives::Address;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lending_core::Role;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "lending-cli", version, about = "Hash and sign debt orders")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the commitment hashes and agreement id of an order.
    Hash {
        /// Order JSON file, or "-" for stdin.
        order: PathBuf,
    },
    /// Sign an order as one of its parties.
    Sign {
        role: Role,
        /// Order JSON file, or "-" for stdin.
        order: PathBuf,
    },
    /// Check a party's signature over an order.
    Verify {
        role: Role,
        /// Order JSON file, or "-" for stdin.
        order: PathBuf,
        /// 65-byte r||s||v hex, or a file holding signature JSON.
        signature: String,
    },
    /// Print an ERC20 token balance.
    Balance { token: Address, owner: Address },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lending_cli=info,lending_core=info".into());

    // Logs go to stderr; stdout carries command output.
    let json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    debug!(command = ?cli.command, "Starting lending CLI");

    let client = commands::build_client().context("Failed to configure lending client")?;

    match cli.command {
        Command::Hash { order } => commands::hash(&client, &order),
        Command::Sign { role, order } => commands::sign(&client, role, &order).await,
        Command::Verify {
            role,
            order,
            signature,
        } => commands::verify(&client, role, &order, &signature),
        Command::Balance { token, owner } => commands::balance(&client, token, owner).await,
    }
}
