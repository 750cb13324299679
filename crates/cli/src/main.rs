//! PerkPass CLI - Moderation and maintenance tools.
//!
//! Works directly on the server's data directory, so run it against a
//! stopped server (the server keeps its own copy of the state in memory).
//!
//! # Usage
//!
//! ```bash
//! # Show the review queue
//! pp-cli --data-dir ./data coupons list --pending
//!
//! # Approve or deny a submission
//! pp-cli coupons approve coupon-1234
//! pp-cli coupons deny coupon-1234
//!
//! # Submit coupons from a YAML file
//! pp-cli coupons import coupons.yaml
//!
//! # Generate redemption codes
//! pp-cli codes generate --kind custom --prefix BBQ --count 5
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "pp-cli")]
#[command(author, version, about = "PerkPass CLI tools")]
struct Cli {
    /// Directory holding the server's JSON blobs
    #[arg(long, global = true, env = "PERKPASS_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and moderate coupons
    Coupons {
        #[command(subcommand)]
        action: CouponAction,
    },
    /// Redemption codes
    Codes {
        #[command(subcommand)]
        action: CodeAction,
    },
}

#[derive(Subcommand)]
enum CouponAction {
    /// List coupons
    List {
        /// Show the review queue instead of listed coupons
        #[arg(long)]
        pending: bool,
    },
    /// Approve a pending coupon
    Approve { id: String },
    /// Deny a pending coupon
    Deny { id: String },
    /// Submit every coupon in a YAML list for review
    Import { file: PathBuf },
}

#[derive(Subcommand)]
enum CodeAction {
    /// Generate redemption codes
    Generate {
        /// Code shape (`full`, `short`, `custom`)
        #[arg(short, long, default_value = "full")]
        kind: String,

        /// Prefix for custom codes
        #[arg(short, long)]
        prefix: Option<String>,

        /// Random characters after the prefix (custom codes)
        #[arg(short, long)]
        length: Option<usize>,

        /// How many codes to generate
        #[arg(short, long, default_value_t = 1)]
        count: usize,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

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
        Commands::Coupons { action } => {
            let data_dir = cli
                .data_dir
                .ok_or("--data-dir or PERKPASS_DATA_DIR is required")?;
            let coupons = commands::coupons::open(&data_dir).await?;
            match action {
                CouponAction::List { pending } => commands::coupons::list(&coupons, pending).await,
                CouponAction::Approve { id } => commands::coupons::approve(&coupons, &id).await?,
                CouponAction::Deny { id } => commands::coupons::deny(&coupons, &id).await?,
                CouponAction::Import { file } => commands::coupons::import(&coupons, &file).await?,
            }
        }
        Commands::Codes { action } => match action {
            CodeAction::Generate {
                kind,
                prefix,
                length,
                count,
            } => commands::codes::generate(&kind, prefix.as_deref(), length, count)?,
        },
    }
    Ok(())
}
