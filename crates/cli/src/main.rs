//! VerzendConnect CLI - Drive the storefront cart and search from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add two of product 12 to the cart
//! vc-cli cart add 12 -q 2
//!
//! # Rent product 12 for a weekend
//! vc-cli cart add 12 --from 2026-08-01 --to 2026-08-03
//!
//! # Change or remove a cart line
//! vc-cli cart update 12 3
//! vc-cli cart remove 12
//!
//! # Empty the cart
//! vc-cli cart clear
//!
//! # Live search
//! vc-cli search "party tent"
//! ```
//!
//! # Environment Variables
//!
//! See `verzend_storefront::config`. `STOREFRONT_BASE_URL` is required;
//! `STOREFRONT_CSRF_TOKEN` must be set for the cart commands. The backend
//! keys the cart on its session cookie: the first cart command prints the
//! session it was given, and exporting it as `STOREFRONT_SESSION_ID` makes
//! later commands work on the same cart.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use verzend_core::{ProductId, RentalPeriod};
use verzend_storefront::StorefrontConfig;

mod commands;

#[derive(Parser)]
#[command(name = "vc-cli")]
#[command(author, version, about = "VerzendConnect storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Modify the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Search products the way the header search box does
    Search {
        /// Search query
        query: String,

        /// Print the rendered dropdown markup instead of a table
        #[arg(long)]
        html: bool,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Add a product to the cart
    Add {
        /// Product ID
        product_id: ProductId,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: i64,

        /// Rental start date (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<String>,

        /// Rental end date (YYYY-MM-DD)
        #[arg(long, requires = "from")]
        to: Option<String>,
    },
    /// Set the quantity of a cart line
    Update {
        /// Product ID
        product_id: ProductId,

        /// New quantity
        quantity: i64,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: ProductId,
    },
    /// Remove everything from the cart
    Clear,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configuration is needed before tracing so Sentry can be wired in
    let config = StorefrontConfig::from_env();
    let _sentry_guard = config.as_ref().ok().and_then(init_sentry);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "verzend_storefront=info,vc_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let result: Result<(), Box<dyn std::error::Error>> = match config {
        Ok(config) => run(cli, &config).await,
        Err(e) => Err(e.into()),
    };

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Add {
                product_id,
                quantity,
                from,
                to,
            } => {
                let rental = match from.zip(to) {
                    Some((from, to)) => Some(RentalPeriod::parse(&from, &to)?),
                    None => None,
                };
                commands::cart::add(config, product_id, quantity, rental).await?;
            }
            CartAction::Update {
                product_id,
                quantity,
            } => commands::cart::update(config, product_id, quantity).await?,
            CartAction::Remove { product_id } => commands::cart::remove(config, product_id).await?,
            CartAction::Clear => commands::cart::clear(config).await?,
        },
        Commands::Search { query, html } => commands::search::run(config, &query, html).await?,
    }
    Ok(())
}
