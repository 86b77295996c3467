//! cargo-delivery
//!
//! Quotes carts and books claims against the delivery provider from host
//! data files.
//!
//! ```text
//! cargo-delivery quote --cart cart.json --session abc123
//! cargo-delivery book --order order.json [--auto]
//! ```
//!
//! Quote sessions live in memory and end with the process, so `book` never
//! sees the session a previous `quote` saved. Copy the rate's `meta.payload`
//! into the order's `meta_payload` or its shipping line `payload` to book at
//! the quoted price; without one the claim is created without an offer.

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use core_kernel::SessionId;
use domain_quote::InMemoryQuoteSessionStore;
use infra_yandex::{YandexCargoClient, YandexGeocoderClient};
use interface_cli::{Cart, InMemoryOrderRecords, OrderSnapshot, ShippingPorts, ShippingService, ShippingSettings};

#[derive(Debug, Parser)]
#[command(name = "cargo-delivery", version, about = "Cargo delivery quotes and claims")]
struct Cli {
    /// Settings file merged under YCWC_* environment variables
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price a cart and print the rate
    Quote {
        #[arg(long)]
        cart: PathBuf,
        /// Checkout session the quote belongs to
        #[arg(long)]
        session: String,
    },
    /// Create and accept a claim for an order
    ///
    /// The offer payload is read from the order file; sessions from an
    /// earlier `quote` run are not available.
    Book {
        #[arg(long)]
        order: PathBuf,
        /// Follow the automatic booking rules instead of the admin action
        #[arg(long)]
        auto: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = ShippingSettings::load(cli.config.as_deref()).context("failed to load settings")?;
    init_tracing(&settings);
    info!(settings = ?settings, "Settings loaded");

    match cli.command {
        Command::Quote { cart, session } => {
            let cart: Cart = read_json(&cart)?;
            let service = build_service(settings, Arc::new(InMemoryOrderRecords::new()))?;
            let rate = service.quote(&cart, &SessionId::new(session)).await?;
            println!("{}", serde_json::to_string_pretty(&rate)?);
        }
        Command::Book { order, auto } => {
            let order: OrderSnapshot = read_json(&order)?;
            let records = Arc::new(InMemoryOrderRecords::seeded(&order));
            let service = build_service(settings, records.clone())?;

            let output = if auto {
                let outcome = service.auto_create_delivery(&order).await?;
                serde_json::json!({
                    "claim": outcome.as_ref().map(|o| &o.claim),
                    "notes": records.notes(order.order_id).await,
                })
            } else {
                let report = service.manual_create_delivery(&order).await;
                serde_json::json!({
                    "report": report,
                    "message": report.message(),
                    "notes": records.notes(order.order_id).await,
                })
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn build_service(settings: ShippingSettings, records: Arc<InMemoryOrderRecords>) -> anyhow::Result<ShippingService> {
    let cargo = Arc::new(YandexCargoClient::new(&settings.yandex, &settings.oauth_token)?);
    let geocoder = Arc::new(YandexGeocoderClient::new(&settings.yandex)?);
    let sessions = Arc::new(InMemoryQuoteSessionStore::with_ttl(settings.session_ttl()));

    Ok(ShippingService::new(
        settings,
        ShippingPorts {
            pricing: cargo.clone(),
            claims: cargo,
            geocoding: geocoder,
            records,
            sessions,
        },
    ))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn init_tracing(settings: &ShippingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(settings.log_level()))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if settings.log_json {
        registry.with(fmt::layer().json().with_writer(std::io::stderr)).init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
            .init();
    }
}
