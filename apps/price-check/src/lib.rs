//! # farmacia-price-check
//!
//! Quotes one product document from the command line.
//!
//! ## Flow
//! ```text
//! args ─► AppConfig::load ─► PriceResolver::new(rules)
//!                                   │
//! product.json ─► ProductDocument ──┤
//!                                   ▼
//!                        resolve(now, weekday, flags)
//!                                   │
//!                                   ▼
//!                     QuoteReport { resolution, line } ─► stdout
//! ```
//!
//! Document problems the resolver tolerates (out-of-range percentages,
//! inverted windows, missing category) are still quoted, and listed under
//! `diagnostics` in the report.

pub mod args;
pub mod config;
pub mod error;

use chrono::{DateTime, Utc, Weekday};
use farmacia_core::validation::{validate_category, validate_promotion_source};
use farmacia_core::{
    CustomerFlags, LineQuote, PriceResolution, PriceResolutionInput, PriceResolver, ProductDocument,
    PromotionSource,
};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

pub use args::{Command, QuoteArgs, USAGE};
pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// What the CLI prints for one quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteReport {
    pub product: String,
    pub barcode: String,
    pub category: String,
    pub priced_at: DateTime<Utc>,
    /// 0 = Sunday.
    pub weekday: u32,
    pub resolution: PriceResolution,
    pub line: LineQuote,
    /// Back-office validation failures found on the document.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<String>,
}

/// Initializes logging to stderr so stdout stays machine-readable.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,farmacia=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Runs the CLI and returns the text to print on stdout.
pub fn run<I>(args: I) -> AppResult<String>
where
    I: IntoIterator<Item = String>,
{
    let args = match Command::parse(args)? {
        Command::Help => return Ok(USAGE.to_string()),
        Command::Quote(args) => args,
    };
    info!(version = env!("CARGO_PKG_VERSION"), product = %args.product.display(), "Starting price check");

    let config = AppConfig::load(args.config.clone())?;
    let json = std::fs::read_to_string(&args.product)?;
    let document = ProductDocument::from_json(&json)?;

    let report = quote_document(&document, &args, &config, Utc::now())?;
    render(&report, config.output.pretty)
}

/// Prices a decoded document. `now` is used when `--at` was not given.
pub fn quote_document(
    document: &ProductDocument,
    args: &QuoteArgs,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> AppResult<QuoteReport> {
    let resolver = PriceResolver::new(config.pricing.clone())?;

    let at = args.at.unwrap_or(now);
    let weekday: Weekday = args.weekday.unwrap_or_else(|| resolver.weekday_for(at));

    let promos = document.promotion_source();
    let diagnostics = document_diagnostics(document, &promos);

    let input = PriceResolutionInput::new(
        document.price,
        document.product_context(),
        promos,
        at,
        weekday,
    )
    .customer(CustomerFlags {
        is_loyalty_customer: args.loyalty,
        is_elderly: args.inapam,
    });

    let resolution = resolver.resolve(&input);
    let line = LineQuote::from_resolution(&resolution, args.quantity)?;

    info!(
        product = %document.name,
        quantity = args.quantity,
        total = %line.line_total,
        label = %line.applied_promotion,
        "Quoted"
    );

    Ok(QuoteReport {
        product: document.name.clone(),
        barcode: document.barcode.clone(),
        category: document.category.clone(),
        priced_at: at,
        weekday: weekday.num_days_from_sunday(),
        resolution,
        line,
        diagnostics,
    })
}

fn document_diagnostics(document: &ProductDocument, promos: &PromotionSource) -> Vec<String> {
    [validate_category(&document.category), validate_promotion_source(promos)]
        .into_iter()
        .filter_map(Result::err)
        .map(|e| {
            warn!(product = %document.name, error = %e, "Product document fails validation");
            e.to_string()
        })
        .collect()
}

pub fn render(report: &QuoteReport, pretty: bool) -> AppResult<String> {
    let text = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    Ok(text)
}
