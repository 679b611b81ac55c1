//! # farmacia-core: Pure Pricing Logic for Farmacia POS
//!
//! This crate decides what one unit of a product costs at a given instant:
//! weekday promotions, the seasonal "Temporada" promotion, the INAPAM
//! senior discount and loyalty-wallet credit. It has zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Farmacia POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │         Web front end / pricing endpoint / price-check CLI      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ ProductDocument, now, flags            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ farmacia-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │ document │►│ pricing  │►│  quote   │ │  money   │          │   │
//! │  │   │ coercion │ │ resolver │ │ ticket   │ │  cents   │          │   │
//! │  │   └──────────┘ └────┬─────┘ └──────────┘ └──────────┘          │   │
//! │  │                     │ calendar · rules · validation             │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO TIME ZONE DATABASE • PURE FUNCTIONS    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Promotion schedules, resolver input and output
//! - [`pricing`] - The unit price resolver
//! - [`calendar`] - Local-day and label collaborators
//! - [`rules`] - Tunable rates and excluded categories
//! - [`document`] - Permissive decoding of stored product documents
//! - [`quote`] - Ticket line amounts in cents
//! - [`money`] - Integer-cents money
//! - [`validation`] - Clamps (cash register) and validators (back office)
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use farmacia_core::{LineQuote, PriceResolutionInput, PriceResolver, PricingRules, ProductDocument};
//!
//! let doc = ProductDocument::from_json(r#"{"categoria": "Medicamentos", "precio": 50}"#).unwrap();
//! let resolver = PriceResolver::new(PricingRules::default()).unwrap();
//!
//! let now = Utc.with_ymd_and_hms(2025, 3, 3, 18, 0, 0).unwrap();
//! let input = PriceResolutionInput::new(
//!     doc.price,
//!     doc.product_context(),
//!     doc.promotion_source(),
//!     now,
//!     resolver.weekday_for(now),
//! )
//! .loyalty(true);
//!
//! let resolution = resolver.resolve(&input);
//! assert_eq!(resolution.applied_promotion_label, "Cliente");
//!
//! let line = LineQuote::from_resolution(&resolution, 2).unwrap();
//! assert_eq!(line.line_total.cents(), 10000);
//! assert_eq!(line.line_wallet_credit.cents(), 200);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calendar;
pub mod document;
pub mod error;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod rules;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calendar::{FixedOffsetCalendar, LabelFormatter, PromoCalendar, SpanishLabels};
pub use document::ProductDocument;
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::PriceResolver;
pub use quote::LineQuote;
pub use rules::PricingRules;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum quantity of a single item on one ticket line.
///
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
