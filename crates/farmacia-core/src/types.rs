//! # Domain Types
//!
//! Promotion schedules and the input/output records of price resolution.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────┐                       │
//! │  │ PromotionSource (read-only, from product)    │                       │
//! │  │  weekly: WeeklySchedule ── [DayPromotion; 7] │  Sunday = 0           │
//! │  │  seasonal: Option<SeasonalPromotion>         │  "Temporada"          │
//! │  │  inapam_discount_enabled: bool               │                       │
//! │  └──────────────────────────────────────────────┘                       │
//! │                     │                                                   │
//! │                     ▼                                                   │
//! │  PriceResolutionInput ──► PriceResolver ──► PriceResolution             │
//! │  (base price, category,                      (final price, discount,    │
//! │   now, weekday, flags)                        wallet, label, display)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing here is mutated by the resolver. Each call builds a fresh
//! [`PriceResolution`].

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Labels
// =============================================================================

/// Promotion labels written to the ticket.
pub mod label {
    /// Seasonal promotion won.
    pub const SEASONAL: &str = "Temporada";
    /// Senior-citizen (INAPAM) reduction.
    pub const INAPAM: &str = "INAPAM";
    /// Loyalty customer without any other promotion.
    pub const LOYALTY: &str = "Cliente";
    /// INAPAM reduction plus loyalty wallet credit.
    pub const INAPAM_LOYALTY: &str = "INAPAM-Cliente";
    /// Nothing applied.
    pub const NONE: &str = "Ninguno";
    /// Separator between stacked labels.
    pub const SEPARATOR: char = '-';
}

// =============================================================================
// Day Promotion
// =============================================================================

/// A weekday promotion (one per day of the week).
///
/// A zero percentage means the slot is unused. Missing window bounds are
/// open-ended; see `PriceResolver` for the exact window policy.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DayPromotion {
    /// Discount in percent (0-100).
    pub percentage: f64,

    /// Whether loyalty customers also earn wallet credit under this promo.
    pub wallet_eligible: bool,

    /// First local day the promotion is valid (inclusive).
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,

    /// Last local day the promotion is valid (inclusive).
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
}

impl DayPromotion {
    /// An always-on promotion with the given percentage.
    pub fn new(percentage: f64) -> Self {
        DayPromotion {
            percentage,
            ..Default::default()
        }
    }

    /// Restricts the promotion to an inclusive window of local days.
    pub fn with_window(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }

    /// Marks the promotion as granting wallet credit.
    pub fn with_wallet(mut self) -> Self {
        self.wallet_eligible = true;
        self
    }
}

// =============================================================================
// Seasonal Promotion
// =============================================================================

/// The single date-ranged "Temporada" promotion of a product.
///
/// Only considered when both bounds are present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SeasonalPromotion {
    pub percentage: f64,
    pub wallet_eligible: bool,
    #[ts(as = "Option<String>")]
    pub start_date: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub end_date: Option<NaiveDate>,
}

impl SeasonalPromotion {
    pub fn new(percentage: f64, start: NaiveDate, end: NaiveDate) -> Self {
        SeasonalPromotion {
            percentage,
            wallet_eligible: false,
            start_date: Some(start),
            end_date: Some(end),
        }
    }

    pub fn with_wallet(mut self) -> Self {
        self.wallet_eligible = true;
        self
    }

    /// Both bounds, if the promotion is fully dated.
    pub fn window(&self) -> Option<(NaiveDate, NaiveDate)> {
        Some((self.start_date?, self.end_date?))
    }
}

// =============================================================================
// Weekly Schedule
// =============================================================================

/// Seven weekday promotions, indexed Sunday = 0 through Saturday = 6.
///
/// Serialized through [`WeeklyDays`] with the Spanish day names used on
/// stored products.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "WeeklyDays", into = "WeeklyDays")]
pub struct WeeklySchedule {
    days: [DayPromotion; 7],
}

impl WeeklySchedule {
    /// Weekdays in slot order (Sunday first).
    pub const ORDER: [Weekday; 7] = [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ];

    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the promotion configured for a weekday.
    pub fn day(&self, weekday: Weekday) -> &DayPromotion {
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    /// Replaces the promotion for a weekday.
    pub fn set(&mut self, weekday: Weekday, promotion: DayPromotion) {
        self.days[weekday.num_days_from_sunday() as usize] = promotion;
    }

    /// Builder form of [`WeeklySchedule::set`].
    pub fn with_day(mut self, weekday: Weekday, promotion: DayPromotion) -> Self {
        self.set(weekday, promotion);
        self
    }

    /// Iterates `(weekday, promotion)` from Sunday to Saturday.
    pub fn iter(&self) -> impl Iterator<Item = (Weekday, &DayPromotion)> {
        Self::ORDER.into_iter().zip(self.days.iter())
    }
}

/// Wire form of [`WeeklySchedule`]: one named field per Spanish day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct WeeklyDays {
    pub domingo: DayPromotion,
    pub lunes: DayPromotion,
    pub martes: DayPromotion,
    pub miercoles: DayPromotion,
    pub jueves: DayPromotion,
    pub viernes: DayPromotion,
    pub sabado: DayPromotion,
}

impl From<WeeklyDays> for WeeklySchedule {
    fn from(days: WeeklyDays) -> Self {
        let WeeklyDays {
            domingo,
            lunes,
            martes,
            miercoles,
            jueves,
            viernes,
            sabado,
        } = days;
        WeeklySchedule {
            days: [domingo, lunes, martes, miercoles, jueves, viernes, sabado],
        }
    }
}

impl From<WeeklySchedule> for WeeklyDays {
    fn from(schedule: WeeklySchedule) -> Self {
        let [domingo, lunes, martes, miercoles, jueves, viernes, sabado] = schedule.days;
        WeeklyDays {
            domingo,
            lunes,
            martes,
            miercoles,
            jueves,
            viernes,
            sabado,
        }
    }
}

/// Maps the 0 = Sunday .. 6 = Saturday convention onto [`Weekday`].
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    WeeklySchedule::ORDER.get(index as usize).copied()
}

// =============================================================================
// Promotion Source
// =============================================================================

/// Everything promotional stored on a product.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PromotionSource {
    #[ts(as = "WeeklyDays")]
    pub weekly: WeeklySchedule,
    pub seasonal: Option<SeasonalPromotion>,
    /// The product accepts the INAPAM senior discount.
    pub inapam_discount_enabled: bool,
}

// =============================================================================
// Product Context
// =============================================================================

/// The part of a product the resolver needs besides its promotions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductContext {
    pub category: String,
}

impl ProductContext {
    pub fn new(category: impl Into<String>) -> Self {
        ProductContext {
            category: category.into(),
        }
    }
}

// =============================================================================
// Resolution Input / Output
// =============================================================================

/// Who is buying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFlags {
    pub is_loyalty_customer: bool,
    /// Presented an INAPAM card.
    pub is_elderly: bool,
}

/// One pricing request for one unit of one product.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceResolutionInput {
    pub base_price: f64,
    pub product: ProductContext,
    pub promos: PromotionSource,
    pub now: DateTime<Utc>,
    /// Pre-computed local weekday of `now`.
    pub weekday: Weekday,
    pub is_loyalty_customer: bool,
    pub is_elderly: bool,
}

impl PriceResolutionInput {
    /// Creates an input for an anonymous, non-elderly customer.
    pub fn new(
        base_price: f64,
        product: ProductContext,
        promos: PromotionSource,
        now: DateTime<Utc>,
        weekday: Weekday,
    ) -> Self {
        PriceResolutionInput {
            base_price,
            product,
            promos,
            now,
            weekday,
            is_loyalty_customer: false,
            is_elderly: false,
        }
    }

    pub fn loyalty(mut self, is_loyalty_customer: bool) -> Self {
        self.is_loyalty_customer = is_loyalty_customer;
        self
    }

    pub fn elderly(mut self, is_elderly: bool) -> Self {
        self.is_elderly = is_elderly;
        self
    }

    pub fn customer(self, flags: CustomerFlags) -> Self {
        self.loyalty(flags.is_loyalty_customer)
            .elderly(flags.is_elderly)
    }
}

/// An input value the resolver had to clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingWarning {
    /// Which input was clamped (`basePrice`, `lunes.percentage`, ...).
    pub field: String,
    /// The value as received. NaN serializes as `null`.
    pub original: f64,
    /// The value actually used.
    pub clamped: f64,
}

/// The priced unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceResolution {
    pub final_price: f64,
    /// `base_price - final_price`, never negative.
    pub unit_discount: f64,
    pub unit_wallet_credit: f64,
    /// `Lunes`, `Temporada`, `Lunes-INAPAM`, `Cliente`, `Ninguno`, ...
    pub applied_promotion_label: String,
    /// `10%`, `10% + 5%`, `5%` or empty.
    pub discount_display: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<PricingWarning>,
}

impl PriceResolution {
    /// The undiscounted price this resolution started from.
    pub fn base_price(&self) -> f64 {
        self.final_price + self.unit_discount
    }

    /// True when some discount (weekday, seasonal or INAPAM) was applied.
    pub fn is_discounted(&self) -> bool {
        self.unit_discount > 0.0
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
