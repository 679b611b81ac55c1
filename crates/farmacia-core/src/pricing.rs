//! # Unit Price Resolution
//!
//! Turns (base price, promotion schedule, instant, customer flags) into a
//! final unit price and the label explaining it.
//!
//! ## Stage Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    PriceResolver::resolve                               │
//! │                                                                         │
//! │  base price ──► 1. weekday promo      price × (1 − p/100)     "Lunes"   │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │                 2. seasonal override  only if STRICTLY cheaper          │
//! │                      │                                      "Temporada" │
//! │                      ▼                                                  │
//! │                 3. INAPAM             × 0.95 if prior discount < 25%    │
//! │                      │                                  "Lunes-INAPAM"  │
//! │                      ▼                                                  │
//! │                 4. loyalty fallback   "Cliente" / "INAPAM-Cliente"      │
//! │                      │                                                  │
//! │                      ▼                                                  │
//! │                 PriceResolution       "Ninguno" if still unlabeled      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each stage is a pure function from one running result to the next. Weekday and
//! seasonal discounts never add up: the seasonal one replaces the weekday
//! one wholesale, wallet grant included, or is ignored.
//!
//! ## Example
//! ```rust
//! use chrono::{TimeZone, Utc, Weekday};
//! use farmacia_core::pricing::PriceResolver;
//! use farmacia_core::rules::PricingRules;
//! use farmacia_core::types::*;
//!
//! let resolver = PriceResolver::new(PricingRules::default()).unwrap();
//! let promos = PromotionSource {
//!     weekly: WeeklySchedule::new().with_day(Weekday::Mon, DayPromotion::new(10.0)),
//!     inapam_discount_enabled: true,
//!     ..Default::default()
//! };
//! let now = Utc.with_ymd_and_hms(2025, 3, 3, 18, 0, 0).unwrap();
//! let input = PriceResolutionInput::new(100.0, ProductContext::new("Medicamentos"), promos, now, Weekday::Mon)
//!     .elderly(true);
//!
//! let resolution = resolver.resolve(&input);
//! assert!((resolution.final_price - 85.5).abs() < 1e-9);
//! assert_eq!(resolution.applied_promotion_label, "Lunes-INAPAM");
//! assert_eq!(resolution.discount_display, "10% + 5%");
//! ```

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use tracing::{debug, warn};

use crate::calendar::{FixedOffsetCalendar, LabelFormatter, PromoCalendar, SpanishLabels};
use crate::error::CoreResult;
use crate::rules::PricingRules;
use crate::types::{
    label, CustomerFlags, DayPromotion, PriceResolution, PriceResolutionInput, PricingWarning,
    ProductContext, PromotionSource, SeasonalPromotion,
};
use crate::validation::{clamp_base_price, clamp_percentage};

// =============================================================================
// Stage
// =============================================================================

/// The running result between two resolution stages.
#[derive(Debug, Clone, PartialEq)]
struct Stage {
    final_price: f64,
    unit_discount: f64,
    wallet_credit: f64,
    label: String,
    display: String,
}

impl Stage {
    fn undiscounted(base_price: f64) -> Self {
        Stage {
            final_price: base_price,
            unit_discount: 0.0,
            wallet_credit: 0.0,
            label: String::new(),
            display: String::new(),
        }
    }
}

/// Per-call facts every stage needs.
struct Context<'a> {
    input: &'a PriceResolutionInput,
    base_price: f64,
    /// Loyalty customer buying a category that earns wallet credit.
    wallet_allowed: bool,
}

// =============================================================================
// Price Resolver
// =============================================================================

/// Stateless unit price resolver.
///
/// Holds only read-only rules and collaborators, so one instance can be
/// shared across threads and called concurrently.
#[derive(Debug, Clone)]
pub struct PriceResolver<C = FixedOffsetCalendar, L = SpanishLabels> {
    rules: PricingRules,
    calendar: C,
    labels: L,
}

impl PriceResolver {
    /// Creates a resolver with the store's fixed-offset calendar and
    /// Spanish labels.
    pub fn new(rules: PricingRules) -> CoreResult<Self> {
        rules.validate()?;
        let calendar = FixedOffsetCalendar::from_utc_offset_minutes(rules.utc_offset_minutes)?;
        Ok(Self::with_collaborators(rules, calendar, SpanishLabels))
    }
}

impl<C: PromoCalendar, L: LabelFormatter> PriceResolver<C, L> {
    /// Creates a resolver with explicit collaborators.
    pub fn with_collaborators(rules: PricingRules, calendar: C, labels: L) -> Self {
        PriceResolver {
            rules,
            calendar,
            labels,
        }
    }

    pub fn rules(&self) -> &PricingRules {
        &self.rules
    }

    pub fn calendar(&self) -> &C {
        &self.calendar
    }

    /// The local weekday to pass as [`PriceResolutionInput::weekday`].
    pub fn weekday_for(&self, now: DateTime<Utc>) -> Weekday {
        self.calendar.weekday_of(now)
    }

    /// Resolves the price of one unit.
    ///
    /// Never fails. Out-of-range numbers are clamped, logged, and listed in
    /// [`PriceResolution::warnings`].
    pub fn resolve(&self, input: &PriceResolutionInput) -> PriceResolution {
        let mut warnings = Vec::new();

        let (base_price, clamp) = clamp_base_price(input.base_price);
        warnings.extend(clamp);

        let ctx = Context {
            input,
            base_price,
            wallet_allowed: input.is_loyalty_customer
                && !self.rules.is_wallet_excluded(&input.product.category),
        };

        let stage = self.weekday_stage(&ctx, &mut warnings);
        let stage = self.seasonal_stage(&ctx, stage, &mut warnings);
        let stage = self.inapam_stage(&ctx, stage);
        let stage = self.loyalty_stage(&ctx, stage);

        for warning in &warnings {
            warn!(
                field = %warning.field,
                original = warning.original,
                clamped = warning.clamped,
                "Clamped pricing input"
            );
        }

        let label = if stage.label.is_empty() {
            label::NONE.to_string()
        } else {
            stage.label
        };

        debug!(
            base_price,
            final_price = stage.final_price,
            wallet = stage.wallet_credit,
            label = %label,
            "Resolved unit price"
        );

        PriceResolution {
            final_price: stage.final_price,
            unit_discount: stage.unit_discount,
            unit_wallet_credit: stage.wallet_credit,
            applied_promotion_label: label,
            discount_display: stage.display,
            warnings,
        }
    }

    /// Resolves a unit at `now`, taking the weekday from the calendar.
    pub fn resolve_now(
        &self,
        base_price: f64,
        product: ProductContext,
        promos: PromotionSource,
        now: DateTime<Utc>,
        customer: CustomerFlags,
    ) -> PriceResolution {
        let input = PriceResolutionInput::new(base_price, product, promos, now, self.weekday_for(now))
            .customer(customer);
        self.resolve(&input)
    }

    // =========================================================================
    // Stage 1: weekday promotion
    // =========================================================================

    fn weekday_stage(&self, ctx: &Context<'_>, warnings: &mut Vec<PricingWarning>) -> Stage {
        let weekday = ctx.input.weekday;
        let promo = ctx.input.promos.weekly.day(weekday);
        let day_name = self.labels.weekday_display_name(weekday);

        // Out-of-window slots are never read, so their values are not clamped
        if !self.weekday_window_open(promo, ctx.input.now) {
            return Stage::undiscounted(ctx.base_price);
        }

        let (percentage, clamp) =
            clamp_percentage(&format!("{}.percentage", day_name.to_lowercase()), promo.percentage);
        warnings.extend(clamp);

        if percentage <= 0.0 {
            return Stage::undiscounted(ctx.base_price);
        }

        let final_price = discounted(ctx.base_price, percentage);
        let wallet_credit = if promo.wallet_eligible && ctx.wallet_allowed {
            final_price * self.rules.wallet_rate
        } else {
            0.0
        };

        debug!(day = day_name, percentage, final_price, "Weekday promotion active");

        Stage {
            final_price,
            unit_discount: ctx.base_price - final_price,
            wallet_credit,
            label: day_name.to_string(),
            display: format_percentage(percentage),
        }
    }

    /// Window policy for weekday promotions:
    /// both bounds → inclusive local-day range, no bounds → always open,
    /// one bound → that bound applies and the other side is open.
    fn weekday_window_open(&self, promo: &DayPromotion, now: DateTime<Utc>) -> bool {
        match (promo.start_date, promo.end_date) {
            (Some(_), Some(_)) => self.calendar.is_within_inclusive_local_range(
                self.calendar.start_of_local_day(promo.start_date),
                self.calendar.start_of_local_day(promo.end_date),
                now,
            ),
            (None, None) => true,
            (Some(start), None) => self.local_day_on_or_after(Some(start), now),
            (None, Some(end)) => !self.local_day_on_or_after(next_day(end), now),
        }
    }

    fn local_day_on_or_after(&self, day: Option<NaiveDate>, now: DateTime<Utc>) -> bool {
        match self.calendar.start_of_local_day(day) {
            Some(start) => start.date_naive() <= self.calendar.local_date(now),
            // Past the end of the calendar: nothing is on or after it
            None => false,
        }
    }

    // =========================================================================
    // Stage 2: seasonal override
    // =========================================================================

    fn seasonal_stage(
        &self,
        ctx: &Context<'_>,
        current: Stage,
        warnings: &mut Vec<PricingWarning>,
    ) -> Stage {
        let Some(seasonal) = ctx.input.promos.seasonal.as_ref() else {
            return current;
        };
        if !self.seasonal_window_open(seasonal, ctx.input.now) {
            return current;
        }

        let (percentage, clamp) = clamp_percentage("temporada.percentage", seasonal.percentage);
        warnings.extend(clamp);

        let seasonal_price = discounted(ctx.base_price, percentage);
        if seasonal_price >= current.final_price {
            debug!(
                seasonal_price,
                current_price = current.final_price,
                "Seasonal promotion not cheaper, keeping current price"
            );
            return current;
        }

        let wallet_credit = if seasonal.wallet_eligible && ctx.wallet_allowed {
            seasonal_price * self.rules.wallet_rate
        } else {
            0.0
        };

        debug!(percentage, seasonal_price, "Seasonal promotion overrides");

        Stage {
            final_price: seasonal_price,
            unit_discount: ctx.base_price - seasonal_price,
            wallet_credit,
            label: label::SEASONAL.to_string(),
            display: format_percentage(percentage),
        }
    }

    fn seasonal_window_open(&self, seasonal: &SeasonalPromotion, now: DateTime<Utc>) -> bool {
        let Some((start, end)) = seasonal.window() else {
            return false;
        };
        self.calendar.is_within_inclusive_local_range(
            self.calendar.start_of_local_day(Some(start)),
            self.calendar.start_of_local_day(Some(end)),
            now,
        )
    }

    // =========================================================================
    // Stage 3: INAPAM
    // =========================================================================

    fn inapam_stage(&self, ctx: &Context<'_>, current: Stage) -> Stage {
        let input = ctx.input;
        if !input.is_elderly || !input.promos.inapam_discount_enabled {
            return current;
        }

        let prior_discount = ctx.base_price - current.final_price;
        let cap = self.rules.inapam_max_prior_discount_ratio * ctx.base_price;
        if prior_discount >= cap {
            debug!(prior_discount, cap, "INAPAM skipped, prior discount too deep");
            return current;
        }

        let final_price = current.final_price * self.rules.inapam_factor;
        let inapam_display = format_percentage(self.rules.inapam_percentage());

        let label = if current.label.is_empty() {
            label::INAPAM.to_string()
        } else {
            format!("{}{}{}", current.label, label::SEPARATOR, label::INAPAM)
        };
        let display = if current.display.is_empty() {
            inapam_display
        } else {
            format!("{} + {}", current.display, inapam_display)
        };

        Stage {
            final_price,
            unit_discount: ctx.base_price - final_price,
            wallet_credit: current.wallet_credit,
            label: self.labels.sanitize_label(&label),
            display,
        }
    }

    // =========================================================================
    // Stage 4: loyalty fallback
    // =========================================================================

    fn loyalty_stage(&self, ctx: &Context<'_>, current: Stage) -> Stage {
        if !ctx.wallet_allowed {
            return current;
        }

        let label = if current.label.is_empty() {
            label::LOYALTY
        } else if current.label == label::INAPAM {
            label::INAPAM_LOYALTY
        } else {
            return current;
        };

        Stage {
            wallet_credit: current.final_price * self.rules.wallet_rate,
            label: label.to_string(),
            ..current
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn discounted(base_price: f64, percentage: f64) -> f64 {
    base_price * (1.0 - percentage / 100.0)
}

fn next_day(day: NaiveDate) -> Option<NaiveDate> {
    day.succ_opt()
}

/// Formats a percentage the way tickets print it: `10%`, `12.5%`.
///
/// Rounded to two decimals so float noise (`5.000000000000004`) never
/// reaches a receipt.
pub fn format_percentage(percentage: f64) -> String {
    let rounded = (percentage * 100.0).round() / 100.0;
    format!("{}%", rounded)
}

// =============================================================================
// Unit Tests
// =============================================================================
