//! # Validation Module
//!
//! Two kinds of input checking live here, and they behave differently on
//! purpose:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Bad Numbers Go                               │
//! │                                                                         │
//! │  Back office (editing a product)      Cash register (pricing a unit)    │
//! │  ───────────────────────────────      ───────────────────────────────   │
//! │  validate_* → Err(ValidationError)    clamp_* → (value, Option<Warning>)│
//! │  user fixes the form                  sale goes on, warning logged      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use farmacia_core::validation::{clamp_percentage, validate_percentage};
//!
//! assert!(validate_percentage("lunes.percentage", 120.0).is_err());
//!
//! let (used, warning) = clamp_percentage("lunes.percentage", 120.0);
//! assert_eq!(used, 100.0);
//! assert!(warning.is_some());
//! ```

use chrono::NaiveDate;

use crate::calendar::{LabelFormatter, SpanishLabels};
use crate::error::ValidationError;
use crate::types::{PricingWarning, PromotionSource};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest category name the back office accepts.
pub const MAX_CATEGORY_LEN: usize = 80;

// =============================================================================
// Clamps (never fail)
// =============================================================================

/// Coerces a base price into `[0, ∞)`. NaN and infinities become zero.
pub fn clamp_base_price(price: f64) -> (f64, Option<PricingWarning>) {
    let clamped = if price.is_finite() { price.max(0.0) } else { 0.0 };
    (clamped, warn_if_changed("basePrice", price, clamped))
}

/// Coerces a percentage into `[0, 100]`. NaN becomes zero.
pub fn clamp_percentage(field: &str, percentage: f64) -> (f64, Option<PricingWarning>) {
    let clamped = if percentage.is_nan() {
        0.0
    } else {
        percentage.clamp(0.0, 100.0)
    };
    (clamped, warn_if_changed(field, percentage, clamped))
}

fn warn_if_changed(field: &str, original: f64, clamped: f64) -> Option<PricingWarning> {
    // NaN != NaN, so a NaN original always reports
    if original == clamped {
        return None;
    }
    Some(PricingWarning {
        field: field.to_string(),
        original,
        clamped,
    })
}

// =============================================================================
// Validators (back office)
// =============================================================================

/// Validates a promotion percentage.
///
/// ## Rules
/// - Must be a number
/// - Must be between 0 and 100 (0 = slot unused)
pub fn validate_percentage(field: &str, percentage: f64) -> ValidationResult<()> {
    if percentage.is_nan() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "not a number".to_string(),
        });
    }

    if !(0.0..=100.0).contains(&percentage) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 100.0,
        });
    }

    Ok(())
}

/// Validates a promotion window. Either bound may be missing; when both
/// are present the window must not be inverted.
pub fn validate_promo_window(
    field: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ValidationResult<()> {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            return Err(ValidationError::InvertedWindow {
                field: field.to_string(),
                start: start.to_string(),
                end: end.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates every promotion on a product before it is saved.
///
/// ## Rules
/// - Each weekday percentage is in `[0, 100]` with a non-inverted window
/// - A seasonal promotion with a non-zero percentage has both dates
pub fn validate_promotion_source(source: &PromotionSource) -> ValidationResult<()> {
    let labels = SpanishLabels;

    for (weekday, promo) in source.weekly.iter() {
        let day = labels.weekday_display_name(weekday).to_lowercase();
        validate_percentage(&format!("{day}.percentage"), promo.percentage)?;
        validate_promo_window(&day, promo.start_date, promo.end_date)?;
    }

    if let Some(seasonal) = &source.seasonal {
        validate_percentage("temporada.percentage", seasonal.percentage)?;
        if seasonal.percentage > 0.0 {
            if seasonal.start_date.is_none() {
                return Err(ValidationError::Required {
                    field: "temporada.startDate".to_string(),
                });
            }
            if seasonal.end_date.is_none() {
                return Err(ValidationError::Required {
                    field: "temporada.endDate".to_string(),
                });
            }
        }
        validate_promo_window("temporada", seasonal.start_date, seasonal.end_date)?;
    }

    Ok(())
}

/// Validates a product category name.
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.chars().count() > MAX_CATEGORY_LEN {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: MAX_CATEGORY_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DayPromotion, SeasonalPromotion};
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_clamp_base_price() {
        assert_eq!(clamp_base_price(12.5), (12.5, None));
        assert_eq!(clamp_base_price(0.0), (0.0, None));

        let (price, warning) = clamp_base_price(-3.0);
        assert_eq!(price, 0.0);
        assert_eq!(warning.unwrap().field, "basePrice");

        let (price, warning) = clamp_base_price(f64::NAN);
        assert_eq!(price, 0.0);
        assert!(warning.unwrap().original.is_nan());
    }

    #[test]
    fn test_clamp_percentage() {
        assert_eq!(clamp_percentage("p", 15.0), (15.0, None));
        assert_eq!(clamp_percentage("p", 100.0), (100.0, None));
        assert_eq!(clamp_percentage("p", 150.0).0, 100.0);
        assert_eq!(clamp_percentage("p", -5.0).0, 0.0);
        assert_eq!(clamp_percentage("p", f64::NAN).0, 0.0);
        assert!(clamp_percentage("p", -5.0).1.is_some());
    }

    #[test]
    fn test_validate_percentage() {
        assert!(validate_percentage("p", 0.0).is_ok());
        assert!(validate_percentage("p", 12.5).is_ok());
        assert!(validate_percentage("p", 100.0).is_ok());
        assert!(validate_percentage("p", 100.1).is_err());
        assert!(validate_percentage("p", -1.0).is_err());
        assert!(validate_percentage("p", f64::NAN).is_err());
    }

    #[test]
    fn test_validate_promo_window() {
        assert!(validate_promo_window("w", None, None).is_ok());
        assert!(validate_promo_window("w", Some(date(2025, 1, 1)), None).is_ok());
        assert!(validate_promo_window("w", Some(date(2025, 1, 1)), Some(date(2025, 1, 1))).is_ok());
        assert!(validate_promo_window("w", Some(date(2025, 1, 2)), Some(date(2025, 1, 1))).is_err());
    }

    #[test]
    fn test_validate_promotion_source() {
        let mut source = PromotionSource::default();
        assert!(validate_promotion_source(&source).is_ok());

        source.weekly.set(Weekday::Wed, DayPromotion::new(120.0));
        let err = validate_promotion_source(&source).unwrap_err();
        assert_eq!(err.to_string(), "miércoles.percentage must be between 0 and 100");

        source.weekly.set(Weekday::Wed, DayPromotion::new(20.0));
        source.seasonal = Some(SeasonalPromotion {
            percentage: 10.0,
            start_date: Some(date(2025, 12, 1)),
            ..Default::default()
        });
        assert!(matches!(
            validate_promotion_source(&source),
            Err(ValidationError::Required { .. })
        ));

        source.seasonal = Some(SeasonalPromotion::new(10.0, date(2025, 12, 1), date(2025, 12, 24)));
        assert!(validate_promotion_source(&source).is_ok());
    }

    #[test]
    fn test_validate_category() {
        assert!(validate_category("Medicamentos").is_ok());
        assert!(validate_category("  ").is_err());
        assert!(validate_category(&"x".repeat(81)).is_err());
    }
}
