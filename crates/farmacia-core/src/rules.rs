//! # Pricing Rules
//!
//! The tunable constants of price resolution. This is a plain serde type:
//! the core never loads it, apps read it from `pricing.toml` and the
//! environment and hand it over.
//!
//! ```toml
//! wallet_rate = 0.02
//! inapam_factor = 0.95
//! inapam_max_prior_discount_ratio = 0.25
//! wallet_excluded_categories = ["Recargas", "Servicio Médico"]
//! utc_offset_minutes = -360
//! ```

use serde::{Deserialize, Serialize};

use crate::calendar::{FixedOffsetCalendar, MEXICO_CITY_OFFSET_MINUTES};
use crate::error::ValidationError;
use crate::validation::ValidationResult;

/// Rules applied by `PriceResolver`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingRules {
    /// Wallet credit granted per unit, as a fraction of the final price.
    pub wallet_rate: f64,

    /// INAPAM multiplies the already-discounted price by this factor.
    pub inapam_factor: f64,

    /// INAPAM only applies while the prior discount is strictly below
    /// this fraction of the base price.
    pub inapam_max_prior_discount_ratio: f64,

    /// Categories that never earn wallet credit.
    pub wallet_excluded_categories: Vec<String>,

    /// Local time zone of the store, in minutes east of UTC.
    pub utc_offset_minutes: i32,
}

impl Default for PricingRules {
    fn default() -> Self {
        PricingRules {
            wallet_rate: 0.02,
            inapam_factor: 0.95,
            inapam_max_prior_discount_ratio: 0.25,
            wallet_excluded_categories: vec!["Recargas".to_string(), "Servicio Médico".to_string()],
            utc_offset_minutes: MEXICO_CITY_OFFSET_MINUTES,
        }
    }
}

impl PricingRules {
    /// Whether a product category is excluded from wallet credit.
    ///
    /// Comparison ignores case, surrounding whitespace and accents.
    pub fn is_wallet_excluded(&self, category: &str) -> bool {
        let category = normalize(category);
        self.wallet_excluded_categories
            .iter()
            .any(|excluded| normalize(excluded) == category)
    }

    /// The INAPAM reduction as a percentage, e.g. `5.0` for a 0.95 factor.
    pub fn inapam_percentage(&self) -> f64 {
        (1.0 - self.inapam_factor) * 100.0
    }

    /// Checks that every rate is a usable fraction.
    pub fn validate(&self) -> ValidationResult<()> {
        check_fraction("wallet_rate", self.wallet_rate)?;
        check_fraction("inapam_factor", self.inapam_factor)?;
        check_fraction(
            "inapam_max_prior_discount_ratio",
            self.inapam_max_prior_discount_ratio,
        )?;
        FixedOffsetCalendar::from_utc_offset_minutes(self.utc_offset_minutes)?;
        Ok(())
    }
}

fn check_fraction(field: &str, value: f64) -> ValidationResult<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

/// Lowercases, trims, collapses inner whitespace and strips Spanish accents.
///
/// ```rust
/// use farmacia_core::rules::normalize;
///
/// assert_eq!(normalize("  Servicio   MÉDICO "), "servicio medico");
/// ```
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.chars().flat_map(char::to_lowercase).map(fold_accent).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_are_valid() {
        let rules = PricingRules::default();
        assert!(rules.validate().is_ok());
        assert!((rules.inapam_percentage() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_wallet_exclusion_is_normalized() {
        let rules = PricingRules::default();
        assert!(rules.is_wallet_excluded("Recargas"));
        assert!(rules.is_wallet_excluded(" RECARGAS "));
        assert!(rules.is_wallet_excluded("servicio medico"));
        assert!(rules.is_wallet_excluded("Servicio Médico"));
        assert!(!rules.is_wallet_excluded("Medicamentos"));
        assert!(!rules.is_wallet_excluded(""));
    }

    #[test]
    fn test_invalid_rates_rejected() {
        let rules = PricingRules {
            inapam_factor: 1.5,
            ..Default::default()
        };
        assert!(rules.validate().is_err());

        let rules = PricingRules {
            wallet_rate: f64::NAN,
            ..Default::default()
        };
        assert!(rules.validate().is_err());

        let rules = PricingRules {
            utc_offset_minutes: 5000,
            ..Default::default()
        };
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_partial_rules_keep_defaults() {
        let rules: PricingRules = serde_json::from_str(r#"{"wallet_rate": 0.03}"#).unwrap();
        assert_eq!(rules.wallet_rate, 0.03);
        assert_eq!(rules.inapam_factor, 0.95);
        assert_eq!(rules.wallet_excluded_categories.len(), 2);
    }
}
