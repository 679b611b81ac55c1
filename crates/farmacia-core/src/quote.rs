//! # Line Quotes
//!
//! Turns a unit [`PriceResolution`] into the amounts printed on a ticket
//! line. This is where floating-point unit prices become [`Money`].
//!
//! ## User Workflow
//! ```text
//! Scan "Paracetamol" ×3
//!      │
//!      ▼
//! PriceResolver::resolve  → final 85.5, label "Lunes-INAPAM"
//!      │
//!      ▼
//! LineQuote::from_resolution(&res, 3) ← THIS MODULE
//!      │
//!      ▼
//! unit $85.50 · line $256.50 · discount $43.50 · wallet $0.00
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::PriceResolution;
use crate::MAX_ITEM_QUANTITY;

/// A priced ticket line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineQuote {
    pub quantity: i64,
    pub base_unit_price: Money,
    pub unit_price: Money,
    /// `base_unit_price - unit_price`, so the two always reconcile.
    pub unit_discount: Money,
    pub unit_wallet_credit: Money,
    pub line_total: Money,
    pub line_discount: Money,
    pub line_wallet_credit: Money,
    pub applied_promotion: String,
    pub discount_display: String,
}

impl LineQuote {
    /// Builds a line from a unit resolution and a quantity.
    ///
    /// Unit amounts are rounded to cents first, then multiplied, so the
    /// line always equals what the customer sees per unit × quantity.
    pub fn from_resolution(resolution: &PriceResolution, quantity: i64) -> CoreResult<Self> {
        check_quantity(quantity)?;

        let base_unit_price = Money::from_decimal(resolution.base_price());
        let unit_price = Money::from_decimal(resolution.final_price);
        let unit_discount = base_unit_price
            .checked_sub(unit_price)
            .ok_or(CoreError::AmountOverflow { field: "unitDiscount" })?;
        let unit_wallet_credit = Money::from_decimal(resolution.unit_wallet_credit);

        Ok(LineQuote {
            quantity,
            base_unit_price,
            unit_price,
            unit_discount,
            unit_wallet_credit,
            line_total: line_amount(unit_price, quantity, "lineTotal")?,
            line_discount: line_amount(unit_discount, quantity, "lineDiscount")?,
            line_wallet_credit: line_amount(unit_wallet_credit, quantity, "lineWalletCredit")?,
            applied_promotion: resolution.applied_promotion_label.clone(),
            discount_display: resolution.discount_display.clone(),
        })
    }
}

/// Quantity must be in `1..=MAX_ITEM_QUANTITY`.
fn check_quantity(quantity: i64) -> CoreResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }
        .into());
    }
    if quantity > MAX_ITEM_QUANTITY {
        return Err(CoreError::QuantityTooLarge {
            requested: quantity,
            max: MAX_ITEM_QUANTITY,
        });
    }
    Ok(())
}

fn line_amount(unit: Money, quantity: i64, field: &'static str) -> CoreResult<Money> {
    unit.checked_multiply_quantity(quantity)
        .ok_or(CoreError::AmountOverflow { field })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolution(final_price: f64, discount: f64, wallet: f64) -> PriceResolution {
        PriceResolution {
            final_price,
            unit_discount: discount,
            unit_wallet_credit: wallet,
            applied_promotion_label: "Lunes-INAPAM".to_string(),
            discount_display: "10% + 5%".to_string(),
            warnings: vec![],
        }
    }

    #[test]
    fn test_line_from_inapam_resolution() {
        let quote = LineQuote::from_resolution(&resolution(85.5, 14.5, 0.0), 3).unwrap();
        assert_eq!(quote.unit_price.cents(), 8550);
        assert_eq!(quote.base_unit_price.cents(), 10000);
        assert_eq!(quote.unit_discount.cents(), 1450);
        assert_eq!(quote.line_total.cents(), 25650);
        assert_eq!(quote.line_discount.cents(), 4350);
        assert!(quote.line_wallet_credit.is_zero());
        assert_eq!(quote.applied_promotion, "Lunes-INAPAM");
    }

    #[test]
    fn test_wallet_rounds_per_unit() {
        // 2% of 33.33 = 0.6666 → $0.67 per unit
        let quote = LineQuote::from_resolution(&resolution(33.33, 0.0, 0.6666), 2).unwrap();
        assert_eq!(quote.unit_wallet_credit.cents(), 67);
        assert_eq!(quote.line_wallet_credit.cents(), 134);
    }

    #[test]
    fn test_quantity_limits() {
        let res = resolution(10.0, 0.0, 0.0);
        assert!(matches!(
            LineQuote::from_resolution(&res, 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            LineQuote::from_resolution(&res, 1000),
            Err(CoreError::QuantityTooLarge { requested: 1000, max: 999 })
        ));
        assert!(LineQuote::from_resolution(&res, 999).is_ok());
    }

    #[test]
    fn test_huge_price_does_not_overflow() {
        let res = resolution(1e300, 0.0, 0.0);
        let quote = LineQuote::from_resolution(&res, 2).unwrap();
        assert_eq!(quote.unit_price, Money::MAX_DECIMAL);
        assert_eq!(quote.line_total.cents(), Money::MAX_DECIMAL.cents() * 2);
        assert!(quote.line_discount.is_zero());
    }

    #[test]
    fn test_line_amount_overflow_is_an_error() {
        assert!(matches!(
            line_amount(Money::from_cents(i64::MAX), 2, "lineTotal"),
            Err(CoreError::AmountOverflow { field: "lineTotal" })
        ));
    }

    #[test]
    fn test_serializes_cents() {
        let quote = LineQuote::from_resolution(&resolution(85.5, 14.5, 0.0), 1).unwrap();
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["unitPrice"], 8550);
        assert_eq!(json["appliedPromotion"], "Lunes-INAPAM");
    }
}
