//! # Product Documents
//!
//! Decodes a product as stored in the document database into resolver
//! inputs. Stored documents are loosely typed: prices arrive as numbers,
//! strings, `null` or not at all, and dates as plain strings, timestamps or
//! Extended JSON. Decoding is permissive:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON value                  │  number      │  bool    │  date          │
//! │  ───────────────────────────────────────────────────────────────────────│
//! │  42 / 42.5                   │  42 / 42.5   │  true    │  -             │
//! │  "42.5"                      │  42.5        │  false   │  -             │
//! │  "abc" / "" / null / absent  │  0           │  false   │  None          │
//! │  true                        │  1           │  true    │  -             │
//! │  "2025-03-01"                │  0           │  false   │  2025-03-01    │
//! │  "2025-03-01T06:00:00Z"      │  0           │  false   │  2025-03-01    │
//! │  {"$date": "..."}            │  0           │  false   │  date part     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Field names are camelCase; the Spanish names used by older documents
//! (`precio`, `categoria`, `promosPorDia`, `porcentaje`, ...) are accepted too.
//! When both spellings are present the camelCase one wins.
//!
//! A promotion slot that is not an object (`""`, `0`, `[]`, ...) is treated
//! as absent, and so is a `promosPorDia` that is not an object.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::{
    DayPromotion, ProductContext, PromotionSource, SeasonalPromotion, WeeklySchedule,
};

// =============================================================================
// Documents
// =============================================================================

/// A product record, as far as pricing is concerned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(default, alias = "nombre", deserialize_with = "lenient_string")]
    pub name: String,

    #[serde(default, alias = "codigoBarras", deserialize_with = "lenient_string")]
    pub barcode: String,

    #[serde(default, alias = "categoria", deserialize_with = "lenient_string")]
    pub category: String,

    #[serde(default, alias = "precio", deserialize_with = "lenient_number")]
    pub price: f64,

    #[serde(default, alias = "promosPorDia", deserialize_with = "lenient_weekly")]
    pub weekly_promotions: WeeklyPromotionsDocument,

    #[serde(default, alias = "promoTemporada", deserialize_with = "lenient_promotion")]
    pub seasonal_promotion: Option<PromotionDocument>,

    #[serde(default, alias = "descuentoINAPAM", deserialize_with = "lenient_bool")]
    pub inapam_discount: bool,
}

/// Per-day promotions keyed by Spanish day name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklyPromotionsDocument {
    #[serde(default, deserialize_with = "lenient_promotion")]
    pub domingo: Option<PromotionDocument>,
    #[serde(default, deserialize_with = "lenient_promotion")]
    pub lunes: Option<PromotionDocument>,
    #[serde(default, deserialize_with = "lenient_promotion")]
    pub martes: Option<PromotionDocument>,
    #[serde(default, alias = "miércoles", deserialize_with = "lenient_promotion")]
    pub miercoles: Option<PromotionDocument>,
    #[serde(default, deserialize_with = "lenient_promotion")]
    pub jueves: Option<PromotionDocument>,
    #[serde(default, deserialize_with = "lenient_promotion")]
    pub viernes: Option<PromotionDocument>,
    #[serde(default, alias = "sábado", deserialize_with = "lenient_promotion")]
    pub sabado: Option<PromotionDocument>,
}

/// One stored promotion (weekday or seasonal, same shape).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionDocument {
    #[serde(default, alias = "porcentaje", deserialize_with = "lenient_number")]
    pub percentage: f64,

    #[serde(default, alias = "monedero", deserialize_with = "lenient_bool")]
    pub wallet: bool,

    #[serde(default, alias = "inicio", deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,

    #[serde(default, alias = "fin", deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
}

impl ProductDocument {
    /// Parses a JSON document. Only fails if the text is not a JSON object.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let invalid = |e: serde_json::Error| CoreError::InvalidDocument {
            reason: e.to_string(),
        };
        let mut map = match serde_json::from_str::<Value>(json).map_err(invalid)? {
            Value::Object(map) => map,
            other => {
                return Err(CoreError::InvalidDocument {
                    reason: format!("expected a JSON object, found {}", json_kind(&other)),
                })
            }
        };
        drop_shadowed_aliases(&mut map, PRODUCT_ALIASES);
        serde_json::from_value(Value::Object(map)).map_err(invalid)
    }

    pub fn product_context(&self) -> ProductContext {
        ProductContext::new(self.category.trim())
    }

    pub fn promotion_source(&self) -> PromotionSource {
        PromotionSource {
            weekly: self.weekly_promotions.to_schedule(),
            seasonal: self
                .seasonal_promotion
                .as_ref()
                .map(PromotionDocument::to_seasonal),
            inapam_discount_enabled: self.inapam_discount,
        }
    }
}

impl WeeklyPromotionsDocument {
    pub fn to_schedule(&self) -> WeeklySchedule {
        // Same order as WeeklySchedule::ORDER
        let slots = [
            &self.domingo,
            &self.lunes,
            &self.martes,
            &self.miercoles,
            &self.jueves,
            &self.viernes,
            &self.sabado,
        ];
        WeeklySchedule::ORDER
            .into_iter()
            .zip(slots)
            .fold(WeeklySchedule::new(), |schedule, (weekday, slot)| match slot {
                Some(doc) => schedule.with_day(weekday, doc.to_day()),
                None => schedule,
            })
    }
}

impl PromotionDocument {
    pub fn to_day(&self) -> DayPromotion {
        DayPromotion {
            percentage: self.percentage,
            wallet_eligible: self.wallet,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }

    pub fn to_seasonal(&self) -> SeasonalPromotion {
        SeasonalPromotion {
            percentage: self.percentage,
            wallet_eligible: self.wallet,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

// =============================================================================
// Lenient Deserializers
// =============================================================================

fn lenient_number<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_number(&Value::deserialize(deserializer)?))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_bool(&Value::deserialize(deserializer)?))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(coerce_date(&Value::deserialize(deserializer)?))
}

fn lenient_weekly<'de, D>(deserializer: D) -> Result<WeeklyPromotionsDocument, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(mut map) => {
            drop_shadowed_aliases(&mut map, WEEKDAY_ALIASES);
            Ok(serde_json::from_value(Value::Object(map)).unwrap_or_default())
        }
        _ => Ok(WeeklyPromotionsDocument::default()),
    }
}

fn lenient_promotion<'de, D>(deserializer: D) -> Result<Option<PromotionDocument>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(mut map) => {
            drop_shadowed_aliases(&mut map, PROMOTION_ALIASES);
            Ok(serde_json::from_value(Value::Object(map)).ok())
        }
        Value::Null => Ok(None),
        other => {
            debug!(kind = json_kind(&other), "Ignoring promotion that is not an object");
            Ok(None)
        }
    }
}

// =============================================================================
// Aliases
// =============================================================================

/// `(camelCase, Spanish)` key pairs per document level.
const PRODUCT_ALIASES: &[(&str, &str)] = &[
    ("name", "nombre"),
    ("barcode", "codigoBarras"),
    ("category", "categoria"),
    ("price", "precio"),
    ("weeklyPromotions", "promosPorDia"),
    ("seasonalPromotion", "promoTemporada"),
    ("inapamDiscount", "descuentoINAPAM"),
];

const WEEKDAY_ALIASES: &[(&str, &str)] = &[("miercoles", "miércoles"), ("sabado", "sábado")];

const PROMOTION_ALIASES: &[(&str, &str)] = &[
    ("percentage", "porcentaje"),
    ("wallet", "monedero"),
    ("startDate", "inicio"),
    ("endDate", "fin"),
];

/// Removes aliases whose primary key is also present, which serde would
/// otherwise reject as a duplicate field.
fn drop_shadowed_aliases(map: &mut Map<String, Value>, aliases: &[(&str, &str)]) {
    for &(primary, alias) in aliases {
        if map.contains_key(primary) && map.remove(alias).is_some() {
            debug!(primary, alias, "Both spellings present, keeping the primary key");
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Numeric coercion: anything that is not a finite number becomes 0.
pub fn coerce_number(value: &Value) -> f64 {
    let number = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        Value::Bool(true) => 1.0,
        _ => 0.0,
    };
    if number.is_finite() {
        number
    } else {
        0.0
    }
}

/// Flag coercion: `true`, non-zero numbers and "true"/"1"/"si"/"sí" are true.
pub fn coerce_bool(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => matches!(
            s.trim().to_lowercase().as_str(),
            "true" | "1" | "si" | "sí" | "yes"
        ),
        _ => false,
    }
}

/// Date coercion to the stored calendar day. Unparseable values are `None`.
pub fn coerce_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        Value::Object(map) => map.get("$date").and_then(|inner| match inner {
            Value::Object(long) => long
                .get("$numberLong")
                .and_then(Value::as_str)
                .and_then(|ms| ms.parse::<i64>().ok())
                .and_then(DateTime::<Utc>::from_timestamp_millis)
                .map(|dt| dt.date_naive()),
            other => coerce_date(other),
        }),
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if s.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.date_naive())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_coerce_number() {
        assert_eq!(coerce_number(&json!(42)), 42.0);
        assert_eq!(coerce_number(&json!(12.5)), 12.5);
        assert_eq!(coerce_number(&json!(" 12.5 ")), 12.5);
        assert_eq!(coerce_number(&json!("abc")), 0.0);
        assert_eq!(coerce_number(&json!("")), 0.0);
        assert_eq!(coerce_number(&json!("NaN")), 0.0);
        assert_eq!(coerce_number(&json!(null)), 0.0);
        assert_eq!(coerce_number(&json!(true)), 1.0);
        assert_eq!(coerce_number(&json!([1])), 0.0);
    }

    #[test]
    fn test_coerce_bool() {
        assert!(coerce_bool(&json!(true)));
        assert!(coerce_bool(&json!(1)));
        assert!(coerce_bool(&json!("Sí")));
        assert!(!coerce_bool(&json!("no")));
        assert!(!coerce_bool(&json!(0)));
        assert!(!coerce_bool(&json!(null)));
    }

    #[test]
    fn test_coerce_date() {
        assert_eq!(coerce_date(&json!("2025-03-01")), Some(date(2025, 3, 1)));
        assert_eq!(coerce_date(&json!("2025-03-01T00:00:00.000Z")), Some(date(2025, 3, 1)));
        assert_eq!(coerce_date(&json!("2025-03-01T23:00:00-06:00")), Some(date(2025, 3, 1)));
        assert_eq!(coerce_date(&json!({"$date": "2025-03-01T00:00:00Z"})), Some(date(2025, 3, 1)));
        assert_eq!(
            coerce_date(&json!({"$date": {"$numberLong": "1740787200000"}})),
            Some(date(2025, 3, 1))
        );
        assert_eq!(coerce_date(&json!(1740787200000_i64)), Some(date(2025, 3, 1)));
        assert_eq!(coerce_date(&json!("")), None);
        assert_eq!(coerce_date(&json!("mañana")), None);
        assert_eq!(coerce_date(&json!(null)), None);
    }

    #[test]
    fn test_spanish_document() {
        let doc = ProductDocument::from_json(
            r#"{
                "nombre": "Paracetamol 500mg",
                "categoria": " Medicamentos ",
                "precio": "89.90",
                "descuentoINAPAM": true,
                "promosPorDia": {
                    "lunes": { "porcentaje": 10, "monedero": true },
                    "miércoles": { "porcentaje": "15", "inicio": "2025-03-01", "fin": null }
                },
                "promoTemporada": {
                    "porcentaje": 20,
                    "inicio": { "$date": "2025-12-01T00:00:00Z" },
                    "fin": "2025-12-31"
                }
            }"#,
        )
        .unwrap();

        assert_eq!(doc.price, 89.9);
        assert_eq!(doc.product_context().category, "Medicamentos");

        let source = doc.promotion_source();
        assert!(source.inapam_discount_enabled);
        assert_eq!(source.weekly.day(Weekday::Mon).percentage, 10.0);
        assert!(source.weekly.day(Weekday::Mon).wallet_eligible);
        assert_eq!(source.weekly.day(Weekday::Wed).percentage, 15.0);
        assert_eq!(source.weekly.day(Weekday::Wed).start_date, Some(date(2025, 3, 1)));
        assert_eq!(source.weekly.day(Weekday::Wed).end_date, None);
        assert_eq!(source.weekly.day(Weekday::Fri).percentage, 0.0);

        let seasonal = source.seasonal.unwrap();
        assert_eq!(seasonal.window(), Some((date(2025, 12, 1), date(2025, 12, 31))));
    }

    #[test]
    fn test_camel_case_document_with_garbage() {
        let doc = ProductDocument::from_json(
            r#"{ "name": "Recarga 100", "category": "Recargas", "price": null,
                 "weeklyPromotions": { "viernes": { "percentage": "x" } } }"#,
        )
        .unwrap();
        assert_eq!(doc.price, 0.0);
        assert_eq!(doc.promotion_source().weekly.day(Weekday::Fri).percentage, 0.0);
        assert!(doc.promotion_source().seasonal.is_none());
    }

    #[test]
    fn test_null_weekly_promotions() {
        let doc = ProductDocument::from_json(r#"{ "precio": 10, "promosPorDia": null }"#).unwrap();
        assert_eq!(doc.weekly_promotions, WeeklyPromotionsDocument::default());
    }

    #[test]
    fn test_non_object_promotions_are_absent() {
        let doc = ProductDocument::from_json(
            r#"{ "precio": 50, "promoTemporada": "",
                 "promosPorDia": { "lunes": 0, "martes": [], "jueves": { "porcentaje": 5 } } }"#,
        )
        .unwrap();
        assert!(doc.seasonal_promotion.is_none());
        assert!(doc.weekly_promotions.lunes.is_none());
        assert!(doc.weekly_promotions.martes.is_none());

        let source = doc.promotion_source();
        assert!(source.seasonal.is_none());
        assert_eq!(source.weekly.day(Weekday::Mon), &DayPromotion::default());
        assert_eq!(source.weekly.day(Weekday::Thu).percentage, 5.0);
    }

    #[test]
    fn test_non_object_weekly_promotions() {
        let doc = ProductDocument::from_json(r#"{ "precio": 10, "promosPorDia": "ninguna" }"#).unwrap();
        assert_eq!(doc.weekly_promotions, WeeklyPromotionsDocument::default());
    }

    #[test]
    fn test_both_spellings_keep_camel_case() {
        let doc = ProductDocument::from_json(
            r#"{ "precio": 10, "price": 25,
                 "promoTemporada": { "porcentaje": 5 },
                 "seasonalPromotion": { "percentage": 20, "porcentaje": 5,
                                        "startDate": "2025-12-01", "fin": "2025-12-31" },
                 "promosPorDia": { "sábado": { "porcentaje": 3 }, "sabado": { "porcentaje": 7 } } }"#,
        )
        .unwrap();
        assert_eq!(doc.price, 25.0);

        let seasonal = doc.seasonal_promotion.unwrap();
        assert_eq!(seasonal.percentage, 20.0);
        assert_eq!(seasonal.start_date, Some(date(2025, 12, 1)));
        assert_eq!(seasonal.end_date, Some(date(2025, 12, 31)));

        assert_eq!(doc.weekly_promotions.sabado.unwrap().percentage, 7.0);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(matches!(
            ProductDocument::from_json("42"),
            Err(CoreError::InvalidDocument { .. })
        ));
        assert!(matches!(
            ProductDocument::from_json("{ \"precio\": "),
            Err(CoreError::InvalidDocument { .. })
        ));
    }
}
