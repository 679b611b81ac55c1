//! # Calendar & Label Collaborators
//!
//! The resolver never reads the system clock, the system time zone or a
//! locale. Those come in through two small traits:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  PromoCalendar                     │  LabelFormatter                    │
//! │  ─────────────                     │  ──────────────                    │
//! │  start_of_local_day(date)          │  weekday_display_name(Mon) "Lunes" │
//! │  local_date(now)                   │  sanitize_label(" -Lunes--INAPAM") │
//! │  is_within_inclusive_local_range   │        → "Lunes-INAPAM"            │
//! │                                    │                                    │
//! │  FixedOffsetCalendar (UTC-6)       │  SpanishLabels                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc, Weekday};

use crate::error::ValidationError;
use crate::types::label;

/// Mexico City has stayed on UTC-6 all year since 2022.
pub const MEXICO_CITY_OFFSET_MINUTES: i32 = -360;

// =============================================================================
// Promo Calendar
// =============================================================================

/// Local-day arithmetic in one fixed time zone.
pub trait PromoCalendar {
    /// Midnight at the start of `date` in the local zone. `None` in, `None` out.
    fn start_of_local_day(&self, date: Option<NaiveDate>) -> Option<DateTime<FixedOffset>>;

    /// The local calendar day containing `now`.
    fn local_date(&self, now: DateTime<Utc>) -> NaiveDate;

    /// The local weekday containing `now`.
    fn weekday_of(&self, now: DateTime<Utc>) -> Weekday {
        self.local_date(now).weekday()
    }

    /// Whether `now` falls on a local day within `[start, end]`, inclusive.
    ///
    /// Returns `false` when either bound is missing.
    fn is_within_inclusive_local_range(
        &self,
        start: Option<DateTime<FixedOffset>>,
        end: Option<DateTime<FixedOffset>>,
        now: DateTime<Utc>,
    ) -> bool {
        match (start, end) {
            (Some(start), Some(end)) => {
                let today = self.local_date(now);
                start.date_naive() <= today && today <= end.date_naive()
            }
            _ => false,
        }
    }
}

/// A [`PromoCalendar`] for a zone without daylight saving time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedOffsetCalendar {
    offset: FixedOffset,
}

impl FixedOffsetCalendar {
    pub fn new(offset: FixedOffset) -> Self {
        FixedOffsetCalendar { offset }
    }

    /// Builds a calendar from a UTC offset in minutes (`-360` = UTC-6).
    pub fn from_utc_offset_minutes(minutes: i32) -> Result<Self, ValidationError> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(Self::new)
            .ok_or_else(|| ValidationError::OutOfRange {
                field: "utc_offset_minutes".to_string(),
                min: -1439.0,
                max: 1439.0,
            })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for FixedOffsetCalendar {
    fn default() -> Self {
        Self::from_utc_offset_minutes(MEXICO_CITY_OFFSET_MINUTES)
            .unwrap_or_else(|_| Self::new(Utc.fix()))
    }
}

impl PromoCalendar for FixedOffsetCalendar {
    fn start_of_local_day(&self, date: Option<NaiveDate>) -> Option<DateTime<FixedOffset>> {
        let midnight = date?.and_hms_opt(0, 0, 0)?;
        self.offset.from_local_datetime(&midnight).single()
    }

    fn local_date(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.offset).date_naive()
    }
}

// =============================================================================
// Label Formatter
// =============================================================================

/// Localized weekday names and promotion-label cleanup.
pub trait LabelFormatter {
    fn weekday_display_name(&self, weekday: Weekday) -> &str;

    /// Formatting-only cleanup of a stacked label. Must be idempotent.
    fn sanitize_label(&self, label: &str) -> String;
}

/// Spanish (Mexico) labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpanishLabels;

impl LabelFormatter for SpanishLabels {
    fn weekday_display_name(&self, weekday: Weekday) -> &str {
        match weekday {
            Weekday::Sun => "Domingo",
            Weekday::Mon => "Lunes",
            Weekday::Tue => "Martes",
            Weekday::Wed => "Miércoles",
            Weekday::Thu => "Jueves",
            Weekday::Fri => "Viernes",
            Weekday::Sat => "Sábado",
        }
    }

    fn sanitize_label(&self, raw: &str) -> String {
        raw.split(label::SEPARATOR)
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(&label::SEPARATOR.to_string())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
