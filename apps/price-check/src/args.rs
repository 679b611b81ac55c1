//! Command-line arguments.
//!
//! ```text
//! farmacia-price-check --product <file.json> [--at <rfc3339>] [--weekday <0-6>]
//!                      [--loyalty] [--inapam] [--qty <n>] [--config <pricing.toml>]
//! ```

use std::path::PathBuf;

use chrono::{DateTime, Utc, Weekday};
use farmacia_core::weekday_from_index;

use crate::error::{AppError, AppResult};

pub const USAGE: &str = "\
Usage: farmacia-price-check --product <file.json> [options]

Options:
  --product <file>    Product document (JSON) to quote
  --at <rfc3339>      Instant to price at (default: now)
  --weekday <0-6>     Force the promo weekday, 0 = Sunday (default: from --at)
  --loyalty           Customer is a loyalty member
  --inapam            Customer presents an INAPAM card
  --qty <n>           Units on the ticket line (default: 1)
  --config <file>     Pricing rules (default: pricing.toml in the config dir)
  -h, --help          Show this message

Environment:
  FARMACIA_WALLET_RATE, FARMACIA_INAPAM_FACTOR, FARMACIA_INAPAM_MAX_PRIOR_DISCOUNT,
  FARMACIA_UTC_OFFSET_MINUTES, FARMACIA_WALLET_EXCLUDED_CATEGORIES, FARMACIA_PRETTY
  RUST_LOG controls logging (stderr).";

/// What the user asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Help,
    Quote(QuoteArgs),
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuoteArgs {
    pub product: PathBuf,
    pub at: Option<DateTime<Utc>>,
    pub weekday: Option<Weekday>,
    pub loyalty: bool,
    pub inapam: bool,
    pub quantity: i64,
    pub config: Option<PathBuf>,
}

impl Command {
    /// Parses arguments, excluding the program name.
    pub fn parse<I>(args: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = String>,
    {
        let mut product = None;
        let mut at = None;
        let mut weekday = None;
        let mut loyalty = false;
        let mut inapam = false;
        let mut quantity = 1;
        let mut config = None;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(Command::Help),
                "--product" => product = Some(PathBuf::from(value(&mut args, "--product")?)),
                "--config" => config = Some(PathBuf::from(value(&mut args, "--config")?)),
                "--at" => {
                    let raw = value(&mut args, "--at")?;
                    let parsed = DateTime::parse_from_rfc3339(&raw)
                        .map_err(|e| invalid("--at", e.to_string()))?;
                    at = Some(parsed.with_timezone(&Utc));
                }
                "--weekday" => {
                    let raw = value(&mut args, "--weekday")?;
                    let index: u8 = raw
                        .parse()
                        .map_err(|_| invalid("--weekday", "expected 0 (Sunday) to 6 (Saturday)"))?;
                    weekday = Some(
                        weekday_from_index(index)
                            .ok_or_else(|| invalid("--weekday", "expected 0 (Sunday) to 6 (Saturday)"))?,
                    );
                }
                "--qty" => {
                    let raw = value(&mut args, "--qty")?;
                    quantity = raw
                        .parse()
                        .map_err(|_| invalid("--qty", "expected a whole number"))?;
                }
                "--loyalty" => loyalty = true,
                "--inapam" => inapam = true,
                other => return Err(AppError::UnknownArgument(other.to_string())),
            }
        }

        Ok(Command::Quote(QuoteArgs {
            product: product.ok_or(AppError::MissingArgument("--product"))?,
            at,
            weekday,
            loyalty,
            inapam,
            quantity,
            config,
        }))
    }
}

fn value<I>(args: &mut I, flag: &str) -> AppResult<String>
where
    I: Iterator<Item = String>,
{
    args.next()
        .ok_or_else(|| invalid(flag, "missing value"))
}

fn invalid(flag: &str, reason: impl Into<String>) -> AppError {
    AppError::InvalidArgument {
        flag: flag.to_string(),
        reason: reason.into(),
    }
}
