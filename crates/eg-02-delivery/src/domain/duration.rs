//! Human-readable duration strings.
//!
//! Accepts one or more `<number><unit>` pairs, e.g. `24h`, `1h30m`, `250ms`,
//! `1.5s`. Units: `ns`, `us` (or `µs`), `ms`, `s`, `m`, `h`. A bare `0` is
//! zero. Signs are not accepted.

use std::time::Duration;
use thiserror::Error;

const NANOS_PER_MICRO: u128 = 1_000;
const NANOS_PER_MILLI: u128 = 1_000_000;
const NANOS_PER_SEC: u128 = 1_000_000_000;
const NANOS_PER_MIN: u128 = 60 * NANOS_PER_SEC;
const NANOS_PER_HOUR: u128 = 60 * NANOS_PER_MIN;

/// Fraction digits beyond this are ignored (below nanosecond resolution).
const MAX_FRACTION_DIGITS: usize = 9;

/// Errors from [`parse_duration`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationParseError {
    #[error("empty duration")]
    Empty,

    #[error("invalid duration {input:?}: expected a number at {at:?}")]
    ExpectedNumber { input: String, at: String },

    #[error("invalid duration {input:?}: missing unit after {number:?}")]
    MissingUnit { input: String, number: String },

    #[error("invalid duration {input:?}: unknown unit {unit:?}")]
    UnknownUnit { input: String, unit: String },

    #[error("invalid duration {input:?}: value out of range")]
    Overflow { input: String },
}

/// Parse a duration string such as `24h` or `1h30m`.
pub fn parse_duration(input: &str) -> Result<Duration, DurationParseError> {
    let s = input.trim();
    if s.is_empty() {
        return Err(DurationParseError::Empty);
    }
    if s == "0" {
        return Ok(Duration::ZERO);
    }

    let overflow = || DurationParseError::Overflow {
        input: input.to_string(),
    };

    let mut rest = s;
    let mut total: u128 = 0;

    while !rest.is_empty() {
        let number_len = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        let (number, tail) = rest.split_at(number_len);

        let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
        if (whole.is_empty() && fraction.is_empty()) || fraction.contains('.') {
            return Err(DurationParseError::ExpectedNumber {
                input: input.to_string(),
                at: rest.to_string(),
            });
        }

        let unit_len = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_len);
        if unit.is_empty() {
            return Err(DurationParseError::MissingUnit {
                input: input.to_string(),
                number: number.to_string(),
            });
        }

        let scale = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SEC,
            "m" => NANOS_PER_MIN,
            "h" => NANOS_PER_HOUR,
            other => {
                return Err(DurationParseError::UnknownUnit {
                    input: input.to_string(),
                    unit: other.to_string(),
                })
            }
        };

        let whole_value: u128 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| overflow())?
        };
        let mut value = whole_value.checked_mul(scale).ok_or_else(overflow)?;

        let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
        if !fraction.is_empty() {
            let digits: u128 = fraction.parse().map_err(|_| overflow())?;
            let divisor = 10u128.pow(fraction.len() as u32);
            value = value
                .checked_add(digits * scale / divisor)
                .ok_or_else(overflow)?;
        }

        total = total.checked_add(value).ok_or_else(overflow)?;
        rest = tail;
    }

    let nanos = u64::try_from(total).map_err(|_| overflow())?;
    Ok(Duration::from_nanos(nanos))
}

/// Render a duration in the same grammar [`parse_duration`] accepts.
///
/// Whole hours, minutes and seconds are emitted as `h`/`m`/`s` components;
/// any sub-second remainder uses the coarsest exact unit.
pub fn format_duration(duration: Duration) -> String {
    let mut nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    let mut out = String::new();
    for (scale, unit) in [(NANOS_PER_HOUR, "h"), (NANOS_PER_MIN, "m"), (NANOS_PER_SEC, "s")] {
        let count = nanos / scale;
        if count > 0 {
            out.push_str(&format!("{count}{unit}"));
            nanos %= scale;
        }
    }

    if nanos > 0 {
        let (count, unit) = if nanos % NANOS_PER_MILLI == 0 {
            (nanos / NANOS_PER_MILLI, "ms")
        } else if nanos % NANOS_PER_MICRO == 0 {
            (nanos / NANOS_PER_MICRO, "us")
        } else {
            (nanos, "ns")
        };
        out.push_str(&format!("{count}{unit}"));
    }

    out
}
