//! Decimal string parsing and rendering shared by `Amount` and `Number`.

use crate::errors::BinaryCodecError;
use regex::Regex;
use std::sync::LazyLock;

static DECIMAL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([-+])?([0-9]*)(?:\.([0-9]*))?(?:[eE]([-+]?[0-9]+))?$").expect("invalid regex")
});

/// Smallest normalized mantissa.
pub(crate) const MIN_MANTISSA: u64 = 1_000_000_000_000_000;
/// Largest normalized mantissa.
pub(crate) const MAX_MANTISSA: u64 = 9_999_999_999_999_999;

/// A decimal as `digits * 10^exponent` with no leading or trailing zeros
/// in `digits`. Zero has empty `digits`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedDecimal {
    pub negative: bool,
    pub digits: String,
    pub exponent: i64,
}

impl ParsedDecimal {
    pub fn parse(text: &str) -> Option<Self> {
        let caps = DECIMAL.captures(text)?;
        let int = caps.get(2).map_or("", |m| m.as_str());
        let frac = caps.get(3).map_or("", |m| m.as_str());
        if int.is_empty() && frac.is_empty() {
            return None;
        }
        let exponent = match caps.get(4) {
            Some(m) => m.as_str().parse::<i64>().ok()?,
            None => 0,
        };
        let exponent = exponent.checked_sub(i64::try_from(frac.len()).ok()?)?;

        let joined = format!("{int}{frac}");
        let significant = joined.trim_start_matches('0');
        let digits = significant.trim_end_matches('0');
        let trailing = i64::try_from(significant.len() - digits.len()).ok()?;

        Some(Self {
            negative: caps.get(1).is_some_and(|m| m.as_str() == "-"),
            digits: digits.to_string(),
            exponent: if digits.is_empty() { 0 } else { exponent.checked_add(trailing)? },
        })
    }

    pub fn is_zero(&self) -> bool {
        self.digits.is_empty()
    }

    /// Exponent of the leading digit in scientific notation, saturating at
    /// the `i64` bounds.
    pub fn scientific_exponent(&self) -> i64 {
        let width = i64::try_from(self.digits.len()).unwrap_or(i64::MAX);
        self.exponent.saturating_add(width.saturating_sub(1))
    }

    /// Scales the value into `[MIN_MANTISSA, MAX_MANTISSA]`.
    ///
    /// Fails with `AmountPrecision` when that would drop non-zero digits.
    /// The exponent saturates, so callers range-check it. Must not be
    /// called on zero.
    pub fn normalize(&self, type_name: &str) -> Result<(u64, i64), BinaryCodecError> {
        let precision = || {
            BinaryCodecError::AmountPrecision(format!(
                "{type_name} holds at most 16 significant digits, got {}",
                self.digits.len()
            ))
        };
        if self.digits.len() > 38 {
            return Err(precision());
        }
        let mut mantissa: u128 = self.digits.parse().map_err(|_| precision())?;
        let mut exponent = self.exponent;
        while mantissa < u128::from(MIN_MANTISSA) {
            mantissa *= 10;
            exponent = exponent.saturating_sub(1);
        }
        while mantissa > u128::from(MAX_MANTISSA) {
            if mantissa % 10 != 0 {
                return Err(precision());
            }
            mantissa /= 10;
            exponent = exponent.saturating_add(1);
        }
        Ok((mantissa as u64, exponent))
    }
}

/// Renders `mantissa * 10^exponent` the way ledger tooling prints decimals:
/// positional when the leading digit's exponent is in `-6..=20`, otherwise
/// `d.ddde±N`.
pub(crate) fn format_decimal(negative: bool, mantissa: u64, exponent: i64) -> String {
    if mantissa == 0 {
        return "0".to_string();
    }
    let raw = mantissa.to_string();
    let digits = raw.trim_end_matches('0');
    let exponent = exponent + (raw.len() - digits.len()) as i64;
    let scientific = exponent + digits.len() as i64 - 1;
    let sign = if negative { "-" } else { "" };

    if scientific <= -7 || scientific >= 21 {
        let (head, tail) = digits.split_at(1);
        let fraction = if tail.is_empty() {
            String::new()
        } else {
            format!(".{tail}")
        };
        let exp_sign = if scientific > 0 { "+" } else { "" };
        return format!("{sign}{head}{fraction}e{exp_sign}{scientific}");
    }
    if exponent >= 0 {
        return format!("{sign}{digits}{}", "0".repeat(exponent as usize));
    }
    let point = digits.len() as i64 + exponent;
    if point > 0 {
        let (whole, fraction) = digits.split_at(point as usize);
        format!("{sign}{whole}.{fraction}")
    } else {
        format!("{sign}0.{}{digits}", "0".repeat((-point) as usize))
    }
}
