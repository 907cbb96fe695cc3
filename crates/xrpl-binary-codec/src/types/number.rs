//! Decimal stored as a signed 64-bit mantissa and a signed 32-bit exponent.

use super::decimal::ParsedDecimal;
use super::{check_hint, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::Value;

const MIN_EXPONENT: i64 = -32768;
const MAX_EXPONENT: i64 = 32768;
const ZERO_EXPONENT: i32 = i32::MIN;

/// Normalized decimal: mantissa magnitude in `[10^15, 10^16)`, zero as
/// mantissa 0 with exponent `i32::MIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Number([u8; 12]);

impl Number {
    /// The zero value.
    pub const ZERO: Number = Number::from_parts(0, ZERO_EXPONENT);

    /// Wraps a mantissa and exponent as-is.
    pub const fn from_parts(mantissa: i64, exponent: i32) -> Self {
        let m = mantissa.to_be_bytes();
        let e = exponent.to_be_bytes();
        Self([
            m[0], m[1], m[2], m[3], m[4], m[5], m[6], m[7], e[0], e[1], e[2], e[3],
        ])
    }

    /// Signed mantissa.
    pub fn mantissa(&self) -> i64 {
        let mut m = [0u8; 8];
        m.copy_from_slice(&self.0[..8]);
        i64::from_be_bytes(m)
    }

    /// Exponent.
    pub fn exponent(&self) -> i32 {
        let mut e = [0u8; 4];
        e.copy_from_slice(&self.0[8..]);
        i32::from_be_bytes(e)
    }

    /// `true` for the zero value.
    pub fn is_zero(&self) -> bool {
        self.mantissa() == 0
    }

    fn from_text(text: &str) -> Result<Self, BinaryCodecError> {
        let parsed = ParsedDecimal::parse(text).ok_or_else(|| {
            BinaryCodecError::format(Self::NAME, format!("{text:?} is not a decimal value"))
        })?;
        if parsed.is_zero() {
            return Ok(Self::ZERO);
        }
        let (mantissa, exponent) = parsed.normalize(Self::NAME)?;
        if exponent > MAX_EXPONENT {
            return Err(BinaryCodecError::AmountOverflow(format!(
                "{text} exceeds the largest Number"
            )));
        }
        if exponent < MIN_EXPONENT {
            tracing::trace!(value = text, "Number underflows to zero");
            return Ok(Self::ZERO);
        }
        let mantissa = mantissa as i64;
        Ok(Self::from_parts(
            if parsed.negative { -mantissa } else { mantissa },
            exponent as i32,
        ))
    }
}

impl SerializedType for Number {
    const NAME: &'static str = "Number";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        match value {
            Value::String(text) => Self::from_text(text),
            Value::Number(number) => Self::from_text(&number.to_string()),
            _ => Err(BinaryCodecError::InvalidValueType {
                type_name: Self::NAME,
                expected: "a decimal string",
            }),
        }
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        check_hint(Self::NAME, 12, length_hint)?;
        Ok(Self(parser.read_array()?))
    }

    fn to_json(&self) -> Value {
        if self.is_zero() {
            return Value::String("0".to_string());
        }
        Value::String(format!("{}e{}", self.mantissa(), self.exponent()))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
