//! Native (drops) and issued-currency amounts.
//!
//! The top bit of the first byte selects the form. Native amounts are 8
//! bytes: `0 | positive | 62-bit drops`. Issued amounts are 48 bytes: a
//! 64-bit value word followed by the currency and issuer. The value word is
//! `1 | positive | (exponent + 97) << 54 | mantissa`, with the mantissa in
//! `[10^15, 10^16)` and zero given the dedicated word `0x8000_0000_0000_0000`.

use super::decimal::{format_decimal, ParsedDecimal, MAX_MANTISSA, MIN_MANTISSA};
use super::{check_hint, AccountId, Currency, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::{Map, Value};

const NOT_NATIVE_BIT: u64 = 0x8000_0000_0000_0000;
const POSITIVE_BIT: u64 = 0x4000_0000_0000_0000;
const DROPS_MASK: u64 = 0x3FFF_FFFF_FFFF_FFFF;
const MANTISSA_MASK: u64 = 0x003F_FFFF_FFFF_FFFF;

const MAX_DROPS: u64 = 100_000_000_000_000_000;
const MIN_IOU_EXPONENT: i64 = -96;
const MAX_IOU_EXPONENT: i64 = 80;
const EXPONENT_BIAS: i64 = 97;

const NATIVE_LENGTH: usize = 8;
const ISSUED_LENGTH: usize = 48;

/// Amount of the native asset or of an issued currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Amount(Vec<u8>);

impl Amount {
    /// `true` for native amounts.
    pub fn is_native(&self) -> bool {
        self.0[0] & 0x80 == 0
    }

    /// Signed drops of a native amount.
    pub fn drops(&self) -> Option<i128> {
        if !self.is_native() {
            return None;
        }
        let word = self.value_word();
        let magnitude = i128::from(word & DROPS_MASK);
        Some(if word & POSITIVE_BIT != 0 {
            magnitude
        } else {
            -magnitude
        })
    }

    fn value_word(&self) -> u64 {
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.0[..8]);
        u64::from_be_bytes(word)
    }

    fn from_drops(text: &str) -> Result<Self, BinaryCodecError> {
        let parsed = ParsedDecimal::parse(text).ok_or_else(|| {
            BinaryCodecError::format(Self::NAME, format!("{text:?} is not a number of drops"))
        })?;
        if !parsed.is_zero() {
            if parsed.exponent < 0 {
                return Err(BinaryCodecError::AmountPrecision(format!(
                    "{text} has fractional drops"
                )));
            }
            if parsed.negative {
                return Err(BinaryCodecError::AmountOverflow(format!(
                    "{text} is below zero drops"
                )));
            }
            if parsed.scientific_exponent() > 17 {
                return Err(BinaryCodecError::AmountOverflow(format!(
                    "{text} exceeds {MAX_DROPS} drops"
                )));
            }
        }
        if !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(BinaryCodecError::format(
                Self::NAME,
                format!("{text:?} must be written as plain integer drops"),
            ));
        }
        let drops: u64 = text
            .parse()
            .map_err(|e| BinaryCodecError::format(Self::NAME, format!("{text:?}: {e}")))?;
        if drops > MAX_DROPS {
            return Err(BinaryCodecError::AmountOverflow(format!(
                "{text} exceeds {MAX_DROPS} drops"
            )));
        }
        Ok(Self((drops | POSITIVE_BIT).to_be_bytes().to_vec()))
    }

    fn from_issued(value: &str, currency: &Value, issuer: &Value) -> Result<Self, BinaryCodecError> {
        let parsed = ParsedDecimal::parse(value).ok_or_else(|| {
            BinaryCodecError::format(Self::NAME, format!("{value:?} is not a decimal value"))
        })?;
        let word = if parsed.is_zero() {
            NOT_NATIVE_BIT
        } else {
            let (mantissa, exponent) = parsed.normalize(Self::NAME)?;
            if exponent > MAX_IOU_EXPONENT {
                return Err(BinaryCodecError::AmountOverflow(format!(
                    "{value} exceeds the largest issued amount"
                )));
            }
            if exponent < MIN_IOU_EXPONENT {
                return Err(BinaryCodecError::AmountPrecision(format!(
                    "{value} is smaller than the smallest issued amount"
                )));
            }
            let sign = if parsed.negative { 0 } else { POSITIVE_BIT };
            NOT_NATIVE_BIT | sign | (((exponent + EXPONENT_BIAS) as u64) << 54) | mantissa
        };

        let mut bytes = Vec::with_capacity(ISSUED_LENGTH);
        bytes.extend_from_slice(&word.to_be_bytes());
        bytes.extend_from_slice(Currency::from_value(currency)?.as_bytes());
        bytes.extend_from_slice(AccountId::from_value(issuer)?.as_bytes());
        Ok(Self(bytes))
    }

    fn issued_value(&self) -> String {
        let word = self.value_word();
        let mantissa = word & MANTISSA_MASK;
        let exponent = ((word >> 54) & 0xFF) as i64 - EXPONENT_BIAS;
        format_decimal(word & POSITIVE_BIT == 0, mantissa, exponent)
    }
}

impl SerializedType for Amount {
    const NAME: &'static str = "Amount";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        match value {
            Value::String(drops) => Self::from_drops(drops),
            Value::Object(map) => match (map.get("value"), map.get("currency"), map.get("issuer")) {
                (Some(Value::String(amount)), Some(currency), Some(issuer)) => {
                    Self::from_issued(amount, currency, issuer)
                }
                _ => Err(BinaryCodecError::InvalidValueType {
                    type_name: Self::NAME,
                    expected: "an object with value, currency and issuer",
                }),
            },
            _ => Err(BinaryCodecError::InvalidValueType {
                type_name: Self::NAME,
                expected: "a drops string or an issued-currency object",
            }),
        }
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        let length = if parser.peek()? & 0x80 == 0 {
            NATIVE_LENGTH
        } else {
            ISSUED_LENGTH
        };
        check_hint(Self::NAME, length, length_hint)?;
        let amount = Self(parser.read(length)?.to_vec());
        if !amount.is_native() {
            let mantissa = amount.value_word() & MANTISSA_MASK;
            if mantissa != 0 && !(MIN_MANTISSA..=MAX_MANTISSA).contains(&mantissa) {
                return Err(BinaryCodecError::format(
                    Self::NAME,
                    format!("mantissa {mantissa} is not normalized"),
                ));
            }
        }
        Ok(amount)
    }

    fn to_json(&self) -> Value {
        if let Some(drops) = self.drops() {
            return Value::String(drops.to_string());
        }
        let mut currency = [0u8; 20];
        currency.copy_from_slice(&self.0[8..28]);
        let mut issuer = [0u8; 20];
        issuer.copy_from_slice(&self.0[28..48]);

        let mut out = Map::new();
        out.insert("currency".into(), Currency::new(currency).to_json());
        out.insert("issuer".into(), AccountId::new(issuer).to_json());
        out.insert("value".into(), Value::String(self.issued_value()));
        Value::Object(out)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ISSUER: &str = "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh";

    fn issued(value: &str) -> Result<Amount, BinaryCodecError> {
        Amount::from_value(&json!({"currency": "USD", "value": value, "issuer": ISSUER}))
    }

    #[test]
    fn native_amounts_set_positive_bit() {
        let amount = Amount::from_value(&json!("1")).unwrap();
        assert_eq!(amount.as_bytes(), &[0x40, 0, 0, 0, 0, 0, 0, 0x01]);
        assert_eq!(amount.to_json(), json!("1"));
        let zero = Amount::from_value(&json!("0")).unwrap();
        assert_eq!(zero.as_bytes(), &[0x40, 0, 0, 0, 0, 0, 0, 0]);
        let max = Amount::from_value(&json!("100000000000000000")).unwrap();
        assert_eq!(max.to_json(), json!("100000000000000000"));
    }

    #[test]
    fn native_amount_failures() {
        assert!(matches!(
            Amount::from_value(&json!("1e20")),
            Err(BinaryCodecError::AmountOverflow(_))
        ));
        assert!(matches!(
            Amount::from_value(&json!("1000.001")),
            Err(BinaryCodecError::AmountPrecision(_))
        ));
        assert!(matches!(
            Amount::from_value(&json!("100000000000000001")),
            Err(BinaryCodecError::AmountOverflow(_))
        ));
        assert!(Amount::from_value(&json!("-5")).is_err());
        assert!(Amount::from_value(&json!("1e3")).is_err());
        assert!(Amount::from_value(&json!("drops")).is_err());
    }

    #[test]
    fn issued_amount_layout() {
        let amount = issued("1").unwrap();
        assert_eq!(amount.as_bytes().len(), 48);
        assert_eq!(hex::encode_upper(&amount.as_bytes()[..8]), "D4838D7EA4C68000");
        assert_eq!(
            amount.to_json(),
            json!({"currency": "USD", "issuer": ISSUER, "value": "1"})
        );
    }

    #[test]
    fn issued_zero_and_negative() {
        let zero = issued("0").unwrap();
        assert_eq!(hex::encode_upper(&zero.as_bytes()[..8]), "8000000000000000");
        assert_eq!(zero.to_json()["value"], json!("0"));

        let negative = issued("-2.5").unwrap();
        assert_eq!(negative.as_bytes()[0] & 0x40, 0);
        assert_eq!(negative.to_json()["value"], json!("-2.5"));
    }

    #[test]
    fn sixteen_digits_round_trip_exactly() {
        let amount = issued("1111111111111111").unwrap();
        assert_eq!(amount.to_json()["value"], json!("1111111111111111"));
        assert!(matches!(
            issued("11111111111111111"),
            Err(BinaryCodecError::AmountPrecision(_))
        ));
    }

    #[test]
    fn issued_exponent_bounds() {
        assert!(issued("9999999999999999e80").is_ok());
        assert!(matches!(
            issued("1e97"),
            Err(BinaryCodecError::AmountOverflow(_))
        ));
        assert!(issued("1e-81").is_ok());
        assert!(matches!(
            issued("1e-82"),
            Err(BinaryCodecError::AmountPrecision(_))
        ));
    }

    #[test]
    fn small_and_large_values_render_in_exponent_form() {
        assert_eq!(issued("0.0000001").unwrap().to_json()["value"], json!("1e-7"));
        assert_eq!(issued("15e24").unwrap().to_json()["value"], json!("1.5e+25"));
        assert_eq!(issued("0.000123").unwrap().to_json()["value"], json!("0.000123"));
    }

    #[test]
    fn parser_uses_leading_bit_for_width() {
        let defs = crate::definitions::Definitions::bundled();
        let issued_bytes = issued("3").unwrap().as_bytes().to_vec();
        let mut bytes = issued_bytes.clone();
        bytes.extend_from_slice(&Amount::from_value(&json!("7")).unwrap().as_bytes().to_vec());
        let mut parser = BinaryParser::new(&bytes, &defs);
        assert_eq!(Amount::from_parser(&mut parser, None).unwrap().as_bytes(), &issued_bytes[..]);
        assert_eq!(Amount::from_parser(&mut parser, None).unwrap().to_json(), json!("7"));
        assert!(parser.is_end());
    }

    #[test]
    fn unsupported_shapes_are_type_errors() {
        assert!(matches!(
            Amount::from_value(&json!(10)),
            Err(BinaryCodecError::InvalidValueType { .. })
        ));
        assert!(matches!(
            Amount::from_value(&json!({"mpt_issuance_id": "00", "value": "1"})),
            Err(BinaryCodecError::InvalidValueType { .. })
        ));
    }
}
