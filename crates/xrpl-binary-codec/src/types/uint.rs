use super::{check_hint, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::LazyLock;

static HEX_UINT64: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{1,16}$").expect("invalid regex"));
static BASE10: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("invalid regex"));

/// Big-endian unsigned integer `N` bytes wide.
///
/// Values of different widths compare by numeric value.
#[derive(Debug, Clone, Copy)]
pub struct UInt<const N: usize>([u8; N]);

/// 8-bit unsigned integer.
pub type UInt8 = UInt<1>;
/// 16-bit unsigned integer.
pub type UInt16 = UInt<2>;
/// 32-bit unsigned integer.
pub type UInt32 = UInt<4>;
/// 64-bit unsigned integer. JSON form is 16 hex digits.
pub type UInt64 = UInt<8>;

impl<const N: usize> UInt<N> {
    /// Largest value the width can hold.
    pub const MAX: u64 = if N >= 8 { u64::MAX } else { (1u64 << (8 * N)) - 1 };

    /// Creates a value, failing if it does not fit the width.
    pub fn new(value: u64) -> Result<Self, BinaryCodecError> {
        if value > Self::MAX {
            return Err(BinaryCodecError::format(
                Self::NAME,
                format!("{value} exceeds {}", Self::MAX),
            ));
        }
        let mut out = [0u8; N];
        out.copy_from_slice(&value.to_be_bytes()[8 - N..]);
        Ok(Self(out))
    }

    /// Numeric value.
    pub fn value(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b))
    }

    fn from_base10_str(text: &str) -> Result<Self, BinaryCodecError> {
        if !BASE10.is_match(text) {
            return Err(BinaryCodecError::format(
                Self::NAME,
                format!("{text:?} is not a base-10 integer"),
            ));
        }
        let value = text
            .parse::<u64>()
            .map_err(|e| BinaryCodecError::format(Self::NAME, format!("{text:?}: {e}")))?;
        Self::new(value)
    }

    fn from_number(number: &serde_json::Number) -> Result<Self, BinaryCodecError> {
        let value = number.as_u64().ok_or_else(|| {
            BinaryCodecError::format(Self::NAME, format!("{number} is not a non-negative integer"))
        })?;
        Self::new(value)
    }
}

impl UInt64 {
    /// Builds a value from the base-10 JSON form some UInt64 fields use.
    pub fn from_base10_value(value: &Value) -> Result<Self, BinaryCodecError> {
        match value {
            Value::String(text) => Self::from_base10_str(text),
            Value::Number(number) => Self::from_number(number),
            _ => Err(BinaryCodecError::InvalidValueType {
                type_name: Self::NAME,
                expected: "a base-10 string",
            }),
        }
    }
}

impl<const N: usize> SerializedType for UInt<N> {
    const NAME: &'static str = match N {
        1 => "UInt8",
        2 => "UInt16",
        4 => "UInt32",
        _ => "UInt64",
    };

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        match value {
            Value::Number(number) => Self::from_number(number),
            Value::String(text) if N == 8 => {
                if !HEX_UINT64.is_match(text) {
                    return Err(BinaryCodecError::format(
                        Self::NAME,
                        format!("{text:?} is not 1-16 hex digits"),
                    ));
                }
                let value = u64::from_str_radix(text, 16)
                    .map_err(|e| BinaryCodecError::format(Self::NAME, e.to_string()))?;
                Self::new(value)
            }
            Value::String(text) if N == 4 => Self::from_base10_str(text),
            _ => Err(BinaryCodecError::InvalidValueType {
                type_name: Self::NAME,
                expected: if N == 8 {
                    "a hex string or non-negative integer"
                } else {
                    "a non-negative integer"
                },
            }),
        }
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        check_hint(Self::NAME, N, length_hint)?;
        Ok(Self(parser.read_array()?))
    }

    fn to_json(&self) -> Value {
        if N == 8 {
            Value::String(hex::encode_upper(self.0))
        } else {
            Value::from(self.value())
        }
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize, const M: usize> PartialEq<UInt<M>> for UInt<N> {
    fn eq(&self, other: &UInt<M>) -> bool {
        self.value() == other.value()
    }
}

impl<const N: usize> Eq for UInt<N> {}

impl<const N: usize, const M: usize> PartialOrd<UInt<M>> for UInt<N> {
    fn partial_cmp(&self, other: &UInt<M>) -> Option<Ordering> {
        Some(self.value().cmp(&other.value()))
    }
}

impl<const N: usize> Ord for UInt<N> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value().cmp(&other.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn widths_are_big_endian() {
        assert_eq!(UInt16::new(0x0102).unwrap().as_bytes(), &[0x01, 0x02]);
        assert_eq!(
            UInt32::new(2147483648).unwrap().as_bytes(),
            &[0x80, 0x00, 0x00, 0x00]
        );
        assert_eq!(UInt8::new(255).unwrap().value(), 255);
    }

    #[test]
    fn values_must_fit_width() {
        assert!(UInt8::new(256).is_err());
        assert!(UInt16::from_value(&json!(65536)).is_err());
        assert!(UInt32::from_value(&json!(-1)).is_err());
        assert!(UInt32::from_value(&json!(1.5)).is_err());
    }

    #[test]
    fn uint32_accepts_base10_strings() {
        assert_eq!(UInt32::from_value(&json!("4294967295")).unwrap().value(), u32::MAX as u64);
        assert!(UInt32::from_value(&json!("0x10")).is_err());
        assert!(matches!(
            UInt16::from_value(&json!("10")),
            Err(BinaryCodecError::InvalidValueType { .. })
        ));
    }

    #[test]
    fn uint64_json_is_padded_hex() {
        let value = UInt64::from_value(&json!("abc")).unwrap();
        assert_eq!(value.value(), 0xABC);
        assert_eq!(value.to_json(), json!("0000000000000ABC"));
        assert!(UInt64::from_value(&json!("")).is_err());
        assert!(UInt64::from_value(&json!("00000000000000000")).is_err());
        assert_eq!(UInt64::from_value(&json!(16)).unwrap().to_json(), json!("0000000000000010"));
    }

    #[test]
    fn comparison_crosses_widths() {
        let small = UInt8::new(200).unwrap();
        let wide = UInt64::new(200).unwrap();
        let wider = UInt32::new(300).unwrap();
        assert!(small == wide);
        assert!(small < wider);
        assert!(wider > wide);
    }
}
