use super::{check_hint, decode_hex, exact_length, expect_str, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::Value;

/// Fixed-width opaque hash of `N` bytes, rendered as uppercase hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash<const N: usize>([u8; N]);

/// 128-bit hash; the all-zero value renders as `""`.
pub type Hash128 = Hash<16>;
/// 160-bit hash.
pub type Hash160 = Hash<20>;
/// 192-bit hash.
pub type Hash192 = Hash<24>;
/// 256-bit hash.
pub type Hash256 = Hash<32>;

impl<const N: usize> Hash<N> {
    /// Wraps raw bytes.
    pub fn new(bytes: [u8; N]) -> Self {
        Self(bytes)
    }

    /// Copies bytes that must be exactly `N` long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, BinaryCodecError> {
        Ok(Self(exact_length(Self::NAME, bytes)?))
    }

    /// `true` when every byte is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &[u8; N] {
        &self.0
    }
}

impl<const N: usize> SerializedType for Hash<N> {
    const NAME: &'static str = match N {
        16 => "Hash128",
        20 => "Hash160",
        24 => "Hash192",
        _ => "Hash256",
    };

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        let text = expect_str(value, Self::NAME, "a hex string")?;
        if N == 16 && text.is_empty() {
            return Ok(Self([0u8; N]));
        }
        Self::from_slice(&decode_hex(Self::NAME, text)?)
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        check_hint(Self::NAME, N, length_hint)?;
        Ok(Self(parser.read_array()?))
    }

    fn to_json(&self) -> Value {
        if N == 16 && self.is_zero() {
            return Value::String(String::new());
        }
        Value::String(hex::encode_upper(self.0))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nibble_count_must_match_width() {
        assert!(Hash256::from_value(&json!("AB".repeat(32))).is_ok());
        assert!(matches!(
            Hash256::from_value(&json!("AB".repeat(31))),
            Err(BinaryCodecError::LengthMismatch {
                expected: 32,
                actual: 31,
                ..
            })
        ));
        assert!(matches!(
            Hash160::from_value(&json!("ABC")),
            Err(BinaryCodecError::InvalidValueFormat { .. })
        ));
        assert!(matches!(
            Hash160::from_value(&json!(5)),
            Err(BinaryCodecError::InvalidValueType { .. })
        ));
    }

    #[test]
    fn hex_case_is_normalized() {
        let hash = Hash128::from_value(&json!("0123456789abcdef0123456789ABCDEF")).unwrap();
        assert_eq!(hash.to_json(), json!("0123456789ABCDEF0123456789ABCDEF"));
    }

    #[test]
    fn empty_hash128_is_zero() {
        let hash = Hash128::from_value(&json!("")).unwrap();
        assert_eq!(hash.as_bytes(), &[0u8; 16]);
        assert_eq!(hash.to_json(), json!(""));
        assert!(Hash256::from_value(&json!("")).is_err());
        assert_eq!(Hash192::new([0; 24]).to_json(), json!("0".repeat(48)));
    }
}
