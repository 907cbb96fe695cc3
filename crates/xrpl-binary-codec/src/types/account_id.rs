use super::{decode_hex, exact_length, expect_str, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::Value;
use xrpl_address_codec::{
    decode_account_id, decode_x_address, encode_checked, is_valid_x_address, ACCOUNT_ID_VERSION,
};

/// 160-bit account identifier, rendered as a classic address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AccountId([u8; 20]);

impl AccountId {
    /// Wraps raw bytes.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parses a classic address, an untagged X-address, 40 hex digits, or
    /// `""` for the zero account.
    pub fn from_address(text: &str) -> Result<Self, BinaryCodecError> {
        if text.is_empty() {
            return Ok(Self::default());
        }
        if text.len() == 40 && text.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Ok(Self(exact_length(Self::NAME, &decode_hex(Self::NAME, text)?)?));
        }
        if is_valid_x_address(text) {
            let decoded = decode_x_address(text)?;
            if decoded.tag.is_some() {
                return Err(BinaryCodecError::TagNotAllowed {
                    field: Self::NAME.to_string(),
                });
            }
            return Ok(Self(decoded.account_id));
        }
        Ok(Self(decode_account_id(text)?))
    }

    /// Classic `r...` address.
    pub fn to_address(&self) -> String {
        let mut body = Vec::with_capacity(ACCOUNT_ID_VERSION.len() + 20);
        body.extend_from_slice(ACCOUNT_ID_VERSION);
        body.extend_from_slice(&self.0);
        encode_checked(&body)
    }
}

impl SerializedType for AccountId {
    const NAME: &'static str = "AccountID";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        Self::from_address(expect_str(value, Self::NAME, "an address string")?)
    }

    /// A zero-length field decodes to the zero account.
    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        match length_hint {
            Some(0) => Ok(Self::default()),
            None | Some(20) => Ok(Self(parser.read_array()?)),
            Some(actual) => Err(BinaryCodecError::LengthMismatch {
                type_name: Self::NAME,
                expected: 20,
                actual,
            }),
        }
    }

    fn to_json(&self) -> Value {
        Value::String(self.to_address())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ACCOUNT: &str = "r9LqNeG6qHxjeUocjvVki2XR35weJ9mZgQ";

    #[test]
    fn hex_and_address_forms_agree() {
        let from_address = AccountId::from_value(&json!(ACCOUNT)).unwrap();
        let from_hex =
            AccountId::from_value(&json!("5B812C9D57731E27A2DA8B1830195F88EF32A3B6")).unwrap();
        assert_eq!(from_address, from_hex);
        assert_eq!(from_hex.to_json(), json!(ACCOUNT));
    }

    #[test]
    fn well_known_accounts_render_normally() {
        let one = AccountId::from_value(&json!("0000000000000000000000000000000000000001")).unwrap();
        assert_eq!(one.to_json(), json!("rrrrrrrrrrrrrrrrrrrrBZbvji"));
        assert_eq!(AccountId::default().to_json(), json!("rrrrrrrrrrrrrrrrrrrrrhoLvTp"));
        assert_eq!(AccountId::from_value(&json!("")).unwrap(), AccountId::default());
    }

    #[test]
    fn x_address_without_tag_is_accepted() {
        let untagged = AccountId::from_value(&json!("X7vjQVCddnQ7GCESYnYR3EdpzbcoAMbPw7s2xv8YQs94tv4"));
        assert_eq!(untagged.unwrap().to_json(), json!(ACCOUNT));
        assert!(matches!(
            AccountId::from_value(&json!("X7vjQVCddnQ7GCESYnYR3EdpzbcoAM6HxaxgM5qV1grUGLF")),
            Err(BinaryCodecError::TagNotAllowed { .. })
        ));
    }

    #[test]
    fn corrupted_address_reports_checksum() {
        assert!(matches!(
            AccountId::from_value(&json!("r9LqNeG6qHxjeUocjvVki2XR35weJ9mQgZ")),
            Err(BinaryCodecError::ChecksumMismatch)
        ));
    }
}
