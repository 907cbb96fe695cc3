//! Asset identifiers.
//!
//! Three layouts, told apart while reading:
//! - native: 20 zero bytes (the XRP currency);
//! - issued: currency(20) || issuer(20);
//! - token issuance: issuer(20) || NO_ACCOUNT(20) || sequence(4, little-endian).
//!
//! The JSON form of a token issuance is `mpt_issuance_id`, the 24-byte
//! identifier `sequence(4, big-endian) || issuer(20)` in hex.

use super::{check_hint, decode_hex, expect_str, AccountId, Currency, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::{Map, Value};

/// Reserved account `0x00..01` marking a token-issuance layout.
const NO_ACCOUNT: [u8; 20] = {
    let mut bytes = [0u8; 20];
    bytes[19] = 1;
    bytes
};

const MPT_ID_LENGTH: usize = 24;

/// Asset identifier: native, issued currency, or token issuance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Issue(Vec<u8>);

impl Issue {
    fn from_mpt_id(text: &str) -> Result<Self, BinaryCodecError> {
        let id = decode_hex(Self::NAME, text)?;
        if id.len() != MPT_ID_LENGTH {
            return Err(BinaryCodecError::LengthMismatch {
                type_name: Self::NAME,
                expected: MPT_ID_LENGTH,
                actual: id.len(),
            });
        }
        let mut bytes = Vec::with_capacity(44);
        bytes.extend_from_slice(&id[4..]);
        bytes.extend_from_slice(&NO_ACCOUNT);
        bytes.extend(id[..4].iter().rev());
        Ok(Self(bytes))
    }

    /// Splits an issue off the front of bytes that were already validated.
    pub(crate) fn split_from(bytes: &[u8]) -> (Self, &[u8]) {
        let length = if bytes[..20].iter().all(|b| *b == 0) {
            20
        } else if bytes.len() >= 44 && bytes[20..40] == NO_ACCOUNT {
            44
        } else {
            40
        };
        (Self(bytes[..length].to_vec()), &bytes[length..])
    }
}

impl SerializedType for Issue {
    const NAME: &'static str = "Issue";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        let map = value.as_object().ok_or(BinaryCodecError::InvalidValueType {
            type_name: Self::NAME,
            expected: "an object with currency and issuer, or mpt_issuance_id",
        })?;

        if let Some(id) = map.get("mpt_issuance_id") {
            return Self::from_mpt_id(expect_str(id, Self::NAME, "a hex mpt_issuance_id")?);
        }

        let currency = Currency::from_value(map.get("currency").ok_or(
            BinaryCodecError::InvalidValueType {
                type_name: Self::NAME,
                expected: "a currency field",
            },
        )?)?;
        match (currency.is_native(), map.get("issuer")) {
            (true, None) => Ok(Self(currency.as_bytes().to_vec())),
            (false, Some(issuer)) => {
                let mut bytes = currency.as_bytes().to_vec();
                bytes.extend_from_slice(AccountId::from_value(issuer)?.as_bytes());
                Ok(Self(bytes))
            }
            (true, Some(_)) => Err(BinaryCodecError::format(
                Self::NAME,
                "the native asset has no issuer",
            )),
            (false, None) => Err(BinaryCodecError::format(
                Self::NAME,
                "issued currencies need an issuer",
            )),
        }
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        let mut bytes = parser.read(20)?.to_vec();
        if bytes.iter().any(|b| *b != 0) {
            let second = parser.read(20)?;
            bytes.extend_from_slice(second);
            if second == NO_ACCOUNT {
                bytes.extend_from_slice(parser.read(4)?);
            }
        }
        check_hint(Self::NAME, bytes.len(), length_hint)?;
        Ok(Self(bytes))
    }

    fn to_json(&self) -> Value {
        let mut out = Map::new();
        match self.0.len() {
            20 => {
                out.insert("currency".into(), Value::String("XRP".into()));
            }
            40 => {
                let mut currency = [0u8; 20];
                currency.copy_from_slice(&self.0[..20]);
                let mut issuer = [0u8; 20];
                issuer.copy_from_slice(&self.0[20..]);
                out.insert("currency".into(), Currency::new(currency).to_json());
                out.insert("issuer".into(), AccountId::new(issuer).to_json());
            }
            _ => {
                let mut id = Vec::with_capacity(MPT_ID_LENGTH);
                id.extend(self.0[40..44].iter().rev());
                id.extend_from_slice(&self.0[..20]);
                out.insert("mpt_issuance_id".into(), Value::String(hex::encode_upper(id)));
            }
        }
        Value::Object(out)
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::Definitions;
    use serde_json::json;

    const ISSUER: &str = "r9LqNeG6qHxjeUocjvVki2XR35weJ9mZgQ";
    const ISSUER_HEX: &str = "5B812C9D57731E27A2DA8B1830195F88EF32A3B6";

    fn read_back(issue: &Issue) -> Issue {
        let defs = Definitions::bundled();
        let mut parser = BinaryParser::new(issue.as_bytes(), &defs);
        let decoded = Issue::from_parser(&mut parser, None).unwrap();
        assert!(parser.is_end());
        decoded
    }

    #[test]
    fn native_issue_is_twenty_zero_bytes() {
        let issue = Issue::from_value(&json!({"currency": "XRP"})).unwrap();
        assert_eq!(issue.as_bytes(), &[0u8; 20]);
        assert_eq!(read_back(&issue).to_json(), json!({"currency": "XRP"}));
    }

    #[test]
    fn issued_currency_carries_issuer() {
        let value = json!({"currency": "USD", "issuer": ISSUER});
        let issue = Issue::from_value(&value).unwrap();
        assert_eq!(issue.as_bytes().len(), 40);
        assert_eq!(read_back(&issue).to_json(), value);
    }

    #[test]
    fn token_issuance_reverses_sequence() {
        let id = format!("00000001{ISSUER_HEX}");
        let issue = Issue::from_value(&json!({"mpt_issuance_id": id})).unwrap();
        let bytes = issue.as_bytes();
        assert_eq!(bytes.len(), 44);
        assert_eq!(hex::encode_upper(&bytes[..20]), ISSUER_HEX);
        assert_eq!(&bytes[20..40], &NO_ACCOUNT);
        assert_eq!(&bytes[40..], &[1, 0, 0, 0]);
        assert_eq!(read_back(&issue).to_json(), json!({"mpt_issuance_id": id}));
    }

    #[test]
    fn issuer_presence_must_match_currency() {
        assert!(Issue::from_value(&json!({"currency": "XRP", "issuer": ISSUER})).is_err());
        assert!(Issue::from_value(&json!({"currency": "USD"})).is_err());
        assert!(matches!(
            Issue::from_value(&json!("USD")),
            Err(BinaryCodecError::InvalidValueType { .. })
        ));
        assert!(matches!(
            Issue::from_value(&json!({"mpt_issuance_id": "0001"})),
            Err(BinaryCodecError::LengthMismatch { .. })
        ));
    }
}
