use super::{AccountId, Issue, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::{Map, Value};

const DOOR_LENGTH_PREFIX: u8 = 20;

/// Door accounts and assets of the two chains joined by a bridge.
///
/// Each door account is written with its own one-byte length prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XChainBridge(Vec<u8>);

const KEYS: [(&str, bool); 4] = [
    ("LockingChainDoor", true),
    ("LockingChainIssue", false),
    ("IssuingChainDoor", true),
    ("IssuingChainIssue", false),
];

impl SerializedType for XChainBridge {
    const NAME: &'static str = "XChainBridge";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        let map = value.as_object().ok_or(BinaryCodecError::InvalidValueType {
            type_name: Self::NAME,
            expected: "an object with door accounts and issues",
        })?;
        let mut bytes = Vec::new();
        for (key, is_door) in KEYS {
            let item = map.get(key).ok_or_else(|| {
                BinaryCodecError::format(Self::NAME, format!("missing {key}"))
            })?;
            if is_door {
                bytes.push(DOOR_LENGTH_PREFIX);
                bytes.extend_from_slice(AccountId::from_value(item)?.as_bytes());
            } else {
                bytes.extend_from_slice(Issue::from_value(item)?.as_bytes());
            }
        }
        Ok(Self(bytes))
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        _length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        let mut bytes = Vec::new();
        for (_, is_door) in KEYS {
            if is_door {
                let prefix = parser.read_u8()?;
                if prefix != DOOR_LENGTH_PREFIX {
                    return Err(BinaryCodecError::LengthMismatch {
                        type_name: Self::NAME,
                        expected: usize::from(DOOR_LENGTH_PREFIX),
                        actual: usize::from(prefix),
                    });
                }
                bytes.push(prefix);
                bytes.extend_from_slice(parser.read(20)?);
            } else {
                bytes.extend_from_slice(Issue::from_parser(parser, None)?.as_bytes());
            }
        }
        Ok(Self(bytes))
    }

    fn to_json(&self) -> Value {
        let mut out = Map::new();
        let mut rest = &self.0[..];
        for (key, is_door) in KEYS {
            if is_door {
                let mut id = [0u8; 20];
                id.copy_from_slice(&rest[1..21]);
                out.insert(key.into(), AccountId::new(id).to_json());
                rest = &rest[21..];
            } else {
                let (issue, tail) = Issue::split_from(rest);
                out.insert(key.into(), issue.to_json());
                rest = tail;
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

    #[test]
    fn bridge_round_trips() {
        let value = json!({
            "LockingChainDoor": "r9LqNeG6qHxjeUocjvVki2XR35weJ9mZgQ",
            "LockingChainIssue": {"currency": "XRP"},
            "IssuingChainDoor": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            "IssuingChainIssue": {"currency": "XRP"}
        });
        let bridge = XChainBridge::from_value(&value).unwrap();
        assert_eq!(bridge.as_bytes().len(), 21 + 20 + 21 + 20);
        assert_eq!(bridge.as_bytes()[0], 0x14);
        assert_eq!(bridge.as_bytes()[41], 0x14);

        let defs = Definitions::bundled();
        let mut parser = BinaryParser::new(bridge.as_bytes(), &defs);
        let decoded = XChainBridge::from_parser(&mut parser, None).unwrap();
        assert!(parser.is_end());
        assert_eq!(decoded.to_json(), value);
    }

    #[test]
    fn issued_assets_on_both_sides() {
        let value = json!({
            "LockingChainDoor": "r9LqNeG6qHxjeUocjvVki2XR35weJ9mZgQ",
            "LockingChainIssue": {"currency": "USD", "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"},
            "IssuingChainDoor": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
            "IssuingChainIssue": {"currency": "USD", "issuer": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"}
        });
        let bridge = XChainBridge::from_value(&value).unwrap();
        assert_eq!(bridge.to_json(), value);
    }

    #[test]
    fn missing_member_is_rejected() {
        assert!(XChainBridge::from_value(&json!({
            "LockingChainDoor": "r9LqNeG6qHxjeUocjvVki2XR35weJ9mZgQ",
            "LockingChainIssue": {"currency": "XRP"}
        }))
        .is_err());
    }
}
