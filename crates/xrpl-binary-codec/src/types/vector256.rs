use super::{Hash256, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::Value;

/// Concatenated 256-bit hashes; the count follows from the byte length.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Vector256(Vec<u8>);

impl Vector256 {
    /// Number of hashes held.
    pub fn len(&self) -> usize {
        self.0.len() / 32
    }

    /// `true` when no hashes are held.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl SerializedType for Vector256 {
    const NAME: &'static str = "Vector256";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        let items = value.as_array().ok_or(BinaryCodecError::InvalidValueType {
            type_name: Self::NAME,
            expected: "an array of 256-bit hex hashes",
        })?;
        let mut bytes = Vec::with_capacity(items.len() * 32);
        for item in items {
            bytes.extend_from_slice(Hash256::from_value(item)?.as_bytes());
        }
        Ok(Self(bytes))
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        let length = length_hint.unwrap_or_else(|| parser.remaining());
        if length % 32 != 0 {
            return Err(BinaryCodecError::LengthMismatch {
                type_name: Self::NAME,
                expected: length - length % 32,
                actual: length,
            });
        }
        Ok(Self(parser.read(length)?.to_vec()))
    }

    fn to_json(&self) -> Value {
        Value::Array(
            self.0
                .chunks(32)
                .map(|chunk| Value::String(hex::encode_upper(chunk)))
                .collect(),
        )
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
    fn hashes_concatenate_in_order() {
        let value = json!(["11".repeat(32), "22".repeat(32)]);
        let vector = Vector256::from_value(&value).unwrap();
        assert_eq!(vector.len(), 2);
        assert_eq!(vector.as_bytes()[32], 0x22);
        assert_eq!(vector.to_json(), value);
        assert_eq!(Vector256::from_value(&json!([])).unwrap().to_json(), json!([]));
    }

    #[test]
    fn partial_hash_length_is_rejected() {
        let defs = Definitions::bundled();
        let bytes = [0u8; 40];
        let mut parser = BinaryParser::new(&bytes, &defs);
        assert!(matches!(
            Vector256::from_parser(&mut parser, Some(40)),
            Err(BinaryCodecError::LengthMismatch { .. })
        ));
    }
}
