use super::{decode_hex, expect_str, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use serde_json::Value;

/// Variable-length opaque bytes, rendered as uppercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Blob(Vec<u8>);

impl Blob {
    /// Wraps raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl SerializedType for Blob {
    const NAME: &'static str = "Blob";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        let text = expect_str(value, Self::NAME, "a hex string")?;
        Ok(Self(decode_hex(Self::NAME, text)?))
    }

    /// Reads `length_hint` bytes, or the rest of the buffer without a hint.
    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        let length = length_hint.unwrap_or_else(|| parser.remaining());
        Ok(Self(parser.read(length)?.to_vec()))
    }

    fn to_json(&self) -> Value {
        Value::String(hex::encode_upper(&self.0))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
