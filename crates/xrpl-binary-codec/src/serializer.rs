//! Append-only byte sink used by every wire type.

use crate::definitions::FieldInstance;
use crate::errors::BinaryCodecError;
use crate::types::SerializedValue;

/// Largest length a variable-length prefix can express.
pub const MAX_LENGTH_PREFIXED: usize = 918_744;

/// Encodes `length` as a one-to-three byte prefix.
pub fn encode_length_prefix(length: usize) -> Result<Vec<u8>, BinaryCodecError> {
    match length {
        0..=192 => Ok(vec![length as u8]),
        193..=12480 => {
            let rest = length - 193;
            Ok(vec![193 + (rest >> 8) as u8, (rest & 0xFF) as u8])
        }
        12481..=MAX_LENGTH_PREFIXED => {
            let rest = length - 12481;
            Ok(vec![
                241 + (rest >> 16) as u8,
                ((rest >> 8) & 0xFF) as u8,
                (rest & 0xFF) as u8,
            ])
        }
        _ => Err(BinaryCodecError::InvalidLengthPrefix(format!(
            "length {length} exceeds {MAX_LENGTH_PREFIXED}"
        ))),
    }
}

/// Collects serialized bytes.
#[derive(Debug, Default)]
pub struct BinarySerializer {
    bytes: Vec<u8>,
}

impl BinarySerializer {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends raw bytes.
    pub fn put(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Appends a length prefix followed by `bytes`.
    pub fn write_length_encoded(&mut self, bytes: &[u8]) -> Result<(), BinaryCodecError> {
        let prefix = encode_length_prefix(bytes.len())?;
        self.put(&prefix);
        self.put(bytes);
        Ok(())
    }

    /// Appends a field header, a length prefix for variable-length fields,
    /// and the value bytes.
    ///
    /// With `omit_payload` a variable-length field is written with a zero
    /// length and no bytes.
    pub fn write_field_and_value(
        &mut self,
        field: &FieldInstance,
        value: &SerializedValue,
        omit_payload: bool,
    ) -> Result<(), BinaryCodecError> {
        self.put(&field.require_header()?.to_bytes());
        if field.is_variable_length {
            let payload = if omit_payload { &[][..] } else { value.as_bytes() };
            self.write_length_encoded(payload)
        } else {
            value.write_into(self);
            Ok(())
        }
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the sink and returns its bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
