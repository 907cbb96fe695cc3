//! Field headers: the one-to-three byte prefix naming each field on the wire.
//!
//! Codes below 16 share a single byte (`type << 4 | field`). A code of 16 or
//! more is escaped: its nibble is zero and the code follows in its own byte,
//! type code first when both are escaped.

use crate::definitions::Definitions;
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;

/// Type code and field code of a serialized field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldHeader {
    /// Wire type code.
    pub type_code: u8,
    /// Field code within the type.
    pub field_code: u8,
}

impl FieldHeader {
    /// Creates a header from its two codes. Both must be non-zero.
    pub fn new(type_code: u8, field_code: u8) -> Self {
        Self {
            type_code,
            field_code,
        }
    }

    /// Sort key of the field: `(type_code << 16) | field_code`.
    pub fn ordinal(&self) -> u32 {
        (u32::from(self.type_code) << 16) | u32::from(self.field_code)
    }

    /// Encodes the header in its canonical form.
    pub fn to_bytes(&self) -> Vec<u8> {
        let (t, f) = (self.type_code, self.field_code);
        match (t < 16, f < 16) {
            (true, true) => vec![(t << 4) | f],
            (true, false) => vec![t << 4, f],
            (false, true) => vec![f, t],
            (false, false) => vec![0, t, f],
        }
    }

    /// Decodes a header from the start of `bytes`, returning it with the
    /// number of bytes consumed.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Self, usize), BinaryCodecError> {
        let mut pos = 0;
        let mut next = || -> Result<u8, BinaryCodecError> {
            let byte = bytes.get(pos).copied().ok_or(BinaryCodecError::BufferUnderrun {
                offset: pos,
                needed: 1,
                remaining: 0,
            })?;
            pos += 1;
            Ok(byte)
        };

        let first = next()?;
        let mut type_code = first >> 4;
        let mut field_code = first & 0x0F;
        if type_code == 0 {
            type_code = next()?;
            if type_code < 16 {
                return Err(BinaryCodecError::UnknownField(format!(
                    "non-canonical escaped type code {type_code}"
                )));
            }
        }
        if field_code == 0 {
            field_code = next()?;
            if field_code < 16 {
                return Err(BinaryCodecError::UnknownField(format!(
                    "non-canonical escaped field code {field_code}"
                )));
            }
        }
        Ok((Self::new(type_code, field_code), pos))
    }

    /// Reads a header from the parser's current position.
    pub fn read(parser: &mut BinaryParser<'_>) -> Result<Self, BinaryCodecError> {
        let start = parser.position();
        let (header, consumed) = Self::from_bytes(parser.rest()).map_err(|e| match e {
            BinaryCodecError::BufferUnderrun { needed, .. } => BinaryCodecError::BufferUnderrun {
                offset: start,
                needed,
                remaining: parser.remaining(),
            },
            other => other,
        })?;
        parser.skip(consumed)?;
        Ok(header)
    }
}

/// Encodes the header of the named field.
pub fn encode_field_name(definitions: &Definitions, name: &str) -> Result<Vec<u8>, BinaryCodecError> {
    Ok(definitions.field_header_from_name(name)?.to_bytes())
}

/// Decodes a complete header back into its field name.
pub fn decode_field_name(definitions: &Definitions, bytes: &[u8]) -> Result<String, BinaryCodecError> {
    let (header, consumed) = FieldHeader::from_bytes(bytes)?;
    if consumed != bytes.len() {
        return Err(BinaryCodecError::UnknownField(format!(
            "{} trailing bytes after field header",
            bytes.len() - consumed
        )));
    }
    Ok(definitions.field_name_from_header(header)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_widths_follow_code_ranges() {
        assert_eq!(FieldHeader::new(1, 2).to_bytes(), vec![0x12]);
        assert_eq!(FieldHeader::new(15, 15).to_bytes(), vec![0xFF]);
        assert_eq!(FieldHeader::new(2, 16).to_bytes(), vec![0x20, 16]);
        assert_eq!(FieldHeader::new(16, 3).to_bytes(), vec![0x03, 16]);
        assert_eq!(FieldHeader::new(16, 16).to_bytes(), vec![0x00, 16, 16]);
    }

    #[test]
    fn boundary_codes_decode_to_same_header() {
        for (t, f) in [(1, 1), (15, 15), (15, 16), (16, 15), (16, 16), (255, 255)] {
            let header = FieldHeader::new(t, f);
            let bytes = header.to_bytes();
            assert_eq!(FieldHeader::from_bytes(&bytes).unwrap(), (header, bytes.len()));
        }
    }

    #[test]
    fn escaped_small_codes_are_rejected() {
        assert!(matches!(
            FieldHeader::from_bytes(&[0x00, 0x05, 0x20]),
            Err(BinaryCodecError::UnknownField(_))
        ));
        assert!(matches!(
            FieldHeader::from_bytes(&[0x20, 0x0F]),
            Err(BinaryCodecError::UnknownField(_))
        ));
        assert!(matches!(
            FieldHeader::from_bytes(&[0x20, 0x00]),
            Err(BinaryCodecError::UnknownField(_))
        ));
    }

    #[test]
    fn truncated_header_underruns() {
        assert!(matches!(
            FieldHeader::from_bytes(&[0x00, 0x10]),
            Err(BinaryCodecError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn field_names_round_trip_through_registry() {
        let defs = Definitions::bundled();
        for name in ["TransactionType", "Flags", "Account", "TickSize", "Memos", "Paths"] {
            let bytes = encode_field_name(&defs, name).unwrap();
            assert_eq!(decode_field_name(&defs, &bytes).unwrap(), name);
        }
        // TickSize is UInt8 (type 16), field 16.
        assert_eq!(encode_field_name(&defs, "TickSize").unwrap(), vec![0x00, 16, 16]);
    }
}
