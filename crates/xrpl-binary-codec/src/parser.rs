//! Cursor over a serialized buffer.

use crate::definitions::{Definitions, FieldInstance};
use crate::errors::BinaryCodecError;
use crate::field::FieldHeader;
use crate::serializer::MAX_LENGTH_PREFIXED;
use crate::types::SerializedValue;

/// Containers allowed below the top-level object, as the ledger enforces.
pub const MAX_NESTING_DEPTH: usize = 10;

/// Reads big-endian integers, length prefixes, field headers and typed
/// values from a borrowed buffer.
pub struct BinaryParser<'a> {
    bytes: &'a [u8],
    position: usize,
    depth: usize,
    definitions: &'a Definitions,
}

impl<'a> BinaryParser<'a> {
    /// Creates a parser over `bytes` resolving fields through `definitions`.
    pub fn new(bytes: &'a [u8], definitions: &'a Definitions) -> Self {
        Self::nested(bytes, definitions, 0)
    }

    /// Creates a parser for container bytes found `depth` levels down.
    pub(crate) fn nested(bytes: &'a [u8], definitions: &'a Definitions, depth: usize) -> Self {
        Self {
            bytes,
            position: 0,
            depth,
            definitions,
        }
    }

    /// Number of containers currently open.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Runs `read` one container level deeper.
    ///
    /// Fails with `NestingTooDeep` once more than [`MAX_NESTING_DEPTH`]
    /// containers are open below the top-level object.
    pub(crate) fn descend<T>(
        &mut self,
        type_name: &'static str,
        read: impl FnOnce(&mut Self) -> Result<T, BinaryCodecError>,
    ) -> Result<T, BinaryCodecError> {
        if self.depth > MAX_NESTING_DEPTH {
            return Err(BinaryCodecError::NestingTooDeep {
                type_name,
                limit: MAX_NESTING_DEPTH,
            });
        }
        self.depth += 1;
        let out = read(self);
        self.depth -= 1;
        out
    }

    /// Registry used to resolve field headers.
    pub fn definitions(&self) -> &'a Definitions {
        self.definitions
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }

    /// `true` once every byte has been consumed.
    pub fn is_end(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread part of the buffer.
    pub fn rest(&self) -> &'a [u8] {
        &self.bytes[self.position..]
    }

    fn underrun(&self, needed: usize) -> BinaryCodecError {
        BinaryCodecError::BufferUnderrun {
            offset: self.position,
            needed,
            remaining: self.remaining(),
        }
    }

    /// Returns the next byte without consuming it.
    pub fn peek(&self) -> Result<u8, BinaryCodecError> {
        self.bytes
            .get(self.position)
            .copied()
            .ok_or_else(|| self.underrun(1))
    }

    /// Consumes `n` bytes without looking at them.
    pub fn skip(&mut self, n: usize) -> Result<(), BinaryCodecError> {
        self.read(n).map(|_| ())
    }

    /// Consumes and returns the next `n` bytes.
    pub fn read(&mut self, n: usize) -> Result<&'a [u8], BinaryCodecError> {
        if n > self.remaining() {
            return Err(self.underrun(n));
        }
        let out = &self.bytes[self.position..self.position + n];
        self.position += n;
        Ok(out)
    }

    /// Consumes the next `N` bytes into an array.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], BinaryCodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read(N)?);
        Ok(out)
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, BinaryCodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a big-endian `u16`.
    pub fn read_u16(&mut self) -> Result<u16, BinaryCodecError> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian `u32`.
    pub fn read_u32(&mut self) -> Result<u32, BinaryCodecError> {
        Ok(u32::from_be_bytes(self.read_array()?))
    }

    /// Reads a big-endian `u64`.
    pub fn read_u64(&mut self) -> Result<u64, BinaryCodecError> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }

    /// Reads a one-to-three byte length prefix.
    pub fn read_length_prefix(&mut self) -> Result<usize, BinaryCodecError> {
        let b1 = usize::from(self.read_u8()?);
        let length = match b1 {
            0..=192 => b1,
            193..=240 => {
                let b2 = usize::from(self.read_u8()?);
                193 + (b1 - 193) * 256 + b2
            }
            241..=254 => {
                let b2 = usize::from(self.read_u8()?);
                let b3 = usize::from(self.read_u8()?);
                12481 + (b1 - 241) * 65536 + b2 * 256 + b3
            }
            _ => {
                return Err(BinaryCodecError::InvalidLengthPrefix(format!(
                    "reserved first byte 0x{b1:02X}"
                )))
            }
        };
        if length > MAX_LENGTH_PREFIXED {
            return Err(BinaryCodecError::InvalidLengthPrefix(format!(
                "length {length} exceeds {MAX_LENGTH_PREFIXED}"
            )));
        }
        Ok(length)
    }

    /// Reads a field header.
    pub fn read_field_header(&mut self) -> Result<FieldHeader, BinaryCodecError> {
        FieldHeader::read(self)
    }

    /// Reads a field header and resolves it through the registry.
    pub fn read_field(&mut self) -> Result<&'a FieldInstance, BinaryCodecError> {
        let header = self.read_field_header()?;
        self.definitions.field_from_header(header)
    }

    /// Reads the value of `field`, consuming its length prefix first when the
    /// field is variable-length.
    pub fn read_field_value(
        &mut self,
        field: &FieldInstance,
    ) -> Result<SerializedValue, BinaryCodecError> {
        let wire_type = field.require_wire_type()?;
        let hint = if field.is_variable_length {
            Some(self.read_length_prefix()?)
        } else {
            None
        };
        wire_type.from_parser(self, hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let defs = Definitions::bundled();
        let bytes = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07];
        let mut parser = BinaryParser::new(&bytes, &defs);
        assert_eq!(parser.read_u8().unwrap(), 0x01);
        assert_eq!(parser.read_u16().unwrap(), 0x0203);
        assert_eq!(parser.read_u32().unwrap(), 0x04050607);
        assert!(parser.is_end());
    }

    #[test]
    fn peek_does_not_consume() {
        let defs = Definitions::bundled();
        let mut parser = BinaryParser::new(&[0xAB, 0xCD], &defs);
        assert_eq!(parser.peek().unwrap(), 0xAB);
        assert_eq!(parser.position(), 0);
        parser.skip(1).unwrap();
        assert_eq!(parser.peek().unwrap(), 0xCD);
    }

    #[test]
    fn short_reads_underrun() {
        let defs = Definitions::bundled();
        let mut parser = BinaryParser::new(&[0x00, 0x01], &defs);
        parser.skip(1).unwrap();
        match parser.read_u32() {
            Err(BinaryCodecError::BufferUnderrun {
                offset,
                needed,
                remaining,
            }) => assert_eq!((offset, needed, remaining), (1, 4, 1)),
            other => panic!("expected underrun, got {other:?}"),
        }
        assert_eq!(parser.position(), 1);
    }

    #[test]
    fn length_prefix_tiers() {
        let defs = Definitions::bundled();
        let cases: [(&[u8], usize); 5] = [
            (&[0xC0], 192),
            (&[0xC1, 0x00], 193),
            (&[0xF0, 0xFF], 12480),
            (&[0xF1, 0x00, 0x00], 12481),
            (&[0xFE, 0xD4, 0x17], 918744),
        ];
        for (bytes, expected) in cases {
            let mut parser = BinaryParser::new(bytes, &defs);
            assert_eq!(parser.read_length_prefix().unwrap(), expected);
            assert!(parser.is_end());
        }
    }

    #[test]
    fn out_of_range_length_prefixes_fail() {
        let defs = Definitions::bundled();
        let mut parser = BinaryParser::new(&[0xFF], &defs);
        assert!(matches!(
            parser.read_length_prefix(),
            Err(BinaryCodecError::InvalidLengthPrefix(_))
        ));
        let mut parser = BinaryParser::new(&[0xFE, 0xFF, 0xFF], &defs);
        assert!(matches!(
            parser.read_length_prefix(),
            Err(BinaryCodecError::InvalidLengthPrefix(_))
        ));
    }

    #[test]
    fn descend_tracks_and_bounds_depth() {
        let defs = Definitions::bundled();
        let mut parser = BinaryParser::new(&[], &defs);
        let inner = parser.descend("STObject", |p| Ok(p.depth())).unwrap();
        assert_eq!(inner, 1);
        assert_eq!(parser.depth(), 0);

        let mut deep = BinaryParser::nested(&[], &defs, MAX_NESTING_DEPTH + 1);
        assert!(matches!(
            deep.descend("STArray", |_| Ok(())),
            Err(BinaryCodecError::NestingTooDeep { type_name: "STArray", limit: MAX_NESTING_DEPTH })
        ));
        assert_eq!(deep.depth(), MAX_NESTING_DEPTH + 1);
    }

    #[test]
    fn read_field_resolves_through_registry() {
        let defs = Definitions::bundled();
        let mut parser = BinaryParser::new(&[0x12, 0x00, 0x00], &defs);
        let field = parser.read_field().unwrap();
        assert_eq!(field.name, "TransactionType");
        let value = parser.read_field_value(field).unwrap();
        assert_eq!(value.as_bytes(), &[0x00, 0x00]);
    }
}
