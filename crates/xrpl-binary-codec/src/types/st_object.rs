//! Nested objects.
//!
//! Fields are written in ascending ordinal order whatever order the JSON
//! lists them in. A nested object field is closed by `0xE1`; the top-level
//! object simply runs to the end of the buffer.

use super::{field_value_from_json, field_value_to_json_at};
use crate::definitions::Definitions;
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use crate::serializer::BinarySerializer;
use crate::xaddress::expand_x_addresses;
use serde_json::{Map, Value};

/// Byte closing a nested object.
pub const OBJECT_END_MARKER: u8 = 0xE1;
pub(crate) const OBJECT_END_MARKER_NAME: &str = "ObjectEndMarker";

/// Pseudo-transaction whose `Account` is written with zero length.
const UNL_MODIFY: &str = "UNLModify";

/// Serialized object: a run of field headers and values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct StObject(Vec<u8>);

impl StObject {
    /// Serializes a JSON object.
    ///
    /// X-addresses are expanded first. Fields missing from `definitions`
    /// or not serialized are skipped. With `signing_only`, fields that are
    /// not signing fields are skipped as well; nested objects always keep
    /// every field.
    pub fn from_value(
        value: &Value,
        definitions: &Definitions,
        signing_only: bool,
    ) -> Result<Self, BinaryCodecError> {
        let map = value.as_object().ok_or(BinaryCodecError::InvalidValueType {
            type_name: "STObject",
            expected: "a JSON object",
        })?;
        let expanded = expand_x_addresses(map)?;
        let unl_modify =
            expanded.get("TransactionType").and_then(Value::as_str) == Some(UNL_MODIFY);

        let mut fields = Vec::with_capacity(expanded.len());
        for (name, item) in &expanded {
            let Some(field) = definitions.get_field(name) else {
                tracing::debug!(field = %name, "skipping unknown field");
                continue;
            };
            if !field.is_serialized {
                tracing::trace!(field = %name, "skipping non-serialized field");
                continue;
            }
            if signing_only && !field.is_signing_field {
                continue;
            }
            fields.push((field, item));
        }
        fields.sort_by_key(|(field, _)| field.ordinal);

        let mut sink = BinarySerializer::new();
        for (field, item) in fields {
            let value = field_value_from_json(field, item, definitions)?;
            let omit_payload = unl_modify && field.name == "Account";
            sink.write_field_and_value(field, &value, omit_payload)?;
            if field.is_object() {
                sink.put(&[OBJECT_END_MARKER]);
            }
        }
        Ok(Self(sink.into_bytes()))
    }

    /// Reads fields up to an end marker or the end of the buffer.
    ///
    /// The stored bytes are exactly the bytes consumed, end marker included.
    /// Fails with `NestingTooDeep` when containers nest past
    /// [`MAX_NESTING_DEPTH`](crate::parser::MAX_NESTING_DEPTH).
    pub fn from_parser(parser: &mut BinaryParser<'_>) -> Result<Self, BinaryCodecError> {
        let start = parser.rest();
        let begin = parser.position();
        parser.descend("STObject", |parser| {
            while !parser.is_end() {
                let field = parser.read_field()?;
                if field.name == OBJECT_END_MARKER_NAME {
                    break;
                }
                parser.read_field_value(field)?;
            }
            Ok(())
        })?;
        Ok(Self(start[..parser.position() - begin].to_vec()))
    }

    /// Renders the object as JSON, in wire order.
    pub fn to_json(&self, definitions: &Definitions) -> Result<Value, BinaryCodecError> {
        self.to_json_at(definitions, 0)
    }

    pub(crate) fn to_json_at(
        &self,
        definitions: &Definitions,
        depth: usize,
    ) -> Result<Value, BinaryCodecError> {
        let mut parser = BinaryParser::nested(&self.0, definitions, depth);
        parser.descend("STObject", |parser| {
            let mut out = Map::new();
            while !parser.is_end() {
                let field = parser.read_field()?;
                if field.name == OBJECT_END_MARKER_NAME {
                    break;
                }
                let value = parser.read_field_value(field)?;
                out.insert(
                    field.name.clone(),
                    field_value_to_json_at(field, &value, definitions, parser.depth())?,
                );
            }
            Ok(Value::Object(out))
        })
    }

    /// Serialized bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
