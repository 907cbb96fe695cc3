use super::st_object::{OBJECT_END_MARKER, OBJECT_END_MARKER_NAME};
use super::StObject;
use crate::definitions::Definitions;
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use crate::serializer::BinarySerializer;
use serde_json::{Map, Value};

/// Byte closing an array.
pub const ARRAY_END_MARKER: u8 = 0xF1;
const ARRAY_END_MARKER_NAME: &str = "ArrayEndMarker";

/// Array of single-field wrapper objects, e.g. `[{"Memo": {...}}, ...]`.
///
/// Each element is written as the wrapper field's header, the inner object,
/// and `0xE1`; the array is closed by `0xF1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StArray(Vec<u8>);

impl StArray {
    /// Serializes a JSON array of wrapper objects.
    pub fn from_value(value: &Value, definitions: &Definitions) -> Result<Self, BinaryCodecError> {
        let items = value.as_array().ok_or(BinaryCodecError::InvalidValueType {
            type_name: "STArray",
            expected: "an array of single-key objects",
        })?;

        let mut sink = BinarySerializer::new();
        for item in items {
            let (name, inner) = single_entry(item)?;
            let field = definitions.field(name)?;
            if !field.is_object() {
                return Err(BinaryCodecError::format(
                    "STArray",
                    format!("{name} is not an object field"),
                ));
            }
            sink.put(&field.require_header()?.to_bytes());
            sink.put(StObject::from_value(inner, definitions, false)?.as_bytes());
            sink.put(&[OBJECT_END_MARKER]);
        }
        sink.put(&[ARRAY_END_MARKER]);
        Ok(Self(sink.into_bytes()))
    }

    /// Reads elements up to and including the array end marker.
    pub fn from_parser(parser: &mut BinaryParser<'_>) -> Result<Self, BinaryCodecError> {
        let start = parser.rest();
        let begin = parser.position();
        parser.descend("STArray", |parser| loop {
            let field = parser.read_field()?;
            if field.name == ARRAY_END_MARKER_NAME {
                return Ok(());
            }
            if !field.is_object() {
                return Err(BinaryCodecError::format(
                    "STArray",
                    format!("element {} is not an object field", field.name),
                ));
            }
            StObject::from_parser(parser)?;
        })?;
        Ok(Self(start[..parser.position() - begin].to_vec()))
    }

    /// Renders the array as JSON wrapper objects.
    pub fn to_json(&self, definitions: &Definitions) -> Result<Value, BinaryCodecError> {
        self.to_json_at(definitions, 0)
    }

    pub(crate) fn to_json_at(
        &self,
        definitions: &Definitions,
        depth: usize,
    ) -> Result<Value, BinaryCodecError> {
        let mut parser = BinaryParser::nested(&self.0, definitions, depth);
        parser.descend("STArray", |parser| {
            let mut out = Vec::new();
            while !parser.is_end() {
                let field = parser.read_field()?;
                if field.name == ARRAY_END_MARKER_NAME {
                    break;
                }
                let inner = StObject::from_parser(parser)?;
                let mut wrapper = Map::new();
                wrapper.insert(
                    field.name.clone(),
                    inner.to_json_at(definitions, parser.depth())?,
                );
                out.push(Value::Object(wrapper));
            }
            Ok(Value::Array(out))
        })
    }

    /// Serialized bytes, end marker included.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

fn single_entry(item: &Value) -> Result<(&str, &Value), BinaryCodecError> {
    let map = item.as_object().ok_or(BinaryCodecError::InvalidValueType {
        type_name: "STArray",
        expected: "an array of single-key objects",
    })?;
    let mut entries = map.iter();
    match (entries.next(), entries.next()) {
        (Some((name, inner)), None) if name != OBJECT_END_MARKER_NAME => {
            Ok((name.as_str(), inner))
        }
        _ => Err(BinaryCodecError::format(
            "STArray",
            format!("elements need exactly one key, found {}", map.len()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn memos() -> Value {
        json!([
            {"Memo": {"MemoType": "6E6F7465", "MemoData": "01"}},
            {"Memo": {"MemoData": "02"}}
        ])
    }

    #[test]
    fn elements_are_wrapped_and_closed() {
        let defs = Definitions::bundled();
        let array = StArray::from_value(&memos(), &defs).unwrap();
        assert_eq!(
            hex::encode_upper(array.as_bytes()),
            "EA7C046E6F74657D0101E1EA7D0102E1F1"
        );
        assert_eq!(array.to_json(&defs).unwrap(), memos());
    }

    #[test]
    fn empty_array_is_only_the_marker() {
        let defs = Definitions::bundled();
        let array = StArray::from_value(&json!([]), &defs).unwrap();
        assert_eq!(array.as_bytes(), &[ARRAY_END_MARKER]);
        assert_eq!(array.to_json(&defs).unwrap(), json!([]));
    }

    #[test]
    fn parser_requires_end_marker() {
        let defs = Definitions::bundled();
        let bytes = hex::decode("EA7D0101E1").unwrap();
        let mut parser = BinaryParser::new(&bytes, &defs);
        assert!(matches!(
            StArray::from_parser(&mut parser),
            Err(BinaryCodecError::BufferUnderrun { .. })
        ));
    }

    #[test]
    fn parser_stops_after_marker() {
        let defs = Definitions::bundled();
        let bytes = hex::decode("EA7D0101E1F1AA").unwrap();
        let mut parser = BinaryParser::new(&bytes, &defs);
        let array = StArray::from_parser(&mut parser).unwrap();
        assert_eq!(array.as_bytes().len(), 6);
        assert_eq!(parser.remaining(), 1);
    }

    #[test]
    fn malformed_elements_are_rejected() {
        let defs = Definitions::bundled();
        assert!(StArray::from_value(&json!([{"Memo": {}, "Signer": {}}]), &defs).is_err());
        assert!(StArray::from_value(&json!([{"Flags": 0}]), &defs).is_err());
        assert!(StArray::from_value(&json!(["Memo"]), &defs).is_err());
        assert!(matches!(
            StArray::from_value(&json!([{"Bogus": {}}]), &defs),
            Err(BinaryCodecError::UnknownField(_))
        ));
    }
}
