//! Wire types and the dispatch from field metadata to their implementations.

mod account_id;
mod amount;
mod blob;
mod currency;
mod decimal;
mod hash;
mod issue;
mod number;
mod path_set;
mod st_array;
mod st_object;
mod uint;
mod vector256;
mod xchain_bridge;

pub use account_id::AccountId;
pub use amount::Amount;
pub use blob::Blob;
pub use currency::Currency;
pub use hash::{Hash, Hash128, Hash160, Hash192, Hash256};
pub use issue::Issue;
pub use number::Number;
pub use path_set::{PathSet, PathStep};
pub use st_array::{StArray, ARRAY_END_MARKER};
pub use st_object::{StObject, OBJECT_END_MARKER};
pub use uint::{UInt, UInt16, UInt32, UInt64, UInt8};
pub use vector256::Vector256;
pub use xchain_bridge::XChainBridge;

use crate::definitions::{Definitions, FieldInstance};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use crate::serializer::BinarySerializer;
use serde_json::Value;

/// UInt64 fields whose JSON form is a base-10 string instead of hex.
const BASE10_UINT64_FIELDS: &[&str] = &[
    "MaximumAmount",
    "OutstandingAmount",
    "MPTAmount",
    "LockedAmount",
];

/// Common contract of the leaf wire types.
pub trait SerializedType: Sized {
    /// Wire type name as used in the definitions.
    const NAME: &'static str;

    /// Builds a value from its JSON form.
    fn from_value(value: &Value) -> Result<Self, BinaryCodecError>;

    /// Reads a value; `length_hint` is the decoded length prefix for
    /// variable-length fields.
    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError>;

    /// Renders the JSON form.
    fn to_json(&self) -> Value;

    /// Canonical bytes.
    fn as_bytes(&self) -> &[u8];

    /// Appends the canonical bytes to `sink`.
    fn write_into(&self, sink: &mut BinarySerializer) {
        sink.put(self.as_bytes());
    }
}

/// Every wire type this codec implements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireType {
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 128-bit hash.
    Hash128,
    /// 160-bit hash.
    Hash160,
    /// 192-bit hash.
    Hash192,
    /// 256-bit hash.
    Hash256,
    /// Opaque variable-length bytes.
    Blob,
    /// 160-bit currency code.
    Currency,
    /// 160-bit account identifier.
    AccountId,
    /// Native or issued-currency amount.
    Amount,
    /// Asset identifier.
    Issue,
    /// List of 256-bit hashes.
    Vector256,
    /// Mantissa/exponent decimal.
    Number,
    /// Payment paths.
    PathSet,
    /// Cross-chain bridge description.
    XChainBridge,
    /// Nested object.
    StObject,
    /// Array of single-field objects.
    StArray,
}

impl WireType {
    /// Resolves a definitions type name.
    pub fn from_type_name(name: &str) -> Option<Self> {
        Some(match name {
            "UInt8" => WireType::UInt8,
            "UInt16" => WireType::UInt16,
            "UInt32" => WireType::UInt32,
            "UInt64" => WireType::UInt64,
            "Hash128" => WireType::Hash128,
            "Hash160" => WireType::Hash160,
            "Hash192" => WireType::Hash192,
            "Hash256" => WireType::Hash256,
            "Blob" => WireType::Blob,
            "Currency" => WireType::Currency,
            "AccountID" => WireType::AccountId,
            "Amount" => WireType::Amount,
            "Issue" => WireType::Issue,
            "Vector256" => WireType::Vector256,
            "Number" => WireType::Number,
            "PathSet" => WireType::PathSet,
            "XChainBridge" => WireType::XChainBridge,
            "STObject" => WireType::StObject,
            "STArray" => WireType::StArray,
            _ => return None,
        })
    }

    /// Definitions type name.
    pub fn type_name(self) -> &'static str {
        match self {
            WireType::UInt8 => UInt8::NAME,
            WireType::UInt16 => UInt16::NAME,
            WireType::UInt32 => UInt32::NAME,
            WireType::UInt64 => UInt64::NAME,
            WireType::Hash128 => Hash128::NAME,
            WireType::Hash160 => Hash160::NAME,
            WireType::Hash192 => Hash192::NAME,
            WireType::Hash256 => Hash256::NAME,
            WireType::Blob => Blob::NAME,
            WireType::Currency => Currency::NAME,
            WireType::AccountId => AccountId::NAME,
            WireType::Amount => Amount::NAME,
            WireType::Issue => Issue::NAME,
            WireType::Vector256 => Vector256::NAME,
            WireType::Number => Number::NAME,
            WireType::PathSet => PathSet::NAME,
            WireType::XChainBridge => XChainBridge::NAME,
            WireType::StObject => "STObject",
            WireType::StArray => "STArray",
        }
    }

    /// Builds a value of this type from JSON.
    pub fn from_value(
        self,
        value: &Value,
        definitions: &Definitions,
    ) -> Result<SerializedValue, BinaryCodecError> {
        Ok(match self {
            WireType::UInt8 => SerializedValue::UInt8(UInt8::from_value(value)?),
            WireType::UInt16 => SerializedValue::UInt16(UInt16::from_value(value)?),
            WireType::UInt32 => SerializedValue::UInt32(UInt32::from_value(value)?),
            WireType::UInt64 => SerializedValue::UInt64(UInt64::from_value(value)?),
            WireType::Hash128 => SerializedValue::Hash128(Hash128::from_value(value)?),
            WireType::Hash160 => SerializedValue::Hash160(Hash160::from_value(value)?),
            WireType::Hash192 => SerializedValue::Hash192(Hash192::from_value(value)?),
            WireType::Hash256 => SerializedValue::Hash256(Hash256::from_value(value)?),
            WireType::Blob => SerializedValue::Blob(Blob::from_value(value)?),
            WireType::Currency => SerializedValue::Currency(Currency::from_value(value)?),
            WireType::AccountId => SerializedValue::AccountId(AccountId::from_value(value)?),
            WireType::Amount => SerializedValue::Amount(Amount::from_value(value)?),
            WireType::Issue => SerializedValue::Issue(Issue::from_value(value)?),
            WireType::Vector256 => SerializedValue::Vector256(Vector256::from_value(value)?),
            WireType::Number => SerializedValue::Number(Number::from_value(value)?),
            WireType::PathSet => SerializedValue::PathSet(PathSet::from_value(value)?),
            WireType::XChainBridge => {
                SerializedValue::XChainBridge(XChainBridge::from_value(value)?)
            }
            WireType::StObject => {
                SerializedValue::StObject(StObject::from_value(value, definitions, false)?)
            }
            WireType::StArray => SerializedValue::StArray(StArray::from_value(value, definitions)?),
        })
    }

    /// Reads a value of this type.
    pub fn from_parser(
        self,
        parser: &mut BinaryParser<'_>,
        hint: Option<usize>,
    ) -> Result<SerializedValue, BinaryCodecError> {
        Ok(match self {
            WireType::UInt8 => SerializedValue::UInt8(UInt8::from_parser(parser, hint)?),
            WireType::UInt16 => SerializedValue::UInt16(UInt16::from_parser(parser, hint)?),
            WireType::UInt32 => SerializedValue::UInt32(UInt32::from_parser(parser, hint)?),
            WireType::UInt64 => SerializedValue::UInt64(UInt64::from_parser(parser, hint)?),
            WireType::Hash128 => SerializedValue::Hash128(Hash128::from_parser(parser, hint)?),
            WireType::Hash160 => SerializedValue::Hash160(Hash160::from_parser(parser, hint)?),
            WireType::Hash192 => SerializedValue::Hash192(Hash192::from_parser(parser, hint)?),
            WireType::Hash256 => SerializedValue::Hash256(Hash256::from_parser(parser, hint)?),
            WireType::Blob => SerializedValue::Blob(Blob::from_parser(parser, hint)?),
            WireType::Currency => SerializedValue::Currency(Currency::from_parser(parser, hint)?),
            WireType::AccountId => {
                SerializedValue::AccountId(AccountId::from_parser(parser, hint)?)
            }
            WireType::Amount => SerializedValue::Amount(Amount::from_parser(parser, hint)?),
            WireType::Issue => SerializedValue::Issue(Issue::from_parser(parser, hint)?),
            WireType::Vector256 => {
                SerializedValue::Vector256(Vector256::from_parser(parser, hint)?)
            }
            WireType::Number => SerializedValue::Number(Number::from_parser(parser, hint)?),
            WireType::PathSet => SerializedValue::PathSet(PathSet::from_parser(parser, hint)?),
            WireType::XChainBridge => {
                SerializedValue::XChainBridge(XChainBridge::from_parser(parser, hint)?)
            }
            WireType::StObject => SerializedValue::StObject(StObject::from_parser(parser)?),
            WireType::StArray => SerializedValue::StArray(StArray::from_parser(parser)?),
        })
    }
}

/// A decoded or constructed value of any wire type.
#[derive(Debug, Clone, PartialEq)]
pub enum SerializedValue {
    /// UInt8 value.
    UInt8(UInt8),
    /// UInt16 value.
    UInt16(UInt16),
    /// UInt32 value.
    UInt32(UInt32),
    /// UInt64 value.
    UInt64(UInt64),
    /// Hash128 value.
    Hash128(Hash128),
    /// Hash160 value.
    Hash160(Hash160),
    /// Hash192 value.
    Hash192(Hash192),
    /// Hash256 value.
    Hash256(Hash256),
    /// Blob value.
    Blob(Blob),
    /// Currency value.
    Currency(Currency),
    /// AccountID value.
    AccountId(AccountId),
    /// Amount value.
    Amount(Amount),
    /// Issue value.
    Issue(Issue),
    /// Vector256 value.
    Vector256(Vector256),
    /// Number value.
    Number(Number),
    /// PathSet value.
    PathSet(PathSet),
    /// XChainBridge value.
    XChainBridge(XChainBridge),
    /// Nested object.
    StObject(StObject),
    /// Object array.
    StArray(StArray),
}

impl SerializedValue {
    /// Canonical bytes of the value, without field header or length prefix.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            SerializedValue::UInt8(v) => v.as_bytes(),
            SerializedValue::UInt16(v) => v.as_bytes(),
            SerializedValue::UInt32(v) => v.as_bytes(),
            SerializedValue::UInt64(v) => v.as_bytes(),
            SerializedValue::Hash128(v) => v.as_bytes(),
            SerializedValue::Hash160(v) => v.as_bytes(),
            SerializedValue::Hash192(v) => v.as_bytes(),
            SerializedValue::Hash256(v) => v.as_bytes(),
            SerializedValue::Blob(v) => v.as_bytes(),
            SerializedValue::Currency(v) => v.as_bytes(),
            SerializedValue::AccountId(v) => v.as_bytes(),
            SerializedValue::Amount(v) => v.as_bytes(),
            SerializedValue::Issue(v) => v.as_bytes(),
            SerializedValue::Vector256(v) => v.as_bytes(),
            SerializedValue::Number(v) => v.as_bytes(),
            SerializedValue::PathSet(v) => v.as_bytes(),
            SerializedValue::XChainBridge(v) => v.as_bytes(),
            SerializedValue::StObject(v) => v.as_bytes(),
            SerializedValue::StArray(v) => v.as_bytes(),
        }
    }

    /// Appends the canonical bytes to `sink`.
    pub fn write_into(&self, sink: &mut BinarySerializer) {
        sink.put(self.as_bytes());
    }

    /// Renders the JSON form. Nested containers resolve their fields
    /// through `definitions`.
    pub fn to_json(&self, definitions: &Definitions) -> Result<Value, BinaryCodecError> {
        self.to_json_at(definitions, 0)
    }

    pub(crate) fn to_json_at(
        &self,
        definitions: &Definitions,
        depth: usize,
    ) -> Result<Value, BinaryCodecError> {
        Ok(match self {
            SerializedValue::UInt8(v) => v.to_json(),
            SerializedValue::UInt16(v) => v.to_json(),
            SerializedValue::UInt32(v) => v.to_json(),
            SerializedValue::UInt64(v) => v.to_json(),
            SerializedValue::Hash128(v) => v.to_json(),
            SerializedValue::Hash160(v) => v.to_json(),
            SerializedValue::Hash192(v) => v.to_json(),
            SerializedValue::Hash256(v) => v.to_json(),
            SerializedValue::Blob(v) => v.to_json(),
            SerializedValue::Currency(v) => v.to_json(),
            SerializedValue::AccountId(v) => v.to_json(),
            SerializedValue::Amount(v) => v.to_json(),
            SerializedValue::Issue(v) => v.to_json(),
            SerializedValue::Vector256(v) => v.to_json(),
            SerializedValue::Number(v) => v.to_json(),
            SerializedValue::PathSet(v) => v.to_json(),
            SerializedValue::XChainBridge(v) => v.to_json(),
            SerializedValue::StObject(v) => v.to_json_at(definitions, depth)?,
            SerializedValue::StArray(v) => v.to_json_at(definitions, depth)?,
        })
    }
}

/// Builds the value of `field` from JSON, applying the per-field JSON forms
/// (enumeration names, base-10 UInt64 fields) on top of the wire type.
pub fn field_value_from_json(
    field: &FieldInstance,
    value: &Value,
    definitions: &Definitions,
) -> Result<SerializedValue, BinaryCodecError> {
    let wire_type = field.require_wire_type()?;

    if let (Some((kind, table)), Value::String(name)) =
        (definitions.associated_table(&field.name), value)
    {
        let code = table.code(name).ok_or_else(|| {
            BinaryCodecError::format(kind, format!("unknown name {name}"))
        })?;
        return wire_type.from_value(&Value::from(code), definitions);
    }

    if wire_type == WireType::UInt64 && BASE10_UINT64_FIELDS.contains(&field.name.as_str()) {
        return Ok(SerializedValue::UInt64(UInt64::from_base10_value(value)?));
    }

    wire_type.from_value(value, definitions)
}

/// Renders the value of `field` as JSON, the inverse of
/// [`field_value_from_json`]. Enumeration codes without a name stay numeric.
pub fn field_value_to_json(
    field: &FieldInstance,
    value: &SerializedValue,
    definitions: &Definitions,
) -> Result<Value, BinaryCodecError> {
    field_value_to_json_at(field, value, definitions, 0)
}

pub(crate) fn field_value_to_json_at(
    field: &FieldInstance,
    value: &SerializedValue,
    definitions: &Definitions,
    depth: usize,
) -> Result<Value, BinaryCodecError> {
    if let Some((_, table)) = definitions.associated_table(&field.name) {
        let code = match value {
            SerializedValue::UInt8(v) => Some(v.value()),
            SerializedValue::UInt16(v) => Some(v.value()),
            SerializedValue::UInt32(v) => Some(v.value()),
            _ => None,
        };
        if let Some(name) = code
            .and_then(|c| i32::try_from(c).ok())
            .and_then(|c| table.name(c))
        {
            return Ok(Value::String(name.to_string()));
        }
    }

    if let SerializedValue::UInt64(v) = value {
        if BASE10_UINT64_FIELDS.contains(&field.name.as_str()) {
            return Ok(Value::String(v.value().to_string()));
        }
    }

    value.to_json_at(definitions, depth)
}

pub(crate) fn expect_str<'v>(
    value: &'v Value,
    type_name: &'static str,
    expected: &'static str,
) -> Result<&'v str, BinaryCodecError> {
    value.as_str().ok_or(BinaryCodecError::InvalidValueType {
        type_name,
        expected,
    })
}

pub(crate) fn decode_hex(type_name: &'static str, text: &str) -> Result<Vec<u8>, BinaryCodecError> {
    hex::decode(text).map_err(|e| BinaryCodecError::format(type_name, format!("{e} in {text:?}")))
}

pub(crate) fn exact_length<const N: usize>(
    type_name: &'static str,
    bytes: &[u8],
) -> Result<[u8; N], BinaryCodecError> {
    <[u8; N]>::try_from(bytes).map_err(|_| BinaryCodecError::LengthMismatch {
        type_name,
        expected: N,
        actual: bytes.len(),
    })
}

/// Fixed-width types accept a length hint only when it matches their width.
pub(crate) fn check_hint(
    type_name: &'static str,
    expected: usize,
    hint: Option<usize>,
) -> Result<(), BinaryCodecError> {
    match hint {
        Some(actual) if actual != expected => Err(BinaryCodecError::LengthMismatch {
            type_name,
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}
