//! Protocol tables: wire types, field metadata and the enumerations carried
//! by associated fields.
//!
//! A [`Definitions`] value is immutable once built. Callers share it as
//! `Arc<Definitions>`; the process-wide default lives behind an [`ArcSwap`]
//! so replacing it never mutates a registry another call is still using.

use crate::errors::BinaryCodecError;
use crate::field::FieldHeader;
use crate::types::WireType;
use arc_swap::ArcSwap;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, LazyLock};

/// Mainnet definitions compiled into the crate.
pub const BUNDLED_DEFINITIONS_JSON: &str = include_str!("definitions.json");

/// Permissions that do not correspond to a whole transaction type.
const GRANULAR_PERMISSIONS: &[(&str, i32)] = &[
    ("TrustlineAuthorize", 65537),
    ("TrustlineFreeze", 65538),
    ("TrustlineUnfreeze", 65539),
    ("AccountDomainSet", 65540),
    ("AccountEmailHashSet", 65541),
    ("AccountMessageKeySet", 65542),
    ("AccountTransferRateSet", 65543),
    ("AccountTickSizeSet", 65544),
    ("PaymentMint", 65545),
    ("PaymentBurn", 65546),
    ("MPTokenIssuanceLock", 65547),
    ("MPTokenIssuanceUnlock", 65548),
];

static DEFAULT_DEFINITIONS: LazyLock<ArcSwap<Definitions>> =
    LazyLock::new(|| ArcSwap::from_pointee(Definitions::bundled()));

#[derive(Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
struct RawDefinitions {
    types: HashMap<String, i32>,
    fields: Vec<(String, RawFieldInfo)>,
    ledger_entry_types: HashMap<String, i32>,
    transaction_results: HashMap<String, i32>,
    transaction_types: HashMap<String, i32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFieldInfo {
    nth: i32,
    #[serde(rename = "isVLEncoded")]
    is_vl_encoded: bool,
    is_serialized: bool,
    is_signing_field: bool,
    #[serde(rename = "type")]
    type_name: String,
}

/// Resolved metadata for one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInstance {
    /// Field name as it appears in JSON.
    pub name: String,
    /// Field code within its type.
    pub nth: i32,
    /// Value is preceded by a length prefix on the wire.
    pub is_variable_length: bool,
    /// Field appears in the binary form at all.
    pub is_serialized: bool,
    /// Field is covered by signatures.
    pub is_signing_field: bool,
    /// Wire type name from the definitions.
    pub type_name: String,
    /// Wire type code from the definitions.
    pub type_code: i32,
    /// Sort key: `(type_code << 16) | nth`.
    pub ordinal: i64,
    /// Encoded header, when both codes fit in a byte.
    pub header: Option<FieldHeader>,
    /// Wire type implementation, when this codec has one.
    pub wire_type: Option<WireType>,
}

impl FieldInstance {
    /// Returns the wire type or `UnsupportedType` when none is bound.
    pub fn require_wire_type(&self) -> Result<WireType, BinaryCodecError> {
        self.wire_type
            .ok_or_else(|| BinaryCodecError::UnsupportedType {
                field: self.name.clone(),
                type_name: self.type_name.clone(),
            })
    }

    /// Returns the header or `UnknownField` for fields that never hit the wire.
    pub fn require_header(&self) -> Result<FieldHeader, BinaryCodecError> {
        self.header
            .ok_or_else(|| BinaryCodecError::UnknownField(self.name.clone()))
    }

    /// `true` for nested-object fields, which are closed by an end marker.
    pub fn is_object(&self) -> bool {
        self.wire_type == Some(WireType::StObject)
    }
}

/// Bidirectional name/code table.
#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    by_name: HashMap<String, i32>,
    by_code: HashMap<i32, String>,
}

impl CodeTable {
    fn build(
        table: &str,
        entries: impl IntoIterator<Item = (String, i32)>,
    ) -> Result<Self, BinaryCodecError> {
        let mut out = CodeTable::default();
        for (name, code) in entries {
            if let Some(existing) = out.by_code.insert(code, name.clone()) {
                return Err(BinaryCodecError::MalformedDefinitions(format!(
                    "{table}: {name} and {existing} share code {code}"
                )));
            }
            out.by_name.insert(name, code);
        }
        Ok(out)
    }

    /// Looks up the code for a name.
    pub fn code(&self, name: &str) -> Option<i32> {
        self.by_name.get(name).copied()
    }

    /// Looks up the name for a code.
    pub fn name(&self, code: i32) -> Option<&str> {
        self.by_code.get(&code).map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// `true` when the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Immutable registry of protocol definitions.
#[derive(Debug, Clone)]
pub struct Definitions {
    types: HashMap<String, i32>,
    fields: HashMap<String, FieldInstance>,
    fields_by_header: HashMap<FieldHeader, String>,
    transaction_types: CodeTable,
    ledger_entry_types: CodeTable,
    transaction_results: CodeTable,
    permission_values: CodeTable,
}

impl Definitions {
    /// Parses a definitions document from JSON text.
    pub fn from_json_str(text: &str) -> Result<Self, BinaryCodecError> {
        let raw: RawDefinitions = serde_json::from_str(text)
            .map_err(|e| BinaryCodecError::MalformedDefinitions(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Builds definitions from an already-parsed JSON document.
    pub fn from_value(value: Value) -> Result<Self, BinaryCodecError> {
        let raw: RawDefinitions = serde_json::from_value(value)
            .map_err(|e| BinaryCodecError::MalformedDefinitions(e.to_string()))?;
        Self::from_raw(raw)
    }

    /// Reads and parses a definitions file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BinaryCodecError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Returns a fresh copy of the compiled-in definitions.
    pub fn bundled() -> Self {
        Self::from_json_str(BUNDLED_DEFINITIONS_JSON).expect("bundled definitions are valid")
    }

    fn from_raw(raw: RawDefinitions) -> Result<Self, BinaryCodecError> {
        let mut fields = HashMap::with_capacity(raw.fields.len());
        let mut fields_by_header = HashMap::new();

        for (name, info) in raw.fields {
            let type_code = *raw.types.get(&info.type_name).ok_or_else(|| {
                BinaryCodecError::MalformedDefinitions(format!(
                    "field {name} references undeclared type {}",
                    info.type_name
                ))
            })?;

            let header = if info.is_serialized {
                let header = header_for(type_code, info.nth).ok_or_else(|| {
                    BinaryCodecError::MalformedDefinitions(format!(
                        "serialized field {name} has codes ({type_code}, {}) outside 1..=255",
                        info.nth
                    ))
                })?;
                if let Some(existing) = fields_by_header.insert(header, name.clone()) {
                    return Err(BinaryCodecError::MalformedDefinitions(format!(
                        "fields {existing} and {name} share header ({type_code}, {})",
                        info.nth
                    )));
                }
                Some(header)
            } else {
                None
            };

            let instance = FieldInstance {
                name: name.clone(),
                nth: info.nth,
                is_variable_length: info.is_vl_encoded,
                is_serialized: info.is_serialized,
                is_signing_field: info.is_signing_field,
                wire_type: WireType::from_type_name(&info.type_name),
                type_name: info.type_name,
                type_code,
                ordinal: (i64::from(type_code) << 16) | i64::from(info.nth),
                header,
            };
            if fields.insert(name.clone(), instance).is_some() {
                return Err(BinaryCodecError::MalformedDefinitions(format!(
                    "field {name} is declared twice"
                )));
            }
        }

        let permission_values = CodeTable::build(
            "PERMISSION_VALUES",
            raw.transaction_types
                .iter()
                .filter(|(_, code)| **code >= 0)
                .map(|(name, code)| (name.clone(), code + 1))
                .chain(
                    GRANULAR_PERMISSIONS
                        .iter()
                        .map(|(name, code)| (name.to_string(), *code)),
                ),
        )?;

        let definitions = Definitions {
            transaction_types: CodeTable::build("TRANSACTION_TYPES", raw.transaction_types)?,
            ledger_entry_types: CodeTable::build("LEDGER_ENTRY_TYPES", raw.ledger_entry_types)?,
            transaction_results: CodeTable::build(
                "TRANSACTION_RESULTS",
                raw.transaction_results,
            )?,
            permission_values,
            types: raw.types,
            fields,
            fields_by_header,
        };

        tracing::debug!(
            types = definitions.types.len(),
            fields = definitions.fields.len(),
            transaction_types = definitions.transaction_types.len(),
            "loaded definitions"
        );
        Ok(definitions)
    }

    /// Looks up a field by name.
    pub fn get_field(&self, name: &str) -> Option<&FieldInstance> {
        self.fields.get(name)
    }

    /// Looks up a field by name, failing with `UnknownField`.
    pub fn field(&self, name: &str) -> Result<&FieldInstance, BinaryCodecError> {
        self.get_field(name)
            .ok_or_else(|| BinaryCodecError::UnknownField(name.to_string()))
    }

    /// Looks up a field by its header.
    pub fn field_from_header(&self, header: FieldHeader) -> Result<&FieldInstance, BinaryCodecError> {
        self.fields_by_header
            .get(&header)
            .and_then(|name| self.fields.get(name))
            .ok_or_else(|| {
                BinaryCodecError::UnknownField(format!(
                    "no field with type code {} and field code {}",
                    header.type_code, header.field_code
                ))
            })
    }

    /// Type code of a field.
    pub fn field_type_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        Ok(self.field(name)?.type_code)
    }

    /// Type name of a field.
    pub fn field_type_name(&self, name: &str) -> Result<&str, BinaryCodecError> {
        Ok(&self.field(name)?.type_name)
    }

    /// Field code (`nth`) of a field.
    pub fn field_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        Ok(self.field(name)?.nth)
    }

    /// Header of a serialized field.
    pub fn field_header_from_name(&self, name: &str) -> Result<FieldHeader, BinaryCodecError> {
        self.field(name)?.require_header()
    }

    /// Name of the field with the given header.
    pub fn field_name_from_header(&self, header: FieldHeader) -> Result<&str, BinaryCodecError> {
        Ok(&self.field_from_header(header)?.name)
    }

    /// Code of a declared wire type name.
    pub fn type_code(&self, type_name: &str) -> Option<i32> {
        self.types.get(type_name).copied()
    }

    /// Number of declared fields.
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Transaction type code for a name.
    pub fn transaction_type_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        lookup_code(&self.transaction_types, "TransactionType", name)
    }

    /// Transaction type name for a code.
    pub fn transaction_type_name(&self, code: i32) -> Result<&str, BinaryCodecError> {
        lookup_name(&self.transaction_types, "TransactionType", code)
    }

    /// Ledger entry type code for a name.
    pub fn ledger_entry_type_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        lookup_code(&self.ledger_entry_types, "LedgerEntryType", name)
    }

    /// Ledger entry type name for a code.
    pub fn ledger_entry_type_name(&self, code: i32) -> Result<&str, BinaryCodecError> {
        lookup_name(&self.ledger_entry_types, "LedgerEntryType", code)
    }

    /// Transaction result code for a name.
    pub fn transaction_result_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        lookup_code(&self.transaction_results, "TransactionResult", name)
    }

    /// Transaction result name for a code.
    pub fn transaction_result_name(&self, code: i32) -> Result<&str, BinaryCodecError> {
        lookup_name(&self.transaction_results, "TransactionResult", code)
    }

    /// Permission value code for a name.
    pub fn permission_value_code(&self, name: &str) -> Result<i32, BinaryCodecError> {
        lookup_code(&self.permission_values, "PermissionValue", name)
    }

    /// Permission value name for a code.
    pub fn permission_value_name(&self, code: i32) -> Result<&str, BinaryCodecError> {
        lookup_name(&self.permission_values, "PermissionValue", code)
    }

    /// Name/code table backing an associated-enum field, if `field_name` is one.
    pub fn associated_table(&self, field_name: &str) -> Option<(&'static str, &CodeTable)> {
        match field_name {
            "TransactionType" => Some(("TransactionType", &self.transaction_types)),
            "TransactionResult" => Some(("TransactionResult", &self.transaction_results)),
            "LedgerEntryType" => Some(("LedgerEntryType", &self.ledger_entry_types)),
            "PermissionValue" => Some(("PermissionValue", &self.permission_values)),
            _ => None,
        }
    }
}

fn header_for(type_code: i32, nth: i32) -> Option<FieldHeader> {
    let type_code = u8::try_from(type_code).ok().filter(|c| *c != 0)?;
    let field_code = u8::try_from(nth).ok().filter(|c| *c != 0)?;
    Some(FieldHeader::new(type_code, field_code))
}

fn lookup_code(table: &CodeTable, kind: &'static str, name: &str) -> Result<i32, BinaryCodecError> {
    table
        .code(name)
        .ok_or_else(|| BinaryCodecError::format(kind, format!("unknown name {name}")))
}

fn lookup_name<'a>(
    table: &'a CodeTable,
    kind: &'static str,
    code: i32,
) -> Result<&'a str, BinaryCodecError> {
    table
        .name(code)
        .ok_or_else(|| BinaryCodecError::format(kind, format!("unknown code {code}")))
}

/// Returns the current process-wide definitions.
pub fn default_definitions() -> Arc<Definitions> {
    DEFAULT_DEFINITIONS.load_full()
}

/// Replaces the process-wide definitions.
///
/// Calls already holding the previous snapshot keep using it.
pub fn set_default_definitions(definitions: Arc<Definitions>) {
    tracing::debug!(fields = definitions.field_count(), "swapping default definitions");
    DEFAULT_DEFINITIONS.store(definitions);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bundled_definitions_resolve_common_fields() {
        let defs = Definitions::bundled();
        let account = defs.field("Account").unwrap();
        assert_eq!(account.type_code, 8);
        assert_eq!(account.nth, 1);
        assert!(account.is_variable_length);
        assert_eq!(account.wire_type, Some(WireType::AccountId));
        assert_eq!(defs.field_header_from_name("Flags").unwrap(), FieldHeader::new(2, 2));
        assert_eq!(
            defs.field_name_from_header(FieldHeader::new(1, 2)).unwrap(),
            "TransactionType"
        );
    }

    #[test]
    fn non_serialized_fields_have_no_header() {
        let defs = Definitions::bundled();
        let hash = defs.field("hash").unwrap();
        assert!(!hash.is_serialized);
        assert!(hash.header.is_none());
        assert!(matches!(
            defs.field_header_from_name("hash"),
            Err(BinaryCodecError::UnknownField(_))
        ));
    }

    #[test]
    fn signature_fields_are_not_signing_fields() {
        let defs = Definitions::bundled();
        assert!(!defs.field("TxnSignature").unwrap().is_signing_field);
        assert!(!defs.field("Signers").unwrap().is_signing_field);
        assert!(defs.field("SigningPubKey").unwrap().is_signing_field);
    }

    #[test]
    fn enumeration_tables_are_bidirectional() {
        let defs = Definitions::bundled();
        assert_eq!(defs.transaction_type_code("Payment").unwrap(), 0);
        assert_eq!(defs.transaction_type_name(102).unwrap(), "UNLModify");
        assert_eq!(defs.ledger_entry_type_code("AccountRoot").unwrap(), 97);
        assert_eq!(defs.transaction_result_name(0).unwrap(), "tesSUCCESS");
        assert!(defs.transaction_type_code("NotATransaction").is_err());
    }

    #[test]
    fn permission_values_shift_transaction_types_and_add_granular() {
        let defs = Definitions::bundled();
        assert_eq!(defs.permission_value_code("Payment").unwrap(), 1);
        assert_eq!(defs.permission_value_code("TrustSet").unwrap(), 21);
        assert_eq!(defs.permission_value_name(65537).unwrap(), "TrustlineAuthorize");
        assert_eq!(
            defs.permission_value_code("MPTokenIssuanceUnlock").unwrap(),
            65548
        );
        assert!(defs.permission_value_code("Invalid").is_err());
    }

    fn minimal() -> Value {
        json!({
            "TYPES": {"UInt32": 2, "AccountID": 8},
            "FIELDS": [
                ["Flags", {"nth": 2, "isVLEncoded": false, "isSerialized": true, "isSigningField": true, "type": "UInt32"}]
            ],
            "LEDGER_ENTRY_TYPES": {},
            "TRANSACTION_RESULTS": {},
            "TRANSACTION_TYPES": {"Payment": 0}
        })
    }

    #[test]
    fn minimal_document_loads() {
        let defs = Definitions::from_value(minimal()).unwrap();
        assert_eq!(defs.field_count(), 1);
        assert_eq!(defs.permission_value_code("Payment").unwrap(), 1);
    }

    #[test]
    fn missing_table_is_malformed() {
        let mut doc = minimal();
        doc.as_object_mut().unwrap().remove("TRANSACTION_RESULTS");
        assert!(matches!(
            Definitions::from_value(doc),
            Err(BinaryCodecError::MalformedDefinitions(_))
        ));
    }

    #[test]
    fn undeclared_field_type_is_malformed() {
        let mut doc = minimal();
        doc["FIELDS"][0][1]["type"] = json!("Hash256");
        assert!(matches!(
            Definitions::from_value(doc),
            Err(BinaryCodecError::MalformedDefinitions(_))
        ));
    }

    #[test]
    fn duplicate_headers_are_malformed() {
        let mut doc = minimal();
        doc["FIELDS"].as_array_mut().unwrap().push(json!(
            ["AlsoFlags", {"nth": 2, "isVLEncoded": false, "isSerialized": true, "isSigningField": true, "type": "UInt32"}]
        ));
        assert!(matches!(
            Definitions::from_value(doc),
            Err(BinaryCodecError::MalformedDefinitions(_))
        ));
    }

    #[test]
    fn definitions_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("definitions.json");
        std::fs::write(&path, minimal().to_string()).unwrap();
        let defs = Definitions::from_path(&path).unwrap();
        assert_eq!(defs.field_type_name("Flags").unwrap(), "UInt32");
    }
}
