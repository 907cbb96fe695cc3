//! Canonical binary codec for XRP Ledger transactions and ledger objects.
//!
//! Converts between the JSON form of ledger data and the byte layout that
//! is hashed and signed. Field metadata comes from a definitions registry;
//! the bundled registry is used unless another one is installed with
//! [`definitions::set_default_definitions`] or passed to a [`BinaryCodec`].
//!
#![deny(missing_docs)]

/// Top-level encode/decode and signing-data entry points.
pub mod codec;
/// Definitions registry: fields, types and enumeration tables.
pub mod definitions;
/// Error type shared by all codec operations.
pub mod errors;
/// Field header encoding.
pub mod field;
/// Transaction ids and SHA-512Half.
pub mod hashes;
/// Cursor over serialized bytes.
pub mod parser;
/// Byte sink and length prefixes.
pub mod serializer;
/// Wire types.
pub mod types;
/// X-address expansion into classic addresses and tag fields.
pub mod xaddress;

pub use codec::{
    decode, encode, encode_for_multisigning, encode_for_signing, encode_for_signing_claim,
    BinaryCodec, HASH_PREFIX_PAYMENT_CHANNEL_CLAIM, HASH_PREFIX_TRANSACTION_MULTISIG,
    HASH_PREFIX_TRANSACTION_SIG,
};
pub use definitions::{
    default_definitions, set_default_definitions, CodeTable, Definitions, FieldInstance,
    BUNDLED_DEFINITIONS_JSON,
};
pub use errors::BinaryCodecError;
pub use field::{decode_field_name, encode_field_name, FieldHeader};
pub use hashes::{
    compute_transaction_id, sha512_half, verify_transaction_id, HASH_PREFIX_TRANSACTION_ID,
};
pub use parser::{BinaryParser, MAX_NESTING_DEPTH};
pub use serializer::{encode_length_prefix, BinarySerializer};
pub use types::{SerializedType, SerializedValue, WireType};
