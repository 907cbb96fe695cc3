use thiserror::Error;
use xrpl_address_codec::AddressCodecError;

/// Errors produced while loading definitions or encoding/decoding ledger data.
#[derive(Error, Debug)]
pub enum BinaryCodecError {
    /// A JSON value has the wrong shape for the wire type it feeds.
    #[error("{type_name} expects {expected}")]
    InvalidValueType {
        /// Wire type being constructed.
        type_name: &'static str,
        /// Description of the accepted JSON shapes.
        expected: &'static str,
    },
    /// A JSON value has the right shape but malformed content.
    #[error("invalid {type_name} value: {reason}")]
    InvalidValueFormat {
        /// Wire type being constructed.
        type_name: &'static str,
        /// What is wrong with the content.
        reason: String,
    },
    /// A fixed-width type received the wrong number of bytes.
    #[error("{type_name} requires {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Wire type being constructed.
        type_name: &'static str,
        /// Required length in bytes.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// A field name or field header is not in the definitions.
    #[error("unknown field: {0}")]
    UnknownField(String),
    /// The definitions bind a field to a wire type with no implementation.
    #[error("field {field} uses unsupported wire type {type_name}")]
    UnsupportedType {
        /// Field name.
        field: String,
        /// Type name from the definitions.
        type_name: String,
    },
    /// The definitions document is missing tables or is inconsistent.
    #[error("malformed definitions: {0}")]
    MalformedDefinitions(String),
    /// An amount is outside the representable range.
    #[error("amount overflow: {0}")]
    AmountOverflow(String),
    /// An amount carries more precision than the wire form can hold.
    #[error("amount precision: {0}")]
    AmountPrecision(String),
    /// A base58check token failed its checksum.
    #[error("checksum mismatch in base58 address")]
    ChecksumMismatch,
    /// Any other address codec failure.
    #[error("address codec: {0}")]
    Address(AddressCodecError),
    /// An X-address tag disagrees with an explicit tag field.
    #[error("{field} carries tag {x_address_tag} but {tag_field} is {explicit_tag}")]
    TagConflict {
        /// Field holding the X-address.
        field: String,
        /// Explicit tag field it is paired with.
        tag_field: &'static str,
        /// Tag packed into the X-address.
        x_address_tag: u32,
        /// Explicit tag value as supplied.
        explicit_tag: String,
    },
    /// A tagged X-address appeared where no tag field exists.
    #[error("{field} cannot hold a tagged X-address")]
    TagNotAllowed {
        /// Offending field.
        field: String,
    },
    /// The parser ran out of input.
    #[error("buffer underrun at offset {offset}: need {needed} bytes, {remaining} remaining")]
    BufferUnderrun {
        /// Read position when the underrun happened.
        offset: usize,
        /// Bytes requested.
        needed: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },
    /// Objects and arrays are nested deeper than the decoder accepts.
    #[error("{type_name} nested deeper than {limit} levels")]
    NestingTooDeep {
        /// Container being entered.
        type_name: &'static str,
        /// Maximum nesting below the top-level object.
        limit: usize,
    },
    /// A variable-length prefix is reserved or out of range.
    #[error("invalid length prefix: {0}")]
    InvalidLengthPrefix(String),
    /// Multisigning requires `SigningPubKey` to be present and empty.
    #[error("SigningPubKey must be present and empty when multisigning")]
    SigningPubKeyNotEmpty,
    /// Hex input to the decoder is malformed.
    #[error("invalid hex input: {0}")]
    InvalidHex(#[from] hex::FromHexError),
    /// Reading a definitions file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<AddressCodecError> for BinaryCodecError {
    fn from(err: AddressCodecError) -> Self {
        match err {
            AddressCodecError::ChecksumMismatch => BinaryCodecError::ChecksumMismatch,
            other => BinaryCodecError::Address(other),
        }
    }
}

impl BinaryCodecError {
    pub(crate) fn format(type_name: &'static str, reason: impl Into<String>) -> Self {
        BinaryCodecError::InvalidValueFormat {
            type_name,
            reason: reason.into(),
        }
    }
}
