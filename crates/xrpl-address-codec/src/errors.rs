use thiserror::Error;

/// Errors produced while encoding or decoding base58check tokens.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressCodecError {
    /// Text contains characters outside the ledger base58 alphabet.
    #[error("invalid base58 text: {0}")]
    InvalidBase58(String),
    /// The trailing four checksum bytes do not match the payload.
    #[error("checksum mismatch")]
    ChecksumMismatch,
    /// Payload length differs from what the token kind requires.
    #[error("payload length {actual} does not match expected {expected}")]
    LengthMismatch {
        /// Required payload length in bytes.
        expected: usize,
        /// Length actually supplied or decoded.
        actual: usize,
    },
    /// Decoded version prefix is not one of the accepted prefixes.
    #[error("unexpected version prefix {found:02X?}")]
    VersionMismatch {
        /// Leading bytes found in the decoded token.
        found: Vec<u8>,
    },
    /// Token is well-formed base58check but not a valid X-address.
    #[error("invalid X-address: {0}")]
    InvalidXAddress(String),
}
