//! Address codec for the XRP Ledger.
//!
//! Encodes versioned binary payloads (account identifiers, seeds, public
//! keys) as checksummed base58 text using the ledger alphabet, and packs
//! classic addresses together with an optional tag into X-addresses.
//!
#![deny(missing_docs)]

/// Versioned base58check encoding and the typed token helpers built on it.
pub mod codec;
/// Error type shared by all codec operations.
pub mod errors;
/// X-address packing and unpacking.
pub mod xaddress;

pub use codec::{
    decode, decode_account_id, decode_account_public, decode_checked, decode_node_public,
    decode_seed, encode, encode_account_id, encode_account_public, encode_checked,
    encode_node_public, encode_seed, is_valid_classic_address, Decoded, SeedAlgorithm,
    ACCOUNT_ID_LENGTH, ACCOUNT_ID_VERSION,
};
pub use errors::AddressCodecError;
pub use xaddress::{
    classic_address_to_x_address, decode_x_address, encode_x_address, is_valid_x_address,
    x_address_to_classic_address, ClassicAddress, XAddress,
};
