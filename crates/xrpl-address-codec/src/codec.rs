//! Versioned base58check encoding with the ledger alphabet.
//!
//! Every token is `base58(version || payload || checksum)` where the checksum
//! is the first four bytes of `sha256(sha256(version || payload))`.

use crate::errors::AddressCodecError;
use bs58::Alphabet;
use sha2::{Digest, Sha256};

/// Version prefix for classic account addresses (`r...`).
pub const ACCOUNT_ID_VERSION: &[u8] = &[0x00];
/// Version prefix for account public keys (`a...`).
pub const ACCOUNT_PUBLIC_KEY_VERSION: &[u8] = &[0x23];
/// Version prefix for node (validator) public keys (`n...`).
pub const NODE_PUBLIC_KEY_VERSION: &[u8] = &[0x1C];
/// Version prefix for secp256k1 family seeds (`s...`).
pub const SECP256K1_SEED_VERSION: &[u8] = &[0x21];
/// Version prefix for ed25519 seeds (`sEd...`).
pub const ED25519_SEED_VERSION: &[u8] = &[0x01, 0xE1, 0x4B];

/// Account identifiers are 160-bit hashes.
pub const ACCOUNT_ID_LENGTH: usize = 20;
/// Compressed public keys are 33 bytes.
pub const PUBLIC_KEY_LENGTH: usize = 33;
/// Seed entropy is 128 bits.
pub const SEED_LENGTH: usize = 16;

const CHECKSUM_LENGTH: usize = 4;

/// Key algorithm a seed is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedAlgorithm {
    /// secp256k1 family seed.
    Secp256k1,
    /// ed25519 seed.
    Ed25519,
}

/// Version and payload recovered from a token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Version prefix that matched.
    pub version: Vec<u8>,
    /// Payload bytes without version or checksum.
    pub payload: Vec<u8>,
}

fn checksum(bytes: &[u8]) -> [u8; CHECKSUM_LENGTH] {
    let once = Sha256::digest(bytes);
    let twice = Sha256::digest(once);
    let mut out = [0u8; CHECKSUM_LENGTH];
    out.copy_from_slice(&twice[..CHECKSUM_LENGTH]);
    out
}

/// Encodes raw bytes with an appended checksum, no version handling.
pub fn encode_checked(bytes: &[u8]) -> String {
    let mut buf = Vec::with_capacity(bytes.len() + CHECKSUM_LENGTH);
    buf.extend_from_slice(bytes);
    buf.extend_from_slice(&checksum(bytes));
    bs58::encode(buf).with_alphabet(Alphabet::RIPPLE).into_string()
}

/// Decodes a checksummed token and returns the bytes preceding the checksum.
pub fn decode_checked(encoded: &str) -> Result<Vec<u8>, AddressCodecError> {
    let mut bytes = bs58::decode(encoded)
        .with_alphabet(Alphabet::RIPPLE)
        .into_vec()
        .map_err(|e| AddressCodecError::InvalidBase58(e.to_string()))?;
    if bytes.len() < CHECKSUM_LENGTH + 1 {
        return Err(AddressCodecError::LengthMismatch {
            expected: CHECKSUM_LENGTH + 1,
            actual: bytes.len(),
        });
    }
    let split = bytes.len() - CHECKSUM_LENGTH;
    let claimed = bytes.split_off(split);
    if checksum(&bytes)[..] != claimed[..] {
        return Err(AddressCodecError::ChecksumMismatch);
    }
    Ok(bytes)
}

/// Encodes `payload` under `version`, refusing payloads of the wrong size.
pub fn encode(
    payload: &[u8],
    version: &[u8],
    expected_length: usize,
) -> Result<String, AddressCodecError> {
    if payload.len() != expected_length {
        return Err(AddressCodecError::LengthMismatch {
            expected: expected_length,
            actual: payload.len(),
        });
    }
    let mut buf = Vec::with_capacity(version.len() + payload.len());
    buf.extend_from_slice(version);
    buf.extend_from_slice(payload);
    Ok(encode_checked(&buf))
}

/// Decodes a token whose version must be one of `versions`.
///
/// Versions are tried in order; list longer prefixes first when one could
/// shadow another.
pub fn decode(
    encoded: &str,
    versions: &[&[u8]],
    expected_length: usize,
) -> Result<Decoded, AddressCodecError> {
    let body = decode_checked(encoded)?;
    let Some(version) = versions.iter().find(|v| body.starts_with(v)) else {
        let widest = versions.iter().map(|v| v.len()).max().unwrap_or(1);
        return Err(AddressCodecError::VersionMismatch {
            found: body.iter().take(widest).copied().collect(),
        });
    };
    let payload = &body[version.len()..];
    if payload.len() != expected_length {
        return Err(AddressCodecError::LengthMismatch {
            expected: expected_length,
            actual: payload.len(),
        });
    }
    Ok(Decoded {
        version: version.to_vec(),
        payload: payload.to_vec(),
    })
}

/// Encodes a 20-byte account identifier as a classic address.
pub fn encode_account_id(account_id: &[u8]) -> Result<String, AddressCodecError> {
    encode(account_id, ACCOUNT_ID_VERSION, ACCOUNT_ID_LENGTH)
}

/// Decodes a classic address into its 20-byte account identifier.
pub fn decode_account_id(address: &str) -> Result<[u8; ACCOUNT_ID_LENGTH], AddressCodecError> {
    let decoded = decode(address, &[ACCOUNT_ID_VERSION], ACCOUNT_ID_LENGTH)?;
    let mut out = [0u8; ACCOUNT_ID_LENGTH];
    out.copy_from_slice(&decoded.payload);
    Ok(out)
}

/// Returns `true` when `address` decodes as a classic address.
pub fn is_valid_classic_address(address: &str) -> bool {
    decode_account_id(address).is_ok()
}

/// Encodes 16 bytes of seed entropy for the given algorithm.
pub fn encode_seed(entropy: &[u8], algorithm: SeedAlgorithm) -> Result<String, AddressCodecError> {
    let version = match algorithm {
        SeedAlgorithm::Secp256k1 => SECP256K1_SEED_VERSION,
        SeedAlgorithm::Ed25519 => ED25519_SEED_VERSION,
    };
    encode(entropy, version, SEED_LENGTH)
}

/// Decodes a seed into its entropy and algorithm.
pub fn decode_seed(seed: &str) -> Result<([u8; SEED_LENGTH], SeedAlgorithm), AddressCodecError> {
    let decoded = decode(
        seed,
        &[ED25519_SEED_VERSION, SECP256K1_SEED_VERSION],
        SEED_LENGTH,
    )?;
    let algorithm = if decoded.version == ED25519_SEED_VERSION {
        SeedAlgorithm::Ed25519
    } else {
        SeedAlgorithm::Secp256k1
    };
    let mut entropy = [0u8; SEED_LENGTH];
    entropy.copy_from_slice(&decoded.payload);
    Ok((entropy, algorithm))
}

/// Encodes a 33-byte node public key.
pub fn encode_node_public(key: &[u8]) -> Result<String, AddressCodecError> {
    encode(key, NODE_PUBLIC_KEY_VERSION, PUBLIC_KEY_LENGTH)
}

/// Decodes a node public key.
pub fn decode_node_public(encoded: &str) -> Result<Vec<u8>, AddressCodecError> {
    Ok(decode(encoded, &[NODE_PUBLIC_KEY_VERSION], PUBLIC_KEY_LENGTH)?.payload)
}

/// Encodes a 33-byte account public key.
pub fn encode_account_public(key: &[u8]) -> Result<String, AddressCodecError> {
    encode(key, ACCOUNT_PUBLIC_KEY_VERSION, PUBLIC_KEY_LENGTH)
}

/// Decodes an account public key.
pub fn decode_account_public(encoded: &str) -> Result<Vec<u8>, AddressCodecError> {
    Ok(decode(encoded, &[ACCOUNT_PUBLIC_KEY_VERSION], PUBLIC_KEY_LENGTH)?.payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_id_round_trip() {
        let id = [0x11u8; 20];
        let address = encode_account_id(&id).unwrap();
        assert!(address.starts_with('r'));
        assert_eq!(decode_account_id(&address).unwrap(), id);
    }

    #[test]
    fn encode_rejects_wrong_length() {
        let err = encode(&[0u8; 19], ACCOUNT_ID_VERSION, ACCOUNT_ID_LENGTH).unwrap_err();
        assert_eq!(
            err,
            AddressCodecError::LengthMismatch {
                expected: 20,
                actual: 19
            }
        );
    }

    #[test]
    fn corrupted_checksum_is_detected() {
        let address = encode_account_id(&[0x42u8; 20]).unwrap();
        let mut chars: Vec<char> = address.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'r' { 'p' } else { 'r' };
        let corrupted: String = chars.into_iter().collect();
        assert_eq!(
            decode_account_id(&corrupted).unwrap_err(),
            AddressCodecError::ChecksumMismatch
        );
    }

    #[test]
    fn bitcoin_only_characters_are_rejected() {
        // '0' and 'l' are not part of the alphabet.
        assert!(matches!(
            decode_checked("r0l"),
            Err(AddressCodecError::InvalidBase58(_))
        ));
    }

    #[test]
    fn seed_version_selects_algorithm() {
        let entropy = [7u8; 16];
        let ed = encode_seed(&entropy, SeedAlgorithm::Ed25519).unwrap();
        let secp = encode_seed(&entropy, SeedAlgorithm::Secp256k1).unwrap();
        assert!(ed.starts_with("sEd"));
        assert_eq!(decode_seed(&ed).unwrap(), (entropy, SeedAlgorithm::Ed25519));
        assert_eq!(
            decode_seed(&secp).unwrap(),
            (entropy, SeedAlgorithm::Secp256k1)
        );
    }

    #[test]
    fn account_address_is_not_a_node_key() {
        let address = encode_account_id(&[1u8; 20]).unwrap();
        assert!(decode_node_public(&address).is_err());
    }
}
