//! Transaction identifiers with prefixed hashing.
//!
//! A transaction id is `sha512(TXN\0 || encode(tx))[..32]`, rendered as
//! 64 uppercase hex digits.

use crate::codec::BinaryCodec;
use crate::errors::BinaryCodecError;
use serde_json::Value;
use sha2::{Digest, Sha512};

/// Prefix of the transaction id preimage: `TXN\0`.
pub const HASH_PREFIX_TRANSACTION_ID: [u8; 4] = [0x54, 0x58, 0x4E, 0x00];

/// First 32 bytes of the SHA-512 digest of `data`.
pub fn sha512_half(data: &[u8]) -> [u8; 32] {
    let digest = Sha512::digest(data);
    let mut half = [0u8; 32];
    half.copy_from_slice(&digest[..32]);
    half
}

impl BinaryCodec {
    /// Computes the id of a signed transaction.
    ///
    /// Every serialized field takes part, signatures included.
    pub fn compute_transaction_id(&self, json: &Value) -> Result<String, BinaryCodecError> {
        let mut preimage = HASH_PREFIX_TRANSACTION_ID.to_vec();
        preimage.extend_from_slice(&self.encode_to_bytes(json)?);
        Ok(hex::encode_upper(sha512_half(&preimage)))
    }

    /// Checks a claimed id against the transaction; hex case is ignored.
    pub fn verify_transaction_id(
        &self,
        json: &Value,
        claimed: &str,
    ) -> Result<bool, BinaryCodecError> {
        Ok(self.compute_transaction_id(json)?.eq_ignore_ascii_case(claimed))
    }
}

/// [`BinaryCodec::compute_transaction_id`] with the default registry.
pub fn compute_transaction_id(json: &Value) -> Result<String, BinaryCodecError> {
    BinaryCodec::default().compute_transaction_id(json)
}

/// [`BinaryCodec::verify_transaction_id`] with the default registry.
pub fn verify_transaction_id(json: &Value, claimed: &str) -> Result<bool, BinaryCodecError> {
    BinaryCodec::default().verify_transaction_id(json, claimed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definitions::Definitions;
    use serde_json::json;
    use std::sync::Arc;

    const PAYMENT_ID: &str = "D8044E37C4DD8CBB3594D7EB94D1DB510C7C02B03B7D3FAE9EAAA886D437AA75";

    fn payment() -> Value {
        json!({
            "TransactionType": "Payment",
            "Flags": 2147483648u32,
            "Sequence": 1,
            "Account": "r9LqNeG6qHxjeUocjvVki2XR35weJ9mZgQ",
            "Destination": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh"
        })
    }

    #[test]
    fn sha512_half_matches_known_digest() {
        assert_eq!(
            hex::encode_upper(sha512_half(b"abc")),
            "DDAF35A193617ABACC417349AE20413112E6FA4E89A97EA20A9EEEE64B55D39A"
        );
    }

    #[test]
    fn transaction_id_is_stable() {
        let codec = BinaryCodec::new(Arc::new(Definitions::bundled()));
        assert_eq!(codec.compute_transaction_id(&payment()).unwrap(), PAYMENT_ID);
        assert!(codec
            .verify_transaction_id(&payment(), &PAYMENT_ID.to_lowercase())
            .unwrap());
    }

    #[test]
    fn changed_transaction_fails_verification() {
        let codec = BinaryCodec::new(Arc::new(Definitions::bundled()));
        let mut tx = payment();
        tx["Sequence"] = json!(2);
        assert!(!codec.verify_transaction_id(&tx, PAYMENT_ID).unwrap());
    }
}
