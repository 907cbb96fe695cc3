//! Top-level encode and decode entry points.
//!
//! A [`BinaryCodec`] binds the operations to one definitions registry. The
//! free functions at the bottom of this module use the process-wide default
//! registry (see [`crate::definitions::default_definitions`]).

use crate::definitions::{default_definitions, Definitions};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use crate::types::{AccountId, Hash256, SerializedType, StObject, UInt64};
use serde_json::Value;
use std::sync::Arc;

/// Prefix of single-signature signing data: `STX\0`.
pub const HASH_PREFIX_TRANSACTION_SIG: [u8; 4] = [0x53, 0x54, 0x58, 0x00];
/// Prefix of payment-channel claim signing data: `CLM\0`.
pub const HASH_PREFIX_PAYMENT_CHANNEL_CLAIM: [u8; 4] = [0x43, 0x4C, 0x4D, 0x00];
/// Prefix of multi-signature signing data: `SMT\0`.
pub const HASH_PREFIX_TRANSACTION_MULTISIG: [u8; 4] = [0x53, 0x4D, 0x54, 0x00];

/// Encoder/decoder bound to a definitions registry.
#[derive(Debug, Clone)]
pub struct BinaryCodec {
    definitions: Arc<Definitions>,
}

impl Default for BinaryCodec {
    fn default() -> Self {
        Self::new(default_definitions())
    }
}

impl BinaryCodec {
    /// Creates a codec over `definitions`.
    pub fn new(definitions: Arc<Definitions>) -> Self {
        Self { definitions }
    }

    /// Registry in use.
    pub fn definitions(&self) -> &Definitions {
        &self.definitions
    }

    /// Serializes a JSON object to its canonical bytes.
    pub fn encode_to_bytes(&self, json: &Value) -> Result<Vec<u8>, BinaryCodecError> {
        Ok(StObject::from_value(json, &self.definitions, false)?
            .as_bytes()
            .to_vec())
    }

    /// Serializes a JSON object to uppercase hex.
    pub fn encode(&self, json: &Value) -> Result<String, BinaryCodecError> {
        Ok(hex::encode_upper(self.encode_to_bytes(json)?))
    }

    /// Parses canonical bytes back into JSON.
    ///
    /// Fields appear in wire order and accounts as classic addresses. Bytes
    /// left over after the object are an error.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Value, BinaryCodecError> {
        let mut parser = BinaryParser::new(bytes, &self.definitions);
        let object = StObject::from_parser(&mut parser)?;
        if !parser.is_end() {
            return Err(BinaryCodecError::format(
                "STObject",
                format!(
                    "{} trailing bytes after offset {}",
                    parser.remaining(),
                    parser.position()
                ),
            ));
        }
        object.to_json(&self.definitions)
    }

    /// Parses hex (either case) back into JSON.
    pub fn decode(&self, hex_text: &str) -> Result<Value, BinaryCodecError> {
        let bytes = hex::decode(hex_text.trim())?;
        tracing::trace!(length = bytes.len(), "decoding object");
        self.decode_bytes(&bytes)
    }

    /// Signing data for a single signature: `STX\0` followed by the signing
    /// fields of the transaction.
    pub fn encode_for_signing(&self, json: &Value) -> Result<String, BinaryCodecError> {
        let mut bytes = HASH_PREFIX_TRANSACTION_SIG.to_vec();
        bytes.extend_from_slice(StObject::from_value(json, &self.definitions, true)?.as_bytes());
        Ok(hex::encode_upper(bytes))
    }

    /// Signing data for a payment-channel claim: `CLM\0`, the 32-byte channel
    /// id, then the amount in drops as a big-endian 64-bit integer.
    ///
    /// `json` must hold `channel` (hex) and `amount` (drops, as a decimal
    /// string or integer).
    pub fn encode_for_signing_claim(&self, json: &Value) -> Result<String, BinaryCodecError> {
        let channel = json.get("channel").ok_or(BinaryCodecError::InvalidValueType {
            type_name: "PaymentChannelClaim",
            expected: "a channel field",
        })?;
        let amount = json.get("amount").ok_or(BinaryCodecError::InvalidValueType {
            type_name: "PaymentChannelClaim",
            expected: "an amount field",
        })?;
        let mut bytes = HASH_PREFIX_PAYMENT_CHANNEL_CLAIM.to_vec();
        bytes.extend_from_slice(Hash256::from_value(channel)?.as_bytes());
        bytes.extend_from_slice(UInt64::from_base10_value(amount)?.as_bytes());
        Ok(hex::encode_upper(bytes))
    }

    /// Signing data for one signer of a multi-signed transaction: `SMT\0`,
    /// the signing fields, then the signer's account id.
    ///
    /// The transaction's `SigningPubKey` must be present and empty.
    pub fn encode_for_multisigning(
        &self,
        json: &Value,
        signer: &str,
    ) -> Result<String, BinaryCodecError> {
        if json.get("SigningPubKey").and_then(Value::as_str) != Some("") {
            return Err(BinaryCodecError::SigningPubKeyNotEmpty);
        }
        let signer = AccountId::from_address(signer)?;
        let mut bytes = HASH_PREFIX_TRANSACTION_MULTISIG.to_vec();
        bytes.extend_from_slice(StObject::from_value(json, &self.definitions, true)?.as_bytes());
        bytes.extend_from_slice(signer.as_bytes());
        Ok(hex::encode_upper(bytes))
    }
}

/// [`BinaryCodec::encode`] with the default registry.
pub fn encode(json: &Value) -> Result<String, BinaryCodecError> {
    BinaryCodec::default().encode(json)
}

/// [`BinaryCodec::decode`] with the default registry.
pub fn decode(hex_text: &str) -> Result<Value, BinaryCodecError> {
    BinaryCodec::default().decode(hex_text)
}

/// [`BinaryCodec::encode_for_signing`] with the default registry.
pub fn encode_for_signing(json: &Value) -> Result<String, BinaryCodecError> {
    BinaryCodec::default().encode_for_signing(json)
}

/// [`BinaryCodec::encode_for_signing_claim`] with the default registry.
pub fn encode_for_signing_claim(json: &Value) -> Result<String, BinaryCodecError> {
    BinaryCodec::default().encode_for_signing_claim(json)
}

/// [`BinaryCodec::encode_for_multisigning`] with the default registry.
pub fn encode_for_multisigning(json: &Value, signer: &str) -> Result<String, BinaryCodecError> {
    BinaryCodec::default().encode_for_multisigning(json, signer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn codec() -> BinaryCodec {
        BinaryCodec::new(Arc::new(Definitions::bundled()))
    }

    #[test]
    fn hex_input_is_case_insensitive() {
        let codec = codec();
        let upper = codec.decode("2200000000").unwrap();
        let lower = codec.decode("2200000000".to_lowercase().as_str()).unwrap();
        assert_eq!(upper, json!({"Flags": 0}));
        assert_eq!(upper, lower);
    }

    #[test]
    fn trailing_bytes_after_top_level_marker_are_rejected() {
        let codec = codec();
        assert!(codec.decode("2200000000E1").is_ok());
        assert!(matches!(
            codec.decode("2200000000E122"),
            Err(BinaryCodecError::InvalidValueFormat { .. })
        ));
    }

    #[test]
    fn odd_hex_is_rejected() {
        assert!(matches!(codec().decode("220"), Err(BinaryCodecError::InvalidHex(_))));
    }

    #[test]
    fn claim_layout() {
        let out = codec()
            .encode_for_signing_claim(&json!({"channel": "AB".repeat(32), "amount": "1000"}))
            .unwrap();
        assert_eq!(out, format!("434C4D00{}00000000000003E8", "AB".repeat(32)));
    }

    #[test]
    fn multisigning_requires_empty_signing_key() {
        let codec = codec();
        let signer = "r9LqNeG6qHxjeUocjvVki2XR35weJ9mZgQ";
        assert!(matches!(
            codec.encode_for_multisigning(&json!({"Flags": 0}), signer),
            Err(BinaryCodecError::SigningPubKeyNotEmpty)
        ));
        assert!(matches!(
            codec.encode_for_multisigning(&json!({"Flags": 0, "SigningPubKey": "02AB"}), signer),
            Err(BinaryCodecError::SigningPubKeyNotEmpty)
        ));
        let out = codec
            .encode_for_multisigning(&json!({"Flags": 0, "SigningPubKey": ""}), signer)
            .unwrap();
        assert_eq!(out, "534D5400220000000073005B812C9D57731E27A2DA8B1830195F88EF32A3B6");
    }
}
