//! X-address packing: a classic account plus an optional 32-bit tag.
//!
//! Layout before base58check: `prefix(2) || account_id(20) || flag(1) ||
//! tag_le(4) || reserved(4)`. The flag is 1 when a tag is present; the
//! reserved bytes hold the upper half of a future 64-bit tag and must be zero.

use crate::codec::{decode_account_id, decode_checked, encode_account_id, encode_checked};
use crate::errors::AddressCodecError;

const MAIN_PREFIX: [u8; 2] = [0x05, 0x44];
const TEST_PREFIX: [u8; 2] = [0x04, 0x93];
const X_ADDRESS_BODY_LENGTH: usize = 31;

/// Account, tag and network recovered from an X-address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XAddress {
    /// 20-byte account identifier.
    pub account_id: [u8; 20],
    /// Destination or source tag, if one was packed.
    pub tag: Option<u32>,
    /// `true` for the test-network prefix.
    pub test: bool,
}

/// Classic address form of an X-address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicAddress {
    /// The `r...` address.
    pub classic_address: String,
    /// Tag carried by the X-address.
    pub tag: Option<u32>,
    /// `true` for the test-network prefix.
    pub test: bool,
}

/// Packs an account identifier and optional tag into an X-address.
pub fn encode_x_address(account_id: &[u8; 20], tag: Option<u32>, test: bool) -> String {
    let mut body = Vec::with_capacity(X_ADDRESS_BODY_LENGTH);
    body.extend_from_slice(if test { &TEST_PREFIX } else { &MAIN_PREFIX });
    body.extend_from_slice(account_id);
    body.push(u8::from(tag.is_some()));
    body.extend_from_slice(&tag.unwrap_or(0).to_le_bytes());
    body.extend_from_slice(&[0u8; 4]);
    encode_checked(&body)
}

/// Unpacks an X-address.
pub fn decode_x_address(x_address: &str) -> Result<XAddress, AddressCodecError> {
    let body = decode_checked(x_address)?;
    if body.len() != X_ADDRESS_BODY_LENGTH {
        return Err(AddressCodecError::InvalidXAddress(format!(
            "body is {} bytes, expected {}",
            body.len(),
            X_ADDRESS_BODY_LENGTH
        )));
    }
    let test = match [body[0], body[1]] {
        MAIN_PREFIX => false,
        TEST_PREFIX => true,
        other => {
            return Err(AddressCodecError::VersionMismatch {
                found: other.to_vec(),
            })
        }
    };
    let mut account_id = [0u8; 20];
    account_id.copy_from_slice(&body[2..22]);

    let flag = body[22];
    let tag = u32::from_le_bytes([body[23], body[24], body[25], body[26]]);
    if body[27..31] != [0u8; 4] {
        return Err(AddressCodecError::InvalidXAddress(
            "64-bit tags are not supported".to_string(),
        ));
    }
    let tag = match flag {
        0 if tag == 0 => None,
        0 => {
            return Err(AddressCodecError::InvalidXAddress(
                "tag bytes set without tag flag".to_string(),
            ))
        }
        1 => Some(tag),
        other => {
            return Err(AddressCodecError::InvalidXAddress(format!(
                "unsupported flag byte 0x{:02x}",
                other
            )))
        }
    };

    Ok(XAddress {
        account_id,
        tag,
        test,
    })
}

/// Converts a classic address plus optional tag into an X-address.
pub fn classic_address_to_x_address(
    classic_address: &str,
    tag: Option<u32>,
    test: bool,
) -> Result<String, AddressCodecError> {
    let account_id = decode_account_id(classic_address)?;
    Ok(encode_x_address(&account_id, tag, test))
}

/// Converts an X-address back into its classic address and tag.
pub fn x_address_to_classic_address(x_address: &str) -> Result<ClassicAddress, AddressCodecError> {
    let decoded = decode_x_address(x_address)?;
    Ok(ClassicAddress {
        classic_address: encode_account_id(&decoded.account_id)?,
        tag: decoded.tag,
        test: decoded.test,
    })
}

/// Returns `true` when `x_address` decodes as an X-address.
pub fn is_valid_x_address(x_address: &str) -> bool {
    decode_x_address(x_address).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagless_and_tagged_round_trip() {
        let id = [0xABu8; 20];
        for tag in [None, Some(0), Some(1), Some(u32::MAX)] {
            for test in [false, true] {
                let encoded = encode_x_address(&id, tag, test);
                let decoded = decode_x_address(&encoded).unwrap();
                assert_eq!(decoded, XAddress { account_id: id, tag, test });
            }
        }
    }

    #[test]
    fn network_prefix_drives_leading_character() {
        let id = [0x01u8; 20];
        assert!(encode_x_address(&id, None, false).starts_with('X'));
        assert!(encode_x_address(&id, None, true).starts_with('T'));
    }

    #[test]
    fn classic_address_is_not_an_x_address() {
        let classic = encode_account_id(&[3u8; 20]).unwrap();
        assert!(!is_valid_x_address(&classic));
    }

    #[test]
    fn reserved_tag_bytes_must_be_zero() {
        let mut body = Vec::new();
        body.extend_from_slice(&MAIN_PREFIX);
        body.extend_from_slice(&[9u8; 20]);
        body.push(1);
        body.extend_from_slice(&5u32.to_le_bytes());
        body.extend_from_slice(&[0, 0, 0, 1]);
        let token = encode_checked(&body);
        assert!(matches!(
            decode_x_address(&token),
            Err(AddressCodecError::InvalidXAddress(_))
        ));
    }

    #[test]
    fn tag_without_flag_is_rejected() {
        let mut body = Vec::new();
        body.extend_from_slice(&TEST_PREFIX);
        body.extend_from_slice(&[9u8; 20]);
        body.push(0);
        body.extend_from_slice(&5u32.to_le_bytes());
        body.extend_from_slice(&[0u8; 4]);
        assert!(decode_x_address(&encode_checked(&body)).is_err());
    }
}
