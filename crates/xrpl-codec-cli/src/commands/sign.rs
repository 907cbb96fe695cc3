//! Signing-data command implementations.

use crate::input::read_json;
use crate::output::print_hex;
use xrpl_address_codec::{is_valid_classic_address, is_valid_x_address};
use xrpl_binary_codec::BinaryCodec;

pub fn run_single(
    codec: &BinaryCodec,
    input: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json(input.as_deref())?;
    print_hex(&codec.encode_for_signing(&value)?);
    Ok(())
}

pub fn run_claim(
    codec: &BinaryCodec,
    input: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json(input.as_deref())?;
    print_hex(&codec.encode_for_signing_claim(&value)?);
    Ok(())
}

pub fn run_multi(
    codec: &BinaryCodec,
    input: Option<String>,
    signer: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if !is_valid_classic_address(signer) && !is_valid_x_address(signer) {
        return Err(format!("Invalid signer address: {}", signer).into());
    }
    let value = read_json(input.as_deref())?;
    print_hex(&codec.encode_for_multisigning(&value, signer)?);
    Ok(())
}
