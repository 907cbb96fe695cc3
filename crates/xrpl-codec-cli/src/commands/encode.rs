//! Encode and tx-id command implementations.

use crate::input::read_json;
use crate::output::print_hex;
use xrpl_binary_codec::BinaryCodec;

pub fn run(codec: &BinaryCodec, input: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json(input.as_deref())?;
    let hex = codec
        .encode(&value)
        .map_err(|e| format!("Encoding failed: {}", e))?;
    print_hex(&hex);
    Ok(())
}

pub fn run_tx_id(
    codec: &BinaryCodec,
    input: Option<String>,
    expect: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let value = read_json(input.as_deref())?;
    let id = codec
        .compute_transaction_id(&value)
        .map_err(|e| format!("Hashing failed: {}", e))?;
    print_hex(&id);

    if let Some(claimed) = expect {
        if !id.eq_ignore_ascii_case(&claimed) {
            return Err(format!(
                "Transaction id mismatch: expected {}, computed {}",
                claimed, id
            )
            .into());
        }
    }
    Ok(())
}
