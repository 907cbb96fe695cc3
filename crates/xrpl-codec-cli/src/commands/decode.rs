//! Decode command implementation.

use crate::input::read_text;
use crate::output::format_json;
use xrpl_binary_codec::BinaryCodec;

pub fn run(codec: &BinaryCodec, hex: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let text = match hex {
        Some(hex) => hex,
        None => read_text(None)?,
    };
    let value = codec
        .decode(text.trim())
        .map_err(|e| format!("Decoding failed: {}", e))?;
    println!("{}", format_json(&value));
    Ok(())
}
