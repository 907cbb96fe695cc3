//! Output formatting utilities.

use serde_json::Value;

/// Formats a decoded object as pretty JSON.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints a hex result on its own line.
pub fn print_hex(hex: &str) {
    println!("{}", hex);
}
