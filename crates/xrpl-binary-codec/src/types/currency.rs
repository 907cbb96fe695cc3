use super::{check_hint, decode_hex, exact_length, expect_str, SerializedType};
use crate::errors::BinaryCodecError;
use crate::parser::BinaryParser;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

static ISO_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9?!@#$%^&*(){}\[\]|]{3}$").expect("invalid regex")
});

/// 160-bit currency code.
///
/// Three-character codes live in bytes 12..15 with every other byte zero.
/// The all-zero code is the native asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Currency([u8; 20]);

impl Currency {
    /// The native asset.
    pub const XRP: Currency = Currency([0u8; 20]);

    /// Wraps raw bytes.
    pub fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// `true` for the native asset.
    pub fn is_native(&self) -> bool {
        self.0 == [0u8; 20]
    }

    /// Three-character code, when the bytes use the standard layout.
    pub fn iso_code(&self) -> Option<String> {
        let standard = self.0[..12].iter().all(|b| *b == 0) && self.0[15..].iter().all(|b| *b == 0);
        if !standard {
            return None;
        }
        let code = std::str::from_utf8(&self.0[12..15]).ok()?;
        (code != "XRP" && ISO_CODE.is_match(code)).then(|| code.to_string())
    }

    fn from_iso_code(code: &str) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..15].copy_from_slice(code.as_bytes());
        Self(bytes)
    }
}

impl SerializedType for Currency {
    const NAME: &'static str = "Currency";

    fn from_value(value: &Value) -> Result<Self, BinaryCodecError> {
        let text = expect_str(value, Self::NAME, "a currency code or 40 hex digits")?;
        if text == "XRP" {
            return Ok(Self::XRP);
        }
        if ISO_CODE.is_match(text) {
            return Ok(Self::from_iso_code(text));
        }
        if text.len() == 40 {
            return Ok(Self(exact_length(Self::NAME, &decode_hex(Self::NAME, text)?)?));
        }
        Err(BinaryCodecError::format(
            Self::NAME,
            format!("{text:?} is neither a three-character code nor 40 hex digits"),
        ))
    }

    fn from_parser(
        parser: &mut BinaryParser<'_>,
        length_hint: Option<usize>,
    ) -> Result<Self, BinaryCodecError> {
        check_hint(Self::NAME, 20, length_hint)?;
        Ok(Self(parser.read_array()?))
    }

    fn to_json(&self) -> Value {
        if let Some(code) = self.iso_code() {
            return Value::String(code);
        }
        if self.is_native() {
            return Value::String("XRP".to_string());
        }
        Value::String(hex::encode_upper(self.0))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
