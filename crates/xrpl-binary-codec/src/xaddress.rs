//! Reconciliation of X-addresses with explicit tag fields.
//!
//! Before an object is serialized, every string field holding an X-address
//! is rewritten to its classic form. A tag packed into `Account` or
//! `Destination` moves to `SourceTag` or `DestinationTag`; any other field
//! must not carry a tag.

use crate::errors::BinaryCodecError;
use serde_json::{Map, Value};
use xrpl_address_codec::{is_valid_x_address, x_address_to_classic_address};

/// Account fields that have a companion tag field.
const TAGGED_FIELDS: [(&str, &str); 2] = [
    ("Account", "SourceTag"),
    ("Destination", "DestinationTag"),
];

/// Tag field paired with `field`, if any.
pub fn tag_field_for(field: &str) -> Option<&'static str> {
    TAGGED_FIELDS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, tag)| *tag)
}

/// Returns a copy of `object` with X-addresses expanded into classic
/// addresses and explicit tags.
///
/// Key order is preserved; a tag field introduced by the expansion is
/// appended. An explicit tag equal to the packed tag is accepted.
pub fn expand_x_addresses(
    object: &Map<String, Value>,
) -> Result<Map<String, Value>, BinaryCodecError> {
    let mut out = object.clone();
    for (field, value) in object {
        let Some(text) = value.as_str() else {
            continue;
        };
        if !is_valid_x_address(text) {
            continue;
        }
        let classic = x_address_to_classic_address(text)?;
        tracing::trace!(field = %field, "expanding X-address");
        out.insert(field.clone(), Value::String(classic.classic_address));

        let Some(tag) = classic.tag else {
            continue;
        };
        let tag_field = tag_field_for(field).ok_or_else(|| BinaryCodecError::TagNotAllowed {
            field: field.clone(),
        })?;
        match object.get(tag_field) {
            None | Some(Value::Null) => {
                out.insert(tag_field.to_string(), Value::from(tag));
            }
            Some(explicit) if tag_matches(explicit, tag) => {}
            Some(explicit) => {
                return Err(BinaryCodecError::TagConflict {
                    field: field.clone(),
                    tag_field,
                    x_address_tag: tag,
                    explicit_tag: match explicit {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    },
                });
            }
        }
    }
    Ok(out)
}

fn tag_matches(explicit: &Value, tag: u32) -> bool {
    match explicit {
        Value::Number(n) => n.as_u64() == Some(u64::from(tag)),
        Value::String(s) => s.parse::<u32>().ok() == Some(tag),
        _ => false,
    }
}
