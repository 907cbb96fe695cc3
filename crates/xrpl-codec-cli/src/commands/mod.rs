pub mod decode;
pub mod encode;
pub mod sign;

use std::sync::Arc;
use xrpl_binary_codec::{BinaryCodec, Definitions};

/// Builds the codec, loading `definitions` when a path is given.
pub fn codec(definitions: Option<&str>) -> Result<BinaryCodec, Box<dyn std::error::Error>> {
    match definitions {
        Some(path) => {
            let loaded = Definitions::from_path(path)
                .map_err(|e| format!("Failed to load definitions {}: {}", path, e))?;
            tracing::info!(path, fields = loaded.field_count(), "using custom definitions");
            Ok(BinaryCodec::new(Arc::new(loaded)))
        }
        None => Ok(BinaryCodec::default()),
    }
}
