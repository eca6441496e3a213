//! Base64 at both ends of the wire.
//!
//! Local documents travel to the service as standard, padded base64 inside
//! the JSON body; images come back the same way. The service (like most
//! Python JSON producers) sometimes wraps long base64 strings, so ASCII
//! whitespace is dropped before decoding.

use crate::error::LayoutError;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Encode raw document bytes for the `file` field.
pub fn encode_document(bytes: &[u8]) -> String {
    let b64 = STANDARD.encode(bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    b64
}

/// Decode one image of page `page` (0-indexed) named `name`.
pub fn decode_image(page: usize, name: &str, b64: &str) -> Result<Vec<u8>, LayoutError> {
    let decoded = if b64.bytes().any(|b| b.is_ascii_whitespace()) {
        let compact: String = b64.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        STANDARD.decode(compact)
    } else {
        STANDARD.decode(b64)
    };
    decoded.map_err(|source| LayoutError::InvalidBase64 {
        page,
        name: name.to_string(),
        source,
    })
}
