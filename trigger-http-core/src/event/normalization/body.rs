use crate::event::json::{field, scalar_string};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;
use tracing::warn;

/// Returns the request body bytes, base64-decoding them when the event sets
/// `isBase64Encoded`. A missing body is empty; an undecodable one is logged
/// and treated as empty.
pub fn decode_body(event: &Value) -> Vec<u8> {
    let Some(body) = field(event, "/body").and_then(scalar_string) else {
        return Vec::new();
    };

    if !is_base64_encoded(event) {
        return body.into_bytes();
    }

    match STANDARD.decode(body.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "failed to base64-decode request body");
            Vec::new()
        }
    }
}

/// Whether the raw event carries a non-empty body.
pub fn has_body(event: &Value) -> bool {
    field(event, "/body")
        .and_then(scalar_string)
        .is_some_and(|body| !body.is_empty())
}

pub fn is_base64_encoded(event: &Value) -> bool {
    field(event, "/isBase64Encoded")
        .and_then(Value::as_bool)
        .unwrap_or(false)
}
