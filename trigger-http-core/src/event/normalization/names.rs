use crate::event::normalization::form::split_name;
use crate::event::normalization::{QueryMap, decode_bytes, decode_nested};
use tracing::debug;

/// Replaces the leading name of every `name=value` pair with the hex encoding
/// of its decoded bytes.
///
/// Only the name before a bracket suffix is protected, so bracket
/// suffixes stay visible to [`decode_nested`]. Hex output never contains a
/// delimiter, which keeps literal `=`, `&`, `+` or `.` inside a name from
/// being read as structure.
pub fn protect_names(query: &str) -> String {
    query
        .split('&')
        .map(|part| {
            let (key, value) = match part.find('=') {
                Some(eq) => part.split_at(eq),
                None => (part, ""),
            };
            let (name, suffix) = split_name(key);
            if name.is_empty() {
                return part.to_string();
            }
            format!("{}{suffix}{value}", hex::encode(decode_bytes(name)))
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Reverses [`protect_names`] for one decoded top-level key. Names that are
/// not UTF-8 have invalid sequences replaced.
pub fn unprotect_name(name: &str) -> Option<String> {
    let bytes = hex::decode(name).ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Protect names, decode the nested structure, then restore the names.
pub fn decode_protected(query: &str) -> QueryMap {
    decode_nested(&protect_names(query)).map_keys(|key| match unprotect_name(&key) {
        Some(name) => name,
        None => {
            debug!(key = %key, "query parameter name was not protected");
            key
        }
    })
}
