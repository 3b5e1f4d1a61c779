use crate::event::json::{field, scalar_string};
use crate::event::normalization::{CanonicalHeaders, decode_component};
use crate::event::{CookieMap, PayloadVariant};
use serde_json::Value;

/// Extracts cookies as name to URL-decoded value.
///
/// v2 events carry a dedicated `cookies` list. Other variants use the first
/// `cookie` header value, split on `"; "`. No cookie source means no cookies.
pub fn extract_cookies(
    event: &Value,
    variant: &PayloadVariant,
    headers: &CanonicalHeaders,
) -> CookieMap {
    if variant.is_v2() {
        let Some(cookies) = field(event, "/cookies").and_then(Value::as_array) else {
            return CookieMap::new();
        };
        return cookies
            .iter()
            .filter_map(scalar_string)
            .map(|cookie| split_cookie(&cookie))
            .collect();
    }

    match headers.first("cookie") {
        Some(header) => parse_cookie_header(header),
        None => CookieMap::new(),
    }
}

/// Parses a `Cookie` header value (`a=1; b=2`).
pub fn parse_cookie_header(header: &str) -> CookieMap {
    header
        .split("; ")
        .filter(|part| !part.is_empty())
        .map(split_cookie)
        .collect()
}

fn split_cookie(cookie: &str) -> (String, String) {
    match cookie.split_once('=') {
        Some((name, value)) => (name.to_string(), decode_component(value)),
        None => (cookie.to_string(), String::new()),
    }
}
