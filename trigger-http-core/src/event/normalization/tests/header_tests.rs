use crate::event::normalization::tests::test_helpers::variant_of;
use crate::event::normalization::{
    CanonicalHeaders, DEFAULT_CONTENT_TYPE, decode_body, has_body, normalize_headers,
    uses_multi_value_headers,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn headers_of(event: Value) -> CanonicalHeaders {
    let variant = variant_of(&event);
    let body = decode_body(&event);
    normalize_headers(&event, &variant, has_body(&event).then_some(body.as_slice()))
}

fn values(items: &[&str]) -> Vec<String> {
    items.iter().map(|v| v.to_string()).collect()
}

//-----------------------------------------------------------------------------
// Sources
//-----------------------------------------------------------------------------
#[test]
fn single_value_headers_are_wrapped() {
    // Act
    let headers = headers_of(json!({
        "httpMethod": "GET",
        "headers": {"Host": "example.com", "Accept": "*/*"}
    }));

    // Assert
    assert_eq!(headers.get("host"), Some(values(&["example.com"]).as_slice()));
    assert_eq!(headers.get("accept"), Some(values(&["*/*"]).as_slice()));
    assert_eq!(headers.len(), 2);
}

#[test]
fn multi_value_headers_take_precedence() {
    // Act
    let headers = headers_of(json!({
        "httpMethod": "GET",
        "headers": {"X-Tag": "b"},
        "multiValueHeaders": {"X-Tag": ["a", "b"]}
    }));

    // Assert
    assert_eq!(headers.get("x-tag"), Some(values(&["a", "b"]).as_slice()));
}

#[test]
fn null_multi_value_headers_fall_back_to_single() {
    let headers = headers_of(json!({
        "httpMethod": "GET",
        "headers": {"X-Tag": "b"},
        "multiValueHeaders": null
    }));

    assert_eq!(headers.first("x-tag"), Some("b"));
}

#[test]
fn header_names_are_case_insensitive() {
    // Arrange
    let upper = json!({"httpMethod": "GET", "headers": {"Content-Type": "text/plain"}});
    let lower = json!({"httpMethod": "GET", "headers": {"content-type": "text/plain"}});

    // Act / Assert
    assert_eq!(headers_of(upper), headers_of(lower));
}

#[test]
fn keys_are_lowercase_and_lookup_ignores_case() {
    let headers = headers_of(json!({"httpMethod": "GET", "headers": {"X-Request-ID": "1"}}));

    assert_eq!(headers.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["x-request-id"]);
    assert_eq!(headers.first("X-REQUEST-ID"), Some("1"));
}

#[test]
fn colliding_names_are_last_write_wins() {
    let headers = headers_of(json!({
        "httpMethod": "GET",
        "headers": {"X-A": "1", "Other": "o", "x-a": "2"}
    }));

    assert_eq!(
        headers.iter().map(|(k, _)| k).collect::<Vec<_>>(),
        vec!["x-a", "other"]
    );
    assert_eq!(headers.get("x-a"), Some(values(&["2"]).as_slice()));
}

#[test]
fn non_string_values_are_stringified_and_nulls_dropped() {
    let headers = headers_of(json!({
        "httpMethod": "GET",
        "multiValueHeaders": {"X-Port": [443], "X-Empty": [], "X-Null": [null, "kept"]}
    }));

    assert_eq!(headers.first("x-port"), Some("443"));
    assert!(!headers.contains("x-empty"));
    assert_eq!(headers.get("x-null"), Some(values(&["kept"]).as_slice()));
}

#[test]
fn missing_headers_are_empty() {
    assert!(headers_of(json!({"httpMethod": "GET"})).is_empty());
}

//-----------------------------------------------------------------------------
// Derived defaults
//-----------------------------------------------------------------------------
#[test]
fn body_without_content_type_gets_defaults() {
    let headers = headers_of(json!({"httpMethod": "POST", "body": "a=1&b=2"}));

    assert_eq!(headers.first("content-type"), Some(DEFAULT_CONTENT_TYPE));
    assert_eq!(headers.first("content-length"), Some("7"));
}

#[test]
fn content_length_uses_decoded_body() {
    let headers = headers_of(json!({
        "httpMethod": "POST",
        "body": "aGVsbG8=",
        "isBase64Encoded": true
    }));

    assert_eq!(headers.first("content-length"), Some("5"));
}

#[test]
fn explicit_content_headers_are_kept() {
    let headers = headers_of(json!({
        "httpMethod": "POST",
        "headers": {"Content-Type": "application/json", "Content-Length": "99"},
        "body": "{}"
    }));

    assert_eq!(headers.first("content-type"), Some("application/json"));
    assert_eq!(headers.first("content-length"), Some("99"));
}

#[test]
fn no_body_no_defaults() {
    let headers = headers_of(json!({"httpMethod": "GET", "body": ""}));

    assert!(!headers.contains("content-type"));
    assert!(!headers.contains("content-length"));
}

//-----------------------------------------------------------------------------
// Cookies
//-----------------------------------------------------------------------------
#[test]
fn v2_cookies_become_cookie_header() {
    let headers = headers_of(json!({
        "version": "2.0",
        "requestContext": {"http": {"method": "GET"}},
        "headers": {"Cookie": "ignored=1"},
        "cookies": ["id=42", "theme=dark"]
    }));

    assert_eq!(headers.get("cookie"), Some(values(&["id=42; theme=dark"]).as_slice()));
}

#[test]
fn v1_cookies_field_is_ignored() {
    let headers = headers_of(json!({
        "httpMethod": "GET",
        "cookies": ["id=42"]
    }));

    assert!(!headers.contains("cookie"));
}

//-----------------------------------------------------------------------------
// Source metadata and conversion
//-----------------------------------------------------------------------------
#[test]
fn multi_value_header_convention() {
    let cases = [
        (json!({"httpMethod": "GET", "multiValueHeaders": {}}), true),
        (json!({"httpMethod": "GET", "headers": {}}), false),
        (
            json!({
                "version": "2.0",
                "requestContext": {"http": {"method": "GET"}},
                "multiValueHeaders": {}
            }),
            false,
        ),
    ];

    for (event, expected) in cases {
        let variant = variant_of(&event);
        assert_eq!(uses_multi_value_headers(&event, &variant), expected);
    }
}

#[test]
fn to_header_map_keeps_every_value() {
    // Arrange
    let headers = headers_of(json!({
        "httpMethod": "GET",
        "multiValueHeaders": {"Accept": ["text/html", "application/json"], "Bad Name": ["x"]}
    }));

    // Act
    let map = headers.to_header_map();

    // Assert
    let accept: Vec<&str> = map
        .get_all("accept")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(accept, vec!["text/html", "application/json"]);
    assert_eq!(map.len(), 2);
}

#[test]
fn serializes_as_object_of_lists() {
    let headers = headers_of(json!({"httpMethod": "GET", "headers": {"Host": "h"}}));

    assert_eq!(serde_json::to_value(&headers).unwrap(), json!({"host": ["h"]}));
}
