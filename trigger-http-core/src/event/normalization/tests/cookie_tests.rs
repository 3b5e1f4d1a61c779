use crate::event::CookieMap;
use crate::event::normalization::tests::test_helpers::variant_of;
use crate::event::normalization::{
    decode_body, extract_cookies, has_body, normalize_headers, parse_cookie_header,
};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

fn cookies_of(event: Value) -> CookieMap {
    let variant = variant_of(&event);
    let body = decode_body(&event);
    let headers = normalize_headers(&event, &variant, has_body(&event).then_some(body.as_slice()));
    extract_cookies(&event, &variant, &headers)
}

#[test]
fn v2_cookie_list() {
    // Act
    let cookies = cookies_of(json!({
        "version": "2.0",
        "requestContext": {"http": {"method": "GET"}},
        "cookies": ["id=42", "theme=dark"]
    }));

    // Assert
    assert_eq!(cookies, CookieMap::from_iter([("id", "42"), ("theme", "dark")]));
}

#[test]
fn v2_without_cookie_list_is_empty() {
    let cookies = cookies_of(json!({
        "version": "2.0",
        "requestContext": {"http": {"method": "GET"}},
        "headers": {"cookie": "a=1"}
    }));

    assert!(cookies.is_empty());
}

#[test]
fn v1_cookie_header_is_split_and_decoded() {
    let cookies = cookies_of(json!({
        "httpMethod": "GET",
        "headers": {"Cookie": "a=1; b=hello%20world; c=x+y"}
    }));

    assert_eq!(cookies.get("a"), Some("1"));
    assert_eq!(cookies.get("b"), Some("hello world"));
    assert_eq!(cookies.get("c"), Some("x y"));
}

#[test]
fn load_balancer_uses_first_cookie_header_only() {
    let cookies = cookies_of(json!({
        "httpMethod": "GET",
        "requestContext": {"elb": {}},
        "multiValueHeaders": {"cookie": ["a=1", "b=2"]}
    }));

    assert_eq!(cookies, CookieMap::from_iter([("a", "1")]));
}

#[test]
fn missing_cookie_header_is_empty() {
    assert!(cookies_of(json!({"httpMethod": "GET"})).is_empty());
}

#[test]
fn cookie_parts_split_on_first_equals() {
    let cookies = parse_cookie_header("token=a=b; flag");

    assert_eq!(cookies.get("token"), Some("a=b"));
    assert_eq!(cookies.get("flag"), Some(""));
}

#[test]
fn duplicate_cookie_names_are_last_write_wins() {
    let cookies = parse_cookie_header("a=1; b=2; a=3");

    assert_eq!(cookies.iter().collect::<Vec<_>>(), vec![("a", "3"), ("b", "2")]);
}
