use crate::event::PayloadVariant;
use crate::event::json::{field, scalar_string};
use http::{HeaderMap, HeaderName, HeaderValue};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use tracing::warn;

/// Content type assumed for a body sent without one, like a native HTTP server would.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Lower-cased header name to its values, in order of first appearance.
///
/// Every key is lower-case and every value list is non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalHeaders {
    entries: Vec<(String, Vec<String>)>,
}

impl CanonicalHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Case-insensitive lookup.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_slice())
    }

    /// First value of a header.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|v| v.first()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lower-cases the name; colliding names are last-write-wins but keep the
    /// position of the first occurrence. Empty value lists are ignored.
    pub(crate) fn insert(&mut self, name: &str, values: Vec<String>) {
        if values.is_empty() {
            return;
        }

        let name = name.to_ascii_lowercase();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, existing)) => *existing = values,
            None => self.entries.push((name, values)),
        }
    }

    /// Converts into an [`http::HeaderMap`]. Names or values that are not
    /// valid HTTP are skipped.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::with_capacity(self.entries.len());

        for (name, values) in &self.entries {
            let Ok(header_name) = HeaderName::from_bytes(name.as_bytes()) else {
                warn!(header = %name, "skipping invalid header name");
                continue;
            };

            for value in values {
                match HeaderValue::from_str(value) {
                    Ok(v) => {
                        map.append(header_name.clone(), v);
                    }
                    Err(_) => warn!(header = %name, "skipping invalid header value"),
                }
            }
        }

        map
    }
}

impl Serialize for CanonicalHeaders {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Builds the canonical header map of an event.
///
/// 1. `multiValueHeaders` is used when present, else `headers` with every
///    value wrapped in a one-element list.
/// 2. Names are lower-cased.
/// 3. With a body, `content-type` defaults to [`DEFAULT_CONTENT_TYPE`] and
///    `content-length` to the decoded body length.
/// 4. v2 `cookies` are joined with `"; "` into a single `cookie` header.
pub fn normalize_headers(
    event: &Value,
    variant: &PayloadVariant,
    body: Option<&[u8]>,
) -> CanonicalHeaders {
    let mut headers = CanonicalHeaders::new();

    if let Some(multi) = field(event, "/multiValueHeaders").and_then(Value::as_object) {
        for (name, values) in multi {
            headers.insert(name, header_values(name, values));
        }
    } else if let Some(single) = field(event, "/headers").and_then(Value::as_object) {
        for (name, value) in single {
            headers.insert(name, header_values(name, value));
        }
    }

    if let Some(body) = body {
        if !headers.contains("content-type") {
            headers.insert("content-type", vec![DEFAULT_CONTENT_TYPE.to_string()]);
        }
        if !headers.contains("content-length") {
            headers.insert("content-length", vec![body.len().to_string()]);
        }
    }

    if variant.is_v2() {
        if let Some(cookies) = field(event, "/cookies").and_then(Value::as_array) {
            let cookies: Vec<String> = cookies.iter().filter_map(scalar_string).collect();
            if !cookies.is_empty() {
                headers.insert("cookie", vec![cookies.join("; ")]);
            }
        }
    }

    headers
}

/// True only for non-v2 events using the multi-value header convention.
pub fn uses_multi_value_headers(event: &Value, variant: &PayloadVariant) -> bool {
    !variant.is_v2() && field(event, "/multiValueHeaders").is_some()
}

fn header_values(name: &str, value: &Value) -> Vec<String> {
    match value {
        Value::Array(values) => values.iter().filter_map(scalar_string).collect(),
        value => match scalar_string(value) {
            Some(v) => vec![v],
            None => {
                if !value.is_null() {
                    warn!(header = %name, "ignoring non-scalar header value");
                }
                Vec::new()
            }
        },
    }
}
