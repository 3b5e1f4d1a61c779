use crate::event::json::{field, field_str, scalar_string};
use crate::event::normalization::{
    QueryMap, decode_protected, encode_component, encode_name, encode_nested,
};
use crate::event::{PayloadVariant, RoutingSource};
use serde_json::{Map, Value};
use tracing::trace;

/// Canonical query string together with the parameters it encodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalQuery {
    raw: String,
    params: QueryMap,
}

impl CanonicalQuery {
    /// Normalizes an encoded query string: brackets are exposed, names
    /// protected, the result decoded into nested parameters and serialized
    /// back.
    pub fn parse(query: &str) -> Self {
        let params = decode_protected(&expose_brackets(query));
        let raw = encode_nested(&params);
        Self { raw, params }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn params(&self) -> &QueryMap {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn into_parts(self) -> (String, QueryMap) {
        (self.raw, self.params)
    }
}

/// Rebuilds one canonical query string from whichever query representation
/// the event variant carries.
///
/// - v2: `rawQueryString`, already encoded.
/// - load balancer: `multiValueQueryStringParameters` when multi-value is
///   enabled, else `queryStringParameters`.
/// - gateway v1: `multiValueQueryStringParameters` when present and non-empty,
///   else `queryStringParameters`.
///
/// Map values arrive decoded and are form-encoded before the flat string is
/// normalized like a raw query.
pub fn reconstruct_query(event: &Value, variant: &PayloadVariant) -> CanonicalQuery {
    let flat = if variant.is_v2() {
        field_str(event, "/rawQueryString").unwrap_or_default().to_string()
    } else {
        let multi = field(event, "/multiValueQueryStringParameters").and_then(Value::as_object);
        let single = field(event, "/queryStringParameters").and_then(Value::as_object);

        match (variant.source, variant.multi_value) {
            (RoutingSource::LoadBalancer, true) => multi.map(flatten_params).unwrap_or_default(),
            (RoutingSource::LoadBalancer, false) => single.map(flatten_params).unwrap_or_default(),
            (RoutingSource::Gateway, _) => match multi {
                Some(params) if !params.is_empty() => flatten_params(params),
                _ => single.map(flatten_params).unwrap_or_default(),
            },
        }
    };

    trace!(query = %flat, "reconstructing query string");

    if flat.is_empty() {
        return CanonicalQuery::default();
    }

    CanonicalQuery::parse(&flat)
}

/// Flattens a decoded parameter map (single or multi-value) into an encoded
/// `name=value&...` sequence, keeping source order.
pub fn flatten_params(params: &Map<String, Value>) -> String {
    let mut pairs = Vec::new();

    for (name, values) in params {
        let name = encode_name(name);
        match values {
            Value::Array(values) => {
                for value in values.iter().filter_map(scalar_string) {
                    pairs.push(format!("{name}={}", encode_component(&value)));
                }
            }
            value => {
                if let Some(value) = scalar_string(value) {
                    pairs.push(format!("{name}={}", encode_component(&value)));
                }
            }
        }
    }

    pairs.join("&")
}

/// Decodes percent-encoded square brackets so nested key syntax is visible.
pub fn expose_brackets(query: &str) -> String {
    let mut out = String::with_capacity(query.len());
    let mut rest = query;

    while let Some(pos) = rest.find('%') {
        out.push_str(&rest[..pos]);
        let escape = rest.get(pos..pos + 3);
        match escape {
            Some(e) if e.eq_ignore_ascii_case("%5B") => out.push('['),
            Some(e) if e.eq_ignore_ascii_case("%5D") => out.push(']'),
            _ => {
                out.push('%');
                rest = &rest[pos + 1..];
                continue;
            }
        }
        rest = &rest[pos + 3..];
    }

    out.push_str(rest);
    out
}
