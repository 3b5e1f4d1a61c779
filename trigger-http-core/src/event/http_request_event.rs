use crate::event::json::{field, field_str, scalar_string};
use crate::event::normalization::{
    CanonicalHeaders, QueryMap, decode_body, extract_cookies, has_body, is_base64_encoded,
    normalize_headers, reconstruct_query, uses_multi_value_headers,
};
use crate::event::{CookieMap, EventError, PayloadVariant, StrMap, detect_variant};
use serde_json::Value;
use std::str::FromStr;

const DEFAULT_PROTOCOL: &str = "HTTP/1.1";
const DEFAULT_PORT: u16 = 80;
const DEFAULT_SERVER_NAME: &str = "localhost";
const DEFAULT_SOURCE_IP: &str = "127.0.0.1";

static NULL: Value = Value::Null;

/// Canonical, format-independent view of an HTTP trigger event.
///
/// Headers, query string, query parameters and body are computed once at
/// construction; the value is immutable afterwards.
#[derive(Debug, Clone)]
pub struct HttpRequestEvent {
    event: Value,
    variant: PayloadVariant,
    method: String,
    headers: CanonicalHeaders,
    query_string: String,
    query_parameters: QueryMap,
    body: Vec<u8>,
}

impl HttpRequestEvent {
    pub fn new(event: Value) -> Result<Self, EventError> {
        let detected = detect_variant(&event)?;
        let variant = detected.variant;

        let body = decode_body(&event);
        let headers = normalize_headers(
            &event,
            &variant,
            has_body(&event).then_some(body.as_slice()),
        );
        let (query_string, query_parameters) = reconstruct_query(&event, &variant).into_parts();

        Ok(Self {
            event,
            variant,
            method: detected.method,
            headers,
            query_string,
            query_parameters,
            body,
        })
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, EventError> {
        Self::new(serde_json::from_slice(bytes)?)
    }

    pub fn variant(&self) -> PayloadVariant {
        self.variant
    }

    pub fn payload_version(&self) -> f64 {
        self.variant.payload_version
    }

    pub fn is_format_v2(&self) -> bool {
        self.variant.is_v2()
    }

    pub fn is_load_balancer(&self) -> bool {
        self.variant.is_load_balancer()
    }

    /// Upper-cased HTTP method.
    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    pub fn is_base64_encoded(&self) -> bool {
        is_base64_encoded(&self.event)
    }

    pub fn headers(&self) -> &CanonicalHeaders {
        &self.headers
    }

    /// Whether the source event used the multi-value header convention, which
    /// decides the reply format a response must use.
    pub fn uses_multi_value_headers(&self) -> bool {
        uses_multi_value_headers(&self.event, &self.variant)
    }

    pub fn protocol(&self) -> &str {
        field_str(&self.event, "/requestContext/protocol")
            .or_else(|| field_str(&self.event, "/requestContext/http/protocol"))
            .unwrap_or(DEFAULT_PROTOCOL)
    }

    /// Protocol without its `HTTP/` prefix, e.g. `1.1`.
    pub fn protocol_version(&self) -> &str {
        let protocol = self.protocol();
        protocol.strip_prefix("HTTP/").unwrap_or(protocol)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.first("content-type")
    }

    pub fn remote_port(&self) -> u16 {
        self.forwarded_port()
    }

    pub fn server_port(&self) -> u16 {
        self.forwarded_port()
    }

    pub fn server_name(&self) -> &str {
        self.headers.first("host").unwrap_or(DEFAULT_SERVER_NAME)
    }

    pub fn source_ip(&self) -> &str {
        let pointer = if self.variant.is_v2() {
            "/requestContext/http/sourceIp"
        } else {
            "/requestContext/identity/sourceIp"
        };
        field_str(&self.event, pointer).unwrap_or(DEFAULT_SOURCE_IP)
    }

    pub fn path(&self) -> &str {
        let pointer = if self.variant.is_v2() {
            "/rawPath"
        } else {
            "/path"
        };
        field_str(&self.event, pointer).unwrap_or("/")
    }

    /// Path followed by `?` and the query string when there is one.
    pub fn uri(&self) -> String {
        if self.query_string.is_empty() {
            self.path().to_string()
        } else {
            format!("{}?{}", self.path(), self.query_string)
        }
    }

    pub fn query_string(&self) -> &str {
        &self.query_string
    }

    pub fn query_parameters(&self) -> &QueryMap {
        &self.query_parameters
    }

    pub fn path_parameters(&self) -> StrMap {
        field(&self.event, "/pathParameters")
            .and_then(Value::as_object)
            .map(|params| {
                params
                    .iter()
                    .filter_map(|(k, v)| scalar_string(v).map(|v| (k.as_str(), v)))
                    .collect::<StrMap>()
            })
            .unwrap_or_default()
    }

    /// `requestContext` as sent, or `null` when absent.
    pub fn request_context(&self) -> &Value {
        field(&self.event, "/requestContext").unwrap_or(&NULL)
    }

    /// Cookies, recomputed on every call.
    pub fn cookies(&self) -> CookieMap {
        extract_cookies(&self.event, &self.variant, &self.headers)
    }

    pub fn raw_event(&self) -> &Value {
        &self.event
    }

    pub fn into_raw_event(self) -> Value {
        self.event
    }

    fn forwarded_port(&self) -> u16 {
        self.headers
            .first("x-forwarded-port")
            .and_then(|port| port.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT)
    }
}

impl TryFrom<Value> for HttpRequestEvent {
    type Error = EventError;

    fn try_from(event: Value) -> Result<Self, Self::Error> {
        Self::new(event)
    }
}

impl FromStr for HttpRequestEvent {
    type Err = EventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(serde_json::from_str(s)?)
    }
}
