use crate::event::EventError;
use crate::event::json::{field, scalar_string};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PayloadVersion {
    /// Legacy proxy format: `httpMethod`, `path`, query parameter maps.
    V1,
    /// Streamlined format: `requestContext.http.method`, `rawPath`, `rawQueryString`.
    V2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoutingSource {
    Gateway,
    LoadBalancer,
}

/// Shape of an incoming HTTP event, resolved once when the event is constructed.
///
/// Every normalization stage switches on this tag instead of re-inspecting
/// the raw event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PayloadVariant {
    pub version: PayloadVersion,

    /// Numeric payload version; `version` field when parseable, else inferred.
    pub payload_version: f64,

    pub source: RoutingSource,

    /// A top-level `multiValueQueryStringParameters` or `multiValueHeaders` is present.
    pub multi_value: bool,
}

impl PayloadVariant {
    pub fn is_v2(&self) -> bool {
        self.version == PayloadVersion::V2
    }

    pub fn is_load_balancer(&self) -> bool {
        self.source == RoutingSource::LoadBalancer
    }
}

/// The variant of an event together with its upper-cased HTTP method.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedVariant {
    pub variant: PayloadVariant,
    pub method: String,
}

/// Detects the payload variant of a raw HTTP event.
///
/// A top-level `httpMethod` marks the legacy format, a nested
/// `requestContext.http.method` the v2 format. Anything else is not an HTTP
/// event and is rejected with [`EventError::UnrecognizedEvent`].
pub fn detect_variant(event: &Value) -> Result<DetectedVariant, EventError> {
    let (inferred, method) = if let Some(method) = field(event, "/httpMethod") {
        (1.0, method)
    } else if let Some(method) = field(event, "/requestContext/http/method") {
        (2.0, method)
    } else {
        return Err(EventError::unrecognized(event.clone()));
    };

    let Some(method) = scalar_string(method) else {
        return Err(EventError::unrecognized(event.clone()));
    };

    let payload_version = explicit_version(event).unwrap_or(inferred);
    let version = if payload_version == 2.0 {
        PayloadVersion::V2
    } else {
        PayloadVersion::V1
    };

    let source = if field(event, "/requestContext/elb").is_some() {
        RoutingSource::LoadBalancer
    } else {
        RoutingSource::Gateway
    };

    let multi_value = field(event, "/multiValueQueryStringParameters").is_some()
        || field(event, "/multiValueHeaders").is_some();

    let variant = PayloadVariant {
        version,
        payload_version,
        source,
        multi_value,
    };

    debug!(?variant, "detected http event variant");

    Ok(DetectedVariant {
        variant,
        method: method.to_ascii_uppercase(),
    })
}

fn explicit_version(event: &Value) -> Option<f64> {
    let raw = field(event, "/version")?;
    let parsed = match raw {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    if parsed.is_none() {
        warn!(version = %raw, "ignoring unparseable payload version");
    }

    parsed
}
