use serde_json::Value;
use thiserror::Error as ThisError;

/// Human description of the event sources this crate accepts.
pub const HTTP_EVENT_SOURCE: &str = "API Gateway or ALB";

#[derive(Debug, ThisError)]
pub enum EventError {
    #[error("this handler expected to be invoked with a {expected} event")]
    UnrecognizedEvent {
        expected: &'static str,
        event: Box<Value>,
    },

    #[error("failed to parse event JSON: {source}")]
    Json {
        #[source]
        source: serde_json::Error,
    },
}

impl EventError {
    pub fn unrecognized(event: Value) -> Self {
        Self::UnrecognizedEvent {
            expected: HTTP_EVENT_SOURCE,
            event: Box::new(event),
        }
    }

    /// The offending raw event, when the error carries one.
    pub fn event(&self) -> Option<&Value> {
        match self {
            Self::UnrecognizedEvent { event, .. } => Some(event),
            Self::Json { .. } => None,
        }
    }
}

impl From<serde_json::Error> for EventError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}
