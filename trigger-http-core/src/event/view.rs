use crate::event::normalization::{CanonicalHeaders, QueryMap};
use crate::event::{CookieMap, HttpRequestEvent, PayloadVariant, StrMap};
use serde::Serialize;
use serde_json::Value;
use std::borrow::Cow;

/// Serializable snapshot of every accessor of an [`HttpRequestEvent`].
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalRequestView<'a> {
    pub variant: PayloadVariant,
    pub method: &'a str,
    pub path: &'a str,
    pub uri: String,
    pub query_string: &'a str,
    pub query_parameters: &'a QueryMap,
    pub path_parameters: StrMap,
    pub headers: &'a CanonicalHeaders,
    pub uses_multi_value_headers: bool,
    pub cookies: CookieMap,
    pub content_type: Option<&'a str>,
    /// Body as text; binary bodies are rendered lossily.
    pub body: Cow<'a, str>,
    pub body_length: usize,
    pub is_base64_encoded: bool,
    pub protocol: &'a str,
    pub protocol_version: &'a str,
    pub remote_port: u16,
    pub server_port: u16,
    pub server_name: &'a str,
    pub source_ip: &'a str,
    pub request_context: &'a Value,
}

impl HttpRequestEvent {
    pub fn view(&self) -> CanonicalRequestView<'_> {
        CanonicalRequestView {
            variant: self.variant(),
            method: self.method(),
            path: self.path(),
            uri: self.uri(),
            query_string: self.query_string(),
            query_parameters: self.query_parameters(),
            path_parameters: self.path_parameters(),
            headers: self.headers(),
            uses_multi_value_headers: self.uses_multi_value_headers(),
            cookies: self.cookies(),
            content_type: self.content_type(),
            body: String::from_utf8_lossy(self.body()),
            body_length: self.body().len(),
            is_base64_encoded: self.is_base64_encoded(),
            protocol: self.protocol(),
            protocol_version: self.protocol_version(),
            remote_port: self.remote_port(),
            server_port: self.server_port(),
            server_name: self.server_name(),
            source_ip: self.source_ip(),
            request_context: self.request_context(),
        }
    }
}
