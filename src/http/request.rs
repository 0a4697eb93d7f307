//! Transport-independent request model.
//!
//! # Responsibilities
//! - Carry method, path, headers and flattened params to the dispatcher
//! - Decode query strings, form bodies and JSON object bodies
//!
//! # Design Decisions
//! - Body params are appended after query params, so they win on merge
//! - Nested JSON values are skipped; only top-level scalars become params
//! - The body is read once, bounded by the configured size limit

use axum::{
    body::{self, Body},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue, Method, Request},
};
use serde_json::Value;
use thiserror::Error;

/// Why a request could not be turned into a `RawRequest`.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),
}

/// A request as the dispatcher sees it.
#[derive(Debug, Clone)]
pub struct RawRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    /// Query and body params in arrival order.
    pub params: Vec<(String, String)>,
}

impl RawRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            params: Vec::new(),
        }
    }

    /// Add a header. Invalid names or values are ignored.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            self.headers.insert(name, value);
        }
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Build from an axum request, reading at most `limit` body bytes.
    pub async fn from_parts(request: Request<Body>, limit: usize) -> Result<Self, RequestError> {
        let (parts, body) = request.into_parts();
        let mut params = parts.uri.query().map(decode_form).unwrap_or_default();

        let bytes = body::to_bytes(body, limit).await?;
        if !bytes.is_empty() {
            let content_type = parts
                .headers
                .get(CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default();
            params.extend(decode_body(content_type, &bytes));
        }

        Ok(Self {
            method: parts.method,
            path: parts.uri.path().to_string(),
            headers: parts.headers,
            params,
        })
    }
}

/// Decode `a=1&b=two` pairs.
pub fn decode_form(input: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(input.as_bytes())
        .into_owned()
        .collect()
}

/// Decode a body according to its content type.
pub fn decode_body(content_type: &str, bytes: &[u8]) -> Vec<(String, String)> {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        return decode_json(bytes);
    }
    if mime == "application/x-www-form-urlencoded" {
        return url::form_urlencoded::parse(bytes).into_owned().collect();
    }
    Vec::new()
}

fn decode_json(bytes: &[u8]) -> Vec<(String, String)> {
    let Ok(Value::Object(members)) = serde_json::from_slice::<Value>(bytes) else {
        tracing::debug!("Ignoring non-object JSON body");
        return Vec::new();
    };
    members
        .into_iter()
        .filter_map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null | Value::Array(_) | Value::Object(_) => return None,
            };
            Some((key, value))
        })
        .collect()
}
