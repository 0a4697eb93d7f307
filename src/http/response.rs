//! Response envelope.
//!
//! # Responsibilities
//! - Carry the `(status, headers, [body])` triple every handler returns
//! - Provide the fixed not-found / error envelopes
//! - Convert into an axum response at the transport edge
//!
//! # Design Decisions
//! - Route misses keep a plain string body; resource misses are JSON
//! - Headers are an ordered map so envelopes compare structurally

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const APPLICATION_JSON: &str = "application/json";

pub const ROUTE_NOT_FOUND: &str = "Route not found";
pub const RESOURCE_NOT_FOUND: &str = "resource not found";
pub const INTERNAL_SERVER_ERROR: &str = "internal server error";

#[derive(Serialize)]
struct Message<'a> {
    message: &'a str,
}

/// The status/headers/body triple returned for every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseEnvelope {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    pub body: [String; 1],
}

impl ResponseEnvelope {
    /// Envelope with an explicit content type.
    pub fn new(status: u16, content_type: &str, body: impl Into<String>) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), content_type.to_string());
        Self {
            status,
            headers,
            body: [body.into()],
        }
    }

    /// Status 200, JSON content type, body as given.
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, APPLICATION_JSON, body)
    }

    /// Serialize `value` as the body.
    pub fn json<T: Serialize + ?Sized>(status: u16, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(status, APPLICATION_JSON, serde_json::to_string(value)?))
    }

    /// The fixed "no route" envelope. The body is deliberately not JSON.
    pub fn route_not_found() -> Self {
        Self::new(404, APPLICATION_JSON, ROUTE_NOT_FOUND)
    }

    /// The handler-level not-found envelope.
    pub fn resource_not_found() -> Self {
        Self::message(404, RESOURCE_NOT_FOUND)
    }

    /// 501 with the generic error message.
    pub fn internal_error() -> Self {
        Self::message(501, INTERNAL_SERVER_ERROR)
    }

    /// `{"message": ...}` with the given status.
    pub fn message(status: u16, message: &str) -> Self {
        let body = serde_json::to_string(&Message { message })
            .unwrap_or_else(|_| format!("{{\"message\":\"{message}\"}}"));
        Self::new(status, APPLICATION_JSON, body)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE).map(String::as_str)
    }

    /// The single body string.
    pub fn body_str(&self) -> &str {
        &self.body[0]
    }

    pub fn into_parts(self) -> (u16, BTreeMap<String, String>, Vec<String>) {
        (self.status, self.headers, self.body.into())
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let [body] = self.body;
        let mut response = Response::new(Body::from(body));
        *response.status_mut() = status;

        let headers = response.headers_mut();
        for (name, value) in self.headers {
            match (HeaderName::try_from(name.as_str()), HeaderValue::try_from(value.as_str())) {
                (Ok(name), Ok(value)) => {
                    headers.insert(name, value);
                }
                _ => tracing::warn!(header = %name, "Dropping invalid response header"),
            }
        }
        response
    }
}
