//! Authentication token resolution.
//!
//! # Responsibilities
//! - Prefer the dedicated token header
//! - Fall back to HTTP Basic credentials checked through `UserLookup`
//!
//! # Design Decisions
//! - Any failure leaves the token empty; the gate decides what that means
//! - The password is never logged

use axum::http::{header::AUTHORIZATION, HeaderMap};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::AuthConfig;
use crate::store::UserLookup;

/// Resolve the request's auth token, if any.
pub fn resolve_token(headers: &HeaderMap, auth: &AuthConfig, users: &dyn UserLookup) -> Option<String> {
    let header = headers
        .get(auth.token_header.as_str())
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(token) = header {
        return Some(token.to_string());
    }

    if !auth.basic_enabled {
        return None;
    }
    let (email, password) = basic_credentials(headers)?;
    match users.find_by_email_and_password(&email, &password) {
        Some(user) => Some(user.auth_token),
        None => {
            tracing::debug!(email = %email, "Basic credentials rejected");
            None
        }
    }
}

/// Decode `Authorization: Basic base64(user:password)`.
pub fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (user, password) = decoded.split_once(':')?;
    Some((user.to_string(), password.to_string()))
}

/// Encode credentials the way clients send them.
pub fn encode_basic(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, NewUser};
    use axum::http::HeaderValue;

    fn store() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .create_user(NewUser {
                name: "Ann".into(),
                email: "ann@example.com".into(),
                password: "pw".into(),
                auth_token: Some("tok".into()),
            })
            .unwrap();
        store
    }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_header_token_wins() {
        let store = store();
        let auth = AuthConfig::default();
        let map = headers(&[
            ("authentication-token", "from-header"),
            ("authorization", encode_basic("ann@example.com", "pw").as_str()),
        ]);
        assert_eq!(resolve_token(&map, &auth, &store).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_basic_credentials_resolve_token() {
        let store = store();
        let auth = AuthConfig::default();
        let map = headers(&[("authorization", encode_basic("ann@example.com", "pw").as_str())]);
        assert_eq!(resolve_token(&map, &auth, &store).as_deref(), Some("tok"));
    }

    #[test]
    fn test_wrong_password_leaves_token_empty() {
        let store = store();
        let auth = AuthConfig::default();
        let map = headers(&[("authorization", encode_basic("ann@example.com", "nope").as_str())]);
        assert_eq!(resolve_token(&map, &auth, &store), None);

        let map = headers(&[("authorization", encode_basic("who@example.com", "pw").as_str())]);
        assert_eq!(resolve_token(&map, &auth, &store), None);
    }

    #[test]
    fn test_basic_can_be_disabled() {
        let store = store();
        let auth = AuthConfig {
            basic_enabled: false,
            ..AuthConfig::default()
        };
        let map = headers(&[("authorization", encode_basic("ann@example.com", "pw").as_str())]);
        assert_eq!(resolve_token(&map, &auth, &store), None);
    }

    #[test]
    fn test_malformed_authorization() {
        for value in ["Bearer abc", "Basic !!!", "Basic", "Basic Zm9v"] {
            let map = headers(&[("authorization", value)]);
            assert_eq!(basic_credentials(&map), None, "{value}");
        }
    }
}
