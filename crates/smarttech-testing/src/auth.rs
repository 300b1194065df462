//! Header builders for requests against auth-protected routes.

use axum::http::{HeaderMap, HeaderValue, header};

use smarttech_auth_types::cookie::REFRESH_TOKEN_COOKIE;

/// `Authorization: Bearer <token>` as a header map.
pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
        map.insert(header::AUTHORIZATION, value);
    }
    map
}

/// `Cookie: refreshToken=<token>` as a header value.
pub fn refresh_cookie(token: &str) -> HeaderValue {
    HeaderValue::from_str(&format!("{REFRESH_TOKEN_COOKIE}={token}"))
        .unwrap_or_else(|_| HeaderValue::from_static(""))
}
