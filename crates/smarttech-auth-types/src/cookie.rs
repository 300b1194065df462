//! Cookie builders for the refresh token and the OAuth `state` nonce.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the refresh token.
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Cookie name for the OAuth CSRF `state` value.
pub const OAUTH_STATE_COOKIE: &str = "oauthState";

/// Lifetime of the OAuth `state` cookie in seconds.
pub const OAUTH_STATE_TTL: i64 = 600;

/// Set the refresh-token cookie on the jar. `max_age` should equal the token lifetime.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use smarttech_auth_types::cookie::{set_refresh_token_cookie, REFRESH_TOKEN_COOKIE};
///
/// let jar = CookieJar::new();
/// let jar = set_refresh_token_cookie(
///     jar,
///     "refresh_value".to_string(),
///     "example.com".to_string(),
///     604800,
/// );
/// let cookie = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "refresh_value");
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(604800)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_refresh_token_cookie(
    jar: CookieJar,
    value: String,
    domain: String,
    max_age: u64,
) -> CookieJar {
    let cookie = Cookie::build((REFRESH_TOKEN_COOKIE, value))
        .path("/")
        .domain(domain)
        .max_age(Duration::seconds(max_age as i64))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Clear the refresh-token cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use smarttech_auth_types::cookie::{
///     clear_refresh_token_cookie, set_refresh_token_cookie, REFRESH_TOKEN_COOKIE,
/// };
///
/// let jar = CookieJar::new();
/// let jar = set_refresh_token_cookie(jar, "r".to_string(), "example.com".to_string(), 60);
/// let jar = clear_refresh_token_cookie(jar, "example.com".to_string());
/// let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
/// assert_eq!(refresh.value(), "");
/// assert_eq!(refresh.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_refresh_token_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((REFRESH_TOKEN_COOKIE, ""))
        .path("/")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

/// Remember the OAuth `state` sent to the provider until the redirect comes back.
pub fn set_oauth_state_cookie(jar: CookieJar, state: String, domain: String) -> CookieJar {
    let cookie = Cookie::build((OAUTH_STATE_COOKIE, state))
        .path("/auth")
        .domain(domain)
        .max_age(Duration::seconds(OAUTH_STATE_TTL))
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}

pub fn clear_oauth_state_cookie(jar: CookieJar, domain: String) -> CookieJar {
    let cookie = Cookie::build((OAUTH_STATE_COOKIE, ""))
        .path("/auth")
        .domain(domain)
        .max_age(Duration::ZERO)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .build();
    jar.add(cookie)
}
