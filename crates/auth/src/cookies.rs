//! Session cookie contract.
//!
//! Two cookies are the only persisted session state:
//! - `grupo_hemmy_auth`: the bearer token (7 days, `Secure`, `SameSite=Strict`)
//! - `is_locked`: `"true"` while the lock screen is active, absent otherwise
//!
//! This module only formats and parses them; it never writes `is_locked`
//! except to clear it on logout.

use chrono::{DateTime, Duration, Utc};

pub const AUTH_COOKIE: &str = "grupo_hemmy_auth";
pub const LOCK_COOKIE: &str = "is_locked";

/// Lifetime of the auth cookie, in days.
pub const AUTH_COOKIE_DAYS: i64 = 7;

const COOKIE_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Session facts the route guard reads on each navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionFlags {
    pub has_session: bool,
    pub is_locked: bool,
}

impl SessionFlags {
    pub const ANONYMOUS: SessionFlags = SessionFlags {
        has_session: false,
        is_locked: false,
    };

    /// Derive flags from a raw `Cookie` request header.
    pub fn from_cookie_header(header: &str) -> Self {
        let has_session = cookie_value(header, AUTH_COOKIE).is_some_and(|v| !v.is_empty());
        let is_locked = cookie_value(header, LOCK_COOKIE) == Some("true");
        Self {
            has_session,
            is_locked,
        }
    }
}

/// Iterate `name=value` pairs of a `Cookie` header.
pub fn parse_cookie_header(header: &str) -> impl Iterator<Item = (&str, &str)> {
    header.split(';').filter_map(|pair| {
        let (name, value) = pair.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some((name, value.trim().trim_matches('"')))
    })
}

/// First value of cookie `name` in a `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    parse_cookie_header(header)
        .find(|(n, _)| *n == name)
        .map(|(_, v)| v)
}

/// Characters allowed in a cookie value without quoting (RFC 6265 cookie-octet).
pub fn is_cookie_safe(value: &str) -> bool {
    !value.is_empty()
        && value.bytes().all(|b| {
            matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
        })
}

/// `Set-Cookie` value storing the auth token.
pub fn auth_cookie(token: &str, now: DateTime<Utc>) -> String {
    let ttl = Duration::days(AUTH_COOKIE_DAYS);
    let expires = (now + ttl).format(COOKIE_DATE_FORMAT);
    format!(
        "{AUTH_COOKIE}={token}; Path=/; Expires={expires}; Max-Age={}; Secure; SameSite=Strict",
        ttl.num_seconds()
    )
}

/// `Set-Cookie` value that removes cookie `name`.
pub fn clear_cookie(name: &str) -> String {
    format!("{name}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0")
}
