//! Navigation guard.
//!
//! Evaluated fresh on every navigation from the session flags and the
//! requested path; it keeps no memory between requests. Rules, first match
//! wins:
//!
//! 1. excluded path (assets, API passthrough) → allow
//! 2. `/login` → home or lock screen when a session exists, else allow
//! 3. `/lock-screen` → login when there is no session, else allow
//! 4. no session → login
//! 5. locked session → lock screen
//! 6. allow

use serde::Serialize;

use crate::ability::Ability;
use crate::cookies::SessionFlags;

pub const LOGIN_PATH: &str = "/login";
pub const LOCK_SCREEN_PATH: &str = "/lock-screen";
pub const HOME_PATH: &str = "/";
pub const NOT_AUTHORIZED_PATH: &str = "/not-authorized";

/// Where the guard sends a navigation it does not let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Redirect {
    Login,
    LockScreen,
    Home,
    NotAuthorized,
}

impl Redirect {
    pub fn path(&self) -> &'static str {
        match self {
            Redirect::Login => LOGIN_PATH,
            Redirect::LockScreen => LOCK_SCREEN_PATH,
            Redirect::Home => HOME_PATH,
            Redirect::NotAuthorized => NOT_AUTHORIZED_PATH,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "decision", content = "to")]
pub enum Decision {
    Allow,
    Redirect(Redirect),
}

impl Decision {
    pub fn is_allow(&self) -> bool {
        matches!(self, Decision::Allow)
    }
}

const DEFAULT_EXCLUDED_PREFIXES: &[&str] = &["/api/", "/_next/static/", "/_next/image"];
const DEFAULT_EXCLUDED_EXACT: &[&str] = &["/api", "/favicon.ico"];
const DEFAULT_STATIC_EXTENSIONS: &[&str] = &[
    "svg", "png", "jpg", "jpeg", "gif", "webp", "avif", "ico", "bmp", // images
    "woff", "woff2", "ttf", "otf", "eot", // fonts
    "css", "js", "mjs", "map", // styles and scripts
];

/// Pages reachable by any signed-in user, whatever their capabilities.
const DEFAULT_OPEN_PAGES: &[&str] = &["", "login", "lock-screen", "not-authorized", "profile"];

/// Route guard configuration. `RouteGuard::default()` carries the stock
/// matcher; extra exclusions can be layered on.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    excluded_prefixes: Vec<String>,
    excluded_exact: Vec<String>,
    static_extensions: Vec<String>,
    open_pages: Vec<String>,
}

impl Default for RouteGuard {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            excluded_prefixes: owned(DEFAULT_EXCLUDED_PREFIXES),
            excluded_exact: owned(DEFAULT_EXCLUDED_EXACT),
            static_extensions: owned(DEFAULT_STATIC_EXTENSIONS),
            open_pages: owned(DEFAULT_OPEN_PAGES),
        }
    }
}

impl RouteGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exclude_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.excluded_prefixes.push(prefix.into());
        self
    }

    pub fn open_page(mut self, segment: impl Into<String>) -> Self {
        self.open_pages.push(segment.into());
        self
    }

    /// Whether `path` bypasses the guard entirely.
    pub fn is_excluded(&self, path: &str) -> bool {
        if self.excluded_exact.iter().any(|p| p == path)
            || self.excluded_prefixes.iter().any(|p| path.starts_with(p.as_str()))
        {
            return true;
        }

        let last = path.rsplit('/').next().unwrap_or_default();
        match last.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => self
                .static_extensions
                .iter()
                .any(|e| e.eq_ignore_ascii_case(ext)),
            _ => false,
        }
    }

    /// Decide a navigation to `path` given the current session flags.
    pub fn evaluate(&self, flags: SessionFlags, path: &str) -> Decision {
        let path = strip_query(path);
        if self.is_excluded(path) {
            return Decision::Allow;
        }

        let page = normalize(path);
        let decision = if page == LOGIN_PATH {
            match (flags.has_session, flags.is_locked) {
                (true, true) => Decision::Redirect(Redirect::LockScreen),
                (true, false) => Decision::Redirect(Redirect::Home),
                (false, _) => Decision::Allow,
            }
        } else if page == LOCK_SCREEN_PATH {
            if flags.has_session {
                Decision::Allow
            } else {
                Decision::Redirect(Redirect::Login)
            }
        } else if !flags.has_session {
            Decision::Redirect(Redirect::Login)
        } else if flags.is_locked {
            Decision::Redirect(Redirect::LockScreen)
        } else {
            Decision::Allow
        };

        if let Decision::Redirect(to) = decision {
            tracing::debug!(path = %path, to = to.path(), "navigation redirected");
        }
        decision
    }

    /// Capability check for a page the session is already allowed to reach.
    ///
    /// The first path segment is the route code; the page needs `read` on it.
    pub fn authorize_route(&self, ability: &Ability, path: &str) -> Decision {
        let path = strip_query(path);
        if self.is_excluded(path) {
            return Decision::Allow;
        }

        let code = route_code(path);
        if self.open_pages.iter().any(|p| p == code) || ability.can("read", code) {
            Decision::Allow
        } else {
            tracing::debug!(path = %path, route_code = %code, "route not permitted for role");
            Decision::Redirect(Redirect::NotAuthorized)
        }
    }
}

fn strip_query(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    &path[..end]
}

/// Drop trailing slashes, keeping the root as `/`.
fn normalize(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { HOME_PATH } else { trimmed }
}

/// First non-empty segment of `path` (`""` for the root).
pub fn route_code(path: &str) -> &str {
    path.split('/').find(|s| !s.is_empty()).unwrap_or_default()
}
