//! `hemmy-auth`: pure access-control boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: it turns role
//! data into capability checks, models the session cookies, and decides
//! navigation redirects. Callers supply the cookie header and the profile.

pub mod ability;
pub mod cookies;
pub mod guard;
pub mod permissions;
pub mod roles;
pub mod session;

pub use ability::{Ability, Explanation, Reason, Subject};
pub use cookies::{AUTH_COOKIE, LOCK_COOKIE, SessionFlags};
pub use guard::{Decision, Redirect, RouteGuard};
pub use permissions::Permission;
pub use roles::Role;
pub use session::{Identity, SessionError, SessionStore};
