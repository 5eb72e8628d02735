//! Session store: current identity, bearer token, and derived capabilities.
//!
//! Identity lifecycle:
//! - created by [`SessionStore::login`]
//! - replaced by [`SessionStore::refresh_profile`]
//! - cleared by [`SessionStore::logout`] or [`SessionStore::handle_unauthorized`]
//!
//! The compiled [`Ability`] is cached and recomputed only when the role
//! changes, so readers can call [`SessionStore::ability`] freely.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use hemmy_core::id::UserId;

use crate::ability::Ability;
use crate::cookies::{self, AUTH_COOKIE, LOCK_COOKIE, SessionFlags};
use crate::permissions::lenient_string;
use crate::roles::Role;

/// The authenticated user as returned by `GET /auth/profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: UserId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_role")]
    pub role: Role,
}

/// `"role": null` means no role, which grants nothing.
fn null_role<'de, D>(deserializer: D) -> Result<Role, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Role>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("token is empty")]
    EmptyToken,

    #[error("token contains characters not allowed in a cookie")]
    InvalidToken,
}

#[derive(Debug)]
struct SessionState {
    token: Option<String>,
    identity: Option<Identity>,
    ability: Arc<Ability>,
    locked: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            token: None,
            identity: None,
            ability: Arc::new(Ability::deny_all()),
            locked: false,
        }
    }
}

/// Explicit, injectable session holder. Cheap to share behind an `Arc`.
#[derive(Debug, Default)]
pub struct SessionStore {
    state: RwLock<SessionState>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore the token and lock flag from a `Cookie` header.
    ///
    /// The identity is not persisted; callers fetch the profile afterwards.
    pub fn from_cookie_header(header: &str) -> Self {
        let store = Self::new();
        {
            let mut state = store.write();
            state.token = cookies::cookie_value(header, AUTH_COOKIE)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            state.locked = cookies::cookie_value(header, LOCK_COOKIE) == Some("true");
        }
        store
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }

    /// Start a session. Returns the `Set-Cookie` value to persist the token.
    pub fn login(
        &self,
        token: impl Into<String>,
        identity: Identity,
        now: DateTime<Utc>,
    ) -> Result<String, SessionError> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(SessionError::EmptyToken);
        }
        if !cookies::is_cookie_safe(&token) {
            return Err(SessionError::InvalidToken);
        }

        let cookie = cookies::auth_cookie(&token, now);
        let mut state = self.write();
        tracing::info!(user_id = %identity.id, role = %identity.role, "session started");
        state.ability = Arc::new(Ability::resolve(&identity.role));
        state.identity = Some(identity);
        state.token = Some(token);
        Ok(cookie)
    }

    /// Replace the identity with a freshly fetched profile.
    ///
    /// Ignored when there is no token: a profile response that lands after
    /// logout must not resurrect the session.
    pub fn refresh_profile(&self, identity: Identity) {
        let mut state = self.write();
        if state.token.is_none() {
            tracing::warn!(user_id = %identity.id, "discarding profile received without a session");
            return;
        }

        let role_changed = state
            .identity
            .as_ref()
            .is_none_or(|current| current.role != identity.role);
        if role_changed {
            tracing::debug!(role = %identity.role, "role changed; recomputing capabilities");
            state.ability = Arc::new(Ability::resolve(&identity.role));
        }
        state.identity = Some(identity);
    }

    /// End the session. Returns the `Set-Cookie` values clearing both cookies.
    pub fn logout(&self) -> [String; 2] {
        let mut state = self.write();
        if let Some(identity) = &state.identity {
            tracing::info!(user_id = %identity.id, "session ended");
        }
        *state = SessionState::default();
        [
            cookies::clear_cookie(AUTH_COOKIE),
            cookies::clear_cookie(LOCK_COOKIE),
        ]
    }

    /// A request came back 401: the token is dead. Never retried.
    pub fn handle_unauthorized(&self) -> [String; 2] {
        tracing::warn!("backend rejected the session token; clearing session");
        self.logout()
    }

    /// Pick up an externally toggled lock flag from a fresh `Cookie` header.
    pub fn observe_cookies(&self, header: &str) {
        let locked = cookies::cookie_value(header, LOCK_COOKIE) == Some("true");
        self.write().locked = locked;
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.read().identity.clone()
    }

    pub fn ability(&self) -> Arc<Ability> {
        Arc::clone(&self.read().ability)
    }

    pub fn flags(&self) -> SessionFlags {
        let state = self.read();
        SessionFlags {
            has_session: state.token.is_some(),
            is_locked: state.locked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permissions::Permission;

    fn identity(role: Role) -> Identity {
        Identity {
            id: UserId::new(1),
            name: "Ana Lopez".into(),
            username: "alopez".into(),
            email: None,
            role,
        }
    }

    #[test]
    fn profile_decoding_tolerates_sloppy_fields() {
        let identity: Identity = serde_json::from_value(serde_json::json!({
            "id": "12",
            "name": null,
            "username": 3048,
            "role": { "id": "2", "name": null, "allowAll": "true" }
        }))
        .unwrap();
        assert_eq!(identity.id, UserId::new(12));
        assert_eq!(identity.name, "");
        assert_eq!(identity.username, "3048");
        assert!(identity.role.allow_all);

        let identity: Identity =
            serde_json::from_value(serde_json::json!({ "id": 5, "name": "Ana", "role": null })).unwrap();
        assert_eq!(identity.role, Role::default());
    }

    fn reader() -> Role {
        Role::new("Lectura").with_permission(Permission::new("clients").with_actions(["read"]))
    }

    #[test]
    fn login_sets_token_identity_and_ability() {
        let store = SessionStore::new();
        assert!(store.ability().cannot("read", "clients"));

        let cookie = store.login("tok-1", identity(reader()), Utc::now()).unwrap();
        assert!(cookie.starts_with("grupo_hemmy_auth=tok-1;"));
        assert_eq!(store.token().as_deref(), Some("tok-1"));
        assert!(store.ability().can("read", "clients"));
        assert!(store.flags().has_session);
    }

    #[test]
    fn rejects_unusable_tokens() {
        let store = SessionStore::new();
        assert_eq!(
            store.login("  ", identity(reader()), Utc::now()),
            Err(SessionError::EmptyToken)
        );
        assert_eq!(
            store.login("a;b", identity(reader()), Utc::now()),
            Err(SessionError::InvalidToken)
        );
        assert!(store.identity().is_none());
    }

    #[test]
    fn profile_refresh_recomputes_only_on_role_change() {
        let store = SessionStore::new();
        store.login("tok", identity(reader()), Utc::now()).unwrap();
        let before = store.ability();

        let mut renamed = identity(reader());
        renamed.name = "Ana María Lopez".into();
        store.refresh_profile(renamed);
        assert!(Arc::ptr_eq(&before, &store.ability()));
        assert_eq!(store.identity().unwrap().name, "Ana María Lopez");

        store.refresh_profile(identity(Role::superuser("Admin")));
        assert!(!Arc::ptr_eq(&before, &store.ability()));
        assert!(store.ability().can("delete", "warehouses"));
    }

    #[test]
    fn late_profile_after_logout_is_ignored() {
        let store = SessionStore::new();
        store.login("tok", identity(reader()), Utc::now()).unwrap();
        store.logout();
        store.refresh_profile(identity(Role::superuser("Admin")));
        assert!(store.identity().is_none());
        assert!(store.ability().cannot("read", "clients"));
    }

    #[test]
    fn unauthorized_clears_everything() {
        let store = SessionStore::from_cookie_header("grupo_hemmy_auth=tok; is_locked=true");
        assert_eq!(store.flags(), SessionFlags { has_session: true, is_locked: true });

        let cleared = store.handle_unauthorized();
        assert!(cleared[0].starts_with("grupo_hemmy_auth=;"));
        assert!(cleared[1].starts_with("is_locked=;"));
        assert_eq!(store.flags(), SessionFlags::ANONYMOUS);
        assert!(store.token().is_none());
    }

    #[test]
    fn lock_flag_follows_cookies() {
        let store = SessionStore::from_cookie_header("grupo_hemmy_auth=tok");
        assert!(!store.flags().is_locked);
        store.observe_cookies("grupo_hemmy_auth=tok; is_locked=true");
        assert!(store.flags().is_locked);
    }
}
