//! Capability resolution: role → `(action, subject) -> bool`.
//!
//! Rules are compiled into a map from `(action, subject)` to a grant or a
//! denial. A denial for a pair always wins over a grant for the same pair,
//! whichever permission declared it first. Pairs with no rule are denied.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use hemmy_core::Resource;

use crate::roles::Role;

// ─────────────────────────────────────────────────────────────────────────────
// Subject
// ─────────────────────────────────────────────────────────────────────────────

/// The thing an action applies to, normally a route code.
///
/// Built from a bare identifier or from a tagged JSON object carrying a
/// `type` field; both spellings of the same identifier compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Subject(Cow<'static, str>);

impl Subject {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// Subject of the screens managing resource `R`.
    pub fn of<R: Resource>() -> Self {
        Self(Cow::Borrowed(R::ROUTE_CODE))
    }

    /// Read the subject from a tagged object's `type` field, or from the
    /// value itself when there is none.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self(Cow::Owned(s.clone())),
            Value::Object(map) => match map.get("type") {
                Some(Value::String(kind)) => Self(Cow::Owned(kind.clone())),
                _ => Self(Cow::Owned(value.to_string())),
            },
            other => Self(Cow::Owned(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Subject {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Subject {
    fn from(value: &str) -> Self {
        Self(Cow::Owned(value.to_string()))
    }
}

impl From<String> for Subject {
    fn from(value: String) -> Self {
        Self(Cow::Owned(value))
    }
}

impl From<&String> for Subject {
    fn from(value: &String) -> Self {
        Self(Cow::Owned(value.clone()))
    }
}

impl From<&Value> for Subject {
    fn from(value: &Value) -> Self {
        Self::from_value(value)
    }
}

impl From<&Subject> for Subject {
    fn from(value: &Subject) -> Self {
        value.clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ability
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rule {
    Granted,
    Denied,
}

/// Compiled capability predicate for one role snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ability {
    allow_all: bool,
    rules: HashMap<(String, String), Rule>,
}

impl Ability {
    /// Capability set that denies everything (no identity yet).
    pub fn deny_all() -> Self {
        Self::default()
    }

    pub fn allow_all() -> Self {
        Self {
            allow_all: true,
            rules: HashMap::new(),
        }
    }

    /// Compile a role's permissions.
    ///
    /// Never fails: malformed permissions were already reduced to empty sets
    /// when the role was decoded, and entries without a route code are skipped.
    pub fn resolve(role: &Role) -> Self {
        if role.allow_all {
            tracing::debug!(role = %role.name, "role grants all capabilities");
            return Self::allow_all();
        }

        let mut ability = Self::deny_all();
        for permission in &role.permissions {
            let subject = permission.route_code.trim();
            if subject.is_empty() {
                tracing::warn!(role = %role.name, "skipping permission without route code");
                continue;
            }
            for action in &permission.actions {
                ability.grant(action, subject);
            }
            for restriction in &permission.restrictions {
                ability.deny(restriction, subject);
            }
        }

        tracing::debug!(role = %role.name, rules = ability.rules.len(), "resolved role capabilities");
        ability
    }

    fn grant(&mut self, action: &str, subject: &str) {
        self.rules
            .entry((action.to_string(), subject.to_string()))
            .or_insert(Rule::Granted);
    }

    fn deny(&mut self, action: &str, subject: &str) {
        self.rules
            .insert((action.to_string(), subject.to_string()), Rule::Denied);
    }

    fn lookup(&self, action: &str, subject: &str) -> Option<Rule> {
        self.rules
            .get(&(action.to_string(), subject.to_string()))
            .copied()
    }

    pub fn can(&self, action: &str, subject: impl Into<Subject>) -> bool {
        if self.allow_all {
            return true;
        }
        let subject = subject.into();
        self.lookup(action, subject.as_str()) == Some(Rule::Granted)
    }

    pub fn cannot(&self, action: &str, subject: impl Into<Subject>) -> bool {
        !self.can(action, subject)
    }

    pub fn is_allow_all(&self) -> bool {
        self.allow_all
    }

    /// Subjects for which `action` is granted, sorted.
    pub fn subjects_with(&self, action: &str) -> Vec<&str> {
        let mut subjects: Vec<&str> = self
            .rules
            .iter()
            .filter(|((a, _), rule)| a == action && **rule == Rule::Granted)
            .map(|((_, s), _)| s.as_str())
            .collect();
        subjects.sort_unstable();
        subjects
    }

    /// Explain why `can(action, subject)` answers the way it does.
    pub fn explain(&self, action: &str, subject: impl Into<Subject>) -> Explanation {
        let subject = subject.into();
        let reason = if self.allow_all {
            Reason::AllowAll
        } else {
            match self.lookup(action, subject.as_str()) {
                Some(Rule::Granted) => Reason::Granted,
                Some(Rule::Denied) => Reason::Restricted,
                None => Reason::NoRule,
            }
        };

        Explanation {
            action: action.to_string(),
            granted: matches!(reason, Reason::AllowAll | Reason::Granted),
            subject,
            reason,
        }
    }
}

impl From<&Role> for Ability {
    fn from(role: &Role) -> Self {
        Self::resolve(role)
    }
}

/// Why a capability check was decided the way it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// The role has `allowAll`.
    AllowAll,
    /// A permission lists the action.
    Granted,
    /// A permission restricts the action.
    Restricted,
    /// Nothing mentions this pair.
    NoRule,
}

/// Auditable answer to "may this role do X on Y?".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Explanation {
    pub action: String,
    pub subject: Subject,
    pub granted: bool,
    pub reason: Reason,
}
