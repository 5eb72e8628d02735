//! Route permissions as served by the backend.
//!
//! The backend is not consistent about the shape of `actions` and
//! `restrictions`: they arrive as JSON arrays, as JSON text holding an array,
//! or as garbage. Decoding never fails on them; anything unreadable becomes
//! the empty set so a broken entry grants nothing.

use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use hemmy_core::Resource;
use hemmy_core::id::PermissionId;

/// Grants and restrictions a role holds over one route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[serde(default)]
    pub id: PermissionId,
    /// Capability subject identifier (e.g. `"clients"`).
    #[serde(default, deserialize_with = "lenient_string")]
    pub route_code: String,
    #[serde(default, deserialize_with = "lenient_set")]
    pub actions: BTreeSet<String>,
    #[serde(default, deserialize_with = "lenient_set")]
    pub restrictions: BTreeSet<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_sub_route: bool,
}

impl Permission {
    pub fn new(route_code: impl Into<String>) -> Self {
        Self {
            route_code: route_code.into(),
            ..Self::default()
        }
    }

    pub fn with_actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions.extend(actions.into_iter().map(Into::into));
        self
    }

    pub fn with_restrictions<I, S>(mut self, restrictions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.restrictions
            .extend(restrictions.into_iter().map(Into::into));
        self
    }

    /// Decode a single permission from an arbitrary JSON value.
    ///
    /// Returns `None` only when the value is not an object at all.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Object(_) => match Permission::deserialize(value) {
                Ok(permission) => Some(permission),
                Err(err) => {
                    tracing::warn!(error = %err, "dropping undecodable permission entry");
                    None
                }
            },
            Value::String(text) => serde_json::from_str::<Value>(text)
                .ok()
                .filter(Value::is_object)
                .and_then(|inner| Permission::from_value(&inner)),
            _ => None,
        }
    }
}

impl Resource for Permission {
    type Id = PermissionId;

    const PATH: &'static str = "/permissions";
    const ROUTE_CODE: &'static str = "permissions";

    fn id(&self) -> PermissionId {
        self.id
    }
}

/// Read a set of strings from whatever shape the backend sent.
pub fn decode_string_set(value: &Value) -> BTreeSet<String> {
    match value {
        Value::Null => BTreeSet::new(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        Value::String(text) if text.trim().is_empty() => BTreeSet::new(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner @ Value::Array(_)) => decode_string_set(&inner),
            Ok(_) | Err(_) => {
                tracing::warn!(raw = %text, "permission set is not a JSON array; treating as empty");
                BTreeSet::new()
            }
        },
        other => {
            tracing::warn!(raw = %other, "unexpected permission set shape; treating as empty");
            BTreeSet::new()
        }
    }
}

fn lenient_set<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_string_set(&value))
}

pub(crate) fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    })
}

/// Display text that may arrive as `null` or as a number.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => {
            tracing::warn!(raw = %other, "expected text; treating as empty");
            String::new()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn decodes_plain_arrays() {
        let p: Permission = serde_json::from_value(json!({
            "routeCode": "clients",
            "actions": ["read", "update"],
            "restrictions": ["update"],
            "isSubRoute": false
        }))
        .unwrap();
        assert_eq!(p.route_code, "clients");
        assert_eq!(p.actions, set(&["read", "update"]));
        assert_eq!(p.restrictions, set(&["update"]));
    }

    #[test]
    fn decodes_stringified_arrays() {
        let p: Permission = serde_json::from_value(json!({
            "routeCode": "plans",
            "actions": "[\"read\",\"create\"]",
            "restrictions": "[]",
            "isSubRoute": "true"
        }))
        .unwrap();
        assert_eq!(p.actions, set(&["create", "read"]));
        assert!(p.restrictions.is_empty());
        assert!(p.is_sub_route);
    }

    #[test]
    fn malformed_sets_become_empty() {
        let p: Permission = serde_json::from_value(json!({
            "routeCode": "sectors",
            "actions": "read,update",
            "restrictions": 42
        }))
        .unwrap();
        assert!(p.actions.is_empty());
        assert!(p.restrictions.is_empty());
    }

    #[test]
    fn non_string_items_are_skipped() {
        assert_eq!(decode_string_set(&json!(["read", 7, null, " ", "delete"])), set(&["delete", "read"]));
    }

    #[test]
    fn from_value_accepts_stringified_objects() {
        let raw = json!("{\"routeCode\":\"users\",\"actions\":[\"read\"]}");
        let p = Permission::from_value(&raw).unwrap();
        assert_eq!(p.route_code, "users");
        assert!(Permission::from_value(&json!(12)).is_none());
    }
}
