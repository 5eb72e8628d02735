use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use hemmy_core::Resource;
use hemmy_core::id::RoleId;

use crate::permissions::{Permission, lenient_bool, lenient_string};

/// A role and the ordered permissions it carries.
///
/// `allow_all` short-circuits evaluation: the role may do anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[serde(default)]
    pub id: RoleId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub allow_all: bool,
    #[serde(default, deserialize_with = "lenient_permissions")]
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// A role that is granted everything.
    pub fn superuser(name: impl Into<String>) -> Self {
        Self {
            allow_all: true,
            ..Self::new(name)
        }
    }

    pub fn with_permission(mut self, permission: Permission) -> Self {
        self.permissions.push(permission);
        self
    }
}

impl Resource for Role {
    type Id = RoleId;

    const PATH: &'static str = "/roles";
    const ROUTE_CODE: &'static str = "roles";

    fn id(&self) -> RoleId {
        self.id
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.name)
    }
}

fn lenient_permissions<'de, D>(deserializer: D) -> Result<Vec<Permission>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_permissions(&value))
}

/// Decode a permission list, dropping entries that are not objects.
pub fn decode_permissions(value: &Value) -> Vec<Permission> {
    match value {
        Value::Array(items) => items.iter().filter_map(Permission::from_value).collect(),
        Value::String(text) => match serde_json::from_str::<Value>(text) {
            Ok(inner @ Value::Array(_)) => decode_permissions(&inner),
            _ => {
                tracing::warn!("role permissions are not a JSON array; treating as empty");
                Vec::new()
            }
        },
        Value::Null => Vec::new(),
        _ => {
            tracing::warn!("unexpected role permissions shape; treating as empty");
            Vec::new()
        }
    }
}
