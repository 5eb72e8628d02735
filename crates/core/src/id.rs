//! Strongly-typed identifiers used across the domain.
//!
//! The backend keys every record with a positive integer; the newtypes keep a
//! `ClientId` from being passed where a `PlanId` is expected.

use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DomainError;

#[derive(Deserialize)]
#[serde(untagged)]
enum WireId {
    Number(i64),
    Text(String),
}

macro_rules! numeric_id {
    ($(#[$meta:meta])* $t:ident, $name:literal) => {
        $(#[$meta])*
        #[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
        #[serde(transparent)]
        pub struct $t(i64);

        impl $t {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }

        /// Accepts a JSON number or a numeric string (`4` or `"4"`).
        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                match WireId::deserialize(deserializer)? {
                    WireId::Number(value) => Ok(Self(value)),
                    WireId::Text(text) => text.parse().map_err(serde::de::Error::custom),
                }
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s
                    .trim()
                    .parse::<i64>()
                    .map_err(|e| DomainError::invalid_id(format!("{}: {}", $name, e)))?;
                Ok(Self(value))
            }
        }
    };
}

numeric_id!(ClientId, "ClientId");
numeric_id!(DeviceId, "DeviceId");
numeric_id!(EmployeeId, "EmployeeId");
numeric_id!(PaymentId, "PaymentId");
numeric_id!(PlanId, "PlanId");
numeric_id!(SectorId, "SectorId");
numeric_id!(ServiceId, "ServiceId");
numeric_id!(SupplierId, "SupplierId");
numeric_id!(WarehouseId, "WarehouseId");
numeric_id!(UserId, "UserId");
numeric_id!(RoleId, "RoleId");
numeric_id!(PermissionId, "PermissionId");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_trimmed_integers() {
        let id: PlanId = " 42 ".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn rejects_non_numeric_ids() {
        let err = "abc".parse::<ClientId>().unwrap_err();
        match err {
            DomainError::InvalidId(msg) => assert!(msg.starts_with("ClientId")),
            other => panic!("expected InvalidId, got {other:?}"),
        }
    }

    #[test]
    fn decodes_numbers_and_numeric_strings() {
        let ids: Vec<RoleId> = serde_json::from_value(serde_json::json!([4, "5", " 6 "])).unwrap();
        assert_eq!(ids, vec![RoleId::new(4), RoleId::new(5), RoleId::new(6)]);

        let err = serde_json::from_value::<RoleId>(serde_json::json!("admin")).unwrap_err();
        assert!(err.to_string().contains("RoleId"));
        assert!(serde_json::from_value::<RoleId>(serde_json::json!(true)).is_err());
    }

    #[test]
    fn serializes_as_bare_number() {
        let json = serde_json::to_value(RoleId::new(7)).unwrap();
        assert_eq!(json, serde_json::json!(7));
    }
}
