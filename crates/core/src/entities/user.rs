//! System users (accounts that log in), distinct from employees.

use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::{RoleId, UserId};
use crate::validation::{FormCheck, Validate, ValidationErrors};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role_id: Option<RoleId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Resource for User {
    type Id = UserId;

    const PATH: &'static str = "/users";
    const ROUTE_CODE: &'static str = "users";

    fn id(&self) -> UserId {
        self.id
    }
}

/// Payload for creating an account; the password is mandatory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub email: Option<String>,
    pub password: String,
    pub role_id: Option<RoleId>,
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        FormCheck::new()
            .required("name", &self.name)
            .required("username", &self.username)
            .min_len("username", &self.username, 3)
            .email_opt("email", self.email.as_deref())
            .min_len("password", &self.password, MIN_PASSWORD_LEN)
            .check("roleId", self.role_id.is_some(), "is required")
            .finish()
    }
}

/// Payload for editing an account; an absent password keeps the current one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    pub name: String,
    pub username: String,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub role_id: Option<RoleId>,
    pub is_active: bool,
}

impl Validate for UpdateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut check = FormCheck::new();
        check
            .required("name", &self.name)
            .required("username", &self.username)
            .email_opt("email", self.email.as_deref())
            .check("roleId", self.role_id.is_some(), "is required");
        if let Some(password) = self.password.as_deref() {
            check.min_len("password", password, MIN_PASSWORD_LEN);
        }
        check.finish()
    }
}
