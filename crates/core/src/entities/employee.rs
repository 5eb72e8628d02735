use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::{EmployeeId, RoleId};
use crate::validation::{FormCheck, Validate, ValidationErrors};

/// Employee read model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: EmployeeId,
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub role_id: Option<RoleId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Resource for Employee {
    type Id = EmployeeId;

    const PATH: &'static str = "/employees";
    const ROUTE_CODE: &'static str = "employees";

    fn id(&self) -> EmployeeId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeForm {
    pub name: String,
    pub last_name: String,
    pub dni: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub role_id: Option<RoleId>,
}

impl Validate for EmployeeForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        FormCheck::new()
            .required("name", &self.name)
            .required("lastName", &self.last_name)
            .digits("dni", &self.dni, 8)
            .email_opt("email", self.email.as_deref())
            .digits_opt("phone", self.phone.as_deref(), 9)
            .check("roleId", self.role_id.is_some(), "is required")
            .finish()
    }
}
