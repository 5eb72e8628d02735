use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::{ClientId, PlanId, SectorId};
use crate::validation::{FormCheck, Validate, ValidationErrors};

/// Service status of a client account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ClientStatus {
    #[default]
    Active,
    Suspended,
    Inactive,
}

/// Client read model (matches API response shape).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub dni: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub sector_id: Option<SectorId>,
    #[serde(default)]
    pub plan_id: Option<PlanId>,
    #[serde(default)]
    pub status: ClientStatus,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name).trim().to_string()
    }
}

impl Resource for Client {
    type Id = ClientId;

    const PATH: &'static str = "/clients";
    const ROUTE_CODE: &'static str = "clients";

    fn id(&self) -> ClientId {
        self.id
    }
}

/// Create/update payload for a client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientForm {
    pub name: String,
    pub last_name: String,
    pub dni: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: String,
    pub reference: Option<String>,
    pub sector_id: Option<SectorId>,
    pub plan_id: Option<PlanId>,
}

impl Validate for ClientForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        FormCheck::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 100)
            .required("lastName", &self.last_name)
            .max_len("lastName", &self.last_name, 100)
            .digits("dni", &self.dni, 8)
            .digits_opt("phone", self.phone.as_deref(), 9)
            .email_opt("email", self.email.as_deref())
            .required("address", &self.address)
            .check("sectorId", self.sector_id.is_some(), "is required")
            .check("planId", self.plan_id.is_some(), "is required")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> ClientForm {
        ClientForm {
            name: "Ana".to_string(),
            last_name: "Lopez".to_string(),
            dni: "12345678".to_string(),
            phone: Some("987654321".to_string()),
            email: None,
            address: "Jr. Amazonas 120".to_string(),
            reference: None,
            sector_id: Some(SectorId::new(1)),
            plan_id: Some(PlanId::new(2)),
        }
    }

    #[test]
    fn valid_client_form_passes() {
        assert!(valid_form().validate().is_ok());
    }

    #[test]
    fn invalid_client_form_reports_fields() {
        let form = ClientForm {
            dni: "1234567A".to_string(),
            phone: Some("12".to_string()),
            plan_id: None,
            ..valid_form()
        };
        let errors = form.validate().unwrap_err();
        assert!(errors.has("dni"));
        assert!(errors.has("phone"));
        assert!(errors.has("planId"));
        assert!(!errors.has("name"));
    }

    #[test]
    fn decodes_sparse_record() {
        let client: Client = serde_json::from_value(serde_json::json!({
            "id": 3,
            "name": "Bob",
            "status": "suspended"
        }))
        .unwrap();
        assert_eq!(client.id, ClientId::new(3));
        assert_eq!(client.status, ClientStatus::Suspended);
        assert_eq!(client.full_name(), "Bob");
        assert!(client.plan_id.is_none());
    }
}
