use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::{PlanId, ServiceId};
use crate::validation::{FormCheck, Validate, ValidationErrors};

/// Internet plan offered to clients. `speed` is in Mbps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub speed: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub service_id: Option<ServiceId>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Resource for Plan {
    type Id = PlanId;

    const PATH: &'static str = "/plans";
    const ROUTE_CODE: &'static str = "plans";

    fn id(&self) -> PlanId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanForm {
    pub name: String,
    pub description: Option<String>,
    pub speed: i64,
    pub price: f64,
    pub service_id: Option<ServiceId>,
}

impl Validate for PlanForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        FormCheck::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 80)
            .positive_int("speed", self.speed)
            .positive("price", self.price)
            .check("serviceId", self.service_id.is_some(), "is required")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_form_rules() {
        let ok = PlanForm {
            name: "Fibra 100".into(),
            description: None,
            speed: 100,
            price: 59.9,
            service_id: Some(ServiceId::new(1)),
        };
        assert!(ok.validate().is_ok());

        let errors = PlanForm::default().validate().unwrap_err();
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["name", "price", "serviceId", "speed"]
        );
    }
}
