use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::ServiceId;
use crate::validation::{FormCheck, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: ServiceId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

impl Resource for Service {
    type Id = ServiceId;

    const PATH: &'static str = "/services";
    const ROUTE_CODE: &'static str = "services";

    fn id(&self) -> ServiceId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceForm {
    pub name: String,
    pub description: Option<String>,
}

impl Validate for ServiceForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        FormCheck::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 60)
            .finish()
    }
}
