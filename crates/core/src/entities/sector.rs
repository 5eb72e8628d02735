use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::SectorId;
use crate::validation::{FormCheck, Validate, ValidationErrors};

/// Geographic sector clients are grouped into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub id: SectorId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl Resource for Sector {
    type Id = SectorId;

    const PATH: &'static str = "/sectors";
    const ROUTE_CODE: &'static str = "sectors";

    fn id(&self) -> SectorId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorForm {
    pub name: String,
    pub description: Option<String>,
}

impl Validate for SectorForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let description = self.description.as_deref().unwrap_or_default();
        FormCheck::new()
            .required("name", &self.name)
            .max_len("name", &self.name, 60)
            .max_len("description", description, 255)
            .finish()
    }
}
