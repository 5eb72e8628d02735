use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::WarehouseId;
use crate::validation::{FormCheck, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub id: WarehouseId,
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub capacity: Option<i64>,
}

impl Resource for Warehouse {
    type Id = WarehouseId;

    const PATH: &'static str = "/warehouses";
    const ROUTE_CODE: &'static str = "warehouses";

    fn id(&self) -> WarehouseId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarehouseForm {
    pub name: String,
    pub location: String,
    pub description: Option<String>,
    pub capacity: Option<i64>,
}

impl Validate for WarehouseForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut check = FormCheck::new();
        check.required("name", &self.name).required("location", &self.location);
        if let Some(capacity) = self.capacity {
            check.positive_int("capacity", capacity);
        }
        check.finish()
    }
}
