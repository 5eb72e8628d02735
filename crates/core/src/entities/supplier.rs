use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::SupplierId;
use crate::validation::{FormCheck, Validate, ValidationErrors};

/// Supplier read model. `ruc` is the 11-digit taxpayer number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: SupplierId,
    pub business_name: String,
    #[serde(default)]
    pub ruc: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl Resource for Supplier {
    type Id = SupplierId;

    const PATH: &'static str = "/suppliers";
    const ROUTE_CODE: &'static str = "suppliers";

    fn id(&self) -> SupplierId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierForm {
    pub business_name: String,
    pub ruc: String,
    pub contact_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl Validate for SupplierForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        FormCheck::new()
            .required("businessName", &self.business_name)
            .digits("ruc", &self.ruc, 11)
            .digits_opt("phone", self.phone.as_deref(), 9)
            .email_opt("email", self.email.as_deref())
            .finish()
    }
}
