use serde::{Deserialize, Serialize};

use crate::entity::Resource;
use crate::id::{ClientId, DeviceId, WarehouseId};
use crate::validation::{FormCheck, Validate, ValidationErrors};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceKind {
    Router,
    Onu,
    Antenna,
    Switch,
    #[default]
    #[serde(other)]
    Other,
}

/// Lifecycle of a device: in stock, installed at a client, or out of service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Available,
    Assigned,
    Damaged,
    Retired,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub serial_number: String,
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: DeviceKind,
    #[serde(default)]
    pub status: DeviceStatus,
    #[serde(default)]
    pub client_id: Option<ClientId>,
    #[serde(default)]
    pub warehouse_id: Option<WarehouseId>,
}

impl Resource for Device {
    type Id = DeviceId;

    const PATH: &'static str = "/devices";
    const ROUTE_CODE: &'static str = "devices";

    fn id(&self) -> DeviceId {
        self.id
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceForm {
    pub brand: String,
    pub model: String,
    pub serial_number: String,
    pub mac_address: Option<String>,
    #[serde(rename = "type")]
    pub kind: DeviceKind,
    pub status: DeviceStatus,
    pub client_id: Option<ClientId>,
    pub warehouse_id: Option<WarehouseId>,
}

impl Validate for DeviceForm {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mac_ok = self
            .mac_address
            .as_deref()
            .map(|mac| mac.trim().is_empty() || is_mac_address(mac.trim()))
            .unwrap_or(true);

        FormCheck::new()
            .required("brand", &self.brand)
            .required("model", &self.model)
            .required("serialNumber", &self.serial_number)
            .check("macAddress", mac_ok, "must look like AA:BB:CC:DD:EE:FF")
            // An installed device must point at the client holding it.
            .check(
                "clientId",
                self.status != DeviceStatus::Assigned || self.client_id.is_some(),
                "is required for assigned devices",
            )
            .finish()
    }
}

fn is_mac_address(value: &str) -> bool {
    let parts: Vec<&str> = value.split([':', '-']).collect();
    parts.len() == 6
        && parts
            .iter()
            .all(|p| p.len() == 2 && p.bytes().all(|b| b.is_ascii_hexdigit()))
}
