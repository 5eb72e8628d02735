//! Records served by the backend and the form payloads submitted back to it.
//!
//! Wire names are camelCase. Optional fields default when the backend omits
//! them, so a partially-filled record still decodes.

pub mod client;
pub mod device;
pub mod employee;
pub mod payment;
pub mod plan;
pub mod sector;
pub mod service;
pub mod supplier;
pub mod user;
pub mod warehouse;

pub use client::{Client, ClientForm, ClientStatus};
pub use device::{Device, DeviceForm, DeviceKind, DeviceStatus};
pub use employee::{Employee, EmployeeForm};
pub use payment::{Payment, PaymentForm, PaymentMethod, PaymentStatus};
pub use plan::{Plan, PlanForm};
pub use sector::{Sector, SectorForm};
pub use service::{Service, ServiceForm};
pub use supplier::{Supplier, SupplierForm};
pub use user::{CreateUser, UpdateUser, User};
pub use warehouse::{Warehouse, WarehouseForm};
