//! One shared [`ListStore`] per entity type.
//!
//! Components that render the same entity list share the store through this
//! registry, which is created once and passed around explicitly.

use std::sync::Arc;

use hemmy_auth::{Permission, Role};
use hemmy_core::entities::{
    Client, Device, Employee, Payment, Plan, Sector, Service, Supplier, User, Warehouse,
};

use crate::listing::ListStore;

#[derive(Debug, Default, Clone)]
pub struct Listings {
    pub clients: Arc<ListStore<Client>>,
    pub devices: Arc<ListStore<Device>>,
    pub employees: Arc<ListStore<Employee>>,
    pub payments: Arc<ListStore<Payment>>,
    pub plans: Arc<ListStore<Plan>>,
    pub sectors: Arc<ListStore<Sector>>,
    pub services: Arc<ListStore<Service>>,
    pub suppliers: Arc<ListStore<Supplier>>,
    pub warehouses: Arc<ListStore<Warehouse>>,
    pub users: Arc<ListStore<User>>,
    pub roles: Arc<ListStore<Role>>,
    pub permissions: Arc<ListStore<Permission>>,
}

impl Listings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every cached list, e.g. after logout.
    pub fn clear(&self) {
        self.clients.clear();
        self.devices.clear();
        self.employees.clear();
        self.payments.clear();
        self.plans.clear();
        self.sectors.clear();
        self.services.clear();
        self.suppliers.clear();
        self.warehouses.clear();
        self.users.clear();
        self.roles.clear();
        self.permissions.clear();
        tracing::debug!("cleared all list caches");
    }
}
