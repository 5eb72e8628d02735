//! Client-side search, equality filters and pagination over in-memory lists.
//!
//! The search term is matched case-insensitively as a substring of any of a
//! record's searchable fields (OR). Equality filters must all hold (AND).
//! Pages are 1-based: page `n` is the slice `[(n-1)*size, n*size)`.

use serde::Serialize;

use hemmy_core::entities::{Client, ClientStatus, Device, Employee, Plan, Supplier, User};
use hemmy_core::id::{PlanId, RoleId, SectorId};

/// Fixed set of text fields a free-text search looks at.
pub trait Searchable {
    fn search_fields(&self) -> Vec<&str>;

    fn matches_search(&self, needle: &str) -> bool {
        let needle = needle.trim().to_lowercase();
        needle.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// A search term plus structured equality filters.
pub trait ItemFilter<T: Searchable> {
    fn search(&self) -> &str;

    /// Equality filters, AND-ed together.
    fn matches_fields(&self, item: &T) -> bool;

    fn matches(&self, item: &T) -> bool {
        item.matches_search(self.search()) && self.matches_fields(item)
    }

    /// Filtered records, in their original order.
    fn apply<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.matches(item)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

/// Slice one page out of `items`. Page numbers below 1 are treated as 1 and
/// a zero page size as 1.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Paginated<T> {
    let page = page.max(1);
    let page_size = page_size.max(1);
    let total = items.len();
    let start = (page - 1).saturating_mul(page_size).min(total);
    let end = start.saturating_add(page_size).min(total);

    Paginated {
        items: items[start..end].to_vec(),
        total,
        page,
        page_size,
        total_pages: total.div_ceil(page_size),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Searchable records
// ─────────────────────────────────────────────────────────────────────────────

impl Searchable for Employee {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.last_name.as_str(), self.dni.as_str()];
        fields.extend(self.email.as_deref());
        fields
    }
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.last_name.as_str(), self.dni.as_str()];
        fields.extend(self.phone.as_deref());
        fields.extend(self.address.as_deref());
        fields
    }
}

impl Searchable for Device {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.brand.as_str(), self.model.as_str(), self.serial_number.as_str()];
        fields.extend(self.mac_address.as_deref());
        fields
    }
}

impl Searchable for Plan {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.description.as_deref());
        fields
    }
}

impl Searchable for Supplier {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.business_name.as_str(), self.ruc.as_str()];
        fields.extend(self.contact_name.as_deref());
        fields
    }
}

impl Searchable for User {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str(), self.username.as_str()];
        fields.extend(self.email.as_deref());
        fields
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Filters
// ─────────────────────────────────────────────────────────────────────────────

/// Employee list filters: text search plus role.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeFilters {
    pub search: String,
    pub role_id: Option<RoleId>,
}

impl ItemFilter<Employee> for EmployeeFilters {
    fn search(&self) -> &str {
        &self.search
    }

    fn matches_fields(&self, item: &Employee) -> bool {
        self.role_id.is_none_or(|role| item.role_id == Some(role))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientFilters {
    pub search: String,
    pub status: Option<ClientStatus>,
    pub plan_id: Option<PlanId>,
    pub sector_id: Option<SectorId>,
}

impl ItemFilter<Client> for ClientFilters {
    fn search(&self) -> &str {
        &self.search
    }

    fn matches_fields(&self, item: &Client) -> bool {
        self.status.is_none_or(|s| item.status == s)
            && self.plan_id.is_none_or(|p| item.plan_id == Some(p))
            && self.sector_id.is_none_or(|s| item.sector_id == Some(s))
    }
}
