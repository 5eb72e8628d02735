//! `hemmy-client`
//!
//! **Responsibility:** the data side of the Hemmy front-end.
//!
//! This crate provides:
//! - An API client that carries the session's bearer token
//! - One shared list cache per entity type, with subscribe/refresh
//! - Client-side search, equality filters and pagination
//! - User notifications for failures that must not propagate
//!
//! The backend remains the authority; caches are disposable.

pub mod api;
pub mod config;
pub mod decode;
pub mod filter;
pub mod listing;
pub mod listings;
pub mod notify;

pub use api::{ApiClient, ApiError, HttpApiClient};
pub use config::{ClientConfig, ConfigError};
pub use decode::Page;
pub use filter::{ClientFilters, EmployeeFilters, ItemFilter, Paginated, Searchable, paginate};
pub use listing::{ListSnapshot, ListStore, Subscription};
pub use listings::Listings;
pub use notify::{Level, Notifier, TracingNotifier};
