//! `hemmy-core`: records and form contracts shared by every Hemmy crate.
//!
//! This crate has no IO: it describes the entities the backend serves, the
//! identifiers they carry, and the validation rules applied to create/update
//! payloads before they are submitted.

pub mod entities;
pub mod entity;
pub mod error;
pub mod id;
pub mod validation;

pub use entity::Resource;
pub use error::{DomainError, DomainResult};
pub use validation::{FormCheck, Validate, ValidationErrors};
