//! Resource trait: how a record type is addressed on the backend.

use serde::de::DeserializeOwned;

/// A record type served by the REST API as a list.
///
/// `PATH` is relative to the API base URL; `ROUTE_CODE` is the subject used
/// by the ability resolver for screens that manage this record.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Strongly-typed record identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    const PATH: &'static str;
    const ROUTE_CODE: &'static str;

    /// Returns the record identifier.
    fn id(&self) -> Self::Id;
}
