//! Process-wide tracing setup shared by the Hemmy binaries.

/// Initialize tracing with the default filter (`RUST_LOG`, else `info`).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init("info");
}

/// Tracing configuration (filters, layers).
pub mod tracing;
