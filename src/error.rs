//! Error handling types and utilities.

/// A specialized Result type for docsearch-ui operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()`
/// and `.with_context()` methods throughout the codebase. Typed errors at the
/// host boundary live in [`crate::host::HostError`].
pub type Result<T> = anyhow::Result<T>;
