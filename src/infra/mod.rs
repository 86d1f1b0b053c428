//! Infrastructure Layer
//!
//! In-memory collaborator implementations.

pub mod memory;

// Re-exports
pub use memory::{MemoryCookieJar, MemoryRecord, MemoryRecordStore};
