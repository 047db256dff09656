//! `securemsg-hostapi`: host-side interface and storage for the message
//! contract sandbox.
//!
//! - `HostApi` trait: the mirror of the guest's `HostInterface`
//! - `StateStore` trait: backend state storage abstraction
//! - `MemStore`: in-memory `StateStore` for tests and local runs
//! - `ExecutionConfig`: per-call resource limits
//! - `HostError`: host-side error type with `ErrorCode` conversion

pub mod error;
pub mod types;
pub mod state_store;
pub mod mem_store;
pub mod traits;

// Re-export commonly used types at the crate root.
pub use error::HostError;
pub use types::ExecutionConfig;
pub use state_store::StateStore;
pub use mem_store::MemStore;
pub use traits::HostApi;
