//! `securemsg-engine`: the secure-chain message contract.
//!
//! A persistent key/value store of text messages behind three entry points:
//! `Init` (liveness probe), `CreateMsg` (upsert) and `GetMsg` (read).
//!
//! ## Architecture
//!
//! - [`host::HostInterface`]: trait abstracting host calls (state, logs, return value)
//! - [`host::MockHost`]: in-memory implementation for testing
//! - [`contract`]: namespaced state handle, contract instance, execution scope
//! - [`entry`]: the entry points
//! - [`executor::ContractExecutor`]: dispatch by entry point and respond

pub mod host;
pub mod contract;
pub mod entry;
pub mod executor;

// Re-export key types for convenience
pub use contract::{ContractConfig, ContractScope, ContractState, MessageContract};
pub use executor::ContractExecutor;
pub use host::{HostInterface, MockHost};
