//! `securemsg-sandbox`: Wasmtime-based host for the message contract.
//!
//! This crate loads, validates and runs the contract's wasm module inside a
//! Wasmtime sandbox. It enforces:
//!
//! - **Determinism:** No SIMD, no threads, NaN canonicalization
//! - **Fuel metering:** Instruction-level metering bounds each call
//! - **Memory limits:** Bounded linear memory growth
//! - **Import whitelisting:** Only `securemsg_host` imports allowed, no WASI
//! - **ABI validation:** Entry point exports checked before execution
//! - **All-or-nothing writes:** A call's writes reach the state store only
//!   when it succeeds
//!
//! The entry points are [`Sandbox::call`] and [`Sandbox::session`].

pub mod error;
pub mod config;
pub mod memory;
pub mod host_impl;
pub mod validation;
pub mod linker;
pub mod runtime;

pub use error::SandboxError;
pub use config::SandboxConfig;
pub use runtime::{Sandbox, Session};
