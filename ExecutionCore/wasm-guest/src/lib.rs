//! `securemsg-contract`: the message contract as a wasm cdylib.
//!
//! Built for `wasm32-unknown-unknown`, this crate exports one function per
//! entry point (`Init`, `CreateMsg`, `GetMsg`) plus the linear memory.
//! Host functions are imported under the `securemsg_host` wasm module.
//!
//! **Determinism:** the guest does not use randomness, the filesystem,
//! networking or system time. Everything it observes arrives through the
//! host imports.
//!
//! On other targets only the host-buffer decoding is compiled, so the
//! workspace builds and tests natively.

#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
mod buffer;
#[cfg(target_arch = "wasm32")]
mod imports;
#[cfg(target_arch = "wasm32")]
mod host_bridge;
#[cfg(target_arch = "wasm32")]
mod exports;

#[cfg(target_arch = "wasm32")]
pub use exports::{CreateMsg, GetMsg, Init};
