//! How the client reaches the contract.
//!
//! [`ContractTransport`] is implemented for a sandbox [`Session`] running
//! the wasm contract, and for [`LocalTransport`], which runs the engine
//! in-process over a [`MockHost`].

use securemsg_engine::{ContractExecutor, ContractScope, MockHost};
use securemsg_primitives::{CallReceipt, EntryPoint};
use securemsg_sandbox::Session;

use crate::error::Result;

pub trait ContractTransport {
    /// Invoke `entry` with `payload`. A completed call yields a receipt
    /// whatever its result code.
    fn invoke(&mut self, entry: EntryPoint, payload: &[u8]) -> Result<CallReceipt>;
}

impl ContractTransport for Session<'_> {
    fn invoke(&mut self, entry: EntryPoint, payload: &[u8]) -> Result<CallReceipt> {
        Ok(self.call(entry, payload)?)
    }
}

/// In-process contract: one scope, one mock host.
///
/// Writes are committed when the call succeeds and rolled back otherwise,
/// as the sandbox does.
#[derive(Debug, Default)]
pub struct LocalTransport {
    scope: ContractScope,
    host: MockHost,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn host(&self) -> &MockHost {
        &self.host
    }
}

impl ContractTransport for LocalTransport {
    fn invoke(&mut self, entry: EntryPoint, payload: &[u8]) -> Result<CallReceipt> {
        let code = ContractExecutor::call(entry, &self.scope, payload, &mut self.host);
        if code.is_ok() {
            self.host.commit();
        } else {
            self.host.rollback();
        }
        Ok(CallReceipt::new(
            entry,
            code,
            self.host.take_return_value().unwrap_or_default(),
            self.host.take_logs(),
        ))
    }
}
