//! Guest exported functions.
//!
//! One export per contract entry point, named exactly as the host invokes
//! them. Each reads the call payload from the host, runs the dispatcher and
//! returns the `ResultCode` as `i32` (0 = OK). The response text has already
//! been handed over through `value_return` by then.
//!
//! The execution scope lives for as long as this module instance does, so
//! calls on one instance share a single contract instance.

#![allow(non_snake_case)]

use once_cell::sync::OnceCell;
use securemsg_engine::{executor::respond, ContractExecutor, ContractScope};
use securemsg_primitives::{ContractError, EntryPoint};

use crate::host_bridge::{read_input, WasmHostBridge};

static SCOPE: OnceCell<ContractScope> = OnceCell::new();

fn scope() -> &'static ContractScope {
    SCOPE.get_or_init(ContractScope::default)
}

fn run(entry: EntryPoint) -> i32 {
    let mut host = WasmHostBridge;
    let code = match read_input() {
        Ok(payload) => ContractExecutor::call(entry, scope(), &payload, &mut host),
        Err(err) => respond(&mut host, Err(ContractError::Host(err))),
    };
    code.as_u32() as i32
}

/// Liveness probe.
#[no_mangle]
pub extern "C" fn Init() -> i32 {
    run(EntryPoint::Init)
}

/// Store a message: payload `{"key": ..., "msg": ...}`.
#[no_mangle]
pub extern "C" fn CreateMsg() -> i32 {
    run(EntryPoint::CreateMsg)
}

/// Read a message: payload `{"key": ...}`.
#[no_mangle]
pub extern "C" fn GetMsg() -> i32 {
    run(EntryPoint::GetMsg)
}
