//! Host function registration via Wasmtime linker.
//!
//! Registers the six `securemsg_host` functions with the Wasmtime `Linker`.
//! Each function:
//! 1. Resolves the guest memory from the Caller
//! 2. Validates pointer/length arguments against linear memory
//! 3. Performs the operation through [`HostApi`]
//! 4. Returns an i32 error code (0 = OK)

use wasmtime::{Caller, Linker, Memory};

use securemsg_hostapi::{HostApi, HostError};
use securemsg_primitives::types::HOST_MODULE;

use crate::error::SandboxError;
use crate::host_impl::HostState;
use crate::memory;

/// Get the guest's exported memory from a Caller.
fn get_memory(caller: &mut Caller<'_, HostState>) -> Result<Memory, HostError> {
    caller
        .get_export("memory")
        .and_then(|e| e.into_memory())
        .ok_or_else(|| HostError::Internal("guest exports no memory".into()))
}

/// Collapse a host call outcome into the i32 the guest sees.
fn status(result: Result<(), HostError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) => e.to_error_code(),
    }
}

/// Copy `data` into a host-allocated guest buffer and report its location
/// through the two out-pointers. `None` reports a null pointer.
fn write_host_buffer(
    caller: &mut Caller<'_, HostState>,
    mem: &Memory,
    data: Option<&[u8]>,
    out_ptr_ptr: i32,
    out_len_ptr: i32,
) -> Result<(), HostError> {
    let size = mem.data_size(&*caller);
    memory::validate_range(size, out_ptr_ptr, 4)?;
    memory::validate_range(size, out_len_ptr, 4)?;

    let (ptr, len) = match data {
        None => (0, 0),
        Some(bytes) => {
            let plan = caller.data().host_alloc.plan(bytes.len(), size);
            if plan.grow_pages > 0 {
                mem.grow(&mut *caller, plan.grow_pages)
                    .map_err(|e| HostError::Internal(format!("host buffer grow: {}", e)))?;
            }
            memory::write_bytes(mem.data_mut(&mut *caller), plan.ptr as i32, bytes)?;
            caller.data_mut().host_alloc.commit(plan, bytes.len());
            (plan.ptr as i32, bytes.len() as i32)
        }
    };

    let out = mem.data_mut(&mut *caller);
    memory::write_i32(out, out_ptr_ptr, ptr)?;
    memory::write_i32(out, out_len_ptr, len)
}

/// Register all `securemsg_host` functions with the linker.
pub fn register_host_functions(linker: &mut Linker<HostState>) -> Result<(), SandboxError> {
    register_input(linker)?;
    register_state_get(linker)?;
    register_state_set(linker)?;
    register_log(linker)?;
    register_value_return(linker)?;
    register_host_free(linker)?;
    Ok(())
}

// ── Call input ──

fn host_input(
    caller: &mut Caller<'_, HostState>,
    out_ptr_ptr: i32,
    out_len_ptr: i32,
) -> Result<(), HostError> {
    let mem = get_memory(caller)?;
    let payload = caller.data().input()?.to_vec();
    let data = (!payload.is_empty()).then_some(payload.as_slice());
    write_host_buffer(caller, &mem, data, out_ptr_ptr, out_len_ptr)
}

fn register_input(linker: &mut Linker<HostState>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "input",
        |mut caller: Caller<'_, HostState>, out_ptr_ptr: i32, out_len_ptr: i32| -> i32 {
            status(host_input(&mut caller, out_ptr_ptr, out_len_ptr))
        },
    )?;
    Ok(())
}

// ── State access ──

fn host_state_get(
    caller: &mut Caller<'_, HostState>,
    key_ptr: i32,
    key_len: i32,
    out_ptr_ptr: i32,
    out_len_ptr: i32,
) -> Result<(), HostError> {
    let mem = get_memory(caller)?;
    let key = memory::read_bytes(mem.data(&*caller), key_ptr, key_len)?;

    // Overlay first, then committed state
    let value = caller.data().state_get(&key)?;
    write_host_buffer(caller, &mem, value.as_deref(), out_ptr_ptr, out_len_ptr)
}

fn register_state_get(linker: &mut Linker<HostState>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "state_get",
        |mut caller: Caller<'_, HostState>,
         key_ptr: i32,
         key_len: i32,
         out_ptr_ptr: i32,
         out_len_ptr: i32|
         -> i32 {
            status(host_state_get(&mut caller, key_ptr, key_len, out_ptr_ptr, out_len_ptr))
        },
    )?;
    Ok(())
}

fn host_state_set(
    caller: &mut Caller<'_, HostState>,
    key_ptr: i32,
    key_len: i32,
    val_ptr: i32,
    val_len: i32,
) -> Result<(), HostError> {
    let mem = get_memory(caller)?;
    let (key, value) = {
        let data = mem.data(&*caller);
        (
            memory::read_bytes(data, key_ptr, key_len)?,
            memory::read_bytes(data, val_ptr, val_len)?,
        )
    };
    caller.data_mut().state_set(&key, &value)
}

fn register_state_set(linker: &mut Linker<HostState>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "state_set",
        |mut caller: Caller<'_, HostState>,
         key_ptr: i32,
         key_len: i32,
         val_ptr: i32,
         val_len: i32|
         -> i32 {
            status(host_state_set(&mut caller, key_ptr, key_len, val_ptr, val_len))
        },
    )?;
    Ok(())
}

// ── Logs ──

fn host_log(
    caller: &mut Caller<'_, HostState>,
    level: i32,
    msg_ptr: i32,
    msg_len: i32,
) -> Result<(), HostError> {
    let mem = get_memory(caller)?;
    let message = memory::read_str(mem.data(&*caller), msg_ptr, msg_len)?.to_owned();
    caller.data_mut().log(level as u32, &message)
}

fn register_log(linker: &mut Linker<HostState>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "log",
        |mut caller: Caller<'_, HostState>, level: i32, msg_ptr: i32, msg_len: i32| -> i32 {
            status(host_log(&mut caller, level, msg_ptr, msg_len))
        },
    )?;
    Ok(())
}

// ── Output ──

fn host_value_return(
    caller: &mut Caller<'_, HostState>,
    val_ptr: i32,
    val_len: i32,
) -> Result<(), HostError> {
    let mem = get_memory(caller)?;
    let value = memory::read_bytes(mem.data(&*caller), val_ptr, val_len)?;
    caller.data_mut().value_return(&value)
}

fn register_value_return(linker: &mut Linker<HostState>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "value_return",
        |mut caller: Caller<'_, HostState>, val_ptr: i32, val_len: i32| -> i32 {
            status(host_value_return(&mut caller, val_ptr, val_len))
        },
    )?;
    Ok(())
}

// ── Host memory management ──

fn register_host_free(linker: &mut Linker<HostState>) -> Result<(), SandboxError> {
    linker.func_wrap(
        HOST_MODULE,
        "host_free",
        |_caller: Caller<'_, HostState>, _ptr: i32, _len: i32| -> i32 {
            // No-op: host buffers live in bump regions that are released
            // with the instance.
            0
        },
    )?;
    Ok(())
}
