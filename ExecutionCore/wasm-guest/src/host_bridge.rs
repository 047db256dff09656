//! Wasm host bridge: `HostInterface` over the imported host functions.
//!
//! Each method marshals pointers, calls the import, checks the error code
//! and copies any host buffer out before freeing it. The bridge keeps no
//! state of its own: the host owns the write buffer, logs and return data.

use securemsg_engine::HostInterface;
use securemsg_primitives::{ErrorCode, ExecError, ExecResult};

use crate::buffer::HostBuffer;
use crate::imports;

pub struct WasmHostBridge;

/// Convert an i32 host return code to a Result.
fn check_host_result(code: i32) -> ExecResult<()> {
    if code == 0 {
        return Ok(());
    }
    let error_code = ErrorCode::from_i32(code).unwrap_or(ErrorCode::Internal);
    Err(ExecError::HostError(error_code))
}

/// Copy a host-allocated buffer and release it. `None` when `ptr` is null.
fn take_host_buffer(ptr: i32, len: i32) -> ExecResult<Option<Vec<u8>>> {
    let data = match HostBuffer::classify(ptr, len)? {
        HostBuffer::Absent => return Ok(None),
        HostBuffer::Empty { .. } => Vec::new(),
        HostBuffer::Bytes { ptr, len } => {
            unsafe { core::slice::from_raw_parts(ptr as *const u8, len) }.to_vec()
        }
    };
    unsafe {
        imports::host_free(ptr, len);
    }
    Ok(Some(data))
}

/// Fetch the current call's payload.
pub fn read_input() -> ExecResult<Vec<u8>> {
    let mut out_ptr: i32 = 0;
    let mut out_len: i32 = 0;

    let code = unsafe {
        imports::input(
            &mut out_ptr as *mut i32 as i32,
            &mut out_len as *mut i32 as i32,
        )
    };
    check_host_result(code)?;
    Ok(take_host_buffer(out_ptr, out_len)?.unwrap_or_default())
}

impl HostInterface for WasmHostBridge {
    fn state_get(&self, key: &[u8]) -> ExecResult<Option<Vec<u8>>> {
        let mut out_ptr: i32 = 0;
        let mut out_len: i32 = 0;

        let code = unsafe {
            imports::state_get(
                key.as_ptr() as i32,
                key.len() as i32,
                &mut out_ptr as *mut i32 as i32,
                &mut out_len as *mut i32 as i32,
            )
        };
        check_host_result(code)?;
        take_host_buffer(out_ptr, out_len)
    }

    fn state_set(&mut self, key: &[u8], value: &[u8]) -> ExecResult<()> {
        let code = unsafe {
            imports::state_set(
                key.as_ptr() as i32,
                key.len() as i32,
                value.as_ptr() as i32,
                value.len() as i32,
            )
        };
        check_host_result(code)
    }

    fn log(&mut self, level: u32, message: &str) -> ExecResult<()> {
        let code = unsafe {
            imports::log(
                level as i32,
                message.as_ptr() as i32,
                message.len() as i32,
            )
        };
        check_host_result(code)
    }

    fn value_return(&mut self, value: &[u8]) -> ExecResult<()> {
        let code = unsafe {
            imports::value_return(value.as_ptr() as i32, value.len() as i32)
        };
        check_host_result(code)
    }
}
