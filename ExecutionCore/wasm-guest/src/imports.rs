//! Host function imports.
//!
//! All host functions are imported under the `securemsg_host` wasm module.
//! Each returns an `i32` error code (0 = OK); see `ErrorCode` for the table.
//!
//! Buffers handed out by the host (`input`, `state_get`) live in this
//! module's linear memory and must be released with `host_free`.

#[link(wasm_import_module = "securemsg_host")]
extern "C" {
    // ── Call input ──

    /// Copy the current call's payload into a host-allocated buffer.
    /// An empty payload yields `*out_ptr_ptr = 0`, `*out_len_ptr = 0`.
    pub fn input(out_ptr_ptr: i32, out_len_ptr: i32) -> i32;

    // ── State access ──

    /// Read a value from state.
    /// If key not found: `*out_ptr_ptr = 0`. A stored empty value is reported
    /// with a non-zero pointer and `*out_len_ptr = 0`.
    pub fn state_get(
        key_ptr: i32,
        key_len: i32,
        out_ptr_ptr: i32,
        out_len_ptr: i32,
    ) -> i32;

    /// Buffer a key-value write for this call.
    pub fn state_set(
        key_ptr: i32,
        key_len: i32,
        val_ptr: i32,
        val_len: i32,
    ) -> i32;

    // ── Logs ──

    /// Write a debug log line. Guest must not branch on the result.
    pub fn log(level: i32, msg_ptr: i32, msg_len: i32) -> i32;

    // ── Output ──

    /// Set the call's return data. The last call wins.
    pub fn value_return(val_ptr: i32, val_len: i32) -> i32;

    // ── Host memory management ──

    /// Free a buffer allocated by the host.
    pub fn host_free(ptr: i32, len: i32) -> i32;
}
