//! Entry points: `Init`, `CreateMsg`, `GetMsg`.
//!
//! Each entry point decodes its payload, obtains the scope's contract
//! instance and performs at most one store operation. Decoding always
//! completes before any write, so a rejected payload never mutates state.

use securemsg_primitives::{
    types::{get_error_text, CREATE_ACK, INIT_ACK, LOG_INFO, LOG_WARN},
    ContractError, CreateMsgRequest, GetMsgRequest, Response,
};

use crate::contract::ContractScope;
use crate::host::HostInterface;

/// Liveness probe. Logs and returns the fixed acknowledgement.
///
/// Never touches the store and never fails.
pub fn init(host: &mut dyn HostInterface) -> Response {
    let _ = host.log(LOG_INFO, INIT_ACK);
    Response::text(INIT_ACK)
}

/// Store `msg` under `key`, replacing any existing record.
pub fn create_msg(
    scope: &ContractScope,
    payload: &[u8],
    host: &mut dyn HostInterface,
) -> Result<Response, ContractError> {
    let request = CreateMsgRequest::decode(payload)?;

    let contract = scope.instance();
    contract
        .state()
        .insert(host, &request.key, &request.msg)?;

    let _ = host.log(LOG_INFO, &format!("message stored under key '{}'", request.key));
    Ok(Response::text(CREATE_ACK))
}

/// Read the message under `key`.
///
/// Only a decode failure fails the call. A missing key or a failed read is
/// reported as a *successful* response whose text is
/// `"Error getting message: <cause>"`, so callers must inspect the content
/// to tell "not found" apart from a stored value.
pub fn get_msg(
    scope: &ContractScope,
    payload: &[u8],
    host: &mut dyn HostInterface,
) -> Result<Response, ContractError> {
    let request = GetMsgRequest::decode(payload)?;

    let contract = scope.instance();
    match contract.state().get(&*host, &request.key) {
        Ok(value) => Ok(Response::text(value)),
        Err(err) => {
            let _ = host.log(LOG_WARN, &format!("read of key '{}' failed: {}", request.key, err));
            Ok(Response::text(get_error_text(&err)))
        }
    }
}
