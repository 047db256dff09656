//! Call dispatcher and responder.
//!
//! `ContractExecutor::call` drives one external call:
//!
//! 1. Select the entry point by name
//! 2. Decode the payload and run the entry point against the scope
//! 3. Hand the outcome to the host: response text on success, error text
//!    on failure, both through `value_return`
//! 4. Return the [`ResultCode`] the export reports to the host
//!
//! A non-zero code tells the host to discard the call's buffered writes.

use securemsg_primitives::{
    types::LOG_WARN, ContractError, EntryPoint, ResultCode, Response,
};

use crate::contract::ContractScope;
use crate::entry;
use crate::host::HostInterface;

/// Stateless dispatcher. All state lives in the scope and the host.
pub struct ContractExecutor;

impl ContractExecutor {
    /// Run `entry` with `payload` and respond through `host`.
    pub fn call(
        entry: EntryPoint,
        scope: &ContractScope,
        payload: &[u8],
        host: &mut dyn HostInterface,
    ) -> ResultCode {
        let outcome = match entry {
            EntryPoint::Init => Ok(entry::init(host)),
            EntryPoint::CreateMsg => entry::create_msg(scope, payload, host),
            EntryPoint::GetMsg => entry::get_msg(scope, payload, host),
        };
        respond(host, outcome)
    }
}

/// Encode an entry point's outcome into the host's return channel.
pub fn respond(
    host: &mut dyn HostInterface,
    outcome: Result<Response, ContractError>,
) -> ResultCode {
    match outcome {
        Ok(response) => match host.value_return(response.as_bytes()) {
            Ok(()) => ResultCode::Ok,
            Err(_) => ResultCode::HostFailure,
        },
        Err(err) => {
            let text = err.to_string();
            let _ = host.log(LOG_WARN, &text);
            // The code alone still reports the failure if this is lost.
            let _ = host.value_return(text.as_bytes());
            err.result_code()
        }
    }
}
