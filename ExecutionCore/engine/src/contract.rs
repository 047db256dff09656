//! Contract state and instance lifecycle.
//!
//! - [`ContractState`] owns the one namespaced store handle. Every read and
//!   write of a message record goes through it.
//! - [`MessageContract`] is the contract instance; it owns the state.
//! - [`ContractScope`] is one execution context. It is created explicitly
//!   when the context starts and threaded through the entry points. The
//!   instance inside it is built lazily, at most once, behind a one-shot
//!   cell: concurrent first callers block until the single construction
//!   finishes and then all observe the same fully built instance.

use once_cell::sync::OnceCell;
use securemsg_primitives::{
    types::namespaced_key, ContractError, ExecError, DEFAULT_NAMESPACE,
};

use crate::host::HostInterface;

/// Configuration fixed for the lifetime of a scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractConfig {
    /// Namespace prefixing every storage key.
    pub namespace: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            namespace: String::from(DEFAULT_NAMESPACE),
        }
    }
}

/// Store handle bound to one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractState {
    namespace: String,
}

impl ContractState {
    /// Bind a handle to `namespace`. Allocates only; performs no host calls.
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn storage_key(&self, key: &str) -> Vec<u8> {
        namespaced_key(&self.namespace, key)
    }

    /// Upsert `key = value`. Last write wins.
    pub fn insert(
        &self,
        host: &mut dyn HostInterface,
        key: &str,
        value: &str,
    ) -> Result<(), ContractError> {
        host.state_set(&self.storage_key(key), value.as_bytes())
            .map_err(ContractError::StoreWrite)
    }

    /// Read the record under `key`.
    pub fn get(&self, host: &dyn HostInterface, key: &str) -> Result<String, ContractError> {
        let raw = host
            .state_get(&self.storage_key(key))
            .map_err(ContractError::StoreRead)?
            .ok_or_else(|| ContractError::KeyNotFound(String::from(key)))?;
        String::from_utf8(raw).map_err(|_| {
            ContractError::StoreRead(ExecError::Encoding(String::from(
                "stored value is not valid UTF-8",
            )))
        })
    }
}

/// The contract instance.
#[derive(Debug)]
pub struct MessageContract {
    state: ContractState,
}

impl MessageContract {
    pub fn new(config: &ContractConfig) -> Self {
        Self {
            state: ContractState::new(config.namespace.clone()),
        }
    }

    pub fn state(&self) -> &ContractState {
        &self.state
    }
}

/// One execution context.
#[derive(Debug)]
pub struct ContractScope {
    config: ContractConfig,
    instance: OnceCell<MessageContract>,
}

impl ContractScope {
    /// Start a context. The instance is not built until first use.
    pub fn new(config: ContractConfig) -> Self {
        Self {
            config,
            instance: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &ContractConfig {
        &self.config
    }

    /// The context's contract instance, built on first call.
    pub fn instance(&self) -> &MessageContract {
        self.instance.get_or_init(|| MessageContract::new(&self.config))
    }

    /// Whether the instance has been built yet.
    pub fn is_initialized(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl Default for ContractScope {
    fn default() -> Self {
        Self::new(ContractConfig::default())
    }
}
