//! Sandbox runtime: Wasmtime engine, module loading and contract calls.
//!
//! [`Sandbox`] compiles and validates the contract once. Each
//! [`Session`] is one guest instance, i.e. one execution context: calls
//! made through the same session share the guest's contract instance.
//! [`Sandbox::call`] runs a single call in a fresh session.
//!
//! Per call, the session:
//! 1. Resets the call state and installs the payload as input
//! 2. Refuels the store
//! 3. Invokes the entry point export
//! 4. Applies the buffered writes to the state store if the result code
//!    is OK, and drops them otherwise
//! 5. Packages return data and logs into a [`CallReceipt`]

use std::path::Path;
use std::sync::Arc;

use wasmtime::{Config, Engine, Instance, Linker, Module, Store, Trap};

use securemsg_hostapi::StateStore;
use securemsg_primitives::{CallReceipt, EntryPoint, ResultCode};

use crate::config::SandboxConfig;
use crate::error::SandboxError;
use crate::host_impl::HostState;
use crate::linker::register_host_functions;
use crate::memory::{HostAllocator, HOST_ALLOC_PAGES, PAGE_SIZE};
use crate::validation::validate_module;

/// The deterministic wasm sandbox for the message contract.
pub struct Sandbox {
    engine: Engine,
    module: Module,
    linker: Linker<HostState>,
    config: SandboxConfig,
}

impl Sandbox {
    /// Create a sandbox from wasm bytecode (binary or text).
    ///
    /// Validates the module's exports and imports before accepting.
    pub fn new(wasm_bytes: &[u8], config: SandboxConfig) -> Result<Self, SandboxError> {
        let engine = create_engine(&config)?;
        let module = Module::new(&engine, wasm_bytes)?;
        Self::build(engine, module, config)
    }

    /// Load from a `.wasm` file path.
    pub fn from_file(path: &Path, config: SandboxConfig) -> Result<Self, SandboxError> {
        let engine = create_engine(&config)?;
        let module = Module::from_file(&engine, path)?;
        Self::build(engine, module, config)
    }

    fn build(engine: Engine, module: Module, config: SandboxConfig) -> Result<Self, SandboxError> {
        validate_module(&module)?;
        let mut linker = Linker::new(&engine);
        register_host_functions(&mut linker)?;
        tracing::debug!(
            imports = module.imports().len(),
            max_memory_pages = config.max_memory_pages,
            "contract module loaded"
        );
        Ok(Self {
            engine,
            module,
            linker,
            config,
        })
    }

    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Start an execution context over `state_store`.
    pub fn session(&self, state_store: Arc<dyn StateStore>) -> Result<Session<'_>, SandboxError> {
        let host_state = HostState::new(
            state_store,
            self.config.execution.clone(),
            self.config.max_memory_bytes(),
            self.config.enable_guest_logs,
        );

        let mut store = Store::new(&self.engine, host_state);
        store.limiter(|state| &mut state.limits);
        store.set_fuel(self.config.fuel_limit)?;

        let instance = self.linker.instantiate(&mut store, &self.module)?;

        // Reserve the first host allocation region at the end of memory
        let memory = instance
            .get_memory(&mut store, "memory")
            .ok_or_else(|| SandboxError::MemoryError("no memory export".into()))?;
        let alloc_base = memory.data_size(&store);
        memory
            .grow(&mut store, HOST_ALLOC_PAGES)
            .map_err(|e| SandboxError::MemoryError(format!("initial grow: {}", e)))?;
        store.data_mut().host_alloc =
            HostAllocator::new(alloc_base, HOST_ALLOC_PAGES as usize * PAGE_SIZE);

        tracing::debug!(alloc_base, "session started");
        Ok(Session {
            sandbox: self,
            store,
            instance,
        })
    }

    /// Run one call in a fresh execution context.
    pub fn call(
        &self,
        entry: EntryPoint,
        payload: &[u8],
        state_store: Arc<dyn StateStore>,
    ) -> Result<CallReceipt, SandboxError> {
        self.session(state_store)?.call(entry, payload)
    }

    /// Run one call addressed by export name.
    pub fn call_by_name(
        &self,
        name: &str,
        payload: &[u8],
        state_store: Arc<dyn StateStore>,
    ) -> Result<CallReceipt, SandboxError> {
        self.call(resolve_entry(name)?, payload, state_store)
    }
}

/// One guest instance serving a sequence of calls.
pub struct Session<'a> {
    sandbox: &'a Sandbox,
    store: Store<HostState>,
    instance: Instance,
}

impl Session<'_> {
    /// Invoke `entry` with `payload`.
    ///
    /// A guest that runs to completion yields a receipt, whatever its
    /// result code. Traps and fuel exhaustion are errors; their writes are
    /// discarded like those of any failed call.
    pub fn call(&mut self, entry: EntryPoint, payload: &[u8]) -> Result<CallReceipt, SandboxError> {
        let name = entry.export_name();
        let span = tracing::debug_span!("contract_call", entry = name, payload_len = payload.len());
        let _guard = span.enter();

        self.store.data_mut().begin_call(payload);
        self.store.set_fuel(self.sandbox.config.fuel_limit)?;

        let func = self.instance.get_typed_func::<(), i32>(&mut self.store, name)?;
        let raw = match handle_trap(func.call(&mut self.store, ())) {
            Ok(raw) => raw,
            Err(e) => {
                self.store.data_mut().discard_writes();
                tracing::debug!(error = %e, "call aborted");
                return Err(e);
            }
        };

        let host = self.store.data_mut();
        let code = match u32::try_from(raw).ok().and_then(ResultCode::from_u32) {
            Some(code) => code,
            None => {
                host.discard_writes();
                return Err(SandboxError::UnknownResultCode {
                    entry: name.to_string(),
                    code: raw,
                });
            }
        };

        if code.is_ok() {
            let writes = host.take_writes();
            let count = writes.len();
            host.state_store.apply(writes)?;
            tracing::debug!(writes = count, "call committed");
        } else {
            host.discard_writes();
            tracing::debug!(%code, "call failed, writes discarded");
        }

        Ok(CallReceipt::new(
            entry,
            code,
            std::mem::take(&mut host.return_data),
            std::mem::take(&mut host.logs),
        ))
    }

    /// Invoke an entry point addressed by export name.
    pub fn call_by_name(&mut self, name: &str, payload: &[u8]) -> Result<CallReceipt, SandboxError> {
        self.call(resolve_entry(name)?, payload)
    }

    /// Current size of the guest's linear memory in wasm pages.
    pub fn memory_pages(&mut self) -> u64 {
        self.instance
            .get_memory(&mut self.store, "memory")
            .map(|memory| memory.size(&self.store))
            .unwrap_or(0)
    }

    /// Fuel left after the last call.
    pub fn fuel_remaining(&self) -> u64 {
        self.store.get_fuel().unwrap_or(0)
    }
}

fn resolve_entry(name: &str) -> Result<EntryPoint, SandboxError> {
    EntryPoint::from_name(name).ok_or_else(|| SandboxError::UnknownEntryPoint(name.to_string()))
}

/// Create a Wasmtime engine with deterministic configuration.
fn create_engine(config: &SandboxConfig) -> Result<Engine, SandboxError> {
    let mut wasm_config = Config::new();

    // Fuel metering bounds every call
    wasm_config.consume_fuel(true);

    // Determinism enforcement
    wasm_config.wasm_threads(false);
    wasm_config.wasm_simd(false);
    wasm_config.wasm_relaxed_simd(false);
    wasm_config.wasm_multi_memory(false);
    wasm_config.cranelift_nan_canonicalization(true);

    let max_bytes = config.max_memory_bytes() as u64;
    wasm_config.memory_guaranteed_dense_image_size(max_bytes.min(16 * 1024 * 1024));

    Ok(Engine::new(&wasm_config)?)
}

/// Convert a guest call failure into a `SandboxError`.
///
/// Fuel exhaustion → `SandboxError::FuelExhausted`
/// Other traps → `SandboxError::GuestTrapped`
fn handle_trap<R>(result: Result<R, anyhow::Error>) -> Result<R, SandboxError> {
    result.map_err(|e| match e.downcast_ref::<Trap>() {
        Some(Trap::OutOfFuel) => SandboxError::FuelExhausted,
        _ => SandboxError::GuestTrapped(format!("{:#}", e)),
    })
}
