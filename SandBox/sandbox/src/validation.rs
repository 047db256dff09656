//! Wasm module validation: ABI compatibility checks.
//!
//! Validates that a compiled module can serve as the message contract
//! before the sandbox accepts it:
//!
//! 1. `memory` is exported
//! 2. Every entry point is exported as `() -> i32`
//! 3. Every import is a known function of the `securemsg_host` module
//! 4. No WASI imports

use wasmtime::{ExternType, FuncType, Module, ValType};

use securemsg_primitives::{types::HOST_MODULE, EntryPoint};

use crate::error::SandboxError;

/// Functions the host provides under [`HOST_MODULE`].
pub const HOST_FUNCTIONS: &[&str] = &[
    "input",
    "state_get",
    "state_set",
    "log",
    "value_return",
    "host_free",
];

/// Validate that a wasm module meets the contract ABI.
pub fn validate_module(module: &Module) -> Result<(), SandboxError> {
    validate_exports(module)?;
    validate_imports(module)?;
    Ok(())
}

fn is_entry_signature(ty: &FuncType) -> bool {
    ty.params().len() == 0
        && ty.results().len() == 1
        && ty.results().all(|r| matches!(r, ValType::I32))
}

fn validate_exports(module: &Module) -> Result<(), SandboxError> {
    let has_memory = module
        .exports()
        .any(|e| e.name() == "memory" && matches!(e.ty(), ExternType::Memory(_)));
    if !has_memory {
        return Err(SandboxError::ValidationError(
            "module must export 'memory'".into(),
        ));
    }

    for entry in EntryPoint::ALL {
        let name = entry.export_name();
        let export = module
            .exports()
            .find(|e| e.name() == name)
            .ok_or_else(|| {
                SandboxError::ValidationError(format!("missing required export: {}", name))
            })?;

        match export.ty() {
            ExternType::Func(ft) if is_entry_signature(&ft) => {}
            ExternType::Func(_) => {
                return Err(SandboxError::ValidationError(format!(
                    "export '{}' must have signature () -> i32",
                    name
                )));
            }
            _ => {
                return Err(SandboxError::ValidationError(format!(
                    "export '{}' must be a function",
                    name
                )));
            }
        }
    }

    Ok(())
}

fn validate_imports(module: &Module) -> Result<(), SandboxError> {
    for import in module.imports() {
        let module_name = import.module();

        if module_name.starts_with("wasi") {
            return Err(SandboxError::ValidationError(format!(
                "WASI import not allowed: {}::{}",
                module_name,
                import.name()
            )));
        }

        if module_name != HOST_MODULE {
            return Err(SandboxError::ValidationError(format!(
                "import from unknown module '{}' (only '{}' allowed): {}",
                module_name,
                HOST_MODULE,
                import.name()
            )));
        }

        if !matches!(import.ty(), ExternType::Func(_)) {
            return Err(SandboxError::ValidationError(format!(
                "non-function import not allowed: {}::{}",
                module_name,
                import.name()
            )));
        }

        if !HOST_FUNCTIONS.contains(&import.name()) {
            return Err(SandboxError::ValidationError(format!(
                "unknown host function: {}::{}",
                module_name,
                import.name()
            )));
        }
    }

    Ok(())
}
