//! Model-level errors.

use thiserror::Error;

/// Errors raised when an operation references something absent from the
/// assembly's machine graphs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// A machine identifier is not part of the assembly.
    #[error("machine '{0}' not found in assembly")]
    UnknownMachine(String),

    /// A state name is not part of the named machine.
    #[error("machine '{machine}' has no state named '{state}'")]
    UnknownState { machine: String, state: String },

    /// An action references an event no transition of the machine is
    /// triggered by. Silently ignoring this would hide a modeling bug, so it
    /// fails loudly.
    #[error("no transition triggered by event '{event}' in machine '{machine}'")]
    UnknownEvent { machine: String, event: String },
}
