//! Declarative effects attached to control transitions.

use std::fmt;

/// A declarative effect: "fire, in `machine`, whichever transitions are
/// triggered by `event`". Displayed as `machine.event`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Action {
    /// Target component machine.
    pub machine: String,
    /// Event raised in that machine.
    pub event: String,
}

impl Action {
    /// Create a new action.
    pub fn new(machine: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            machine: machine.into(),
            event: event.into(),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.machine, self.event)
    }
}
