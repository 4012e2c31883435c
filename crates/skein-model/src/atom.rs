//! Atomic "machine is in state" facts.

use std::fmt;

/// An atomic fact asserting that one component machine occupies one named
/// state. Displayed as `machine.state`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Atom {
    /// Identifier of the component machine.
    pub machine: String,
    /// Name of the state the machine is asserted to be in.
    pub state: String,
}

impl Atom {
    /// Create a new atom.
    pub fn new(machine: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            machine: machine.into(),
            state: state.into(),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.machine, self.state)
    }
}
