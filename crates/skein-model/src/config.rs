//! Partial assignments of states to machines.

use crate::atom::Atom;
use std::collections::BTreeMap;
use std::fmt;

/// A partial assignment of states to machines: a "cube" in the Boolean space
/// of machine-state atoms.
///
/// At most one state is assigned per machine. Entries are kept ordered
/// lexicographically by machine identifier; this ordering is presentational
/// only and never affects equality or implication.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Configuration {
    constraints: BTreeMap<String, String>,
}

impl Configuration {
    /// The empty configuration: no machine is constrained. As a cube this is
    /// the whole space.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A configuration constraining a single machine.
    pub fn singleton(machine: impl Into<String>, state: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.constrain(machine, state);
        config
    }

    /// Build a configuration from atoms. A later atom for the same machine
    /// overwrites an earlier one, preserving the one-entry-per-machine
    /// invariant.
    pub fn from_atoms(atoms: impl IntoIterator<Item = Atom>) -> Self {
        let mut config = Self::default();
        for atom in atoms {
            config.constrain(atom.machine, atom.state);
        }
        config
    }

    /// Assign a state to a machine, replacing any previous assignment.
    pub fn constrain(&mut self, machine: impl Into<String>, state: impl Into<String>) {
        self.constraints.insert(machine.into(), state.into());
    }

    /// Whether this configuration constrains the given machine.
    pub fn constrains(&self, machine: &str) -> bool {
        self.constraints.contains_key(machine)
    }

    /// The state assigned to the given machine, if any.
    pub fn state_of(&self, machine: &str) -> Option<&str> {
        self.constraints.get(machine).map(String::as_str)
    }

    /// Number of constrained machines.
    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    /// Whether no machine is constrained.
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Iterate the constraints as atoms, in lexicographic machine order.
    pub fn atoms(&self) -> impl Iterator<Item = Atom> + '_ {
        self.constraints
            .iter()
            .map(|(machine, state)| Atom::new(machine.clone(), state.clone()))
    }

    /// Whether this configuration implies `other`: every machine `other`
    /// constrains is constrained identically here. The more specific cube
    /// implies the more general one.
    pub fn implies(&self, other: &Configuration) -> bool {
        other
            .constraints
            .iter()
            .all(|(machine, state)| self.state_of(machine) == Some(state))
    }

    /// Intersect two cubes. Returns `None` when the two configurations assign
    /// conflicting states to a shared machine; this is "no overlap", not an
    /// error.
    pub fn intersect(&self, other: &Configuration) -> Option<Configuration> {
        let mut merged = self.constraints.clone();
        for (machine, state) in &other.constraints {
            match merged.get(machine) {
                Some(existing) if existing != state => return None,
                Some(_) => {}
                None => {
                    merged.insert(machine.clone(), state.clone());
                }
            }
        }
        Some(Configuration { constraints: merged })
    }

    /// Return a copy with the given machine's assignment replaced by
    /// `new_state`. If the machine was unconstrained its assignment is added.
    pub fn replace_constraint(&self, machine: &str, new_state: impl Into<String>) -> Configuration {
        let mut replaced = self.clone();
        replaced
            .constraints
            .insert(machine.to_string(), new_state.into());
        replaced
    }
}

impl fmt::Display for Configuration {
    /// Canonical form: `(m1.S1,m2.S3)`, machines in lexicographic order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, (machine, state)) in self.constraints.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{machine}.{state}")?;
        }
        write!(f, ")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implies_requires_identical_constraints() {
        let mut specific = Configuration::singleton("m1", "A");
        specific.constrain("m2", "X");
        let general = Configuration::singleton("m1", "A");

        assert!(specific.implies(&general));
        assert!(!general.implies(&specific));
        assert!(specific.implies(&specific));
        // Everything implies the empty cube.
        assert!(general.implies(&Configuration::empty()));
        assert!(!Configuration::empty().implies(&general));
    }

    #[test]
    fn intersect_merges_disjoint_constraints() {
        let a = Configuration::singleton("m1", "A");
        let b = Configuration::singleton("m2", "X");
        let merged = a.intersect(&b).unwrap();
        assert_eq!(merged.state_of("m1"), Some("A"));
        assert_eq!(merged.state_of("m2"), Some("X"));
    }

    #[test]
    fn intersect_detects_conflicts() {
        let a = Configuration::singleton("m1", "A");
        let b = Configuration::singleton("m1", "B");
        assert_eq!(a.intersect(&b), None);
    }

    #[test]
    fn replace_constraint_adds_when_missing() {
        let a = Configuration::singleton("m1", "A");
        let replaced = a.replace_constraint("m1", "B");
        assert_eq!(replaced.state_of("m1"), Some("B"));
        let extended = a.replace_constraint("m2", "X");
        assert_eq!(extended.state_of("m1"), Some("A"));
        assert_eq!(extended.state_of("m2"), Some("X"));
        // The original is untouched.
        assert_eq!(a.state_of("m2"), None);
    }

    #[test]
    fn display_is_lexicographic() {
        let mut config = Configuration::singleton("m2", "X");
        config.constrain("m1", "A");
        assert_eq!(config.to_string(), "(m1.A,m2.X)");
        assert_eq!(Configuration::empty().to_string(), "()");
    }
}
