//! Named collections of component machines and their joint state space.

use crate::action::Action;
use crate::atom::Atom;
use crate::config::Configuration;
use crate::machine::Machine;
use std::collections::BTreeMap;

/// A named collection of component state machines whose joint state space is
/// being reasoned about.
#[derive(Debug, Clone)]
pub struct Assembly {
    id: String,
    machines: BTreeMap<String, Machine>,
}

impl Assembly {
    /// Create an empty assembly.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            machines: BTreeMap::new(),
        }
    }

    /// The assembly identity. Regions and configurations computed against
    /// this assembly are tagged with it.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Register a component machine under the given identifier.
    pub fn add_machine(&mut self, id: impl Into<String>, machine: Machine) {
        self.machines.insert(id.into(), machine);
    }

    /// Look up a machine by identifier.
    pub fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines.get(id)
    }

    /// Whether the assembly contains a machine with the given identifier.
    pub fn contains_machine(&self, id: &str) -> bool {
        self.machines.contains_key(id)
    }

    /// Iterate machines in lexicographic identifier order.
    pub fn machines(&self) -> impl Iterator<Item = (&str, &Machine)> {
        self.machines.iter().map(|(id, m)| (id.as_str(), m))
    }

    /// The universe: one fully-specified configuration per combination of
    /// logical states, the cartesian product over all machines.
    ///
    /// Generated index-based; machines with no logical states contribute
    /// nothing to the product.
    pub fn universe(&self) -> Vec<Configuration> {
        let parts: Vec<(&str, Vec<&str>)> = self
            .machines()
            .map(|(id, m)| (id, m.logical_states().map(|(_, s)| s.name.as_str()).collect()))
            .filter(|(_, states): &(_, Vec<&str>)| !states.is_empty())
            .collect();
        cartesian(&parts)
    }

    /// The initial configurations: the cartesian product of each machine's
    /// pseudostate-reachable initial states.
    ///
    /// When no machine declares initial states the result is the single
    /// empty configuration, the unconstrained cube.
    pub fn initial_configurations(&self) -> Vec<Configuration> {
        let parts: Vec<(&str, Vec<&str>)> = self
            .machines()
            .map(|(id, m)| {
                let initial: Vec<&str> = m
                    .initial_states()
                    .into_iter()
                    .map(|sid| m.state_name(sid))
                    .collect();
                (id, initial)
            })
            .filter(|(_, states): &(_, Vec<&str>)| !states.is_empty())
            .collect();
        cartesian(&parts)
    }

    /// Every `machine.state` atom over logical states, for guard authoring.
    pub fn guard_atoms(&self) -> Vec<Atom> {
        self.machines()
            .flat_map(|(id, m)| {
                m.logical_states()
                    .map(move |(_, s)| Atom::new(id, s.name.clone()))
            })
            .collect()
    }

    /// Every `machine.event` action the assembly can be driven by.
    pub fn actions(&self) -> Vec<Action> {
        self.machines()
            .flat_map(|(id, m)| {
                m.events()
                    .into_iter()
                    .map(move |event| Action::new(id, event))
            })
            .collect()
    }
}

/// Cartesian product over `(machine, states)` parts, one configuration per
/// combination. An empty part list yields the single empty configuration.
fn cartesian(parts: &[(&str, Vec<&str>)]) -> Vec<Configuration> {
    let mut result = Vec::new();
    let mut indices = vec![0usize; parts.len()];
    loop {
        let mut config = Configuration::empty();
        for (part, &index) in parts.iter().zip(&indices) {
            config.constrain(part.0, part.1[index]);
        }
        result.push(config);

        // Odometer increment over the state indices.
        let mut pos = parts.len();
        loop {
            if pos == 0 {
                return result;
            }
            pos -= 1;
            indices[pos] += 1;
            if indices[pos] < parts[pos].1.len() {
                break;
            }
            indices[pos] = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn traffic_assembly() -> Assembly {
        let mut m1 = Machine::new("m1");
        let r = m1.add_state("R");
        let g = m1.add_state("G");
        let y = m1.add_state("Y");
        m1.add_transition(m1.pseudostate(), r, None);
        m1.add_transition(r, g, None);
        m1.add_transition(g, y, None);
        m1.add_transition(y, r, None);

        let mut m2 = Machine::new("m2");
        let off = m2.add_state("Off");
        let on = m2.add_state("On");
        m2.add_transition(m2.pseudostate(), off, None);
        m2.add_transition(off, on, Some("start"));

        let mut assembly = Assembly::new("traffic");
        assembly.add_machine("m1", m1);
        assembly.add_machine("m2", m2);
        assembly
    }

    #[test]
    fn universe_is_the_full_product() {
        let assembly = traffic_assembly();
        let universe = assembly.universe();
        assert_eq!(universe.len(), 6);
        assert!(universe.iter().all(|c| c.len() == 2));
        assert!(universe
            .iter()
            .any(|c| c.state_of("m1") == Some("Y") && c.state_of("m2") == Some("On")));
    }

    #[test]
    fn initial_configurations_product_of_entry_targets() {
        let assembly = traffic_assembly();
        let initial = assembly.initial_configurations();
        assert_eq!(initial.len(), 1);
        assert_eq!(initial[0].state_of("m1"), Some("R"));
        assert_eq!(initial[0].state_of("m2"), Some("Off"));
    }

    #[test]
    fn no_initial_states_yields_unconstrained_cube() {
        let mut machine = Machine::new("m");
        machine.add_state("A");
        let mut assembly = Assembly::new("a");
        assembly.add_machine("m", machine);

        let initial = assembly.initial_configurations();
        assert_eq!(initial, vec![Configuration::empty()]);
    }

    #[test]
    fn guard_atoms_and_actions_enumerate_surface() {
        let assembly = traffic_assembly();
        let atoms = assembly.guard_atoms();
        assert_eq!(atoms.len(), 5);
        assert!(atoms.contains(&Atom::new("m2", "Off")));

        let actions = assembly.actions();
        assert_eq!(actions, vec![Action::new("m2", "start")]);
    }
}
