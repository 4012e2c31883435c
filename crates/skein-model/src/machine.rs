//! Component state machine graphs.

use std::collections::BTreeSet;

/// Index of a state within its machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(pub usize);

/// A named state of a component machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    /// State name, unique within its machine by convention.
    pub name: String,
}

/// A directed edge between two states of one machine.
///
/// A transition with no trigger is autonomous: the machine fires it
/// spontaneously. A triggered transition fires only when its event is raised.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Transition {
    /// Source state.
    pub source: StateId,
    /// Target state.
    pub target: StateId,
    /// Triggering event name, or `None` for an autonomous transition.
    pub trigger: Option<String>,
}

impl Transition {
    /// Whether this transition fires spontaneously.
    pub fn is_autonomous(&self) -> bool {
        self.trigger.is_none()
    }

    /// Whether this transition fires on a named event.
    pub fn is_triggerable(&self) -> bool {
        self.trigger.is_some()
    }
}

/// A component machine: a directed graph of named states and transitions,
/// with one designated pseudostate as the unique entry point.
///
/// The pseudostate is excluded from logical-state enumeration and from guard
/// atoms; it only anchors the autonomous entry transitions that determine the
/// machine's initial states.
#[derive(Debug, Clone)]
pub struct Machine {
    name: String,
    states: Vec<State>,
    transitions: Vec<Transition>,
    pseudostate: StateId,
}

impl Machine {
    /// Create a machine with a fresh pseudostate as its entry point.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: vec![State {
                name: "<entry>".to_string(),
            }],
            transitions: Vec::new(),
            pseudostate: StateId(0),
        }
    }

    /// Machine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The entry pseudostate.
    pub fn pseudostate(&self) -> StateId {
        self.pseudostate
    }

    /// Add a state and return its id.
    pub fn add_state(&mut self, name: impl Into<String>) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State { name: name.into() });
        id
    }

    /// Add a transition. `trigger` is `None` for an autonomous transition.
    ///
    /// # Panics
    ///
    /// Panics if either endpoint is not a state of this machine.
    pub fn add_transition(
        &mut self,
        source: StateId,
        target: StateId,
        trigger: Option<&str>,
    ) {
        assert!(
            source.0 < self.states.len() && target.0 < self.states.len(),
            "transition endpoints must be states of machine '{}'",
            self.name
        );
        self.transitions.push(Transition {
            source,
            target,
            trigger: trigger.map(str::to_string),
        });
    }

    /// Look up a state by id.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    /// Name of the state with the given id.
    pub fn state_name(&self, id: StateId) -> &str {
        &self.states[id.0].name
    }

    /// Find a logical state by name.
    pub fn state_by_name(&self, name: &str) -> Option<StateId> {
        self.states
            .iter()
            .position(|s| s.name == name)
            .map(StateId)
            .filter(|&id| id != self.pseudostate)
    }

    /// All states, pseudostate included.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }

    /// All states except the pseudostate.
    pub fn logical_states(&self) -> impl Iterator<Item = (StateId, &State)> {
        let pseudo = self.pseudostate;
        self.states().filter(move |(id, _)| *id != pseudo)
    }

    /// All transitions.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Transitions labeled with the given trigger event.
    pub fn transitions_triggered_by<'a>(
        &'a self,
        event: &'a str,
    ) -> impl Iterator<Item = &'a Transition> {
        self.transitions
            .iter()
            .filter(move |t| t.trigger.as_deref() == Some(event))
    }

    /// The set of trigger event names this machine reacts to.
    pub fn events(&self) -> BTreeSet<&str> {
        self.transitions
            .iter()
            .filter_map(|t| t.trigger.as_deref())
            .collect()
    }

    /// States reachable from the pseudostate by a single autonomous
    /// transition: the machine's initial states.
    pub fn initial_states(&self) -> Vec<StateId> {
        self.transitions
            .iter()
            .filter(|t| t.source == self.pseudostate && t.is_autonomous())
            .map(|t| t.target)
            .collect()
    }
}
