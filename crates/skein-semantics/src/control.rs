//! The distinguished control machine whose states the solver annotates.

use skein_model::{Action, Assembly, StateId};
use skein_syntax::Proposition;

/// A state of the control machine.
#[derive(Debug, Clone)]
pub struct ControlState {
    /// State name.
    pub name: String,
    /// Optional declared invariant for this state, kept for the editor
    /// layer. The solver validates but does not propagate it.
    pub constraint: Option<Proposition>,
}

/// A transition of the control machine.
///
/// A *triggerable* transition is fired from outside by a named event and
/// contributes its guard-restricted source region. A *reactive* (autonomous)
/// transition absorbs exit zones of its source state: autonomous component
/// moves whose target matches the transition's guard atom.
#[derive(Debug, Clone)]
pub struct ControlTransition {
    /// Source control state.
    pub source: StateId,
    /// Target control state.
    pub target: StateId,
    /// Whether the transition is fired by an external event.
    pub triggerable: bool,
    /// Guard proposition over the assembly; defaults to `TRUE`.
    pub guard: Proposition,
    /// Actions threaded through the contribution, in order.
    pub actions: Vec<Action>,
    /// Disabled transitions contribute nothing and do not take part in
    /// exit-zone matching.
    pub enabled: bool,
}

impl ControlTransition {
    /// Create an enabled transition with a `TRUE` guard and no actions.
    pub fn new(source: StateId, target: StateId, triggerable: bool) -> Self {
        Self {
            source,
            target,
            triggerable,
            guard: Proposition::True,
            actions: Vec::new(),
            enabled: true,
        }
    }

    /// Set the guard proposition.
    pub fn with_guard(mut self, guard: Proposition) -> Self {
        self.guard = guard;
        self
    }

    /// Append an action.
    pub fn with_action(mut self, action: Action) -> Self {
        self.actions.push(action);
        self
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// The distinguished machine: a graph of control states over an owned
/// assembly, received from the editor layer as a plain snapshot.
///
/// Like component machines it has a unique entry pseudostate; the
/// pseudostate's outgoing transitions are the initial transitions and are
/// treated as triggerable by the solver.
#[derive(Debug, Clone)]
pub struct ControlMachine {
    name: String,
    assembly: Assembly,
    states: Vec<ControlState>,
    transitions: Vec<ControlTransition>,
    pseudostate: StateId,
}

impl ControlMachine {
    /// Create a control machine over the given assembly, with a fresh
    /// pseudostate as its entry point.
    pub fn new(name: impl Into<String>, assembly: Assembly) -> Self {
        Self {
            name: name.into(),
            assembly,
            states: vec![ControlState {
                name: "<entry>".to_string(),
                constraint: None,
            }],
            transitions: Vec::new(),
            pseudostate: StateId(0),
        }
    }

    /// Machine name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The assembly this machine reasons about.
    pub fn assembly(&self) -> &Assembly {
        &self.assembly
    }

    /// The entry pseudostate.
    pub fn pseudostate(&self) -> StateId {
        self.pseudostate
    }

    /// Whether the given state is the pseudostate.
    pub fn is_pseudostate(&self, id: StateId) -> bool {
        id == self.pseudostate
    }

    /// Add a state and return its id.
    pub fn add_state(&mut self, name: impl Into<String>) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(ControlState {
            name: name.into(),
            constraint: None,
        });
        id
    }

    /// Declare a per-state invariant.
    pub fn set_constraint(&mut self, state: StateId, constraint: Proposition) {
        self.states[state.0].constraint = Some(constraint);
    }

    /// Add a transition and return its index.
    pub fn add_transition(&mut self, transition: ControlTransition) -> usize {
        self.transitions.push(transition);
        self.transitions.len() - 1
    }

    /// Look up a state by id.
    pub fn state(&self, id: StateId) -> &ControlState {
        &self.states[id.0]
    }

    /// Name of the state with the given id.
    pub fn state_name(&self, id: StateId) -> &str {
        &self.states[id.0].name
    }

    /// Number of states, pseudostate included.
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// All states.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &ControlState)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }

    /// All transitions with their indices.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, &ControlTransition)> {
        self.transitions.iter().enumerate()
    }
}
