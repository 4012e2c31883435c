//! Worklist fixed-point solver over the control machine's states.

use crate::control::{ControlMachine, ControlTransition};
use crate::exit::{find_exit_zones, ExitZone};
use crate::region::Region;
use skein_model::{Assembly, ModelError, StateId};
use skein_syntax::Proposition;
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use thiserror::Error;
use tracing::{debug, info, trace};

/// Fatal configuration errors raised before iteration begins, plus event
/// application failures surfaced mid-solve.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolveError {
    /// The control machine has no pseudostate entry point.
    #[error("control machine '{0}' has no pseudostate")]
    MissingPseudostate(String),

    /// A transition references a state absent from the graph.
    #[error("transition {index} references a state absent from the graph")]
    InvalidTransition { index: usize },

    /// A guard or state constraint references a machine the assembly does
    /// not contain.
    #[error("guard references unknown machine '{machine}'")]
    UnknownGuardMachine { machine: String },

    /// A guard or state constraint references a state its machine does not
    /// have.
    #[error("guard references unknown state '{machine}.{state}'")]
    UnknownGuardState { machine: String, state: String },

    /// An action failed to apply.
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Everything the solver computes.
#[derive(Debug, Clone)]
pub struct Solution {
    /// The minimal region satisfying each state's defining equations.
    pub state_regions: BTreeMap<StateId, Region>,
    /// Exit zones of each non-pseudo state, recomputed from the final
    /// regions in the post-pass.
    pub exit_zones: BTreeMap<StateId, BTreeSet<ExitZone>>,
    /// Each transition's contribution computed from its source's final
    /// region, indexed like `ControlMachine::transitions`. Disabled
    /// transitions contribute `⊥`.
    pub transition_regions: Vec<Region>,
}

/// Compute the region reachable at every state of the control machine.
///
/// Entry point for callers that only need the state mapping; [`solve`]
/// additionally reports exit zones and per-transition contributions.
pub fn compute_all_state_semantics(
    machine: &ControlMachine,
) -> Result<BTreeMap<StateId, Region>, SolveError> {
    solve(machine).map(|solution| solution.state_regions)
}

/// Run the worklist fixed point described in the module docs.
///
/// Every state's region starts at `⊥`; the pseudostate is seeded with the
/// assembly's initial region. Popping a state recomputes its exit zones from
/// its current region, then pushes each enabled outgoing transition's
/// contribution into the target's region, re-queueing targets that grew.
/// Termination follows from the finite lattice: regions only grow under
/// union. A post-pass recomputes every non-pseudo state's exit zones from
/// its final region, since zones observed mid-iteration may be stale.
pub fn solve(machine: &ControlMachine) -> Result<Solution, SolveError> {
    validate(machine)?;
    let assembly = machine.assembly();
    info!(machine = machine.name(), "starting fixed-point solve");

    let mut regions: Vec<Region> = (0..machine.state_count())
        .map(|_| Region::bottom(assembly.id()))
        .collect();
    let pseudo = machine.pseudostate();
    regions[pseudo.0] = Region::initial(assembly);

    let mut worklist = VecDeque::new();
    worklist.push_back(pseudo);

    let mut visits = 0usize;
    while let Some(state) = worklist.pop_front() {
        visits += 1;
        let base = regions[state.0].clone();
        let zones = find_exit_zones(&base, assembly);
        debug!(
            state = machine.state_name(state),
            region = %base,
            zones = zones.len(),
            "visiting"
        );

        for (index, transition) in machine.transitions() {
            if transition.source != state || !transition.enabled {
                continue;
            }
            let contribution = transition_contribution(machine, transition, &base, &zones)?;
            trace!(
                transition = index,
                target = machine.state_name(transition.target),
                contribution = %contribution,
                "contribution"
            );
            let target = transition.target;
            let combined = regions[target.0].union(&contribution);
            if combined != regions[target.0] {
                regions[target.0] = combined;
                worklist.push_back(target);
            }
        }
    }
    info!(visits, "fixed point reached");

    // Post-pass: zones computed mid-iteration may be stale.
    let mut exit_zones = BTreeMap::new();
    for (id, _) in machine.states() {
        if !machine.is_pseudostate(id) {
            exit_zones.insert(id, find_exit_zones(&regions[id.0], assembly));
        }
    }

    let mut transition_regions = Vec::new();
    for (_, transition) in machine.transitions() {
        if transition.enabled {
            let base = &regions[transition.source.0];
            let zones = find_exit_zones(base, assembly);
            transition_regions.push(transition_contribution(machine, transition, base, &zones)?);
        } else {
            transition_regions.push(Region::bottom(assembly.id()));
        }
    }

    Ok(Solution {
        state_regions: machine
            .states()
            .map(|(id, _)| (id, regions[id.0].clone()))
            .collect(),
        exit_zones,
        transition_regions,
    })
}

/// One transition's contribution given the working region of its source.
///
/// Triggerable (and initial) transitions restrict the base by their guard
/// and thread the result through their actions. Reactive transitions start
/// from `⊥` and absorb each exit zone whose target matches their guard atom
/// (a `TRUE` guard matches every zone), applying the zone's component
/// transition to the base, before threading actions the same way.
fn transition_contribution(
    machine: &ControlMachine,
    transition: &ControlTransition,
    base: &Region,
    zones: &BTreeSet<ExitZone>,
) -> Result<Region, SolveError> {
    let assembly = machine.assembly();
    let mut result = if transition.triggerable || machine.is_pseudostate(transition.source) {
        let guard = Region::from_proposition(&transition.guard, assembly);
        base.intersection(&guard)
    } else {
        let mut absorbed = Region::bottom(assembly.id());
        for zone in zones {
            if guard_matches_zone(&transition.guard, zone) {
                let fragment = base.apply_transition(&zone.machine, &zone.transition, assembly)?;
                absorbed = absorbed.union(&fragment);
            }
        }
        absorbed
    };
    for action in &transition.actions {
        result = result.apply_event(&action.machine, &action.event, assembly)?;
    }
    Ok(result)
}

/// A reactive transition absorbs a zone when its guard is `TRUE` or exactly
/// the zone's target atom.
fn guard_matches_zone(guard: &Proposition, zone: &ExitZone) -> bool {
    match guard {
        Proposition::True => true,
        Proposition::Atom(atom) => *atom == zone.target,
        _ => false,
    }
}

/// Refuse to start on a malformed graph: missing pseudostate, dangling
/// transition endpoints, or guards/constraints/actions referencing things
/// the assembly does not have.
fn validate(machine: &ControlMachine) -> Result<(), SolveError> {
    let assembly = machine.assembly();
    if machine.pseudostate().0 >= machine.state_count() {
        return Err(SolveError::MissingPseudostate(machine.name().to_string()));
    }
    for (index, transition) in machine.transitions() {
        if transition.source.0 >= machine.state_count()
            || transition.target.0 >= machine.state_count()
        {
            return Err(SolveError::InvalidTransition { index });
        }
        validate_proposition(&transition.guard, assembly)?;
        for action in &transition.actions {
            let component = assembly
                .machine(&action.machine)
                .ok_or_else(|| ModelError::UnknownMachine(action.machine.clone()))?;
            if !component.events().contains(action.event.as_str()) {
                return Err(SolveError::Model(ModelError::UnknownEvent {
                    machine: action.machine.clone(),
                    event: action.event.clone(),
                }));
            }
        }
    }
    for (_, state) in machine.states() {
        if let Some(constraint) = &state.constraint {
            validate_proposition(constraint, assembly)?;
        }
    }
    Ok(())
}

fn validate_proposition(prop: &Proposition, assembly: &Assembly) -> Result<(), SolveError> {
    for atom in prop.atoms() {
        let component = assembly
            .machine(&atom.machine)
            .ok_or_else(|| SolveError::UnknownGuardMachine {
                machine: atom.machine.clone(),
            })?;
        if component.state_by_name(&atom.state).is_none() {
            return Err(SolveError::UnknownGuardState {
                machine: atom.machine.clone(),
                state: atom.state.clone(),
            });
        }
    }
    Ok(())
}
