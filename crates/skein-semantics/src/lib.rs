//! Region lattice, semantic transformers, and the fixed-point solver.
//!
//! A [`Region`] is an implication-minimized set of configurations: the core
//! unit of symbolic reachability information over an assembly. Semantic
//! transformers map regions through the effect of firing component
//! transitions and events; [`find_exit_zones`] detects autonomous escapes a
//! region does not yet account for; and [`solve`] runs the worklist
//! fixed-point over a distinguished [`ControlMachine`], producing the region
//! reachable at each of its states.

pub mod control;
pub mod exit;
pub mod region;
pub mod solver;
mod transform;

pub use control::{ControlMachine, ControlState, ControlTransition};
pub use exit::{find_exit_zones, ExitZone};
pub use region::Region;
pub use solver::{compute_all_state_semantics, solve, Solution, SolveError};
