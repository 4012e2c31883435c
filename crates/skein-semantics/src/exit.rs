//! Detection of autonomous escapes from a region.

use crate::region::Region;
use skein_model::{Assembly, Atom, Configuration, Transition};
use std::collections::BTreeSet;
use std::fmt;

/// A witness that an autonomous component transition can fire from inside a
/// region and land outside it: the region does not yet account for this
/// internal move.
///
/// Reactive transitions of the control machine absorb such escapes by
/// matching the zone's target atom against their own guard.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ExitZone {
    /// Component machine the transition belongs to.
    pub machine: String,
    /// The autonomous transition itself.
    pub transition: Transition,
    /// `machine.source` atom: the condition under which the transition fires.
    pub source: Atom,
    /// `machine.target` atom: the landing condition not yet covered.
    pub target: Atom,
}

impl fmt::Display for ExitZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: ({}->{})",
            self.machine, self.source.state, self.target.state
        )
    }
}

/// Find every exit zone of `region`: autonomous component transitions whose
/// source condition intersects the region while their target condition does
/// not yet.
///
/// This is a pure function of the region; the solver recomputes it on every
/// visit and once more in a final pass rather than maintaining a cache.
pub fn find_exit_zones(region: &Region, assembly: &Assembly) -> BTreeSet<ExitZone> {
    let mut zones = BTreeSet::new();
    for (machine_id, machine) in assembly.machines() {
        for transition in machine.transitions().filter(|t| t.is_autonomous()) {
            let source = Atom::new(machine_id, machine.state_name(transition.source));
            let source_cube = Region::from_configuration(
                region.assembly_id(),
                Configuration::singleton(&source.machine, &source.state),
            );
            if region.intersection(&source_cube).is_empty() {
                continue;
            }
            let target = Atom::new(machine_id, machine.state_name(transition.target));
            let target_cube = Region::from_configuration(
                region.assembly_id(),
                Configuration::singleton(&target.machine, &target.state),
            );
            if region.intersection(&target_cube).is_empty() {
                zones.insert(ExitZone {
                    machine: machine_id.to_string(),
                    transition: transition.clone(),
                    source,
                    target,
                });
            }
        }
    }
    zones
}
