//! Semantic transformers: mapping a region through the effect of firing a
//! component transition or event.

use crate::region::Region;
use skein_model::{Assembly, Configuration, ModelError, Transition};

impl Region {
    /// Apply the effect of raising `event` in `machine`: every transition of
    /// the machine labeled with the event fires wherever it can.
    ///
    /// Several transitions on the same event model nondeterministic choice;
    /// the outcome is the union of every firing, not a pick. For each
    /// matching transition the *domain* is `self ∩ {machine = source}`; the
    /// *codomain* substitutes the target state for the source state in every
    /// domain configuration. The result is
    /// `(self \ ⋃domains) ∪ ⋃codomains`.
    ///
    /// An event with no matching transition is a caller error: it signals a
    /// guard or action referencing a nonexistent event, so it fails rather
    /// than silently no-opping.
    pub fn apply_event(
        &self,
        machine_id: &str,
        event: &str,
        assembly: &Assembly,
    ) -> Result<Region, ModelError> {
        self.assert_assembly(assembly);
        let machine = assembly
            .machine(machine_id)
            .ok_or_else(|| ModelError::UnknownMachine(machine_id.to_string()))?;

        let triggered: Vec<&Transition> = machine.transitions_triggered_by(event).collect();
        if triggered.is_empty() {
            return Err(ModelError::UnknownEvent {
                machine: machine_id.to_string(),
                event: event.to_string(),
            });
        }

        let mut domains = Region::bottom(self.assembly_id());
        let mut codomains = Region::bottom(self.assembly_id());
        for transition in triggered {
            let source = machine.state_name(transition.source);
            let target = machine.state_name(transition.target);
            let source_cube = Region::from_configuration(
                self.assembly_id(),
                Configuration::singleton(machine_id, source),
            );
            let domain = self.intersection(&source_cube);
            if !domain.is_empty() {
                codomains = codomains.union(&domain.codomain(machine_id, source, target));
                domains = domains.union(&domain);
            }
        }

        Ok(self.difference(&domains, assembly).union(&codomains))
    }

    /// Single-transition specialization of [`Region::apply_event`], used by
    /// the reactive path of the solver. An empty domain leaves the region
    /// unchanged.
    pub fn apply_transition(
        &self,
        machine_id: &str,
        transition: &Transition,
        assembly: &Assembly,
    ) -> Result<Region, ModelError> {
        self.assert_assembly(assembly);
        let machine = assembly
            .machine(machine_id)
            .ok_or_else(|| ModelError::UnknownMachine(machine_id.to_string()))?;
        let source = machine.state_name(transition.source);
        let target = machine.state_name(transition.target);

        let source_cube = Region::from_configuration(
            self.assembly_id(),
            Configuration::singleton(machine_id, source),
        );
        let domain = self.intersection(&source_cube);
        if domain.is_empty() {
            return Ok(self.clone());
        }

        let codomain = domain.codomain(machine_id, source, target);
        Ok(self.difference(&domain, assembly).union(&codomain))
    }

    /// Substitute `target` for `source` in every configuration constraining
    /// `machine_id` to `source`.
    fn codomain(&self, machine_id: &str, source: &str, target: &str) -> Region {
        let mut codomain = Region::bottom(self.assembly_id());
        for config in self.configurations() {
            if config.state_of(machine_id) == Some(source) {
                codomain.insert(config.replace_constraint(machine_id, target));
            }
        }
        codomain
    }
}
