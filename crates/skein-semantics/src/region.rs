//! The configuration lattice: implication-minimized sets of configurations.

use skein_model::{Assembly, Configuration};
use skein_syntax::Proposition;
use std::collections::BTreeSet;
use std::fmt;

/// A de-duplicated, implication-minimized set of configurations representing
/// a union of partial assignments, tagged with the assembly it belongs to.
///
/// Invariant: the set is an antichain with respect to implication — no member
/// implies another distinct member. [`Region::insert`] enforces this by
/// dropping more-specific newcomers and evicting more-specific incumbents,
/// so the representation keeps only the most general cubes.
///
/// # Panics
///
/// Binary operations panic when the two operands are tagged with different
/// assembly identities. That situation is a programming error in the caller,
/// not a runtime condition to recover from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    assembly: String,
    configs: BTreeSet<Configuration>,
}

impl Region {
    /// `⊥`: the empty region.
    pub fn bottom(assembly: impl Into<String>) -> Self {
        Self {
            assembly: assembly.into(),
            configs: BTreeSet::new(),
        }
    }

    /// `⊤`: the full enumerated universe of the assembly.
    pub fn top(assembly: &Assembly) -> Self {
        // Universe configurations are fully specified and pairwise
        // incomparable, so no minimization is needed.
        Self {
            assembly: assembly.id().to_string(),
            configs: assembly.universe().into_iter().collect(),
        }
    }

    /// The assembly's initial region: every combination of pseudostate-
    /// reachable initial states.
    pub fn initial(assembly: &Assembly) -> Self {
        let mut region = Region::bottom(assembly.id());
        for config in assembly.initial_configurations() {
            region.insert(config);
        }
        region
    }

    /// A region holding a single configuration.
    pub fn from_configuration(assembly: impl Into<String>, config: Configuration) -> Self {
        let mut region = Region::bottom(assembly);
        region.insert(config);
        region
    }

    /// The region where `prop` holds: the proposition evaluated over every
    /// configuration of the assembly's universe.
    pub fn from_proposition(prop: &Proposition, assembly: &Assembly) -> Self {
        let mut region = Region::bottom(assembly.id());
        for config in assembly.universe() {
            if prop.evaluate(&config) {
                region.configs.insert(config);
            }
        }
        region
    }

    /// Identity of the assembly this region belongs to.
    pub fn assembly_id(&self) -> &str {
        &self.assembly
    }

    /// Iterate the member configurations in lexicographic order.
    pub fn configurations(&self) -> impl Iterator<Item = &Configuration> {
        self.configs.iter()
    }

    /// Number of member configurations.
    pub fn len(&self) -> usize {
        self.configs.len()
    }

    /// Whether this region is `⊥`.
    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    /// Add a configuration, maintaining the antichain invariant: a newcomer
    /// implying an incumbent is dropped, and incumbents implying the newcomer
    /// are evicted.
    pub fn insert(&mut self, config: Configuration) {
        for existing in &self.configs {
            if config.implies(existing) {
                return;
            }
        }
        self.configs.retain(|existing| !existing.implies(&config));
        self.configs.insert(config);
    }

    /// Set union followed by minimization: only the most general members of
    /// either operand survive.
    pub fn union(&self, other: &Region) -> Region {
        self.assert_same_assembly(other);
        let mut result = Region::bottom(self.assembly.clone());
        for config in self.configs.iter().chain(&other.configs) {
            result.insert(config.clone());
        }
        result
    }

    /// Pairwise intersection over the cross product, discarding empty
    /// intersections, then minimized.
    pub fn intersection(&self, other: &Region) -> Region {
        self.assert_same_assembly(other);
        let mut result = Region::bottom(self.assembly.clone());
        for a in &self.configs {
            for b in &other.configs {
                if let Some(merged) = a.intersect(b) {
                    result.insert(merged);
                }
            }
        }
        result
    }

    /// Enumerative complement: every universe configuration that does not
    /// imply a member of this region. This is the default strategy.
    pub fn complement(&self, assembly: &Assembly) -> Region {
        self.assert_assembly(assembly);
        let mut result = Region::bottom(self.assembly.clone());
        for config in assembly.universe() {
            let covered = self.configs.iter().any(|member| config.implies(member));
            if !covered {
                result.insert(config);
            }
        }
        result
    }

    /// Symbolic complement: convert to a proposition, negate it, and
    /// evaluate the negation over the universe. Exists as an independent
    /// cross-check of [`Region::complement`]; the two must agree.
    pub fn complement_symbolic(&self, assembly: &Assembly) -> Region {
        self.assert_assembly(assembly);
        Region::from_proposition(&self.to_proposition().negate(), assembly)
    }

    /// Set difference, computed as intersection with the complement.
    pub fn difference(&self, other: &Region, assembly: &Assembly) -> Region {
        self.intersection(&other.complement(assembly))
    }

    /// Whether every configuration of this region implies some configuration
    /// of `other`. A syntactic check: sound for containment but blind to
    /// covers assembled from more specific pieces, which is what the solver
    /// wants for cheap monotonicity tests.
    pub fn implies(&self, other: &Region) -> bool {
        self.assert_same_assembly(other);
        self.configs
            .iter()
            .all(|c| other.configs.iter().any(|o| c.implies(o)))
    }

    /// Whether `config` satisfies some member of this region.
    pub fn covers(&self, config: &Configuration) -> bool {
        self.configs.iter().any(|member| config.implies(member))
    }

    /// Semantic equality: the two regions cover exactly the same universe
    /// configurations. Unlike [`Region::implies`] in both directions, this
    /// recognizes `{m1.A}` and its full-configuration expansion as equal.
    pub fn equivalent(&self, other: &Region, assembly: &Assembly) -> bool {
        self.assert_same_assembly(other);
        self.assert_assembly(assembly);
        assembly
            .universe()
            .iter()
            .all(|config| self.covers(config) == other.covers(config))
    }

    /// Generalize the representation: for every single-atom cube `m.S` whose
    /// full-universe region is contained in this one, insert the cube (which
    /// then evicts the more specific members it covers).
    pub fn simplify(&self, assembly: &Assembly) -> Region {
        self.assert_assembly(assembly);
        let mut result = self.clone();
        for atom in assembly.guard_atoms() {
            let cube = Configuration::singleton(atom.machine.clone(), atom.state.clone());
            let covered = Region::from_proposition(&Proposition::Atom(atom), assembly);
            if covered.implies(self) {
                result.insert(cube);
            }
        }
        result
    }

    /// The symbolic form: a disjunction of each configuration's conjunction
    /// of atoms. `⊥` maps to `FALSE`; an empty configuration contributes
    /// `TRUE`.
    pub fn to_proposition(&self) -> Proposition {
        self.configs
            .iter()
            .map(|config| {
                config
                    .atoms()
                    .map(Proposition::Atom)
                    .reduce(Proposition::and)
                    .unwrap_or(Proposition::True)
            })
            .reduce(Proposition::or)
            .unwrap_or(Proposition::False)
    }

    fn assert_same_assembly(&self, other: &Region) {
        assert_eq!(
            self.assembly, other.assembly,
            "regions belong to different assemblies"
        );
    }

    pub(crate) fn assert_assembly(&self, assembly: &Assembly) {
        assert_eq!(
            self.assembly,
            assembly.id(),
            "region does not belong to the given assembly"
        );
    }
}

impl fmt::Display for Region {
    /// Canonical form: space-separated parenthesized configurations in
    /// lexicographic order, e.g. `(m1.R,m2.Off) (m1.G,m2.Off)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, config) in self.configs.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{config}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skein_model::Machine;

    fn assembly() -> Assembly {
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

    fn cube(pairs: &[(&str, &str)]) -> Configuration {
        let mut c = Configuration::empty();
        for (m, s) in pairs {
            c.constrain(*m, *s);
        }
        c
    }

    #[test]
    fn insert_drops_more_specific_newcomers() {
        let mut region = Region::bottom("traffic");
        region.insert(cube(&[("m1", "R")]));
        region.insert(cube(&[("m1", "R"), ("m2", "Off")]));
        assert_eq!(region.len(), 1);
        assert!(region.configurations().next().unwrap().len() == 1);
    }

    #[test]
    fn insert_evicts_more_specific_incumbents() {
        let mut region = Region::bottom("traffic");
        region.insert(cube(&[("m1", "R"), ("m2", "Off")]));
        region.insert(cube(&[("m1", "R"), ("m2", "On")]));
        assert_eq!(region.len(), 2);
        region.insert(cube(&[("m1", "R")]));
        assert_eq!(region.len(), 1);
        assert_eq!(region.to_string(), "(m1.R)");
    }

    #[test]
    fn union_keeps_most_general_members() {
        let a = Region::from_configuration("traffic", cube(&[("m1", "R"), ("m2", "Off")]));
        let b = Region::from_configuration("traffic", cube(&[("m1", "R")]));
        let union = a.union(&b);
        assert_eq!(union.len(), 1);
        assert_eq!(union.to_string(), "(m1.R)");
        assert!(a.implies(&union));
        assert!(b.implies(&union));
    }

    #[test]
    fn intersection_discards_conflicts() {
        let a = Region::from_configuration("traffic", cube(&[("m1", "R")]));
        let b = Region::from_configuration("traffic", cube(&[("m1", "G")]));
        assert!(a.intersection(&b).is_empty());

        let c = Region::from_configuration("traffic", cube(&[("m2", "Off")]));
        let merged = a.intersection(&c);
        assert_eq!(merged.to_string(), "(m1.R,m2.Off)");
    }

    #[test]
    fn complement_strategies_agree() {
        let asm = assembly();
        let mut region = Region::bottom(asm.id());
        region.insert(cube(&[("m1", "R")]));
        region.insert(cube(&[("m1", "G"), ("m2", "On")]));

        let enumerative = region.complement(&asm);
        let symbolic = region.complement_symbolic(&asm);
        assert!(enumerative.equivalent(&symbolic, &asm));
        // 6 universe configs, minus 2 with m1=R, minus (G,On).
        assert_eq!(enumerative.len(), 3);
        assert!(region.intersection(&enumerative).is_empty());
    }

    #[test]
    fn complement_of_bottom_is_top() {
        let asm = assembly();
        let bottom = Region::bottom(asm.id());
        assert!(bottom.complement(&asm).equivalent(&Region::top(&asm), &asm));
        assert!(Region::top(&asm).complement(&asm).is_empty());
    }

    #[test]
    fn equivalence_sees_through_representation() {
        let asm = assembly();
        let a = Region::from_proposition(
            &Proposition::atom("m1", "R"),
            &asm,
        );
        let b = Region::from_configuration(asm.id(), cube(&[("m1", "R")]));
        // Syntactic implication only holds towards the more general form.
        assert!(a.implies(&b));
        assert!(!b.implies(&a));
        assert!(a.equivalent(&b, &asm));
        // But the representations differ.
        assert_ne!(a, b);
    }

    #[test]
    fn difference_removes_overlap() {
        let asm = assembly();
        let all_r = Region::from_configuration(asm.id(), cube(&[("m1", "R")]));
        let off = Region::from_configuration(asm.id(), cube(&[("m2", "Off")]));
        let diff = all_r.difference(&off, &asm);
        assert!(diff.equivalent(
            &Region::from_configuration(asm.id(), cube(&[("m1", "R"), ("m2", "On")])),
            &asm,
        ));
    }

    #[test]
    fn simplify_generalizes_covered_cubes() {
        let asm = assembly();
        let mut region = Region::bottom(asm.id());
        region.insert(cube(&[("m1", "R"), ("m2", "Off")]));
        region.insert(cube(&[("m1", "R"), ("m2", "On")]));
        let simplified = region.simplify(&asm);
        assert!(simplified.equivalent(&region, &asm));
        assert_eq!(simplified.to_string(), "(m1.R)");
    }

    #[test]
    fn to_proposition_round_trips_through_evaluation() {
        let asm = assembly();
        let mut region = Region::bottom(asm.id());
        region.insert(cube(&[("m1", "R")]));
        region.insert(cube(&[("m1", "G"), ("m2", "On")]));
        let prop = region.to_proposition();
        let rebuilt = Region::from_proposition(&prop, &asm);
        assert!(rebuilt.equivalent(&region, &asm));

        assert_eq!(Region::bottom(asm.id()).to_proposition(), Proposition::False);
    }

    #[test]
    #[should_panic(expected = "different assemblies")]
    fn mixing_assemblies_panics() {
        let a = Region::bottom("one");
        let b = Region::bottom("two");
        let _ = a.union(&b);
    }
}
