//! Lattice laws of the region domain, checked on randomized regions over a
//! small fixed assembly.
//!
//! Structural equality is meaningful here because insertion keeps regions
//! implication-minimized, so the laws that hold up to canonical form
//! (union commutativity, idempotence) are asserted structurally, while laws
//! that only hold up to logical meaning use mutual implication.

use proptest::prelude::*;
use skein_model::{Assembly, Configuration, Machine};
use skein_semantics::Region;
use skein_syntax::{parse, Proposition};

const M1_STATES: [&str; 3] = ["A", "B", "C"];
const M2_STATES: [&str; 2] = ["X", "Y"];

fn two_machine_assembly() -> Assembly {
    let mut m1 = Machine::new("m1");
    let states: Vec<_> = M1_STATES.iter().map(|s| m1.add_state(*s)).collect();
    m1.add_transition(m1.pseudostate(), states[0], None);

    let mut m2 = Machine::new("m2");
    let states: Vec<_> = M2_STATES.iter().map(|s| m2.add_state(*s)).collect();
    m2.add_transition(m2.pseudostate(), states[0], None);

    let mut assembly = Assembly::new("lattice");
    assembly.add_machine("m1", m1);
    assembly.add_machine("m2", m2);
    assembly
}

/// A configuration that may leave either machine unconstrained, so regions
/// mix cubes of different generality.
fn arb_configuration() -> impl Strategy<Value = Configuration> {
    (
        prop::option::of(0..M1_STATES.len()),
        prop::option::of(0..M2_STATES.len()),
    )
        .prop_map(|(m1, m2)| {
            let mut config = Configuration::empty();
            if let Some(i) = m1 {
                config.constrain("m1", M1_STATES[i]);
            }
            if let Some(i) = m2 {
                config.constrain("m2", M2_STATES[i]);
            }
            config
        })
}

fn arb_region() -> impl Strategy<Value = Region> {
    prop::collection::vec(arb_configuration(), 0..5).prop_map(|configs| {
        let mut region = Region::bottom("lattice");
        for config in configs {
            region.insert(config);
        }
        region
    })
}

/// A region whose members are all full configurations, the shape on which
/// the enumerative complement is an involution.
fn arb_full_region() -> impl Strategy<Value = Region> {
    prop::collection::vec((0..M1_STATES.len(), 0..M2_STATES.len()), 0..7).prop_map(|picks| {
        let mut region = Region::bottom("lattice");
        for (i, j) in picks {
            let mut config = Configuration::singleton("m1", M1_STATES[i]);
            config.constrain("m2", M2_STATES[j]);
            region.insert(config);
        }
        region
    })
}

fn arb_proposition() -> impl Strategy<Value = Proposition> {
    let leaf = prop_oneof![
        Just(Proposition::True),
        Just(Proposition::False),
        (0..M1_STATES.len()).prop_map(|i| Proposition::atom("m1", M1_STATES[i])),
        (0..M2_STATES.len()).prop_map(|i| Proposition::atom("m2", M2_STATES[i])),
    ];
    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Proposition::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Proposition::or(l, r)),
            inner.prop_map(Proposition::negate),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn regions_stay_implication_minimized(region in arb_region()) {
        let members: Vec<_> = region.configurations().collect();
        for a in &members {
            for b in &members {
                if a != b {
                    prop_assert!(
                        !a.implies(b),
                        "{a} implies {b} but both are members"
                    );
                }
            }
        }
    }

    #[test]
    fn union_is_commutative_and_idempotent(a in arb_region(), b in arb_region()) {
        prop_assert_eq!(a.union(&b), b.union(&a));
        prop_assert_eq!(a.union(&a), a);
    }

    #[test]
    fn union_is_associative(a in arb_region(), b in arb_region(), c in arb_region()) {
        prop_assert_eq!(a.union(&b).union(&c), a.union(&b.union(&c)));
    }

    #[test]
    fn mutual_implication_forces_structural_equality(a in arb_region(), b in arb_region()) {
        // On minimized antichains implication is antisymmetric: mutual
        // implication collapses to set equality by transitivity.
        prop_assert_eq!(a.implies(&b) && b.implies(&a), a == b);
    }

    #[test]
    fn union_and_intersection_bound_their_operands(a in arb_region(), b in arb_region()) {
        prop_assert!(a.implies(&a.union(&b)));
        prop_assert!(b.implies(&a.union(&b)));
        prop_assert!(a.intersection(&b).implies(&a));
        prop_assert!(a.intersection(&b).implies(&b));
    }

    #[test]
    fn empty_difference_means_semantic_containment(a in arb_region(), b in arb_region()) {
        let assembly = two_machine_assembly();
        let contained = assembly
            .universe()
            .iter()
            .all(|config| !a.covers(config) || b.covers(config));
        prop_assert_eq!(a.difference(&b, &assembly).is_empty(), contained);
        // Syntactic implication is sound for containment, never complete.
        if a.implies(&b) {
            prop_assert!(contained);
        }
    }

    #[test]
    fn enumerative_and_symbolic_complements_agree(region in arb_region()) {
        let assembly = two_machine_assembly();
        let enumerative = region.complement(&assembly);
        let symbolic = region.complement_symbolic(&assembly);
        prop_assert!(
            enumerative.equivalent(&symbolic, &assembly),
            "enumerative {enumerative} vs symbolic {symbolic}"
        );
    }

    #[test]
    fn complement_is_an_involution_on_full_regions(region in arb_full_region()) {
        let assembly = two_machine_assembly();
        prop_assert_eq!(region.complement(&assembly).complement(&assembly), region);
    }

    #[test]
    fn de_morgan_holds_up_to_equivalence(a in arb_region(), b in arb_region()) {
        let assembly = two_machine_assembly();
        let lhs = a.union(&b).complement(&assembly);
        let rhs = a.complement(&assembly).intersection(&b.complement(&assembly));
        prop_assert!(lhs.equivalent(&rhs, &assembly), "{lhs} vs {rhs}");
    }

    #[test]
    fn proposition_round_trip_preserves_meaning(region in arb_region()) {
        let assembly = two_machine_assembly();
        let back = Region::from_proposition(&region.to_proposition(), &assembly);
        prop_assert!(region.equivalent(&back, &assembly), "{region} vs {back}");
    }

    #[test]
    fn printed_propositions_reparse_to_the_same_meaning(prop in arb_proposition()) {
        let assembly = two_machine_assembly();
        let reparsed = parse(&prop.to_string(), &assembly).unwrap();
        for config in assembly.universe() {
            prop_assert_eq!(
                prop.evaluate(&config),
                reparsed.evaluate(&config),
                "disagree on {} for {}",
                config,
                prop
            );
        }
    }

    #[test]
    fn normal_forms_preserve_meaning(prop in arb_proposition()) {
        let assembly = two_machine_assembly();
        for config in assembly.universe() {
            let expected = prop.evaluate(&config);
            prop_assert_eq!(prop.to_nnf().evaluate(&config), expected);
            prop_assert_eq!(prop.to_cnf().evaluate(&config), expected);
            prop_assert_eq!(prop.to_dnf().evaluate(&config), expected);
        }
    }

    #[test]
    fn simplify_preserves_meaning(region in arb_region()) {
        let assembly = two_machine_assembly();
        prop_assert!(region.simplify(&assembly).equivalent(&region, &assembly));
    }
}
