//! The proposition expression tree and its rewrite rules.

use skein_model::{Atom, Configuration};
use std::fmt;

/// A Boolean guard expression over `machine.state` atoms.
///
/// The tree is a closed tagged union: every consumer matches exhaustively,
/// so adding a node kind forces every evaluation and rewrite site to handle
/// it. Trees are finite and acyclic by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Proposition {
    /// Constant truth.
    True,
    /// Constant falsehood.
    False,
    /// An atomic `machine.state` fact.
    Atom(Atom),
    /// Conjunction.
    And(Box<Proposition>, Box<Proposition>),
    /// Disjunction.
    Or(Box<Proposition>, Box<Proposition>),
    /// Negation.
    Not(Box<Proposition>),
}

impl Proposition {
    /// An atomic proposition.
    pub fn atom(machine: impl Into<String>, state: impl Into<String>) -> Self {
        Proposition::Atom(Atom::new(machine, state))
    }

    /// Conjunction of two propositions.
    pub fn and(left: Proposition, right: Proposition) -> Self {
        Proposition::And(Box::new(left), Box::new(right))
    }

    /// Disjunction of two propositions.
    pub fn or(left: Proposition, right: Proposition) -> Self {
        Proposition::Or(Box::new(left), Box::new(right))
    }

    /// Negation of this proposition.
    pub fn negate(self) -> Self {
        Proposition::Not(Box::new(self))
    }

    /// Evaluate against a concrete assignment. An atom holds iff the
    /// configuration assigns exactly that state to that machine; a machine
    /// the configuration leaves unconstrained satisfies no atom.
    pub fn evaluate(&self, assignment: &Configuration) -> bool {
        match self {
            Proposition::True => true,
            Proposition::False => false,
            Proposition::Atom(atom) => {
                assignment.state_of(&atom.machine) == Some(atom.state.as_str())
            }
            Proposition::And(l, r) => l.evaluate(assignment) && r.evaluate(assignment),
            Proposition::Or(l, r) => l.evaluate(assignment) || r.evaluate(assignment),
            Proposition::Not(p) => !p.evaluate(assignment),
        }
    }

    /// Negation normal form: push negation down to atoms via De Morgan,
    /// eliminating double negations and folding negated constants.
    pub fn to_nnf(&self) -> Proposition {
        match self {
            Proposition::True | Proposition::False | Proposition::Atom(_) => self.clone(),
            Proposition::And(l, r) => Proposition::and(l.to_nnf(), r.to_nnf()),
            Proposition::Or(l, r) => Proposition::or(l.to_nnf(), r.to_nnf()),
            Proposition::Not(inner) => match inner.as_ref() {
                Proposition::Not(p) => p.to_nnf(),
                Proposition::And(l, r) => Proposition::or(
                    l.clone().negate().to_nnf(),
                    r.clone().negate().to_nnf(),
                ),
                Proposition::Or(l, r) => Proposition::and(
                    l.clone().negate().to_nnf(),
                    r.clone().negate().to_nnf(),
                ),
                Proposition::True => Proposition::False,
                Proposition::False => Proposition::True,
                Proposition::Atom(_) => self.clone(),
            },
        }
    }

    /// Conjunctive normal form: NNF, then distribute OR over AND. A single
    /// top-level pass suffices because the recursive calls normalize subtrees
    /// bottom-up.
    pub fn to_cnf(&self) -> Proposition {
        distribute_or_over_and(&self.to_nnf())
    }

    /// Disjunctive normal form: NNF, then distribute AND over OR.
    pub fn to_dnf(&self) -> Proposition {
        distribute_and_over_or(&self.to_nnf())
    }

    /// Structural substitution: replace every atom equal to
    /// `machine.from_state` with `machine.to_state`. Connectives pass through
    /// unchanged.
    pub fn transform(&self, machine: &str, from_state: &str, to_state: &str) -> Proposition {
        match self {
            Proposition::True | Proposition::False => self.clone(),
            Proposition::Atom(atom) => {
                if atom.machine == machine && atom.state == from_state {
                    Proposition::atom(machine, to_state)
                } else {
                    self.clone()
                }
            }
            Proposition::And(l, r) => Proposition::and(
                l.transform(machine, from_state, to_state),
                r.transform(machine, from_state, to_state),
            ),
            Proposition::Or(l, r) => Proposition::or(
                l.transform(machine, from_state, to_state),
                r.transform(machine, from_state, to_state),
            ),
            Proposition::Not(p) => {
                Proposition::Not(Box::new(p.transform(machine, from_state, to_state)))
            }
        }
    }

    /// All atoms mentioned by this proposition, in tree order.
    pub fn atoms(&self) -> Vec<&Atom> {
        let mut atoms = Vec::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms<'a>(&'a self, into: &mut Vec<&'a Atom>) {
        match self {
            Proposition::True | Proposition::False => {}
            Proposition::Atom(atom) => into.push(atom),
            Proposition::And(l, r) | Proposition::Or(l, r) => {
                l.collect_atoms(into);
                r.collect_atoms(into);
            }
            Proposition::Not(p) => p.collect_atoms(into),
        }
    }

    /// Binding strength, for minimal parenthesization in `Display`.
    fn precedence(&self) -> u8 {
        match self {
            Proposition::Or(..) => 1,
            Proposition::And(..) => 2,
            Proposition::Not(..) => 3,
            Proposition::True | Proposition::False | Proposition::Atom(_) => 4,
        }
    }

    fn fmt_child(&self, parent_prec: u8, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.precedence() < parent_prec {
            write!(f, "({self})")
        } else {
            write!(f, "{self}")
        }
    }
}

/// Distribute OR over AND: `A OR (B AND C)` becomes `(A OR B) AND (A OR C)`.
/// Assumes NNF input.
fn distribute_or_over_and(expr: &Proposition) -> Proposition {
    match expr {
        Proposition::Or(l, r) => {
            let left = distribute_or_over_and(l);
            let right = distribute_or_over_and(r);
            if let Proposition::And(a, b) = left {
                Proposition::and(
                    distribute_or_over_and(&Proposition::or(*a, right.clone())),
                    distribute_or_over_and(&Proposition::or(*b, right)),
                )
            } else if let Proposition::And(a, b) = right {
                Proposition::and(
                    distribute_or_over_and(&Proposition::or(left.clone(), *a)),
                    distribute_or_over_and(&Proposition::or(left, *b)),
                )
            } else {
                Proposition::or(left, right)
            }
        }
        Proposition::And(l, r) => {
            Proposition::and(distribute_or_over_and(l), distribute_or_over_and(r))
        }
        _ => expr.clone(),
    }
}

/// Distribute AND over OR: `A AND (B OR C)` becomes `(A AND B) OR (A AND C)`.
/// Assumes NNF input.
fn distribute_and_over_or(expr: &Proposition) -> Proposition {
    match expr {
        Proposition::And(l, r) => {
            let left = distribute_and_over_or(l);
            let right = distribute_and_over_or(r);
            if let Proposition::Or(a, b) = left {
                Proposition::or(
                    distribute_and_over_or(&Proposition::and(*a, right.clone())),
                    distribute_and_over_or(&Proposition::and(*b, right)),
                )
            } else if let Proposition::Or(a, b) = right {
                Proposition::or(
                    distribute_and_over_or(&Proposition::and(left.clone(), *a)),
                    distribute_and_over_or(&Proposition::and(left, *b)),
                )
            } else {
                Proposition::and(left, right)
            }
        }
        Proposition::Or(l, r) => {
            Proposition::or(distribute_and_over_or(l), distribute_and_over_or(r))
        }
        _ => expr.clone(),
    }
}

impl fmt::Display for Proposition {
    /// Infix form parsable back by the parser, with minimal parentheses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Proposition::True => f.write_str("TRUE"),
            Proposition::False => f.write_str("FALSE"),
            Proposition::Atom(atom) => write!(f, "{atom}"),
            Proposition::And(l, r) => {
                l.fmt_child(2, f)?;
                f.write_str(" AND ")?;
                r.fmt_child(2, f)
            }
            Proposition::Or(l, r) => {
                l.fmt_child(1, f)?;
                f.write_str(" OR ")?;
                r.fmt_child(1, f)
            }
            Proposition::Not(p) => {
                f.write_str("NOT ")?;
                p.fmt_child(3, f)
            }
        }
    }
}
