//! Data model for assemblies of communicating finite-state machines.
//!
//! An [`Assembly`] is a named collection of component [`Machine`]s. Each
//! machine is a directed graph of named states with one pseudostate marking
//! its entry point. The joint state space of an assembly is described by
//! [`Configuration`]s: partial assignments of states to machines, built from
//! [`Atom`]s of the form `machine.state`.
//!
//! This crate owns only the graph snapshots and the assignment values; the
//! region lattice and the fixed-point solver live in `skein-semantics`.

pub mod action;
pub mod assembly;
pub mod atom;
pub mod config;
pub mod error;
pub mod machine;

pub use action::Action;
pub use assembly::Assembly;
pub use atom::Atom;
pub use config::Configuration;
pub use error::ModelError;
pub use machine::{Machine, State, StateId, Transition};
