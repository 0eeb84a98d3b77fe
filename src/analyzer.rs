//! This module provides functions for analyzing transition tables before a run. The findings
//! are advisory: every table is runnable, but some shapes almost always indicate a mistake.

use std::collections::{BTreeSet, HashSet};
use std::fmt;

use crate::machine::Machine;
use crate::types::{StateId, Symbol, INITIAL_STATE};

/// Something worth pointing out about a table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Finding {
    /// States that no sequence of transitions from the initial state can reach.
    UnreachableStates(Vec<StateId>),
    /// No accepting state is reachable, so every halting run rejects.
    NoReachableAcceptingState,
    /// `(state, symbol)` pairs with more than one transition. These are explored in order and
    /// share the tape, so an earlier branch can change what a later one sees.
    Nondeterministic(Vec<(StateId, Symbol)>),
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Finding::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {:?}", states)
            }
            Finding::NoReachableAcceptingState => {
                write!(f, "No accepting state is reachable; every halting run rejects")
            }
            Finding::Nondeterministic(pairs) => {
                write!(f, "Nondeterministic transitions for (state, symbol): {:?}", pairs)
            }
        }
    }
}

/// Analyzes a machine and returns every finding, in a fixed order.
///
/// # Arguments
///
/// * `machine` - A reference to the `Machine` to be analyzed.
///
/// # Returns
///
/// * `Vec<Finding>` - Empty if nothing stands out.
pub fn analyze(machine: &Machine) -> Vec<Finding> {
    [
        check_unreachable_states,
        check_reachable_accepting_state,
        check_nondeterminism,
    ]
    .iter()
    .filter_map(|check| check(machine))
    .collect()
}

/// Collects the states reachable from the initial state, following every transition.
fn reachable_states(machine: &Machine) -> HashSet<StateId> {
    let mut visited = HashSet::new();
    let mut queue = vec![INITIAL_STATE];

    while let Some(id) = queue.pop() {
        if !visited.insert(id) {
            continue;
        }

        if let Some(state) = machine.state(id) {
            queue.extend(
                state
                    .transitions
                    .iter()
                    .map(|t| t.next_state)
                    .filter(|next| !visited.contains(next)),
            );
        }
    }

    visited
}

fn check_unreachable_states(machine: &Machine) -> Option<Finding> {
    let reachable = reachable_states(machine);
    let unreachable: Vec<StateId> = machine
        .states()
        .map(|(id, _)| id)
        .filter(|id| !reachable.contains(id))
        .collect();

    (!unreachable.is_empty()).then_some(Finding::UnreachableStates(unreachable))
}

fn check_reachable_accepting_state(machine: &Machine) -> Option<Finding> {
    let accepting = reachable_states(machine)
        .into_iter()
        .filter_map(|id| machine.state(id))
        .any(|state| state.accepts);

    (!accepting).then_some(Finding::NoReachableAcceptingState)
}

fn check_nondeterminism(machine: &Machine) -> Option<Finding> {
    let mut pairs = Vec::new();

    for (id, state) in machine.states() {
        let mut seen = HashSet::new();
        let mut repeated = BTreeSet::new();
        for transition in &state.transitions {
            if !seen.insert(transition.read) {
                repeated.insert(transition.read);
            }
        }
        pairs.extend(repeated.into_iter().map(|symbol| (id, symbol)));
    }

    (!pairs.is_empty()).then_some(Finding::Nondeterministic(pairs))
}
