//! This module defines the `Machine` struct, the state table and transition engine of a
//! (possibly nondeterministic) single-tape Turing Machine.
//!
//! Nondeterminism is resolved by depth-first exploration of every matching transition in
//! declaration order. The first accepting branch ends the run. A rejecting branch only
//! rejects itself; its parent moves on to the next matching transition. All branches share
//! one tape: writes and head moves made by a rejected branch stay in place for its siblings.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::tape::Tape;
use crate::types::{
    Decision, Direction, Outcome, State, StateId, Symbol, Transition, TuringMachineError,
    INITIAL_STATE,
};

/// Returned for ids that were never declared. `Machine` auto-creates every state it is told
/// about, so this only guards lookups by callers holding stale ids.
static EMPTY_STATE: State = State {
    accepts: false,
    transitions: Vec::new(),
};

/// Represents a single-tape Turing Machine as a table of states keyed by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    states: BTreeMap<StateId, State>,
}

/// One level of the exploration stack.
struct Frame<'m> {
    state: &'m State,
    /// Symbol under the head when the state was entered. Sibling transitions are matched
    /// against it even if an earlier sibling rewrote the cell.
    symbol: Symbol,
    /// Index of the next transition to try.
    next: usize,
}

impl<'m> Frame<'m> {
    fn enter(state: &'m State, tape: &Tape) -> Self {
        Self {
            state,
            symbol: tape.read(),
            next: 0,
        }
    }

    /// Advances past and returns the next transition matching the entry symbol.
    fn next_transition(&mut self) -> Option<&'m Transition> {
        let state: &'m State = self.state;
        let transitions = &state.transitions;
        let offset = transitions[self.next..]
            .iter()
            .position(|t| t.read == self.symbol)?;
        let index = self.next + offset;
        self.next = index + 1;
        Some(&transitions[index])
    }
}

impl Machine {
    /// Creates a machine with only the initial state, non-accepting and without transitions.
    pub fn new() -> Self {
        let mut states = BTreeMap::new();
        states.insert(INITIAL_STATE, State::default());
        Self { states }
    }

    /// Appends a transition to `state`, creating `state` and its target if they are unknown.
    pub fn add_transition(&mut self, state: StateId, transition: Transition) {
        self.states.entry(transition.next_state).or_default();
        self.states.entry(state).or_default().transitions.push(transition);
    }

    /// Marks `state` as accepting, creating it if it is unknown.
    pub fn set_accepting(&mut self, state: StateId) {
        self.states.entry(state).or_default().accepts = true;
    }

    /// Returns the state registered under `id`.
    pub fn state(&self, id: StateId) -> Option<&State> {
        self.states.get(&id)
    }

    /// Iterates over all states in ascending id order.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().map(|(&id, state)| (id, state))
    }

    /// Number of states in the table.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// A machine always contains its initial state.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Runs the machine from the initial state until a decision is reached.
    ///
    /// This never returns if every explored branch loops forever.
    pub fn run(&self, tape: &mut Tape) -> Decision {
        match self.execute(tape, None) {
            Ok(outcome) => outcome.decision,
            Err(_) => unreachable!("an unbounded run cannot exceed its step limit"),
        }
    }

    /// Runs the machine from the initial state, applying at most `step_limit` transitions.
    ///
    /// # Returns
    ///
    /// * `Ok(Outcome)` with the decision and the number of transitions applied.
    /// * `Err(TuringMachineError::StepLimitExceeded)` if the budget ran out first.
    pub fn execute(
        &self,
        tape: &mut Tape,
        step_limit: Option<usize>,
    ) -> Result<Outcome, TuringMachineError> {
        debug!(states = self.len(), input = %tape, ?step_limit, "starting run");

        let mut stack = vec![Frame::enter(self.lookup(INITIAL_STATE), tape)];
        let mut steps = 0usize;

        while let Some(frame) = stack.last_mut() {
            let Some(transition) = frame.next_transition() else {
                let decision = Decision::from_accepts(frame.state.accepts);
                stack.pop();

                // Accept ends the whole run. Reject hands control back to the parent frame,
                // which then tries its next matching transition.
                if decision.is_accept() || stack.is_empty() {
                    debug!(%decision, steps, tape = %tape, "run finished");
                    return Ok(Outcome { decision, steps });
                }
                continue;
            };

            if let Some(limit) = step_limit.filter(|&limit| steps >= limit) {
                debug!(steps, "step limit reached");
                return Err(TuringMachineError::StepLimitExceeded { limit });
            }

            apply(tape, transition);
            steps += 1;
            trace!(
                step = steps,
                depth = stack.len(),
                read = %transition.read,
                write = %transition.write,
                next = transition.next_state,
                head = tape.head(),
                "applied transition"
            );

            stack.push(Frame::enter(self.lookup(transition.next_state), tape));
        }

        unreachable!("the exploration stack only empties through a decision")
    }

    fn lookup(&self, id: StateId) -> &State {
        self.states.get(&id).unwrap_or(&EMPTY_STATE)
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

/// Writes the transition's symbol under the head, then moves the head.
fn apply(tape: &mut Tape, transition: &Transition) {
    tape.write(transition.write);
    match transition.direction {
        Direction::Right => tape.move_right(),
        Direction::Left => tape.move_left(),
    }
}
