//! This module defines the core data structures shared by the tape, the transition engine,
//! the table parser and the run session: symbols, transitions, states, decisions, run
//! configuration and the crate-wide error type.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// A single tape cell value.
pub type Symbol = char;

/// Numeric identifier of a machine state.
pub type StateId = u32;

/// The reserved blank symbol. Fresh tape cells are filled with it.
pub const BLANK_SYMBOL: Symbol = '_';

/// Every run starts in this state. It exists in every machine, even an empty one.
pub const INITIAL_STATE: StateId = 0;

/// Represents the possible directions the tape head can move.
///
/// There is no "stay" move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one cell to the left.
    Left,
    /// Move the head one cell to the right.
    Right,
}

impl Direction {
    /// Single-letter form used by the table format.
    pub fn as_char(self) -> char {
        match self {
            Direction::Left => 'L',
            Direction::Right => 'R',
        }
    }
}

/// A single transition rule.
///
/// Several transitions of one state may share the same `read` symbol; all of them are
/// explored in declaration order until one leads to acceptance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Symbol that must be under the head for this rule to apply.
    pub read: Symbol,
    /// State entered after the write and move.
    pub next_state: StateId,
    /// Symbol written at the head before moving.
    pub write: Symbol,
    /// Direction the head moves after writing.
    pub direction: Direction,
}

/// A machine state: an accept flag plus its ordered outgoing transitions.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct State {
    pub accepts: bool,
    pub transitions: Vec<Transition>,
}

impl State {
    /// Transitions whose read symbol matches `symbol`, in declaration order.
    pub fn matching(&self, symbol: Symbol) -> impl Iterator<Item = &Transition> {
        self.transitions.iter().filter(move |t| t.read == symbol)
    }
}

/// The terminal outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Accept,
    Reject,
}

impl Decision {
    pub fn is_accept(self) -> bool {
        self == Decision::Accept
    }

    /// Decision of a state whose transitions were exhausted without an accepting branch.
    pub fn from_accepts(accepts: bool) -> Self {
        if accepts {
            Decision::Accept
        } else {
            Decision::Reject
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Accept => f.write_str("ACCEPT"),
            Decision::Reject => f.write_str("REJECT"),
        }
    }
}

/// One typed line of a transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// `t <state> <read> <next> <write> <direction>`
    Transition {
        state: StateId,
        transition: Transition,
    },
    /// `f <state>...`
    Accepting(Vec<StateId>),
    /// `i <input>`
    Input(String),
}

/// How strictly table text is interpreted.
///
/// - `Normal` (default): lenient like the classic interpreter. Any direction other than
///   `R`/`r` moves left and lines with an unknown leading field are skipped.
/// - `Strict`: only `L`/`l`/`R`/`r` are directions and unknown lines are errors.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    #[default]
    Normal,
    Strict,
}

/// Options applied to every run of a session.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: Mode,
    /// Maximum number of transitions a single run may apply. `None` runs unbounded.
    pub step_limit: Option<usize>,
    /// Run the table analyzer before each run and log its findings.
    pub analyze: bool,
}

/// Decision plus the number of transitions applied to reach it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub decision: Decision,
    pub steps: usize,
}

/// Result of running one `i` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// The input string as loaded.
    pub input: String,
    /// Final tape contents, left to right.
    pub tape: String,
    pub decision: Decision,
    pub steps: usize,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.tape, self.decision)
    }
}

/// Represents the errors that can occur while loading tables and running machines.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TuringMachineError {
    /// A table line did not match the format.
    #[error("Line {line}: {source}")]
    Parse {
        line: usize,
        source: Box<pest::error::Error<Rule>>,
    },
    /// A line with an unknown leading field in strict mode.
    #[error("Line {line}: unknown record '{text}'")]
    UnknownRecord { line: usize, text: String },
    /// A run applied more transitions than the configured budget.
    #[error("Step limit of {limit} transitions exceeded")]
    StepLimitExceeded { limit: usize },
    /// File system failures while reading tables.
    #[error("File error: {0}")]
    FileError(String),
    /// Lookups that do not resolve, such as an unknown sample program.
    #[error("Validation error: {0}")]
    ValidationError(String),
}
