//! This crate provides the core logic for a (possibly nondeterministic) single-tape Turing
//! Machine interpreter. It includes modules for parsing line-oriented transition tables,
//! running machines against input strings, analyzing and rendering tables, and a small
//! collection of built-in sample tables.

pub mod analyzer;
pub mod encoder;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod session;
pub mod tape;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the `analyze` function and `Finding` enum from the analyzer module.
pub use analyzer::{analyze, Finding};
/// Re-exports the encoding function from the encoder module.
pub use encoder::encode;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the `Machine` struct from the machine module.
pub use machine::Machine;
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `Program`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramManager, PROGRAMS};
/// Re-exports the `Session` struct and its `Flow` from the session module.
pub use session::{Flow, Session};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the table and execution types from the types module.
pub use types::{
    Decision, Direction, Mode, Outcome, Record, RunConfig, RunReport, State, StateId, Symbol,
    Transition, TuringMachineError, BLANK_SYMBOL, INITIAL_STATE,
};
