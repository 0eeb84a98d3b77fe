//! This module provides the `Session`, which feeds table lines into a machine and runs it on
//! every `i` line.
//!
//! Table lines accumulate into the current machine. After each run the machine is replaced by
//! a fresh one holding only state 0, so every input line must be preceded by its own table.

use tracing::{debug, warn};

use crate::analyzer::analyze;
use crate::machine::Machine;
use crate::parser::{parse_line, Line};
use crate::tape::Tape;
use crate::types::{Record, RunConfig, RunReport, TuringMachineError};

/// What happened after feeding one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// The line extended the table (or was skipped).
    Continue,
    /// The line was an input and the machine ran on it.
    Ran(RunReport),
    /// A blank line ended the session.
    Stop,
}

/// Accumulates a table line by line and runs it against inputs.
#[derive(Debug, Default)]
pub struct Session {
    config: RunConfig,
    machine: Machine,
    line: usize,
    stopped: bool,
}

impl Session {
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The table accumulated since the last run.
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Whether a blank line has ended the session.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Parses and applies one line of table text.
    ///
    /// Once a blank line has been fed every further line is ignored and `Flow::Stop` is
    /// returned again.
    pub fn feed(&mut self, text: &str) -> Result<Flow, TuringMachineError> {
        if self.stopped {
            return Ok(Flow::Stop);
        }

        self.line += 1;
        match parse_line(self.line, text, self.config.mode)? {
            Line::Record(record) => Ok(self
                .apply(record)?
                .map_or(Flow::Continue, Flow::Ran)),
            Line::Skipped => Ok(Flow::Continue),
            Line::End => {
                debug!(line = self.line, "blank line, stopping");
                self.stopped = true;
                Ok(Flow::Stop)
            }
        }
    }

    /// Applies a typed record. Inputs run the machine and return its report.
    pub fn apply(&mut self, record: Record) -> Result<Option<RunReport>, TuringMachineError> {
        match record {
            Record::Transition { state, transition } => {
                self.machine.add_transition(state, transition);
                Ok(None)
            }
            Record::Accepting(states) => {
                for state in states {
                    self.machine.set_accepting(state);
                }
                Ok(None)
            }
            Record::Input(input) => self.run(input).map(Some),
        }
    }

    /// Feeds every line of `text` and collects the reports of all runs.
    pub fn run_script(&mut self, text: &str) -> Result<Vec<RunReport>, TuringMachineError> {
        let mut reports = Vec::new();

        for line in text.lines() {
            match self.feed(line)? {
                Flow::Continue => {}
                Flow::Ran(report) => reports.push(report),
                Flow::Stop => break,
            }
        }

        Ok(reports)
    }

    /// Runs the current machine on `input` and resets it, whatever the outcome.
    fn run(&mut self, input: String) -> Result<RunReport, TuringMachineError> {
        let machine = std::mem::take(&mut self.machine);
        debug!(line = self.line, "running input");
        run_input(&machine, input, &self.config)
    }
}

/// Loads `input` onto a fresh tape and runs `machine` on it from the initial state.
///
/// With `config.analyze` set the table findings are logged first.
pub fn run_input(
    machine: &Machine,
    input: String,
    config: &RunConfig,
) -> Result<RunReport, TuringMachineError> {
    if config.analyze {
        for finding in analyze(machine) {
            warn!(%finding, "table analysis");
        }
    }

    let mut tape = Tape::from_input(&input);
    let outcome = machine.execute(&mut tape, config.step_limit)?;

    Ok(RunReport {
        input,
        tape: tape.to_string(),
        decision: outcome.decision,
        steps: outcome.steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Decision, Mode, INITIAL_STATE};

    #[test]
    fn test_single_write_then_accept() {
        let mut session = Session::default();
        let reports = session
            .run_script("t 0 1 1 1 R\nt 1 0 0 0 R\nf 1\ni 1\n")
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].tape, "1_");
        assert_eq!(reports[0].decision, Decision::Accept);
    }

    #[test]
    fn test_accepting_initial_state() {
        let mut session = Session::default();
        let reports = session.run_script("f 0\ni anything").unwrap();

        assert_eq!(reports[0].tape, "anything");
        assert_eq!(reports[0].decision, Decision::Accept);
        assert_eq!(reports[0].steps, 0);
    }

    #[test]
    fn test_machine_resets_after_each_run() {
        let mut session = Session::default();
        let reports = session.run_script("f 0\ni a\ni a\n").unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].decision, Decision::Accept);
        assert_eq!(reports[1].decision, Decision::Reject);
        assert_eq!(session.machine().len(), 1);
        assert!(!session.machine().state(INITIAL_STATE).unwrap().accepts);
    }

    #[test]
    fn test_consecutive_inputs_without_table_reject() {
        let mut session = Session::default();
        let reports = session.run_script("i abc\ni def\n").unwrap();

        assert_eq!(reports.len(), 2);
        assert!(reports.iter().all(|r| r.decision == Decision::Reject));
        assert_eq!(reports[1].tape, "def");
    }

    #[test]
    fn test_blank_line_stops_the_session() {
        let mut session = Session::default();

        assert_eq!(session.feed("f 0").unwrap(), Flow::Continue);
        assert_eq!(session.feed("").unwrap(), Flow::Stop);
        assert!(session.is_stopped());
        assert_eq!(session.feed("i abc").unwrap(), Flow::Stop);
    }

    #[test]
    fn test_empty_input_runs_on_a_blank_tape() {
        let mut session = Session::default();
        let reports = session.run_script("t 0 _ 1 x R\nf 1\ni\n").unwrap();

        assert_eq!(reports[0].tape, "x_");
        assert_eq!(reports[0].decision, Decision::Accept);
    }

    #[test]
    fn test_step_limit_error_still_resets() {
        let mut session = Session::new(RunConfig {
            step_limit: Some(10),
            ..RunConfig::default()
        });

        session.feed("t 0 _ 0 _ R").unwrap();
        session.feed("f 0").unwrap();
        let error = session.feed("i").unwrap_err();

        assert_eq!(error, TuringMachineError::StepLimitExceeded { limit: 10 });
        assert_eq!(session.machine(), &Machine::new());
    }

    #[test]
    fn test_parse_errors_report_the_line_number() {
        let mut session = Session::new(RunConfig {
            mode: Mode::Strict,
            ..RunConfig::default()
        });

        let error = session.run_script("f 0\nt 0 a 1 b Q\n").unwrap_err();
        assert!(matches!(error, TuringMachineError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_analysis_does_not_change_the_decision() {
        let mut session = Session::new(RunConfig {
            analyze: true,
            ..RunConfig::default()
        });

        let reports = session.run_script("t 0 a 1 a R\nt 5 a 6 a R\ni a\n").unwrap();
        assert_eq!(reports[0].decision, Decision::Reject);
    }
}
