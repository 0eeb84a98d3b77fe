//! This module provides the `ProgramLoader` struct, responsible for loading transition tables
//! from files and directories and running the inputs they contain.

use crate::machine::Machine;
use crate::parser::parse;
use crate::session::Session;
use crate::types::{Mode, Record, RunConfig, RunReport, TuringMachineError};
use std::fs;
use std::path::{Path, PathBuf};

/// File extension of table scripts.
pub const SCRIPT_EXTENSION: &str = "tm";

/// `ProgramLoader` is a utility struct for loading transition tables.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Reads a table script and runs every input line in it.
    ///
    /// # Arguments
    ///
    /// * `path` - The script to run.
    /// * `config` - Options applied to each run.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<RunReport>)` with one report per `i` line before the first blank line.
    /// * `Err(TuringMachineError::FileError)` if the file cannot be read.
    /// * `Err(TuringMachineError::Parse)` if a line is malformed.
    pub fn load_script(
        path: &Path,
        config: &RunConfig,
    ) -> Result<Vec<RunReport>, TuringMachineError> {
        let content = read(path)?;
        Session::new(config.clone()).run_script(&content)
    }

    /// Builds a machine from table text, ignoring input lines.
    ///
    /// This is how stored tables without inputs are turned into machines.
    pub fn load_machine_from_string(
        content: &str,
        mode: Mode,
    ) -> Result<Machine, TuringMachineError> {
        let mut machine = Machine::new();

        for record in parse(content, mode)? {
            match record {
                Record::Transition { state, transition } => {
                    machine.add_transition(state, transition)
                }
                Record::Accepting(states) => {
                    states.into_iter().for_each(|s| machine.set_accepting(s))
                }
                Record::Input(_) => {}
            }
        }

        Ok(machine)
    }

    /// Builds a machine from a table file, ignoring input lines.
    pub fn load_machine(path: &Path, mode: Mode) -> Result<Machine, TuringMachineError> {
        Self::load_machine_from_string(&read(path)?, mode)
    }

    /// Lists the table scripts (`.tm` extension) in a directory, in file name order.
    ///
    /// Directories and files with other extensions are skipped.
    pub fn script_paths(directory: &Path) -> Result<Vec<PathBuf>, TuringMachineError> {
        let entries = fs::read_dir(directory).map_err(|e| {
            TuringMachineError::FileError(format!(
                "Failed to read directory {}: {}",
                directory.display(),
                e
            ))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| {
                    TuringMachineError::FileError(format!(
                        "Failed to read directory entry: {}",
                        e
                    ))
                })?
                .path();

            if !path.is_dir() && path.extension().is_some_and(|ext| ext == SCRIPT_EXTENSION) {
                paths.push(path);
            }
        }
        paths.sort();

        Ok(paths)
    }

    /// Runs every table script in a directory, in file name order.
    ///
    /// Each script gets its own session, so tables never leak between files.
    ///
    /// # Returns
    ///
    /// * `Vec<Result<(PathBuf, Vec<RunReport>), TuringMachineError>>` - One entry per script,
    ///   either its reports or the error that stopped it.
    pub fn load_scripts(
        directory: &Path,
        config: &RunConfig,
    ) -> Vec<Result<(PathBuf, Vec<RunReport>), TuringMachineError>> {
        let paths = match Self::script_paths(directory) {
            Ok(paths) => paths,
            Err(e) => return vec![Err(e)],
        };

        paths
            .into_iter()
            .map(|path| Self::load_script(&path, config).map(|reports| (path, reports)))
            .collect()
    }
}

fn read(path: &Path) -> Result<String, TuringMachineError> {
    fs::read_to_string(path).map_err(|e| {
        TuringMachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}
