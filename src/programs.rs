use crate::loader::ProgramLoader;
use crate::machine::Machine;
use crate::types::{Mode, TuringMachineError};

use std::sync::RwLock;

// Default embedded tables: (name, description, text)
const PROGRAM_TEXTS: [(&str, &str, &str); 3] = [
    (
        "binary-increment",
        "Adds one to a binary number, growing it to the left on overflow",
        include_str!("../programs/binary-increment.tm"),
    ),
    (
        "even-ones",
        "Accepts binary strings with an even number of 1s",
        include_str!("../programs/even-ones.tm"),
    ),
    (
        "anbn",
        "Accepts a^n b^n by pairing each a with a b",
        include_str!("../programs/anbn.tm"),
    ),
];

/// A built-in table together with the machine it describes.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: &'static str,
    pub description: &'static str,
    pub text: &'static str,
    pub machine: Machine,
}

lazy_static::lazy_static! {
    pub static ref PROGRAMS: RwLock<Vec<Program>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parses the embedded tables into the registry. Subsequent calls are no-ops.
    pub fn load() -> Result<(), TuringMachineError> {
        let mut guard = PROGRAMS.write().map_err(|_| {
            TuringMachineError::FileError("Failed to acquire write lock".to_string())
        })?;

        if !guard.is_empty() {
            return Ok(());
        }

        for (name, description, text) in PROGRAM_TEXTS {
            let machine = ProgramLoader::load_machine_from_string(text, Mode::Strict)?;
            guard.push(Program {
                name,
                description,
                text,
                machine,
            });
        }

        Ok(())
    }

    /// Get the number of available programs
    pub fn get_program_count() -> usize {
        let _ = Self::load();

        PROGRAMS.read().map(|programs| programs.len()).unwrap_or(0)
    }

    /// Get a program by its index
    pub fn get_program_by_index(index: usize) -> Result<Program, TuringMachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program index {} out of range", index))
            })
    }

    /// Get a program by its name
    pub fn get_program_by_name(name: &str) -> Result<Program, TuringMachineError> {
        Self::load()?;

        PROGRAMS
            .read()
            .map_err(|_| TuringMachineError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|program| program.name == name)
            .cloned()
            .ok_or_else(|| {
                TuringMachineError::ValidationError(format!("Program '{}' not found", name))
            })
    }

    /// List all programs as `(name, description)` pairs
    pub fn list_programs() -> Vec<(&'static str, &'static str)> {
        let _ = Self::load();

        PROGRAMS
            .read()
            .map(|programs| {
                programs
                    .iter()
                    .map(|program| (program.name, program.description))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze;
    use crate::tape::Tape;
    use crate::types::Decision;

    fn run(name: &str, input: &str) -> (Decision, String) {
        let program = ProgramManager::get_program_by_name(name).unwrap();
        let mut tape = Tape::from_input(input);
        let decision = program.machine.run(&mut tape);
        (decision, tape.to_string())
    }

    #[test]
    fn test_program_manager_initialization() {
        assert!(ProgramManager::load().is_ok());
        assert!(ProgramManager::load().is_ok());
        assert_eq!(ProgramManager::get_program_count(), PROGRAM_TEXTS.len());
    }

    #[test]
    fn test_all_programs_are_clean() {
        for i in 0..ProgramManager::get_program_count() {
            let program = ProgramManager::get_program_by_index(i).unwrap();
            assert!(
                analyze(&program.machine).is_empty(),
                "Program '{}' has findings",
                program.name
            );
        }
    }

    #[test]
    fn test_program_lookup() {
        assert!(ProgramManager::get_program_by_index(0).is_ok());
        assert!(ProgramManager::get_program_by_index(999).is_err());
        assert!(ProgramManager::get_program_by_name("Nonexistent").is_err());

        let names: Vec<_> = ProgramManager::list_programs()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["binary-increment", "even-ones", "anbn"]);
    }

    #[test]
    fn test_binary_increment() {
        assert_eq!(run("binary-increment", "1011"), (Decision::Accept, "1100_".to_string()));
        assert_eq!(run("binary-increment", "11"), (Decision::Accept, "100_".to_string()));
    }

    #[test]
    fn test_even_ones() {
        assert_eq!(run("even-ones", "1010"), (Decision::Accept, "1010__".to_string()));
        assert_eq!(run("even-ones", "1").0, Decision::Reject);
        assert_eq!(run("even-ones", "").0, Decision::Accept);
    }

    #[test]
    fn test_anbn() {
        assert_eq!(run("anbn", "aabb"), (Decision::Accept, "XXYY__".to_string()));
        assert_eq!(run("anbn", "aab"), (Decision::Reject, "XXY_".to_string()));
        assert_eq!(run("anbn", "abb").0, Decision::Reject);
        assert_eq!(run("anbn", "").0, Decision::Accept);
    }
}
