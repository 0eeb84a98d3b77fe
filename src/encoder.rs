//! This module renders a `Machine` back into table text, the same line format the parser
//! reads. Useful for printing the table a session actually built.

use crate::machine::Machine;

/// Encodes a machine as table text.
///
/// Transitions are emitted as `t` lines by ascending state id, each state's transitions in
/// declaration order, followed by a single `f` line when any state accepts. States without
/// transitions that are never targeted do not appear; parsing the output recreates them only
/// if they are accepting.
///
/// # Arguments
///
/// * `machine` - The machine to encode.
///
/// # Returns
///
/// * `String` - One record per line, newline terminated.
pub fn encode(machine: &Machine) -> String {
    let mut lines: Vec<String> = machine
        .states()
        .flat_map(|(id, state)| {
            state.transitions.iter().map(move |t| {
                format!(
                    "t {} {} {} {} {}",
                    id,
                    t.read,
                    t.next_state,
                    t.write,
                    t.direction.as_char()
                )
            })
        })
        .collect();

    let accepting: Vec<String> = machine
        .states()
        .filter(|(_, state)| state.accepts)
        .map(|(id, _)| id.to_string())
        .collect();

    if !accepting.is_empty() {
        lines.push(format!("f {}", accepting.join(" ")));
    }

    lines.iter().map(|line| format!("{line}\n")).collect()
}
