//! This module provides the parser for transition tables, utilizing the `pest` crate.
//!
//! A table is line oriented. Each line is one of:
//!
//! ```text
//! t <state> <read> <next> <write> <direction>
//! f <state> <state> ...
//! i <input>
//! ```
//!
//! The first blank line ends the table. The grammar for a single line lives in
//! `grammar.pest`.

use crate::types::{Direction, Mode, Record, StateId, Symbol, Transition, TuringMachineError};
use pest::{
    error::{Error, ErrorVariant},
    iterators::{Pair, Pairs},
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use tracing::warn;

/// Derives a `PestParser` for the table grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct TableParser;

/// What a single line of table text turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A `t`, `f` or `i` record.
    Record(Record),
    /// A line with an unknown leading field, skipped in normal mode.
    Skipped,
    /// A blank line. Nothing after it is read.
    End,
}

/// Parses table text into records, stopping at the first blank line.
///
/// # Arguments
///
/// * `input` - The table text.
/// * `mode` - How strictly directions and unknown lines are treated.
///
/// # Returns
///
/// * `Ok(Vec<Record>)` with every record before the first blank line.
/// * `Err(TuringMachineError::Parse)` for the first malformed line.
/// * `Err(TuringMachineError::UnknownRecord)` for an unknown line in strict mode.
pub fn parse(input: &str, mode: Mode) -> Result<Vec<Record>, TuringMachineError> {
    let mut records = Vec::new();

    for (index, text) in input.lines().enumerate() {
        match parse_line(index + 1, text, mode)? {
            Line::Record(record) => records.push(record),
            Line::Skipped => {}
            Line::End => break,
        }
    }

    Ok(records)
}

/// Parses one line of table text. `line` is the 1-based line number used in errors.
pub fn parse_line(line: usize, text: &str, mode: Mode) -> Result<Line, TuringMachineError> {
    let text = text.trim_end_matches(['\n', '\r']);
    if text.is_empty() {
        return Ok(Line::End);
    }

    // The kind of a line is its first space separated field.
    match text.split([' ', '\t']).next() {
        Some("t" | "f" | "i") => {}
        _ => {
            return match mode {
                Mode::Normal => {
                    warn!(line, text, "skipping unrecognized line");
                    Ok(Line::Skipped)
                }
                Mode::Strict => Err(TuringMachineError::UnknownRecord {
                    line,
                    text: text.to_string(),
                }),
            };
        }
    }

    let root = TableParser::parse(Rule::line, text)
        .map_err(|e| parse_failure(line, e))?
        .next()
        .ok_or_else(|| parse_failure(line, custom_error("Empty line", text)))?;

    let record = root
        .into_inner()
        .find(|pair| pair.as_rule() != Rule::EOI)
        .ok_or_else(|| parse_failure(line, custom_error("Missing record", text)))?;

    let record = match record.as_rule() {
        Rule::transition => parse_transition(record, mode),
        Rule::accepting => parse_accepting(record),
        Rule::input => Ok(parse_input(record)),
        _ => Err(custom_error("Unexpected record", text)),
    }
    .map_err(|e| parse_failure(line, e))?;

    Ok(Line::Record(record))
}

/// Parses `t <state> <read> <next> <write> <direction>`.
fn parse_transition(pair: Pair<Rule>, mode: Mode) -> Result<Record, Error<Rule>> {
    let mut pairs = pair.into_inner();

    let state = parse_state_id(next_pair(&mut pairs, "state")?)?;
    let read = parse_symbol(next_pair(&mut pairs, "read symbol")?);
    let next_state = parse_state_id(next_pair(&mut pairs, "next state")?)?;
    let write = parse_symbol(next_pair(&mut pairs, "write symbol")?);
    let direction = parse_direction(next_pair(&mut pairs, "direction")?, mode)?;

    Ok(Record::Transition {
        state,
        transition: Transition {
            read,
            next_state,
            write,
            direction,
        },
    })
}

/// Parses `f <state>...`.
fn parse_accepting(pair: Pair<Rule>) -> Result<Record, Error<Rule>> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::state_id)
        .map(parse_state_id)
        .collect::<Result<Vec<_>, _>>()
        .map(Record::Accepting)
}

/// Parses `i <input>`. A missing input loads an empty tape.
fn parse_input(pair: Pair<Rule>) -> Record {
    let word = pair
        .into_inner()
        .find(|p| p.as_rule() == Rule::word)
        .map(|p| p.as_str().to_string())
        .unwrap_or_default();

    Record::Input(word)
}

/// Parses a state id, rejecting values that do not fit a `StateId`.
fn parse_state_id(pair: Pair<Rule>) -> Result<StateId, Error<Rule>> {
    pair.as_str().parse::<StateId>().map_err(|_| {
        span_error(
            &format!("State id {} is out of range", pair.as_str()),
            pair.as_span(),
        )
    })
}

/// The grammar guarantees a symbol pair holds exactly one character.
fn parse_symbol(pair: Pair<Rule>) -> Symbol {
    pair.as_str().chars().next().unwrap_or_default()
}

/// Parses a direction field.
///
/// In normal mode only `R`/`r` means right and every other value means left. Strict mode
/// accepts `L`/`l`/`R`/`r` and rejects anything else.
fn parse_direction(pair: Pair<Rule>, mode: Mode) -> Result<Direction, Error<Rule>> {
    match (pair.as_str(), mode) {
        ("R" | "r", _) => Ok(Direction::Right),
        ("L" | "l", _) | (_, Mode::Normal) => Ok(Direction::Left),
        (other, Mode::Strict) => Err(span_error(
            &format!("Unsupported direction: {other}"),
            pair.as_span(),
        )),
    }
}

/// Takes the next inner pair of a record, naming the field if the tree is short.
fn next_pair<'i>(pairs: &mut Pairs<'i, Rule>, field: &str) -> Result<Pair<'i, Rule>, Error<Rule>> {
    pairs.next().ok_or_else(|| {
        Error::new_from_pos(
            ErrorVariant::CustomError {
                message: format!("Missing {field}"),
            },
            pest::Position::from_start(""),
        )
    })
}

/// Creates a pest error from a message and a `Span`.
fn span_error(msg: &str, span: Span) -> Error<Rule> {
    Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )
}

/// Creates a pest error covering the whole line.
fn custom_error(msg: &str, text: &str) -> Error<Rule> {
    Error::new_from_pos(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        pest::Position::from_start(text),
    )
}

fn parse_failure(line: usize, error: Error<Rule>) -> TuringMachineError {
    TuringMachineError::Parse {
        line,
        source: Box::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(text: &str) -> Record {
        match parse_line(1, text, Mode::Normal).unwrap() {
            Line::Record(record) => record,
            other => panic!("Expected a record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_transition_line() {
        assert_eq!(
            record("t 0 1 1 0 R"),
            Record::Transition {
                state: 0,
                transition: Transition {
                    read: '1',
                    next_state: 1,
                    write: '0',
                    direction: Direction::Right,
                },
            }
        );
    }

    #[test]
    fn test_parse_blank_symbols_and_tabs() {
        assert_eq!(
            record("t\t12 _ 3\t_ l"),
            Record::Transition {
                state: 12,
                transition: Transition {
                    read: '_',
                    next_state: 3,
                    write: '_',
                    direction: Direction::Left,
                },
            }
        );
    }

    #[test]
    fn test_parse_accepting_line() {
        assert_eq!(record("f 1 4 9"), Record::Accepting(vec![1, 4, 9]));
        assert_eq!(record("f"), Record::Accepting(vec![]));
    }

    #[test]
    fn test_parse_input_line() {
        assert_eq!(record("i 0110"), Record::Input("0110".to_string()));
        assert_eq!(record("i"), Record::Input(String::new()));
    }

    #[test]
    fn test_trailing_whitespace_and_carriage_return() {
        assert_eq!(record("i abc \r"), Record::Input("abc".to_string()));
        assert_eq!(record("f 2\r\n"), Record::Accepting(vec![2]));
    }

    #[test]
    fn test_blank_line_ends_table() {
        assert_eq!(parse_line(1, "", Mode::Normal).unwrap(), Line::End);
        assert_eq!(parse_line(1, "\r\n", Mode::Normal).unwrap(), Line::End);
    }

    #[test]
    fn test_parse_stops_at_blank_line() {
        let input = "t 0 a 1 b R\nf 1\n\ni ab\n";
        let records = parse(input, Mode::Normal).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[1], Record::Accepting(vec![1]));
    }

    #[test]
    fn test_lenient_direction_moves_left() {
        match record("t 0 a 1 b X") {
            Record::Transition { transition, .. } => {
                assert_eq!(transition.direction, Direction::Left)
            }
            other => panic!("Expected a transition, got {:?}", other),
        }
    }

    #[test]
    fn test_strict_direction_rejects_unknown_values() {
        let result = parse_line(4, "t 0 a 1 b X", Mode::Strict);
        let error = result.unwrap_err();

        assert!(matches!(error, TuringMachineError::Parse { line: 4, .. }));
        assert!(error.to_string().contains("Unsupported direction: X"));
    }

    #[test]
    fn test_unknown_lines_are_skipped_in_normal_mode() {
        assert_eq!(
            parse_line(1, "# comment", Mode::Normal).unwrap(),
            Line::Skipped
        );
        assert_eq!(
            parse_line(1, " t 0 a 1 b R", Mode::Normal).unwrap(),
            Line::Skipped
        );
    }

    #[test]
    fn test_unknown_lines_fail_in_strict_mode() {
        let error = parse_line(7, "x 1 2", Mode::Strict).unwrap_err();
        assert_eq!(
            error,
            TuringMachineError::UnknownRecord {
                line: 7,
                text: "x 1 2".to_string()
            }
        );
    }

    #[test]
    fn test_multi_character_symbol_is_an_error() {
        let error = parse_line(2, "t 0 ab 1 b R", Mode::Normal).unwrap_err();
        assert!(matches!(error, TuringMachineError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_non_numeric_state_is_an_error() {
        assert!(parse_line(1, "t q0 a 1 b R", Mode::Normal).is_err());
        assert!(parse_line(1, "f 1 two", Mode::Normal).is_err());
    }

    #[test]
    fn test_out_of_range_state_is_an_error() {
        let error = parse_line(1, "f 99999999999", Mode::Normal).unwrap_err();
        assert!(error.to_string().contains("out of range"));
    }

    #[test]
    fn test_missing_fields_are_an_error() {
        assert!(parse_line(1, "t 0 a 1 b", Mode::Normal).is_err());
        assert!(parse_line(1, "t 0 a 1 b R extra", Mode::Normal).is_err());
    }
}
