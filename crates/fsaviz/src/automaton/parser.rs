//! Save-format field parsers using chumsky
//!
//! Each of the four save fields has its own grammar:
//!
//! ```text
//! states:       q0,(100,200);q1,(300,200)
//! transitions:  q0_0,1_q1_(0,0);q1_1_q1_(60,-0.5)
//! acceptors:    q1,q2
//! start:        q0
//! ```
//!
//! Labels and symbols are taken verbatim up to the next delimiter, so a
//! label or symbol containing `,`, `_` or `;` cannot round-trip.

use crate::core::chumsky_utils::{number_pair, Extra};
use crate::core::{AutomatonError, AutomatonResult, CurveVector, Point, SymbolSet};
use chumsky::prelude::*;

/// A state entry from the states field
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedState {
    pub label: String,
    pub position: Point,
}

/// A transition entry from the transitions field
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedTransition {
    pub source: String,
    pub symbols: SymbolSet,
    pub target: String,
    pub curvature: CurveVector,
}

/// Chumsky-based parser for the save fields
pub struct FieldParser;

impl FieldParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse the states field
    pub fn parse_states(&self, input: &str) -> AutomatonResult<Vec<ParsedState>> {
        Self::states_parser()
            .parse(input)
            .into_result()
            .map_err(|errors| malformed("states", errors))
    }

    /// Parse the transitions field
    pub fn parse_transitions(&self, input: &str) -> AutomatonResult<Vec<ParsedTransition>> {
        Self::transitions_parser()
            .parse(input)
            .into_result()
            .map_err(|errors| malformed("transitions", errors))
    }

    /// Parse the acceptors field
    pub fn parse_acceptors(&self, input: &str) -> AutomatonResult<Vec<String>> {
        Self::acceptors_parser()
            .parse(input)
            .into_result()
            .map_err(|errors| malformed("acceptors", errors))
    }

    /// Parse the start field; an empty field means no start state
    ///
    /// The field holds one label, so it is taken whole.
    pub fn parse_start(&self, input: &str) -> AutomatonResult<Option<String>> {
        if input.is_empty() {
            return Ok(None);
        }
        Self::label_parser("")
            .then_ignore(end())
            .parse(input)
            .into_result()
            .map(Some)
            .map_err(|errors| malformed("start", errors))
    }

    /// Parse a label: everything up to one of the given delimiters
    fn label_parser<'src>(
        delimiters: &'static str,
    ) -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
        none_of(delimiters)
            .filter(|c: &char| *c != '\n' && *c != '\r')
            .repeated()
            .at_least(1)
            .to_slice()
            .map(|s: &str| s.to_string())
    }

    /// Parse one state entry: `label,(x,y)`
    fn state_parser<'src>() -> impl Parser<'src, &'src str, ParsedState, Extra<'src>> + Clone {
        Self::label_parser(",;")
            .then_ignore(just(','))
            .then(number_pair())
            .map(|(label, (x, y))| ParsedState {
                label,
                position: Point::new(x, y),
            })
    }

    fn states_parser<'src>() -> impl Parser<'src, &'src str, Vec<ParsedState>, Extra<'src>> {
        Self::state_parser()
            .separated_by(just(';'))
            .collect()
            .then_ignore(end())
    }

    /// Parse a comma-separated symbol set (possibly empty)
    fn symbols_parser<'src>() -> impl Parser<'src, &'src str, SymbolSet, Extra<'src>> + Clone {
        none_of(",_;\n\r")
            .separated_by(just(','))
            .collect::<Vec<char>>()
            .map(|symbols| symbols.into_iter().collect())
    }

    /// Parse one transition entry: `source_symbols_target_(distance,angle)`
    fn transition_parser<'src>(
    ) -> impl Parser<'src, &'src str, ParsedTransition, Extra<'src>> + Clone {
        Self::label_parser("_;")
            .then_ignore(just('_'))
            .then(Self::symbols_parser())
            .then_ignore(just('_'))
            .then(Self::label_parser("_;"))
            .then_ignore(just('_'))
            .then(number_pair())
            .map(
                |(((source, symbols), target), (distance, angle))| ParsedTransition {
                    source,
                    symbols,
                    target,
                    curvature: CurveVector::new(distance, angle),
                },
            )
    }

    fn transitions_parser<'src>(
    ) -> impl Parser<'src, &'src str, Vec<ParsedTransition>, Extra<'src>> {
        Self::transition_parser()
            .separated_by(just(';'))
            .collect()
            .then_ignore(end())
    }

    fn acceptors_parser<'src>() -> impl Parser<'src, &'src str, Vec<String>, Extra<'src>> {
        Self::label_parser(",;")
            .separated_by(just(','))
            .collect()
            .then_ignore(end())
    }
}

impl Default for FieldParser {
    fn default() -> Self {
        Self::new()
    }
}

fn malformed(field: &'static str, errors: Vec<Rich<'_, char>>) -> AutomatonError {
    let message = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    AutomatonError::malformed(field, message)
}
