//! Flat text serialization of an automaton
//!
//! An automaton is saved as four ordered fields, one per line: states,
//! transitions, acceptors and the start label. The transient `current`
//! pointer is not saved; loading resets it to the start state.

use super::model::Automaton;
use super::parser::FieldParser;
use crate::core::{AutomatonError, AutomatonResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// The four save fields
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SavedAutomaton {
    pub states: String,
    pub transitions: String,
    pub acceptors: String,
    pub start: String,
}

impl SavedAutomaton {
    /// Build from the four fields in save order
    pub fn from_fields(fields: [&str; 4]) -> Self {
        let [states, transitions, acceptors, start] = fields;
        Self {
            states: states.to_string(),
            transitions: transitions.to_string(),
            acceptors: acceptors.to_string(),
            start: start.to_string(),
        }
    }

    /// The four fields in save order
    pub fn fields(&self) -> [&str; 4] {
        [
            &self.states,
            &self.transitions,
            &self.acceptors,
            &self.start,
        ]
    }

    /// Join the fields into the newline-delimited file form
    pub fn to_text(&self) -> String {
        self.fields().join("\n")
    }

    /// Split the file form back into fields
    ///
    /// Trailing empty fields may be missing (editors tend to strip trailing
    /// blank lines); more than four lines is an error.
    pub fn from_text(text: &str) -> AutomatonResult<Self> {
        let lines: Vec<&str> = text
            .strip_suffix('\n')
            .unwrap_or(text)
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .collect();

        if lines.len() > 4 {
            return Err(AutomatonError::malformed(
                "document",
                format!("expected at most 4 lines, found {}", lines.len()),
            ));
        }

        let mut fields = [""; 4];
        for (slot, line) in fields.iter_mut().zip(lines) {
            *slot = line;
        }
        Ok(Self::from_fields(fields))
    }
}

/// Write an automaton into its save fields
pub fn save(automaton: &Automaton) -> SavedAutomaton {
    let states = automaton
        .states()
        .map(|(label, pos)| format!("{},({},{})", label, pos.x, pos.y))
        .collect::<Vec<_>>()
        .join(";");

    let transitions = automaton
        .transitions()
        .map(|(key, transition)| {
            format!(
                "{}_{}_{}_{}",
                key.source, key.symbols, transition.target, transition.curvature
            )
        })
        .collect::<Vec<_>>()
        .join(";");

    let acceptors = automaton.acceptors().collect::<Vec<_>>().join(",");
    let start = automaton.start().unwrap_or_default().to_string();

    debug!(
        states = automaton.state_count(),
        transitions = automaton.transition_count(),
        "Saved automaton"
    );

    SavedAutomaton {
        states,
        transitions,
        acceptors,
        start,
    }
}

/// Rebuild an automaton from its save fields
///
/// Every field must parse, and every transition, acceptor and start label
/// must name a declared state.
pub fn load(saved: &SavedAutomaton) -> AutomatonResult<Automaton> {
    let parser = FieldParser::new();
    let mut automaton = Automaton::new();

    for state in parser.parse_states(&saved.states)? {
        automaton.add_state(state.label, state.position);
    }

    for transition in parser.parse_transitions(&saved.transitions)? {
        for label in [&transition.source, &transition.target] {
            if !automaton.contains_state(label) {
                return Err(AutomatonError::malformed(
                    "transitions",
                    format!("unknown state '{}'", label),
                ));
            }
        }
        automaton.add_transition_with_curvature(
            transition.source,
            transition.target,
            transition.symbols,
            transition.curvature,
        );
    }

    for label in parser.parse_acceptors(&saved.acceptors)? {
        if !automaton.contains_state(&label) {
            return Err(AutomatonError::malformed(
                "acceptors",
                format!("unknown state '{}'", label),
            ));
        }
        automaton.add_acceptor(label);
    }

    if let Some(label) = parser.parse_start(&saved.start)? {
        if !automaton.contains_state(&label) {
            return Err(AutomatonError::malformed(
                "start",
                format!("unknown state '{}'", label),
            ));
        }
        automaton.set_start(label);
    }
    automaton.reset_current();

    info!(
        states = automaton.state_count(),
        transitions = automaton.transition_count(),
        "Loaded automaton"
    );
    Ok(automaton)
}

/// Parse the newline-delimited file form
pub fn load_text(text: &str) -> AutomatonResult<Automaton> {
    load(&SavedAutomaton::from_text(text)?)
}
