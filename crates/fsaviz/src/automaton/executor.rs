//! Automaton executor
//!
//! Runs input strings against an [`Automaton`]. Lookup takes the first
//! transition in insertion order whose source matches the current state and
//! whose symbol set contains the input symbol, so overlapping symbol sets are
//! resolved by whichever transition was added first.

use super::model::Automaton;
use crate::core::{AutomatonError, AutomatonResult};
use serde::Serialize;
use std::fmt;
use tracing::{info, span, trace, Level};

/// Outcome of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Verdict {
    Accepted,
    Declined,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "Accepted"),
            Verdict::Declined => write!(f, "Declined"),
        }
    }
}

/// One consumed symbol: the state left and the state entered
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Step {
    pub from: String,
    pub to: String,
}

impl Step {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Trace and verdict of one execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunResult {
    pub trace: Vec<Step>,
    pub final_state: String,
    pub verdict: Verdict,
}

impl RunResult {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }

    /// States visited, starting with the start state
    pub fn path(&self) -> Vec<&str> {
        match self.trace.first() {
            Some(first) => std::iter::once(first.from.as_str())
                .chain(self.trace.iter().map(|step| step.to.as_str()))
                .collect(),
            None => vec![self.final_state.as_str()],
        }
    }
}

/// A run in progress, advanced one symbol at a time
///
/// Once a symbol has no matching transition the simulation halts and every
/// further symbol is ignored; the run then finishes as declined.
#[derive(Debug, Clone)]
pub struct Simulation<'a> {
    automaton: &'a Automaton,
    current: String,
    trace: Vec<Step>,
    halted: bool,
}

impl<'a> Simulation<'a> {
    /// Start at the automaton's start state
    pub fn new(automaton: &'a Automaton) -> AutomatonResult<Self> {
        let start = automaton.start().ok_or(AutomatonError::NoStartDefined)?;
        Ok(Self {
            automaton,
            current: start.to_string(),
            trace: Vec::new(),
            halted: false,
        })
    }

    pub fn current(&self) -> &str {
        &self.current
    }

    pub fn trace(&self) -> &[Step] {
        &self.trace
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Consume one symbol, returning the step taken
    pub fn step(&mut self, symbol: char) -> Option<&Step> {
        if self.halted {
            return None;
        }

        let automaton = self.automaton;
        match automaton.transition_for(&self.current, symbol) {
            Some((_, transition)) => {
                trace!(from = %self.current, to = %transition.target, %symbol, "Step");
                let step = Step::new(self.current.clone(), transition.target.clone());
                self.current = transition.target.clone();
                self.trace.push(step);
                self.trace.last()
            }
            None => {
                trace!(state = %self.current, %symbol, "No transition, halting");
                self.halted = true;
                None
            }
        }
    }

    /// Settle the verdict for the symbols consumed so far
    pub fn finish(self) -> RunResult {
        let verdict = if !self.halted && self.automaton.is_acceptor(&self.current) {
            Verdict::Accepted
        } else {
            Verdict::Declined
        };
        RunResult {
            trace: self.trace,
            final_state: self.current,
            verdict,
        }
    }
}

/// Runs whole input strings
#[derive(Debug, Clone, Copy, Default)]
pub struct Executor;

impl Executor {
    pub fn new() -> Self {
        Self
    }

    /// Run `input` from the start state
    ///
    /// An automaton without acceptors is valid; every run simply ends
    /// declined.
    pub fn run(&self, automaton: &Automaton, input: &str) -> AutomatonResult<RunResult> {
        let run_span = span!(Level::DEBUG, "run", input_len = input.len());
        let _enter = run_span.enter();

        let mut simulation = Simulation::new(automaton)?;
        for symbol in input.chars() {
            if simulation.step(symbol).is_none() {
                break;
            }
        }

        let result = simulation.finish();
        info!(
            input,
            final_state = %result.final_state,
            verdict = %result.verdict,
            steps = result.trace.len(),
            "Run finished"
        );
        Ok(result)
    }
}

/// Run `input` against `automaton` with a default [`Executor`]
pub fn run(automaton: &Automaton, input: &str) -> AutomatonResult<RunResult> {
    Executor::new().run(automaton, input)
}
