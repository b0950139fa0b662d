//! fsaviz - Finite-state automaton editing core
//!
//! A library for building, running and saving finite-state automata whose
//! transitions are drawn as curved, draggable arcs.
//!
//! # Quick Start
//!
//! ```rust
//! use fsaviz::run;
//!
//! let saved = "q0,(0,0);q1,(100,0)\nq0_a_q1_(0,0);q1_a_q0_(0,0)\nq1\nq0";
//! let result = run(saved, "aaa").unwrap();
//! assert!(result.is_accepted());
//! assert_eq!(result.path(), vec!["q0", "q1", "q0", "q1"]);
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual components:
//!
//! ```rust
//! use fsaviz::prelude::*;
//!
//! let mut automaton = Automaton::new();
//! automaton.add_state("q0", Point::new(100.0, 100.0));
//! automaton.add_state("q1", Point::new(300.0, 100.0));
//! automaton.add_transition("q0", "q1", "01");
//! automaton.set_start("q0");
//! automaton.add_acceptor("q1");
//!
//! // Execute
//! let result = Executor::new().run(&automaton, "1").unwrap();
//! assert_eq!(result.verdict, Verdict::Accepted);
//!
//! // Build render data
//! let scene = Scene::build(&automaton, None, &EditorConfig::default());
//! assert_eq!(scene.transitions.len(), 1);
//!
//! // Save
//! let saved = save(&automaton);
//! assert_eq!(saved.transitions, "q0_0,1_q1_(0,0)");
//! ```

pub mod automaton;
pub mod core;

pub use crate::core::*;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::automaton::{
        load, save, Automaton, EditorSession, Executor, InputEvent, InteractionController, Key,
        RunResult, SavedAutomaton, Scene, Selection, Step, Verdict,
    };
    pub use crate::core::{
        AutomatonError, AutomatonResult, CurveVector, EditorConfig, Point, SymbolSet, Transition,
        TransitionKey,
    };
}

/// Load an automaton from its newline-delimited save text
///
/// # Example
/// ```rust
/// use fsaviz::load;
///
/// let automaton = load("q0,(0,0)\n\n\nq0").unwrap();
/// assert_eq!(automaton.state_count(), 1);
/// assert_eq!(automaton.start(), Some("q0"));
/// ```
pub fn load(text: &str) -> anyhow::Result<automaton::Automaton> {
    Ok(automaton::load_text(text)?)
}

/// Load an automaton from save text and run one input string against it
///
/// # Arguments
/// * `text` - The four save fields, one per line
/// * `input` - The symbols to consume
///
/// # Returns
/// * `Ok(RunResult)` - The trace and verdict
/// * `Err` - If the text does not load or no start state is set
pub fn run(text: &str, input: &str) -> anyhow::Result<automaton::RunResult> {
    let automaton = load(text)?;
    Ok(automaton::run(&automaton, input)?)
}

/// Load an automaton from save text and build its render scene
pub fn scene(text: &str) -> anyhow::Result<automaton::Scene> {
    let automaton = load(text)?;
    Ok(automaton::Scene::build(
        &automaton,
        None,
        &EditorConfig::default(),
    ))
}
