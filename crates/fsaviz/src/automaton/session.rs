//! Editor session
//!
//! The explicit context object a host holds: it owns the automaton, the
//! interaction state, the configuration and the last run result.

use super::executor::{Executor, RunResult};
use super::interaction::{event_for_key, InputEvent, InteractionController, Key};
use super::model::Automaton;
use super::scene::Scene;
use super::serializer::{self, SavedAutomaton};
use crate::core::{AutomatonResult, EditorConfig};
use tracing::debug;

/// One open automaton with its editing state
#[derive(Debug, Clone, Default)]
pub struct EditorSession {
    automaton: Automaton,
    controller: InteractionController,
    config: EditorConfig,
    executor: Executor,
    last_run: Option<RunResult>,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EditorConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Wrap an existing automaton
    pub fn from_automaton(automaton: Automaton, config: EditorConfig) -> Self {
        Self {
            automaton,
            config,
            ..Self::default()
        }
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn automaton_mut(&mut self) -> &mut Automaton {
        &mut self.automaton
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn last_run(&self) -> Option<&RunResult> {
        self.last_run.as_ref()
    }

    /// Route one input event through the interaction controller
    pub fn handle(&mut self, event: InputEvent) -> AutomatonResult<()> {
        self.controller
            .handle(&mut self.automaton, &self.config, event)
    }

    /// Translate a key press and handle the resulting event, if any
    pub fn handle_key(&mut self, key: Key) -> AutomatonResult<()> {
        match event_for_key(key, self.controller.selection()) {
            Some(event) => self.handle(event),
            None => {
                debug!(?key, "Key not bound in this context");
                Ok(())
            }
        }
    }

    /// Run an input string and mark where it ended
    pub fn run(&mut self, input: &str) -> AutomatonResult<&RunResult> {
        let result = self.executor.run(&self.automaton, input)?;
        self.automaton
            .set_current(Some(result.final_state.clone()));
        Ok(self.last_run.insert(result))
    }

    /// Render data for the current frame
    pub fn scene(&self) -> Scene {
        Scene::build(&self.automaton, self.controller.selection(), &self.config)
            .with_connect_preview(self.controller.connect_preview(&self.automaton))
    }

    pub fn save(&self) -> SavedAutomaton {
        serializer::save(&self.automaton)
    }

    /// Replace the automaton with a loaded one
    ///
    /// Selection and the previous run are discarded. On error the session is
    /// left untouched.
    pub fn load(&mut self, saved: &SavedAutomaton) -> AutomatonResult<()> {
        self.automaton = serializer::load(saved)?;
        self.controller = InteractionController::new();
        self.last_run = None;
        Ok(())
    }
}
