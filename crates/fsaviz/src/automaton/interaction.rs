//! Editing state machine
//!
//! Turns abstract input events into model mutations. Pointer handling tells
//! clicks from drags with a frame counter: a press enters `Pending`, every
//! pointer sample while pending advances the counter, and once the counter
//! has reached the configured frame count and the pointer has travelled past
//! the drag threshold the phase becomes `Dragging`. Releasing the pointer
//! always returns to `Idle`.

use super::model::Automaton;
use super::scene::{pick, ConnectPreview};
use crate::core::geometry::vectorize;
use crate::core::{
    AutomatonError, AutomatonResult, CurveVector, EditorConfig, EntityKind, Point, SymbolSet,
    TransitionKey,
};
use serde::Serialize;
use tracing::{debug, warn};

/// Counter value reported while dragging
pub const DRAGGING_COUNTER: u8 = 11;

/// The entity currently selected in the editor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Selection {
    State(String),
    Transition(TransitionKey),
}

impl Selection {
    pub fn state(&self) -> Option<&str> {
        match self {
            Selection::State(label) => Some(label.as_str()),
            Selection::Transition(_) => None,
        }
    }

    pub fn transition(&self) -> Option<&TransitionKey> {
        match self {
            Selection::State(_) => None,
            Selection::Transition(key) => Some(key),
        }
    }
}

/// Click-versus-drag phase
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    /// Pointer held; `frames` counts samples since the press at `origin`
    Pending { frames: u8, origin: Point },
    Dragging,
}

impl DragPhase {
    /// Numeric form of the phase: 0 idle, the frame count while pending,
    /// [`DRAGGING_COUNTER`] while dragging
    pub fn counter(&self) -> u8 {
        match self {
            DragPhase::Idle => 0,
            DragPhase::Pending { frames, .. } => *frames,
            DragPhase::Dragging => DRAGGING_COUNTER,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, DragPhase::Dragging)
    }
}

/// Input events produced by the host's event loop
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown(Point),
    PointerUp,
    /// Pointer sample, delivered once per frame
    PointerMove(Point),
    ToggleAcceptor,
    SetStart,
    AppendSymbol(char),
    RemoveLastSymbol,
    DeleteSelected,
    Deselect,
    BeginConnect,
    CreateStateAt(Point),
}

/// Keyboard keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Backspace,
    Delete,
    Escape,
}

/// Keys that act on a selected state
const STATE_KEYS: &[(char, InputEvent)] = &[
    ('a', InputEvent::ToggleAcceptor),
    ('s', InputEvent::SetStart),
];

/// Keys that act regardless of what is selected
const COMMAND_KEYS: &[(Key, InputEvent)] = &[
    (Key::Backspace, InputEvent::RemoveLastSymbol),
    (Key::Delete, InputEvent::DeleteSelected),
    (Key::Escape, InputEvent::Deselect),
];

/// Map a key press to an editor event given the current selection
pub fn event_for_key(key: Key, selection: Option<&Selection>) -> Option<InputEvent> {
    if let Some((_, event)) = COMMAND_KEYS.iter().find(|(k, _)| *k == key) {
        return Some(*event);
    }

    let Key::Char(c) = key else {
        return None;
    };
    match selection? {
        Selection::State(_) => STATE_KEYS
            .iter()
            .find(|(k, _)| *k == c)
            .map(|(_, event)| *event),
        Selection::Transition(_) if c.is_alphanumeric() => Some(InputEvent::AppendSymbol(c)),
        Selection::Transition(_) => None,
    }
}

/// The lowest of `0-9a-z` not yet used by a transition leaving `source`
pub fn fresh_symbol(automaton: &Automaton, source: &str) -> Option<char> {
    ('0'..='9').chain('a'..='z').find(|c| {
        !automaton
            .transitions()
            .any(|(key, _)| key.source == source && key.symbols.contains(*c))
    })
}

/// Selection, drag phase and connect mode of one editor
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    phase: DragPhase,
    selection: Option<Selection>,
    connecting: bool,
    pointer: Point,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn is_connecting(&self) -> bool {
        self.connecting
    }

    /// Last pointer position seen
    pub fn pointer(&self) -> Point {
        self.pointer
    }

    /// Rubber band from the selected state to the pointer in connect mode
    pub fn connect_preview(&self, automaton: &Automaton) -> Option<ConnectPreview> {
        if !self.connecting {
            return None;
        }
        let source = self.selection.as_ref()?.state()?;
        Some(ConnectPreview {
            from: automaton.state_position(source)?,
            to: self.pointer,
        })
    }

    /// Apply one event to the automaton
    pub fn handle(
        &mut self,
        automaton: &mut Automaton,
        config: &EditorConfig,
        event: InputEvent,
    ) -> AutomatonResult<()> {
        match event {
            InputEvent::PointerDown(pos) => self.pointer_down(automaton, config, pos),
            InputEvent::PointerUp => {
                self.phase = DragPhase::Idle;
                Ok(())
            }
            InputEvent::PointerMove(pos) => self.pointer_move(automaton, config, pos),
            InputEvent::ToggleAcceptor => {
                let Some(label) = self.selected_state() else {
                    warn!("Toggle acceptor ignored: no state selected");
                    return Ok(());
                };
                if automaton.is_acceptor(&label) {
                    automaton.remove_acceptor(&label)
                } else {
                    automaton.add_acceptor(label);
                    Ok(())
                }
            }
            InputEvent::SetStart => {
                match self.selected_state() {
                    Some(label) => automaton.set_start(label),
                    None => warn!("Set start ignored: no state selected"),
                }
                Ok(())
            }
            InputEvent::AppendSymbol(symbol) => {
                if !symbol.is_alphanumeric() {
                    warn!(%symbol, "Ignoring non-alphanumeric symbol");
                    return Ok(());
                }
                self.edit_symbols(automaton, |symbols| symbols.insert(symbol))
            }
            InputEvent::RemoveLastSymbol => {
                self.edit_symbols(automaton, |symbols| symbols.pop_last().is_some())
            }
            InputEvent::DeleteSelected => {
                let selection = self.selection.take();
                self.phase = DragPhase::Idle;
                self.connecting = false;
                match selection {
                    Some(Selection::State(label)) => automaton.remove_state(&label).map(|_| ()),
                    Some(Selection::Transition(key)) => {
                        automaton.remove_transition(&key).map(|_| ())
                    }
                    None => {
                        warn!("Delete ignored: nothing selected");
                        Ok(())
                    }
                }
            }
            InputEvent::Deselect => {
                self.selection = None;
                self.connecting = false;
                self.phase = DragPhase::Idle;
                Ok(())
            }
            InputEvent::BeginConnect => {
                if self.selected_state().is_some() {
                    self.connecting = true;
                } else {
                    warn!("Connect ignored: no state selected");
                }
                Ok(())
            }
            InputEvent::CreateStateAt(pos) => {
                let label = automaton.next_state_label();
                automaton.add_state(label.clone(), pos);
                self.selection = Some(Selection::State(label));
                Ok(())
            }
        }
    }

    fn selected_state(&self) -> Option<String> {
        self.selection
            .as_ref()
            .and_then(Selection::state)
            .map(str::to_string)
    }

    fn pointer_down(
        &mut self,
        automaton: &mut Automaton,
        config: &EditorConfig,
        pos: Point,
    ) -> AutomatonResult<()> {
        self.pointer = pos;
        let hit = pick(automaton, config, pos);

        if self.connecting {
            self.connecting = false;
            let source = self.selected_state();
            if let (Some(source), Some(Selection::State(target))) = (source, hit) {
                return self.connect(automaton, config, source, target);
            }
            debug!("Connect cancelled: no target state under pointer");
            return Ok(());
        }

        match hit {
            Some(selection) => {
                debug!(?selection, "Selected");
                self.selection = Some(selection);
                self.phase = DragPhase::Pending {
                    frames: 1,
                    origin: pos,
                };
            }
            None => {
                self.selection = None;
                self.phase = DragPhase::Idle;
            }
        }
        Ok(())
    }

    fn connect(
        &mut self,
        automaton: &mut Automaton,
        config: &EditorConfig,
        source: String,
        target: String,
    ) -> AutomatonResult<()> {
        let Some(symbol) = fresh_symbol(automaton, &source) else {
            warn!(source = %source, "No free symbol left for a new transition");
            return Ok(());
        };
        let curvature = if source == target {
            config.self_loop_vector
        } else {
            CurveVector::STRAIGHT
        };

        let key = automaton.add_transition_with_curvature(
            source,
            target,
            SymbolSet::single(symbol),
            curvature,
        );
        self.selection = Some(Selection::Transition(key));
        self.phase = DragPhase::Idle;
        Ok(())
    }

    fn pointer_move(
        &mut self,
        automaton: &mut Automaton,
        config: &EditorConfig,
        pos: Point,
    ) -> AutomatonResult<()> {
        self.pointer = pos;
        match self.phase {
            DragPhase::Idle => Ok(()),
            DragPhase::Pending { frames, origin } => {
                if frames < config.drag_frames {
                    self.phase = DragPhase::Pending {
                        frames: frames + 1,
                        origin,
                    };
                } else if pos.distance(origin) > config.drag_threshold {
                    debug!("Drag started");
                    self.phase = DragPhase::Dragging;
                }
                Ok(())
            }
            DragPhase::Dragging => self.drag(automaton, config, pos),
        }
    }

    fn drag(
        &mut self,
        automaton: &mut Automaton,
        config: &EditorConfig,
        pos: Point,
    ) -> AutomatonResult<()> {
        match &self.selection {
            Some(Selection::State(label)) => {
                let snapped = snap(automaton, label, pos, config.snap_distance);
                automaton.move_state(label, snapped)
            }
            Some(Selection::Transition(key)) => {
                let transition = automaton.transition(key).ok_or_else(|| {
                    AutomatonError::not_found(EntityKind::Transition, key.to_string())
                })?;
                let start = endpoint(automaton, &key.source)?;
                let end = endpoint(automaton, &transition.target)?;
                automaton.set_curvature(key, vectorize(start, pos, end))
            }
            None => {
                self.phase = DragPhase::Idle;
                Ok(())
            }
        }
    }

    /// Apply an edit to the selected transition's symbol set and re-key it
    fn edit_symbols(
        &mut self,
        automaton: &mut Automaton,
        edit: impl FnOnce(&mut SymbolSet) -> bool,
    ) -> AutomatonResult<()> {
        let Some(Selection::Transition(key)) = &self.selection else {
            warn!("Symbol edit ignored: no transition selected");
            return Ok(());
        };

        let mut symbols = key.symbols.clone();
        if !edit(&mut symbols) {
            return Ok(());
        }
        let new_key = automaton.set_symbols(key, symbols)?;
        self.selection = Some(Selection::Transition(new_key));
        Ok(())
    }
}

fn endpoint(automaton: &Automaton, label: &str) -> AutomatonResult<Point> {
    automaton
        .state_position(label)
        .ok_or_else(|| AutomatonError::not_found(EntityKind::State, label))
}

/// Align `pos` with another state's x or y when within `distance`
fn snap(automaton: &Automaton, dragged: &str, pos: Point, distance: f64) -> Point {
    let mut snapped = pos;
    let others = automaton.states().filter(|(label, _)| *label != dragged);
    for (_, other) in others {
        if (other.x - pos.x).abs() <= distance {
            snapped.x = other.x;
        }
        if (other.y - pos.y).abs() <= distance {
            snapped.y = other.y;
        }
    }
    snapped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_states() -> Automaton {
        let mut automaton = Automaton::new();
        automaton.add_state("q0", Point::new(100.0, 100.0));
        automaton.add_state("q1", Point::new(300.0, 100.0));
        automaton
    }

    fn press(
        controller: &mut InteractionController,
        automaton: &mut Automaton,
        config: &EditorConfig,
        pos: Point,
    ) {
        controller
            .handle(automaton, config, InputEvent::PointerDown(pos))
            .unwrap();
    }

    fn sample(
        controller: &mut InteractionController,
        automaton: &mut Automaton,
        config: &EditorConfig,
        pos: Point,
    ) {
        controller
            .handle(automaton, config, InputEvent::PointerMove(pos))
            .unwrap();
    }

    #[test]
    fn test_press_selects_and_pends() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let mut controller = InteractionController::new();

        press(&mut controller, &mut automaton, &config, Point::new(105.0, 100.0));
        assert_eq!(controller.selection(), Some(&Selection::State("q0".into())));
        assert_eq!(controller.phase().counter(), 1);

        controller
            .handle(&mut automaton, &config, InputEvent::PointerUp)
            .unwrap();
        assert_eq!(controller.phase(), DragPhase::Idle);
        assert_eq!(controller.selection(), Some(&Selection::State("q0".into())));
    }

    #[test]
    fn test_press_on_empty_space_deselects() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let mut controller = InteractionController::new();

        press(&mut controller, &mut automaton, &config, Point::new(100.0, 100.0));
        press(&mut controller, &mut automaton, &config, Point::new(200.0, 400.0));
        assert_eq!(controller.selection(), None);
        assert_eq!(controller.phase(), DragPhase::Idle);
    }

    #[test]
    fn test_counter_saturates_without_movement() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let mut controller = InteractionController::new();
        let origin = Point::new(100.0, 100.0);

        press(&mut controller, &mut automaton, &config, origin);
        for _ in 0..30 {
            sample(&mut controller, &mut automaton, &config, origin);
        }
        assert_eq!(controller.phase().counter(), 10);
        assert_eq!(automaton.state_position("q0"), Some(origin));
    }

    #[test]
    fn test_quick_move_does_not_drag() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let mut controller = InteractionController::new();

        press(&mut controller, &mut automaton, &config, Point::new(100.0, 100.0));
        sample(&mut controller, &mut automaton, &config, Point::new(150.0, 150.0));
        assert_eq!(controller.phase().counter(), 2);
        controller
            .handle(&mut automaton, &config, InputEvent::PointerUp)
            .unwrap();
        assert_eq!(controller.phase().counter(), 0);
        assert_eq!(automaton.state_position("q0"), Some(Point::new(100.0, 100.0)));
    }

    #[test]
    fn test_drag_moves_state_with_snap() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let mut controller = InteractionController::new();
        let origin = Point::new(100.0, 100.0);

        press(&mut controller, &mut automaton, &config, origin);
        for _ in 1..config.drag_frames {
            sample(&mut controller, &mut automaton, &config, origin);
        }
        assert_eq!(controller.phase().counter(), 10);

        // Threshold crossed: phase switches without moving yet
        sample(&mut controller, &mut automaton, &config, Point::new(150.0, 200.0));
        assert!(controller.phase().is_dragging());
        assert_eq!(controller.phase().counter(), DRAGGING_COUNTER);
        assert_eq!(automaton.state_position("q0"), Some(origin));

        // y within 5 of q1's y snaps to it
        sample(&mut controller, &mut automaton, &config, Point::new(160.0, 104.0));
        assert_eq!(automaton.state_position("q0"), Some(Point::new(160.0, 100.0)));

        sample(&mut controller, &mut automaton, &config, Point::new(160.0, 250.0));
        assert_eq!(automaton.state_position("q0"), Some(Point::new(160.0, 250.0)));
    }

    #[test]
    fn test_drag_transition_updates_curvature() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let key = automaton.add_transition("q0", "q1", "0");
        let mut controller = InteractionController::new();
        let on_edge = Point::new(200.0, 101.0);

        press(&mut controller, &mut automaton, &config, on_edge);
        assert_eq!(controller.selection(), Some(&Selection::Transition(key.clone())));
        for _ in 1..config.drag_frames {
            sample(&mut controller, &mut automaton, &config, on_edge);
        }
        sample(&mut controller, &mut automaton, &config, Point::new(200.0, 160.0));
        sample(&mut controller, &mut automaton, &config, Point::new(200.0, 160.0));

        let curvature = automaton.transition(&key).unwrap().curvature;
        assert!((curvature.distance - 60.0).abs() < 1e-9);
        assert!((curvature.angle - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_connect_creates_transition_with_fresh_symbol() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        automaton.add_transition("q0", "q0", "0");
        let mut controller = InteractionController::new();

        press(&mut controller, &mut automaton, &config, Point::new(100.0, 100.0));
        controller
            .handle(&mut automaton, &config, InputEvent::PointerUp)
            .unwrap();
        controller
            .handle(&mut automaton, &config, InputEvent::BeginConnect)
            .unwrap();
        assert!(controller.is_connecting());
        press(&mut controller, &mut automaton, &config, Point::new(300.0, 100.0));

        let key = TransitionKey::new("q0", "1");
        assert_eq!(automaton.transition(&key).unwrap().target, "q1");
        assert_eq!(controller.selection(), Some(&Selection::Transition(key)));
        assert!(!controller.is_connecting());
    }

    #[test]
    fn test_connect_self_loop_gets_default_curvature() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let mut controller = InteractionController::new();

        press(&mut controller, &mut automaton, &config, Point::new(300.0, 100.0));
        controller
            .handle(&mut automaton, &config, InputEvent::BeginConnect)
            .unwrap();
        press(&mut controller, &mut automaton, &config, Point::new(300.0, 100.0));

        let transition = automaton.transition(&TransitionKey::new("q1", "0")).unwrap();
        assert_eq!(transition.target, "q1");
        assert_eq!(transition.curvature, config.self_loop_vector);
    }

    #[test]
    fn test_symbol_editing_rekeys_selection() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let key = automaton.add_transition("q0", "q1", "0");
        let mut controller = InteractionController::new();
        controller.selection = Some(Selection::Transition(key));

        controller
            .handle(&mut automaton, &config, InputEvent::AppendSymbol('b'))
            .unwrap();
        controller
            .handle(&mut automaton, &config, InputEvent::AppendSymbol('-'))
            .unwrap();
        let widened = TransitionKey::new("q0", "0b");
        assert_eq!(controller.selection(), Some(&Selection::Transition(widened.clone())));
        assert!(automaton.transition(&widened).is_some());

        controller
            .handle(&mut automaton, &config, InputEvent::RemoveLastSymbol)
            .unwrap();
        assert!(automaton.transition(&TransitionKey::new("q0", "0")).is_some());
    }

    #[test]
    fn test_toggle_acceptor_and_set_start() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let mut controller = InteractionController::new();
        controller.selection = Some(Selection::State("q1".into()));

        controller
            .handle(&mut automaton, &config, InputEvent::ToggleAcceptor)
            .unwrap();
        assert!(automaton.is_acceptor("q1"));
        controller
            .handle(&mut automaton, &config, InputEvent::ToggleAcceptor)
            .unwrap();
        assert!(!automaton.is_acceptor("q1"));

        controller
            .handle(&mut automaton, &config, InputEvent::SetStart)
            .unwrap();
        assert_eq!(automaton.start(), Some("q1"));
    }

    #[test]
    fn test_delete_selected_state_cascades() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        automaton.add_transition("q0", "q1", "0");
        let mut controller = InteractionController::new();
        controller.selection = Some(Selection::State("q1".into()));

        controller
            .handle(&mut automaton, &config, InputEvent::DeleteSelected)
            .unwrap();
        assert_eq!(automaton.state_count(), 1);
        assert_eq!(automaton.transition_count(), 0);
        assert_eq!(controller.selection(), None);
    }

    #[test]
    fn test_create_state_uses_next_label() {
        let config = EditorConfig::default();
        let mut automaton = two_states();
        let mut controller = InteractionController::new();

        controller
            .handle(
                &mut automaton,
                &config,
                InputEvent::CreateStateAt(Point::new(5.0, 5.0)),
            )
            .unwrap();
        assert_eq!(automaton.state_position("q2"), Some(Point::new(5.0, 5.0)));
    }

    #[test]
    fn test_key_table() {
        let state = Selection::State("q0".into());
        let transition = Selection::Transition(TransitionKey::new("q0", "0"));

        assert_eq!(
            event_for_key(Key::Char('a'), Some(&state)),
            Some(InputEvent::ToggleAcceptor)
        );
        assert_eq!(
            event_for_key(Key::Char('s'), Some(&state)),
            Some(InputEvent::SetStart)
        );
        assert_eq!(event_for_key(Key::Char('x'), Some(&state)), None);
        assert_eq!(
            event_for_key(Key::Char('a'), Some(&transition)),
            Some(InputEvent::AppendSymbol('a'))
        );
        assert_eq!(event_for_key(Key::Char('%'), Some(&transition)), None);
        assert_eq!(event_for_key(Key::Char('a'), None), None);
        assert_eq!(
            event_for_key(Key::Escape, None),
            Some(InputEvent::Deselect)
        );
        assert_eq!(
            event_for_key(Key::Backspace, Some(&transition)),
            Some(InputEvent::RemoveLastSymbol)
        );
    }

    #[test]
    fn test_fresh_symbol_order() {
        let mut automaton = two_states();
        assert_eq!(fresh_symbol(&automaton, "q0"), Some('0'));
        automaton.add_transition("q0", "q1", "0123456789");
        assert_eq!(fresh_symbol(&automaton, "q0"), Some('a'));
        assert_eq!(fresh_symbol(&automaton, "q1"), Some('0'));
    }
}
