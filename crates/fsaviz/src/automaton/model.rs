//! Automaton model
//!
//! Owns states, transitions, acceptors and the start reference. The
//! transition table keeps insertion order explicitly: the executor resolves
//! overlapping symbol sets by taking the earliest-inserted match.

use crate::core::{
    AutomatonError, AutomatonResult, CurveVector, EntityKind, Point, SymbolSet, Transition,
    TransitionKey,
};
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// A finite-state automaton with editor positions and edge curvature
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Automaton {
    states: IndexMap<String, Point>,
    transitions: IndexMap<TransitionKey, Transition>,
    acceptors: IndexSet<String>,
    start: Option<String>,
    current: Option<String>,
}

impl Automaton {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a state, or move it if the label already exists
    ///
    /// Label uniqueness is the caller's job; see [`Automaton::next_state_label`].
    pub fn add_state(&mut self, label: impl Into<String>, position: Point) {
        let label = label.into();
        debug!(label = %label, x = position.x, y = position.y, "Adding state");
        self.states.insert(label, position);
    }

    /// Remove a state together with everything that references it
    ///
    /// Transitions from or to the state, its acceptor membership and a start
    /// or current reference to it are all dropped in the same call.
    pub fn remove_state(&mut self, label: &str) -> AutomatonResult<Point> {
        let position = self
            .states
            .shift_remove(label)
            .ok_or_else(|| AutomatonError::not_found(EntityKind::State, label))?;

        let before = self.transitions.len();
        self.transitions
            .retain(|key, transition| key.source != label && transition.target != label);
        self.acceptors.shift_remove(label);
        if self.start.as_deref() == Some(label) {
            self.start = None;
        }
        if self.current.as_deref() == Some(label) {
            self.current = None;
        }

        debug!(
            label,
            removed_transitions = before - self.transitions.len(),
            "Removed state"
        );
        Ok(position)
    }

    /// Move an existing state
    pub fn move_state(&mut self, label: &str, position: Point) -> AutomatonResult<()> {
        let slot = self
            .states
            .get_mut(label)
            .ok_or_else(|| AutomatonError::not_found(EntityKind::State, label))?;
        *slot = position;
        Ok(())
    }

    pub fn state_position(&self, label: &str) -> Option<Point> {
        self.states.get(label).copied()
    }

    pub fn contains_state(&self, label: &str) -> bool {
        self.states.contains_key(label)
    }

    /// All states in insertion order
    pub fn states(&self) -> impl Iterator<Item = (&str, Point)> {
        self.states.iter().map(|(label, pos)| (label.as_str(), *pos))
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    /// The lowest-numbered `q<i>` label not yet in use
    pub fn next_state_label(&self) -> String {
        (0..)
            .map(|i| format!("q{}", i))
            .find(|label| !self.states.contains_key(label))
            .unwrap_or_default()
    }

    /// Insert a straight transition
    pub fn add_transition(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        symbols: impl Into<SymbolSet>,
    ) -> TransitionKey {
        self.add_transition_with_curvature(source, target, symbols, CurveVector::STRAIGHT)
    }

    /// Insert a transition keyed by `(source, symbols)`
    ///
    /// An existing entry with the same key is overwritten in place and keeps
    /// its position in the table. Endpoints are not checked here; callers
    /// only pass labels of existing states, and [`Automaton::validate`]
    /// reports anything that slipped through.
    pub fn add_transition_with_curvature(
        &mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        symbols: impl Into<SymbolSet>,
        curvature: CurveVector,
    ) -> TransitionKey {
        let key = TransitionKey::new(source, symbols);
        let transition = Transition::new(target, curvature);
        debug!(key = %key, target = %transition.target, "Adding transition");
        self.transitions.insert(key.clone(), transition);
        key
    }

    /// Remove a transition, keeping the order of the remaining ones
    pub fn remove_transition(&mut self, key: &TransitionKey) -> AutomatonResult<Transition> {
        let transition = self
            .transitions
            .shift_remove(key)
            .ok_or_else(|| AutomatonError::not_found(EntityKind::Transition, key.to_string()))?;
        debug!(key = %key, "Removed transition");
        Ok(transition)
    }

    pub fn transition(&self, key: &TransitionKey) -> Option<&Transition> {
        self.transitions.get(key)
    }

    /// All transitions in insertion order
    pub fn transitions(&self) -> impl Iterator<Item = (&TransitionKey, &Transition)> {
        self.transitions.iter()
    }

    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    /// The first transition, in insertion order, leaving `state` on `symbol`
    pub fn transition_for(
        &self,
        state: &str,
        symbol: char,
    ) -> Option<(&TransitionKey, &Transition)> {
        self.transitions
            .iter()
            .find(|(key, _)| key.source == state && key.symbols.contains(symbol))
    }

    /// Replace a transition's curvature vector
    pub fn set_curvature(
        &mut self,
        key: &TransitionKey,
        curvature: CurveVector,
    ) -> AutomatonResult<()> {
        let transition = self
            .transitions
            .get_mut(key)
            .ok_or_else(|| AutomatonError::not_found(EntityKind::Transition, key.to_string()))?;
        transition.curvature = curvature;
        Ok(())
    }

    /// Re-key a transition with a new symbol set, keeping its table position
    pub fn set_symbols(
        &mut self,
        key: &TransitionKey,
        symbols: SymbolSet,
    ) -> AutomatonResult<TransitionKey> {
        let new_key = TransitionKey::new(key.source.clone(), symbols);
        if new_key == *key {
            return Ok(new_key);
        }
        if self.transitions.contains_key(&new_key) {
            return Err(AutomatonError::TransitionExists {
                key: new_key.to_string(),
            });
        }

        let (index, _, transition) = self
            .transitions
            .shift_remove_full(key)
            .ok_or_else(|| AutomatonError::not_found(EntityKind::Transition, key.to_string()))?;
        self.transitions
            .shift_insert(index, new_key.clone(), transition);

        debug!(from = %key, to = %new_key, "Re-keyed transition");
        Ok(new_key)
    }

    /// Mark a state as accepting; adding twice is a no-op
    pub fn add_acceptor(&mut self, label: impl Into<String>) {
        self.acceptors.insert(label.into());
    }

    pub fn remove_acceptor(&mut self, label: &str) -> AutomatonResult<()> {
        if self.acceptors.shift_remove(label) {
            Ok(())
        } else {
            Err(AutomatonError::not_found(EntityKind::Acceptor, label))
        }
    }

    pub fn is_acceptor(&self, label: &str) -> bool {
        self.acceptors.contains(label)
    }

    pub fn acceptors(&self) -> impl Iterator<Item = &str> {
        self.acceptors.iter().map(String::as_str)
    }

    pub fn acceptor_count(&self) -> usize {
        self.acceptors.len()
    }

    /// Set the start state without checking that it exists
    pub fn set_start(&mut self, label: impl Into<String>) {
        let label = label.into();
        debug!(label = %label, "Setting start state");
        self.start = Some(label);
    }

    pub fn clear_start(&mut self) {
        self.start = None;
    }

    pub fn start(&self) -> Option<&str> {
        self.start.as_deref()
    }

    /// State the most recent run ended in
    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn set_current(&mut self, label: Option<String>) {
        self.current = label;
    }

    /// Point `current` back at the start state
    pub fn reset_current(&mut self) {
        self.current = self.start.clone();
    }

    /// Check that every reference names an existing state
    pub fn validate(&self) -> AutomatonResult<()> {
        for (key, transition) in &self.transitions {
            for label in [&key.source, &transition.target] {
                if !self.contains_state(label) {
                    return Err(AutomatonError::dangling(EntityKind::Transition, label));
                }
            }
        }
        if let Some(label) = self.acceptors.iter().find(|a| !self.contains_state(a)) {
            return Err(AutomatonError::dangling(EntityKind::Acceptor, label));
        }
        if let Some(label) = self.start.as_deref() {
            if !self.contains_state(label) {
                return Err(AutomatonError::dangling(EntityKind::Start, label));
            }
        }
        Ok(())
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.states.clear();
        self.transitions.clear();
        self.acceptors.clear();
        self.start = None;
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_states() -> Automaton {
        let mut automaton = Automaton::new();
        automaton.add_state("q0", Point::new(0.0, 0.0));
        automaton.add_state("q1", Point::new(100.0, 0.0));
        automaton.add_state("q2", Point::new(200.0, 0.0));
        automaton
    }

    #[test]
    fn test_add_state_overwrites_position() {
        let mut automaton = Automaton::new();
        automaton.add_state("q0", Point::new(1.0, 2.0));
        automaton.add_state("q0", Point::new(3.0, 4.0));
        assert_eq!(automaton.state_count(), 1);
        assert_eq!(automaton.state_position("q0"), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_remove_missing_state() {
        let mut automaton = Automaton::new();
        let result = automaton.remove_state("q9");
        assert!(matches!(
            result,
            Err(AutomatonError::NotFound {
                kind: EntityKind::State,
                ..
            })
        ));
    }

    #[test]
    fn test_remove_state_cascades() {
        let mut automaton = three_states();
        automaton.add_transition("q0", "q1", "a");
        automaton.add_transition("q1", "q1", "b");
        automaton.add_transition("q1", "q2", "c");
        automaton.add_transition("q2", "q0", "d");
        automaton.add_acceptor("q1");
        automaton.set_start("q1");
        automaton.reset_current();

        automaton.remove_state("q1").unwrap();

        assert!(!automaton.contains_state("q1"));
        let remaining: Vec<_> = automaton.transitions().map(|(k, _)| k.clone()).collect();
        assert_eq!(remaining, vec![TransitionKey::new("q2", "d")]);
        assert!(!automaton.is_acceptor("q1"));
        assert_eq!(automaton.start(), None);
        assert_eq!(automaton.current(), None);
        assert!(automaton.validate().is_ok());
    }

    #[test]
    fn test_next_state_label_fills_gaps() {
        let mut automaton = three_states();
        assert_eq!(automaton.next_state_label(), "q3");
        automaton.remove_state("q1").unwrap();
        assert_eq!(automaton.next_state_label(), "q1");
        assert_eq!(Automaton::new().next_state_label(), "q0");
    }

    #[test]
    fn test_overwrite_keeps_insertion_position() {
        let mut automaton = three_states();
        automaton.add_transition("q0", "q1", "0");
        automaton.add_transition("q0", "q2", "1");
        automaton.add_transition("q0", "q2", "0");

        let order: Vec<_> = automaton
            .transitions()
            .map(|(k, t)| (k.to_string(), t.target.clone()))
            .collect();
        assert_eq!(
            order,
            vec![
                ("q0_0".to_string(), "q2".to_string()),
                ("q0_1".to_string(), "q2".to_string())
            ]
        );
    }

    #[test]
    fn test_transition_for_prefers_earliest() {
        let mut automaton = three_states();
        automaton.add_transition("q0", "q1", "01");
        automaton.add_transition("q0", "q2", "1");

        let (_, transition) = automaton.transition_for("q0", '1').unwrap();
        assert_eq!(transition.target, "q1");
        assert!(automaton.transition_for("q0", '2').is_none());
        assert!(automaton.transition_for("q1", '0').is_none());
    }

    #[test]
    fn test_remove_transition() {
        let mut automaton = three_states();
        let key = automaton.add_transition("q0", "q1", "0");
        automaton.remove_transition(&key).unwrap();
        assert_eq!(automaton.transition_count(), 0);
        assert!(matches!(
            automaton.remove_transition(&key),
            Err(AutomatonError::NotFound {
                kind: EntityKind::Transition,
                ..
            })
        ));
    }

    #[test]
    fn test_set_symbols_keeps_position() {
        let mut automaton = three_states();
        let first = automaton.add_transition("q0", "q1", "0");
        automaton.add_transition("q0", "q2", "1");

        let rekeyed = automaton.set_symbols(&first, "02".into()).unwrap();
        let keys: Vec<_> = automaton.transitions().map(|(k, _)| k.clone()).collect();
        assert_eq!(keys[0], rekeyed);
        assert_eq!(automaton.transition(&rekeyed).unwrap().target, "q1");
    }

    #[test]
    fn test_set_symbols_collision() {
        let mut automaton = three_states();
        let first = automaton.add_transition("q0", "q1", "0");
        automaton.add_transition("q0", "q2", "1");
        let result = automaton.set_symbols(&first, "1".into());
        assert!(matches!(
            result,
            Err(AutomatonError::TransitionExists { .. })
        ));
    }

    #[test]
    fn test_acceptors() {
        let mut automaton = three_states();
        automaton.add_acceptor("q2");
        automaton.add_acceptor("q2");
        assert_eq!(automaton.acceptor_count(), 1);
        automaton.remove_acceptor("q2").unwrap();
        assert!(matches!(
            automaton.remove_acceptor("q2"),
            Err(AutomatonError::NotFound {
                kind: EntityKind::Acceptor,
                ..
            })
        ));
    }

    #[test]
    fn test_set_start_does_not_check_existence() {
        let mut automaton = Automaton::new();
        automaton.set_start("ghost");
        assert_eq!(automaton.start(), Some("ghost"));
        assert!(matches!(
            automaton.validate(),
            Err(AutomatonError::DanglingReference {
                kind: EntityKind::Start,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_reports_dangling_transition() {
        let mut automaton = three_states();
        automaton.add_transition("q0", "q9", "0");
        assert!(matches!(
            automaton.validate(),
            Err(AutomatonError::DanglingReference {
                kind: EntityKind::Transition,
                ..
            })
        ));
    }
}
