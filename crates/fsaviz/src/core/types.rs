//! Core type definitions for automaton editing
//!
//! This module contains the fundamental value types shared by the model,
//! the executor, the serializer and the curve solver: positions, curvature
//! vectors, symbol sets and transition keys.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A 2D position in canvas units
pub type Point = glam::DVec2;

/// Resolution-independent encoding of a transition's bend
///
/// The control point of a transition is stored relative to the chord between
/// its source and target: `distance` is the offset from the chord midpoint and
/// `angle` is the angle to the chord direction expressed as a fraction of π.
/// Because both are chord-relative, moving either endpoint never invalidates
/// the stored value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveVector {
    pub distance: f64,
    pub angle: f64,
}

impl CurveVector {
    /// A straight edge: the control point sits on the chord midpoint
    pub const STRAIGHT: CurveVector = CurveVector {
        distance: 0.0,
        angle: 0.0,
    };

    pub fn new(distance: f64, angle: f64) -> Self {
        Self { distance, angle }
    }

    /// Returns true if the control point coincides with the chord midpoint
    pub fn is_straight(&self) -> bool {
        self.distance == 0.0
    }
}

impl fmt::Display for CurveVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.distance, self.angle)
    }
}

/// The set of input symbols sharing one transition edge
///
/// Symbols are kept sorted, so two sets holding the same symbols compare and
/// hash equal regardless of the order they were added in.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SymbolSet(BTreeSet<char>);

impl SymbolSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A set holding exactly one symbol
    pub fn single(symbol: char) -> Self {
        Self(BTreeSet::from([symbol]))
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.0.contains(&symbol)
    }

    /// Add a symbol, returning false if it was already present
    pub fn insert(&mut self, symbol: char) -> bool {
        self.0.insert(symbol)
    }

    /// Remove the greatest symbol (the last one in display order)
    pub fn pop_last(&mut self) -> Option<char> {
        self.0.pop_last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<char> for SymbolSet {
    fn from_iter<T: IntoIterator<Item = char>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&str> for SymbolSet {
    fn from(symbols: &str) -> Self {
        symbols.chars().collect()
    }
}

impl fmt::Display for SymbolSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, symbol) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", symbol)?;
        }
        Ok(())
    }
}

/// Composite key of the transition table: source state plus symbol set
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionKey {
    pub source: String,
    pub symbols: SymbolSet,
}

impl TransitionKey {
    pub fn new(source: impl Into<String>, symbols: impl Into<SymbolSet>) -> Self {
        Self {
            source: source.into(),
            symbols: symbols.into(),
        }
    }
}

impl fmt::Display for TransitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.source, self.symbols)
    }
}

/// Value stored in the transition table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    pub target: String,
    pub curvature: CurveVector,
}

impl Transition {
    pub fn new(target: impl Into<String>, curvature: CurveVector) -> Self {
        Self {
            target: target.into(),
            curvature,
        }
    }
}

/// Kinds of entities a lookup or reference can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    State,
    Transition,
    Acceptor,
    Start,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::State => write!(f, "state"),
            EntityKind::Transition => write!(f, "transition"),
            EntityKind::Acceptor => write!(f, "acceptor"),
            EntityKind::Start => write!(f, "start"),
        }
    }
}
