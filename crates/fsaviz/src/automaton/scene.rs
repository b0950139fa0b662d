//! Render scene
//!
//! Read-only per-frame data handed to the drawing collaborator: one glyph per
//! state and one resolved geometry per transition. Also hosts hit-testing,
//! which needs the same edge geometry.

use super::interaction::Selection;
use super::model::Automaton;
use crate::core::geometry::{
    adjusted_angles, angle_of, arc_to_polygon, from_vector, is_self_loop, point_to_segment, polar,
    ArcAngles,
};
use crate::core::{EditorConfig, Point, Transition, TransitionKey};
use serde::Serialize;
use tracing::warn;

/// Arrowhead side length
const ARROW_SIZE: f64 = 12.0;

/// Half-opening of the arrowhead
const ARROW_SPREAD: f64 = std::f64::consts::PI / 7.0;

/// A state's circle
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateGlyph {
    pub label: String,
    pub position: Point,
    pub radius: f64,
    pub selected: bool,
    pub acceptor: bool,
    pub start: bool,
    pub current: bool,
}

/// Centre line of a transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum EdgeShape {
    /// Chord pulled back to the state outlines
    Straight { from: Point, to: Point },
    Arc(ArcAngles),
}

impl EdgeShape {
    /// Sampled centre line from source end to target end
    pub fn centerline(&self) -> Vec<Point> {
        match self {
            EdgeShape::Straight { from, to } => vec![*from, *to],
            EdgeShape::Arc(arc) => {
                arc_to_polygon(
                    arc.circle.center,
                    arc.circle.radius,
                    0.0,
                    arc.start_angle,
                    arc.stop_angle,
                    arc.clockwise,
                )
                .outer
            }
        }
    }

    /// Closest distance from `point` to the centre line
    pub fn distance_to(&self, point: Point) -> f64 {
        self.centerline()
            .windows(2)
            .map(|pair| point_to_segment(point, pair[0], pair[1]))
            .fold(f64::INFINITY, f64::min)
    }

    /// Filled outline of the stroke
    fn outline(&self, width: f64) -> Vec<Point> {
        match self {
            EdgeShape::Straight { from, to } => {
                let normal = (*to - *from).normalize_or_zero().perp() * (width / 2.0);
                vec![*from + normal, *to + normal, *to - normal, *from - normal]
            }
            EdgeShape::Arc(arc) => arc_to_polygon(
                arc.circle.center,
                arc.circle.radius + width / 2.0,
                width,
                arc.start_angle,
                arc.stop_angle,
                arc.clockwise,
            )
            .outline(),
        }
    }

    fn arrow(&self) -> ArrowHead {
        match self {
            EdgeShape::Straight { from, to } => ArrowHead {
                tip: *to,
                angle: angle_of(*to - *from),
            },
            EdgeShape::Arc(arc) => ArrowHead {
                tip: arc.point_at(arc.stop_angle),
                angle: arc.end_tangent(),
            },
        }
    }
}

/// Arrowhead anchor: the tip and the direction it points
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArrowHead {
    pub tip: Point,
    pub angle: f64,
}

impl ArrowHead {
    /// Triangle with the tip first
    pub fn triangle(&self) -> [Point; 3] {
        let back = self.angle + std::f64::consts::PI;
        [
            self.tip,
            self.tip + polar(ARROW_SIZE, back + ARROW_SPREAD),
            self.tip + polar(ARROW_SIZE, back - ARROW_SPREAD),
        ]
    }
}

/// Everything needed to draw one transition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionGeometry {
    pub key: TransitionKey,
    pub target: String,
    /// Comma-joined symbols, drawn at the control point
    pub label: String,
    pub control: Point,
    pub shape: EdgeShape,
    pub polygon: Vec<Point>,
    pub arrow: ArrowHead,
    pub selected: bool,
}

/// Rubber band drawn while connecting
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConnectPreview {
    pub from: Point,
    pub to: Point,
}

/// Render data for one frame
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Scene {
    pub states: Vec<StateGlyph>,
    pub transitions: Vec<TransitionGeometry>,
    pub connect_preview: Option<ConnectPreview>,
}

impl Scene {
    pub fn build(
        automaton: &Automaton,
        selection: Option<&Selection>,
        config: &EditorConfig,
    ) -> Self {
        let states = automaton
            .states()
            .map(|(label, position)| StateGlyph {
                label: label.to_string(),
                position,
                radius: config.state_radius,
                selected: selection.and_then(Selection::state) == Some(label),
                acceptor: automaton.is_acceptor(label),
                start: automaton.start() == Some(label),
                current: automaton.current() == Some(label),
            })
            .collect();

        let transitions = automaton
            .transitions()
            .filter_map(|(key, transition)| {
                let Some((control, shape)) = edge_shape(automaton, config, key, transition) else {
                    warn!(key = %key, "Skipping transition with a missing endpoint");
                    return None;
                };
                Some(TransitionGeometry {
                    key: key.clone(),
                    target: transition.target.clone(),
                    label: key.symbols.to_string(),
                    control,
                    polygon: shape.outline(config.stroke_width),
                    arrow: shape.arrow(),
                    shape,
                    selected: selection.and_then(Selection::transition) == Some(key),
                })
            })
            .collect();

        Self {
            states,
            transitions,
            connect_preview: None,
        }
    }

    pub fn with_connect_preview(mut self, preview: Option<ConnectPreview>) -> Self {
        self.connect_preview = preview;
        self
    }
}

/// Control point and centre line of a transition
///
/// `None` when either endpoint is not a known state. A self-loop without a
/// curvature vector is drawn with the configured default loop.
fn edge_shape(
    automaton: &Automaton,
    config: &EditorConfig,
    key: &TransitionKey,
    transition: &Transition,
) -> Option<(Point, EdgeShape)> {
    let start = automaton.state_position(&key.source)?;
    let end = automaton.state_position(&transition.target)?;
    let vector = if transition.curvature.is_straight() && is_self_loop(start, end) {
        config.self_loop_vector
    } else {
        transition.curvature
    };
    let control = from_vector(start, end, vector);

    let shape = match adjusted_angles(start, control, end) {
        Some(arc) => EdgeShape::Arc(arc),
        None => {
            let direction = (end - start).normalize_or_zero();
            EdgeShape::Straight {
                from: start + direction * config.state_radius,
                to: end - direction * config.state_radius,
            }
        }
    };
    Some((control, shape))
}

/// What lies under `pos`
///
/// States win over transitions; among candidates of one kind the closest
/// one is returned.
pub fn pick(automaton: &Automaton, config: &EditorConfig, pos: Point) -> Option<Selection> {
    let state = automaton
        .states()
        .map(|(label, position)| (label, position.distance(pos)))
        .filter(|(_, distance)| *distance <= config.state_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1));
    if let Some((label, _)) = state {
        return Some(Selection::State(label.to_string()));
    }

    automaton
        .transitions()
        .filter_map(|(key, transition)| {
            let (_, shape) = edge_shape(automaton, config, key, transition)?;
            Some((key, shape.distance_to(pos)))
        })
        .filter(|(_, distance)| *distance <= config.pick_tolerance)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(key, _)| Selection::Transition(key.clone()))
}
