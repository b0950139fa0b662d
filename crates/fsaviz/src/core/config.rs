//! Editor configuration
//!
//! Tunables shared by the interaction controller and the scene builder.
//! Hosts can deserialize this from JSON; missing fields take their defaults.

use super::CurveVector;
use serde::{Deserialize, Serialize};

/// Editor tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Radius of a state's circular glyph, also its pick radius
    pub state_radius: f64,
    /// Stroke width of transition arcs
    pub stroke_width: f64,
    /// Maximum pointer distance from a transition's centre line to pick it
    pub pick_tolerance: f64,
    /// Frames a pointer must be held before a drag can start
    pub drag_frames: u8,
    /// Pointer travel (px) from the press position that starts a drag
    pub drag_threshold: f64,
    /// Dragged states snap to another state's x or y within this distance
    pub snap_distance: f64,
    /// Curvature given to newly created self-loops
    pub self_loop_vector: CurveVector,
}

impl EditorConfig {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            state_radius: 30.0,
            stroke_width: 3.0,
            pick_tolerance: 10.0,
            drag_frames: 10,
            drag_threshold: 10.0,
            snap_distance: 5.0,
            // 60 units straight up on a y-down canvas
            self_loop_vector: CurveVector::new(60.0, -0.5),
        }
    }
}
