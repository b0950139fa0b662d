//! Curve geometry for transition arcs
//!
//! Turns three logical points (transition source, user-adjustable control
//! point, transition target) into a circle fit, a chord-relative curvature
//! vector and a tessellated arc outline. Degenerate inputs (collinear points,
//! coincident endpoints) are valid: they either yield a straight edge
//! (`None` from the circle fit) or the fixed self-loop circle.

use super::{CurveVector, Point};
use serde::Serialize;
use std::f64::consts::{PI, TAU};

/// Below this bisector determinant the three points count as collinear
pub const COLLINEAR_EPSILON: f64 = 1e-6;

/// Circles wider than this multiple of the chord are drawn straight
pub const MAX_RADIUS_FACTOR: f64 = 5.0;

/// Radius of the synthetic self-loop circle
pub const SELF_LOOP_RADIUS: f64 = 30.0;

/// Self-loop centre as a fraction of the way from the state to the control point
pub const SELF_LOOP_CENTER: f64 = 0.75;

/// Arc-length pulled back from each end so arcs stop at the state outline
pub const ARC_PULLBACK: f64 = 30.0;

/// Angular offset of self-loop endpoints from the loop's outward direction
pub const SELF_LOOP_SPREAD: f64 = 2.0 * PI / 3.0;

/// Upper bound on samples per arc ring
pub const MAX_ARC_SAMPLES: usize = 256;

const COINCIDENT_EPSILON: f64 = 1e-9;

/// A fitted circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
    pub center: Point,
    pub radius: f64,
}

/// The visible part of a fitted circle, already pulled back at both ends
///
/// `clockwise` means the arc runs from `start_angle` to `stop_angle` with
/// decreasing angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ArcAngles {
    pub circle: Circle,
    pub start_angle: f64,
    pub stop_angle: f64,
    pub clockwise: bool,
}

impl ArcAngles {
    /// Angle swept from start to stop in the arc's direction, in `[0, 2π)`
    pub fn sweep(&self) -> f64 {
        sweep_between(self.start_angle, self.stop_angle, self.clockwise)
    }

    /// Point on the circle at the given angle
    pub fn point_at(&self, angle: f64) -> Point {
        self.circle.center + polar(self.circle.radius, angle)
    }

    /// Direction of travel at the stop angle
    pub fn end_tangent(&self) -> f64 {
        if self.clockwise {
            self.stop_angle - PI / 2.0
        } else {
            self.stop_angle + PI / 2.0
        }
    }
}

/// Tessellated annulus sector
///
/// Both rings are sampled at the same angles, from the start angle to the
/// stop angle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcPolygon {
    pub outer: Vec<Point>,
    pub inner: Vec<Point>,
}

impl ArcPolygon {
    /// Closed outline: the outer ring followed by the reversed inner ring
    pub fn outline(&self) -> Vec<Point> {
        self.outer
            .iter()
            .chain(self.inner.iter().rev())
            .copied()
            .collect()
    }
}

/// Angle of a vector measured from the positive x axis
pub fn angle_of(v: Point) -> f64 {
    v.y.atan2(v.x)
}

/// Vector of the given length pointing at the given angle
pub fn polar(length: f64, angle: f64) -> Point {
    Point::new(length * angle.cos(), length * angle.sin())
}

fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

fn sweep_between(from: f64, to: f64, clockwise: bool) -> f64 {
    if clockwise {
        (from - to).rem_euclid(TAU)
    } else {
        (to - from).rem_euclid(TAU)
    }
}

/// Returns true when both chord endpoints coincide (a self-loop)
pub fn is_self_loop(start: Point, end: Point) -> bool {
    start.abs_diff_eq(end, COINCIDENT_EPSILON)
}

/// Point at fraction `t` of the way from `a` toward `b`
pub fn point_between(a: Point, b: Point, t: f64) -> Point {
    a + (b - a) * t
}

/// Evaluate the curve defined by a control polygon of any order at `t`
///
/// Repeatedly interpolates neighbouring points until one remains.
pub fn curve_point(points: &[Point], t: f64) -> Option<Point> {
    let mut work = points.to_vec();
    while work.len() > 1 {
        work = work
            .windows(2)
            .map(|pair| point_between(pair[0], pair[1], t))
            .collect();
    }
    work.first().copied()
}

/// Sample a curve at `segments + 1` evenly spaced parameters
pub fn curve_polyline(points: &[Point], segments: usize) -> Vec<Point> {
    let segments = segments.max(1);
    (0..=segments)
        .filter_map(|i| curve_point(points, i as f64 / segments as f64))
        .collect()
}

/// Fit the circle through three points
///
/// Returns `None` for near-collinear points and for circles wider than
/// [`MAX_RADIUS_FACTOR`] times the `a`-`c` distance; callers draw those as
/// straight lines. When `a == c` the generic fit is singular, so a fixed
/// self-loop circle is returned instead.
pub fn circle_from_three_points(a: Point, b: Point, c: Point) -> Option<Circle> {
    if is_self_loop(a, c) {
        return Some(Circle {
            center: point_between(a, b, SELF_LOOP_CENTER),
            radius: SELF_LOOP_RADIUS,
        });
    }

    // Perpendicular bisectors of ab and bc:
    //   ab · p = (|b|² - |a|²) / 2
    //   bc · p = (|c|² - |b|²) / 2
    let ab = b - a;
    let bc = c - b;
    let det = ab.perp_dot(bc);
    if det.abs() < COLLINEAR_EPSILON {
        return None;
    }

    let r1 = (b.length_squared() - a.length_squared()) / 2.0;
    let r2 = (c.length_squared() - b.length_squared()) / 2.0;
    let center = Point::new((r1 * bc.y - ab.y * r2) / det, (ab.x * r2 - bc.x * r1) / det);
    let radius = center.distance(a);

    if radius > MAX_RADIUS_FACTOR * a.distance(c) {
        return None;
    }

    Some(Circle { center, radius })
}

/// Encode a free control point relative to the chord `start -> end`
///
/// Self-loops have no chord, so the control point is stored in polar
/// coordinates around `start` instead.
pub fn vectorize(start: Point, mid: Point, end: Point) -> CurveVector {
    if is_self_loop(start, end) {
        let offset = mid - start;
        return CurveVector::new(offset.length(), angle_of(offset) / PI);
    }

    let midpoint = point_between(start, end, 0.5);
    let offset = mid - midpoint;
    let distance = offset.length();
    if distance == 0.0 {
        return CurveVector::STRAIGHT;
    }

    let reference = angle_of(end - midpoint);
    CurveVector::new(distance, wrap_angle(angle_of(offset) - reference) / PI)
}

/// Reconstruct the control point encoded by [`vectorize`]
pub fn from_vector(start: Point, end: Point, vector: CurveVector) -> Point {
    if is_self_loop(start, end) {
        return start + polar(vector.distance, vector.angle * PI);
    }

    let midpoint = point_between(start, end, 0.5);
    let reference = angle_of(end - midpoint);
    midpoint + polar(vector.distance, reference + vector.angle * PI)
}

/// Visible arc from `start` to `end` through `mid`
///
/// The side of the chord `mid` lies on selects the major or minor arc and the
/// winding. Both ends are pulled inward by [`ARC_PULLBACK`] units of arc
/// length, capped at a third of the sweep so short arcs never invert.
/// Self-loops instead open ±120° around the loop's outward direction.
pub fn adjusted_angles(start: Point, mid: Point, end: Point) -> Option<ArcAngles> {
    let circle = circle_from_three_points(start, mid, end)?;

    if is_self_loop(start, end) {
        let outward = angle_of(circle.center - start);
        return Some(ArcAngles {
            circle,
            start_angle: outward + SELF_LOOP_SPREAD,
            stop_angle: outward - SELF_LOOP_SPREAD,
            clockwise: true,
        });
    }

    let clockwise = (end - start).perp_dot(mid - start) > 0.0;
    let raw_start = angle_of(start - circle.center);
    let raw_stop = angle_of(end - circle.center);
    let sweep = sweep_between(raw_start, raw_stop, clockwise);
    let margin = (ARC_PULLBACK / circle.radius).min(sweep / 3.0);

    let (start_angle, stop_angle) = if clockwise {
        (raw_start - margin, raw_stop + margin)
    } else {
        (raw_start + margin, raw_stop - margin)
    };

    Some(ArcAngles {
        circle,
        start_angle,
        stop_angle,
        clockwise,
    })
}

/// Tessellate an arc of the given stroke width into an annulus sector
///
/// The outer ring lies at `radius` and the inner ring at `radius - width`.
/// The number of samples per ring grows with the radius (at least two, at
/// most [`MAX_ARC_SAMPLES`]), and
/// the sweep is normalised so the angle moves monotonically from start to
/// stop in the requested direction.
pub fn arc_to_polygon(
    center: Point,
    radius: f64,
    width: f64,
    start_angle: f64,
    stop_angle: f64,
    clockwise: bool,
) -> ArcPolygon {
    let steps = ((radius / 2.0).ceil() as usize).clamp(2, MAX_ARC_SAMPLES);
    let sweep = sweep_between(start_angle, stop_angle, clockwise);
    let signed_sweep = if clockwise { -sweep } else { sweep };

    let angles: Vec<f64> = (0..steps)
        .map(|i| start_angle + signed_sweep * i as f64 / (steps - 1) as f64)
        .collect();

    let ring = |r: f64| -> Vec<Point> { angles.iter().map(|&a| center + polar(r, a)).collect() };

    ArcPolygon {
        outer: ring(radius),
        inner: ring(radius - width),
    }
}

/// Minimum distance from `point` to the segment `[start, end]`
pub fn point_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let segment = end - start;
    let length_squared = segment.length_squared();
    if length_squared == 0.0 {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / length_squared).clamp(0.0, 1.0);
    point.distance(start + segment * t)
}
