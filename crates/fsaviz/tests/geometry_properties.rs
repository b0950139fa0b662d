//! Property tests for the curve solver

use approx::assert_abs_diff_eq;
use fsaviz::core::geometry::*;
use fsaviz::core::Point;
use proptest::prelude::*;
use std::f64::consts::PI;

fn point() -> impl Strategy<Value = Point> {
    (-1000.0f64..1000.0, -1000.0f64..1000.0).prop_map(|(x, y)| Point::new(x, y))
}

proptest! {
    #[test]
    fn vector_round_trips_control_point(start in point(), mid in point(), end in point()) {
        prop_assume!(start.distance(end) > 1e-3);
        let back = from_vector(start, end, vectorize(start, mid, end));
        prop_assert!(back.distance(mid) < 1e-6, "{:?} != {:?}", back, mid);
    }

    #[test]
    fn self_loop_vector_round_trips(start in point(), mid in point()) {
        let back = from_vector(start, start, vectorize(start, mid, start));
        prop_assert!(back.distance(mid) < 1e-6);
    }

    #[test]
    fn vector_angle_is_normalised(start in point(), mid in point(), end in point()) {
        let vector = vectorize(start, mid, end);
        prop_assert!(vector.distance >= 0.0);
        prop_assert!(vector.angle >= -1.0 && vector.angle <= 1.0);
    }

    #[test]
    fn fitted_circle_passes_through_points(a in point(), b in point(), c in point()) {
        prop_assume!(a.distance(c) > 1e-3);
        if let Some(circle) = circle_from_three_points(a, b, c) {
            for p in [a, b, c] {
                let off = (p.distance(circle.center) - circle.radius).abs();
                prop_assert!(off < 1e-6 * circle.radius.max(1.0));
            }
            prop_assert!(circle.radius <= MAX_RADIUS_FACTOR * a.distance(c));
        }
    }

    #[test]
    fn arc_polygon_is_closed_annulus(
        center in point(),
        radius in 10.0f64..500.0,
        width in 0.5f64..5.0,
        start in -PI..PI,
        delta in 0.1f64..6.0,
        clockwise in any::<bool>(),
    ) {
        let stop = if clockwise { start - delta } else { start + delta };
        let polygon = arc_to_polygon(center, radius, width, start, stop, clockwise);

        prop_assert_eq!(polygon.outer.len(), polygon.inner.len());
        prop_assert!(polygon.outer.len() >= 2);

        let first = center + polar(radius, start);
        let last = center + polar(radius, stop);
        prop_assert!(polygon.outer[0].distance(first) < 1e-6);
        prop_assert!(polygon.outer[polygon.outer.len() - 1].distance(last) < 1e-6);

        let outline = polygon.outline();
        for i in 0..outline.len() {
            let next = outline[(i + 1) % outline.len()];
            prop_assert!(outline[i].distance(next) > 1e-9);
        }
    }

    #[test]
    fn adjusted_arc_stays_inside_raw_sweep(start in point(), mid in point(), end in point()) {
        prop_assume!(start.distance(end) > 1.0);
        if let Some(arc) = adjusted_angles(start, mid, end) {
            let raw = ArcAngles {
                start_angle: angle_of(start - arc.circle.center),
                stop_angle: angle_of(end - arc.circle.center),
                ..arc
            };
            prop_assert!(arc.sweep() > 0.0);
            prop_assert!(arc.sweep() < raw.sweep() + 1e-9);
        }
    }
}

#[test]
fn collinear_points_yield_straight_edge() {
    let a = Point::new(0.0, 0.0);
    let b = Point::new(10.0, 0.0);
    let c = Point::new(20.0, 0.0);
    assert!(circle_from_three_points(a, b, c).is_none());
    assert!(adjusted_angles(a, b, c).is_none());
}

#[test]
fn self_loop_circle_sits_three_quarters_toward_control() {
    let a = Point::new(40.0, 40.0);
    let b = Point::new(100.0, 40.0);
    let circle = circle_from_three_points(a, b, a).unwrap();
    assert_eq!(circle.radius, SELF_LOOP_RADIUS);
    assert_abs_diff_eq!(circle.center.x, 85.0, epsilon = 1e-12);
    assert_abs_diff_eq!(circle.center.y, 40.0, epsilon = 1e-12);
}

#[test]
fn bend_survives_endpoint_move() {
    let vector = vectorize(
        Point::new(0.0, 0.0),
        Point::new(50.0, 30.0),
        Point::new(100.0, 0.0),
    );
    // Twice the chord, same relative bend
    let mid = from_vector(Point::new(0.0, 0.0), Point::new(200.0, 0.0), vector);
    assert_abs_diff_eq!(mid.x, 100.0, epsilon = 1e-9);
    assert_abs_diff_eq!(mid.y, 30.0, epsilon = 1e-9);
}
