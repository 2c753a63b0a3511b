// Copyright 2025 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

//! Connector geometry: a link between two nodes is drawn as a circular arc
//! through a control point offset from the chord midpoint by the link's
//! curvature, trimmed where the arc crosses each node's label footprint.

use std::f64::consts::PI;

use crate::common::Result;
use crate::diagram::common::{
    Circle, Ellipse, Point, distance, is_zero, js_format_number, square,
};
use crate::diagram::constants::*;
use crate::geom_err;

/// The unique circle through three points, or a typed error when they are
/// collinear (zero determinant).
pub fn circle_from_points(p1: Point, p2: Point, p3: Point) -> Result<Circle> {
    let off = square(p2.x) + square(p2.y);
    let bc = (square(p1.x) + square(p1.y) - off) / 2.0;
    let cd = (off - square(p3.x) - square(p3.y)) / 2.0;
    let det = (p1.x - p2.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p2.y);

    if is_zero(det) {
        return geom_err!(DegenerateArc, "zero determinant".to_string());
    }

    let idet = 1.0 / det;
    let cx = (bc * (p2.y - p3.y) - cd * (p1.y - p2.y)) * idet;
    let cy = (cd * (p1.x - p2.x) - bc * (p2.x - p3.x)) * idet;
    let r = (square(p2.x - cx) + square(p2.y - cy)).sqrt();

    Ok(Circle { x: cx, y: cy, r })
}

/// Clamp a curvature so the arc construction stays well-conditioned for
/// these endpoints: magnitude below half the chord (the control point stays
/// on the minor arc, so the drawn portion is always the short way around)
/// and above the floor where a nearly-straight arc reads as ambiguous.
pub fn clamp_curvature(curvature: f64, from: Point, to: Point) -> f64 {
    let half_chord = distance(from, to) / 2.0;
    let max_mag = (half_chord - CURVATURE_MARGIN).max(CURVATURE_MARGIN);
    let min_mag = MIN_CURVATURE.min(max_mag);
    let sign = if curvature < 0.0 { -1.0 } else { 1.0 };
    sign * curvature.abs().clamp(min_mag, max_mag)
}

/// The arc's construction control point: the chord midpoint pushed out
/// along the chord's left-hand perpendicular by the curvature.
fn control_point(from: Point, to: Point, curvature: f64) -> Point {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    let chord = (square(dx) + square(dy)).sqrt();
    Point {
        x: (from.x + to.x) / 2.0 - curvature * dy / chord,
        y: (from.y + to.y) / 2.0 + curvature * dx / chord,
    }
}

/// Signed angular span from `start` to `end`, measured in the requested
/// direction: positive when counter-clockwise (increasing angle).
fn sweep_span(start: f64, end: f64, counter_clockwise: bool) -> f64 {
    let tau = 2.0 * PI;
    let mut ccw = (end - start) % tau;
    if ccw < 0.0 {
        ccw += tau;
    }
    if counter_clockwise { ccw } else { ccw - tau }
}

/// Where the arc crosses the footprint boundary, as a fraction of the sweep
/// in [0, 1].  Marches `ARC_SAMPLE_STEPS` samples from the chosen end
/// tracking the inside/outside state, then bisects the first state change.
/// When the whole sweep is on one side, falls back to the last sampled
/// point and reports `false` so callers can flag the degraded trim.
fn intersect_ellipse_arc(
    circ: &Circle,
    start_theta: f64,
    span: f64,
    footprint: &Ellipse,
    from_start: bool,
) -> (f64, bool) {
    let sample_t = |i: usize| {
        let frac = i as f64 / ARC_SAMPLE_STEPS as f64;
        if from_start { frac } else { 1.0 - frac }
    };
    let point_at = |t: f64| circ.at(start_theta + span * t);

    let mut prev_t = sample_t(0);
    let mut prev_inside = footprint.contains(point_at(prev_t));
    for i in 1..=ARC_SAMPLE_STEPS {
        let t = sample_t(i);
        let inside = footprint.contains(point_at(t));
        if inside != prev_inside {
            let (mut lo, mut hi) = (prev_t, t);
            for _ in 0..BOUNDARY_REFINE_ITERS {
                let mid = (lo + hi) / 2.0;
                if footprint.contains(point_at(mid)) == prev_inside {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            return ((lo + hi) / 2.0, true);
        }
        prev_t = t;
        prev_inside = inside;
    }

    (prev_t, false)
}

/// The on-circle point at `theta`, nudged past the footprint edge along the
/// outward radial so the stroke visibly clears the shape.
fn clearance_point(circ: &Circle, theta: f64, footprint: &Ellipse) -> Point {
    let p = circ.at(theta);
    let dx = p.x - footprint.cx;
    let dy = p.y - footprint.cy;
    let len = (square(dx) + square(dy)).sqrt();
    if is_zero(len) {
        return p;
    }
    Point {
        x: p.x + BOUNDARY_CLEARANCE * dx / len,
        y: p.y + BOUNDARY_CLEARANCE * dy / len,
    }
}

/// A renderable connector: the reference circle, trimmed endpoints, sweep
/// direction, a sampled polyline for hit-testing, the angular midpoint (the
/// curvature drag handle), and the polarity glyph anchor.
#[derive(Clone, Debug, PartialEq)]
pub struct ConnectorPath {
    pub circle: Circle,
    pub start: Point,
    pub end: Point,
    /// True when the sweep runs in the direction of increasing angle about
    /// the circle center.
    pub counter_clockwise: bool,
    pub polyline: Vec<Point>,
    pub midpoint: Point,
    pub glyph: Point,
    /// False when the corresponding footprint swallowed (or never touched)
    /// the arc and the trim fell back to the last sampled point.
    pub start_found: bool,
    pub end_found: bool,
}

impl ConnectorPath {
    /// SVG path data for the trimmed arc.  The span never exceeds a half
    /// turn, so the large-arc flag is always 0.
    pub fn svg_path_data(&self) -> String {
        format!(
            "M{},{}A{},{} 0 0,{} {},{}",
            js_format_number(self.start.x),
            js_format_number(self.start.y),
            js_format_number(self.circle.r),
            js_format_number(self.circle.r),
            self.counter_clockwise as u8,
            js_format_number(self.end.x),
            js_format_number(self.end.y)
        )
    }
}

/// Turn a link's endpoints, curvature, and footprints into a drawable arc.
/// Pure function of its inputs; callers see a typed error for degenerate
/// construction (coincident endpoints or collinear control point) and must
/// refuse the operation or clamp the curvature first.
pub fn compute_connector_path(
    from: Point,
    to: Point,
    curvature: f64,
    from_footprint: &Ellipse,
    to_footprint: &Ellipse,
) -> Result<ConnectorPath> {
    if is_zero(distance(from, to)) {
        return geom_err!(DegenerateArc, "coincident endpoints".to_string());
    }

    let control = control_point(from, to, curvature);
    let circ = circle_from_points(from, control, to)?;

    let start_theta = (from.y - circ.y).atan2(from.x - circ.x);
    let end_theta = (to.y - circ.y).atan2(to.x - circ.x);

    // sweep in whichever direction passes the control point's side of the
    // chord
    let cross =
        (from.x - circ.x) * (control.y - circ.y) - (from.y - circ.y) * (control.x - circ.x);
    let counter_clockwise = cross > 0.0;
    let span = sweep_span(start_theta, end_theta, counter_clockwise);

    let (start_t, start_found) =
        intersect_ellipse_arc(&circ, start_theta, span, from_footprint, true);
    let (end_t, end_found) = intersect_ellipse_arc(&circ, start_theta, span, to_footprint, false);

    let start = clearance_point(&circ, start_theta + span * start_t, from_footprint);
    let end = clearance_point(&circ, start_theta + span * end_t, to_footprint);

    let mut polyline = Vec::with_capacity(POLYLINE_SEGMENTS + 1);
    for i in 0..=POLYLINE_SEGMENTS {
        let t = start_t + (end_t - start_t) * (i as f64 / POLYLINE_SEGMENTS as f64);
        polyline.push(circ.at(start_theta + span * t));
    }
    polyline[0] = start;
    polyline[POLYLINE_SEGMENTS] = end;

    let midpoint = circ.at(start_theta + span * ((start_t + end_t) / 2.0));

    let glyph_theta = start_theta + span * (start_t + (end_t - start_t) * GLYPH_ARC_POSITION);
    let on_arc = circ.at(glyph_theta);
    // radially outward from the circle center is perpendicular to the local
    // tangent
    let glyph = Point {
        x: on_arc.x + GLYPH_OFFSET * glyph_theta.cos(),
        y: on_arc.y + GLYPH_OFFSET * glyph_theta.sin(),
    };

    Ok(ConnectorPath {
        circle: circ,
        start,
        end,
        counter_clockwise,
        polyline,
        midpoint,
        glyph,
        start_found,
        end_found,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::ErrorCode;
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    fn pt(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    #[test]
    fn test_circle_from_points() {
        let c = circle_from_points(pt(0.0, 1.0), pt(1.0, 0.0), pt(-1.0, 0.0)).unwrap();
        assert!(approx_eq!(f64, c.x, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f64, c.y, 0.0, epsilon = 1e-6));
        assert!(approx_eq!(f64, c.r, 1.0, epsilon = 1e-6));
    }

    #[test]
    fn test_circle_from_collinear_points() {
        let err =
            circle_from_points(pt(0.0, 0.0), pt(1.0, 1.0), pt(2.0, 2.0)).unwrap_err();
        assert_eq!(err.code, ErrorCode::DegenerateArc);
    }

    #[test]
    fn test_circle_fit_is_order_insensitive() {
        let (p1, p2, p3) = (pt(10.0, 4.0), pt(-3.0, 7.0), pt(2.0, -8.0));
        let a = circle_from_points(p1, p2, p3).unwrap();
        let b = circle_from_points(p3, p1, p2).unwrap();
        assert!(approx_eq!(f64, a.x, b.x, epsilon = 1e-9));
        assert!(approx_eq!(f64, a.y, b.y, epsilon = 1e-9));
        assert!(approx_eq!(f64, a.r, b.r, epsilon = 1e-9));
    }

    #[test]
    fn test_clamp_curvature_bounds() {
        let a = pt(0.0, 0.0);
        let b = pt(100.0, 0.0);

        // too large: pulled inside half the chord
        let clamped = clamp_curvature(500.0, a, b);
        assert_eq!(clamped, 50.0 - CURVATURE_MARGIN);

        // sign survives clamping
        let clamped = clamp_curvature(-500.0, a, b);
        assert_eq!(clamped, -(50.0 - CURVATURE_MARGIN));

        // too small: pushed up to the visual floor
        assert_eq!(clamp_curvature(0.0, a, b), MIN_CURVATURE);
        assert_eq!(clamp_curvature(-0.1, a, b), -MIN_CURVATURE);

        // in-range values pass through
        assert_eq!(clamp_curvature(30.0, a, b), 30.0);
    }

    #[test]
    fn test_clamp_curvature_close_nodes() {
        // closer than the visual floor allows: bounds collapse but stay
        // positive and ordered
        let a = pt(0.0, 0.0);
        let b = pt(3.0, 0.0);
        let clamped = clamp_curvature(100.0, a, b);
        assert!(clamped > 0.0);
        assert!(clamped <= 1.5);
    }

    #[test]
    fn test_clamped_curvature_never_degenerates() {
        let a = pt(0.0, 0.0);
        let b = pt(100.0, 0.0);
        let footprint_a = Ellipse::new(0.0, 0.0, 20.0, 12.0);
        let footprint_b = Ellipse::new(100.0, 0.0, 20.0, 12.0);

        for raw in [-1e6, -50.0, -0.001, 0.0, 0.001, 50.0, 1e6] {
            let curvature = clamp_curvature(raw, a, b);
            assert!(
                compute_connector_path(a, b, curvature, &footprint_a, &footprint_b).is_ok(),
                "raw curvature {raw} degenerated after clamping"
            );
        }
    }

    #[test]
    fn test_basic_arc_scenario() {
        // nodes 100 apart, bowing 40 up: the reference circle must be wider
        // than the half-distance and the trimmed ends must sit between the
        // node centers
        let a = pt(0.0, 0.0);
        let b = pt(100.0, 0.0);
        let footprint_a = Ellipse::new(0.0, 0.0, 10.0, 10.0);
        let footprint_b = Ellipse::new(100.0, 0.0, 10.0, 10.0);

        let path = compute_connector_path(a, b, 40.0, &footprint_a, &footprint_b).unwrap();

        assert!(path.circle.r > 50.0);
        assert!(path.start_found);
        assert!(path.end_found);

        assert!(path.start.x > 0.0 && path.start.x < 100.0);
        assert!(path.end.x > 0.0 && path.end.x < 100.0);

        // trims land at the footprint edge (plus clearance), not the center
        let start_gap = distance(path.start, a);
        let end_gap = distance(path.end, b);
        assert!((9.5..=11.5).contains(&start_gap), "start gap {start_gap}");
        assert!((9.5..=11.5).contains(&end_gap), "end gap {end_gap}");

        // the arc passes through the construction control point (50, 40),
        // and by symmetry the handle midpoint sits there too
        assert!(distance(path.midpoint, pt(50.0, 40.0)) < 1.0);

        assert_eq!(path.polyline.len(), POLYLINE_SEGMENTS + 1);
        assert_eq!(path.polyline[0], path.start);
        assert_eq!(path.polyline[POLYLINE_SEGMENTS], path.end);
    }

    #[test]
    fn test_curvature_sign_flips_side() {
        let a = pt(0.0, 0.0);
        let b = pt(100.0, 0.0);
        let fa = Ellipse::new(0.0, 0.0, 10.0, 10.0);
        let fb = Ellipse::new(100.0, 0.0, 10.0, 10.0);

        let up = compute_connector_path(a, b, 40.0, &fa, &fb).unwrap();
        let down = compute_connector_path(a, b, -40.0, &fa, &fb).unwrap();

        assert!(up.midpoint.y > 0.0);
        assert!(down.midpoint.y < 0.0);
        assert_ne!(up.counter_clockwise, down.counter_clockwise);
    }

    #[test]
    fn test_deterministic() {
        let a = pt(12.5, -30.0);
        let b = pt(210.0, 145.0);
        let fa = Ellipse::new(12.5, -30.0, 38.0, 16.0);
        let fb = Ellipse::new(210.0, 145.0, 44.0, 16.0);

        let one = compute_connector_path(a, b, -62.0, &fa, &fb).unwrap();
        let two = compute_connector_path(a, b, -62.0, &fa, &fb).unwrap();
        assert_eq!(one, two);
    }

    #[test]
    fn test_trimmed_ends_sit_on_footprint_boundary() {
        let a = pt(0.0, 0.0);
        let b = pt(160.0, 90.0);
        let fa = Ellipse::new(0.0, 0.0, 42.0, 15.0);
        let fb = Ellipse::new(160.0, 90.0, 30.0, 18.0);

        let path = compute_connector_path(a, b, 35.0, &fa, &fb).unwrap();
        assert!(path.start_found && path.end_found);

        // just outside the ellipse: the implicit value is 1 at the boundary
        let implicit = |p: Point, e: &Ellipse| {
            square((p.x - e.cx) / e.rx) + square((p.y - e.cy) / e.ry)
        };
        let sv = implicit(path.start, &fa);
        let ev = implicit(path.end, &fb);
        assert!((1.0..1.2).contains(&sv), "start implicit value {sv}");
        assert!((1.0..1.2).contains(&ev), "end implicit value {ev}");
    }

    #[test]
    fn test_oversized_footprint_falls_back() {
        let a = pt(0.0, 0.0);
        let b = pt(100.0, 0.0);
        // a footprint that swallows the entire arc
        let fa = Ellipse::new(0.0, 0.0, 5000.0, 5000.0);
        let fb = Ellipse::new(100.0, 0.0, 10.0, 10.0);

        let path = compute_connector_path(a, b, 40.0, &fa, &fb).unwrap();
        assert!(!path.start_found);
        assert!(path.end_found);
    }

    #[test]
    fn test_coincident_endpoints_degenerate() {
        let p = pt(50.0, 50.0);
        let f = Ellipse::new(50.0, 50.0, 10.0, 10.0);
        let err = compute_connector_path(p, p, 40.0, &f, &f).unwrap_err();
        assert_eq!(err.code, ErrorCode::DegenerateArc);
    }

    #[test]
    fn test_zero_curvature_degenerate() {
        let a = pt(0.0, 0.0);
        let b = pt(100.0, 0.0);
        let f = Ellipse::new(0.0, 0.0, 10.0, 10.0);
        let err = compute_connector_path(a, b, 0.0, &f, &f).unwrap_err();
        assert_eq!(err.code, ErrorCode::DegenerateArc);
    }

    #[test]
    fn test_svg_path_data() {
        let a = pt(0.0, 0.0);
        let b = pt(100.0, 0.0);
        let fa = Ellipse::new(0.0, 0.0, 10.0, 10.0);
        let fb = Ellipse::new(100.0, 0.0, 10.0, 10.0);

        let path = compute_connector_path(a, b, 40.0, &fa, &fb).unwrap();
        let d = path.svg_path_data();
        assert!(d.starts_with('M'));
        assert!(d.contains('A'));
        // minor arc only
        assert!(d.contains(" 0 0,"));
    }

    proptest! {
        #[test]
        fn prop_circle_fit_passes_through_inputs(
            x1 in -100.0f64..100.0, y1 in -100.0f64..100.0,
            x2 in -100.0f64..100.0, y2 in -100.0f64..100.0,
            x3 in -100.0f64..100.0, y3 in -100.0f64..100.0,
        ) {
            let (p1, p2, p3) = (pt(x1, y1), pt(x2, y2), pt(x3, y3));
            let det = (p1.x - p2.x) * (p2.y - p3.y) - (p2.x - p3.x) * (p1.y - p2.y);
            prop_assume!(det.abs() > 1e-3);

            let c = circle_from_points(p1, p2, p3).unwrap();
            let center = pt(c.x, c.y);
            for p in [p1, p2, p3] {
                let err = (distance(p, center) - c.r).abs();
                prop_assert!(err < 1e-6 * (1.0 + c.r), "point off circle by {err}");
            }
        }

        #[test]
        fn prop_clamped_paths_never_degenerate(
            ax in -300.0f64..300.0, ay in -300.0f64..300.0,
            bx in -300.0f64..300.0, by in -300.0f64..300.0,
            raw in -500.0f64..500.0,
        ) {
            let (a, b) = (pt(ax, ay), pt(bx, by));
            prop_assume!(distance(a, b) > 5.0);

            let fa = Ellipse::new(ax, ay, 25.0, 12.0);
            let fb = Ellipse::new(bx, by, 25.0, 12.0);
            let curvature = clamp_curvature(raw, a, b);
            let path = compute_connector_path(a, b, curvature, &fa, &fb);
            prop_assert!(path.is_ok());

            // endpoints stay on the reference circle (within the clearance)
            let path = path.unwrap();
            let center = pt(path.circle.x, path.circle.y);
            let start_err = (distance(path.start, center) - path.circle.r).abs();
            prop_assert!(start_err <= BOUNDARY_CLEARANCE + 1e-9);
        }
    }
}
