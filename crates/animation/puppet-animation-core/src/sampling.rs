//! Curve evaluation.

use crate::data::{Curve, Point, Segment};

/// First segment whose end lies after `t`; `None` once `t` is past the curve.
pub fn find_segment(segments: &[Segment], t: f32) -> Option<&Segment> {
    segments.iter().find(|s| t < s.end().time)
}

#[inline]
fn lerp_point(a: Point, b: Point, t: f32) -> Point {
    Point::new(a.time + (b.time - a.time) * t, a.value + (b.value - a.value) * t)
}

#[inline]
fn segment_progress(start: Point, end: Point, t: f32) -> f32 {
    let span = end.time - start.time;
    if span <= 0.0 {
        return 1.0;
    }
    ((t - start.time) / span).max(0.0)
}

pub fn evaluate_segment(segment: &Segment, t: f32) -> f32 {
    match segment {
        Segment::Linear([a, b]) => {
            let k = segment_progress(*a, *b, t);
            a.value + (b.value - a.value) * k
        }
        Segment::Bezier([p0, p1, p2, p3]) => {
            // de Casteljau with the time fraction as parameter.
            let k = segment_progress(*p0, *p3, t);
            let p01 = lerp_point(*p0, *p1, k);
            let p12 = lerp_point(*p1, *p2, k);
            let p23 = lerp_point(*p2, *p3, k);
            let p012 = lerp_point(p01, p12, k);
            let p123 = lerp_point(p12, p23, k);
            lerp_point(p012, p123, k).value
        }
        Segment::Stepped([a, _]) => a.value,
        Segment::InverseStepped([_, b]) => b.value,
    }
}

/// Value of `curve` at clip time `t` (seconds).
pub fn sample_curve(curve: &Curve, t: f32) -> f32 {
    if curve.segments.is_empty() {
        return curve.initial.value;
    }
    match find_segment(&curve.segments, t) {
        Some(seg) => evaluate_segment(seg, t),
        None => curve
            .segments
            .last()
            .map(|s| s.end().value)
            .unwrap_or(curve.initial.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::CurveTarget;
    use approx::assert_relative_eq;

    fn curve(segments: Vec<Segment>) -> Curve {
        Curve {
            target: CurveTarget::Parameter,
            id: "P".into(),
            fade_in: None,
            fade_out: None,
            initial: segments[0].start(),
            segments,
        }
    }

    #[test]
    fn linear_and_hold_after_end() {
        let c = curve(vec![Segment::Linear([Point::new(0.0, 0.0), Point::new(1.0, 10.0)])]);
        assert_relative_eq!(sample_curve(&c, 0.25), 2.5);
        assert_relative_eq!(sample_curve(&c, 5.0), 10.0);
        assert_relative_eq!(sample_curve(&c, -1.0), 0.0);
    }

    #[test]
    fn stepped_variants() {
        let a = Point::new(0.0, 1.0);
        let b = Point::new(1.0, 0.0);
        assert_relative_eq!(evaluate_segment(&Segment::Stepped([a, b]), 0.9), 1.0);
        assert_relative_eq!(evaluate_segment(&Segment::InverseStepped([a, b]), 0.1), 0.0);
    }

    #[test]
    fn bezier_hits_endpoints_and_is_monotone_for_monotone_controls() {
        let seg = Segment::Bezier([
            Point::new(0.0, 0.0),
            Point::new(0.33, 0.0),
            Point::new(0.66, 1.0),
            Point::new(1.0, 1.0),
        ]);
        assert_relative_eq!(evaluate_segment(&seg, 0.0), 0.0);
        assert_relative_eq!(evaluate_segment(&seg, 1.0), 1.0, epsilon = 1e-6);
        assert_relative_eq!(evaluate_segment(&seg, 0.5), 0.5, epsilon = 1e-6);
        let mut prev = 0.0;
        for i in 1..=10 {
            let v = evaluate_segment(&seg, i as f32 / 10.0);
            assert!(v >= prev);
            prev = v;
        }
    }
}
