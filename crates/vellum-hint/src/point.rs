//! Point hinting: interpolate an outline point's adjustment from the
//! active stems that bracket it (spec §4.2 "Point hinting").

use crate::stem::{Axis, Stem};

/// The y (or x) adjustment for a coordinate against one axis's active
/// stems. If the coordinate falls inside a stem's range, use that stem's
/// edge delta (linearly interpolated across the stem); otherwise
/// interpolate between the nearest two stems' facing edges.
pub fn interpolate(stems: &[Stem], axis: Axis, coord: f64) -> f64 {
    let axis_stems: Vec<&Stem> = stems.iter().filter(|s| s.axis == axis).collect();
    if axis_stems.is_empty() {
        return 0.0;
    }

    if let Some(stem) = axis_stems.iter().find(|s| coord >= s.origin && coord <= s.high_edge()) {
        let span = stem.thickness.max(f64::EPSILON);
        let t = (coord - stem.origin) / span;
        return stem.low_delta + t * (stem.high_delta - stem.low_delta);
    }

    let mut below: Option<&Stem> = None;
    let mut above: Option<&Stem> = None;
    for stem in &axis_stems {
        if stem.high_edge() <= coord && (below.is_none() || stem.high_edge() > below.unwrap().high_edge()) {
            below = Some(stem);
        }
        if stem.origin >= coord && (above.is_none() || stem.origin < above.unwrap().origin) {
            above = Some(stem);
        }
    }

    match (below, above) {
        (Some(b), Some(a)) => {
            let gap = (a.origin - b.high_edge()).max(f64::EPSILON);
            let t = (coord - b.high_edge()) / gap;
            let b_delta = b.high_delta;
            let a_delta = a.low_delta;
            b_delta + t * (a_delta - b_delta)
        }
        (Some(b), None) => b.high_delta,
        (None, Some(a)) => a.low_delta,
        (None, None) => 0.0,
    }
}

/// Hint a point. `dotsection` suppresses all hinting while active (spec
/// §4.2: "Within a dotsection region, suppress all hinting").
pub fn hint_point(stems: &[Stem], x: f64, y: f64, baseline_shift: f64, in_dotsection: bool) -> (f64, f64) {
    if in_dotsection {
        return (x, y);
    }
    let dx = interpolate(stems, Axis::Vertical, x);
    let dy = interpolate(stems, Axis::Horizontal, y);
    (x + dx, y + dy + baseline_shift)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stem_with_deltas(axis: Axis, origin: f64, thickness: f64, low: f64, high: f64) -> Stem {
        let mut s = Stem::new(axis, origin, thickness);
        s.low_delta = low;
        s.high_delta = high;
        s
    }

    #[test]
    fn point_inside_stem_interpolates_linearly() {
        let stems = vec![stem_with_deltas(Axis::Horizontal, 0.0, 100.0, 0.0, 2.0)];
        let dy = interpolate(&stems, Axis::Horizontal, 50.0);
        assert!((dy - 1.0).abs() < 1e-9);
    }

    #[test]
    fn point_between_stems_interpolates_across_counter() {
        let stems = vec![
            stem_with_deltas(Axis::Horizontal, 0.0, 10.0, 0.0, 1.0),
            stem_with_deltas(Axis::Horizontal, 100.0, 10.0, 2.0, 3.0),
        ];
        let dy = interpolate(&stems, Axis::Horizontal, 55.0);
        assert!(dy > 1.0 && dy < 2.0);
    }

    #[test]
    fn dotsection_suppresses_hinting() {
        let stems = vec![stem_with_deltas(Axis::Horizontal, 0.0, 100.0, 5.0, 5.0)];
        let (x, y) = hint_point(&stems, 10.0, 50.0, 0.0, true);
        assert_eq!((x, y), (10.0, 50.0));
    }

    #[test]
    fn no_stems_on_axis_is_identity() {
        let stems: Vec<Stem> = Vec::new();
        assert_eq!(interpolate(&stems, Axis::Horizontal, 10.0), 0.0);
    }
}
