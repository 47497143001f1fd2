//! Stem width snapping and position adjustment (spec §4.2 steps 2-5).

use crate::blues::{build_zones, capture_edge, Capture};
use crate::params::HintParams;
use crate::stem::{Axis, Stem};

/// Step 2: choose the closest of `{Std[H/V]W, StemSnap[H/V][*], actual}`
/// within half a pixel of the actual width; otherwise keep the actual
/// width. `ppem_scale` converts character-space units to device pixels.
pub fn snap_width(actual: f64, std_width: Option<f64>, snap_table: &[f64], ppem_scale: f64) -> f64 {
    let half_pixel_chars = 0.5 / ppem_scale.max(f64::EPSILON);
    let mut best = actual;
    let mut best_dist = f64::MAX;
    let candidates = std_width.into_iter().chain(snap_table.iter().copied());
    for candidate in candidates {
        let dist = (candidate - actual).abs();
        if dist <= half_pixel_chars && dist < best_dist {
            best = candidate;
            best_dist = dist;
        }
    }
    best
}

/// Round a snapped character-space width to whole device pixels, with the
/// minimums spec §4.2 step 2 names.
pub fn round_width_to_pixels(width_chars: f64, ppem_scale: f64, axis: Axis, force_bold: bool) -> f64 {
    let device = width_chars * ppem_scale;
    let mut rounded = device.round();
    if width_chars > 0.0 && rounded < 1.0 {
        rounded = 1.0;
    }
    if force_bold && axis == Axis::Vertical && rounded < 2.0 {
        rounded = 2.0;
    }
    rounded
}

/// Step 3: the alternate candidate pixel width alongside `ideal`, or
/// `None` when snapping picked a standard width or the residual is below
/// a quarter pixel (no ambiguity worth representing).
pub fn alternate_width(width_chars: f64, ppem_scale: f64, ideal: f64, snapped_to_standard: bool) -> Option<f64> {
    if snapped_to_standard {
        return None;
    }
    let device = width_chars * ppem_scale;
    let residual = device - device.floor();
    if (residual - 0.5).abs() > 0.25 {
        return None;
    }
    let direction = if residual >= 0.5 { 1.0 } else { -1.0 };
    Some((ideal + direction).max(1.0))
}

/// Snap one stem in place: normalize already done by [`Stem::new`]; this
/// fills in `low_delta`/`high_delta`/`captured` (spec §4.2 steps 2-5).
pub fn snap_stem(stem: &mut Stem, params: &HintParams, ppem_scale: f64) {
    let (std_width, snap_table) = match stem.axis {
        Axis::Horizontal => (params.std_hw, params.stem_snap_h.as_slice()),
        Axis::Vertical => (params.std_vw, params.stem_snap_v.as_slice()),
    };
    let snapped_width_chars = snap_width(stem.thickness, std_width, snap_table, ppem_scale);
    let is_standard = std_width == Some(snapped_width_chars) || snap_table.contains(&snapped_width_chars);
    let ideal = round_width_to_pixels(snapped_width_chars, ppem_scale, stem.axis, params.force_bold);
    stem.ideal_width = ideal;
    stem.other_width = alternate_width(snapped_width_chars, ppem_scale, ideal, is_standard);

    match stem.axis {
        Axis::Horizontal => {
            let zones = build_zones(params);
            let low_capture = capture_edge(&zones, stem.origin, params, ppem_scale);
            let high_capture = capture_edge(&zones, stem.high_edge(), params, ppem_scale);
            stem.captured = low_capture != Capture::None || high_capture != Capture::None;

            let snapped_low_device = match low_capture {
                Capture::Flat(v) | Capture::Overshoot(v) => v,
                Capture::None => (stem.origin * ppem_scale).round(),
            };
            stem.low_delta = snapped_low_device / ppem_scale - stem.origin;
            let target_high_device = snapped_low_device + ideal;
            stem.high_delta = target_high_device / ppem_scale - stem.high_edge();
        }
        Axis::Vertical => {
            let snapped_low_device = (stem.origin * ppem_scale).round();
            stem.low_delta = snapped_low_device / ppem_scale - stem.origin;
            let target_high_device = snapped_low_device + ideal;
            stem.high_delta = target_high_device / ppem_scale - stem.high_edge();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S5: StdHW=[50], BlueValues=[-12,0,700,712], horizontal stem at
    /// y=0 thickness 50, identity matrix at 72ppem -> bottom edge snaps to
    /// pixel row 0, top edge to row 50, captured by the baseline zone.
    #[test]
    fn s5_horizontal_stem_snaps_and_is_captured() {
        let params = HintParams {
            std_hw: Some(50.0),
            blue_values: vec![-12.0, 0.0, 700.0, 712.0],
            ..HintParams::default()
        };
        let mut stem = Stem::new(Axis::Horizontal, 0.0, 50.0);
        snap_stem(&mut stem, &params, 1.0);

        assert!(stem.captured);
        assert_eq!((stem.origin + stem.low_delta).round(), 0.0);
        assert_eq!((stem.high_edge() + stem.high_delta).round(), 50.0);
    }

    #[test]
    fn width_within_half_pixel_snaps_to_std() {
        let snapped = snap_width(51.0, Some(50.0), &[], 1.0);
        assert_eq!(snapped, 50.0);
    }

    #[test]
    fn width_far_from_std_keeps_actual() {
        let snapped = snap_width(80.0, Some(50.0), &[], 1.0);
        assert_eq!(snapped, 80.0);
    }

    #[test]
    fn force_bold_enforces_minimum_two_pixels_on_vertical() {
        let rounded = round_width_to_pixels(0.4, 1.0, Axis::Vertical, true);
        assert_eq!(rounded, 2.0);
    }
}
