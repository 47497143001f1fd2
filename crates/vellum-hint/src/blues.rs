//! Alignment zones ("blue zones"): baseline/overshoot bands that capture
//! horizontal stem edges (spec §4.2 step 4 "Position adjustment").

use crate::params::{HintParams, EXTRA_BLUE_FUZZ};

/// One alignment zone, a closed `[bottom, top]` band in character space.
/// Zone 0 (from `BlueValues[0..2]`) is the baseline zone: only its *top*
/// edge captures, matching the convention that the bottom of the baseline
/// zone is usually below the glyph origin.
#[derive(Copy, Clone, Debug)]
pub struct AlignmentZone {
    pub bottom: f64,
    pub top: f64,
    pub is_baseline: bool,
}

/// Build the alignment-zone list from `BlueValues`/`OtherBlues` (paired
/// low/high values) and family blues, which participate identically.
pub fn build_zones(params: &HintParams) -> Vec<AlignmentZone> {
    let mut zones = Vec::new();
    push_pairs(&params.blue_values, true, &mut zones);
    push_pairs(&params.other_blues, false, &mut zones);
    push_pairs(&params.family_blues, true, &mut zones);
    push_pairs(&params.family_other_blues, false, &mut zones);
    zones
}

fn push_pairs(values: &[f64], is_blue_values: bool, out: &mut Vec<AlignmentZone>) {
    for (i, pair) in values.chunks_exact(2).enumerate() {
        out.push(AlignmentZone { bottom: pair[0], top: pair[1], is_baseline: is_blue_values && i == 0 });
    }
}

/// An edge `capture` decision: which zone (if any) claims `edge`, and
/// whether it should snap flat (no overshoot) or with overshoot enforced.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Capture {
    None,
    /// Edge pins to the zone's own boundary coordinate.
    Flat(f64),
    /// Edge is pushed at least one pixel past the flat position.
    Overshoot(f64),
}

/// Decide whether `edge` (a stem edge in character space) is captured by
/// any alignment zone, given the device-space pixels-per-character-unit
/// scale `ppem_scale` used to evaluate `BlueScale`/`BlueShift`.
pub fn capture_edge(zones: &[AlignmentZone], edge: f64, params: &HintParams, ppem_scale: f64) -> Capture {
    let fuzz = params.blue_fuzz + EXTRA_BLUE_FUZZ;
    for zone in zones {
        let boundary = if zone.is_baseline { zone.top } else { zone.top };
        if (edge - boundary).abs() <= fuzz || (edge - zone.bottom).abs() <= fuzz {
            let units_per_pixel = 1.0 / ppem_scale.max(f64::EPSILON);
            if units_per_pixel > params.blue_scale.recip() {
                // Rendering small enough that overshoot would be sub-pixel: suppress it.
                return Capture::Flat(boundary.round());
            }
            let overshoot_units = params.blue_shift;
            if (edge - boundary).abs() > overshoot_units {
                return Capture::Overshoot(boundary.round() + boundary.signum().max(1.0));
            }
            return Capture::Flat(boundary.round());
        }
    }
    Capture::None
}
