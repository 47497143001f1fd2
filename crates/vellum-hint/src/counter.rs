//! Counter hinting: the `cntrmask` bitmask decision tree and local search
//! (spec §4.2 "Counter hinting (`cntrmask` with group complete)").

use crate::stem::Stem;

/// One histogram bin: stems sharing an `(ideal_width, other_width)` pair,
/// plus the alternate width a decision bit can choose instead.
#[derive(Clone, Debug)]
struct Bin {
    stem_indices: Vec<usize>,
    ideal_width: f64,
    other_width: Option<f64>,
}

/// A candidate set of rounding choices, one bit per decision (spec: "Each
/// decision is a single bit; decisions are capped at the number of bits
/// in a 32-bit word").
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
struct Decision(u32);

impl Decision {
    fn bit(self, i: usize) -> bool {
        i < 32 && (self.0 >> i) & 1 == 1
    }

    fn flipped(self, i: usize) -> Decision {
        if i >= 32 {
            self
        } else {
            Decision(self.0 ^ (1 << i))
        }
    }
}

fn same_bin(b: &Bin, ideal: f64, other: Option<f64>) -> bool {
    (b.ideal_width - ideal).abs() < 1e-6
        && match (b.other_width, other) {
            (Some(a), Some(c)) => (a - c).abs() < 1e-6,
            (None, None) => true,
            _ => false,
        }
}

fn build_bins(stems: &[Stem]) -> Vec<Bin> {
    let mut bins: Vec<Bin> = Vec::new();
    for (i, stem) in stems.iter().enumerate() {
        let ideal = stem.ideal_width;
        let other = stem.other_width;
        if let Some(bin) = bins.iter_mut().find(|b| same_bin(b, ideal, other)) {
            bin.stem_indices.push(i);
        } else {
            bins.push(Bin { stem_indices: vec![i], ideal_width: ideal, other_width: other });
        }
    }
    bins
}

fn bin_width(bin: &Bin, decision: Decision, bit_index: usize) -> f64 {
    if decision.bit(bit_index) {
        bin.other_width.unwrap_or(bin.ideal_width)
    } else {
        bin.ideal_width
    }
}

/// Utility function: lower is better. Penalizes changing fixed (blue-zone
/// captured) edges, exceeding the expansion budget, and deviation from
/// ideal widths (spec §4.2 step 4, points a-d collapsed into weighted terms).
fn utility(stems: &[Stem], bins: &[Bin], decision: Decision, expansion_factor: f64) -> f64 {
    let mut penalty = 0.0;
    let mut total_width = 0.0;
    let mut chosen_width = 0.0;

    for (bit_index, bin) in bins.iter().enumerate() {
        let width = bin_width(bin, decision, bit_index);
        for &stem_idx in &bin.stem_indices {
            let stem = &stems[stem_idx];
            total_width += stem.thickness;
            chosen_width += width;
            if stem.captured && (width - bin.ideal_width).abs() > f64::EPSILON {
                penalty += 1000.0; // hard penalty: fixed-edge distances must not move.
            }
            let deviation = width - stem.thickness;
            penalty += deviation * deviation; // weighted least-squares vs ideal.
        }
    }

    let slop = (expansion_factor * total_width).max(1.0);
    let excess = (chosen_width - total_width).abs() - slop;
    if excess > 0.0 {
        penalty += excess * excess;
    }
    penalty
}

/// Local search from the all-ideal decision (spec step 5): flip each bit
/// in turn, keep any improvement, stop after a full pass with no change.
fn local_search(stems: &[Stem], bins: &[Bin], expansion_factor: f64) -> (Decision, f64) {
    let mut decision = Decision::default();
    let mut best = utility(stems, bins, decision, expansion_factor);
    loop {
        let mut improved = false;
        for bit in 0..bins.len().min(32) {
            let candidate = decision.flipped(bit);
            let score = utility(stems, bins, candidate, expansion_factor);
            if score < best {
                best = score;
                decision = candidate;
                improved = true;
            }
        }
        if !improved {
            break;
        }
    }
    (decision, best)
}

/// Acceptance threshold below which the decided roundings are applied.
/// Scaled by stem count since the penalty terms are additive per stem.
fn acceptance_threshold(stem_count: usize) -> f64 {
    4.0 * stem_count.max(1) as f64
}

/// Run counter hinting over one `cntrmask` group, mutating stem deltas in
/// place when the local search finds an acceptable fit.
pub fn hint_counter_group(stems: &mut [Stem], expansion_factor: f64) {
    if stems.is_empty() {
        return;
    }
    let bins = build_bins(stems);
    let (decision, score) = local_search(stems, &bins, expansion_factor);
    if score > acceptance_threshold(stems.len()) {
        log::debug!("counter hinting rejected fit with score {score:.2}");
        return;
    }
    for (bit_index, bin) in bins.iter().enumerate() {
        let width = bin_width(bin, decision, bit_index);
        for &stem_idx in &bin.stem_indices {
            let stem = &mut stems[stem_idx];
            if stem.captured {
                continue; // backtracking around fixed edges: leave captured stems untouched.
            }
            let adjustment = (width - stem.thickness) / 2.0;
            stem.low_delta -= adjustment;
            stem.high_delta += adjustment;
        }
    }
}
