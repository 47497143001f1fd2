//! Bitmap-to-RLE compression heuristic (spec §4.1 "Bitmap-to-RLE compression").
//!
//! Not thread-safe in the source ("uses a shared scratch area... must
//! only be invoked from the interpretation thread between output
//! operations" — spec §9 open question). We resolve that open question by
//! giving each call its own scratch buffer rather than sharing one: the
//! cache already enforces single-writer access via
//! [`crate::state::ConstructionState`], so there is no correctness reason
//! to additionally serialize through a shared buffer, and per-call scratch
//! is simpler to reason about in safe Rust.

use vellum_core::config::FontsParams;
use vellum_raster::{Bitmap, Form, RleForm, Span, SpanList};

/// Estimate the compressed size of `bitmap` without allocating the RLE
/// form, to decide whether to bother compressing at all.
fn estimate_rle_bytes(bitmap: &Bitmap) -> usize {
    let mut total = 0usize;
    for y in 0..bitmap.height {
        let mut run = false;
        for x in 0..bitmap.width {
            let bit = bitmap.get(x, y);
            if bit && !run {
                total += std::mem::size_of::<Span>();
            }
            run = bit;
        }
    }
    total
}

/// The compression ratio threshold for a glyph that has been referenced
/// `use_count` times (spec: "first use: aggressive; subsequent uses:
/// conservative"), read from [`FontsParams::force_font_compress`].
pub fn threshold_for_use_count(params: &FontsParams, use_count: u32) -> f32 {
    let table = &params.force_font_compress;
    if table.is_empty() {
        return 1.0;
    }
    let idx = (use_count as usize).min(table.len() - 1);
    table[idx]
}

/// Whether `form` is eligible for compression at all (spec §4.1 conditions
/// a-c, minus the page-timing condition which the caller — the cache —
/// already enforces before calling this).
pub fn is_compressible(form: &Form, is_master: bool, byte_len: usize, params: &FontsParams) -> bool {
    if is_master {
        return false;
    }
    if byte_len < params.min_font_compress {
        return false;
    }
    matches!(form, Form::Bitmap(_))
}

/// Convert a bitmap form to its RLE encoding if doing so meets the
/// use-count-scaled compression ratio threshold. Returns `None` if
/// compression would not save enough space.
pub fn compress_if_worthwhile(
    bitmap: &Bitmap,
    use_count: u32,
    params: &FontsParams,
) -> Option<RleForm> {
    let original = bitmap.total_bytes();
    let estimated = estimate_rle_bytes(bitmap);
    let ratio = estimated as f32 / original.max(1) as f32;
    let threshold = threshold_for_use_count(params, use_count);
    if ratio > threshold {
        log::debug!("compression skipped: ratio {ratio:.2} exceeds threshold {threshold:.2}");
        return None;
    }

    let mut lines = Vec::with_capacity(bitmap.height as usize);
    for y in 0..bitmap.height {
        let bits: Vec<bool> = (0..bitmap.width).map(|x| bitmap.get(x, y)).collect();
        lines.push(SpanList::from_bitmap(bitmap.width as usize, &bits));
    }
    Some(RleForm { width: bitmap.width, height: bitmap.height, lines })
}
