//! Clip representations and the rect/complex/bitmap cop-out policy (spec
//! §4.3 "Clip blit algorithm").

use crate::form::Bitmap;
use crate::span::SpanList;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipMode {
    None,
    Rect,
    Complex,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClipRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl ClipRect {
    pub fn contains_row(&self, y: i32) -> bool {
        y >= self.top && y <= self.bottom
    }

    pub fn clamp_span(&self, left: i32, right: i32) -> Option<(i32, i32)> {
        let left = left.max(self.left);
        let right = right.min(self.right);
        if left > right {
            None
        } else {
            Some((left, right))
        }
    }
}

/// A clip region. A complex region is represented as a spanlist per row
/// when it fits; on overflow the spanlist "cops out" to a bitmap mask
/// (spec §4.3: "During clipping, if the spanlist overflows, cop out by
/// converting to bitmap and continuing").
#[derive(Clone, Debug)]
pub enum Clip {
    None,
    Rect(ClipRect),
    Spans(Vec<SpanList>),
    Bitmap(Bitmap),
}

impl Clip {
    pub fn mode(&self) -> ClipMode {
        match self {
            Clip::None => ClipMode::None,
            Clip::Rect(_) => ClipMode::Rect,
            Clip::Spans(_) | Clip::Bitmap(_) => ClipMode::Complex,
        }
    }

    /// Attempt to build a spanlist-backed complex clip from per-row spans;
    /// fall back to the (already available) bitmap mask if any row would
    /// overflow its span capacity.
    pub fn from_spans_or_bitmap(rows: Vec<SpanList>, bitmap_fallback: Bitmap) -> Clip {
        if rows.iter().any(SpanList::is_full) {
            log::debug!("complex clip spanlist overflowed, copping out to bitmap");
            Clip::Bitmap(bitmap_fallback)
        } else {
            Clip::Spans(rows)
        }
    }
}
