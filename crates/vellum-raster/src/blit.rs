//! Span, block and char blits (spec §4.3). One dispatch point per kind
//! handles the `(color, clip-mode)` specialization the source expressed as
//! a table of function pointers (spec §9 "Blit function dispatch") — here
//! it's a match arm rather than a vtable, which the optimizer can still
//! specialize per call site.

use crate::clip::Clip;
use crate::context::{BlitContext, Color};
use crate::form::Bitmap;
use crate::span::{Span, SpanList};
use crate::word::{combine, mask, WORD_BITS};

/// Paint (black) or clear (white) an inclusive run of bits in one row,
/// word-aligned, unrolling full interior words (spec §4.3 "Span blit
/// algorithm"): first partial-word mask, full words, last partial-word mask.
fn paint_word_range(row: &mut [usize], start_bit: usize, end_bit: usize, color: Color) {
    debug_assert!(start_bit <= end_bit);
    let start_word = start_bit / WORD_BITS;
    let end_word = end_bit / WORD_BITS;
    let start_off = start_bit % WORD_BITS;
    let end_off = end_bit % WORD_BITS;

    let apply = |word: &mut usize, m: usize| match color {
        Color::Black => *word |= m,
        Color::White => *word &= !m,
    };

    if start_word == end_word {
        apply(&mut row[start_word], mask(start_off, end_off));
        return;
    }

    apply(&mut row[start_word], mask(start_off, WORD_BITS - 1));
    for w in row.iter_mut().take(end_word).skip(start_word + 1) {
        match color {
            Color::Black => *w = !0,
            Color::White => *w = 0,
        }
    }
    apply(&mut row[end_word], mask(0, end_off));
}

/// Paint an inclusive horizontal run `[x_start, x_end]` on scanline `y`.
pub fn span_blit(dest: &mut Bitmap, ctx: &BlitContext, y: u32, x_start: i32, x_end: i32) {
    debug_assert!(x_start <= x_end);
    let x_start = x_start + ctx.x_sep;
    let x_end = x_end + ctx.x_sep;

    match &ctx.clip {
        Clip::None => span_blit_raw(dest, ctx.color, y, x_start, x_end),
        Clip::Rect(rect) => {
            if !rect.contains_row(y as i32) {
                return;
            }
            if let Some((l, r)) = rect.clamp_span(x_start, x_end) {
                span_blit_raw(dest, ctx.color, y, l, r);
            }
        }
        Clip::Spans(rows) => {
            if let Some(row_clip) = rows.get(y as usize) {
                let range = Span::new(x_start, x_end);
                row_clip.intersecting(
                    range,
                    0,
                    |black_span| span_blit_raw(dest, ctx.color, y, black_span.left, black_span.right),
                    |_white_span| {},
                );
            }
        }
        Clip::Bitmap(mask_bmp) => {
            // Complex bitmap clip: AND the destination paint against the mask,
            // pixel by pixel over the requested run (spec: "bitmap clip
            // (mask-AND with source)").
            for x in x_start..=x_end {
                if x < 0 {
                    continue;
                }
                if mask_bmp.get(x as u32, y) {
                    span_blit_raw(dest, ctx.color, y, x, x);
                }
            }
        }
    }
}

fn span_blit_raw(dest: &mut Bitmap, color: Color, y: u32, x_start: i32, x_end: i32) {
    if y >= dest.height || x_end < 0 {
        return;
    }
    let x_start = x_start.max(0) as usize;
    let x_end = (x_end as usize).min(dest.width as usize - 1);
    if x_start > x_end {
        return;
    }
    let row = dest.row_mut(y);
    paint_word_range(row, x_start, x_end, color);
}

/// Paint an inclusive rectangle `[y_start, y_end] x [x_start, x_end]`.
pub fn block_blit(
    dest: &mut Bitmap,
    ctx: &BlitContext,
    y_start: u32,
    y_end: u32,
    x_start: i32,
    x_end: i32,
) {
    for y in y_start..=y_end {
        span_blit(dest, ctx, y, x_start, x_end);
    }
}

/// Composite a source glyph bitmap onto `dest` at `(x, y)`, ANDing every
/// painted pixel against `ctx.clip` (spec §4.3 "charclip": rect, per-row
/// spanlist, and bitmap-mask clips all apply). Implements the spec's
/// "general case" word-combining loop uniformly; the aligned and
/// one-word-straddle cases it calls out are performance specializations of
/// the same result and are not separately unrolled here.
pub fn char_blit(dest: &mut Bitmap, ctx: &BlitContext, src: &Bitmap, x: i32, y: i32) {
    let x = x + ctx.x_sep;
    let y = y + ctx.y_sep;

    for sy in 0..src.height {
        let dy = y + sy as i32;
        if dy < 0 || dy >= dest.height as i32 {
            continue;
        }

        let row_spans: Option<&SpanList> = match &ctx.clip {
            Clip::Spans(rows) => rows.get(dy as usize),
            _ => None,
        };
        if matches!(&ctx.clip, Clip::Spans(_)) && row_spans.is_none() {
            continue; // no open spans recorded for this row: fully clipped.
        }

        for sx in 0..src.width {
            let dx = x + sx as i32;
            if dx < 0 || dx >= dest.width as i32 {
                continue;
            }
            if !src.get(sx, sy) {
                continue;
            }
            let visible = match &ctx.clip {
                Clip::None => true,
                Clip::Rect(r) => r.contains_row(dy) && dx >= r.left && dx <= r.right,
                Clip::Spans(_) => row_spans.is_some_and(|spans| spans.spans().iter().any(|s| dx >= s.left && dx <= s.right)),
                Clip::Bitmap(mask_bmp) => (dx as u32) < mask_bmp.width && mask_bmp.get(dx as u32, dy as u32),
            };
            if visible {
                span_blit_raw(dest, ctx.color, dy as u32, dx, dx);
            }
        }
    }
}

/// Combine two adjacent source words into the bit window a destination
/// word at `shift` bits of offset needs. Exposed for the halftone and
/// future word-unrolled char-blit fast paths to share.
pub fn combine_source_words(hi: usize, lo: usize, shift: usize) -> usize {
    combine(hi, lo, shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::ClipRect;

    #[test]
    fn span_blit_paints_inclusive_run() {
        let mut dest = Bitmap::new_blank(64, 1);
        let ctx = BlitContext::new(Color::Black);
        span_blit(&mut dest, &ctx, 0, 10, 20);
        for x in 0..64 {
            assert_eq!(dest.get(x, 0), (10..=20).contains(&x), "x={x}");
        }
    }

    #[test]
    fn span_blit_white_clears() {
        let mut dest = Bitmap::new_blank(64, 1);
        span_blit(&mut dest, &BlitContext::new(Color::Black), 0, 0, 63);
        span_blit(&mut dest, &BlitContext::new(Color::White), 0, 10, 20);
        for x in 0..64 {
            assert_eq!(dest.get(x, 0), !(10..=20).contains(&x));
        }
    }

    #[test]
    fn span_blit_crosses_word_boundary() {
        let width = (WORD_BITS as u32) * 2 + 5;
        let mut dest = Bitmap::new_blank(width, 1);
        let ctx = BlitContext::new(Color::Black);
        let start = WORD_BITS as i32 - 3;
        let end = WORD_BITS as i32 + 10;
        span_blit(&mut dest, &ctx, 0, start, end);
        for x in 0..width {
            let expect = (start..=end).contains(&(x as i32));
            assert_eq!(dest.get(x, 0), expect, "x={x}");
        }
    }

    #[test]
    fn span_blit_respects_rect_clip() {
        let mut dest = Bitmap::new_blank(64, 1);
        let rect = ClipRect { left: 5, top: 0, right: 15, bottom: 0 };
        let ctx = BlitContext::new(Color::Black).with_clip(crate::clip::Clip::Rect(rect));
        span_blit(&mut dest, &ctx, 0, 0, 63);
        for x in 0..64 {
            assert_eq!(dest.get(x, 0), (5..=15).contains(&x));
        }
    }

    #[test]
    fn block_blit_paints_rectangle() {
        let mut dest = Bitmap::new_blank(32, 10);
        let ctx = BlitContext::new(Color::Black);
        block_blit(&mut dest, &ctx, 2, 4, 5, 10);
        for y in 0..10 {
            for x in 0..32 {
                let expect = (2..=4).contains(&y) && (5..=10).contains(&x);
                assert_eq!(dest.get(x, y), expect, "x={x} y={y}");
            }
        }
    }

    #[test]
    fn char_blit_composites_source_at_offset() {
        let mut src = Bitmap::new_blank(4, 2);
        {
            let ctx = BlitContext::new(Color::Black);
            span_blit(&mut src, &ctx, 0, 0, 3);
        }
        let mut dest = Bitmap::new_blank(16, 16);
        let ctx = BlitContext::new(Color::Black);
        char_blit(&mut dest, &ctx, &src, 6, 3);
        for x in 6..10 {
            assert!(dest.get(x, 3), "x={x}");
            assert!(!dest.get(x, 4), "row 1 of src was blank, x={x}");
        }
        assert!(!dest.get(5, 3));
        assert!(!dest.get(10, 3));
    }

    #[test]
    fn char_blit_respects_spanlist_clip() {
        let mut src = Bitmap::new_blank(8, 1);
        {
            let ctx = BlitContext::new(Color::Black);
            span_blit(&mut src, &ctx, 0, 0, 7);
        }
        let mut dest = Bitmap::new_blank(16, 4);

        let mut row_clip = SpanList::new(4);
        row_clip.insert(Span::new(2, 4));
        let ctx = BlitContext::new(Color::Black).with_clip(Clip::Spans(vec![row_clip]));

        char_blit(&mut dest, &ctx, &src, 0, 0);
        for x in 0..16 {
            assert_eq!(dest.get(x, 0), (2..=4).contains(&x), "x={x} should follow the spanlist clip");
        }
    }

    #[test]
    fn char_blit_respects_bitmap_clip() {
        let mut src = Bitmap::new_blank(8, 1);
        {
            let ctx = BlitContext::new(Color::Black);
            span_blit(&mut src, &ctx, 0, 0, 7);
        }
        let mut dest = Bitmap::new_blank(16, 4);

        let mut mask_bmp = Bitmap::new_blank(16, 4);
        {
            let ctx = BlitContext::new(Color::Black);
            span_blit(&mut mask_bmp, &ctx, 0, 3, 5);
        }
        let ctx = BlitContext::new(Color::Black).with_clip(Clip::Bitmap(mask_bmp));

        char_blit(&mut dest, &ctx, &src, 0, 0);
        for x in 0..16 {
            assert_eq!(dest.get(x, 0), (3..=5).contains(&x), "x={x} should follow the bitmap clip mask");
        }
    }
}
