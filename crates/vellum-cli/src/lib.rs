//! The `plotchar` dispatcher (spec §4.4): the top-level per-glyph entry
//! point tying the cache, the font-format-specific construction path, and
//! the compositing blit together.

pub mod scanconvert;

use kurbo::Affine;
use vellum_cache::{FontIdentity, GlyphCache, Index};
use vellum_core::error::{Result, VellumError};
use vellum_core::selector::CharSelector;
use vellum_core::traits::FontKind;
use vellum_raster::{BlitContext, Bitmap, Color, Form, RleForm};

/// Matches spec §5 "Concurrency & resource model": "not reentrant on the
/// same thread beyond one level of Type 3 recursion."
pub const MAX_RECURSION_DEPTH: usize = 2;

pub struct GlyphRequest {
    pub selector: CharSelector,
    pub matrix: Affine,
}

pub struct ConstructedGlyph {
    pub form: Form,
    pub bearing: (f64, f64),
    pub advance: (f64, f64),
    pub is_master: bool,
}

/// The font-format-specific collaborator the dispatcher drives (spec §4.4
/// step 4): charstring interpretation, TrueType instruction execution,
/// Type 3/4 procedure execution, or Type 32 bitmap unpacking. Implementing
/// an actual interpreter is outside this crate's scope (spec §1
/// Non-goals); this trait is the seam a font-format layer plugs into.
pub trait FontBackend {
    fn identity(&self) -> FontIdentity;
    fn kind(&self) -> FontKind;

    /// Build the glyph named by `request.selector`. Returns
    /// `Err(VellumError::Undefined(_))` when the glyph has no definition,
    /// which triggers notdef fallback (spec §4.4 step 5).
    fn construct(&mut self, request: &GlyphRequest) -> Result<ConstructedGlyph>;

    /// The selector to substitute when `construct` reports undefined, if any.
    fn notdef(&self) -> Option<CharSelector> {
        None
    }
}

/// External display-list-visualization hook (spec §4.4 step 7).
pub trait Observer {
    fn begin_char(&mut self, selector: &CharSelector);
    fn end_char(&mut self, selector: &CharSelector, success: bool);
}

pub struct Dispatcher {
    cache: GlyphCache,
    recursion_stack: Vec<CharSelector>,
    observer: Option<Box<dyn Observer>>,
}

impl Dispatcher {
    pub fn new(cache: GlyphCache) -> Self {
        Dispatcher { cache, recursion_stack: Vec::new(), observer: None }
    }

    pub fn set_observer(&mut self, observer: Box<dyn Observer>) {
        self.observer = Some(observer);
    }

    pub fn cache(&self) -> &GlyphCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut GlyphCache {
        &mut self.cache
    }

    /// The dispatcher's main entry point: normalize, look up, construct on
    /// miss, cache, and return a handle compositing can use (spec §4.4
    /// steps 1-6).
    pub fn plotchar(
        &mut self,
        font: &mut dyn FontBackend,
        matrix: Affine,
        selector: CharSelector,
    ) -> Result<Index> {
        let identity = font.identity();

        if let Some(idx) = self.cache.lookup(&identity, matrix, &selector) {
            return Ok(idx);
        }

        if self.recursion_stack.len() >= MAX_RECURSION_DEPTH {
            return Err(VellumError::PolicyViolation(
                "glyph construction recursion depth exceeded (Type 3 procedures may recurse at most one level)".into(),
            ));
        }

        self.recursion_stack.push(selector.clone());
        if let Some(observer) = self.observer.as_mut() {
            observer.begin_char(&selector);
        }

        let request = GlyphRequest { selector: selector.clone(), matrix };
        let outcome = self.construct_and_cache(font, &identity, matrix, &request);

        if let Some(observer) = self.observer.as_mut() {
            observer.end_char(&selector, outcome.is_ok());
        }
        self.recursion_stack.pop();
        outcome
    }

    fn construct_and_cache(
        &mut self,
        font: &mut dyn FontBackend,
        identity: &FontIdentity,
        matrix: Affine,
        request: &GlyphRequest,
    ) -> Result<Index> {
        match font.construct(request) {
            Ok(glyph) => Ok(self.cache.insert(
                identity,
                matrix,
                request.selector.clone(),
                glyph.form,
                glyph.bearing,
                glyph.advance,
                glyph.is_master,
            )),
            Err(VellumError::Undefined(msg)) => match font.notdef() {
                Some(notdef_selector) => self.plotchar(font, matrix, notdef_selector),
                None => Err(VellumError::Undefined(msg)),
            },
            Err(other) => Err(other),
        }
    }

    /// Composite a looked-up or freshly constructed glyph onto `dest`
    /// (spec §4.4 step 6). A compressed cache entry (`cache.rs`'s
    /// `try_compress`, spec §4.1) is inflated back to a bitmap first, since
    /// `char_blit` composites pixel sources, not spanlists.
    pub fn composite(&self, idx: Index, dest: &mut Bitmap, x: i32, y: i32, ctx: &BlitContext) {
        let entry = self.cache.get_char(idx);
        match &entry.form {
            Form::Bitmap(source) => vellum_raster::blit::char_blit(dest, ctx, source, x, y),
            Form::Rle(rle) => {
                let inflated = inflate_rle(rle);
                vellum_raster::blit::char_blit(dest, ctx, &inflated, x, y);
            }
            Form::MultiBit(_) | Form::Blank => {}
        }
    }
}

/// Rebuild a packed bitmap from an RLE form's per-row spanlists, one
/// `span_blit` per span.
fn inflate_rle(rle: &RleForm) -> Bitmap {
    let mut bitmap = Bitmap::new_blank(rle.width, rle.height);
    let ctx = BlitContext::new(Color::Black);
    for (y, line) in rle.lines.iter().enumerate() {
        line.iterate(|span| {
            vellum_raster::blit::span_blit(&mut bitmap, &ctx, y as u32, span.left, span.right);
        });
    }
    bitmap
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::Affine;
    use vellum_cache::{CdevProcKind, FontIdentity, GlyphCache};
    use vellum_core::config::FontsParams;
    use vellum_core::selector::{CharSelector, GlyphName, WritingMode};
    use vellum_raster::{RleForm, Span, SpanList};

    fn identity() -> FontIdentity {
        FontIdentity {
            font_id: 1,
            unique_id: 1,
            font_type: 1,
            paint_type: 0,
            stroke_width: 0.0,
            cdevproc: CdevProcKind::None,
            save_level: 0,
        }
    }

    #[test]
    fn composite_inflates_rle_forms_before_blitting() {
        let mut cache = GlyphCache::new(FontsParams::default());
        let mut row = SpanList::new(4);
        row.insert(Span::new(2, 5));
        let rle = RleForm { width: 8, height: 1, lines: vec![row] };

        let selector = CharSelector::new(GlyphName::Code(1), WritingMode::Horizontal);
        let idx = cache.insert(&identity(), Affine::IDENTITY, selector, Form::Rle(rle), (0.0, 0.0), (8.0, 0.0), false);

        let dispatcher = Dispatcher::new(cache);
        let mut dest = Bitmap::new_blank(16, 4);
        let ctx = BlitContext::new(Color::Black);
        dispatcher.composite(idx, &mut dest, 0, 0, &ctx);

        for x in 0..16 {
            assert_eq!(dest.get(x, 0), (2..=5).contains(&x), "x={x} should reflect the RLE form's only span");
        }
    }
}
