//! End-to-end dispatcher tests: cache miss constructs and inserts, cache
//! hit skips construction, notdef fallback recurses once, and the
//! recursion guard rejects runaway Type 3-style procedures.

use kurbo::Affine;
use std::cell::Cell;
use vellum_cache::{CdevProcKind, FontIdentity, GlyphCache};
use vellum_cli::{ConstructedGlyph, Dispatcher, FontBackend, GlyphRequest};
use vellum_core::config::FontsParams;
use vellum_core::error::{Result, VellumError};
use vellum_core::selector::{CharSelector, GlyphName, WritingMode};
use vellum_core::traits::FontKind;
use vellum_raster::{Bitmap, Form};

struct CountingFont {
    identity: FontIdentity,
    construct_calls: Cell<u32>,
    undefined_code: i32,
}

impl CountingFont {
    fn new() -> Self {
        CountingFont {
            identity: FontIdentity {
                font_id: 1,
                unique_id: 1,
                font_type: 1,
                paint_type: 0,
                stroke_width: 0.0,
                cdevproc: CdevProcKind::None,
                save_level: 0,
            },
            construct_calls: Cell::new(0),
            undefined_code: 999,
        }
    }
}

impl FontBackend for CountingFont {
    fn identity(&self) -> FontIdentity {
        self.identity.clone()
    }

    fn kind(&self) -> FontKind {
        FontKind::Type1
    }

    fn construct(&mut self, request: &GlyphRequest) -> Result<ConstructedGlyph> {
        self.construct_calls.set(self.construct_calls.get() + 1);
        let code = match request.selector.glyph {
            GlyphName::Code(c) => c,
            _ => unreachable!(),
        };
        if code == self.undefined_code {
            return Err(VellumError::Undefined("no such glyph".into()));
        }
        Ok(ConstructedGlyph {
            form: Form::Bitmap(Bitmap::new_blank(16, 16)),
            bearing: (0.0, 0.0),
            advance: (16.0, 0.0),
            is_master: false,
        })
    }

    fn notdef(&self) -> Option<CharSelector> {
        Some(CharSelector::new(GlyphName::Code(0), WritingMode::Horizontal))
    }
}

fn dispatcher() -> Dispatcher {
    Dispatcher::new(GlyphCache::new(FontsParams::default()))
}

#[test]
fn miss_constructs_and_inserts_once() {
    let mut disp = dispatcher();
    let mut font = CountingFont::new();
    let sel = CharSelector::new(GlyphName::Code(65), WritingMode::Horizontal);

    disp.plotchar(&mut font, Affine::IDENTITY, sel.clone()).unwrap();
    assert_eq!(font.construct_calls.get(), 1);
    assert_eq!(disp.cache().counters().chars, 1);
}

#[test]
fn hit_does_not_reconstruct() {
    let mut disp = dispatcher();
    let mut font = CountingFont::new();
    let sel = CharSelector::new(GlyphName::Code(65), WritingMode::Horizontal);

    disp.plotchar(&mut font, Affine::IDENTITY, sel.clone()).unwrap();
    disp.plotchar(&mut font, Affine::IDENTITY, sel).unwrap();
    assert_eq!(font.construct_calls.get(), 1, "second plotchar should hit the cache");
}

#[test]
fn undefined_glyph_falls_back_to_notdef() {
    let mut disp = dispatcher();
    let mut font = CountingFont::new();
    let sel = CharSelector::new(GlyphName::Code(999), WritingMode::Horizontal);

    let idx = disp.plotchar(&mut font, Affine::IDENTITY, sel).unwrap();
    let entry = disp.cache().get_char(idx);
    assert_eq!(entry.glyph.glyph, GlyphName::Code(0), "notdef substitution should be cached under the fallback key");
}

struct AlwaysUndefinedNoNotdef;

impl FontBackend for AlwaysUndefinedNoNotdef {
    fn identity(&self) -> FontIdentity {
        FontIdentity {
            font_id: 2,
            unique_id: 2,
            font_type: 1,
            paint_type: 0,
            stroke_width: 0.0,
            cdevproc: CdevProcKind::None,
            save_level: 0,
        }
    }
    fn kind(&self) -> FontKind {
        FontKind::Type1
    }
    fn construct(&mut self, _request: &GlyphRequest) -> Result<ConstructedGlyph> {
        Err(VellumError::Undefined("nothing here".into()))
    }
}

#[test]
fn undefined_with_no_notdef_reports_error() {
    let mut disp = dispatcher();
    let mut font = AlwaysUndefinedNoNotdef;
    let sel = CharSelector::new(GlyphName::Code(1), WritingMode::Horizontal);
    let result = disp.plotchar(&mut font, Affine::IDENTITY, sel);
    assert!(matches!(result, Err(VellumError::Undefined(_))));
}
