//! Demo CLI: drives the dispatcher over a synthetic workload and reports
//! cache metrics. No real font file I/O (spec §1 Non-goals: font parsing
//! is assumed available upstream, not implemented here).

use clap::Parser;
use kurbo::Affine;
use vellum_cache::{CdevProcKind, FontIdentity, GlyphCache};
use vellum_cli::{ConstructedGlyph, Dispatcher, FontBackend, GlyphRequest};
use vellum_core::config::FontsParams;
use vellum_core::error::{Result, VellumError};
use vellum_core::selector::{CharSelector, GlyphName, WritingMode};
use vellum_core::traits::FontKind;
use vellum_raster::{Bitmap, Form};

#[derive(Parser, Debug)]
#[command(name = "vellum", version, about = "Glyph cache and rasterizer core demo")]
struct Cli {
    /// Number of distinct synthetic glyph codes to exercise.
    #[arg(short, long, default_value_t = 64)]
    glyphs: u32,

    /// Number of repeated plotchar passes over those codes, to demonstrate MRU hits.
    #[arg(short, long, default_value_t = 3)]
    passes: u32,
}

/// A font backend that fabricates a solid block glyph for any requested
/// code — stands in for a real charstring/TrueType interpreter, which is
/// out of scope here.
struct SyntheticFont {
    unique_id: i32,
}

impl FontBackend for SyntheticFont {
    fn identity(&self) -> FontIdentity {
        FontIdentity {
            font_id: 1,
            unique_id: self.unique_id,
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

    fn construct(&mut self, request: &GlyphRequest) -> Result<ConstructedGlyph> {
        let code = match request.selector.glyph {
            GlyphName::Code(c) => c,
            _ => return Err(VellumError::Undefined("synthetic font only serves coded glyphs".into())),
        };
        let side = 16 + (code % 8) as u32 * 4;
        Ok(ConstructedGlyph {
            form: Form::Bitmap(Bitmap::new_blank(side, side)),
            bearing: (0.0, 0.0),
            advance: (side as f64, 0.0),
            is_master: false,
        })
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let mut dispatcher = Dispatcher::new(GlyphCache::new(FontsParams::default()));
    let mut font = SyntheticFont { unique_id: 42 };

    for pass in 0..cli.passes {
        for code in 0..cli.glyphs as i32 {
            let selector = CharSelector::new(GlyphName::Code(code), WritingMode::Horizontal);
            match dispatcher.plotchar(&mut font, Affine::IDENTITY, selector) {
                Ok(_) => {}
                Err(e) => log::warn!("pass {pass} code {code}: {e}"),
            }
        }
    }

    let counters = dispatcher.cache().counters();
    println!("fonts={} matrices={} chars={} bytes={}", counters.fonts, counters.matrices, counters.chars, counters.total_bytes);
}
