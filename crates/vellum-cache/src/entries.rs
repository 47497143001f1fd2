//! The three cache levels (spec §3 "Core entities"): FontEntry owns
//! MatrixEntries, each MatrixEntry owns 32 hash buckets of CharEntries.

use crate::arena::Index;
use kurbo::Affine;
use vellum_core::selector::{CharSelector, NUM_CHAR_BUCKETS};
use vellum_raster::Form;

/// Classification of a font's `CDevProc` hook (spec §3 "Supplemented
/// features": a three-way tag, not a boolean).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum CdevProcKind {
    None,
    Std,
    Custom,
}

/// The "temporary" unique-id range `make_useless` uses to mark a
/// sacrificial font as ephemeral (spec §4.1 "make_useless details").
pub const UID_RANGE_TEMP: i32 = i32::MAX - 0x00FF_FFFF;

#[derive(Clone, Debug)]
pub struct FontEntry {
    pub font_id: i32,
    pub unique_id: i32,
    pub font_type: u8,
    pub paint_type: u8,
    pub stroke_width: f32,
    pub cdevproc: CdevProcKind,
    /// Negative marks the entry purgeable (spec §3 "Save-level linkage").
    pub save_level: i32,
    /// MRU-ordered list of this font's matrix entries, head = most recent.
    pub matrices: Vec<Index>,
}

impl FontEntry {
    pub fn has_temp_uid(&self) -> bool {
        self.unique_id >= UID_RANGE_TEMP
    }

    pub fn is_purgeable(&self) -> bool {
        self.save_level < 0
    }

    /// A fresh sacrificial font entry for `make_useless` relocations.
    pub fn sacrificial(font_id: i32) -> Self {
        FontEntry {
            font_id,
            unique_id: UID_RANGE_TEMP,
            font_type: 0,
            paint_type: 0,
            stroke_width: 0.0,
            cdevproc: CdevProcKind::None,
            save_level: -1,
            matrices: Vec::new(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct MatrixEntry {
    pub matrix: Affine,
    pub buckets: [Vec<Index>; NUM_CHAR_BUCKETS],
}

impl MatrixEntry {
    pub fn new(matrix: Affine) -> Self {
        MatrixEntry { matrix, buckets: std::array::from_fn(|_| Vec::new()) }
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    pub fn char_count(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }
}

#[derive(Clone, Debug)]
pub struct CharEntry {
    pub glyph: CharSelector,
    pub form: Form,
    pub bearing: (f64, f64),
    pub advance: (f64, f64),
    /// Type-32 bitmap glyphs installed at the identity matrix; never
    /// evicted by ordinary purge (spec §3 "Type-32 masters").
    pub is_master: bool,
    /// When set, this single CharEntry serves both writing modes.
    pub both_wmodes: bool,
    /// Most recent page on which this glyph was used.
    pub pageno: u64,
    /// Page on which the current form first appeared; `baseno <= pageno`.
    pub baseno: u64,
    /// How many times this form has been referenced; drives the
    /// compression ratio threshold bucket (spec §4.1).
    pub use_count: u32,
}

impl CharEntry {
    pub fn touch(&mut self, page: u64) {
        self.pageno = page;
        self.use_count = self.use_count.saturating_add(1);
    }

    pub fn bytes(&self) -> usize {
        self.form.total_bytes()
    }
}
