//! Font-wide hinting parameters consumed once per character (spec §4.2
//! "Public contract"). Defaults follow the Harlequin RIP source's compiled
//! constants (`DEFAULTBLUESCALE`, `DEFAULTBLUESHIFT`, `DEFAULTBLUEFUZZ`,
//! `DEFAULTEXPANSIONFACTOR`) rather than invented round numbers.

use vellum_core::traits::{FontInfoKey, FontParams, ParamValue};

pub const DEFAULT_BLUE_SCALE: f64 = 0.039625;
pub const DEFAULT_BLUE_SHIFT: f64 = 7.0;
pub const DEFAULT_BLUE_FUZZ: f64 = 1.0;
pub const DEFAULT_EXPANSION_FACTOR: f64 = 0.06;
pub const DEFAULT_LANGUAGE_GROUP: i32 = 0;
pub const DEFAULT_FORCE_BOLD: bool = false;

/// Extra fuzz applied only to alignment-zone edge capture, over and above
/// the font's own `BlueFuzz` (spec §3 "Supplemented features": `EXTRABLUEFUZZ`).
pub const EXTRA_BLUE_FUZZ: f64 = 4.0;

/// The stem-array capacity the source keeps inline before spilling to a
/// heap allocation (spec §3 "Stem list structure": `FIXED_STEMS`).
pub const FIXED_STEMS: usize = 32;

#[derive(Clone, Debug)]
pub struct HintParams {
    pub blue_values: Vec<f64>,
    pub other_blues: Vec<f64>,
    pub family_blues: Vec<f64>,
    pub family_other_blues: Vec<f64>,
    pub blue_scale: f64,
    pub blue_shift: f64,
    pub blue_fuzz: f64,
    pub std_hw: Option<f64>,
    pub std_vw: Option<f64>,
    pub stem_snap_h: Vec<f64>,
    pub stem_snap_v: Vec<f64>,
    pub force_bold: bool,
    pub language_group: i32,
    pub expansion_factor: f64,
}

impl Default for HintParams {
    fn default() -> Self {
        HintParams {
            blue_values: Vec::new(),
            other_blues: Vec::new(),
            family_blues: Vec::new(),
            family_other_blues: Vec::new(),
            blue_scale: DEFAULT_BLUE_SCALE,
            blue_shift: DEFAULT_BLUE_SHIFT,
            blue_fuzz: DEFAULT_BLUE_FUZZ,
            std_hw: None,
            std_vw: None,
            stem_snap_h: Vec::new(),
            stem_snap_v: Vec::new(),
            force_bold: DEFAULT_FORCE_BOLD,
            language_group: DEFAULT_LANGUAGE_GROUP,
            expansion_factor: DEFAULT_EXPANSION_FACTOR,
        }
    }
}

impl HintParams {
    /// Read the full parameter set from a font's getter callback, falling
    /// back to documented defaults for anything absent or malformed (spec
    /// §4.2 "Failure semantics").
    pub fn from_font_params(font: &dyn FontParams) -> Self {
        let array = |key: FontInfoKey| -> Vec<f64> {
            match font.get_info(key, 0) {
                ParamValue::Array(values) => values,
                ParamValue::ArrayLen(n) => {
                    (0..n).filter_map(|i| font.get_info(key, i).as_real()).collect()
                }
                _ => Vec::new(),
            }
        };
        let real = |key: FontInfoKey, default: f64| font.get_info(key, 0).as_real().unwrap_or(default);
        let optional_real = |key: FontInfoKey| font.get_info(key, 0).as_real();
        let boolean = |key: FontInfoKey, default: bool| font.get_info(key, 0).as_bool().unwrap_or(default);
        let integer = |key: FontInfoKey, default: i32| font.get_info(key, 0).as_int().unwrap_or(default);

        HintParams {
            blue_values: array(FontInfoKey::BlueValues),
            other_blues: array(FontInfoKey::OtherBlues),
            family_blues: array(FontInfoKey::FamilyBlues),
            family_other_blues: array(FontInfoKey::FamilyOtherBlues),
            blue_scale: real(FontInfoKey::BlueScale, DEFAULT_BLUE_SCALE),
            blue_shift: real(FontInfoKey::BlueShift, DEFAULT_BLUE_SHIFT),
            blue_fuzz: real(FontInfoKey::BlueFuzz, DEFAULT_BLUE_FUZZ),
            std_hw: optional_real(FontInfoKey::StdHW),
            std_vw: optional_real(FontInfoKey::StdVW),
            stem_snap_h: array(FontInfoKey::StemSnapH),
            stem_snap_v: array(FontInfoKey::StemSnapV),
            force_bold: boolean(FontInfoKey::ForceBold, DEFAULT_FORCE_BOLD),
            language_group: integer(FontInfoKey::LanguageGroup, DEFAULT_LANGUAGE_GROUP),
            expansion_factor: real(FontInfoKey::ExpansionFactor, DEFAULT_EXPANSION_FACTOR),
        }
    }
}
