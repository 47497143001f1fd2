//! Process-wide caching toggle and the font-cache configuration table.
//!
//! The enable/disable flag mirrors the pattern used for the `VELLUM_CACHE`
//! environment override: an `AtomicBool` seeded once from the environment,
//! with a scoped guard for deterministic tests that need to force caching
//! on or off without leaking the override to other tests in the process.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, OnceLock};

static CACHING_ENABLED: AtomicBool = AtomicBool::new(true);
static ENV_CHECKED: OnceLock<()> = OnceLock::new();
static SET_LOCK: Mutex<()> = Mutex::new(());

fn ensure_env_checked() {
    ENV_CHECKED.get_or_init(|| {
        if let Ok(val) = std::env::var("VELLUM_CACHE") {
            let enabled = !matches!(val.as_str(), "0" | "false" | "off");
            CACHING_ENABLED.store(enabled, Ordering::SeqCst);
            log::debug!("VELLUM_CACHE={val} -> caching_enabled={enabled}");
        }
    });
}

/// Whether glyph caching is currently enabled for this process.
pub fn is_caching_enabled() -> bool {
    ensure_env_checked();
    CACHING_ENABLED.load(Ordering::SeqCst)
}

/// Override the caching flag. Prefer [`scoped_caching_enabled`] in tests so
/// the override doesn't leak past the calling scope.
pub fn set_caching_enabled(enabled: bool) {
    ensure_env_checked();
    let _guard = SET_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    CACHING_ENABLED.store(enabled, Ordering::SeqCst);
}

/// RAII guard that overrides the caching flag for its lifetime and restores
/// the previous value on drop.
pub struct ScopedCachingEnabled {
    previous: bool,
}

impl Drop for ScopedCachingEnabled {
    fn drop(&mut self) {
        CACHING_ENABLED.store(self.previous, Ordering::SeqCst);
    }
}

/// Force the caching flag to `enabled` until the returned guard is dropped.
pub fn scoped_caching_enabled(enabled: bool) -> ScopedCachingEnabled {
    ensure_env_checked();
    let previous = CACHING_ENABLED.swap(enabled, Ordering::SeqCst);
    ScopedCachingEnabled { previous }
}

/// `TrueTypeHints` configuration enum (spec §6).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TrueTypeHints {
    None,
    #[default]
    CheckFaults,
    SafeFaults,
    SilentFaults,
}

/// Glyph fill rule (spec §6 `fontfillrule`).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    Winding,
    EvenOdd,
}

/// The full configuration surface of the glyph cache and hint engine
/// (spec §6's "Configuration parameters" table). Defaults follow the
/// Harlequin RIP source's compiled-in limits (`fontcache.h`:
/// `BLIMIT`/`CLIMIT`/`MLIMIT`).
#[derive(Clone, Debug)]
pub struct FontsParams {
    /// Purge threshold on total form bytes.
    pub max_font_cache: usize,
    /// Purge threshold on glyph count.
    pub max_cache_chars: usize,
    /// Purge threshold on matrix count.
    pub max_cache_matrix: usize,
    /// Reject caching of an individual glyph whose form would exceed this.
    pub max_font_item: usize,
    /// Below this form size, never compress.
    pub min_font_compress: usize,
    /// Enable/disable Type 1 hinting.
    pub hinted_fonts: bool,
    pub truetype_hints: TrueTypeHints,
    pub fontfillrule: FillRule,
    /// Suppress custom CDevProc remapping.
    pub force_null_mapping: bool,
    /// Per-use-count compression ratio threshold array: index 0 is the
    /// first-use (aggressive) threshold, later entries are progressively
    /// more conservative.
    pub force_font_compress: Vec<f32>,
    /// Width adjustment bias for stem snapping; `None` disables the bias.
    pub type1_stem_snap: Option<i32>,
    /// Device-pixel limit for the high-precision rendering path.
    pub accurate_render_threshold: u32,
    /// Device-pixel limit for two-pass X/Y swap rendering.
    pub accurate_two_pass_threshold: u32,
}

impl Default for FontsParams {
    fn default() -> Self {
        FontsParams {
            max_font_cache: 750_000,
            max_cache_chars: 7_500,
            max_cache_matrix: 750,
            max_font_item: 64 * 1024,
            min_font_compress: 128,
            hinted_fonts: true,
            truetype_hints: TrueTypeHints::default(),
            fontfillrule: FillRule::default(),
            force_null_mapping: false,
            force_font_compress: vec![0.5, 0.7, 0.85],
            type1_stem_snap: None,
            accurate_render_threshold: 1024,
            accurate_two_pass_threshold: 4096,
        }
    }
}
