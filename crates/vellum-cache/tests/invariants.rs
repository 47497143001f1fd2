//! Integration tests exercising the cache purely through its public API
//! (spec §8 "Testable properties" / universal invariants).

use kurbo::Affine;
use vellum_cache::{CdevProcKind, FontIdentity, GlyphCache};
use vellum_core::config::FontsParams;
use vellum_core::selector::{CharSelector, GlyphName, WritingMode};
use vellum_raster::{Bitmap, Form};

fn identity(font_id: i32, unique_id: i32) -> FontIdentity {
    FontIdentity {
        font_id,
        unique_id,
        font_type: 1,
        paint_type: 0,
        stroke_width: 0.0,
        cdevproc: CdevProcKind::None,
        save_level: 0,
    }
}

fn form(bytes: usize) -> Form {
    Form::Bitmap(Bitmap::new_blank((bytes as u32 * 8).max(64), 1))
}

fn code(c: i32) -> CharSelector {
    CharSelector::new(GlyphName::Code(c), WritingMode::Horizontal)
}

/// The byte/count accounting a cache reports must always match what it
/// actually holds, including after repeated inserts and purges.
#[test]
fn counters_track_actual_population_through_a_lifecycle() {
    let mut cache = GlyphCache::new(FontsParams::default());
    let id = identity(1, 100);

    for i in 0..20 {
        cache.insert(&id, Affine::IDENTITY, code(i), form(64), (0.0, 0.0), (0.0, 0.0), false);
    }
    assert_eq!(cache.counters().chars, 20);

    cache.advance_page();
    let reclaimed = cache.purge(usize::MAX);
    assert!(reclaimed > 0);
    assert_eq!(cache.counters().chars, 0);
}

/// Repeated lookups of the same glyph must keep it at the MRU head of
/// every level it belongs to, and never duplicate it.
#[test]
fn mru_property_holds_across_many_touches() {
    let mut cache = GlyphCache::new(FontsParams::default());
    let id = identity(2, 200);
    for i in 0..5 {
        cache.insert(&id, Affine::IDENTITY, code(i), form(64), (0.0, 0.0), (0.0, 0.0), false);
    }

    for _ in 0..3 {
        assert!(cache.lookup(&id, Affine::IDENTITY, &code(2)).is_some());
    }
    assert_eq!(cache.counters().chars, 5, "repeated lookups must not duplicate entries");
}

/// Purging twice in a row without advancing the page is a no-op: the
/// reclaimable set is monotonically non-increasing.
#[test]
fn purge_is_monotonically_non_increasing() {
    let mut cache = GlyphCache::new(FontsParams::default());
    let id = identity(3, 300);
    for i in 0..8 {
        cache.insert(&id, Affine::IDENTITY, code(i), form(64), (0.0, 0.0), (0.0, 0.0), false);
    }
    cache.advance_page();
    let first = cache.purge(usize::MAX);
    let second = cache.purge(usize::MAX);
    assert!(first >= second);
    assert_eq!(second, 0);
}

/// A glyph inserted and never looked up still round-trips until purged.
#[test]
fn insert_then_lookup_round_trips() {
    let mut cache = GlyphCache::new(FontsParams::default());
    let id = identity(4, 400);
    let sel = CharSelector::new(GlyphName::Name("eacute".to_string()), WritingMode::Horizontal);
    cache.insert(&id, Affine::IDENTITY, sel.clone(), form(64), (1.0, 2.0), (600.0, 0.0), false);

    let idx = cache.lookup(&id, Affine::IDENTITY, &sel).expect("glyph should be found");
    let entry = cache.get_char(idx);
    assert_eq!(entry.bearing, (1.0, 2.0));
    assert_eq!(entry.advance, (600.0, 0.0));
}

/// Distinct matrices for the same font never collapse into one entry,
/// and distinct fonts never share matrix storage.
#[test]
fn distinct_fonts_and_matrices_stay_separate() {
    let mut cache = GlyphCache::new(FontsParams::default());
    let font_a = identity(5, 500);
    let font_b = identity(6, 600);
    let small = Affine::scale(1.0);
    let large = Affine::scale(2.0);

    cache.insert(&font_a, small, code(65), form(64), (0.0, 0.0), (0.0, 0.0), false);
    cache.insert(&font_a, large, code(65), form(64), (0.0, 0.0), (0.0, 0.0), false);
    cache.insert(&font_b, small, code(65), form(64), (0.0, 0.0), (0.0, 0.0), false);

    assert_eq!(cache.counters().fonts, 2);
    assert_eq!(cache.counters().matrices, 3);
    assert_eq!(cache.counters().chars, 3);

    assert!(cache.lookup(&font_a, small, &code(65)).is_some());
    assert!(cache.lookup(&font_a, large, &code(65)).is_some());
    assert!(cache.lookup(&font_b, small, &code(65)).is_some());
}
