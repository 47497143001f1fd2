//! The three-level glyph cache: font -> matrix -> character (spec §4.1).

use crate::arena::{mru_touch, Index, Slab};
use crate::compress;
use crate::entries::{CdevProcKind, CharEntry, FontEntry, MatrixEntry};
use crate::lowmem::LowMemoryHandler;
use crate::state::{BuildState, ConstructionState};
use kurbo::Affine;
use vellum_core::alloc::{AllocClass, AllocTracker};
use vellum_core::config::FontsParams;
use vellum_core::geom::{matrix_eq, matrix_eq_ignoring_translation};
use vellum_core::selector::{CharSelector, GlyphName};
use vellum_raster::Form;

/// FontType value PostScript assigns to Type 32 (direct bitmap) fonts;
/// matrix lookups for this type ignore translation (spec §4.1 step 3).
pub const FONT_TYPE_32: u8 = 32;

#[derive(Clone, Debug)]
pub struct FontIdentity {
    pub font_id: i32,
    pub unique_id: i32,
    pub font_type: u8,
    pub paint_type: u8,
    pub stroke_width: f32,
    pub cdevproc: CdevProcKind,
    pub save_level: i32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CacheCounters {
    pub total_bytes: usize,
    pub fonts: usize,
    pub matrices: usize,
    pub chars: usize,
}

/// Handle to an in-flight glyph construction (spec §4.1 "State machine:
/// glyph construction lifecycle"). Holds the info `free_char` needs to
/// unlink a partially built entry without scanning the whole cache.
pub struct CharBuilder {
    pub state: BuildState,
    pending: Option<Index>,
}

pub struct GlyphCache {
    fonts: Slab<FontEntry>,
    matrices: Slab<MatrixEntry>,
    chars: Slab<CharEntry>,
    font_order: Vec<Index>,
    params: FontsParams,
    tracker: AllocTracker,
    state: ConstructionState,
    current_page: u64,
    last_purge_page: u64,
    compression_exhausted: bool,
}

impl Default for GlyphCache {
    fn default() -> Self {
        GlyphCache::new(FontsParams::default())
    }
}

impl GlyphCache {
    pub fn new(params: FontsParams) -> Self {
        GlyphCache {
            fonts: Slab::new(),
            matrices: Slab::new(),
            chars: Slab::new(),
            font_order: Vec::new(),
            params,
            tracker: AllocTracker::new(),
            state: ConstructionState::Idle,
            current_page: 0,
            last_purge_page: 0,
            compression_exhausted: false,
        }
    }

    pub fn advance_page(&mut self) {
        self.current_page += 1;
        self.compression_exhausted = false;
    }

    pub fn current_page(&self) -> u64 {
        self.current_page
    }

    pub fn counters(&self) -> CacheCounters {
        CacheCounters {
            total_bytes: self.tracker.bytes(AllocClass::Form),
            fonts: self.fonts.len(),
            matrices: self.matrices.len(),
            chars: self.chars.len(),
        }
    }

    pub fn get_char(&self, idx: Index) -> &CharEntry {
        self.chars.get(idx)
    }

    pub fn is_compressing(&self) -> bool {
        self.compression_exhausted
    }

    // ---- lookup (spec §4.1 "Lookup") ----

    pub fn lookup(
        &mut self,
        identity: &FontIdentity,
        matrix: Affine,
        selector: &CharSelector,
    ) -> Option<Index> {
        let mut font_idx = self.font_order.iter().copied().find(|&i| self.fonts.get(i).font_id == identity.font_id);

        if font_idx.is_none() {
            font_idx = self.font_order.iter().copied().find(|&i| {
                let f = self.fonts.get(i);
                f.save_level >= 0
                    && f.unique_id == identity.unique_id
                    && f.font_type == identity.font_type
                    && f.paint_type == identity.paint_type
                    && f.stroke_width == identity.stroke_width
                    && f.cdevproc == identity.cdevproc
            });
        }
        let font_idx = font_idx?;
        mru_touch(&mut self.font_order, font_idx);

        let is_type32 = identity.font_type == FONT_TYPE_32;
        let matrices_list = self.fonts.get(font_idx).matrices.clone();
        let matrix_idx = matrices_list.iter().copied().find(|&mi| {
            let candidate = self.matrices.get(mi).matrix;
            if is_type32 {
                matrix_eq_ignoring_translation(candidate, matrix)
            } else {
                matrix_eq(candidate, matrix)
            }
        })?;
        mru_touch(&mut self.fonts.get_mut(font_idx).matrices, matrix_idx);

        let bucket_idx = selector.bucket();
        let bucket = self.matrices.get(matrix_idx).buckets[bucket_idx].clone();
        let found = bucket.iter().copied().find(|&ci| {
            let c = self.chars.get(ci);
            c.glyph.glyph == selector.glyph && (c.both_wmodes || c.glyph.wmode == selector.wmode)
        })?;
        mru_touch(&mut self.matrices.get_mut(matrix_idx).buckets[bucket_idx], found);
        self.chars.get_mut(found).touch(self.current_page);
        Some(found)
    }

    fn find_or_create_font(&mut self, identity: &FontIdentity) -> Index {
        if let Some(idx) = self
            .font_order
            .iter()
            .copied()
            .find(|&i| self.fonts.get(i).font_id == identity.font_id && self.fonts.get(i).unique_id == identity.unique_id)
        {
            return idx;
        }
        let entry = FontEntry {
            font_id: identity.font_id,
            unique_id: identity.unique_id,
            font_type: identity.font_type,
            paint_type: identity.paint_type,
            stroke_width: identity.stroke_width,
            cdevproc: identity.cdevproc,
            save_level: identity.save_level,
            matrices: Vec::new(),
        };
        let idx = self.fonts.insert(entry);
        self.font_order.insert(0, idx);
        idx
    }

    fn find_or_create_matrix(&mut self, font_idx: Index, matrix: Affine, is_type32: bool) -> Index {
        let matrices_list = self.fonts.get(font_idx).matrices.clone();
        if let Some(idx) = matrices_list.iter().copied().find(|&mi| {
            let candidate = self.matrices.get(mi).matrix;
            if is_type32 {
                matrix_eq_ignoring_translation(candidate, matrix)
            } else {
                matrix_eq(candidate, matrix)
            }
        }) {
            return idx;
        }
        let idx = self.matrices.insert(MatrixEntry::new(matrix));
        self.fonts.get_mut(font_idx).matrices.insert(0, idx);
        idx
    }

    // ---- insert (spec §4.1 "Insertion") ----

    #[allow(clippy::too_many_arguments)]
    pub fn insert(
        &mut self,
        identity: &FontIdentity,
        matrix: Affine,
        selector: CharSelector,
        form: Form,
        bearing: (f64, f64),
        advance: (f64, f64),
        is_master: bool,
    ) -> Index {
        let is_type32 = identity.font_type == FONT_TYPE_32;
        let font_idx = self.find_or_create_font(identity);
        let matrix_idx = self.find_or_create_matrix(font_idx, matrix, is_type32);

        let bytes = form.total_bytes();
        let bucket = selector.bucket();
        let entry = CharEntry {
            glyph: selector,
            form,
            bearing,
            advance,
            is_master,
            both_wmodes: false,
            pageno: self.current_page,
            baseno: self.current_page,
            use_count: 0,
        };
        let char_idx = self.chars.insert(entry);
        self.matrices.get_mut(matrix_idx).buckets[bucket].insert(0, char_idx);
        self.tracker.charge(AllocClass::Form, bytes);
        char_idx
    }

    // ---- construction lifecycle (spec §4.1 "State machine") ----

    pub fn begin_char(&mut self) -> CharBuilder {
        self.state = ConstructionState::Building;
        CharBuilder { state: BuildState::Unset, pending: None }
    }

    /// Record that `char_idx` was just inserted as part of the current
    /// construction, so `free_char` can unlink it on error without a scan.
    pub fn note_pending(&self, builder: &mut CharBuilder, char_idx: Index) {
        builder.pending = Some(char_idx);
        let _ = self;
    }

    pub fn end_char(&mut self, mut builder: CharBuilder) {
        builder.state = BuildState::Cached;
        self.state = ConstructionState::Idle;
    }

    /// Abort a construction, releasing any partially built entry (spec
    /// §4.1: "An error during construction triggers free_char, which
    /// unlinks the (guaranteed bucket-head) entry and releases both form
    /// and CharEntry").
    pub fn free_char(&mut self, mut builder: CharBuilder) {
        if let Some(idx) = builder.pending.take() {
            self.remove_char_entry(idx);
        }
        builder.state = BuildState::Error;
        self.state = ConstructionState::Idle;
    }

    fn remove_char_entry(&mut self, idx: Index) -> usize {
        for (_, matrix) in self.matrices.iter_mut() {
            for bucket in matrix.buckets.iter_mut() {
                if let Some(pos) = bucket.iter().position(|&c| c == idx) {
                    bucket.remove(pos);
                }
            }
        }
        let entry = self.chars.remove(idx);
        let bytes = entry.bytes();
        self.tracker.release(AllocClass::Form, bytes);
        bytes
    }

    // ---- purge (spec §4.1 "Purge algorithm", "purge_useless", "check_limits") ----

    fn sweep_page(&mut self, threshold_page: u64) -> usize {
        let mut reclaimed = 0usize;
        let font_list = self.font_order.clone();
        for &fi in &font_list {
            let matrix_list = self.fonts.get(fi).matrices.clone();
            for &mi in &matrix_list {
                for b in 0..vellum_core::NUM_CHAR_BUCKETS {
                    let bucket = self.matrices.get(mi).buckets[b].clone();
                    for &ci in &bucket {
                        let c = self.chars.get(ci);
                        if c.is_master || c.pageno > threshold_page {
                            continue;
                        }
                        reclaimed += self.remove_char_entry(ci);
                    }
                }
            }
            self.free_empty_matrices(fi);
            self.free_if_orphaned(fi);
        }
        reclaimed
    }

    fn free_empty_matrices(&mut self, font_idx: Index) {
        let matrix_list = self.fonts.get(font_idx).matrices.clone();
        for &mi in &matrix_list {
            if self.matrices.get(mi).is_empty() {
                if let Some(pos) = self.fonts.get_mut(font_idx).matrices.iter().position(|&x| x == mi) {
                    self.fonts.get_mut(font_idx).matrices.remove(pos);
                }
                self.matrices.remove(mi);
            }
        }
    }

    fn free_if_orphaned(&mut self, font_idx: Index) {
        if self.fonts.get(font_idx).matrices.is_empty() && self.fonts.get(font_idx).is_purgeable() {
            if let Some(pos) = self.font_order.iter().position(|&x| x == font_idx) {
                self.font_order.remove(pos);
            }
            self.fonts.remove(font_idx);
        }
    }

    /// Run the purge loop until `target_bytes` has been reclaimed or no
    /// further page boundary can be advanced (spec §4.1 "Purge algorithm").
    pub fn purge(&mut self, target_bytes: usize) -> usize {
        if self.state.is_building() {
            log::debug!("purge skipped: construction in progress");
            return 0;
        }
        let mut reclaimed = 0usize;
        loop {
            if self.last_purge_page >= self.current_page {
                break;
            }
            self.last_purge_page += 1;
            let this_pass = self.sweep_page(self.last_purge_page);
            reclaimed += this_pass;
            if reclaimed >= target_bytes {
                return reclaimed;
            }
            if this_pass == 0 {
                self.compression_exhausted = true;
                log::warn!("purge pass reclaimed nothing; enabling on-the-fly compression");
                break;
            }
        }
        reclaimed
    }

    pub fn check_limits(&mut self) {
        if self.state.is_building() {
            return;
        }
        let counters = self.counters();
        let over_bytes = counters.total_bytes.saturating_sub(self.params.max_font_cache);
        let over_chars = counters.chars > self.params.max_cache_chars;
        let over_matrices = counters.matrices > self.params.max_cache_matrix;
        if over_bytes > 0 || over_chars || over_matrices {
            self.purge(over_bytes.max(1));
        }
    }

    /// Remove entries whose save-level is negative and whose unique-id is
    /// temporary or CDevProc custom; also sweep characters unused since
    /// before `current_page` (spec §4.1 "purge_useless").
    pub fn purge_useless(&mut self, current_page: u64) {
        let font_list = self.font_order.clone();
        for &fi in &font_list {
            let f = self.fonts.get(fi);
            if f.is_purgeable() && (f.has_temp_uid() || f.cdevproc == CdevProcKind::Custom) {
                let matrix_list = self.fonts.get(fi).matrices.clone();
                for &mi in &matrix_list {
                    for b in 0..vellum_core::NUM_CHAR_BUCKETS {
                        let bucket = self.matrices.get(mi).buckets[b].clone();
                        for &ci in &bucket {
                            if !self.chars.get(ci).is_master {
                                self.remove_char_entry(ci);
                            }
                        }
                    }
                }
                self.free_empty_matrices(fi);
                self.free_if_orphaned(fi);
            }
        }
        self.sweep_page(current_page.saturating_sub(1));
    }

    /// Bytes reclaimable by a full purge right now: every non-master form.
    pub fn available_memory(&self) -> usize {
        self.chars.iter().filter(|(_, c)| !c.is_master).map(|(_, c)| c.bytes()).sum()
    }

    /// `clear`: purge unconditionally. Hard error if construction is in
    /// progress (spec §4.1).
    pub fn clear(&mut self) -> Result<(), &'static str> {
        if self.state.is_building() {
            return Err("cache clear attempted while a glyph construction is in progress");
        }
        let font_list = self.font_order.clone();
        for &fi in &font_list {
            let matrix_list = self.fonts.get(fi).matrices.clone();
            for &mi in &matrix_list {
                for b in 0..vellum_core::NUM_CHAR_BUCKETS {
                    let bucket = self.matrices.get(mi).buckets[b].clone();
                    for &ci in &bucket {
                        self.remove_char_entry(ci);
                    }
                }
                self.matrices.remove(mi);
            }
            self.fonts.remove(fi);
        }
        self.font_order.clear();
        Ok(())
    }

    /// Range deletion for Type 32 glyph removal (spec §4.1 "remove_chars").
    pub fn remove_chars(&mut self, font_id: i32, first_cid: u32, last_cid: u32) {
        let font_list = self.font_order.clone();
        for &fi in &font_list {
            if self.fonts.get(fi).font_id != font_id {
                continue;
            }
            let matrix_list = self.fonts.get(fi).matrices.clone();
            for &mi in &matrix_list {
                for b in 0..vellum_core::NUM_CHAR_BUCKETS {
                    let bucket = self.matrices.get(mi).buckets[b].clone();
                    for &ci in &bucket {
                        if let GlyphName::Cid(cid) = self.chars.get(ci).glyph.glyph {
                            if cid >= first_cid && cid <= last_cid {
                                self.remove_char_entry(ci);
                            }
                        }
                    }
                }
            }
            self.free_empty_matrices(fi);
            self.free_if_orphaned(fi);
        }
    }

    /// Invalidate name-keyed CharEntries belonging to fonts whose
    /// save-level exceeds `save_level` — they would not survive a restore
    /// to that level (spec §4.1 "restore_names").
    pub fn restore_names(&mut self, save_level: i32) {
        let font_list = self.font_order.clone();
        for &fi in &font_list {
            if self.fonts.get(fi).save_level <= save_level {
                continue;
            }
            let matrix_list = self.fonts.get(fi).matrices.clone();
            for &mi in &matrix_list {
                for b in 0..vellum_core::NUM_CHAR_BUCKETS {
                    let bucket = self.matrices.get(mi).buckets[b].clone();
                    for &ci in &bucket {
                        if matches!(self.chars.get(ci).glyph.glyph, GlyphName::Name(_)) {
                            self.chars.get_mut(ci).glyph.glyph = GlyphName::sentinel();
                        }
                    }
                }
            }
        }
    }

    /// Demote every FontEntry whose save-level exceeds `threshold` to -1
    /// (spec §3 "Save-level linkage": "the restore operation").
    pub fn restore(&mut self, threshold: i32) {
        for &fi in &self.font_order {
            let f = self.fonts.get_mut(fi);
            if f.save_level > threshold {
                f.save_level = -1;
            }
        }
    }

    /// Relocate a glyph so it can no longer be found by lookup, without
    /// synchronously freeing it (spec §4.1 "make_useless details").
    pub fn make_useless(&mut self, unique_id: i32, name: &str) {
        let sacrifice_idx = self
            .font_order
            .iter()
            .copied()
            .find(|&i| self.fonts.get(i).has_temp_uid())
            .unwrap_or_else(|| {
                let idx = self.fonts.insert(FontEntry::sacrificial(-1));
                self.font_order.insert(0, idx);
                idx
            });

        let glyph = GlyphName::Name(name.to_string());
        let hash_bucket = (glyph.hash_code() & 31) as usize;

        let font_list = self.font_order.clone();
        for &fi in &font_list {
            if fi == sacrifice_idx || self.fonts.get(fi).unique_id != unique_id {
                continue;
            }
            let matrix_list = self.fonts.get(fi).matrices.clone();
            for &mi in &matrix_list {
                let bucket = self.matrices.get_mut(mi).buckets[hash_bucket].clone();
                for &ci in &bucket {
                    if self.chars.get(ci).glyph.glyph != glyph {
                        continue;
                    }
                    if let Some(pos) = self.matrices.get_mut(mi).buckets[hash_bucket].iter().position(|&c| c == ci) {
                        self.matrices.get_mut(mi).buckets[hash_bucket].remove(pos);
                    }
                    self.chars.get_mut(ci).glyph.glyph = GlyphName::sentinel();

                    let sac_matrix = self.find_or_create_matrix(sacrifice_idx, self.matrices.get(mi).matrix, false);
                    self.matrices.get_mut(sac_matrix).buckets[hash_bucket].insert(0, ci);
                }
            }
        }
    }

    /// Try compressing one CharEntry's bitmap form in place (spec §4.1
    /// "Bitmap-to-RLE compression").
    pub fn try_compress(&mut self, idx: Index) -> bool {
        let (use_count, bitmap) = {
            let c = self.chars.get(idx);
            match &c.form {
                Form::Bitmap(b) => (c.use_count, b.clone()),
                _ => return false,
            }
        };
        if let Some(rle) = compress::compress_if_worthwhile(&bitmap, use_count, &self.params) {
            let before = bitmap.total_bytes();
            let after_form = Form::Rle(rle);
            let after = after_form.total_bytes();
            self.chars.get_mut(idx).form = after_form;
            self.tracker.release(AllocClass::Form, before);
            self.tracker.charge(AllocClass::Form, after);
            true
        } else {
            false
        }
    }
}

impl LowMemoryHandler for GlyphCache {
    fn solicit(&self) -> Option<usize> {
        if self.state.is_building() || self.fonts.is_empty() || self.compression_exhausted {
            return None;
        }
        Some(self.available_memory())
    }

    fn release(&mut self, target: usize) -> usize {
        self.purge(target)
    }
}
