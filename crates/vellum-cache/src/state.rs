//! Glyph construction lifecycle (spec §4.1 "State machine: glyph
//! construction lifecycle"), and the cache-wide "construction in
//! progress" flag that replaces the source's global `no_purge` (spec §9
//! "Global cache root").

/// Per-glyph build state, owned by the in-flight construction session
/// returned from [`crate::cache::GlyphCache::begin_char`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    Unset,
    /// `stringwidth` or an explicit no-cache request: never write to the cache.
    Uncached,
    /// `setcachedevice` returned and a form was allocated.
    Cached,
    /// An alternate writing-mode cache hit was discovered mid-construction.
    Found,
    /// Caching aborted after partial construction.
    Error,
}

/// Cache-wide state: whether a glyph construction is currently in
/// progress. Purge, `clear`, and compression all consult this instead of
/// a global flag.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ConstructionState {
    #[default]
    Idle,
    Building,
}

impl ConstructionState {
    pub fn is_building(self) -> bool {
        matches!(self, ConstructionState::Building)
    }
}
