//! The three-level MRU glyph cache (spec §3, §4.1): arena-backed
//! font/matrix/character entries, MRU relinking, purge, low-memory
//! cooperation, and bitmap-to-RLE compression.

pub mod arena;
pub mod cache;
pub mod compress;
pub mod entries;
pub mod lowmem;
pub mod shared;
pub mod state;

pub use arena::Index;
pub use cache::{CacheCounters, CharBuilder, FontIdentity, GlyphCache, FONT_TYPE_32};
pub use entries::{CdevProcKind, CharEntry, FontEntry, MatrixEntry};
pub use lowmem::LowMemoryHandler;
pub use shared::SharedGlyphCache;
pub use state::{BuildState, ConstructionState};
