//! Character selectors and cache keys (spec §3, §4.1, glossary "Character selector").

use std::hash::{Hash, Hasher};

/// The glyph identity half of a cache key: a name, a CID, or a raw code.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GlyphName {
    Code(i32),
    Name(String),
    Cid(u32),
}

impl GlyphName {
    /// An integer derived from the glyph identity, used for the cache's
    /// 32-bucket hash (spec §4.1: "glyph-integer-code mod 32" — the source
    /// literally masks with `& 31`, see `fontcache.c`).
    pub fn hash_code(&self) -> i32 {
        match self {
            GlyphName::Code(c) => *c,
            GlyphName::Cid(c) => *c as i32,
            GlyphName::Name(name) => {
                let mut hasher = std::collections::hash_map::DefaultHasher::new();
                name.hash(&mut hasher);
                hasher.finish() as i32
            }
        }
    }

    /// A key value that can never legitimately match a real glyph lookup,
    /// used by `make_useless` to overwrite a relocated entry's key
    /// (spec §4.1 "make_useless details").
    pub fn sentinel() -> Self {
        GlyphName::Code(i32::MIN)
    }
}

/// 0 for horizontal text, 1 for vertical (glossary "Writing mode").
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum WritingMode {
    #[default]
    Horizontal,
    Vertical,
}

/// The identity tuple used to look up a glyph.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CharSelector {
    pub glyph: GlyphName,
    pub wmode: WritingMode,
}

impl CharSelector {
    pub fn new(glyph: GlyphName, wmode: WritingMode) -> Self {
        CharSelector { glyph, wmode }
    }

    /// The hash bucket index within a MatrixEntry's 32 buckets.
    pub fn bucket(&self) -> usize {
        (self.glyph.hash_code() & 31) as usize
    }
}

pub const NUM_CHAR_BUCKETS: usize = 32;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_is_masked_to_32() {
        let sel = CharSelector::new(GlyphName::Code(0x41), WritingMode::Horizontal);
        assert_eq!(sel.bucket(), 0x41 & 31);
    }

    #[test]
    fn sentinel_never_equals_a_real_code() {
        let sentinel = CharSelector::new(GlyphName::sentinel(), WritingMode::Horizontal);
        let real = CharSelector::new(GlyphName::Code(65), WritingMode::Horizontal);
        assert_ne!(sentinel, real);
    }
}
