//! Bit-level raster compositing primitives: span/block/char blits,
//! clipping, the spanlist (RLE) representation, and halftone cell
//! consumption (spec §4.3).

pub mod blit;
pub mod clip;
pub mod context;
pub mod form;
pub mod halftone;
pub mod span;
pub mod word;

pub use clip::{Clip, ClipMode, ClipRect};
pub use context::{BlitContext, Color};
pub use form::{BitDepth, Bitmap, Form, RleForm};
pub use span::{Span, SpanList};
