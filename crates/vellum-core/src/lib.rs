//! Shared types, traits, fixed-point math and configuration for the Vellum
//! glyph rasterization core.
//!
//! Three subsystems build on this crate: the font cache (`vellum-cache`),
//! the Type 1/2 hint engine (`vellum-hint`), and the rasterization
//! blitters (`vellum-raster`). This crate holds what all three need and
//! none of them owns: error types, fixed-point arithmetic, affine matrix
//! helpers, configuration, and the trait boundaries to the external
//! collaborators named in the specification (the interpreter, font file
//! parsing, the scan-conversion engine).

pub mod alloc;
pub mod config;
pub mod error;
pub mod fixed;
pub mod geom;
pub mod selector;
pub mod traits;

pub use error::{Result, VellumError};
pub use fixed::F26Dot6;
pub use selector::{CharSelector, GlyphName, WritingMode, NUM_CHAR_BUCKETS};
