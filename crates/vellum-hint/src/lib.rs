//! The Type 1/2 charstring hint engine: stem declaration and snapping,
//! alignment-zone capture, point hinting, and counter hinting (spec §4.2).

pub mod blues;
pub mod counter;
pub mod filter;
pub mod params;
pub mod point;
pub mod snap;
pub mod stem;

pub use blues::{build_zones, capture_edge, AlignmentZone, Capture};
pub use filter::HintEngine;
pub use params::HintParams;
pub use stem::{Axis, Stem, StemList};
