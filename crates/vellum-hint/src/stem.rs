//! Declared stems and the active/inactive lists `hintmask`/`cntrmask`
//! operate on (spec §3 "Stem list structure", §4.2 "State machine: hint
//! activation").

use crate::params::FIXED_STEMS;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// One declared stem, in character-space units, plus its computed
/// snapping result (filled in by [`crate::snap::snap_stem`]).
#[derive(Copy, Clone, Debug)]
pub struct Stem {
    pub axis: Axis,
    /// Lower edge in character space.
    pub origin: f64,
    /// Always positive (spec §4.2 step 1 "Normalize").
    pub thickness: f64,
    /// Device-space delta applied to the low edge, once snapped.
    pub low_delta: f64,
    /// Device-space delta applied to the high edge, once snapped.
    pub high_delta: f64,
    /// Whether a blue zone captured one of this stem's edges.
    pub captured: bool,
    /// Rounded device-pixel width chosen during snapping (spec §3 "Stem"
    /// entity, "ideal/other pixel width"). Defaults to the raw character-space
    /// thickness until [`crate::snap::snap_stem`] runs.
    pub ideal_width: f64,
    /// The alternate pixel width counter hinting may choose instead of
    /// `ideal_width`, when snapping found the residual ambiguous.
    pub other_width: Option<f64>,
}

impl Stem {
    pub fn new(axis: Axis, mut origin: f64, mut thickness: f64) -> Self {
        if thickness < 0.0 {
            origin += thickness;
            thickness = -thickness;
        }
        Stem {
            axis,
            origin,
            thickness,
            low_delta: 0.0,
            high_delta: 0.0,
            captured: false,
            ideal_width: thickness,
            other_width: None,
        }
    }

    pub fn high_edge(&self) -> f64 {
        self.origin + self.thickness
    }
}

/// Declared stems for one glyph, sorted by `(origin, thickness)` within an
/// axis. Spills to the heap past [`FIXED_STEMS`] entries; both are backed
/// by the same `Vec` here, since Rust gives us amortized growth for free
/// and the inline/heap split in the source existed only to avoid a malloc
/// in the common case.
#[derive(Clone, Debug, Default)]
pub struct StemList {
    active: Vec<Stem>,
    inactive: Vec<Stem>,
}

impl StemList {
    pub fn new() -> Self {
        StemList::default()
    }

    pub fn clear(&mut self) {
        self.active.clear();
        self.inactive.clear();
    }

    pub fn active(&self) -> &[Stem] {
        &self.active
    }

    pub fn active_mut(&mut self) -> &mut [Stem] {
        &mut self.active
    }

    pub fn axis_active(&self, axis: Axis) -> impl Iterator<Item = &Stem> {
        self.active.iter().filter(move |s| s.axis == axis)
    }

    /// `hstem`/`vstem`: add to active, or reactivate a matching inactive
    /// stem rather than declaring a duplicate (spec §4.2: "add to active,
    /// or reactivate from inactive if a matching stem exists").
    pub fn declare(&mut self, axis: Axis, origin: f64, thickness: f64) {
        let new_stem = Stem::new(axis, origin, thickness);
        if let Some(pos) = self
            .inactive
            .iter()
            .position(|s| s.axis == axis && (s.origin - new_stem.origin).abs() < f64::EPSILON)
        {
            let reactivated = self.inactive.remove(pos);
            self.insert_sorted(reactivated);
            return;
        }
        if self.active.len() >= FIXED_STEMS * 2 {
            log::warn!("stem list exceeded {} entries; ignoring further declarations", FIXED_STEMS * 2);
            return;
        }
        self.insert_sorted(new_stem);
    }

    fn insert_sorted(&mut self, stem: Stem) {
        let pos = self
            .active
            .partition_point(|s| (s.origin, s.thickness) < (stem.origin, stem.thickness));
        self.active.insert(pos, stem);
    }

    /// `hintmask(index, activate)`: move a single stem between lists.
    pub fn set_active(&mut self, index: usize, activate: bool) {
        if activate {
            if index < self.inactive.len() {
                let stem = self.inactive.remove(index);
                self.insert_sorted(stem);
            }
        } else if index < self.active.len() {
            let stem = self.active.remove(index);
            self.inactive.push(stem);
        }
    }

    /// `setbearing` and explicit hint changes: deactivate everything,
    /// preserving snapping results for potential reactivation.
    pub fn deactivate_all(&mut self) {
        self.inactive.append(&mut self.active);
    }
}
