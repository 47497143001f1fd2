//! The hint engine: a [`PathBuilder`] filter over an inner builder, plus
//! the extra charstring-level primitives (`stem`, `hintmask`, `cntrmask`,
//! `flex`, `dotsection`) the interpreter drives it with directly (spec
//! §4.2 "Responsibility", "Public contract").

use crate::counter::hint_counter_group;
use crate::params::HintParams;
use crate::point::hint_point;
use crate::snap::snap_stem;
use crate::stem::{Axis, StemList};
use vellum_core::error::Result;
use vellum_core::traits::PathBuilder;

pub struct HintEngine {
    inner: Box<dyn PathBuilder>,
    params: HintParams,
    stems: StemList,
    ppem_scale: f64,
    baseline_shift: f64,
    in_dotsection: bool,
    in_flex: bool,
}

impl HintEngine {
    pub fn new(inner: Box<dyn PathBuilder>, params: HintParams, ppem_scale: f64) -> Self {
        HintEngine {
            inner,
            params,
            stems: StemList::new(),
            ppem_scale,
            baseline_shift: 0.0,
            in_dotsection: false,
            in_flex: false,
        }
    }

    /// `hstem`/`vstem`: declare and immediately snap a stem (spec §4.2
    /// "Stem creation and snapping").
    pub fn declare_stem(&mut self, axis: Axis, origin: f64, thickness: f64) {
        self.stems.declare(axis, origin, thickness);
        for stem in self.stems.active_mut() {
            if stem.axis == axis && (stem.origin - origin).abs() < f64::EPSILON {
                snap_stem(stem, &self.params, self.ppem_scale);
            }
        }
    }

    /// `hintmask(index, activate)`.
    pub fn hintmask(&mut self, index: usize, activate: bool) {
        self.stems.set_active(index, activate);
    }

    /// `cntrmask` sentinel reached: run counter hinting over each axis's
    /// currently active stems (spec §4.2 "Counter hinting").
    pub fn cntrmask_group_complete(&mut self) {
        let mut horizontal: Vec<_> = self.stems.active().iter().filter(|s| s.axis == Axis::Horizontal).copied().collect();
        let mut vertical: Vec<_> = self.stems.active().iter().filter(|s| s.axis == Axis::Vertical).copied().collect();
        hint_counter_group(&mut horizontal, self.params.expansion_factor);
        hint_counter_group(&mut vertical, self.params.expansion_factor);

        for stem in self.stems.active_mut() {
            let replacement = match stem.axis {
                Axis::Horizontal => horizontal.iter().find(|s| (s.origin - stem.origin).abs() < f64::EPSILON),
                Axis::Vertical => vertical.iter().find(|s| (s.origin - stem.origin).abs() < f64::EPSILON),
            };
            if let Some(r) = replacement {
                stem.low_delta = r.low_delta;
                stem.high_delta = r.high_delta;
            }
        }
    }

    pub fn dotsection(&mut self, active: bool) {
        self.in_dotsection = active;
    }

    pub fn flex(&mut self, active: bool) {
        self.in_flex = active;
    }

    fn hint(&self, x: f64, y: f64) -> (f64, f64) {
        if self.in_flex {
            return (x, y);
        }
        hint_point(self.stems.active(), x, y, self.baseline_shift, self.in_dotsection)
    }
}

impl PathBuilder for HintEngine {
    fn initchar(&mut self) {
        self.stems.clear();
        self.in_dotsection = false;
        self.in_flex = false;
        self.baseline_shift = 0.0;
        self.inner.initchar();
    }

    fn setbearing(&mut self, x: f64, y: f64) {
        self.stems.deactivate_all();
        self.inner.setbearing(x, y);
    }

    fn setwidth(&mut self, x: f64, y: f64) {
        self.inner.setwidth(x, y);
    }

    fn moveto(&mut self, x: f64, y: f64) {
        let (hx, hy) = self.hint(x, y);
        self.inner.moveto(hx, hy);
    }

    fn lineto(&mut self, x: f64, y: f64) {
        let (hx, hy) = self.hint(x, y);
        self.inner.lineto(hx, hy);
    }

    fn curveto(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, x3: f64, y3: f64) {
        let (hx1, hy1) = self.hint(x1, y1);
        let (hx2, hy2) = self.hint(x2, y2);
        let (hx3, hy3) = self.hint(x3, y3);
        self.inner.curveto(hx1, hy1, hx2, hy2, hx3, hy3);
    }

    fn closepath(&mut self) {
        self.inner.closepath();
    }

    fn endchar(&mut self, ok: bool) -> Result<()> {
        self.inner.endchar(ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct RecordingBuilder {
        points: Rc<RefCell<Vec<(f64, f64)>>>,
    }

    impl PathBuilder for RecordingBuilder {
        fn initchar(&mut self) {}
        fn setbearing(&mut self, _x: f64, _y: f64) {}
        fn setwidth(&mut self, _x: f64, _y: f64) {}
        fn moveto(&mut self, x: f64, y: f64) {
            self.points.borrow_mut().push((x, y));
        }
        fn lineto(&mut self, x: f64, y: f64) {
            self.points.borrow_mut().push((x, y));
        }
        fn curveto(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, x3: f64, y3: f64) {
            self.points.borrow_mut().push((x3, y3));
        }
        fn closepath(&mut self) {}
        fn endchar(&mut self, _ok: bool) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn hint_round_trip_forwards_every_point() {
        let points = Rc::new(RefCell::new(Vec::new()));
        let builder = RecordingBuilder { points: points.clone() };
        let mut engine = HintEngine::new(Box::new(builder), HintParams::default(), 1.0);

        engine.initchar();
        engine.moveto(0.0, 0.0);
        engine.lineto(100.0, 0.0);
        engine.lineto(100.0, 100.0);
        engine.closepath();
        engine.endchar(true).unwrap();

        assert_eq!(points.borrow().len(), 3);
    }

    #[test]
    fn dotsection_suppresses_hint_adjustment() {
        let points = Rc::new(RefCell::new(Vec::new()));
        let builder = RecordingBuilder { points: points.clone() };
        let mut engine = HintEngine::new(Box::new(builder), HintParams::default(), 1.0);
        engine.declare_stem(Axis::Horizontal, 0.0, 50.0);
        engine.dotsection(true);
        engine.moveto(10.0, 25.0);
        assert_eq!(points.borrow()[0], (10.0, 25.0));
    }

    #[test]
    fn setbearing_deactivates_all_stems() {
        let points = Rc::new(RefCell::new(Vec::new()));
        let builder = RecordingBuilder { points };
        let mut engine = HintEngine::new(Box::new(builder), HintParams::default(), 1.0);
        engine.declare_stem(Axis::Horizontal, 0.0, 50.0);
        assert_eq!(engine.stems.active().len(), 1);
        engine.setbearing(0.0, 0.0);
        assert!(engine.stems.active().is_empty());
    }
}
