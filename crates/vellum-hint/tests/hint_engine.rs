//! Integration coverage for the hint engine through its public surface.

use std::cell::RefCell;
use std::rc::Rc;
use vellum_core::error::Result;
use vellum_core::traits::{FontInfoKey, FontParams, ParamValue, PathBuilder};
use vellum_hint::{Axis, HintEngine, HintParams};

struct StubFont;

impl FontParams for StubFont {
    fn get_info(&self, key: FontInfoKey, _index: usize) -> ParamValue {
        match key {
            FontInfoKey::StdHW => ParamValue::Real(50.0),
            FontInfoKey::BlueValues => ParamValue::Array(vec![-12.0, 0.0, 700.0, 712.0]),
            _ => ParamValue::Absent,
        }
    }
}

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

/// Loading hint parameters from a font-params getter honors the present
/// values and falls back to defaults for everything absent.
#[test]
fn params_load_from_font_with_partial_overrides() {
    let params = HintParams::from_font_params(&StubFont);
    assert_eq!(params.std_hw, Some(50.0));
    assert_eq!(params.blue_values, vec![-12.0, 0.0, 700.0, 712.0]);
    assert_eq!(params.blue_scale, vellum_hint::params::DEFAULT_BLUE_SCALE);
}

/// A stem declared then hit by a point inside its range moves the point
/// by the stem's snapped delta, and the adjustment survives a full
/// initchar -> moveto -> lineto -> closepath -> endchar cycle.
#[test]
fn stem_snapping_affects_points_within_its_range() {
    let points = Rc::new(RefCell::new(Vec::new()));
    let builder = RecordingBuilder { points: points.clone() };
    let params = HintParams::from_font_params(&StubFont);
    let mut engine = HintEngine::new(Box::new(builder), params, 1.0);

    engine.initchar();
    engine.declare_stem(Axis::Horizontal, 0.0, 50.0);
    engine.moveto(10.0, 25.0);
    engine.lineto(10.0, 50.0);
    engine.closepath();
    engine.endchar(true).unwrap();

    let recorded = points.borrow();
    assert_eq!(recorded.len(), 2);
    assert!((recorded[1].1 - 50.0).abs() < 1.0, "top edge should land near pixel row 50, got {}", recorded[1].1);
}
