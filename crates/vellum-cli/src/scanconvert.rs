//! A minimal reference scan-converter fulfilling the outline-to-form
//! contract named in spec §1 ("assumes a scan-conversion engine exists
//! downstream"). Good enough to exercise the dispatcher end to end; not
//! an anti-aliased or winding-rule-correct rasterizer.

use vellum_core::error::Result;
use vellum_core::traits::PathBuilder;
use vellum_raster::{BlitContext, Bitmap, Color};

#[derive(Copy, Clone, Debug)]
enum Segment {
    Move(f64, f64),
    Line(f64, f64),
}

/// Accumulates outline points and, on `endchar`, fills the polygon into a
/// bitmap using an even-odd scanline rule. Curves are flattened to their
/// endpoint (no subdivision) — adequate for the rectilinear test glyphs
/// this crate exercises, not for production-quality curves.
pub struct ScanConverter {
    width: u32,
    height: u32,
    origin_x: f64,
    origin_y: f64,
    segments: Vec<Segment>,
    bearing: (f64, f64),
    width_vec: (f64, f64),
    form: Option<Bitmap>,
}

impl ScanConverter {
    pub fn new(width: u32, height: u32, origin_x: f64, origin_y: f64) -> Self {
        ScanConverter {
            width,
            height,
            origin_x,
            origin_y,
            segments: Vec::new(),
            bearing: (0.0, 0.0),
            width_vec: (0.0, 0.0),
            form: None,
        }
    }

    pub fn into_form(self) -> Option<Bitmap> {
        self.form
    }

    pub fn advance(&self) -> (f64, f64) {
        self.width_vec
    }

    pub fn bearing(&self) -> (f64, f64) {
        self.bearing
    }

    fn to_device(&self, x: f64, y: f64) -> (f64, f64) {
        (x - self.origin_x, self.height as f64 - (y - self.origin_y))
    }

    fn fill(&mut self) {
        let mut bitmap = Bitmap::new_blank(self.width, self.height);
        let ctx = BlitContext::new(Color::Black);
        let points: Vec<(f64, f64)> = self
            .segments
            .iter()
            .map(|s| match *s {
                Segment::Move(x, y) | Segment::Line(x, y) => self.to_device(x, y),
            })
            .collect();

        for y in 0..self.height {
            let scan_y = y as f64 + 0.5;
            let mut crossings: Vec<f64> = Vec::new();
            for i in 0..points.len() {
                let (x0, y0) = points[i];
                let (x1, y1) = points[(i + 1) % points.len()];
                if (y0 <= scan_y && y1 > scan_y) || (y1 <= scan_y && y0 > scan_y) {
                    let t = (scan_y - y0) / (y1 - y0);
                    crossings.push(x0 + t * (x1 - x0));
                }
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).unwrap());
            for pair in crossings.chunks_exact(2) {
                let left = pair[0].round().max(0.0) as i32;
                let right = (pair[1].round() as i32 - 1).min(self.width as i32 - 1);
                if left <= right {
                    vellum_raster::blit::span_blit(&mut bitmap, &ctx, y, left, right);
                }
            }
        }
        self.form = Some(bitmap);
    }
}

impl PathBuilder for ScanConverter {
    fn initchar(&mut self) {
        self.segments.clear();
        self.form = None;
    }

    fn setbearing(&mut self, x: f64, y: f64) {
        self.bearing = (x, y);
    }

    fn setwidth(&mut self, x: f64, y: f64) {
        self.width_vec = (x, y);
    }

    fn moveto(&mut self, x: f64, y: f64) {
        self.segments.push(Segment::Move(x, y));
    }

    fn lineto(&mut self, x: f64, y: f64) {
        self.segments.push(Segment::Line(x, y));
    }

    fn curveto(&mut self, _x1: f64, _y1: f64, _x2: f64, _y2: f64, x3: f64, y3: f64) {
        self.segments.push(Segment::Line(x3, y3));
    }

    fn closepath(&mut self) {}

    fn endchar(&mut self, ok: bool) -> Result<()> {
        if ok {
            self.fill();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_a_simple_rectangle() {
        let mut sc = ScanConverter::new(20, 20, 0.0, 0.0);
        sc.initchar();
        sc.moveto(2.0, 2.0);
        sc.lineto(10.0, 2.0);
        sc.lineto(10.0, 10.0);
        sc.lineto(2.0, 10.0);
        sc.endchar(true).unwrap();

        let bitmap = sc.into_form().expect("form should be produced");
        assert!(bitmap.get(5, 12), "center of rectangle should be filled");
        assert!(!bitmap.get(1, 1), "corner outside rectangle should stay clear");
    }

    #[test]
    fn endchar_false_produces_no_form() {
        let mut sc = ScanConverter::new(10, 10, 0.0, 0.0);
        sc.initchar();
        sc.moveto(0.0, 0.0);
        sc.endchar(false).unwrap();
        assert!(sc.into_form().is_none());
    }
}
