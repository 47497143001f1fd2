//! Halftone cell *consumption* during a blit (spec §4.3 "Halftone
//! convergence"). Building the screen/cell itself is out of scope (spec
//! Non-goals: "halftoning cell generation") — this module only answers
//! "is this device pixel black in the halftone pattern", given an
//! already-built cell bitmap.

use crate::form::Bitmap;

/// A pre-built halftone cell pattern to tile across the destination.
pub struct HalftoneCell {
    pub bits: Bitmap,
}

/// Orthogonal-axis screens: the cell repeats on the device's own X/Y axes,
/// so locating a pixel within the cell is direct modular indexing.
pub fn converge_orthogonal(cell: &HalftoneCell, x: i32, y: i32) -> bool {
    let w = cell.bits.width as i32;
    let h = cell.bits.height as i32;
    if w == 0 || h == 0 {
        return false;
    }
    cell.bits.get(x.rem_euclid(w) as u32, y.rem_euclid(h) as u32)
}

/// General (angled) screens: the cell repeats along two lattice basis
/// vectors `a` and `b` that are not axis-aligned. A 4-parameter lattice
/// walk locates which tile `(x, y)` falls in, then the pixel's offset
/// within that tile. Alternate tiles are mirrored ("reflects across a
/// cell boundary") so the pattern stays continuous across tile edges
/// instead of showing a seam.
pub fn converge_angled(cell: &HalftoneCell, a: (i32, i32), b: (i32, i32), x: i32, y: i32) -> bool {
    let (ax, ay) = a;
    let (bx, by) = b;
    let det = ax * by - ay * bx;
    if det == 0 {
        return converge_orthogonal(cell, x, y);
    }

    let tile_u = (x * by - y * bx).div_euclid(det);
    let tile_v = (y * ax - x * ay).div_euclid(det);

    let local_x = x - tile_u * ax - tile_v * bx;
    let local_y = y - tile_u * ay - tile_v * by;

    let w = cell.bits.width as i32;
    let h = cell.bits.height as i32;
    if w == 0 || h == 0 {
        return false;
    }

    let reflected = (tile_u + tile_v) & 1 != 0;
    let (cx, cy) = if reflected {
        (w - 1 - local_x.rem_euclid(w), local_y.rem_euclid(h))
    } else {
        (local_x.rem_euclid(w), local_y.rem_euclid(h))
    };
    cell.bits.get(cx as u32, cy as u32)
}
