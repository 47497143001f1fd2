//! Affine matrix helpers consumed by the hint engine and dispatcher.
//!
//! The interpreter's graphics-state stack and its matrix arithmetic are out
//! of scope for this crate (spec: "assumed available") — this module is the
//! thin contract the rest of the core actually calls, built on `kurbo`
//! rather than hand-rolled 2x3 arithmetic.

use kurbo::Affine;

/// Multiply two font/user-space transforms, `a` then `b`.
pub fn matrix_mult(a: Affine, b: Affine) -> Affine {
    b * a
}

/// Invert a transform, or `None` if it is singular (matches PostScript's
/// `undefinedresult` on a non-invertible matrix rather than panicking).
pub fn matrix_inverse(m: Affine) -> Option<Affine> {
    let det = m.as_coeffs();
    let determinant = det[0] * det[3] - det[1] * det[2];
    if determinant.abs() < f64::EPSILON {
        None
    } else {
        Some(m.inverse())
    }
}

/// Bit-exact matrix equality as used by the font-cache's matrix lookup
/// (spec §4.1): exact, not epsilon-fuzzy, because cache correctness depends
/// on never conflating two distinct scalings.
pub fn matrix_eq(a: Affine, b: Affine) -> bool {
    a.as_coeffs() == b.as_coeffs()
}

/// Matrix equality that ignores the translation components, used when
/// looking up Type 32 bitmap glyphs (spec §4.1 step 3: "For Type-32
/// lookups, translation components are ignored").
pub fn matrix_eq_ignoring_translation(a: Affine, b: Affine) -> bool {
    let ac = a.as_coeffs();
    let bc = b.as_coeffs();
    ac[0] == bc[0] && ac[1] == bc[1] && ac[2] == bc[2] && ac[3] == bc[3]
}

/// Clean small residuals so near-axis-aligned font matrices compare equal
/// after round-trip transforms. `tolerance` is in matrix-element units.
pub fn matrix_snap(m: Affine, tolerance: f64) -> Affine {
    let c = m.as_coeffs();
    let snap = |v: f64| -> f64 {
        let rounded = v.round();
        if (v - rounded).abs() <= tolerance {
            rounded
        } else {
            v
        }
    };
    Affine::new([snap(c[0]), snap(c[1]), snap(c[2]), snap(c[3]), c[4], c[5]])
}

/// Transform a displacement vector (ignores translation), used to map
/// hint-space deltas back into device space.
pub fn matrix_transform_dxy(m: Affine, dx: f64, dy: f64) -> (f64, f64) {
    let c = m.as_coeffs();
    (c[0] * dx + c[2] * dy, c[1] * dx + c[3] * dy)
}
