//! Geometry matrix used to place a source image onto a destination.

use crate::foundation::core::{Affine, Point, Vec2};
use crate::foundation::error::{TesseraError, TesseraResult};

/// A 2x3 affine matrix `[a b tx; c d ty]`.
///
/// The default value is the identity, which draws a source at `(0, 0)`.
/// Every mutator post-multiplies: the new operation is applied after the existing ones.
///
/// ```
/// use tessera::GeoM;
///
/// let mut m = GeoM::new();
/// m.scale(2.0, 2.0);
/// m.translate(10.0, 0.0);
/// assert_eq!(m.apply(1.0, 1.0), (12.0, 2.0));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GeoM {
    affine: Affine,
}

impl GeoM {
    /// Identity matrix.
    pub fn new() -> Self {
        Self {
            affine: Affine::IDENTITY,
        }
    }

    /// Build from `(a, b, c, d, tx, ty)` where `x' = a*x + b*y + tx` and `y' = c*x + d*y + ty`.
    pub fn from_elements(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Self {
            affine: Affine::new([a, c, b, d, tx, ty]),
        }
    }

    /// Return `(a, b, c, d, tx, ty)`.
    pub fn elements(&self) -> (f64, f64, f64, f64, f64, f64) {
        let [a, c, b, d, tx, ty] = self.affine.as_coeffs();
        (a, b, c, d, tx, ty)
    }

    /// Set one element addressed by row `i` (0..2) and column `j` (0..3).
    ///
    /// Out-of-range indices are ignored.
    pub fn set_element(&mut self, i: usize, j: usize, value: f64) {
        let mut k = self.affine.as_coeffs();
        // kurbo stores column-major: [a c b d tx ty].
        let idx = match (i, j) {
            (0, 0) => 0,
            (1, 0) => 1,
            (0, 1) => 2,
            (1, 1) => 3,
            (0, 2) => 4,
            (1, 2) => 5,
            _ => return,
        };
        k[idx] = value;
        self.affine = Affine::new(k);
    }

    /// Reset to identity.
    pub fn reset(&mut self) {
        self.affine = Affine::IDENTITY;
    }

    /// Scale by `(sx, sy)` after the current transform.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.affine = Affine::scale_non_uniform(sx, sy) * self.affine;
    }

    /// Translate by `(tx, ty)` after the current transform.
    pub fn translate(&mut self, tx: f64, ty: f64) {
        self.affine = Affine::translate(Vec2::new(tx, ty)) * self.affine;
    }

    /// Rotate by `theta` radians (clockwise in y-down space) after the current transform.
    pub fn rotate(&mut self, theta: f64) {
        self.affine = Affine::rotate(theta) * self.affine;
    }

    /// Apply `other` after `self`.
    pub fn concat(&mut self, other: &GeoM) {
        self.affine = other.affine * self.affine;
    }

    /// Transform a point.
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let p = self.affine * Point::new(x, y);
        (p.x, p.y)
    }

    /// Return `true` when the matrix has a non-zero determinant.
    pub fn is_invertible(&self) -> bool {
        let det = self.affine.determinant();
        det.is_finite() && det != 0.0
    }

    /// Invert in place.
    pub fn invert(&mut self) -> TesseraResult<()> {
        if !self.is_invertible() {
            return Err(TesseraError::misuse("GeoM is not invertible"));
        }
        self.affine = self.affine.inverse();
        Ok(())
    }
}

impl From<Affine> for GeoM {
    fn from(affine: Affine) -> Self {
        Self { affine }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/geo_m.rs"]
mod tests;
