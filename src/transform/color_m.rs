//! Color matrix applied to source texels while compositing.

use crate::foundation::core::Rgba8Premul;
use crate::foundation::math::unit_to_u8;

const IDENTITY: [f32; 20] = [
    1.0, 0.0, 0.0, 0.0, 0.0, //
    0.0, 1.0, 0.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, 0.0, //
    0.0, 0.0, 0.0, 1.0, 0.0, //
];

/// A 4x5 color matrix: a 4x4 linear part over `(r, g, b, a)` plus a translation column.
///
/// The matrix operates on straight (non-premultiplied) channels in `[0, 1]`. Applying it to a
/// premultiplied texel unpremultiplies, transforms, clamps and premultiplies again.
///
/// The default value is the identity. Mutators post-multiply, like [`crate::GeoM`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorM {
    m: [f32; 20],
}

impl Default for ColorM {
    fn default() -> Self {
        Self { m: IDENTITY }
    }
}

impl ColorM {
    /// Identity matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a row-major 4x5 array.
    pub fn from_array(m: [f32; 20]) -> Self {
        Self { m }
    }

    /// Row-major 4x5 array.
    pub fn as_array(&self) -> [f32; 20] {
        self.m
    }

    /// Reset to identity.
    pub fn reset(&mut self) {
        self.m = IDENTITY;
    }

    /// Return `true` if applying the matrix leaves every texel unchanged.
    pub fn is_identity(&self) -> bool {
        self.m == IDENTITY
    }

    /// Element at row `i` (0..4) and column `j` (0..5). Out-of-range indices return `0.0`.
    pub fn element(&self, i: usize, j: usize) -> f32 {
        if i >= 4 || j >= 5 {
            return 0.0;
        }
        self.m[i * 5 + j]
    }

    /// Set the element at row `i` and column `j`. Out-of-range indices are ignored.
    pub fn set_element(&mut self, i: usize, j: usize, value: f32) {
        if i < 4 && j < 5 {
            self.m[i * 5 + j] = value;
        }
    }

    /// Scale each channel after the current transform.
    pub fn scale(&mut self, r: f32, g: f32, b: f32, a: f32) {
        let s = [r, g, b, a];
        for (row, k) in s.iter().enumerate() {
            for col in 0..5 {
                self.m[row * 5 + col] *= k;
            }
        }
    }

    /// Translate each channel after the current transform.
    pub fn translate(&mut self, r: f32, g: f32, b: f32, a: f32) {
        let t = [r, g, b, a];
        for (row, v) in t.iter().enumerate() {
            self.m[row * 5 + 4] += v;
        }
    }

    /// Apply `other` after `self`.
    pub fn concat(&mut self, other: &ColorM) {
        let a = &other.m;
        let b = &self.m;
        let mut out = [0.0f32; 20];
        for i in 0..4 {
            for j in 0..5 {
                let mut acc = 0.0;
                for k in 0..4 {
                    acc += a[i * 5 + k] * b[k * 5 + j];
                }
                if j == 4 {
                    acc += a[i * 5 + 4];
                }
                out[i * 5 + j] = acc;
            }
        }
        self.m = out;
    }

    /// Transform one premultiplied texel.
    pub fn apply(&self, px: Rgba8Premul) -> Rgba8Premul {
        if self.is_identity() {
            return px;
        }
        let m = &self.m;

        let pa = f32::from(px.a) / 255.0;
        // Convert premul -> straight for matrix application.
        let inv_a = if pa > 0.0 { 1.0 / pa } else { 0.0 };
        let r = f32::from(px.r) / 255.0 * inv_a;
        let g = f32::from(px.g) / 255.0 * inv_a;
        let b = f32::from(px.b) / 255.0 * inv_a;
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        Rgba8Premul {
            r: unit_to_u8(out_r * out_a),
            g: unit_to_u8(out_g * out_a),
            b: unit_to_u8(out_b * out_a),
            a: unit_to_u8(out_a),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/color_m.rs"]
mod tests;
