use crate::transform::color_m::ColorM;
use crate::transform::geo_m::GeoM;

/// Rectangle of a source image eligible for sampling.
///
/// The default value is "unset", which means the whole source image is used.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceRect {
    valid: bool,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
}

impl SourceRect {
    /// Build a set rectangle; see [`SourceRect::set`].
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        let mut r = Self::default();
        r.set(x0, y0, x1, y1);
        r
    }

    /// Reset to the unset value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Set the rectangle. `(x0, y0)` is the upper-left corner and `(x1, y1)` the lower-right.
    ///
    /// If `x0 > x1` or `y0 > y1` the coordinates are swapped.
    pub fn set(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let (x0, x1) = if x0 > x1 { (x1, x0) } else { (x0, x1) };
        let (y0, y1) = if y0 > y1 { (y1, y0) } else { (y0, y1) };
        *self = Self {
            valid: true,
            x0,
            y0,
            x1,
            y1,
        };
    }

    /// Return `(x0, y0, x1, y1)`, or `None` when unset.
    pub fn get(&self) -> Option<(i32, i32, i32, i32)> {
        self.valid.then_some((self.x0, self.y0, self.x1, self.y1))
    }

    /// Return `true` when a rectangle has been set.
    pub fn is_set(&self) -> bool {
        self.valid
    }
}

/// Blend operation applied when drawing a source onto a destination.
///
/// All modes are Porter-Duff operators on premultiplied colors.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    /// Regular alpha blending.
    #[default]
    SourceOver,
    /// Both source and destination are cleared.
    Clear,
    /// Source replaces destination.
    Copy,
    /// Destination is kept.
    Destination,
    /// Destination is drawn over the source.
    DestinationOver,
    /// Source where destination is opaque.
    SourceIn,
    /// Destination where source is opaque.
    DestinationIn,
    /// Source where destination is transparent.
    SourceOut,
    /// Destination where source is transparent.
    DestinationOut,
    /// Source over destination, only inside the destination.
    SourceAtop,
    /// Destination over source, only inside the source.
    DestinationAtop,
    /// Source and destination where the other is transparent.
    Xor,
    /// Sum of source and destination (additive).
    Lighter,
}

/// Texture sampling mode.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Nearest-neighbor sampling.
    #[default]
    Nearest,
    /// Bilinear sampling.
    Linear,
}

/// Options for [`crate::Image::draw_image`].
///
/// `DrawImage` copies the options by value, so changing them after a call never affects a draw
/// that was already submitted:
///
/// ```
/// use tessera::DrawImageOptions;
///
/// let mut op = DrawImageOptions::default();
/// op.source_rect.set(0, 0, 100, 100);
/// // dst.draw_image(&src, Some(&op))?;
/// op.source_rect.set(10, 10, 110, 110); // does not affect the previous draw
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DrawImageOptions {
    /// Region of the source image to draw. Texels outside it are never sampled.
    pub source_rect: SourceRect,
    /// Geometry matrix. Identity draws the source at `(0, 0)`.
    pub geo_m: GeoM,
    /// Color matrix. Identity leaves colors unchanged.
    pub color_m: ColorM,
    /// Composite mode. Defaults to regular alpha blending.
    pub composite_mode: CompositeMode,
    /// Texture filter. Defaults to nearest-neighbor.
    pub filter: Filter,
}

#[cfg(test)]
#[path = "../../tests/unit/image/options.rs"]
mod tests;
