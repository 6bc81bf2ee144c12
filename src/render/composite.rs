use crate::foundation::core::{Affine, Point, Rgba8Premul};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::render::backend::{CompositeOp, TexFilter, TexelRect};
use crate::render::queue::Quad;
use crate::transform::color_m::ColorM;

pub(crate) type PremulRgba8 = [u8; 4];

/// Read-only view over a premultiplied RGBA8 texture.
#[derive(Clone, Copy)]
pub(crate) struct TexView<'a> {
    pub(crate) data: &'a [u8],
    pub(crate) width: u32,
    pub(crate) height: u32,
}

impl TexView<'_> {
    fn texel(&self, x: i32, y: i32) -> PremulRgba8 {
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }
}

/// Mutable view over the destination texture.
pub(crate) struct TexViewMut<'a> {
    pub(crate) data: &'a mut [u8],
    pub(crate) width: u32,
    pub(crate) height: u32,
}

/// Composite one premultiplied source texel onto a destination texel.
pub(crate) fn composite_px(op: CompositeOp, src: PremulRgba8, dst: PremulRgba8) -> PremulRgba8 {
    match op {
        CompositeOp::SourceOver => premul_over_px(dst, src),
        CompositeOp::Copy => src,
        CompositeOp::Destination => dst,
        CompositeOp::Clear => [0; 4],
        _ => {
            let sa = f32::from(src[3]) / 255.0;
            let da = f32::from(dst[3]) / 255.0;
            let (sf, df) = op.factors();
            let fs = sf.eval(sa, da);
            let fd = df.eval(sa, da);
            let mut out = [0u8; 4];
            for i in 0..4 {
                let v = f32::from(src[i]) * fs + f32::from(dst[i]) * fd;
                out[i] = v.round().clamp(0.0, 255.0) as u8;
            }
            out
        }
    }
}

fn premul_over_px(dst: PremulRgba8, src: PremulRgba8) -> PremulRgba8 {
    if src[3] == 255 {
        return src;
    }
    if src[3] == 0 && src[0..3] == [0, 0, 0] {
        return dst;
    }
    let inv = 255u16 - u16::from(src[3]);
    let mut out = [0u8; 4];
    for i in 0..4 {
        out[i] = add_sat_u8(src[i], mul_div255_u8(u16::from(dst[i]), inv));
    }
    out
}

fn sample_nearest(src: TexView<'_>, region: TexelRect, u: f64, v: f64) -> PremulRgba8 {
    let x = (u.floor() as i32).clamp(region.x0, region.x1 - 1);
    let y = (v.floor() as i32).clamp(region.y0, region.y1 - 1);
    src.texel(x, y)
}

fn sample_linear(src: TexView<'_>, region: TexelRect, u: f64, v: f64) -> PremulRgba8 {
    let u = u - 0.5;
    let v = v - 0.5;
    let fx0 = u.floor();
    let fy0 = v.floor();
    let tx = (u - fx0) as f32;
    let ty = (v - fy0) as f32;

    // Neighbours outside the region clamp to its edge so no foreign texel is read.
    let cx = |x: i32| x.clamp(region.x0, region.x1 - 1);
    let cy = |y: i32| y.clamp(region.y0, region.y1 - 1);
    let x0 = fx0 as i32;
    let y0 = fy0 as i32;
    let p00 = src.texel(cx(x0), cy(y0));
    let p10 = src.texel(cx(x0 + 1), cy(y0));
    let p01 = src.texel(cx(x0), cy(y0 + 1));
    let p11 = src.texel(cx(x0 + 1), cy(y0 + 1));

    let mut out = [0u8; 4];
    for i in 0..4 {
        let top = f32::from(p00[i]) * (1.0 - tx) + f32::from(p10[i]) * tx;
        let bottom = f32::from(p01[i]) * (1.0 - tx) + f32::from(p11[i]) * tx;
        let v = top * (1.0 - ty) + bottom * ty;
        out[i] = v.round().clamp(0.0, 255.0) as u8;
    }
    out
}

/// Rasterize one quad of a batch. Returns the number of destination pixels written.
///
/// The quad covers `[0, w) x [0, h)` of the region in local space, mapped by the quad's affine.
/// A destination pixel is covered when its centre maps back inside that rectangle.
pub(crate) fn draw_quad(
    dst: &mut TexViewMut<'_>,
    src: TexView<'_>,
    quad: &Quad,
    color_m: &ColorM,
    op: CompositeOp,
    filter: TexFilter,
) -> u64 {
    let region = TexelRect {
        x0: quad.region.x0.max(0),
        y0: quad.region.y0.max(0),
        x1: quad.region.x1.min(src.width as i32),
        y1: quad.region.y1.min(src.height as i32),
    };
    if region.is_empty() {
        return 0;
    }

    let [a, b, c, d, tx, ty] = quad.geom;
    let affine = Affine::new([a, c, b, d, tx, ty]);
    let det = affine.determinant();
    if !det.is_finite() || det == 0.0 {
        return 0;
    }
    let inv = affine.inverse();

    let rw = f64::from(region.width());
    let rh = f64::from(region.height());
    let corners = [
        affine * Point::new(0.0, 0.0),
        affine * Point::new(rw, 0.0),
        affine * Point::new(0.0, rh),
        affine * Point::new(rw, rh),
    ];
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    if !(min_x.is_finite() && max_x.is_finite() && min_y.is_finite() && max_y.is_finite()) {
        return 0;
    }

    let x_start = min_x.floor().max(0.0) as u32;
    let y_start = min_y.floor().max(0.0) as u32;
    let x_end = (max_x.ceil().max(0.0) as u32).min(dst.width);
    let y_end = (max_y.ceil().max(0.0) as u32).min(dst.height);

    let ox = f64::from(region.x0);
    let oy = f64::from(region.y0);
    let mut written = 0u64;
    for y in y_start..y_end {
        for x in x_start..x_end {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if p.x < 0.0 || p.y < 0.0 || p.x >= rw || p.y >= rh {
                continue;
            }
            let texel = match filter {
                TexFilter::Nearest => sample_nearest(src, region, ox + p.x, oy + p.y),
                TexFilter::Linear => sample_linear(src, region, ox + p.x, oy + p.y),
            };
            let texel = color_m
                .apply(Rgba8Premul::from_array(texel))
                .to_array();

            let idx = ((y as usize) * (dst.width as usize) + (x as usize)) * 4;
            let px = &mut dst.data[idx..idx + 4];
            let out = composite_px(op, texel, [px[0], px[1], px[2], px[3]]);
            px.copy_from_slice(&out);
            written += 1;
        }
    }
    written
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
