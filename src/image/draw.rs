use crate::image::options::DrawImageOptions;
use crate::render::backend::{DrawCall, TexelRect, TextureId};
use crate::transform::geo_m::GeoM;

/// Resolve draw options against the source size into a backend [`DrawCall`].
///
/// The region starts as the whole source; a set [`crate::SourceRect`] replaces the lower bound
/// and clips the upper bound. A negative lower bound is clamped to zero and the geometry gets a
/// compensating translation applied before the caller's matrix, so placement is unchanged and
/// no texel outside the source is ever sampled.
pub(crate) fn resolve_draw(
    dst: TextureId,
    src: TextureId,
    src_size: (u32, u32),
    opts: &DrawImageOptions,
) -> DrawCall {
    let (w, h) = src_size;
    let (mut sx0, mut sy0, mut sx1, mut sy1) = (0i32, 0i32, w as i32, h as i32);
    if let Some((x0, y0, x1, y1)) = opts.source_rect.get() {
        sx0 = x0;
        sy0 = y0;
        sx1 = sx1.min(x1);
        sy1 = sy1.min(y1);
    }

    let mut geo_m = opts.geo_m;
    if sx0 < 0 || sy0 < 0 {
        let dx = if sx0 < 0 { f64::from(sx0.unsigned_abs()) } else { 0.0 };
        let dy = if sy0 < 0 { f64::from(sy0.unsigned_abs()) } else { 0.0 };
        sx0 = sx0.max(0);
        sy0 = sy0.max(0);
        geo_m = GeoM::new();
        geo_m.translate(dx, dy);
        geo_m.concat(&opts.geo_m);
    }

    let (a, b, c, d, tx, ty) = geo_m.elements();
    DrawCall {
        dst,
        src,
        region: TexelRect {
            x0: sx0,
            y0: sy0,
            x1: sx1,
            y1: sy1,
        },
        geom: [a, b, c, d, tx, ty],
        color_m: opts.color_m,
        op: opts.composite_mode.into(),
        filter: opts.filter.into(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/image/draw.rs"]
mod tests;
