use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::image::draw::resolve_draw;
use crate::image::options::{CompositeMode, DrawImageOptions};
use crate::render::backend::{TextureBackend, TextureId};
use std::cell::Cell;

/// Edge length of the shared transparent source texture.
pub(crate) const FILL_SOURCE_EDGE: u32 = 16;

/// Fills up to this many pixels upload a solid buffer instead of compositing.
pub(crate) const DIRECT_FILL_MAX_PIXELS: u64 = 256;

/// Transparent texture used as the source of large fills.
///
/// Allocated on first use and owned by one `Graphics` context. It is never handed out as an
/// `Image`, so it can never be the destination of a fill or draw (which would composite it
/// onto itself forever).
#[derive(Debug, Default)]
pub(crate) struct FillSource {
    id: Cell<Option<TextureId>>,
}

impl FillSource {
    fn get_or_alloc(&self, backend: &mut dyn TextureBackend) -> TesseraResult<TextureId> {
        if let Some(id) = self.id.get() {
            return Ok(id);
        }
        let id = backend.allocate(FILL_SOURCE_EDGE, FILL_SOURCE_EDGE)?;
        self.id.set(Some(id));
        Ok(id)
    }

    pub(crate) fn is(&self, id: TextureId) -> bool {
        self.id.get() == Some(id)
    }
}

/// Fill `dst` (of size `dst_size`) with a solid premultiplied color.
///
/// Small targets get a direct pixel upload. Larger ones composite the scaled fill source with
/// a color-matrix translation in `Copy` mode, which overwrites every pixel.
pub(crate) fn fill_texture(
    backend: &mut dyn TextureBackend,
    source: &FillSource,
    dst: TextureId,
    dst_size: (u32, u32),
    color: Rgba8Premul,
) -> TesseraResult<()> {
    if source.is(dst) {
        return Err(TesseraError::misuse("the fill source cannot be filled"));
    }
    let (wd, hd) = dst_size;
    let pixels = u64::from(wd) * u64::from(hd);

    if pixels <= DIRECT_FILL_MAX_PIXELS {
        // Uploading keeps the texture cheap to share; a draw would not.
        let buf = color.to_array().repeat(pixels as usize);
        return backend.replace_pixels(dst, &buf);
    }

    let src = source.get_or_alloc(backend)?;
    let (ws, hs) = backend.size(src)?;

    let mut op = DrawImageOptions::default();
    op.geo_m
        .scale(f64::from(wd) / f64::from(ws), f64::from(hd) / f64::from(hs));
    if color.a > 0 {
        let a = f32::from(color.a);
        op.color_m.translate(
            f32::from(color.r) / a,
            f32::from(color.g) / a,
            f32::from(color.b) / a,
            a / 255.0,
        );
    }
    op.composite_mode = CompositeMode::Copy;

    backend.draw_image(resolve_draw(dst, src, (ws, hs), &op))
}

#[cfg(test)]
#[path = "../../tests/unit/image/fill.rs"]
mod tests;
