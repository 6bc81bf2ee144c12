use crate::foundation::core::{Rect, Rgba8Premul};
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::math::rgba8_byte_len;
use crate::image::draw::resolve_draw;
use crate::image::fill::{FillSource, fill_texture};
use crate::image::options::DrawImageOptions;
use crate::render::backend::{BackendKind, TextureBackend, TextureId, TextureStats, create_backend};
use crate::render::cpu::TextureOpts;
use std::cell::{RefCell, RefMut};
use std::rc::Rc;

struct GraphicsInner {
    backend: RefCell<Box<dyn TextureBackend>>,
    fill_source: FillSource,
}

/// Rendering context that owns the texture backend.
///
/// Cloning is cheap and yields another reference to the same context. Every [`Image`] keeps
/// its context alive. A context is meant to be driven from one render thread.
#[derive(Clone)]
pub struct Graphics {
    inner: Rc<GraphicsInner>,
}

impl std::fmt::Debug for Graphics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stats = self.inner.backend.try_borrow().map(|b| b.stats()).ok();
        f.debug_struct("Graphics")
            .field("stats", &stats)
            .finish_non_exhaustive()
    }
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new(TextureOpts::default())
    }
}

impl Graphics {
    /// Create a context backed by the CPU texture manager.
    pub fn new(opts: TextureOpts) -> Self {
        Self::with_backend(create_backend(BackendKind::Cpu, opts))
    }

    /// Create a context over any backend.
    pub fn with_backend(backend: Box<dyn TextureBackend>) -> Self {
        Self {
            inner: Rc::new(GraphicsInner {
                backend: RefCell::new(backend),
                fill_source: FillSource::default(),
            }),
        }
    }

    /// Largest accepted image width or height.
    pub fn max_texture_size(&self) -> u32 {
        self.inner.backend.borrow().max_texture_size()
    }

    /// Execute every pending draw.
    pub fn flush(&self) -> TesseraResult<()> {
        self.backend().flush()
    }

    /// Start a new frame. Volatile images are cleared.
    pub fn begin_frame(&self) -> TesseraResult<()> {
        self.backend().begin_frame()
    }

    /// Backend counters.
    pub fn stats(&self) -> TextureStats {
        self.inner.backend.borrow().stats()
    }

    fn backend(&self) -> RefMut<'_, Box<dyn TextureBackend>> {
        self.inner.backend.borrow_mut()
    }

    fn same_context(&self, other: &Graphics) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// A rectangle of alpha-premultiplied RGBA pixels backed by a texture.
///
/// `Image` is move-only: it cannot be duplicated, so no two handles ever own the same texture.
/// Dropping it releases the texture; [`Image::dispose`] releases it early.
///
/// After disposal, mutating operations do nothing and reads return transparent pixels.
/// A disposed image used as a draw *source* is an error.
#[derive(Debug)]
pub struct Image {
    gfx: Graphics,
    texture: Option<TextureId>,
    width: u32,
    height: u32,
    volatile: bool,
}

impl Image {
    /// Allocate a transparent image.
    ///
    /// Fails with [`TesseraError::InvalidSize`] when either edge is 0 or above
    /// [`Graphics::max_texture_size`].
    pub fn new(gfx: &Graphics, width: u32, height: u32) -> TesseraResult<Self> {
        let id = gfx.backend().allocate(width, height)?;
        Ok(Self::wrap(gfx, id, width, height, false))
    }

    /// Allocate a transparent volatile image.
    ///
    /// Volatile contents are cleared at every [`Graphics::begin_frame`] and are meant to be
    /// redrawn each frame. By convention a volatile image is only ever a draw destination.
    pub fn new_volatile(gfx: &Graphics, width: u32, height: u32) -> TesseraResult<Self> {
        let id = gfx.backend().allocate_volatile(width, height)?;
        Ok(Self::wrap(gfx, id, width, height, true))
    }

    /// Allocate an image and upload premultiplied RGBA8 pixels.
    pub fn from_premul_pixels(
        gfx: &Graphics,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> TesseraResult<Self> {
        let mut img = Self::new(gfx, width, height)?;
        img.replace_pixels(pixels)?;
        Ok(img)
    }

    /// Allocate an image from a straight-alpha `image::RgbaImage`.
    pub fn from_rgba_image(gfx: &Graphics, source: &::image::RgbaImage) -> TesseraResult<Self> {
        let (width, height) = source.dimensions();
        let mut pixels = Vec::with_capacity(source.as_raw().len());
        for px in source.as_raw().chunks_exact(4) {
            let p = Rgba8Premul::from_straight_rgba(px[0], px[1], px[2], px[3]);
            pixels.extend_from_slice(&p.to_array());
        }
        Self::from_premul_pixels(gfx, width, height, &pixels)
    }

    fn wrap(gfx: &Graphics, id: TextureId, width: u32, height: u32, volatile: bool) -> Self {
        Self {
            gfx: gfx.clone(),
            texture: Some(id),
            width,
            height,
            volatile,
        }
    }

    /// `(width, height)`, or `(0, 0)` once disposed.
    pub fn size(&self) -> (u32, u32) {
        if self.texture.is_none() {
            return (0, 0);
        }
        (self.width, self.height)
    }

    /// Bounds `(0, 0) - (width, height)`; empty once disposed.
    pub fn bounds(&self) -> Rect {
        let (w, h) = self.size();
        Rect::new(0.0, 0.0, f64::from(w), f64::from(h))
    }

    /// Return `true` once [`Image::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.texture.is_none()
    }

    /// Return `true` for images created with [`Image::new_volatile`].
    pub fn is_volatile(&self) -> bool {
        self.volatile
    }

    /// Reset every pixel to transparent. Does nothing once disposed.
    pub fn clear(&mut self) -> TesseraResult<()> {
        self.fill(Rgba8Premul::transparent())
    }

    /// Fill with a solid premultiplied color. Does nothing once disposed.
    pub fn fill(&mut self, color: Rgba8Premul) -> TesseraResult<()> {
        let Some(id) = self.texture else {
            return Ok(());
        };
        let inner = &self.gfx.inner;
        let mut backend = inner.backend.borrow_mut();
        fill_texture(
            &mut **backend,
            &inner.fill_source,
            id,
            (self.width, self.height),
            color,
        )
    }

    /// Draw `src` onto this image. `None` options draw the whole source at `(0, 0)` with
    /// alpha blending and nearest filtering.
    ///
    /// The source pixels at the time of the call are what gets drawn; later changes to `src`
    /// never alter the result.
    ///
    /// Consecutive draws between the same two images with equal color matrix, composite mode
    /// and filter are merged into one backend submission.
    ///
    /// Does nothing when this image is disposed. Fails with [`TesseraError::Misuse`] when `src`
    /// is disposed, shares this image's texture, or belongs to another [`Graphics`].
    pub fn draw_image(
        &mut self,
        src: &Image,
        options: Option<&DrawImageOptions>,
    ) -> TesseraResult<()> {
        let Some(src_id) = src.texture else {
            return Err(TesseraError::misuse(
                "the source image of draw_image must not be disposed",
            ));
        };
        let Some(dst_id) = self.texture else {
            return Ok(());
        };
        if src_id == dst_id {
            return Err(TesseraError::misuse(
                "the source image of draw_image must differ from the destination",
            ));
        }
        if !self.gfx.same_context(&src.gfx) {
            return Err(TesseraError::misuse(
                "draw_image images must share one Graphics context",
            ));
        }

        let default_opts = DrawImageOptions::default();
        let opts = options.unwrap_or(&default_opts);
        let call = resolve_draw(dst_id, src_id, (src.width, src.height), opts);
        self.gfx.backend().draw_image(call)
    }

    /// Replace every pixel with `pixels` (premultiplied RGBA8, row-major).
    ///
    /// `pixels.len()` must equal `4 * width * height`. Does nothing once disposed.
    pub fn replace_pixels(&mut self, pixels: &[u8]) -> TesseraResult<()> {
        let Some(id) = self.texture else {
            return Ok(());
        };
        let expected = rgba8_byte_len(self.width, self.height)
            .ok_or_else(|| TesseraError::Other(anyhow::anyhow!("image byte size overflow")))?;
        if pixels.len() != expected {
            return Err(TesseraError::size_mismatch(expected, pixels.len()));
        }
        self.gfx.backend().replace_pixels(id, pixels)
    }

    /// Read one pixel.
    ///
    /// This flushes pending draws and can be slow. Returns transparent when disposed or when
    /// `(x, y)` is out of bounds.
    pub fn at(&self, x: i32, y: i32) -> TesseraResult<Rgba8Premul> {
        let Some(id) = self.texture else {
            return Ok(Rgba8Premul::transparent());
        };
        self.gfx.backend().at(id, x, y)
    }

    /// Read every pixel as premultiplied RGBA8. Empty once disposed.
    pub fn pixels(&self) -> TesseraResult<Vec<u8>> {
        let Some(id) = self.texture else {
            return Ok(Vec::new());
        };
        self.gfx.backend().read_pixels(id)
    }

    /// Read every pixel into a straight-alpha `image::RgbaImage`. `0x0` once disposed.
    pub fn to_rgba_image(&self) -> TesseraResult<::image::RgbaImage> {
        let (w, h) = self.size();
        let mut raw = self.pixels()?;
        for px in raw.chunks_exact_mut(4) {
            let straight = Rgba8Premul::from_array([px[0], px[1], px[2], px[3]]).to_straight_rgba();
            px.copy_from_slice(&straight);
        }
        ::image::RgbaImage::from_raw(w, h, raw)
            .ok_or_else(|| TesseraError::Other(anyhow::anyhow!("read-back buffer size mismatch")))
    }

    /// Release the backing texture now. Calling it again does nothing.
    pub fn dispose(&mut self) {
        let Some(id) = self.texture.take() else {
            return;
        };
        self.gfx.backend().dispose(id);
    }
}

impl Drop for Image {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/image/handle.rs"]
mod tests;
