use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::TesseraResult;
use crate::image::options::{CompositeMode, Filter};
use crate::render::cpu::{CpuTextures, TextureOpts};
use crate::transform::color_m::ColorM;

/// Generation-checked handle to a backing texture.
///
/// Ids become stale once the texture is disposed; reusing a stale id is reported as misuse
/// instead of touching whatever texture now occupies the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

/// Integer texel bounds `[x0, x1) x [y0, y1)` inside a source texture.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct TexelRect {
    /// Left edge (inclusive).
    pub x0: i32,
    /// Top edge (inclusive).
    pub y0: i32,
    /// Right edge (exclusive).
    pub x1: i32,
    /// Bottom edge (exclusive).
    pub y1: i32,
}

impl TexelRect {
    /// Width in texels, zero when inverted. Saturates at `i32::MAX`.
    pub fn width(self) -> i32 {
        self.x1.saturating_sub(self.x0).max(0)
    }

    /// Height in texels, zero when inverted.
    pub fn height(self) -> i32 {
        self.y1.saturating_sub(self.y0).max(0)
    }

    /// Return `true` when no texel can be sampled.
    pub fn is_empty(self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Porter-Duff blend factor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlendFactor {
    /// `0`
    Zero,
    /// `1`
    One,
    /// Source alpha.
    SrcAlpha,
    /// `1 - source alpha`.
    OneMinusSrcAlpha,
    /// Destination alpha.
    DstAlpha,
    /// `1 - destination alpha`.
    OneMinusDstAlpha,
}

impl BlendFactor {
    pub(crate) fn eval(self, sa: f32, da: f32) -> f32 {
        match self {
            Self::Zero => 0.0,
            Self::One => 1.0,
            Self::SrcAlpha => sa,
            Self::OneMinusSrcAlpha => 1.0 - sa,
            Self::DstAlpha => da,
            Self::OneMinusDstAlpha => 1.0 - da,
        }
    }
}

/// Backend-side composite operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompositeOp {
    /// `src + dst * (1 - sa)`
    SourceOver,
    /// `0`
    Clear,
    /// `src`
    Copy,
    /// `dst`
    Destination,
    /// `src * (1 - da) + dst`
    DestinationOver,
    /// `src * da`
    SourceIn,
    /// `dst * sa`
    DestinationIn,
    /// `src * (1 - da)`
    SourceOut,
    /// `dst * (1 - sa)`
    DestinationOut,
    /// `src * da + dst * (1 - sa)`
    SourceAtop,
    /// `src * (1 - da) + dst * sa`
    DestinationAtop,
    /// `src * (1 - da) + dst * (1 - sa)`
    Xor,
    /// `src + dst`
    Lighter,
}

impl CompositeOp {
    /// `(source factor, destination factor)` for this operator.
    pub fn factors(self) -> (BlendFactor, BlendFactor) {
        use BlendFactor::*;
        match self {
            Self::SourceOver => (One, OneMinusSrcAlpha),
            Self::Clear => (Zero, Zero),
            Self::Copy => (One, Zero),
            Self::Destination => (Zero, One),
            Self::DestinationOver => (OneMinusDstAlpha, One),
            Self::SourceIn => (DstAlpha, Zero),
            Self::DestinationIn => (Zero, SrcAlpha),
            Self::SourceOut => (OneMinusDstAlpha, Zero),
            Self::DestinationOut => (Zero, OneMinusSrcAlpha),
            Self::SourceAtop => (DstAlpha, OneMinusSrcAlpha),
            Self::DestinationAtop => (OneMinusDstAlpha, SrcAlpha),
            Self::Xor => (OneMinusDstAlpha, OneMinusSrcAlpha),
            Self::Lighter => (One, One),
        }
    }
}

impl From<CompositeMode> for CompositeOp {
    fn from(mode: CompositeMode) -> Self {
        match mode {
            CompositeMode::SourceOver => Self::SourceOver,
            CompositeMode::Clear => Self::Clear,
            CompositeMode::Copy => Self::Copy,
            CompositeMode::Destination => Self::Destination,
            CompositeMode::DestinationOver => Self::DestinationOver,
            CompositeMode::SourceIn => Self::SourceIn,
            CompositeMode::DestinationIn => Self::DestinationIn,
            CompositeMode::SourceOut => Self::SourceOut,
            CompositeMode::DestinationOut => Self::DestinationOut,
            CompositeMode::SourceAtop => Self::SourceAtop,
            CompositeMode::DestinationAtop => Self::DestinationAtop,
            CompositeMode::Xor => Self::Xor,
            CompositeMode::Lighter => Self::Lighter,
        }
    }
}

/// Backend-side texture filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TexFilter {
    /// Nearest texel.
    Nearest,
    /// Bilinear interpolation between the four nearest texels.
    Linear,
}

impl From<Filter> for TexFilter {
    fn from(filter: Filter) -> Self {
        match filter {
            Filter::Nearest => Self::Nearest,
            Filter::Linear => Self::Linear,
        }
    }
}

/// Fully-resolved draw primitive handed to a [`TextureBackend`].
///
/// The source region is drawn with its top-left texel at `(0, 0)` and then placed by the
/// affine `geom = (a, b, c, d, tx, ty)`. Values carry no hidden state, so consecutive calls can
/// be compared and merged by the backend.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    /// Destination texture.
    pub dst: TextureId,
    /// Source texture.
    pub src: TextureId,
    /// Sampled source region, already clipped to the source bounds.
    pub region: TexelRect,
    /// `(a, b, c, d, tx, ty)` with `x' = a*x + b*y + tx`, `y' = c*x + d*y + ty`.
    pub geom: [f64; 6],
    /// Color matrix applied to every sampled texel.
    pub color_m: ColorM,
    /// Composite operator.
    pub op: CompositeOp,
    /// Sampling filter.
    pub filter: TexFilter,
}

/// Texture manager counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextureStats {
    /// Textures currently alive.
    pub live_textures: usize,
    /// Textures allocated since creation.
    pub textures_allocated: u64,
    /// Textures released since creation.
    pub textures_disposed: u64,
    /// `draw_image` calls accepted.
    pub draws_requested: u64,
    /// Draw submissions executed after batching.
    pub batches_executed: u64,
    /// Quads rasterized.
    pub quads_rasterized: u64,
    /// Non-empty queue flushes.
    pub flushes: u64,
}

/// Boundary between image handles and the texture allocator that owns pixel storage.
///
/// Pixel data is premultiplied RGBA8, row-major, top-left origin. Implementations may defer
/// draws, but every read and every pixel replacement must observe previously submitted draws
/// in submission order.
pub trait TextureBackend {
    /// Largest accepted width or height.
    fn max_texture_size(&self) -> u32;

    /// Allocate a transparent texture that keeps its contents across frames.
    fn allocate(&mut self, width: u32, height: u32) -> TesseraResult<TextureId>;

    /// Allocate a transparent texture whose contents are cleared at every frame start.
    fn allocate_volatile(&mut self, width: u32, height: u32) -> TesseraResult<TextureId>;

    /// Texture dimensions.
    fn size(&self, id: TextureId) -> TesseraResult<(u32, u32)>;

    /// Overwrite the whole texture with `pixels` (`4 * width * height` bytes).
    fn replace_pixels(&mut self, id: TextureId, pixels: &[u8]) -> TesseraResult<()>;

    /// Read one pixel. Out-of-bounds coordinates read as transparent.
    fn at(&mut self, id: TextureId, x: i32, y: i32) -> TesseraResult<Rgba8Premul>;

    /// Read the whole texture.
    fn read_pixels(&mut self, id: TextureId) -> TesseraResult<Vec<u8>>;

    /// Submit a resolved draw.
    fn draw_image(&mut self, call: DrawCall) -> TesseraResult<()>;

    /// Release a texture. Stale ids are ignored.
    fn dispose(&mut self, id: TextureId);

    /// Execute every pending draw.
    fn flush(&mut self) -> TesseraResult<()>;

    /// Start a new frame: pending work is flushed and volatile textures are cleared.
    fn begin_frame(&mut self) -> TesseraResult<()>;

    /// Current counters.
    fn stats(&self) -> TextureStats;
}

/// Available backend kinds.
///
/// - `Cpu` is always available.
#[derive(Clone, Copy, Debug, Default)]
pub enum BackendKind {
    /// CPU texture manager backed by `vello_cpu` pixmaps.
    #[default]
    Cpu,
}

/// Create a texture backend implementation.
pub fn create_backend(kind: BackendKind, opts: TextureOpts) -> Box<dyn TextureBackend> {
    match kind {
        BackendKind::Cpu => Box::new(CpuTextures::new(opts)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
