use crate::foundation::core::Rgba8Premul;
use crate::foundation::error::{TesseraError, TesseraResult};
use crate::foundation::math::rgba8_byte_len;
use crate::render::backend::{DrawCall, TextureBackend, TextureId, TextureStats};
use crate::render::composite::{TexView, TexViewMut, draw_quad};
use crate::render::queue::{CommandQueue, DrawBatch};

/// Largest edge a `vello_cpu::Pixmap` can hold.
const PIXMAP_MAX_EDGE: u32 = u16::MAX as u32;

/// Options for the CPU texture manager.
///
/// Deserializes from partial JSON; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextureOpts {
    /// Device-dependent maximum width/height accepted by allocation.
    pub max_texture_size: u32,
    /// Merge consecutive compatible draws into one submission.
    pub batch_draws: bool,
}

impl Default for TextureOpts {
    fn default() -> Self {
        Self {
            max_texture_size: 4096,
            batch_draws: true,
        }
    }
}

impl TextureOpts {
    /// Defaults, with `TESSERA_MAX_TEXTURE_SIZE` applied when it parses as a positive integer.
    pub fn from_env() -> Self {
        let mut opts = Self::default();
        if let Some(n) = std::env::var("TESSERA_MAX_TEXTURE_SIZE")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0)
        {
            opts.max_texture_size = n;
        }
        opts
    }

    /// Return options with a different maximum texture edge.
    pub fn with_max_texture_size(mut self, max: u32) -> Self {
        self.max_texture_size = max;
        self
    }

    /// Return options with draw batching switched on or off.
    pub fn with_batch_draws(mut self, batch: bool) -> Self {
        self.batch_draws = batch;
        self
    }
}

struct Texture {
    pixmap: vello_cpu::Pixmap,
    volatile: bool,
}

impl Texture {
    fn width(&self) -> u32 {
        u32::from(self.pixmap.width())
    }

    fn height(&self) -> u32 {
        u32::from(self.pixmap.height())
    }
}

#[derive(Default)]
struct Slot {
    generation: u32,
    texture: Option<Texture>,
}

/// Reference texture manager that keeps every texture in host memory.
///
/// Draws are queued and merged; the queue is executed before any operation that could observe
/// or change pixels a pending draw depends on.
pub struct CpuTextures {
    opts: TextureOpts,
    slots: Vec<Slot>,
    free: Vec<u32>,
    queue: CommandQueue,
    stats: TextureStats,
}

impl std::fmt::Debug for CpuTextures {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuTextures")
            .field("opts", &self.opts)
            .field("slots", &self.slots.len())
            .field("pending_batches", &self.queue.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl CpuTextures {
    /// Create an empty texture manager.
    pub fn new(mut opts: TextureOpts) -> Self {
        if opts.max_texture_size > PIXMAP_MAX_EDGE {
            tracing::warn!(
                requested = opts.max_texture_size,
                clamped = PIXMAP_MAX_EDGE,
                "max_texture_size exceeds pixmap limit"
            );
            opts.max_texture_size = PIXMAP_MAX_EDGE;
        }
        Self {
            queue: CommandQueue::new(opts.batch_draws),
            opts,
            slots: Vec::new(),
            free: Vec::new(),
            stats: TextureStats::default(),
        }
    }

    /// Options in effect (after clamping).
    pub fn opts(&self) -> TextureOpts {
        self.opts
    }

    fn alloc(&mut self, width: u32, height: u32, volatile: bool) -> TesseraResult<TextureId> {
        let max = self.opts.max_texture_size;
        if width < 1 || height < 1 || width > max || height > max {
            return Err(TesseraError::invalid_size(width, height, max));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| TesseraError::invalid_size(width, height, max))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| TesseraError::invalid_size(width, height, max))?;
        let texture = Texture {
            pixmap: vello_cpu::Pixmap::new(w, h),
            volatile,
        };

        let index = match self.free.pop() {
            Some(i) => i,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };
        let slot = &mut self.slots[index as usize];
        slot.texture = Some(texture);
        let id = TextureId {
            index,
            generation: slot.generation,
        };

        self.stats.live_textures += 1;
        self.stats.textures_allocated = self.stats.textures_allocated.saturating_add(1);
        tracing::debug!(?id, width, height, volatile, "texture allocated");
        Ok(id)
    }

    fn texture(&self, id: TextureId) -> TesseraResult<&Texture> {
        self.slots
            .get(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.texture.as_ref())
            .ok_or_else(|| TesseraError::misuse(format!("stale texture id {id:?}")))
    }

    fn texture_mut(&mut self, id: TextureId) -> TesseraResult<&mut Texture> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|s| s.generation == id.generation)
            .and_then(|s| s.texture.as_mut())
            .ok_or_else(|| TesseraError::misuse(format!("stale texture id {id:?}")))
    }

    fn execute_pending(&mut self) {
        if self.queue.is_empty() {
            return;
        }
        let batches = self.queue.take();
        tracing::trace!(batches = batches.len(), "flushing draw queue");
        for batch in &batches {
            self.execute_batch(batch);
        }
        self.stats.flushes = self.stats.flushes.saturating_add(1);
    }

    fn execute_batch(&mut self, batch: &DrawBatch) {
        let key = batch.key;
        // Take the destination out of its slot so the source can be borrowed alongside it.
        let Some(mut dst) = self
            .slots
            .get_mut(key.dst.index as usize)
            .filter(|s| s.generation == key.dst.generation)
            .and_then(|s| s.texture.take())
        else {
            tracing::debug!(dst = ?key.dst, "skipping batch for released destination");
            return;
        };

        let mut written = 0u64;
        if let Ok(src) = self.texture(key.src) {
            let (dw, dh) = (dst.width(), dst.height());
            let mut dst_view = TexViewMut {
                data: dst.pixmap.data_as_u8_slice_mut(),
                width: dw,
                height: dh,
            };
            let src_view = TexView {
                data: src.pixmap.data_as_u8_slice(),
                width: src.width(),
                height: src.height(),
            };
            for quad in &batch.quads {
                written += draw_quad(
                    &mut dst_view,
                    src_view,
                    quad,
                    &key.color_m,
                    key.op,
                    key.filter,
                );
            }
        } else {
            tracing::debug!(src = ?key.src, "skipping batch for released source");
        }

        self.slots[key.dst.index as usize].texture = Some(dst);
        self.stats.batches_executed = self.stats.batches_executed.saturating_add(1);
        self.stats.quads_rasterized = self
            .stats
            .quads_rasterized
            .saturating_add(batch.quads.len() as u64);
        tracing::trace!(
            dst = ?key.dst,
            src = ?key.src,
            quads = batch.quads.len(),
            pixels = written,
            "batch executed"
        );
    }
}

impl TextureBackend for CpuTextures {
    fn max_texture_size(&self) -> u32 {
        self.opts.max_texture_size
    }

    fn allocate(&mut self, width: u32, height: u32) -> TesseraResult<TextureId> {
        self.alloc(width, height, false)
    }

    fn allocate_volatile(&mut self, width: u32, height: u32) -> TesseraResult<TextureId> {
        self.alloc(width, height, true)
    }

    fn size(&self, id: TextureId) -> TesseraResult<(u32, u32)> {
        let t = self.texture(id)?;
        Ok((t.width(), t.height()))
    }

    fn replace_pixels(&mut self, id: TextureId, pixels: &[u8]) -> TesseraResult<()> {
        let (w, h) = self.size(id)?;
        let expected = rgba8_byte_len(w, h)
            .ok_or_else(|| TesseraError::Other(anyhow::anyhow!("texture byte size overflow")))?;
        if pixels.len() != expected {
            return Err(TesseraError::size_mismatch(expected, pixels.len()));
        }
        // Pending draws sampled the old contents; they must land first.
        self.execute_pending();
        self.texture_mut(id)?
            .pixmap
            .data_as_u8_slice_mut()
            .copy_from_slice(pixels);
        Ok(())
    }

    fn at(&mut self, id: TextureId, x: i32, y: i32) -> TesseraResult<Rgba8Premul> {
        self.texture(id)?;
        self.execute_pending();
        let t = self.texture(id)?;
        let (w, h) = (t.width() as i32, t.height() as i32);
        if x < 0 || y < 0 || x >= w || y >= h {
            return Ok(Rgba8Premul::transparent());
        }
        let idx = ((y as usize) * (w as usize) + (x as usize)) * 4;
        let data = t.pixmap.data_as_u8_slice();
        Ok(Rgba8Premul::new(
            data[idx],
            data[idx + 1],
            data[idx + 2],
            data[idx + 3],
        ))
    }

    fn read_pixels(&mut self, id: TextureId) -> TesseraResult<Vec<u8>> {
        self.texture(id)?;
        self.execute_pending();
        Ok(self.texture(id)?.pixmap.data_as_u8_slice().to_vec())
    }

    fn draw_image(&mut self, call: DrawCall) -> TesseraResult<()> {
        if call.dst == call.src {
            return Err(TesseraError::misuse(
                "draw_image source and destination must differ",
            ));
        }
        self.texture(call.src)?;
        self.texture(call.dst)?;
        self.stats.draws_requested = self.stats.draws_requested.saturating_add(1);
        if call.region.is_empty() {
            return Ok(());
        }
        self.queue.push(call);
        Ok(())
    }

    fn dispose(&mut self, id: TextureId) {
        if self.texture(id).is_err() {
            return;
        }
        if self.queue.references(id) {
            self.execute_pending();
        }
        let slot = &mut self.slots[id.index as usize];
        slot.texture = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);

        self.stats.live_textures = self.stats.live_textures.saturating_sub(1);
        self.stats.textures_disposed = self.stats.textures_disposed.saturating_add(1);
        tracing::debug!(?id, "texture disposed");
    }

    #[tracing::instrument(level = "trace", skip(self))]
    fn flush(&mut self) -> TesseraResult<()> {
        self.execute_pending();
        Ok(())
    }

    fn begin_frame(&mut self) -> TesseraResult<()> {
        self.execute_pending();
        let mut cleared = 0usize;
        for t in self.slots.iter_mut().filter_map(|s| s.texture.as_mut()) {
            if t.volatile {
                t.pixmap.data_as_u8_slice_mut().fill(0);
                cleared += 1;
            }
        }
        tracing::debug!(volatile_cleared = cleared, "frame started");
        Ok(())
    }

    fn stats(&self) -> TextureStats {
        self.stats
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
