use crate::render::backend::{CompositeOp, DrawCall, TexFilter, TexelRect, TextureId};
use crate::transform::color_m::ColorM;
use smallvec::SmallVec;

/// State shared by every quad of one batch.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct BatchKey {
    pub(crate) dst: TextureId,
    pub(crate) src: TextureId,
    pub(crate) color_m: ColorM,
    pub(crate) op: CompositeOp,
    pub(crate) filter: TexFilter,
}

/// Per-draw placement: sampled region and affine coefficients.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Quad {
    pub(crate) region: TexelRect,
    pub(crate) geom: [f64; 6],
}

#[derive(Clone, Debug)]
pub(crate) struct DrawBatch {
    pub(crate) key: BatchKey,
    pub(crate) quads: SmallVec<[Quad; 4]>,
}

impl DrawCall {
    fn split(self) -> (BatchKey, Quad) {
        (
            BatchKey {
                dst: self.dst,
                src: self.src,
                color_m: self.color_m,
                op: self.op,
                filter: self.filter,
            },
            Quad {
                region: self.region,
                geom: self.geom,
            },
        )
    }
}

/// Pending draws in submission order.
///
/// Consecutive draws with an equal [`BatchKey`] are merged into one batch. Anything that is not
/// a draw (pixel replacement, read-back, disposal) must flush the queue first, so merging never
/// reorders observable effects.
#[derive(Debug, Default)]
pub(crate) struct CommandQueue {
    batches: Vec<DrawBatch>,
    merge: bool,
}

impl CommandQueue {
    pub(crate) fn new(merge: bool) -> Self {
        Self {
            batches: Vec::new(),
            merge,
        }
    }

    pub(crate) fn push(&mut self, call: DrawCall) {
        let (key, quad) = call.split();
        if self.merge
            && let Some(last) = self.batches.last_mut()
            && last.key == key
        {
            last.quads.push(quad);
            return;
        }
        let mut quads = SmallVec::new();
        quads.push(quad);
        self.batches.push(DrawBatch { key, quads });
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.batches.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.batches.len()
    }

    /// Return `true` if a pending draw reads from or writes to `id`.
    pub(crate) fn references(&self, id: TextureId) -> bool {
        self.batches
            .iter()
            .any(|b| b.key.dst == id || b.key.src == id)
    }

    pub(crate) fn take(&mut self) -> Vec<DrawBatch> {
        std::mem::take(&mut self.batches)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/queue.rs"]
mod tests;
