//! Texture backends: the boundary trait and the CPU texture manager.
//!
//! Image handles never touch pixels directly. They resolve each request into a [`DrawCall`]
//! (or a pixel upload/read-back) and hand it to a [`TextureBackend`].

/// Backend boundary types and trait.
pub mod backend;
pub(crate) mod composite;
/// CPU texture manager.
pub mod cpu;
pub(crate) mod queue;

pub use backend::{
    BackendKind, BlendFactor, CompositeOp, DrawCall, TexFilter, TexelRect, TextureBackend,
    TextureId, TextureStats, create_backend,
};
pub use cpu::{CpuTextures, TextureOpts};
