//! Tessera is a small 2D image-compositing layer over a batched texture backend.
//!
//! An [`Image`] is a rectangle of alpha-premultiplied RGBA8 pixels. Images are drawn onto each
//! other with [`Image::draw_image`], which accepts:
//!
//! - a [`GeoM`] affine transform
//! - a [`ColorM`] 4x5 color matrix
//! - a [`CompositeMode`] (Porter-Duff) and a sampling [`Filter`]
//! - an optional [`SourceRect`] sub-region of the source
//!
//! Draws are queued by the backend and merged into batches when consecutive draws share the
//! same destination, source and render state. Reads and uploads flush the queue first, so every
//! observable pixel reflects all draws issued before it.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Image handles and draw options.
pub mod image;
/// Texture backends.
pub mod render;
/// Geometry and color matrices.
pub mod transform;

pub use crate::foundation::core::{Affine, Point, Rect, Rgba8Premul, Vec2};
pub use crate::foundation::error::{TesseraError, TesseraResult};

pub use crate::image::{CompositeMode, DrawImageOptions, Filter, Graphics, Image, SourceRect};
pub use crate::render::backend::{BackendKind, TextureBackend, TextureStats};
pub use crate::render::cpu::{CpuTextures, TextureOpts};
pub use crate::transform::color_m::ColorM;
pub use crate::transform::geo_m::GeoM;
