//! Image handles, the rendering context, and draw options.

pub(crate) mod draw;
pub(crate) mod fill;
/// [`Image`] and [`Graphics`].
pub mod handle;
/// Options accepted by [`Image::draw_image`].
pub mod options;

pub use handle::{Graphics, Image};
pub use options::{CompositeMode, DrawImageOptions, Filter, SourceRect};
