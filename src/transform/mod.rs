//! Geometry and color matrices used by draw options.

/// Color matrix.
pub mod color_m;
/// Geometry matrix.
pub mod geo_m;
