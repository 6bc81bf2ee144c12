/// Convenience result type used across Tessera.
pub type TesseraResult<T> = Result<T, TesseraError>;

/// Top-level error taxonomy used by image and texture APIs.
///
/// Operations on a disposed destination are not errors: they succeed as no-ops.
#[derive(thiserror::Error, Debug)]
pub enum TesseraError {
    /// Width or height outside `1..=max` at allocation time.
    #[error("invalid image size: {width}x{height} (allowed 1..={max})")]
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
        /// Device-dependent maximum edge length.
        max: u32,
    },

    /// Programmer error: disposed draw source, drawing an image onto itself, stale texture ids.
    #[error("misuse: {0}")]
    Misuse(String),

    /// Pixel buffer length does not equal `4 * width * height`.
    #[error("pixel buffer size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        /// Required byte length.
        expected: usize,
        /// Byte length that was supplied.
        actual: usize,
    },

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TesseraError {
    /// Build a [`TesseraError::Misuse`] value.
    pub fn misuse(msg: impl Into<String>) -> Self {
        Self::Misuse(msg.into())
    }

    /// Build a [`TesseraError::InvalidSize`] value.
    pub fn invalid_size(width: u32, height: u32, max: u32) -> Self {
        Self::InvalidSize { width, height, max }
    }

    /// Build a [`TesseraError::SizeMismatch`] value.
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::SizeMismatch { expected, actual }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
