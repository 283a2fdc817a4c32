//! Error types for edgematch.

use thiserror::Error;

/// Result alias for edgematch operations.
pub type EdgeMatchResult<T> = std::result::Result<T, EdgeMatchError>;

/// Errors that can occur while building descriptors or matching.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdgeMatchError {
    /// Width or height is zero or overflows the address space.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// Row stride is shorter than the row width.
    #[error("invalid stride {stride} for width {width}")]
    InvalidStride { width: usize, stride: usize },
    /// Backing buffer holds fewer samples than the view requires.
    #[error("buffer too small: needed {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// Kernel side is even or zero, or the weight count is not `side * side`.
    #[error("invalid kernel: side {side} with {len} weights")]
    InvalidKernel { side: usize, len: usize },
    /// A kernel bank must hold at least one kernel.
    #[error("kernel bank is empty")]
    EmptyKernelBank,
    /// Two buffers that must share a shape do not.
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: (usize, usize),
        got: (usize, usize),
    },
    /// Two descriptors carry a different number of channels.
    #[error("channel mismatch: expected {expected}, got {got}")]
    ChannelMismatch { expected: usize, got: usize },
    /// The image could not be opened or decoded.
    #[error("failed to load image {path}: {reason}")]
    ImageIo { path: String, reason: String },
    /// No image is registered under the requested path.
    #[error("image not found: {path}")]
    ImageNotFound { path: String },
    /// The pipeline configuration is inconsistent.
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}
