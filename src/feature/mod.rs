//! Directional gradients, their aggregation, and the resulting descriptor.

use crate::filter::{convolve, Sample};
use crate::image::{ImageView, OwnedImage};
use crate::kernel::KernelBank;
use crate::util::{EdgeMatchError, EdgeMatchResult};

/// Applies every kernel of `bank` to `image`, in bank order.
pub fn extract_gradients<T: Sample>(image: ImageView<'_, T>, bank: &KernelBank) -> Vec<OwnedImage<T>> {
    bank.kernels()
        .iter()
        .map(|kernel| convolve(image, kernel))
        .collect()
}

/// Combines gradient buffers into one edge-strength buffer.
///
/// Four channels combine as `sqrt(sum of squares)` per pixel. A single
/// channel is returned unchanged (widened to `f32`), so a lone edge kernel
/// keeps its signed response.
///
/// # Panics
///
/// Panics if `gradients` is empty or the buffers differ in shape.
pub fn edge_magnitude<T: Sample>(gradients: &[OwnedImage<T>]) -> OwnedImage<f32> {
    let first = gradients.first().expect("at least one gradient buffer");
    let (width, height) = first.shape();
    assert!(
        gradients.iter().all(|g| g.shape() == (width, height)),
        "gradient buffers must share a shape"
    );

    if gradients.len() == 1 {
        return widen(first);
    }

    let mut out = OwnedImage::<f32>::zeroed(width, height);
    for (idx, dst) in out.data_mut().iter_mut().enumerate() {
        let sum_sq: f32 = gradients
            .iter()
            .map(|g| {
                let v = g.data()[idx].to_f32();
                v * v
            })
            .sum();
        *dst = sum_sq.sqrt();
    }
    out
}

pub(crate) fn widen<T: Sample>(image: &OwnedImage<T>) -> OwnedImage<f32> {
    let mut out = OwnedImage::<f32>::zeroed(image.width(), image.height());
    for (dst, &src) in out.data_mut().iter_mut().zip(image.data()) {
        *dst = src.to_f32();
    }
    out
}

/// Comparison-ready representation of one image.
///
/// Holds one or more `f32` channels of identical shape: a single edge
/// magnitude, or one buffer per kernel direction.
#[derive(Clone, Debug, PartialEq)]
pub struct Descriptor {
    channels: Vec<OwnedImage<f32>>,
}

impl Descriptor {
    /// Builds a descriptor from equally shaped channels.
    pub fn new(channels: Vec<OwnedImage<f32>>) -> EdgeMatchResult<Self> {
        let first = channels.first().ok_or(EdgeMatchError::ChannelMismatch {
            expected: 1,
            got: 0,
        })?;
        let shape = first.shape();
        if let Some(bad) = channels.iter().find(|c| c.shape() != shape) {
            return Err(EdgeMatchError::ShapeMismatch {
                expected: shape,
                got: bad.shape(),
            });
        }
        Ok(Self { channels })
    }

    /// Descriptor made of a single buffer.
    pub fn single(channel: OwnedImage<f32>) -> Self {
        Self {
            channels: vec![channel],
        }
    }

    /// Caller guarantees a non-empty list of equally shaped channels.
    pub(crate) fn from_channels(channels: Vec<OwnedImage<f32>>) -> Self {
        debug_assert!(!channels.is_empty());
        Self { channels }
    }

    /// Channels in extraction order.
    pub fn channels(&self) -> &[OwnedImage<f32>] {
        &self.channels
    }

    /// Number of channels.
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Shared `(width, height)` of every channel.
    pub fn shape(&self) -> (usize, usize) {
        self.channels[0].shape()
    }
}
