//! Image buffers and the image source boundary.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. `OwnedImage` is the
//! contiguous counterpart every pipeline stage produces.

use crate::util::{EdgeMatchError, EdgeMatchResult};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[cfg(feature = "image-io")]
pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> EdgeMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> EdgeMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(EdgeMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> EdgeMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(EdgeMatchError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(EdgeMatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(EdgeMatchError::InvalidDimensions { width, height })
}

/// Owned contiguous single-channel image buffer.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedImage<T> {
    data: Vec<T>,
    width: usize,
    height: usize,
}

impl<T: Copy + Default> OwnedImage<T> {
    /// Wraps a row-major buffer of exactly `width * height` samples.
    pub fn new(data: Vec<T>, width: usize, height: usize) -> EdgeMatchResult<Self> {
        if width == 0 || height == 0 {
            return Err(EdgeMatchError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(EdgeMatchError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(EdgeMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(EdgeMatchError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Allocates a buffer filled with `T::default()`.
    pub(crate) fn zeroed(width: usize, height: usize) -> Self {
        Self {
            data: vec![T::default(); width * height],
            width,
            height,
        }
    }

    /// Copies a strided view into a contiguous buffer.
    pub fn from_view(view: ImageView<'_, T>) -> EdgeMatchResult<Self> {
        let mut data = Vec::with_capacity(view.width() * view.height());
        for y in 0..view.height() {
            let row = view.row(y).ok_or(EdgeMatchError::BufferTooSmall {
                needed: (y + 1) * view.stride(),
                got: view.data.len(),
            })?;
            data.extend_from_slice(row);
        }
        Self::new(data, view.width(), view.height())
    }

    /// Returns a borrowed view of the image.
    pub fn view(&self) -> ImageView<'_, T> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the row-major samples.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the sample at `(x, y)`, or `None` outside the image.
    pub fn get(&self, x: usize, y: usize) -> Option<T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.width + x).copied()
    }

    pub(crate) fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }
}

/// Maps 8-bit intensities to `[0, 1]` by dividing by 255.
pub fn normalize_u8(view: ImageView<'_, u8>) -> OwnedImage<f32> {
    let mut out = OwnedImage::<f32>::zeroed(view.width(), view.height());
    let width = view.width();
    for (y, dst) in out.data_mut().chunks_exact_mut(width).enumerate() {
        if let Some(src) = view.row(y) {
            for (d, &s) in dst.iter_mut().zip(src) {
                *d = f32::from(s) / 255.0;
            }
        }
    }
    out
}

/// Supplies grayscale images at the pipeline's fixed resolution.
///
/// Implementations decode, convert to a single channel and resize to
/// `side x side`. A failure is fatal for the caller's run.
pub trait ImageSource: Sync {
    /// Loads `path` as a single-channel `side x side` image.
    ///
    /// Returns an error when the image cannot be found, decoded or brought
    /// to the requested shape.
    fn load(&self, path: &Path, side: usize) -> EdgeMatchResult<OwnedImage<u8>>;
}

/// In-memory image source keyed by path.
///
/// Images are returned as stored; a stored image whose shape differs from the
/// requested side is reported as a shape mismatch rather than resampled.
#[derive(Default)]
pub struct MemorySource {
    images: HashMap<PathBuf, OwnedImage<u8>>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an image under `path`, replacing any previous entry.
    pub fn insert<P: Into<PathBuf>>(&mut self, path: P, image: OwnedImage<u8>) {
        self.images.insert(path.into(), image);
    }

    /// Builder-style variant of [`MemorySource::insert`].
    pub fn with<P: Into<PathBuf>>(mut self, path: P, image: OwnedImage<u8>) -> Self {
        self.insert(path, image);
        self
    }
}

impl ImageSource for MemorySource {
    fn load(&self, path: &Path, side: usize) -> EdgeMatchResult<OwnedImage<u8>> {
        let image = self
            .images
            .get(path)
            .ok_or_else(|| EdgeMatchError::ImageNotFound {
                path: path.display().to_string(),
            })?;
        if image.shape() != (side, side) {
            return Err(EdgeMatchError::ShapeMismatch {
                expected: (side, side),
                got: image.shape(),
            });
        }
        Ok(image.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_maps_extremes_to_unit_range() {
        let img = OwnedImage::new(vec![0u8, 51, 255, 255], 2, 2).unwrap();
        let norm = normalize_u8(img.view());
        assert_eq!(norm.data()[0], 0.0);
        assert!((norm.data()[1] - 0.2).abs() < 1e-6);
        assert_eq!(norm.data()[2], 1.0);
    }

    #[test]
    fn normalize_honors_stride() {
        let data = [10u8, 20, 99, 30, 40, 99];
        let view = ImageView::new(&data, 2, 2, 3).unwrap();
        let norm = normalize_u8(view);
        assert_eq!(norm.shape(), (2, 2));
        assert!((norm.data()[2] - 30.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn memory_source_reports_missing_and_misshaped_images() {
        let source = MemorySource::new().with("a.png", OwnedImage::new(vec![0u8; 4], 2, 2).unwrap());
        assert!(source.load(Path::new("a.png"), 2).is_ok());
        assert_eq!(
            source.load(Path::new("b.png"), 2).err().unwrap(),
            EdgeMatchError::ImageNotFound {
                path: "b.png".to_string()
            }
        );
        assert_eq!(
            source.load(Path::new("a.png"), 4).err().unwrap(),
            EdgeMatchError::ShapeMismatch {
                expected: (4, 4),
                got: (2, 2),
            }
        );
    }
}
