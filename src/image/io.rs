//! Loading images from disk via the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use crate::image::{ImageSource, OwnedImage};
use crate::util::{EdgeMatchError, EdgeMatchResult};
use image::imageops::{self, FilterType};
use std::path::Path;

/// Creates an owned image from a grayscale image buffer.
pub fn owned_from_gray_image(img: &image::GrayImage) -> EdgeMatchResult<OwnedImage<u8>> {
    OwnedImage::new(img.as_raw().clone(), img.width() as usize, img.height() as usize)
}

/// Loads an image from disk at its native resolution, converted to luma.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> EdgeMatchResult<OwnedImage<u8>> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|err| EdgeMatchError::ImageIo {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    owned_from_gray_image(&img.to_luma8())
}

/// Decodes files from disk and resizes them to a square side.
#[derive(Clone, Copy, Debug)]
pub struct FileSource {
    filter: FilterType,
}

impl FileSource {
    /// Creates a source with a custom resampling filter.
    pub fn with_filter(filter: FilterType) -> Self {
        Self { filter }
    }
}

impl Default for FileSource {
    fn default() -> Self {
        Self::with_filter(FilterType::Triangle)
    }
}

impl ImageSource for FileSource {
    fn load(&self, path: &Path, side: usize) -> EdgeMatchResult<OwnedImage<u8>> {
        let side_u32 = u32::try_from(side).map_err(|_| EdgeMatchError::InvalidDimensions {
            width: side,
            height: side,
        })?;
        let img = image::open(path).map_err(|err| EdgeMatchError::ImageIo {
            path: path.display().to_string(),
            reason: err.to_string(),
        })?;
        let gray = img.to_luma8();
        let resized = imageops::resize(&gray, side_u32, side_u32, self.filter);
        owned_from_gray_image(&resized)
    }
}
