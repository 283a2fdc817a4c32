//! Dense 2D convolution over the interior of an image.
//!
//! The engine evaluates plain cross-correlation (the kernel is not flipped)
//! at every pixel whose full kernel window lies inside the image. Pixels
//! within `side / 2` of an edge are never written: `convolve` leaves them at
//! zero and `convolve_into` leaves whatever the destination already held.
//!
//! The sample type selects the numeric mode. `f32` stores the raw signed sum;
//! `u8` clamps the sum to `[0, 255]` and then truncates toward zero.

use crate::image::{ImageView, OwnedImage};
use crate::kernel::Kernel;

/// Pixel type the convolution engine reads and writes.
pub trait Sample: Copy + Default + Send + Sync {
    /// Widens a stored sample for accumulation.
    fn to_f32(self) -> f32;
    /// Converts an accumulated kernel response into a stored sample.
    fn from_sum(sum: f32) -> Self;
}

impl Sample for f32 {
    #[inline]
    fn to_f32(self) -> f32 {
        self
    }

    #[inline]
    fn from_sum(sum: f32) -> Self {
        sum
    }
}

impl Sample for u8 {
    #[inline]
    fn to_f32(self) -> f32 {
        f32::from(self)
    }

    #[inline]
    fn from_sum(sum: f32) -> Self {
        // Clamp first, then truncate.
        sum.clamp(0.0, 255.0) as u8
    }
}

/// Convolves `input` with `kernel` into a fresh zero-bordered buffer.
///
/// # Panics
///
/// Panics if the kernel is larger than the image in either dimension.
pub fn convolve<T: Sample>(input: ImageView<'_, T>, kernel: &Kernel) -> OwnedImage<T> {
    let mut out = OwnedImage::zeroed(input.width(), input.height());
    convolve_into(input, kernel, &mut out);
    out
}

/// Convolves `input` with `kernel`, writing only the interior of `out`.
///
/// # Panics
///
/// Panics if `out` differs in shape from `input` or the kernel is larger than
/// the image.
pub fn convolve_into<T: Sample>(input: ImageView<'_, T>, kernel: &Kernel, out: &mut OwnedImage<T>) {
    let width = input.width();
    let height = input.height();
    let side = kernel.side();
    assert_eq!(out.shape(), input.shape(), "output shape must match input");
    assert!(
        side <= width && side <= height,
        "kernel side {side} exceeds image {width}x{height}"
    );

    let pad = kernel.pad();
    let weights = kernel.weights();
    let dst = out.data_mut();

    for y in pad..height - pad {
        for x in pad..width - pad {
            let mut sum = 0.0f32;
            for fy in 0..side {
                let row = input.row(y + fy - pad).expect("row within kernel window");
                let krow = &weights[fy * side..(fy + 1) * side];
                let window = &row[x - pad..x - pad + side];
                for (&w, &v) in krow.iter().zip(window) {
                    sum += w * v.to_f32();
                }
            }
            dst[y * width + x] = T::from_sum(sum);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u8_from_sum_clamps_before_truncating() {
        assert_eq!(u8::from_sum(-3.5), 0);
        assert_eq!(u8::from_sum(0.99), 0);
        assert_eq!(u8::from_sum(100.7), 100);
        assert_eq!(u8::from_sum(255.6), 255);
        assert_eq!(u8::from_sum(1e6), 255);
    }

    #[test]
    fn identity_kernel_copies_interior() {
        let mut weights = vec![0.0f32; 9];
        weights[4] = 1.0;
        let kernel = Kernel::new(3, weights).unwrap();
        let data: Vec<f32> = (0..16).map(|v| v as f32).collect();
        let img = OwnedImage::new(data.clone(), 4, 4).unwrap();
        let out = convolve(img.view(), &kernel);
        for y in 1..3 {
            for x in 1..3 {
                assert_eq!(out.get(x, y), Some(data[y * 4 + x]));
            }
        }
        assert_eq!(out.get(0, 0), Some(0.0));
        assert_eq!(out.get(3, 2), Some(0.0));
    }

    #[test]
    fn kernel_is_not_flipped() {
        // Picks the left neighbour under correlation, the right one under convolution.
        let kernel = Kernel::new(3, vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0]).unwrap();
        let data: Vec<f32> = (0..9).map(|v| v as f32).collect();
        let img = OwnedImage::new(data, 3, 3).unwrap();
        let out = convolve(img.view(), &kernel);
        assert_eq!(out.get(1, 1), Some(3.0));
    }

    #[test]
    #[should_panic]
    fn oversized_kernel_panics() {
        let kernel = Kernel::new(5, vec![0.0; 25]).unwrap();
        let img = OwnedImage::new(vec![0.0f32; 9], 3, 3).unwrap();
        let _ = convolve(img.view(), &kernel);
    }
}
