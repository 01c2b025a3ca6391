//! Image samples and their vectorization.
//!
//! The classifiers in this crate never resize, crop or color-convert:
//! whoever produces the images (a camera pipeline, a face-region detector)
//! is responsible for handing over fixed-size, single-channel crops. This
//! module only turns such a crop into the flat row vector the subspace
//! machinery works on.
use ndarray::prelude::*;

use crate::error::{Error, Result};

/// A fixed-size intensity image.
///
/// Pixels are stored row-major as `f64`, one value per channel, channels
/// interleaved. Multi-channel images can be represented (an upstream source
/// may well hand over a color frame), but only single-channel images can be
/// vectorized.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    width: usize,
    height: usize,
    channels: usize,
    data: Vec<f64>,
}

impl Image {
    /// Constructs an image from raw interleaved samples.
    ///
    /// # Arguments
    ///
    /// * `width` - Image width in pixels.
    /// * `height` - Image height in pixels.
    /// * `channels` - Number of interleaved channels (1 for grayscale).
    /// * `data` - Row-major samples; its length must be
    ///            `width * height * channels`.
    pub fn new(width: usize, height: usize, channels: usize, data: Vec<f64>) -> Result<Image> {
        if channels < 1 {
            return Err(Error::InvalidInput("image must have at least 1 channel".into()));
        }
        if data.len() != width * height * channels {
            return Err(Error::InvalidInput(format!(
                "image data has {} samples, expected {}x{}x{} = {}",
                data.len(),
                width,
                height,
                channels,
                width * height * channels
            )));
        }
        Ok(Image { width, height, channels, data })
    }

    /// Constructs a single-channel image from a function of pixel
    /// coordinates.
    ///
    /// # Examples
    ///
    /// ```
    /// use facespace::image::Image;
    ///
    /// let img = Image::from_fn(3, 2, |x, y| (y * 3 + x) as f64);
    /// assert_eq!(img.pixels()[4], 4.);
    /// ```
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> Image
    where
        F: FnMut(usize, usize) -> f64,
    {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Image { width, height, channels: 1, data }
    }

    /// Constructs a single-channel image with every pixel set to `value`.
    pub fn constant(width: usize, height: usize, value: f64) -> Image {
        Image {
            width,
            height,
            channels: 1,
            data: vec![value; width * height],
        }
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of interleaved channels.
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Raw row-major samples.
    pub fn pixels(&self) -> &[f64] {
        &self.data
    }
}

/// Flattens a single-channel image into a row vector of length
/// `width * height`.
///
/// The pixel range is preserved as-is (e.g. 0–255 stays 0–255); no scaling
/// or normalization is applied. Fails with [`Error::InvalidInput`] on a
/// multi-channel image.
pub fn vectorize(image: &Image) -> Result<Array1<f64>> {
    if image.channels() != 1 {
        return Err(Error::InvalidInput(format!(
            "expected 1-channel image, got {} channels",
            image.channels()
        )));
    }
    Ok(Array1::from(image.pixels().to_vec()))
}
