use crate::{bits, Error, Result};
use image::{DynamicImage, RgbaImage};

/// Samples per pixel in the canonical buffer
pub const RGBA_CHANNELS: usize = 4;

/// Index of the alpha sample within a pixel
pub const ALPHA: usize = 3;

/// Sample layouts that can be widened to 8-bit RGBA
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColorModel {
    Grayscale,
    GrayscaleAlpha,
    Rgb,
    Rgba,
}

impl ColorModel {
    /// Number of 8-bit samples per pixel in this layout
    pub fn channels(self) -> usize {
        match self {
            ColorModel::Grayscale => 1,
            ColorModel::GrayscaleAlpha => 2,
            ColorModel::Rgb => 3,
            ColorModel::Rgba => 4,
        }
    }

    /// `sample` must hold exactly [`ColorModel::channels`] values
    fn to_rgba(self, sample: &[u8]) -> [u8; 4] {
        debug_assert_eq!(sample.len(), self.channels());
        match self {
            ColorModel::Grayscale => [sample[0], sample[0], sample[0], u8::MAX],
            ColorModel::GrayscaleAlpha => [sample[0], sample[0], sample[0], sample[1]],
            ColorModel::Rgb => [sample[0], sample[1], sample[2], u8::MAX],
            ColorModel::Rgba => [sample[0], sample[1], sample[2], sample[3]],
        }
    }
}

/// Computes `width * height * channels`, or `None` if it does not fit in memory
fn buffer_len(width: u32, height: u32, channels: usize) -> Option<usize> {
    usize::try_from(width)
        .ok()?
        .checked_mul(usize::try_from(height).ok()?)?
        .checked_mul(channels)
}

/// A canonical 8-bit RGBA pixel buffer in row-major order
///
/// Every pixel `(x, y)` with `x < width` and `y < height` is addressable, and
/// the buffer holds exactly `width * height * 4` samples.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelSource {
    width: u32,
    height: u32,
    samples: Vec<u8>,
}

impl PixelSource {
    /// Wraps an existing RGBA buffer
    /// # Examples
    /// ```rust
    /// # use lsbsteg::PixelSource;
    /// let pixels = PixelSource::new(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
    /// assert_eq!(pixels.pixel(1, 0), Some([5, 6, 7, 8]));
    /// assert!(PixelSource::new(2, 2, vec![0; 8]).is_err());
    /// ```
    pub fn new(width: u32, height: u32, samples: Vec<u8>) -> Result<Self> {
        match buffer_len(width, height, RGBA_CHANNELS) {
            Some(len) if len == samples.len() => Ok(Self {
                width,
                height,
                samples,
            }),
            _ => Err(Error::InvalidBuffer {
                width,
                height,
                len: samples.len(),
            }),
        }
    }

    /// Widens a packed 8-bit buffer in the given `model` to canonical RGBA
    ///
    /// Gray values are replicated into R, G and B, and a missing alpha
    /// channel becomes fully opaque.
    pub fn from_samples(
        width: u32,
        height: u32,
        model: ColorModel,
        samples: &[u8],
    ) -> Result<Self> {
        let invalid = || Error::InvalidBuffer {
            width,
            height,
            len: samples.len(),
        };
        let len = buffer_len(width, height, model.channels()).ok_or_else(invalid)?;
        if len != samples.len() {
            return Err(invalid());
        }
        if model == ColorModel::Rgba {
            return Self::new(width, height, samples.to_vec());
        }

        let mut rgba = Vec::with_capacity(len / model.channels() * RGBA_CHANNELS);
        for sample in samples.chunks_exact(model.channels()) {
            rgba.extend_from_slice(&model.to_rgba(sample));
        }
        Self::new(width, height, rgba)
    }

    /// Normalizes a decoded image of any color type to canonical RGBA
    ///
    /// 8-bit layouts are widened sample by sample; deeper or floating point
    /// layouts go through the `image` crate's own RGBA conversion.
    pub fn from_decoded_image(image: &DynamicImage) -> Result<Self> {
        let (width, height) = (image.width(), image.height());
        match image {
            DynamicImage::ImageLuma8(buf) => {
                Self::from_samples(width, height, ColorModel::Grayscale, buf.as_raw())
            }
            DynamicImage::ImageLumaA8(buf) => {
                Self::from_samples(width, height, ColorModel::GrayscaleAlpha, buf.as_raw())
            }
            DynamicImage::ImageRgb8(buf) => {
                Self::from_samples(width, height, ColorModel::Rgb, buf.as_raw())
            }
            DynamicImage::ImageRgba8(buf) => Self::new(width, height, buf.as_raw().clone()),
            other => Ok(Self::from(other.to_rgba8())),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The RGBA samples of pixel `(x, y)`, or `None` outside the image
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let index = (y as usize * self.width as usize + x as usize) * RGBA_CHANNELS;
        let mut pixel = [0; RGBA_CHANNELS];
        pixel.copy_from_slice(&self.samples[index..index + RGBA_CHANNELS]);
        Some(pixel)
    }

    /// Row-major RGBA samples
    pub fn as_raw(&self) -> &[u8] {
        &self.samples
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.samples
    }

    /// Payload bits this image can carry
    pub fn capacity_bits(&self) -> u64 {
        bits::capacity_bits(self.width, self.height)
    }

    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Copies the pixels into an [`RgbaImage`] for the `image` crate's encoders
    pub fn to_rgba_image(&self) -> Result<RgbaImage> {
        RgbaImage::from_raw(self.width, self.height, self.samples.clone()).ok_or(
            Error::InvalidBuffer {
                width: self.width,
                height: self.height,
                len: self.samples.len(),
            },
        )
    }
}

impl From<RgbaImage> for PixelSource {
    fn from(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            samples: image.into_raw(),
        }
    }
}
