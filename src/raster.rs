//! Reading and writing image files around the codec.
//!
//! PNG goes through the `png` crate so palette, gray and 16-bit images are
//! expanded explicitly before they reach [`PixelSource::from_samples`].
//! Everything else is decoded by the `image` crate. Output is restricted to
//! lossless formats since re-compressing a stego image destroys the payload.

use crate::pixels::{ColorModel, PixelSource};
use crate::{Error, Result};
use image::ImageFormat;
use log::debug;
use std::{fs, io::Cursor, path::Path};

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

/// Lossless formats a stego image may be saved as
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Png,
    Bmp,
}

impl OutputFormat {
    /// Picks the format from the file extension
    /// # Errors
    /// [`Error::UnsupportedOutputFormat`] for JPEG and anything unknown
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("png") => Ok(Self::Png),
            Some("bmp") => Ok(Self::Bmp),
            _ => Err(Error::UnsupportedOutputFormat(path.display().to_string())),
        }
    }
}

/// Maps the color type the PNG reader produced onto a widenable layout
fn color_model(color: png::ColorType, depth: png::BitDepth) -> Result<ColorModel> {
    if depth != png::BitDepth::Eight {
        return Err(Error::UnsupportedColorModel(format!("{color:?} at {depth:?}")));
    }
    match color {
        png::ColorType::Grayscale => Ok(ColorModel::Grayscale),
        png::ColorType::GrayscaleAlpha => Ok(ColorModel::GrayscaleAlpha),
        png::ColorType::Rgb => Ok(ColorModel::Rgb),
        png::ColorType::Rgba => Ok(ColorModel::Rgba),
        png::ColorType::Indexed => Err(Error::UnsupportedColorModel(format!("{color:?}"))),
    }
}

fn decode_png(bytes: &[u8]) -> Result<PixelSource> {
    let mut decoder = png::Decoder::new(bytes);
    // Palettes and sub-byte depths become plain samples, 16-bit drops to 8
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder.read_info()?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf)?;
    buf.truncate(frame.buffer_size());

    let model = color_model(frame.color_type, frame.bit_depth)?;
    debug!("decoded {}x{} PNG as {model:?}", frame.width, frame.height);
    PixelSource::from_samples(frame.width, frame.height, model, &buf)
}

fn encode_png(pixels: &PixelSource) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut encoder = png::Encoder::new(&mut out, pixels.width(), pixels.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(pixels.as_raw())?;
    writer.finish()?;
    Ok(out)
}

/// Decodes an encoded image into a canonical pixel buffer
///
/// JPEG input is accepted, but a stego image must be written back losslessly.
pub fn decode_raster_image(bytes: &[u8]) -> Result<PixelSource> {
    if bytes.starts_with(&PNG_SIGNATURE) {
        return decode_png(bytes);
    }
    let image = image::load_from_memory(bytes)?;
    debug!(
        "decoded {}x{} {:?} image",
        image.width(),
        image.height(),
        image.color()
    );
    PixelSource::from_decoded_image(&image)
}

/// Encodes `pixels` without altering any sample
pub fn encode_raster_image(pixels: &PixelSource, format: OutputFormat) -> Result<Vec<u8>> {
    match format {
        OutputFormat::Png => encode_png(pixels),
        OutputFormat::Bmp => {
            let mut out = Cursor::new(Vec::new());
            pixels.to_rgba_image()?.write_to(&mut out, ImageFormat::Bmp)?;
            Ok(out.into_inner())
        }
    }
}

/// Reads and decodes the image at `path`
pub fn open<P: AsRef<Path>>(path: P) -> Result<PixelSource> {
    decode_raster_image(&fs::read(path)?)
}

/// Encodes `pixels` in the format implied by `path` and writes the file
pub fn save<P: AsRef<Path>>(pixels: &PixelSource, path: P) -> Result<()> {
    let format = OutputFormat::from_path(&path)?;
    fs::write(path, encode_raster_image(pixels, format)?)?;
    Ok(())
}
