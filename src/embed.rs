use crate::bits;
use crate::options::CodecOptions;
use crate::pixels::{PixelSource, RGBA_CHANNELS};
use crate::{Error, Result};
use log::{debug, trace};

/// Sample indices that carry payload bits, in the order they are filled
///
/// The extractor reads the same order; changing one without the other
/// garbles every message.
pub(crate) const PAYLOAD_ORDER: [usize; 3] = [0, 1, 2];

/// Ensure the bits fit the RGBA buffer they are written into
macro_rules! debug_assert_fits {
    ( $samples:ident, $bits:ident ) => {
        debug_assert_eq!($samples.len() % RGBA_CHANNELS, 0);
        debug_assert!(
            $bits.len() <= $samples.len() / RGBA_CHANNELS * PAYLOAD_ORDER.len(),
            "Buffer is too small to embed the bits"
        );
    };
}

/// Writes `bits` into the low bit of the samples selected by `order`
///
/// Pixels are visited row by row, left to right, which is the layout of the
/// buffer itself. Writing stops as soon as the bits run out; the rest of the
/// buffer is left as is.
/// # Returns
/// The number of pixels that received at least one bit
fn embed_bits(samples: &mut [u8], bits: &[bool], order: [usize; 3]) -> usize {
    debug_assert_fits!(samples, bits);
    let mut bits = bits.iter();
    for (index, pixel) in samples.chunks_exact_mut(RGBA_CHANNELS).enumerate() {
        for &channel in &order {
            let Some(&bit) = bits.next() else {
                return index + usize::from(channel != order[0]);
            };
            pixel[channel] = (pixel[channel] & !1) | u8::from(bit);
        }
    }
    samples.len() / RGBA_CHANNELS
}

/// Hides `message` in the least significant bits of the R, G and B samples
///
/// The input is never modified: the result is a fresh copy in which only the
/// pixels covered by the message and its terminator differ. Alpha is copied
/// verbatim.
/// # Arguments
/// * `pixels` - The cover image
/// * `message` - The payload, which may be empty
/// # Errors
/// [`Error::CapacityExceeded`] when the message plus terminator needs more bits
/// than the image holds. Nothing is allocated in that case.
/// # Examples
/// ```rust
/// # use lsbsteg::{decode, encode, Error, PixelSource};
/// # fn main() -> Result<(), Error> {
/// let cover = PixelSource::new(4, 4, vec![0; 64])?;
/// let stego = encode(&cover, b"Hi")?;
/// assert_eq!(decode(&stego), b"Hi");
/// # Ok(())
/// # }
/// ```
pub fn encode(pixels: &PixelSource, message: &[u8]) -> Result<PixelSource> {
    encode_with(pixels, message, &CodecOptions::default())
}

/// Like [`encode`], but ends the message with `options.delimiter`
///
/// The image must be read back with the same delimiter.
/// # Examples
/// ```rust
/// # use lsbsteg::{decode_with, encode_with, CodecOptions, Error, PixelSource};
/// # fn main() -> Result<(), Error> {
/// let options = CodecOptions::default().with_delimiter(b'*');
/// let cover = PixelSource::new(4, 4, vec![0; 64])?;
/// let stego = encode_with(&cover, b"Hi", &options)?;
/// assert_eq!(decode_with(&stego, &options)?.message, b"Hi");
/// # Ok(())
/// # }
/// ```
pub fn encode_with(
    pixels: &PixelSource,
    message: &[u8],
    options: &CodecOptions,
) -> Result<PixelSource> {
    encode_in_order(pixels, message, options.delimiter, PAYLOAD_ORDER)
}

fn encode_in_order(
    pixels: &PixelSource,
    message: &[u8],
    delimiter: u8,
    order: [usize; 3],
) -> Result<PixelSource> {
    let required = bits::stream_len(message.len());
    let available = pixels.capacity_bits();
    if required > available {
        return Err(Error::CapacityExceeded {
            required,
            available,
        });
    }
    debug!(
        "embedding {} byte message into {}x{} image ({required}/{available} bits)",
        message.len(),
        pixels.width(),
        pixels.height()
    );

    let bits = bits::to_bits(message, delimiter);
    let mut stego = pixels.clone();
    let touched = embed_bits(stego.samples_mut(), &bits, order);
    trace!("wrote {} bits across {touched} pixels", bits.len());
    Ok(stego)
}
