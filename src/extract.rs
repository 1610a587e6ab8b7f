use crate::bits::{self, TERMINATOR_BITS};
use crate::embed::PAYLOAD_ORDER;
use crate::options::{CodecOptions, TerminatorPolicy};
use crate::pixels::{PixelSource, RGBA_CHANNELS};
use crate::{Error, Result};
use log::{debug, trace, warn};

/// A message read back from an image
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Extraction {
    pub message: Vec<u8>,
    /// Whether the terminator was seen. When `false` the message is whatever
    /// the image's low bits happened to spell and may be meaningless.
    pub terminated: bool,
}

/// Collects low bits in embedding order until the terminator shows up
///
/// # Returns
/// The bits before the terminator and whether it was found. Without a
/// terminator every low bit of the image is returned.
fn collect_bits(samples: &[u8], delimiter: u8, policy: TerminatorPolicy) -> (Vec<bool>, bool) {
    let mut bits = Vec::new();
    for pixel in samples.chunks_exact(RGBA_CHANNELS) {
        for &channel in &PAYLOAD_ORDER {
            bits.push(pixel[channel] & 1 == 1);
            if bits::ends_with_terminator(&bits, delimiter, policy) {
                trace!("terminator ends at bit {}", bits.len());
                bits.truncate(bits.len() - TERMINATOR_BITS);
                return (bits, true);
            }
        }
    }
    (bits, false)
}

/// Reads the message hidden by [`crate::encode`] using the default options
///
/// An image that was never written to still decodes: the result is then
/// made of whatever the low bits held. Use [`decode_with`] to tell the two
/// cases apart or to reject the latter.
/// # Examples
/// ```rust
/// # use lsbsteg::{decode, encode, PixelSource};
/// let cover = PixelSource::new(4, 4, vec![128; 64]).unwrap();
/// let stego = encode(&cover, b"A").unwrap();
/// assert_eq!(decode(&stego), b"A");
/// ```
pub fn decode(pixels: &PixelSource) -> Vec<u8> {
    // The default options never require a terminator, so this cannot fail
    decode_with(pixels, &CodecOptions::default())
        .map(|extraction| extraction.message)
        .unwrap_or_default()
}

/// Reads the hidden message with explicit `options`
/// # Errors
/// [`Error::TerminatorNotFound`] when `options.require_terminator` is set and
/// the image runs out before the delimiter.
/// # Examples
/// ```rust
/// # use lsbsteg::{decode_with, CodecOptions, Error, PixelSource};
/// let blank = PixelSource::new(2, 2, vec![0; 16]).unwrap();
/// let strict = CodecOptions::default().with_require_terminator(true);
/// assert!(matches!(
///     decode_with(&blank, &strict),
///     Err(Error::TerminatorNotFound { bits_read: 12 })
/// ));
/// ```
pub fn decode_with(pixels: &PixelSource, options: &CodecOptions) -> Result<Extraction> {
    let (bits, terminated) =
        collect_bits(pixels.as_raw(), options.delimiter, options.terminator);
    if !terminated {
        if options.require_terminator {
            return Err(Error::TerminatorNotFound {
                bits_read: bits.len() as u64,
            });
        }
        warn!(
            "no terminator found in {} bits, message is a best-effort guess",
            bits.len()
        );
    }

    let message = bits::from_bits(&bits);
    debug!(
        "extracted {} bytes from {}x{} image ({:?} terminator)",
        message.len(),
        pixels.width(),
        pixels.height(),
        options.terminator
    );
    Ok(Extraction {
        message,
        terminated,
    })
}
