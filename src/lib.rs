//! Least significant bit steganography for raster images.
//!
//! A message is expanded into bits, followed by a `0xFF` terminator, and
//! written into the low bit of the red, green and blue samples of each pixel
//! in row-major order. Alpha is never touched. [`decode`] walks the same order
//! and stops at the terminator.
//!
//! ```rust
//! # use lsbsteg::{decode, encode, Error, PixelSource};
//! # fn main() -> Result<(), Error> {
//! let cover = PixelSource::new(8, 8, vec![200; 256])?;
//! let stego = encode(&cover, b"meet at noon")?;
//! assert_eq!(decode(&stego), b"meet at noon");
//! # Ok(())
//! # }
//! ```

pub mod bits;
pub mod embed;
pub mod extract;
pub mod options;
pub mod pixels;
pub mod raster;

pub use embed::{encode, encode_with};
pub use extract::{decode, decode_with, Extraction};
pub use options::{CodecOptions, TerminatorPolicy};
pub use pixels::{ColorModel, PixelSource};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Capacity exceeded: Message needs {required} bits, but the image holds {available} bits.")]
    CapacityExceeded { required: u64, available: u64 },
    #[error("Unsupported color model: {0} cannot be read as 8-bit RGBA.")]
    UnsupportedColorModel(String),
    #[error("Terminator not found: Read all {bits_read} bits without reaching the end of a message.")]
    TerminatorNotFound { bits_read: u64 },
    #[error("Invalid buffer: {len} samples do not describe a {width}x{height} image.")]
    InvalidBuffer { width: u32, height: u32, len: usize },
    #[error("Unsupported output format: {0} is not a lossless format (use .png or .bmp).")]
    UnsupportedOutputFormat(String),
    #[error(transparent)]
    PngDecoding(#[from] png::DecodingError),
    #[error(transparent)]
    PngEncoding(#[from] png::EncodingError),
    #[error(transparent)]
    Image(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
