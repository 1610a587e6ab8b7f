use crate::bits::TERMINATOR;

/// Where the extractor may recognize the end-of-message delimiter
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TerminatorPolicy {
    /// Only at byte boundaries of the bitstream
    ///
    /// A payload ending in one-bits is recovered intact. A payload byte equal
    /// to the delimiter still ends the message.
    #[default]
    ByteAligned,
    /// At any bit offset: the first eight bits spelling the delimiter end the
    /// message
    ///
    /// Reads images written by tools that search the stream bit by bit. A
    /// payload whose bits run into the delimiter (with `0xFF`, one ending in a
    /// set bit) is truncated early.
    BitGranular,
}

/// Codec settings
///
/// The `delimiter` must match between embedding and extraction. The other
/// fields only affect how an image is read back.
/// # Examples
/// ```rust
/// # use lsbsteg::{CodecOptions, TerminatorPolicy};
/// let options = CodecOptions::default()
///     .with_delimiter(b'*')
///     .with_terminator(TerminatorPolicy::BitGranular)
///     .with_require_terminator(true);
/// assert!(options.require_terminator);
/// assert_eq!(CodecOptions::default().delimiter, 0xFF);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodecOptions {
    /// Byte appended after the message to mark its end
    pub delimiter: u8,
    pub terminator: TerminatorPolicy,
    /// Fail with [`crate::Error::TerminatorNotFound`] instead of returning
    /// whatever was collected when the image runs out first
    pub require_terminator: bool,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            delimiter: TERMINATOR,
            terminator: TerminatorPolicy::default(),
            require_terminator: false,
        }
    }
}

impl CodecOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_terminator(mut self, terminator: TerminatorPolicy) -> Self {
        self.terminator = terminator;
        self
    }

    pub fn with_require_terminator(mut self, require_terminator: bool) -> Self {
        self.require_terminator = require_terminator;
        self
    }
}
