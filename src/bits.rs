use crate::options::TerminatorPolicy;

/// Byte appended to every payload to mark the end of the message, unless
/// [`crate::CodecOptions::delimiter`] picks another
pub const TERMINATOR: u8 = 0xFF;

/// Number of bits the terminator occupies in the stream
pub const TERMINATOR_BITS: usize = u8::BITS as usize;

/// Channels per pixel that carry payload bits (R, G and B)
pub const PAYLOAD_CHANNELS: u64 = 3;

/// Expands a single byte into its bits, most significant first
fn byte_bits(byte: u8) -> impl Iterator<Item = bool> {
    (0..u8::BITS).rev().map(move |shift| (byte >> shift) & 1 == 1)
}

/// Compute the length of the bitstream produced for a message of `message_len` bytes
///
/// The delimiter is always a single byte, so its value does not matter here.
pub fn stream_len(message_len: usize) -> u64 {
    (message_len as u64 + 1) * u64::from(u8::BITS)
}

/// Expands `message` into a self-delimited bitstream
///
/// Every byte is written MSB first and the `delimiter` byte is appended
/// unconditionally, so an empty message still yields eight bits.
/// # Examples
/// ```rust
/// # use lsbsteg::bits::{to_bits, TERMINATOR};
/// let bits = to_bits(b"A", TERMINATOR);
/// assert_eq!(bits.len(), 16);
/// assert_eq!(&bits[..8], &[false, true, false, false, false, false, false, true]);
/// assert!(bits[8..].iter().all(|&bit| bit));
/// ```
pub fn to_bits(message: &[u8], delimiter: u8) -> Vec<bool> {
    let mut bits = Vec::with_capacity(stream_len(message.len()) as usize);
    for &byte in message.iter().chain(std::iter::once(&delimiter)) {
        bits.extend(byte_bits(byte));
    }
    bits
}

/// Packs `bits` back into bytes, MSB first
///
/// A trailing group of fewer than eight bits cannot form a byte and is dropped.
pub fn from_bits(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(u8::BITS as usize)
        .map(|chunk| {
            chunk
                .iter()
                .fold(0u8, |byte, &bit| (byte << 1) | u8::from(bit))
        })
        .collect()
}

/// Number of payload bits an image of the given dimensions can carry
/// # Examples
/// ```rust
/// # use lsbsteg::bits::capacity_bits;
/// assert_eq!(capacity_bits(4, 4), 48);
/// assert_eq!(capacity_bits(0, 100), 0);
/// ```
pub fn capacity_bits(width: u32, height: u32) -> u64 {
    PAYLOAD_CHANNELS * u64::from(width) * u64::from(height)
}

/// Largest message, in bytes, that fits alongside the terminator
pub fn max_message_len(width: u32, height: u32) -> u64 {
    capacity_bits(width, height).saturating_sub(TERMINATOR_BITS as u64) / u64::from(u8::BITS)
}

/// Checks whether the collected `bits` end in the `delimiter` byte under `policy`
///
/// [`TerminatorPolicy::BitGranular`] accepts the delimiter at any bit offset,
/// [`TerminatorPolicy::ByteAligned`] only when it fills a whole byte slot.
pub fn ends_with_terminator(bits: &[bool], delimiter: u8, policy: TerminatorPolicy) -> bool {
    if bits.len() < TERMINATOR_BITS {
        return false;
    }
    if policy == TerminatorPolicy::ByteAligned && bits.len() % TERMINATOR_BITS != 0 {
        return false;
    }
    bits[bits.len() - TERMINATOR_BITS..]
        .iter()
        .copied()
        .eq(byte_bits(delimiter))
}
