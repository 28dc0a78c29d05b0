//! Error types for the byte/bit reader.

use std::error::Error;
use std::fmt;

/// Errors raised by [`BitReader`](crate::reader::BitReader) and
/// [`ReplayStream`](crate::stream::ReplayStream).
///
/// Every variant is fatal for the field being read. Speculative reads never
/// surface these; they roll back instead.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadError {
    /// A read or skip would run past the end of the buffer.
    Overrun {
        /// Bit offset at which the read was attempted.
        offset_bits: usize,
        /// Number of bits the read needed.
        requested_bits: usize,
        /// Number of bits left in the buffer.
        available_bits: usize,
    },
    /// A seek target lies outside the buffer.
    SeekOutOfBounds {
        /// The requested bit position.
        target_bits: usize,
        /// Total size of the buffer in bits.
        limit_bits: usize,
    },
    /// A length-prefixed string could not be decoded.
    InvalidString {
        /// Human-readable description of what went wrong.
        detail: String,
    },
    /// The stream is encrypted but no cipher was supplied.
    MissingCipher,
    /// The cipher rejected the chunk bytes.
    Decrypt {
        /// Description reported by the cipher.
        reason: String,
    },
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overrun {
                offset_bits,
                requested_bits,
                available_bits,
            } => write!(
                f,
                "read of {requested_bits} bits at bit {offset_bits} overruns buffer \
                 ({available_bits} bits left)"
            ),
            Self::SeekOutOfBounds {
                target_bits,
                limit_bits,
            } => write!(f, "seek to bit {target_bits} outside buffer of {limit_bits} bits"),
            Self::InvalidString { detail } => write!(f, "invalid string: {detail}"),
            Self::MissingCipher => write!(f, "stream is encrypted but no cipher was supplied"),
            Self::Decrypt { reason } => write!(f, "decryption failed: {reason}"),
        }
    }
}

impl Error for ReadError {}
