//! Error types for chunk decoding.

use std::error::Error;
use std::fmt;

use killfeed_core::{ChunkDescriptor, ReadError};

/// A mandatory field of a chunk body could not be read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    /// Name of the field being decoded.
    pub field: &'static str,
    /// Bit offset within the chunk view where the read started.
    pub offset_bits: usize,
    /// The underlying reader failure.
    pub source: ReadError,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "field `{}` at bit {}: {}",
            self.field, self.offset_bits, self.source
        )
    }
}

impl Error for FieldError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

/// Fatal errors from [`read_chunk`](crate::event::read_chunk).
///
/// Both variants carry the descriptor of the chunk being decoded so callers
/// can report where the replay went wrong.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodeError {
    /// The chunk body ended before a mandatory field.
    MalformedChunk {
        /// The chunk being decoded.
        chunk: ChunkDescriptor,
        /// Which field failed and where.
        error: FieldError,
    },
    /// The chunk could not be located or decrypted in the replay stream.
    Stream {
        /// The chunk being decoded.
        chunk: ChunkDescriptor,
        /// The underlying reader failure.
        source: ReadError,
    },
}

impl DecodeError {
    /// Descriptor of the chunk that failed.
    pub fn chunk(&self) -> &ChunkDescriptor {
        match self {
            Self::MalformedChunk { chunk, .. } | Self::Stream { chunk, .. } => chunk,
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chunk = self.chunk();
        write!(
            f,
            "chunk {}/{} at byte {} (length {}): ",
            chunk.group, chunk.metadata, chunk.start_pos, chunk.length
        )?;
        match self {
            Self::MalformedChunk { error, .. } => write!(f, "malformed body, {error}"),
            Self::Stream { source, .. } => write!(f, "stream access failed: {source}"),
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::MalformedChunk { error, .. } => Some(error),
            Self::Stream { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_chunk_and_field() {
        let err = DecodeError::MalformedChunk {
            chunk: ChunkDescriptor::new("playerElim", "", 128, 40),
            error: FieldError {
                field: "gun_type",
                offset_bits: 312,
                source: ReadError::Overrun {
                    offset_bits: 312,
                    requested_bits: 8,
                    available_bits: 0,
                },
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("playerElim"), "{msg}");
        assert!(msg.contains("byte 128"), "{msg}");
        assert!(msg.contains("`gun_type` at bit 312"), "{msg}");
        assert!(Error::source(&err).is_some());
    }
}
