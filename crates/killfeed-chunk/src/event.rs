//! Chunk dispatch: locate, decrypt, decode, reposition.

use killfeed_core::{ChunkDescriptor, ReplayStream, WeaponTable};
use tracing::trace;

use crate::codec::decode_elimination;
use crate::error::DecodeError;
use crate::stats::{decode_match_stats, decode_team_stats};
use crate::types::{ChunkEvent, ChunkPayload};

/// Group label of elimination chunks.
pub const GROUP_PLAYER_ELIM: &str = "playerElim";
/// Metadata label of per-player statistics chunks.
pub const METADATA_MATCH_STATS: &str = "AthenaMatchStats";
/// Metadata label of team placement chunks.
pub const METADATA_TEAM_STATS: &str = "AthenaMatchTeamStats";

/// Decode one chunk from `stream`.
///
/// The stream cursor is moved to the chunk start and the chunk bytes are
/// decrypted into a standalone view. For unencrypted replays the cursor is
/// afterwards placed at the end of the declared chunk length, whatever the
/// decoder actually consumed.
///
/// # Errors
///
/// [`DecodeError::Stream`] if the chunk lies outside the stream or cannot be
/// decrypted, [`DecodeError::MalformedChunk`] if a mandatory field is
/// truncated.
pub fn read_chunk(
    stream: &mut ReplayStream,
    chunk: &ChunkDescriptor,
    weapons: &WeaponTable,
) -> Result<ChunkEvent, DecodeError> {
    let stream_err = |source| DecodeError::Stream {
        chunk: chunk.clone(),
        source,
    };
    let malformed = |error| DecodeError::MalformedChunk {
        chunk: chunk.clone(),
        error,
    };

    stream.go_to(chunk.start_pos).map_err(stream_err)?;
    let mut view = stream.decrypt_buffer(chunk.length).map_err(stream_err)?;

    let payload = if chunk.group == GROUP_PLAYER_ELIM {
        let mut elim = decode_elimination(&mut view, weapons).map_err(malformed)?;
        elim.time_seconds = chunk.start_seconds();
        ChunkPayload::Elimination(elim)
    } else if chunk.metadata == METADATA_MATCH_STATS {
        ChunkPayload::MatchStats(decode_match_stats(&mut view).map_err(malformed)?)
    } else if chunk.metadata == METADATA_TEAM_STATS {
        ChunkPayload::TeamStats(decode_team_stats(&mut view).map_err(malformed)?)
    } else {
        ChunkPayload::Other
    };
    trace!(
        group = %chunk.group,
        metadata = %chunk.metadata,
        consumed_bits = view.offset(),
        length = chunk.length,
        "decoded chunk"
    );

    if !stream.is_encrypted() {
        stream.go_to_bit(chunk.end_bit()).map_err(stream_err)?;
    }

    Ok(ChunkEvent {
        chunk: chunk.clone(),
        payload,
    })
}

/// Iterator decoding a sequence of chunks in descriptor order.
///
/// Stops after the first error.
pub struct ChunkEvents<'a, I> {
    stream: &'a mut ReplayStream,
    chunks: I,
    weapons: &'a WeaponTable,
    done: bool,
}

impl<'a, I> ChunkEvents<'a, I> {
    /// Decode `chunks` from `stream`, resolving weapons through `weapons`.
    pub fn new(stream: &'a mut ReplayStream, chunks: I, weapons: &'a WeaponTable) -> Self {
        Self {
            stream,
            chunks,
            weapons,
            done: false,
        }
    }
}

impl<'a, 'c, I> Iterator for ChunkEvents<'a, I>
where
    I: Iterator<Item = &'c ChunkDescriptor>,
{
    type Item = Result<ChunkEvent, DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let Some(chunk) = self.chunks.next() else {
            self.done = true;
            return None;
        };
        let result = read_chunk(self.stream, chunk, self.weapons);
        if result.is_err() {
            self.done = true;
        }
        Some(result)
    }
}
