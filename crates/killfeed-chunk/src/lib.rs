//! Version-aware decoders for replay elimination and statistics chunks.
//!
//! A replay is a sequence of independently positioned chunks, each described
//! by a [`ChunkDescriptor`](killfeed_core::ChunkDescriptor). [`read_chunk`]
//! locates a chunk in a [`ReplayStream`](killfeed_core::ReplayStream),
//! decrypts it into a standalone view and dispatches on its labels.
//!
//! # Format
//!
//! All multi-byte integers and floats are little-endian.
//!
//! | selector | body |
//! |----------|------|
//! | group `playerElim` | preamble, two players, gun type u8, knocked u8, optional locations and distance |
//! | metadata `AthenaMatchStats` | 4 bytes, accuracy f32, ten u32 counters |
//! | metadata `AthenaMatchTeamStats` | i32, position u32, total players u32 |
//!
//! The elimination preamble and player encoding depend on the replay header;
//! see [`EliminationLayout::for_header`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod event;
pub mod stats;
pub mod types;

pub use codec::{decode_elimination, decode_player, EliminationLayout, PlayerEncoding};
pub use error::{DecodeError, FieldError};
pub use event::{
    read_chunk, ChunkEvents, GROUP_PLAYER_ELIM, METADATA_MATCH_STATS, METADATA_TEAM_STATS,
};
pub use stats::{decode_match_stats, decode_team_stats};
pub use types::{ChunkEvent, ChunkPayload, MatchStats, TeamStats};
