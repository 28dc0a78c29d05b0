//! killfeed: decode player eliminations from game replays and reconcile them
//! into one timeline.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! killfeed sub-crates. For most users, adding `killfeed` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use killfeed::prelude::*;
//! use serde_json::json;
//!
//! // Replay bytes and chunk descriptors come from the container layer;
//! // this replay has no elimination chunks.
//! let mut stream = ReplayStream::new(Vec::new(), ReplayHeader::new(24, 22, 40));
//!
//! // Events raised by the property-replication layer.
//! let payload = json!({
//!     "EliminatorId": "0123456789abcdef0123456789abcdef",
//!     "EliminatedId": "bot",
//!     "GunType": 3,
//!     "Distance": 4200.0,
//! });
//! let event = PropertyEvent::new(FEED_UPDATE_EVENT, payload.as_object().cloned().unwrap())
//!     .at(95.25);
//!
//! let config = ParseConfig {
//!     weapons: [(3, "AssaultRifle")].into_iter().collect(),
//!     ..ParseConfig::default()
//! };
//! let result = parse_eliminations(&mut stream, &[], [event], config).unwrap();
//!
//! let elim = &result.eliminations[0];
//! assert_eq!(elim.victim, Some(PlayerRef::Bot));
//! assert_eq!(elim.weapon, Some(Weapon::Named("AssaultRifle".into())));
//! assert_eq!(elim.distance, Some(42.0));
//! assert_eq!(elim.t, Some(95.25));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `killfeed-core` | Ids, weapons, descriptors, records, the bit reader |
//! | [`chunk`] | `killfeed-chunk` | Elimination and statistics chunk decoders |
//! | [`engine`] | `killfeed-engine` | Config, registry, dispatch, normalizer, reconciliation, pipeline |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and the bit reader (`killfeed-core`).
///
/// Player references, weapons, chunk descriptors, the raw and canonical
/// elimination records, and [`types::BitReader`] / [`types::ReplayStream`].
pub use killfeed_core as types;

/// Chunk decoders (`killfeed-chunk`).
///
/// [`chunk::read_chunk`] decodes one chunk; [`chunk::ChunkEvents`] walks a
/// descriptor list.
pub use killfeed_chunk as chunk;

/// Normalization, reconciliation and the parse pipeline (`killfeed-engine`).
pub use killfeed_engine as engine;

/// Common imports for typical killfeed usage.
///
/// ```rust
/// use killfeed::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use killfeed_core::{
        BufferCipher, CanonicalElimination, ChunkDescriptor, NetId, PlayerRef, ReplayHeader,
        ReplayStream, Weapon, WeaponTable,
    };

    // Chunks
    pub use killfeed_chunk::{ChunkEvent, ChunkPayload, MatchStats, TeamStats};

    // Errors
    pub use killfeed_chunk::DecodeError;
    pub use killfeed_core::ReadError;
    pub use killfeed_engine::{ConfigError, ParseError};

    // Pipeline
    pub use killfeed_engine::{
        parse_eliminations, ParseConfig, ParseResult, PropertyEvent, ReconcileStats, ReplayParse,
        ELIMINATION_SUMMARY_EVENT, FEED_UPDATE_EVENT,
    };
}
