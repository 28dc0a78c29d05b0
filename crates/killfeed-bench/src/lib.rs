//! Benchmark profiles for the killfeed replay decoder.
//!
//! [`match_profile`] builds a deterministic synthetic match: one replay
//! buffer of elimination chunks plus the property events a replication layer
//! would raise for the same match. Roughly half of the eliminations are seen
//! by both routes, a quarter only by chunks and a quarter only by events.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use killfeed_core::{ChunkDescriptor, ReplayHeader, ReplayStream, WeaponTable};
use killfeed_chunk::GROUP_PLAYER_ELIM;
use killfeed_engine::{ParseConfig, PropertyEvent, FEED_UPDATE_EVENT};
use killfeed_test_utils::fixtures::hex_id;
use killfeed_test_utils::{EliminationChunk, PayloadBuilder, Player, ReplayBuilder};
use serde_json::json;

/// Header of a current-season replay.
pub const BENCH_HEADER: ReplayHeader = ReplayHeader {
    engine_network_version: 24,
    major: 24,
    minor: 10,
};

/// A synthetic match.
pub struct MatchProfile {
    /// Replay bytes.
    pub data: Vec<u8>,
    /// Chunk descriptors into `data`.
    pub chunks: Vec<ChunkDescriptor>,
    /// Replication events, in emission order.
    pub events: Vec<PropertyEvent>,
}

impl MatchProfile {
    /// A fresh unencrypted stream over the replay bytes.
    pub fn stream(&self) -> ReplayStream {
        ReplayStream::new(self.data.clone(), BENCH_HEADER)
    }
}

/// Weapon table with a handful of entries, leaving some codes unresolved.
pub fn weapon_table() -> WeaponTable {
    [(1, "Pistol"), (2, "Shotgun"), (3, "AssaultRifle"), (4, "SMG")]
        .into_iter()
        .collect()
}

/// Parse configuration used by every benchmark.
pub fn bench_config() -> ParseConfig {
    ParseConfig {
        weapons: weapon_table(),
        ..ParseConfig::default()
    }
}

/// Build a match with `eliminations` eliminations, one second apart.
pub fn match_profile(eliminations: usize) -> MatchProfile {
    let mut replay = ReplayBuilder::new().padding(256);
    let mut events = Vec::new();
    for i in 0..eliminations {
        let killer = (i % 97) as u8;
        let victim = (i % 89) as u8 + 100;
        let gun = (i % 6) as u8;
        let t = i as f64;
        let route = i % 4;

        if route != 3 {
            let body = EliminationChunk {
                header: BENCH_HEADER,
                eliminated: Player::Id([victim; 16]),
                eliminator: Player::Id([killer; 16]),
                gun_type: gun,
                knocked: i % 5 == 0,
                eliminated_location: Some([i as f32 * 10.0, 0.0, 0.0]),
                eliminator_location: Some([i as f32 * 10.0, 2500.0, 0.0]),
                distance: None,
                trailing: vec![],
            }
            .encode();
            replay = replay
                .chunk(GROUP_PLAYER_ELIM, "", Some((t * 1000.0) as u32), body)
                .padding(16);
        }
        if route != 2 {
            let payload = PayloadBuilder::new()
                .killer(&hex_id(killer))
                .victim(&hex_id(victim))
                .gun(json!(gun))
                .knocked(i % 5 == 0)
                .field("DistanceMetersSquared", json!(625.0))
                .time(t + 0.0004)
                .build();
            events.push(PropertyEvent::new(FEED_UPDATE_EVENT, payload));
        }
    }
    let (data, chunks) = replay.build();
    MatchProfile {
        data,
        chunks,
        events,
    }
}
