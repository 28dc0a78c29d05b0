//! Decoded chunk payloads.

use killfeed_core::{ChunkDescriptor, RawElimination};
use serde::Serialize;

/// Per-player end-of-match statistics (`AthenaMatchStats`).
///
/// # Examples
///
/// ```
/// use killfeed_chunk::MatchStats;
///
/// let stats = MatchStats {
///     weapon_damage: 900,
///     other_damage: 100,
///     ..MatchStats::default()
/// };
/// assert_eq!(stats.damage_to_players(), 1000);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchStats {
    /// Hit accuracy as stored (fraction).
    pub accuracy: f32,
    /// Assists.
    pub assists: u32,
    /// Eliminations.
    pub eliminations: u32,
    /// Damage dealt with weapons.
    pub weapon_damage: u32,
    /// Damage dealt by other means.
    pub other_damage: u32,
    /// Teammates revived.
    pub revives: u32,
    /// Damage received.
    pub damage_taken: u32,
    /// Damage dealt to structures.
    pub damage_to_structures: u32,
    /// Materials gathered.
    pub materials_gathered: u32,
    /// Materials used.
    pub materials_used: u32,
    /// Distance travelled, native units.
    pub total_traveled: u32,
}

impl MatchStats {
    /// Total damage dealt to players: weapon plus other damage.
    pub fn damage_to_players(&self) -> u64 {
        u64::from(self.weapon_damage) + u64::from(self.other_damage)
    }
}

/// Team placement (`AthenaMatchTeamStats`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    /// Leading field of unknown meaning, kept verbatim.
    pub unknown: i32,
    /// Final placement.
    pub position: u32,
    /// Number of players in the match.
    pub total_players: u32,
}

/// What a chunk decoded to.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ChunkPayload {
    /// A `playerElim` chunk.
    Elimination(RawElimination),
    /// An `AthenaMatchStats` chunk.
    MatchStats(MatchStats),
    /// An `AthenaMatchTeamStats` chunk.
    TeamStats(TeamStats),
    /// A chunk this crate does not decode.
    Other,
}

/// One decoded chunk together with its descriptor.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChunkEvent {
    /// Where the chunk came from.
    pub chunk: ChunkDescriptor,
    /// The decoded body.
    pub payload: ChunkPayload,
}

impl ChunkEvent {
    /// The elimination record, if this is a `playerElim` chunk.
    pub fn elimination(&self) -> Option<&RawElimination> {
        match &self.payload {
            ChunkPayload::Elimination(elim) => Some(elim),
            _ => None,
        }
    }
}
