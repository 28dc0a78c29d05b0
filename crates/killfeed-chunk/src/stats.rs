//! Decoders for the end-of-match statistics chunks.

use killfeed_core::BitReader;

use crate::codec::field;
use crate::error::FieldError;
use crate::types::{MatchStats, TeamStats};

/// Decode an `AthenaMatchStats` body.
///
/// Layout: 4 unknown bytes, f32 accuracy, then ten little-endian u32
/// counters in declaration order of [`MatchStats`].
pub fn decode_match_stats(r: &mut BitReader) -> Result<MatchStats, FieldError> {
    field(r, "header", |r| r.skip_bytes(4))?;
    Ok(MatchStats {
        accuracy: field(r, "accuracy", BitReader::read_f32)?,
        assists: field(r, "assists", BitReader::read_u32)?,
        eliminations: field(r, "eliminations", BitReader::read_u32)?,
        weapon_damage: field(r, "weapon_damage", BitReader::read_u32)?,
        other_damage: field(r, "other_damage", BitReader::read_u32)?,
        revives: field(r, "revives", BitReader::read_u32)?,
        damage_taken: field(r, "damage_taken", BitReader::read_u32)?,
        damage_to_structures: field(r, "damage_to_structures", BitReader::read_u32)?,
        materials_gathered: field(r, "materials_gathered", BitReader::read_u32)?,
        materials_used: field(r, "materials_used", BitReader::read_u32)?,
        total_traveled: field(r, "total_traveled", BitReader::read_u32)?,
    })
}

/// Decode an `AthenaMatchTeamStats` body: i32, then placement and player count.
pub fn decode_team_stats(r: &mut BitReader) -> Result<TeamStats, FieldError> {
    Ok(TeamStats {
        unknown: field(r, "unknown", BitReader::read_i32)?,
        position: field(r, "position", BitReader::read_u32)?,
        total_players: field(r, "total_players", BitReader::read_u32)?,
    })
}
