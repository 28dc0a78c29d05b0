//! Binary decode of `playerElim` chunk bodies.
//!
//! Layout, after a version-dependent preamble:
//!
//! ```text
//! [eliminated player] [eliminator player] [gun type u8] [knocked u8]
//! ([eliminated location 3×f32]) ([eliminator location 3×f32]) ([distance f32])
//! ```
//!
//! Tagged players (newer replays) are a tag byte followed by the payload for
//! that tag; older replays store both players as bare length-prefixed strings.
//! The trailing fields are not present in every build and are read
//! speculatively: anything that fails its plausibility check is rolled back
//! and omitted.

use killfeed_core::{
    BitReader, PlayerRef, RawElimination, ReadError, ReplayHeader, Vector3, WeaponTable,
};
use tracing::{debug, warn};

use crate::error::FieldError;

/// Player tag: AI-controlled player, no payload.
pub const TAG_BOT: u8 = 3;
/// Player tag: length-prefixed display name.
pub const TAG_NAME: u8 = 16;
/// Player tag: one filler byte, then a 16-byte network id.
pub const TAG_ID: u8 = 17;

/// How the two players of an elimination are encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerEncoding {
    /// Tag byte plus payload ([`TAG_BOT`], [`TAG_NAME`], [`TAG_ID`]).
    Tagged,
    /// Bare length-prefixed strings.
    Plain,
}

/// The version-dependent shape of an elimination chunk.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EliminationLayout {
    /// Bytes skipped before the first player.
    pub preamble: usize,
    /// Player encoding.
    pub players: PlayerEncoding,
}

impl EliminationLayout {
    /// Resolve the layout for a replay header.
    ///
    /// | condition | preamble | players |
    /// |-----------|----------|---------|
    /// | net ≥ 11, major ≥ 9, net ≥ 23 | 165 | tagged |
    /// | net ≥ 11, major ≥ 9 | 85 | tagged |
    /// | major ≤ 4, minor < 2 | 12 | plain |
    /// | major = 4, minor ≤ 2 | 40 | plain |
    /// | otherwise | 45 | plain |
    pub fn for_header(header: &ReplayHeader) -> Self {
        if header.uses_tagged_players() {
            let preamble = if header.engine_network_version >= 23 {
                165
            } else {
                85
            };
            return Self {
                preamble,
                players: PlayerEncoding::Tagged,
            };
        }
        let preamble = if header.major <= 4 && header.minor < 2 {
            12
        } else if header.major == 4 && header.minor <= 2 {
            40
        } else {
            45
        };
        Self {
            preamble,
            players: PlayerEncoding::Plain,
        }
    }
}

/// Run a mandatory read, attaching the field name and start offset on failure.
pub(crate) fn field<T>(
    r: &mut BitReader,
    name: &'static str,
    read: impl FnOnce(&mut BitReader) -> Result<T, ReadError>,
) -> Result<T, FieldError> {
    let offset_bits = r.offset();
    read(r).map_err(|source| FieldError {
        field: name,
        offset_bits,
        source,
    })
}

/// Decode one tagged player reference.
///
/// An unrecognized tag is logged and yields `Ok(None)`; only the tag byte is
/// consumed in that case.
pub fn decode_player(
    r: &mut BitReader,
    name: &'static str,
) -> Result<Option<PlayerRef>, FieldError> {
    let tag = field(r, name, BitReader::read_byte)?;
    match tag {
        TAG_BOT => Ok(Some(PlayerRef::Bot)),
        TAG_NAME => field(r, name, BitReader::read_string).map(|s| Some(PlayerRef::Name(s))),
        TAG_ID => {
            field(r, name, |r| r.skip_bytes(1))?;
            field(r, name, BitReader::read_id).map(|id| Some(PlayerRef::Id(id)))
        }
        other => {
            warn!(
                tag = other,
                field = name,
                offset_bits = r.offset(),
                "unrecognized player tag"
            );
            Ok(None)
        }
    }
}

fn decode_plain_player(
    r: &mut BitReader,
    name: &'static str,
) -> Result<Option<PlayerRef>, FieldError> {
    field(r, name, BitReader::read_string).map(|s| Some(PlayerRef::Name(s)))
}

/// Speculatively read a location; implausible values are rolled back.
pub fn read_vector_candidate(r: &mut BitReader) -> Option<Vector3> {
    r.speculate(96, |r| {
        let v = Vector3::new(r.read_f32().ok()?, r.read_f32().ok()?, r.read_f32().ok()?);
        if !v.is_plausible() {
            debug!(?v, "discarding implausible trailing location");
            return None;
        }
        Some(v)
    })
}

/// Speculatively read a finite f32; anything else is rolled back.
pub fn read_float_candidate(r: &mut BitReader) -> Option<f32> {
    r.speculate(32, |r| r.read_f32().ok().filter(|v| v.is_finite()))
}

/// Decode an elimination chunk body from a reader positioned at its start.
///
/// `time_seconds` is left unset; the caller fills it from the descriptor.
pub fn decode_elimination(
    r: &mut BitReader,
    weapons: &WeaponTable,
) -> Result<RawElimination, FieldError> {
    let layout = EliminationLayout::for_header(r.header());
    field(r, "preamble", |r| r.skip_bytes(layout.preamble))?;

    let (eliminated, eliminator) = match layout.players {
        PlayerEncoding::Tagged => (
            decode_player(r, "eliminated")?,
            decode_player(r, "eliminator")?,
        ),
        PlayerEncoding::Plain => (
            decode_plain_player(r, "eliminated")?,
            decode_plain_player(r, "eliminator")?,
        ),
    };

    let gun_code = field(r, "gun_type", BitReader::read_byte)?;
    let knocked = field(r, "knocked", BitReader::read_bool)?;

    let eliminated_location = read_vector_candidate(r);
    let eliminator_location = read_vector_candidate(r);
    let distance = read_float_candidate(r);

    Ok(RawElimination {
        eliminated,
        eliminator,
        gun_type: weapons.resolve(u32::from(gun_code)),
        knocked,
        eliminated_location,
        eliminator_location,
        distance,
        time_seconds: None,
    })
}
