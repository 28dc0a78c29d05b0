//! Elimination records: the raw per-chunk shape and the canonical output.

use serde::Serialize;

use crate::geometry::Vector3;
use crate::id::PlayerRef;
use crate::weapon::Weapon;

/// One elimination decoded from a `playerElim` chunk.
///
/// Optional fields are only present when the trailing bytes of the chunk
/// passed their plausibility checks.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RawElimination {
    /// The eliminated player, `None` if the reference tag was unrecognized.
    pub eliminated: Option<PlayerRef>,
    /// The eliminating player, `None` if the reference tag was unrecognized.
    pub eliminator: Option<PlayerRef>,
    /// Weapon resolved through the weapon table.
    pub gun_type: Weapon,
    /// Whether this was a knock rather than a finish.
    pub knocked: bool,
    /// Position of the eliminated player.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminated_location: Option<Vector3>,
    /// Position of the eliminating player.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eliminator_location: Option<Vector3>,
    /// Distance as stored in the chunk, unit unspecified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    /// Match time in seconds, from the chunk's start time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_seconds: Option<f64>,
}

/// The deduplicated, merged output record for one real elimination.
///
/// `distance` is always metres, finite and non-negative when present; use
/// [`valid_distance`] before assigning it.
///
/// # Examples
///
/// ```
/// use killfeed_core::{CanonicalElimination, PlayerRef, Weapon};
///
/// let elim = CanonicalElimination {
///     killer: Some(PlayerRef::Name("a".into())),
///     victim: Some(PlayerRef::Bot),
///     weapon: Some(Weapon::Code(3)),
///     knocked: false,
///     distance: Some(12.5),
///     t: Some(90.0),
/// };
/// assert!(elim.has_participant());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct CanonicalElimination {
    /// Eliminating player.
    pub killer: Option<PlayerRef>,
    /// Eliminated player.
    pub victim: Option<PlayerRef>,
    /// Weapon used.
    pub weapon: Option<Weapon>,
    /// Whether this was a knock rather than a finish.
    pub knocked: bool,
    /// Distance between the players, in metres.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Match time in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<f64>,
}

impl CanonicalElimination {
    /// Whether at least one of killer and victim is known.
    pub fn has_participant(&self) -> bool {
        self.killer.is_some() || self.victim.is_some()
    }
}

/// Accept a distance only if it is finite and non-negative.
pub fn valid_distance(d: f64) -> Option<f64> {
    (d.is_finite() && d >= 0.0).then_some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_distance_rejects_bad_values() {
        assert_eq!(valid_distance(3.5), Some(3.5));
        assert_eq!(valid_distance(0.0), Some(0.0));
        assert_eq!(valid_distance(-1.0), None);
        assert_eq!(valid_distance(f64::NAN), None);
        assert_eq!(valid_distance(f64::INFINITY), None);
    }

    #[test]
    fn canonical_json_omits_absent_optionals() {
        let elim = CanonicalElimination {
            killer: Some(PlayerRef::Bot),
            victim: Some(PlayerRef::Name("v".into())),
            weapon: Some(Weapon::Named("AR".into())),
            knocked: true,
            distance: None,
            t: None,
        };
        let json = serde_json::to_value(&elim).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "killer": "bot",
                "victim": "v",
                "weapon": "AR",
                "knocked": true
            })
        );
    }
}
