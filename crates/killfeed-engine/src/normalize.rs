//! Mapping of both elimination sources onto [`CanonicalElimination`].
//!
//! Raw chunk records are already typed; property payloads are loose field
//! maps whose values may be numbers, strings, nested objects or missing.
//! Everything numeric goes through [`sanitize_number`], and every distance
//! that reaches the output has passed [`valid_distance`].

use killfeed_core::{
    valid_distance, CanonicalElimination, PlayerRef, RawElimination, Weapon, WeaponTable,
    CM_TO_METERS,
};
use serde_json::{Map, Value};

use crate::dispatch::PropertyEvent;

static NULL: Value = Value::Null;

/// Direct distances above this are taken to be centimetres.
pub const CENTIMETRE_THRESHOLD: f64 = 1000.0;

/// Direct distance fields, in priority order.
pub const DIRECT_DISTANCE_FIELDS: [&str; 3] = ["Distance", "DistanceMeters", "EliminationDistance"];

/// Extract a finite number from a payload value.
///
/// Objects (e.g. a wrapped float) yield their first numeric member.
pub fn sanitize_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(map) => map.values().find_map(Value::as_f64),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// Make a direct distance non-negative and in metres.
pub fn normalize_distance_value(d: f64) -> Option<f64> {
    if !d.is_finite() {
        return None;
    }
    let d = d.abs();
    let meters = if d > CENTIMETRE_THRESHOLD {
        d * CM_TO_METERS
    } else {
        d
    };
    valid_distance(meters)
}

/// A location value as `[x, y, z]`. Accepts lower- or upper-case keys.
pub fn location(value: &Value) -> Option<[f64; 3]> {
    let map = value.as_object()?;
    let axis = |lower: &str, upper: &str| {
        map.get(lower)
            .or_else(|| map.get(upper))
            .and_then(sanitize_number)
    };
    Some([axis("x", "X")?, axis("y", "Y")?, axis("z", "Z")?])
}

/// Euclidean distance between two native-unit points, in metres.
pub fn derive_distance(a: [f64; 3], b: [f64; 3]) -> Option<f64> {
    let squared: f64 = a.iter().zip(&b).map(|(p, q)| (p - q) * (p - q)).sum();
    valid_distance(squared.sqrt() * CM_TO_METERS)
}

/// Resolve a payload's distance in metres.
///
/// First usable direct field, then the square root of
/// `DistanceMetersSquared`, then the eliminator/finisher to
/// eliminated/victim location pair.
pub fn property_distance(data: &Map<String, Value>) -> Option<f64> {
    let direct = DIRECT_DISTANCE_FIELDS
        .iter()
        .filter_map(|f| data.get(*f))
        .filter_map(sanitize_number)
        .find_map(normalize_distance_value);
    if direct.is_some() {
        return direct;
    }

    if let Some(squared) = data.get("DistanceMetersSquared").and_then(sanitize_number) {
        if let Some(d) = valid_distance(squared.abs().sqrt()) {
            return Some(d);
        }
    }

    let field = |primary: &str, fallback: &str| {
        data.get(primary)
            .filter(|v| !v.is_null())
            .or_else(|| data.get(fallback))
            .and_then(location)
    };
    let eliminator = field("EliminatorLocation", "FinisherLocation")?;
    let eliminated = field("EliminatedLocation", "VictimLocation")?;
    derive_distance(eliminator, eliminated)
}

/// JavaScript-style truthiness, as the replication layer reports flags in
/// whatever shape the export happened to declare.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce a participant value.
pub fn coerce_participant(value: &Value) -> Option<PlayerRef> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(PlayerRef::parse(s)),
        Value::Number(n) => Some(PlayerRef::Name(n.to_string())),
        Value::Bool(b) => Some(PlayerRef::Name(b.to_string())),
        other => Some(PlayerRef::Name(other.to_string())),
    }
}

/// Coerce a weapon value: integral codes go through the table, text is a name.
pub fn coerce_weapon(value: &Value, weapons: &WeaponTable) -> Option<Weapon> {
    match value {
        Value::Null => None,
        Value::Number(n) => match n.as_u64().and_then(|c| u32::try_from(c).ok()) {
            Some(code) => Some(weapons.resolve(code)),
            None => Some(Weapon::Named(n.to_string())),
        },
        Value::String(s) => Some(Weapon::Named(s.clone())),
        other => Some(Weapon::Named(other.to_string())),
    }
}

/// Normalize a property event payload.
pub fn normalize_property(event: &PropertyEvent, weapons: &WeaponTable) -> CanonicalElimination {
    let data = &event.data;
    let get = |name: &str| data.get(name).unwrap_or(&NULL);
    CanonicalElimination {
        killer: coerce_participant(get("EliminatorId")),
        victim: coerce_participant(get("EliminatedId")),
        weapon: coerce_weapon(get("GunType"), weapons),
        knocked: truthy(get("bKnocked")),
        distance: property_distance(data),
        t: sanitize_number(get("TimeSeconds")).or(event.time_seconds.filter(|t| t.is_finite())),
    }
}

/// Normalize a decoded raw chunk record.
pub fn normalize_raw(raw: &RawElimination) -> CanonicalElimination {
    let located = match (&raw.eliminator_location, &raw.eliminated_location) {
        (Some(a), Some(b)) => valid_distance(a.distance_meters(b)),
        _ => None,
    };
    CanonicalElimination {
        killer: raw.eliminator.clone(),
        victim: raw.eliminated.clone(),
        weapon: Some(raw.gun_type.clone()),
        knocked: raw.knocked,
        distance: raw
            .distance
            .and_then(|d| normalize_distance_value(f64::from(d)))
            .or(located),
        t: raw.time_seconds.filter(|t| t.is_finite()),
    }
}
