//! World-space positions.

use serde::Serialize;

/// Largest coordinate magnitude accepted from a speculative location read,
/// in native (centimetre) units.
pub const MAX_REASONABLE_COORDINATE: f32 = 5_000_000.0;

/// Native world units are centimetres; distances are reported in metres.
pub const CM_TO_METERS: f64 = 0.01;

/// A position in native world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Vector3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vector3 {
    /// Construct from components.
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Whether every component is finite and within
    /// [`MAX_REASONABLE_COORDINATE`].
    ///
    /// Trailing bytes of an elimination chunk are only interpreted as a
    /// location when this holds.
    pub fn is_plausible(&self) -> bool {
        [self.x, self.y, self.z]
            .iter()
            .all(|c| c.is_finite() && c.abs() <= MAX_REASONABLE_COORDINATE)
    }

    /// Euclidean distance to `other` in metres.
    pub fn distance_meters(&self, other: &Vector3) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        let dz = f64::from(self.z) - f64::from(other.z);
        (dx * dx + dy * dy + dz * dz).sqrt() * CM_TO_METERS
    }
}
