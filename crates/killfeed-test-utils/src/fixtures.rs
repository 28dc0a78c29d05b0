//! Property-event payload fixtures.
//!
//! Payloads are the loosely-typed field maps the replication layer raises
//! with its elimination events. Field names follow the game's class
//! exports (`EliminatorId`, `bKnocked`, `DistanceMetersSquared`, ...).

use serde_json::{json, Map, Value};

/// Builder for elimination event payloads.
#[derive(Clone, Debug, Default)]
pub struct PayloadBuilder {
    fields: Map<String, Value>,
}

impl PayloadBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an arbitrary field.
    pub fn field(mut self, name: &str, value: Value) -> Self {
        self.fields.insert(name.to_owned(), value);
        self
    }

    pub fn killer(self, id: &str) -> Self {
        self.field("EliminatorId", json!(id))
    }

    pub fn victim(self, id: &str) -> Self {
        self.field("EliminatedId", json!(id))
    }

    pub fn gun(self, gun: Value) -> Self {
        self.field("GunType", gun)
    }

    pub fn knocked(self, knocked: bool) -> Self {
        self.field("bKnocked", json!(knocked))
    }

    pub fn time(self, seconds: f64) -> Self {
        self.field("TimeSeconds", json!(seconds))
    }

    pub fn distance(self, meters: f64) -> Self {
        self.field("Distance", json!(meters))
    }

    /// Location in the `{X, Y, Z}` shape replicated vectors take.
    pub fn location(self, name: &str, v: [f64; 3]) -> Self {
        self.field(name, json!({ "X": v[0], "Y": v[1], "Z": v[2] }))
    }

    pub fn build(self) -> Map<String, Value> {
        self.fields
    }
}

/// A 32-hex-digit player id whose every byte is `byte`.
pub fn hex_id(byte: u8) -> String {
    format!("{byte:02x}").repeat(16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_id_is_32_digits() {
        assert_eq!(hex_id(0xab).len(), 32);
        assert!(hex_id(0xab).starts_with("abab"));
    }

    #[test]
    fn builder_keeps_insertion_order() {
        let p = PayloadBuilder::new().victim("v").killer("k").build();
        let keys: Vec<_> = p.keys().cloned().collect();
        assert_eq!(keys, ["EliminatedId", "EliminatorId"]);
    }
}
