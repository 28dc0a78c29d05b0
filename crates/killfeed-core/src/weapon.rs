//! Weapon-type resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The weapon that caused an elimination.
///
/// Serializes untagged: a resolved name as a JSON string, an unresolved code
/// as a JSON number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Weapon {
    /// Weapon-type name from the lookup table, or reported as text.
    Named(String),
    /// Raw weapon-type code with no table entry.
    Code(u32),
}

impl Weapon {
    /// Whether two weapons may describe the same elimination.
    ///
    /// Equal weapons are compatible, and so is a bare code paired with a
    /// name, since the other source may know the name the table lacks. Two
    /// different codes or two different names are not.
    pub fn is_compatible(&self, other: &Weapon) -> bool {
        match (self, other) {
            (Self::Code(_), Self::Named(_)) | (Self::Named(_), Self::Code(_)) => true,
            (a, b) => a == b,
        }
    }

    /// Pick the more informative of `primary` and `fallback`.
    ///
    /// `primary` wins unless it is a bare code and `fallback` is named.
    pub fn prefer(primary: Option<Weapon>, fallback: Option<Weapon>) -> Option<Weapon> {
        match (primary, fallback) {
            (Some(Self::Code(_)), Some(named @ Self::Named(_))) => Some(named),
            (Some(p), _) => Some(p),
            (None, f) => f,
        }
    }
}

/// Weapon-type code → name lookup table.
///
/// The table contents are supplied by configuration; an empty table resolves
/// every code to [`Weapon::Code`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct WeaponTable {
    names: IndexMap<u32, String>,
}

impl WeaponTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a name for `code`, replacing any previous entry.
    pub fn insert(&mut self, code: u32, name: impl Into<String>) {
        self.names.insert(code, name.into());
    }

    /// Number of known codes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Resolve a code, falling back to the raw code.
    pub fn resolve(&self, code: u32) -> Weapon {
        match self.names.get(&code) {
            Some(name) => Weapon::Named(name.clone()),
            None => Weapon::Code(code),
        }
    }
}

impl<S: Into<String>> FromIterator<(u32, S)> for WeaponTable {
    fn from_iter<I: IntoIterator<Item = (u32, S)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(|(c, n)| (c, n.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_falls_back_to_code() {
        let table: WeaponTable = [(1, "Pistol")].into_iter().collect();
        assert_eq!(table.resolve(1), Weapon::Named("Pistol".into()));
        assert_eq!(table.resolve(9), Weapon::Code(9));
    }

    #[test]
    fn codes_are_compatible_with_names() {
        let ar = Weapon::Named("AR".into());
        let smg = Weapon::Named("SMG".into());
        assert!(ar.is_compatible(&Weapon::Code(4)));
        assert!(Weapon::Code(4).is_compatible(&ar));
        assert!(Weapon::Code(4).is_compatible(&Weapon::Code(4)));
        assert!(!Weapon::Code(4).is_compatible(&Weapon::Code(5)));
        assert!(!ar.is_compatible(&smg));
    }

    #[test]
    fn prefer_keeps_names_over_codes() {
        let ar = Weapon::Named("AR".into());
        assert_eq!(
            Weapon::prefer(Some(Weapon::Code(2)), Some(ar.clone())),
            Some(ar.clone())
        );
        assert_eq!(
            Weapon::prefer(Some(ar.clone()), Some(Weapon::Code(2))),
            Some(ar.clone())
        );
        assert_eq!(Weapon::prefer(None, Some(Weapon::Code(2))), Some(Weapon::Code(2)));
    }

    #[test]
    fn table_deserializes_from_json_object() {
        let table: WeaponTable = serde_json::from_str(r#"{"3": "Shotgun"}"#).unwrap();
        assert_eq!(table.resolve(3), Weapon::Named("Shotgun".into()));
    }

    #[test]
    fn serializes_untagged() {
        assert_eq!(
            serde_json::to_string(&Weapon::Named("AR".into())).unwrap(),
            "\"AR\""
        );
        assert_eq!(serde_json::to_string(&Weapon::Code(7)).unwrap(), "7");
    }
}
