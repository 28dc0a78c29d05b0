//! Parse configuration, validation, and error types.
//!
//! [`ParseConfig`] carries everything the pipeline used to take from
//! process-wide defaults: the field exports handed to the replication layer,
//! the event names the normalizer listens on, the weapon table, and the
//! diagnostics switch. [`validate()`](ParseConfig::validate) is run by
//! [`ReplayParse::new`](crate::pipeline::ReplayParse::new).

use std::collections::HashSet;
use std::error::Error;
use std::fmt;

use killfeed_core::WeaponTable;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::registry::{ExportNode, FieldExport};

/// Feed-update event: raised each time the elimination feed of a player
/// state changes.
pub const FEED_UPDATE_EVENT: &str =
    "FortniteGame.AthenaPlayerState:OnPlayerEliminationFeedUpdated";

/// Elimination-summary event: raised once per finished elimination.
pub const ELIMINATION_SUMMARY_EVENT: &str =
    "FortniteGame.FortPlayerStateAthena:OnPlayerEliminationSummary";

/// Groups the replication layer skips by default. Pawn state is by far the
/// bulk of a replay and carries nothing elimination-related.
pub const DEFAULT_IGNORED_GROUPS: &[&str] = &["PlayerPawn_Athena.PlayerPawn_Athena_C"];

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ParseConfig::validate()`] or loading.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// No elimination event names configured.
    NoEliminationEvents,
    /// An elimination event name is empty.
    EmptyEventName {
        /// Position in `elimination_events`.
        index: usize,
    },
    /// The same elimination event name is listed twice.
    DuplicateEventName {
        /// The repeated name.
        name: String,
    },
    /// The configuration document could not be parsed.
    Json {
        /// Parser message.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoEliminationEvents => write!(f, "no elimination event names configured"),
            Self::EmptyEventName { index } => {
                write!(f, "elimination event name at index {index} is empty")
            }
            Self::DuplicateEventName { name } => {
                write!(f, "elimination event name `{name}` listed more than once")
            }
            Self::Json { reason } => write!(f, "invalid configuration document: {reason}"),
        }
    }
}

impl Error for ConfigError {}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json {
            reason: e.to_string(),
        }
    }
}

// ── ParseConfig ────────────────────────────────────────────────────

/// Complete configuration for one replay parse.
///
/// Every field has a default, so a JSON document only needs to name what it
/// overrides:
///
/// ```
/// use killfeed_engine::ParseConfig;
///
/// let config = ParseConfig::from_json(r#"{ "weapons": { "3": "Pistol" }, "verbose": true }"#)
///     .unwrap();
/// assert!(config.verbose);
/// assert_eq!(config.weapons.len(), 1);
/// assert_eq!(config.elimination_events.len(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Field-export descriptors for the replication layer, possibly nested.
    /// Default: the elimination class and payload exports.
    pub field_exports: Vec<ExportNode>,
    /// Event names the built-in normalizer subscribes to.
    /// Default: [`FEED_UPDATE_EVENT`] and [`ELIMINATION_SUMMARY_EVENT`].
    pub elimination_events: Vec<String>,
    /// Export groups whose events are not dispatched.
    /// Default: [`DEFAULT_IGNORED_GROUPS`].
    pub ignored_groups: Vec<String>,
    /// Weapon-type code table. Default: empty.
    pub weapons: WeaponTable,
    /// Report discarded field exports and other diagnostics. Default: false.
    pub verbose: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            field_exports: default_field_exports(),
            elimination_events: vec![
                FEED_UPDATE_EVENT.to_string(),
                ELIMINATION_SUMMARY_EVENT.to_string(),
            ],
            ignored_groups: DEFAULT_IGNORED_GROUPS
                .iter()
                .map(|g| g.to_string())
                .collect(),
            weapons: WeaponTable::new(),
            verbose: false,
        }
    }
}

impl ParseConfig {
    /// Load from a JSON document. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Append caller exports after the current ones. Later entries override
    /// earlier ones with the same identity.
    pub fn with_field_exports(mut self, extra: impl IntoIterator<Item = ExportNode>) -> Self {
        self.field_exports.extend(extra);
        self
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.elimination_events.is_empty() {
            return Err(ConfigError::NoEliminationEvents);
        }
        let mut seen = HashSet::new();
        for (index, name) in self.elimination_events.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(ConfigError::EmptyEventName { index });
            }
            if !seen.insert(name.as_str()) {
                return Err(ConfigError::DuplicateEventName { name: name.clone() });
            }
        }
        Ok(())
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// The built-in exports: the player-state class that raises the elimination
/// events and the payload struct they carry.
pub fn default_field_exports() -> Vec<ExportNode> {
    let class = FieldExport {
        path: Some(vec![
            "/Script/FortniteGame.FortPlayerStateAthena".to_string(),
            "/Game/Athena/Athena_PlayerState.Athena_PlayerState_C".to_string(),
        ]),
        custom_export_name: Some("AthenaPlayerState".to_string()),
        export_name: Some("FortPlayerStateAthena".to_string()),
        export_type: Some("class".to_string()),
        extra: object(json!({
            "exportGroup": "FortniteGame.AthenaPlayerState",
            "parseLevel": 1,
            "properties": {
                "EliminationFeed": { "name": "EliminationFeed", "parseFunction": "readDynamicArray" }
            }
        })),
    };
    let payload = FieldExport {
        path: Some(vec!["/Script/FortniteGame.FortPlayerDeathReport".to_string()]),
        custom_export_name: None,
        export_name: Some("FortPlayerDeathReport".to_string()),
        export_type: Some("object".to_string()),
        extra: object(json!({
            "exportGroup": "FortniteGame.AthenaPlayerState",
            "parseLevel": 1,
            "properties": {
                "EliminatorId": { "name": "EliminatorId", "parseFunction": "readNetId" },
                "EliminatedId": { "name": "EliminatedId", "parseFunction": "readNetId" },
                "GunType": { "name": "GunType", "parseFunction": "readByte" },
                "bKnocked": { "name": "bKnocked", "parseFunction": "readBit" },
                "Distance": { "name": "Distance", "parseFunction": "readFloat32" },
                "EliminatorLocation": { "name": "EliminatorLocation", "parseFunction": "readVector" },
                "EliminatedLocation": { "name": "EliminatedLocation", "parseFunction": "readVector" },
                "TimeSeconds": { "name": "TimeSeconds", "parseFunction": "readFloat32" }
            }
        })),
    };
    vec![ExportNode::Group(vec![class.into(), payload.into()])]
}
