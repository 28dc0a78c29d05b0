//! The parse pipeline: chunk decode, property dispatch, reconciliation.
//!
//! [`ReplayParse`] owns one pass over one replay. It is built from a
//! validated [`ParseConfig`], which subscribes the normalizer to every
//! configured elimination event. Chunks are decoded with
//! [`decode_chunks`](ReplayParse::decode_chunks), replication events are fed
//! through [`dispatch`](ReplayParse::dispatch) in emission order, and
//! [`finish`](ReplayParse::finish) reconciles both sources into the final
//! [`ParseResult`].
//!
//! [`parse_eliminations`] does all of that in one call.

use std::error::Error;
use std::fmt;

use killfeed_chunk::{ChunkEvent, ChunkEvents, ChunkPayload, DecodeError, MatchStats, TeamStats};
use killfeed_core::{CanonicalElimination, ChunkDescriptor, ReplayStream};
use serde::Serialize;
use tracing::debug;

use crate::config::{ConfigError, ParseConfig};
use crate::dispatch::{PropertyDispatcher, PropertyEvent};
use crate::metrics::ReconcileStats;
use crate::normalize::{normalize_property, normalize_raw};
use crate::reconcile::reconcile;
use crate::registry::FieldExportRegistry;

// ── ParseResult ────────────────────────────────────────────────────

/// Everything one parse produced.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseResult {
    /// Every decoded chunk, in descriptor order.
    pub chunk_events: Vec<ChunkEvent>,
    /// Normalized property eliminations, in emission order. Cleared by
    /// [`ReplayParse::finish`] once merged.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub property_eliminations: Vec<CanonicalElimination>,
    /// The canonical elimination list, sorted by time.
    pub eliminations: Vec<CanonicalElimination>,
    /// How the canonical list was assembled.
    pub stats: ReconcileStats,
}

impl ParseResult {
    /// Per-player statistics, if the replay had an `AthenaMatchStats` chunk.
    pub fn match_stats(&self) -> Option<&MatchStats> {
        self.chunk_events.iter().find_map(|e| match &e.payload {
            ChunkPayload::MatchStats(s) => Some(s),
            _ => None,
        })
    }

    /// Team placement, if the replay had an `AthenaMatchTeamStats` chunk.
    pub fn team_stats(&self) -> Option<&TeamStats> {
        self.chunk_events.iter().find_map(|e| match &e.payload {
            ChunkPayload::TeamStats(s) => Some(s),
            _ => None,
        })
    }
}

// ── ParseError ─────────────────────────────────────────────────────

/// Fatal errors from [`parse_eliminations`].
#[derive(Debug, PartialEq)]
pub enum ParseError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// A chunk could not be decoded.
    Decode(DecodeError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Decode(e) => write!(f, "decode: {e}"),
        }
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Decode(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ParseError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<DecodeError> for ParseError {
    fn from(e: DecodeError) -> Self {
        Self::Decode(e)
    }
}

// ── ReplayParse ────────────────────────────────────────────────────

/// One in-progress parse.
#[derive(Debug)]
pub struct ReplayParse {
    config: ParseConfig,
    registry: FieldExportRegistry,
    dispatcher: PropertyDispatcher,
    result: ParseResult,
}

impl ReplayParse {
    /// Validate `config` and subscribe the normalizer to its elimination
    /// events.
    pub fn new(config: ParseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let registry = FieldExportRegistry::build(&config.field_exports, config.verbose);
        let mut dispatcher =
            PropertyDispatcher::new().with_ignored_groups(config.ignored_groups.iter().cloned());
        for name in &config.elimination_events {
            let weapons = config.weapons.clone();
            dispatcher.subscribe(name.clone(), move |event, result| {
                result
                    .property_eliminations
                    .push(normalize_property(event, &weapons));
            });
        }
        Ok(Self {
            config,
            registry,
            dispatcher,
            result: ParseResult::default(),
        })
    }

    /// The configuration this parse runs under.
    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// The field exports to hand to the replication layer.
    pub fn registry(&self) -> &FieldExportRegistry {
        &self.registry
    }

    /// Register an additional listener. It runs after the built-in ones.
    pub fn subscribe<F>(&mut self, name: impl Into<String>, listener: F)
    where
        F: FnMut(&PropertyEvent, &mut ParseResult) + 'static,
    {
        self.dispatcher.subscribe(name, listener);
    }

    /// Decode `chunks` in order, appending to the result.
    ///
    /// Stops at the first chunk that fails to decode.
    pub fn decode_chunks(
        &mut self,
        stream: &mut ReplayStream,
        chunks: &[ChunkDescriptor],
    ) -> Result<(), DecodeError> {
        for event in ChunkEvents::new(stream, chunks.iter(), &self.config.weapons) {
            self.result.chunk_events.push(event?);
        }
        Ok(())
    }

    /// Deliver one replication event.
    pub fn dispatch(&mut self, event: &PropertyEvent) {
        self.dispatcher.dispatch(event, &mut self.result);
    }

    /// Read access to the result so far.
    pub fn result(&self) -> &ParseResult {
        &self.result
    }

    /// Reconcile both sources and return the final result.
    pub fn finish(self) -> ParseResult {
        let mut result = self.result;
        let raw: Vec<CanonicalElimination> = result
            .chunk_events
            .iter()
            .filter_map(ChunkEvent::elimination)
            .map(normalize_raw)
            .collect();
        let property = std::mem::take(&mut result.property_eliminations);
        debug!(
            raw = raw.len(),
            property = property.len(),
            "reconciling eliminations"
        );
        let (eliminations, stats) = reconcile(raw, property);
        result.eliminations = eliminations;
        result.stats = stats;
        result
    }
}

/// Run a whole parse: decode every chunk, dispatch every property event in
/// order, reconcile.
pub fn parse_eliminations(
    stream: &mut ReplayStream,
    chunks: &[ChunkDescriptor],
    property_events: impl IntoIterator<Item = PropertyEvent>,
    config: ParseConfig,
) -> Result<ParseResult, ParseError> {
    let mut parse = ReplayParse::new(config)?;
    parse.decode_chunks(stream, chunks)?;
    for event in property_events {
        parse.dispatch(&event);
    }
    Ok(parse.finish())
}
