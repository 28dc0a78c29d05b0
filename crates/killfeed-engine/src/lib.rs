//! Elimination normalization, reconciliation and the replay parse pipeline.
//!
//! Eliminations reach a parse by two independent routes: `playerElim`
//! chunks decoded by [`killfeed_chunk`], and elimination events raised by
//! the property-replication layer. Either, neither or both may report any
//! given elimination. This crate normalizes both into
//! [`CanonicalElimination`](killfeed_core::CanonicalElimination) records and
//! merges them into one time-ordered list.
//!
//! The replication layer itself lives outside this crate. It receives the
//! [`FieldExportRegistry`] to know what to decode and raises its events into
//! a [`ReplayParse`] through [`ReplayParse::dispatch`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod dispatch;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod reconcile;
pub mod registry;

pub use config::{
    default_field_exports, ConfigError, ParseConfig, DEFAULT_IGNORED_GROUPS,
    ELIMINATION_SUMMARY_EVENT, FEED_UPDATE_EVENT,
};
pub use dispatch::{Listener, PropertyDispatcher, PropertyEvent};
pub use metrics::ReconcileStats;
pub use normalize::{normalize_property, normalize_raw};
pub use pipeline::{parse_eliminations, ParseError, ParseResult, ReplayParse};
pub use reconcile::reconcile;
pub use registry::{ExportNode, FieldExport, FieldExportRegistry};
