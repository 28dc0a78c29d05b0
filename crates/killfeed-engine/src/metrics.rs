//! Reconciliation counters.
//!
//! [`ReconcileStats`] records how each output record came about, so callers
//! can tell how much the two decode paths agreed on a given replay.

use serde::Serialize;

/// Outcome counts of one reconciliation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReconcileStats {
    /// Raw-chunk records merged with a property record at the same time bucket.
    pub exact_matches: usize,
    /// Raw-chunk records merged with a property record at a different time.
    pub loose_matches: usize,
    /// Raw-chunk records emitted without a property counterpart.
    pub raw_only: usize,
    /// Property records nothing was merged into.
    pub property_only: usize,
}

impl ReconcileStats {
    /// Number of canonical records produced.
    pub fn total(&self) -> usize {
        self.exact_matches + self.loose_matches + self.raw_only + self.property_only
    }
}
