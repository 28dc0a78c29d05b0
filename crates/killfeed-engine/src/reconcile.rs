//! Merge raw-chunk and property eliminations into one canonical list.
//!
//! Property records are indexed by participant pair and millisecond time
//! bucket. Each raw record then looks for a counterpart:
//!
//! 1. **exact**: same pair, same bucket, same weapon, same knock state;
//! 2. **loose**: same pair and knock state, compatible weapon, any time.
//!    A missing weapon matches anything and a bare code matches a name;
//!    two different codes never match. The closest in time wins; ties go
//!    to the first observed.
//!
//! A matched pair is merged with raw values taking precedence, and the
//! property record is consumed. Unmatched raw records and unconsumed
//! property records pass through as they are. The result is stably sorted by
//! time, records without a time last.
//!
//! Two distinct eliminations between the same pair that land in the same
//! bucket are indistinguishable here and may be merged.

use std::cmp::Ordering;

use indexmap::IndexMap;
use killfeed_core::{CanonicalElimination, PlayerRef, Weapon};
use tracing::debug;

use crate::metrics::ReconcileStats;

type Participants = (Option<PlayerRef>, Option<PlayerRef>);

/// Millisecond bucket of a match time; `None` for a missing or non-finite
/// time.
pub fn time_bucket(t: Option<f64>) -> Option<i64> {
    t.filter(|t| t.is_finite()).map(|t| (t * 1000.0).round() as i64)
}

/// Whether two optional weapons may describe the same elimination.
pub fn weapons_compatible(a: Option<&Weapon>, b: Option<&Weapon>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.is_compatible(b),
        _ => true,
    }
}

/// Combine a raw record with its property counterpart.
pub fn merge(raw: CanonicalElimination, property: &CanonicalElimination) -> CanonicalElimination {
    CanonicalElimination {
        killer: raw.killer.or_else(|| property.killer.clone()),
        victim: raw.victim.or_else(|| property.victim.clone()),
        weapon: Weapon::prefer(raw.weapon, property.weapon.clone()),
        knocked: raw.knocked,
        distance: raw.distance.or(property.distance),
        t: raw.t.or(property.t),
    }
}

/// Ascending time, missing times last.
pub fn compare_time(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by [`compare_time`].
pub fn sort_by_time(elims: &mut [CanonicalElimination]) {
    elims.sort_by(|a, b| compare_time(a.t, b.t));
}

/// Property records indexed for matching.
struct ParticipantTimeIndex {
    records: Vec<CanonicalElimination>,
    consumed: Vec<bool>,
    by_pair: IndexMap<Participants, IndexMap<Option<i64>, Vec<usize>>>,
}

impl ParticipantTimeIndex {
    fn new(records: Vec<CanonicalElimination>) -> Self {
        let mut by_pair: IndexMap<Participants, IndexMap<Option<i64>, Vec<usize>>> =
            IndexMap::new();
        for (i, rec) in records.iter().enumerate() {
            by_pair
                .entry((rec.killer.clone(), rec.victim.clone()))
                .or_default()
                .entry(time_bucket(rec.t))
                .or_default()
                .push(i);
        }
        Self {
            consumed: vec![false; records.len()],
            records,
            by_pair,
        }
    }

    fn exact(&self, raw: &CanonicalElimination, pair: &Participants) -> Option<usize> {
        self.by_pair
            .get(pair)?
            .get(&time_bucket(raw.t))?
            .iter()
            .copied()
            .find(|&i| {
                let p = &self.records[i];
                !self.consumed[i] && p.weapon == raw.weapon && p.knocked == raw.knocked
            })
    }

    fn loose(&self, raw: &CanonicalElimination, pair: &Participants) -> Option<usize> {
        let mut candidates: Vec<usize> = self
            .by_pair
            .get(pair)?
            .values()
            .flatten()
            .copied()
            .filter(|&i| {
                let p = &self.records[i];
                !self.consumed[i]
                    && p.knocked == raw.knocked
                    && weapons_compatible(p.weapon.as_ref(), raw.weapon.as_ref())
            })
            .collect();
        candidates.sort_unstable();

        let gap = |i: usize| match (raw.t, self.records[i].t) {
            (Some(a), Some(b)) => (a - b).abs(),
            _ => f64::INFINITY,
        };
        let mut best: Option<(usize, f64)> = None;
        for i in candidates {
            let g = gap(i);
            if best.map_or(true, |(_, bg)| g < bg) {
                best = Some((i, g));
            }
        }
        best.map(|(i, _)| i)
    }

    fn take(&mut self, i: usize) -> &CanonicalElimination {
        self.consumed[i] = true;
        &self.records[i]
    }

    fn into_unconsumed(self) -> impl Iterator<Item = CanonicalElimination> {
        self.records
            .into_iter()
            .zip(self.consumed)
            .filter_map(|(rec, used)| (!used).then_some(rec))
    }
}

/// Reconcile `raw` (from chunk decoding) with `property` (from the
/// replication layer), both in observation order.
pub fn reconcile(
    raw: Vec<CanonicalElimination>,
    property: Vec<CanonicalElimination>,
) -> (Vec<CanonicalElimination>, ReconcileStats) {
    let mut stats = ReconcileStats::default();
    let mut index = ParticipantTimeIndex::new(property);
    let mut out = Vec::with_capacity(raw.len() + index.records.len());

    for rec in raw {
        if !rec.has_participant() {
            debug!(?rec, "dropping raw elimination without participants");
            continue;
        }
        let pair = (rec.killer.clone(), rec.victim.clone());
        if let Some(i) = index.exact(&rec, &pair) {
            stats.exact_matches += 1;
            out.push(merge(rec, index.take(i)));
        } else if let Some(i) = index.loose(&rec, &pair) {
            stats.loose_matches += 1;
            out.push(merge(rec, index.take(i)));
        } else {
            stats.raw_only += 1;
            out.push(rec);
        }
    }

    let before = out.len();
    out.extend(index.into_unconsumed());
    stats.property_only = out.len() - before;

    sort_by_time(&mut out);
    debug!(
        exact = stats.exact_matches,
        loose = stats.loose_matches,
        raw_only = stats.raw_only,
        property_only = stats.property_only,
        "reconciled eliminations"
    );
    (out, stats)
}
