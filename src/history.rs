/// Historical DRI snapshots: the shape contract storage must fulfil.
///
/// The engine does not own persistence. What it owns is the record shape a
/// storage collaborator must keep — (timestamp, score, level) per site — and
/// the replay path that regenerates those records from stored readings. The
/// in-memory store here backs tests and development replay; a production
/// deployment implements `SnapshotStore` over its own database.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::engine::assemble_at;
use crate::model::{DriError, DriResult, LandUse, Reading, RiskLevel};

// ---------------------------------------------------------------------------
// Snapshot shape
// ---------------------------------------------------------------------------

/// The persisted form of one DRI computation: the tuple trend charts and
/// CSV exports are built from. Keyed by (site id, timestamp) in storage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriSnapshot {
    pub timestamp: DateTime<Utc>,
    pub dri_score: f64,
    pub risk_level: RiskLevel,
}

impl From<&DriResult> for DriSnapshot {
    fn from(result: &DriResult) -> Self {
        DriSnapshot {
            timestamp: result.timestamp,
            dri_score: result.dri_score,
            risk_level: result.risk_level,
        }
    }
}

// ---------------------------------------------------------------------------
// Storage contract
// ---------------------------------------------------------------------------

/// Contract for the external storage collaborator.
///
/// `window` must return snapshots ordered by timestamp ascending — callers
/// chart and export them in that order without re-sorting.
pub trait SnapshotStore {
    fn record(&mut self, site_id: u32, snapshot: DriSnapshot);

    /// Snapshots for `site_id` within the last `days` days before `now`,
    /// ordered by timestamp ascending.
    fn window(&self, site_id: u32, days: i64, now: DateTime<Utc>) -> Vec<DriSnapshot>;
}

/// In-memory `SnapshotStore` for tests and development replay.
#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    snapshots: BTreeMap<u32, Vec<DriSnapshot>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn record(&mut self, site_id: u32, snapshot: DriSnapshot) {
        let entries = self.snapshots.entry(site_id).or_default();
        // Keep entries sorted on insert; replays may arrive out of order.
        let position = entries
            .iter()
            .position(|s| s.timestamp > snapshot.timestamp)
            .unwrap_or(entries.len());
        entries.insert(position, snapshot);
    }

    fn window(&self, site_id: u32, days: i64, now: DateTime<Utc>) -> Vec<DriSnapshot> {
        let start = now - Duration::days(days);
        self.snapshots
            .get(&site_id)
            .map(|entries| {
                entries
                    .iter()
                    .filter(|s| s.timestamp >= start && s.timestamp <= now)
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Re-runs the assembler over stored historical reading sets, producing the
/// snapshot sequence in timestamp-ascending order.
///
/// A reading set with a missing factor aborts the whole replay — a gap in
/// the historical record is surfaced, not papered over.
pub fn replay(
    config: &EngineConfig,
    land_use: LandUse,
    reading_sets: &[(DateTime<Utc>, Vec<Reading>)],
) -> Result<Vec<DriSnapshot>, DriError> {
    let mut snapshots = Vec::with_capacity(reading_sets.len());
    for (timestamp, readings) in reading_sets {
        let result = assemble_at(config, land_use, readings, *timestamp)?;
        snapshots.push(DriSnapshot::from(&result));
    }
    snapshots.sort_by_key(|s| s.timestamp);
    Ok(snapshots)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Factor;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, day, hour, 0, 0).unwrap()
    }

    fn snapshot(day: u32, hour: u32, score: f64) -> DriSnapshot {
        DriSnapshot {
            timestamp: at(day, hour),
            dri_score: score,
            risk_level: RiskLevel::Low,
        }
    }

    fn readings(rain: f64) -> Vec<Reading> {
        vec![
            Reading::new(Factor::Rainfall, rain),
            Reading::new(Factor::WindSpeed, 10.0),
            Reading::new(Factor::TideLevel, 1.0),
            Reading::new(Factor::WaterFlow, 50.0),
        ]
    }

    #[test]
    fn test_window_returns_ascending_order_even_for_unordered_inserts() {
        let mut store = MemorySnapshotStore::new();
        store.record(1, snapshot(10, 12, 40.0));
        store.record(1, snapshot(8, 6, 20.0));
        store.record(1, snapshot(9, 18, 30.0));

        let window = store.window(1, 30, at(11, 0));
        let timestamps: Vec<_> = window.iter().map(|s| s.timestamp).collect();
        let mut sorted = timestamps.clone();
        sorted.sort();
        assert_eq!(timestamps, sorted, "window must be timestamp-ascending");
        assert_eq!(window.len(), 3);
    }

    #[test]
    fn test_window_excludes_entries_older_than_the_range() {
        let mut store = MemorySnapshotStore::new();
        store.record(1, snapshot(1, 0, 10.0));
        store.record(1, snapshot(10, 0, 20.0));

        let window = store.window(1, 5, at(12, 0));
        assert_eq!(window.len(), 1);
        assert_eq!(window[0].dri_score, 20.0);
    }

    #[test]
    fn test_window_for_unknown_site_is_empty() {
        let store = MemorySnapshotStore::new();
        assert!(store.window(42, 30, at(12, 0)).is_empty());
    }

    #[test]
    fn test_sites_do_not_share_history() {
        let mut store = MemorySnapshotStore::new();
        store.record(1, snapshot(10, 0, 10.0));
        store.record(2, snapshot(10, 0, 90.0));

        let site_1 = store.window(1, 30, at(12, 0));
        assert_eq!(site_1.len(), 1);
        assert_eq!(site_1[0].dri_score, 10.0);
    }

    #[test]
    fn test_replay_produces_ascending_snapshots() {
        let config = EngineConfig::builtin();
        // Deliberately out of order.
        let sets = vec![
            (at(12, 0), readings(80.0)),
            (at(10, 0), readings(5.0)),
            (at(11, 0), readings(30.0)),
        ];
        let snapshots = replay(&config, LandUse::Urban, &sets).expect("replay should succeed");
        assert_eq!(snapshots.len(), 3);
        assert!(snapshots.windows(2).all(|p| p[0].timestamp <= p[1].timestamp));
        // Wetter day, higher score.
        assert!(snapshots[2].dri_score > snapshots[0].dri_score);
    }

    #[test]
    fn test_replay_matches_live_assembly() {
        let config = EngineConfig::builtin();
        let sets = vec![(at(10, 0), readings(35.0))];
        let snapshots = replay(&config, LandUse::Rural, &sets).unwrap();

        let live = assemble_at(&config, LandUse::Rural, &readings(35.0), at(10, 0)).unwrap();
        assert_eq!(snapshots[0], DriSnapshot::from(&live));
    }

    #[test]
    fn test_replay_aborts_on_a_gap_in_the_record() {
        let config = EngineConfig::builtin();
        let incomplete = vec![Reading::new(Factor::Rainfall, 10.0)];
        let sets = vec![
            (at(10, 0), readings(10.0)),
            (at(11, 0), incomplete),
        ];
        let err = replay(&config, LandUse::Urban, &sets).expect_err("gap must abort the replay");
        assert!(matches!(err, DriError::MissingReading(_)));
    }
}
