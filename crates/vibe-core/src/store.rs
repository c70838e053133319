use crate::catalog::STREAK_METRIC;
use crate::error::{BadgeError, Result};
use crate::io;
use crate::paths;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// Counter the store maintains itself: incremented whenever a streak
/// legitimately resets (drops to 0 or 1 from a run of 2+).
pub const RESTARTS_COUNTER: &str = "restarts";

/// Metric updates as reported by the caller. Values arrive signed so that
/// bad input can be rejected explicitly instead of wrapping.
pub type Metrics = BTreeMap<String, i64>;

// ---------------------------------------------------------------------------
// UserProgressRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProgressRecord {
    pub handle: String,
    pub current_streak: u32,
    pub best_streak: u32,
    #[serde(default)]
    pub counters: BTreeMap<String, u32>,
    #[serde(default)]
    pub earned_badge_ids: BTreeSet<String>,
    pub last_updated: DateTime<Utc>,
}

impl UserProgressRecord {
    pub fn new(handle: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            current_streak: 0,
            best_streak: 0,
            counters: BTreeMap::new(),
            earned_badge_ids: BTreeSet::new(),
            last_updated: Utc::now(),
        }
    }

    pub fn counter(&self, name: &str) -> u32 {
        self.counters.get(name).copied().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// CelebrationRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CelebrationRecord {
    pub handle: String,
    pub badge_id: String,
    pub earned_at: DateTime<Utc>,
    pub metric_value: u32,
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    users: BTreeMap<String, UserProgressRecord>,
    #[serde(default)]
    celebration_log: Vec<CelebrationRecord>,
}

fn default_version() -> u32 {
    1
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            version: 1,
            users: BTreeMap::new(),
            celebration_log: Vec::new(),
        }
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Load the store from `.vibe/store.json`. A missing file yields an
    /// empty store; a corrupt one is logged and replaced by an empty store
    /// rather than aborting the run.
    pub fn load(root: &Path) -> Self {
        let path = paths::store_path(root);
        if !path.exists() {
            return Self::new();
        }
        let data = match std::fs::read_to_string(&path) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!("could not read {}: {e}; starting empty", path.display());
                return Self::new();
            }
        };
        match serde_json::from_str(&data) {
            Ok(store) => store,
            Err(e) => {
                tracing::warn!("corrupt store at {}: {e}; starting empty", path.display());
                Self::new()
            }
        }
    }

    /// Write the full store back. Note this is whole-file replacement: two
    /// processes interleaving load-mutate-flush can still lose each other's
    /// updates. The atomic write only rules out torn files.
    pub fn flush(&self, root: &Path) -> Result<()> {
        let data = serde_json::to_string_pretty(self)?;
        io::atomic_write(&paths::store_path(root), data.as_bytes())
    }

    // ---------------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------------

    /// Progress for `handle`, or a zero-valued default for an unseen one.
    /// Never fails. Expects a normalized handle.
    pub fn get(&self, handle: &str) -> UserProgressRecord {
        self.users
            .get(handle)
            .cloned()
            .unwrap_or_else(|| UserProgressRecord::new(handle))
    }

    pub fn record(&self, handle: &str) -> Option<&UserProgressRecord> {
        self.users.get(handle)
    }

    pub fn users(&self) -> impl Iterator<Item = &UserProgressRecord> {
        self.users.values()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn celebration_log(&self) -> &[CelebrationRecord] {
        &self.celebration_log
    }

    // ---------------------------------------------------------------------------
    // Mutations
    // ---------------------------------------------------------------------------

    pub(crate) fn entry(&mut self, handle: &str) -> &mut UserProgressRecord {
        self.users
            .entry(handle.to_string())
            .or_insert_with(|| UserProgressRecord::new(handle))
    }

    /// Apply a metric update, enforcing the progress invariants:
    /// negative values are rejected; `current_streak` may only decrease to
    /// 0 or 1 (a legitimate reset, which bumps the `restarts` counter when
    /// it ends a run of 2+); `best_streak` is reconciled to
    /// `max(best_streak, current_streak)` on every update.
    pub fn apply_metrics(&mut self, handle: &str, metrics: &Metrics) -> Result<&UserProgressRecord> {
        for (metric, value) in metrics {
            if *value < 0 {
                return Err(BadgeError::InvalidMetricUpdate {
                    handle: handle.to_string(),
                    reason: format!("negative value {value} for metric '{metric}'"),
                });
            }
        }

        let streak = match metrics.get(STREAK_METRIC) {
            Some(v) => Some(u32::try_from(*v).map_err(|_| BadgeError::InvalidMetricUpdate {
                handle: handle.to_string(),
                reason: format!("streak value {v} out of range"),
            })?),
            None => None,
        };

        let record = self.entry(handle);

        if let Some(new_streak) = streak {
            if new_streak < record.current_streak {
                if new_streak > 1 {
                    return Err(BadgeError::InvalidMetricUpdate {
                        handle: handle.to_string(),
                        reason: format!(
                            "streak regressed from {} to {new_streak}; a reset restarts at 0 or 1",
                            record.current_streak
                        ),
                    });
                }
                if record.current_streak >= 2 {
                    *record.counters.entry(RESTARTS_COUNTER.to_string()).or_insert(0) += 1;
                }
            }
            record.current_streak = new_streak;
            record.best_streak = record.best_streak.max(new_streak);
        }

        for (metric, value) in metrics {
            if metric == STREAK_METRIC {
                continue;
            }
            let value = u32::try_from(*value).map_err(|_| BadgeError::InvalidMetricUpdate {
                handle: handle.to_string(),
                reason: format!("value {value} out of range for metric '{metric}'"),
            })?;
            record.counters.insert(metric.clone(), value);
        }

        record.last_updated = Utc::now();
        Ok(&self.users[handle])
    }

    /// Add `badge_id` to the earned set. Returns `false` (no-op) if already
    /// present — the idempotence contract everything else leans on.
    pub fn mark_awarded(&mut self, handle: &str, badge_id: &str) -> bool {
        let record = self.entry(handle);
        let inserted = record.earned_badge_ids.insert(badge_id.to_string());
        if inserted {
            record.last_updated = Utc::now();
        }
        inserted
    }

    /// Append a celebration record. Skips silently if one already exists for
    /// this (handle, badge_id) pair, so the log holds at most one entry per
    /// pair no matter which path awarded the badge.
    pub fn record_celebration(&mut self, handle: &str, badge_id: &str, metric_value: u32) {
        let exists = self
            .celebration_log
            .iter()
            .any(|c| c.handle == handle && c.badge_id == badge_id);
        if exists {
            return;
        }
        self.celebration_log.push(CelebrationRecord {
            handle: handle.to_string(),
            badge_id: badge_id.to_string(),
            earned_at: Utc::now(),
            metric_value,
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
