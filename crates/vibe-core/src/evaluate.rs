use crate::catalog::{BadgeDefinition, Catalog, Criteria, SpecialCondition, STREAK_METRIC};
use crate::error::{BadgeError, Result};
use crate::handle;
use crate::store::{Metrics, Store, UserProgressRecord, RESTARTS_COUNTER};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Evaluator
// ---------------------------------------------------------------------------

/// Decides which catalog entries a metric update newly satisfies. Holds a
/// borrowed catalog; the store is passed into each call so one evaluator can
/// serve any number of stores (and tests can use throwaway ones).
pub struct Evaluator<'a> {
    catalog: &'a Catalog,
}

impl<'a> Evaluator<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Apply `metrics` to the user's record, then award every catalog entry
    /// that is now satisfied and not yet earned. A user jumping from streak
    /// 0 to 40 in one update collects every intervening milestone, because
    /// the whole catalog is scanned against the updated record.
    ///
    /// Returns the newly earned definitions, thresholds ascending and
    /// special-condition badges after them. Re-running with unchanged
    /// metrics returns an empty list.
    pub fn evaluate(
        &self,
        store: &mut Store,
        raw_handle: &str,
        metrics: &Metrics,
    ) -> Result<Vec<BadgeDefinition>> {
        let handle = handle::normalize(raw_handle)?;
        let record = store.apply_metrics(&handle, metrics)?.clone();

        let mut earned: Vec<&BadgeDefinition> = self
            .catalog
            .iter()
            .filter(|b| !record.earned_badge_ids.contains(&b.id))
            .filter(|b| criteria_met(&b.criteria, &record))
            .collect();

        // Smaller milestones celebrate first in a batch; specials carry no
        // threshold and go last, in catalog order.
        earned.sort_by_key(|b| match b.criteria.threshold() {
            Some(t) => (0u8, t),
            None => (1u8, 0),
        });

        let mut newly_earned = Vec::with_capacity(earned.len());
        for badge in earned {
            if store.mark_awarded(&handle, &badge.id) {
                store.record_celebration(&handle, &badge.id, value_at_award(badge, &record));
                newly_earned.push(badge.clone());
            }
        }
        Ok(newly_earned)
    }

    /// Manually award one badge, bypassing criteria (the moderator path).
    /// `Ok(None)` when the user already has it; `UnknownBadge` when the id
    /// is not in the catalog.
    pub fn award(
        &self,
        store: &mut Store,
        raw_handle: &str,
        badge_id: &str,
    ) -> Result<Option<BadgeDefinition>> {
        let handle = handle::normalize(raw_handle)?;
        let badge = self
            .catalog
            .get(badge_id)
            .ok_or_else(|| BadgeError::UnknownBadge(badge_id.to_string()))?;

        if !store.mark_awarded(&handle, &badge.id) {
            return Ok(None);
        }
        let record = store.get(&handle);
        store.record_celebration(&handle, &badge.id, value_at_award(badge, &record));
        Ok(Some(badge.clone()))
    }

    /// Unearned threshold badges for `record`, nearest first.
    pub fn next_badges(&self, record: &UserProgressRecord) -> Vec<NextBadge> {
        let mut next: Vec<NextBadge> = self
            .catalog
            .iter()
            .filter(|b| !record.earned_badge_ids.contains(&b.id))
            .filter_map(|b| match &b.criteria {
                Criteria::Threshold { metric, threshold } => {
                    let current = metric_value(metric, record);
                    if current >= *threshold {
                        return None; // satisfied but unevaluated; not "next"
                    }
                    Some(NextBadge {
                        definition: b.clone(),
                        remaining: threshold - current,
                        progress_pct: current * 100 / threshold,
                    })
                }
                Criteria::Special { .. } => None,
            })
            .collect();
        next.sort_by_key(|n| n.remaining);
        next
    }
}

/// An unearned badge with distance-to-go, for progress displays.
#[derive(Debug, Clone, Serialize)]
pub struct NextBadge {
    pub definition: BadgeDefinition,
    pub remaining: u32,
    pub progress_pct: u32,
}

fn criteria_met(criteria: &Criteria, record: &UserProgressRecord) -> bool {
    match criteria {
        Criteria::Threshold { metric, threshold } => metric_value(metric, record) >= *threshold,
        Criteria::Special { condition } => special_met(*condition, record),
    }
}

fn special_met(condition: SpecialCondition, record: &UserProgressRecord) -> bool {
    match condition {
        SpecialCondition::Comeback => {
            record.counter(RESTARTS_COUNTER) >= 1 && record.current_streak >= 3
        }
    }
}

fn metric_value(metric: &str, record: &UserProgressRecord) -> u32 {
    if metric == STREAK_METRIC {
        record.current_streak
    } else {
        record.counter(metric)
    }
}

fn value_at_award(badge: &BadgeDefinition, record: &UserProgressRecord) -> u32 {
    match &badge.criteria {
        Criteria::Threshold { metric, .. } => metric_value(metric, record),
        Criteria::Special { .. } => record.current_streak,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
