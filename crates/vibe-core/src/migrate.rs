use crate::error::{BadgeError, Result};
use crate::handle;
use crate::store::Store;
use chrono::Utc;
use serde::Serialize;
use serde_json::Value;

// ---------------------------------------------------------------------------
// ImportSummary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct ImportSummary {
    pub users: usize,
    pub badges: usize,
    pub streaks: usize,
    pub skipped: usize,
}

// ---------------------------------------------------------------------------
// Legacy import
// ---------------------------------------------------------------------------

/// Import one of the legacy JSON layouts into the consolidated store.
///
/// Three layouts circulated before the schemas were unified:
/// 1. badge-system: `{"user_badges": {handle: [ids]}, "badge_log": [...]}`
/// 2. streaks-agent memory: `{"streaks": {handle: {"current": n, "best": n}}}`
/// 3. achievements: `{handle: {"badges": [ids], ...}}`
///
/// The merge never removes existing progress: earned ids are unioned,
/// streaks keep the larger of stored and imported values. Imported ids are
/// accepted as-awarded (they were earned under the old rules) and get a
/// celebration record unless one already exists for the pair. Entries with
/// unusable handles are counted and skipped rather than failing the import.
pub fn import_value(store: &mut Store, value: &Value) -> Result<ImportSummary> {
    let obj = value
        .as_object()
        .ok_or(BadgeError::UnrecognizedLegacyFormat)?;

    if let Some(user_badges) = obj.get("user_badges").and_then(Value::as_object) {
        return Ok(import_badge_lists(store, user_badges));
    }
    if let Some(streaks) = obj.get("streaks").and_then(Value::as_object) {
        return Ok(import_streaks(store, streaks));
    }
    if !obj.is_empty() && obj.values().all(|v| v.get("badges").is_some_and(Value::is_array)) {
        let lists = obj
            .iter()
            .map(|(h, v)| (h.clone(), v["badges"].clone()))
            .collect();
        return Ok(import_badge_lists(store, &lists));
    }
    Err(BadgeError::UnrecognizedLegacyFormat)
}

fn import_badge_lists(store: &mut Store, users: &serde_json::Map<String, Value>) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for (raw_handle, ids) in users {
        let Ok(h) = handle::normalize(raw_handle) else {
            tracing::warn!("skipping legacy entry with unusable handle '{raw_handle}'");
            summary.skipped += 1;
            continue;
        };
        summary.users += 1;
        let Some(ids) = ids.as_array() else { continue };
        for id in ids.iter().filter_map(Value::as_str) {
            if store.mark_awarded(&h, id) {
                // Award-time metric unknown for legacy data
                store.record_celebration(&h, id, 0);
                summary.badges += 1;
            }
        }
    }
    summary
}

fn import_streaks(store: &mut Store, streaks: &serde_json::Map<String, Value>) -> ImportSummary {
    let mut summary = ImportSummary::default();
    for (raw_handle, entry) in streaks {
        let Ok(h) = handle::normalize(raw_handle) else {
            tracing::warn!("skipping legacy entry with unusable handle '{raw_handle}'");
            summary.skipped += 1;
            continue;
        };
        let current = read_u32(entry, "current");
        let best = read_u32(entry, "best");

        let record = store.entry(&h);
        record.current_streak = record.current_streak.max(current);
        record.best_streak = record.best_streak.max(best).max(record.current_streak);
        record.last_updated = Utc::now();

        summary.users += 1;
        summary.streaks += 1;
    }
    summary
}

fn read_u32(value: &Value, key: &str) -> u32 {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
        .unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn badge_system_layout_imports_earned_ids() {
        let mut store = Store::new();
        let legacy = json!({
            "badge_definitions": {},
            "user_badges": {
                "@alice": ["week_streak", "first_ship"],
                "bob": ["first_day"]
            },
            "badge_log": []
        });

        let summary = import_value(&mut store, &legacy).unwrap();
        assert_eq!(summary.users, 2);
        assert_eq!(summary.badges, 3);

        let alice = store.get("alice");
        assert!(alice.earned_badge_ids.contains("week_streak"));
        assert!(alice.earned_badge_ids.contains("first_ship"));
        assert_eq!(store.celebration_log().len(), 3);
    }

    #[test]
    fn achievements_layout_imports_per_handle_lists() {
        let mut store = Store::new();
        let legacy = json!({
            "alice": { "badges": ["first_day", "week_warrior"], "last_checked": "2026-01-08T10:00:00" },
            "@Bob": { "badges": ["first_day"] }
        });

        let summary = import_value(&mut store, &legacy).unwrap();
        assert_eq!(summary.users, 2);
        assert_eq!(summary.badges, 3);
        assert!(store.get("bob").earned_badge_ids.contains("first_day"));
    }

    #[test]
    fn streaks_layout_merges_streak_values() {
        let mut store = Store::new();
        let legacy = json!({
            "streaks": {
                "@alice": { "current": 4, "best": 12 },
                "@bob": { "current": 1, "best": 1 }
            }
        });

        let summary = import_value(&mut store, &legacy).unwrap();
        assert_eq!(summary.streaks, 2);

        let alice = store.get("alice");
        assert_eq!(alice.current_streak, 4);
        assert_eq!(alice.best_streak, 12);
    }

    #[test]
    fn merge_keeps_larger_existing_streak() {
        let mut store = Store::new();
        let newer: crate::store::Metrics =
            [("current_streak".to_string(), 9i64)].into_iter().collect();
        store.apply_metrics("alice", &newer).unwrap();

        let legacy = json!({ "streaks": { "alice": { "current": 4, "best": 6 } } });
        import_value(&mut store, &legacy).unwrap();

        let alice = store.get("alice");
        assert_eq!(alice.current_streak, 9);
        assert_eq!(alice.best_streak, 9);
    }

    #[test]
    fn reimport_adds_nothing() {
        let mut store = Store::new();
        let legacy = json!({ "user_badges": { "alice": ["first_day"] } });
        import_value(&mut store, &legacy).unwrap();
        let summary = import_value(&mut store, &legacy).unwrap();
        assert_eq!(summary.badges, 0);
        assert_eq!(store.celebration_log().len(), 1);
    }

    #[test]
    fn unusable_handles_are_skipped_not_fatal() {
        let mut store = Store::new();
        let legacy = json!({
            "user_badges": {
                "has space": ["first_day"],
                "alice": ["first_day"]
            }
        });
        let summary = import_value(&mut store, &legacy).unwrap();
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.users, 1);
    }

    #[test]
    fn unknown_layout_is_an_error() {
        let mut store = Store::new();
        for bad in [json!([1, 2, 3]), json!({"data": {"x": 1}}), json!("nope")] {
            assert!(matches!(
                import_value(&mut store, &bad),
                Err(BadgeError::UnrecognizedLegacyFormat)
            ));
        }
    }
}
