use crate::catalog::Catalog;
use crate::store::{CelebrationRecord, Store};
use serde::Serialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Leaderboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub handle: String,
    pub badges: usize,
    pub points: u32,
    pub latest_badge: Option<String>,
}

/// Rank users by rarity-weighted points, then badge count, then handle for a
/// stable order. Earned ids missing from the catalog still count toward the
/// badge total but score zero points.
pub fn leaderboard(catalog: &Catalog, store: &Store) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = store
        .users()
        .filter(|u| !u.earned_badge_ids.is_empty())
        .map(|u| {
            let points = u
                .earned_badge_ids
                .iter()
                .filter_map(|id| catalog.get(id))
                .map(|b| b.rarity.points())
                .sum();
            let latest_badge = store
                .celebration_log()
                .iter()
                .rev()
                .find(|c| c.handle == u.handle)
                .and_then(|c| catalog.get(&c.badge_id))
                .map(|b| format!("{} {}", b.emoji, b.name));
            LeaderboardEntry {
                handle: u.handle.clone(),
                badges: u.earned_badge_ids.len(),
                points,
                latest_badge,
            }
        })
        .collect();

    entries.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.badges.cmp(&a.badges))
            .then(a.handle.cmp(&b.handle))
    });
    entries
}

/// Display rank for a points total.
pub fn rank_for_points(points: u32) -> &'static str {
    match points {
        50.. => "Legend 👑",
        35..=49 => "Champion 🏆",
        20..=34 => "Expert 💎",
        10..=19 => "Builder 🔥",
        5..=9 => "Creator 💪",
        2..=4 => "Explorer 🌅",
        _ => "Newcomer 🌱",
    }
}

// ---------------------------------------------------------------------------
// SystemStats
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SystemStats {
    pub badges_available: usize,
    pub badges_awarded: usize,
    pub users_tracked: usize,
    pub unique_earners: usize,
    pub rarity_distribution: BTreeMap<String, usize>,
    pub recent: Vec<CelebrationRecord>,
}

/// System-wide summary: catalog size, award totals, rarity breakdown of the
/// available set, and the most recent celebrations (newest first).
pub fn stats(catalog: &Catalog, store: &Store) -> SystemStats {
    let mut rarity_distribution = BTreeMap::new();
    for badge in catalog.iter() {
        *rarity_distribution
            .entry(badge.rarity.as_str().to_string())
            .or_insert(0) += 1;
    }

    let badges_awarded = store.users().map(|u| u.earned_badge_ids.len()).sum();
    let unique_earners = store.users().filter(|u| !u.earned_badge_ids.is_empty()).count();

    let recent: Vec<CelebrationRecord> = store
        .celebration_log()
        .iter()
        .rev()
        .take(5)
        .cloned()
        .collect();

    SystemStats {
        badges_available: catalog.len(),
        badges_awarded,
        users_tracked: store.user_count(),
        unique_earners,
        rarity_distribution,
        recent,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
