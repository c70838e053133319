use crate::error::{BadgeError, Result};
use crate::io;
use crate::paths;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

// ---------------------------------------------------------------------------
// Rarity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Special,
}

impl Rarity {
    /// Leaderboard weight for one badge of this rarity.
    pub fn points(self) -> u32 {
        match self {
            Rarity::Common => 1,
            Rarity::Uncommon => 3,
            Rarity::Rare => 5,
            Rarity::Epic => 10,
            Rarity::Legendary => 20,
            Rarity::Special => 8,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Epic => "epic",
            Rarity::Legendary => "legendary",
            Rarity::Special => "special",
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// The metric name the streak milestones track. Other metrics ("ships",
/// "games", "dms", ...) are open-ended counter names.
pub const STREAK_METRIC: &str = "current_streak";

/// How a badge is earned: a plain metric threshold, or a named special
/// condition evaluated against the whole progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criteria {
    Threshold { metric: String, threshold: u32 },
    Special { condition: SpecialCondition },
}

impl Criteria {
    pub fn streak(threshold: u32) -> Self {
        Criteria::Threshold {
            metric: STREAK_METRIC.to_string(),
            threshold,
        }
    }

    pub fn counter(metric: impl Into<String>, threshold: u32) -> Self {
        Criteria::Threshold {
            metric: metric.into(),
            threshold,
        }
    }

    /// Threshold value, if this is a threshold badge.
    pub fn threshold(&self) -> Option<u32> {
        match self {
            Criteria::Threshold { threshold, .. } => Some(*threshold),
            Criteria::Special { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialCondition {
    /// Rebuilt a 3-day run after at least one tracked streak reset.
    Comeback,
}

// ---------------------------------------------------------------------------
// BadgeDefinition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub emoji: String,
    pub criteria: Criteria,
    pub rarity: Rarity,
    pub celebrate_publicly: bool,
    /// One or more message templates; `{handle}` is substituted at render
    /// time. Multiple entries keep repeat announcements from sounding canned.
    pub celebration_messages: Vec<String>,
}

impl BadgeDefinition {
    fn new(
        id: &str,
        name: &str,
        description: &str,
        emoji: &str,
        criteria: Criteria,
        rarity: Rarity,
        celebrate_publicly: bool,
        messages: &[&str],
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            emoji: emoji.to_string(),
            criteria,
            rarity,
            celebrate_publicly,
            celebration_messages: messages.iter().map(|m| m.to_string()).collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    badges: Vec<BadgeDefinition>,
}

impl Catalog {
    /// Build a catalog, rejecting duplicate ids and zero thresholds.
    pub fn new(badges: Vec<BadgeDefinition>) -> Result<Self> {
        let mut seen = HashSet::new();
        for badge in &badges {
            if !seen.insert(badge.id.as_str()) {
                return Err(BadgeError::DuplicateBadge(badge.id.clone()));
            }
            if badge.criteria.threshold() == Some(0) {
                return Err(BadgeError::InvalidThreshold {
                    id: badge.id.clone(),
                });
            }
        }
        Ok(Self { badges })
    }

    pub fn get(&self, id: &str) -> Option<&BadgeDefinition> {
        self.badges.iter().find(|b| b.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadgeDefinition> {
        self.badges.iter()
    }

    pub fn len(&self) -> usize {
        self.badges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.badges.is_empty()
    }

    // ---------------------------------------------------------------------------
    // Persistence
    // ---------------------------------------------------------------------------

    /// Load `.vibe/catalog.yaml`, falling back to the built-in set when the
    /// file is absent. A present-but-invalid catalog is an error, not a
    /// silent fallback.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let path = paths::catalog_path(root);
        if !path.exists() {
            return Ok(Self::default_catalog());
        }
        let data = std::fs::read_to_string(&path)?;
        let raw: Catalog = serde_yaml::from_str(&data)?;
        Self::new(raw.badges)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::catalog_path(root), data.as_bytes())
    }

    // ---------------------------------------------------------------------------
    // Default badge set
    // ---------------------------------------------------------------------------

    /// The consolidated /vibe workshop badge set. Streak milestones at
    /// 1/3/7/14/30/100 days; only week-and-up milestones go to the board.
    pub fn default_catalog() -> Self {
        let badges = vec![
            BadgeDefinition::new(
                "first_day",
                "First Day",
                "Started your streak journey",
                "🌱",
                Criteria::streak(1),
                Rarity::Common,
                false,
                &[
                    "Welcome aboard, {handle}! 🌱 Day one complete - every expert was once a beginner!",
                    "{handle} just planted a streak seed! 🌱 Day one is in the books!",
                ],
            ),
            BadgeDefinition::new(
                "early_bird",
                "Early Bird",
                "Maintained a 3-day streak",
                "🌅",
                Criteria::streak(3),
                Rarity::Common,
                false,
                &[
                    "Three days strong, {handle}! 🌅 You're building a habit!",
                    "{handle} is on a 3-day roll! 🌅 Momentum unlocked!",
                ],
            ),
            BadgeDefinition::new(
                "week_warrior",
                "Week Warrior",
                "Maintained a 7-day streak",
                "💪",
                Criteria::streak(7),
                Rarity::Uncommon,
                true,
                &[
                    "One week strong, {handle}! 💪 You've proven you can show up consistently!",
                    "{handle} completed a full week! 💪 Consistency is becoming a superpower!",
                ],
            ),
            BadgeDefinition::new(
                "fortnight_hero",
                "Fortnight Hero",
                "Maintained a 14-day streak",
                "🔥",
                Criteria::streak(14),
                Rarity::Rare,
                true,
                &[
                    "Two weeks, {handle}! 🔥 This is where habits truly form!",
                    "{handle} hit 14 days straight! 🔥 This is becoming who you are!",
                ],
            ),
            BadgeDefinition::new(
                "monthly_legend",
                "Monthly Legend",
                "Maintained a 30-day streak",
                "🏆",
                Criteria::streak(30),
                Rarity::Epic,
                true,
                &[
                    "Monthly legend! 🏆 {handle} has shown up 30 days running - incredible dedication!",
                    "{handle} reached 30 days! 🏆 A true workshop legend!",
                ],
            ),
            BadgeDefinition::new(
                "century_club",
                "Century Club",
                "Maintained a 100-day streak",
                "👑",
                Criteria::streak(100),
                Rarity::Legendary,
                true,
                &[
                    "Century club! 👑 {handle} hit 100 days - this is mastery!",
                ],
            ),
            BadgeDefinition::new(
                "first_ship",
                "First Ship",
                "Made your first ship announcement",
                "🚢",
                Criteria::counter("ships", 1),
                Rarity::Common,
                true,
                &[
                    "{handle}'s first ship has sailed! 🚢 Welcome to the builders!",
                ],
            ),
            BadgeDefinition::new(
                "prolific_shipper",
                "Prolific Shipper",
                "Made 10 ship announcements",
                "⚡",
                Criteria::counter("ships", 10),
                Rarity::Rare,
                true,
                &[
                    "Ten ships launched! ⚡ {handle} is a shipping machine!",
                ],
            ),
            BadgeDefinition::new(
                "game_master",
                "Game Master",
                "Participated in a workshop game",
                "🎮",
                Criteria::counter("games", 1),
                Rarity::Uncommon,
                false,
                &[
                    "Game master unlocked! 🎮 {handle} is creating experiences!",
                ],
            ),
            BadgeDefinition::new(
                "community_builder",
                "Community Builder",
                "Sent 5 DMs to other participants",
                "🤝",
                Criteria::counter("dms", 5),
                Rarity::Uncommon,
                false,
                &[
                    "{handle} is fostering the workshop vibes! 🤝 Five DMs and counting!",
                ],
            ),
            BadgeDefinition::new(
                "comeback_kid",
                "Comeback Kid",
                "Rebuilt a 3-day streak after a break",
                "💫",
                Criteria::Special {
                    condition: SpecialCondition::Comeback,
                },
                Rarity::Special,
                true,
                &[
                    "Comeback kid! 💫 {handle} turned a setback into a comeback - inspiring!",
                    "{handle} is back and three days strong! 💫 Every champion has comeback stories!",
                ],
            ),
        ];
        // The built-in set is known-valid; new() only fails on duplicate ids
        // or zero thresholds, both covered by tests below.
        Self { badges }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
