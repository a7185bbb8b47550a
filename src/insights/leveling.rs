use serde::{Deserialize, Serialize};

const LEVEL_STEP_XP: u64 = 50;

/// Highest reachable level. Its threshold and the next one both still fit in
/// a `u64`, so XP saturated at `u64::MAX` lands here.
pub const MAX_LEVEL: u32 = 600_000_000;

/// Total XP needed to reach `level`. Level 1 starts at 0 XP and each level
/// costs 100 XP more than the one before it.
pub fn xp_threshold(level: u32) -> u64 {
    let level = level.max(1) as u64;
    LEVEL_STEP_XP.saturating_mul(level).saturating_mul(level - 1)
}

/// Highest level whose threshold does not exceed `xp`.
pub fn level_for_xp(xp: u64) -> u32 {
    let steps = xp as f64 / LEVEL_STEP_XP as f64;
    let estimate = ((1.0 + (1.0 + 4.0 * steps).sqrt()) / 2.0).floor().max(1.0) as u32;
    let mut level = estimate.min(MAX_LEVEL);
    while level > 1 && xp_threshold(level) > xp {
        level -= 1;
    }
    while level < MAX_LEVEL && xp_threshold(level + 1) <= xp {
        level += 1;
    }
    level
}

/// Fraction of the way from `level` to the next one, clamped to `[0, 1]`.
pub fn progress(xp: u64, level: u32) -> f64 {
    let floor = xp_threshold(level);
    let ceiling = xp_threshold(level.saturating_add(1));
    if ceiling <= floor {
        return 0.0;
    }
    let gained = xp as f64 - floor as f64;
    (gained / (ceiling - floor) as f64).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelProgress {
    pub level: u32,
    pub xp: u64,
    pub level_floor: u64,
    pub next_level_at: u64,
    pub progress: f64,
}

impl LevelProgress {
    pub fn from_xp(xp: u64) -> Self {
        let level = level_for_xp(xp);
        Self {
            level,
            xp,
            level_floor: xp_threshold(level),
            next_level_at: xp_threshold(level + 1),
            progress: progress(xp, level),
        }
    }
}

impl Default for LevelProgress {
    fn default() -> Self {
        Self::from_xp(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

/// Events that earn experience points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XpEvent {
    HabitCompleted,
    TaskCompleted,
    Achievement(AchievementTier),
}

impl XpEvent {
    pub fn xp(self) -> u64 {
        match self {
            XpEvent::HabitCompleted => 10,
            XpEvent::TaskCompleted => 15,
            XpEvent::Achievement(AchievementTier::Bronze) => 25,
            XpEvent::Achievement(AchievementTier::Silver) => 50,
            XpEvent::Achievement(AchievementTier::Gold) => 100,
            XpEvent::Achievement(AchievementTier::Platinum) => 200,
        }
    }
}
