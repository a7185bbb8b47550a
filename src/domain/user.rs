use serde::{Deserialize, Serialize};

use crate::insights::{
    leveling::{level_for_xp, LevelProgress, XpEvent},
    streak::Streak,
};

/// Gamification counters for the owning user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserStats {
    #[serde(default)]
    pub xp: u64,
    #[serde(default = "UserStats::first_level")]
    pub level: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub longest_streak: u32,
    #[serde(default)]
    pub tasks_completed: u32,
    #[serde(default)]
    pub habits_completed: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub from: u32,
    pub to: u32,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            xp: 0,
            level: Self::first_level(),
            current_streak: 0,
            longest_streak: 0,
            tasks_completed: 0,
            habits_completed: 0,
        }
    }
}

impl UserStats {
    fn first_level() -> u32 {
        1
    }

    /// Adds the event's XP and reports a level change, if any.
    pub fn award(&mut self, event: XpEvent) -> Option<LevelUp> {
        match event {
            XpEvent::HabitCompleted => self.habits_completed += 1,
            XpEvent::TaskCompleted => self.tasks_completed += 1,
            XpEvent::Achievement(_) => {}
        }
        self.xp = self.xp.saturating_add(event.xp());
        self.relevel()
    }

    /// Takes back the XP of an undone event. XP never drops below zero.
    pub fn revoke(&mut self, event: XpEvent) {
        match event {
            XpEvent::HabitCompleted => {
                self.habits_completed = self.habits_completed.saturating_sub(1)
            }
            XpEvent::TaskCompleted => self.tasks_completed = self.tasks_completed.saturating_sub(1),
            XpEvent::Achievement(_) => {}
        }
        self.xp = self.xp.saturating_sub(event.xp());
        self.relevel();
    }

    pub fn sync_streak(&mut self, streak: Streak) {
        self.current_streak = streak.current;
        self.longest_streak = streak.longest;
    }

    pub fn level_progress(&self) -> LevelProgress {
        LevelProgress::from_xp(self.xp)
    }

    fn relevel(&mut self) -> Option<LevelUp> {
        let from = self.level;
        self.level = level_for_xp(self.xp);
        (self.level > from).then_some(LevelUp {
            from,
            to: self.level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insights::leveling::AchievementTier;

    #[test]
    fn crossing_threshold_reports_level_up() {
        let mut stats = UserStats::default();
        for _ in 0..6 {
            assert!(stats.award(XpEvent::TaskCompleted).is_none());
        }
        assert_eq!(stats.xp, 90);
        let up = stats.award(XpEvent::HabitCompleted).expect("level up");
        assert_eq!(up, LevelUp { from: 1, to: 2 });
        assert_eq!(stats.tasks_completed, 6);
        assert_eq!(stats.habits_completed, 1);
    }

    #[test]
    fn large_award_can_skip_levels() {
        let mut stats = UserStats::default();
        stats.xp = 250;
        stats.level = 2;
        let up = stats
            .award(XpEvent::Achievement(AchievementTier::Platinum))
            .expect("level up");
        assert_eq!(up.to, 3);
    }

    #[test]
    fn award_at_saturated_xp_keeps_top_level() {
        let mut stats = UserStats {
            xp: u64::MAX - 5,
            ..UserStats::default()
        };
        let up = stats.award(XpEvent::TaskCompleted).expect("level up");
        assert_eq!(stats.xp, u64::MAX);
        assert_eq!(up.to, crate::insights::leveling::MAX_LEVEL);
        assert!(stats.award(XpEvent::HabitCompleted).is_none());
    }

    #[test]
    fn revoke_saturates_at_zero() {
        let mut stats = UserStats::default();
        stats.revoke(XpEvent::HabitCompleted);
        assert_eq!(stats.xp, 0);
        assert_eq!(stats.level, 1);
    }
}
