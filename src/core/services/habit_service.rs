//! Habit check-ins with streak upkeep and XP bookkeeping.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    domain::{Habit, LevelUp, ToggleOutcome, Workspace},
    errors::CoreError,
    insights::{
        leveling::XpEvent,
        streak::{compute_streak, Streak},
    },
};

use super::{ServiceError, ServiceResult, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HabitToggle {
    pub outcome: ToggleOutcome,
    pub streak: Streak,
    pub level_up: Option<LevelUp>,
}

pub struct HabitService;

impl HabitService {
    pub fn add(session: &mut Session, habit: Habit) -> ServiceResult<Uuid> {
        if habit.title.trim().is_empty() {
            return Err(ServiceError::Invalid("habit title is required".into()));
        }
        session.mutate(|ws| {
            let id = habit.id;
            ws.habits.push(habit);
            Ok(id)
        })
    }

    pub fn toggle(
        session: &mut Session,
        id: Uuid,
        date: NaiveDate,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ServiceResult<HabitToggle> {
        session.mutate(|ws| Self::toggle_in(ws, id, date, today, now))
    }

    /// Flips the completion for `date`, recomputes the habit's streak from its
    /// whole history and awards or takes back the check-in XP.
    ///
    /// `today` is the caller's calendar day and anchors the streak; `now` only
    /// stamps the completion.
    pub fn toggle_in(
        ws: &mut Workspace,
        id: Uuid,
        date: NaiveDate,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ServiceResult<HabitToggle> {
        let habit = active_habit(ws, id)?;
        let counted_before = counts_on(habit, date);
        let outcome = habit.toggle_completion(date, now);
        let counted_after = counts_on(habit, date);
        let streak = habit.refresh_streak(today);

        let level_up = settle_xp(ws, counted_before, counted_after);
        sync_user_streak(ws, today);
        tracing::debug!(%id, %date, ?outcome, current = streak.current, "habit toggled");
        Ok(HabitToggle {
            outcome,
            streak,
            level_up,
        })
    }

    /// Stores a measured value for a quantitative habit. XP follows whether
    /// the day reaches the target.
    pub fn record_value(
        session: &mut Session,
        id: Uuid,
        date: NaiveDate,
        value: f64,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ServiceResult<Streak> {
        if !value.is_finite() {
            return Err(ServiceError::Invalid("value must be a finite number".into()));
        }
        session.mutate(|ws| {
            let habit = active_habit(ws, id)?;
            let counted_before = counts_on(habit, date);
            habit.record_value(date, value, now);
            let counted_after = counts_on(habit, date);
            let streak = habit.refresh_streak(today);
            settle_xp(ws, counted_before, counted_after);
            sync_user_streak(ws, today);
            Ok(streak)
        })
    }

    pub fn archive(
        session: &mut Session,
        id: Uuid,
        today: NaiveDate,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        session.mutate(|ws| {
            let habit = ws
                .habit_mut(id)
                .ok_or_else(|| CoreError::not_found("habit", id))?;
            habit.archived_at.get_or_insert(now);
            sync_user_streak(ws, today);
            Ok(())
        })
    }
}

fn active_habit(ws: &mut Workspace, id: Uuid) -> ServiceResult<&mut Habit> {
    let habit = ws
        .habit_mut(id)
        .ok_or_else(|| CoreError::not_found("habit", id))?;
    if habit.is_archived() {
        return Err(ServiceError::Invalid(format!("habit {id} is archived")));
    }
    Ok(habit)
}

fn counts_on(habit: &Habit, date: NaiveDate) -> bool {
    habit.completion_on(date).is_some_and(|c| habit.qualifies(c))
}

fn settle_xp(ws: &mut Workspace, before: bool, after: bool) -> Option<LevelUp> {
    match (before, after) {
        (false, true) => ws.user.award(XpEvent::HabitCompleted),
        (true, false) => {
            ws.user.revoke(XpEvent::HabitCompleted);
            None
        }
        _ => None,
    }
}

/// The user-level streak counts days on which any active habit was done.
fn sync_user_streak(ws: &mut Workspace, as_of: NaiveDate) {
    let dates: Vec<NaiveDate> = ws
        .habits
        .iter()
        .filter(|h| !h.is_archived())
        .flat_map(|h| h.qualifying_dates())
        .collect();
    ws.user.sync_streak(compute_streak(dates, as_of));
}
