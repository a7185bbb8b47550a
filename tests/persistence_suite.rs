mod common;

use std::{fs, sync::Arc};

use chrono::Utc;
use common::{date, setup_test_env, temp_base};
use daybook_core::{
    config::{Settings, SettingsManager, TaskView, WEIGHT_GOAL_KEY},
    core::{
        services::{HabitService, ServiceError, Session, TaskService},
        utils::PathResolver,
    },
    domain::{Habit, MetricEntry, Priority, Task, TaskSort, WeightGoal, Workspace},
    storage::{JsonStore, MemoryStore, RecordStore},
    timer::{PomodoroTimer, TimerEvent},
};

#[test]
fn records_survive_a_new_session() {
    let (base, mut session, _settings) = setup_test_env();
    let task = Task::new("File taxes").with_priority(Priority::Urgent);
    let id = TaskService::add(&mut session, task).unwrap();
    let habit_id = HabitService::add(&mut session, Habit::daily("Floss")).unwrap();
    let today = date(2024, 4, 1);
    HabitService::toggle(&mut session, habit_id, today, today, Utc::now()).unwrap();
    drop(session);

    assert!(PathResolver::records_file_in(&base).exists());
    let mut reopened = Session::new(Box::new(JsonStore::in_dir(&base)));
    let ws = reopened.workspace().unwrap();
    assert_eq!(ws.tasks[0].id, id);
    assert_eq!(ws.tasks[0].priority, Some(Priority::Urgent));
    assert_eq!(ws.habits[0].completions.len(), 1);
    assert_eq!(ws.user.xp, 10);
}

#[test]
fn failed_save_keeps_store_and_cache_consistent() {
    let store = Arc::new(MemoryStore::default());
    let mut session = Session::new(Box::new(store.clone()));
    TaskService::add(&mut session, Task::new("Kept")).unwrap();

    store.fail_next_save();
    let err = TaskService::add(&mut session, Task::new("Dropped")).unwrap_err();
    assert!(matches!(err, ServiceError::Core(_)));

    let cached = session.workspace().unwrap();
    let stored = store.load().unwrap();
    assert_eq!(cached, stored);
    assert_eq!(stored.tasks.len(), 1);
    assert_eq!(stored.tasks[0].title, "Kept");
}

#[test]
fn older_snapshots_fill_in_defaults() {
    let base = temp_base();
    let path = PathResolver::records_file_in(&base);
    fs::write(
        &path,
        r#"{"tasks": [{"id": "6f1c1b1e-3f4a-4d7e-9a51-0c2d9a7e1b11", "title": "Legacy",
            "created_at": "2024-01-01T00:00:00Z"}]}"#,
    )
    .unwrap();
    let ws = JsonStore::new(path).load().unwrap();
    assert_eq!(ws.tasks[0].title, "Legacy");
    assert!(ws.tasks[0].subtasks.is_empty());
    assert_eq!(ws.user.level, 1);
    assert_eq!(ws.schema_version, Workspace::default().schema_version);
}

#[test]
fn preferences_round_trip_and_feed_the_dashboard() {
    let (_base, mut session, settings) = setup_test_env();
    let mut prefs = Settings::default();
    prefs.task_view = TaskView {
        sort: TaskSort::Priority,
        ..TaskView::default()
    };
    prefs.weight_goal = Some(WeightGoal {
        target: 70.0,
        start: Some(80.0),
        height_cm: Some(175.0),
    });
    settings.save(&prefs).unwrap();

    let loaded = settings.load();
    assert_eq!(loaded, prefs);

    session
        .mutate(|ws| {
            ws.metrics.push(MetricEntry::weight(75.0, date(2024, 6, 1)));
            Ok(())
        })
        .unwrap();
    let dash = session
        .dashboard(date(2024, 6, 1), loaded.weight_goal.as_ref())
        .unwrap();
    assert_eq!(dash.weight.goal_progress, Some(50.0));
    assert!(dash.weight.bmi.is_some());
}

#[test]
fn corrupt_preference_falls_back_to_default() {
    let base = temp_base();
    let manager = SettingsManager::with_base_dir(base.clone()).unwrap();
    fs::write(PathResolver::preference_file_in(&base, WEIGHT_GOAL_KEY), "not json").unwrap();
    assert!(manager.load().weight_goal.is_none());
}

#[test]
fn timer_snapshot_persists_between_launches() {
    let (_base, _session, manager) = setup_test_env();
    let mut prefs = manager.load();
    let mut timer = PomodoroTimer::new(prefs.pomodoro.clone());
    timer.start();
    let anchor = Utc::now() - chrono::Duration::minutes(30);
    prefs.timer_snapshot = Some(timer.snapshot(anchor));
    manager.save(&prefs).unwrap();

    let mut prefs = manager.load();
    let snapshot = prefs.timer_snapshot.take().expect("snapshot");
    let (_timer, event) = PomodoroTimer::restore(prefs.pomodoro.clone(), &snapshot, Utc::now());
    let event = event.expect("work session finished in background");
    let TimerEvent::Completed { duration_secs, .. } = event;
    assert_eq!(duration_secs, 25 * 60);
    prefs.record_session(event.into_session(Utc::now()));
    manager.save(&prefs).unwrap();
    assert_eq!(manager.load().pomodoro_history.len(), 1);
}
