use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use daybook_core::{
    core::services::SummaryService,
    domain::{
        Budget, Category, Habit, MetricEntry, Month, Task, Transaction, TransactionKind, Workspace,
    },
    insights::compute_streak,
    storage::{JsonStore, RecordStore},
};
use tempfile::tempdir;

fn build_sample_workspace(size: usize) -> Workspace {
    let mut ws = Workspace::default();
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let groceries = Category::new("Groceries", TransactionKind::Expense);

    for month in 1..=12 {
        let month = Month::new(2025, month).unwrap();
        ws.budgets.push(Budget::new(groceries.id, month, 600.0));
    }
    for idx in 0..size {
        let day = start + Duration::days((idx % 365) as i64);
        let kind = if idx % 10 == 0 {
            TransactionKind::Income
        } else {
            TransactionKind::Expense
        };
        let txn = Transaction::new(kind, 20.0 + (idx % 80) as f64, Some(groceries.id), day)
            .expect("valid amount");
        ws.transactions.push(txn);
        ws.tasks.push(Task::new(format!("Task {idx}")).due_on(day));
        if idx % 5 == 0 {
            ws.metrics.push(MetricEntry::weight(80.0 - (idx % 50) as f64 * 0.1, day));
        }
    }
    ws.categories.push(groceries);

    let now = Utc::now();
    for h in 0..20 {
        let mut habit = Habit::daily(format!("Habit {h}"));
        for offset in 0..365 {
            if (offset + h) % 7 != 0 {
                habit.toggle_completion(start + Duration::days(offset as i64), now);
            }
        }
        ws.habits.push(habit);
    }
    ws
}

fn bench_dashboard(c: &mut Criterion) {
    let ws = build_sample_workspace(black_box(10_000));
    let as_of = NaiveDate::from_ymd_opt(2025, 6, 15).unwrap();

    c.bench_function("dashboard_10k", |b| {
        b.iter(|| black_box(SummaryService::dashboard(&ws, as_of, None)))
    });

    let dates: Vec<NaiveDate> = ws.habits.iter().flat_map(|h| h.qualifying_dates()).collect();
    c.bench_function("streak_merged_habits", |b| {
        b.iter(|| black_box(compute_streak(dates.iter().copied(), as_of)))
    });
}

fn bench_store_io(c: &mut Criterion) {
    let ws = build_sample_workspace(black_box(10_000));
    let dir = tempdir().expect("tempdir");
    let store = JsonStore::in_dir(dir.path());

    c.bench_function("records_save_10k", |b| {
        b.iter(|| store.save(&ws).expect("save records"))
    });

    store.save(&ws).expect("seed");
    c.bench_function("records_load_10k", |b| {
        b.iter(|| black_box(store.load().expect("load records")))
    });
}

criterion_group!(benches, bench_dashboard, bench_store_io);
criterion_main!(benches);
