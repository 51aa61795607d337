use btl_core::{Clock, FixedClock, StatsCollector, TaskItem};
use chrono::{Local, NaiveDate, TimeZone};

fn task_on(day: u32, hour: u32, completed: bool) -> TaskItem {
    let created = Local.with_ymd_and_hms(2026, 6, day, hour, 0, 0).unwrap();
    let mut task = TaskItem::new(format!("task {day}-{hour}"), created).unwrap();
    task.completed = completed;
    task
}

#[test]
fn empty_snapshot_has_zero_rate() {
    let mut collector = StatsCollector::new();
    collector.update_stats(&[]);

    let overall = collector.overall_stats();
    assert_eq!(overall.total, 0);
    assert_eq!(overall.completed, 0);
    assert_eq!(overall.rate, 0.0);
    assert!(collector.daily_stats().is_empty());
}

#[test]
fn tasks_are_bucketed_by_creation_day() {
    let tasks = vec![
        task_on(1, 8, true),
        task_on(1, 22, false),
        task_on(1, 23, false),
        task_on(3, 9, true),
    ];
    let mut collector = StatsCollector::new();
    collector.update_stats(&tasks);

    let daily = collector.daily_stats();
    assert_eq!(
        daily.keys().cloned().collect::<Vec<_>>(),
        vec!["2026-06-01".to_string(), "2026-06-03".to_string()]
    );

    let first = &daily["2026-06-01"];
    assert_eq!(first.date, NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
    assert_eq!((first.total, first.completed), (3, 1));
    assert!((first.completion_rate - 100.0 / 3.0).abs() < 1e-9);
    assert_eq!(daily["2026-06-03"].completion_rate, 100.0);

    let overall = collector.overall_stats();
    let daily_total: u64 = daily.values().map(|day| day.total).sum();
    assert_eq!(overall.total, daily_total);
    assert_eq!(overall.completed, 2);
    assert_eq!(overall.rate, 50.0);
}

#[test]
fn update_replaces_previous_results() {
    let mut collector = StatsCollector::new();
    collector.update_stats(&[task_on(1, 8, true), task_on(2, 8, true)]);
    collector.update_stats(&[task_on(5, 8, false)]);

    let overall = collector.overall_stats();
    assert_eq!((overall.total, overall.completed), (1, 0));
    assert_eq!(collector.daily_stats().len(), 1);
    assert!(collector.daily_stats().contains_key("2026-06-05"));
}

#[test]
fn buckets_follow_the_clock_used_to_create_tasks() {
    let clock = FixedClock::new(Local.with_ymd_and_hms(2026, 6, 9, 12, 0, 0).unwrap());
    let monday = TaskItem::new("plan week", clock.now()).unwrap();
    clock.set(Local.with_ymd_and_hms(2026, 6, 10, 12, 0, 0).unwrap());
    let tuesday = TaskItem::new("review", clock.now()).unwrap();

    let mut collector = StatsCollector::new();
    collector.update_stats(&[monday, tuesday]);
    assert_eq!(collector.daily_stats().len(), 2);
}
