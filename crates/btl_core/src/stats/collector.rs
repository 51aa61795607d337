//! Overall and per-day completion statistics.
//!
//! # Invariants
//! - `overall_stats().total` equals the sum of all daily totals.
//! - A rate is `0.0` exactly when its total is `0`.
//! - `update_stats` replaces the previous daily map wholesale.

use crate::model::task::TaskItem;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Date key format used for daily buckets.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Counters for tasks created on a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyStats {
    pub date: NaiveDate,
    pub total: u64,
    pub completed: u64,
    /// Percentage in `0.0..=100.0`.
    pub completion_rate: f64,
}

/// Aggregate counters across every task in the last snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OverallStats {
    pub total: u64,
    pub completed: u64,
    /// Percentage in `0.0..=100.0`.
    pub rate: f64,
}

/// Collector holding the most recent statistics computation.
#[derive(Debug, Default)]
pub struct StatsCollector {
    total: u64,
    completed: u64,
    daily: BTreeMap<String, DailyStats>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes every counter from `tasks`.
    pub fn update_stats(&mut self, tasks: &[TaskItem]) {
        self.total = 0;
        self.completed = 0;
        let mut daily: BTreeMap<String, DailyStats> = BTreeMap::new();

        for task in tasks {
            let date = task.created_on();
            let day = daily
                .entry(date.format(DAY_KEY_FORMAT).to_string())
                .or_insert_with(|| DailyStats {
                    date,
                    total: 0,
                    completed: 0,
                    completion_rate: 0.0,
                });

            day.total += 1;
            self.total += 1;
            if task.completed {
                day.completed += 1;
                self.completed += 1;
            }
        }

        for day in daily.values_mut() {
            day.completion_rate = completion_rate(day.completed, day.total);
        }

        self.daily = daily;
    }

    /// Totals and completion rate from the last `update_stats` call.
    pub fn overall_stats(&self) -> OverallStats {
        OverallStats {
            total: self.total,
            completed: self.completed,
            rate: completion_rate(self.completed, self.total),
        }
    }

    /// Per-day statistics keyed by `YYYY-MM-DD`, in date order.
    pub fn daily_stats(&self) -> &BTreeMap<String, DailyStats> {
        &self.daily
    }
}

/// `completed / total * 100`, or `0.0` when `total` is zero.
pub fn completion_rate(completed: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::completion_rate;

    #[test]
    fn completion_rate_handles_zero_total() {
        assert_eq!(completion_rate(0, 0), 0.0);
        assert_eq!(completion_rate(1, 4), 25.0);
        assert_eq!(completion_rate(3, 3), 100.0);
    }
}
