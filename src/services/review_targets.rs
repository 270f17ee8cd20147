use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::domain::SolutionRecord;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriorityTarget {
    pub record: SolutionRecord,
    pub overdue_days: i64,
}

/// Keeps the most recent record of every problem; older submissions are
/// history and never scheduled.
pub fn latest_per_problem(records: Vec<SolutionRecord>) -> Vec<SolutionRecord> {
    let mut latest: HashMap<String, SolutionRecord> = HashMap::new();

    for record in records {
        match latest.get(&record.problem_id) {
            Some(current)
                if (current.created_at, current.attempt_number)
                    >= (record.created_at, record.attempt_number) => {}
            _ => {
                latest.insert(record.problem_id.clone(), record);
            }
        }
    }

    latest.into_values().collect()
}

/// Records still in active review whose due date falls on or before the end
/// of the campus day, earliest due first.
pub fn select_today_targets(
    records: Vec<SolutionRecord>,
    end_of_day: DateTime<Utc>,
) -> Vec<SolutionRecord> {
    let mut targets: Vec<SolutionRecord> = latest_per_problem(records)
        .into_iter()
        .filter(|r| !r.is_retired() && r.next_review_date <= end_of_day)
        .collect();

    targets.sort_by(|a, b| {
        a.next_review_date
            .cmp(&b.next_review_date)
            .then_with(|| a.problem_id.cmp(&b.problem_id))
    });
    targets
}

pub fn overdue_days(due: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - due).num_days().max(0)
}

pub fn rank_priority_targets(
    records: Vec<SolutionRecord>,
    now: DateTime<Utc>,
    end_of_day: DateTime<Utc>,
    max_overdue_days: Option<i64>,
    limit: Option<usize>,
) -> Vec<PriorityTarget> {
    let mut ranked: Vec<PriorityTarget> = select_today_targets(records, end_of_day)
        .into_iter()
        .map(|record| PriorityTarget {
            overdue_days: overdue_days(record.next_review_date, now),
            record,
        })
        .filter(|t| max_overdue_days.map_or(true, |max| t.overdue_days <= max))
        .collect();

    ranked.sort_by(|a, b| {
        b.overdue_days
            .cmp(&a.overdue_days)
            .then_with(|| a.record.next_review_date.cmp(&b.record.next_review_date))
            .then_with(|| a.record.problem_id.cmp(&b.record.problem_id))
    });

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }
    ranked
}
