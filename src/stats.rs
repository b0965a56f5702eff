//! Aggregates over a task snapshot for the analytics views.
//!
//! Every function is a single pass over its input and returns a fresh
//! value; nothing here reads the store.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::task::{Priority, Status, Task};
use crate::team::TeamMember;

const WEEKDAYS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusCount {
    pub status: Status,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberCompletion {
    pub member: String,
    pub assigned: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayCount {
    pub weekday: &'static str,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberOverdue {
    pub member: String,
    pub overdue: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityDuration {
    pub priority: Priority,
    pub average_days: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub completed: usize,
    /// Percentage of tasks done, 0 for an empty snapshot
    pub completion_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberWorkload {
    pub id: String,
    pub name: String,
    pub assigned: usize,
    pub completed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Analytics {
    pub as_of: NaiveDate,
    pub summary: Summary,
    pub by_status: Vec<StatusCount>,
    pub by_priority: Vec<PriorityCount>,
    pub completion_by_member: Vec<MemberCompletion>,
    pub creation_trend: Vec<WeekdayCount>,
    pub average_completion_days: Vec<PriorityDuration>,
    pub overdue_by_member: Vec<MemberOverdue>,
    pub workload: Vec<MemberWorkload>,
}

/// Counts per status, in To Do / In Progress / Done order, zero-filled
pub fn count_by_status(tasks: &[Task]) -> Vec<StatusCount> {
    let mut counts: HashMap<Status, usize> = HashMap::new();
    for task in tasks {
        *counts.entry(task.status).or_default() += 1;
    }
    Status::ALL
        .iter()
        .map(|status| StatusCount {
            status: *status,
            count: counts.get(status).copied().unwrap_or(0),
        })
        .collect()
}

/// Counts per priority, in High / Medium / Low order, zero-filled
pub fn count_by_priority(tasks: &[Task]) -> Vec<PriorityCount> {
    let mut counts: HashMap<Priority, usize> = HashMap::new();
    for task in tasks {
        *counts.entry(task.priority).or_default() += 1;
    }
    Priority::ALL
        .iter()
        .map(|priority| PriorityCount {
            priority: *priority,
            count: counts.get(priority).copied().unwrap_or(0),
        })
        .collect()
}

/// Assigned and done counts grouped by assignee name, sorted by name
pub fn completion_by_member(tasks: &[Task]) -> Vec<MemberCompletion> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for task in tasks {
        let entry = groups.entry(task.assigned_to.as_str()).or_default();
        entry.0 += 1;
        if task.is_done() {
            entry.1 += 1;
        }
    }
    groups
        .into_iter()
        .map(|(member, (assigned, completed))| MemberCompletion {
            member: member.to_string(),
            assigned,
            completed,
        })
        .collect()
}

/// Tasks created per weekday, Mon..Sun, zero-filled
pub fn creation_trend_by_weekday(tasks: &[Task]) -> Vec<WeekdayCount> {
    let mut counts = [0usize; 7];
    for task in tasks {
        counts[task.created_date.weekday().num_days_from_monday() as usize] += 1;
    }
    WEEKDAYS
        .into_iter()
        .zip(counts)
        .map(|(weekday, count)| WeekdayCount { weekday, count })
        .collect()
}

/// Mean days from `createdDate` to `completedDate` over done tasks of
/// `priority`. Tasks completed before the completion date was recorded
/// are skipped; `None` when nothing qualifies.
pub fn average_completion_days(tasks: &[Task], priority: Priority) -> Option<f64> {
    let mut total_days = 0i64;
    let mut samples = 0usize;
    for task in tasks {
        if task.priority != priority || !task.is_done() {
            continue;
        }
        let Some(completed) = task.completed_date else {
            continue;
        };
        total_days += (completed - task.created_date).num_days();
        samples += 1;
    }
    if samples == 0 {
        None
    } else {
        Some(total_days as f64 / samples as f64)
    }
}

/// Open past-due tasks grouped by assignee, sorted by name
pub fn overdue_by_member(tasks: &[Task], today: NaiveDate) -> Vec<MemberOverdue> {
    let mut groups: BTreeMap<&str, usize> = BTreeMap::new();
    for task in tasks.iter().filter(|task| task.is_overdue(today)) {
        *groups.entry(task.assigned_to.as_str()).or_default() += 1;
    }
    groups
        .into_iter()
        .map(|(member, overdue)| MemberOverdue {
            member: member.to_string(),
            overdue,
        })
        .collect()
}

pub fn summary(tasks: &[Task]) -> Summary {
    let total = tasks.len();
    let completed = tasks.iter().filter(|task| task.is_done()).count();
    let completion_rate = if total == 0 {
        0.0
    } else {
        completed as f64 * 100.0 / total as f64
    };
    Summary {
        total,
        completed,
        completion_rate,
    }
}

/// Per-member assigned/done counts derived from the task collection, in
/// roster order. Members with no tasks report zeros.
pub fn member_workload(members: &[TeamMember], tasks: &[Task]) -> Vec<MemberWorkload> {
    let mut by_name: HashMap<&str, (usize, usize)> = HashMap::new();
    for task in tasks {
        let entry = by_name.entry(task.assigned_to.as_str()).or_default();
        entry.0 += 1;
        if task.is_done() {
            entry.1 += 1;
        }
    }
    members
        .iter()
        .map(|member| {
            let (assigned, completed) = by_name.get(member.name.as_str()).copied().unwrap_or_default();
            MemberWorkload {
                id: member.id.clone(),
                name: member.name.clone(),
                assigned,
                completed,
            }
        })
        .collect()
}

/// Everything the analytics screen shows, computed from one snapshot
pub fn compute(tasks: &[Task], members: &[TeamMember], today: NaiveDate) -> Analytics {
    Analytics {
        as_of: today,
        summary: summary(tasks),
        by_status: count_by_status(tasks),
        by_priority: count_by_priority(tasks),
        completion_by_member: completion_by_member(tasks),
        creation_trend: creation_trend_by_weekday(tasks),
        average_completion_days: Priority::ALL
            .iter()
            .map(|priority| PriorityDuration {
                priority: *priority,
                average_days: average_completion_days(tasks, *priority),
            })
            .collect(),
        overdue_by_member: overdue_by_member(tasks, today),
        workload: member_workload(members, tasks),
    }
}
