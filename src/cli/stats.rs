//! taskboard stats command implementation.

use crate::cli::{parse_date, push_warnings, recover_corrupt, GlobalOptions};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::stats;

pub struct StatsOptions {
    pub today: Option<String>,
    pub global: GlobalOptions,
}

pub fn run(options: StatsOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let today = parse_date("--today", options.today.as_deref())?;
    let mut warnings = Vec::new();
    let tasks = recover_corrupt(board.tasks().list_all(), &mut warnings)?;
    let members = recover_corrupt(board.team().list_all(), &mut warnings)?;
    let analytics = stats::compute(&tasks, &members, today);

    let mut human = HumanOutput::new("Task analytics");
    push_warnings(&mut human, warnings);
    human.push_summary("As of", today.to_string());
    human.push_summary("Total", analytics.summary.total.to_string());
    human.push_summary("Completed", analytics.summary.completed.to_string());
    human.push_summary(
        "Completion rate",
        format!("{:.1}%", analytics.summary.completion_rate),
    );
    for entry in &analytics.by_status {
        human.push_detail(format!("status {}: {}", entry.status, entry.count));
    }
    for entry in &analytics.by_priority {
        human.push_detail(format!("priority {}: {}", entry.priority, entry.count));
    }
    for entry in &analytics.average_completion_days {
        if let Some(days) = entry.average_days {
            human.push_detail(format!("avg days to done ({}): {:.1}", entry.priority, days));
        }
    }
    let trend: Vec<String> = analytics
        .creation_trend
        .iter()
        .map(|entry| format!("{} {}", entry.weekday, entry.count))
        .collect();
    human.push_detail(format!("created by weekday: {}", trend.join(", ")));
    for entry in &analytics.completion_by_member {
        human.push_detail(format!(
            "{}: {}/{} done",
            entry.member, entry.completed, entry.assigned
        ));
    }
    for entry in &analytics.overdue_by_member {
        human.push_warning(format!("{} has {} overdue", entry.member, entry.overdue));
    }

    emit_success(options.global.output(), "stats", &analytics, Some(&human))
}
