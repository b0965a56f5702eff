//! taskboard task command implementations.

use serde::Serialize;

use crate::cli::{parse_date, push_warnings, recover_corrupt, GlobalOptions};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::task::{self, Comment, NewTask, Priority, Status, Task, TaskQuery};

pub struct ListOptions {
    pub query: Option<String>,
    pub statuses: Vec<String>,
    pub priorities: Vec<String>,
    pub global: GlobalOptions,
}

#[derive(Debug, Clone, Copy)]
pub enum View {
    Mine,
    Assigned,
    Overdue,
}

pub struct ViewOptions {
    pub view: View,
    pub today: Option<String>,
    pub global: GlobalOptions,
}

pub struct ShowOptions {
    pub id: String,
    pub global: GlobalOptions,
}

pub struct NewOptions {
    pub title: String,
    pub priority: String,
    pub due: String,
    pub description: Option<String>,
    pub status: Option<String>,
    pub assign: Option<String>,
    pub global: GlobalOptions,
}

pub struct RmOptions {
    pub id: String,
    pub global: GlobalOptions,
}

pub struct StatusOptions {
    pub id: String,
    pub status: String,
    pub global: GlobalOptions,
}

pub struct CompleteOptions {
    pub id: String,
    pub global: GlobalOptions,
}

pub struct CommentOptions {
    pub id: String,
    pub text: String,
    pub global: GlobalOptions,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
struct TaskRemovedOutput {
    id: String,
    removed: bool,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let mut query = TaskQuery::new();
    if let Some(text) = options.query {
        query = query.with_text(text);
    }
    for raw in &options.statuses {
        query = query.with_status(raw.parse::<Status>()?);
    }
    for raw in &options.priorities {
        query = query.with_priority(raw.parse::<Priority>()?);
    }

    let mut warnings = Vec::new();
    let all = recover_corrupt(board.tasks().list_all(), &mut warnings)?;
    let tasks = query.apply(&all);

    let recovered = !warnings.is_empty();
    let mut human = HumanOutput::new(format!("Tasks ({})", tasks.len()));
    push_warnings(&mut human, warnings);
    if !query.is_empty() {
        human.push_summary("Matched", format!("{} of {}", tasks.len(), all.len()));
    }
    push_task_lines(&mut human, &tasks);
    if all.is_empty() && !recovered {
        human.push_next_step("taskboard task new <title> --priority Medium --due YYYY-MM-DD");
    }

    emit_success(
        options.global.output(),
        "task list",
        &TaskListOutput {
            total: tasks.len(),
            tasks,
        },
        Some(&human),
    )
}

pub fn run_view(options: ViewOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let today = parse_date("--today", options.today.as_deref())?;
    let user = board.current_user()?;
    let mut warnings = Vec::new();
    let all = recover_corrupt(board.tasks().list_all(), &mut warnings)?;

    let (command, header, tasks) = match options.view {
        View::Mine => ("task mine", "My tasks", task::filter_mine(&all, &user.name)),
        View::Assigned => (
            "task assigned",
            "Assigned to me",
            task::filter_assigned_to_me(&all, &user.name),
        ),
        View::Overdue => (
            "task overdue",
            "Overdue",
            task::filter_overdue(&all, &user.name, today),
        ),
    };

    let mut human = HumanOutput::new(format!("{header} ({})", tasks.len()));
    push_warnings(&mut human, warnings);
    human.push_summary("User", user.name.clone());
    if matches!(options.view, View::Overdue) {
        human.push_summary("As of", today.to_string());
    }
    push_task_lines(&mut human, &tasks);

    emit_success(
        options.global.output(),
        command,
        &TaskListOutput {
            total: tasks.len(),
            tasks,
        },
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let mut warnings = Vec::new();
    let all = recover_corrupt(board.tasks().list_all(), &mut warnings)?;
    let task = all
        .into_iter()
        .find(|task| task.id == options.id)
        .ok_or_else(|| Error::TaskNotFound(options.id.clone()))?;

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    push_task_summary(&mut human, &task);
    for comment in &task.comments {
        human.push_detail(format!("[{}] {}: {}", comment.date, comment.author, comment.text));
    }

    emit_success(options.global.output(), "task show", &task, Some(&human))
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let today = parse_date("--today", None)?;

    let mut draft = NewTask::new(options.title)
        .priority(options.priority.parse()?)
        .due(parse_date("--due", Some(&options.due))?);
    if let Some(description) = options.description {
        draft = draft.description(description);
    }
    if let Some(status) = options.status.as_deref() {
        draft = draft.status(status.parse()?);
    }
    if let Some(assignee) = options.assign {
        draft = draft.assign_to(assignee);
    }

    let task = board.create_task(draft, today)?;

    let mut human = HumanOutput::new("Task created");
    push_task_summary(&mut human, &task);

    emit_success(options.global.output(), "task new", &task, Some(&human))
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let removed = board.tasks().remove(&options.id)?;

    let mut human = HumanOutput::new(if removed {
        "Task removed"
    } else {
        "Task not found; nothing removed"
    });
    human.push_summary("ID", options.id.clone());

    emit_success(
        options.global.output(),
        "task rm",
        &TaskRemovedOutput {
            id: options.id,
            removed,
        },
        Some(&human),
    )
}

pub fn run_status(options: StatusOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let status: Status = options.status.parse()?;
    let today = parse_date("--today", None)?;
    let task = board.tasks().set_status(&options.id, status, today)?;

    let mut human = HumanOutput::new("Task updated");
    push_task_summary(&mut human, &task);

    emit_success(options.global.output(), "task status", &task, Some(&human))
}

pub fn run_complete(options: CompleteOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let today = parse_date("--today", None)?;
    let task = board.tasks().complete(&options.id, today)?;

    let mut human = HumanOutput::new("Task completed");
    push_task_summary(&mut human, &task);

    emit_success(options.global.output(), "task complete", &task, Some(&human))
}

pub fn run_comment(options: CommentOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let user = board.current_user()?;
    let today = parse_date("--today", None)?;
    let comment = Comment::new(user.name, today, options.text);
    let task = board.tasks().add_comment(&options.id, comment)?;

    let mut human = HumanOutput::new("Comment added");
    human.push_summary("Task", task.id.clone());
    human.push_summary("Comments", task.comments.len().to_string());

    emit_success(options.global.output(), "task comment", &task, Some(&human))
}

fn push_task_summary(human: &mut HumanOutput, task: &Task) {
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.to_string());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Due", task.due_date.to_string());
    human.push_summary("Assigned to", task.assigned_to.clone());
    human.push_summary("Created by", format!("{} on {}", task.created_by, task.created_date));
    if let Some(done) = task.completed_date {
        human.push_summary("Completed", done.to_string());
    }
    if !task.description.is_empty() {
        human.push_detail(task.description.clone());
    }
}

fn push_task_lines(human: &mut HumanOutput, tasks: &[&Task]) {
    for task in tasks {
        human.push_detail(format!(
            "{} [{}] {} ({}, due {}, {})",
            task.id, task.status, task.title, task.priority, task.due_date, task.assigned_to
        ));
    }
}
