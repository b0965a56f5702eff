//! Task records and the task repository.
//!
//! Tasks live as one JSON array under the `tasks` store key. Every
//! mutation loads the full array under the key's lock, changes it and
//! writes it back. The filter functions at the bottom of the module are
//! pure and operate on a snapshot returned by [`TaskRepository::list_all`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::store::{self, SharedStore, TASKS_KEY};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(Error::InvalidArgument(format!(
                "invalid priority '{value}' (expected High|Medium|Low)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    Done,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::ToDo, Status::InProgress, Status::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::ToDo => "To Do",
            Status::InProgress => "In Progress",
            Status::Done => "Done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = Error;

    /// Accepts the stored spelling plus `todo`, `to-do`, `in_progress`, ...
    fn from_str(value: &str) -> Result<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !matches!(ch, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Status::ToDo),
            "inprogress" => Ok(Status::InProgress),
            "done" => Ok(Status::Done),
            _ => Err(Error::InvalidArgument(format!(
                "invalid status '{value}' (expected To Do|In Progress|Done)"
            ))),
        }
    }
}

/// One entry of a task's discussion thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "user")]
    pub author: String,
    pub date: NaiveDate,
    #[serde(alias = "content")]
    pub text: String,
}

impl Comment {
    pub fn new(author: impl Into<String>, date: NaiveDate, text: impl Into<String>) -> Self {
        Self {
            id: Some(Ulid::new().to_string()),
            author: author.into(),
            date,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: Status,
    /// Display name; matched against team member names by string equality
    pub assigned_to: String,
    pub created_by: String,
    pub created_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == Status::Done
    }

    pub fn involves(&self, user: &str) -> bool {
        self.created_by == user || self.assigned_to == user
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.due_date < today && !self.is_done()
    }

    /// Move to `status`; entering Done stamps `completed_date`, leaving
    /// Done clears it.
    pub fn transition(&mut self, status: Status, today: NaiveDate) {
        if status == Status::Done {
            if !self.is_done() || self.completed_date.is_none() {
                self.completed_date = Some(today);
            }
        } else {
            self.completed_date = None;
        }
        self.status = status;
    }
}

/// Generate a new task identifier (millisecond timestamp + randomness)
pub fn generate_task_id() -> String {
    Ulid::new().to_string()
}

/// Input collected for a new task, before it gets an id and dates
#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: Option<Priority>,
    pub status: Option<Status>,
    pub assigned_to: Option<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    pub fn assign_to(mut self, name: impl Into<String>) -> Self {
        self.assigned_to = Some(name.into());
        self
    }

    /// Validate and turn the draft into a task created by `created_by`
    /// today. An unset assignee defaults to the creator.
    pub fn build(self, created_by: &str, today: NaiveDate) -> Result<Task> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::validation("title", "title cannot be empty"));
        }
        let created_by = created_by.trim();
        if created_by.is_empty() {
            return Err(Error::validation("createdBy", "creator name cannot be empty"));
        }
        let due_date = self
            .due_date
            .ok_or_else(|| Error::validation("dueDate", "a due date is required"))?;
        let priority = self
            .priority
            .ok_or_else(|| Error::validation("priority", "a priority is required"))?;
        let status = self.status.unwrap_or(Status::ToDo);

        let assigned_to = match self.assigned_to.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => created_by.to_string(),
        };

        let mut task = Task {
            id: generate_task_id(),
            title: title.to_string(),
            description: self.description.trim().to_string(),
            due_date,
            priority,
            status: Status::ToDo,
            assigned_to,
            created_by: created_by.to_string(),
            created_date: today,
            completed_date: None,
            comments: Vec::new(),
        };
        task.transition(status, today);
        Ok(task)
    }
}

/// Durable access to the `tasks` collection
#[derive(Debug, Clone)]
pub struct TaskRepository {
    store: SharedStore,
}

impl TaskRepository {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }

    /// All tasks in stored order; empty when the key is absent
    pub fn list_all(&self) -> Result<Vec<Task>> {
        store::read_collection(self.store.as_ref(), TASKS_KEY)
    }

    pub fn get(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.list_all()?.into_iter().find(|task| task.id == id))
    }

    /// Append `task` as given; duplicates are not detected
    pub fn create(&self, task: Task) -> Result<()> {
        let id = task.id.clone();
        store::update_collection(self.store.as_ref(), TASKS_KEY, |tasks: &mut Vec<Task>| {
            tasks.push(task);
            Ok(())
        })?;
        tracing::info!(task_id = %id, "task created");
        Ok(())
    }

    /// Drop the task with `id`. Returns whether anything was removed; an
    /// unknown id leaves the collection as it was.
    pub fn remove(&self, id: &str) -> Result<bool> {
        let removed =
            store::update_collection(self.store.as_ref(), TASKS_KEY, |tasks: &mut Vec<Task>| {
                let before = tasks.len();
                tasks.retain(|task| task.id != id);
                Ok(before != tasks.len())
            })?;
        if removed {
            tracing::info!(task_id = %id, "task removed");
        } else {
            tracing::debug!(task_id = %id, "remove of unknown task ignored");
        }
        Ok(removed)
    }

    pub fn set_status(&self, id: &str, status: Status, today: NaiveDate) -> Result<Task> {
        let task = self.modify(id, |task| {
            task.transition(status, today);
            Ok(())
        })?;
        tracing::info!(task_id = %id, status = %status, "task status changed");
        Ok(task)
    }

    /// Mark the task done as of `today`
    pub fn complete(&self, id: &str, today: NaiveDate) -> Result<Task> {
        self.set_status(id, Status::Done, today)
    }

    pub fn add_comment(&self, id: &str, comment: Comment) -> Result<Task> {
        if comment.text.trim().is_empty() {
            return Err(Error::validation("text", "comment cannot be empty"));
        }
        if comment.author.trim().is_empty() {
            return Err(Error::validation("author", "comment author cannot be empty"));
        }
        let task = self.modify(id, |task| {
            task.comments.push(comment);
            Ok(())
        })?;
        tracing::info!(task_id = %id, comments = task.comments.len(), "comment added");
        Ok(task)
    }

    fn modify<F>(&self, id: &str, f: F) -> Result<Task>
    where
        F: FnOnce(&mut Task) -> Result<()>,
    {
        store::update_collection(self.store.as_ref(), TASKS_KEY, |tasks: &mut Vec<Task>| {
            let task = tasks
                .iter_mut()
                .find(|task| task.id == id)
                .ok_or_else(|| Error::TaskNotFound(id.to_string()))?;
            f(task)?;
            Ok(task.clone())
        })
    }
}

// =============================================================================
// Derived views
// =============================================================================

/// Tasks the user created or is assigned to
pub fn filter_mine<'a>(all: &'a [Task], current_user: &str) -> Vec<&'a Task> {
    all.iter().filter(|task| task.involves(current_user)).collect()
}

/// Tasks assigned to the user by someone else
pub fn filter_assigned_to_me<'a>(all: &'a [Task], current_user: &str) -> Vec<&'a Task> {
    all.iter()
        .filter(|task| task.assigned_to == current_user && task.created_by != current_user)
        .collect()
}

/// The user's open tasks whose due date is before `today`
pub fn filter_overdue<'a>(all: &'a [Task], current_user: &str, today: NaiveDate) -> Vec<&'a Task> {
    all.iter()
        .filter(|task| task.is_overdue(today) && task.involves(current_user))
        .collect()
}

/// Search text plus status and priority tags for the task list.
///
/// Empty text or an empty tag set matches everything on that dimension.
/// Tags are OR-ed within a dimension and AND-ed across dimensions.
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub text: String,
    pub statuses: HashSet<Status>,
    pub priorities: HashSet<Priority>,
}

impl TaskQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.statuses.insert(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priorities.insert(priority);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.statuses.is_empty() && self.priorities.is_empty()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.matches_text(task)
            && (self.statuses.is_empty() || self.statuses.contains(&task.status))
            && (self.priorities.is_empty() || self.priorities.contains(&task.priority))
    }

    fn matches_text(&self, task: &Task) -> bool {
        if self.text.is_empty() {
            return true;
        }
        let needle = self.text.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task.description.to_lowercase().contains(&needle)
    }

    pub fn apply<'a>(&self, all: &'a [Task]) -> Vec<&'a Task> {
        all.iter().filter(|task| self.matches(task)).collect()
    }
}

pub fn filter_by_search_and_tags<'a>(
    all: &'a [Task],
    query: &str,
    statuses: &HashSet<Status>,
    priorities: &HashSet<Priority>,
) -> Vec<&'a Task> {
    TaskQuery {
        text: query.to_string(),
        statuses: statuses.clone(),
        priorities: priorities.clone(),
    }
    .apply(all)
}
