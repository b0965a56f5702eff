//! Board: the repositories wired to one store handle.
//!
//! Commands build a [`Board`] once and go through it, so every read and
//! write in a process hits the same backing store.

use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::profile::{ProfileRepository, UserProfile};
use crate::stats::{self, Analytics};
use crate::store::{DirStore, MemoryStore, SharedStore};
use crate::task::{NewTask, Task, TaskRepository};
use crate::team::{NewMember, TeamMember, TeamRepository};

#[derive(Debug, Clone)]
pub struct Board {
    config: Config,
    tasks: TaskRepository,
    team: TeamRepository,
    profile: ProfileRepository,
}

impl Board {
    pub fn open(store: SharedStore, config: Config) -> Self {
        let team = TeamRepository::new(
            store.clone(),
            config.team.seed_fixtures,
            config.team.avatar_base_url.clone(),
        );
        Self {
            tasks: TaskRepository::new(store.clone()),
            profile: ProfileRepository::new(store),
            team,
            config,
        }
    }

    /// Board over a directory store rooted at `dir`
    pub fn open_dir(dir: &Path, config: Config) -> Result<Self> {
        let store = DirStore::open(dir)?;
        Ok(Self::open(Arc::new(store), config))
    }

    /// Board over a fresh in-memory store
    pub fn in_memory(config: Config) -> Self {
        Self::open(MemoryStore::shared(), config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tasks(&self) -> &TaskRepository {
        &self.tasks
    }

    pub fn team(&self) -> &TeamRepository {
        &self.team
    }

    pub fn profile(&self) -> &ProfileRepository {
        &self.profile
    }

    /// The signed-in user, or the configured guest identity
    pub fn current_user(&self) -> Result<UserProfile> {
        match self.profile.load()? {
            Some(profile) if !profile.name.trim().is_empty() => Ok(profile),
            _ => Ok(UserProfile::new(
                self.config.user.guest_name.clone(),
                self.config.user.guest_email.clone(),
            )),
        }
    }

    /// Build a task from `draft` as the current user and store it
    pub fn create_task(&self, draft: NewTask, today: NaiveDate) -> Result<Task> {
        let user = self.current_user()?;
        let task = draft.build(&user.name, today)?;

        if self.config.tasks.require_known_members {
            let members = self.team.list_all()?;
            let known = |name: &str| members.iter().any(|member| member.name == name);
            if !known(&task.assigned_to) {
                return Err(Error::UnknownMember {
                    field: "assignedTo",
                    name: task.assigned_to.clone(),
                });
            }
            if !known(&task.created_by) {
                return Err(Error::UnknownMember {
                    field: "createdBy",
                    name: task.created_by.clone(),
                });
            }
        }

        self.tasks.create(task.clone())?;
        Ok(task)
    }

    pub fn add_member(&self, draft: NewMember) -> Result<TeamMember> {
        self.team.create(draft.build()?)
    }

    pub fn analytics(&self, today: NaiveDate) -> Result<Analytics> {
        let tasks = self.tasks.list_all()?;
        let members = self.team.list_all()?;
        Ok(stats::compute(&tasks, &members, today))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::{Priority, Status};
    use crate::team::Role;

    fn date(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn draft(title: &str) -> NewTask {
        NewTask::new(title)
            .due(date("2025-05-10"))
            .priority(Priority::High)
    }

    #[test]
    fn guest_user_until_login() {
        let board = Board::in_memory(Config::default());
        assert_eq!(board.current_user().unwrap().name, "Guest User");

        board
            .profile()
            .save(&UserProfile::new("Jane Smith", "jane@example.com"))
            .unwrap();
        assert_eq!(board.current_user().unwrap().name, "Jane Smith");
    }

    #[test]
    fn create_task_defaults_to_current_user() {
        let board = Board::in_memory(Config::default());
        board
            .profile()
            .save(&UserProfile::new("Jane Smith", "jane@example.com"))
            .unwrap();

        let task = board.create_task(draft("Write docs"), date("2025-05-01")).unwrap();
        assert_eq!(task.created_by, "Jane Smith");
        assert_eq!(task.assigned_to, "Jane Smith");
        assert_eq!(task.status, Status::ToDo);
        assert_eq!(board.tasks().list_all().unwrap(), vec![task]);
    }

    #[test]
    fn unknown_members_allowed_by_default() {
        let board = Board::in_memory(Config::default());
        let task = board
            .create_task(draft("Ghost").assign_to("Nobody"), date("2025-05-01"))
            .unwrap();
        assert_eq!(task.assigned_to, "Nobody");
    }

    #[test]
    fn require_known_members_rejects_strangers() {
        let mut config = Config::default();
        config.tasks.require_known_members = true;
        let board = Board::in_memory(config);
        assert!(board.config().tasks.require_known_members);
        board
            .profile()
            .save(&UserProfile::new("John Doe", "john@example.com"))
            .unwrap();

        let err = board
            .create_task(draft("Ghost").assign_to("Nobody"), date("2025-05-01"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMember { field: "assignedTo", .. }));
        assert!(board.tasks().list_all().unwrap().is_empty());

        board
            .create_task(draft("Real").assign_to("Mike Johnson"), date("2025-05-01"))
            .unwrap();
    }

    #[test]
    fn require_known_members_checks_creator() {
        let mut config = Config::default();
        config.tasks.require_known_members = true;
        let board = Board::in_memory(config);

        let err = board
            .create_task(draft("Guest task").assign_to("John Doe"), date("2025-05-01"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownMember { field: "createdBy", .. }));
    }

    #[test]
    fn analytics_includes_workload() {
        let board = Board::in_memory(Config::default());
        board
            .add_member(NewMember::new("Ana Lopez", "ana@example.com").role(Role::Manager))
            .unwrap();
        board
            .create_task(draft("Review").assign_to("Ana Lopez"), date("2025-05-01"))
            .unwrap();

        let analytics = board.analytics(date("2025-06-01")).unwrap();
        assert_eq!(analytics.summary.total, 1);
        assert_eq!(analytics.workload.len(), 5);
        let ana = analytics
            .workload
            .iter()
            .find(|entry| entry.name == "Ana Lopez")
            .unwrap();
        assert_eq!(ana.assigned, 1);
        assert_eq!(analytics.overdue_by_member[0].member, "Ana Lopez");
    }

    #[test]
    fn open_dir_persists_between_boards() {
        let dir = tempfile::tempdir().unwrap();
        let board = Board::open_dir(dir.path(), Config::default()).unwrap();
        let task = board.create_task(draft("Persist"), date("2025-05-01")).unwrap();

        let reopened = Board::open_dir(dir.path(), Config::default()).unwrap();
        assert_eq!(reopened.tasks().get(&task.id).unwrap(), Some(task));
    }
}
