//! Command-line interface for taskboard
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::board::Board;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{HumanOutput, OutputOptions};

mod stats;
mod task;
mod team;
mod user;

/// taskboard - team task tracking
///
/// Tasks, the team roster and the signed-in user live as JSON documents
/// in a store directory.
#[derive(Parser, Debug)]
#[command(name = "taskboard")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store directory (defaults to `[store] path`, then the platform data dir)
    #[arg(long, global = true, env = "TASKBOARD_STORE")]
    pub store: Option<PathBuf>,

    /// Config file (defaults to taskboard.toml in the platform config dir)
    #[arg(long, global = true, env = "TASKBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Team roster
    #[command(subcommand)]
    Team(TeamCommands),

    /// Signed-in user
    #[command(subcommand)]
    User(UserCommands),

    /// Analytics over all tasks
    Stats {
        /// Reference date for overdue counts (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<String>,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// List tasks, optionally filtered
    List {
        /// Case-insensitive text matched against title and description
        #[arg(long)]
        query: Option<String>,

        /// Keep tasks with this status (repeatable)
        #[arg(long = "status")]
        statuses: Vec<String>,

        /// Keep tasks with this priority (repeatable)
        #[arg(long = "priority")]
        priorities: Vec<String>,
    },

    /// Tasks the current user created or is assigned to
    Mine,

    /// Tasks assigned to the current user by someone else
    Assigned,

    /// Past-due open tasks involving the current user
    Overdue {
        /// Reference date (YYYY-MM-DD, default today)
        #[arg(long)]
        today: Option<String>,
    },

    /// Show one task with its comments
    Show {
        id: String,
    },

    /// Create a task
    New {
        title: String,

        /// High, Medium or Low
        #[arg(long)]
        priority: String,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: String,

        #[arg(long)]
        description: Option<String>,

        /// Initial status (default: To Do)
        #[arg(long)]
        status: Option<String>,

        /// Assignee name (default: current user)
        #[arg(long)]
        assign: Option<String>,
    },

    /// Delete a task
    Rm {
        id: String,
    },

    /// Change a task's status
    Status {
        id: String,

        /// To Do, In Progress or Done
        status: String,
    },

    /// Mark a task done
    Complete {
        id: String,
    },

    /// Comment on a task as the current user
    Comment {
        id: String,

        text: String,
    },
}

/// Team subcommands
#[derive(Subcommand, Debug)]
pub enum TeamCommands {
    /// List team members
    List {
        /// Case-insensitive text matched against name and email
        #[arg(long)]
        query: Option<String>,
    },

    /// Add a team member
    Add {
        name: String,

        #[arg(long)]
        email: String,

        /// Admin, Manager or User
        #[arg(long, default_value = "User")]
        role: String,

        /// Avatar URL (generated from the name when omitted)
        #[arg(long)]
        avatar: Option<String>,
    },

    /// Assigned and completed counts per member
    Workload,
}

/// User subcommands
#[derive(Subcommand, Debug)]
pub enum UserCommands {
    /// Show the current user
    Show,

    /// Sign in as `name`
    Login {
        name: String,

        #[arg(long)]
        email: String,
    },

    /// Sign out
    Logout,
}

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    pub store: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

impl GlobalOptions {
    pub fn output(&self) -> OutputOptions {
        OutputOptions {
            json: self.json,
            quiet: self.quiet,
        }
    }

    /// Load config and open the board over the resolved store directory
    pub fn open_board(&self) -> Result<Board> {
        let config = Config::load_or_default(self.config.as_deref());
        let dir = config.store_dir(self.store.as_deref())?;
        Board::open_dir(&dir, config)
    }
}

pub(crate) fn push_warnings(human: &mut HumanOutput, warnings: Vec<String>) {
    for warning in warnings {
        human.push_warning(warning);
    }
}

/// Empty collection in place of a corrupt stored document, for read-only
/// views. The warning goes to `warnings` so the caller can surface it.
pub(crate) fn recover_corrupt<T>(result: Result<Vec<T>>, warnings: &mut Vec<String>) -> Result<Vec<T>> {
    match result {
        Err(Error::CorruptState { key, message }) => {
            tracing::warn!(key = %key, error = %message, "showing corrupt document as empty");
            warnings.push(format!(
                "stored '{key}' is corrupt; showing it as empty (inspect or delete {key}.json)"
            ));
            Ok(Vec::new())
        }
        other => other,
    }
}

/// Parse a `--today`-style date flag, defaulting to the local date
pub(crate) fn parse_date(flag: &str, value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
            Error::InvalidArgument(format!("{flag} must be YYYY-MM-DD, got '{raw}'"))
        }),
        None => Ok(chrono::Local::now().date_naive()),
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let global = GlobalOptions {
            store: self.store,
            config: self.config,
            json: self.json,
            quiet: self.quiet,
        };

        match self.command {
            Commands::Task(cmd) => match cmd {
                TaskCommands::List {
                    query,
                    statuses,
                    priorities,
                } => task::run_list(task::ListOptions {
                    query,
                    statuses,
                    priorities,
                    global,
                }),
                TaskCommands::Mine => task::run_view(task::ViewOptions {
                    view: task::View::Mine,
                    today: None,
                    global,
                }),
                TaskCommands::Assigned => task::run_view(task::ViewOptions {
                    view: task::View::Assigned,
                    today: None,
                    global,
                }),
                TaskCommands::Overdue { today } => task::run_view(task::ViewOptions {
                    view: task::View::Overdue,
                    today,
                    global,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions { id, global }),
                TaskCommands::New {
                    title,
                    priority,
                    due,
                    description,
                    status,
                    assign,
                } => task::run_new(task::NewOptions {
                    title,
                    priority,
                    due,
                    description,
                    status,
                    assign,
                    global,
                }),
                TaskCommands::Rm { id } => task::run_rm(task::RmOptions { id, global }),
                TaskCommands::Status { id, status } => {
                    task::run_status(task::StatusOptions { id, status, global })
                }
                TaskCommands::Complete { id } => {
                    task::run_complete(task::CompleteOptions { id, global })
                }
                TaskCommands::Comment { id, text } => {
                    task::run_comment(task::CommentOptions { id, text, global })
                }
            },
            Commands::Team(cmd) => match cmd {
                TeamCommands::List { query } => team::run_list(team::ListOptions { query, global }),
                TeamCommands::Add {
                    name,
                    email,
                    role,
                    avatar,
                } => team::run_add(team::AddOptions {
                    name,
                    email,
                    role,
                    avatar,
                    global,
                }),
                TeamCommands::Workload => team::run_workload(global),
            },
            Commands::User(cmd) => match cmd {
                UserCommands::Show => user::run_show(global),
                UserCommands::Login { name, email } => {
                    user::run_login(user::LoginOptions { name, email, global })
                }
                UserCommands::Logout => user::run_logout(global),
            },
            Commands::Stats { today } => stats::run(stats::StatsOptions { today, global }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_date_validates_format() {
        assert_eq!(
            parse_date("--today", Some("2025-05-01")).unwrap(),
            NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()
        );
        let err = parse_date("--due", Some("05/01/2025")).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(parse_date("--today", None).is_ok());
    }

    #[test]
    fn recover_corrupt_only_swallows_corrupt_state() {
        let mut warnings = Vec::new();
        let corrupt: Result<Vec<u8>> = Err(Error::CorruptState {
            key: "tasks".to_string(),
            message: "expected value".to_string(),
        });
        assert!(recover_corrupt(corrupt, &mut warnings).unwrap().is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("stored 'tasks' is corrupt"));

        let ok: Result<Vec<u8>> = Ok(vec![1, 2]);
        assert_eq!(recover_corrupt(ok, &mut warnings).unwrap(), vec![1, 2]);

        let io: Result<Vec<u8>> = Err(Error::LockFailed("tasks.json.lock".into()));
        assert!(recover_corrupt(io, &mut warnings).is_err());
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn repeatable_filters_parse() {
        let cli = Cli::try_parse_from([
            "taskboard",
            "task",
            "list",
            "--status",
            "Done",
            "--status",
            "todo",
            "--priority",
            "High",
        ])
        .unwrap();
        match cli.command {
            Commands::Task(TaskCommands::List {
                statuses, priorities, ..
            }) => {
                assert_eq!(statuses, vec!["Done", "todo"]);
                assert_eq!(priorities, vec!["High"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
