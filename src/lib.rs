//! taskboard - team task tracking library
//!
//! The data layer behind the taskboard CLI: tasks with comments, a team
//! roster, the signed-in user, and analytics over the task collection.
//!
//! # Core Concepts
//!
//! - **Store**: a flat key-value store of JSON documents (`user`, `tasks`,
//!   `teamMembers`), backed by a directory or by memory
//! - **Repositories**: typed access to each document with validation
//! - **Views**: pure filters over a task snapshot (mine, assigned, overdue,
//!   search)
//! - **Analytics**: aggregates recomputed from the current snapshot
//!
//! # Module Organization
//!
//! - `board`: repositories wired to one store handle
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `taskboard.toml`
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output
//! - `profile`: Signed-in user
//! - `stats`: Aggregates over tasks
//! - `store`: Key-value store trait and backends
//! - `task`: Task model, repository and views
//! - `team`: Team roster

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod output;
pub mod profile;
pub mod stats;
pub mod store;
pub mod task;
pub mod team;

pub use error::{Error, Result};
