//! taskboard team command implementations.

use serde::Serialize;

use crate::cli::{push_warnings, recover_corrupt, GlobalOptions};
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::stats;
use crate::team::{self, NewMember, Role, TeamMember};

pub struct ListOptions {
    pub query: Option<String>,
    pub global: GlobalOptions,
}

pub struct AddOptions {
    pub name: String,
    pub email: String,
    pub role: String,
    pub avatar: Option<String>,
    pub global: GlobalOptions,
}

#[derive(Serialize)]
struct MemberListOutput<'a> {
    total: usize,
    members: Vec<&'a TeamMember>,
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let mut warnings = Vec::new();
    let all = recover_corrupt(board.team().list_all(), &mut warnings)?;
    let query = options.query.unwrap_or_default();
    let members = team::filter_by_search(&all, query.trim());

    let mut human = HumanOutput::new(format!("Team ({})", members.len()));
    push_warnings(&mut human, warnings);
    for member in &members {
        human.push_detail(format!(
            "{} {} <{}> {}",
            team::initials(&member.name),
            member.name,
            member.email,
            member.role
        ));
    }

    emit_success(
        options.global.output(),
        "team list",
        &MemberListOutput {
            total: members.len(),
            members,
        },
        Some(&human),
    )
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let board = options.global.open_board()?;
    let role: Role = options.role.parse()?;
    let mut draft = NewMember::new(options.name, options.email).role(role);
    if let Some(avatar) = options.avatar {
        draft = draft.avatar(avatar);
    }
    let member = board.add_member(draft)?;

    let mut human = HumanOutput::new("Team member added");
    human.push_summary("ID", member.id.clone());
    human.push_summary("Name", member.name.clone());
    human.push_summary("Email", member.email.clone());
    human.push_summary("Role", member.role.to_string());

    emit_success(options.global.output(), "team add", &member, Some(&human))
}

pub fn run_workload(global: GlobalOptions) -> Result<()> {
    let board = global.open_board()?;
    let mut warnings = Vec::new();
    let members = recover_corrupt(board.team().list_all(), &mut warnings)?;
    let tasks = recover_corrupt(board.tasks().list_all(), &mut warnings)?;
    let workload = stats::member_workload(&members, &tasks);

    let mut human = HumanOutput::new("Workload");
    push_warnings(&mut human, warnings);
    for entry in &workload {
        human.push_detail(format!(
            "{}: {} assigned, {} completed",
            entry.name, entry.assigned, entry.completed
        ));
    }

    emit_success(global.output(), "team workload", &workload, Some(&human))
}
