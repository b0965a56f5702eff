//! taskboard user command implementations.

use serde::Serialize;

use crate::cli::GlobalOptions;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};
use crate::profile::UserProfile;

pub struct LoginOptions {
    pub name: String,
    pub email: String,
    pub global: GlobalOptions,
}

#[derive(Serialize)]
struct UserOutput {
    name: String,
    email: String,
    signed_in: bool,
}

pub fn run_show(global: GlobalOptions) -> Result<()> {
    let board = global.open_board()?;
    let signed_in = board.profile().load()?.is_some();
    let user = board.current_user()?;

    let mut human = HumanOutput::new(if signed_in { "Signed in" } else { "Not signed in" });
    human.push_summary("Name", user.name.clone());
    human.push_summary("Email", user.email.clone());
    if !signed_in {
        human.push_next_step("taskboard user login <name> --email <email>");
    }

    emit_success(
        global.output(),
        "user show",
        &UserOutput {
            name: user.name,
            email: user.email,
            signed_in,
        },
        Some(&human),
    )
}

pub fn run_login(options: LoginOptions) -> Result<()> {
    let board = options.global.open_board()?;
    board
        .profile()
        .save(&UserProfile::new(options.name, options.email))?;
    let user = board.current_user()?;

    let mut human = HumanOutput::new("Signed in");
    human.push_summary("Name", user.name.clone());
    human.push_summary("Email", user.email.clone());

    emit_success(
        options.global.output(),
        "user login",
        &UserOutput {
            name: user.name,
            email: user.email,
            signed_in: true,
        },
        Some(&human),
    )
}

pub fn run_logout(global: GlobalOptions) -> Result<()> {
    let board = global.open_board()?;
    board.profile().clear()?;

    let human = HumanOutput::new("Signed out");
    emit_success(
        global.output(),
        "user logout",
        &serde_json::json!({ "signed_in": false }),
        Some(&human),
    )
}
