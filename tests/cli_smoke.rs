use assert_cmd::Command;
use predicates::str::contains;
use taskboard::error::exit_codes;

#[test]
fn taskboard_help_works() {
    Command::cargo_bin("taskboard")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("Usage: taskboard"));
}

#[test]
fn subcommand_help_works() {
    let subcommands: [&[&str]; 8] = [
        &["task"],
        &["task", "new"],
        &["task", "list"],
        &["team"],
        &["team", "add"],
        &["user"],
        &["user", "login"],
        &["stats"],
    ];

    for cmd in subcommands {
        Command::cargo_bin("taskboard")
            .expect("binary")
            .args(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn missing_required_flag_is_rejected() {
    Command::cargo_bin("taskboard")
        .expect("binary")
        .args(["task", "new", "No due date", "--priority", "High"])
        .assert()
        .failure()
        .stderr(contains("--due"));
}

#[test]
fn successful_command_exits_with_success_code() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = dir.path().join("taskboard.toml");
    std::fs::write(&config, "").expect("config file");

    Command::cargo_bin("taskboard")
        .expect("binary")
        .env_remove("TASKBOARD_STORE")
        .env_remove("TASKBOARD_CONFIG")
        .arg("--store")
        .arg(dir.path().join("store"))
        .arg("--config")
        .arg(&config)
        .args(["user", "show"])
        .assert()
        .code(exit_codes::SUCCESS)
        .stdout(contains("Not signed in"));
}
