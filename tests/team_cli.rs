mod support;

use predicates::str::contains;

use support::TestBoard;

#[test]
fn first_list_seeds_fixture_roster() {
    let board = TestBoard::new();
    assert!(board.read_key("teamMembers").is_none());

    let listed = board.json(&["team", "list"]);
    assert_eq!(listed["data"]["total"], 4);
    let names: Vec<&str> = listed["data"]["members"]
        .as_array()
        .expect("members")
        .iter()
        .map(|member| member["name"].as_str().expect("name"))
        .collect();
    assert_eq!(
        names,
        vec!["John Doe", "Jane Smith", "Mike Johnson", "Sarah Williams"]
    );
    assert_eq!(listed["data"]["members"][0]["role"], "Admin");
    assert_eq!(
        listed["data"]["members"][0]["avatar"],
        "https://ui-avatars.com/api/?name=John%20Doe&background=random"
    );

    let stored = board.read_key("teamMembers").expect("seeded roster");
    assert_eq!(stored.as_array().map(Vec::len), Some(4));
}

#[test]
fn seeding_can_be_disabled() {
    let board = TestBoard::new();
    board.write_config("[team]\nseed_fixtures = false\n");

    let listed = board.json(&["team", "list"]);
    assert_eq!(listed["data"]["total"], 0);
    assert!(board.read_key("teamMembers").is_none());
}

#[test]
fn add_member_appends_to_roster() {
    let board = TestBoard::new();
    let added = board.json(&[
        "team", "add", "Ana Lopez", "--email", "ana@example.com", "--role", "manager",
    ]);
    assert_eq!(added["data"]["name"], "Ana Lopez");
    assert_eq!(added["data"]["role"], "Manager");
    assert!(added["data"]["avatar"]
        .as_str()
        .expect("avatar")
        .contains("name=Ana%20Lopez"));

    let search = board.json(&["team", "list", "--query", "ANA@"]);
    assert_eq!(search["data"]["total"], 1);
    assert_eq!(search["data"]["members"][0]["id"], added["data"]["id"]);

    let all = board.json(&["team", "list"]);
    assert_eq!(all["data"]["total"], 5);
}

#[test]
fn add_member_validates_email() {
    let board = TestBoard::new();
    board
        .cmd()
        .args(["team", "add", "Ana", "--email", "not-an-email"])
        .assert()
        .code(2)
        .stderr(contains("email"));
}

#[test]
fn workload_is_derived_from_tasks() {
    let board = TestBoard::new();
    board.new_task("One", &["--assign", "Mike Johnson"]);
    board.new_task("Two", &["--assign", "Mike Johnson", "--status", "Done"]);

    let workload = board.json(&["team", "workload"]);
    let mike = workload["data"]
        .as_array()
        .expect("workload")
        .iter()
        .find(|entry| entry["name"] == "Mike Johnson")
        .expect("mike")
        .clone();
    assert_eq!(mike["assigned"], 2);
    assert_eq!(mike["completed"], 1);

    let stored = board.read_key("teamMembers").expect("roster");
    assert!(stored[2].get("tasksAssigned").is_none());
}

#[test]
fn legacy_counters_are_ignored() {
    let board = TestBoard::new();
    board.write_key(
        "teamMembers",
        r#"[{"id":"9","name":"Old Timer","email":"old@example.com","role":"User","avatar":"","tasksAssigned":40,"tasksCompleted":38}]"#,
    );

    let workload = board.json(&["team", "workload"]);
    assert_eq!(workload["data"][0]["name"], "Old Timer");
    assert_eq!(workload["data"][0]["assigned"], 0);
    assert_eq!(workload["data"][0]["completed"], 0);
}

#[test]
fn corrupt_roster_reads_empty_but_blocks_add() {
    let board = TestBoard::new();
    board.write_key("teamMembers", "[{\"id\":");

    let list = board.json(&["team", "list"]);
    assert_eq!(list["data"]["total"], 0);
    assert!(list["warnings"][0].as_str().unwrap().contains("teamMembers"));

    let workload = board.json(&["team", "workload"]);
    assert_eq!(workload["data"].as_array().unwrap().len(), 0);
    assert!(workload["warnings"][0].as_str().unwrap().contains("corrupt"));

    board
        .cmd()
        .args(["team", "add", "Ana Lopez", "--email", "ana@example.com", "--role", "User"])
        .assert()
        .code(3);
}
