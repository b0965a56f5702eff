mod support;

use support::TestBoard;

#[test]
fn guest_until_login_then_back_after_logout() {
    let board = TestBoard::new();

    let guest = board.json(&["user", "show"]);
    assert_eq!(guest["data"]["name"], "Guest User");
    assert_eq!(guest["data"]["signed_in"], false);

    let login = board.json(&["user", "login", "Jane Smith", "--email", "jane@example.com"]);
    assert_eq!(login["command"], "user login");
    assert_eq!(login["data"]["name"], "Jane Smith");
    assert_eq!(
        board.read_key("user"),
        Some(serde_json::json!({"name": "Jane Smith", "email": "jane@example.com"}))
    );

    let shown = board.json(&["user", "show"]);
    assert_eq!(shown["data"]["signed_in"], true);
    assert_eq!(shown["data"]["email"], "jane@example.com");

    board.json(&["user", "logout"]);
    assert!(board.read_key("user").is_none());
    let guest = board.json(&["user", "show"]);
    assert_eq!(guest["data"]["name"], "Guest User");
}

#[test]
fn guest_identity_is_configurable() {
    let board = TestBoard::new();
    board.write_config("[user]\nguest_name = \"Visitor\"\nguest_email = \"visitor@example.com\"\n");

    let guest = board.json(&["user", "show"]);
    assert_eq!(guest["data"]["name"], "Visitor");

    let id = board.new_task("Anonymous", &[]);
    let shown = board.json(&["task", "show", &id]);
    assert_eq!(shown["data"]["createdBy"], "Visitor");
}

#[test]
fn login_rejects_blank_name() {
    let board = TestBoard::new();
    board
        .cmd()
        .args(["user", "login", "  ", "--email", "x@example.com"])
        .assert()
        .code(2);
    assert!(board.read_key("user").is_none());
}
