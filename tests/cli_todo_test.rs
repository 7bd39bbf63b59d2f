//! Integration tests for todo list commands via CLI.
//!
//! These tests verify that:
//! - `hygge todo add/list/toggle/delete/clear-completed/update` all work
//! - JSON and human-readable output formats are correct
//! - Stored data (including malformed and legacy records) loads sensibly

mod common;

use common::TestEnv;
use predicates::prelude::*;

// === Add / List ===

#[test]
fn test_add_json() {
    let env = TestEnv::new();

    env.hygge()
        .args(["todo", "add", "Light a candle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"id\":\""))
        .stdout(predicate::str::contains("\"text\":\"Light a candle\""));
}

#[test]
fn test_add_human() {
    let env = TestEnv::new();

    env.hygge()
        .args(["-H", "todo", "add", "Light a candle"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added"))
        .stdout(predicate::str::contains("\"Light a candle\""));
}

#[test]
fn test_add_blank_fails() {
    let env = TestEnv::new();

    env.hygge()
        .args(["todo", "add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("\"error\""))
        .stderr(predicate::str::contains("cannot be empty"));
}

#[test]
fn test_add_persists_to_data_dir() {
    let env = TestEnv::new();
    env.add_task("Tea");

    let stored = std::fs::read_to_string(env.tasks_path()).unwrap();
    let tasks: serde_json::Value = serde_json::from_str(&stored).unwrap();
    assert_eq!(tasks[0]["text"], "Tea");
    assert_eq!(tasks[0]["completed"], false);
    assert!(tasks[0]["createdAt"].is_string());
}

#[test]
fn test_list_counts() {
    let env = TestEnv::new();
    let first = env.add_task("Tea");
    env.add_task("Walk");
    env.hygge()
        .args(["todo", "toggle", &first])
        .assert()
        .success();

    let listing = env.json(&["todo", "list"]);
    assert_eq!(listing["total"], 2);
    assert_eq!(listing["active"], 1);
    assert_eq!(listing["items"][0]["completed"], true);

    env.hygge()
        .args(["todo", "list", "-H"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[x]"))
        .stdout(predicate::str::contains("2 tasks (1 active)"));
}

#[test]
fn test_list_empty_human() {
    let env = TestEnv::new();

    env.hygge()
        .args(["-H", "todo", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks."));
}

#[test]
fn test_add_with_project() {
    let env = TestEnv::new();
    env.hygge()
        .args([
            "todo", "add", "Draft", "--project", "Thesis", "--progress", "30", "-p", "high",
        ])
        .assert()
        .success();

    let listing = env.json(&["todo", "list"]);
    let item = &listing["items"][0];
    assert_eq!(item["project"], "Thesis");
    assert_eq!(item["progress"], 30);
    assert_eq!(item["priority"], "high");
}

// === Toggle / Delete / Clear ===

#[test]
fn test_toggle_twice() {
    let env = TestEnv::new();
    let id = env.add_task("Tea");

    let toggled = env.json(&["todo", "toggle", &id]);
    assert_eq!(toggled["completed"], true);
    let toggled = env.json(&["todo", "toggle", &id]);
    assert_eq!(toggled["completed"], false);
}

#[test]
fn test_toggle_unknown_id_fails() {
    let env = TestEnv::new();

    env.hygge()
        .args(["todo", "toggle", "12345"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_toggle_weekly_task_fails() {
    let env = TestEnv::new();
    let id = env.add_task("Yoga");
    env.hygge()
        .args(["todo", "update", &id, "--weekly", "mon"])
        .assert()
        .success();

    env.hygge()
        .args(["-H", "todo", "toggle", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("weekly planner"));
}

#[test]
fn test_delete() {
    let env = TestEnv::new();
    let id = env.add_task("Tea");
    env.add_task("Walk");

    env.hygge()
        .args(["todo", "delete", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains(&id));

    let listing = env.json(&["todo", "list"]);
    assert_eq!(listing["total"], 1);
    assert_eq!(listing["items"][0]["text"], "Walk");

    env.hygge()
        .args(["todo", "delete", &id])
        .assert()
        .failure();
}

#[test]
fn test_clear_completed_keeps_weekly() {
    let env = TestEnv::new();
    let done = env.add_task("Done");
    let weekly = env.add_task("Yoga");
    env.add_task("Open");
    env.hygge().args(["todo", "toggle", &done]).assert().success();
    env.hygge()
        .args(["todo", "update", &weekly, "--weekly", "tue"])
        .assert()
        .success();

    let cleared = env.json(&["todo", "clear-completed"]);
    assert_eq!(cleared["removed"], 1);

    let listing = env.json(&["todo", "list"]);
    assert_eq!(listing["total"], 2);

    env.hygge()
        .args(["-H", "todo", "clear-completed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No completed tasks"));
}

// === Update ===

#[test]
fn test_update_fields() {
    let env = TestEnv::new();
    let id = env.add_task("Tea");

    let updated = env.json(&[
        "todo",
        "update",
        &id,
        "--text",
        "Green tea",
        "--priority",
        "low",
        "--once",
        "2025-06-04",
    ]);
    assert_eq!(updated["task"]["text"], "Green tea");
    assert_eq!(updated["task"]["priority"], "low");
    assert_eq!(updated["task"]["task_type"], "once");
    assert_eq!(updated["task"]["schedule"], "2025-06-04");

    let updated = env.json(&["todo", "update", &id, "--unscheduled"]);
    assert_eq!(updated["task"]["task_type"], "none");
}

#[test]
fn test_update_clears_project() {
    let env = TestEnv::new();
    let id = env.add_task("Draft");
    env.hygge()
        .args(["todo", "update", &id, "--project", "Thesis"])
        .assert()
        .success();

    let updated = env.json(&["todo", "update", &id, "--no-project"]);
    assert!(updated["task"].get("project").is_none());
}

#[test]
fn test_update_without_changes_fails() {
    let env = TestEnv::new();
    let id = env.add_task("Tea");

    env.hygge()
        .args(["todo", "update", &id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Nothing to update"));
}

#[test]
fn test_update_rejects_bad_weekday() {
    let env = TestEnv::new();
    let id = env.add_task("Tea");

    env.hygge()
        .args(["todo", "update", &id, "--weekly", "someday"])
        .assert()
        .failure();
}

// === Stored data ===

#[test]
fn test_malformed_store_loads_empty() {
    let env = TestEnv::new();
    env.write_tasks("{not json");

    let listing = env.json(&["todo", "list"]);
    assert_eq!(listing["total"], 0);

    env.add_task("Fresh start");
    let listing = env.json(&["todo", "list"]);
    assert_eq!(listing["total"], 1);
}

#[test]
fn test_legacy_records_load() {
    let env = TestEnv::new();
    env.write_tasks(
        r#"[
            {"id": 1717400000000, "title": "Old yoga", "completed": false, "weekDay": "mon"},
            {"id": "b", "text": "Dentist", "completed": false, "taskType": "once", "date": "2025-06-05"},
            {"id": 3, "text": "Odd", "completed": false, "taskType": "daily"}
        ]"#,
    );

    let listing = env.json(&["todo", "list"]);
    assert_eq!(listing["total"], 3);
    assert_eq!(listing["items"][0]["id"], "1717400000000");
    assert_eq!(listing["items"][0]["text"], "Old yoga");
    assert_eq!(listing["items"][0]["task_type"], "recurring");
    assert_eq!(listing["items"][1]["task_type"], "once");
    assert_eq!(listing["items"][2]["task_type"], "none");
}
