//! Integration tests for the weekly planner via CLI.
//!
//! All tests pin "today" to Wednesday 2025-06-04 so that the projected week
//! (Monday 2025-06-02 to Sunday 2025-06-08, week 23) is fixed.

mod common;

use common::TestEnv;
use predicates::prelude::*;

const TODAY: &str = "2025-06-04";

fn scheduled_env() -> (TestEnv, String, String) {
    let env = TestEnv::new();
    let dentist = env.add_task("Dentist");
    let yoga = env.add_task("Yoga");
    env.add_task("Someday");
    env.hygge()
        .args(["todo", "update", &dentist, "--once", "2025-06-05"])
        .assert()
        .success();
    env.hygge()
        .args(["todo", "update", &yoga, "--weekly", "monday"])
        .assert()
        .success();
    (env, dentist, yoga)
}

#[test]
fn test_show_current_week() {
    let (env, dentist, yoga) = scheduled_env();

    let week = env.json(&["week", "show", "--today", TODAY]);
    assert_eq!(week["window"]["monday"], "2025-06-02");
    assert_eq!(week["window"]["sunday"], "2025-06-08");
    assert_eq!(week["window"]["week_number"], 23);
    assert_eq!(week["window"]["today"], "wed");

    let columns = week["columns"].as_array().unwrap();
    assert_eq!(columns.len(), 7);
    assert_eq!(columns[0]["placements"][0]["id"], yoga.as_str());
    assert_eq!(columns[3]["placements"][0]["id"], dentist.as_str());
    assert_eq!(columns[2]["is_today"], true);
    let placed: usize = columns
        .iter()
        .map(|c| c["placements"].as_array().unwrap().len())
        .sum();
    assert_eq!(placed, 2);
}

#[test]
fn test_show_next_week() {
    let (env, _, yoga) = scheduled_env();

    let week = env.json(&["week", "show", "--today", TODAY, "--offset", "1"]);
    assert_eq!(week["window"]["monday"], "2025-06-09");
    assert!(week["window"]["today"].is_null());
    assert_eq!(week["columns"][0]["placements"][0]["id"], yoga.as_str());
    assert!(week["columns"][3]["placements"].as_array().unwrap().is_empty());
}

#[test]
fn test_show_human() {
    let (env, _, _) = scheduled_env();

    env.hygge()
        .args(["-H", "week", "show", "--today", TODAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("Week 23 (2025-06-02 to 2025-06-08)"))
        .stdout(predicate::str::contains("*wed 2025-06-04"))
        .stdout(predicate::str::contains("Yoga (weekly)"));
}

#[test]
fn test_toggle_weekly_occurrence_only_affects_that_week() {
    let (env, _, yoga) = scheduled_env();

    let toggled = env.json(&["week", "toggle", &yoga, "mon", "--today", TODAY]);
    assert_eq!(toggled["done"], true);
    assert_eq!(toggled["date"], "2025-06-02");

    let week = env.json(&["week", "show", "--today", TODAY]);
    assert_eq!(week["columns"][0]["placements"][0]["done"], true);

    let last_week = env.json(&["week", "show", "--today", TODAY, "--offset", "-1"]);
    assert_eq!(last_week["columns"][0]["placements"][0]["done"], false);

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(env.tasks_path()).unwrap()).unwrap();
    let record = stored
        .as_array()
        .unwrap()
        .iter()
        .find(|t| t["id"] == yoga.as_str())
        .unwrap();
    assert_eq!(record["completed"], false);
    assert_eq!(record["completionRecords"]["2025-06-02"], true);
}

#[test]
fn test_toggle_once_task() {
    let (env, dentist, _) = scheduled_env();

    let toggled = env.json(&["week", "toggle", &dentist, "thu", "--today", TODAY]);
    assert_eq!(toggled["done"], true);

    let listing = env.json(&["todo", "list"]);
    let item = listing["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|i| i["id"] == dentist.as_str())
        .unwrap()
        .clone();
    assert_eq!(item["completed"], true);
}

#[test]
fn test_toggle_wrong_day_fails() {
    let (env, _, yoga) = scheduled_env();

    env.hygge()
        .args(["week", "toggle", &yoga, "fri", "--today", TODAY])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not scheduled"));
}

#[test]
fn test_huge_offset_is_rejected_without_panicking() {
    let env = TestEnv::new();

    env.hygge()
        .args(["week", "show", "--today", TODAY, "--offset", "2000000000"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--offset"))
        .stderr(predicate::str::contains("panicked").not());
}
