use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{init_db_with_user, rdd, setup_test_db};

#[test]
fn test_init_creates_schema() {
    let db_path = setup_test_db("cli_init");

    rdd()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("Database initialized"));

    rdd()
        .args(["--db", &db_path, "db", "--info"])
        .assert()
        .success()
        .stdout(contains("Users:"))
        .stdout(contains("Tasks:"));

    rdd()
        .args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("migration_applied"))
        .stdout(contains("init"));
}

#[test]
fn test_user_add_and_list() {
    let db_path = setup_test_db("cli_users");
    init_db_with_user(&db_path, "Ada", "ada@example.com");

    rdd()
        .args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(contains("Ada"))
        .stdout(contains("ada@example.com"));

    rdd()
        .args(["--db", &db_path, "user", "list", "--json"])
        .assert()
        .success()
        .stdout(contains("\"email\": \"ada@example.com\""));

    rdd()
        .args(["--db", &db_path, "user", "add", "Ada Two", "ada@example.com"])
        .assert()
        .failure()
        .stderr(contains("Error:"));

    rdd()
        .args(["--db", &db_path, "user", "add", " ", "x@example.com"])
        .assert()
        .failure()
        .stderr(contains("Name and email are both required"));
}

#[test]
fn test_save_then_show() {
    let db_path = setup_test_db("cli_save_show");
    init_db_with_user(&db_path, "Ada", "ada@example.com");

    rdd()
        .args([
            "--db",
            &db_path,
            "save",
            "2025-03-03",
            "--hours",
            "7.5",
            "--notes",
            "sprint planning",
            "--add-task",
            "Write report",
            "--add-task",
            "Review PR",
        ])
        .assert()
        .success()
        .stdout(contains("2 new tasks added successfully!"));

    rdd()
        .args(["--db", &db_path, "show", "2025-03-03"])
        .assert()
        .success()
        .stdout(contains("7.5h"))
        .stdout(contains("sprint planning"))
        .stdout(contains("Write report"))
        .stdout(contains("Review PR"))
        .stdout(contains("0/2 tasks finished"));

    // hours only: tasks are carried over untouched
    rdd()
        .args(["--db", &db_path, "save", "2025-03-03", "--hours", "8"])
        .assert()
        .success()
        .stdout(contains("Your progress has been saved successfully!"));

    rdd()
        .args(["--db", &db_path, "show", "2025-03-03"])
        .assert()
        .success()
        .stdout(contains("8h"))
        .stdout(contains("Review PR"));
}

#[test]
fn test_save_with_task_file_round_trip() {
    let db_path = setup_test_db("cli_task_file");
    init_db_with_user(&db_path, "Ada", "ada@example.com");

    rdd()
        .args([
            "--db",
            &db_path,
            "save",
            "2025-03-04",
            "--hours",
            "6",
            "--add-task",
            "Keep me",
            "--add-task",
            "Drop me",
        ])
        .assert()
        .success();

    let out = rdd()
        .args(["--db", &db_path, "show", "2025-03-04", "--json"])
        .output()
        .expect("show --json");
    assert!(out.status.success());

    let mut tasks: Vec<serde_json::Value> =
        serde_json::from_slice(&out.stdout).expect("task list json");
    assert_eq!(tasks.len(), 2);
    tasks.retain(|t| t["task_name"] == "Keep me");
    tasks[0]["status"] = serde_json::Value::from("Finished");
    tasks.push(serde_json::json!({ "id": "temp-cli-1", "task_name": "Brand new" }));

    let mut file = std::env::temp_dir();
    file.push("cli_task_file_tasks.json");
    fs::write(&file, serde_json::to_string(&tasks).expect("json")).expect("write tasks");

    rdd()
        .args(["--db", &db_path, "save", "2025-03-04", "--tasks"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("1 new task added successfully!"));

    rdd()
        .args(["--db", &db_path, "show", "2025-03-04"])
        .assert()
        .success()
        .stdout(contains("Keep me"))
        .stdout(contains("Brand new"))
        .stdout(contains("Drop me").not())
        .stdout(contains("1/2 tasks finished"));
}

#[test]
fn test_save_remove_task() {
    let db_path = setup_test_db("cli_remove_task");
    init_db_with_user(&db_path, "Ada", "ada@example.com");

    rdd()
        .args([
            "--db",
            &db_path,
            "save",
            "2025-03-05",
            "--add-task",
            "Only task",
        ])
        .assert()
        .success();

    let out = rdd()
        .args(["--db", &db_path, "show", "2025-03-05", "--json"])
        .output()
        .expect("show --json");
    let tasks: Vec<serde_json::Value> = serde_json::from_slice(&out.stdout).expect("json");
    let id = tasks[0]["id"].as_i64().expect("persisted id");

    rdd()
        .args([
            "--db",
            &db_path,
            "save",
            "2025-03-05",
            "--remove-task",
            &id.to_string(),
        ])
        .assert()
        .success();

    rdd()
        .args(["--db", &db_path, "show", "2025-03-05"])
        .assert()
        .success()
        .stdout(contains("No tasks."));
}

#[test]
fn test_invalid_hours_save_as_zero() {
    let db_path = setup_test_db("cli_bad_hours");
    init_db_with_user(&db_path, "Ada", "ada@example.com");

    rdd()
        .args(["--db", &db_path, "save", "2025-03-03", "--hours", "abc"])
        .assert()
        .success()
        .stdout(contains("Work log created and saved successfully!"));

    rdd()
        .args(["--db", &db_path, "show", "2025-03-03"])
        .assert()
        .success()
        .stdout(contains("0h"));
}

#[test]
fn test_bad_date_is_rejected() {
    let db_path = setup_test_db("cli_bad_date");
    init_db_with_user(&db_path, "Ada", "ada@example.com");

    rdd()
        .args(["--db", &db_path, "save", "2025-13-40", "--hours", "1"])
        .assert()
        .failure()
        .stderr(contains("Invalid date format"));
}

#[test]
fn test_reports() {
    let db_path = setup_test_db("cli_reports");
    init_db_with_user(&db_path, "Ada", "ada@example.com");

    rdd()
        .args(["--db", &db_path, "user", "add", "Bob", "bob@example.com"])
        .assert()
        .success();

    rdd()
        .args(["--db", &db_path, "save", "2025-03-03", "--hours", "6"])
        .assert()
        .success();
    rdd()
        .args([
            "--db",
            &db_path,
            "save",
            "2025-03-04",
            "--user",
            "2",
            "--hours",
            "9",
        ])
        .assert()
        .success();

    rdd()
        .args([
            "--db",
            &db_path,
            "leaderboard",
            "--period",
            "week",
            "--date",
            "2025-03-05",
        ])
        .assert()
        .success()
        .stdout(contains("Bob"))
        .stdout(contains("Ada"))
        .stdout(contains("9h"));

    rdd()
        .args(["--db", &db_path, "leaderboard", "--period", "all", "--json"])
        .assert()
        .success()
        .stdout(contains("\"rank\": 1"))
        .stdout(contains("\"user_name\": \"Bob\""));

    rdd()
        .args(["--db", &db_path, "leaderboard", "--period", "fortnight"])
        .assert()
        .failure()
        .stderr(contains("Invalid period"));

    rdd()
        .args(["--db", &db_path, "metrics", "--date", "2025-03-03"])
        .assert()
        .success()
        .stdout(contains("Today"))
        .stdout(contains("60%"));

    rdd()
        .args(["--db", &db_path, "stats", "--date", "2025-03-05"])
        .assert()
        .success()
        .stdout(contains("#2 of 2"));

    rdd()
        .args(["--db", &db_path, "calendar", "--year", "2025"])
        .assert()
        .success()
        .stdout(contains("Jan"))
        .stdout(contains("Dec"))
        .stdout(contains("6 hours this year • 1 active days"));

    rdd()
        .args(["--db", &db_path, "calendar", "--year", "2025", "--json"])
        .assert()
        .success()
        .stdout(contains("\"active_days\": 1"));
}

#[test]
fn test_commands_without_users() {
    let db_path = setup_test_db("cli_no_users");

    rdd()
        .args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    rdd()
        .args(["--db", &db_path, "save", "today", "--hours", "1"])
        .assert()
        .failure()
        .stderr(contains("No users found"));

    rdd()
        .args(["--db", &db_path, "leaderboard"])
        .assert()
        .success()
        .stdout(contains("No activity yet."));
}
