use rdaydone::core::reconcile::{Reconciler, SyncRequest, TaskOp, parse_hours};
use rdaydone::db::store::{DailyLogFilter, RecordStore, TaskFilter};
use rdaydone::errors::StoreErrorKind;
use rdaydone::models::task::{EditedTask, Task, TaskId};
use rdaydone::models::task_status::TaskStatus;

mod common;
use common::{CountingStore, d, open_store, seed_user};

fn persisted(id: i64, name: &str, client_key: Option<&str>) -> Task {
    Task {
        id,
        work_log_id: 1,
        user_id: 1,
        task_name: name.to_string(),
        description: None,
        status: TaskStatus::Started,
        client_key: client_key.map(str::to_string),
        version: 1,
        created_at: "2025-03-03T09:00:00+00:00".to_string(),
        updated_at: "2025-03-03T09:00:00+00:00".to_string(),
    }
}

fn placeholder(key: &str, name: &str) -> EditedTask {
    EditedTask {
        id: TaskId::Placeholder(key.to_string()),
        ..EditedTask::new(name)
    }
}

fn request(user_id: i64, date: &str, hours: &str, tasks: Vec<EditedTask>) -> SyncRequest {
    SyncRequest {
        daily_log_id: None,
        user_id,
        date: d(date),
        hours: hours.to_string(),
        notes: String::new(),
        tasks,
        expected_version: None,
    }
}

#[test]
fn test_plan_deletes_missing_updates_kept_inserts_new() {
    let saved = vec![
        persisted(1, "Write report", None),
        persisted(2, "Review PR", None),
        persisted(3, "Standup", None),
    ];
    let mut renamed = EditedTask::from(&saved[0]);
    renamed.task_name = "Write final report".into();

    let edited = vec![
        renamed.clone(),
        placeholder("temp-1", "Plan sprint"),
        placeholder("temp-2", "   "),
    ];

    let plan = Reconciler::plan(&saved, &edited);

    assert_eq!(plan.to_delete, vec![2, 3]);
    assert_eq!(
        plan.ops,
        vec![
            TaskOp::Update {
                id: 1,
                task: renamed
            },
            TaskOp::Insert {
                client_key: "temp-1".into(),
                task: placeholder("temp-1", "Plan sprint"),
            },
        ]
    );
    assert_eq!(plan.dropped, 1);
    assert!(plan.foreign.is_empty());
}

#[test]
fn test_plan_keeps_rows_created_from_an_edited_placeholder() {
    let saved = vec![persisted(5, "Plan sprint", Some("temp-a"))];
    let edited = vec![placeholder("temp-a", "Plan sprint")];

    let plan = Reconciler::plan(&saved, &edited);

    assert!(plan.to_delete.is_empty());
    assert_eq!(plan.ops.len(), 1);
    assert!(matches!(&plan.ops[0], TaskOp::Insert { client_key, .. } if client_key == "temp-a"));
}

#[test]
fn test_plan_empty_edit_deletes_everything() {
    let saved = vec![persisted(1, "a", None), persisted(2, "b", None)];
    let plan = Reconciler::plan(&saved, &[]);
    assert_eq!(plan.to_delete, vec![1, 2]);
    assert!(plan.ops.is_empty());
}

#[test]
fn test_plan_reports_ids_not_attached_to_the_log() {
    let saved = vec![persisted(1, "a", None)];
    let mut stranger = EditedTask::new("not mine");
    stranger.id = TaskId::Persisted(42);

    let plan = Reconciler::plan(&saved, &[stranger.clone(), stranger]);
    assert_eq!(plan.foreign, vec![42]);
}

#[test]
fn test_parse_hours_is_lenient() {
    assert_eq!(parse_hours("7.5"), 7.5);
    assert_eq!(parse_hours(" 8 "), 8.0);
    assert_eq!(parse_hours(""), 0.0);
    assert_eq!(parse_hours("lots"), 0.0);
    assert_eq!(parse_hours("-3"), 0.0);
    assert_eq!(parse_hours("NaN"), 0.0);
    assert_eq!(parse_hours("inf"), 0.0);
}

#[test]
fn test_first_save_creates_log_and_tasks_in_order() {
    let store = open_store();
    let user = seed_user(&store, "Ada");

    let req = request(
        user.id,
        "2025-03-03",
        "8",
        vec![
            EditedTask::new("Write report"),
            EditedTask::new("Review PR"),
            EditedTask::new("  "),
        ],
    );
    let result = Reconciler::sync(&store, &req).expect("sync");

    assert!(result.log_created);
    assert_eq!(result.daily_log.hours_worked, 8.0);
    assert_eq!(result.created, 2);
    assert_eq!(result.dropped, 1);
    let names: Vec<&str> = result.tasks.iter().map(|t| t.task_name.as_str()).collect();
    assert_eq!(names, vec!["Write report", "Review PR"]);
    assert!(result.tasks.iter().all(|t| t.work_log_id == result.daily_log.id));
    assert!(result.tasks.iter().all(|t| t.user_id == user.id));
    assert_eq!(result.message(), "2 new tasks added successfully!");
}

#[test]
fn test_save_without_tasks_reports_new_log() {
    let store = open_store();
    let user = seed_user(&store, "Ada");

    let result = Reconciler::sync(&store, &request(user.id, "2025-03-03", "4", vec![]))
        .expect("sync");
    assert_eq!(result.message(), "Work log created and saved successfully!");

    let again = Reconciler::sync(&store, &request(user.id, "2025-03-03", "5", vec![]))
        .expect("second sync");
    assert!(!again.log_created);
    assert_eq!(again.daily_log.id, result.daily_log.id);
    assert_eq!(again.daily_log.hours_worked, 5.0);
    assert_eq!(again.message(), "Your progress has been saved successfully!");
}

#[test]
fn test_single_task_message_is_singular() {
    let store = open_store();
    let user = seed_user(&store, "Ada");
    let req = request(user.id, "2025-03-03", "1", vec![EditedTask::new("One")]);
    let result = Reconciler::sync(&store, &req).expect("sync");
    assert_eq!(result.message(), "1 new task added successfully!");
}

#[test]
fn test_resync_updates_deletes_and_inserts() {
    let pool = open_store();
    let user = seed_user(&pool, "Ada");

    let first = Reconciler::sync(
        &pool,
        &request(
            user.id,
            "2025-03-03",
            "8",
            vec![EditedTask::new("Write report"), EditedTask::new("Review PR")],
        ),
    )
    .expect("first sync");

    let mut kept = EditedTask::from(&first.tasks[0]);
    kept.task_name = "Write final report".into();
    kept.status = TaskStatus::Finished;
    kept.description = Some(String::new());

    let store = CountingStore::new(&pool);
    let mut req = request(
        user.id,
        "2025-03-03",
        "9",
        vec![kept, EditedTask::new("Plan sprint")],
    );
    req.daily_log_id = Some(first.daily_log.id);
    req.expected_version = Some(first.daily_log.version);

    let result = Reconciler::sync(&store, &req).expect("second sync");

    assert_eq!((result.created, result.updated, result.deleted), (1, 1, 1));
    assert_eq!(store.delete_calls.get(), 1);
    assert_eq!(*store.deleted_ids.borrow(), vec![first.tasks[1].id]);

    let names: Vec<&str> = result.tasks.iter().map(|t| t.task_name.as_str()).collect();
    assert_eq!(names, vec!["Write final report", "Plan sprint"]);
    assert_eq!(result.tasks[0].id, first.tasks[0].id);
    assert_eq!(result.tasks[0].status, TaskStatus::Finished);
    assert_eq!(result.tasks[0].description, None);
    assert_eq!(result.daily_log.hours_worked, 9.0);
    assert_eq!(result.daily_log.version, first.daily_log.version + 1);
}

#[test]
fn test_persisted_set_matches_edited_list_after_sync() {
    let store = open_store();
    let user = seed_user(&store, "Ada");

    let first = Reconciler::sync(
        &store,
        &request(
            user.id,
            "2025-03-03",
            "2",
            vec![EditedTask::new("a"), EditedTask::new("b"), EditedTask::new("c")],
        ),
    )
    .expect("sync");

    let edited = vec![EditedTask::from(&first.tasks[2])];
    Reconciler::sync(&store, &request(user.id, "2025-03-03", "2", edited)).expect("resync");

    let left = store
        .fetch_tasks(&TaskFilter::for_log(first.daily_log.id))
        .expect("fetch");
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].id, first.tasks[2].id);
}

#[test]
fn test_unparsable_hours_are_saved_as_zero() {
    let store = open_store();
    let user = seed_user(&store, "Ada");

    let result =
        Reconciler::sync(&store, &request(user.id, "2025-03-03", "abc", vec![])).expect("sync");
    assert_eq!(result.daily_log.hours_worked, 0.0);
}

#[test]
fn test_interrupted_save_can_be_retried_without_duplicates() {
    let pool = open_store();
    let user = seed_user(&pool, "Ada");
    let store = CountingStore::new(&pool);
    store.fail_task_insert_at.set(Some(2));

    let req = request(
        user.id,
        "2025-03-03",
        "6",
        vec![
            EditedTask::new("first"),
            EditedTask::new("second"),
            EditedTask::new("third"),
        ],
    );

    let err = Reconciler::sync(&store, &req).expect_err("second insert fails");
    assert_eq!(err.store_kind(), Some(StoreErrorKind::Transport));

    // the log and the first task made it in
    let log = pool
        .fetch_daily_logs(&DailyLogFilter::all().user(user.id).on(d("2025-03-03")))
        .expect("fetch logs")
        .into_iter()
        .next()
        .expect("log exists");
    assert_eq!(
        pool.fetch_tasks(&TaskFilter::for_log(log.id))
            .expect("fetch")
            .len(),
        1
    );

    store.fail_task_insert_at.set(None);
    let result = Reconciler::sync(&store, &req).expect("retry");

    let names: Vec<&str> = result.tasks.iter().map(|t| t.task_name.as_str()).collect();
    assert_eq!(names, vec!["first", "second", "third"]);
    assert_eq!(store.delete_calls.get(), 0);
}

#[test]
fn test_unchanged_list_updates_in_place() {
    let pool = open_store();
    let user = seed_user(&pool, "Ada");

    let first = Reconciler::sync(
        &pool,
        &request(
            user.id,
            "2025-03-03",
            "8",
            vec![EditedTask::new("Write report"), EditedTask::new("Review PR")],
        ),
    )
    .expect("first sync");

    let store = CountingStore::new(&pool);
    let same: Vec<EditedTask> = first.tasks.iter().map(EditedTask::from).collect();
    let result = Reconciler::sync(&store, &request(user.id, "2025-03-03", "8", same))
        .expect("resync");

    assert_eq!((result.created, result.updated, result.deleted), (0, 2, 0));
    assert_eq!(store.task_insert_attempts.get(), 0);
    assert_eq!(store.task_updates.get(), 2);
    assert_eq!(store.delete_calls.get(), 0);

    let before: Vec<i64> = first.tasks.iter().map(|t| t.id).collect();
    let after: Vec<i64> = result.tasks.iter().map(|t| t.id).collect();
    assert_eq!(after, before);
}

#[test]
fn test_blank_new_task_is_dropped_without_insert() {
    let pool = open_store();
    let user = seed_user(&pool, "Ada");
    let store = CountingStore::new(&pool);

    let result = Reconciler::sync(
        &store,
        &request(user.id, "2025-03-03", "2", vec![EditedTask::new("   ")]),
    )
    .expect("blank task is not an error");

    assert_eq!(store.task_insert_attempts.get(), 0);
    assert_eq!(result.dropped, 1);
    assert_eq!(result.created, 0);
    assert!(result.tasks.is_empty());
}

#[test]
fn test_whitespace_description_is_kept_as_typed() {
    let store = open_store();
    let user = seed_user(&store, "Ada");

    let mut spaced = EditedTask::new("Spaced");
    spaced.description = Some("  ".into());
    let mut empty = EditedTask::new("Empty");
    empty.description = Some(String::new());

    let result = Reconciler::sync(
        &store,
        &request(user.id, "2025-03-03", "1", vec![spaced, empty]),
    )
    .expect("sync");

    assert_eq!(result.tasks[0].description.as_deref(), Some("  "));
    assert_eq!(result.tasks[1].description, None);
}

#[test]
fn test_versioned_save_can_be_retried_after_partial_failure() {
    let pool = open_store();
    let user = seed_user(&pool, "Ada");

    let first =
        Reconciler::sync(&pool, &request(user.id, "2025-03-03", "1", vec![])).expect("sync");

    let store = CountingStore::new(&pool);
    store.fail_task_insert_at.set(Some(2));

    let mut req = request(
        user.id,
        "2025-03-03",
        "6",
        vec![EditedTask::new("first"), EditedTask::new("second")],
    );
    req.daily_log_id = Some(first.daily_log.id);
    req.expected_version = Some(first.daily_log.version);

    let err = Reconciler::sync(&store, &req).expect_err("second insert fails");
    assert_eq!(err.store_kind(), Some(StoreErrorKind::Transport));

    store.fail_task_insert_at.set(None);
    let result = Reconciler::sync(&store, &req).expect("retry of the same request");

    let names: Vec<&str> = result.tasks.iter().map(|t| t.task_name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);
    assert_eq!(result.daily_log.hours_worked, 6.0);
    assert_eq!(result.daily_log.version, first.daily_log.version + 1);
}

#[test]
fn test_versioned_task_edit_can_be_retried_after_partial_failure() {
    let pool = open_store();
    let user = seed_user(&pool, "Ada");

    let first = Reconciler::sync(
        &pool,
        &request(user.id, "2025-03-03", "1", vec![EditedTask::new("draft")]),
    )
    .expect("sync");

    let mut renamed = EditedTask::from(&first.tasks[0]);
    renamed.task_name = "final".into();
    let req = request(
        user.id,
        "2025-03-03",
        "1",
        vec![renamed, EditedTask::new("follow-up")],
    );

    let store = CountingStore::new(&pool);
    store.fail_task_insert_at.set(Some(1));
    let err = Reconciler::sync(&store, &req).expect_err("insert fails");
    assert_eq!(err.store_kind(), Some(StoreErrorKind::Transport));
    assert_eq!(store.task_updates.get(), 1);

    store.fail_task_insert_at.set(None);
    let result = Reconciler::sync(&store, &req).expect("retry of the same request");

    // the rename already landed and is not written twice
    assert_eq!(store.task_updates.get(), 1);
    let names: Vec<&str> = result.tasks.iter().map(|t| t.task_name.as_str()).collect();
    assert_eq!(names, vec!["final", "follow-up"]);
    assert_eq!(result.tasks[0].id, first.tasks[0].id);
    assert_eq!(result.tasks[0].version, first.tasks[0].version + 1);
}

#[test]
fn test_stale_expected_version_is_rejected() {
    let store = open_store();
    let user = seed_user(&store, "Ada");

    let first =
        Reconciler::sync(&store, &request(user.id, "2025-03-03", "1", vec![])).expect("sync");

    let mut req = request(user.id, "2025-03-03", "2", vec![]);
    req.expected_version = Some(first.daily_log.version);
    Reconciler::sync(&store, &req).expect("in-date edit");

    // same starting version with other values: someone else saved in between
    req.hours = "3".into();
    let err = Reconciler::sync(&store, &req).expect_err("stale");
    assert_eq!(err.store_kind(), Some(StoreErrorKind::StaleWrite));
}

#[test]
fn test_stale_task_version_is_rejected() {
    let store = open_store();
    let user = seed_user(&store, "Ada");

    let first = Reconciler::sync(
        &store,
        &request(user.id, "2025-03-03", "1", vec![EditedTask::new("a")]),
    )
    .expect("sync");

    let mut old = EditedTask::from(&first.tasks[0]);
    Reconciler::sync(
        &store,
        &request(user.id, "2025-03-03", "1", vec![old.clone()]),
    )
    .expect("first edit");

    old.task_name = "conflicting".into();
    let err = Reconciler::sync(&store, &request(user.id, "2025-03-03", "1", vec![old]))
        .expect_err("stale task");
    assert_eq!(err.store_kind(), Some(StoreErrorKind::StaleWrite));
}

#[test]
fn test_task_from_another_day_is_a_referential_error() {
    let store = open_store();
    let user = seed_user(&store, "Ada");

    let monday = Reconciler::sync(
        &store,
        &request(user.id, "2025-03-03", "1", vec![EditedTask::new("monday task")]),
    )
    .expect("sync monday");

    let borrowed = EditedTask::from(&monday.tasks[0]);
    let err = Reconciler::sync(
        &store,
        &request(user.id, "2025-03-04", "1", vec![borrowed]),
    )
    .expect_err("foreign task id");
    assert_eq!(err.store_kind(), Some(StoreErrorKind::ReferentialIntegrity));
    assert_eq!(
        err.to_string(),
        "Some of the edited tasks no longer belong to this day. Reload and try again."
    );

    // nothing on Monday was touched
    let still = store
        .fetch_tasks(&TaskFilter::for_log(monday.daily_log.id))
        .expect("fetch");
    assert_eq!(still, monday.tasks);
}

#[test]
fn test_log_id_of_another_user_is_rejected() {
    let store = open_store();
    let ada = seed_user(&store, "Ada");
    let bob = seed_user(&store, "Bob");

    let ada_log =
        Reconciler::sync(&store, &request(ada.id, "2025-03-03", "1", vec![])).expect("sync");

    let mut req = request(bob.id, "2025-03-03", "3", vec![]);
    req.daily_log_id = Some(ada_log.daily_log.id);
    let err = Reconciler::sync(&store, &req).expect_err("wrong owner");
    assert_eq!(err.store_kind(), Some(StoreErrorKind::ReferentialIntegrity));
}

#[test]
fn test_unknown_user_is_a_referential_error() {
    let store = open_store();
    let err = Reconciler::sync(&store, &request(999, "2025-03-03", "1", vec![]))
        .expect_err("no such user");
    assert_eq!(err.store_kind(), Some(StoreErrorKind::ReferentialIntegrity));
    assert_eq!(
        err.to_string(),
        "Invalid user ID. Please refresh and try again."
    );
}

#[test]
fn test_task_ids_parse_from_numbers_and_placeholders() {
    let fresh = TaskId::placeholder();
    assert!(fresh.is_placeholder());
    assert!(fresh.to_string().starts_with("temp-"));
    assert_ne!(fresh, TaskId::placeholder());

    assert_eq!("17".parse::<TaskId>().expect("id"), TaskId::Persisted(17));
    assert!("temp-".parse::<TaskId>().is_err());
    assert!("seventeen".parse::<TaskId>().is_err());

    let edited: Vec<EditedTask> = serde_json::from_str(
        r#"[{"id": 3, "task_name": "saved", "status": "On Hold", "version": 2},
            {"id": "temp-9", "task_name": "new"}]"#,
    )
    .expect("edited list");
    assert_eq!(edited[0].id, TaskId::Persisted(3));
    assert_eq!(edited[0].status, TaskStatus::OnHold);
    assert_eq!(edited[0].version, Some(2));
    assert!(edited[1].id.is_placeholder());
    assert_eq!(edited[1].status, TaskStatus::Started);
}
