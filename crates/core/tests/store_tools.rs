//! Integration tests for the agent-facing tools and their JSON envelopes.

mod common;

use common::*;
use serde_json::{json, Value};
use st_core::store::TaskStore;
use st_core::store::TaskTools;
use st_protocol::EventKind;
use std::sync::Arc;

async fn invoke(tools: &TaskTools, name: &str, args: Value) -> Value {
    serde_json::to_value(tools.invoke(name, args).await).unwrap()
}

#[tokio::test]
async fn test_dedup_by_lowercased_title_and_exact_due_date() {
    let (_dir, tools, _tracker) = temp_tools();

    let first = invoke(&tools, "add_task", json!({"title": "Buy milk", "due_date": "2024-01-01"})).await;
    assert_eq!(first["status"], "success");
    assert_eq!(first["task"]["id"], 1);
    assert_eq!(first["message"], "task_created:1");

    let duplicate = invoke(&tools, "add_task", json!({"title": "buy milk", "due_date": "2024-01-01"})).await;
    assert_eq!(duplicate["status"], "duplicate");
    assert_eq!(duplicate["task"]["id"], 1);
    assert_eq!(duplicate["task"]["title"], "Buy milk");

    let other_day = invoke(&tools, "add_task", json!({"title": "buy milk", "due_date": "2024-01-02"})).await;
    assert_eq!(other_day["status"], "success");
    assert_eq!(other_day["task"]["id"], 2);
}

#[tokio::test]
async fn test_list_sorts_by_due_then_priority() {
    let (_dir, tools, _tracker) = temp_tools();

    invoke(&tools, "add_task", json!({"title": "Someday", "priority": "medium"})).await;
    invoke(&tools, "add_task", json!({"title": "February", "due_date": "2024-02-01", "priority": "low"})).await;
    invoke(&tools, "add_task", json!({"title": "January", "due_date": "2024-01-01", "priority": "high"})).await;

    let listed = invoke(&tools, "list_tasks", json!({})).await;
    assert_eq!(listed["status"], "success");
    let titles: Vec<&str> = listed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["January", "February", "Someday"]);
}

#[tokio::test]
async fn test_task_lifecycle_through_invoke() {
    let (dir, tools, tracker) = temp_tools();

    invoke(&tools, "add_task", json!({"title": "Write report"})).await;

    let subtasks = invoke(
        &tools,
        "add_subtasks",
        json!({"task_id": 1, "subtasks": ["Outline", "Draft", "Review"]}),
    )
    .await;
    assert_eq!(subtasks["task"]["subtasks"].as_array().unwrap().len(), 3);

    let marked = invoke(&tools, "mark_subtask_done", json!({"task_id": 1, "subtask_index": 1})).await;
    assert_eq!(marked["task"]["subtasks"][1]["status"], "done");
    assert_eq!(marked["task"]["subtasks"][0]["status"], "pending");

    let started = invoke(&tools, "update_task_status", json!({"task_id": 1, "status": "in_progress"})).await;
    assert_eq!(started["task"]["status"], "in_progress");

    let pending = invoke(&tools, "list_tasks", json!({"status": "pending"})).await;
    assert_eq!(pending["tasks"], json!([]));
    let in_progress = invoke(&tools, "list_tasks", json!({"status": "in_progress"})).await;
    assert_eq!(in_progress["tasks"].as_array().unwrap().len(), 1);

    // The file on disk is the envelope's source of truth.
    let db = read_database(&dir.path().join("tasks_db.json")).unwrap();
    assert_eq!(db["tasks"][0]["status"], "in_progress");
    assert_eq!(db["tasks"][0]["subtasks"][1]["status"], "done");

    let deleted = invoke(&tools, "delete_task", json!({"task_id": 1})).await;
    assert_eq!(deleted["status"], "success");
    let listed = invoke(&tools, "list_tasks", json!({})).await;
    assert_eq!(listed["tasks"], json!([]));

    assert_eq!(
        tracker
            .get_events(Some("TaskManager"), Some(EventKind::ToolExecution))
            .len(),
        8
    );
}

#[tokio::test]
async fn test_errors_are_envelopes_and_events() {
    let (_dir, tools, tracker) = temp_tools();
    invoke(&tools, "add_task", json!({"title": "Only task"})).await;

    let cases = [
        ("update_task_status", json!({"task_id": 1, "status": "finished"}), "validation"),
        ("list_tasks", json!({"status": "archived"}), "validation"),
        ("delete_task", json!({"task_id": 42}), "not_found"),
        ("mark_subtask_done", json!({"task_id": 1, "subtask_index": 0}), "not_found"),
        ("mark_subtask_done", json!({"task_id": 1, "subtask_index": -1}), "not_found"),
        ("add_task", json!({"priority": "high"}), "validation"),
        ("launch_rocket", json!({}), "validation"),
    ];
    for (name, args, kind) in cases {
        let result = invoke(&tools, name, args).await;
        assert_eq!(result["status"], "error", "{name}");
        assert_eq!(result["kind"], kind, "{name}");
        assert!(result["message"].as_str().is_some_and(|m| !m.is_empty()), "{name}");
    }

    // Malformed arguments and unknown names are rejected before the store
    // is touched and are not logged.
    assert_eq!(tracker.metrics().errors, 4);
}

#[tokio::test]
async fn test_malformed_database_is_persistence_error() {
    let (dir, _tools, tracker) = temp_tools();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{not json").unwrap();
    let tools = TaskTools::new(Arc::new(TaskStore::new(&path)), tracker.clone());

    let result = invoke(&tools, "list_tasks", json!({})).await;
    assert_eq!(result["status"], "error");
    assert_eq!(result["kind"], "persistence");

    // The broken file is left untouched.
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "{not json");
}

#[tokio::test]
async fn test_reads_database_with_naive_timestamps() {
    let (dir, _tools, tracker) = temp_tools();
    let path = dir.path().join("legacy.json");
    let legacy = json!({
        "tasks": [
            {
                "id": 1,
                "title": "Renew passport",
                "due_date": "2024-02-01",
                "priority": "urgent",
                "context": "",
                "status": "pending",
                "created_at": "2024-01-01T10:00:00.123456",
                "subtasks": [
                    {"title": "Photos", "status": "done", "created_at": "2024-01-01T10:01:00.5", "completed_at": "2024-01-03T09:00:00"}
                ]
            },
            {
                "id": 2,
                "title": "Book dentist",
                "due_date": null,
                "priority": "low",
                "status": "in_progress",
                "created_at": "2024-01-02T08:00:00",
                "updated_at": "2024-01-05T12:00:00.000001"
            }
        ],
        "goals": [
            {"goal": "Learn piano", "horizon_months": 12, "category": "hobby", "created_at": "2024-01-01T00:00:00"}
        ]
    });
    std::fs::write(&path, serde_json::to_string_pretty(&legacy).unwrap()).unwrap();
    let tools = TaskTools::new(Arc::new(TaskStore::new(&path)), tracker.clone());

    let listed = invoke(&tools, "list_tasks", json!({})).await;
    assert_eq!(listed["status"], "success");
    let titles: Vec<&str> = listed["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Renew passport", "Book dentist"]);

    let goals = invoke(&tools, "list_long_term_goals", json!({})).await;
    assert_eq!(goals["goals"][0]["goal"], "Learn piano");

    // Saving an unrelated task rewrites the file without losing legacy data.
    let added = invoke(&tools, "add_task", json!({"title": "Pay rent"})).await;
    assert_eq!(added["task"]["id"], 3);

    let db = read_database(&path).unwrap();
    assert_eq!(db["tasks"].as_array().unwrap().len(), 3);
    assert_eq!(db["tasks"][0]["priority"], "urgent");
    assert_eq!(db["tasks"][0]["subtasks"][0]["status"], "done");
    assert!(db["tasks"][0]["created_at"]
        .as_str()
        .unwrap()
        .starts_with("2024-01-01T10:00:00.123456"));
    assert_eq!(tracker.get_events(None, Some(EventKind::Error)).len(), 0);
}

#[tokio::test]
async fn test_goals_and_high_priority_listing() {
    let (_dir, tools, tracker) = temp_tools();

    invoke(&tools, "add_task", json!({"title": "Later", "due_date": "2024-05-01", "priority": "high"})).await;
    invoke(&tools, "add_task", json!({"title": "Sooner", "due_date": "2024-03-01", "priority": "high"})).await;
    invoke(&tools, "add_task", json!({"title": "Minor", "due_date": "2024-01-01", "priority": "low"})).await;

    let top = invoke(&tools, "list_high_priority_top_n", json!({"n": 1})).await;
    let titles: Vec<&str> = top["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Sooner"]);

    let saved = invoke(
        &tools,
        "save_long_term_goal",
        json!({"goal": "Learn piano", "horizon_months": 24, "category": "personal"}),
    )
    .await;
    assert_eq!(saved["status"], "success");
    assert_eq!(saved["goal"]["goal"], "Learn piano");

    let goals = invoke(&tools, "list_long_term_goals", json!(null)).await;
    assert_eq!(goals["goals"].as_array().unwrap().len(), 1);
    assert_eq!(goals["goals"][0]["horizon_months"], 24);

    assert_eq!(
        tracker
            .get_events(Some("GoalManager"), Some(EventKind::ToolExecution))
            .len(),
        2
    );
}
