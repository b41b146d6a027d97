use chrono::Utc;
use serde_json::json;
use st_protocol::*;

fn sample_task(id: u64, title: &str) -> Task {
    Task {
        id,
        title: title.to_string(),
        due_date: Some("2024-01-01".to_string()),
        priority: Priority::High,
        context: String::new(),
        status: TaskStatus::Pending,
        created_at: Utc::now(),
        updated_at: None,
        reminder_time: None,
        subtasks: vec![],
    }
}

#[test]
fn test_routing_config_deserialization_from_yaml() {
    let yaml_str = r#"
default-agent: task_manager_agent
primary:
  - agent: goal_planning_agent
    keywords: [goal, long-term, strategy, plan, vision]
  - agent: analysis_agent
    keywords: [report, analysis, stats, trend, progress]
secondary:
  - agent: goal_planning_agent
    input-keywords: [goal]
    response-keywords: [task]
  - agent: analysis_agent
    response-keywords: [report, analysis]
"#;

    let routing: RoutingConfig =
        serde_yaml::from_str(yaml_str).expect("Failed to deserialize RoutingConfig");

    assert_eq!(routing.default_agent, "task_manager_agent");
    assert_eq!(routing.primary.len(), 2);
    assert_eq!(routing.primary[1].keywords[2], "stats");
    assert_eq!(routing.secondary[0].input_keywords, vec!["goal"]);
    assert!(routing.secondary[1].input_keywords.is_empty());
}

#[test]
fn test_agent_definition_skips_instruction() {
    let agent = AgentDefinition {
        name: "analysis_agent".to_string(),
        description: "Reports".to_string(),
        model: "gemini-2.0-flash".to_string(),
        command: None,
        args: vec![],
        tools: vec!["list_tasks".to_string()],
        instruction: "Be insightful".to_string(),
    };

    let json = serde_json::to_string(&agent).expect("Failed to serialize AgentDefinition");
    assert!(!json.contains("instruction"));
    assert!(!json.contains("command"));

    let deserialized: AgentDefinition =
        serde_json::from_str(&json).expect("Failed to deserialize AgentDefinition");
    assert_eq!(deserialized.tools, agent.tools);
    assert_eq!(deserialized.instruction, "");
}

#[test]
fn test_global_config_defaults_from_empty_toml() {
    let config: GlobalConfig = toml_like_empty();
    assert_eq!(config.data_file, "tasks_db.json");
    assert_eq!(config.event_capacity, 1000);
    assert_eq!(config.bus.poll_interval_ms, 1000);
    assert_eq!(config.bus.queue_capacity, 1024);
    assert_eq!(config.bus.overflow, OverflowPolicy::Block);
}

fn toml_like_empty() -> GlobalConfig {
    serde_json::from_value(json!({})).expect("Failed to deserialize GlobalConfig")
}

#[test]
fn test_overflow_policy_snake_case() {
    let bus: BusConfig = serde_json::from_value(json!({"overflow": "drop_newest"}))
        .expect("Failed to deserialize BusConfig");
    assert_eq!(bus.overflow, OverflowPolicy::DropNewest);
    assert_eq!(bus.queue_capacity, 1024);
}

#[test]
fn test_event_kind_wire_names() {
    let names: Vec<String> = EventKind::ALL
        .iter()
        .map(|kind| serde_json::to_value(kind).unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["agent_call", "tool_execution", "a2a_communication", "error", "session_created"]
    );
    for kind in EventKind::ALL {
        assert_eq!(kind.to_string(), kind.as_str());
    }
}

#[test]
fn test_event_details_preserve_insertion_order() {
    let event = Event {
        id: uuid::Uuid::new_v4(),
        kind: EventKind::ToolExecution,
        timestamp: Utc::now(),
        source_name: "TaskManager".to_string(),
        details: json_object(json!({"zeta": 1, "action": "add_task", "alpha": 2})),
        duration_ms: 1.5,
    };

    let keys: Vec<&String> = event.details.keys().collect();
    assert_eq!(keys, vec!["zeta", "action", "alpha"]);
    assert_eq!(event.action(), "add_task");

    let recent = RecentEvent::from(&event);
    assert_eq!(recent.agent, "TaskManager");
    assert_eq!(recent.action, "add_task");
}

#[test]
fn test_event_action_defaults_to_unknown() {
    let event = Event {
        id: uuid::Uuid::new_v4(),
        kind: EventKind::Error,
        timestamp: Utc::now(),
        source_name: "x".to_string(),
        details: Default::default(),
        duration_ms: 0.0,
    };
    assert_eq!(event.action(), "unknown");
}

#[test]
fn test_a2a_message_wire_shape() {
    let message = A2AMessage::new("a", "b", "ping", json!({"n": 1}));
    let value = serde_json::to_value(&message).expect("Failed to serialize A2AMessage");

    for key in [
        "message_id",
        "from_agent",
        "to_agent",
        "message_type",
        "content",
        "context",
        "timestamp",
        "delivered",
    ] {
        assert!(value.get(key).is_some(), "missing key {key}");
    }
    assert_eq!(value["delivered"], json!(false));
    assert_eq!(value["context"], json!({}));
}

#[test]
fn test_json_object_wraps_scalars() {
    assert!(json_object(serde_json::Value::Null).is_empty());
    let wrapped = json_object(json!(42));
    assert_eq!(wrapped.get("value"), Some(&json!(42)));
}

#[test]
fn test_tool_result_success_task_shape() {
    let result = ToolResult::Success(ToolPayload::Task {
        task: sample_task(3, "Write report"),
        message: Some("task_created:3".to_string()),
    });
    let value = serde_json::to_value(&result).expect("Failed to serialize ToolResult");

    assert_eq!(value["status"], json!("success"));
    assert_eq!(value["task"]["id"], json!(3));
    assert_eq!(value["task"]["priority"], json!("high"));
    assert_eq!(value["message"], json!("task_created:3"));

    let back: ToolResult = serde_json::from_value(value).expect("Failed to deserialize ToolResult");
    assert_eq!(back.task().map(|t| t.id), Some(3));
}

#[test]
fn test_tool_result_duplicate_and_error_shape() {
    let duplicate = ToolResult::Duplicate {
        task: sample_task(1, "Buy milk"),
        message: "task_exists:1".to_string(),
    };
    let value = serde_json::to_value(&duplicate).expect("Failed to serialize duplicate");
    assert_eq!(value["status"], json!("duplicate"));
    assert_eq!(value["message"], json!("task_exists:1"));

    let error = ToolResult::Error {
        kind: ToolErrorKind::NotFound,
        message: "Task 9 not found.".to_string(),
    };
    let value = serde_json::to_value(&error).expect("Failed to serialize error");
    assert_eq!(
        value,
        json!({"status": "error", "kind": "not_found", "message": "Task 9 not found."})
    );
}

#[test]
fn test_tool_result_deleted_and_time_payloads() {
    let deleted: ToolResult = serde_json::from_value(json!({
        "status": "success",
        "deleted_count": 0,
        "deleted_tasks": []
    }))
    .expect("Failed to deserialize deleted payload");
    assert!(matches!(
        deleted,
        ToolResult::Success(ToolPayload::Deleted { deleted_count: 0, .. })
    ));

    let time: ToolResult = serde_json::from_value(json!({
        "status": "success",
        "timezone": "UTC",
        "time_utc": "2024-01-01T00:00:00"
    }))
    .expect("Failed to deserialize time payload");
    assert!(matches!(time, ToolResult::Success(ToolPayload::Time { .. })));

    let message: ToolResult = serde_json::from_value(json!({
        "status": "success",
        "message": "Task 4 deleted."
    }))
    .expect("Failed to deserialize message payload");
    assert_eq!(message.message(), Some("Task 4 deleted."));
}

#[test]
fn test_task_unknown_priority_reads_as_unknown() {
    let task: Task = serde_json::from_value(json!({
        "id": 1,
        "title": "Legacy",
        "priority": "urgent",
        "created_at": "2024-01-01T00:00:00Z"
    }))
    .expect("Failed to deserialize Task");
    assert_eq!(task.priority, Priority::Unknown("urgent".to_string()));
    assert_eq!(task.status, TaskStatus::Pending);
    assert!(task.subtasks.is_empty());
    assert!(task.due().is_none());
}

#[test]
fn test_task_keeps_unknown_priority_text() {
    let task: Task = serde_json::from_value(json!({
        "id": 2,
        "title": "Legacy",
        "priority": "urgent",
        "created_at": "2024-01-01T00:00:00Z"
    }))
    .expect("Failed to deserialize Task");

    let written = serde_json::to_value(&task).expect("Failed to serialize Task");
    assert_eq!(written["priority"], json!("urgent"));
}

#[test]
fn test_task_accepts_naive_timestamps() {
    let task: Task = serde_json::from_value(json!({
        "id": 3,
        "title": "Imported",
        "created_at": "2024-01-01T10:00:00.123456",
        "updated_at": "2024-01-02T08:30:00",
        "subtasks": [
            {"title": "step", "status": "done", "created_at": "2024-01-01T10:05:00", "completed_at": "2024-01-01T11:00:00.5"},
            {"title": "next", "created_at": "2024-01-01T10:06:00", "completed_at": null}
        ]
    }))
    .expect("Failed to deserialize Task");

    assert_eq!(task.created_at.to_rfc3339(), "2024-01-01T10:00:00.123456+00:00");
    assert_eq!(
        task.updated_at.map(|t| t.to_rfc3339()).as_deref(),
        Some("2024-01-02T08:30:00+00:00")
    );
    assert_eq!(task.subtasks[0].status, SubtaskStatus::Done);
    assert!(task.subtasks[0].completed_at.is_some());
    assert!(task.subtasks[1].completed_at.is_none());

    let bad = serde_json::from_value::<Task>(json!({
        "id": 4,
        "title": "Broken",
        "created_at": "last tuesday"
    }));
    assert!(bad.unwrap_err().to_string().contains("invalid timestamp 'last tuesday'"));
}

#[test]
fn test_database_defaults() {
    let db: Database = serde_json::from_str("{}").expect("Failed to deserialize Database");
    assert!(db.tasks.is_empty());
    assert!(db.goals.is_empty());

    let goal: Goal = serde_json::from_value(json!({
        "goal": "Run a marathon",
        "created_at": "2024-01-01T00:00:00Z"
    }))
    .expect("Failed to deserialize Goal");
    assert_eq!(goal.horizon_months, 6);
    assert_eq!(goal.category, "");
}
