//! 流水线集成测试：数据集 → 批量生成 → 结果文件 → 评分

use std::sync::Arc;

use nl2sh::core::{write_batch, BatchErrorPolicy, Orchestrator, RunStatus, TaskState};
use nl2sh::evaluator::Judge;
use nl2sh::llm::MockLlmClient;
use nl2sh::records::{load_tasks, read_jsonl, JudgedRecord, TaskRecord};

fn dataset_line(task: &str) -> String {
    serde_json::json!({
        "messages": [
            {"role": "system", "content": "You are an expert Linux Bash assistant."},
            {"role": "user", "content": task},
            {"role": "assistant", "content": "ls"}
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_dataset_to_judged_records() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = dir.path().join("validation.jsonl");
    let generated = dir.path().join("generated.jsonl");
    let judged = dir.path().join("judged.jsonl");

    let lines = [
        dataset_line("list files"),
        "{broken".to_string(),
        dataset_line("show disk usage"),
    ];
    std::fs::write(&dataset, lines.join("\n")).unwrap();

    let tasks = load_tasks(&dataset).unwrap();
    assert_eq!(tasks, ["list files", "show disk usage"]);

    // 第一个任务一次通过；第二个任务被拒两次后耗尽上限
    let inspector = MockLlmClient::scripted([
        "CORRECT",
        "INCORRECT: use du",
        "INCORRECT: add -h",
    ]);
    let composer = MockLlmClient::from_fn(|idx, _| Ok(format!("cmd-{idx}")));
    let orchestrator = Orchestrator::from_clients(
        Arc::new(MockLlmClient::repeating("Clarified task.")),
        Arc::new(composer),
        Arc::new(inspector),
    );

    let records = orchestrator
        .run_batch(&tasks, Some(1), BatchErrorPolicy::Halt)
        .await
        .unwrap();
    write_batch(&records, Some(&generated)).unwrap();

    let back: Vec<TaskRecord> = read_jsonl(&generated).unwrap();
    assert_eq!(
        back,
        vec![
            TaskRecord {
                task: "list files".to_string(),
                command: "cmd-0".to_string(),
                retry_times: 0,
            },
            TaskRecord {
                task: "show disk usage".to_string(),
                command: "cmd-2".to_string(),
                retry_times: 1,
            },
        ]
    );

    let judge = Judge::new(Arc::new(MockLlmClient::repeating("7")));
    let (_, summary) = judge.judge_file(&generated, &judged, 4).await.unwrap();
    assert_eq!(summary.total, 2);
    assert_eq!(summary.average, 7.0);

    let scored: Vec<JudgedRecord> = read_jsonl(&judged).unwrap();
    assert_eq!(scored.len(), 2);
    assert_eq!(scored[1].command, "cmd-2");
}

#[tokio::test]
async fn test_done_implies_accepted_candidate() {
    let orchestrator = Orchestrator::from_clients(
        Arc::new(MockLlmClient::echo()),
        Arc::new(MockLlmClient::repeating("find . -name '*.php' | xargs wc -l")),
        Arc::new(MockLlmClient::scripted(["INCORRECT: count recursively", "  CORRECT  "])),
    );
    let outcome = orchestrator
        .run_single("count php lines", None)
        .await
        .unwrap();

    assert_eq!(outcome.context.state, TaskState::Done);
    assert_eq!(outcome.status(), RunStatus::Success);
    assert!(!outcome.context.composer_history().is_empty());
    assert!(outcome
        .context
        .last_inspection()
        .is_some_and(|i| i.is_accepted()));
    assert_eq!(
        outcome.context.composer_history().len(),
        outcome.context.inspector_history().len()
    );
}
