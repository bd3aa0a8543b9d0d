//! 批量驱动：对任务列表逐个调用 run_single
//!
//! 严格串行执行；角色实例在任务之间复用，上下文每个任务新建。

use std::path::Path;

use serde::Deserialize;

use crate::core::{AgentError, Orchestrator, TaskAborted};
use crate::records::{write_jsonl, TaskRecord};

/// 单个任务中止时批量驱动的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchErrorPolicy {
    /// 立即停止并上抛
    #[default]
    Halt,
    /// 记录警告，跳过该任务（不产生结果记录）
    Skip,
}

impl Orchestrator {
    pub async fn run_batch(
        &self,
        tasks: &[String],
        max_recompose: Option<u32>,
        policy: BatchErrorPolicy,
    ) -> Result<Vec<TaskRecord>, TaskAborted> {
        let batch_id = format!("batch_{}", uuid::Uuid::new_v4());
        tracing::info!(batch_id = %batch_id, total = tasks.len(), "Batch started");

        // 记录初始 token 数，用于计算本批增量
        let (init_prompt, init_completion, _) = self.token_usage();

        let mut records = Vec::with_capacity(tasks.len());
        let mut skipped = 0usize;

        for (idx, task) in tasks.iter().enumerate() {
            tracing::info!(batch_id = %batch_id, "Task {}/{}", idx + 1, tasks.len());
            match self.run_single(task, max_recompose).await {
                Ok(outcome) => records.push(TaskRecord {
                    task: task.clone(),
                    command: outcome.command().unwrap_or_default().to_string(),
                    retry_times: outcome.recompose_count,
                }),
                Err(err) if policy == BatchErrorPolicy::Skip => {
                    skipped += 1;
                    tracing::warn!(batch_id = %batch_id, task = %task, error = %err, "Skipping aborted task");
                }
                Err(err) => return Err(err),
            }
        }

        let (cur_prompt, cur_completion, cur_total) = self.token_usage();
        let prompt_tokens = cur_prompt.saturating_sub(init_prompt);
        let completion_tokens = cur_completion.saturating_sub(init_completion);
        tracing::info!(
            batch_id = %batch_id,
            completed = records.len(),
            skipped,
            prompt_tokens,
            completion_tokens,
            total_tokens = prompt_tokens + completion_tokens,
            cumulative_total = cur_total,
            "Batch finished"
        );
        Ok(records)
    }
}

/// 有输出路径时写 JSONL，否则把结果打到日志
pub fn write_batch(records: &[TaskRecord], output: Option<&Path>) -> Result<(), AgentError> {
    match output {
        Some(path) => {
            write_jsonl(path, records)?;
            tracing::info!(path = %path.display(), count = records.len(), "Saved records");
        }
        None => {
            for record in records {
                tracing::info!(
                    task = %record.task,
                    command = %record.command,
                    retry_times = record.retry_times,
                    "Result"
                );
            }
        }
    }
    Ok(())
}
