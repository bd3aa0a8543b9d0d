//! 评分器：用 LLM 给生成的命令打分（0-10）
//!
//! 批量评分并发执行：Semaphore 限制并发数，每个单元独立；单个失败降级为哨兵分数 -1，不影响其他单元。

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::core::AgentError;
use crate::llm::{LlmClient, Message};
use crate::prompts::{BASH_COMMAND, JUDGE_PROMPT, TASK_DESCRIPTION};
use crate::records::{load_pairs, write_jsonl, JudgedRecord};

/// 评分失败时的哨兵分数
pub const FAILED_SCORE: f64 = -1.0;

/// 批量评分汇总
#[derive(Debug, Clone, PartialEq)]
pub struct JudgeSummary {
    pub total: usize,
    pub scored: usize,
    pub failed: usize,
    pub sum: f64,
    /// 仅对成功评分的记录取平均；全部失败时为 0
    pub average: f64,
}

impl JudgeSummary {
    pub fn from_records(records: &[JudgedRecord]) -> Self {
        let scores: Vec<f64> = records
            .iter()
            .map(|r| r.score)
            .filter(|s| *s >= 0.0)
            .collect();
        let sum: f64 = scores.iter().sum();
        let scored = scores.len();
        Self {
            total: records.len(),
            scored,
            failed: records.len() - scored,
            sum,
            average: if scored == 0 { 0.0 } else { sum / scored as f64 },
        }
    }
}

/// 解析分数：必须是 [0, 10] 内的数字
pub fn parse_score(output: &str) -> Result<f64, AgentError> {
    let text = output.trim();
    match text.parse::<f64>() {
        Ok(score) if (0.0..=10.0).contains(&score) => Ok(score),
        _ => Err(AgentError::MalformedScore(text.to_string())),
    }
}

#[derive(Clone)]
pub struct Judge {
    llm: Arc<dyn LlmClient>,
    template: String,
}

impl Judge {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            template: JUDGE_PROMPT.to_string(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub async fn score_one(&self, task: &str, command: &str) -> Result<f64, AgentError> {
        let prompt = self
            .template
            .replace(TASK_DESCRIPTION, task)
            .replace(BASH_COMMAND, command);
        let response = self.llm.complete(&[Message::user(prompt)]).await?;
        if response.trim().is_empty() {
            return Err(AgentError::EmptyResponse("judge".to_string()));
        }
        parse_score(&response)
    }

    /// 并发评分，结果按输入顺序返回
    pub async fn judge_batch(
        &self,
        pairs: Vec<(String, String)>,
        workers: usize,
    ) -> Vec<JudgedRecord> {
        let workers = workers.clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Arc::new(Semaphore::new(workers));
        let mut set = JoinSet::new();

        tracing::info!(cases = pairs.len(), workers, "Judging commands");

        for (idx, (task, command)) in pairs.iter().cloned().enumerate() {
            let semaphore = Arc::clone(&semaphore);
            let judge = self.clone();
            set.spawn(async move {
                let score = match semaphore.acquire_owned().await {
                    Ok(_permit) => judge.score_one(&task, &command).await,
                    Err(e) => Err(AgentError::Inference(crate::llm::LlmError::ApiError(
                        e.to_string(),
                    ))),
                };
                (idx, score)
            });
        }

        let mut scores = vec![FAILED_SCORE; pairs.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((idx, Ok(score))) => scores[idx] = score,
                Ok((idx, Err(e))) => {
                    let (task, command) = &pairs[idx];
                    tracing::warn!(task = %task, command = %command, error = %e, "Judging failed");
                }
                Err(e) => tracing::warn!(error = %e, "Judging worker panicked"),
            }
        }

        pairs
            .into_iter()
            .zip(scores)
            .map(|((task, command), score)| JudgedRecord {
                task,
                command,
                score,
            })
            .collect()
    }

    /// 读取生成结果文件，评分后写出 JSONL 并返回汇总
    pub async fn judge_file(
        &self,
        infile: impl AsRef<Path>,
        outfile: impl AsRef<Path>,
        workers: usize,
    ) -> Result<(Vec<JudgedRecord>, JudgeSummary), AgentError> {
        let pairs = load_pairs(infile)?;
        let records = self.judge_batch(pairs, workers).await;
        let summary = JudgeSummary::from_records(&records);

        write_jsonl(outfile.as_ref(), &records)?;
        tracing::info!(
            path = %outfile.as_ref().display(),
            total = summary.total,
            failed = summary.failed,
            sum = summary.sum,
            average = summary.average,
            "Saved judged records"
        );
        Ok((records, summary))
    }
}
