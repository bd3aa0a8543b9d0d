//! 错误类型
//!
//! AgentError 是角色层（以及 Judge / 记录读写）的错误；TaskAborted 是编排器对角色错误的包装，
//! 携带出错时的状态与角色名，一旦产生即终止当前任务。

use thiserror::Error;

use crate::core::TaskState;
use crate::llm::LlmError;

/// 角色执行过程中可能出现的错误
#[derive(Error, Debug)]
pub enum AgentError {
    /// 上下文字段不满足角色前置条件（编排接线错误，正常调度下不应出现）
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// 模型返回空串或仅空白
    #[error("Empty response from {0}")]
    EmptyResponse(String),

    #[error("Inference error: {0}")]
    Inference(#[from] LlmError),

    /// Inspector 回复既不是 CORRECT 也不含 INCORRECT:
    #[error("Malformed judgment: {0}")]
    MalformedJudgment(String),

    /// Judge 回复不是 [0, 10] 内的数字
    #[error("Malformed score: {0}")]
    MalformedScore(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// 单个任务被中止：记录出错的角色与当时的状态
#[derive(Error, Debug)]
#[error("{role} failed in state {state}: {source}")]
pub struct TaskAborted {
    pub task: String,
    pub role: String,
    pub state: TaskState,
    #[source]
    pub source: AgentError,
}
