//! 角色层：Clarifier、Composer、Inspector
//!
//! 每个角色读取 TaskContext 的特定字段，用模板拼 Prompt 调用一次 LLM，再把结果与新状态写回上下文。

pub mod clarifier;
pub mod composer;
pub mod inspector;

use async_trait::async_trait;

use crate::core::{AgentError, TaskContext};

pub use clarifier::Clarifier;
pub use composer::Composer;
pub use inspector::{parse_judgment, Inspector, Judgment};

/// 角色契约：消费并返回上下文
#[async_trait]
pub trait Role: Send + Sync {
    fn name(&self) -> &str;

    async fn apply(&self, ctx: TaskContext) -> Result<TaskContext, AgentError>;

    /// 该角色 LLM 的累计 token 使用：(prompt_tokens, completion_tokens, total_tokens)
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}

/// 空串或仅空白的回复视为无效
pub(crate) fn ensure_non_empty(role: &str, response: String) -> Result<String, AgentError> {
    if response.trim().is_empty() {
        tracing::warn!(role, "LLM returned an empty response");
        return Err(AgentError::EmptyResponse(role.to_string()));
    }
    Ok(response)
}
