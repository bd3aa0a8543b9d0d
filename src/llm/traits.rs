//! LLM 客户端抽象
//!
//! 所有后端（OpenAI 兼容 / Mock）实现 LlmClient：给定有序的消息轮次，返回一段文本补全。
//! 空字符串是合法返回值，由各角色自行判定并拒绝。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::llm::Message;

/// Inference 边界错误：传输失败或超时
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),
}

/// LLM 客户端 trait：无状态的请求/响应文本补全
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 非流式完成
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// 获取累计 token 使用统计：(prompt_tokens, completion_tokens, total_tokens)
    /// 默认返回 (0, 0, 0)，具体实现可覆盖
    fn token_usage(&self) -> (u64, u64, u64) {
        (0, 0, 0)
    }
}

/// 在 Inference 边界加一层请求超时，超时返回 LlmError::Timeout
pub struct TimeoutLlmClient {
    inner: Arc<dyn LlmClient>,
    timeout_secs: u64,
}

impl TimeoutLlmClient {
    pub fn new(inner: Arc<dyn LlmClient>, timeout_secs: u64) -> Self {
        Self {
            inner,
            timeout_secs: timeout_secs.max(1),
        }
    }
}

#[async_trait]
impl LlmClient for TimeoutLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        match tokio::time::timeout(
            Duration::from_secs(self.timeout_secs),
            self.inner.complete(messages),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(timeout_secs = self.timeout_secs, "LLM request timed out");
                Err(LlmError::Timeout(self.timeout_secs))
            }
        }
    }

    fn token_usage(&self) -> (u64, u64, u64) {
        self.inner.token_usage()
    }
}
