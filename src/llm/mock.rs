//! Mock LLM 客户端（用于测试与离线演练，无需 API）
//!
//! 支持回显、固定回复、按顺序脚本回复、固定失败，以及任意闭包；所有调用都会被记录，便于断言 Prompt。

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm::{LlmClient, LlmError, Message, MessageRole};

type Responder = Box<dyn Fn(usize, &[Message]) -> Result<String, LlmError> + Send + Sync>;

/// Mock 客户端：回复由构造时给定的策略决定
pub struct MockLlmClient {
    responder: Responder,
    call_count: AtomicUsize,
    calls: Mutex<Vec<Vec<Message>>>,
}

impl std::fmt::Debug for MockLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLlmClient")
            .field("call_count", &self.call_count())
            .finish()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::echo()
    }
}

impl MockLlmClient {
    /// 任意闭包：参数为调用序号（从 0 开始）与消息
    pub fn from_fn(
        f: impl Fn(usize, &[Message]) -> Result<String, LlmError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(f),
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// 回显最后一条 User 消息；没有 User 消息时回显最后一条消息
    pub fn echo() -> Self {
        Self::from_fn(|_, messages| {
            let last = messages
                .iter()
                .rev()
                .find(|m| m.role == MessageRole::User)
                .or_else(|| messages.last())
                .map(|m| m.content.clone())
                .unwrap_or_default();
            Ok(last)
        })
    }

    /// 每次都返回同一段文本
    pub fn repeating(response: impl Into<String>) -> Self {
        let response = response.into();
        Self::from_fn(move |_, _| Ok(response.clone()))
    }

    /// 按顺序返回脚本中的回复，用完后返回 ApiError
    pub fn scripted<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        let responses: Vec<String> = responses.into_iter().map(Into::into).collect();
        Self::from_fn(move |idx, _| {
            responses
                .get(idx)
                .cloned()
                .ok_or_else(|| LlmError::ApiError("No more mock responses".to_string()))
        })
    }

    /// 每次都以传输错误失败
    pub fn failing(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::from_fn(move |_, _| Err(LlmError::ApiError(reason.clone())))
    }

    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// 已收到的全部请求（按调用顺序）
    pub fn calls(&self) -> Vec<Vec<Message>> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, messages: &[Message]) -> Result<String, LlmError> {
        let idx = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        tracing::debug!(idx, "MockLlmClient::complete");
        (self.responder)(idx, messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_prefers_last_user_message() {
        let mock = MockLlmClient::echo();
        let out = mock
            .complete(&[
                Message::system("sys"),
                Message::user("first"),
                Message::user("second"),
                Message::assistant("reply"),
            ])
            .await
            .unwrap();
        assert_eq!(out, "second");

        let out = mock.complete(&[Message::system("only system")]).await.unwrap();
        assert_eq!(out, "only system");
    }

    #[tokio::test]
    async fn test_scripted_runs_out() {
        let mock = MockLlmClient::scripted(["a", "b"]);
        assert_eq!(mock.complete(&[]).await.unwrap(), "a");
        assert_eq!(mock.complete(&[]).await.unwrap(), "b");
        assert!(matches!(
            mock.complete(&[]).await,
            Err(LlmError::ApiError(_))
        ));
        assert_eq!(mock.call_count(), 3);
        assert_eq!(mock.calls().len(), 3);
    }
}
