//! Clarifier：把用户请求改写为无歧义的任务描述

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AgentError, TaskContext, TaskState};
use crate::llm::{LlmClient, Message};
use crate::prompts::{CLARIFIER_PROMPT, USER_REQUEST};
use crate::roles::{ensure_non_empty, Role};

pub struct Clarifier {
    llm: Arc<dyn LlmClient>,
    template: String,
}

impl Clarifier {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            template: CLARIFIER_PROMPT.to_string(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}

#[async_trait]
impl Role for Clarifier {
    fn name(&self) -> &str {
        "clarifier"
    }

    fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    async fn apply(&self, mut ctx: TaskContext) -> Result<TaskContext, AgentError> {
        if ctx.user_input().trim().is_empty() {
            return Err(AgentError::MissingInput("user_input".to_string()));
        }

        let prompt = self.template.replace(USER_REQUEST, ctx.user_input());
        let response = self.llm.complete(&[Message::user(prompt)]).await?;
        let response = ensure_non_empty(self.name(), response)?;

        ctx.set_clarified(response.trim());
        ctx.state = TaskState::Clarified;
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MessageRole, MockLlmClient};

    #[tokio::test]
    async fn test_clarifier_trims_and_advances() {
        let llm = Arc::new(MockLlmClient::repeating("  List all files in the current directory.\n"));
        let clarifier = Clarifier::new(llm.clone()).with_template("REQ: {{USER_NATURAL_LANGUAGE_REQUEST}}");

        let ctx = clarifier.apply(TaskContext::new("list files")).await.unwrap();
        assert_eq!(ctx.clarified(), Some("List all files in the current directory."));
        assert_eq!(ctx.state, TaskState::Clarified);

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].role, MessageRole::User);
        assert_eq!(calls[0][0].content, "REQ: list files");
    }

    #[tokio::test]
    async fn test_clarifier_rejects_blank_input() {
        let llm = Arc::new(MockLlmClient::repeating("anything"));
        let err = Clarifier::new(llm.clone())
            .apply(TaskContext::new("   "))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::MissingInput(_)));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_clarifier_rejects_whitespace_response() {
        let llm = Arc::new(MockLlmClient::repeating(" \n\t"));
        let err = Clarifier::new(llm)
            .apply(TaskContext::new("list files"))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::EmptyResponse(role) if role == "clarifier"));
    }
}
