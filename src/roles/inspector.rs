//! Inspector：判定当前候选命令是否完成任务
//!
//! 回复语法（严格、按顺序匹配）：
//! - trim 后恰为 `CORRECT` → 通过
//! - 含 `INCORRECT:` → 不通过，建议为第一个标记之后的内容（trim）
//! - 其他 → 无法判定，作为 MalformedJudgment 上抛，不猜测结果

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AgentError, Inspection, TaskContext, TaskState};
use crate::llm::{LlmClient, Message};
use crate::prompts::{INSPECTOR_PROMPT, TASK_DESCRIPTION, USER_COMMAND};
use crate::roles::{ensure_non_empty, Role};

pub const ACCEPT_TOKEN: &str = "CORRECT";
pub const REJECT_MARKER: &str = "INCORRECT:";

/// 解析结果：三种互斥情况
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Judgment {
    Accepted,
    Rejected(String),
    Malformed,
}

pub fn parse_judgment(output: &str) -> Judgment {
    let text = output.trim();
    if text == ACCEPT_TOKEN {
        return Judgment::Accepted;
    }
    match text.split_once(REJECT_MARKER) {
        Some((_, guide)) => Judgment::Rejected(guide.trim().to_string()),
        None => Judgment::Malformed,
    }
}

pub struct Inspector {
    llm: Arc<dyn LlmClient>,
    template: String,
}

impl Inspector {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            template: INSPECTOR_PROMPT.to_string(),
        }
    }

    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }
}

#[async_trait]
impl Role for Inspector {
    fn name(&self) -> &str {
        "inspector"
    }

    fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    async fn apply(&self, mut ctx: TaskContext) -> Result<TaskContext, AgentError> {
        let command = ctx
            .current_command()
            .ok_or_else(|| AgentError::MissingInput("composer_history".to_string()))?;
        let task = ctx
            .task_description()
            .ok_or_else(|| AgentError::MissingInput("clarified or user_input".to_string()))?;

        let prompt = self
            .template
            .replace(TASK_DESCRIPTION, task)
            .replace(USER_COMMAND, command);
        let response = self.llm.complete(&[Message::system(prompt)]).await?;
        let response = ensure_non_empty(self.name(), response)?;

        match parse_judgment(&response) {
            Judgment::Accepted => {
                tracing::debug!("inspection passed");
                ctx.push_inspection(Inspection::Accepted);
                ctx.state = TaskState::Done;
            }
            Judgment::Rejected(guide) => {
                tracing::debug!(guide = %guide, "inspection rejected");
                ctx.push_inspection(Inspection::Guidance(guide));
                ctx.state = TaskState::NotPassed;
            }
            Judgment::Malformed => {
                return Err(AgentError::MalformedJudgment(response.trim().to_string()));
            }
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{MessageRole, MockLlmClient};

    fn composed(command: &str) -> TaskContext {
        let mut ctx = TaskContext::new("list files");
        ctx.set_clarified("List all files.");
        ctx.push_command(command);
        ctx.state = TaskState::Composed;
        ctx
    }

    #[test]
    fn test_parse_accept_ignores_surrounding_whitespace() {
        assert_eq!(parse_judgment("CORRECT"), Judgment::Accepted);
        assert_eq!(parse_judgment("  CORRECT  "), Judgment::Accepted);
        assert_eq!(parse_judgment("\nCORRECT\n"), Judgment::Accepted);
    }

    #[test]
    fn test_parse_reject_splits_on_first_marker() {
        assert_eq!(
            parse_judgment("INCORRECT: say INCORRECT: twice"),
            Judgment::Rejected("say INCORRECT: twice".to_string())
        );
        assert_eq!(
            parse_judgment("The command is wrong. INCORRECT:   use -a  "),
            Judgment::Rejected("use -a".to_string())
        );
        assert_eq!(parse_judgment("INCORRECT:"), Judgment::Rejected(String::new()));
    }

    #[test]
    fn test_parse_malformed() {
        assert_eq!(parse_judgment("correct"), Judgment::Malformed);
        assert_eq!(parse_judgment("CORRECT, looks good"), Judgment::Malformed);
        assert_eq!(parse_judgment("incorrect: lowercase"), Judgment::Malformed);
        assert_eq!(parse_judgment("INCORRECT no colon"), Judgment::Malformed);
    }

    #[tokio::test]
    async fn test_inspector_accepts() {
        let llm = Arc::new(MockLlmClient::repeating(" CORRECT\n"));
        let inspector = Inspector::new(llm.clone())
            .with_template("T={{TASK_DESCRIPTION}} C={{USER_COMMAND}}");
        let ctx = inspector.apply(composed("ls")).await.unwrap();

        assert_eq!(ctx.state, TaskState::Done);
        assert_eq!(ctx.inspector_history(), [Inspection::Accepted]);

        let calls = llm.calls();
        assert_eq!(calls[0].len(), 1);
        assert_eq!(calls[0][0].role, MessageRole::System);
        assert_eq!(calls[0][0].content, "T=List all files. C=ls");
    }

    #[tokio::test]
    async fn test_inspector_rejects_with_guidance() {
        let llm = Arc::new(MockLlmClient::repeating("INCORRECT: wrong flag"));
        let ctx = Inspector::new(llm).apply(composed("ls -z")).await.unwrap();
        assert_eq!(ctx.state, TaskState::NotPassed);
        assert_eq!(
            ctx.last_inspection(),
            Some(&Inspection::Guidance("wrong flag".to_string()))
        );
    }

    #[tokio::test]
    async fn test_inspector_malformed_is_an_error() {
        let llm = Arc::new(MockLlmClient::repeating("looks fine to me"));
        let err = Inspector::new(llm).apply(composed("ls")).await.unwrap_err();
        assert!(matches!(err, AgentError::MalformedJudgment(raw) if raw == "looks fine to me"));
    }

    #[tokio::test]
    async fn test_inspector_requires_a_candidate() {
        let llm = Arc::new(MockLlmClient::repeating("CORRECT"));
        let mut ctx = TaskContext::new("list files");
        ctx.state = TaskState::Composed;
        let err = Inspector::new(llm.clone()).apply(ctx).await.unwrap_err();
        assert!(matches!(err, AgentError::MissingInput(field) if field == "composer_history"));
        assert_eq!(llm.call_count(), 0);
    }

    #[tokio::test]
    async fn test_inspector_empty_response() {
        let llm = Arc::new(MockLlmClient::repeating("   "));
        let err = Inspector::new(llm).apply(composed("ls")).await.unwrap_err();
        assert!(matches!(err, AgentError::EmptyResponse(_)));
    }
}
