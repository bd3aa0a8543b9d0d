//! Composer：根据任务描述与上一轮的修正建议生成（或修改）候选命令
//!
//! system 为固定模板；user 轮拼入任务、上一条候选命令和上一条修正建议（缺失时为空串）。

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{AgentError, TaskContext, TaskState};
use crate::llm::{LlmClient, Message};
use crate::prompts::COMPOSER_PROMPT;
use crate::roles::{ensure_non_empty, Role};

pub struct Composer {
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl Composer {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            system_prompt: COMPOSER_PROMPT.to_string(),
        }
    }

    pub fn with_template(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    fn user_turn(task: &str, ctx: &TaskContext) -> String {
        let last_command = ctx.current_command().unwrap_or_default();
        let last_suggestion = ctx
            .last_inspection()
            .map(|i| i.guidance())
            .unwrap_or_default();
        format!(
            "task: {task}, \nlast incorrect command: {last_command}, \nsuggestion for the last command: {last_suggestion}\n"
        )
    }
}

#[async_trait]
impl Role for Composer {
    fn name(&self) -> &str {
        "composer"
    }

    fn token_usage(&self) -> (u64, u64, u64) {
        self.llm.token_usage()
    }

    async fn apply(&self, mut ctx: TaskContext) -> Result<TaskContext, AgentError> {
        let task = ctx
            .task_description()
            .ok_or_else(|| AgentError::MissingInput("clarified or user_input".to_string()))?;

        let messages = [
            Message::system(self.system_prompt.clone()),
            Message::user(Self::user_turn(task, &ctx)),
        ];
        let response = self.llm.complete(&messages).await?;
        let response = ensure_non_empty(self.name(), response)?;

        // 原样保存，不做 trim
        ctx.push_command(response);
        ctx.state = TaskState::Composed;
        Ok(ctx)
    }
}
