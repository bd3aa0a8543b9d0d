//! 编排器：三角色状态机主控循环
//!
//! 状态转移：
//! - init → clarifier → clarified
//! - clarified → composer → composed
//! - composed → inspector → done / not_passed
//! - not_passed → composer → composed（受 max_recompose 限制）
//!
//! 角色错误不重试，包装为 TaskAborted 后立即上抛。

use std::sync::Arc;

use crate::core::{RunOutcome, TaskAborted, TaskContext, TaskState};
use crate::llm::LlmClient;
use crate::roles::{Clarifier, Composer, Inspector, Role};

/// 持有三个角色实例；每个非终态恰好绑定一个角色
pub struct Orchestrator {
    clarifier: Box<dyn Role>,
    composer: Box<dyn Role>,
    inspector: Box<dyn Role>,
}

impl Orchestrator {
    pub fn new(
        clarifier: impl Role + 'static,
        composer: impl Role + 'static,
        inspector: impl Role + 'static,
    ) -> Self {
        Self {
            clarifier: Box::new(clarifier),
            composer: Box::new(composer),
            inspector: Box::new(inspector),
        }
    }

    /// 三个角色各用一个 LLM 客户端，使用内置模板
    pub fn from_clients(
        clarifier: Arc<dyn LlmClient>,
        composer: Arc<dyn LlmClient>,
        inspector: Arc<dyn LlmClient>,
    ) -> Self {
        Self::new(
            Clarifier::new(clarifier),
            Composer::new(composer),
            Inspector::new(inspector),
        )
    }

    /// 三个角色的累计 token 使用之和
    pub fn token_usage(&self) -> (u64, u64, u64) {
        [&self.clarifier, &self.composer, &self.inspector]
            .iter()
            .map(|role| role.token_usage())
            .fold((0, 0, 0), |acc, (a, b, c)| (acc.0 + a, acc.1 + b, acc.2 + c))
    }

    /// 调度表：Done 没有绑定角色
    pub fn role_for(&self, state: TaskState) -> Option<&dyn Role> {
        match state {
            TaskState::Init => Some(self.clarifier.as_ref()),
            TaskState::Clarified | TaskState::NotPassed => Some(self.composer.as_ref()),
            TaskState::Composed => Some(self.inspector.as_ref()),
            TaskState::Done => None,
        }
    }

    /// 处理单个任务，直到 Done 或重组次数耗尽
    ///
    /// `max_recompose` 为 None 时不设上限，也不计数（结果中重组次数为 0）。
    /// 设置上限时，计数只在即将执行 not_passed → composer 时增加，首次 compose 不计入。
    pub async fn run_single(
        &self,
        task: &str,
        max_recompose: Option<u32>,
    ) -> Result<RunOutcome, TaskAborted> {
        tracing::info!(task = %task, "Starting task");

        let mut context = TaskContext::new(task);
        let mut recompose_count = 0u32;

        while let Some(role) = self.role_for(context.state) {
            let state = context.state;

            if state == TaskState::NotPassed {
                if let Some(max) = max_recompose {
                    if recompose_count >= max {
                        tracing::warn!(max, "Maximum recomposition attempts reached");
                        break;
                    }
                    recompose_count += 1;
                }
            }

            tracing::info!(state = %state, next = role.name(), recompose_count, "Dispatching");

            context = role.apply(context).await.map_err(|source| {
                tracing::error!(state = %state, role = role.name(), error = %source, "Task aborted");
                TaskAborted {
                    task: task.to_string(),
                    role: role.name().to_string(),
                    state,
                    source,
                }
            })?;
        }

        let outcome = RunOutcome {
            context,
            recompose_count,
            max_recompose,
        };
        tracing::info!(
            state = %outcome.context.state,
            status = %outcome.status(),
            recompose_count,
            "Task finished"
        );
        Ok(outcome)
    }
}
