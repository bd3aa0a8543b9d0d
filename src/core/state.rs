//! 状态定义：TaskState 状态机与单任务共享上下文 TaskContext
//!
//! TaskContext 在每个任务开始时新建，只在该任务的处理过程中存在；两段历史只追加、不删除、不重排。

use std::fmt;

use serde::{Deserialize, Serialize};

/// 状态机状态；Done 为唯一终态
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    Init,
    Clarified,
    Composed,
    NotPassed,
    Done,
}

impl TaskState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskState::Init => "init",
            TaskState::Clarified => "clarified",
            TaskState::Composed => "composed",
            TaskState::NotPassed => "not_passed",
            TaskState::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Done)
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inspector 历史中的一条：通过（哨兵）或修正建议
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Inspection {
    Accepted,
    Guidance(String),
}

impl Inspection {
    /// 给 Composer 使用的修正建议文本；通过时为空串
    pub fn guidance(&self) -> &str {
        match self {
            Inspection::Accepted => "",
            Inspection::Guidance(text) => text,
        }
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self, Inspection::Accepted)
    }
}

/// 单任务上下文：在各角色之间传递
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskContext {
    user_input: String,
    clarified: Option<String>,
    composer_history: Vec<String>,
    inspector_history: Vec<Inspection>,
    pub state: TaskState,
}

impl TaskContext {
    pub fn new(user_input: impl Into<String>) -> Self {
        Self {
            user_input: user_input.into(),
            clarified: None,
            composer_history: Vec::new(),
            inspector_history: Vec::new(),
            state: TaskState::Init,
        }
    }

    pub fn user_input(&self) -> &str {
        &self.user_input
    }

    pub fn clarified(&self) -> Option<&str> {
        self.clarified.as_deref()
    }

    /// 只在第一次写入时生效，返回是否写入
    pub fn set_clarified(&mut self, text: impl Into<String>) -> bool {
        if self.clarified.is_some() {
            tracing::warn!("clarified text already set, keeping the first one");
            return false;
        }
        self.clarified = Some(text.into());
        true
    }

    /// 任务描述：优先澄清后的文本，否则用原始输入；两者都为空时返回 None
    pub fn task_description(&self) -> Option<&str> {
        self.clarified
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| Some(self.user_input.as_str()).filter(|s| !s.trim().is_empty()))
    }

    pub fn composer_history(&self) -> &[String] {
        &self.composer_history
    }

    pub fn inspector_history(&self) -> &[Inspection] {
        &self.inspector_history
    }

    /// 当前候选命令（最后一次 compose 的结果）
    pub fn current_command(&self) -> Option<&str> {
        self.composer_history.last().map(String::as_str)
    }

    pub fn last_inspection(&self) -> Option<&Inspection> {
        self.inspector_history.last()
    }

    pub fn push_command(&mut self, command: impl Into<String>) {
        self.composer_history.push(command.into());
    }

    pub fn push_inspection(&mut self, inspection: Inspection) {
        self.inspector_history.push(inspection);
    }
}
