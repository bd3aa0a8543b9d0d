//! NL2SH - 自然语言转 Shell 命令
//!
//! 模块划分：
//! - **config**: 应用配置加载（TOML + 环境变量）
//! - **core**: 状态机编排、上下文、错误、批量驱动、运行报告
//! - **evaluator**: 并发评分器（Judge）
//! - **llm**: LLM 客户端抽象与实现（OpenAI 兼容 / Mock / 超时包装）
//! - **observability**: 日志初始化
//! - **prompts**: 角色模板
//! - **records**: JSONL 任务与结果读写
//! - **roles**: Clarifier、Composer、Inspector

pub mod config;
pub mod core;
pub mod evaluator;
pub mod llm;
pub mod observability;
pub mod prompts;
pub mod records;
pub mod roles;

pub use crate::core::{Orchestrator, OrchestratorBuilder, RunOutcome, RunStatus, TaskAborted};
pub use evaluator::{Judge, JudgeSummary};
