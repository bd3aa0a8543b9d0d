//! 核心编排层：上下文与状态、错误、编排器、批量驱动、构建器与运行报告

pub mod batch;
pub mod builder;
pub mod error;
pub mod orchestrator;
pub mod report;
pub mod state;

pub use batch::{write_batch, BatchErrorPolicy};
pub use builder::{create_llm, OrchestratorBuilder, RoleSlot};
pub use error::{AgentError, TaskAborted};
pub use orchestrator::Orchestrator;
pub use report::{RunOutcome, RunReport, RunStatus, NO_COMMAND};
pub use state::{Inspection, TaskContext, TaskState};
