//! 单任务运行结果与报告

use std::fmt;

use crate::core::{TaskContext, TaskState};

/// 没有生成任何命令时报告中显示的占位符
pub const NO_COMMAND: &str = "<no command generated>";

/// 运行结局
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// 到达 Done
    Success,
    /// 重组次数耗尽，停在 NotPassed
    Incomplete,
    /// 其他状态下退出
    Interrupted,
}

impl RunStatus {
    pub fn from_state(state: TaskState) -> Self {
        match state {
            TaskState::Done => RunStatus::Success,
            TaskState::NotPassed => RunStatus::Incomplete,
            _ => RunStatus::Interrupted,
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunStatus::Success => "SUCCESS",
            RunStatus::Incomplete => "INCOMPLETE (inspector did not pass)",
            RunStatus::Interrupted => "INTERRUPTED",
        })
    }
}

/// run_single 的返回值：最终上下文与重组计数
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub context: TaskContext,
    pub recompose_count: u32,
    pub max_recompose: Option<u32>,
}

impl RunOutcome {
    pub fn status(&self) -> RunStatus {
        RunStatus::from_state(self.context.state)
    }

    /// 最终命令；从未生成过命令时为 None
    pub fn command(&self) -> Option<&str> {
        self.context.current_command()
    }

    pub fn report(&self) -> RunReport<'_> {
        RunReport { outcome: self }
    }
}

/// 人类可读的运行报告
pub struct RunReport<'a> {
    outcome: &'a RunOutcome,
}

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let o = self.outcome;
        let rule = "=".repeat(64);
        writeln!(f, "{rule}")?;
        writeln!(f, " NL2SH Evaluation Report")?;
        writeln!(f, "{rule}")?;
        writeln!(f, "User Input        : {}", o.context.user_input())?;
        writeln!(f, "Final State       : {}  [{}]", o.context.state, o.status())?;
        match o.max_recompose {
            Some(max) => writeln!(f, "Recompose Attempts: {} / {}", o.recompose_count, max)?,
            None => writeln!(f, "Recompose Attempts: {}", o.recompose_count)?,
        }
        writeln!(f, "Final Command     : {}", o.command().unwrap_or(NO_COMMAND))?;
        write!(f, "{rule}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_state() {
        assert_eq!(RunStatus::from_state(TaskState::Done), RunStatus::Success);
        assert_eq!(RunStatus::from_state(TaskState::NotPassed), RunStatus::Incomplete);
        assert_eq!(RunStatus::from_state(TaskState::Composed), RunStatus::Interrupted);
        assert_eq!(RunStatus::from_state(TaskState::Init), RunStatus::Interrupted);
    }

    #[test]
    fn test_report_renders_ceiling_and_placeholder() {
        let outcome = RunOutcome {
            context: TaskContext::new("list files"),
            recompose_count: 0,
            max_recompose: Some(2),
        };
        let text = outcome.report().to_string();
        assert!(text.contains("User Input        : list files"));
        assert!(text.contains("Final State       : init  [INTERRUPTED]"));
        assert!(text.contains("Recompose Attempts: 0 / 2"));
        assert!(text.contains("Final Command     : <no command generated>"));

        let mut ctx = TaskContext::new("list files");
        ctx.push_command("ls");
        ctx.state = TaskState::Done;
        let outcome = RunOutcome {
            context: ctx,
            recompose_count: 0,
            max_recompose: None,
        };
        let text = outcome.report().to_string();
        assert!(text.contains("Recompose Attempts: 0\n"));
        assert!(text.contains("[SUCCESS]"));
        assert!(text.contains("Final Command     : ls"));
    }
}
