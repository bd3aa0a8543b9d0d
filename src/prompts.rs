//! Prompt 模板：内置默认值，可由 prompt 目录下的同名 .md 文件覆盖
//!
//! 占位符为固定字面量（`{{...}}`），由各角色用 `str::replace` 填充。

use std::path::Path;

pub const USER_REQUEST: &str = "{{USER_NATURAL_LANGUAGE_REQUEST}}";
pub const TASK_DESCRIPTION: &str = "{{TASK_DESCRIPTION}}";
pub const USER_COMMAND: &str = "{{USER_COMMAND}}";
pub const BASH_COMMAND: &str = "{{BASH_COMMAND}}";

pub const CLARIFIER_PROMPT: &str = r#"You restate natural language requests for bash terminal operations as explicit, concise instructions.
Identify the core terminal operation, keep every concrete detail (file names, directories, parameters, conditions) and add no assumptions.
Answer in 1-2 sentences that start with a verb.

<UserRequest>
{{USER_NATURAL_LANGUAGE_REQUEST}}
</UserRequest>
"#;

pub const COMPOSER_PROMPT: &str = "You are an expert Linux Bash assistant. Translate the user's natural language request into a valid Bash command. \
If a previous incorrect command and a suggestion are given, fix the command accordingly. \
Output only the command code without markdown or explanation.";

pub const INSPECTOR_PROMPT: &str = r#"You judge whether a bash command correctly achieves a task described in natural language.
<Task_Description>
{{TASK_DESCRIPTION}}
</Task_Description>
<User_Command>
{{USER_COMMAND}}
</User_Command>
If the command is correct, output only "CORRECT".
If it is incorrect, output "INCORRECT: <very concise guide to fix it>" without giving the corrected command.
"#;

pub const JUDGE_PROMPT: &str = r#"You score a bash command against a natural language task.
<TaskDescription>
{{TASK_DESCRIPTION}}
</TaskDescription>
<BashCommand>
{{BASH_COMMAND}}
</BashCommand>
Rules, in priority order:
1. Syntax error: score at most 3.
2. Valid syntax but does not achieve the task: score at most 5.
3. Valid and achieves the task: score 6 to 10 by readability, efficiency and conciseness.
Return only a number between 0 and 10.
"#;

/// 一组角色模板
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub clarifier: String,
    pub composer: String,
    pub inspector: String,
    pub judge: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            clarifier: CLARIFIER_PROMPT.to_string(),
            composer: COMPOSER_PROMPT.to_string(),
            inspector: INSPECTOR_PROMPT.to_string(),
            judge: JUDGE_PROMPT.to_string(),
        }
    }
}

impl PromptSet {
    /// 从目录加载：存在 `<name>.md` 的角色使用文件内容，其余用内置模板
    pub fn load(dir: Option<&Path>) -> Self {
        let defaults = Self::default();
        let Some(dir) = dir else {
            return defaults;
        };
        Self {
            clarifier: load_or(dir, "clarifier", defaults.clarifier),
            composer: load_or(dir, "composer", defaults.composer),
            inspector: load_or(dir, "inspector", defaults.inspector),
            judge: load_or(dir, "judge", defaults.judge),
        }
    }
}

fn load_or(dir: &Path, name: &str, fallback: String) -> String {
    let path = dir.join(format!("{name}.md"));
    match std::fs::read_to_string(&path) {
        Ok(text) if !text.trim().is_empty() => {
            tracing::info!(path = %path.display(), "Loaded {} prompt", name);
            text
        }
        _ => fallback,
    }
}
