//! JSONL 记录读写
//!
//! - 任务输入：每行一个含 `messages` 的对象，取第一条 `user` 消息作为任务
//! - 生成结果：`{task, command, retry_times}`
//! - 评分结果：`{task, command, score}`（score 为 -1 表示评分失败）

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::core::AgentError;
use crate::llm::{Message, MessageRole};

/// 批量生成的单条结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub task: String,
    pub command: String,
    pub retry_times: u32,
}

/// 评分结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgedRecord {
    pub task: String,
    pub command: String,
    pub score: f64,
}

/// 数据集中的一行
#[derive(Debug, Deserialize)]
struct DatasetLine {
    #[serde(default)]
    messages: Vec<Message>,
}

/// 待评分的一行：字段缺失时按空串处理
#[derive(Debug, Deserialize)]
struct PairLine {
    #[serde(default)]
    task: String,
    #[serde(default)]
    command: String,
}

/// 逐行解析非空行；解析失败的行记录警告后跳过
fn read_lines_lenient<T: DeserializeOwned>(path: &Path) -> Result<Vec<(usize, T)>, AgentError> {
    let file = std::fs::File::open(path)?;
    let mut out = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line_no = idx + 1;
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<T>(line) {
            Ok(value) => out.push((line_no, value)),
            Err(e) => tracing::warn!(line_no, error = %e, "JSON decode error, skipping line"),
        }
    }
    Ok(out)
}

/// 加载任务：每行取第一条 user 消息；无 user 消息的行跳过
pub fn load_tasks(path: impl AsRef<Path>) -> Result<Vec<String>, AgentError> {
    let path = path.as_ref();
    let tasks: Vec<String> = read_lines_lenient::<DatasetLine>(path)?
        .into_iter()
        .filter_map(|(line_no, line)| {
            let task = line
                .messages
                .into_iter()
                .find(|m| m.role == MessageRole::User)
                .map(|m| m.content);
            if task.is_none() {
                tracing::warn!(line_no, "no user message found, skipping line");
            }
            task
        })
        .collect();
    tracing::info!(path = %path.display(), count = tasks.len(), "Loaded tasks");
    Ok(tasks)
}

/// 加载待评分的 (task, command)；任一为空的行跳过
pub fn load_pairs(path: impl AsRef<Path>) -> Result<Vec<(String, String)>, AgentError> {
    Ok(read_lines_lenient::<PairLine>(path.as_ref())?
        .into_iter()
        .filter(|(_, p)| !p.task.is_empty() && !p.command.is_empty())
        .map(|(_, p)| (p.task, p.command))
        .collect())
}

/// 写 JSONL（覆盖已有文件），每行一个对象，保留非 ASCII 字符
pub fn write_jsonl<T: Serialize>(path: impl AsRef<Path>, records: &[T]) -> Result<(), AgentError> {
    let file = std::fs::File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    for record in records {
        serde_json::to_writer(&mut writer, record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// 严格读取 JSONL：任意一行解析失败即返回错误
pub fn read_jsonl<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Vec<T>, AgentError> {
    let file = std::fs::File::open(path.as_ref())?;
    let mut out = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        out.push(serde_json::from_str(&line)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_record_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jsonl");
        let records = vec![
            TaskRecord {
                task: "列出当前目录的文件".to_string(),
                command: "ls -la\n".to_string(),
                retry_times: 2,
            },
            TaskRecord {
                task: "count lines".to_string(),
                command: "wc -l \"a b.txt\"".to_string(),
                retry_times: 0,
            },
        ];
        write_jsonl(&path, &records).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.contains("列出当前目录的文件"));

        let back: Vec<TaskRecord> = read_jsonl(&path).unwrap();
        assert_eq!(back, records);
    }

    #[test]
    fn test_load_tasks_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tasks.jsonl");
        let content = [
            r#"{"messages":[{"role":"system","content":"sys"},{"role":"user","content":"list files"},{"role":"assistant","content":"ls"}]}"#,
            "",
            "not json",
            r#"{"messages":[{"role":"system","content":"only system"}]}"#,
            r#"{"other":1}"#,
            r#"{"messages":[{"role":"user","content":"first"},{"role":"user","content":"second"}]}"#,
        ]
        .join("\n");
        std::fs::write(&path, content).unwrap();

        let tasks = load_tasks(&path).unwrap();
        assert_eq!(tasks, vec!["list files".to_string(), "first".to_string()]);
    }

    #[test]
    fn test_load_pairs_requires_task_and_command() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen.jsonl");
        let content = [
            r#"{"task":"list files","command":"ls","retry_times":0}"#,
            r#"{"task":"empty command","command":""}"#,
            r#"{"command":"pwd"}"#,
            r#"{"task":"disk usage","command":"du -sh ."}"#,
        ]
        .join("\n");
        std::fs::write(&path, content).unwrap();

        let pairs = load_pairs(&path).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("list files".to_string(), "ls".to_string()),
                ("disk usage".to_string(), "du -sh .".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_tasks("/definitely/not/here.jsonl").unwrap_err();
        assert!(matches!(err, AgentError::Io(_)));
    }
}
