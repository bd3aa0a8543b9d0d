//! NL2SH - 自然语言转 Shell 命令
//!
//! 入口：初始化日志、加载配置、构建编排器，执行单个任务（run）或批量任务（batch）。

use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use nl2sh::config::{load_config, AppConfig};
use nl2sh::core::{write_batch, BatchErrorPolicy, OrchestratorBuilder};
use nl2sh::records::load_tasks;

#[derive(Parser, Debug)]
#[command(name = "nl2sh", version, about = "Translate natural language into shell commands")]
struct Cli {
    /// 额外的配置文件（覆盖 config/default.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 处理单个任务并打印报告
    Run {
        task: String,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
    /// 逐个处理 JSONL 数据集中的任务
    Batch {
        #[arg(long)]
        input: PathBuf,
        /// 不指定时结果只写日志
        #[arg(long)]
        output: Option<PathBuf>,
        /// 任务中止时跳过而不是停止
        #[arg(long)]
        skip_failed: bool,
        #[command(flatten)]
        pipeline: PipelineArgs,
    },
}

#[derive(Args, Debug)]
struct PipelineArgs {
    #[arg(long, conflicts_with = "unbounded")]
    max_recompose: Option<u32>,
    /// 不限制重组次数
    #[arg(long)]
    unbounded: bool,
    #[arg(long)]
    composer_model: Option<String>,
    #[arg(long)]
    inspector_model: Option<String>,
}

impl PipelineArgs {
    fn apply(&self, cfg: &mut AppConfig) {
        if self.unbounded {
            cfg.pipeline.max_recompose = None;
        } else if let Some(n) = self.max_recompose {
            cfg.pipeline.max_recompose = Some(n);
        }
        if let Some(m) = &self.composer_model {
            cfg.roles.composer_model = Some(m.clone());
        }
        if let Some(m) = &self.inspector_model {
            cfg.roles.inspector_model = Some(m.clone());
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nl2sh::observability::init();

    let cli = Cli::parse();
    let mut cfg = load_config(cli.config.clone()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });

    match cli.command {
        Command::Run { task, pipeline } => {
            pipeline.apply(&mut cfg);
            let max_recompose = cfg.pipeline.max_recompose;
            let orchestrator = OrchestratorBuilder::new(cfg).build();

            let outcome = orchestrator
                .run_single(&task, max_recompose)
                .await
                .context("something wrong with the inference")?;
            println!("{}", outcome.report());
        }
        Command::Batch {
            input,
            output,
            skip_failed,
            pipeline,
        } => {
            pipeline.apply(&mut cfg);
            if skip_failed {
                cfg.pipeline.on_task_error = BatchErrorPolicy::Skip;
            }
            let max_recompose = cfg.pipeline.max_recompose;
            let policy = cfg.pipeline.on_task_error;

            let tasks = load_tasks(&input)
                .with_context(|| format!("Failed to load tasks from {}", input.display()))?;
            let orchestrator = OrchestratorBuilder::new(cfg).build();

            let records = orchestrator
                .run_batch(&tasks, max_recompose, policy)
                .await
                .context("Batch aborted")?;
            write_batch(&records, output.as_deref()).context("Failed to write results")?;
            println!("Generated {} / {} commands", records.len(), tasks.len());
        }
    }

    Ok(())
}
