//! NL2SH 评分程序：对生成结果并发打分并输出汇总

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use nl2sh::config::{load_config, AppConfig};
use nl2sh::core::OrchestratorBuilder;

#[derive(Parser, Debug)]
#[command(name = "nl2sh-judge", version, about = "Score generated shell commands with an LLM judge")]
struct Cli {
    /// nl2sh batch 的输出（{task, command, retry_times} JSONL）
    #[arg(long)]
    input: PathBuf,
    #[arg(long)]
    output: PathBuf,
    /// 并发数，默认取配置 judge.workers
    #[arg(long)]
    workers: Option<usize>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    nl2sh::observability::init();

    let cli = Cli::parse();
    let mut cfg = load_config(cli.config.clone()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        AppConfig::default()
    });
    if let Some(model) = cli.model {
        cfg.judge.model = model;
    }
    let workers = cli.workers.unwrap_or(cfg.judge.workers);

    let judge = OrchestratorBuilder::new(cfg).build_judge();
    let (_, summary) = judge
        .judge_file(&cli.input, &cli.output, workers)
        .await
        .with_context(|| format!("Failed to judge {}", cli.input.display()))?;

    println!(
        "total score: {}, avg_score = {:.3} ({} scored, {} failed)",
        summary.sum, summary.average, summary.scored, summary.failed
    );
    println!("Saved {} judged records to {}", summary.total, cli.output.display());
    Ok(())
}
