//! 编排器构建器：按配置为每个角色创建 LLM 客户端与模板
//!
//! 每个角色可以使用不同模型（避免 Composer 与 Inspector 自我认同，也用于消融实验）；
//! 所有客户端都包一层请求超时。

use std::sync::Arc;

use crate::config::AppConfig;
use crate::core::Orchestrator;
use crate::evaluator::Judge;
use crate::llm::{LlmClient, MockLlmClient, OpenAiClient, TimeoutLlmClient};
use crate::prompts::PromptSet;
use crate::roles::{Clarifier, Composer, Inspector};

/// 角色槽位，决定 mock 后端的回复方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleSlot {
    Clarifier,
    Composer,
    Inspector,
    Judge,
}

/// 根据配置创建某个角色使用的 LLM 客户端（OpenAI 兼容 / Mock）
pub fn create_llm(cfg: &AppConfig, slot: RoleSlot, model: &str) -> Arc<dyn LlmClient> {
    let provider = cfg.llm.provider.to_lowercase();
    let client: Arc<dyn LlmClient> = match provider.as_str() {
        "mock" => {
            tracing::info!(?slot, "Using Mock LLM");
            Arc::new(match slot {
                RoleSlot::Clarifier | RoleSlot::Composer => MockLlmClient::echo(),
                RoleSlot::Inspector => MockLlmClient::repeating("CORRECT"),
                RoleSlot::Judge => MockLlmClient::repeating("5"),
            })
        }
        other => {
            if other != "openai" {
                tracing::warn!(provider = other, "Unknown provider, falling back to openai");
            }
            tracing::info!(?slot, model, "Using OpenAI-compatible LLM");
            Arc::new(OpenAiClient::new(cfg.llm.base_url.as_deref(), model, None))
        }
    };
    Arc::new(TimeoutLlmClient::new(client, cfg.llm.timeouts.request))
}

/// 编排器构建器
pub struct OrchestratorBuilder {
    config: AppConfig,
    prompts: PromptSet,
}

impl OrchestratorBuilder {
    pub fn new(config: AppConfig) -> Self {
        let prompts = PromptSet::load(config.prompts.dir.as_deref());
        Self { config, prompts }
    }

    pub fn with_prompts(mut self, prompts: PromptSet) -> Self {
        self.prompts = prompts;
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build(&self) -> Orchestrator {
        let cfg = &self.config;
        tracing::info!(
            clarifier = cfg.clarifier_model(),
            composer = cfg.composer_model(),
            inspector = cfg.inspector_model(),
            "Current model settings"
        );

        let clarifier = Clarifier::new(create_llm(cfg, RoleSlot::Clarifier, cfg.clarifier_model()))
            .with_template(self.prompts.clarifier.clone());
        let composer = Composer::new(create_llm(cfg, RoleSlot::Composer, cfg.composer_model()))
            .with_template(self.prompts.composer.clone());
        let inspector = Inspector::new(create_llm(cfg, RoleSlot::Inspector, cfg.inspector_model()))
            .with_template(self.prompts.inspector.clone());

        Orchestrator::new(clarifier, composer, inspector)
    }

    pub fn build_judge(&self) -> Judge {
        let cfg = &self.config;
        tracing::info!(judge = %cfg.judge.model, workers = cfg.judge.workers, "Judge settings");
        Judge::new(create_llm(cfg, RoleSlot::Judge, &cfg.judge.model))
            .with_template(self.prompts.judge.clone())
    }
}
