//! 应用配置：从 config/default.toml 与环境变量加载
//!
//! 加载顺序：先读 TOML 文件，再用环境变量 `NL2SH__*` 覆盖（双下划线表示嵌套，如 `NL2SH__LLM__MODEL=gpt-4o`）。
//! 启动时先加载 `.env`，API Key 可以放在里面。

use std::path::PathBuf;

use serde::Deserialize;

use crate::core::BatchErrorPolicy;

/// 应用配置根（对应 config/default.toml 的顶层）
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub llm: LlmSection,
    pub roles: RolesSection,
    pub pipeline: PipelineSection,
    pub judge: JudgeSection,
    pub prompts: PromptsSection,
}

/// [llm] 段：后端选择、默认模型与超时
#[derive(Debug, Clone, Deserialize)]
pub struct LlmSection {
    /// 后端：openai / mock
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_model")]
    pub model: String,
    pub base_url: Option<String>,
    #[serde(default)]
    pub timeouts: LlmTimeoutsSection,
}

impl Default for LlmSection {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            model: default_model(),
            base_url: None,
            timeouts: LlmTimeoutsSection::default(),
        }
    }
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmTimeoutsSection {
    /// 单次请求超时（秒）
    #[serde(default = "default_request_timeout")]
    pub request: u64,
}

impl Default for LlmTimeoutsSection {
    fn default() -> Self {
        Self {
            request: default_request_timeout(),
        }
    }
}

fn default_request_timeout() -> u64 {
    60
}

/// [roles] 段：各角色的模型覆盖（未设置时用 llm.model）
///
/// 用于消融实验：如 Composer 换成微调模型、Inspector 换成较弱模型。
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RolesSection {
    pub clarifier_model: Option<String>,
    pub composer_model: Option<String>,
    pub inspector_model: Option<String>,
}

/// [pipeline] 段：重组上限与批量出错策略
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSection {
    /// None 表示不设上限
    #[serde(default = "default_max_recompose")]
    pub max_recompose: Option<u32>,
    #[serde(default)]
    pub on_task_error: BatchErrorPolicy,
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            max_recompose: default_max_recompose(),
            on_task_error: BatchErrorPolicy::default(),
        }
    }
}

fn default_max_recompose() -> Option<u32> {
    Some(2)
}

/// [judge] 段：评分模型与并发数
#[derive(Debug, Clone, Deserialize)]
pub struct JudgeSection {
    #[serde(default = "default_judge_model")]
    pub model: String,
    #[serde(default = "default_judge_workers")]
    pub workers: usize,
}

impl Default for JudgeSection {
    fn default() -> Self {
        Self {
            model: default_judge_model(),
            workers: default_judge_workers(),
        }
    }
}

fn default_judge_model() -> String {
    "gpt-5.1".to_string()
}

fn default_judge_workers() -> usize {
    5
}

/// [prompts] 段：模板覆盖目录（clarifier.md / composer.md / inspector.md / judge.md）
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PromptsSection {
    pub dir: Option<PathBuf>,
}

impl AppConfig {
    pub fn clarifier_model(&self) -> &str {
        self.roles.clarifier_model.as_deref().unwrap_or(&self.llm.model)
    }

    pub fn composer_model(&self) -> &str {
        self.roles.composer_model.as_deref().unwrap_or(&self.llm.model)
    }

    pub fn inspector_model(&self) -> &str {
        self.roles.inspector_model.as_deref().unwrap_or(&self.llm.model)
    }
}

/// 从 config 目录加载配置，环境变量 NL2SH__* 可覆盖
///
/// 1. 按顺序查找 config/default.toml、../config/default.toml、default.toml，找到则作为第一源
/// 2. 若传入 config_path 且文件存在，则追加该文件（可覆盖前面的键）
/// 3. 最后叠加环境变量 NL2SH__*（双下划线表示嵌套键）
pub fn load_config(config_path: Option<PathBuf>) -> Result<AppConfig, config::ConfigError> {
    if let Err(e) = dotenvy::dotenv() {
        tracing::debug!("No .env loaded: {}", e);
    }

    let mut builder = config::Config::builder();

    let default_names = ["config/default", "../config/default", "default"];
    for name in default_names {
        let path = format!("{}.toml", name);
        if std::path::Path::new(&path).exists() {
            builder = builder.add_source(config::File::with_name(name).required(false));
            break;
        }
    }

    if let Some(ref path) = config_path {
        if path.exists() {
            builder = builder.add_source(config::File::from(path.clone()).required(false));
        } else {
            tracing::warn!(path = %path.display(), "Config file not found, ignoring");
        }
    }

    builder = builder.add_source(
        config::Environment::with_prefix("NL2SH")
            .separator("__")
            .try_parsing(true),
    );

    let c = builder.build()?;
    c.try_deserialize()
}
