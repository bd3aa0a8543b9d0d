//! LLM 层：Inference 能力的抽象与实现（OpenAI 兼容 / Mock / 超时包装）

pub mod message;
pub mod mock;
pub mod openai;
pub mod traits;

pub use message::{Message, MessageRole};
pub use mock::MockLlmClient;
pub use openai::{OpenAiClient, TokenUsage};
pub use traits::{LlmClient, LlmError, TimeoutLlmClient};
