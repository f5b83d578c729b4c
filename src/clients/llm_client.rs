//! LLM API 客户端
//!
//! 封装所有与托管语言模型相关的调用逻辑
//!
//! ## 技术栈
//! - 使用 `async-openai` crate 进行 API 调用
//! - 支持自定义 API 端点，兼容 OpenAI API 的服务均可使用
//! - 不做重试、不设额外超时，失败直接返回给调用方

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    types::embeddings::CreateEmbeddingRequestArgs,
    Client,
};
use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, ConfigError, LlmError};
use crate::models::{ChatMessage, ChatRequest, ChatRole};

/// 单次嵌入请求的最大输入条数
const EMBEDDING_BATCH_SIZE: usize = 64;

/// 语言模型能力
///
/// 服务层只依赖这个 trait，测试时可替换为脚本化的假模型。
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// 发送一次聊天补全请求，返回去除首尾空白后的回复
    async fn complete(&self, request: ChatRequest) -> AppResult<String>;

    /// 为每条输入生成嵌入向量，顺序与输入一致
    async fn embed(&self, model: &str, inputs: &[String]) -> AppResult<Vec<Vec<f32>>>;
}

/// 基于 OpenAI 兼容接口的客户端
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiClient {
    /// 创建新的 LLM 客户端
    ///
    /// 未配置 API 密钥时返回 `ConfigError::MissingApiKey`。
    pub fn new(config: &Config) -> AppResult<Self> {
        if config.openai_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey.into());
        }

        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.openai_api_key)
            .with_api_base(&config.openai_api_base);

        Ok(Self {
            client: Client::with_config(openai_config),
        })
    }

    fn to_request_message(message: &ChatMessage) -> AppResult<ChatCompletionRequestMessage> {
        let built = match message.role {
            ChatRole::System => ChatCompletionRequestMessage::System(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.as_str())
                    .build()?,
            ),
            ChatRole::User => ChatCompletionRequestMessage::User(
                ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.as_str())
                    .build()?,
            ),
            ChatRole::Assistant => ChatCompletionRequestMessage::Assistant(
                ChatCompletionRequestAssistantMessageArgs::default()
                    .content(message.content.as_str())
                    .build()?,
            ),
        };
        Ok(built)
    }
}

#[async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> AppResult<String> {
        debug!("调用 LLM API，模型: {}", request.model);
        debug!(
            "消息数: {}，总长度: {} 字符",
            request.messages.len(),
            request.messages.iter().map(|m| m.content.chars().count()).sum::<usize>()
        );

        let messages = request
            .messages
            .iter()
            .map(Self::to_request_message)
            .collect::<AppResult<Vec<_>>>()?;

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(&request.model).messages(messages);
        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }
        let api_request = builder.build()?;

        let response = self.client.chat().create(api_request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            AppError::llm_api_failed(&request.model, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or_else(|| LlmError::EmptyResponse {
                model: request.model.clone(),
            })?;

        Ok(content)
    }

    async fn embed(&self, model: &str, inputs: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(inputs.len());

        for batch in inputs.chunks(EMBEDDING_BATCH_SIZE) {
            debug!("调用嵌入 API，模型: {}，本批 {} 条", model, batch.len());

            let request = CreateEmbeddingRequestArgs::default()
                .model(model)
                .input(batch.to_vec())
                .build()?;

            let response = self.client.embeddings().create(request).await.map_err(|e| {
                warn!("嵌入 API 调用失败: {}", e);
                AppError::llm_api_failed(model, e)
            })?;

            let mut data = response.data;
            if data.len() != batch.len() {
                return Err(LlmError::EmbeddingCountMismatch {
                    expected: batch.len(),
                    actual: data.len(),
                }
                .into());
            }
            data.sort_by_key(|e| e.index);
            vectors.extend(data.into_iter().map(|e| e.embedding));
        }

        Ok(vectors)
    }
}
