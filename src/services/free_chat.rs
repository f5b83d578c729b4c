//! 自由提问服务
//!
//! 单轮请求，不把历史记录作为上下文发送

use std::sync::Arc;

use tracing::info;

use crate::clients::LanguageModel;
use crate::error::{AppResult, ValidationError};
use crate::models::ChatRequest;
use crate::utils::truncate_text;

const FREE_CHAT_TEMPERATURE: f32 = 0.5;

pub struct FreeChatService {
    llm: Arc<dyn LanguageModel>,
    model: String,
}

impl FreeChatService {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// 提问，空白问题直接拒绝
    pub async fn ask(&self, question: &str) -> AppResult<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }

        info!("🗨️ 自由提问: {}", truncate_text(question, 40));
        self.llm
            .complete(ChatRequest::single_turn(&self.model, question, FREE_CHAT_TEMPERATURE))
            .await
    }
}
