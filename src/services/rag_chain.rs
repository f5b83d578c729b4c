//! 检索增强问答链
//!
//! 流程：
//! 1. 有历史记录时，先让模型把问题改写成独立问题；否则直接用原问题
//! 2. 用改写后的问题检索最相近的 k 个片段
//! 3. 把片段塞进系统提示词，连同历史记录和原问题一起请求回答
//! 4. 成功后把这一轮问答追加到历史记录

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::clients::LanguageModel;
use crate::error::{AppResult, LlmError, ValidationError};
use crate::infrastructure::{extract_pages, fetch_bytes};
use crate::models::{ChatMessage, ChatRequest, DocumentChunk};
use crate::services::text_splitter::RecursiveCharacterSplitter;
use crate::services::vector_store::VectorStore;
use crate::utils::truncate_text;

/// 问题改写的系统提示词
pub const CONTEXTUALIZE_SYSTEM_PROMPT: &str = "Given a chat history and the latest user question \
which might reference context in the chat history, formulate a standalone question which can be \
understood without the chat history. Do NOT answer the question, just reformulate it if needed \
and otherwise return it as is.";

/// 问答的系统提示词，`{context}` 会被检索到的片段替换
pub const QA_SYSTEM_PROMPT_TEMPLATE: &str = "You are an assistant for question-answering tasks. \
Use the following pieces of retrieved context to answer the question. If you don't know the \
answer, just say that you don't know. Keep the answer perfect. please use imogi with the answer. \
대답은 한국어로 하고, 존댓말을 써줘.\n\n{context}";

/// 开场白
pub const GREETING: &str = "헌법에 대해 무엇이든 물어보세요!";

/// 一次问答的结果
#[derive(Debug, Clone)]
pub struct RagAnswer {
    pub answer: String,
    /// 检索时实际使用的问题
    pub standalone_question: String,
    /// 参考片段
    pub context: Vec<DocumentChunk>,
}

/// 把检索结果填入问答系统提示词
pub fn build_qa_system_prompt(context: &[DocumentChunk]) -> String {
    let joined = context
        .iter()
        .map(|c| c.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    QA_SYSTEM_PROMPT_TEMPLATE.replace("{context}", &joined)
}

/// 带历史记录的问答链
pub struct RagChain {
    llm: Arc<dyn LanguageModel>,
    store: VectorStore,
    chat_model: String,
    top_k: usize,
    history: Vec<ChatMessage>,
}

impl RagChain {
    pub fn new(
        llm: Arc<dyn LanguageModel>,
        store: VectorStore,
        chat_model: impl Into<String>,
        top_k: usize,
    ) -> Self {
        Self {
            llm,
            store,
            chat_model: chat_model.into(),
            top_k,
            history: Vec::new(),
        }
    }

    /// 历史记录（用户/助手交替）
    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn model(&self) -> &str {
        &self.chat_model
    }

    /// 清空历史记录
    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// 提问
    ///
    /// 任一步骤失败时历史记录保持不变
    pub async fn ask(&mut self, input: &str) -> AppResult<RagAnswer> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::EmptyQuestion.into());
        }

        let standalone_question = self.contextualize(input).await?;
        let context = self.retrieve(&standalone_question).await?;

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(build_qa_system_prompt(&context)));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(input));

        let answer = self
            .llm
            .complete(ChatRequest {
                model: self.chat_model.clone(),
                messages,
                temperature: None,
            })
            .await?;

        self.history.push(ChatMessage::user(input));
        self.history.push(ChatMessage::assistant(answer.clone()));

        Ok(RagAnswer {
            answer,
            standalone_question,
            context,
        })
    }

    /// 没有历史记录时原样返回问题
    async fn contextualize(&self, input: &str) -> AppResult<String> {
        if self.history.is_empty() {
            return Ok(input.to_string());
        }

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(CONTEXTUALIZE_SYSTEM_PROMPT));
        messages.extend(self.history.iter().cloned());
        messages.push(ChatMessage::user(input));

        let rewritten = self
            .llm
            .complete(ChatRequest {
                model: self.chat_model.clone(),
                messages,
                temperature: None,
            })
            .await?;

        debug!("问题改写: {} → {}", input, truncate_text(&rewritten, 80));
        Ok(rewritten)
    }

    async fn retrieve(&self, query: &str) -> AppResult<Vec<DocumentChunk>> {
        let query_vec = self
            .llm
            .embed(&self.store.embedding_model, &[query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or(LlmError::EmbeddingCountMismatch {
                expected: 1,
                actual: 0,
            })?;

        let hits = self.store.similarity_search(&query_vec, self.top_k);
        debug!("检索到 {} 个片段", hits.len());
        Ok(hits.into_iter().map(|(chunk, _)| chunk.clone()).collect())
    }
}

/// 加载已保存的向量索引；不存在、损坏或嵌入模型不一致时重新构建并保存
///
/// # 参数
/// - `pdf_source`: PDF 路径或链接
/// - `index_dir`: 索引目录
pub async fn load_or_build_store(
    llm: &dyn LanguageModel,
    pdf_source: &str,
    index_dir: &Path,
    embedding_model: &str,
    splitter: &RecursiveCharacterSplitter,
) -> AppResult<VectorStore> {
    if VectorStore::index_path(index_dir).exists() {
        match VectorStore::load_local(index_dir) {
            Ok(store) if store.embedding_model == embedding_model && !store.is_empty() => {
                info!("✓ 使用已保存的向量索引（{} 个片段）", store.len());
                return Ok(store);
            }
            Ok(_) => warn!("⚠️ 向量索引为空或嵌入模型不一致，重新构建"),
            Err(e) => warn!("⚠️ 向量索引加载失败，重新构建: {}", e),
        }
    }

    info!("📖 正在读取文档: {}", pdf_source);
    let bytes = fetch_bytes(pdf_source).await?;
    let pages = extract_pages(&bytes)?;
    let chunks = splitter.split_pages(pdf_source, &pages);
    info!("✂️ {} 页切分为 {} 个片段", pages.len(), chunks.len());

    let contents: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
    let embeddings = llm.embed(embedding_model, &contents).await?;
    if embeddings.len() != chunks.len() {
        return Err(LlmError::EmbeddingCountMismatch {
            expected: chunks.len(),
            actual: embeddings.len(),
        }
        .into());
    }

    let mut store = VectorStore::new(embedding_model);
    store.add(chunks, embeddings);
    store.save_local(index_dir)?;
    Ok(store)
}
