//! 宪法问答应用 - 编排层
//!
//! 初始化时准备向量索引（已保存则直接加载），之后每行输入都是一个问题。

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::clients::LanguageModel;
use crate::config::Config;
use crate::error::{AppResult, ValidationError};
use crate::models::{ChatRole, DocumentChunk};
use crate::orchestrator::repl::{parse_input, CommandHandler, Input, Step};
use crate::services::rag_chain::{load_or_build_store, GREETING};
use crate::services::{RagAnswer, RagChain, RecursiveCharacterSplitter};
use crate::utils::truncate_text;

/// 参考片段预览长度
const SOURCE_PREVIEW_CHARS: usize = 120;

pub const CONSTITUTION_HELP: &str = "\
⚖️ 사용 방법
  (일반 텍스트)   헌법에 대한 질문
  :history        지금까지의 대화
  :clear          대화 기록 지우기
  :quit           종료";

/// 宪法问答应用
pub struct ConstitutionApp {
    chain: RagChain,
}

impl ConstitutionApp {
    pub fn new(chain: RagChain) -> Self {
        Self { chain }
    }

    /// 准备向量索引并创建问答链
    ///
    /// # 参数
    /// - `model`: 问答模型，必须是可选模型之一
    pub async fn initialize(
        llm: Arc<dyn LanguageModel>,
        config: &Config,
        model: &str,
    ) -> AppResult<Self> {
        let splitter = RecursiveCharacterSplitter::new(config.chunk_size, config.chunk_overlap);
        let store = load_or_build_store(
            llm.as_ref(),
            &config.constitution_pdf,
            Path::new(&config.vector_store_dir),
            &config.embedding_model,
            &splitter,
        )
        .await?;

        info!("✓ 宪法问答就绪（{} 个片段，模型 {}）", store.len(), model);
        Ok(Self::new(RagChain::new(
            llm,
            store,
            model,
            config.retriever_top_k,
        )))
    }

    pub fn chain(&self) -> &RagChain {
        &self.chain
    }

    pub fn intro(&self) -> String {
        format!("⚖️ 헌법 Q&A 챗봇 ({})\n🤖 {}", self.chain.model(), GREETING)
    }

    fn render_history(&self) -> String {
        let history = self.chain.history();
        if history.is_empty() {
            return "아직 대화가 없습니다.".to_string();
        }

        history
            .iter()
            .map(|m| {
                let who = match m.role {
                    ChatRole::User => "🙋",
                    _ => "🤖",
                };
                format!("{} {}", who, m.content)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl CommandHandler for ConstitutionApp {
    fn prompt(&self) -> String {
        "질문 > ".to_string()
    }

    async fn handle_line(&mut self, line: &str) -> AppResult<Step> {
        match parse_input(line) {
            Input::Text(question) => {
                let answer = self.chain.ask(question).await?;
                Ok(Step::say(render_answer(&answer)))
            }
            Input::Command { name, .. } => match name {
                "history" => Ok(Step::say(self.render_history())),
                "clear" => {
                    self.chain.clear_history();
                    Ok(Step::say(format!("대화 기록을 지웠습니다.\n🤖 {}", GREETING)))
                }
                "help" => Ok(Step::say(CONSTITUTION_HELP)),
                "quit" | "exit" => Ok(Step::Quit),
                other => Err(ValidationError::UnknownCommand(format!(":{}", other)).into()),
            },
        }
    }
}

/// 回答正文加参考片段（来源 + 页码 + 内容预览）
pub fn render_answer(answer: &RagAnswer) -> String {
    let mut out = format!("🤖 {}", answer.answer);
    if !answer.context.is_empty() {
        out.push_str("\n\n📎 참고 자료");
        for chunk in &answer.context {
            out.push_str(&format!("\n{}", render_source(chunk)));
        }
    }
    out
}

fn render_source(chunk: &DocumentChunk) -> String {
    let content = chunk.content.replace('\n', " ");
    format!(
        "- {} ({}쪽): {}",
        chunk.source,
        chunk.page,
        truncate_text(&content, SOURCE_PREVIEW_CHARS)
    )
}
