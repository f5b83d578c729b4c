//! 考试流程 - 流程层
//!
//! 核心职责：把业务能力（出题、提示、评价、自由提问）接到考试会话上
//!
//! 流程顺序：
//! 1. 读取 PDF → 抽取全文 → 出题 → 会话就绪
//! 2. 每道题：输入答案 → 提交 → 评价写入会话
//! 3. 全部评价后显示结果；题库可随时导出
//!
//! 外部调用失败时会话保持调用前的状态。

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::clients::LanguageModel;
use crate::config::Config;
use crate::error::{AppError, AppResult, SessionError};
use crate::infrastructure::{extract_text, fetch_bytes};
use crate::services::{ExamCoach, FreeChatService, QuestionGenerator};
use crate::utils::truncate_text;
use crate::workflow::exam_session::ExamSession;

/// 考试流程
///
/// - 编排出题、提示、评价、自由提问
/// - 不持有会话，会话由调用方借出
/// - 只依赖业务能力（services）
pub struct ExamFlow {
    generator: QuestionGenerator,
    coach: ExamCoach,
    free_chat: FreeChatService,
}

impl ExamFlow {
    pub fn new(llm: Arc<dyn LanguageModel>, config: &Config) -> Self {
        Self {
            generator: QuestionGenerator::new(llm.clone(), &config.exam_model),
            coach: ExamCoach::new(llm.clone(), &config.exam_model, config.context_char_limit),
            free_chat: FreeChatService::new(llm, &config.free_chat_model),
        }
    }

    /// 读取文档并生成题目
    ///
    /// # 参数
    /// - `source`: PDF 本地路径或 http(s) 链接
    ///
    /// # 返回
    /// 实际生成的题目数量（可能少于设置的数量）
    pub async fn prepare(&self, session: &mut ExamSession, source: &str) -> AppResult<usize> {
        if session.is_ready() {
            return Err(SessionError::AlreadyReady.into());
        }

        info!("📖 正在读取文档: {}", source);
        let bytes = fetch_bytes(source).await?;
        let full_text = extract_text(&bytes)?;

        let settings = session.settings();
        let questions = self
            .generator
            .generate(&full_text, settings.num_questions, settings.difficulty)
            .await?;

        let count = questions.len();
        session.start(full_text, questions)?;
        Ok(count)
    }

    /// 当前题目的提示
    pub async fn hint(&self, session: &ExamSession) -> AppResult<String> {
        let question = session
            .current_question()
            .ok_or(SessionError::NotReady)?;
        self.coach.hint(question, session.full_text()).await
    }

    /// 提交当前题目的答案并评价
    ///
    /// # 返回
    /// 评价文本（同时已写入会话）
    pub async fn submit(&self, session: &mut ExamSession) -> AppResult<String> {
        let pending = session.begin_evaluation()?;
        let number = pending.index + 1;

        let evaluation = match self
            .coach
            .evaluate(
                &pending.question,
                &pending.answer,
                session.full_text(),
                session.settings().difficulty,
            )
            .await
        {
            Ok(text) => text,
            Err(e) => {
                error!("❌ 第 {} 题评价失败: {}", number, e);
                return Err(e);
            }
        };

        session.complete_evaluation(pending, evaluation.clone())?;
        info!("✓ 第 {} 题评价完成: {}", number, truncate_text(&evaluation, 60));
        Ok(evaluation)
    }

    /// 自由提问，成功后记入会话的问答记录
    pub async fn ask(&self, session: &mut ExamSession, question: &str) -> AppResult<String> {
        let answer = self.free_chat.ask(question).await?;
        session.record_chat(question.trim(), answer.clone());
        Ok(answer)
    }
}

/// 把题库导出为格式化的 JSON 文件
///
/// # 返回
/// 导出的条目数
pub fn export_problem_bank(session: &ExamSession, path: &Path) -> AppResult<usize> {
    let bank = session.problem_bank();
    let path_str = path.display().to_string();

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"  ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    bank.serialize(&mut serializer)
        .map_err(|e| AppError::json_parse_failed(&path_str, e))?;

    std::fs::write(path, buf).map_err(|e| AppError::file_write_failed(&path_str, e))?;
    info!("💾 题库已导出 {} 条: {}", bank.len(), path_str);
    Ok(bank.len())
}
