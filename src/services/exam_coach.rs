//! 提示与评价服务 - 业务能力层
//!
//! 两个相互独立的单次请求：
//! - 提示：给出原文中的关键词和线索，不泄露答案（只靠提示词约束）
//! - 评价：按固定的四段格式给出判定、参考答案、反馈和要点
//!
//! 评价结果按不透明文本处理，不解析判定结论。

use std::sync::Arc;

use tracing::{debug, info};

use crate::clients::LanguageModel;
use crate::error::AppResult;
use crate::models::{ChatRequest, Difficulty};
use crate::utils::{take_chars, truncate_text};

const HINT_TEMPERATURE: f32 = 0.3;
const EVALUATION_TEMPERATURE: f32 = 0.5;

/// 构建提示请求的提示词
pub fn build_hint_prompt(question: &str, context: &str) -> String {
    format!(
        "아래는 예상 시험문제와 관련된 원문 내용입니다.\n\n\
         문제: {question}\n\
         원문 일부:\n{context}\n\n\
         문제를 풀 때 참고가 될만한 원문에서 핵심 키워드, 문장, 단서를 간략하게 요약해서 '힌트'로 알려줘. \
         단, 정답은 포함하지 마."
    )
}

/// 构建评价请求的提示词
pub fn build_evaluation_prompt(
    question: &str,
    user_answer: &str,
    context: &str,
    difficulty: Difficulty,
) -> String {
    format!(
        "아래는 난이도 '{label}'의 예상 시험 문제와 이에 대한 학생의 답변입니다.\n\n\
         문제: {question}\n\
         학생의 답변: {user_answer}\n\n\
         참고할 원문 내용:\n{context}\n\n\
         {criteria} 평가해주세요.\n\n\
         다음 형식으로 작성해주세요:\n\n\
         **평가 결과**: [정답/부분정답/오답]\n\n\
         **모범 답안**:\n[모범 답안 내용]\n\n\
         **평가 및 피드백**:\n[구체적인 평가 내용과 개선점]\n\n\
         **핵심 포인트**:\n\
         - [핵심 내용 1]\n\
         - [핵심 내용 2]\n\
         - [필요시 추가]\n",
        label = difficulty.label(),
        criteria = difficulty.grading_criteria(),
    )
}

/// 提示与评价服务
pub struct ExamCoach {
    llm: Arc<dyn LanguageModel>,
    model: String,
    context_char_limit: usize,
}

impl ExamCoach {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>, context_char_limit: usize) -> Self {
        Self {
            llm,
            model: model.into(),
            context_char_limit,
        }
    }

    /// 获取提示
    ///
    /// # 参数
    /// - `question`: 题目
    /// - `full_text`: 原文全文，只取前 `context_char_limit` 个字符
    pub async fn hint(&self, question: &str, full_text: &str) -> AppResult<String> {
        info!("💡 正在获取提示: {}", truncate_text(question, 40));
        let context = take_chars(full_text, self.context_char_limit);
        let prompt = build_hint_prompt(question, context);

        self.llm
            .complete(ChatRequest::single_turn(&self.model, prompt, HINT_TEMPERATURE))
            .await
    }

    /// 评价答案
    ///
    /// # 返回
    /// 模型给出的完整评价文本
    pub async fn evaluate(
        &self,
        question: &str,
        user_answer: &str,
        full_text: &str,
        difficulty: Difficulty,
    ) -> AppResult<String> {
        info!("🤖 正在评价答案: {}", truncate_text(question, 40));
        debug!("答案长度: {} 字符", user_answer.chars().count());

        let context = take_chars(full_text, self.context_char_limit);
        let prompt = build_evaluation_prompt(question, user_answer, context, difficulty);

        self.llm
            .complete(ChatRequest::single_turn(
                &self.model,
                prompt,
                EVALUATION_TEMPERATURE,
            ))
            .await
    }
}
