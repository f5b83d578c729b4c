//! 出题服务 - 业务能力层
//!
//! 只负责"根据原文出题"能力：构建提示词、调用模型、解析编号列表。
//! 解析规则与网络调用分离，可单独测试。

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::clients::LanguageModel;
use crate::error::AppResult;
use crate::models::{ChatRequest, Difficulty};
use crate::utils::truncate_text;

/// 出题温度
const GENERATION_TEMPERATURE: f32 = 0.7;

/// 行首 `<数字>. ` 形式的题目
fn numbered_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^[ \t]*\d+\.[ \t]+(\S.*?)[ \t]*$").expect("valid regex"))
}

/// 行首编号标记（兜底解析时去除）
fn leading_number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s*").expect("valid regex"))
}

/// 构建出题提示词
///
/// # 参数
/// - `full_text`: 原文全文
/// - `num_questions`: 题目数量
/// - `difficulty`: 难度
pub fn build_generation_prompt(full_text: &str, num_questions: usize, difficulty: Difficulty) -> String {
    format!(
        "너는 이 수업의 교수이고, 이 자료는 대상 불명 수업 자료다.\n\
         자료의 핵심 개념, 반드시 알아야 할 내용만을 바탕으로 {style} \
         한국어 주관식 예상 시험문제 {n}개를 만들어줘.\n\
         - 너무 쉬운 문제, 단순 복사 문제, 상식적인 사실 문제는 내지 마라.\n\
         - 학생의 사고력, 이해력, 적용력을 반드시 평가할 수 있어야 한다.\n\
         - 각 문제에 번호를 붙여라 (1. 2. ...)\n\
         - 답은 절대 쓰지 마라.\n\
         - 문제만 작성해라.\n\n\
         자료 내용:\n{text}",
        style = difficulty.question_style(),
        n = num_questions,
        text = full_text,
    )
}

/// 从模型回复中解析题目
///
/// 先匹配行首编号；不足 `num_questions` 条时改用逐行兜底解析：
/// 跳过空行和以"난이도"开头的行，去掉行首编号后保留非空行。
/// 结果最多 `num_questions` 条。
pub fn parse_questions(reply: &str, num_questions: usize) -> Vec<String> {
    let numbered: Vec<String> = numbered_line_regex()
        .captures_iter(reply)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|q| !q.is_empty())
        .collect();

    if numbered.len() >= num_questions {
        return numbered.into_iter().take(num_questions).collect();
    }

    debug!(
        "编号匹配只得到 {} 条（需要 {} 条），使用逐行兜底解析",
        numbered.len(),
        num_questions
    );

    reply
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("난이도"))
        .map(|line| leading_number_regex().replace(line, "").trim().to_string())
        .filter(|q| !q.is_empty())
        .take(num_questions)
        .collect()
}

/// 出题服务
///
/// 职责：
/// - 根据原文和难度生成主观题
/// - 一次请求，不流式、不重试
/// - 不持有会话状态
pub struct QuestionGenerator {
    llm: Arc<dyn LanguageModel>,
    model: String,
}

impl QuestionGenerator {
    pub fn new(llm: Arc<dyn LanguageModel>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
        }
    }

    /// 生成题目
    ///
    /// # 返回
    /// 最多 `num_questions` 条非空题目；不足时不视为错误
    pub async fn generate(
        &self,
        full_text: &str,
        num_questions: usize,
        difficulty: Difficulty,
    ) -> AppResult<Vec<String>> {
        info!(
            "🤖 正在生成 {} 难度题目 {} 道（原文 {} 字符）",
            difficulty,
            num_questions,
            full_text.chars().count()
        );

        let prompt = build_generation_prompt(full_text, num_questions, difficulty);
        let reply = self
            .llm
            .complete(ChatRequest::single_turn(&self.model, prompt, GENERATION_TEMPERATURE))
            .await?;

        debug!("出题回复: {}", truncate_text(&reply, 200));

        let questions = parse_questions(&reply, num_questions);
        if questions.len() < num_questions {
            warn!(
                "⚠️ 只解析出 {} 道题目（请求 {} 道），按实际数量继续",
                questions.len(),
                num_questions
            );
        } else {
            info!("✓ 成功生成 {} 道题目", questions.len());
        }

        Ok(questions)
    }
}
