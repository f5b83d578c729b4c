//! 考试会话 - 流程层
//!
//! 一次考试的全部状态。显式的类型化对象，由各个处理函数借用，
//! 重置时整体重建，而不是逐个字段清空。
//!
//! 每道题的状态：
//!
//! ```text
//! Unanswered ──输入答案──▶ Answered ──提交并评价成功──▶ Evaluated（终态）
//! ```
//!
//! 不变量：
//! - 答案、评价、用时三个列表的长度始终等于题目数量
//! - 评价一旦写入不会被清空或覆盖
//! - 只有当前题已评价才能前进；后退不受限制（第一题除外）

use std::time::Instant;

use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppResult, SessionError, ValidationError};
use crate::models::{
    ChatExchange, Difficulty, ExamProgress, ExamSummary, ProblemBankEntry, SlotState,
};

/// 可选的题目数量
pub const QUESTION_COUNT_CHOICES: [usize; 4] = [5, 10, 15, 20];

/// 出题设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExamSettings {
    pub difficulty: Difficulty,
    pub num_questions: usize,
}

impl Default for ExamSettings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Medium,
            num_questions: 10,
        }
    }
}

impl ExamSettings {
    pub fn new(difficulty: Difficulty, num_questions: usize) -> Result<Self, ValidationError> {
        validate_question_count(num_questions)?;
        Ok(Self {
            difficulty,
            num_questions,
        })
    }

    /// 配置中的默认值不合法时退回内置默认值
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.default_difficulty, config.default_num_questions).unwrap_or_else(|e| {
            warn!("⚠️ 默认题目数量无效，使用 10: {}", e);
            Self {
                difficulty: config.default_difficulty,
                ..Self::default()
            }
        })
    }
}

/// 题目数量只能是 5、10、15、20
pub fn validate_question_count(n: usize) -> Result<usize, ValidationError> {
    if QUESTION_COUNT_CHOICES.contains(&n) {
        Ok(n)
    } else {
        Err(ValidationError::UnsupportedQuestionCount(n))
    }
}

/// 已发出、等待评价结果的提交
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEvaluation {
    pub index: usize,
    pub question: String,
    pub answer: String,
}

/// 考试会话
#[derive(Debug, Clone)]
pub struct ExamSession {
    /// 重置时回到的设置
    defaults: ExamSettings,
    settings: ExamSettings,
    ready: bool,
    full_text: String,
    questions: Vec<String>,
    answers: Vec<String>,
    evaluations: Vec<Option<String>>,
    elapsed_secs: Vec<f64>,
    index: usize,
    question_started_at: Option<Instant>,
    results_shown: bool,
    problem_bank: Vec<ProblemBankEntry>,
    /// 题库复习位置，从 1 开始
    bank_cursor: usize,
    chat_history: Vec<ChatExchange>,
}

impl Default for ExamSession {
    fn default() -> Self {
        Self::new(ExamSettings::default())
    }
}

impl ExamSession {
    pub fn new(defaults: ExamSettings) -> Self {
        Self {
            defaults,
            settings: defaults,
            ready: false,
            full_text: String::new(),
            questions: Vec::new(),
            answers: Vec::new(),
            evaluations: Vec::new(),
            elapsed_secs: Vec::new(),
            index: 0,
            question_started_at: None,
            results_shown: false,
            problem_bank: Vec::new(),
            bank_cursor: 1,
            chat_history: Vec::new(),
        }
    }

    /// 丢弃全部状态，回到初始设置
    pub fn reset(&mut self) {
        debug!("考试会话重置");
        *self = Self::new(self.defaults);
    }

    // ========== 设置 ==========

    pub fn settings(&self) -> ExamSettings {
        self.settings
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) -> AppResult<()> {
        self.ensure_not_ready()?;
        self.settings.difficulty = difficulty;
        Ok(())
    }

    pub fn set_num_questions(&mut self, n: usize) -> AppResult<()> {
        self.ensure_not_ready()?;
        self.settings.num_questions = validate_question_count(n)?;
        Ok(())
    }

    // ========== 生命周期 ==========

    /// 题目生成完成后调用一次，初始化每道题的状态
    pub fn start(&mut self, full_text: String, questions: Vec<String>) -> AppResult<()> {
        self.ensure_not_ready()?;

        let n = questions.len();
        self.full_text = full_text;
        self.questions = questions;
        self.answers = vec![String::new(); n];
        self.evaluations = vec![None; n];
        self.elapsed_secs = vec![0.0; n];
        self.index = 0;
        self.ready = true;
        self.question_started_at = Some(Instant::now());

        debug!("考试开始，共 {} 道题", n);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn full_text(&self) -> &str {
        &self.full_text
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    // ========== 当前题目 ==========

    /// 当前题目索引（从 0 开始）
    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn current_question(&self) -> Option<&str> {
        self.questions.get(self.index).map(String::as_str)
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index).map(String::as_str)
    }

    pub fn evaluation(&self, index: usize) -> Option<&str> {
        self.evaluations.get(index).and_then(|e| e.as_deref())
    }

    /// 用时（秒），尚未提交时为 0
    pub fn elapsed_secs(&self, index: usize) -> Option<f64> {
        self.elapsed_secs.get(index).copied()
    }

    pub fn slot_state(&self, index: usize) -> Option<SlotState> {
        let answer = self.answers.get(index)?;
        let state = if self.evaluations[index].is_some() {
            SlotState::Evaluated
        } else if answer.trim().is_empty() {
            SlotState::Unanswered
        } else {
            SlotState::Answered
        };
        Some(state)
    }

    /// 记录输入中的答案，不触发评价；已评价的题目答案冻结
    pub fn update_answer(&mut self, text: impl Into<String>) -> AppResult<()> {
        self.ensure_active()?;
        if self.evaluations[self.index].is_some() {
            return Err(SessionError::AlreadyEvaluated {
                number: self.index + 1,
            }
            .into());
        }
        self.answers[self.index] = text.into();
        Ok(())
    }

    // ========== 提交与评价 ==========

    /// 开始提交当前题目
    ///
    /// 校验答案非空且尚未评价，并记录从题目出现到提交的用时。
    /// 评价请求失败时直接丢弃返回值即可，题目状态保持未评价。
    pub fn begin_evaluation(&mut self) -> AppResult<PendingEvaluation> {
        self.ensure_active()?;
        let index = self.index;

        if self.evaluations[index].is_some() {
            return Err(SessionError::AlreadyEvaluated { number: index + 1 }.into());
        }
        let answer = self.answers[index].clone();
        if answer.trim().is_empty() {
            return Err(ValidationError::EmptyAnswer.into());
        }

        if let Some(started) = self.question_started_at {
            self.elapsed_secs[index] = started.elapsed().as_secs_f64();
        }

        Ok(PendingEvaluation {
            index,
            question: self.questions[index].clone(),
            answer,
        })
    }

    /// 写入评价结果
    ///
    /// 评价只写一次；答案冻结为提交时的内容；题库中不存在相同条目时追加。
    pub fn complete_evaluation(
        &mut self,
        pending: PendingEvaluation,
        evaluation: String,
    ) -> AppResult<()> {
        let index = pending.index;
        if index >= self.len() {
            return Err(SessionError::IndexOutOfRange {
                number: index + 1,
                len: self.len(),
            }
            .into());
        }
        if self.evaluations[index].is_some() {
            return Err(SessionError::AlreadyEvaluated { number: index + 1 }.into());
        }

        let entry = ProblemBankEntry {
            question: pending.question,
            answer: pending.answer.clone(),
            evaluation: evaluation.clone(),
        };

        self.answers[index] = pending.answer;
        self.evaluations[index] = Some(evaluation);

        if !self.problem_bank.contains(&entry) {
            self.problem_bank.push(entry);
        }
        Ok(())
    }

    // ========== 导航 ==========

    pub fn can_advance(&self) -> bool {
        self.ready
            && self.index + 1 < self.len()
            && self.evaluations[self.index].is_some()
    }

    /// 前进到下一题，当前题必须已评价
    pub fn advance(&mut self) -> AppResult<usize> {
        self.ensure_active()?;
        if self.index + 1 >= self.len() {
            return Err(SessionError::AtLastQuestion.into());
        }
        if self.evaluations[self.index].is_none() {
            return Err(SessionError::NotEvaluated {
                number: self.index + 1,
            }
            .into());
        }

        self.index += 1;
        self.question_started_at = Some(Instant::now());
        Ok(self.index)
    }

    /// 后退到上一题
    pub fn retreat(&mut self) -> AppResult<usize> {
        self.ensure_active()?;
        if self.index == 0 {
            return Err(SessionError::AtFirstQuestion.into());
        }

        self.index -= 1;
        self.question_started_at = Some(Instant::now());
        Ok(self.index)
    }

    // ========== 进度与结果 ==========

    pub fn progress(&self) -> ExamProgress {
        ExamProgress {
            total: self.len(),
            answered: self.answers.iter().filter(|a| !a.trim().is_empty()).count(),
            evaluated: self.evaluations.iter().filter(|e| e.is_some()).count(),
        }
    }

    pub fn all_evaluated(&self) -> bool {
        !self.is_empty() && self.evaluations.iter().all(Option::is_some)
    }

    /// 显示最终结果；需要全部题目都已评价，显示后不可撤回
    pub fn show_results(&mut self) -> AppResult<ExamSummary> {
        self.ensure_active()?;
        let remaining = self.evaluations.iter().filter(|e| e.is_none()).count();
        if remaining > 0 {
            return Err(SessionError::ResultsUnavailable { remaining }.into());
        }

        self.results_shown = true;
        Ok(self.summary())
    }

    pub fn results_shown(&self) -> bool {
        self.results_shown
    }

    pub fn summary(&self) -> ExamSummary {
        ExamSummary {
            total_questions: self.len(),
            answered: self.progress().answered,
            total_elapsed_secs: self.elapsed_secs.iter().sum(),
        }
    }

    // ========== 题库复习 ==========

    pub fn problem_bank(&self) -> &[ProblemBankEntry] {
        &self.problem_bank
    }

    /// 当前复习条目及其编号（从 1 开始）
    pub fn current_bank_entry(&self) -> Option<(usize, &ProblemBankEntry)> {
        let cursor = self.bank_cursor.clamp(1, self.problem_bank.len().max(1));
        self.problem_bank.get(cursor - 1).map(|e| (cursor, e))
    }

    /// 跳到指定编号，超出范围时夹到 [1, 条目数]
    pub fn bank_jump(&mut self, number: usize) -> usize {
        self.bank_cursor = number.clamp(1, self.problem_bank.len().max(1));
        self.bank_cursor
    }

    pub fn bank_next(&mut self) -> usize {
        self.bank_jump(self.bank_cursor + 1)
    }

    pub fn bank_prev(&mut self) -> usize {
        self.bank_jump(self.bank_cursor.saturating_sub(1))
    }

    // ========== 自由提问记录 ==========

    pub fn record_chat(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.chat_history.push(ChatExchange {
            question: question.into(),
            answer: answer.into(),
        });
    }

    /// 最近 `n` 条问答，最新的在前
    pub fn recent_chats(&self, n: usize) -> Vec<&ChatExchange> {
        self.chat_history.iter().rev().take(n).collect()
    }

    // ========== 内部校验 ==========

    fn ensure_not_ready(&self) -> Result<(), SessionError> {
        if self.ready {
            Err(SessionError::AlreadyReady)
        } else {
            Ok(())
        }
    }

    fn ensure_active(&self) -> Result<(), SessionError> {
        if !self.ready {
            return Err(SessionError::NotReady);
        }
        if self.index >= self.len() {
            return Err(SessionError::IndexOutOfRange {
                number: self.index + 1,
                len: self.len(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn started(n: usize) -> ExamSession {
        let mut session = ExamSession::default();
        let questions = (1..=n).map(|i| format!("문제 {}", i)).collect();
        session.start("원문".to_string(), questions).unwrap();
        session
    }

    fn assert_parallel(session: &ExamSession) {
        let n = session.len();
        assert_eq!(session.answers.len(), n);
        assert_eq!(session.evaluations.len(), n);
        assert_eq!(session.elapsed_secs.len(), n);
    }

    fn evaluate_current(session: &mut ExamSession, answer: &str, evaluation: &str) {
        session.update_answer(answer).unwrap();
        let pending = session.begin_evaluation().unwrap();
        session.complete_evaluation(pending, evaluation.to_string()).unwrap();
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = ExamSession::default();
        assert!(!session.is_ready());
        assert!(session.is_empty());
        assert_eq!(session.current_question(), None);
        assert_parallel(&session);
    }

    #[test]
    fn test_start_initialises_slots() {
        let session = started(3);
        assert!(session.is_ready());
        assert_eq!(session.current_question(), Some("문제 1"));
        assert_eq!(session.slot_state(0), Some(SlotState::Unanswered));
        assert_parallel(&session);
    }

    #[test]
    fn test_start_twice_rejected() {
        let mut session = started(1);
        let err = session.start(String::new(), vec!["x".to_string()]).unwrap_err();
        assert!(matches!(err, AppError::Session(SessionError::AlreadyReady)));
    }

    #[test]
    fn test_slot_state_transitions() {
        let mut session = started(2);
        session.update_answer("  ").unwrap();
        assert_eq!(session.slot_state(0), Some(SlotState::Unanswered));
        session.update_answer("민주공화국").unwrap();
        assert_eq!(session.slot_state(0), Some(SlotState::Answered));

        let pending = session.begin_evaluation().unwrap();
        assert_eq!(session.slot_state(0), Some(SlotState::Answered));
        session.complete_evaluation(pending, "**평가 결과**: 정답".to_string()).unwrap();
        assert_eq!(session.slot_state(0), Some(SlotState::Evaluated));
        assert_parallel(&session);
    }

    #[test]
    fn test_submit_requires_non_empty_answer() {
        let mut session = started(1);
        let err = session.begin_evaluation().unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::EmptyAnswer)));
    }

    #[test]
    fn test_evaluation_is_never_overwritten() {
        let mut session = started(1);
        evaluate_current(&mut session, "답", "첫 평가");

        assert!(session.begin_evaluation().is_err());
        assert!(session.update_answer("바꾼 답").is_err());

        let forged = PendingEvaluation {
            index: 0,
            question: "문제 1".to_string(),
            answer: "다른 답".to_string(),
        };
        assert!(session.complete_evaluation(forged, "두 번째 평가".to_string()).is_err());

        assert_eq!(session.evaluation(0), Some("첫 평가"));
        assert_eq!(session.answer(0), Some("답"));
    }

    #[test]
    fn test_failed_evaluation_leaves_slot_unset() {
        let mut session = started(2);
        session.update_answer("답").unwrap();
        let _pending = session.begin_evaluation().unwrap();
        // 请求失败，pending 被丢弃

        assert_eq!(session.evaluation(0), None);
        assert!(session.problem_bank().is_empty());
        assert!(matches!(
            session.advance(),
            Err(AppError::Session(SessionError::NotEvaluated { number: 1 }))
        ));
        // 可以重新提交
        assert!(session.begin_evaluation().is_ok());
    }

    #[test]
    fn test_advance_gated_on_evaluation() {
        let mut session = started(3);
        assert!(!session.can_advance());
        assert!(session.advance().is_err());
        assert_eq!(session.current_index(), 0);

        evaluate_current(&mut session, "답", "평가");
        assert!(session.can_advance());
        assert_eq!(session.advance().unwrap(), 1);
        assert!(session.advance().is_err());
    }

    #[test]
    fn test_retreat_always_allowed_above_zero() {
        let mut session = started(3);
        assert!(matches!(
            session.retreat(),
            Err(AppError::Session(SessionError::AtFirstQuestion))
        ));

        evaluate_current(&mut session, "답", "평가");
        session.advance().unwrap();
        // 第二题未评价也可以后退
        assert_eq!(session.retreat().unwrap(), 0);
    }

    #[test]
    fn test_cannot_advance_past_last() {
        let mut session = started(1);
        evaluate_current(&mut session, "답", "평가");
        assert!(matches!(
            session.advance(),
            Err(AppError::Session(SessionError::AtLastQuestion))
        ));
    }

    #[test]
    fn test_results_require_all_evaluated() {
        let mut session = started(2);
        evaluate_current(&mut session, "답1", "평가1");
        assert!(matches!(
            session.show_results(),
            Err(AppError::Session(SessionError::ResultsUnavailable { remaining: 1 }))
        ));
        assert!(!session.results_shown());

        session.advance().unwrap();
        evaluate_current(&mut session, "답2", "평가2");
        let summary = session.show_results().unwrap();
        assert!(session.results_shown());
        assert_eq!(summary.total_questions, 2);
        assert_eq!(summary.answered, 2);
    }

    #[test]
    fn test_problem_bank_deduplicates() {
        let mut session = ExamSession::default();
        session
            .start(String::new(), vec!["같은 문제".to_string(), "같은 문제".to_string()])
            .unwrap();

        evaluate_current(&mut session, "같은 답", "같은 평가");
        session.advance().unwrap();
        evaluate_current(&mut session, "같은 답", "같은 평가");

        assert_eq!(session.problem_bank().len(), 1);
    }

    #[test]
    fn test_bank_cursor_clamps() {
        let mut session = started(3);
        for i in 0..3 {
            evaluate_current(&mut session, &format!("답{}", i), &format!("평가{}", i));
            if i < 2 {
                session.advance().unwrap();
            }
        }

        assert_eq!(session.current_bank_entry().unwrap().0, 1);
        assert_eq!(session.bank_prev(), 1);
        assert_eq!(session.bank_next(), 2);
        assert_eq!(session.bank_jump(99), 3);
        assert_eq!(session.current_bank_entry().unwrap().1.answer, "답2");
        assert_eq!(session.bank_jump(0), 1);
    }

    #[test]
    fn test_elapsed_recorded_on_submit() {
        let mut session = started(2);
        session.update_answer("답").unwrap();
        assert_eq!(session.elapsed_secs(0), Some(0.0));
        std::thread::sleep(std::time::Duration::from_millis(20));
        let pending = session.begin_evaluation().unwrap();
        session.complete_evaluation(pending, "평가".to_string()).unwrap();
        let recorded = session.elapsed_secs(0).unwrap();
        assert!(recorded >= 0.02);

        // 回到已评价的题目时用时不重新计算
        session.advance().unwrap();
        std::thread::sleep(std::time::Duration::from_millis(20));
        session.retreat().unwrap();
        assert_eq!(session.elapsed_secs(0), Some(recorded));
        assert!(matches!(
            session.begin_evaluation(),
            Err(AppError::Session(SessionError::AlreadyEvaluated { number: 1 }))
        ));
        assert_eq!(session.elapsed_secs(0), Some(recorded));
        assert_eq!(session.elapsed_secs(1), Some(0.0));
    }

    #[test]
    fn test_settings_locked_after_start() {
        let mut session = ExamSession::default();
        session.set_difficulty(Difficulty::High).unwrap();
        session.set_num_questions(15).unwrap();
        assert!(session.set_num_questions(7).is_err());
        assert_eq!(session.settings().num_questions, 15);

        session.start(String::new(), vec!["q".to_string()]).unwrap();
        assert!(session.set_difficulty(Difficulty::Low).is_err());
    }

    #[test]
    fn test_reset_restores_defaults() {
        let mut session = ExamSession::new(ExamSettings::new(Difficulty::Low, 5).unwrap());
        session.set_num_questions(20).unwrap();
        session.start("원문".to_string(), vec!["q".to_string()]).unwrap();
        evaluate_current(&mut session, "답", "평가");
        session.record_chat("질문", "대답");

        session.reset();

        assert!(!session.is_ready());
        assert!(session.is_empty());
        assert!(session.problem_bank().is_empty());
        assert!(session.recent_chats(3).is_empty());
        assert_eq!(session.settings(), ExamSettings::new(Difficulty::Low, 5).unwrap());
        assert_parallel(&session);
    }

    #[test]
    fn test_recent_chats_newest_first() {
        let mut session = ExamSession::default();
        for i in 1..=5 {
            session.record_chat(format!("q{}", i), format!("a{}", i));
        }
        let recent: Vec<&str> = session
            .recent_chats(3)
            .iter()
            .map(|c| c.question.as_str())
            .collect();
        assert_eq!(recent, vec!["q5", "q4", "q3"]);
    }

    #[test]
    fn test_empty_question_list_is_inert() {
        let mut session = ExamSession::default();
        session.start("스캔본".to_string(), Vec::new()).unwrap();
        assert!(session.is_ready());
        assert!(session.update_answer("x").is_err());
        assert!(session.advance().is_err());
        assert!(session.show_results().is_err());
        assert_eq!(session.progress().ratio(), 0.0);
    }

    #[test]
    fn test_settings_from_config_falls_back_on_bad_count() {
        let config = Config {
            default_num_questions: 12,
            default_difficulty: Difficulty::High,
            ..Config::default()
        };
        let settings = ExamSettings::from_config(&config);
        assert_eq!(settings.num_questions, 10);
        assert_eq!(settings.difficulty, Difficulty::High);

        let config = Config {
            default_num_questions: 20,
            ..Config::default()
        };
        assert_eq!(ExamSettings::from_config(&config).num_questions, 20);
    }
}
