use serde::{Deserialize, Serialize};

/// 题库条目
///
/// 题目首次评价完成时追加，按结构完全相等去重。
/// 导出时使用与界面表格一致的韩语列名。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemBankEntry {
    #[serde(rename = "문제")]
    pub question: String,
    #[serde(rename = "내 답")]
    pub answer: String,
    #[serde(rename = "AI 평가")]
    pub evaluation: String,
}

/// 自由提问的一问一答
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatExchange {
    pub question: String,
    pub answer: String,
}

/// 单题状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// 尚未作答
    Unanswered,
    /// 已作答，未评价
    Answered,
    /// 已评价（该题终态）
    Evaluated,
}

/// 侧边栏进度统计
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExamProgress {
    pub total: usize,
    pub answered: usize,
    pub evaluated: usize,
}

impl ExamProgress {
    /// 评价完成比例，无题目时为 0
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.evaluated as f64 / self.total as f64
        }
    }
}

/// 最终结果汇总
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExamSummary {
    pub total_questions: usize,
    pub answered: usize,
    pub total_elapsed_secs: f64,
}

impl ExamSummary {
    /// 总用时（整分钟）
    pub fn total_minutes(&self) -> u64 {
        (self.total_elapsed_secs / 60.0).floor() as u64
    }
}

/// 把秒数格式化为 `N분 M초`
pub fn format_elapsed(secs: f64) -> String {
    let whole = secs.max(0.0).floor() as u64;
    format!("{}분 {}초", whole / 60, whole % 60)
}
