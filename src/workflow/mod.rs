pub mod exam_flow;
pub mod exam_session;

pub use exam_flow::{export_problem_bank, ExamFlow};
pub use exam_session::{ExamSession, ExamSettings, PendingEvaluation, QUESTION_COUNT_CHOICES};
