pub mod chat;
pub mod difficulty;
pub mod document;
pub mod exam;
pub mod photo;

pub use chat::{ChatMessage, ChatRequest, ChatRole};
pub use difficulty::Difficulty;
pub use document::{DocumentChunk, PageText};
pub use exam::{format_elapsed, ChatExchange, ExamProgress, ExamSummary, ProblemBankEntry, SlotState};
pub use photo::{AlbumDocument, Photo, PhotoDraft, PhotoType};
