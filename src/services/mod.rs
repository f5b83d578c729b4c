pub mod exam_coach;
pub mod free_chat;
pub mod photo_gallery;
pub mod photo_repository;
pub mod question_generator;
pub mod rag_chain;
pub mod text_splitter;
pub mod vector_store;

pub use exam_coach::ExamCoach;
pub use free_chat::FreeChatService;
pub use photo_gallery::PhotoFilter;
pub use photo_repository::{JsonPhotoRepository, PhotoRepository};
pub use question_generator::QuestionGenerator;
pub use rag_chain::{RagAnswer, RagChain};
pub use text_splitter::RecursiveCharacterSplitter;
pub use vector_store::VectorStore;
