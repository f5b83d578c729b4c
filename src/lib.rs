//! # Classroom AI
//!
//! 三个课堂用的终端应用：宪法问答、相册管理、PDF 出题与评价
//!
//! ## 架构设计
//!
//! 沿用严格的分层结构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 读取本地或远程文档，抽取 PDF 文字
//!
//! ### ② 客户端（Clients）
//! - `clients/` - `LanguageModel` trait 与 OpenAI 兼容实现
//!
//! ### ③ 业务能力层（Services）
//! - `QuestionGenerator` - 出题与题目解析
//! - `ExamCoach` - 提示与评价
//! - `FreeChatService` - 自由提问
//! - `RagChain` / `VectorStore` / `RecursiveCharacterSplitter` - 检索增强问答
//! - `PhotoRepository` / `PhotoFilter` - 相册存储与筛选
//!
//! ### ④ 流程层（Workflow）
//! - `ExamSession` - 考试会话状态机
//! - `ExamFlow` - 出题 → 作答 → 评价的流程编排
//!
//! ### ⑤ 编排层（Orchestration）
//! - `orchestrator/` - 每个应用一个终端前端
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{LanguageModel, OpenAiClient};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use orchestrator::{ConstitutionApp, ExamApp, PhotoApp};
pub use workflow::{ExamFlow, ExamSession};
