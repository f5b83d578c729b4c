//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 每个应用一个终端前端，负责持有会话、分发命令和生成显示文字。
//!
//! ## 模块划分
//!
//! ### `repl` - 交互循环
//! - 逐行读取标准输入，区分命令和正文
//! - 一次操作失败只打印错误，不退出
//!
//! ### `exam_app` - PDF 出题与评价
//! - 唯一持有 `ExamSession`
//! - 委托 `ExamFlow` 完成外部调用
//!
//! ### `photo_app` - 相册
//! - 通过 `PhotoRepository` 读写相册文档
//!
//! ### `constitution_app` - 宪法问答
//! - 启动时准备向量索引，持有 `RagChain`
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (终端交互，一个应用一个)
//!     ↓
//! workflow (ExamSession / ExamFlow)
//!     ↓
//! services (出题 / 评价 / 检索 / 相册存储)
//!     ↓
//! clients + infrastructure (语言模型 / PDF / 下载)
//! ```

pub mod constitution_app;
pub mod exam_app;
pub mod photo_app;
pub mod repl;

// 重新导出主要类型
pub use constitution_app::ConstitutionApp;
pub use exam_app::ExamApp;
pub use photo_app::PhotoApp;
pub use repl::{run, CommandHandler, Step};
