use serde::{Deserialize, Serialize};

/// 文档片段，检索的最小单位
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    /// 来源文件路径
    pub source: String,
    /// 页码（从 1 开始）
    pub page: u32,
    pub content: String,
}

/// 按页抽取的文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageText {
    pub page: u32,
    pub text: String,
}
