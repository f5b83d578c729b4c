//! 内存向量库
//!
//! 片段 + 嵌入向量，余弦相似度检索，整体序列化为一个 JSON 索引文件。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::models::DocumentChunk;

/// 索引文件名
pub const INDEX_FILE_NAME: &str = "index.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredChunk {
    pub chunk: DocumentChunk,
    pub embedding: Vec<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VectorStore {
    /// 生成嵌入所用的模型，换模型后索引需要重建
    pub embedding_model: String,
    entries: Vec<StoredChunk>,
}

impl VectorStore {
    pub fn new(embedding_model: impl Into<String>) -> Self {
        Self {
            embedding_model: embedding_model.into(),
            entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 追加片段及其嵌入，两者按位置一一对应
    pub fn add(&mut self, chunks: Vec<DocumentChunk>, embeddings: Vec<Vec<f32>>) {
        debug_assert_eq!(chunks.len(), embeddings.len());
        self.entries.extend(
            chunks
                .into_iter()
                .zip(embeddings)
                .map(|(chunk, embedding)| StoredChunk { chunk, embedding }),
        );
    }

    /// 返回与查询向量最相近的 `k` 个片段，相似度相同时保持插入顺序
    pub fn similarity_search(&self, query: &[f32], k: usize) -> Vec<(&DocumentChunk, f32)> {
        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, cosine_similarity(query, &entry.embedding)))
            .collect();

        // sort_by 是稳定排序
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        scored
            .into_iter()
            .take(k)
            .map(|(i, score)| (&self.entries[i].chunk, score))
            .collect()
    }

    /// 索引文件路径
    pub fn index_path(dir: &Path) -> PathBuf {
        dir.join(INDEX_FILE_NAME)
    }

    /// 保存到目录（目录不存在时创建）
    pub fn save_local(&self, dir: &Path) -> AppResult<()> {
        std::fs::create_dir_all(dir)
            .map_err(|e| AppError::file_write_failed(dir.display().to_string(), e))?;

        let path = Self::index_path(dir);
        let json = serde_json::to_vec(self)
            .map_err(|e| AppError::json_parse_failed(path.display().to_string(), e))?;
        std::fs::write(&path, json)
            .map_err(|e| AppError::file_write_failed(path.display().to_string(), e))?;

        info!("💾 向量索引已保存: {}（{} 个片段）", path.display(), self.len());
        Ok(())
    }

    /// 从目录加载
    pub fn load_local(dir: &Path) -> AppResult<Self> {
        let path = Self::index_path(dir);
        let bytes = std::fs::read(&path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        let store: Self = serde_json::from_slice(&bytes)
            .map_err(|e| AppError::json_parse_failed(path.display().to_string(), e))?;

        debug!("向量索引已加载: {}（{} 个片段）", path.display(), store.len());
        Ok(store)
    }
}

/// 余弦相似度；任一向量为零向量或维度不一致时为 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a.sqrt() * norm_b.sqrt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(content: &str) -> DocumentChunk {
        DocumentChunk {
            source: "test.pdf".to_string(),
            page: 1,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[2.0, 0.0]) - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-6);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_similarity_search_orders_and_limits() {
        let mut store = VectorStore::new("test-embedding");
        store.add(
            vec![chunk("동쪽"), chunk("북쪽"), chunk("북동쪽"), chunk("또 북쪽")],
            vec![
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![1.0, 1.0],
                vec![0.0, 2.0],
            ],
        );

        let hits = store.similarity_search(&[0.0, 1.0], 3);
        let contents: Vec<&str> = hits.iter().map(|(c, _)| c.content.as_str()).collect();
        // 两个同样相似的片段按插入顺序排列
        assert_eq!(contents, vec!["북쪽", "또 북쪽", "북동쪽"]);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = VectorStore::new("test-embedding");
        store.add(vec![chunk("제1조")], vec![vec![0.5, 0.5]]);

        store.save_local(dir.path()).unwrap();
        let loaded = VectorStore::load_local(dir.path()).unwrap();

        assert_eq!(loaded, store);
    }

    #[test]
    fn test_load_missing_index_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(VectorStore::load_local(dir.path()).is_err());
    }
}
