//! 递归字符切分器
//!
//! 依次尝试 `"\n\n"`、`"\n"`、`" "`、`""` 作为分隔符，
//! 把文本切成不超过 `chunk_size` 个字符的片段。
//! 超长片段用下一级分隔符继续切分，相邻小片段用当前分隔符合并。

use crate::models::{DocumentChunk, PageText};

const DEFAULT_SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

#[derive(Debug, Clone)]
pub struct RecursiveCharacterSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
    separators: Vec<String>,
}

impl RecursiveCharacterSplitter {
    /// `chunk_size` 为 0 时按 1 处理；重叠不能超过片段大小
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            chunk_size,
            chunk_overlap: chunk_overlap.min(chunk_size - 1),
            separators: DEFAULT_SEPARATORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 切分一段文本，返回去除首尾空白后的非空片段
    pub fn split_text(&self, text: &str) -> Vec<String> {
        self.split_recursive(text, &self.separators)
    }

    /// 切分按页文本，保留来源和页码
    pub fn split_pages(&self, source: &str, pages: &[PageText]) -> Vec<DocumentChunk> {
        pages
            .iter()
            .flat_map(|page| {
                self.split_text(&page.text)
                    .into_iter()
                    .map(move |content| DocumentChunk {
                        source: source.to_string(),
                        page: page.page,
                        content,
                    })
            })
            .collect()
    }

    fn split_recursive(&self, text: &str, separators: &[String]) -> Vec<String> {
        // 选第一个在文本中出现的分隔符，空分隔符兜底
        let (position, separator) = separators
            .iter()
            .enumerate()
            .find(|(_, sep)| sep.is_empty() || text.contains(sep.as_str()))
            .map(|(i, sep)| (i, sep.as_str()))
            .unwrap_or((separators.len(), ""));
        let remaining = separators.get(position + 1..).unwrap_or(&[]);

        let splits: Vec<String> = if separator.is_empty() {
            text.chars().map(|c| c.to_string()).collect()
        } else {
            text.split(separator)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();

        for piece in splits {
            if char_len(&piece) <= self.chunk_size {
                pending.push(piece);
                continue;
            }

            if !pending.is_empty() {
                chunks.extend(self.merge_splits(&pending, separator));
                pending.clear();
            }

            if remaining.is_empty() {
                chunks.push(piece.trim().to_string());
            } else {
                chunks.extend(self.split_recursive(&piece, remaining));
            }
        }

        if !pending.is_empty() {
            chunks.extend(self.merge_splits(&pending, separator));
        }

        chunks.retain(|c| !c.is_empty());
        chunks
    }

    /// 把小片段用分隔符合并成不超过 `chunk_size` 的块
    fn merge_splits(&self, splits: &[String], separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut docs = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut total = 0usize;

        for split in splits {
            let len = char_len(split);
            let joined_len = if current.is_empty() { len } else { total + sep_len + len };

            if joined_len > self.chunk_size && !current.is_empty() {
                let doc = current.join(separator).trim().to_string();
                if !doc.is_empty() {
                    docs.push(doc);
                }

                // 保留末尾不超过 overlap 的片段作为下一块的开头
                while !current.is_empty()
                    && (total > self.chunk_overlap
                        || total + sep_len + len > self.chunk_size)
                {
                    let removed = current.remove(0);
                    total = total.saturating_sub(
                        char_len(removed) + if current.is_empty() { 0 } else { sep_len },
                    );
                }
            }

            total = if current.is_empty() { len } else { total + sep_len + len };
            current.push(split);
        }

        let doc = current.join(separator).trim().to_string();
        if !doc.is_empty() {
            docs.push(doc);
        }
        docs
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}
