//! PDF 文本抽取
//!
//! 持有 PDF 字节流，只暴露"按页取文本"的能力

use lopdf::Document;
use tracing::{debug, warn};

use crate::error::{AppResult, IngestError};
use crate::models::PageText;

/// 在文件开头多少字节内查找 `%PDF` 标记
const HEADER_SEARCH_WINDOW: usize = 1024;

/// 判断字节流是否为 PDF
pub fn looks_like_pdf(bytes: &[u8]) -> bool {
    let window = &bytes[..bytes.len().min(HEADER_SEARCH_WINDOW)];
    window.windows(4).any(|w| w == b"%PDF")
}

/// 按页抽取文本，页序与文档一致
///
/// 文档结构损坏时返回错误；单页解码失败只记录警告并返回空文本
/// （扫描件等没有文字层的 PDF 属于降级输入，不是错误）。
pub fn extract_pages(bytes: &[u8]) -> AppResult<Vec<PageText>> {
    if !looks_like_pdf(bytes) {
        return Err(IngestError::NotPdf.into());
    }

    let doc = Document::load_mem(bytes).map_err(IngestError::MalformedPdf)?;
    let pages = doc.get_pages();
    debug!("PDF 共 {} 页", pages.len());

    let mut result = Vec::with_capacity(pages.len());
    for page in pages.keys().copied() {
        let text = match doc.extract_text(&[page]) {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                warn!("第 {} 页文本抽取失败，按空页处理: {}", page, e);
                String::new()
            }
        };
        result.push(PageText { page, text });
    }

    Ok(result)
}

/// 每页一段，以空行连接
pub fn join_pages(pages: &[PageText]) -> String {
    pages
        .iter()
        .map(|p| p.text.trim())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// 抽取整份文档的文本
pub fn extract_text(bytes: &[u8]) -> AppResult<String> {
    let pages = extract_pages(bytes)?;
    let text = join_pages(&pages);
    if text.trim().is_empty() {
        warn!("⚠️ PDF 中没有可抽取的文字，出题质量会很差");
    }
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_rejects_non_pdf() {
        let result = extract_pages(b"just some text");
        assert!(matches!(result, Err(AppError::Ingest(IngestError::NotPdf))));
    }

    #[test]
    fn test_rejects_malformed_pdf() {
        let result = extract_pages(b"%PDF-1.4\nthis is not a real document");
        assert!(matches!(
            result,
            Err(AppError::Ingest(IngestError::MalformedPdf(_)))
        ));
    }

    #[test]
    fn test_join_pages_keeps_order_and_blank_pages() {
        let pages = vec![
            PageText { page: 1, text: "  제1조 ".to_string() },
            PageText { page: 2, text: String::new() },
            PageText { page: 3, text: "제2조".to_string() },
        ];
        assert_eq!(join_pages(&pages), "제1조\n\n\n\n제2조");
    }
}
