//! 文档来源
//!
//! "上传"的 PDF 可以是本地路径，也可以是 http(s) 链接

use tracing::{debug, info};

use crate::error::{AppResult, IngestError};

/// 是否为远程链接
pub fn is_remote(source: &str) -> bool {
    let lower = source.trim().to_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// 读取文档字节
pub async fn fetch_bytes(source: &str) -> AppResult<Vec<u8>> {
    let source = source.trim();

    if is_remote(source) {
        info!("🌐 正在下载文档: {}", source);
        let bytes = download(source).await.map_err(|e| IngestError::DownloadFailed {
            url: source.to_string(),
            source: e,
        })?;
        debug!("下载完成: {} 字节", bytes.len());
        Ok(bytes)
    } else {
        debug!("读取本地文档: {}", source);
        tokio::fs::read(source).await.map_err(|e| {
            IngestError::ReadFailed {
                path: source.to_string(),
                source: e,
            }
            .into()
        })
    }
}

async fn download(url: &str) -> Result<Vec<u8>, reqwest::Error> {
    let response = reqwest::get(url).await?.error_for_status()?;
    Ok(response.bytes().await?.to_vec())
}
