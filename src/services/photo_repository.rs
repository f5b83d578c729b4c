//! 相册存储 - 业务能力层
//!
//! 相册保存在单个 JSON 文件中，每次增删都是整份文档的读-改-写。
//! 没有文件锁：两个进程同时写会互相覆盖，后写者生效。

use std::path::{Path, PathBuf};

use chrono::Datelike;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, FileError, ValidationError};
use crate::models::{AlbumDocument, Photo, PhotoDraft};

/// 内置的四张默认照片
const DEFAULT_ALBUM_JSON: &str = include_str!("../../assets/default_photos.json");

/// 每张照片最多的分类数
pub const MAX_PHOTO_TYPES: usize = 2;

/// 最早可选的拍摄年份
pub const MIN_PHOTO_YEAR: i32 = 1900;

/// 内置默认相册
pub fn default_album() -> AppResult<AlbumDocument> {
    serde_json::from_str(DEFAULT_ALBUM_JSON)
        .map_err(|e| AppError::json_parse_failed("<default_photos.json>", e))
}

/// 今年
pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

/// 校验表单并生成待保存的照片（ID 由调用方分配）
pub fn validate_draft(draft: PhotoDraft, id: u64, current_year: i32) -> Result<Photo, ValidationError> {
    let name = draft.name.trim().to_string();
    let url = draft.url.trim().to_string();

    if name.is_empty() || url.is_empty() || draft.types.is_empty() {
        return Err(ValidationError::MissingPhotoFields);
    }

    let mut types = Vec::with_capacity(draft.types.len());
    for t in draft.types {
        if !types.contains(&t) {
            types.push(t);
        }
    }
    if types.len() > MAX_PHOTO_TYPES {
        return Err(ValidationError::TooManyPhotoTypes {
            max: MAX_PHOTO_TYPES,
        });
    }

    if !(MIN_PHOTO_YEAR..=current_year).contains(&draft.year) {
        return Err(ValidationError::YearOutOfRange {
            year: draft.year,
            min: MIN_PHOTO_YEAR,
            max: current_year,
        });
    }

    Ok(Photo {
        id,
        name,
        types,
        year: draft.year,
        url,
    })
}

/// 相册存储抽象
///
/// 所有文件读写只经过 `load` / `save` / `reset` 三个入口。
pub trait PhotoRepository {
    /// 读取相册；文档不存在时返回内置默认相册（不落盘）
    fn load(&self) -> AppResult<AlbumDocument>;

    /// 整份覆盖保存
    fn save(&self, album: &AlbumDocument) -> AppResult<()>;

    /// 删除持久化文档，下次读取回到默认相册
    fn reset(&self) -> AppResult<()>;

    /// 校验后追加一张照片，ID 为现有最大 ID + 1
    ///
    /// 校验失败时不读写文件
    fn add(&self, draft: PhotoDraft) -> AppResult<Photo> {
        // 先做不依赖 ID 的校验，失败时不触碰文件
        validate_draft(draft.clone(), 0, current_year())?;

        let mut album = self.load()?;
        let photo = validate_draft(draft, album.next_id(), current_year())?;
        album.photos.push(photo.clone());
        self.save(&album)?;

        info!("📸 已添加照片 #{}: {}", photo.id, photo.name);
        Ok(photo)
    }

    /// 按 ID 删除，返回是否真的删除了照片；其余照片顺序不变
    fn delete(&self, id: u64) -> AppResult<bool> {
        let mut album = self.load()?;
        let before = album.photos.len();
        album.photos.retain(|p| p.id != id);

        if album.photos.len() == before {
            debug!("照片 #{} 不存在，不做修改", id);
            return Ok(false);
        }

        self.save(&album)?;
        info!("🗑️ 已删除照片 #{}", id);
        Ok(true)
    }
}

/// JSON 文件存储
pub struct JsonPhotoRepository {
    path: PathBuf,
}

impl JsonPhotoRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn path_str(&self) -> String {
        self.path.display().to_string()
    }
}

impl PhotoRepository for JsonPhotoRepository {
    fn load(&self) -> AppResult<AlbumDocument> {
        if !self.path.exists() {
            debug!("{} 不存在，使用默认相册", self.path_str());
            return default_album();
        }

        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| AppError::file_read_failed(self.path_str(), e))?;
        serde_json::from_str(&content).map_err(|e| AppError::json_parse_failed(self.path_str(), e))
    }

    fn save(&self, album: &AlbumDocument) -> AppResult<()> {
        // 四空格缩进，保留非 ASCII 字符
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        album
            .serialize(&mut serializer)
            .map_err(|e| AppError::json_parse_failed(self.path_str(), e))?;

        std::fs::write(&self.path, buf).map_err(|e| AppError::file_write_failed(self.path_str(), e))
    }

    fn reset(&self) -> AppResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path).map_err(|source| {
                AppError::File(FileError::DeleteFailed {
                    path: self.path_str(),
                    source,
                })
            })?;
            info!("🔄 相册已重置: {}", self.path_str());
        }
        Ok(())
    }
}
