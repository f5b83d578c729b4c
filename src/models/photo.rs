use serde::{Deserialize, Serialize};

/// 照片分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PhotoType {
    /// 人物
    #[serde(rename = "인물")]
    Portrait,
    /// 风景
    #[serde(rename = "풍경")]
    Landscape,
    /// 旅行
    #[serde(rename = "여행")]
    Travel,
    /// 微距
    #[serde(rename = "접사")]
    Macro,
    /// 时尚
    #[serde(rename = "패션")]
    Fashion,
    /// 美食
    #[serde(rename = "음식")]
    Food,
    /// 街景
    #[serde(rename = "거리")]
    Street,
    /// 运动
    #[serde(rename = "스포츠")]
    Sports,
    /// 明星
    #[serde(rename = "연예인")]
    Celebrity,
    /// 其他
    #[serde(rename = "기타")]
    Other,
}

impl PhotoType {
    /// 表单中的选项顺序
    pub const ALL: [PhotoType; 10] = [
        PhotoType::Portrait,
        PhotoType::Landscape,
        PhotoType::Travel,
        PhotoType::Macro,
        PhotoType::Fashion,
        PhotoType::Food,
        PhotoType::Street,
        PhotoType::Sports,
        PhotoType::Celebrity,
        PhotoType::Other,
    ];

    /// 获取标准名称
    pub fn label(self) -> &'static str {
        match self {
            PhotoType::Portrait => "인물",
            PhotoType::Landscape => "풍경",
            PhotoType::Travel => "여행",
            PhotoType::Macro => "접사",
            PhotoType::Fashion => "패션",
            PhotoType::Food => "음식",
            PhotoType::Street => "거리",
            PhotoType::Sports => "스포츠",
            PhotoType::Celebrity => "연예인",
            PhotoType::Other => "기타",
        }
    }

    /// 从标签精确解析
    pub fn from_label(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|t| t.label() == s)
    }
}

impl std::fmt::Display for PhotoType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 单张照片记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub name: String,
    pub types: Vec<PhotoType>,
    pub year: i32,
    /// 远程链接或 data URL
    pub url: String,
}

/// 相册 JSON 文档，顶层只有一个 `photos` 键
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AlbumDocument {
    pub photos: Vec<Photo>,
}

impl AlbumDocument {
    /// 下一个可用 ID：现有最大 ID + 1，空相册为 1
    pub fn next_id(&self) -> u64 {
        self.photos.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }
}

/// 添加照片的表单草稿，字段在提交时才校验
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhotoDraft {
    pub name: String,
    pub types: Vec<PhotoType>,
    pub year: i32,
    pub url: String,
}

/// 自动填充用的示例照片
pub const EXAMPLE_PHOTO_NAME: &str = "아름다운 자연 풍경";
pub const EXAMPLE_PHOTO_URL: &str = "https://i.namu.wiki/i/VBoCHB3kYoTDQqh6X-bNiMhnul9HYeCB0P1nCMP7aU5AxlDns4mbLNS0YHHOC3vxOMN86Ma0FEFo_WcNL6qvMg.webp";

impl PhotoDraft {
    /// 空白表单，年份默认为今年
    pub fn blank(current_year: i32) -> Self {
        Self {
            year: current_year,
            ..Default::default()
        }
    }

    /// 示例照片自动填充
    pub fn example(current_year: i32) -> Self {
        Self {
            name: EXAMPLE_PHOTO_NAME.to_string(),
            types: vec![PhotoType::Landscape],
            year: current_year,
            url: EXAMPLE_PHOTO_URL.to_string(),
        }
    }
}
