use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AppError, AppResult, ConfigError, FileError};
use crate::models::Difficulty;

/// 宪法问答可选的模型
pub const RAG_MODEL_CHOICES: [&str; 2] = ["gpt-4o-mini", "gpt-3.5-turbo-0125"];

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "classroom.toml";

/// 程序配置文件
///
/// 加载顺序：默认值 → TOML 配置文件 → 环境变量
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    // --- LLM 配置 ---
    /// 为空时只有相册应用可用
    pub openai_api_key: String,
    pub openai_api_base: String,
    /// 出题、提示、评价使用的模型
    pub exam_model: String,
    /// 自由提问使用的模型
    pub free_chat_model: String,
    /// 宪法问答使用的模型
    pub rag_model: String,
    pub embedding_model: String,
    // --- 考试应用 ---
    pub default_num_questions: usize,
    pub default_difficulty: Difficulty,
    /// 提示和评价时附带的原文字符数上限
    pub context_char_limit: usize,
    /// 题库导出文件
    pub problem_bank_export_file: String,
    // --- 宪法问答 ---
    pub constitution_pdf: String,
    /// 向量索引目录
    pub vector_store_dir: String,
    pub retriever_top_k: usize,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    // --- 相册 ---
    pub photos_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: String::new(),
            openai_api_base: "https://api.openai.com/v1".to_string(),
            exam_model: "gpt-4.1".to_string(),
            free_chat_model: "gpt-4o".to_string(),
            rag_model: RAG_MODEL_CHOICES[0].to_string(),
            embedding_model: "text-embedding-3-small".to_string(),
            default_num_questions: 10,
            default_difficulty: Difficulty::Medium,
            context_char_limit: 3000,
            problem_bank_export_file: "problem_bank.json".to_string(),
            constitution_pdf: "../data/대한민국헌법(헌법)(제00010호)(19880225).pdf".to_string(),
            vector_store_dir: "./vector_db".to_string(),
            retriever_top_k: 4,
            chunk_size: 1000,
            chunk_overlap: 0,
            photos_file: "photos.json".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 按默认值 → 配置文件 → 环境变量的顺序加载
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("CLASSROOM_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let base = if path.exists() {
            info!("📄 读取配置文件: {}", path.display());
            Self::from_toml_file(&path)?
        } else {
            debug!("未找到配置文件 {}，使用默认配置", path.display());
            Self::default()
        };

        Ok(base.overlay_env(|key| std::env::var(key).ok()))
    }

    /// 只使用默认值和环境变量
    pub fn from_env() -> Self {
        Self::default().overlay_env(|key| std::env::var(key).ok())
    }

    /// 从 TOML 文件加载，缺省字段取默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|source| {
            AppError::File(FileError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖；数值或布尔值解析失败时保留原值
    pub fn overlay_env<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let prev = self;
        Self {
            openai_api_key: lookup("OPENAI_API_KEY").unwrap_or(prev.openai_api_key),
            openai_api_base: lookup("OPENAI_API_BASE").unwrap_or(prev.openai_api_base),
            exam_model: lookup("EXAM_MODEL").unwrap_or(prev.exam_model),
            free_chat_model: lookup("FREE_CHAT_MODEL").unwrap_or(prev.free_chat_model),
            rag_model: lookup("RAG_MODEL").unwrap_or(prev.rag_model),
            embedding_model: lookup("EMBEDDING_MODEL").unwrap_or(prev.embedding_model),
            constitution_pdf: lookup("CONSTITUTION_PDF").unwrap_or(prev.constitution_pdf),
            vector_store_dir: lookup("VECTOR_STORE_DIR").unwrap_or(prev.vector_store_dir),
            photos_file: lookup("PHOTOS_FILE").unwrap_or(prev.photos_file),
            verbose_logging: lookup("VERBOSE_LOGGING")
                .and_then(|v| v.parse().ok())
                .unwrap_or(prev.verbose_logging),
            ..prev
        }
    }

    /// 校验并选择宪法问答模型
    pub fn select_rag_model(&self, choice: Option<&str>) -> AppResult<String> {
        let model = choice.unwrap_or(&self.rag_model);
        if RAG_MODEL_CHOICES.contains(&model) {
            Ok(model.to_string())
        } else {
            Err(ConfigError::UnknownModel {
                model: model.to_string(),
                choices: RAG_MODEL_CHOICES.join(", "),
            }
            .into())
        }
    }
}
