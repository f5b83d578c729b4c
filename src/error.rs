use thiserror::Error;

/// 应用程序错误类型
///
/// Display 文本直接展示给终端用户，所以使用韩语提示。
#[derive(Debug, Error)]
pub enum AppError {
    /// 文档读取错误（PDF 损坏、下载失败）
    #[error("문서 처리 오류: {0}")]
    Ingest(#[from] IngestError),
    /// LLM 服务错误
    #[error("AI 서비스 오류: {0}")]
    Llm(#[from] LlmError),
    /// 输入校验错误
    #[error("{0}")]
    Validation(#[from] ValidationError),
    /// 考试会话状态错误
    #[error("{0}")]
    Session(#[from] SessionError),
    /// 文件操作错误
    #[error("파일 오류: {0}")]
    File(#[from] FileError),
    /// 配置错误
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
}

/// 文档读取错误
#[derive(Debug, Error)]
pub enum IngestError {
    /// 读取本地文件失败
    #[error("파일을 읽을 수 없습니다 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 下载远程文件失败
    #[error("파일을 내려받을 수 없습니다 ({url}): {source}")]
    DownloadFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 不是 PDF 字节流
    #[error("PDF 파일이 아닙니다")]
    NotPdf,
    /// PDF 结构损坏
    #[error("PDF를 해석할 수 없습니다: {0}")]
    MalformedPdf(#[from] lopdf::Error),
}

/// LLM 服务错误
#[derive(Debug, Error)]
pub enum LlmError {
    /// API 调用失败
    #[error("API 호출 실패 (모델: {model}): {source}")]
    ApiCallFailed {
        model: String,
        #[source]
        source: async_openai::error::OpenAIError,
    },
    /// 请求构建失败
    #[error("요청을 만들 수 없습니다: {0}")]
    RequestBuild(#[source] async_openai::error::OpenAIError),
    /// 返回内容为空
    #[error("모델 응답이 비어 있습니다 (모델: {model})")]
    EmptyResponse { model: String },
    /// 嵌入向量数量与输入不一致
    #[error("임베딩 개수가 맞지 않습니다: 입력 {expected}개, 응답 {actual}개")]
    EmbeddingCountMismatch { expected: usize, actual: usize },
}

/// 输入校验错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// 照片表单缺少必填项
    #[error("모든 필드를 채워주세요.")]
    MissingPhotoFields,
    /// 照片分类超过上限
    #[error("사진 종류는 최대 {max}개까지 선택할 수 있습니다.")]
    TooManyPhotoTypes { max: usize },
    /// 未知的照片分类
    #[error("알 수 없는 사진 종류입니다: {0}")]
    UnknownPhotoType(String),
    /// 拍摄年份超出范围
    #[error("촬영 연도는 {min}년부터 {max}년 사이여야 합니다: {year}")]
    YearOutOfRange { year: i32, min: i32, max: i32 },
    /// 题目数量不在可选范围内
    #[error("문제 개수는 5, 10, 15, 20 중에서 선택해야 합니다: {0}")]
    UnsupportedQuestionCount(usize),
    /// 未知难度
    #[error("난이도는 하, 중, 상 중 하나여야 합니다: {0}")]
    UnknownDifficulty(String),
    /// 答案为空
    #[error("답안을 입력해주세요.")]
    EmptyAnswer,
    /// 提问为空
    #[error("질문을 입력해주세요.")]
    EmptyQuestion,
    /// 需要数字的地方输入了别的内容
    #[error("숫자를 입력해주세요: {0}")]
    InvalidNumber(String),
    /// 未知命令
    #[error("알 수 없는 명령입니다: {0} (:help 로 도움말을 볼 수 있습니다)")]
    UnknownCommand(String),
}

/// 考试会话状态错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// 题目尚未生成
    #[error("아직 문제가 생성되지 않았습니다.")]
    NotReady,
    /// 会话已开始，不能重新生成或修改设置
    #[error("이미 시험이 진행 중입니다. 새로운 시험을 시작하려면 초기화하세요.")]
    AlreadyReady,
    /// 当前题目尚未评价，不能前进
    #[error("{number}번 문제의 평가가 끝나야 다음 문제로 넘어갈 수 있습니다.")]
    NotEvaluated { number: usize },
    /// 已经是第一题
    #[error("첫 번째 문제입니다.")]
    AtFirstQuestion,
    /// 已经是最后一题
    #[error("마지막 문제입니다.")]
    AtLastQuestion,
    /// 题目已评价，不能再次提交
    #[error("{number}번 문제는 이미 평가되었습니다.")]
    AlreadyEvaluated { number: usize },
    /// 还有未评价的题目
    #[error("아직 평가되지 않은 문제가 {remaining}개 있습니다.")]
    ResultsUnavailable { remaining: usize },
    /// 索引超出范围（`number` 从 1 开始）
    #[error("{number}번은 범위를 벗어났습니다 (총 {len}개)")]
    IndexOutOfRange { number: usize, len: usize },
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 读取文件失败
    #[error("읽기 실패 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("쓰기 실패 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 删除文件失败
    #[error("삭제 실패 ({path}): {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// JSON 解析失败
    #[error("JSON 해석 실패 ({path}): {source}")]
    JsonParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// TOML 解析失败
    #[error("TOML 해석 실패 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// 配置错误
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// 缺少 API 密钥
    #[error("API 키가 설정되지 않았습니다 (OPENAI_API_KEY)")]
    MissingApiKey,
    /// 不支持的模型
    #[error("지원하지 않는 모델입니다: {model} (선택 가능: {choices})")]
    UnknownModel { model: String, choices: String },
}

// ========== 从常见错误类型转换 ==========

impl From<async_openai::error::OpenAIError> for AppError {
    fn from(err: async_openai::error::OpenAIError) -> Self {
        AppError::Llm(LlmError::RequestBuild(err))
    }
}

impl From<lopdf::Error> for AppError {
    fn from(err: lopdf::Error) -> Self {
        AppError::Ingest(IngestError::MalformedPdf(err))
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: async_openai::error::OpenAIError,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source,
        })
    }

    /// 创建文件读取错误
    pub fn file_read_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(path: impl Into<String>, source: std::io::Error) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source,
        })
    }

    /// 创建 JSON 解析错误
    pub fn json_parse_failed(path: impl Into<String>, source: serde_json::Error) -> Self {
        AppError::File(FileError::JsonParseFailed {
            path: path.into(),
            source,
        })
    }

    /// 是否为用户输入问题（提示后继续，而不是中止当前操作）
    pub fn is_user_facing(&self) -> bool {
        matches!(self, AppError::Validation(_) | AppError::Session(_))
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
