use phf::phf_map;

/// 难度枚举
///
/// 序列化为界面上显示的韩语标签（하/중/상）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub enum Difficulty {
    /// 基础
    #[serde(rename = "하")]
    Low,
    /// 标准
    #[default]
    #[serde(rename = "중")]
    Medium,
    /// 深化
    #[serde(rename = "상")]
    High,
}

/// 标签到难度的映射，同时接受英文别名
static DIFFICULTY_LABELS: phf::Map<&'static str, Difficulty> = phf_map! {
    "하" => Difficulty::Low,
    "중" => Difficulty::Medium,
    "상" => Difficulty::High,
    "low" => Difficulty::Low,
    "easy" => Difficulty::Low,
    "medium" => Difficulty::Medium,
    "normal" => Difficulty::Medium,
    "high" => Difficulty::High,
    "hard" => Difficulty::High,
};

impl Difficulty {
    /// 全部难度，按从易到难排列
    pub const ALL: [Difficulty; 3] = [Difficulty::Low, Difficulty::Medium, Difficulty::High];

    /// 获取标签
    pub fn label(self) -> &'static str {
        match self {
            Difficulty::Low => "하",
            Difficulty::Medium => "중",
            Difficulty::High => "상",
        }
    }

    /// 出题提示词中的难度描述
    pub fn question_style(self) -> &'static str {
        match self {
            Difficulty::Low => {
                "기초적이고 단순한 사실 확인이 아니라, 반드시 학습자가 이해해야 할 핵심 내용을 묻는"
            }
            Difficulty::Medium => "이해력과 적용력을 요구하며, 학습자의 생각을 이끌어내는",
            Difficulty::High => "분석력과 종합적 사고, 그리고 비판적 관점을 요구하는",
        }
    }

    /// 评价提示词中的评分标准
    pub fn grading_criteria(self) -> &'static str {
        match self {
            Difficulty::Low => "기초적인 이해도 중심으로",
            Difficulty::Medium => "이해도와 적용력을 균형있게",
            Difficulty::High => "심화된 분석력과 비판적 사고를 중심으로",
        }
    }

    /// 侧边栏说明文字
    pub fn description(self) -> &'static str {
        match self {
            Difficulty::Low => "기초 문제",
            Difficulty::Medium => "표준 문제",
            Difficulty::High => "심화 문제",
        }
    }

    /// 从标签解析难度（忽略大小写和首尾空白）
    pub fn from_label(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        DIFFICULTY_LABELS.get(key.as_str()).copied()
    }
}

impl std::str::FromStr for Difficulty {
    type Err = crate::error::ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| crate::error::ValidationError::UnknownDifficulty(s.to_string()))
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
