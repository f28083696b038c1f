// ==========================================
// 题库导入引擎 - 题目构建配置
// ==========================================
// 职责: Question Builder 所需的显式配置（非全局状态）
// 来源: ConfigManager 快照 / 默认值
// ==========================================

use crate::domain::types::DifficultyLevel;
use serde::{Deserialize, Serialize};

/// 未命中允许列表时使用的知识点
pub const DEFAULT_TOPIC: &str = "General";

/// 分值缺失或非数字时的默认值
pub const DEFAULT_POINTS: u32 = 10;

/// 默认允许的知识点列表
pub const DEFAULT_TOPICS: [&str; 10] = [
    "General",
    "Mathematics",
    "Science",
    "English",
    "History",
    "Geography",
    "Computer Science",
    "Physics",
    "Chemistry",
    "Biology",
];

// ==========================================
// BuilderConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuilderConfig {
    /// 允许的知识点（大小写不敏感匹配，输出采用列表中的写法）
    /// 为空时一律回落为 "General"
    pub allowed_topics: Vec<String>,

    /// 允许的难度（为空时一律回落为 Medium）
    pub allowed_difficulties: Vec<DifficultyLevel>,

    pub default_points: u32,

    /// 收紧审核: 选项不足 2 个的选择题也标记为 NeedsReview
    pub strict_choice_review: bool,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            allowed_topics: DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
            allowed_difficulties: DifficultyLevel::ALL.to_vec(),
            default_points: DEFAULT_POINTS,
            strict_choice_review: false,
        }
    }
}

impl BuilderConfig {
    /// 按允许列表查找知识点，返回列表中的规范写法
    pub fn match_topic(&self, raw: &str) -> Option<&str> {
        let needle = raw.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.allowed_topics
            .iter()
            .find(|t| t.trim().to_lowercase() == needle)
            .map(String::as_str)
    }

    pub fn allows_difficulty(&self, level: DifficultyLevel) -> bool {
        self.allowed_difficulties.contains(&level)
    }
}
