// ==========================================
// 题库导入引擎 - 领域类型定义
// ==========================================
// 职责: 题型 / 难度 / 审核状态 / 规范字段键
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 题型 (Question Type)
// ==========================================
// 封闭枚举: 所有解析器的输出必须落在此集合内
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestionType {
    McqSingle, // 单选
    McqMulti,  // 多选
    TrueFalse, // 判断
    FillBlank, // 填空
    Short,     // 简答
    Essay,     // 论述
    Rating,    // 评分
    Matching,  // 连线
    Ordering,  // 排序
    Matrix,    // 矩阵
}

impl QuestionType {
    pub const ALL: [QuestionType; 10] = [
        QuestionType::McqSingle,
        QuestionType::McqMulti,
        QuestionType::TrueFalse,
        QuestionType::FillBlank,
        QuestionType::Short,
        QuestionType::Essay,
        QuestionType::Rating,
        QuestionType::Matching,
        QuestionType::Ordering,
        QuestionType::Matrix,
    ];

    /// 数据库/导出使用的规范字符串
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::McqSingle => "MCQ_SINGLE",
            QuestionType::McqMulti => "MCQ_MULTI",
            QuestionType::TrueFalse => "TRUE_FALSE",
            QuestionType::FillBlank => "FILL_BLANK",
            QuestionType::Short => "SHORT",
            QuestionType::Essay => "ESSAY",
            QuestionType::Rating => "RATING",
            QuestionType::Matching => "MATCHING",
            QuestionType::Ordering => "ORDERING",
            QuestionType::Matrix => "MATRIX",
        }
    }

    /// 从规范字符串还原（仅接受 as_str 的输出）
    pub fn from_db_str(raw: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.as_str() == raw.trim())
    }

    /// 是否为选择题（payload 携带 options）
    pub fn is_choice(&self) -> bool {
        matches!(self, QuestionType::McqSingle | QuestionType::McqMulti)
    }

    /// 是否需要下游人工编写 payload（无法自动派生）
    pub fn requires_manual_authoring(&self) -> bool {
        matches!(
            self,
            QuestionType::Matching | QuestionType::Ordering | QuestionType::Matrix
        )
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 难度等级 (Difficulty Level)
// ==========================================
// 规则: 集合外的值一律回落为 Medium
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DifficultyLevel {
    Easy,
    #[default]
    Medium,
    Hard,
    Expert,
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 4] = [
        DifficultyLevel::Easy,
        DifficultyLevel::Medium,
        DifficultyLevel::Hard,
        DifficultyLevel::Expert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLevel::Easy => "EASY",
            DifficultyLevel::Medium => "MEDIUM",
            DifficultyLevel::Hard => "HARD",
            DifficultyLevel::Expert => "EXPERT",
        }
    }

    /// 宽松解析：全称（大小写不敏感）或单字母缩写 E/M/H/X
    ///
    /// # 返回
    /// - Some(level): 可识别
    /// - None: 不可识别（由调用方决定默认值）
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "easy" | "e" => Some(DifficultyLevel::Easy),
            "medium" | "m" => Some(DifficultyLevel::Medium),
            "hard" | "h" => Some(DifficultyLevel::Hard),
            "expert" | "x" => Some(DifficultyLevel::Expert),
            _ => None,
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 审核状态 (Review Status)
// ==========================================
// NeedsReview 不是错误: 仅提示前端高亮，不阻断提交
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    #[default]
    Ok,
    NeedsReview,
}

impl fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReviewStatus::Ok => write!(f, "OK"),
            ReviewStatus::NeedsReview => write!(f, "NEEDS_REVIEW"),
        }
    }
}

// ==========================================
// 规范字段键 (Canonical Field Key)
// ==========================================
// 所有解析器都归一到这组键上
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FieldKey {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "optA")]
    OptA,
    #[serde(rename = "optB")]
    OptB,
    #[serde(rename = "optC")]
    OptC,
    #[serde(rename = "optD")]
    OptD,
    #[serde(rename = "optE")]
    OptE,
    #[serde(rename = "correct")]
    Correct,
    #[serde(rename = "type")]
    Type,
    #[serde(rename = "difficulty")]
    Difficulty,
    #[serde(rename = "topic")]
    Topic,
    #[serde(rename = "points")]
    Points,
    #[serde(rename = "explanation")]
    Explanation,
}

impl FieldKey {
    /// 选项槽位（按 A..E 顺序）
    pub const OPTIONS: [FieldKey; 5] = [
        FieldKey::OptA,
        FieldKey::OptB,
        FieldKey::OptC,
        FieldKey::OptD,
        FieldKey::OptE,
    ];

    /// 按 0 起始下标取选项槽位，超过 E 返回 None
    pub fn option_slot(index: usize) -> Option<FieldKey> {
        Self::OPTIONS.get(index).copied()
    }

    /// 按选项字母（A-E，大小写不敏感）取槽位
    pub fn option_for_letter(letter: char) -> Option<FieldKey> {
        let upper = letter.to_ascii_uppercase();
        if ('A'..='E').contains(&upper) {
            Self::option_slot((upper as u8 - b'A') as usize)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKey::Text => "text",
            FieldKey::OptA => "optA",
            FieldKey::OptB => "optB",
            FieldKey::OptC => "optC",
            FieldKey::OptD => "optD",
            FieldKey::OptE => "optE",
            FieldKey::Correct => "correct",
            FieldKey::Type => "type",
            FieldKey::Difficulty => "difficulty",
            FieldKey::Topic => "topic",
            FieldKey::Points => "points",
            FieldKey::Explanation => "explanation",
        }
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_db_roundtrip() {
        for t in QuestionType::ALL {
            assert_eq!(QuestionType::from_db_str(t.as_str()), Some(t));
        }
        assert_eq!(QuestionType::from_db_str("UNKNOWN"), None);
    }

    #[test]
    fn test_manual_authoring_types() {
        assert!(QuestionType::Matching.requires_manual_authoring());
        assert!(QuestionType::Ordering.requires_manual_authoring());
        assert!(QuestionType::Matrix.requires_manual_authoring());
        assert!(!QuestionType::Essay.requires_manual_authoring());
    }

    #[test]
    fn test_difficulty_abbreviations() {
        assert_eq!(DifficultyLevel::parse_lenient("E"), Some(DifficultyLevel::Easy));
        assert_eq!(DifficultyLevel::parse_lenient("h"), Some(DifficultyLevel::Hard));
        assert_eq!(DifficultyLevel::parse_lenient("X"), Some(DifficultyLevel::Expert));
        assert_eq!(DifficultyLevel::parse_lenient(" Expert "), Some(DifficultyLevel::Expert));
        assert_eq!(DifficultyLevel::parse_lenient("impossible"), None);
        assert_eq!(DifficultyLevel::default(), DifficultyLevel::Medium);
    }

    #[test]
    fn test_option_slots() {
        assert_eq!(FieldKey::option_slot(0), Some(FieldKey::OptA));
        assert_eq!(FieldKey::option_slot(4), Some(FieldKey::OptE));
        assert_eq!(FieldKey::option_slot(5), None);
        assert_eq!(FieldKey::option_for_letter('c'), Some(FieldKey::OptC));
        assert_eq!(FieldKey::option_for_letter('F'), None);
    }
}
