// ==========================================
// 题库导入引擎 - 题目实体
// ==========================================
// 职责: 解析中间结构 (RawFieldMap) 与规范题目记录 (ParsedQuestion)
// 生命周期: Builder 创建 → 审核阶段编辑/排除 → 提交后不再保留
// ==========================================

use crate::domain::types::{DifficultyLevel, FieldKey, QuestionType, ReviewStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// RawFieldMap - 解析中间结构
// ==========================================
// 用途: 所有解析器的公共输出（规范字段键 → 字符串值）
// 约束: 空白值不入表，缺失即 None
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawFieldMap {
    fields: BTreeMap<FieldKey, String>,
}

impl RawFieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入字段（TRIM 后为空则移除该键）
    pub fn set(&mut self, key: FieldKey, value: impl AsRef<str>) {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            self.fields.remove(&key);
        } else {
            self.fields.insert(key, trimmed.to_string());
        }
    }

    /// 仅当字段尚未写入时写入
    pub fn set_if_absent(&mut self, key: FieldKey, value: impl AsRef<str>) {
        if !self.contains(key) {
            self.set(key, value);
        }
    }

    /// 链式写入，便于构造测试数据
    pub fn with(mut self, key: FieldKey, value: impl AsRef<str>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: FieldKey) -> Option<&str> {
        self.fields.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: FieldKey) -> bool {
        self.fields.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ==========================================
// QuestionPayload - 按题型区分的载荷
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestionPayload {
    SingleChoice {
        options: Vec<String>,
        correct_index: usize,
    },
    /// 仅派生出一个正确下标（历史行为，保持兼容）
    MultiChoice {
        options: Vec<String>,
        correct_indices: Vec<usize>,
    },
    TrueFalse {
        correct_answer: bool,
    },
    FillBlank {
        correct_answer: String,
        case_sensitive: bool,
    },
    Rating {
        scale: u8,
    },
    /// 简答/论述，以及需人工编写的连线/排序/矩阵
    Empty,
}

impl QuestionPayload {
    /// 单选下标，或多选的第一个下标
    pub fn correct_index(&self) -> Option<usize> {
        match self {
            QuestionPayload::SingleChoice { correct_index, .. } => Some(*correct_index),
            QuestionPayload::MultiChoice {
                correct_indices, ..
            } => correct_indices.first().copied(),
            _ => None,
        }
    }
}

fn default_included() -> bool {
    true
}

// ==========================================
// ParsedQuestion - 规范题目记录
// ==========================================
// 不变量: text 非空（TRIM 后）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedQuestion {
    pub text: String,
    pub question_type: QuestionType,
    pub difficulty: DifficultyLevel,
    pub topic: String,
    pub points: u32,
    pub explanation: String,
    pub payload: QuestionPayload,
    pub status: ReviewStatus,

    // 审核阶段临时字段（不落库）
    #[serde(default = "default_included")]
    pub included: bool,
}

impl ParsedQuestion {
    pub fn needs_review(&self) -> bool {
        self.status == ReviewStatus::NeedsReview
    }

    /// 截取题干前缀（按字符计数，用于失败报告）
    pub fn text_prefix(&self, max_chars: usize) -> String {
        text_prefix(&self.text, max_chars)
    }

    /// 转换为提交给持久化服务的记录（丢弃审核阶段字段）
    pub fn to_new_question(&self) -> NewQuestion {
        NewQuestion {
            text: self.text.clone(),
            question_type: self.question_type,
            difficulty: self.difficulty,
            topic: self.topic.clone(),
            points: self.points,
            explanation: self.explanation.clone(),
            payload: self.payload.clone(),
        }
    }
}

/// 按字符截断，超长时追加省略号
pub fn text_prefix(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let prefix: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}…", prefix)
    } else {
        prefix
    }
}

// ==========================================
// NewQuestion - 待创建记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewQuestion {
    pub text: String,
    pub question_type: QuestionType,
    pub difficulty: DifficultyLevel,
    pub topic: String,
    pub points: u32,
    pub explanation: String,
    pub payload: QuestionPayload,
}

// ==========================================
// StoredQuestion - 已落库记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQuestion {
    pub question_id: String,
    pub text: String,
    pub question_type: QuestionType,
    pub difficulty: DifficultyLevel,
    pub topic: String,
    pub points: u32,
    pub explanation: String,
    pub payload: QuestionPayload,
    pub created_at: DateTime<Utc>,
}
