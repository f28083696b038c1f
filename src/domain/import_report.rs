// ==========================================
// 题库导入引擎 - 导入报告
// ==========================================
// 职责: 解析汇总 / 提交汇总（面向用户的统计口径）
// ==========================================

use crate::domain::question::{ParsedQuestion, StoredQuestion};
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 识别出的输入格式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectedFormat {
    Json,
    StructuredDelimited,   // 带表头的 CSV/TSV
    UnstructuredDelimited, // 无表头的 CSV/TSV
    PlainText,
}

impl fmt::Display for DetectedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectedFormat::Json => write!(f, "JSON"),
            DetectedFormat::StructuredDelimited => write!(f, "STRUCTURED_DELIMITED"),
            DetectedFormat::UnstructuredDelimited => write!(f, "UNSTRUCTURED_DELIMITED"),
            DetectedFormat::PlainText => write!(f, "PLAIN_TEXT"),
        }
    }
}

// ==========================================
// ImportSummary - 解析汇总
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total: usize,
    pub ready: usize,        // status = Ok
    pub needs_review: usize, // status = NeedsReview
    pub dropped: usize,      // 题干为空被丢弃的候选记录数
}

impl ImportSummary {
    pub fn from_questions(questions: &[ParsedQuestion], dropped: usize) -> Self {
        let needs_review = questions.iter().filter(|q| q.needs_review()).count();
        Self {
            total: questions.len(),
            ready: questions.len() - needs_review,
            needs_review,
            dropped,
        }
    }
}

// ==========================================
// CommitFailure - 单条提交失败
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitFailure {
    /// 在审核列表中的位置（0 起始）
    pub index: usize,
    pub text_prefix: String,
    pub reason: String,
}

// ==========================================
// CommitReport - 提交汇总
// ==========================================
// 顺序与提交顺序一致
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommitReport {
    pub created: Vec<StoredQuestion>,
    pub failures: Vec<CommitFailure>,
}

impl CommitReport {
    pub fn created_count(&self) -> usize {
        self.created.len()
    }

    pub fn failed_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }
}
