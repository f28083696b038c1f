// ==========================================
// 题库导入引擎 - 领域模型层
// ==========================================
// 职责: 定义题目实体、类型、导入报告
// 红线: 不含数据访问逻辑,不含解析逻辑
// ==========================================

pub mod import_report;
pub mod question;
pub mod types;

// 重导出核心类型
pub use import_report::{CommitFailure, CommitReport, DetectedFormat, ImportSummary};
pub use question::{NewQuestion, ParsedQuestion, QuestionPayload, RawFieldMap, StoredQuestion};
pub use types::{DifficultyLevel, FieldKey, QuestionType, ReviewStatus};
