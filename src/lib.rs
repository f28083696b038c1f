// ==========================================
// 题库导入引擎 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 自动识别格式的题目导入（解析 → 审核 → 提交）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "zh-CN");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 导入层 - 格式识别与解析
pub mod importer;

// 会话层 - 审核与提交
pub mod session;

// 数据仓储层 - 数据访问
pub mod repository;

// 配置层 - 导入配置
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{DifficultyLevel, FieldKey, QuestionType, ReviewStatus};

// 领域实体
pub use domain::{
    CommitFailure, CommitReport, DetectedFormat, ImportSummary, NewQuestion, ParsedQuestion,
    QuestionPayload, RawFieldMap, StoredQuestion,
};

// 导入管道
pub use importer::{detect_and_parse, detect_and_parse_with, DetectionReport, FormatDetector};

// 会话
pub use session::{ImportSession, ParseOutcome, SessionState};

// 配置
pub use config::BuilderConfig;

// API
pub use api::ImportApi;

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
