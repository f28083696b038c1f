// ==========================================
// 题库导入引擎 - 配置层
// ==========================================
// 职责: 题目构建配置与提交参数
// 存储: config_kv 表
// ==========================================

pub mod builder_config;
pub mod config_manager;
pub mod import_config_trait;

// 重导出核心配置类型
pub use builder_config::{BuilderConfig, DEFAULT_POINTS, DEFAULT_TOPIC, DEFAULT_TOPICS};
pub use config_manager::{config_keys, ConfigManager, DEFAULT_COMMIT_TIMEOUT_MS};
pub use import_config_trait::ImportConfigReader;
