// ==========================================
// 题库导入引擎 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::builder_config::BuilderConfig;
use crate::domain::types::DifficultyLevel;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 导入模块所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 题目构建配置 =====

    /// 获取允许的知识点列表
    ///
    /// # 默认值
    /// - DEFAULT_TOPICS
    async fn get_allowed_topics(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// 获取允许的难度列表
    ///
    /// # 默认值
    /// - EASY, MEDIUM, HARD, EXPERT
    async fn get_allowed_difficulties(&self) -> Result<Vec<DifficultyLevel>, Box<dyn Error>>;

    /// 获取默认分值
    ///
    /// # 默认值
    /// - 10
    async fn get_default_points(&self) -> Result<u32, Box<dyn Error>>;

    /// 是否对选项不足的选择题收紧审核
    ///
    /// # 默认值
    /// - false
    async fn get_strict_choice_review(&self) -> Result<bool, Box<dyn Error>>;

    // ===== 提交配置 =====

    /// 获取单条提交超时（毫秒）
    ///
    /// # 默认值
    /// - 5000
    async fn get_commit_timeout_ms(&self) -> Result<u64, Box<dyn Error>>;

    /// 汇总为 BuilderConfig 快照
    async fn load_builder_config(&self) -> Result<BuilderConfig, Box<dyn Error>> {
        let allowed_topics = self.get_allowed_topics().await?;
        let allowed_difficulties = self.get_allowed_difficulties().await?;
        let default_points = self.get_default_points().await?;
        let strict_choice_review = self.get_strict_choice_review().await?;

        Ok(BuilderConfig {
            allowed_topics,
            allowed_difficulties,
            default_points,
            strict_choice_review,
        })
    }
}
