// ==========================================
// 题库导入引擎 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、写入
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::builder_config::{DEFAULT_POINTS, DEFAULT_TOPICS};
use crate::config::import_config_trait::ImportConfigReader;
use crate::db::open_sqlite_connection;
use crate::domain::types::DifficultyLevel;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// 单条提交超时默认值（毫秒）
pub const DEFAULT_COMMIT_TIMEOUT_MS: u64 = 5_000;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::init_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::init_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 读取配置值，带默认值
    fn get_config_or_default(&self, key: &str, default: &str) -> Result<String, Box<dyn Error>> {
        Ok(self.get_config_value(key)?.unwrap_or_else(|| default.to_string()))
    }

    /// 写入 global scope 配置（UPSERT）
    pub fn set_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 获取所有 global 配置
    pub fn list_configs(&self) -> Result<HashMap<String, String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut configs = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            configs.insert(key, value);
        }
        Ok(configs)
    }
}

/// 逗号分隔列表（忽略空项）
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    async fn get_allowed_topics(&self) -> Result<Vec<String>, Box<dyn Error>> {
        match self.get_config_value(config_keys::ALLOWED_TOPICS)? {
            // 显式配置为空字符串即表示不允许任何知识点
            Some(value) => Ok(split_list(&value)),
            None => Ok(DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()),
        }
    }

    async fn get_allowed_difficulties(&self) -> Result<Vec<DifficultyLevel>, Box<dyn Error>> {
        match self.get_config_value(config_keys::ALLOWED_DIFFICULTIES)? {
            Some(value) => Ok(split_list(&value)
                .iter()
                .filter_map(|s| DifficultyLevel::parse_lenient(s))
                .collect()),
            None => Ok(DifficultyLevel::ALL.to_vec()),
        }
    }

    async fn get_default_points(&self) -> Result<u32, Box<dyn Error>> {
        let value =
            self.get_config_or_default(config_keys::DEFAULT_POINTS, &DEFAULT_POINTS.to_string())?;
        Ok(value.trim().parse::<u32>().unwrap_or(DEFAULT_POINTS))
    }

    async fn get_strict_choice_review(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_or_default(config_keys::STRICT_CHOICE_REVIEW, "false")?;
        Ok(matches!(
            value.trim().to_lowercase().as_str(),
            "true" | "1" | "yes" | "on"
        ))
    }

    async fn get_commit_timeout_ms(&self) -> Result<u64, Box<dyn Error>> {
        let value = self.get_config_or_default(
            config_keys::COMMIT_TIMEOUT_MS,
            &DEFAULT_COMMIT_TIMEOUT_MS.to_string(),
        )?;
        Ok(value
            .trim()
            .parse::<u64>()
            .ok()
            .filter(|&ms| ms > 0)
            .unwrap_or(DEFAULT_COMMIT_TIMEOUT_MS))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 题目构建
    pub const ALLOWED_TOPICS: &str = "import/allowed_topics"; // 逗号分隔
    pub const ALLOWED_DIFFICULTIES: &str = "import/allowed_difficulties"; // 逗号分隔
    pub const DEFAULT_POINTS: &str = "import/default_points";
    pub const STRICT_CHOICE_REVIEW: &str = "import/strict_choice_review";

    // 提交
    pub const COMMIT_TIMEOUT_MS: &str = "import/commit_timeout_ms";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::builder_config::BuilderConfig;
    use tempfile::NamedTempFile;

    fn setup() -> (NamedTempFile, ConfigManager) {
        let temp_file = NamedTempFile::new().unwrap();
        let manager = ConfigManager::new(temp_file.path().to_str().unwrap()).unwrap();
        (temp_file, manager)
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let (_tmp, manager) = setup();

        let config = manager.load_builder_config().await.unwrap();
        assert_eq!(config, BuilderConfig::default());
        assert_eq!(
            manager.get_commit_timeout_ms().await.unwrap(),
            DEFAULT_COMMIT_TIMEOUT_MS
        );
    }

    #[tokio::test]
    async fn test_overrides_are_read() {
        let (_tmp, manager) = setup();
        manager
            .set_config_value(config_keys::ALLOWED_TOPICS, "Algebra, Geometry")
            .unwrap();
        manager
            .set_config_value(config_keys::ALLOWED_DIFFICULTIES, "EASY,hard,bogus")
            .unwrap();
        manager
            .set_config_value(config_keys::DEFAULT_POINTS, "not-a-number")
            .unwrap();
        manager
            .set_config_value(config_keys::STRICT_CHOICE_REVIEW, "yes")
            .unwrap();

        let config = manager.load_builder_config().await.unwrap();
        assert_eq!(config.allowed_topics, vec!["Algebra", "Geometry"]);
        assert_eq!(
            config.allowed_difficulties,
            vec![DifficultyLevel::Easy, DifficultyLevel::Hard]
        );
        assert_eq!(config.default_points, DEFAULT_POINTS);
        assert!(config.strict_choice_review);
    }

    #[tokio::test]
    async fn test_set_config_is_upsert() {
        let (_tmp, manager) = setup();
        manager.set_config_value(config_keys::COMMIT_TIMEOUT_MS, "100").unwrap();
        manager.set_config_value(config_keys::COMMIT_TIMEOUT_MS, "250").unwrap();

        assert_eq!(manager.get_commit_timeout_ms().await.unwrap(), 250);
        assert_eq!(manager.list_configs().unwrap().len(), 1);
    }
}
