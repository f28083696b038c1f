// ==========================================
// 题库导入引擎 - 题目仓储实现
// ==========================================
// 职责: 实现题目写入与查询（使用 rusqlite）
// 红线: Repository 不含业务规则，只做数据映射
// ==========================================

use crate::db::{init_schema, open_sqlite_connection};
use crate::domain::question::{NewQuestion, QuestionPayload, StoredQuestion};
use crate::domain::types::{DifficultyLevel, QuestionType};
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::question_repo::QuestionRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;
use uuid::Uuid;

// ==========================================
// QuestionRepositoryImpl
// ==========================================
pub struct QuestionRepositoryImpl {
    conn: Arc<Mutex<Connection>>,
}

impl QuestionRepositoryImpl {
    /// 打开数据库并建表
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        init_schema(&conn)?;
        Ok(Self::from_connection(Arc::new(Mutex::new(conn))))
    }

    /// 复用已有连接（调用方负责建表）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 同步写入（create_question 的实际实现）
    pub fn insert(&self, question: &NewQuestion) -> RepositoryResult<StoredQuestion> {
        if question.text.trim().is_empty() {
            return Err(RepositoryError::ValidationError(
                "题干不能为空".to_string(),
            ));
        }

        let stored = StoredQuestion {
            question_id: Uuid::new_v4().to_string(),
            text: question.text.clone(),
            question_type: question.question_type,
            difficulty: question.difficulty,
            topic: question.topic.clone(),
            points: question.points,
            explanation: question.explanation.clone(),
            payload: question.payload.clone(),
            created_at: Utc::now(),
        };
        let payload_json = serde_json::to_string(&stored.payload)?;

        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO question (
                question_id, text, question_type, difficulty, topic,
                points, explanation, payload_json, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                stored.question_id,
                stored.text,
                stored.question_type.as_str(),
                stored.difficulty.as_str(),
                stored.topic,
                stored.points,
                stored.explanation,
                payload_json,
                stored.created_at.to_rfc3339(),
            ],
        )?;

        debug!(question_id = %stored.question_id, "题目已写入");
        Ok(stored)
    }

    /// 题目总数
    pub fn count_questions(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM question", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// 按创建顺序列出题目
    pub fn list_questions(&self, limit: usize) -> RepositoryResult<Vec<StoredQuestion>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT question_id, text, question_type, difficulty, topic,
                   points, explanation, payload_json, created_at
            FROM question
            ORDER BY created_at ASC, rowid ASC
            LIMIT ?1
            "#,
        )?;

        let rows = stmt.query_map(params![limit as i64], RawRow::from_row)?;

        let mut questions = Vec::new();
        for row in rows {
            questions.push(row?.into_stored()?);
        }
        Ok(questions)
    }
}

#[async_trait]
impl QuestionRepository for QuestionRepositoryImpl {
    async fn create_question(&self, question: &NewQuestion) -> RepositoryResult<StoredQuestion> {
        self.insert(question)
    }
}

// ==========================================
// 行映射
// ==========================================
struct RawRow {
    question_id: String,
    text: String,
    question_type: String,
    difficulty: String,
    topic: String,
    points: u32,
    explanation: String,
    payload_json: String,
    created_at: String,
}

impl RawRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            question_id: row.get(0)?,
            text: row.get(1)?,
            question_type: row.get(2)?,
            difficulty: row.get(3)?,
            topic: row.get(4)?,
            points: row.get(5)?,
            explanation: row.get(6)?,
            payload_json: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_stored(self) -> RepositoryResult<StoredQuestion> {
        let question_type = QuestionType::from_db_str(&self.question_type).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "question_type".to_string(),
                message: self.question_type.clone(),
            }
        })?;
        let difficulty = DifficultyLevel::parse_lenient(&self.difficulty).ok_or_else(|| {
            RepositoryError::FieldValueError {
                field: "difficulty".to_string(),
                message: self.difficulty.clone(),
            }
        })?;
        let payload: QuestionPayload = serde_json::from_str(&self.payload_json)?;
        let created_at = DateTime::parse_from_rfc3339(&self.created_at)
            .map_err(|e| RepositoryError::FieldValueError {
                field: "created_at".to_string(),
                message: e.to_string(),
            })?
            .with_timezone(&Utc);

        Ok(StoredQuestion {
            question_id: self.question_id,
            text: self.text,
            question_type,
            difficulty,
            topic: self.topic,
            points: self.points,
            explanation: self.explanation,
            payload,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_repo() -> QuestionRepositoryImpl {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        init_schema(&conn).unwrap();
        QuestionRepositoryImpl::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn make_question(text: &str) -> NewQuestion {
        NewQuestion {
            text: text.to_string(),
            question_type: QuestionType::McqSingle,
            difficulty: DifficultyLevel::Hard,
            topic: "Science".to_string(),
            points: 15,
            explanation: "because".to_string(),
            payload: QuestionPayload::SingleChoice {
                options: vec!["x".to_string(), "y".to_string()],
                correct_index: 1,
            },
        }
    }

    #[tokio::test]
    async fn test_create_and_list() {
        let repo = setup_repo();
        let stored = repo.create_question(&make_question("What is H2O?")).await.unwrap();
        assert!(!stored.question_id.is_empty());

        assert_eq!(repo.count_questions().unwrap(), 1);
        let listed = repo.list_questions(10).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].question_id, stored.question_id);
        assert_eq!(listed[0].difficulty, DifficultyLevel::Hard);
        assert_eq!(listed[0].payload, stored.payload);
    }

    #[tokio::test]
    async fn test_blank_text_rejected() {
        let repo = setup_repo();
        let err = repo.create_question(&make_question("   ")).await.unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError(_)));
        assert_eq!(repo.count_questions().unwrap(), 0);
    }

    #[test]
    fn test_unique_ids() {
        let repo = setup_repo();
        let a = repo.insert(&make_question("A?")).unwrap();
        let b = repo.insert(&make_question("A?")).unwrap();
        assert_ne!(a.question_id, b.question_id);
        assert_eq!(repo.list_questions(1).unwrap().len(), 1);
    }
}
