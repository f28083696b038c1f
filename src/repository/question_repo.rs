// ==========================================
// 题库导入引擎 - 题目仓储 Trait
// ==========================================
// 职责: 定义题目持久化接口（审核提交阶段的外部协作方）
// 红线: Repository 不含业务规则，只做数据写入
// ==========================================

use crate::domain::question::{NewQuestion, StoredQuestion};
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;

// ==========================================
// QuestionRepository Trait
// ==========================================
// 用途: 逐条创建题目（不保证幂等）
// 实现者: QuestionRepositoryImpl（rusqlite）；测试中的 Mock
#[async_trait]
pub trait QuestionRepository: Send + Sync {
    /// 创建一条题目
    ///
    /// # 返回
    /// - Ok(StoredQuestion): 已落库记录（含生成的 question_id）
    /// - Err: 校验失败、数据库错误等（仅影响这一条）
    async fn create_question(&self, question: &NewQuestion) -> RepositoryResult<StoredQuestion>;
}
