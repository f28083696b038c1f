// ==========================================
// 题库导入引擎 - API层错误类型
// ==========================================
// 职责: 汇总各层错误，转换为面向调用方的错误消息
// ==========================================

use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use crate::session::error::SessionError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    #[error("输入解码失败: {0}")]
    DecodeError(String),

    // ==========================================
    // 会话错误
    // ==========================================
    #[error("无效的状态转换: operation={operation}, state={state}")]
    InvalidStateTransition { operation: String, state: String },

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::UniqueConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("唯一约束违反: {}", msg))
            }
            RepositoryError::ValidationError(msg) | RepositoryError::Rejected(msg) => {
                ApiError::ValidationError(msg)
            }
            RepositoryError::FieldValueError { field, message } => {
                ApiError::InvalidInput(format!("字段{}错误: {}", field, message))
            }
            RepositoryError::InternalError(msg) => ApiError::InternalError(msg),
            RepositoryError::Other(err) => ApiError::Other(err),
        }
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::NotFound(format!("文件{}", path)),
            ImportError::DecodeError { .. } => ApiError::DecodeError(err.to_string()),
            ImportError::FileReadError(msg) => ApiError::InvalidInput(msg),
            ImportError::Other(err) => ApiError::Other(err),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

// ==========================================
// 从 SessionError 转换
// ==========================================
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::InvalidState { operation, state } => ApiError::InvalidStateTransition {
                operation: operation.to_string(),
                state: state.to_string(),
            },
            SessionError::IndexOutOfRange { .. }
            | SessionError::EmptyText { .. }
            | SessionError::NothingIncluded => ApiError::ValidationError(err.to_string()),
            SessionError::Input(inner) => inner.into(),
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::import_session::SessionState;

    #[test]
    fn test_session_error_conversion() {
        let err: ApiError = SessionError::InvalidState {
            operation: "commit",
            state: SessionState::Parsed,
        }
        .into();
        assert!(matches!(
            err,
            ApiError::InvalidStateTransition { ref state, .. } if state == "PARSED"
        ));

        let err: ApiError = SessionError::NothingIncluded.into();
        assert!(matches!(err, ApiError::ValidationError(_)));
    }

    #[test]
    fn test_import_error_conversion() {
        let err: ApiError = ImportError::FileNotFound("x.csv".to_string()).into();
        assert!(matches!(err, ApiError::NotFound(_)));

        let err: ApiError = ImportError::DecodeError {
            offset: 3,
            message: "bad".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::DecodeError(_)));
    }
}
