// ==========================================
// 题库导入引擎 - 会话层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只有解码失败与调用方请求的非法状态转换属于会话级错误；
//       “未识别出题目”与单条提交失败都不是错误
// ==========================================

use crate::importer::error::ImportError;
use crate::session::import_session::SessionState;
use thiserror::Error;

/// 会话层错误类型
#[derive(Error, Debug)]
pub enum SessionError {
    // ===== 状态机错误 =====
    #[error("当前状态不允许该操作: operation={operation}, state={state}")]
    InvalidState {
        operation: &'static str,
        state: SessionState,
    },

    // ===== 审核编辑错误 =====
    #[error("题目下标越界: index={index}, len={len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("题干不能改为空: index={index}")]
    EmptyText { index: usize },

    #[error("没有可提交的题目（至少需要包含一条）")]
    NothingIncluded,

    // ===== 输入错误 =====
    #[error("输入读取失败: {0}")]
    Input(#[from] ImportError),
}

/// Result 类型别名
pub type SessionResult<T> = Result<T, SessionError>;
