// ==========================================
// 题库导入引擎 - 会话层
// ==========================================
// 职责: 解析结果的人工审核与逐条提交
// ==========================================

pub mod error;
pub mod import_session;

pub use error::{SessionError, SessionResult};
pub use import_session::{
    CancelHandle, ImportSession, ParseOutcome, SessionState, CANCELLED_REASON,
    FAILURE_TEXT_PREFIX_CHARS,
};
