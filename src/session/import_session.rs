// ==========================================
// 题库导入引擎 - 导入会话（审核阶段）
// ==========================================
// 职责: 上传 → 解析 → 审核 → 提交 的状态机
// 状态: Uploading → Parsed → Reviewing → Committing → Done | Failed
// 红线: 提交逐条进行，单条失败不影响其余记录，不做回滚
// ==========================================

use crate::config::builder_config::BuilderConfig;
use crate::config::config_manager::DEFAULT_COMMIT_TIMEOUT_MS;
use crate::domain::import_report::{CommitFailure, CommitReport, DetectedFormat, ImportSummary};
use crate::domain::question::ParsedQuestion;
use crate::importer::format_detector::FormatDetector;
use crate::importer::source_reader::decode_text;
use crate::repository::question_repo::QuestionRepository;
use crate::session::error::{SessionError, SessionResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// 失败报告中题干前缀的最大字符数
pub const FAILURE_TEXT_PREFIX_CHARS: usize = 40;

/// 因取消而未提交的记录的失败原因
pub const CANCELLED_REASON: &str = "提交已取消，未发送";

// ==========================================
// SessionState - 会话状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Uploading,
    Parsed,
    Reviewing,
    Committing,
    Done,   // 全部成功
    Failed, // 部分（或全部）失败，仍可报告
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Done | SessionState::Failed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionState::Uploading => "UPLOADING",
            SessionState::Parsed => "PARSED",
            SessionState::Reviewing => "REVIEWING",
            SessionState::Committing => "COMMITTING",
            SessionState::Done => "DONE",
            SessionState::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

// ==========================================
// ParseOutcome - 上传结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseOutcome {
    Detected(ImportSummary),
    /// 未识别出任何题目（非致命，可换输入重试）
    NothingDetected,
}

// ==========================================
// CancelHandle - 提交取消句柄
// ==========================================
// 提交过程中在每条记录之间检查；已创建的记录不会撤回
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

// ==========================================
// ImportSession
// ==========================================
pub struct ImportSession {
    session_id: String,
    state: SessionState,
    config: BuilderConfig,
    questions: Vec<ParsedQuestion>,
    detected_format: Option<DetectedFormat>,
    dropped: usize,
    commit_timeout: Duration,
    cancel: CancelHandle,
    report: Option<CommitReport>,
}

impl ImportSession {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            state: SessionState::Uploading,
            config,
            questions: Vec::new(),
            detected_format: None,
            dropped: 0,
            commit_timeout: Duration::from_millis(DEFAULT_COMMIT_TIMEOUT_MS),
            cancel: CancelHandle::default(),
            report: None,
        }
    }

    /// 设置单条提交超时
    pub fn with_commit_timeout(mut self, timeout: Duration) -> Self {
        self.commit_timeout = timeout;
        self
    }

    /// 直接以审核完成的题目列表建立会话（进入 Reviewing）
    ///
    /// 用于调用方自行完成审核后再提交的场景（API 层）
    pub fn from_reviewed(questions: Vec<ParsedQuestion>, config: BuilderConfig) -> Self {
        let mut session = Self::new(config);
        session.questions = questions;
        session.state = SessionState::Reviewing;
        session
    }

    // ===== 只读访问 =====

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn questions(&self) -> &[ParsedQuestion] {
        &self.questions
    }

    pub fn detected_format(&self) -> Option<DetectedFormat> {
        self.detected_format
    }

    pub fn report(&self) -> Option<&CommitReport> {
        self.report.as_ref()
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn included_count(&self) -> usize {
        self.questions.iter().filter(|q| q.included).count()
    }

    /// 解析汇总（就绪数 / 待审核数 / 丢弃数）
    pub fn summary(&self) -> ImportSummary {
        ImportSummary::from_questions(&self.questions, self.dropped)
    }

    // ===== 上传 =====

    /// 载入文本并解析
    ///
    /// # 状态
    /// - 允许: Uploading / Parsed / Reviewing（重新上传会替换审核列表）
    /// - 结果为空 → 回到 Uploading，返回 NothingDetected
    pub fn load_text(&mut self, text: &str) -> SessionResult<ParseOutcome> {
        self.ensure_state(
            "load",
            &[SessionState::Uploading, SessionState::Parsed, SessionState::Reviewing],
        )?;

        let report = FormatDetector::new(self.config.clone()).detect(text);
        self.dropped = report.dropped;

        if report.questions.is_empty() {
            self.questions.clear();
            self.detected_format = None;
            self.state = SessionState::Uploading;
            info!(session_id = %self.session_id, dropped = report.dropped, "未识别出题目");
            return Ok(ParseOutcome::NothingDetected);
        }

        self.questions = report.questions;
        self.detected_format = Some(report.format);
        self.state = SessionState::Parsed;

        let summary = self.summary();
        info!(
            session_id = %self.session_id,
            format = %report.format,
            total = summary.total,
            ready = summary.ready,
            needs_review = summary.needs_review,
            dropped = summary.dropped,
            "解析完成"
        );
        Ok(ParseOutcome::Detected(summary))
    }

    /// 载入字节（UTF-8 解码，去除 BOM）
    ///
    /// 解码失败是唯一的会话级硬错误，会话状态保持不变
    pub fn load_bytes(&mut self, bytes: Vec<u8>) -> SessionResult<ParseOutcome> {
        self.ensure_state(
            "load",
            &[SessionState::Uploading, SessionState::Parsed, SessionState::Reviewing],
        )?;
        let text = decode_text(bytes).inspect_err(|e| {
            warn!(session_id = %self.session_id, error = %e, "输入解码失败");
        })?;
        self.load_text(&text)
    }

    // ===== 审核 =====

    /// Parsed → Reviewing
    pub fn begin_review(&mut self) -> SessionResult<()> {
        self.ensure_state("begin_review", &[SessionState::Parsed])?;
        self.state = SessionState::Reviewing;
        Ok(())
    }

    pub fn set_included(&mut self, index: usize, included: bool) -> SessionResult<()> {
        self.ensure_state("set_included", &[SessionState::Reviewing])?;
        let question = self.question_mut(index)?;
        question.included = included;
        debug!(index, included, "审核: 包含状态变更");
        Ok(())
    }

    pub fn exclude(&mut self, index: usize) -> SessionResult<()> {
        self.set_included(index, false)
    }

    pub fn include(&mut self, index: usize) -> SessionResult<()> {
        self.set_included(index, true)
    }

    /// 修改题干（审核阶段唯一可编辑的字段）
    pub fn edit_text(&mut self, index: usize, text: &str) -> SessionResult<()> {
        self.ensure_state("edit_text", &[SessionState::Reviewing])?;
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyText { index });
        }
        let question = self.question_mut(index)?;
        question.text = trimmed.to_string();
        Ok(())
    }

    /// 放弃会话（提交开始前无副作用）
    pub fn discard(self) {
        info!(session_id = %self.session_id, state = %self.state, "会话已放弃");
    }

    // ===== 提交 =====

    /// Reviewing → Committing → Done | Failed
    ///
    /// # 规则
    /// - 仅提交 included 的题目，至少一条
    /// - 逐条顺序提交，每条独立超时；失败/超时记入 failures，继续下一条
    /// - 取消标记在每条之间检查，剩余记录以取消原因记入 failures
    #[instrument(skip(self, repo), fields(session_id = %self.session_id))]
    pub async fn commit<R>(&mut self, repo: &R) -> SessionResult<CommitReport>
    where
        R: QuestionRepository + ?Sized,
    {
        self.ensure_state("commit", &[SessionState::Reviewing])?;

        let pending: Vec<(usize, &ParsedQuestion)> = self
            .questions
            .iter()
            .enumerate()
            .filter(|(_, q)| q.included)
            .collect();
        if pending.is_empty() {
            return Err(SessionError::NothingIncluded);
        }

        self.state = SessionState::Committing;
        info!(included = pending.len(), "开始提交");

        let mut report = CommitReport::default();
        for (pos, (index, question)) in pending.iter().enumerate() {
            if self.cancel.is_cancelled() {
                warn!(remaining = pending.len() - pos, "提交被取消");
                report
                    .failures
                    .extend(pending[pos..].iter().map(|(index, question)| {
                        failure(*index, question, CANCELLED_REASON.to_string())
                    }));
                break;
            }

            let record = question.to_new_question();
            match tokio::time::timeout(self.commit_timeout, repo.create_question(&record)).await {
                Ok(Ok(stored)) => {
                    debug!(index, question_id = %stored.question_id, "提交成功");
                    report.created.push(stored);
                }
                Ok(Err(e)) => {
                    warn!(index, error = %e, "提交失败");
                    report.failures.push(failure(*index, question, e.to_string()));
                }
                Err(_) => {
                    let reason = format!("提交超时 ({} ms)", self.commit_timeout.as_millis());
                    warn!(index, "{}", reason);
                    report.failures.push(failure(*index, question, reason));
                }
            }
        }

        let state = if report.failures.is_empty() {
            SessionState::Done
        } else {
            SessionState::Failed
        };
        self.state = state;
        self.report = Some(report.clone());

        info!(
            created = report.created_count(),
            failed = report.failed_count(),
            state = %state,
            "提交结束"
        );
        Ok(report)
    }

    // ===== 内部辅助 =====

    fn ensure_state(&self, operation: &'static str, allowed: &[SessionState]) -> SessionResult<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                state: self.state,
            })
        }
    }

    fn question_mut(&mut self, index: usize) -> SessionResult<&mut ParsedQuestion> {
        let len = self.questions.len();
        self.questions
            .get_mut(index)
            .ok_or(SessionError::IndexOutOfRange { index, len })
    }
}

fn failure(index: usize, question: &ParsedQuestion, reason: String) -> CommitFailure {
    CommitFailure {
        index,
        text_prefix: question.text_prefix(FAILURE_TEXT_PREFIX_CHARS),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_QUESTIONS: &str = "Q1: First?\nA) x\nB) y\nAnswer: A\n\nQ2: Second?\nA) p\nB) q\nAnswer: B\n";

    #[test]
    fn test_nothing_detected_stays_uploading() {
        let mut session = ImportSession::new(BuilderConfig::default());
        let outcome = session.load_text("   ").unwrap();
        assert_eq!(outcome, ParseOutcome::NothingDetected);
        assert_eq!(session.state(), SessionState::Uploading);
    }

    #[test]
    fn test_parse_then_review_flow() {
        let mut session = ImportSession::new(BuilderConfig::default());
        let outcome = session.load_text(TWO_QUESTIONS).unwrap();
        match outcome {
            ParseOutcome::Detected(summary) => {
                assert_eq!(summary.total, 2);
                assert_eq!(summary.ready, 2);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(session.state(), SessionState::Parsed);
        assert_eq!(session.detected_format(), Some(DetectedFormat::PlainText));

        // 审核前不能编辑
        assert!(matches!(
            session.exclude(0),
            Err(SessionError::InvalidState { .. })
        ));

        session.begin_review().unwrap();
        session.exclude(1).unwrap();
        assert_eq!(session.included_count(), 1);
        session.include(1).unwrap();
        assert_eq!(session.included_count(), 2);

        session.edit_text(0, "  Edited first?  ").unwrap();
        assert_eq!(session.questions()[0].text, "Edited first?");
        assert!(matches!(
            session.edit_text(0, "  "),
            Err(SessionError::EmptyText { index: 0 })
        ));
        assert!(matches!(
            session.exclude(9),
            Err(SessionError::IndexOutOfRange { index: 9, len: 2 })
        ));
    }

    #[test]
    fn test_load_bytes_decode_failure_keeps_state() {
        let mut session = ImportSession::new(BuilderConfig::default());
        let err = session.load_bytes(vec![0xC3, 0x28]).unwrap_err();
        assert!(matches!(err, SessionError::Input(_)));
        assert_eq!(session.state(), SessionState::Uploading);

        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(TWO_QUESTIONS.as_bytes());
        assert!(matches!(
            session.load_bytes(bytes).unwrap(),
            ParseOutcome::Detected(_)
        ));
    }

    #[test]
    fn test_reupload_replaces_review_set() {
        let mut session = ImportSession::new(BuilderConfig::default());
        session.load_text(TWO_QUESTIONS).unwrap();
        session.begin_review().unwrap();
        session.exclude(0).unwrap();

        session.load_text("Q1: Only one?\n").unwrap();
        assert_eq!(session.state(), SessionState::Parsed);
        assert_eq!(session.questions().len(), 1);
        assert!(session.questions()[0].included);
    }

    #[test]
    fn test_state_display() {
        assert_eq!(SessionState::Reviewing.to_string(), "REVIEWING");
        assert!(SessionState::Failed.is_terminal());
        assert!(!SessionState::Committing.is_terminal());
    }
}
