// ==========================================
// 导入会话 集成测试
// ==========================================
// 测试目标: 审核（排除/恢复）→ 逐条提交 的完整流程
// 覆盖: 部分失败、超时、取消、SQLite 落库、ImportApi
// ==========================================


use question_importer::api::{ApiError, ImportApi};
use question_importer::config::{config_keys, BuilderConfig, ConfigManager};
use question_importer::repository::QuestionRepositoryImpl;
use question_importer::session::{
    ImportSession, ParseOutcome, SessionError, SessionState, CANCELLED_REASON,
};
use question_importer::logging;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;
use test_helpers::{create_test_db, MockQuestionRepository, THREE_PLAIN_TEXT_QUESTIONS};

/// 载入三道题并进入审核
fn reviewing_session() -> ImportSession {
    let mut session = ImportSession::new(BuilderConfig::default());
    let outcome = session
        .load_text(THREE_PLAIN_TEXT_QUESTIONS)
        .expect("load should succeed");
    assert!(matches!(outcome, ParseOutcome::Detected(s) if s.total == 3));
    session.begin_review().expect("begin review");
    session
}

// ==========================================
// 审核: 排除 / 恢复
// ==========================================

#[tokio::test]
async fn test_excluded_record_is_never_submitted() {
    logging::init_test();

    let mut session = reviewing_session();
    session.exclude(1).unwrap();

    let repo = MockQuestionRepository::new();
    let report = session.commit(&repo).await.unwrap();

    assert_eq!(
        repo.submitted_texts(),
        vec!["First question?", "Third question?"]
    );
    assert_eq!(report.created_count(), 2);
    assert_eq!(report.failed_count(), 0);
    assert_eq!(session.state(), SessionState::Done);
}

#[tokio::test]
async fn test_reincluded_record_is_submitted() {
    let mut session = reviewing_session();
    session.exclude(1).unwrap();
    session.include(1).unwrap();

    let repo = MockQuestionRepository::new();
    session.commit(&repo).await.unwrap();

    assert_eq!(
        repo.submitted_texts(),
        vec!["First question?", "Second question?", "Third question?"]
    );
}

#[tokio::test]
async fn test_edited_text_is_submitted() {
    let mut session = reviewing_session();
    session.edit_text(2, "Third question, reworded?").unwrap();

    let repo = MockQuestionRepository::new();
    session.commit(&repo).await.unwrap();

    assert_eq!(repo.submitted_texts()[2], "Third question, reworded?");
}

#[tokio::test]
async fn test_commit_requires_at_least_one_included() {
    let mut session = reviewing_session();
    for index in 0..3 {
        session.exclude(index).unwrap();
    }

    let repo = MockQuestionRepository::new();
    let err = session.commit(&repo).await.unwrap_err();

    assert!(matches!(err, SessionError::NothingIncluded));
    assert_eq!(repo.call_count(), 0);
    // 仍可继续审核
    assert_eq!(session.state(), SessionState::Reviewing);
}

#[tokio::test]
async fn test_commit_outside_review_is_rejected() {
    let mut session = ImportSession::new(BuilderConfig::default());
    session.load_text(THREE_PLAIN_TEXT_QUESTIONS).unwrap();

    let repo = MockQuestionRepository::new();
    let err = session.commit(&repo).await.unwrap_err();
    assert!(matches!(
        err,
        SessionError::InvalidState {
            state: SessionState::Parsed,
            ..
        }
    ));
    assert_eq!(repo.call_count(), 0);
}

// ==========================================
// 提交: 部分失败 / 超时 / 取消
// ==========================================

#[tokio::test]
async fn test_partial_failure_continues_with_remaining_records() {
    let mut session = reviewing_session();
    let repo = MockQuestionRepository::failing_on(2);

    let report = session.commit(&repo).await.unwrap();

    // 第 3 条仍被提交
    assert_eq!(repo.call_count(), 3);
    assert_eq!(report.created_count(), 2);
    assert_eq!(report.failed_count(), 1);
    assert_eq!(session.state(), SessionState::Failed);

    let failure = &report.failures[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.text_prefix, "Second question?");
    assert!(failure.reason.contains("mock failure on call 2"));

    assert_eq!(report.created[0].text, "First question?");
    assert_eq!(report.created[1].text, "Third question?");
    assert_eq!(session.report(), Some(&report));
}

#[tokio::test]
async fn test_slow_create_is_reported_as_timeout() {
    let mut session = reviewing_session().with_commit_timeout(Duration::from_millis(20));
    session.exclude(1).unwrap();
    session.exclude(2).unwrap();

    let repo = MockQuestionRepository::slow(Duration::from_millis(500));
    let report = session.commit(&repo).await.unwrap();

    assert_eq!(report.created_count(), 0);
    assert_eq!(report.failed_count(), 1);
    assert!(report.failures[0].reason.contains("超时"));
    assert_eq!(session.state(), SessionState::Failed);
}

#[tokio::test]
async fn test_cancel_during_commit_stops_remaining_records() {
    let mut session = reviewing_session();
    let repo = MockQuestionRepository::cancelling_after(1, session.cancel_handle());

    let report = session.commit(&repo).await.unwrap();

    assert_eq!(repo.call_count(), 1);
    assert_eq!(report.created_count(), 1);
    assert_eq!(report.failed_count(), 2);
    assert!(report
        .failures
        .iter()
        .all(|f| f.reason == CANCELLED_REASON));
    assert_eq!(
        report.failures.iter().map(|f| f.index).collect::<Vec<_>>(),
        vec![1, 2]
    );
    assert_eq!(session.state(), SessionState::Failed);
}

#[tokio::test]
async fn test_cancel_before_commit_creates_nothing() {
    let mut session = reviewing_session();
    session.cancel_handle().cancel();

    let repo = MockQuestionRepository::new();
    let report = session.commit(&repo).await.unwrap();

    assert_eq!(repo.call_count(), 0);
    assert_eq!(report.created_count(), 0);
    assert_eq!(report.failed_count(), 3);
}

// ==========================================
// SQLite 落库
// ==========================================

#[tokio::test]
async fn test_commit_to_sqlite_repository() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let repo = QuestionRepositoryImpl::new(&db_path).expect("Failed to open repository");

    let mut session = reviewing_session();
    session.exclude(0).unwrap();
    let report = session.commit(&repo).await.unwrap();

    assert_eq!(report.created_count(), 2);
    assert_eq!(repo.count_questions().unwrap(), 2);

    let stored = repo.list_questions(10).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].text, "Second question?");
    assert_eq!(stored[0].payload, report.created[0].payload);
}

// ==========================================
// ImportApi
// ==========================================

#[tokio::test]
async fn test_api_preview_then_commit() {
    logging::init_test();

    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = ImportApi::new(db_path.clone());

    let preview = api.preview_text(THREE_PLAIN_TEXT_QUESTIONS).await.unwrap();
    assert!(!preview.nothing_detected());
    assert_eq!(preview.summary.total, 3);
    assert_eq!(preview.questions.len(), 3);

    let mut questions = preview.questions;
    questions[1].included = false;

    let response = api.commit(questions, None).await.unwrap();
    assert_eq!(response.state, SessionState::Done);
    assert_eq!(response.report.created_count(), 2);

    let repo = QuestionRepositoryImpl::new(&db_path).unwrap();
    assert_eq!(repo.count_questions().unwrap(), 2);
}

#[tokio::test]
async fn test_api_commit_reports_rejected_record() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = ImportApi::new(db_path.clone());

    let mut questions = api
        .preview_text(THREE_PLAIN_TEXT_QUESTIONS)
        .await
        .unwrap()
        .questions;
    // 审核后被清空的题干由仓储拒绝
    questions[0].text = "   ".to_string();

    let response = api.commit(questions, None).await.unwrap();
    assert_eq!(response.state, SessionState::Failed);
    assert_eq!(response.report.created_count(), 2);
    assert_eq!(response.report.failures[0].index, 0);
}

#[tokio::test]
async fn test_api_commit_with_nothing_included() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = ImportApi::new(db_path);

    let mut questions = api
        .preview_text(THREE_PLAIN_TEXT_QUESTIONS)
        .await
        .unwrap()
        .questions;
    questions.iter_mut().for_each(|q| q.included = false);

    let err = api.commit(questions, None).await.unwrap_err();
    assert!(matches!(err, ApiError::ValidationError(_)));
}

#[tokio::test]
async fn test_api_preview_uses_stored_config() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let config = ConfigManager::new(&db_path).unwrap();
    config
        .set_config_value(config_keys::DEFAULT_POINTS, "25")
        .unwrap();

    let api = ImportApi::new(db_path);
    let preview = api.preview_text(THREE_PLAIN_TEXT_QUESTIONS).await.unwrap();
    assert!(preview.questions.iter().all(|q| q.points == 25));

    let empty = api.preview_text("").await.unwrap();
    assert!(empty.nothing_detected());
    assert!(empty.format.is_none());
}

#[tokio::test]
async fn test_api_preview_many_keeps_order_and_isolates_failures() {
    let (_temp_file, db_path) = create_test_db().expect("Failed to create test db");
    let api = ImportApi::new(db_path);

    let mut csv_file = NamedTempFile::new().unwrap();
    write!(csv_file, "Question,A,B,Answer\nOne?,x,y,B\nTwo?,x,y,A\n").unwrap();
    let mut text_file = NamedTempFile::new().unwrap();
    write!(text_file, "{}", THREE_PLAIN_TEXT_QUESTIONS).unwrap();

    let results = api
        .preview_many(vec![
            csv_file.path().to_str().unwrap().to_string(),
            "/definitely/missing/questions.csv".to_string(),
            text_file.path().to_str().unwrap().to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().questions.len(), 2);
    assert!(results[1].is_err());
    assert_eq!(results[2].as_ref().unwrap().questions.len(), 3);
}
