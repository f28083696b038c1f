// ==========================================
// 题库导入API
// ==========================================
// 职责: 封装“解析预览 → 审核后提交”两步调用
// 说明: 预览不落库；提交由调用方带回审核后的题目列表
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{BuilderConfig, ConfigManager, ImportConfigReader};
use crate::domain::import_report::{CommitReport, DetectedFormat, ImportSummary};
use crate::domain::question::ParsedQuestion;
use crate::importer::format_detector::FormatDetector;
use crate::importer::source_reader::read_text_file;
use crate::repository::QuestionRepositoryImpl;
use crate::session::{ImportSession, SessionState};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// 解析预览响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    /// 识别出的格式（未识别出题目时为 None）
    pub format: Option<DetectedFormat>,
    pub summary: ImportSummary,
    pub questions: Vec<ParsedQuestion>,
    /// 解析耗时（毫秒）
    pub elapsed_ms: i64,
}

impl PreviewResponse {
    pub fn nothing_detected(&self) -> bool {
        self.questions.is_empty()
    }
}

/// 提交响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitResponse {
    pub session_id: String,
    /// DONE / FAILED
    pub state: SessionState,
    pub report: CommitReport,
}

/// 导入API
pub struct ImportApi {
    db_path: String,
}

impl ImportApi {
    /// 创建新的ImportApi实例
    pub fn new(db_path: String) -> Self {
        Self { db_path }
    }

    /// 读取导入配置快照
    async fn load_config(&self) -> ApiResult<(BuilderConfig, Duration)> {
        let manager = ConfigManager::new(&self.db_path)
            .map_err(|e| ApiError::DatabaseError(format!("打开配置失败: {}", e)))?;

        let config = manager
            .load_builder_config()
            .await
            .map_err(|e| ApiError::DatabaseError(format!("读取导入配置失败: {}", e)))?;
        let timeout_ms = manager
            .get_commit_timeout_ms()
            .await
            .map_err(|e| ApiError::DatabaseError(format!("读取提交超时失败: {}", e)))?;

        Ok((config, Duration::from_millis(timeout_ms)))
    }

    /// 解析预览（文本）
    ///
    /// # 返回
    /// - Ok(PreviewResponse): 未识别出题目也返回 Ok（questions 为空）
    pub async fn preview_text(&self, text: &str) -> ApiResult<PreviewResponse> {
        let (config, _) = self.load_config().await?;
        Ok(preview_with(text, config))
    }

    /// 解析预览（文件，UTF-8）
    pub async fn preview_file(&self, file_path: &str) -> ApiResult<PreviewResponse> {
        let text = read_text_file(file_path)?;
        self.preview_text(&text).await
    }

    /// 批量解析预览（并发执行）
    ///
    /// # 说明
    /// - 每个文件在独立的阻塞线程中解析，互不影响
    /// - 单个文件失败不影响其他文件，失败原因按原顺序返回
    pub async fn preview_many(
        &self,
        file_paths: Vec<String>,
    ) -> ApiResult<Vec<Result<PreviewResponse, String>>> {
        let (config, _) = self.load_config().await?;

        let tasks = file_paths.into_iter().map(|path| {
            let config = config.clone();
            tokio::task::spawn_blocking(move || {
                read_text_file(&path)
                    .map(|text| preview_with(&text, config))
                    .map_err(|e| format!("{}: {}", path, e))
            })
        });

        let results = futures::future::join_all(tasks)
            .await
            .into_iter()
            .map(|joined| match joined {
                Ok(result) => result,
                Err(e) => Err(format!("解析任务异常: {}", e)),
            })
            .collect::<Vec<_>>();

        let failed = results.iter().filter(|r| r.is_err()).count();
        if failed > 0 {
            warn!(failed, total = results.len(), "部分文件解析失败");
        }
        Ok(results)
    }

    /// 提交审核后的题目
    ///
    /// # 参数
    /// - questions: 审核后的题目列表（included=false 的不提交）
    /// - timeout: 单条提交超时（None 时读取配置）
    ///
    /// # 返回
    /// - Ok(CommitResponse): 部分失败也返回 Ok（见 report.failures）
    /// - Err(ApiError): 没有包含任何题目、数据库无法打开等
    pub async fn commit(
        &self,
        questions: Vec<ParsedQuestion>,
        timeout: Option<Duration>,
    ) -> ApiResult<CommitResponse> {
        let (config, configured_timeout) = self.load_config().await?;
        let repo = QuestionRepositoryImpl::new(&self.db_path)?;

        let mut session = ImportSession::from_reviewed(questions, config)
            .with_commit_timeout(timeout.unwrap_or(configured_timeout));
        let report = session.commit(&repo).await?;

        info!(
            session_id = %session.session_id(),
            created = report.created_count(),
            failed = report.failed_count(),
            "提交完成"
        );

        Ok(CommitResponse {
            session_id: session.session_id().to_string(),
            state: session.state(),
            report,
        })
    }
}

/// 按给定配置解析（同步，可在阻塞线程中调用）
fn preview_with(text: &str, config: BuilderConfig) -> PreviewResponse {
    let start = Instant::now();
    let report = FormatDetector::new(config).detect(text);
    let summary = ImportSummary::from_questions(&report.questions, report.dropped);

    PreviewResponse {
        format: if report.questions.is_empty() {
            None
        } else {
            Some(report.format)
        },
        summary,
        questions: report.questions,
        elapsed_ms: start.elapsed().as_millis() as i64,
    }
}
