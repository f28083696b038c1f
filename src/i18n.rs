// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持中文（默认）和英文
// 范围: 只翻译面向用户的汇总消息，题目内容原样输出
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// ==========================================

use crate::domain::import_report::{CommitFailure, CommitReport, DetectedFormat, ImportSummary};

/// 获取当前语言
pub fn current_locale() -> String {
    rust_i18n::locale().to_string()
}

/// 设置语言
///
/// # 参数
/// - locale: 语言代码（"zh-CN" 或 "en"）
pub fn set_locale(locale: &str) {
    rust_i18n::set_locale(locale);
}

/// 翻译消息（无参数）
///
/// # 示例
/// ```no_run
/// use question_importer::i18n::t;
/// let msg = t("common.success");
/// ```
pub fn t(key: &str) -> String {
    rust_i18n::t!(key).to_string()
}

/// 翻译消息（带参数）
///
/// # 示例
/// ```no_run
/// use question_importer::i18n::t_with_args;
/// let msg = t_with_args("import.file_not_found", &[("path", "/tmp/test.csv")]);
/// ```
pub fn t_with_args(key: &str, args: &[(&str, &str)]) -> String {
    let mut result = rust_i18n::t!(key).to_string();
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

/// 解析汇总消息
pub fn parse_summary_message(format: DetectedFormat, summary: &ImportSummary) -> String {
    t_with_args(
        "import.parse_summary",
        &[
            ("format", format.to_string().as_str()),
            ("total", summary.total.to_string().as_str()),
            ("ready", summary.ready.to_string().as_str()),
            ("needs_review", summary.needs_review.to_string().as_str()),
            ("dropped", summary.dropped.to_string().as_str()),
        ],
    )
}

/// 提交汇总消息
pub fn commit_summary_message(report: &CommitReport) -> String {
    t_with_args(
        "import.commit_summary",
        &[
            ("created", report.created_count().to_string().as_str()),
            ("failed", report.failed_count().to_string().as_str()),
        ],
    )
}

/// 单条提交失败消息（下标按 1 起始展示）
pub fn commit_failure_message(failure: &CommitFailure) -> String {
    t_with_args(
        "import.commit_failure",
        &[
            ("index", (failure.index + 1).to_string().as_str()),
            ("text", failure.text_prefix.as_str()),
            ("reason", failure.reason.as_str()),
        ],
    )
}
