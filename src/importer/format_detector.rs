// ==========================================
// 题库导入引擎 - 格式识别与分发
// ==========================================
// 职责: 判定输入格式并调用对应解析器，输出规范题目列表
// 顺序: JSON → 带表头分隔文本 → 无表头分隔文本 → 自由文本
// 约束: 永不报错；无法识别 → 空列表（由会话层提示用户）
// ==========================================

use crate::config::builder_config::BuilderConfig;
use crate::domain::import_report::DetectedFormat;
use crate::domain::question::ParsedQuestion;
use crate::importer::extractor_trait::{Extractor, SourceText};
use crate::importer::json_extractor::JsonExtractor;
use crate::importer::plain_text_extractor::PlainTextExtractor;
use crate::importer::question_builder::QuestionBuilder;
use crate::importer::structured_extractor::StructuredExtractor;
use crate::importer::unstructured_extractor::UnstructuredExtractor;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ==========================================
// DetectionReport - 识别结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    /// 产出结果的策略（无结果时为最后尝试的策略）
    pub format: DetectedFormat,
    pub questions: Vec<ParsedQuestion>,
    /// 该策略产出但被 Builder 丢弃的候选记录数
    pub dropped: usize,
}

impl DetectionReport {
    fn empty(format: DetectedFormat) -> Self {
        Self {
            format,
            questions: Vec::new(),
            dropped: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

// ==========================================
// FormatDetector
// ==========================================
pub struct FormatDetector {
    builder: QuestionBuilder,
    strategies: Vec<Box<dyn Extractor>>,
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl FormatDetector {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            builder: QuestionBuilder::new(config),
            strategies: vec![
                Box::new(JsonExtractor),
                Box::new(StructuredExtractor),
                Box::new(UnstructuredExtractor),
                Box::new(PlainTextExtractor),
            ],
        }
    }

    /// 识别并解析
    ///
    /// # 规则
    /// - 按顺序尝试各策略，第一个产出非空结果的策略胜出
    /// - 独占型策略（含题目对象的 JSON）即使结果为空也不再尝试后续策略
    pub fn detect(&self, input: &str) -> DetectionReport {
        let source = SourceText::new(input);
        if source.is_blank() {
            debug!("输入为空");
            return DetectionReport::empty(DetectedFormat::PlainText);
        }

        let mut last = DetectionReport::empty(DetectedFormat::PlainText);
        for strategy in &self.strategies {
            let records = match strategy.extract(&source) {
                Some(records) => records,
                None => continue,
            };

            let (questions, dropped) = self.builder.build_all(&records);
            let report = DetectionReport {
                format: strategy.format(),
                questions,
                dropped,
            };
            debug!(
                format = %report.format,
                candidates = records.len(),
                built = report.questions.len(),
                dropped = report.dropped,
                "策略尝试完成"
            );

            if !report.is_empty() || strategy.claims_input() {
                info!(
                    format = %report.format,
                    questions = report.questions.len(),
                    dropped = report.dropped,
                    "格式识别完成"
                );
                return report;
            }
            last = report;
        }

        info!(format = %last.format, dropped = last.dropped, "未识别出任何题目");
        last
    }
}

/// 按默认配置识别并解析
pub fn detect_and_parse(input: &str) -> Vec<ParsedQuestion> {
    detect_and_parse_with(input, &BuilderConfig::default())
}

/// 按指定配置识别并解析
pub fn detect_and_parse_with(input: &str, config: &BuilderConfig) -> Vec<ParsedQuestion> {
    FormatDetector::new(config.clone()).detect(input).questions
}
