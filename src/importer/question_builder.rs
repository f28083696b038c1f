// ==========================================
// 题库导入引擎 - 题目构建器
// ==========================================
// 职责: RawFieldMap → ParsedQuestion（规范字段 + 题型载荷 + 审核状态）
// 流程: 题干校验 → 选项收集 → 题型判定 → 载荷构建 → 默认值回落
// ==========================================

use crate::config::builder_config::{BuilderConfig, DEFAULT_TOPIC};
use crate::domain::question::{ParsedQuestion, QuestionPayload, RawFieldMap};
use crate::domain::types::{DifficultyLevel, FieldKey, QuestionType, ReviewStatus};
use crate::importer::answer_resolver::{resolve_correct_index, resolve_true_false};
use crate::importer::type_classifier::classify;
use tracing::trace;

/// 评分题固定量表
pub const RATING_SCALE: u8 = 5;

// ==========================================
// QuestionBuilder
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct QuestionBuilder {
    config: BuilderConfig,
}

impl QuestionBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// 构建单条题目
    ///
    /// # 返回
    /// - Some(ParsedQuestion): 构建成功
    /// - None: 题干为空（整条丢弃）
    pub fn build(&self, fields: &RawFieldMap) -> Option<ParsedQuestion> {
        let text = fields.get(FieldKey::Text).map(str::trim).unwrap_or("");
        if text.is_empty() {
            return None;
        }

        // 选项按 A..E 顺序收集，过滤空白
        let options: Vec<String> = FieldKey::OPTIONS
            .iter()
            .filter_map(|key| fields.get(*key))
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
            .collect();

        let question_type = classify(fields.get(FieldKey::Type), text, &options);
        let correct = fields.get(FieldKey::Correct);
        let option_count = options.len();
        let payload = build_payload(question_type, correct, options);

        let status = if question_type.requires_manual_authoring()
            || (self.config.strict_choice_review && question_type.is_choice() && option_count < 2)
        {
            ReviewStatus::NeedsReview
        } else {
            ReviewStatus::Ok
        };

        let question = ParsedQuestion {
            text: text.to_string(),
            question_type,
            difficulty: self.resolve_difficulty(fields.get(FieldKey::Difficulty)),
            topic: self.resolve_topic(fields.get(FieldKey::Topic)),
            points: self.resolve_points(fields.get(FieldKey::Points)),
            explanation: fields
                .get(FieldKey::Explanation)
                .map(str::trim)
                .unwrap_or_default()
                .to_string(),
            payload,
            status,
            included: true,
        };

        trace!(
            question_type = %question.question_type,
            status = %question.status,
            "题目构建完成"
        );
        Some(question)
    }

    /// 批量构建
    ///
    /// # 返回
    /// - (题目列表, 被丢弃的记录数)
    pub fn build_all(&self, records: &[RawFieldMap]) -> (Vec<ParsedQuestion>, usize) {
        let questions: Vec<ParsedQuestion> =
            records.iter().filter_map(|fields| self.build(fields)).collect();
        let dropped = records.len() - questions.len();
        (questions, dropped)
    }

    /// 难度: 可识别且在允许列表内 → 该值；否则 Medium
    fn resolve_difficulty(&self, raw: Option<&str>) -> DifficultyLevel {
        raw.and_then(DifficultyLevel::parse_lenient)
            .filter(|level| self.config.allows_difficulty(*level))
            .unwrap_or_default()
    }

    /// 知识点: 命中允许列表 → 列表写法；否则 "General"
    fn resolve_topic(&self, raw: Option<&str>) -> String {
        raw.and_then(|t| self.config.match_topic(t))
            .unwrap_or(DEFAULT_TOPIC)
            .to_string()
    }

    /// 分值: 非负整数；否则默认值
    fn resolve_points(&self, raw: Option<&str>) -> u32 {
        raw.and_then(|p| p.trim().parse::<u32>().ok())
            .unwrap_or(self.config.default_points)
    }
}

/// 按题型构建载荷
fn build_payload(
    question_type: QuestionType,
    correct: Option<&str>,
    options: Vec<String>,
) -> QuestionPayload {
    match question_type {
        QuestionType::McqSingle => {
            let correct_index = resolve_correct_index(correct, &options);
            QuestionPayload::SingleChoice {
                options,
                correct_index,
            }
        }
        QuestionType::McqMulti => {
            // 历史行为: 多选也只派生一个正确下标
            let correct_index = resolve_correct_index(correct, &options);
            QuestionPayload::MultiChoice {
                options,
                correct_indices: vec![correct_index],
            }
        }
        QuestionType::TrueFalse => QuestionPayload::TrueFalse {
            correct_answer: resolve_true_false(correct),
        },
        QuestionType::FillBlank => QuestionPayload::FillBlank {
            correct_answer: correct.unwrap_or_default().to_string(),
            case_sensitive: false,
        },
        QuestionType::Rating => QuestionPayload::Rating {
            scale: RATING_SCALE,
        },
        QuestionType::Short
        | QuestionType::Essay
        | QuestionType::Matching
        | QuestionType::Ordering
        | QuestionType::Matrix => QuestionPayload::Empty,
    }
}
