// ==========================================
// 题库导入引擎 - 无表头的分隔文本解析器
// ==========================================
// 职责: 每行一题的 CSV/TSV（无表头）→ RawFieldMap 列表
// 规则: 最长单元格为题干；末尾单字母/数字单元格为答案；其余为选项
// ==========================================

use crate::domain::import_report::DetectedFormat;
use crate::domain::question::RawFieldMap;
use crate::domain::types::{FieldKey, QuestionType};
use crate::importer::extractor_trait::{Extractor, SourceText};
use crate::importer::tokenizer::tokenize_line;
use regex::Regex;
use std::sync::LazyLock;

/// 答案单元格: 单个大写 A-E 字母或 1-5 数字（小写字母按选项处理）
static ANSWER_CELL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-E1-5]$").expect("valid regex"));

// ==========================================
// UnstructuredExtractor
// ==========================================
pub struct UnstructuredExtractor;

impl UnstructuredExtractor {
    /// 解析单行（有效单元格不足 2 个时返回空表）
    fn parse_line(line: &str, delimiter: char) -> RawFieldMap {
        let mut fields = RawFieldMap::new();
        let mut cells: Vec<String> = tokenize_line(line, delimiter)
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect();
        if cells.len() < 2 {
            return fields;
        }

        // 最长单元格为题干（并列取第一个）
        let mut text_idx = 0;
        let mut text_len = 0;
        for (idx, cell) in cells.iter().enumerate() {
            let len = cell.chars().count();
            if len > text_len {
                text_idx = idx;
                text_len = len;
            }
        }
        let text = cells.remove(text_idx);
        fields.set(FieldKey::Text, text);

        if cells.last().is_some_and(|last| ANSWER_CELL.is_match(last)) {
            if let Some(answer) = cells.pop() {
                fields.set(FieldKey::Correct, answer);
            }
        }

        let option_count = cells.len().min(FieldKey::OPTIONS.len());
        for (key, value) in FieldKey::OPTIONS.iter().zip(cells) {
            fields.set(*key, value);
        }

        if option_count >= 2 {
            fields.set(FieldKey::Type, QuestionType::McqSingle.as_str());
        }

        fields
    }
}

impl Extractor for UnstructuredExtractor {
    fn format(&self) -> DetectedFormat {
        DetectedFormat::UnstructuredDelimited
    }

    fn extract(&self, source: &SourceText<'_>) -> Option<Vec<RawFieldMap>> {
        let first = source.first_line()?;
        if !first.contains(source.delimiter) {
            return None;
        }

        Some(
            source
                .lines
                .iter()
                .map(|line| Self::parse_line(line, source.delimiter))
                .collect(),
        )
    }
}
