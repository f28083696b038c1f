// ==========================================
// 题库导入引擎 - 带表头的分隔文本解析器
// ==========================================
// 职责: CSV/TSV（首行为表头）→ RawFieldMap 列表
// 适用条件: ≥2 行，且首行至少 2 个单元格可识别为表头
// ==========================================

use crate::domain::import_report::DetectedFormat;
use crate::domain::question::RawFieldMap;
use crate::domain::types::FieldKey;
use crate::importer::extractor_trait::{Extractor, SourceText};
use crate::importer::header_resolver::resolve_header;
use crate::importer::tokenizer::tokenize_line;
use std::collections::HashMap;
use tracing::debug;

/// 判定为表头所需的最少可识别单元格数
const MIN_RECOGNIZED_HEADERS: usize = 2;

// ==========================================
// StructuredExtractor
// ==========================================
pub struct StructuredExtractor;

impl StructuredExtractor {
    /// 表头映射: FieldKey → 列下标（重复列名以首次出现为准）
    fn map_header(cells: &[String]) -> HashMap<FieldKey, usize> {
        let mut columns = HashMap::new();
        for (idx, cell) in cells.iter().enumerate() {
            if let Some(key) = resolve_header(cell) {
                columns.entry(key).or_insert(idx);
            }
        }
        columns
    }
}

impl Extractor for StructuredExtractor {
    fn format(&self) -> DetectedFormat {
        DetectedFormat::StructuredDelimited
    }

    fn extract(&self, source: &SourceText<'_>) -> Option<Vec<RawFieldMap>> {
        if source.lines.len() < 2 {
            return None;
        }

        let header_cells = tokenize_line(source.lines[0], source.delimiter);
        let recognized = header_cells
            .iter()
            .filter(|cell| resolve_header(cell).is_some())
            .count();
        if recognized < MIN_RECOGNIZED_HEADERS {
            return None;
        }

        let columns = Self::map_header(&header_cells);
        if !columns.contains_key(&FieldKey::Text) {
            debug!(recognized, "表头缺少题干列");
            return Some(Vec::new());
        }

        let records = source.lines[1..]
            .iter()
            .map(|line| {
                let cells = tokenize_line(line, source.delimiter);
                let mut fields = RawFieldMap::new();
                for (key, idx) in &columns {
                    if let Some(value) = cells.get(*idx) {
                        fields.set(*key, value);
                    }
                }
                fields
            })
            .collect();

        Some(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> Option<Vec<RawFieldMap>> {
        StructuredExtractor.extract(&SourceText::new(input))
    }

    #[test]
    fn test_header_mapping_round_trip() {
        let input = "Question,Option A,Option B,Option C,Correct Answer,Difficulty,Points\n\
                     What is 2+2?,3,4,5,B,Easy,10\n";
        let records = extract(input).unwrap();
        assert_eq!(records.len(), 1);
        let fields = &records[0];
        assert_eq!(fields.get(FieldKey::Text), Some("What is 2+2?"));
        assert_eq!(fields.get(FieldKey::OptA), Some("3"));
        assert_eq!(fields.get(FieldKey::OptB), Some("4"));
        assert_eq!(fields.get(FieldKey::OptC), Some("5"));
        assert_eq!(fields.get(FieldKey::Correct), Some("B"));
        assert_eq!(fields.get(FieldKey::Difficulty), Some("Easy"));
        assert_eq!(fields.get(FieldKey::Points), Some("10"));
    }

    #[test]
    fn test_unknown_columns_ignored_and_short_rows() {
        let input = "Author\tQuestion\tAnswer\nbob\tName a prime\n";
        let records = extract(input).unwrap();
        let fields = &records[0];
        assert_eq!(fields.get(FieldKey::Text), Some("Name a prime"));
        assert_eq!(fields.get(FieldKey::Correct), None);
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_duplicate_header_first_wins() {
        let input = "question,text,a\nfirst,second,x\n";
        let records = extract(input).unwrap();
        assert_eq!(records[0].get(FieldKey::Text), Some("first"));
    }

    #[test]
    fn test_not_applicable() {
        // 单行
        assert!(extract("Question,Answer").is_none());
        // 只识别出一个表头
        assert!(extract("Question,Foo,Bar\nx,y,z").is_none());
    }

    #[test]
    fn test_missing_text_column_is_empty_match() {
        let records = extract("Answer,Difficulty\nB,Easy\n").unwrap();
        assert!(records.is_empty());
    }
}
