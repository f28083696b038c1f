// ==========================================
// 题库导入引擎 - 自由文本解析器
// ==========================================
// 职责: 粘贴的自由文本 → RawFieldMap 列表
// 流程: 题号行前插入空行 → 按空行分块 → 每块逐行匹配规则
// 说明: 兜底策略，总是适用（结果可能为空）
// ==========================================

use crate::domain::import_report::DetectedFormat;
use crate::domain::question::RawFieldMap;
use crate::domain::types::FieldKey;
use crate::importer::extractor_trait::{Extractor, SourceText};
use regex::Regex;
use std::sync::LazyLock;

/// 题号行: "Q1:" / "q2." / "Q3 " / "4." / "5)"
static QUESTION_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:q\d+(?:[:.)]|\s|$)|\d+[.)])\s*(.*)$").expect("valid regex")
});

/// 选项行: 可选项目符号 + 字母 + "." 或 ")"，选项文本首尾的 * 标记正确答案
static OPTION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[-*•]?\s*([A-Ea-e])[.)]\s*(.+)$").expect("valid regex")
});

static ANSWER_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:correct\s+answer|answer|correct|key|ans|solution|答案)\s*[:：\-]\s*(.+)$")
        .expect("valid regex")
});

static TYPE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*(?:type|题型)\s*[:：\-]\s*(.+)$").expect("valid regex"));

static DIFFICULTY_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:difficulty|level|难度)\s*[:：\-]\s*(.+)$").expect("valid regex")
});

static TOPIC_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:topic|category|知识点)\s*[:：\-]\s*(.+)$").expect("valid regex")
});

static POINTS_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:points|score|分值)\s*[:：\-]\s*(.+)$").expect("valid regex")
});

static EXPLANATION_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*(?:explanation|rationale|解析)\s*[:：\-]\s*(.+)$").expect("valid regex")
});

// ==========================================
// PlainTextExtractor
// ==========================================
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    /// 切分题块: 题号行另起一块，空行分隔
    fn split_blocks(raw: &str) -> Vec<Vec<&str>> {
        let mut blocks = Vec::new();
        let mut current: Vec<&str> = Vec::new();

        for line in raw.lines() {
            let starts_block = line.trim().is_empty() || QUESTION_MARKER.is_match(line);
            if starts_block && !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
            if !line.trim().is_empty() {
                current.push(line);
            }
        }
        if !current.is_empty() {
            blocks.push(current);
        }

        blocks
    }

    /// 解析单个题块
    fn parse_block(lines: &[&str]) -> RawFieldMap {
        let mut fields = RawFieldMap::new();
        // 选项行上的 * 标记优先于 Answer 行
        let mut inline_marked = false;

        for line in lines {
            if !fields.contains(FieldKey::Text) {
                // 只有题号的行（如 "Q1"）不产生题干，由后续行补上
                if let Some(caps) = QUESTION_MARKER.captures(line) {
                    fields.set(FieldKey::Text, &caps[1]);
                    continue;
                }
            }

            if let Some(caps) = OPTION_LINE.captures(line) {
                let letter = caps[1].chars().next().unwrap_or('A');
                let body = caps[2].trim();
                let marked = body.starts_with('*') || body.ends_with('*');

                if let Some(slot) = FieldKey::option_for_letter(letter) {
                    fields.set(slot, body.trim_matches('*'));
                    if marked {
                        fields.set(FieldKey::Correct, letter.to_ascii_uppercase().to_string());
                        inline_marked = true;
                    }
                }
                continue;
            }

            if let Some(caps) = ANSWER_LINE.captures(line) {
                if !inline_marked {
                    fields.set(FieldKey::Correct, &caps[1]);
                }
                continue;
            }

            let tagged = [
                (&*TYPE_LINE, FieldKey::Type),
                (&*DIFFICULTY_LINE, FieldKey::Difficulty),
                (&*TOPIC_LINE, FieldKey::Topic),
                (&*POINTS_LINE, FieldKey::Points),
                (&*EXPLANATION_LINE, FieldKey::Explanation),
            ];
            if let Some((key, caps)) = tagged
                .iter()
                .find_map(|(re, key)| re.captures(line).map(|caps| (*key, caps)))
            {
                fields.set(key, &caps[1]);
                continue;
            }

            fields.set_if_absent(FieldKey::Text, line);
        }

        fields
    }
}

impl Extractor for PlainTextExtractor {
    fn format(&self) -> DetectedFormat {
        DetectedFormat::PlainText
    }

    fn extract(&self, source: &SourceText<'_>) -> Option<Vec<RawFieldMap>> {
        Some(
            Self::split_blocks(source.raw)
                .iter()
                .map(|block| Self::parse_block(block))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(input: &str) -> Vec<RawFieldMap> {
        PlainTextExtractor
            .extract(&SourceText::new(input))
            .unwrap_or_default()
    }

    #[test]
    fn test_marker_options_answer() {
        let records = extract("Q1: What color is the sky?\nA) Red\nB) Blue\nAnswer: B\n");
        assert_eq!(records.len(), 1);
        let fields = &records[0];
        assert_eq!(fields.get(FieldKey::Text), Some("What color is the sky?"));
        assert_eq!(fields.get(FieldKey::OptA), Some("Red"));
        assert_eq!(fields.get(FieldKey::OptB), Some("Blue"));
        assert_eq!(fields.get(FieldKey::Correct), Some("B"));
    }

    #[test]
    fn test_consecutive_markers_split_without_blank_lines() {
        let records = extract("1. First?\na) x\nb) y\n2. Second?\na) p\nb) q\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get(FieldKey::Text), Some("First?"));
        assert_eq!(records[1].get(FieldKey::Text), Some("Second?"));
        assert_eq!(records[1].get(FieldKey::OptB), Some("q"));
    }

    #[test]
    fn test_asterisk_overrides_answer_line() {
        let records = extract("Q1: Pick\nA) one\nB) two *\nAnswer: A\n");
        assert_eq!(records[0].get(FieldKey::Correct), Some("B"));
        assert_eq!(records[0].get(FieldKey::OptB), Some("two"));

        // 答案行在前同样被覆盖
        let records = extract("Q1: Pick\nAnswer: A\n- C) *three\nA) one\n");
        assert_eq!(records[0].get(FieldKey::Correct), Some("C"));
        assert_eq!(records[0].get(FieldKey::OptC), Some("three"));
    }

    #[test]
    fn test_metadata_lines() {
        let records = extract(
            "Explain gravity\nType: essay\nDifficulty: hard\nTopic: Physics\nPoints: 20\nExplanation: Newton\n",
        );
        let fields = &records[0];
        assert_eq!(fields.get(FieldKey::Text), Some("Explain gravity"));
        assert_eq!(fields.get(FieldKey::Type), Some("essay"));
        assert_eq!(fields.get(FieldKey::Difficulty), Some("hard"));
        assert_eq!(fields.get(FieldKey::Topic), Some("Physics"));
        assert_eq!(fields.get(FieldKey::Points), Some("20"));
        assert_eq!(fields.get(FieldKey::Explanation), Some("Newton"));
    }

    #[test]
    fn test_unmarked_blocks_split_on_blank_lines() {
        let records = extract("First question\n\n\nSecond question\nextra line\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].get(FieldKey::Text), Some("Second question"));
    }

    #[test]
    fn test_bare_marker_line() {
        let records = extract("Q1\nWhat is the boiling point of water?\nAnswer: 100C\n");
        assert_eq!(
            records[0].get(FieldKey::Text),
            Some("What is the boiling point of water?")
        );
        assert_eq!(records[0].get(FieldKey::Correct), Some("100C"));
    }

    #[test]
    fn test_block_without_text() {
        let records = extract("A) orphan option\nAnswer: A\n");
        assert_eq!(records.len(), 1);
        assert!(!records[0].contains(FieldKey::Text));
    }

    #[test]
    fn test_empty_input() {
        assert!(extract("").is_empty());
        assert!(extract("   \n \n").is_empty());
    }
}
