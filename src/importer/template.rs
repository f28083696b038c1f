// ==========================================
// 题库导入引擎 - CSV 模板与审核导出
// ==========================================
// 职责: 输出标准表头模板 / 导出审核列表
// 工具: csv crate（写出端），读取端仍走 Format Detector
// ==========================================

use crate::domain::question::ParsedQuestion;
use crate::importer::error::ImportResult;
use std::io::Write;

/// 模板表头（均可被表头解析器识别）
pub const TEMPLATE_HEADERS: [&str; 12] = [
    "Question",
    "Option A",
    "Option B",
    "Option C",
    "Option D",
    "Option E",
    "Correct Answer",
    "Type",
    "Difficulty",
    "Topic",
    "Points",
    "Explanation",
];

const TEMPLATE_SAMPLE: [&str; 12] = [
    "What is the capital of France?",
    "London",
    "Paris",
    "Berlin",
    "Madrid",
    "",
    "B",
    "mcq_single",
    "Easy",
    "Geography",
    "10",
    "Paris has been the capital since 987",
];

/// 写出 CSV 模板（表头 + 一行示例）
pub fn write_csv_template<W: Write>(writer: W) -> ImportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(TEMPLATE_HEADERS)?;
    csv_writer.write_record(TEMPLATE_SAMPLE)?;
    csv_writer.flush()?;
    Ok(())
}

/// 导出审核列表
pub fn write_review_csv<W: Write>(writer: W, questions: &[ParsedQuestion]) -> ImportResult<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record([
        "index",
        "text",
        "type",
        "difficulty",
        "topic",
        "points",
        "status",
        "included",
    ])?;

    for (index, q) in questions.iter().enumerate() {
        csv_writer.write_record([
            index.to_string(),
            q.text.clone(),
            q.question_type.as_str().to_string(),
            q.difficulty.as_str().to_string(),
            q.topic.clone(),
            q.points.to_string(),
            q.status.to_string(),
            q.included.to_string(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}
